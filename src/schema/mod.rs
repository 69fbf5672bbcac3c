//! Validators and the builders that create them.
//!
//! This module provides the [`Validator`] trait, the leaf validators (string,
//! integer, array, temporal), the combinators that compose them, the
//! [`ObjectSchema`] for structured values, and the [`Factory`] for validated
//! construction. [`Schema`] is the entry point for all of them.
//!
//! # Example
//!
//! ```rust
//! use inquest::{Config, Schema, ValidatorExt};
//!
//! let schema = Schema::string().min_len(1).max_len(100);
//!
//! assert!(schema.validate("hello", &Config::default()).is_success());
//! assert!(schema.validate("", &Config::default()).is_failure());
//! ```

mod array;
mod combinators;
mod factory;
mod numeric;
mod object;
mod string;
mod temporal;
mod traits;

pub use array::ArraySchema;
pub use combinators::{and, map, or, then, And, Map, MapSame, Optional, Or, Then};
pub use factory::{param, Factory, Param, Params};
pub use numeric::{IntegerSchema, ParseInt};
pub use object::ObjectSchema;
pub use string::StringSchema;
pub use temporal::TemporalSchema;
pub use traits::{validator_fn, BoxedValidator, FnValidator, Validator, ValidatorExt};

use std::error::Error as StdError;

use crate::config::Temporal;
use crate::constraint::{ensure, predicate, Check, Constraint, ConstraintResult, Predicate};

/// Entry point for creating validators.
///
/// `Schema` provides factory methods for every validator type. Each one
/// supports further constraints through a builder pattern.
///
/// # Example
///
/// ```rust
/// use inquest::Schema;
///
/// let username = Schema::string()
///     .min_len(3)
///     .max_len(20)
///     .pattern(r"^[a-z0-9_]+$")
///     .unwrap()
///     .error("lowercase letters, digits and underscores only");
/// ```
pub struct Schema;

impl Schema {
    /// Creates a string validator.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates an `i64` validator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Config, Schema, ValidatorExt};
    ///
    /// let schema = Schema::integer().min(0).max(100);
    /// assert!(schema.validate(&50, &Config::default()).is_success());
    /// assert!(schema.validate(&-5, &Config::default()).is_failure());
    /// ```
    pub fn integer() -> IntegerSchema {
        IntegerSchema::new()
    }

    /// Creates a validator parsing text into an `i64`.
    pub fn parse_int() -> ParseInt {
        ParseInt
    }

    /// Creates a slice validator checking each item with `item`.
    pub fn array<V, E>(item: V) -> ArraySchema<V, E> {
        ArraySchema::new(item)
    }

    /// Creates a validator for points in time.
    pub fn temporal<T: Temporal>() -> TemporalSchema<T> {
        TemporalSchema::new()
    }

    /// Creates an object validator for `T`, labelled with its type name.
    pub fn object<T: 'static>() -> ObjectSchema<T> {
        ObjectSchema::new()
    }

    /// Wraps `validator` so that `None` passes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Config, Schema, ValidatorExt};
    ///
    /// let schema = Schema::optional(Schema::integer().positive());
    /// assert!(schema.validate(&None, &Config::default()).is_success());
    /// assert!(schema.validate(&Some(-1), &Config::default()).is_failure());
    /// ```
    pub fn optional<V>(validator: V) -> Optional<V>
    where
        V: Validator,
        V::Input: ToOwned,
    {
        Optional::new(validator)
    }

    /// Lifts a constraint into a validator.
    pub fn check<C>(constraint: C) -> Check<C>
    where
        C: Constraint,
    {
        Check(constraint)
    }

    /// Creates a validator from a closure returning a [`ConstraintResult`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Config, ConstraintResult, Message, Schema, ValidatorExt};
    ///
    /// let even = Schema::custom("even", |n: &i64| {
    ///     ConstraintResult::check(n % 2 == 0, || Message::text("must be even"))
    /// });
    /// assert!(even.validate(&3, &Config::default()).is_failure());
    /// ```
    pub fn custom<I, F>(id: impl Into<String>, check: F) -> Check<Predicate<I, F>>
    where
        I: ?Sized,
        F: Fn(&I) -> ConstraintResult,
    {
        Check(predicate(id, check))
    }

    /// Creates a validator from a boolean predicate and message text.
    pub fn ensure<I, P>(
        id: impl Into<String>,
        ok: P,
        message: impl Into<String>,
    ) -> Check<Predicate<I, impl Fn(&I) -> ConstraintResult + Send + Sync>>
    where
        I: ?Sized,
        P: Fn(&I) -> bool + Send + Sync,
    {
        Check(ensure(id, ok, message))
    }

    /// Creates a factory with an infallible constructor.
    pub fn factory<P, T, C>(label: impl Into<String>, params: P, construct: C) -> Factory<P, T>
    where
        P: Params,
        C: Fn(P::Values) -> T + Send + Sync + 'static,
    {
        Factory::new(label, params, construct)
    }

    /// Creates a factory with a fallible constructor.
    pub fn try_factory<P, T, C, E>(
        label: impl Into<String>,
        params: P,
        construct: C,
    ) -> Factory<P, T>
    where
        P: Params,
        C: Fn(P::Values) -> Result<T, E> + Send + Sync + 'static,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Factory::try_new(label, params, construct)
    }
}
