//! Traits for validator polymorphism.
//!
//! This module provides the [`Validator`] trait implemented by every leaf,
//! combinator, object schema, and factory, and the [`ValidatorExt`] extension
//! trait with the public entry points and the fluent combinator methods.

use std::borrow::Borrow;
use std::marker::PhantomData;
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::Config;
use crate::error::ValidationFailed;
use crate::outcome::Outcome;
use crate::validation::{Env, Session};
use crate::ValidationResult;

use super::combinators::{And, Map, MapSame, Optional, Or, Then};

/// A validator: checks an input and produces an output.
///
/// Implementations receive the [`Env`] of the current call explicitly; it
/// carries the configuration, the current path, and the accumulation scope
/// that violations are reported to.
///
/// The `Send + Sync` bounds are not required by the trait itself, but every
/// validator in this crate is thread-safe when its parts are, so a validator
/// can be shared across threads and used for parallel batches.
///
/// # Example
///
/// ```rust
/// use inquest::{Config, Schema, ValidatorExt};
///
/// let name = Schema::string().min_len(1).max_len(20);
/// assert!(name.validate("Ada", &Config::default()).is_success());
/// ```
pub trait Validator {
    /// The type of value checked.
    type Input: ?Sized;

    /// The value produced on success.
    type Output;

    /// Runs the validator inside an existing validation call.
    fn validate_with(&self, input: &Self::Input, env: &Env<'_>) -> Outcome<Self::Output>;
}

impl<V: Validator + ?Sized> Validator for &V {
    type Input = V::Input;
    type Output = V::Output;

    fn validate_with(&self, input: &Self::Input, env: &Env<'_>) -> Outcome<Self::Output> {
        (**self).validate_with(input, env)
    }
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    type Input = V::Input;
    type Output = V::Output;

    fn validate_with(&self, input: &Self::Input, env: &Env<'_>) -> Outcome<Self::Output> {
        (**self).validate_with(input, env)
    }
}

impl<V: Validator + ?Sized> Validator for Arc<V> {
    type Input = V::Input;
    type Output = V::Output;

    fn validate_with(&self, input: &Self::Input, env: &Env<'_>) -> Outcome<Self::Output> {
        (**self).validate_with(input, env)
    }
}

/// A type-erased, shareable validator.
pub type BoxedValidator<I, O> = Box<dyn Validator<Input = I, Output = O> + Send + Sync>;

/// Entry points and combinator methods available on every validator.
pub trait ValidatorExt: Validator {
    /// Validates `input` as a new top-level call.
    ///
    /// A fresh [`Session`] is created for the call, so concurrent calls never
    /// share state. A `Partial` outcome is reported as a failure.
    fn validate(&self, input: &Self::Input, config: &Config) -> ValidationResult<Self::Output> {
        let session = Session::new(config);
        self.validate_with(input, &session.env()).into_validation()
    }

    /// Validates `input`, raising [`ValidationFailed`] on failure.
    fn validate_or_raise(
        &self,
        input: &Self::Input,
        config: &Config,
    ) -> Result<Self::Output, ValidationFailed> {
        self.validate(input, config)
            .into_result()
            .map_err(ValidationFailed::from)
    }

    /// Validates every input in parallel, one independent call per input.
    ///
    /// Results are returned in input order.
    fn validate_batch<I>(
        &self,
        inputs: &[I],
        config: &Config,
    ) -> Vec<ValidationResult<Self::Output>>
    where
        Self: Sync,
        I: Borrow<Self::Input> + Sync,
        Self::Output: Send,
    {
        inputs
            .par_iter()
            .map(|input| self.validate(input.borrow(), config))
            .collect()
    }

    /// Requires both validators to pass; see [`And`].
    fn and<B>(self, other: B) -> And<Self, B>
    where
        Self: Sized,
        B: Validator<Input = Self::Input, Output = Self::Output>,
    {
        And::new(self, other)
    }

    /// Accepts the first validator that passes; see [`Or`].
    fn or<B>(self, other: B) -> Or<Self, B>
    where
        Self: Sized,
        B: Validator<Input = Self::Input, Output = Self::Output>,
    {
        Or::new(self, other)
    }

    /// Feeds the output of this validator into `next`; see [`Then`].
    fn then<B>(self, next: B) -> Then<Self, B>
    where
        Self: Sized,
        B: Validator,
        Self::Output: Borrow<B::Input>,
    {
        Then::new(self, next)
    }

    /// Transforms a successful output; see [`Map`].
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map::new(self, f)
    }

    /// Transforms the output without changing its type, keeping partial
    /// values; see [`MapSame`].
    fn map_same<F>(self, f: F) -> MapSame<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> Self::Output,
    {
        MapSame::new(self, f)
    }

    /// Accepts `None` and validates the contents of `Some`; see [`Optional`].
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
        Self::Input: ToOwned,
    {
        Optional::new(self)
    }

    /// Erases the concrete type of this validator.
    fn boxed(self) -> BoxedValidator<Self::Input, Self::Output>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Box::new(self)
    }
}

impl<V: Validator + ?Sized> ValidatorExt for V {}

/// A validator built from a closure.
///
/// Created by [`validator_fn`].
pub struct FnValidator<I: ?Sized, O, F> {
    f: F,
    _marker: PhantomData<fn(&I) -> O>,
}

impl<I: ?Sized, O, F> Validator for FnValidator<I, O, F>
where
    F: Fn(&I, &Env<'_>) -> Outcome<O>,
{
    type Input = I;
    type Output = O;

    fn validate_with(&self, input: &I, env: &Env<'_>) -> Outcome<O> {
        (self.f)(input, env)
    }
}

/// Creates a validator from a closure.
///
/// # Example
///
/// ```rust
/// use inquest::{validator_fn, Config, Outcome, ValidatorExt};
///
/// let trimmed = validator_fn(|s: &str, _env| Outcome::Success(s.trim().to_string()));
/// let result = trimmed.validate("  hi  ", &Config::default());
/// assert_eq!(result.into_result().unwrap(), "hi");
/// ```
pub fn validator_fn<I, O, F>(f: F) -> FnValidator<I, O, F>
where
    I: ?Sized,
    F: Fn(&I, &Env<'_>) -> Outcome<O>,
{
    FnValidator {
        f,
        _marker: PhantomData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Message, Messages};

    fn reject(text: &'static str) -> impl Validator<Input = i64, Output = i64> {
        validator_fn(move |_: &i64, _env: &Env<'_>| {
            Outcome::Failure(Messages::single(Message::text(text)))
        })
    }

    #[test]
    fn test_validate_collapses_to_validation() {
        let accept = validator_fn(|n: &i64, _env: &Env<'_>| Outcome::Success(*n));
        assert!(accept.validate(&1, &Config::default()).is_success());
        assert!(reject("no").validate(&1, &Config::default()).is_failure());
    }

    #[test]
    fn test_validate_or_raise_returns_error() {
        let err = reject("no")
            .validate_or_raise(&1, &Config::default())
            .unwrap_err();
        assert_eq!(err.messages.len(), 1);
    }

    #[test]
    fn test_boxed_and_arc_delegate() {
        let boxed = reject("boxed").boxed();
        assert!(boxed.validate(&0, &Config::default()).is_failure());

        let shared = Arc::new(reject("shared"));
        assert!(shared.validate(&0, &Config::default()).is_failure());
    }

    #[test]
    fn test_validate_batch_preserves_order() {
        let even = validator_fn(|n: &i64, _env: &Env<'_>| {
            if n % 2 == 0 {
                Outcome::Success(*n)
            } else {
                Outcome::Failure(Messages::single(Message::text("odd")))
            }
        });
        let results = even.validate_batch(&[2_i64, 3, 4], &Config::default());
        let ok: Vec<bool> = results.iter().map(|r| r.is_success()).collect();
        assert_eq!(ok, vec![true, false, true]);
    }
}
