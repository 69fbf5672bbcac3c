//! Validated construction of values from raw inputs.
//!
//! A [`Factory`] validates each constructor argument with its own validator,
//! labelled so failures point at the argument, and calls the constructor only
//! when every argument passed. Errors raised by the constructor itself become
//! messages too.
//!
//! # Example
//!
//! ```rust
//! use inquest::{param, Config, Factory, Schema, ValidatorExt};
//!
//! #[derive(Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//!
//! let people = Factory::new(
//!     "Person",
//!     (
//!         param("name", Schema::string().not_blank()),
//!         param("age", Schema::parse_int().then(Schema::integer().range(0, 150))),
//!     ),
//!     |(name, age)| Person { name, age },
//! );
//!
//! let ada = people.build(&("Ada".to_string(), "36".to_string()), &Config::default());
//! assert_eq!(ada.into_result().unwrap(), Person { name: "Ada".into(), age: 36 });
//!
//! let errors = people
//!     .build(&(" ".to_string(), "-4".to_string()), &Config::default())
//!     .into_result()
//!     .unwrap_err();
//! let paths: Vec<_> = errors.iter().map(|m| m.path.as_str()).collect();
//! assert_eq!(paths, vec!["name", "age"]);
//! ```

use std::borrow::Borrow;
use std::error::Error as StdError;
use std::fmt::Debug;
use std::sync::Arc;

use crate::config::Config;
use crate::constraint::violation;
use crate::error::{ConstructionError, Message, Messages};
use crate::outcome::{concat, Outcome};
use crate::validation::Env;
use crate::ValidationResult;

use super::traits::{Validator, ValidatorExt};

type BoxError = Box<dyn StdError + Send + Sync>;
type Constructor<V, T> = Box<dyn Fn(V) -> Result<T, BoxError> + Send + Sync>;
type Verifier<T> = Box<dyn Fn(&T, &Env<'_>) -> Outcome<()> + Send + Sync>;

fn verifier<T, F>(check: F) -> Verifier<T>
where
    F: Fn(&T, &Env<'_>) -> Outcome<()> + Send + Sync + 'static,
{
    Box::new(check)
}

/// A labelled constructor argument and its validator.
#[derive(Debug, Clone)]
pub struct Param<V> {
    label: String,
    validator: V,
}

impl<V: Validator> Param<V> {
    /// Returns the label reported in this argument's messages.
    pub fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, input: &V::Input, env: &Env<'_>) -> Outcome<V::Output> {
        self.validator
            .validate_with(input, &env.push_field(self.label.as_str()))
    }
}

/// Creates a constructor argument validated by `validator`.
pub fn param<V: Validator>(label: impl Into<String>, validator: V) -> Param<V> {
    Param {
        label: label.into(),
        validator,
    }
}

/// A tuple of [`Param`]s.
///
/// Implemented for tuples of one to six parameters. The raw input is a tuple
/// holding the owned form of each parameter's input, so a string parameter
/// takes a `String`.
pub trait Params {
    /// The tuple of raw inputs.
    type Input;
    /// The tuple of validated values handed to the constructor.
    type Values;

    /// Validates every argument.
    ///
    /// In fail-fast mode the first failing argument ends the evaluation. In
    /// collect-all mode every argument runs and all messages are returned in
    /// argument order. A partial argument counts as failed.
    fn collect(&self, input: &Self::Input, env: &Env<'_>) -> Result<Self::Values, Messages>;
}

macro_rules! impl_params {
    ($($V:ident $value:ident $idx:tt),+) => {
        impl<$($V),+> Params for ($(Param<$V>,)+)
        where
            $($V: Validator, $V::Input: ToOwned,)+
        {
            type Input = ($(<$V::Input as ToOwned>::Owned,)+);
            type Values = ($($V::Output,)+);

            fn collect(
                &self,
                input: &Self::Input,
                env: &Env<'_>,
            ) -> Result<Self::Values, Messages> {
                let mut failures: Option<Messages> = None;
                $(
                    let raw: &$V::Input = input.$idx.borrow();
                    let $value = match self.$idx.evaluate(raw, env) {
                        Outcome::Success(value) => Some(value),
                        Outcome::Partial(_, messages) | Outcome::Failure(messages) => {
                            if env.is_fail_fast() {
                                return Err(messages);
                            }
                            failures = concat(failures.take(), Some(messages));
                            None
                        }
                    };
                )+

                if let Some(messages) = failures {
                    return Err(messages);
                }
                match ($($value,)+) {
                    ($(Some($value),)+) => Ok(($($value,)+)),
                    _ => unreachable!("an argument without a value always records a failure"),
                }
            }
        }
    };
}

impl_params!(V1 v1 0);
impl_params!(V1 v1 0, V2 v2 1);
impl_params!(V1 v1 0, V2 v2 1, V3 v3 2);
impl_params!(V1 v1 0, V2 v2 1, V3 v3 2, V4 v4 3);
impl_params!(V1 v1 0, V2 v2 1, V3 v3 2, V4 v4 3, V5 v5 4);
impl_params!(V1 v1 0, V2 v2 1, V3 v3 2, V4 v4 3, V5 v5 4, V6 v6 5);

/// Builds a `T` from validated arguments.
///
/// The factory registers its label as the root label when it is the first
/// to run. The constructor runs only after every argument passed; an `Err`
/// it returns becomes a single `construct` message carrying the error as its
/// cause. Panics raised by the constructor are not caught.
///
/// A factory is itself a [`Validator`] from the raw argument tuple to `T`, so
/// it can serve as an argument of another factory or as an object field.
pub struct Factory<P: Params, T> {
    label: String,
    params: P,
    construct: Constructor<P::Values, T>,
    verify: Option<Verifier<T>>,
}

impl<P: Params, T> Factory<P, T> {
    /// Creates a factory with an infallible constructor.
    pub fn new<C>(label: impl Into<String>, params: P, construct: C) -> Self
    where
        C: Fn(P::Values) -> T + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            params,
            construct: Box::new(move |values| Ok(construct(values))),
            verify: None,
        }
    }

    /// Creates a factory with a fallible constructor.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{param, Config, Factory, Schema, ValidatorExt};
    ///
    /// #[derive(Debug)]
    /// struct Port(u16);
    ///
    /// let ports = Factory::try_new(
    ///     "Port",
    ///     (param("number", Schema::integer().positive()),),
    ///     |(number,)| u16::try_from(number).map(Port),
    /// );
    ///
    /// let errors = ports.build(&(70_000,), &Config::default()).into_result().unwrap_err();
    /// assert_eq!(errors.first().constraint_id, "construct");
    /// assert!(errors.first().cause().is_some());
    /// ```
    pub fn try_new<C, E>(label: impl Into<String>, params: P, construct: C) -> Self
    where
        C: Fn(P::Values) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            label: label.into(),
            params,
            construct: Box::new(move |values| construct(values).map_err(Into::into)),
            verify: None,
        }
    }

    /// Adds a check run on the constructed value.
    ///
    /// Its messages are reported at the factory's own path.
    pub fn verify<V>(mut self, validator: V) -> Self
    where
        V: Validator + Send + Sync + 'static,
        T: Borrow<V::Input>,
    {
        self.verify = Some(verifier(move |value: &T, env: &Env<'_>| {
            validator.validate_with(value.borrow(), env).map_value(drop)
        }));
        self
    }

    /// Returns the root label of this factory.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Validates the raw arguments and constructs the value.
    ///
    /// The same as [`validate`](ValidatorExt::validate).
    pub fn build(&self, input: &P::Input, config: &Config) -> ValidationResult<T>
    where
        P::Input: Debug,
    {
        self.validate(input, config)
    }

    fn construction_failed(&self, error: BoxError, input: &P::Input, env: &Env<'_>) -> Message
    where
        P::Input: Debug,
    {
        let error = ConstructionError::new(self.label.clone(), error);
        let rendered = error.source.to_string();
        let message = Message::template("factory.construction_failed")
            .with_arg(self.label.as_str())
            .with_arg(rendered)
            .with_shared_cause(Arc::new(error));
        violation("construct", message, input, env)
    }
}

impl<P, T> Validator for Factory<P, T>
where
    P: Params,
    P::Input: Debug,
{
    type Input = P::Input;
    type Output = T;

    fn validate_with(&self, input: &P::Input, env: &Env<'_>) -> Outcome<T> {
        env.register_root(&self.label);

        let values = match self.params.collect(input, env) {
            Ok(values) => values,
            Err(messages) => return Outcome::Failure(messages),
        };

        let value = match (self.construct)(values) {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(
                    target: "inquest",
                    factory = %self.label,
                    path = %env.path(),
                    error = %error,
                    "constructor rejected validated arguments"
                );
                let message = self.construction_failed(error, input, env);
                return Outcome::Failure(Messages::single(message));
            }
        };

        match &self.verify {
            None => Outcome::Success(value),
            Some(verify) => match verify(&value, env) {
                Outcome::Success(()) => Outcome::Success(value),
                Outcome::Partial(_, messages) | Outcome::Failure(messages) => {
                    Outcome::Failure(messages)
                }
            },
        }
    }
}
