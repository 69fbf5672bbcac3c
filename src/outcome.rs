//! The three-state result of running a validator.

use stillwater::prelude::*;
use stillwater::Validation;

use crate::error::Messages;

/// The result of running a validator inside a validation call.
///
/// Besides plain success and failure, an outcome can be `Partial`: a value is
/// still available even though violations were recorded. This happens in
/// collect-all mode, where a chain keeps checking after the first violation,
/// and lets later steps keep working on the value.
///
/// Public entry points collapse outcomes into a two-state
/// [`ValidationResult`](crate::ValidationResult) with
/// [`into_validation`](Outcome::into_validation).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Every check passed.
    Success(T),
    /// Checks failed and no value is available.
    Failure(Messages),
    /// Checks failed but a value is still available.
    Partial(T, Messages),
}

impl<T> Outcome<T> {
    /// Returns true only for `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns true only for `Failure`.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Returns true only for `Partial`.
    pub fn is_partial(&self) -> bool {
        matches!(self, Outcome::Partial(..))
    }

    /// Returns the value, if one is available.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) | Outcome::Partial(value, _) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// Returns the recorded messages, if any.
    pub fn messages(&self) -> Option<&Messages> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(messages) | Outcome::Partial(_, messages) => Some(messages),
        }
    }

    /// Splits the outcome into its optional value and optional messages.
    pub fn into_parts(self) -> (Option<T>, Option<Messages>) {
        match self {
            Outcome::Success(value) => (Some(value), None),
            Outcome::Failure(messages) => (None, Some(messages)),
            Outcome::Partial(value, messages) => (Some(value), Some(messages)),
        }
    }

    /// Rebuilds an outcome from an optional value and optional messages.
    ///
    /// Returns `None` when both are absent.
    pub fn from_parts(value: Option<T>, messages: Option<Messages>) -> Option<Self> {
        match (value, messages) {
            (Some(value), None) => Some(Outcome::Success(value)),
            (Some(value), Some(messages)) => Some(Outcome::Partial(value, messages)),
            (None, Some(messages)) => Some(Outcome::Failure(messages)),
            (None, None) => None,
        }
    }

    /// Transforms the value of a `Success`; a `Partial` loses its value.
    ///
    /// Use this when the value of a failed check must not be reused, for
    /// example because `f` assumes valid input.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(messages) | Outcome::Partial(_, messages) => {
                Outcome::Failure(messages)
            }
        }
    }

    /// Transforms the value of both `Success` and `Partial`.
    pub fn map_value<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Partial(value, messages) => Outcome::Partial(f(value), messages),
            Outcome::Failure(messages) => Outcome::Failure(messages),
        }
    }

    /// Drops the value of a `Partial`, keeping its messages as a `Failure`.
    pub fn into_strict(self) -> Self {
        match self {
            Outcome::Partial(_, messages) => Outcome::Failure(messages),
            other => other,
        }
    }

    /// Collapses this outcome into a two-state `Validation`.
    ///
    /// A `Partial` becomes a `Failure` carrying its messages.
    pub fn into_validation(self) -> Validation<T, Messages> {
        match self {
            Outcome::Success(value) => Validation::Success(value),
            Outcome::Failure(messages) | Outcome::Partial(_, messages) => {
                Validation::Failure(messages)
            }
        }
    }
}

/// Combines two optional message sets, left before right.
pub(crate) fn concat(left: Option<Messages>, right: Option<Messages>) -> Option<Messages> {
    match (left, right) {
        (Some(left), Some(right)) => Some(left.combine(right)),
        (left, None) => left,
        (None, right) => right,
    }
}

impl<T> From<Validation<T, Messages>> for Outcome<T> {
    fn from(validation: Validation<T, Messages>) -> Self {
        match validation {
            Validation::Success(value) => Outcome::Success(value),
            Validation::Failure(messages) => Outcome::Failure(messages),
        }
    }
}
