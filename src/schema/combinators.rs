//! Combinators for composing validators.
//!
//! This module provides the ways two validators can be put together:
//! - [`And`]: both must pass; in collect-all mode both always run
//! - [`Or`]: the first that passes wins; if neither does, one composite
//!   message explains both failures
//! - [`Then`]: the output of the first feeds the second
//! - [`Map`] / [`MapSame`]: transform the output
//! - [`Optional`]: `None` passes, `Some` is validated
//!
//! Each combinator is itself a [`Validator`], so they nest freely.
//!
//! # Example
//!
//! ```rust
//! use inquest::{Config, Schema, ValidatorExt};
//!
//! // a short code or a long, well-formed identifier
//! let code = Schema::string()
//!     .exact_len(3)
//!     .or(Schema::string().min_len(8).pattern(r"^[a-z]+$").unwrap());
//!
//! assert!(code.validate("abc", &Config::default()).is_success());
//! assert!(code.validate("abcdefgh", &Config::default()).is_success());
//! assert!(code.validate("abcd", &Config::default()).is_failure());
//! ```

use std::borrow::Borrow;

use stillwater::prelude::*;

use crate::error::{Message, Messages};
use crate::outcome::Outcome;
use crate::validation::Env;

use super::traits::Validator;

/// Both validators must pass.
///
/// In fail-fast mode the right side runs only when the left succeeded. In
/// collect-all mode both run and their messages are concatenated, left
/// first. The right side's value is kept whenever both produced one.
#[derive(Debug, Clone)]
pub struct And<A, B> {
    left: A,
    right: B,
}

impl<A, B> And<A, B> {
    pub fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}

impl<A, B> Validator for And<A, B>
where
    A: Validator,
    B: Validator<Input = A::Input, Output = A::Output>,
{
    type Input = A::Input;
    type Output = A::Output;

    fn validate_with(&self, input: &Self::Input, env: &Env<'_>) -> Outcome<Self::Output> {
        let left = self.left.validate_with(input, env);
        if env.is_fail_fast() && !left.is_success() {
            return left;
        }
        let right = self.right.validate_with(input, env);

        match (left, right) {
            (Outcome::Success(_), Outcome::Success(value)) => Outcome::Success(value),
            (Outcome::Success(_), Outcome::Partial(value, messages)) => {
                Outcome::Partial(value, messages)
            }
            (Outcome::Partial(_, messages), Outcome::Success(value)) => {
                Outcome::Partial(value, messages)
            }
            (Outcome::Partial(_, left), Outcome::Partial(value, right)) => {
                Outcome::Partial(value, left.combine(right))
            }
            (Outcome::Success(_), Outcome::Failure(messages))
            | (Outcome::Failure(messages), Outcome::Success(_)) => Outcome::Failure(messages),
            (Outcome::Partial(_, left), Outcome::Failure(right))
            | (Outcome::Failure(left), Outcome::Partial(_, right))
            | (Outcome::Failure(left), Outcome::Failure(right)) => {
                Outcome::Failure(left.combine(right))
            }
        }
    }
}

/// The first validator that passes wins.
///
/// The right side runs only when the left did not succeed. If neither
/// succeeds, the result carries a single composite message holding both
/// branches' messages, stamped with the `or` constraint id. A value
/// survives if either branch produced one, the left branch's first.
#[derive(Debug, Clone)]
pub struct Or<A, B> {
    left: A,
    right: B,
}

impl<A, B> Or<A, B> {
    pub fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}

impl<A, B> Validator for Or<A, B>
where
    A: Validator,
    B: Validator<Input = A::Input, Output = A::Output>,
{
    type Input = A::Input;
    type Output = A::Output;

    fn validate_with(&self, input: &Self::Input, env: &Env<'_>) -> Outcome<Self::Output> {
        let (left_value, left_messages) = match self.left.validate_with(input, env) {
            Outcome::Success(value) => return Outcome::Success(value),
            Outcome::Partial(value, messages) => (Some(value), messages),
            Outcome::Failure(messages) => (None, messages),
        };
        let (right_value, right_messages) = match self.right.validate_with(input, env) {
            Outcome::Success(value) => return Outcome::Success(value),
            Outcome::Partial(value, messages) => (Some(value), messages),
            Outcome::Failure(messages) => (None, messages),
        };

        let path = env.path().full_name();
        let input = left_messages.first().input.clone();
        tracing::debug!(
            target: "inquest",
            path = %path,
            left = left_messages.len(),
            right = right_messages.len(),
            "no alternative passed"
        );
        let composite = Message::composite(left_messages.into_vec(), right_messages.into_vec())
            .stamped("or", env.root_label(), &path, input);
        let messages = Messages::single(composite);

        match left_value.or(right_value) {
            Some(value) => Outcome::Partial(value, messages),
            None => Outcome::Failure(messages),
        }
    }
}

/// Feeds the output of the first validator into the second.
///
/// The second runs only when the first fully succeeded; a partial value is
/// never passed on.
#[derive(Debug, Clone)]
pub struct Then<A, B> {
    first: A,
    next: B,
}

impl<A, B> Then<A, B> {
    pub fn new(first: A, next: B) -> Self {
        Self { first, next }
    }
}

impl<A, B> Validator for Then<A, B>
where
    A: Validator,
    B: Validator,
    A::Output: Borrow<B::Input>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn validate_with(&self, input: &Self::Input, env: &Env<'_>) -> Outcome<Self::Output> {
        match self.first.validate_with(input, env) {
            Outcome::Success(value) => self.next.validate_with(value.borrow(), env),
            Outcome::Partial(_, messages) | Outcome::Failure(messages) => {
                Outcome::Failure(messages)
            }
        }
    }
}

/// Transforms a successful output.
///
/// A partial value is dropped: `f` only ever sees values that passed.
pub struct Map<A, F> {
    inner: A,
    f: F,
}

impl<A, F> Map<A, F> {
    pub fn new(inner: A, f: F) -> Self {
        Self { inner, f }
    }
}

impl<A, F, U> Validator for Map<A, F>
where
    A: Validator,
    F: Fn(A::Output) -> U,
{
    type Input = A::Input;
    type Output = U;

    fn validate_with(&self, input: &Self::Input, env: &Env<'_>) -> Outcome<U> {
        self.inner.validate_with(input, env).map(&self.f)
    }
}

/// Transforms the output without changing its type.
///
/// Unlike [`Map`], a partial value is transformed and kept.
pub struct MapSame<A, F> {
    inner: A,
    f: F,
}

impl<A, F> MapSame<A, F> {
    pub fn new(inner: A, f: F) -> Self {
        Self { inner, f }
    }
}

impl<A, F> Validator for MapSame<A, F>
where
    A: Validator,
    F: Fn(A::Output) -> A::Output,
{
    type Input = A::Input;
    type Output = A::Output;

    fn validate_with(&self, input: &Self::Input, env: &Env<'_>) -> Outcome<Self::Output> {
        self.inner.validate_with(input, env).map_value(&self.f)
    }
}

/// Accepts `None`; validates the contents of `Some`.
#[derive(Debug, Clone)]
pub struct Optional<V> {
    inner: V,
}

impl<V> Optional<V> {
    pub fn new(inner: V) -> Self {
        Self { inner }
    }
}

impl<V> Validator for Optional<V>
where
    V: Validator,
    V::Input: ToOwned,
{
    type Input = Option<<V::Input as ToOwned>::Owned>;
    type Output = Option<V::Output>;

    fn validate_with(&self, input: &Self::Input, env: &Env<'_>) -> Outcome<Self::Output> {
        match input {
            None => Outcome::Success(None),
            Some(value) => self.inner.validate_with(value.borrow(), env).map_value(Some),
        }
    }
}

/// Creates an [`And`] of two validators.
pub fn and<A, B>(left: A, right: B) -> And<A, B>
where
    A: Validator,
    B: Validator<Input = A::Input, Output = A::Output>,
{
    And::new(left, right)
}

/// Creates an [`Or`] of two validators.
pub fn or<A, B>(left: A, right: B) -> Or<A, B>
where
    A: Validator,
    B: Validator<Input = A::Input, Output = A::Output>,
{
    Or::new(left, right)
}

/// Creates a [`Then`] chaining two validators.
pub fn then<A, B>(first: A, next: B) -> Then<A, B>
where
    A: Validator,
    B: Validator,
    A::Output: Borrow<B::Input>,
{
    Then::new(first, next)
}

/// Creates a [`Map`] over a validator's output.
pub fn map<A, F, U>(inner: A, f: F) -> Map<A, F>
where
    A: Validator,
    F: Fn(A::Output) -> U,
{
    Map::new(inner, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::schema::traits::validator_fn;
    use crate::validation::Session;

    fn fail(text: &'static str) -> impl Validator<Input = i64, Output = i64> {
        validator_fn(move |_: &i64, _env: &Env<'_>| {
            Outcome::Failure(Messages::single(Message::text(text)))
        })
    }

    fn partial(text: &'static str) -> impl Validator<Input = i64, Output = i64> {
        validator_fn(move |n: &i64, _env: &Env<'_>| {
            Outcome::Partial(*n, Messages::single(Message::text(text)))
        })
    }

    fn pass() -> impl Validator<Input = i64, Output = i64> {
        validator_fn(|n: &i64, _env: &Env<'_>| Outcome::Success(*n))
    }

    fn run<V: Validator<Input = i64>>(v: &V, config: &Config) -> Outcome<V::Output> {
        let session = Session::new(config);
        v.validate_with(&1, &session.env())
    }

    #[test]
    fn test_and_fail_fast_skips_right() {
        let outcome = run(&And::new(fail("l"), fail("r")), &Config::fail_fast());
        assert_eq!(outcome.messages().unwrap().len(), 1);
    }

    #[test]
    fn test_and_collect_all_concatenates() {
        let outcome = run(&And::new(fail("l"), fail("r")), &Config::collect_all());
        let texts: Vec<_> = outcome.messages().unwrap().iter().map(|m| m.to_string()).collect();
        assert_eq!(texts, vec!["(root): l", "(root): r"]);
    }

    #[test]
    fn test_and_partials_stay_partial() {
        let outcome = run(&And::new(partial("l"), partial("r")), &Config::collect_all());
        assert!(outcome.is_partial());
        assert_eq!(outcome.messages().unwrap().len(), 2);
    }

    #[test]
    fn test_or_builds_one_composite() {
        let outcome = run(&Or::new(fail("l"), fail("r")), &Config::default());
        let messages = outcome.messages().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages.first().is_composite());
        assert_eq!(messages.first().constraint_id, "or");
        assert_eq!(messages.first().descendants().len(), 2);
    }

    #[test]
    fn test_or_keeps_left_partial_value() {
        let left = validator_fn(|_: &i64, _env: &Env<'_>| {
            Outcome::Partial(10, Messages::single(Message::text("l")))
        });
        let right = validator_fn(|_: &i64, _env: &Env<'_>| {
            Outcome::Partial(20, Messages::single(Message::text("r")))
        });
        let outcome = run(&Or::new(left, right), &Config::default());
        assert_eq!(outcome.value(), Some(&10));
    }

    #[test]
    fn test_then_does_not_forward_partial() {
        let outcome = run(&Then::new(partial("first"), pass()), &Config::default());
        assert!(outcome.is_failure());
    }

    #[test]
    fn test_optional_none_passes() {
        let session = Session::new(&Config::default());
        let outcome = Optional::new(fail("never")).validate_with(&None, &session.env());
        assert_eq!(outcome, Outcome::Success(None));
    }
}
