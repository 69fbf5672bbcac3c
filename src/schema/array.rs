//! Sequence validation.
//!
//! This module provides [`ArraySchema`] for validating slices with an item
//! validator and length constraints.

use std::borrow::Borrow;
use std::fmt::Debug;
use std::marker::PhantomData;

use crate::constraint::{apply, Constraint, ConstraintResult};
use crate::error::Message;
use crate::outcome::Outcome;
use crate::scope::{accumulate, settle};
use crate::validation::Env;

use super::traits::Validator;

#[derive(Debug, Clone, Copy)]
enum LengthRule {
    Min(usize),
    Max(usize),
}

struct LengthConstraint<E> {
    rule: LengthRule,
    message: Option<String>,
    _element: PhantomData<fn(&E)>,
}

impl<E> Constraint for LengthConstraint<E> {
    type Input = [E];

    fn id(&self) -> &str {
        match self.rule {
            LengthRule::Min(_) => "min_length",
            LengthRule::Max(_) => "max_length",
        }
    }

    fn evaluate(&self, items: &[E], _env: &Env<'_>) -> ConstraintResult {
        let len = items.len();
        let (ok, template) = match self.rule {
            LengthRule::Min(min) => (
                len >= min,
                Message::template("array.min_length").with_arg(min).with_arg(len),
            ),
            LengthRule::Max(max) => (
                len <= max,
                Message::template("array.max_length").with_arg(max).with_arg(len),
            ),
        };
        ConstraintResult::check(ok, || match &self.message {
            Some(text) => Message::text(text.clone()),
            None => template,
        })
    }
}

/// A validator for slices.
///
/// Length constraints run first, then every item is validated at path
/// `[index]` under the array's own segment. All of it happens in one scope:
/// in fail-fast mode the first violation ends the array. The output holds
/// the items' outputs in order; a `Partial` is only produced when every item
/// produced a value.
///
/// `E` is the element type of the slice; it only needs to borrow as the item
/// validator's input, so a `Vec<String>` can be checked with a string schema.
///
/// # Example
///
/// ```rust
/// use inquest::{Config, Schema, ValidatorExt};
///
/// let tags = Schema::array(Schema::string().min_len(1)).non_empty().max_len(3);
///
/// let ok = vec!["a".to_string(), "b".to_string()];
/// assert!(tags.validate(&ok[..], &Config::default()).is_success());
///
/// let errors = tags
///     .validate(&["x".to_string(), String::new()][..], &Config::default())
///     .into_result()
///     .unwrap_err();
/// assert_eq!(errors.first().path, "[1]");
/// ```
pub struct ArraySchema<V, E> {
    item: V,
    constraints: Vec<LengthConstraint<E>>,
}

impl<V, E> ArraySchema<V, E> {
    /// Creates an array schema validating each item with `item`.
    pub fn new(item: V) -> Self {
        Self {
            item,
            constraints: Vec::new(),
        }
    }

    fn push(mut self, rule: LengthRule) -> Self {
        self.constraints.push(LengthConstraint {
            rule,
            message: None,
            _element: PhantomData,
        });
        self
    }

    /// Requires at least `min` items.
    pub fn min_len(self, min: usize) -> Self {
        self.push(LengthRule::Min(min))
    }

    /// Requires at most `max` items.
    pub fn max_len(self, max: usize) -> Self {
        self.push(LengthRule::Max(max))
    }

    /// Requires at least one item.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Replaces the message of the most recently added length constraint.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            last.message = Some(message.into());
        }
        self
    }
}

impl<V, E> Validator for ArraySchema<V, E>
where
    V: Validator,
    E: Borrow<V::Input> + Debug,
{
    type Input = [E];
    type Output = Vec<V::Output>;

    fn validate_with(&self, input: &[E], env: &Env<'_>) -> Outcome<Self::Output> {
        let outcome = settle(accumulate(env, |env| {
            for constraint in &self.constraints {
                apply(constraint, input, env)?;
            }

            let mut items = Vec::with_capacity(input.len());
            let mut complete = true;
            for (index, item) in input.iter().enumerate() {
                let outcome = self.item.validate_with(item.borrow(), &env.push_index(index));
                match env.absorb(outcome)? {
                    Some(value) => items.push(value),
                    None => complete = false,
                }
            }
            Ok((items, complete))
        }));

        match outcome {
            Outcome::Success((items, _)) => Outcome::Success(items),
            Outcome::Partial((items, true), messages) => Outcome::Partial(items, messages),
            Outcome::Partial((_, false), messages) | Outcome::Failure(messages) => {
                Outcome::Failure(messages)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::schema::numeric::IntegerSchema;
    use crate::schema::traits::ValidatorExt;
    use crate::validation::Session;

    #[test]
    fn test_items_are_validated_in_order() {
        let schema = ArraySchema::new(IntegerSchema::new().positive());
        let result = schema.validate(&[1_i64, 2, 3][..], &Config::default());
        assert_eq!(result.into_result().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_item_paths_carry_index() {
        let schema = ArraySchema::new(IntegerSchema::new().positive());
        let errors = schema
            .validate(&[1_i64, -2, -3][..], &Config::default())
            .into_result()
            .unwrap_err();
        let paths: Vec<_> = errors.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["[1]", "[2]"]);
    }

    #[test]
    fn test_fail_fast_stops_at_first_item() {
        let schema = ArraySchema::new(IntegerSchema::new().positive());
        let errors = schema
            .validate(&[-1_i64, -2][..], &Config::fail_fast())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_length_and_items_accumulate() {
        let schema = ArraySchema::new(IntegerSchema::new().positive()).min_len(3);
        let errors = schema
            .validate(&[0_i64][..], &Config::default())
            .into_result()
            .unwrap_err();
        let ids: Vec<_> = errors.iter().map(|m| m.constraint_id.as_str()).collect();
        assert_eq!(ids, vec!["min_length", "positive"]);
    }

    #[test]
    fn test_partial_items_keep_value() {
        let schema = ArraySchema::new(IntegerSchema::new().positive());
        let session = Session::new(&Config::default());
        let outcome = schema.validate_with(&[5_i64, -5][..], &session.env());
        assert_eq!(outcome.value(), Some(&vec![5, -5]));
    }
}
