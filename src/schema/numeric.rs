//! Integer validation and parsing.
//!
//! This module provides [`IntegerSchema`] for range checks on `i64` values
//! and [`ParseInt`] for turning text into an `i64`.

use crate::constraint::{apply, violation, Constraint, ConstraintResult};
use crate::error::{Message, Messages};
use crate::outcome::Outcome;
use crate::scope::{accumulate, settle};
use crate::validation::Env;

use super::traits::Validator;

#[derive(Debug, Clone, Copy)]
enum IntegerRule {
    Min(i64),
    Max(i64),
    Positive,
    NonNegative,
    Negative,
}

#[derive(Debug, Clone)]
struct IntegerConstraint {
    rule: IntegerRule,
    message: Option<String>,
}

impl Constraint for IntegerConstraint {
    type Input = i64;

    fn id(&self) -> &str {
        match self.rule {
            IntegerRule::Min(_) => "min",
            IntegerRule::Max(_) => "max",
            IntegerRule::Positive => "positive",
            IntegerRule::NonNegative => "non_negative",
            IntegerRule::Negative => "negative",
        }
    }

    fn evaluate(&self, value: &i64, _env: &Env<'_>) -> ConstraintResult {
        let value = *value;
        let (ok, template) = match self.rule {
            IntegerRule::Min(min) => (
                value >= min,
                Message::template("integer.min").with_arg(min).with_arg(value),
            ),
            IntegerRule::Max(max) => (
                value <= max,
                Message::template("integer.max").with_arg(max).with_arg(value),
            ),
            IntegerRule::Positive => (
                value > 0,
                Message::template("integer.positive").with_arg(value),
            ),
            IntegerRule::NonNegative => (
                value >= 0,
                Message::template("integer.non_negative").with_arg(value),
            ),
            IntegerRule::Negative => (
                value < 0,
                Message::template("integer.negative").with_arg(value),
            ),
        };
        ConstraintResult::check(ok, || match &self.message {
            Some(text) => Message::text(text.clone()),
            None => template,
        })
    }
}

/// A validator for `i64` values.
///
/// # Example
///
/// ```rust
/// use inquest::{Config, Schema, ValidatorExt};
///
/// let age = Schema::integer().range(0, 150);
/// assert!(age.validate(&42, &Config::default()).is_success());
/// assert!(age.validate(&-1, &Config::default()).is_failure());
/// ```
#[derive(Debug, Clone, Default)]
pub struct IntegerSchema {
    constraints: Vec<IntegerConstraint>,
}

impl IntegerSchema {
    /// Creates a new integer schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, rule: IntegerRule) -> Self {
        self.constraints.push(IntegerConstraint {
            rule,
            message: None,
        });
        self
    }

    /// Requires a value of at least `min`.
    pub fn min(self, min: i64) -> Self {
        self.push(IntegerRule::Min(min))
    }

    /// Requires a value of at most `max`.
    pub fn max(self, max: i64) -> Self {
        self.push(IntegerRule::Max(max))
    }

    /// Requires `min <= value <= max`, checked as two constraints.
    pub fn range(self, min: i64, max: i64) -> Self {
        self.min(min).max(max)
    }

    /// Requires a value greater than zero.
    pub fn positive(self) -> Self {
        self.push(IntegerRule::Positive)
    }

    /// Requires a value of zero or more.
    pub fn non_negative(self) -> Self {
        self.push(IntegerRule::NonNegative)
    }

    /// Requires a value less than zero.
    pub fn negative(self) -> Self {
        self.push(IntegerRule::Negative)
    }

    /// Replaces the message of the most recently added constraint.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            last.message = Some(message.into());
        }
        self
    }
}

impl Validator for IntegerSchema {
    type Input = i64;
    type Output = i64;

    fn validate_with(&self, input: &i64, env: &Env<'_>) -> Outcome<i64> {
        settle(accumulate(env, |env| {
            for constraint in &self.constraints {
                apply(constraint, input, env)?;
            }
            Ok(*input)
        }))
    }
}

/// Parses text into an `i64`.
///
/// Surrounding whitespace is ignored. Unparseable text is a `Failure`
/// because there is no value to carry on with. Chain with
/// [`then`](crate::ValidatorExt::then) to range-check the result.
///
/// # Example
///
/// ```rust
/// use inquest::{Config, Schema, ValidatorExt};
///
/// let age = Schema::parse_int().then(Schema::integer().non_negative());
/// assert_eq!(age.validate(" 36 ", &Config::default()).into_result().unwrap(), 36);
/// assert!(age.validate("thirty", &Config::default()).is_failure());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseInt;

impl Validator for ParseInt {
    type Input = str;
    type Output = i64;

    fn validate_with(&self, input: &str, env: &Env<'_>) -> Outcome<i64> {
        match input.trim().parse::<i64>() {
            Ok(value) => Outcome::Success(value),
            Err(_) => {
                let message = violation(
                    "parse_int",
                    Message::template("parse.integer").with_arg(input),
                    input,
                    env,
                );
                Outcome::Failure(Messages::single(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::schema::traits::ValidatorExt;

    #[test]
    fn test_bounds_are_inclusive() {
        let schema = IntegerSchema::new().range(1, 10);
        assert!(schema.validate(&1, &Config::default()).is_success());
        assert!(schema.validate(&10, &Config::default()).is_success());
        assert!(schema.validate(&11, &Config::default()).is_failure());
    }

    #[test]
    fn test_collect_all_reports_every_rule() {
        let schema = IntegerSchema::new().min(5).positive();
        let errors = schema
            .validate(&-1, &Config::default())
            .into_result()
            .unwrap_err();
        let ids: Vec<_> = errors.iter().map(|m| m.constraint_id.as_str()).collect();
        assert_eq!(ids, vec!["min", "positive"]);
    }

    #[test]
    fn test_custom_message() {
        let errors = IntegerSchema::new()
            .negative()
            .error("must owe money")
            .validate(&3, &Config::default())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.first().to_string(), "(root): must owe money (got: 3)");
    }

    #[test]
    fn test_parse_int_failure_is_stamped() {
        let errors = ParseInt
            .validate("4x", &Config::default())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.first().constraint_id, "parse_int");
        assert_eq!(errors.first().to_string(), "(root): '4x' is not a valid integer (got: \"4x\")");
    }
}
