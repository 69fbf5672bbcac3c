//! String validation.
//!
//! This module provides [`StringSchema`] for validating string values with
//! constraints like minimum/maximum length, blankness, and regex patterns.

use regex::Regex;

use crate::constraint::{apply, Constraint, ConstraintResult};
use crate::error::Message;
use crate::outcome::Outcome;
use crate::scope::{accumulate, settle};
use crate::validation::Env;

use super::traits::Validator;

#[derive(Clone)]
enum StringRule {
    MinLength(usize),
    MaxLength(usize),
    ExactLength(usize),
    NotBlank,
    Pattern { regex: Regex, source: String },
}

/// A constraint applied to string values.
#[derive(Clone)]
struct StringConstraint {
    rule: StringRule,
    message: Option<String>,
}

impl StringConstraint {
    fn new(rule: StringRule) -> Self {
        Self {
            rule,
            message: None,
        }
    }

    fn violation(&self, template: impl FnOnce() -> Message) -> Message {
        match &self.message {
            Some(text) => Message::text(text.clone()),
            None => template(),
        }
    }
}

impl Constraint for StringConstraint {
    type Input = str;

    fn id(&self) -> &str {
        match self.rule {
            StringRule::MinLength(_) => "min_length",
            StringRule::MaxLength(_) => "max_length",
            StringRule::ExactLength(_) => "exact_length",
            StringRule::NotBlank => "not_blank",
            StringRule::Pattern { .. } => "pattern",
        }
    }

    fn evaluate(&self, value: &str, _env: &Env<'_>) -> ConstraintResult {
        match &self.rule {
            StringRule::MinLength(min) => {
                let len = value.chars().count();
                ConstraintResult::check(len >= *min, || {
                    self.violation(|| {
                        Message::template("string.min_length")
                            .with_arg(*min)
                            .with_arg(len)
                    })
                })
            }
            StringRule::MaxLength(max) => {
                let len = value.chars().count();
                ConstraintResult::check(len <= *max, || {
                    self.violation(|| {
                        Message::template("string.max_length")
                            .with_arg(*max)
                            .with_arg(len)
                    })
                })
            }
            StringRule::ExactLength(exact) => {
                let len = value.chars().count();
                ConstraintResult::check(len == *exact, || {
                    self.violation(|| {
                        Message::template("string.exact_length")
                            .with_arg(*exact)
                            .with_arg(len)
                    })
                })
            }
            StringRule::NotBlank => ConstraintResult::check(!value.trim().is_empty(), || {
                self.violation(|| Message::template("string.not_blank"))
            }),
            StringRule::Pattern { regex, source } => {
                ConstraintResult::check(regex.is_match(value), || {
                    self.violation(|| Message::template("string.pattern").with_arg(source.as_str()))
                })
            }
        }
    }
}

/// A validator for string values.
///
/// Every constraint runs in one scope: in collect-all mode all violations
/// are reported, in fail-fast mode only the first. Lengths count Unicode
/// scalar values.
///
/// # Example
///
/// ```rust
/// use inquest::{Config, Schema, ValidatorExt};
///
/// let schema = Schema::string()
///     .min_len(3)
///     .max_len(20)
///     .pattern(r"^[a-z]+$")
///     .unwrap();
///
/// // reports both: too short and pattern mismatch
/// let result = schema.validate("AB", &Config::default());
/// assert_eq!(result.into_result().unwrap_err().len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires at least `min` characters.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(StringConstraint::new(StringRule::MinLength(min)));
        self
    }

    /// Requires at most `max` characters.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(StringConstraint::new(StringRule::MaxLength(max)));
        self
    }

    /// Requires exactly `len` characters.
    pub fn exact_len(mut self, len: usize) -> Self {
        self.constraints
            .push(StringConstraint::new(StringRule::ExactLength(len)));
        self
    }

    /// Requires at least one non-whitespace character.
    pub fn not_blank(mut self) -> Self {
        self.constraints
            .push(StringConstraint::new(StringRule::NotBlank));
        self
    }

    /// Requires a match of the regex `pattern`.
    ///
    /// Returns an error if the pattern does not compile.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Config, Schema, ValidatorExt};
    ///
    /// let digits = Schema::string().pattern(r"^\d+$").unwrap();
    /// assert!(digits.validate("12345", &Config::default()).is_success());
    /// assert!(digits.validate("abc", &Config::default()).is_failure());
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::new(StringRule::Pattern {
            regex,
            source: pattern.to_string(),
        }));
        Ok(self)
    }

    /// Replaces the message of the most recently added constraint.
    ///
    /// Has no effect when no constraint has been added yet.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Config, Schema, ValidatorExt};
    ///
    /// let schema = Schema::string()
    ///     .min_len(5)
    ///     .error("username must be at least 5 characters");
    ///
    /// let errors = schema.validate("hi", &Config::default()).into_result().unwrap_err();
    /// assert_eq!(
    ///     errors.first().to_string(),
    ///     "(root): username must be at least 5 characters (got: \"hi\")"
    /// );
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            last.message = Some(message.into());
        }
        self
    }
}

impl Validator for StringSchema {
    type Input = str;
    type Output = String;

    fn validate_with(&self, input: &str, env: &Env<'_>) -> Outcome<String> {
        settle(accumulate(env, |env| {
            for constraint in &self.constraints {
                apply(constraint, input, env)?;
            }
            Ok(input.to_string())
        }))
    }
}
