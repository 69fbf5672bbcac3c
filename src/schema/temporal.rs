//! Time validation against the configured clock.

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::config::Temporal;
use crate::constraint::{apply, Constraint, ConstraintResult};
use crate::error::Message;
use crate::outcome::Outcome;
use crate::scope::{accumulate, settle};
use crate::validation::Env;

use super::traits::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemporalRule {
    Past,
    Future,
    PastOrPresent,
    FutureOrPresent,
}

impl TemporalRule {
    fn id(self) -> &'static str {
        match self {
            TemporalRule::Past => "past",
            TemporalRule::Future => "future",
            TemporalRule::PastOrPresent => "past_or_present",
            TemporalRule::FutureOrPresent => "future_or_present",
        }
    }

    fn key(self) -> &'static str {
        match self {
            TemporalRule::Past => "temporal.past",
            TemporalRule::Future => "temporal.future",
            TemporalRule::PastOrPresent => "temporal.past_or_present",
            TemporalRule::FutureOrPresent => "temporal.future_or_present",
        }
    }
}

struct TemporalConstraint<T> {
    rule: TemporalRule,
    message: Option<String>,
    _time: PhantomData<fn(&T)>,
}

impl<T: Temporal + Ord> Constraint for TemporalConstraint<T> {
    type Input = T;

    fn id(&self) -> &str {
        self.rule.id()
    }

    fn evaluate(&self, value: &T, env: &Env<'_>) -> ConstraintResult {
        let now = T::now_from(env.clock());
        let ok = match self.rule {
            TemporalRule::Past => *value < now,
            TemporalRule::Future => *value > now,
            TemporalRule::PastOrPresent => *value <= now,
            TemporalRule::FutureOrPresent => *value >= now,
        };
        ConstraintResult::check(ok, || match &self.message {
            Some(text) => Message::text(text.clone()),
            None => Message::template(self.rule.key()),
        })
    }
}

/// A validator for points in time, compared with the configured clock.
///
/// `T` is any [`Temporal`] type: `DateTime<Utc>`, `NaiveDateTime`,
/// `NaiveDate`, or `NaiveTime`. The clock is read once per constraint.
///
/// # Example
///
/// ```rust
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use inquest::{Config, FixedClock, Schema, ValidatorExt};
///
/// let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
/// let config = Config::default().with_clock(clock);
///
/// let birthday = Schema::temporal::<NaiveDate>().past();
/// let date = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
/// assert!(birthday.validate(&date, &config).is_success());
/// ```
pub struct TemporalSchema<T> {
    constraints: Vec<TemporalConstraint<T>>,
}

impl<T> TemporalSchema<T> {
    /// Creates a temporal schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    fn push(mut self, rule: TemporalRule) -> Self {
        self.constraints.push(TemporalConstraint {
            rule,
            message: None,
            _time: PhantomData,
        });
        self
    }

    /// Requires an instant strictly before now.
    pub fn past(self) -> Self {
        self.push(TemporalRule::Past)
    }

    /// Requires an instant strictly after now.
    pub fn future(self) -> Self {
        self.push(TemporalRule::Future)
    }

    /// Requires an instant no later than now.
    pub fn past_or_present(self) -> Self {
        self.push(TemporalRule::PastOrPresent)
    }

    /// Requires an instant no earlier than now.
    pub fn future_or_present(self) -> Self {
        self.push(TemporalRule::FutureOrPresent)
    }

    /// Replaces the message of the most recently added constraint.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            last.message = Some(message.into());
        }
        self
    }
}

impl<T> Default for TemporalSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Validator for TemporalSchema<T>
where
    T: Temporal + Ord + Clone + Debug,
{
    type Input = T;
    type Output = T;

    fn validate_with(&self, input: &T, env: &Env<'_>) -> Outcome<T> {
        settle(accumulate(env, |env| {
            for constraint in &self.constraints {
                apply(constraint, input, env)?;
            }
            Ok(input.clone())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, FixedClock};
    use crate::schema::traits::ValidatorExt;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn config() -> Config {
        Config::default().with_clock(FixedClock(now()))
    }

    #[test]
    fn test_present_is_neither_past_nor_future() {
        let past = TemporalSchema::<DateTime<Utc>>::new().past();
        let future = TemporalSchema::<DateTime<Utc>>::new().future();
        assert!(past.validate(&now(), &config()).is_failure());
        assert!(future.validate(&now(), &config()).is_failure());
    }

    #[test]
    fn test_inclusive_rules_accept_present() {
        let schema = TemporalSchema::<DateTime<Utc>>::new()
            .past_or_present()
            .future_or_present();
        assert!(schema.validate(&now(), &config()).is_success());
    }

    #[test]
    fn test_future_date() {
        let schema = TemporalSchema::<DateTime<Utc>>::new().future();
        let later = now() + Duration::days(1);
        assert!(schema.validate(&later, &config()).is_success());
    }

    #[test]
    fn test_naive_date_uses_clock_date() {
        let schema = TemporalSchema::<NaiveDate>::new().past();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let errors = schema
            .validate(&today, &config())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.first().constraint_id, "past");
        assert_eq!(errors.first().key(), Some("temporal.past"));
    }
}
