//! Constraints and the step that applies them.
//!
//! A [`Constraint`] is a single named predicate. [`apply`] evaluates one
//! against an input, stamps any violation with its provenance, logs the
//! evaluation, and reports the violation to the enclosing accumulation scope.
//! Every leaf validator in this crate is a thin wrapper around `apply`.

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::config::{EventKind, LogEvent};
use crate::error::{Message, Messages};
use crate::outcome::Outcome;
use crate::schema::Validator;
use crate::scope::{accumulate, settle, Escape};
use crate::validation::Env;

/// The verdict of a single constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintResult {
    Satisfied,
    /// The constraint failed; the message is stamped by [`apply`].
    Violated(Message),
}

impl ConstraintResult {
    /// Returns `Satisfied` if `ok`, otherwise `Violated` with the lazily built message.
    pub fn check(ok: bool, message: impl FnOnce() -> Message) -> Self {
        if ok {
            ConstraintResult::Satisfied
        } else {
            ConstraintResult::Violated(message())
        }
    }

    /// Returns true for `Satisfied`.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, ConstraintResult::Satisfied)
    }
}

/// A named predicate over an input.
pub trait Constraint {
    /// The type of value checked.
    type Input: ?Sized;

    /// Identifier stamped on violations (e.g. `min_length`).
    fn id(&self) -> &str;

    /// Evaluates the predicate.
    ///
    /// The environment is available for predicates that depend on
    /// configuration, such as the clock.
    fn evaluate(&self, input: &Self::Input, env: &Env<'_>) -> ConstraintResult;
}

impl<C: Constraint + ?Sized> Constraint for Box<C> {
    type Input = C::Input;

    fn id(&self) -> &str {
        (**self).id()
    }

    fn evaluate(&self, input: &Self::Input, env: &Env<'_>) -> ConstraintResult {
        (**self).evaluate(input, env)
    }
}

/// Applies `constraint` to `input` within the current scope.
///
/// On success the evaluation is logged and `Ok(())` returned. On violation
/// the message is stamped with the constraint id, root label, path, and
/// input, logged, and reported to the scope: collect-all continues with
/// `Ok(())`, fail-fast returns the scope's escape.
pub fn apply<C>(constraint: &C, input: &C::Input, env: &Env<'_>) -> Result<(), Escape>
where
    C: Constraint + ?Sized,
    C::Input: Debug,
{
    match constraint.evaluate(input, env) {
        ConstraintResult::Satisfied => {
            tracing::trace!(
                target: "inquest",
                constraint = constraint.id(),
                path = %env.path(),
                "constraint satisfied"
            );
            if let Some(logger) = env.config().logger() {
                logger(&LogEvent {
                    kind: EventKind::Satisfied,
                    constraint_id: constraint.id().to_string(),
                    root: env.root_label().to_string(),
                    path: env.path().full_name(),
                    input: format!("{:?}", input),
                    args: Vec::new(),
                });
            }
            Ok(())
        }
        ConstraintResult::Violated(message) => {
            let message = violation(constraint.id(), message, input, env);
            env.report(Messages::single(message))
        }
    }
}

/// Stamps and logs a violation without reporting it.
///
/// For leaves that cannot produce a value on failure (parsing, for instance)
/// and therefore return a `Failure` outcome directly.
pub fn violation<I>(constraint_id: &str, message: Message, input: &I, env: &Env<'_>) -> Message
where
    I: Debug + ?Sized,
{
    let path = env.path().full_name();
    let message = message.stamped(
        constraint_id,
        env.root_label(),
        &path,
        Some(format!("{:?}", input)),
    );

    tracing::debug!(
        target: "inquest",
        constraint = constraint_id,
        root = env.root_label(),
        path = %path,
        input = message.input.as_deref().unwrap_or_default(),
        "constraint violated"
    );
    if let Some(logger) = env.config().logger() {
        logger(&LogEvent {
            kind: EventKind::Violated,
            constraint_id: message.constraint_id.clone(),
            root: message.root.clone(),
            path: message.path.clone(),
            input: message.input.clone().unwrap_or_default(),
            args: message.args().to_vec(),
        });
    }

    message
}

/// A constraint built from a closure.
///
/// # Example
///
/// ```rust
/// use inquest::{predicate, Check, ConstraintResult, Config, Message, ValidatorExt};
///
/// let even = Check(predicate("even", |n: &i64| {
///     ConstraintResult::check(n % 2 == 0, || Message::text("must be even"))
/// }));
///
/// assert!(even.validate(&4, &Config::default()).is_success());
/// assert!(even.validate(&3, &Config::default()).is_failure());
/// ```
pub struct Predicate<I: ?Sized, F> {
    id: String,
    check: F,
    _input: PhantomData<fn(&I)>,
}

impl<I: ?Sized, F> Constraint for Predicate<I, F>
where
    F: Fn(&I) -> ConstraintResult,
{
    type Input = I;

    fn id(&self) -> &str {
        &self.id
    }

    fn evaluate(&self, input: &I, _env: &Env<'_>) -> ConstraintResult {
        (self.check)(input)
    }
}

/// Creates a constraint from a closure returning a [`ConstraintResult`].
pub fn predicate<I, F>(id: impl Into<String>, check: F) -> Predicate<I, F>
where
    I: ?Sized,
    F: Fn(&I) -> ConstraintResult,
{
    Predicate {
        id: id.into(),
        check,
        _input: PhantomData,
    }
}

/// Creates a constraint from a boolean predicate and a fixed message text.
pub fn ensure<I, P>(
    id: impl Into<String>,
    ok: P,
    message: impl Into<String>,
) -> Predicate<I, impl Fn(&I) -> ConstraintResult + Send + Sync>
where
    I: ?Sized,
    P: Fn(&I) -> bool + Send + Sync,
{
    let message = message.into();
    predicate(id, move |input: &I| {
        ConstraintResult::check(ok(input), || Message::text(message.clone()))
    })
}

/// Lifts a constraint into a validator.
///
/// The validator opens its own scope, applies the constraint, and passes the
/// input through as its owned form.
#[derive(Debug, Clone)]
pub struct Check<C>(pub C);

impl<C> Validator for Check<C>
where
    C: Constraint,
    C::Input: ToOwned + Debug,
{
    type Input = C::Input;
    type Output = <C::Input as ToOwned>::Owned;

    fn validate_with(&self, input: &Self::Input, env: &Env<'_>) -> Outcome<Self::Output> {
        settle(accumulate(env, |env| {
            apply(&self.0, input, env)?;
            Ok(input.to_owned())
        }))
    }
}

impl<C: Constraint> Constraint for Check<C> {
    type Input = C::Input;

    fn id(&self) -> &str {
        self.0.id()
    }

    fn evaluate(&self, input: &Self::Input, env: &Env<'_>) -> ConstraintResult {
        self.0.evaluate(input, env)
    }
}
