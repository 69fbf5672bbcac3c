//! Validation configuration: mode, clock, and logging.
//!
//! A [`Config`] is supplied to every top-level validation call. It selects
//! fail-fast or collect-all accumulation, provides the clock used by temporal
//! checks, and optionally receives a [`LogEvent`] for every constraint
//! evaluated.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use parking_lot::Mutex;

use crate::error::Arg;

/// A source of the current time.
///
/// Inject a [`FixedClock`] in tests to make temporal checks deterministic.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Time types that can be read from a [`Clock`].
///
/// Only types implementing this trait can be used with temporal validators,
/// so asking for an unsupported time type is rejected when the validator is
/// defined rather than when it runs.
pub trait Temporal: Sized {
    /// Reads the current value of this type from `clock`.
    fn now_from(clock: &dyn Clock) -> Self;
}

impl Temporal for DateTime<Utc> {
    fn now_from(clock: &dyn Clock) -> Self {
        clock.now()
    }
}

impl Temporal for NaiveDateTime {
    fn now_from(clock: &dyn Clock) -> Self {
        clock.now().naive_utc()
    }
}

impl Temporal for NaiveDate {
    fn now_from(clock: &dyn Clock) -> Self {
        clock.now().date_naive()
    }
}

impl Temporal for NaiveTime {
    fn now_from(clock: &dyn Clock) -> Self {
        clock.now().time()
    }
}

/// Whether a logged constraint passed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Satisfied,
    Violated,
}

/// A record of one constraint evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub kind: EventKind,
    pub constraint_id: String,
    pub root: String,
    pub path: String,
    pub input: String,
    /// Template arguments of the violation message; empty when satisfied.
    pub args: Vec<Arg>,
}

/// Callback receiving every [`LogEvent`].
pub type Logger = Arc<dyn Fn(&LogEvent) + Send + Sync>;

/// An in-memory, thread-safe event recorder.
///
/// # Example
///
/// ```rust
/// use inquest::{Config, EventLog, Schema, ValidatorExt};
///
/// let log = EventLog::new();
/// let config = Config::default().with_logger(log.logger());
///
/// let _ = Schema::string().min_len(3).validate("ab", &config);
/// assert_eq!(log.events().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a logger callback that appends to this log.
    pub fn logger(&self) -> Logger {
        let events = Arc::clone(&self.events);
        Arc::new(move |event: &LogEvent| events.lock().push(event.clone()))
    }

    /// Returns a snapshot of the recorded events.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    /// Removes all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog")
            .field("events", &self.events.lock().len())
            .finish()
    }
}

/// Settings for a validation call.
///
/// The default configuration collects every violation, reads the system
/// clock, and logs nothing beyond `tracing` events.
///
/// # Example
///
/// ```rust
/// use inquest::Config;
///
/// let config = Config::fail_fast();
/// assert!(config.is_fail_fast());
///
/// let config = Config::default();
/// assert!(!config.is_fail_fast());
/// ```
#[derive(Clone)]
pub struct Config {
    fail_fast: bool,
    clock: Arc<dyn Clock>,
    logger: Option<Logger>,
}

impl Config {
    /// Creates a collect-all configuration.
    pub fn collect_all() -> Self {
        Self::default()
    }

    /// Creates a fail-fast configuration.
    pub fn fail_fast() -> Self {
        Self::default().with_fail_fast(true)
    }

    /// Sets the accumulation mode.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Replaces the clock used by temporal checks.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Installs a callback receiving every constraint evaluation.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Returns true if validation stops at the first violation in each scope.
    pub fn is_fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Returns the configured clock.
    pub fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    /// Returns the configured logger, if any.
    pub fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fail_fast: false,
            clock: Arc::new(SystemClock),
            logger: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("fail_fast", &self.fail_fast)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}
