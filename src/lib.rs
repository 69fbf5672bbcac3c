//! # Inquest
//!
//! A composable validation engine for typed Rust values.
//!
//! ## Overview
//!
//! Validators are small values combined into larger ones: leaves check a
//! single value, combinators (`and`, `or`, `then`, `map`) compose them,
//! [`ObjectSchema`] walks the fields of a struct, and [`Factory`] validates
//! constructor arguments before building a value. Every failure is reported
//! as a [`Message`] stamped with the violated constraint, the root type, the
//! path to the offending value, and the value itself.
//!
//! One [`Config`] switch selects the accumulation mode. In collect-all mode
//! (the default) every violation is reported; in fail-fast mode each scope
//! stops at its first violation. Both modes run through the same
//! accumulation scopes ([`accumulate`]), so validators never branch on the
//! mode themselves.
//!
//! ## Core Types
//!
//! - [`Validator`] / [`ValidatorExt`]: the validator trait and its entry points
//! - [`Outcome`]: success, failure, or a value with violations
//! - [`Message`] / [`Messages`]: structured failures with provenance
//! - [`Path`]: where in the value a failure occurred, with cycle tracking
//! - [`Schema`]: entry point for creating validators
//!
//! ## Example
//!
//! ```rust
//! use inquest::{Config, Schema, ValidatorExt};
//!
//! #[derive(Debug)]
//! struct Signup {
//!     username: String,
//!     age: i64,
//! }
//!
//! let schema = Schema::object::<Signup>()
//!     .field("username", |s| &s.username, Schema::string().min_len(3))
//!     .field("age", |s| &s.age, Schema::integer().min(13));
//!
//! let signup = Signup { username: "al".into(), age: 9 };
//!
//! // collect-all reports both problems
//! let errors = schema.validate(&signup, &Config::default()).into_result().unwrap_err();
//! assert_eq!(errors.len(), 2);
//!
//! // fail-fast stops at the first
//! let errors = schema.validate(&signup, &Config::fail_fast()).into_result().unwrap_err();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors.first().path, "username");
//! ```

pub mod config;
pub mod constraint;
pub mod error;
pub mod outcome;
pub mod path;
pub mod schema;
pub mod scope;
pub mod validation;

pub use config::{
    Clock, Config, EventKind, EventLog, FixedClock, LogEvent, Logger, SystemClock, Temporal,
};
pub use constraint::{
    apply, ensure, predicate, violation, Check, Constraint, ConstraintResult, Predicate,
};
pub use error::{
    Arg, Catalog, ConstructionError, DefaultCatalog, Message, MessageCatalog, MessageKind,
    Messages, ValidationFailed,
};
pub use outcome::Outcome;
pub use path::{Identity, Path};
pub use schema::{
    and, map, or, param, then, validator_fn, And, ArraySchema, BoxedValidator, Factory,
    FnValidator, IntegerSchema, Map, MapSame, ObjectSchema, Optional, Or, Param, Params,
    ParseInt, Schema, StringSchema, TemporalSchema, Then, Validator, ValidatorExt,
};
pub use scope::{accumulate, settle, Escape, ScopeToken};
pub use validation::{Env, Session};

/// The two-state result returned by top-level validation calls.
pub type ValidationResult<T> = stillwater::Validation<T, Messages>;
