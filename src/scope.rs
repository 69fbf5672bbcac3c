//! Accumulation scopes: fail-fast and collect-all in one mechanism.
//!
//! [`accumulate`] opens a scope with a fresh sink and runs a block inside it.
//! Every violation reported while the block runs lands in the sink's buffer.
//! In collect-all mode the block keeps running; in fail-fast mode the report
//! returns an [`Escape`] carrying the scope's token, which the block
//! propagates with `?`. Only the scope owning that token stops the escape;
//! every other scope passes it through untouched.
//!
//! # Example
//!
//! ```rust
//! use inquest::{accumulate, Config, Message, Messages, Outcome, Session};
//!
//! let session = Session::new(&Config::default());
//! let outcome = accumulate(&session.env(), |env| {
//!     env.report(Messages::single(Message::text("first")))?;
//!     env.report(Messages::single(Message::text("second")))?;
//!     Ok(42)
//! })
//! .unwrap();
//!
//! // collect-all keeps the value and both messages
//! assert!(matches!(outcome, Outcome::Partial(42, ref m) if m.len() == 2));
//! ```

use std::cell::RefCell;

use crate::error::{Message, Messages};
use crate::outcome::Outcome;
use crate::validation::Env;

/// Identifies one scope invocation within a validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeToken(u64);

impl ScopeToken {
    /// Token used when a report is made with no scope open.
    const UNSCOPED: ScopeToken = ScopeToken(0);

    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

/// The signal that ends a fail-fast scope.
///
/// An escape carries the token of the scope that raised it and the messages
/// whose report triggered it.
#[derive(Debug, Clone)]
pub struct Escape {
    token: ScopeToken,
    messages: Messages,
}

impl Escape {
    pub(crate) fn unscoped(messages: Messages) -> Self {
        Self {
            token: ScopeToken::UNSCOPED,
            messages,
        }
    }

    /// Returns the token of the scope that raised this escape.
    pub fn token(&self) -> ScopeToken {
        self.token
    }

    /// Returns the messages that triggered this escape.
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Consumes the escape, returning its messages.
    pub fn into_messages(self) -> Messages {
        self.messages
    }
}

/// The buffer behind one open scope.
#[derive(Debug)]
pub(crate) struct Sink {
    token: ScopeToken,
    fail_fast: bool,
    buffer: RefCell<Vec<Message>>,
}

impl Sink {
    fn new(token: ScopeToken, fail_fast: bool) -> Self {
        Self {
            token,
            fail_fast,
            buffer: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn report(&self, messages: Messages) -> Result<(), Escape> {
        if self.fail_fast {
            self.buffer.borrow_mut().extend(messages.iter().cloned());
            Err(Escape {
                token: self.token,
                messages,
            })
        } else {
            self.buffer.borrow_mut().extend(messages);
            Ok(())
        }
    }

    fn take(&self) -> Option<Messages> {
        Messages::try_from_vec(self.buffer.take())
    }
}

/// Runs `block` inside a fresh accumulation scope.
///
/// - The block completes and nothing was reported: `Ok(Success(value))`.
/// - The block completes after reports: `Ok(Partial(value, messages))`.
/// - The block escapes with this scope's token: `Ok(Failure(messages))`.
/// - The block escapes with another scope's token: `Err(escape)`, unchanged.
///
/// The block receives a child environment whose sink is this scope's; reports
/// made through an outer environment reach the outer scope instead.
pub fn accumulate<T, F>(env: &Env<'_>, block: F) -> Result<Outcome<T>, Escape>
where
    F: FnOnce(&Env<'_>) -> Result<T, Escape>,
{
    let sink = Sink::new(env.session().next_token(), env.is_fail_fast());
    let result = block(&env.with_sink(&sink));

    match result {
        Ok(value) => Ok(match sink.take() {
            None => Outcome::Success(value),
            Some(messages) => Outcome::Partial(value, messages),
        }),
        Err(escape) if escape.token == sink.token => {
            Ok(Outcome::Failure(sink.take().unwrap_or(escape.messages)))
        }
        Err(escape) => Err(escape),
    }
}

/// Resolves the result of [`accumulate`] at a validator boundary.
///
/// An escape that reaches a validator boundary was raised through an
/// environment the validator does not own; its messages become a `Failure`
/// so they still reach the caller.
pub fn settle<T>(result: Result<Outcome<T>, Escape>) -> Outcome<T> {
    result.unwrap_or_else(|escape| {
        tracing::warn!(
            target: "inquest",
            token = ?escape.token,
            "escape crossed a validator boundary"
        );
        Outcome::Failure(escape.messages)
    })
}
