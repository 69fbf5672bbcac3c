//! The environment threaded through every validator call.
//!
//! This module provides [`Session`], which owns the per-call state of a
//! top-level validation, and [`Env`], the cheap view of that state passed
//! explicitly to every validator, combinator, and constraint step.

use std::cell::{Cell, OnceCell};

use crate::config::{Clock, Config};
use crate::error::Messages;
use crate::outcome::Outcome;
use crate::path::{Identity, Path};
use crate::scope::{Escape, ScopeToken, Sink};

/// State owned by one top-level validation call.
///
/// A session holds the configuration, the root label (registered once by the
/// outermost schema or factory), and the counter that hands out scope tokens.
/// Sessions are never shared between validation calls.
///
/// # Example
///
/// ```rust
/// use inquest::{Config, Schema, Session, Validator};
///
/// let session = Session::new(&Config::default());
/// let outcome = Schema::string().min_len(1).validate_with("hi", &session.env());
/// assert!(outcome.is_success());
/// ```
#[derive(Debug)]
pub struct Session {
    config: Config,
    root: OnceCell<String>,
    next_token: Cell<u64>,
}

impl Session {
    /// Creates a fresh session for one validation call.
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            root: OnceCell::new(),
            next_token: Cell::new(1),
        }
    }

    /// Returns the environment at the root path with no scope open.
    pub fn env(&self) -> Env<'_> {
        Env {
            session: self,
            path: Path::root(),
            sink: None,
        }
    }

    /// Returns the configuration of this call.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the registered root label, if any.
    pub fn root_label(&self) -> Option<&str> {
        self.root.get().map(String::as_str)
    }

    pub(crate) fn next_token(&self) -> ScopeToken {
        let token = self.next_token.get();
        self.next_token.set(token + 1);
        ScopeToken::new(token)
    }
}

/// The environment of a single validator invocation.
///
/// `Env` carries the session, the current [`Path`], and the accumulation sink
/// of the innermost open scope. Deriving a child environment (for a field, an
/// index, or a new scope) is cheap and never affects the parent.
#[derive(Debug, Clone)]
pub struct Env<'a> {
    session: &'a Session,
    path: Path,
    sink: Option<&'a Sink>,
}

impl<'a> Env<'a> {
    /// Returns the configuration of this call.
    pub fn config(&self) -> &Config {
        &self.session.config
    }

    /// Returns true if violations end the current scope immediately.
    pub fn is_fail_fast(&self) -> bool {
        self.session.config.is_fail_fast()
    }

    /// Returns the configured clock.
    pub fn clock(&self) -> &dyn Clock {
        self.session.config.clock()
    }

    /// Returns the current path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the root label, or `""` when none has been registered.
    pub fn root_label(&self) -> &str {
        self.session.root_label().unwrap_or("")
    }

    /// Registers the root label unless one is already set.
    ///
    /// Returns true if this call set the label.
    pub fn register_root(&self, label: &str) -> bool {
        self.session.root.set(label.to_string()).is_ok()
    }

    /// Returns an environment at `path`, keeping the current scope.
    pub fn at(&self, path: Path) -> Env<'a> {
        Env {
            session: self.session,
            path,
            sink: self.sink,
        }
    }

    /// Returns an environment one field deeper, with nothing bound.
    pub fn push_field(&self, name: impl Into<String>) -> Env<'a> {
        self.at(self.path.push_field(name))
    }

    /// Returns an environment one field deeper with `identity` bound.
    pub fn push_bound(&self, name: impl Into<String>, identity: Identity) -> Env<'a> {
        self.at(self.path.push(name, Some(identity)))
    }

    /// Returns an environment whose current segment carries an `[index]` suffix.
    pub fn push_index(&self, index: usize) -> Env<'a> {
        self.at(self.path.push_index(index))
    }

    /// Returns an environment whose current node binds `identity`.
    pub fn anchored(&self, identity: Identity) -> Env<'a> {
        self.at(self.path.with_identity(identity))
    }

    /// Feeds messages to the innermost open scope.
    ///
    /// In collect-all mode the messages are buffered and `Ok(())` is returned.
    /// In fail-fast mode the scope's escape is returned and should be
    /// propagated with `?`. With no scope open the call escapes immediately.
    pub fn report(&self, messages: Messages) -> Result<(), Escape> {
        match self.sink {
            Some(sink) => sink.report(messages),
            None => Err(Escape::unscoped(messages)),
        }
    }

    /// Feeds the messages of a nested outcome to the current scope and
    /// returns its value, if one is available.
    pub fn absorb<T>(&self, outcome: Outcome<T>) -> Result<Option<T>, Escape> {
        let (value, messages) = outcome.into_parts();
        if let Some(messages) = messages {
            self.report(messages)?;
        }
        Ok(value)
    }

    pub(crate) fn session(&self) -> &'a Session {
        self.session
    }

    pub(crate) fn with_sink<'b>(&self, sink: &'b Sink) -> Env<'b>
    where
        'a: 'b,
    {
        Env {
            session: self.session,
            path: self.path.clone(),
            sink: Some(sink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Message;

    #[test]
    fn test_root_label_first_writer_wins() {
        let session = Session::new(&Config::default());
        let env = session.env();
        assert_eq!(env.root_label(), "");
        assert!(env.register_root("Order"));
        assert!(!env.push_field("line").register_root("Line"));
        assert_eq!(env.root_label(), "Order");
        assert_eq!(session.root_label(), Some("Order"));
    }

    #[test]
    fn test_child_envs_do_not_change_parent_path() {
        let session = Session::new(&Config::default());
        let env = session.env();
        let child = env.push_field("items").push_index(2).push_field("sku");
        assert_eq!(child.path().full_name(), "items[2].sku");
        assert!(env.path().is_root());
    }

    #[test]
    fn test_tokens_are_unique() {
        let session = Session::new(&Config::default());
        let a = session.next_token();
        let b = session.next_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_report_without_scope_escapes() {
        let session = Session::new(&Config::default());
        let result = session.env().report(Messages::single(Message::text("x")));
        assert!(result.is_err());
    }
}
