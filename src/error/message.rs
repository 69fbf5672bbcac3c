//! Structured validation messages.
//!
//! This module provides [`Message`] for single validation failures and
//! [`Messages`] for accumulating several of them. Message text is deferred:
//! templated messages are resolved against a [`Catalog`] only when rendered.

use std::error::Error;
use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::Value;
use stillwater::prelude::*;

use super::catalog::{substitute, Catalog, DefaultCatalog};

/// An argument of a templated message.
///
/// Arguments are either plain JSON values or whole messages, so templates can
/// embed other failures and form trees.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A scalar or structured value.
    Value(Value),
    /// A nested message, rendered with the same catalog as its parent.
    Message(Box<Message>),
}

impl Arg {
    fn render(&self, catalog: &dyn Catalog) -> String {
        match self {
            Arg::Value(Value::String(s)) => s.clone(),
            Arg::Value(value) => value.to_string(),
            Arg::Message(message) => message.resolved_text(catalog),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<Message> for Arg {
    fn from(message: Message) -> Self {
        Arg::Message(Box::new(message))
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Value(Value::String(value))
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Value(Value::from(value))
    }
}

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        Arg::Value(Value::from(value))
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Value(Value::Bool(value))
    }
}

/// What a message says, independent of where it was raised.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    /// Literal text, used as-is in every locale.
    Text(String),
    /// A catalog key plus positional arguments.
    Template { key: String, args: Vec<Arg> },
    /// Both alternatives of an `or` failed.
    Composite {
        first: Vec<Message>,
        second: Vec<Message>,
    },
}

/// A single validation failure with full provenance.
///
/// A `Message` captures:
/// - **kind**: the text, template, or composite describing the failure
/// - **constraint_id**: the constraint that was violated
/// - **root**: the label of the validated root type
/// - **path**: where in the value the failure occurred
/// - **input**: the offending value (debug-rendered)
/// - **cause**: the underlying error, for construction failures
///
/// Constraints produce unstamped messages; the constraint step fills in the
/// provenance at the point of violation.
///
/// # Example
///
/// ```rust
/// use inquest::{Message, DefaultCatalog};
///
/// let message = Message::template("string.min_length")
///     .with_arg(3_usize)
///     .with_arg(2_usize);
///
/// assert_eq!(
///     message.resolved_text(&DefaultCatalog),
///     "length must be at least 3, got 2"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Message {
    /// What went wrong.
    pub kind: MessageKind,
    /// Identifier of the violated constraint (e.g. `min_length`).
    pub constraint_id: String,
    /// Label of the root type being validated.
    pub root: String,
    /// Dot-joined path to the offending value.
    pub path: String,
    /// Debug rendering of the offending value.
    pub input: Option<String>,
    cause: Option<Arc<dyn Error + Send + Sync>>,
}

impl Message {
    fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            constraint_id: String::new(),
            root: String::new(),
            path: String::new(),
            input: None,
            cause: None,
        }
    }

    /// Creates a message with literal text.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(MessageKind::Text(content.into()))
    }

    /// Creates a templated message with no arguments yet.
    pub fn template(key: impl Into<String>) -> Self {
        Self::new(MessageKind::Template {
            key: key.into(),
            args: Vec::new(),
        })
    }

    /// Creates a composite message from the failures of two alternatives.
    pub fn composite(first: Vec<Message>, second: Vec<Message>) -> Self {
        Self::new(MessageKind::Composite { first, second })
    }

    /// Appends a template argument and returns self for chaining.
    ///
    /// Has no effect on text or composite messages.
    pub fn with_arg(mut self, arg: impl Into<Arg>) -> Self {
        if let MessageKind::Template { args, .. } = &mut self.kind {
            args.push(arg.into());
        }
        self
    }

    /// Sets the constraint id and returns self for chaining.
    pub fn with_constraint(mut self, constraint_id: impl Into<String>) -> Self {
        self.constraint_id = constraint_id.into();
        self
    }

    /// Attaches the error that caused this failure.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub(crate) fn with_shared_cause(mut self, cause: Arc<dyn Error + Send + Sync>) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Fills in provenance at the point of violation.
    pub(crate) fn stamped(
        mut self,
        constraint_id: &str,
        root: &str,
        path: &str,
        input: Option<String>,
    ) -> Self {
        self.constraint_id = constraint_id.to_string();
        self.root = root.to_string();
        self.path = path.to_string();
        self.input = input;
        self
    }

    /// Returns the template key, if this is a templated message.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Template { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Returns the template arguments, or an empty slice for other kinds.
    pub fn args(&self) -> &[Arg] {
        match &self.kind {
            MessageKind::Template { args, .. } => args,
            _ => &[],
        }
    }

    /// Returns true if this message joins two failed alternatives.
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, MessageKind::Composite { .. })
    }

    /// Returns the messages of both branches of a composite, first branch first.
    ///
    /// Non-composite messages have no descendants.
    pub fn descendants(&self) -> Vec<&Message> {
        match &self.kind {
            MessageKind::Composite { first, second } => first.iter().chain(second).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the error that caused this failure, if any.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Renders the message text using `catalog`.
    ///
    /// Unknown template keys render as the key followed by its arguments, so
    /// nothing is silently lost.
    pub fn resolved_text(&self, catalog: &dyn Catalog) -> String {
        match &self.kind {
            MessageKind::Text(content) => content.clone(),
            MessageKind::Template { key, args } => {
                let rendered: Vec<String> = args.iter().map(|a| a.render(catalog)).collect();
                match catalog.pattern(key) {
                    Some(pattern) => substitute(pattern, &rendered),
                    None if rendered.is_empty() => key.clone(),
                    None => format!("{}({})", key, rendered.join(", ")),
                }
            }
            MessageKind::Composite { first, second } => {
                let join = |branch: &[Message]| {
                    branch
                        .iter()
                        .map(|m| m.resolved_text(catalog))
                        .collect::<Vec<_>>()
                        .join("; ")
                };
                let rendered = [join(first), join(second)];
                match catalog.pattern("composite.or") {
                    Some(pattern) => substitute(pattern, &rendered),
                    None => format!("either ({}) or ({})", rendered[0], rendered[1]),
                }
            }
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        let same_cause = match (&self.cause, &other.cause) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.kind == other.kind
            && self.constraint_id == other.constraint_id
            && self.root == other.root
            && self.path == other.path
            && self.input == other.input
            && same_cause
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "(root)"
        } else {
            self.path.as_str()
        };

        write!(f, "{}: {}", path, self.resolved_text(&DefaultCatalog))?;

        if let Some(ref input) = self.input {
            write!(f, " (got: {})", input)?;
        }
        if let Some(ref cause) = self.cause {
            write!(f, " (caused by: {})", cause)?;
        }

        Ok(())
    }
}

impl Error for Message {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Message>();
    assert_sync::<Message>();
};

/// A non-empty collection of validation messages.
///
/// `Messages` wraps a `NonEmptyVec<Message>`: a failure always has at least
/// one message. It implements `Semigroup`, so the failures of independent
/// checks can be combined in order.
///
/// # Example
///
/// ```rust
/// use inquest::{Message, Messages};
/// use stillwater::prelude::*;
///
/// let left = Messages::single(Message::text("name is required"));
/// let right = Messages::single(Message::text("email is invalid"));
///
/// let combined = left.combine(right);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Messages(NonEmptyVec<Message>);

impl Messages {
    /// Creates a collection holding a single message.
    pub fn single(message: Message) -> Self {
        Self(NonEmptyVec::singleton(message))
    }

    /// Creates a collection from a `NonEmptyVec`.
    pub fn from_non_empty(messages: NonEmptyVec<Message>) -> Self {
        Self(messages)
    }

    /// Creates a collection from a vec, or `None` if it is empty.
    pub fn try_from_vec(messages: Vec<Message>) -> Option<Self> {
        NonEmptyVec::from_vec(messages).map(Self)
    }

    /// Creates a collection from a vec that is known to be non-empty.
    ///
    /// # Panics
    ///
    /// Panics if the provided vec is empty.
    pub fn from_vec(messages: Vec<Message>) -> Self {
        Self(NonEmptyVec::from_vec(messages).expect("Messages requires at least one message"))
    }

    /// Returns the number of messages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API consistency.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the messages.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.0.iter()
    }

    /// Returns the first message.
    pub fn first(&self) -> &Message {
        self.0.head()
    }

    /// Returns all messages raised at `path`.
    pub fn at_path(&self, path: &str) -> Vec<&Message> {
        self.0.iter().filter(|m| m.path == path).collect()
    }

    /// Returns all messages raised by the constraint `constraint_id`.
    pub fn with_constraint(&self, constraint_id: &str) -> Vec<&Message> {
        self.0
            .iter()
            .filter(|m| m.constraint_id == constraint_id)
            .collect()
    }

    /// Converts this collection into a `Vec<Message>`.
    pub fn into_vec(self) -> Vec<Message> {
        self.0.into_vec()
    }

    /// Returns a reference to the underlying `NonEmptyVec`.
    pub fn as_non_empty_vec(&self) -> &NonEmptyVec<Message> {
        &self.0
    }
}

impl Semigroup for Messages {
    fn combine(self, other: Self) -> Self {
        Messages(self.0.combine(other.0))
    }
}

impl Display for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} message(s):", self.len())?;
        for (i, message) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, message)?;
        }
        Ok(())
    }
}

impl Error for Messages {}

impl IntoIterator for Messages {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Messages {
    type Item = &'a Message;
    type IntoIter = Box<dyn Iterator<Item = &'a Message> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}
