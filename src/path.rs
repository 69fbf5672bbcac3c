//! Identity-aware paths for locating values in nested object graphs.
//!
//! This module provides [`Path`], an immutable chain of named steps from the
//! validation root to the value currently being checked, and [`Identity`], the
//! pointer-identity token used to detect cycles while descending.

use std::fmt::{self, Display};
use std::sync::Arc;

/// Pointer identity of a value, used for cycle detection.
///
/// Two identities are equal when they were taken from the same address, not
/// when the values compare equal. Identity is only meaningful for heap-resident,
/// reference-like nodes such as the payload of an `Rc`, `Arc` or `Box`. Taking
/// the identity of a stack temporary or a zero-sized value yields a token that
/// says nothing about the object graph.
///
/// # Example
///
/// ```rust
/// use inquest::Identity;
/// use std::rc::Rc;
///
/// let a = Rc::new(String::from("node"));
/// let b = Rc::clone(&a);
/// let c = Rc::new(String::from("node"));
///
/// assert_eq!(Identity::of(&*a), Identity::of(&*b));
/// assert_ne!(Identity::of(&*a), Identity::of(&*c));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    address: usize,
    type_name: &'static str,
}

impl Identity {
    /// Returns the identity of the value behind `value`.
    ///
    /// The type is part of the identity, so a struct and its first field
    /// are told apart even when they share an address.
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Self {
            address: value as *const T as *const () as usize,
            type_name: std::any::type_name::<T>(),
        }
    }
}

#[derive(Debug)]
struct Node {
    segment: String,
    identity: Option<Identity>,
    parent: Option<Path>,
}

/// A path from the validation root to the current value.
///
/// Each `Path` is an immutable node holding a segment name, the identity of
/// the object bound at that step (if any), and its parent. Building a longer
/// path always creates a new node; existing paths are never modified, so the
/// chain doubles as the stack of objects visited on the way down.
///
/// # Example
///
/// ```rust
/// use inquest::Path;
///
/// let path = Path::root()
///     .push_field("users")
///     .push_index(0)
///     .push_field("email");
///
/// assert_eq!(path.full_name(), "users[0].email");
/// assert_eq!(path.depth(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Path {
    node: Arc<Node>,
}

impl Path {
    /// Creates the root path: an empty segment with no parent and nothing bound.
    pub fn root() -> Self {
        Self {
            node: Arc::new(Node {
                segment: String::new(),
                identity: None,
                parent: None,
            }),
        }
    }

    /// Returns a copy of this node with `identity` bound to it.
    ///
    /// Used to anchor the root object of a validation so that a cycle leading
    /// back to it is recognised.
    pub fn with_identity(&self, identity: Identity) -> Self {
        Self {
            node: Arc::new(Node {
                segment: self.node.segment.clone(),
                identity: Some(identity),
                parent: self.node.parent.clone(),
            }),
        }
    }

    /// Returns a new child path with the given segment and optional bound identity.
    pub fn push(&self, name: impl Into<String>, identity: Option<Identity>) -> Self {
        Self {
            node: Arc::new(Node {
                segment: name.into(),
                identity,
                parent: Some(self.clone()),
            }),
        }
    }

    /// Returns a new child path for a named field with nothing bound.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        self.push(name, None)
    }

    /// Returns a sibling node whose segment name is extended by `suffix`.
    ///
    /// The new node keeps the same parent and bound identity, so
    /// `users` becomes `users[0]` rather than `users.[0]`.
    pub fn append_to_segment(&self, suffix: &str) -> Self {
        let mut segment = String::with_capacity(self.node.segment.len() + suffix.len());
        segment.push_str(&self.node.segment);
        segment.push_str(suffix);
        Self {
            node: Arc::new(Node {
                segment,
                identity: self.node.identity,
                parent: self.node.parent.clone(),
            }),
        }
    }

    /// Appends an `[index]` suffix to the current segment.
    pub fn push_index(&self, index: usize) -> Self {
        self.append_to_segment(&format!("[{}]", index))
    }

    /// Returns the dot-joined segment names from the top of the chain down.
    ///
    /// Empty segments (the root) are skipped, so the root path renders as `""`.
    pub fn full_name(&self) -> String {
        let mut segments: Vec<&str> = self
            .ancestors()
            .map(|path| path.node.segment.as_str())
            .filter(|segment| !segment.is_empty())
            .collect();
        segments.reverse();
        segments.join(".")
    }

    /// Returns true if `identity` is bound anywhere on this path, including here.
    pub fn contains_identity(&self, identity: Identity) -> bool {
        self.ancestors()
            .any(|path| path.node.identity == Some(identity))
    }

    /// Returns true if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    /// Returns the number of steps below the root.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// Returns the segment name of this node.
    pub fn segment(&self) -> &str {
        &self.node.segment
    }

    /// Returns the identity bound at this node, if any.
    pub fn identity(&self) -> Option<Identity> {
        self.node.identity
    }

    /// Returns the parent path, or `None` at the root.
    pub fn parent(&self) -> Option<&Path> {
        self.node.parent.as_ref()
    }

    fn ancestors(&self) -> impl Iterator<Item = &Path> {
        std::iter::successors(Some(self), |path| path.node.parent.as_ref())
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::root()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
