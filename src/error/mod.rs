//! Messages, catalogs, and error types for validation failures.
//!
//! Validation failures are data: each one is a [`Message`] stamped with the
//! constraint, root, path, and input that produced it. The types here turn
//! those messages into text and, when asked, into a Rust error.

mod catalog;
mod failure;
mod message;

pub use catalog::{Catalog, DefaultCatalog, MessageCatalog};
pub use failure::{ConstructionError, ValidationFailed};
pub use message::{Arg, Message, MessageKind, Messages};
