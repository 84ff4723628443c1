//! Error types for HOCON emission, traversal, and value binding.
//!
//! Three families of failures show up in this crate:
//!
//! - **Usage errors** ([`Error::InvalidState`]): the token-writing API was
//!   called in a state where the call is illegal (a value where a field name
//!   is required, an end marker without a matching start). These indicate a
//!   caller bug and are never retried.
//! - **Shape errors** ([`Error::UnexpectedShape`]): the token shape of a node
//!   is incompatible with the requested operation, reported with the dotted
//!   key path of the offending node.
//! - **Conversion errors** ([`Error::Conversion`]): a single entry could not
//!   be converted to the target element type during sparse-index
//!   reconciliation. The whole reconciliation aborts; no partial result is
//!   returned.
//!
//! ## Examples
//!
//! ```rust
//! use serde_hocon::{Emitter, EmitOptions};
//!
//! let mut emitter = Emitter::new(EmitOptions::default());
//! emitter.write_start_object().unwrap();
//! // Writing a value where a field name is expected is a usage error.
//! assert!(emitter.write_bool(true).is_err());
//! ```

use std::fmt;
use thiserror::Error;

/// All errors produced by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The token-writing or token-reading API was used in an illegal state.
    ///
    /// This signals a caller bug, not bad data; it is not recoverable.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A node's shape does not match what the operation requires.
    #[error("unexpected shape at `{path}`: expected {expected}, found {found}")]
    UnexpectedShape {
        path: String,
        expected: String,
        found: String,
    },

    /// An entry could not be converted to the target element type.
    ///
    /// Raised during sparse-index reconciliation; `key` is the source object
    /// key of the offending entry.
    #[error("cannot convert entry `{key}`: {msg}")]
    Conversion { key: String, msg: String },

    /// A null element was encountered while the null policy is
    /// [`NullPolicy::Fail`](crate::NullPolicy::Fail).
    #[error("null value not allowed for element at index {index}")]
    NullElement { index: u32 },

    /// IO error while writing output.
    #[error("IO error: {0}")]
    Io(String),

    /// Generic message, used by serde's `custom` hooks.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a usage error describing an illegal API call.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Error::InvalidState(msg.into())
    }

    /// Creates a shape error with the dotted path of the offending node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_hocon::Error;
    ///
    /// let err = Error::unexpected_shape("server.ports", "array", "string");
    /// assert!(err.to_string().contains("server.ports"));
    /// ```
    pub fn unexpected_shape(path: &str, expected: &str, found: &str) -> Self {
        Error::UnexpectedShape {
            path: path.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a conversion error naming the source key of the bad entry.
    pub fn conversion(key: &str, msg: impl fmt::Display) -> Self {
        Error::Conversion {
            key: key.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an I/O error for writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
