//! The structural token stream shared by the cursor and the emitter.
//!
//! A [`Token`] is one unit of the pull-based sequence a [`TreeCursor`]
//! produces and the push-based sequence an [`Emitter`] consumes: start/end
//! markers for objects and arrays, field names, and typed scalars. The token
//! set is closed and exhaustively matched everywhere, so the type is a plain
//! enum rather than anything extensible.
//!
//! Scalar and name tokens borrow from the underlying tree; a token sequence
//! is finite and cannot be restarted (start a fresh cursor over the same
//! tree instead).
//!
//! [`TreeCursor`]: crate::TreeCursor
//! [`Emitter`]: crate::Emitter

use std::fmt;

/// One token of the structural/value stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token<'a> {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    FieldName(&'a str),
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    Null,
}

impl<'a> Token<'a> {
    /// Returns `true` for `StartObject` and `StartArray`.
    #[inline]
    #[must_use]
    pub const fn is_structural_start(&self) -> bool {
        matches!(self, Token::StartObject | Token::StartArray)
    }

    /// Returns `true` for `EndObject` and `EndArray`.
    #[inline]
    #[must_use]
    pub const fn is_structural_end(&self) -> bool {
        matches!(self, Token::EndObject | Token::EndArray)
    }

    /// Returns `true` for value-carrying tokens (scalars).
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Token::Bool(_) | Token::Int(_) | Token::Float(_) | Token::Str(_) | Token::Null
        )
    }

    /// Short token name for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Token::StartObject => "StartObject",
            Token::EndObject => "EndObject",
            Token::StartArray => "StartArray",
            Token::EndArray => "EndArray",
            Token::FieldName(_) => "FieldName",
            Token::Bool(_) => "Bool",
            Token::Int(_) => "Int",
            Token::Float(_) => "Float",
            Token::Str(_) => "Str",
            Token::Null => "Null",
        }
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::FieldName(name) => write!(f, "FieldName({})", name),
            Token::Bool(b) => write!(f, "Bool({})", b),
            Token::Int(i) => write!(f, "Int({})", i),
            Token::Float(v) => write!(f, "Float({})", v),
            Token::Str(s) => write!(f, "Str({:?})", s),
            other => f.write_str(other.name()),
        }
    }
}
