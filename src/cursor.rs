//! Cursor-based traversal of a configuration tree.
//!
//! [`TreeCursor`] walks an immutable [`ConfigValue`] tree depth-first and
//! exposes it as a pull-based sequence of [`Token`]s. The traversal state is
//! a stack of frames, one per active nesting level: a root frame that fires
//! exactly once, an array frame per open array, and an object frame per open
//! object. Frames hold iterators borrowed from the tree; parent links are
//! implicit stack positions, so there is no shared ownership anywhere.
//!
//! The cursor never copies values. A single cursor is single-threaded state;
//! run independent cursors for concurrent traversals of the same tree.
//!
//! ## Examples
//!
//! ```rust
//! use serde_hocon::{ConfigObject, ConfigValue, Token, TreeCursor};
//!
//! let mut obj = ConfigObject::new();
//! obj.insert("port".to_string(), ConfigValue::from(8080));
//! let root = ConfigValue::from(obj);
//!
//! let mut cursor = TreeCursor::new(&root);
//! assert_eq!(cursor.next_token(), Some(Token::StartObject));
//! assert_eq!(cursor.next_token(), Some(Token::FieldName("port")));
//! assert_eq!(cursor.next_token(), Some(Token::Int(8080)));
//! assert_eq!(cursor.next_token(), Some(Token::EndObject));
//! assert_eq!(cursor.next_token(), None);
//! ```

use crate::value::{Number, ValueKind};
use crate::{ConfigValue, Token};

/// Maps a tree node to the token announcing it: a scalar token, or the start
/// marker of a composite.
fn token_for(value: &ConfigValue) -> Token<'_> {
    match &value.kind {
        ValueKind::Null => Token::Null,
        ValueKind::Bool(b) => Token::Bool(*b),
        ValueKind::Number(Number::Integer(i)) => Token::Int(*i),
        ValueKind::Number(Number::Float(f)) => Token::Float(*f),
        ValueKind::String(s) => Token::Str(s),
        ValueKind::Array(_) => Token::StartArray,
        ValueKind::Object(_) => Token::StartObject,
    }
}

/// One traversal-stack frame.
enum Frame<'a> {
    /// Wraps the root value; visited exactly once.
    Root { node: &'a ConfigValue, done: bool },
    /// Iterates an array's elements.
    Array {
        iter: std::slice::Iter<'a, ConfigValue>,
        current: Option<&'a ConfigValue>,
    },
    /// Iterates an object's entries with the two-phase name/value flip.
    Object {
        iter: indexmap::map::Iter<'a, String, ConfigValue>,
        entry: Option<(&'a str, &'a ConfigValue)>,
        need_entry: bool,
    },
}

impl<'a> Frame<'a> {
    fn array(value: &'a ConfigValue) -> Self {
        let elements = value.as_array().unwrap_or(&[]);
        Frame::Array {
            iter: elements.iter(),
            current: None,
        }
    }

    fn object(value: &'a ConfigValue) -> Self {
        let entries = value.as_object().expect("object frame over non-object");
        Frame::Object {
            iter: entries.iter(),
            entry: None,
            need_entry: true,
        }
    }

    /// Advances this frame by one token. `None` means the frame (root only)
    /// is exhausted.
    fn advance(&mut self) -> Option<Token<'a>> {
        match self {
            Frame::Root { node, done } => {
                if *done {
                    None
                } else {
                    *done = true;
                    Some(token_for(node))
                }
            }
            Frame::Array { iter, current } => match iter.next() {
                None => {
                    *current = None;
                    Some(Token::EndArray)
                }
                Some(element) => {
                    *current = Some(element);
                    Some(token_for(element))
                }
            },
            Frame::Object {
                iter,
                entry,
                need_entry,
            } => {
                if *need_entry {
                    match iter.next() {
                        None => {
                            *entry = None;
                            Some(Token::EndObject)
                        }
                        Some((key, value)) => {
                            *entry = Some((key.as_str(), value));
                            *need_entry = false;
                            Some(Token::FieldName(key.as_str()))
                        }
                    }
                } else {
                    *need_entry = true;
                    let (_, value) = entry.expect("value phase without a captured entry");
                    Some(token_for(value))
                }
            }
        }
    }

    /// The value this frame is positioned on, if it has captured one.
    fn current_value(&self) -> Option<&'a ConfigValue> {
        match self {
            Frame::Root { node, done } => done.then_some(*node),
            Frame::Array { current, .. } => *current,
            Frame::Object { entry, .. } => entry.map(|(_, value)| value),
        }
    }

    /// The current field name; only object frames ever have one.
    fn current_name(&self) -> Option<&'a str> {
        match self {
            Frame::Object { entry, .. } => entry.map(|(key, _)| key),
            _ => None,
        }
    }
}

/// A pull-based token cursor over a configuration tree.
///
/// Produces the depth-first token sequence of the wrapped value; the
/// sequence is finite and not restartable.
pub struct TreeCursor<'a> {
    stack: Vec<Frame<'a>>,
    current: Option<Token<'a>>,
    closed: bool,
}

impl<'a> TreeCursor<'a> {
    /// Creates a cursor positioned before the first token of `root`.
    pub fn new(root: &'a ConfigValue) -> Self {
        TreeCursor {
            stack: vec![Frame::Root {
                node: root,
                done: false,
            }],
            current: None,
            closed: false,
        }
    }

    /// Advances to the next token.
    ///
    /// Producing `StartObject`/`StartArray` opens a child frame over the
    /// composite just announced; producing the matching end token pops back
    /// to the parent. Returns `None` once the root value is exhausted, after
    /// which the cursor stays closed.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.closed {
            return None;
        }
        let token = match self.stack.last_mut()?.advance() {
            Some(token) => token,
            None => {
                self.closed = true;
                self.current = None;
                return None;
            }
        };
        match token {
            Token::StartObject => {
                let value = self
                    .stack
                    .last()
                    .and_then(Frame::current_value)
                    .expect("StartObject token without a captured composite");
                self.stack.push(Frame::object(value));
            }
            Token::StartArray => {
                let value = self
                    .stack
                    .last()
                    .and_then(Frame::current_value)
                    .expect("StartArray token without a captured composite");
                self.stack.push(Frame::array(value));
            }
            Token::EndObject | Token::EndArray => {
                self.stack.pop();
            }
            _ => {}
        }
        self.current = Some(token);
        Some(token)
    }

    /// Abandons the composite whose start token was just produced.
    ///
    /// Pops exactly one frame and synthesizes the matching end token without
    /// draining the remaining children; O(1) regardless of subtree size. A
    /// no-op when the current token is not a structural start.
    pub fn skip_children(&mut self) {
        match self.current {
            Some(Token::StartObject) => {
                self.stack.pop();
                self.current = Some(Token::EndObject);
            }
            Some(Token::StartArray) => {
                self.stack.pop();
                self.current = Some(Token::EndArray);
            }
            _ => {}
        }
    }

    /// The token the cursor is currently positioned on.
    #[must_use]
    pub fn current_token(&self) -> Option<Token<'a>> {
        self.current
    }

    /// The current field name.
    ///
    /// While positioned on `StartObject`/`StartArray` this reports the
    /// *parent* frame's field name, the name of the composite itself. The
    /// freshly opened child frame has not captured a name yet.
    #[must_use]
    pub fn current_name(&self) -> Option<&'a str> {
        let top = self.stack.len().checked_sub(1)?;
        let slot = if matches!(self.current, Some(Token::StartObject | Token::StartArray)) {
            top.checked_sub(1)?
        } else {
            top
        };
        self.stack.get(slot)?.current_name()
    }

    /// The value the cursor is positioned on.
    ///
    /// `None` only before the first token and after the last; querying a
    /// value in those states is a caller bug on a validated tree.
    #[must_use]
    pub fn current_value(&self) -> Option<&'a ConfigValue> {
        if self.closed {
            return None;
        }
        let top = self.stack.len().checked_sub(1)?;
        let slot = if matches!(self.current, Some(Token::StartObject | Token::StartArray)) {
            // The composite's own frame has no value yet; its parent does.
            top.checked_sub(1)?
        } else {
            top
        };
        self.stack.get(slot)?.current_value()
    }

    /// The origin of the current value, for diagnostics.
    #[must_use]
    pub fn origin(&self) -> Option<&'a crate::Origin> {
        self.current_value().map(ConfigValue::origin)
    }

    /// Dotted key path from the root to the current position.
    ///
    /// Built by walking the frame stack; used only for diagnostics, never
    /// for data identity.
    #[must_use]
    pub fn path(&self) -> String {
        let mut segments: Vec<&str> = Vec::new();
        for frame in &self.stack {
            if let Some(name) = frame.current_name() {
                segments.push(name);
            }
        }
        segments.join(".")
    }

    /// Current structural nesting depth (number of open frames).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<'a> Iterator for TreeCursor<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        self.next_token()
    }
}
