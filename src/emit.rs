//! Token-to-text emission of HOCON documents.
//!
//! [`Emitter`] is the push-based counterpart of the cursor: it consumes a
//! structural token sequence and renders configuration text. The interesting
//! part is not the characters themselves but the decisions around them:
//! which separator (if any) precedes the next value, whether the root
//! object's braces may be dropped, and whether a string can be written
//! without quotes.
//!
//! ## The two-phase separator protocol
//!
//! Every value write first *verifies* the write against the current write
//! context, which yields a [`SeparatorStatus`]: first entry, after-comma,
//! after-colon, or after-space (between root-level values). The status is
//! cached, then consumed by the same write call to emit the separator text
//! before the value's own content. The split exists because the separator
//! choice for a colon position depends on what is being written next: an
//! object value may drop its colon, a scalar never does.
//!
//! ## Examples
//!
//! ```rust
//! use serde_hocon::{Emitter, EmitOptions};
//!
//! let options = EmitOptions::new()
//!     .with_omit_root_object_brackets(true)
//!     .with_unquote_strings_if_possible(true);
//! let mut emitter = Emitter::new(options);
//! emitter.write_start_object().unwrap();
//! emitter.write_field_name("host").unwrap();
//! emitter.write_str("localhost").unwrap();
//! emitter.write_end_object().unwrap();
//! assert_eq!(emitter.into_inner(), "host:localhost");
//! ```

use crate::{Error, Result, Token};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Configuration for HOCON text output.
///
/// Defaults produce JSON-compatible output: quoted strings, root braces,
/// explicit `:` separators, compact formatting.
#[derive(Clone, Debug)]
pub struct EmitOptions {
    /// Drop the `:`/`=` between a field name and an *object* value
    /// (`foo {…}` instead of `foo: {…}`). Never applies to non-object
    /// values.
    pub omit_object_value_separator: bool,
    /// Drop the braces around the outermost object. Nested objects always
    /// keep theirs.
    pub omit_root_object_brackets: bool,
    /// Write field names and string values unquoted whenever the unquoting
    /// rules permit.
    pub unquote_strings_if_possible: bool,
    /// Separator between a field name and its value: `:` (default) or `=`.
    pub field_value_separator: char,
    /// Separator between consecutive root-level values.
    pub root_value_separator: String,
    /// Pretty-print: objects one entry per line, newline entry separators.
    pub pretty: bool,
    /// Spaces per indentation level in pretty output.
    pub indent: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            omit_object_value_separator: false,
            omit_root_object_brackets: false,
            unquote_strings_if_possible: false,
            field_value_separator: ':',
            root_value_separator: " ".to_string(),
            pretty: false,
            indent: 2,
        }
    }
}

impl EmitOptions {
    /// Creates the default (JSON-compatible, compact) options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for idiomatic human-oriented HOCON: pretty-printed,
    /// unquoted where possible, no root braces, no separator before objects.
    #[must_use]
    pub fn hocon() -> Self {
        EmitOptions {
            omit_object_value_separator: true,
            omit_root_object_brackets: true,
            unquote_strings_if_possible: true,
            pretty: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_omit_object_value_separator(mut self, on: bool) -> Self {
        self.omit_object_value_separator = on;
        self
    }

    #[must_use]
    pub fn with_omit_root_object_brackets(mut self, on: bool) -> Self {
        self.omit_root_object_brackets = on;
        self
    }

    #[must_use]
    pub fn with_unquote_strings_if_possible(mut self, on: bool) -> Self {
        self.unquote_strings_if_possible = on;
        self
    }

    /// Sets the field/value separator character (`:` or `=`).
    #[must_use]
    pub fn with_field_value_separator(mut self, sep: char) -> Self {
        self.field_value_separator = sep;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, on: bool) -> Self {
        self.pretty = on;
        self
    }

    /// Sets the indentation width; only affects pretty output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// What must be written before the next value in the current write context.
///
/// Produced by the verify step and consumed exactly once by the separator
/// step of the same write call.
#[derive(Clone, Copy, Debug, PartialEq)]
enum SeparatorStatus {
    /// First entry of its context; nothing precedes it.
    First,
    /// Array element following another element.
    AfterComma,
    /// Object value following its field name.
    AfterColon,
    /// Root-level value following a previous root-level value.
    AfterSpace,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum FrameKind {
    Root,
    Array,
    Object,
}

/// Emitter-side mirror of a cursor frame: entry count for formatting
/// decisions plus the name/value alternation flag for objects.
struct WriteFrame {
    kind: FrameKind,
    entries: usize,
    expect_name: bool,
    /// For objects: whether braces were actually written (false only for an
    /// unbracketed root object).
    bracketed: bool,
}

impl WriteFrame {
    fn root() -> Self {
        WriteFrame {
            kind: FrameKind::Root,
            entries: 0,
            expect_name: false,
            bracketed: false,
        }
    }
}

/// Renders a pushed token sequence as HOCON text.
///
/// The emitter owns its output buffer for the duration of a document write;
/// take the text with [`Emitter::into_inner`] or validate balance first with
/// [`Emitter::finish`].
pub struct Emitter {
    out: String,
    options: EmitOptions,
    stack: Vec<WriteFrame>,
    pending: Option<SeparatorStatus>,
    indent_level: usize,
}

impl Emitter {
    pub fn new(options: EmitOptions) -> Self {
        Emitter {
            out: String::with_capacity(256),
            options,
            stack: vec![WriteFrame::root()],
            pending: None,
            indent_level: 0,
        }
    }

    /// Returns the rendered text without checking structural balance.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.out
    }

    /// Returns the rendered text, erroring if any object or array is still
    /// open.
    pub fn finish(self) -> Result<String> {
        if self.stack.len() != 1 {
            return Err(Error::invalid_state(format!(
                "document finished with {} unclosed context(s)",
                self.stack.len() - 1
            )));
        }
        Ok(self.out)
    }

    /// Feeds one cursor token into the emitter.
    pub fn write_token(&mut self, token: &Token<'_>) -> Result<()> {
        match token {
            Token::StartObject => self.write_start_object(),
            Token::EndObject => self.write_end_object(),
            Token::StartArray => self.write_start_array(),
            Token::EndArray => self.write_end_array(),
            Token::FieldName(name) => self.write_field_name(name),
            Token::Bool(b) => self.write_bool(*b),
            Token::Int(i) => self.write_i64(*i),
            Token::Float(f) => self.write_f64(*f),
            Token::Str(s) => self.write_str(s),
            Token::Null => self.write_null(),
        }
    }

    pub fn write_start_object(&mut self) -> Result<()> {
        self.verify_value("write an object")?;
        self.consume_separator(true);
        // Root check happens before the child context is pushed.
        let at_root = self.stack.last().map(|f| f.kind) == Some(FrameKind::Root);
        let bracketed = !(at_root && self.options.omit_root_object_brackets);
        self.stack.push(WriteFrame {
            kind: FrameKind::Object,
            entries: 0,
            expect_name: true,
            bracketed,
        });
        if bracketed {
            self.out.push('{');
            self.indent_level += 1;
        }
        Ok(())
    }

    pub fn write_end_object(&mut self) -> Result<()> {
        match self.stack.last() {
            Some(frame) if frame.kind == FrameKind::Object => {}
            other => {
                return Err(Error::invalid_state(format!(
                    "current context not an object but {}",
                    other.map_or("closed", |f| frame_desc(f.kind))
                )))
            }
        }
        let frame = self.stack.pop().expect("object frame checked above");
        if frame.bracketed {
            self.indent_level -= 1;
            if self.options.pretty && frame.entries > 0 {
                self.out.push('\n');
                self.push_indent();
            }
            self.out.push('}');
        }
        Ok(())
    }

    pub fn write_start_array(&mut self) -> Result<()> {
        self.verify_value("write an array")?;
        self.consume_separator(false);
        self.stack.push(WriteFrame {
            kind: FrameKind::Array,
            entries: 0,
            expect_name: false,
            bracketed: true,
        });
        self.out.push('[');
        Ok(())
    }

    pub fn write_end_array(&mut self) -> Result<()> {
        match self.stack.last() {
            Some(frame) if frame.kind == FrameKind::Array => {}
            other => {
                return Err(Error::invalid_state(format!(
                    "current context not an array but {}",
                    other.map_or("closed", |f| frame_desc(f.kind))
                )))
            }
        }
        self.stack.pop();
        self.out.push(']');
        Ok(())
    }

    pub fn write_field_name(&mut self, name: &str) -> Result<()> {
        let pretty = self.options.pretty;
        let frame = self
            .stack
            .last_mut()
            .ok_or_else(|| Error::invalid_state("writer is closed"))?;
        if frame.kind != FrameKind::Object {
            return Err(Error::invalid_state(format!(
                "cannot write a field name in {} context",
                frame_desc(frame.kind)
            )));
        }
        if !frame.expect_name {
            return Err(Error::invalid_state(
                "cannot write a field name, expecting a value",
            ));
        }
        let comma_before = frame.entries > 0;
        frame.entries += 1;
        frame.expect_name = false;
        let bracketed = frame.bracketed;
        if pretty {
            // Newline-separated entries; the unbracketed root starts at
            // column zero without a leading blank line.
            if comma_before || bracketed {
                self.out.push('\n');
                self.push_indent();
            }
        } else if comma_before {
            self.out.push(',');
        }
        self.write_string_text(name);
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.verify_value("write a boolean")?;
        self.consume_separator(false);
        self.out.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.verify_value("write a number")?;
        self.consume_separator(false);
        self.out.push_str(&value.to_string());
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.verify_value("write a number")?;
        self.consume_separator(false);
        self.out.push_str(&value.to_string());
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::invalid_state(format!(
                "cannot render non-finite float {value}"
            )));
        }
        self.verify_value("write a number")?;
        self.consume_separator(false);
        // `{:?}` keeps a `.0` on whole-valued floats and uses exponent
        // notation for extreme magnitudes; `{}` does neither.
        self.out.push_str(&format!("{value:?}"));
        Ok(())
    }

    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.verify_value("write a string")?;
        self.consume_separator(false);
        self.write_string_text(value);
        Ok(())
    }

    pub fn write_null(&mut self) -> Result<()> {
        self.verify_value("write null")?;
        self.consume_separator(false);
        self.out.push_str("null");
        Ok(())
    }

    /// Writes binary data as a base64 string; HOCON has no native binary
    /// representation.
    pub fn write_binary(&mut self, data: &[u8]) -> Result<()> {
        self.verify_value("write binary data")?;
        self.consume_separator(false);
        let encoded = BASE64.encode(data);
        self.write_string_text(&encoded);
        Ok(())
    }

    /// Verify step: computes what may precede one more value in the current
    /// context and caches it for [`Self::consume_separator`].
    fn verify_value(&mut self, what: &str) -> Result<()> {
        debug_assert!(
            self.pending.is_none(),
            "separator status left unread by a previous write"
        );
        let frame = self
            .stack
            .last_mut()
            .ok_or_else(|| Error::invalid_state("writer is closed"))?;
        let status = match frame.kind {
            FrameKind::Object => {
                if frame.expect_name {
                    return Err(Error::invalid_state(format!(
                        "cannot {}, expecting a field name in object context",
                        what
                    )));
                }
                frame.expect_name = true;
                SeparatorStatus::AfterColon
            }
            FrameKind::Array => {
                let status = if frame.entries == 0 {
                    SeparatorStatus::First
                } else {
                    SeparatorStatus::AfterComma
                };
                frame.entries += 1;
                status
            }
            FrameKind::Root => {
                let status = if frame.entries == 0 {
                    SeparatorStatus::First
                } else {
                    SeparatorStatus::AfterSpace
                };
                frame.entries += 1;
                status
            }
        };
        self.pending = Some(status);
        Ok(())
    }

    /// Consume step: emits the separator chosen by the cached status.
    ///
    /// `is_object_value` enables the object-value separator omission; the
    /// colon is never dropped before non-object values.
    fn consume_separator(&mut self, is_object_value: bool) {
        debug_assert!(
            self.pending.is_some(),
            "separator status consumed before being verified"
        );
        let Some(status) = self.pending.take() else {
            return;
        };
        match status {
            SeparatorStatus::First => {}
            SeparatorStatus::AfterComma => {
                if self.options.pretty {
                    self.out.push_str(", ");
                } else {
                    self.out.push(',');
                }
            }
            SeparatorStatus::AfterColon => {
                if is_object_value && self.options.omit_object_value_separator {
                    if self.options.pretty {
                        self.out.push(' ');
                    }
                } else {
                    self.out.push(self.options.field_value_separator);
                    if self.options.pretty {
                        self.out.push(' ');
                    }
                }
            }
            SeparatorStatus::AfterSpace => {
                if self.options.pretty {
                    self.out.push('\n');
                } else {
                    let sep = self.options.root_value_separator.clone();
                    self.out.push_str(&sep);
                }
            }
        }
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent_level * self.options.indent {
            self.out.push(' ');
        }
    }

    /// Writes a field name or string scalar, quoted or not per the options.
    fn write_string_text(&mut self, text: &str) {
        if self.options.unquote_strings_if_possible && can_render_unquoted(text) {
            self.out.push_str(text);
        } else {
            write_quoted(&mut self.out, text);
        }
    }
}

/// The conservative unquoted-string check.
///
/// A string may be rendered without quotes only when it is non-empty, does
/// not start with a digit or `-` (ambiguous with a number), does not start
/// with `true`, `false`, `null`, or `include` (ambiguous with a keyword or
/// directive), does not contain `//` (starts a comment), and consists solely
/// of letters, digits, and `-`. The character class and keyword list are
/// load-bearing for byte-for-byte compatibility with existing files; do not
/// widen them.
fn can_render_unquoted(s: &str) -> bool {
    let first = match s.chars().next() {
        Some(c) => c,
        None => return false,
    };
    if first.is_numeric() || first == '-' {
        return false;
    }
    if s.starts_with("true")
        || s.starts_with("false")
        || s.starts_with("null")
        || s.starts_with("include")
        || s.contains("//")
    {
        return false;
    }
    s.chars()
        .all(|c| c.is_alphabetic() || c.is_numeric() || c == '-')
}

/// JSON-style quoted string rendering.
fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn frame_desc(kind: FrameKind) -> &'static str {
    match kind {
        FrameKind::Root => "root",
        FrameKind::Array => "array",
        FrameKind::Object => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit<F: FnOnce(&mut Emitter) -> Result<()>>(options: EmitOptions, f: F) -> String {
        let mut emitter = Emitter::new(options);
        f(&mut emitter).unwrap();
        emitter.finish().unwrap()
    }

    fn small_doc(emitter: &mut Emitter) -> Result<()> {
        emitter.write_start_object()?;
        emitter.write_field_name("a")?;
        emitter.write_i64(1)?;
        emitter.write_field_name("b")?;
        emitter.write_start_object()?;
        emitter.write_field_name("c")?;
        emitter.write_bool(true)?;
        emitter.write_end_object()?;
        emitter.write_end_object()
    }

    #[test]
    fn compact_json_compatible() {
        let text = emit(EmitOptions::default(), small_doc);
        assert_eq!(text, r#"{"a":1,"b":{"c":true}}"#);
    }

    #[test]
    fn pretty_output() {
        let text = emit(EmitOptions::new().with_pretty(true), small_doc);
        assert_eq!(
            text,
            "{\n  \"a\": 1\n  \"b\": {\n    \"c\": true\n  }\n}"
        );
    }

    #[test]
    fn root_brackets_omitted_nested_kept() {
        let options = EmitOptions::new().with_omit_root_object_brackets(true);
        let text = emit(options, small_doc);
        assert_eq!(text, r#""a":1,"b":{"c":true}"#);
    }

    #[test]
    fn object_value_separator_omitted_only_for_objects() {
        let options = EmitOptions::new()
            .with_omit_object_value_separator(true)
            .with_unquote_strings_if_possible(true);
        let text = emit(options, small_doc);
        assert_eq!(text, "{a:1,b{c:true}}");
    }

    #[test]
    fn hocon_style() {
        let text = emit(EmitOptions::hocon(), small_doc);
        assert_eq!(text, "a: 1\nb {\n  c: true\n}");
    }

    #[test]
    fn equals_separator() {
        let options = EmitOptions::new()
            .with_field_value_separator('=')
            .with_unquote_strings_if_possible(true)
            .with_omit_root_object_brackets(true);
        let text = emit(options, |e| {
            e.write_start_object()?;
            e.write_field_name("mode")?;
            e.write_str("fast")?;
            e.write_end_object()
        });
        assert_eq!(text, "mode=fast");
    }

    #[test]
    fn array_rendering() {
        let text = emit(EmitOptions::default(), |e| {
            e.write_start_array()?;
            e.write_i64(1)?;
            e.write_f64(2.5)?;
            e.write_null()?;
            e.write_end_array()
        });
        assert_eq!(text, "[1,2.5,null]");
    }

    #[test]
    fn whole_valued_floats_keep_decimal_point() {
        let text = emit(EmitOptions::default(), |e| {
            e.write_start_object()?;
            e.write_field_name("ratio")?;
            e.write_f64(2.0)?;
            e.write_end_object()
        });
        assert_eq!(text, "{\"ratio\":2.0}");
    }

    #[test]
    fn extreme_floats_use_exponent_notation() {
        let text = emit(EmitOptions::default(), |e| e.write_f64(1.4605774383645066e-199));
        assert_eq!(text, "1.4605774383645066e-199");
        assert_eq!(text.parse::<f64>().unwrap(), 1.4605774383645066e-199);
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut emitter = Emitter::new(EmitOptions::default());
            assert!(emitter.write_f64(bad).is_err());
        }
    }

    #[test]
    fn root_values_space_separated() {
        let text = emit(EmitOptions::default(), |e| {
            e.write_i64(1)?;
            e.write_i64(2)
        });
        assert_eq!(text, "1 2");
    }

    #[test]
    fn binary_written_as_base64_string() {
        let text = emit(EmitOptions::default(), |e| e.write_binary(b"hi"));
        assert_eq!(text, "\"aGk=\"");
    }

    #[test]
    fn unquoting_rules() {
        assert!(can_render_unquoted("foo"));
        assert!(can_render_unquoted("foo-bar2"));
        assert!(!can_render_unquoted(""));
        assert!(!can_render_unquoted("2fast"));
        assert!(!can_render_unquoted("-x"));
        assert!(!can_render_unquoted("true"));
        assert!(!can_render_unquoted("truethy"));
        assert!(!can_render_unquoted("falsey"));
        assert!(!can_render_unquoted("nullable"));
        assert!(!can_render_unquoted("includes"));
        assert!(!can_render_unquoted("a//b"));
        assert!(!can_render_unquoted("a b"));
        assert!(!can_render_unquoted("a.b"));
        assert!(!can_render_unquoted("a$b"));
    }

    #[test]
    fn keyword_prefix_only_quotes_when_leading() {
        // "true" must be a prefix, not merely a substring.
        assert!(can_render_unquoted("untrue"));
        assert!(can_render_unquoted("x-null"));
    }

    #[test]
    fn quoting_escapes() {
        let text = emit(EmitOptions::default(), |e| e.write_str("a\"b\\c\nd\u{1}"));
        assert_eq!(text, "\"a\\\"b\\\\c\\nd\\u0001\"");
    }

    #[test]
    fn value_where_name_expected_is_usage_error() {
        let mut emitter = Emitter::new(EmitOptions::default());
        emitter.write_start_object().unwrap();
        let err = emitter.write_i64(1).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn field_name_in_array_is_usage_error() {
        let mut emitter = Emitter::new(EmitOptions::default());
        emitter.write_start_array().unwrap();
        assert!(emitter.write_field_name("x").is_err());
    }

    #[test]
    fn mismatched_end_is_usage_error() {
        let mut emitter = Emitter::new(EmitOptions::default());
        emitter.write_start_array().unwrap();
        assert!(emitter.write_end_object().is_err());
    }

    #[test]
    fn finish_rejects_unclosed_contexts() {
        let mut emitter = Emitter::new(EmitOptions::default());
        emitter.write_start_object().unwrap();
        assert!(emitter.finish().is_err());
    }

    #[test]
    fn empty_object_and_array() {
        let text = emit(EmitOptions::new().with_pretty(true), |e| {
            e.write_start_object()?;
            e.write_field_name("empty")?;
            e.write_start_object()?;
            e.write_end_object()?;
            e.write_field_name("list")?;
            e.write_start_array()?;
            e.write_end_array()?;
            e.write_end_object()
        });
        assert_eq!(text, "{\n  \"empty\": {}\n  \"list\": []\n}");
    }
}
