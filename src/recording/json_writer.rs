//! Incremental JSON line writer.
//!
//! Builds exactly one JSON document at a time. Scopes are opened and closed
//! explicitly; once the root scope closes the document is complete and
//! [`JsonWriter::finish`] hands the accumulated text out as one line,
//! resetting the builder for the next document. An incomplete document is
//! never handed out.
//!
//! Sequence violations (a value without a key, a key outside an object, a
//! mismatched close, flushing early) return [`FormatError`]; they indicate a
//! bug in the serialization code driving the writer, not bad input.

use crate::error::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Object,
    Array,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    /// Number of keys (object) or elements (array) written so far
    len: usize,
    /// An object key has been written and awaits its value
    pending_key: bool,
}

/// Streaming builder for one newline-delimited JSON document.
#[derive(Debug, Default)]
pub struct JsonWriter {
    buf: String,
    stack: Vec<Scope>,
    complete: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        JsonWriter::default()
    }

    /// Open an object scope, as the root document or as the next value.
    pub fn begin_object(&mut self) -> Result<(), FormatError> {
        self.begin_scope(ScopeKind::Object)
    }

    /// Close the innermost scope, which must be an object.
    pub fn end_object(&mut self) -> Result<(), FormatError> {
        self.end_scope(ScopeKind::Object)
    }

    /// Open an array scope, as the root document or as the next value.
    pub fn begin_array(&mut self) -> Result<(), FormatError> {
        self.begin_scope(ScopeKind::Array)
    }

    /// Close the innermost scope, which must be an array.
    pub fn end_array(&mut self) -> Result<(), FormatError> {
        self.end_scope(ScopeKind::Array)
    }

    /// Write an object key; the next write must be its value.
    pub fn key(&mut self, name: &str) -> Result<(), FormatError> {
        if self.complete {
            return Err(FormatError::DocumentComplete);
        }
        let scope = self.stack.last_mut().ok_or(FormatError::NoDocument)?;
        if scope.kind != ScopeKind::Object {
            return Err(FormatError::KeyOutsideObject);
        }
        if scope.pending_key {
            return Err(FormatError::DanglingKey);
        }
        let needs_comma = scope.len > 0;
        scope.len += 1;
        scope.pending_key = true;

        if needs_comma {
            self.buf.push(',');
        }
        push_escaped(&mut self.buf, name);
        self.buf.push(':');
        Ok(())
    }

    /// Write an unsigned 64-bit integer value.
    pub fn uint(&mut self, value: u64) -> Result<(), FormatError> {
        self.value_prefix()?;
        let mut buf = itoa::Buffer::new();
        self.buf.push_str(buf.format(value));
        Ok(())
    }

    /// Write a signed 64-bit integer value.
    pub fn int(&mut self, value: i64) -> Result<(), FormatError> {
        self.value_prefix()?;
        let mut buf = itoa::Buffer::new();
        self.buf.push_str(buf.format(value));
        Ok(())
    }

    /// Write a double-precision value.
    ///
    /// Non-finite values have no JSON representation and are written as
    /// `null`.
    pub fn double(&mut self, value: f64) -> Result<(), FormatError> {
        self.value_prefix()?;
        if value.is_finite() {
            self.buf.push_str(&format!("{:?}", value));
        } else {
            self.buf.push_str("null");
        }
        Ok(())
    }

    /// Write a boolean value.
    pub fn boolean(&mut self, value: bool) -> Result<(), FormatError> {
        self.value_prefix()?;
        self.buf.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    /// Write a string value.
    pub fn string(&mut self, value: &str) -> Result<(), FormatError> {
        self.value_prefix()?;
        push_escaped(&mut self.buf, value);
        Ok(())
    }

    /// Whether the root scope has been closed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Hand out the completed document and reset for the next one.
    pub fn finish(&mut self) -> Result<String, FormatError> {
        if !self.complete || self.buf.is_empty() {
            return Err(FormatError::IncompleteDocument);
        }
        let line = std::mem::take(&mut self.buf);
        self.stack.clear();
        self.complete = false;
        Ok(line)
    }

    /// Discard any in-progress document.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.stack.clear();
        self.complete = false;
    }

    fn begin_scope(&mut self, kind: ScopeKind) -> Result<(), FormatError> {
        if self.complete {
            return Err(FormatError::DocumentComplete);
        }
        if !self.stack.is_empty() {
            self.value_prefix()?;
        }
        self.buf.push(match kind {
            ScopeKind::Object => '{',
            ScopeKind::Array => '[',
        });
        self.stack.push(Scope {
            kind,
            len: 0,
            pending_key: false,
        });
        Ok(())
    }

    fn end_scope(&mut self, kind: ScopeKind) -> Result<(), FormatError> {
        if self.complete {
            return Err(FormatError::DocumentComplete);
        }
        let scope = self.stack.last().ok_or(FormatError::NoDocument)?;
        if scope.kind != kind {
            return Err(FormatError::ScopeMismatch);
        }
        if scope.pending_key {
            return Err(FormatError::DanglingKey);
        }
        self.stack.pop();
        self.buf.push(match kind {
            ScopeKind::Object => '}',
            ScopeKind::Array => ']',
        });
        if self.stack.is_empty() {
            self.complete = true;
        }
        Ok(())
    }

    /// Position bookkeeping shared by every value writer: checks that a
    /// value is legal here and emits the separating comma if needed.
    fn value_prefix(&mut self) -> Result<(), FormatError> {
        if self.complete {
            return Err(FormatError::DocumentComplete);
        }
        let scope = self.stack.last_mut().ok_or(FormatError::NoDocument)?;
        match scope.kind {
            ScopeKind::Object => {
                if !scope.pending_key {
                    return Err(FormatError::ValueWithoutKey);
                }
                scope.pending_key = false;
            }
            ScopeKind::Array => {
                let needs_comma = scope.len > 0;
                scope.len += 1;
                if needs_comma {
                    self.buf.push(',');
                }
            }
        }
        Ok(())
    }
}

/// Append `s` to `buf` as a quoted JSON string.
fn push_escaped(buf: &mut String, s: &str) {
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            c if (c as u32) < 0x20 => buf.push_str(&format!("\\u{:04x}", c as u32)),
            c => buf.push(c),
        }
    }
    buf.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_document() {
        let mut w = JsonWriter::new();
        w.begin_object().unwrap();
        w.key("frame").unwrap();
        w.begin_object().unwrap();
        w.key("ts").unwrap();
        w.uint(1000).unwrap();
        w.key("echoes").unwrap();
        w.begin_array().unwrap();
        w.begin_array().unwrap();
        w.uint(3).unwrap();
        w.double(5.0).unwrap();
        w.double(20.0).unwrap();
        w.uint(0).unwrap();
        w.end_array().unwrap();
        w.end_array().unwrap();
        w.end_object().unwrap();
        assert!(!w.is_complete());
        w.end_object().unwrap();
        assert!(w.is_complete());

        assert_eq!(
            w.finish().unwrap(),
            r#"{"frame":{"ts":1000,"echoes":[[3,5.0,20.0,0]]}}"#
        );
    }

    #[test]
    fn test_scalar_kinds() {
        let mut w = JsonWriter::new();
        w.begin_object().unwrap();
        w.key("u").unwrap();
        w.uint(u64::MAX).unwrap();
        w.key("i").unwrap();
        w.int(-42).unwrap();
        w.key("b").unwrap();
        w.boolean(true).unwrap();
        w.key("s").unwrap();
        w.string("hi").unwrap();
        w.end_object().unwrap();

        assert_eq!(
            w.finish().unwrap(),
            r#"{"u":18446744073709551615,"i":-42,"b":true,"s":"hi"}"#
        );
    }

    #[test]
    fn test_double_formatting() {
        let mut w = JsonWriter::new();
        w.begin_array().unwrap();
        w.double(5.0).unwrap();
        w.double(0.1).unwrap();
        w.double(f64::NAN).unwrap();
        w.double(f64::INFINITY).unwrap();
        w.end_array().unwrap();

        assert_eq!(w.finish().unwrap(), "[5.0,0.1,null,null]");
    }

    #[test]
    fn test_string_escaping() {
        let mut w = JsonWriter::new();
        w.begin_array().unwrap();
        w.string("a\"b\\c\nd\te\u{1}").unwrap();
        w.end_array().unwrap();

        let line = w.finish().unwrap();
        assert_eq!(line, "[\"a\\\"b\\\\c\\nd\\te\\u0001\"]");

        // The escaped form must survive an independent parse.
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed[0].as_str().unwrap(), "a\"b\\c\nd\te\u{1}");
    }

    #[test]
    fn test_reuse_after_finish() {
        let mut w = JsonWriter::new();
        w.begin_object().unwrap();
        w.end_object().unwrap();
        assert_eq!(w.finish().unwrap(), "{}");

        w.begin_object().unwrap();
        w.key("a").unwrap();
        w.uint(1).unwrap();
        w.end_object().unwrap();
        assert_eq!(w.finish().unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_value_with_no_document() {
        let mut w = JsonWriter::new();
        assert_eq!(w.uint(1), Err(FormatError::NoDocument));
        assert_eq!(w.key("a"), Err(FormatError::NoDocument));
        assert_eq!(w.end_object(), Err(FormatError::NoDocument));
    }

    #[test]
    fn test_value_without_key_in_object() {
        let mut w = JsonWriter::new();
        w.begin_object().unwrap();
        assert_eq!(w.uint(1), Err(FormatError::ValueWithoutKey));
    }

    #[test]
    fn test_key_outside_object() {
        let mut w = JsonWriter::new();
        w.begin_array().unwrap();
        assert_eq!(w.key("a"), Err(FormatError::KeyOutsideObject));
    }

    #[test]
    fn test_dangling_key() {
        let mut w = JsonWriter::new();
        w.begin_object().unwrap();
        w.key("a").unwrap();
        assert_eq!(w.key("b"), Err(FormatError::DanglingKey));
        assert_eq!(w.end_object(), Err(FormatError::DanglingKey));
    }

    #[test]
    fn test_scope_mismatch() {
        let mut w = JsonWriter::new();
        w.begin_object().unwrap();
        assert_eq!(w.end_array(), Err(FormatError::ScopeMismatch));
    }

    #[test]
    fn test_write_after_complete() {
        let mut w = JsonWriter::new();
        w.begin_object().unwrap();
        w.end_object().unwrap();
        assert_eq!(w.begin_object(), Err(FormatError::DocumentComplete));
        assert_eq!(w.uint(1), Err(FormatError::DocumentComplete));
    }

    #[test]
    fn test_finish_incomplete() {
        let mut w = JsonWriter::new();
        assert_eq!(w.finish(), Err(FormatError::IncompleteDocument));
        w.begin_object().unwrap();
        assert_eq!(w.finish(), Err(FormatError::IncompleteDocument));
    }

    #[test]
    fn test_reset_discards_partial_document() {
        let mut w = JsonWriter::new();
        w.begin_object().unwrap();
        w.key("a").unwrap();
        w.reset();
        assert!(!w.is_complete());

        w.begin_object().unwrap();
        w.end_object().unwrap();
        assert_eq!(w.finish().unwrap(), "{}");
    }
}
