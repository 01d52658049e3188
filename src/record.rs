//! Parsed fingerprint document model.

use std::collections::HashMap;

/// Value of one top-level field in a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A key that appeared alone on its line. Distinct from an empty value.
    Bare,
    /// A `KEY value` line, value trimmed and unquoted.
    Scalar(String),
    /// A `NAME { ... }` block: the raw inner lines, inline comments intact.
    Block(Vec<String>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&[String]> {
        match self {
            FieldValue::Block(lines) => Some(lines),
            _ => None,
        }
    }
}

/// One parsed fingerprint document: a flat mapping of field names to values.
///
/// The parser fills this without validating anything; accessors here are the
/// shared read path for the validator and both compilers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fingerprint {
    pub fields: HashMap<String, FieldValue>,
}

impl Fingerprint {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Scalar value of a field. `None` for bare keys and blocks.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_scalar)
    }

    /// Lines of a field: a block yields its lines, a scalar its (single)
    /// line, a bare key nothing.
    pub fn lines(&self, key: &str) -> Vec<&str> {
        match self.get(key) {
            Some(FieldValue::Block(lines)) => lines.iter().map(String::as_str).collect(),
            Some(FieldValue::Scalar(s)) => s.lines().collect(),
            _ => Vec::new(),
        }
    }

    /// The DETECT block as ordered steps. Order is significant: steps execute
    /// in sequence during probing.
    pub fn detect_steps(&self) -> Vec<DetectStep<'_>> {
        self.lines("DETECT").into_iter().map(DetectStep::new).collect()
    }
}

/// Borrowed view over one detect-step line.
///
/// The raw text keeps any trailing `# comment`; `code_part` is what rule
/// checks and unsafe-step matching operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectStep<'a> {
    pub raw: &'a str,
}

impl<'a> DetectStep<'a> {
    pub fn new(raw: &'a str) -> Self {
        DetectStep { raw }
    }

    /// Text before the first `#`, trimmed.
    pub fn code_part(&self) -> &'a str {
        let code = match self.raw.find('#') {
            Some(i) => &self.raw[..i],
            None => self.raw,
        };
        code.trim()
    }

    /// First whitespace-delimited word of the code part; classifies the step.
    pub fn first_token(&self) -> Option<&'a str> {
        self.code_part().split_whitespace().next()
    }

    /// Whitespace-delimited tokens of the code part.
    pub fn tokens(&self) -> Vec<&'a str> {
        self.code_part().split_whitespace().collect()
    }
}
