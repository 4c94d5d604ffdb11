use std::fmt;

use serde_json::Value;

/// Location of a field inside a payload, rendered as a JSON Pointer (`/items/2/content`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Parses a JSON Pointer such as `/items/0/title`. The empty string is the root.
    pub fn from_pointer(pointer: &str) -> Self {
        let segments = pointer
            .split('/')
            .skip(1)
            .map(|seg| seg.replace("~1", "/").replace("~0", "~"))
            .collect();
        Self(segments)
    }

    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Name of the innermost field, if the path is not the root.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for seg in &self.0 {
            write!(f, "/{}", seg.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

/// Structural mismatch between a received payload and the expected record shape.
///
/// This is the only failure the contract layer reports. It is never fatal: callers decide
/// whether to drop the single record or the whole response.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("schema violation at {path}: expected {expected}, found {actual}")]
pub struct SchemaViolation {
    pub path: FieldPath,
    pub expected: String,
    pub actual: String,
}

impl SchemaViolation {
    pub fn new(path: FieldPath, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            path,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Violation on a top-level field of the record being validated.
    pub fn at(field: &str, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(FieldPath::field(field), expected, actual)
    }

    pub fn missing(path: FieldPath) -> Self {
        Self::new(path, "required field", "missing")
    }

    /// Re-roots the violation under `prefix`, e.g. a record nested in `items/3`.
    pub fn within(mut self, prefix: FieldPath) -> Self {
        let mut segments = prefix.0;
        segments.append(&mut self.path.0);
        self.path = FieldPath(segments);
        self
    }

    /// Name of the offending field, if the violation is not about the payload as a whole.
    pub fn field(&self) -> Option<&str> {
        self.path.last()
    }
}

/// Short description of a JSON value used as the "actual" side of a violation.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) if s.chars().count() > 40 => {
            let head: String = s.chars().take(40).collect();
            format!("string \"{head}...\"")
        }
        Value::String(s) => format!("string \"{s}\""),
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Object(_) => "object".into(),
    }
}
