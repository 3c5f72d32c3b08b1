use derive_more::Display;
use serde_json::Value;

/// A single reason why an incoming record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Problem {
    #[display(fmt = "not-an-object")]
    NotAnObject,
    #[display(fmt = "missing {}", _0)]
    Missing(&'static str),
    #[display(fmt = "{}-not-number", _0)]
    NotANumber(&'static str),
    #[display(fmt = "{}-not-a-date", _0)]
    NotADate(&'static str),
    #[display(fmt = "unknown status '{}'", _0)]
    UnknownStatus(String),
}

impl Problem {
    /// Field name for `Missing` problems.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            Problem::Missing(field) => Some(field),
            _ => None,
        }
    }
}

/// Reads a field as trimmed text. Absent, null and blank values count as missing.
pub(crate) fn text_field(
    obj: &serde_json::Map<String, Value>,
    key: &'static str,
    problems: &mut Vec<Problem>,
) -> Option<String> {
    let text = match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(other) => Some(other.to_string()),
    };

    match text {
        Some(t) if !t.is_empty() => Some(t),
        _ => {
            problems.push(Problem::Missing(key));
            None
        }
    }
}

/// Reads a numeric field, accepting numbers and numeric strings.
///
/// `Ok(None)` means the field is absent, null or an empty string.
pub(crate) fn number_field(
    obj: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<Option<f64>, Problem> {
    let parsed = match obj.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(Problem::NotANumber(key)),
    }
}
