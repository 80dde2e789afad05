use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt::Write;

/// Upper bound for [`FormatKind::Number`] decimals.
pub const MAX_DECIMALS: usize = 20;

/// The transform a [`Format`] rule applies to a non-null raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatKind {
    /// Render a date or timestamp with a `strftime` pattern.
    Date { pattern: String },
    /// Render a number with a fixed number of decimals.
    Number { decimals: usize },
    Uppercase,
    Lowercase,
}

/// A formatting rule bound to an output key.
#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    source: Option<String>,
    kind: FormatKind,
}

impl Format {
    pub fn new(kind: FormatKind) -> Self {
        Self { source: None, kind }
    }

    pub fn date(pattern: impl Into<String>) -> Self {
        Self::new(FormatKind::Date {
            pattern: pattern.into(),
        })
    }

    pub fn number(decimals: usize) -> Self {
        Self::new(FormatKind::Number { decimals })
    }

    pub fn uppercase() -> Self {
        Self::new(FormatKind::Uppercase)
    }

    pub fn lowercase() -> Self {
        Self::new(FormatKind::Lowercase)
    }

    /// Reads the raw value from `source` instead of the output key.
    pub fn from_field(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn kind(&self) -> &FormatKind {
        &self.kind
    }

    /// Applies the format to a non-null raw value. The error is a
    /// human-readable reason.
    pub fn apply(&self, raw: &Value) -> Result<Value, String> {
        match &self.kind {
            FormatKind::Date { pattern } => {
                let date = parse_date(raw)?;
                let mut out = String::new();
                write!(out, "{}", date.format(pattern))
                    .map_err(|_| format!("invalid date pattern '{}'", pattern))?;
                Ok(Value::String(out))
            }
            FormatKind::Number { decimals } => {
                if *decimals > MAX_DECIMALS {
                    return Err(format!(
                        "{} decimals exceeds the maximum of {}",
                        decimals, MAX_DECIMALS
                    ));
                }
                let number = match raw {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                }
                .ok_or_else(|| "expected a number".to_string())?;
                Ok(Value::String(format!("{:.*}", decimals, number)))
            }
            FormatKind::Uppercase => raw
                .as_str()
                .map(|s| Value::String(s.to_uppercase()))
                .ok_or_else(|| "expected a string".to_string()),
            FormatKind::Lowercase => raw
                .as_str()
                .map(|s| Value::String(s.to_lowercase()))
                .ok_or_else(|| "expected a string".to_string()),
        }
    }
}

/// Accepts RFC 3339 strings, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`, and unix
/// timestamps in seconds. Naive values are taken as UTC.
fn parse_date(raw: &Value) -> Result<DateTime<FixedOffset>, String> {
    match raw {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(date) = DateTime::parse_from_rfc3339(s) {
                return Ok(date);
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Ok(naive.and_utc().fixed_offset());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc().fixed_offset())
                .ok_or_else(|| format!("'{}' is not a recognized date", s))
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|date| date.fixed_offset())
            .ok_or_else(|| format!("{} is not a valid timestamp", n)),
        other => Err(format!("expected a date, found {}", other)),
    }
}
