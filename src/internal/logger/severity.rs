use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a log line, ordered from least to most severe.
///
/// The integer encoding is what gets written into the sink's
/// `stderrthreshold` setting, so the discriminants must stay in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "SeverityRepr", into = "String")]
#[repr(u8)]
pub enum Severity {
    #[default]
    Info = 0,
    Warning = 1,
    Error = 2,
    Fatal = 3,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Severity::Info),
            1 => Some(Severity::Warning),
            2 => Some(Severity::Error),
            3 => Some(Severity::Fatal),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`.
    ///
    /// `tracing` has no level above ERROR, so Error and Fatal share one.
    pub fn filter_directive(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warn",
            Severity::Error | Severity::Fatal => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid severity `{0}` (expected info, warning, error, fatal or 0-3)")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u8>() {
            return Severity::from_u8(value).ok_or_else(|| ParseSeverityError(s.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// Wire shape accepted when deserializing: a name or an integer encoding.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityRepr {
    Number(i64),
    Name(String),
}

impl TryFrom<SeverityRepr> for Severity {
    type Error = ParseSeverityError;

    fn try_from(repr: SeverityRepr) -> Result<Self, ParseSeverityError> {
        match repr {
            SeverityRepr::Number(n) => u8::try_from(n)
                .ok()
                .and_then(Severity::from_u8)
                .ok_or_else(|| ParseSeverityError(n.to_string())),
            SeverityRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.name().to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_matches_encoding() {
        for pair in Severity::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].as_u8() < pair[1].as_u8());
        }
    }

    #[test]
    fn test_deserialize_from_name_or_number() {
        let cfg: config::Config = config::Config::builder()
            .set_override("by_name", "fatal")
            .unwrap()
            .set_override("by_number", 1)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(cfg.get::<Severity>("by_name").unwrap(), Severity::Fatal);
        assert_eq!(cfg.get::<Severity>("by_number").unwrap(), Severity::Warning);
        assert!(cfg.get::<Severity>("missing").is_err());
    }

    #[test]
    fn test_parse_names_and_numbers() {
        assert_eq!("info".parse::<Severity>(), Ok(Severity::Info));
        assert_eq!("WARN".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("Warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!(" error ".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("3".parse::<Severity>(), Ok(Severity::Fatal));
        assert!("4".parse::<Severity>().is_err());
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_display_and_filter_directive() {
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Fatal.filter_directive(), "error");
    }
}
