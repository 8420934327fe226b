//! Process exit codes.
//!
//! Scripts branch on these, so the numbers never change:
//! - 0 / 1: the command ran; 1 means a checked value was sensitive
//! - 10..=19: the invocation or its inputs need fixing
//! - 20..=29: logmask itself failed

use lm_sanitize::SanitizeError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Command ran
    // ========================================================================
    Clean = 0,
    SensitiveFound = 1,

    // ========================================================================
    // Caller must fix something
    // ========================================================================
    /// Unknown command or malformed flags.
    ArgsError = 10,
    /// Config file unreadable as JSON, or a setting was rejected.
    ConfigError = 11,
    /// Input unreadable or stdout closed.
    IoError = 12,

    // ========================================================================
    // logmask failed
    // ========================================================================
    InternalError = 20,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Whether the run failed, as opposed to reporting a finding.
    pub fn is_failure(self) -> bool {
        self.as_i32() >= ExitCode::ArgsError.as_i32()
    }

    /// Stable short label, e.g. `config_error`.
    pub fn label(self) -> &'static str {
        match self {
            ExitCode::Clean => "clean",
            ExitCode::SensitiveFound => "sensitive_found",
            ExitCode::ArgsError => "args_error",
            ExitCode::ConfigError => "config_error",
            ExitCode::IoError => "io_error",
            ExitCode::InternalError => "internal_error",
        }
    }
}

impl From<&SanitizeError> for ExitCode {
    /// Reading the config file is an I/O problem; everything else the
    /// engine rejects is configuration.
    fn from(err: &SanitizeError) -> Self {
        match err {
            SanitizeError::Io(_) => ExitCode::IoError,
            _ => ExitCode::ConfigError,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.label(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_findings_are_not_failures() {
        assert!(!ExitCode::Clean.is_failure());
        assert!(!ExitCode::SensitiveFound.is_failure());
        assert!(ExitCode::ArgsError.is_failure());
        assert!(ExitCode::IoError.is_failure());
        assert!(ExitCode::InternalError.is_failure());
    }

    #[test]
    fn test_engine_errors_map_to_codes() {
        let missing = SanitizeError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(ExitCode::from(&missing), ExitCode::IoError);

        let separator = SanitizeError::InvalidSeparatorConfig {
            separator: "a b".to_string(),
            reason: "contains whitespace".to_string(),
        };
        assert_eq!(ExitCode::from(&separator).as_i32(), 11);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::ConfigError.to_string(), "config_error=11");
    }
}
