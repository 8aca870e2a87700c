//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Wrapper for configuration loading errors.
    /// We ignore this for `From<String>` to avoid conflict with General.
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Config(String),

    /// A flattened node carries a payload the type definition generator
    /// has no expansion for.
    #[display("Unsupported schema payload ({kind}) at path '{path}'")]
    UnsupportedPayload {
        /// The slash joined tree path of the offending node.
        path: String,
        /// The payload kind, eg. "header".
        kind: &'static str,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        // Test that String defaults to General, not Config
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_config_manual_creation() {
        // Config errors must be created explicitly
        let app_err = AppError::Config("bad yaml".into());
        assert_eq!(format!("{}", app_err), "Configuration Error: bad yaml");
    }

    #[test]
    fn test_unsupported_payload_display() {
        let app_err = AppError::UnsupportedPayload {
            path: "components/headers/X-Rate-Limit".into(),
            kind: "header",
        };
        assert_eq!(
            format!("{}", app_err),
            "Unsupported schema payload (header) at path 'components/headers/X-Rate-Limit'"
        );
    }
}
