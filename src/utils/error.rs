use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Base64 decode error: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("Could not find {marker} pattern in {file}")]
    WrapperNotFound { file: String, marker: &'static str },

    #[error("Invalid index format: {message}")]
    FormatError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Format,
    Config,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ProbeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProbeError::IoError(_) => ErrorCategory::Io,
            ProbeError::SerializationError(_)
            | ProbeError::DecodeError(_)
            | ProbeError::WrapperNotFound { .. }
            | ProbeError::FormatError { .. } => ErrorCategory::Format,
            ProbeError::ConfigError { .. }
            | ProbeError::MissingConfigError { .. }
            | ProbeError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            ProbeError::PatternError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Format | ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// 對應嚴重程度的程序退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ProbeError::IoError(_) => {
                "Run `cargo doc` first and check that --index-dir points at target/doc/search.index"
            }
            ProbeError::SerializationError(_) | ProbeError::FormatError { .. } => {
                "The index was probably produced by a different rustdoc version; inspect root.js by hand"
            }
            ProbeError::DecodeError(_) => "The payload is not standard base64; try a hex dump instead",
            ProbeError::WrapperNotFound { .. } => {
                "Make sure the file is a rustdoc search index root (root.js), not a crate shard"
            }
            ProbeError::ConfigError { .. }
            | ProbeError::MissingConfigError { .. }
            | ProbeError::InvalidConfigValueError { .. } => {
                "Check the command line flags and the TOML configuration file"
            }
            ProbeError::PatternError(_) => "This is a bug in stringdex-probe; please report it",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not access the search index: {}", self),
            ErrorCategory::Format => format!("The search index could not be understood: {}", self),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
            ErrorCategory::Internal => format!("Internal error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_with_retry_exit_code() {
        let err = ProbeError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "root.js",
        ));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_wrapper_not_found_message() {
        let err = ProbeError::WrapperNotFound {
            file: "root.js".to_string(),
            marker: "rr_('...')",
        };
        assert_eq!(err.to_string(), "Could not find rr_('...') pattern in root.js");
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().starts_with("The search index could not be understood"));
    }

    #[test]
    fn test_config_errors_exit_with_one() {
        let err = ProbeError::InvalidConfigValueError {
            field: "limits.list_limit".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(err.exit_code(), 1);
    }
}
