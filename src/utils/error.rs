use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },

    #[error("Unreadable table {path}: {reason}")]
    TableFormatError { path: String, reason: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::MissingFieldError { .. }
            | EtlError::TableFormatError { .. } => ErrorCategory::Input,
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::MissingConfigError { .. } => {
                "Pass the missing option on the command line (see --help)"
            }
            EtlError::InvalidConfigValueError { .. } | EtlError::ConfigError { .. } => {
                "Check the command line options and file extensions"
            }
            EtlError::ConfigValidationError { .. } => {
                "Fix the settings document; run with --print-default-settings for a sample"
            }
            EtlError::CsvError(_) | EtlError::TableFormatError { .. } => {
                "Make sure the file is a CSV with a header row or a JSON array of objects"
            }
            EtlError::SerializationError(_) => "Make sure the JSON document is well formed",
            EtlError::MissingFieldError { .. } => {
                "Add the column to the input file (column names are case-insensitive)"
            }
            EtlError::ProcessingError { .. } => "Re-run with --verbose to see which row failed",
            EtlError::IoError(_) => "Check that the paths exist and are readable/writable",
            EtlError::ZipError(_) => "Retry without --bundle or check free disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Input file problem: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = EtlError::MissingFieldError {
            field: "Campaign".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required field: Campaign");
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_severity_by_category() {
        let config = EtlError::ConfigValidationError {
            field: "default_budget".to_string(),
            message: "not a number".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::High);

        let io = EtlError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert!(io.user_friendly_message().starts_with("System error"));
    }
}
