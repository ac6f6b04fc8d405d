use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },
}

impl CalcError {
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Short message suitable for printing to the terminal.
    pub fn user_friendly_message(&self) -> String {
        match self {
            CalcError::CsvError(e) => format!("Could not read or write the CSV batch: {}", e),
            CalcError::IoError(e) => format!("File access failed: {}", e),
            CalcError::SerializationError(e) => format!("Could not render the result: {}", e),
            CalcError::ConfigValidationError { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
            CalcError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid value for {} ({})", value, field, reason)
            }
            CalcError::MissingConfigError { field } => {
                format!("The configuration is missing '{}'", field)
            }
            CalcError::InvalidInput { field, message } => format!("{}: {}", field, message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CalcError::CsvError(_) => {
                "Check that the batch file has the header label,culture_od,target_od,final_volume,unit"
            }
            CalcError::IoError(_) => "Check that the path exists and is readable",
            CalcError::SerializationError(_) => "Try again with --format text",
            CalcError::ConfigValidationError { .. }
            | CalcError::InvalidConfigValueError { .. }
            | CalcError::MissingConfigError { .. } => {
                "Fix the configuration file or run without --config to use the built-in defaults"
            }
            CalcError::InvalidInput { .. } => "Run with --help to see the accepted values",
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
