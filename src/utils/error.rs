use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableGenError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input format error at line {line}: {message}")]
    InputFormatError { line: usize, message: String },

    #[error("Coefficient (n = {degree}, m = {order}) maps to index {index}, outside a table of {len} entries")]
    IndexOutOfRangeError {
        degree: u32,
        order: u32,
        index: usize,
        len: usize,
    },

    #[error("Duplicate coefficient (n = {degree}, m = {order}) at index {index}")]
    DuplicateCoefficientError { degree: u32, order: u32, index: usize },

    #[error("Coefficient table has {count} unfilled slot(s), first at index {first}")]
    MissingCoefficientError { first: usize, count: usize },

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Completeness,
    Io,
    Config,
}

impl TableGenError {
    pub fn input_format(line: usize, message: impl Into<String>) -> Self {
        Self::InputFormatError {
            line,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InputFormatError { .. } => ErrorCategory::Input,
            Self::IndexOutOfRangeError { .. }
            | Self::DuplicateCoefficientError { .. }
            | Self::MissingCoefficientError { .. } => ErrorCategory::Completeness,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Io,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn is_completeness_error(&self) -> bool {
        self.category() == ErrorCategory::Completeness
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The coefficient file is malformed: {}", self),
            ErrorCategory::Completeness => {
                format!("The coefficient file does not cover every (n, m) pair: {}", self)
            }
            ErrorCategory::Io => format!("Could not read or write a file: {}", self),
            ErrorCategory::Config => format!("The configuration is invalid: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InputFormatError { .. } => {
                "Check that the header has 3 fields and every data row has 6 fields"
            }
            Self::IndexOutOfRangeError { .. } | Self::MissingCoefficientError { .. } => {
                "Make sure every order 0..=n is present for every degree up to the maximum"
            }
            Self::DuplicateCoefficientError { .. } => {
                "Remove the repeated (n, m) row from the coefficient file"
            }
            Self::IoError(_) => "Verify the input path exists and the output directory is writable",
            Self::SerializationError(_) => "Re-run without JSON export to isolate the failure",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration value and run again",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input => 2,
            ErrorCategory::Completeness => 3,
            ErrorCategory::Io => 4,
            ErrorCategory::Config => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, TableGenError>;
