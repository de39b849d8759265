use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed program file: {message}")]
    StructureError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("A module with code {code} already exists")]
    DuplicateModuleError { code: String },

    #[error("Module {code} has no id")]
    MissingModuleIdError { code: String },

    #[error("Module {key} not found")]
    ModuleNotFoundError { key: String },

    #[error("Semester {number} does not exist")]
    SemesterNotFoundError { number: u32 },

    #[error("No module id is left after {max}")]
    ModuleIdsExhaustedError { max: u32 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The state file does not have the expected shape.
    Structural,
    /// User input could not be parsed or is out of range.
    InputFormat,
    /// The request conflicts with the current program state.
    Domain,
    Config,
    Io,
}

impl DashboardError {
    pub fn structure(message: impl Into<String>) -> Self {
        Self::StructureError {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IoError(_) => ErrorKind::Io,
            Self::SerializationError(_) | Self::StructureError { .. } => ErrorKind::Structural,
            Self::InvalidValueError { .. } => ErrorKind::Structural,
            Self::ValidationError { .. } => ErrorKind::InputFormat,
            Self::DuplicateModuleError { .. }
            | Self::MissingModuleIdError { .. }
            | Self::ModuleNotFoundError { .. }
            | Self::SemesterNotFoundError { .. }
            | Self::ModuleIdsExhaustedError { .. } => ErrorKind::Domain,
            Self::ConfigError { .. } => ErrorKind::Config,
        }
    }

    /// Errors the interactive layer reports and then re-prompts on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::InputFormat | ErrorKind::Domain)
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not access the program file: {}", e),
            Self::SerializationError(e) => format!("The program file is not valid JSON: {}", e),
            Self::StructureError { message } => format!("The program file is incomplete: {}", message),
            Self::InvalidValueError { field, value, .. } => {
                format!("The program file contains an unknown {} '{}'", field, value)
            }
            Self::ValidationError { message } => message.clone(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
