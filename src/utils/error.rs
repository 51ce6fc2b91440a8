use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediqueryError {
    #[error("{0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request failed with status code {status}")]
    StatusError { status: u16, detail: Option<String> },

    #[error("Malformed response: {message}")]
    MalformedResponseError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Question is empty")]
    EmptyQuestionError,

    #[error("A request is already pending")]
    RequestPendingError,

    #[error("Render error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MediqueryError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MediqueryError::EmptyQuestionError | MediqueryError::RequestPendingError => {
                ErrorSeverity::Low
            }
            MediqueryError::HttpError(_) | MediqueryError::StatusError { .. } => {
                ErrorSeverity::Medium
            }
            MediqueryError::MalformedResponseError { .. }
            | MediqueryError::SerializationError(_)
            | MediqueryError::RenderError { .. } => ErrorSeverity::High,
            MediqueryError::IoError(_)
            | MediqueryError::ConfigError { .. }
            | MediqueryError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Exit code used by the CLI for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    /// The message shown in place of an answer. Transport and status
    /// failures surface as their own description.
    pub fn user_friendly_message(&self) -> String {
        match self {
            MediqueryError::HttpError(e) if e.is_timeout() => {
                "The answer service did not respond in time".to_string()
            }
            MediqueryError::HttpError(e) if e.is_connect() => {
                format!("Could not reach the answer service: {}", e)
            }
            MediqueryError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration for '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MediqueryError::HttpError(_) => {
                "Check that the backend is running and --backend-url points at it"
            }
            MediqueryError::StatusError { status, .. } if *status >= 500 => {
                "The answer service failed; try again or rephrase the question"
            }
            MediqueryError::StatusError { .. } => "Check the question and the backend URL",
            MediqueryError::MalformedResponseError { .. }
            | MediqueryError::SerializationError(_) => {
                "The backend returned an unexpected payload; check its version"
            }
            MediqueryError::ConfigError { .. }
            | MediqueryError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line arguments"
            }
            MediqueryError::EmptyQuestionError => "Type a question before submitting",
            MediqueryError::RequestPendingError => "Wait for the current request to finish",
            MediqueryError::IoError(_) => "Check file permissions and paths",
            MediqueryError::RenderError { .. } => "Try a different --format",
        }
    }
}

pub type Result<T> = std::result::Result<T, MediqueryError>;
