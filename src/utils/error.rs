use crate::domain::model::WhoisRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PivotError {
    #[error("Whoxy API error: {reason}")]
    ApiError { reason: String },

    #[error("API request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Unexpected API payload: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Reverse WHOIS failed on page {page} of {total_pages}: {source}")]
    PaginationError {
        page: u32,
        total_pages: u32,
        partial: Vec<WhoisRecord>,
        #[source]
        source: Box<PivotError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Api,
    Transport,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code; every error exits non-zero.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Medium => 2,
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

impl PivotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError { .. } => ErrorCategory::Api,
            Self::PaginationError { source, .. } => source.category(),
            Self::TransportError(_) | Self::DecodeError(_) => ErrorCategory::Transport,
            Self::IoError(_) => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Api | ErrorCategory::Io => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// Records already fetched before a reverse lookup broke off, if any.
    pub fn partial_records(&self) -> &[WhoisRecord] {
        match self {
            Self::PaginationError { partial, .. } => partial,
            _ => &[],
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError { .. } => {
                "Check the API key and the remaining balance on your Whoxy account"
            }
            Self::PaginationError { .. } => {
                "Retry the lookup later; pages already fetched were reported above"
            }
            Self::TransportError(_) => {
                "Check network connectivity and the configured Whoxy URL, or raise timeout_seconds"
            }
            Self::DecodeError(_) => "Verify that the configured URL points at the Whoxy API",
            Self::IoError(_) => "Check that the output directory exists and is writable",
            Self::MissingConfigError { .. } => {
                "Set the value in the config file or pass it on the command line"
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => "Fix the configuration file and try again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError { reason } => format!("The WHOIS service rejected the request: {reason}"),
            Self::PaginationError {
                page,
                total_pages,
                partial,
                ..
            } => format!(
                "Reverse lookup stopped at page {page}/{total_pages} ({} records fetched before the failure)",
                partial.len()
            ),
            Self::TransportError(e) if e.is_timeout() => {
                "The WHOIS service did not answer in time".to_string()
            }
            Self::TransportError(_) => "Could not reach the WHOIS service".to_string(),
            Self::MissingConfigError { field } => format!("Missing {field}"),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PivotError>;
