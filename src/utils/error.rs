use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Configuration error: unknown service '{service}'")]
    UnknownService { service: String },

    #[error("Transport error calling {service} ({url}): {source}")]
    Transport {
        service: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error calling {service} ({url}): {status} {status_text}")]
    HttpStatus {
        service: String,
        url: String,
        status: u16,
        status_text: String,
    },

    #[error("Failed to decode response from {service} ({url}): {source}")]
    Decode {
        service: String,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RouterError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RouterError::Transport { .. } => ErrorSeverity::Medium,
            RouterError::HttpStatus { .. } | RouterError::Decode { .. } => ErrorSeverity::High,
            RouterError::UnknownService { .. }
            | RouterError::IoError(_)
            | RouterError::ConfigError { .. }
            | RouterError::InvalidConfigValueError { .. }
            | RouterError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// True for errors raised before any request was sent.
    pub fn is_configuration(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// HTTP status code, when the server answered with a failure status.
    pub fn status(&self) -> Option<u16> {
        match self {
            RouterError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RouterError::UnknownService { service } => format!(
                "Add '{}' to the [services] table or pass --service {}=<url>",
                service, service
            ),
            RouterError::Transport { url, source, .. } if source.is_timeout() => {
                format!("Request to {} timed out; raise the timeout or check the service load", url)
            }
            RouterError::Transport { url, .. } => {
                format!("Check that the service behind {} is running and reachable", url)
            }
            RouterError::HttpStatus { status, .. } if *status >= 500 => {
                "The service reported an internal failure; check its logs".to_string()
            }
            RouterError::HttpStatus { .. } => {
                "Check the request path, method, headers and body".to_string()
            }
            RouterError::Decode { .. } => {
                "The service did not answer with JSON; check the path and Accept header".to_string()
            }
            RouterError::IoError(_) => "Check the configuration file path and permissions".to_string(),
            RouterError::ConfigError { .. }
            | RouterError::InvalidConfigValueError { .. }
            | RouterError::MissingConfigError { .. } => {
                "Fix the configuration file or command-line flags".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RouterError::UnknownService { service } => {
                format!("Service '{}' is not configured", service)
            }
            RouterError::Transport { service, .. } => {
                format!("Could not reach service '{}'", service)
            }
            RouterError::HttpStatus {
                service,
                status,
                status_text,
                ..
            } => format!("Service '{}' answered {} {}", service, status, status_text),
            RouterError::Decode { service, .. } => {
                format!("Service '{}' returned a body that is not valid JSON", service)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RouterError>;
