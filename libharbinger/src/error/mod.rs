//! Error types for Harbinger
//!
//! Every fallible operation in the library returns [`HarbingerError`]. Errors
//! are never recovered internally; they are returned to the immediate caller.

use std::time::Duration;
use thiserror::Error;


type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for Harbinger operations
#[derive(Error, Debug)]
pub enum HarbingerError {
    /// The notification event could not be rendered into a wire payload
    #[error("Render error: {message}")]
    Render {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The outbound request could not be built (malformed endpoint, bad header)
    #[error("Request error: {message}")]
    Request {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Transport-level failure (connection refused, DNS, reset)
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The delivery did not complete before its deadline
    #[error("Deadline exceeded after {timeout:?}")]
    DeadlineExceeded { timeout: Duration },

    /// The caller cancelled the delivery
    #[error("Delivery cancelled")]
    Cancelled,

    /// The remote inventory service rejected the call
    #[error("rpc error: code = {:?} desc = {}", .0.code(), .0.message())]
    Rpc(#[from] tonic::Status),

    /// The inventory service endpoint could not be set up
    #[error("Connection error: {message}")]
    Connect {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration errors (invalid config file, missing settings)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    /// Local validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

/// Result type alias for Harbinger operations
pub type Result<T> = std::result::Result<T, HarbingerError>;

impl HarbingerError {
    /// Creates a new render error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libharbinger::error::HarbingerError;
    ///
    /// let err = HarbingerError::render("entry has no image");
    /// assert!(matches!(err, HarbingerError::Render { .. }));
    /// ```
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new render error with a source error.
    pub fn render_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Render {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new request construction error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libharbinger::error::HarbingerError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::InvalidInput, "bad uri");
    /// let err = HarbingerError::request_with_source("invalid endpoint", io_err);
    /// assert!(matches!(err, HarbingerError::Request { .. }));
    /// ```
    pub fn request_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Request {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new transport error with a source error.
    pub fn transport_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new deadline exceeded error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libharbinger::error::HarbingerError;
    /// use std::time::Duration;
    ///
    /// let err = HarbingerError::deadline_exceeded(Duration::from_secs(10));
    /// assert!(err.is_deadline_exceeded());
    /// ```
    pub fn deadline_exceeded(timeout: Duration) -> Self {
        Self::DeadlineExceeded { timeout }
    }

    /// Creates a new connection error with a source error.
    pub fn connect_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connect {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libharbinger::error::HarbingerError;
    ///
    /// let err = HarbingerError::config("invalid config file", Some("/etc/harbinger.yml"));
    /// assert!(matches!(err, HarbingerError::Config { .. }));
    /// ```
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns true if the error is a delivery deadline expiry.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }

    /// Returns true if repeating the same call could succeed.
    ///
    /// Transport failures and deadline expiry are transient. Rendering,
    /// request construction, configuration and validation errors are not,
    /// and neither is a deliberate cancellation. Remote errors are retryable
    /// only for the gRPC codes that signal a transient condition.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::DeadlineExceeded { .. } => true,
            Self::Rpc(status) => matches!(
                status.code(),
                tonic::Code::Unavailable
                    | tonic::Code::DeadlineExceeded
                    | tonic::Code::ResourceExhausted
                    | tonic::Code::Aborted
            ),
            _ => false,
        }
    }
}

impl From<config::ConfigError> for HarbingerError {
    fn from(e: config::ConfigError) -> Self {
        HarbingerError::config_with_source("Failed to build configuration", None::<&str>, e)
    }
}
