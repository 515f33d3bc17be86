use thiserror::Error;

use crate::model::StoreId;

/// A caller-supplied value violated a precondition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors returned by [`crate::repository::StoreRepository`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    #[error("store {id} does not exist")]
    DoesNotExist { id: StoreId },

    #[error("store {id} already exists")]
    AlreadyExists { id: StoreId },

    #[error("{operation} failed: {source}")]
    OperationFailed {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap a backend failure for `operation` without leaking the driver type.
    pub fn operation_failed(
        operation: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::OperationFailed {
            operation,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::DoesNotExist { .. } => ErrorKind::DoesNotExist,
            Self::AlreadyExists { .. } => ErrorKind::Conflict,
            Self::OperationFailed { .. } => ErrorKind::OperationFailed,
        }
    }
}

/// Which side of the boundary is at fault for a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    DoesNotExist,
    Conflict,
    OperationFailed,
}

impl ErrorKind {
    /// `true` when the request itself was at fault (a 4xx at the HTTP layer).
    #[must_use]
    pub fn is_client_error(self) -> bool {
        !matches!(self, Self::OperationFailed)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedFileParse(#[from] serde_yaml::Error),

    #[error("seed file validation failed: {0}")]
    Validation(String),
}
