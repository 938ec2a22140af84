use crate::config::Role;
use thiserror::Error;

/// A single configuration violation. Several may be reported together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{role} bucket is not set")]
    BucketNotSet { role: Role },

    #[error("tar format must be one of USTAR, PAX, GNU (got '{0}')")]
    InvalidTarFormat(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Cannot initialize {role} S3 client: {message}")]
    ClientConstruction { role: Role, message: String },

    #[error("cannot get next page: {0}")]
    ListingPage(#[source] Box<StorageError>),

    #[error("object {key} changed or disappeared since it was listed")]
    PreconditionFailed { key: String },

    #[error("cannot get object {key}: {source}")]
    ObjectFetch {
        key: String,
        #[source]
        source: Box<StorageError>,
    },

    #[error("cannot read manifest {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("operation cancelled: {0}")]
    Cancelled(String),

    /// Raw provider failure, wrapped by the caller with listing or object context.
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("cannot write records: {0}")]
    Output(#[from] std::io::Error),

    #[error("Error setting Ctrl+C handler: {0}")]
    Interrupt(#[from] ctrlc::Error),
}
