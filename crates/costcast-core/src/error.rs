use thiserror::Error;

/// Root error type for the collaborator boundaries (config, pricing, storage, import).
///
/// The calculation path itself never produces one of these.
#[derive(Error, Debug)]
pub enum CostcastError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Pricing source error: {message}")]
    Pricing {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Import failed: {message}")]
    Import { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CostcastError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn pricing(message: impl Into<String>) -> Self {
        Self::Pricing {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub fn import(message: impl Into<String>) -> Self {
        Self::Import {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CostcastError>;
