use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid tenant identifier: {0:?}")]
    InvalidTenant(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Source and destination are the same tenant: {0}")]
    SameTenant(String),

    #[error("Stored document for {tenant} has an unexpected shape, refusing to overwrite it: {reason}")]
    IncompatibleDocument { tenant: String, reason: String },

    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether the error was caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidTenant(_)
                | StoreError::InvalidPayload(_)
                | StoreError::MissingField(_)
                | StoreError::SameTenant(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
