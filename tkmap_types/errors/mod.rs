use thiserror::Error;

pub mod map_error;
pub mod transport_error;

pub use map_error::MapError;
pub use transport_error::TransportError;

pub type Result<T, E = ApplicationError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for ApplicationError {
    fn from(err: anyhow::Error) -> Self {
        ApplicationError::Unknown(err.to_string())
    }
}
