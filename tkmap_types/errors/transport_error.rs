use thiserror::Error;

/// Failures coming from the remote API collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Http(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API returned an error: {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
