use crate::transport::BoxError;

/// Errors returned while constructing a [`Validator`](crate::Validator) or validating a token.
///
/// A token the provider rejects is not an error; it comes back as a
/// [`ValidationResponse`](crate::ValidationResponse) with `success == false`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The validator was configured with an unusable value, e.g. an empty secret.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// The transport failed to deliver the request. The underlying error is passed through as-is.
    #[error(transparent)]
    Transport(BoxError),

    /// Reading the response body failed.
    #[error("failed to read verification response body: {0}")]
    Body(#[source] std::io::Error),

    /// The response body was not a valid verification payload.
    #[error("failed to decode verification response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
