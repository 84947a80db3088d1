//! # axum-recaptcha
//!
//! Google [reCAPTCHA](https://developers.google.com/recaptcha) token validation, with
//! optional verification middleware for [Axum](https://github.com/tokio-rs/axum).
//!
//! The browser widget hands your frontend an opaque token. This crate submits that token,
//! together with your secret key and optionally the client's IP address, to Google's
//! `siteverify` endpoint and decodes the reply into a [`ValidationResponse`].
//!
//! ## Features
//!
//! - 🔒 Blocking [`Validator`] with a typed response and error codes
//! - 🕒 Challenge timestamps parsed into [`chrono::DateTime`]
//! - 🔌 Swappable [`Transport`] for tests, any matching closure will do
//! - 🎯 Tower middleware layer for Axum applications
//!
//! ## Validating a token
//!
//! ```rust,no_run
//! use axum_recaptcha::Validator;
//!
//! # fn main() -> Result<(), axum_recaptcha::Error> {
//! let validator = Validator::new("your-secret-key")?;
//!
//! let response = validator.validate_token_for_ip("token-from-widget", "203.0.113.7")?;
//! if !response.success {
//!     for code in &response.errors {
//!         eprintln!("rejected: {code}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Validation blocks the calling thread for the duration of the HTTP round trip. In async
//! code run it on a blocking thread, e.g. with `tokio::task::spawn_blocking`, which is what
//! the middleware does.
//!
//! A token Google rejects is not an [`Error`]: the call succeeds and
//! [`ValidationResponse::success`] is `false`. Errors are reserved for an empty secret,
//! transport failures and undecodable responses.
//!
//! ## Custom transport
//!
//! ```rust
//! use axum_recaptcha::{BoxError, FormParams, ResponseBody, Validator};
//! use std::io::Cursor;
//!
//! let fake = |_url: &str, _params: &FormParams| -> Result<ResponseBody, BoxError> {
//!     Ok(Box::new(Cursor::new(br#"{"success": true}"#.to_vec())))
//! };
//!
//! let validator = Validator::with_transport("secret", fake).unwrap();
//! assert!(validator.validate_token("token").unwrap().success);
//! ```
//!
//! ## Middleware
//!
//! ```rust,no_run
//! use axum::{routing::post, Router};
//! use axum_recaptcha::{RecaptchaLayer, VerifiedRecaptcha};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .route("/api/protected", post(protected_handler))
//!         .layer(RecaptchaLayer::from_secret("your-secret-key").unwrap());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
//!         .await
//!         .unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//!
//! async fn protected_handler(verified: VerifiedRecaptcha) -> String {
//!     format!("Solved on {:?}", verified.0.hostname)
//! }
//! ```
//!
//! The token is read from the `g-recaptcha-response` header. When the server is started with
//! `into_make_service_with_connect_info::<SocketAddr>()` the peer address is sent along as
//! `remoteip`.
//!
//! ## Response Codes
//!
//! - `400 Bad Request`: token header is missing
//! - `403 Forbidden`: Google rejected the token
//! - `500 Internal Server Error`: error communicating with Google or decoding its reply

mod error;
mod layer;
mod middleware;
#[cfg(test)]
mod mock;
mod response;
mod transport;
mod validator;

pub use error::{Error, Result};
pub use layer::RecaptchaLayer;
pub use middleware::RecaptchaMiddleware;
pub use response::{ErrorCode, ValidationResponse};
pub use transport::{BoxError, FormParams, HttpTransport, ResponseBody, Transport};
pub use validator::{SITE_VERIFY_URL, Validator};

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use std::time::Duration;

/// Configuration for the reCAPTCHA middleware
#[derive(Clone, Debug)]
pub struct RecaptchaConfig {
    /// reCAPTCHA secret key
    pub secret: String,
    /// Header carrying the token (default: "g-recaptcha-response")
    pub header_name: String,
    /// Request timeout for the HTTP transport (default: reqwest's)
    pub timeout: Option<Duration>,
}

impl RecaptchaConfig {
    /// Create a new config with the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            header_name: "g-recaptcha-response".to_string(),
            timeout: None,
        }
    }

    /// Set a custom header name
    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    /// Limit how long a verification request may take
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Extractor available in handlers after successful verification
#[derive(Clone, Debug)]
pub struct VerifiedRecaptcha(pub ValidationResponse);

impl<S> FromRequestParts<S> for VerifiedRecaptcha
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedRecaptcha>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
