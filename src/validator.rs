use crate::{
    error::{Error, Result},
    response::ValidationResponse,
    transport::{FormParams, HttpTransport, Transport},
};
use std::fmt;
use std::io::Read;

/// Google's siteverify endpoint
pub const SITE_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Validates reCAPTCHA tokens against Google's siteverify endpoint.
///
/// Every call is a single blocking round trip through the configured [`Transport`].
/// Nothing is cached and nothing is retried.
#[derive(Clone)]
pub struct Validator<T = HttpTransport> {
    secret: String,
    transport: T,
}

impl Validator {
    /// Create a validator that talks to Google over HTTPS.
    ///
    /// Fails with [`Error::InvalidConfiguration`] if `secret` is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        Self::with_transport(secret, HttpTransport::new())
    }
}

impl<T: Transport> Validator<T> {
    /// Create a validator that submits requests through `transport`
    pub fn with_transport(secret: impl Into<String>, transport: T) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(Error::InvalidConfiguration("no secret key given"));
        }

        Ok(Self { secret, transport })
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Check whether `token` is valid
    pub fn validate_token(&self, token: &str) -> Result<ValidationResponse> {
        self.validate(token, None)
    }

    /// Check whether `token` is valid for a client at `ip_address`
    pub fn validate_token_for_ip(
        &self,
        token: &str,
        ip_address: &str,
    ) -> Result<ValidationResponse> {
        self.validate(token, Some(ip_address))
    }

    fn validate(&self, token: &str, ip_address: Option<&str>) -> Result<ValidationResponse> {
        let mut params = FormParams::new();
        params.add("secret", self.secret.as_str());
        params.add("response", token);
        if let Some(ip) = ip_address {
            params.add("remoteip", ip);
        }

        tracing::debug!(
            token_len = token.len(),
            with_remote_ip = ip_address.is_some(),
            "submitting reCAPTCHA token for verification"
        );

        let mut body = self
            .transport
            .post_form(SITE_VERIFY_URL, &params)
            .map_err(Error::Transport)?;

        let mut data = Vec::new();
        let read = body.read_to_end(&mut data);
        drop(body);
        read.map_err(Error::Body)?;

        let response: ValidationResponse = serde_json::from_slice(&data)?;

        tracing::debug!(
            success = response.success,
            errors = ?response.errors,
            "reCAPTCHA verification finished"
        );

        Ok(response)
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}
