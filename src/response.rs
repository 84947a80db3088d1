use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Reason reported by the provider for a failed verification.
///
/// Codes not known to this crate are kept verbatim in [`ErrorCode::Other`].
#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub enum ErrorCode {
    /// The secret parameter is missing
    MissingInputSecret,
    /// The secret parameter is invalid or malformed
    InvalidInputSecret,
    /// The response parameter is missing
    MissingInputResponse,
    /// The response parameter is invalid or malformed
    InvalidInputResponse,
    /// The request is invalid or malformed
    BadRequest,
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::MissingInputSecret => "missing-input-secret",
            Self::InvalidInputSecret => "invalid-input-secret",
            Self::MissingInputResponse => "missing-input-response",
            Self::InvalidInputResponse => "invalid-input-response",
            Self::BadRequest => "bad-request",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "missing-input-secret" => Self::MissingInputSecret,
            "invalid-input-secret" => Self::InvalidInputSecret,
            "missing-input-response" => Self::MissingInputResponse,
            "invalid-input-response" => Self::InvalidInputResponse,
            "bad-request" => Self::BadRequest,
            _ => Self::Other(code),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a token validation as reported by the provider
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "WireResponse")]
pub struct ValidationResponse {
    /// Whether the token was accepted
    pub success: bool,
    /// When the challenge was loaded. `None` if the provider omitted it.
    pub challenge_ts: Option<DateTime<Utc>>,
    /// Hostname of the site where the challenge was solved
    pub hostname: Option<String>,
    /// Package name of the Android app where the challenge was solved
    pub package_name: Option<String>,
    /// Error codes in the order the provider sent them
    pub errors: Vec<ErrorCode>,
}

impl ValidationResponse {
    pub fn is_success(&self) -> bool {
        self.success
    }
}

#[derive(Deserialize)]
struct WireResponse {
    success: bool,
    #[serde(default)]
    challenge_ts: Option<String>,
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default, rename = "apk_package_name")]
    package_name: Option<String>,
    #[serde(default, rename = "error-codes")]
    error_codes: Option<Vec<ErrorCode>>,
}

impl TryFrom<WireResponse> for ValidationResponse {
    type Error = chrono::ParseError;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        let challenge_ts = match wire.challenge_ts.as_deref() {
            None | Some("") => None,
            Some(ts) => Some(DateTime::parse_from_rfc3339(ts)?.with_timezone(&Utc)),
        };

        Ok(Self {
            success: wire.success,
            challenge_ts,
            hostname: wire.hostname,
            package_name: wire.package_name,
            errors: wire.error_codes.unwrap_or_default(),
        })
    }
}
