use crate::{
    RecaptchaConfig, RecaptchaMiddleware, Validator,
    error::Result,
    transport::{HttpTransport, Transport},
};
use std::sync::Arc;
use tower_layer::Layer;

/// Layer that applies reCAPTCHA verification middleware
pub struct RecaptchaLayer<T = HttpTransport> {
    validator: Arc<Validator<T>>,
    header_name: String,
}

impl RecaptchaLayer {
    /// Create a new reCAPTCHA layer with the given config
    pub fn new(config: RecaptchaConfig) -> Result<Self> {
        let transport = match config.timeout {
            Some(timeout) => HttpTransport::with_timeout(timeout),
            None => HttpTransport::new(),
        };
        let validator = Validator::with_transport(config.secret, transport)?;

        Ok(Self::from_validator(validator, config.header_name))
    }

    /// Create a new reCAPTCHA layer with just a secret key
    pub fn from_secret(secret: impl Into<String>) -> Result<Self> {
        Self::new(RecaptchaConfig::new(secret))
    }
}

impl<T: Transport> RecaptchaLayer<T> {
    /// Create a layer around an existing validator
    pub fn from_validator(validator: Validator<T>, header_name: impl Into<String>) -> Self {
        Self {
            validator: Arc::new(validator),
            header_name: header_name.into(),
        }
    }

    pub fn validator(&self) -> &Validator<T> {
        &self.validator
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }
}

impl<T> Clone for RecaptchaLayer<T> {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator.clone(),
            header_name: self.header_name.clone(),
        }
    }
}

impl<S, T> Layer<S> for RecaptchaLayer<T> {
    type Service = RecaptchaMiddleware<S, T>;

    fn layer(&self, inner: S) -> Self::Service {
        RecaptchaMiddleware::new(inner, self.validator.clone(), self.header_name.clone())
    }
}
