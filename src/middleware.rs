use crate::{Validator, VerifiedRecaptcha, transport::Transport};
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, Response, StatusCode},
    response::IntoResponse,
};
use futures_util::future::BoxFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower_service::Service;

/// Middleware that verifies reCAPTCHA tokens
pub struct RecaptchaMiddleware<S, T> {
    inner: S,
    validator: Arc<Validator<T>>,
    header_name: String,
}

impl<S, T> RecaptchaMiddleware<S, T> {
    pub fn new(inner: S, validator: Arc<Validator<T>>, header_name: String) -> Self {
        Self {
            inner,
            validator,
            header_name,
        }
    }
}

impl<S: Clone, T> Clone for RecaptchaMiddleware<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            validator: self.validator.clone(),
            header_name: self.header_name.clone(),
        }
    }
}

impl<S, T> Service<Request<Body>> for RecaptchaMiddleware<S, T>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    T: Transport + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let validator = self.validator.clone();
        let inner = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, inner);

        let token = req
            .headers()
            .get(&self.header_name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let remote_ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Box::pin(async move {
            let Some(token) = token else {
                return Ok((StatusCode::BAD_REQUEST, "Missing reCAPTCHA token").into_response());
            };

            // The validator blocks on network I/O
            let outcome = tokio::task::spawn_blocking(move || match remote_ip {
                Some(ip) => validator.validate_token_for_ip(&token, &ip),
                None => validator.validate_token(&token),
            })
            .await;

            match outcome {
                Ok(Ok(response)) if response.success => {
                    req.extensions_mut().insert(VerifiedRecaptcha(response));
                    inner.call(req).await
                }
                Ok(Ok(response)) => {
                    tracing::warn!(errors = ?response.errors, "reCAPTCHA verification failed");
                    Ok((StatusCode::FORBIDDEN, "reCAPTCHA verification failed").into_response())
                }
                Ok(Err(e)) => {
                    tracing::error!("reCAPTCHA verification error: {e}");
                    Ok((StatusCode::INTERNAL_SERVER_ERROR, "Verification error").into_response())
                }
                Err(e) => {
                    tracing::error!("reCAPTCHA verification task failed: {e}");
                    Ok((StatusCode::INTERNAL_SERVER_ERROR, "Verification error").into_response())
                }
            }
        })
    }
}
