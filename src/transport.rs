use serde::Serialize;
use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Response body handed back by a [`Transport`]. Dropping it releases the underlying connection.
pub type ResponseBody = Box<dyn Read + Send>;

/// Ordered form fields submitted to the verification endpoint
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct FormParams(Vec<(&'static str, String)>);

impl FormParams {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, key: &'static str, value: impl Into<String>) {
        self.0.push((key, value.into()));
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Submits url-encoded form data and returns the response body.
///
/// This is the only seam between the validator and the network. Any closure with the
/// matching signature is a transport too, which keeps test doubles to a few lines.
pub trait Transport: Send + Sync {
    fn post_form(&self, url: &str, params: &FormParams) -> Result<ResponseBody, BoxError>;
}

impl<F> Transport for F
where
    F: Fn(&str, &FormParams) -> Result<ResponseBody, BoxError> + Send + Sync,
{
    fn post_form(&self, url: &str, params: &FormParams) -> Result<ResponseBody, BoxError> {
        self(url, params)
    }
}

/// Default transport backed by a blocking [`reqwest`] client
///
/// The client is built on first use. Without [`HttpTransport::with_timeout`] reqwest's
/// own default timeout applies.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    timeout: Option<Duration>,
    client: OnceLock<reqwest::blocking::Client>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort requests that take longer than `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            client: OnceLock::new(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, reqwest::Error> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(self.client.get_or_init(|| client))
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, url: &str, params: &FormParams) -> Result<ResponseBody, BoxError> {
        let response = self.client()?.post(url).form(params).send()?;

        Ok(Box::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_params_keep_insertion_order() {
        let mut params = FormParams::new();
        params.add("secret", "s");
        params.add("response", "r");

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("secret", "s"), ("response", "r")]);
        assert_eq!(params.get("response"), Some("r"));
        assert!(!params.contains_key("remoteip"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_closure_is_a_transport() {
        let transport = |url: &str, params: &FormParams| -> Result<ResponseBody, BoxError> {
            let body = format!("{url}|{}", params.get("response").unwrap_or_default());
            Ok(Box::new(std::io::Cursor::new(body.into_bytes())))
        };

        let mut params = FormParams::new();
        params.add("response", "token");

        let mut body = String::new();
        transport
            .post_form("https://example.com", &params)
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();

        assert_eq!(body, "https://example.com|token");
    }

    #[test]
    fn test_http_transport_timeout() {
        assert_eq!(HttpTransport::new().timeout(), None);
        assert_eq!(
            HttpTransport::with_timeout(Duration::from_secs(5)).timeout(),
            Some(Duration::from_secs(5))
        );
    }
}
