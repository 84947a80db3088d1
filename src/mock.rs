use crate::transport::{BoxError, FormParams, ResponseBody, Transport};
use std::io::Cursor;
use std::sync::Mutex;

/// Transport double that records every call and answers with a canned reply
pub(crate) struct RecordingTransport {
    reply: Result<String, String>,
    calls: Mutex<Vec<(String, FormParams)>>,
}

impl RecordingTransport {
    pub(crate) fn replying(body: impl Into<String>) -> Self {
        Self {
            reply: Ok(body.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, FormParams)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn last_params(&self) -> FormParams {
        self.calls().pop().expect("transport was never called").1
    }
}

impl Transport for RecordingTransport {
    fn post_form(&self, url: &str, params: &FormParams) -> Result<ResponseBody, BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), params.clone()));

        match &self.reply {
            Ok(body) => Ok(Box::new(Cursor::new(body.clone().into_bytes()))),
            Err(message) => Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                message.clone(),
            ))),
        }
    }
}
