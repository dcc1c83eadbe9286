//! Text-level codec and the process-wide default configuration.
//!
//! Every call site can carry its own [`Codec`]; the free functions here read
//! the process-wide instance instead. Replacing the global is an atomic
//! publish: operations already holding an [`Arc`] to the prior instance keep
//! it until they finish.

use std::sync::{Arc, OnceLock, RwLock};

use serde_json::Value;

use crate::{Error, Request, Response, Result};

/// Encode/decode configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codec {
    pretty: bool,
}

impl Codec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit human-readable JSON instead of the compact form.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn decode_value(&self, text: &str) -> Result<Value> {
        serde_json::from_str(text).map_err(|e| Error::Parse(e.to_string()))
    }

    pub fn decode_request(&self, text: &str) -> Result<Request> {
        tracing::trace!(len = text.len(), "decoding request");

        let request = Request::try_from(&self.decode_value(text)?)?;

        tracing::debug!(
            method = %request.method,
            notification = request.is_notification(),
            "decoded request"
        );

        Ok(request)
    }

    pub fn decode_response(&self, text: &str) -> Result<Response> {
        tracing::trace!(len = text.len(), "decoding response");

        let response = Response::try_from(&self.decode_value(text)?)?;

        tracing::debug!(
            result = response.has_result(),
            error = response.has_error(),
            "decoded response"
        );

        Ok(response)
    }

    pub fn encode_value(&self, value: &Value) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };

        text.map_err(|e| Error::Parse(e.to_string()))
    }

    pub fn encode_request(&self, request: &Request) -> Result<String> {
        self.encode_value(&Value::from(request))
    }

    pub fn encode_response(&self, response: &Response) -> Result<String> {
        self.encode_value(&Value::from(response))
    }
}

static GLOBAL: OnceLock<RwLock<Arc<Codec>>> = OnceLock::new();

fn cell() -> &'static RwLock<Arc<Codec>> {
    GLOBAL.get_or_init(|| RwLock::new(Arc::new(Codec::default())))
}

/// Snapshot of the process-wide codec.
pub fn global() -> Arc<Codec> {
    let guard = cell().read().unwrap_or_else(|e| e.into_inner());

    Arc::clone(&guard)
}

/// Atomically publishes `codec` as the new process-wide default, visible to
/// subsequent [`global`] calls.
pub fn set_global(codec: Codec) {
    let mut guard = cell().write().unwrap_or_else(|e| e.into_inner());

    *guard = Arc::new(codec);
}

pub fn decode_request(text: &str) -> Result<Request> {
    global().decode_request(text)
}

pub fn decode_response(text: &str) -> Result<Response> {
    global().decode_response(text)
}

pub fn encode_request(request: &Request) -> Result<String> {
    global().encode_request(request)
}

pub fn encode_response(response: &Response) -> Result<String> {
    global().encode_response(response)
}
