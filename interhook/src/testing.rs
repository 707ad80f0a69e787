//! Testing utilities for the server facade.
//!
//! - [`MockRequest`]: An in-memory [`IncomingRequest`]
//! - [`sign`]: Produce the signature header value for a body
//! - [`test_key`]: A fixed signing key and its hex public key

use crate::gate::{BodyError, IncomingRequest, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use ed25519_dalek::{Signer, SigningKey};

pub use interhook_std::testing::{
    CallLog, CountingHandler, RecordedResponse, RecordingHandler, RecordingSink, fixtures,
};

/// A deterministic signing key and its hex-encoded public key.
pub fn test_key() -> (SigningKey, String) {
    let key = SigningKey::from_bytes(&[7u8; 32]);
    let public = hex::encode(key.verifying_key().to_bytes());
    (key, public)
}

/// Hex signature of `timestamp || body`.
pub fn sign(key: &SigningKey, timestamp: &str, body: &[u8]) -> String {
    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);
    hex::encode(key.sign(&message).to_bytes())
}

/// An in-memory request.
#[derive(Debug, Clone)]
pub struct MockRequest {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    body_error: Option<String>,
    body_limit: Option<usize>,
}

impl MockRequest {
    /// A request with no headers and an empty body.
    pub fn new(method: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            headers: Vec::new(),
            body: Vec::new(),
            body_error: None,
            body_limit: None,
        }
    }

    /// A `GET` request.
    pub fn get(target: impl Into<String>) -> Self {
        Self::new("GET", target)
    }

    /// A JSON `POST` without signature headers.
    pub fn post(target: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new("POST", target)
            .header("content-type", "application/json")
            .body(body)
    }

    /// A JSON `POST` signed with `key`.
    pub fn signed(target: impl Into<String>, body: impl Into<Vec<u8>>, key: &SigningKey) -> Self {
        let body = body.into();
        let timestamp = "1700000000";
        let signature = sign(key, timestamp, &body);
        Self::post(target, body)
            .header(SIGNATURE_HEADER, signature)
            .header(TIMESTAMP_HEADER, timestamp)
    }

    /// Add or replace a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Remove a header.
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self
    }

    /// Replace the body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Make body retrieval fail with `message`.
    pub fn failing_body(mut self, message: impl Into<String>) -> Self {
        self.body_error = Some(message.into());
        self
    }

    /// Refuse bodies longer than `limit` bytes.
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = Some(limit);
        self
    }
}

impl IncomingRequest for MockRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    async fn into_body(self) -> Result<Vec<u8>, BodyError> {
        if let Some(message) = self.body_error {
            return Err(BodyError::Transport(message.into()));
        }
        match self.body_limit {
            Some(limit) if self.body.len() > limit => Err(BodyError::TooLarge { limit }),
            _ => Ok(self.body),
        }
    }
}
