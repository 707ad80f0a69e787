//! # Payload gate
//!
//! Every request passes the gate before anything is decoded. Checks run in
//! a fixed order and the first failure answers the request itself:
//!
//! | check                        | failure                         |
//! |------------------------------|---------------------------------|
//! | method is `GET`              | `200 Server is alive!`          |
//! | method is `POST`             | `405`, `Allow: POST`            |
//! | target equals the endpoint   | `404 Bad Endpoint`              |
//! | `content-type` is JSON       | `415`                           |
//! | body within the size limit   | `413`                           |
//! | Ed25519 signature            | `401`                           |
//!
//! Transport failures while reading the body and malformed JSON in a
//! verified body are not protocol rejections; they are returned as
//! [`GateError`] so the caller sees them.

use crate::verify::Verifier;
use interhook_core::{BoxError, Interaction, ResponseError, ResponseSink};
use std::future::Future;
use thiserror::Error;

/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
/// Header carrying the signed timestamp.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Transport view of an inbound HTTP request.
pub trait IncomingRequest: Send {
    /// Request method, upper case.
    fn method(&self) -> &str;

    /// Request target: path plus query string, if any.
    fn target(&self) -> &str;

    /// Header value by case-insensitive name.
    fn header(&self, name: &str) -> Option<&str>;

    /// Read the full body.
    fn into_body(self) -> impl Future<Output = Result<Vec<u8>, BodyError>> + Send;
}

/// Why a request body could not be read.
#[derive(Error, Debug)]
pub enum BodyError {
    /// The body is larger than the transport accepts.
    #[error("request body exceeds {limit} bytes")]
    TooLarge {
        /// Maximum accepted size.
        limit: usize,
    },

    /// The transport failed while the body was being read.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
}

/// Errors the gate propagates instead of answering.
#[derive(Error, Debug)]
pub enum GateError {
    /// The transport failed to deliver the body.
    #[error("failed to read request body: {0}")]
    Body(#[source] BoxError),

    /// The verified body is not a valid interaction.
    #[error("invalid interaction payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// A rejection could not be written.
    #[error(transparent)]
    Response(#[from] ResponseError),
}

/// Result of passing a request through the gate.
#[derive(Debug)]
pub enum Admission {
    /// The request is authentic; the decoded interaction is ready to route.
    Accepted(Interaction),
    /// The gate answered the request with the given status.
    Terminated(u16),
}

/// Per-request admission checks for one endpoint and key.
#[derive(Debug, Clone)]
pub struct PayloadGate {
    endpoint: String,
    verifier: Verifier,
}

impl PayloadGate {
    /// Create a gate. The endpoint is normalised to start with `/`.
    pub fn new(endpoint: impl Into<String>, verifier: Verifier) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint.into()),
            verifier,
        }
    }

    /// The normalised endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run the checks, answering on the sink if any of them fails.
    pub async fn admit<R: IncomingRequest>(
        &self,
        request: R,
        sink: &dyn ResponseSink,
    ) -> Result<Admission, GateError> {
        tracing::debug!(
            method = request.method(),
            target = request.target(),
            "request received"
        );

        match request.method() {
            "POST" => {}
            "GET" => {
                sink.respond(
                    200,
                    &[("content-type", "text/plain")],
                    Some(b"Server is alive!".to_vec()),
                )?;
                return Ok(Admission::Terminated(200));
            }
            _ => {
                sink.respond(405, &[("allow", "POST")], None)?;
                return Ok(Admission::Terminated(405));
            }
        }

        if request.target() != self.endpoint {
            sink.respond(
                404,
                &[("content-type", "text/plain")],
                Some(b"Bad Endpoint".to_vec()),
            )?;
            return Ok(Admission::Terminated(404));
        }

        if request.header("content-type") != Some("application/json") {
            sink.respond(415, &[], None)?;
            return Ok(Admission::Terminated(415));
        }

        let signature = request.header(SIGNATURE_HEADER).map(str::to_owned);
        let timestamp = request.header(TIMESTAMP_HEADER).map(str::to_owned);

        let body = match request.into_body().await {
            Ok(body) => body,
            Err(BodyError::TooLarge { limit }) => {
                tracing::debug!(limit, "body too large");
                sink.respond(413, &[], None)?;
                return Ok(Admission::Terminated(413));
            }
            Err(BodyError::Transport(err)) => return Err(GateError::Body(err)),
        };
        tracing::debug!(length = body.len(), "body received");

        let authentic =
            self.verifier
                .verify_headers(signature.as_deref(), timestamp.as_deref(), &body);
        tracing::debug!(authentic, "signature checked");
        if !authentic {
            sink.respond(401, &[], None)?;
            return Ok(Admission::Terminated(401));
        }

        Ok(Admission::Accepted(Interaction::from_slice(&body)?))
    }
}

fn normalize_endpoint(endpoint: String) -> String {
    if endpoint.starts_with('/') {
        endpoint
    } else {
        format!("/{endpoint}")
    }
}
