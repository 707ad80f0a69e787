//! Testing utilities for interhook.
//!
//! This module provides utilities to make testing handlers and dispatch
//! behaviour easier.
//!
//! # Features
//!
//! - [`RecordingSink`]: A response sink that records every write
//! - [`RecordingHandler`]: A handler that logs its label and returns a configured outcome
//! - [`CountingHandler`]: A handler that counts invocations
//! - [`fixtures`]: Minimal interaction bodies for each route kind

use interhook_core::{
    BoxError, Context, Flow, Handler, InteractionCallback, MessagePayload, ResponseError,
    ResponseSink,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Sink
// ============================================================================

/// One complete response as seen by a [`RecordingSink`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedResponse {
    /// Status code.
    pub status: u16,
    /// Headers in write order, names as given.
    pub headers: Vec<(String, String)>,
    /// Body, if any.
    pub body: Option<Vec<u8>>,
    /// Whether `end` was called.
    pub ended: bool,
}

impl RecordedResponse {
    /// First header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded as JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

/// A response sink that records what was written.
///
/// Rejects a second `write_head` with [`ResponseError::AlreadySent`] and
/// counts every attempt, so tests can assert exactly one response.
#[derive(Debug, Default)]
pub struct RecordingSink {
    response: Mutex<Option<RecordedResponse>>,
    attempts: AtomicUsize,
}

impl RecordingSink {
    /// Create a new sink, already shared.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The recorded response, if one was started.
    pub fn response(&self) -> Option<RecordedResponse> {
        self.response.lock().unwrap().clone()
    }

    /// Status of the recorded response.
    pub fn status(&self) -> Option<u16> {
        self.response.lock().unwrap().as_ref().map(|r| r.status)
    }

    /// Number of `write_head` calls, including rejected ones.
    pub fn write_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ResponseSink for RecordingSink {
    fn headers_sent(&self) -> bool {
        self.response.lock().unwrap().is_some()
    }

    fn write_head(&self, status: u16, headers: &[(&str, &str)]) -> Result<(), ResponseError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let mut slot = self.response.lock().unwrap();
        if slot.is_some() {
            return Err(ResponseError::AlreadySent);
        }
        *slot = Some(RecordedResponse {
            status,
            headers: headers
                .iter()
                .map(|(n, v)| ((*n).to_owned(), (*v).to_owned()))
                .collect(),
            body: None,
            ended: false,
        });
        Ok(())
    }

    fn end(&self, body: Option<Vec<u8>>) -> Result<(), ResponseError> {
        let mut slot = self.response.lock().unwrap();
        match slot.as_mut() {
            Some(response) if !response.ended => {
                response.body = body;
                response.ended = true;
                Ok(())
            }
            _ => Err(ResponseError::Closed),
        }
    }
}

// ============================================================================
// Recording Handler
// ============================================================================

/// Shared, ordered log of handler labels.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels recorded so far, in call order.
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, label: &str) {
        self.0.lock().unwrap().push(label.to_owned());
    }
}

#[derive(Debug, Clone)]
enum Outcome {
    Flow(Flow),
    Fail(String),
}

/// A handler that appends its label to a [`CallLog`].
///
/// Continues by default. Can be configured to halt, to fail, or to write
/// a reply before returning.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::new();
/// builder.middleware(handlers![RecordingHandler::new("auth", &log)]);
/// builder.button("ok", handlers![RecordingHandler::new("ok", &log).halting()])?;
///
/// // ... dispatch ...
/// assert_eq!(log.entries(), ["auth", "ok"]);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingHandler {
    label: String,
    log: CallLog,
    outcome: Outcome,
    reply: Option<String>,
}

impl RecordingHandler {
    /// Create a recording handler that continues.
    pub fn new(label: impl Into<String>, log: &CallLog) -> Self {
        Self {
            label: label.into(),
            log: log.clone(),
            outcome: Outcome::Flow(Flow::Continue),
            reply: None,
        }
    }

    /// Return [`Flow::Halt`] instead.
    pub fn halting(mut self) -> Self {
        self.outcome = Outcome::Flow(Flow::Halt);
        self
    }

    /// Fail with the given message instead.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.outcome = Outcome::Fail(message.into());
        self
    }

    /// Write a message reply before returning.
    pub fn replying(mut self, content: impl Into<String>) -> Self {
        self.reply = Some(content.into());
        self
    }
}

impl<C: Send + Sync + 'static> Handler<C> for RecordingHandler {
    async fn call(&self, ctx: Context<C>) -> Result<Flow, BoxError> {
        self.log.push(&self.label);

        if let Some(content) = &self.reply {
            let message = MessagePayload::from(content.as_str());
            ctx.responder()
                .send(&InteractionCallback::ChannelMessage(message))?;
        }

        match &self.outcome {
            Outcome::Flow(flow) => Ok(*flow),
            Outcome::Fail(message) => Err(message.clone().into()),
        }
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingHandler::new();
/// builder.unknown(handlers![counter.clone()]);
///
/// // ... dispatch ...
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<C: Send + Sync + 'static> Handler<C> for CountingHandler {
    async fn call(&self, _ctx: Context<C>) -> Result<Flow, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(Flow::Continue)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Minimal interaction bodies.
pub mod fixtures {
    use interhook_core::Interaction;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn decode(raw: Value) -> Arc<Interaction> {
        Arc::new(Interaction::from_value(raw).expect("fixture is a valid interaction"))
    }

    /// A ping.
    pub fn ping() -> Arc<Interaction> {
        decode(json!({"id": "1", "application_id": "10", "token": "t", "type": 1}))
    }

    /// A slash command without options.
    pub fn command(name: &str) -> Arc<Interaction> {
        decode(json!({
            "id": "2", "application_id": "10", "token": "t", "type": 2,
            "data": {"id": "20", "name": name, "type": 1}
        }))
    }

    /// A button press.
    pub fn button(custom_id: &str) -> Arc<Interaction> {
        component(custom_id, 2)
    }

    /// A component of the given raw type.
    pub fn component(custom_id: &str, component_type: u8) -> Arc<Interaction> {
        decode(json!({
            "id": "3", "application_id": "10", "token": "t", "type": 3,
            "data": {"custom_id": custom_id, "component_type": component_type, "values": []}
        }))
    }

    /// A modal submission.
    pub fn modal(custom_id: &str) -> Arc<Interaction> {
        decode(json!({
            "id": "4", "application_id": "10", "token": "t", "type": 5,
            "data": {"custom_id": custom_id, "components": []}
        }))
    }

    /// An autocomplete request with the given live options.
    pub fn autocomplete(command: &str, options: Value) -> Arc<Interaction> {
        decode(json!({
            "id": "5", "application_id": "10", "token": "t", "type": 4,
            "data": {"id": "20", "name": command, "type": 1, "options": options}
        }))
    }

    /// An interaction type the model does not know.
    pub fn unknown(interaction_type: u8) -> Arc<Interaction> {
        decode(json!({"id": "6", "application_id": "10", "token": "t", "type": interaction_type}))
    }
}
