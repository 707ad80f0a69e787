//! # Response lifecycle
//!
//! A [`ResponseSink`] is the transport's half of one HTTP exchange. The core
//! only needs three things from it: whether a response has already started,
//! a way to write the status line and headers, and a way to finish the body.
//!
//! Handlers never touch the sink directly. They get a [`Responder`], which
//! knows which callbacks are valid for the interaction's kind and refuses
//! to write twice.

use crate::callback::{Choice, InteractionCallback, MessageFlags, MessagePayload, ModalPayload};
use crate::error::ResponseError;
use crate::kind::RouteKind;
use bitflags::bitflags;
use std::fmt;
use std::sync::Arc;

/// Transport-owned response state for a single request.
///
/// Implementations must be safe to call from any handler task. Writing after
/// a response has started must fail with [`ResponseError::AlreadySent`];
/// calling `end` before `write_head`, or twice, must fail with
/// [`ResponseError::Closed`].
pub trait ResponseSink: Send + Sync {
    /// Whether the status line has been written.
    fn headers_sent(&self) -> bool;

    /// Write the status line and headers.
    fn write_head(&self, status: u16, headers: &[(&str, &str)]) -> Result<(), ResponseError>;

    /// Finish the response, optionally with a body.
    fn end(&self, body: Option<Vec<u8>>) -> Result<(), ResponseError>;

    /// Write a complete response in one call.
    fn respond(
        &self,
        status: u16,
        headers: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<(), ResponseError> {
        self.write_head(status, headers)?;
        self.end(body)
    }
}

bitflags! {
    /// Callbacks a [`Responder`] is allowed to write.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Acknowledge a ping.
        const PONG = 1 << 0;
        /// Reply with a message.
        const REPLY = 1 << 1;
        /// Defer a reply.
        const DEFER = 1 << 2;
        /// Update or defer-update the originating message.
        const UPDATE = 1 << 3;
        /// Open a modal.
        const MODAL = 1 << 4;
        /// Return autocomplete choices.
        const AUTOCOMPLETE = 1 << 5;
    }
}

impl Capabilities {
    /// Capabilities granted to interactions of a route kind.
    pub fn for_kind(kind: RouteKind) -> Self {
        match kind {
            RouteKind::Command | RouteKind::UserContextMenu | RouteKind::MessageContextMenu => {
                Self::REPLY | Self::DEFER | Self::MODAL
            }
            RouteKind::Modal => Self::REPLY | Self::DEFER | Self::UPDATE,
            RouteKind::Autocomplete => Self::AUTOCOMPLETE,
            k if k.is_component() => Self::REPLY | Self::DEFER | Self::UPDATE | Self::MODAL,
            _ => Self::empty(),
        }
    }
}

/// Capability-checked writer for one interaction's response.
#[derive(Clone)]
pub struct Responder {
    sink: Arc<dyn ResponseSink>,
    capabilities: Capabilities,
}

impl Responder {
    /// Wrap a sink with the given capabilities.
    pub fn new(sink: Arc<dyn ResponseSink>, capabilities: Capabilities) -> Self {
        Self { sink, capabilities }
    }

    /// Callbacks this responder may write.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Whether a response has already been written.
    pub fn is_sent(&self) -> bool {
        self.sink.headers_sent()
    }

    /// The underlying transport sink.
    pub fn sink(&self) -> &Arc<dyn ResponseSink> {
        &self.sink
    }

    /// Acknowledge a ping.
    pub fn pong(&self) -> Result<(), ResponseError> {
        self.checked(Capabilities::PONG, "pong", &InteractionCallback::Pong)
    }

    /// Reply with a message.
    pub fn reply(&self, message: impl Into<MessagePayload>) -> Result<(), ResponseError> {
        self.checked(
            Capabilities::REPLY,
            "reply",
            &InteractionCallback::ChannelMessage(message.into()),
        )
    }

    /// Acknowledge now and reply later, optionally only visible to the user.
    pub fn defer(&self, ephemeral: bool) -> Result<(), ResponseError> {
        let flags = if ephemeral {
            MessageFlags::EPHEMERAL
        } else {
            MessageFlags::empty()
        };
        self.checked(
            Capabilities::DEFER,
            "defer",
            &InteractionCallback::DeferredChannelMessage { flags },
        )
    }

    /// Acknowledge and edit the originating message later.
    pub fn defer_update(&self) -> Result<(), ResponseError> {
        self.checked(
            Capabilities::UPDATE,
            "defer_update",
            &InteractionCallback::DeferredUpdateMessage,
        )
    }

    /// Edit the originating message.
    pub fn update(&self, message: impl Into<MessagePayload>) -> Result<(), ResponseError> {
        self.checked(
            Capabilities::UPDATE,
            "update",
            &InteractionCallback::UpdateMessage(message.into()),
        )
    }

    /// Open a modal.
    pub fn show_modal(&self, modal: ModalPayload) -> Result<(), ResponseError> {
        self.checked(Capabilities::MODAL, "show_modal", &InteractionCallback::Modal(modal))
    }

    /// Return autocomplete suggestions.
    pub fn autocomplete(
        &self,
        choices: impl IntoIterator<Item = Choice>,
    ) -> Result<(), ResponseError> {
        self.checked(
            Capabilities::AUTOCOMPLETE,
            "autocomplete",
            &InteractionCallback::AutocompleteResult(choices.into_iter().collect()),
        )
    }

    /// Acknowledge with an empty 204.
    pub fn no_content(&self) -> Result<(), ResponseError> {
        self.ensure_unsent()?;
        self.sink.respond(204, &[], None)
    }

    /// Write any callback without a capability check.
    pub fn send(&self, callback: &InteractionCallback) -> Result<(), ResponseError> {
        let body = serde_json::to_vec(callback)?;
        self.ensure_unsent()?;
        self.sink
            .respond(200, &[("content-type", "application/json")], Some(body))
    }

    fn checked(
        &self,
        required: Capabilities,
        name: &'static str,
        callback: &InteractionCallback,
    ) -> Result<(), ResponseError> {
        if !self.capabilities.contains(required) {
            return Err(ResponseError::Unsupported { callback: name });
        }
        self.send(callback)
    }

    fn ensure_unsent(&self) -> Result<(), ResponseError> {
        if self.sink.headers_sent() {
            return Err(ResponseError::AlreadySent);
        }
        Ok(())
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder")
            .field("capabilities", &self.capabilities)
            .field("sent", &self.is_sent())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Buffer {
        status: Mutex<Option<u16>>,
        body: Mutex<Option<Vec<u8>>>,
    }

    impl ResponseSink for Buffer {
        fn headers_sent(&self) -> bool {
            self.status.lock().unwrap().is_some()
        }

        fn write_head(&self, status: u16, _headers: &[(&str, &str)]) -> Result<(), ResponseError> {
            let mut slot = self.status.lock().unwrap();
            if slot.is_some() {
                return Err(ResponseError::AlreadySent);
            }
            *slot = Some(status);
            Ok(())
        }

        fn end(&self, body: Option<Vec<u8>>) -> Result<(), ResponseError> {
            if self.status.lock().unwrap().is_none() {
                return Err(ResponseError::Closed);
            }
            *self.body.lock().unwrap() = body;
            Ok(())
        }
    }

    #[test]
    fn component_may_update() {
        let sink = Arc::new(Buffer::default());
        let responder = Responder::new(sink.clone(), Capabilities::for_kind(RouteKind::Button));
        responder.update("edited").unwrap();
        assert_eq!(*sink.status.lock().unwrap(), Some(200));
        let body = sink.body.lock().unwrap().clone().unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body).unwrap()["type"],
            7
        );
    }

    #[test]
    fn autocomplete_may_not_reply() {
        let sink = Arc::new(Buffer::default());
        let responder = Responder::new(sink.clone(), Capabilities::for_kind(RouteKind::Autocomplete));
        let err = responder.reply("nope").unwrap_err();
        assert!(matches!(err, ResponseError::Unsupported { callback: "reply" }));
        assert!(!sink.headers_sent());
    }

    #[test]
    fn second_write_is_rejected() {
        let sink = Arc::new(Buffer::default());
        let responder = Responder::new(sink, Capabilities::all());
        responder.defer(true).unwrap();
        assert!(matches!(
            responder.no_content(),
            Err(ResponseError::AlreadySent)
        ));
    }
}
