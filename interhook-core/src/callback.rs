//! Interaction callback bodies.
//!
//! Every synchronous answer to an interaction is a JSON object
//! `{"type": n, "data": ...}` where `n` selects the callback.

use bitflags::bitflags;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

bitflags! {
    /// Message flags understood in callback payloads.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MessageFlags: u32 {
        /// Do not render link embeds.
        const SUPPRESS_EMBEDS = 1 << 2;
        /// Only the invoking user can see the message.
        const EPHEMERAL = 1 << 6;
        /// Do not trigger push or desktop notifications.
        const SUPPRESS_NOTIFICATIONS = 1 << 12;
    }
}

fn flag_bits<S: Serializer>(flags: &MessageFlags, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u32(flags.bits())
}

/// Message body for replies and updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessagePayload {
    /// Text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Rich embeds, passed through as JSON.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Value>,
    /// Component rows, passed through as JSON.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Value>,
    /// Text-to-speech.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tts: bool,
    /// Allowed mentions object, passed through as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<Value>,
    /// Message flags.
    #[serde(skip_serializing_if = "MessageFlags::is_empty", serialize_with = "flag_bits")]
    pub flags: MessageFlags,
}

impl MessagePayload {
    /// Empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Append an embed.
    pub fn embed(mut self, embed: Value) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Append a component row.
    pub fn component(mut self, row: Value) -> Self {
        self.components.push(row);
        self
    }

    /// Enable text-to-speech.
    pub fn tts(mut self, tts: bool) -> Self {
        self.tts = tts;
        self
    }

    /// Restrict which mentions ping.
    pub fn allowed_mentions(mut self, allowed: Value) -> Self {
        self.allowed_mentions = Some(allowed);
        self
    }

    /// Add message flags.
    pub fn flags(mut self, flags: MessageFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Shorthand for [`MessageFlags::EPHEMERAL`].
    pub fn ephemeral(self) -> Self {
        self.flags(MessageFlags::EPHEMERAL)
    }
}

impl From<&str> for MessagePayload {
    fn from(content: &str) -> Self {
        Self::new().content(content)
    }
}

impl From<String> for MessagePayload {
    fn from(content: String) -> Self {
        Self::new().content(content)
    }
}

/// Modal form body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalPayload {
    /// Id the submission will be routed by.
    pub custom_id: String,
    /// Modal title.
    pub title: String,
    /// Component rows, passed through as JSON.
    pub components: Vec<Value>,
}

impl ModalPayload {
    /// Create an empty modal.
    pub fn new(custom_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            title: title.into(),
            components: Vec::new(),
        }
    }

    /// Append a component row.
    pub fn component(mut self, row: Value) -> Self {
        self.components.push(row);
        self
    }
}

/// An autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    /// Label shown to the user.
    pub name: String,
    /// Value inserted when chosen.
    pub value: Value,
}

impl Choice {
    /// Create a choice.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A synchronous interaction callback.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionCallback {
    /// Acknowledge a ping (type 1).
    Pong,
    /// Reply with a message (type 4).
    ChannelMessage(MessagePayload),
    /// Acknowledge now, reply later (type 5).
    DeferredChannelMessage {
        /// Flags for the eventual reply; only `EPHEMERAL` is meaningful.
        flags: MessageFlags,
    },
    /// Acknowledge a component, edit the message later (type 6).
    DeferredUpdateMessage,
    /// Edit the message the component is attached to (type 7).
    UpdateMessage(MessagePayload),
    /// Return autocomplete suggestions (type 8).
    AutocompleteResult(Vec<Choice>),
    /// Open a modal (type 9).
    Modal(ModalPayload),
}

impl InteractionCallback {
    /// Wire discriminant of the callback.
    pub const fn callback_type(&self) -> u8 {
        match self {
            InteractionCallback::Pong => 1,
            InteractionCallback::ChannelMessage(_) => 4,
            InteractionCallback::DeferredChannelMessage { .. } => 5,
            InteractionCallback::DeferredUpdateMessage => 6,
            InteractionCallback::UpdateMessage(_) => 7,
            InteractionCallback::AutocompleteResult(_) => 8,
            InteractionCallback::Modal(_) => 9,
        }
    }
}

#[derive(Serialize)]
struct FlagsOnly {
    #[serde(serialize_with = "flag_bits")]
    flags: MessageFlags,
}

#[derive(Serialize)]
struct Choices<'a> {
    choices: &'a [Choice],
}

impl Serialize for InteractionCallback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.callback_type())?;
        match self {
            InteractionCallback::Pong | InteractionCallback::DeferredUpdateMessage => {}
            InteractionCallback::ChannelMessage(message)
            | InteractionCallback::UpdateMessage(message) => {
                map.serialize_entry("data", message)?;
            }
            InteractionCallback::DeferredChannelMessage { flags } => {
                if !flags.is_empty() {
                    map.serialize_entry("data", &FlagsOnly { flags: *flags })?;
                }
            }
            InteractionCallback::AutocompleteResult(choices) => {
                map.serialize_entry("data", &Choices { choices })?;
            }
            InteractionCallback::Modal(modal) => {
                map.serialize_entry("data", modal)?;
            }
        }
        map.end()
    }
}
