//! Decoded interaction model.
//!
//! An [`Interaction`] is the authenticated, JSON-decoded webhook body. The
//! common envelope is lifted into fields; the variant-specific payload lives
//! in [`InteractionData`]. The raw JSON is kept alongside so handlers for
//! unmodelled events can still read everything the platform sent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Top-level interaction discriminant (`type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionType {
    /// Liveness check sent by the platform when the endpoint is configured.
    Ping = 1,
    /// Slash command or context-menu invocation.
    ApplicationCommand = 2,
    /// Button or select-menu interaction.
    MessageComponent = 3,
    /// Autocomplete request for a command option.
    ApplicationCommandAutocomplete = 4,
    /// Modal form submission.
    ModalSubmit = 5,
}

impl InteractionType {
    /// Map a raw discriminant to a known type.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Ping),
            2 => Some(Self::ApplicationCommand),
            3 => Some(Self::MessageComponent),
            4 => Some(Self::ApplicationCommandAutocomplete),
            5 => Some(Self::ModalSubmit),
            _ => None,
        }
    }
}

/// Application command sub-discriminant (`data.type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    /// Slash command.
    ChatInput = 1,
    /// User context-menu entry.
    User = 2,
    /// Message context-menu entry.
    Message = 3,
}

impl CommandType {
    /// Map a raw sub-discriminant to a known command type.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::ChatInput),
            2 => Some(Self::User),
            3 => Some(Self::Message),
            _ => None,
        }
    }
}

/// Message component sub-discriminant (`data.component_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Clickable button.
    Button,
    /// Select menu with developer-defined string options.
    StringSelect,
    /// Select menu for users.
    UserSelect,
    /// Select menu for roles.
    RoleSelect,
    /// Select menu for users and roles.
    MentionableSelect,
    /// Select menu for channels.
    ChannelSelect,
    /// A component type this crate does not route.
    Other(u8),
}

impl From<u8> for ComponentType {
    fn from(value: u8) -> Self {
        match value {
            2 => Self::Button,
            3 => Self::StringSelect,
            5 => Self::UserSelect,
            6 => Self::RoleSelect,
            7 => Self::MentionableSelect,
            8 => Self::ChannelSelect,
            other => Self::Other(other),
        }
    }
}

impl From<ComponentType> for u8 {
    fn from(value: ComponentType) -> Self {
        match value {
            ComponentType::Button => 2,
            ComponentType::StringSelect => 3,
            ComponentType::UserSelect => 5,
            ComponentType::RoleSelect => 6,
            ComponentType::MentionableSelect => 7,
            ComponentType::ChannelSelect => 8,
            ComponentType::Other(other) => other,
        }
    }
}

impl<'de> Deserialize<'de> for ComponentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(Self::from)
    }
}

/// Command option type, shared by live events and command definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// Nested sub-command.
    SubCommand,
    /// Group of sub-commands.
    SubCommandGroup,
    /// String value.
    String,
    /// Integer value.
    Integer,
    /// Boolean value.
    Boolean,
    /// User reference.
    User,
    /// Channel reference.
    Channel,
    /// Role reference.
    Role,
    /// User or role reference.
    Mentionable,
    /// Floating point value.
    Number,
    /// Uploaded attachment.
    Attachment,
    /// An option type this crate does not model.
    Other(u8),
}

impl OptionType {
    /// Whether the option type can carry autocomplete.
    pub const fn supports_autocomplete(self) -> bool {
        matches!(self, Self::String | Self::Integer | Self::Number)
    }
}

impl From<u8> for OptionType {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::SubCommand,
            2 => Self::SubCommandGroup,
            3 => Self::String,
            4 => Self::Integer,
            5 => Self::Boolean,
            6 => Self::User,
            7 => Self::Channel,
            8 => Self::Role,
            9 => Self::Mentionable,
            10 => Self::Number,
            11 => Self::Attachment,
            other => Self::Other(other),
        }
    }
}

impl From<OptionType> for u8 {
    fn from(value: OptionType) -> Self {
        match value {
            OptionType::SubCommand => 1,
            OptionType::SubCommandGroup => 2,
            OptionType::String => 3,
            OptionType::Integer => 4,
            OptionType::Boolean => 5,
            OptionType::User => 6,
            OptionType::Channel => 7,
            OptionType::Role => 8,
            OptionType::Mentionable => 9,
            OptionType::Number => 10,
            OptionType::Attachment => 11,
            OptionType::Other(other) => other,
        }
    }
}

impl Serialize for OptionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*self))
    }
}

impl<'de> Deserialize<'de> for OptionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(Self::from)
    }
}

/// An option as it arrives in a command or autocomplete event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandOption {
    /// Option name.
    pub name: String,
    /// Option type.
    #[serde(rename = "type")]
    pub option_type: OptionType,
    /// Current value, absent for sub-commands and groups.
    #[serde(default)]
    pub value: Option<Value>,
    /// Set on the single option the user is typing into (autocomplete only).
    #[serde(default)]
    pub focused: bool,
    /// Nested options for sub-commands and groups.
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

/// Payload of an application command, context-menu or autocomplete event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandData {
    /// Command id.
    #[serde(default)]
    pub id: String,
    /// Command name; the routing key for commands and context menus.
    pub name: String,
    /// Raw command sub-discriminant.
    #[serde(rename = "type", default = "default_command_type")]
    pub command_type: u8,
    /// Options supplied by the user.
    #[serde(default)]
    pub options: Vec<CommandOption>,
    /// Target user or message id for context-menu commands.
    #[serde(default)]
    pub target_id: Option<String>,
    /// Resolved users, roles, channels and messages.
    #[serde(default)]
    pub resolved: Option<Value>,
    /// Guild the command is registered in, if guild-scoped.
    #[serde(default)]
    pub guild_id: Option<String>,
}

fn default_command_type() -> u8 {
    CommandType::ChatInput as u8
}

/// Payload of a message component event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentData {
    /// Developer-defined id; the routing key for components.
    pub custom_id: String,
    /// Component sub-discriminant.
    pub component_type: ComponentType,
    /// Selected values (select menus only).
    #[serde(default)]
    pub values: Vec<String>,
    /// Resolved entities for user/role/channel selects.
    #[serde(default)]
    pub resolved: Option<Value>,
}

/// Payload of a modal submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModalSubmitData {
    /// Developer-defined id; the routing key for modals.
    pub custom_id: String,
    /// Submitted component rows, kept as raw JSON.
    #[serde(default)]
    pub components: Vec<Value>,
}

/// Variant-specific payload of an [`Interaction`].
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionData {
    /// Liveness check.
    Ping,
    /// Slash command invocation.
    ChatInput(CommandData),
    /// User context-menu invocation.
    UserContextMenu(CommandData),
    /// Message context-menu invocation.
    MessageContextMenu(CommandData),
    /// Button or select-menu interaction.
    Component(ComponentData),
    /// Modal form submission.
    ModalSubmit(ModalSubmitData),
    /// Autocomplete request.
    Autocomplete(CommandData),
    /// Anything the model does not cover.
    Unknown,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    id: String,
    #[serde(default)]
    application_id: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    guild_id: Option<String>,
    #[serde(default)]
    channel_id: Option<String>,
    #[serde(default)]
    locale: Option<String>,
}

/// An authenticated, decoded webhook event.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    /// Snowflake id of the interaction.
    pub id: String,
    /// Id of the application the interaction is for.
    pub application_id: String,
    /// Continuation token for follow-up messages.
    pub token: String,
    /// Raw top-level discriminant.
    pub interaction_type: u8,
    /// Guild the interaction was sent from.
    pub guild_id: Option<String>,
    /// Channel the interaction was sent from.
    pub channel_id: Option<String>,
    /// Invoking user's locale.
    pub locale: Option<String>,
    /// Variant-specific payload.
    pub data: InteractionData,
    /// The full decoded body.
    pub raw: Value,
}

impl Interaction {
    /// Decode an interaction from raw body bytes.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: Value = serde_json::from_slice(body)?;
        Self::from_value(raw)
    }

    /// Decode an interaction from an already parsed JSON value.
    ///
    /// Unknown discriminants decode to [`InteractionData::Unknown`]; a known
    /// discriminant with a payload of the wrong shape is an error.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let envelope = Envelope::deserialize(&raw)?;
        let payload = raw.get("data");

        let data = match (InteractionType::from_u8(envelope.kind), payload) {
            (Some(InteractionType::Ping), _) => InteractionData::Ping,
            (Some(InteractionType::ApplicationCommand), Some(payload)) => {
                let command = CommandData::deserialize(payload)?;
                match CommandType::from_u8(command.command_type) {
                    Some(CommandType::ChatInput) => InteractionData::ChatInput(command),
                    Some(CommandType::User) => InteractionData::UserContextMenu(command),
                    Some(CommandType::Message) => InteractionData::MessageContextMenu(command),
                    None => InteractionData::Unknown,
                }
            }
            (Some(InteractionType::MessageComponent), Some(payload)) => {
                InteractionData::Component(ComponentData::deserialize(payload)?)
            }
            (Some(InteractionType::ApplicationCommandAutocomplete), Some(payload)) => {
                InteractionData::Autocomplete(CommandData::deserialize(payload)?)
            }
            (Some(InteractionType::ModalSubmit), Some(payload)) => {
                InteractionData::ModalSubmit(ModalSubmitData::deserialize(payload)?)
            }
            (Some(_), None) => return Err(serde::de::Error::missing_field("data")),
            (None, _) => InteractionData::Unknown,
        };

        Ok(Self {
            id: envelope.id,
            application_id: envelope.application_id,
            token: envelope.token,
            interaction_type: envelope.kind,
            guild_id: envelope.guild_id,
            channel_id: envelope.channel_id,
            locale: envelope.locale,
            data,
            raw,
        })
    }

    /// Returns `true` for the platform's liveness check.
    pub fn is_ping(&self) -> bool {
        matches!(self.data, InteractionData::Ping)
    }

    /// Command payload for commands, context menus and autocomplete.
    pub fn command(&self) -> Option<&CommandData> {
        match &self.data {
            InteractionData::ChatInput(data)
            | InteractionData::UserContextMenu(data)
            | InteractionData::MessageContextMenu(data)
            | InteractionData::Autocomplete(data) => Some(data),
            _ => None,
        }
    }

    /// Component payload for buttons and select menus.
    pub fn component(&self) -> Option<&ComponentData> {
        match &self.data {
            InteractionData::Component(data) => Some(data),
            _ => None,
        }
    }

    /// Modal payload for modal submissions.
    pub fn modal(&self) -> Option<&ModalSubmitData> {
        match &self.data {
            InteractionData::ModalSubmit(data) => Some(data),
            _ => None,
        }
    }
}
