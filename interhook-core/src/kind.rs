//! Route kinds and routing decisions.

use crate::interaction::Interaction;
use std::fmt;
use std::sync::Arc;

/// The closed set of routable interaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Slash command, keyed by command name.
    Command,
    /// Button, keyed by custom id.
    Button,
    /// Modal submission, keyed by custom id.
    Modal,
    /// String select menu, keyed by custom id.
    StringSelect,
    /// User select menu, keyed by custom id.
    UserSelect,
    /// Role select menu, keyed by custom id.
    RoleSelect,
    /// Mentionable select menu, keyed by custom id.
    MentionableSelect,
    /// Channel select menu, keyed by custom id.
    ChannelSelect,
    /// User context-menu command, keyed by command name.
    UserContextMenu,
    /// Message context-menu command, keyed by command name.
    MessageContextMenu,
    /// Autocomplete request, keyed by the focused option path.
    Autocomplete,
}

impl RouteKind {
    /// Every route kind, in declaration order.
    pub const ALL: [RouteKind; 11] = [
        RouteKind::Command,
        RouteKind::Button,
        RouteKind::Modal,
        RouteKind::StringSelect,
        RouteKind::UserSelect,
        RouteKind::RoleSelect,
        RouteKind::MentionableSelect,
        RouteKind::ChannelSelect,
        RouteKind::UserContextMenu,
        RouteKind::MessageContextMenu,
        RouteKind::Autocomplete,
    ];

    /// Stable name used in logs and errors.
    pub const fn as_str(self) -> &'static str {
        match self {
            RouteKind::Command => "command",
            RouteKind::Button => "button",
            RouteKind::Modal => "modal",
            RouteKind::StringSelect => "stringSelect",
            RouteKind::UserSelect => "userSelect",
            RouteKind::RoleSelect => "roleSelect",
            RouteKind::MentionableSelect => "mentionableSelect",
            RouteKind::ChannelSelect => "channelSelect",
            RouteKind::UserContextMenu => "userContextMenu",
            RouteKind::MessageContextMenu => "messageContextMenu",
            RouteKind::Autocomplete => "autocomplete",
        }
    }

    /// Whether the kind is one of the message components.
    pub const fn is_component(self) -> bool {
        matches!(
            self,
            RouteKind::Button
                | RouteKind::StringSelect
                | RouteKind::UserSelect
                | RouteKind::RoleSelect
                | RouteKind::MentionableSelect
                | RouteKind::ChannelSelect
        )
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying an interaction.
#[derive(Debug, Clone)]
pub enum RoutingDecision {
    /// The interaction maps to a routable kind and key.
    Known {
        /// Route kind.
        kind: RouteKind,
        /// Route key within the kind.
        key: String,
        /// The classified interaction.
        interaction: Arc<Interaction>,
    },
    /// The interaction has no route kind (ping, unmodelled types).
    Unknown {
        /// The classified interaction.
        interaction: Arc<Interaction>,
    },
}

impl RoutingDecision {
    /// The interaction the decision was made for.
    pub fn interaction(&self) -> &Arc<Interaction> {
        match self {
            RoutingDecision::Known { interaction, .. } => interaction,
            RoutingDecision::Unknown { interaction } => interaction,
        }
    }

    /// Route kind, if known.
    pub fn kind(&self) -> Option<RouteKind> {
        match self {
            RoutingDecision::Known { kind, .. } => Some(*kind),
            RoutingDecision::Unknown { .. } => None,
        }
    }

    /// Route key, if known.
    pub fn key(&self) -> Option<&str> {
        match self {
            RoutingDecision::Known { key, .. } => Some(key),
            RoutingDecision::Unknown { .. } => None,
        }
    }
}
