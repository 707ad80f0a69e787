//! Interaction classification.

use crate::autocomplete::resolve_focused_path;
use interhook_core::{
    ComponentType, Interaction, InteractionData, ResolveError, RouteKind, RoutingDecision,
};
use std::sync::Arc;

/// Map an interaction to its route kind and key.
///
/// Pings and anything the model does not route are
/// [`RoutingDecision::Unknown`]. Autocomplete keys are resolved from the
/// focused option chain, which fails if nothing is focused.
pub fn classify(interaction: Arc<Interaction>) -> Result<RoutingDecision, ResolveError> {
    let route = match &interaction.data {
        InteractionData::ChatInput(command) => Some((RouteKind::Command, command.name.clone())),
        InteractionData::UserContextMenu(command) => {
            Some((RouteKind::UserContextMenu, command.name.clone()))
        }
        InteractionData::MessageContextMenu(command) => {
            Some((RouteKind::MessageContextMenu, command.name.clone()))
        }
        InteractionData::Component(component) => {
            component_kind(component.component_type)
                .map(|kind| (kind, component.custom_id.clone()))
        }
        InteractionData::ModalSubmit(modal) => Some((RouteKind::Modal, modal.custom_id.clone())),
        InteractionData::Autocomplete(command) => Some((
            RouteKind::Autocomplete,
            resolve_focused_path(&command.name, &command.options)?,
        )),
        InteractionData::Ping | InteractionData::Unknown => None,
    };

    Ok(match route {
        Some((kind, key)) => RoutingDecision::Known {
            kind,
            key,
            interaction,
        },
        None => RoutingDecision::Unknown { interaction },
    })
}

fn component_kind(component_type: ComponentType) -> Option<RouteKind> {
    match component_type {
        ComponentType::Button => Some(RouteKind::Button),
        ComponentType::StringSelect => Some(RouteKind::StringSelect),
        ComponentType::UserSelect => Some(RouteKind::UserSelect),
        ComponentType::RoleSelect => Some(RouteKind::RoleSelect),
        ComponentType::MentionableSelect => Some(RouteKind::MentionableSelect),
        ComponentType::ChannelSelect => Some(RouteKind::ChannelSelect),
        ComponentType::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn decide(raw: Value) -> Result<RoutingDecision, ResolveError> {
        classify(Arc::new(Interaction::from_value(raw).unwrap()))
    }

    fn known(raw: Value) -> (RouteKind, String) {
        let decision = decide(raw).unwrap();
        (decision.kind().unwrap(), decision.key().unwrap().to_owned())
    }

    #[test]
    fn button_routes_as_button() {
        let raw = json!({"type": 3, "data": {"custom_id": "ok", "component_type": 2}});
        assert_eq!(known(raw), (RouteKind::Button, "ok".to_owned()));
    }

    #[test]
    fn each_select_has_its_own_kind() {
        for (component_type, kind) in [
            (3, RouteKind::StringSelect),
            (5, RouteKind::UserSelect),
            (6, RouteKind::RoleSelect),
            (7, RouteKind::MentionableSelect),
            (8, RouteKind::ChannelSelect),
        ] {
            let raw = json!({"type": 3, "data": {"custom_id": "s", "component_type": component_type}});
            assert_eq!(known(raw).0, kind);
        }
    }

    #[test]
    fn context_menus_route_by_name() {
        let user = json!({"type": 2, "data": {"name": "Inspect", "type": 2}});
        let message = json!({"type": 2, "data": {"name": "Quote", "type": 3}});
        assert_eq!(known(user), (RouteKind::UserContextMenu, "Inspect".to_owned()));
        assert_eq!(known(message), (RouteKind::MessageContextMenu, "Quote".to_owned()));
    }

    #[test]
    fn modal_routes_by_custom_id() {
        let raw = json!({"type": 5, "data": {"custom_id": "feedback", "components": []}});
        assert_eq!(known(raw), (RouteKind::Modal, "feedback".to_owned()));
    }

    #[test]
    fn autocomplete_uses_focused_path() {
        let raw = json!({"type": 4, "data": {"name": "tag", "options": [
            {"name": "get", "type": 1, "options": [{"name": "name", "type": 3, "value": "fo", "focused": true}]}
        ]}});
        assert_eq!(known(raw), (RouteKind::Autocomplete, "tag:get:name".to_owned()));
    }

    #[test]
    fn autocomplete_without_focus_fails() {
        let raw = json!({"type": 4, "data": {"name": "tag", "options": []}});
        assert!(matches!(decide(raw), Err(ResolveError::NoFocusedOption { .. })));
    }

    #[test]
    fn ping_and_unmodelled_are_unknown() {
        assert!(decide(json!({"type": 1})).unwrap().kind().is_none());
        let text_input = json!({"type": 3, "data": {"custom_id": "t", "component_type": 4}});
        assert!(decide(text_input).unwrap().kind().is_none());
        assert!(decide(json!({"type": 99})).unwrap().kind().is_none());
    }
}
