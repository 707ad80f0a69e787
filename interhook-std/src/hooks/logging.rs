//! Logging middleware for interaction observation.

use interhook_core::{BoxError, Context, Flow, Handler, InteractionData};

/// A middleware that logs each interaction and continues the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHook;

impl<C: Send + Sync + 'static> Handler<C> for LoggingHook {
    async fn call(&self, ctx: Context<C>) -> Result<Flow, BoxError> {
        let interaction = ctx.interaction();
        let key = match &interaction.data {
            InteractionData::ChatInput(command)
            | InteractionData::UserContextMenu(command)
            | InteractionData::MessageContextMenu(command)
            | InteractionData::Autocomplete(command) => command.name.as_str(),
            InteractionData::Component(component) => component.custom_id.as_str(),
            InteractionData::ModalSubmit(modal) => modal.custom_id.as_str(),
            InteractionData::Ping | InteractionData::Unknown => "",
        };
        tracing::info!(
            id = %interaction.id,
            interaction_type = interaction.interaction_type,
            guild_id = interaction.guild_id.as_deref(),
            key,
            "processing interaction"
        );
        Ok(Flow::Continue)
    }
}
