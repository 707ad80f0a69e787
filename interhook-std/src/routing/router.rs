//! Route modules and the shared registration surface.

use super::table::RouteTable;
use crate::autocomplete::{AutocompleteKey, AutocompleteKeyBuilder};
use interhook_core::{BoxHandler, CommandDefinition, RouteError, RouteKind};
use std::sync::Arc;

/// Box a list of handlers for registration.
///
/// ```rust,ignore
/// router.button("confirm", handlers![audit, confirm])?;
/// ```
#[macro_export]
macro_rules! handlers {
    ($($handler:expr),* $(,)?) => {
        ::std::vec![$($crate::interhook_core::boxed($handler)),*]
    };
}

/// Registration methods shared by [`InteractionRouter`] and the dispatcher
/// builder.
///
/// Implementors only expose their route table and command list; every
/// per-kind method is provided.
pub trait RouteRegistry<C: Send + Sync + 'static> {
    /// Route table being populated.
    fn table_mut(&mut self) -> &mut RouteTable<C>;

    /// Command definitions registered so far.
    fn commands_mut(&mut self) -> &mut Vec<Arc<CommandDefinition>>;

    /// Register handlers for an arbitrary kind and key.
    fn route(
        &mut self,
        kind: RouteKind,
        key: impl Into<String>,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<&mut Self, RouteError>
    where
        Self: Sized,
    {
        self.table_mut().register(kind, key, handlers)?;
        Ok(self)
    }

    /// Register a slash command and keep its definition.
    ///
    /// The returned builder produces autocomplete keys for the command.
    fn command(
        &mut self,
        definition: CommandDefinition,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<AutocompleteKeyBuilder, RouteError>
    where
        Self: Sized,
    {
        let definition = Arc::new(definition);
        self.table_mut()
            .register(RouteKind::Command, definition.name.clone(), handlers)?;
        self.commands_mut().push(Arc::clone(&definition));
        Ok(AutocompleteKeyBuilder::new(definition))
    }

    /// Register a button by custom id.
    fn button(
        &mut self,
        custom_id: impl Into<String>,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<&mut Self, RouteError>
    where
        Self: Sized,
    {
        self.route(RouteKind::Button, custom_id, handlers)
    }

    /// Register a modal by custom id.
    fn modal(
        &mut self,
        custom_id: impl Into<String>,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<&mut Self, RouteError>
    where
        Self: Sized,
    {
        self.route(RouteKind::Modal, custom_id, handlers)
    }

    /// Register a string select menu by custom id.
    fn string_select(
        &mut self,
        custom_id: impl Into<String>,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<&mut Self, RouteError>
    where
        Self: Sized,
    {
        self.route(RouteKind::StringSelect, custom_id, handlers)
    }

    /// Register a user select menu by custom id.
    fn user_select(
        &mut self,
        custom_id: impl Into<String>,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<&mut Self, RouteError>
    where
        Self: Sized,
    {
        self.route(RouteKind::UserSelect, custom_id, handlers)
    }

    /// Register a role select menu by custom id.
    fn role_select(
        &mut self,
        custom_id: impl Into<String>,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<&mut Self, RouteError>
    where
        Self: Sized,
    {
        self.route(RouteKind::RoleSelect, custom_id, handlers)
    }

    /// Register a mentionable select menu by custom id.
    fn mentionable_select(
        &mut self,
        custom_id: impl Into<String>,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<&mut Self, RouteError>
    where
        Self: Sized,
    {
        self.route(RouteKind::MentionableSelect, custom_id, handlers)
    }

    /// Register a channel select menu by custom id.
    fn channel_select(
        &mut self,
        custom_id: impl Into<String>,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<&mut Self, RouteError>
    where
        Self: Sized,
    {
        self.route(RouteKind::ChannelSelect, custom_id, handlers)
    }

    /// Register a user context-menu command by name.
    fn user_context_menu(
        &mut self,
        name: impl Into<String>,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<&mut Self, RouteError>
    where
        Self: Sized,
    {
        self.route(RouteKind::UserContextMenu, name, handlers)
    }

    /// Register a message context-menu command by name.
    fn message_context_menu(
        &mut self,
        name: impl Into<String>,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<&mut Self, RouteError>
    where
        Self: Sized,
    {
        self.route(RouteKind::MessageContextMenu, name, handlers)
    }

    /// Register an autocomplete handler for a validated option path.
    fn autocomplete(
        &mut self,
        key: AutocompleteKey,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<&mut Self, RouteError>
    where
        Self: Sized,
    {
        self.route(RouteKind::Autocomplete, key.into_string(), handlers)
    }
}

/// An independently authored group of routes.
///
/// Middleware added here runs only for this router's routes, after the
/// dispatcher's global middleware and before the route's own handlers.
pub struct InteractionRouter<C> {
    middleware: Vec<BoxHandler<C>>,
    routes: RouteTable<C>,
    commands: Vec<Arc<CommandDefinition>>,
}

impl<C> Default for InteractionRouter<C> {
    fn default() -> Self {
        Self {
            middleware: Vec::new(),
            routes: RouteTable::default(),
            commands: Vec::new(),
        }
    }
}

impl<C: Send + Sync + 'static> InteractionRouter<C> {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append router-scoped middleware.
    pub fn middleware(&mut self, handlers: Vec<BoxHandler<C>>) -> &mut Self {
        self.middleware.extend(handlers);
        self
    }

    /// The router's routes.
    pub fn routes(&self) -> &RouteTable<C> {
        &self.routes
    }

    /// Command definitions registered on this router.
    pub fn commands(&self) -> &[Arc<CommandDefinition>] {
        &self.commands
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<BoxHandler<C>>,
        RouteTable<C>,
        Vec<Arc<CommandDefinition>>,
    ) {
        (self.middleware, self.routes, self.commands)
    }
}

impl<C: Send + Sync + 'static> RouteRegistry<C> for InteractionRouter<C> {
    fn table_mut(&mut self) -> &mut RouteTable<C> {
        &mut self.routes
    }

    fn commands_mut(&mut self) -> &mut Vec<Arc<CommandDefinition>> {
        &mut self.commands
    }
}

impl<C> std::fmt::Debug for InteractionRouter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionRouter")
            .field("middleware", &self.middleware.len())
            .field("routes", &self.routes)
            .field("commands", &self.commands.len())
            .finish()
    }
}

/// An ordered group of routers, registered in one call.
///
/// Nested collectors are flattened; order is preserved.
pub struct RouterCollector<C> {
    routers: Vec<InteractionRouter<C>>,
}

impl<C> Default for RouterCollector<C> {
    fn default() -> Self {
        Self {
            routers: Vec::new(),
        }
    }
}

impl<C: Send + Sync + 'static> RouterCollector<C> {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a router.
    pub fn router(mut self, router: InteractionRouter<C>) -> Self {
        self.routers.push(router);
        self
    }

    /// Append every router of another collector.
    pub fn collector(mut self, other: RouterCollector<C>) -> Self {
        self.routers.extend(other.routers);
        self
    }

    /// Number of routers collected.
    pub fn len(&self) -> usize {
        self.routers.len()
    }

    /// Whether no router was collected.
    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    /// The collected routers, in registration order.
    pub fn into_routers(self) -> Vec<InteractionRouter<C>> {
        self.routers
    }
}
