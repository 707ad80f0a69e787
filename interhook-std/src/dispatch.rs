//! # Dispatcher
//!
//! The dispatcher owns the frozen route table and runs one chain per
//! interaction:
//!
//! | decision             | chain                                   |
//! |----------------------|-----------------------------------------|
//! | unknown              | unknown handlers only                   |
//! | known, no route      | none                                    |
//! | known, route         | global middleware, then route handlers  |
//!
//! Handlers run one at a time, in order. A handler returning
//! [`Flow::Halt`] ends the chain. Unless an error propagates, the
//! auto-responder runs afterwards and answers `204 No Content` if nobody
//! wrote a response.

use crate::classify::classify;
use crate::routing::{InteractionRouter, RouteRegistry, RouteTable, RouterCollector};
use interhook_core::{
    BoxError, BoxHandler, Capabilities, CommandDefinition, Context, DispatchError, Flow,
    Interaction, ResolveError, Responder, ResponseError, ResponseSink, RoutingDecision,
};
use std::sync::Arc;
#[cfg(feature = "timeout")]
use std::time::Duration;

/// Write `204 No Content` unless a response has already started.
///
/// Returns whether the fallback was written.
pub fn auto_respond(sink: &dyn ResponseSink) -> Result<bool, ResponseError> {
    if sink.headers_sent() {
        return Ok(false);
    }
    tracing::debug!("no response written, sending 204");
    sink.respond(204, &[], None)?;
    Ok(true)
}

/// Summary of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteResult {
    /// Whether a registered route (or an unknown handler) was found.
    pub matched: bool,
    /// Number of handlers that ran.
    pub executed: usize,
    /// Whether a handler halted the chain.
    pub halted: bool,
    /// Whether the 204 fallback was written.
    pub auto_responded: bool,
}

/// Frozen routing state, shared across requests.
pub struct Dispatcher<C> {
    routes: RouteTable<C>,
    middleware: Vec<BoxHandler<C>>,
    unknown: Vec<BoxHandler<C>>,
    commands: Vec<Arc<CommandDefinition>>,
    #[cfg(feature = "timeout")]
    deadline: Option<Duration>,
}

impl<C: Send + Sync + 'static> Dispatcher<C> {
    /// Start building a dispatcher.
    pub fn builder() -> DispatcherBuilder<C> {
        DispatcherBuilder::new()
    }

    /// The route table.
    pub fn routes(&self) -> &RouteTable<C> {
        &self.routes
    }

    /// Every command definition registered directly or through routers.
    pub fn commands(&self) -> &[Arc<CommandDefinition>] {
        &self.commands
    }

    /// Classify an interaction.
    pub fn classify(&self, interaction: Arc<Interaction>) -> Result<RoutingDecision, ResolveError> {
        classify(interaction)
    }

    /// Classify and run.
    pub async fn dispatch(
        &self,
        interaction: Arc<Interaction>,
        client: Arc<C>,
        sink: Arc<dyn ResponseSink>,
    ) -> Result<RouteResult, DispatchError> {
        let decision = self.classify(interaction)?;
        self.run(decision, client, sink).await
    }

    /// Run the chain selected by `decision`, then the auto-responder.
    ///
    /// Handler errors (and an expired deadline) propagate without writing
    /// a response; completing the exchange is then up to the caller.
    pub async fn run(
        &self,
        decision: RoutingDecision,
        client: Arc<C>,
        sink: Arc<dyn ResponseSink>,
    ) -> Result<RouteResult, DispatchError> {
        let (chain, capabilities): (Vec<&BoxHandler<C>>, Capabilities) = match &decision {
            RoutingDecision::Unknown { interaction } => {
                tracing::debug!(
                    interaction_type = interaction.interaction_type,
                    handlers = self.unknown.len(),
                    "dispatching unknown interaction"
                );
                (self.unknown.iter().collect(), Capabilities::all())
            }
            RoutingDecision::Known { kind, key, .. } => match self.routes.lookup(*kind, key) {
                Some(handlers) => {
                    tracing::debug!(%kind, %key, "dispatching interaction");
                    (
                        self.middleware.iter().chain(handlers).collect(),
                        Capabilities::for_kind(*kind),
                    )
                }
                None => {
                    tracing::debug!(%kind, %key, "no route registered");
                    let auto_responded = auto_respond(sink.as_ref())?;
                    return Ok(RouteResult {
                        auto_responded,
                        ..RouteResult::default()
                    });
                }
            },
        };

        tracing::debug!(length = chain.len(), "running handler chain");
        let responder = Responder::new(Arc::clone(&sink), capabilities);
        let run = run_chain(&chain, Arc::clone(decision.interaction()), client, responder);

        #[cfg(feature = "timeout")]
        let outcome = match self.deadline {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| DispatchError::Deadline(limit))?,
            None => run.await,
        };
        #[cfg(not(feature = "timeout"))]
        let outcome = run.await;

        let (executed, halted) = outcome?;
        let auto_responded = auto_respond(sink.as_ref())?;
        Ok(RouteResult {
            matched: matches!(decision, RoutingDecision::Known { .. }) || !chain.is_empty(),
            executed,
            halted,
            auto_responded,
        })
    }
}

async fn run_chain<C: Send + Sync + 'static>(
    chain: &[&BoxHandler<C>],
    interaction: Arc<Interaction>,
    client: Arc<C>,
    responder: Responder,
) -> Result<(usize, bool), BoxError> {
    for (position, handler) in chain.iter().enumerate() {
        let ctx = Context::new(
            Arc::clone(&interaction),
            Arc::clone(&client),
            responder.clone(),
        );
        if let Flow::Halt = handler.call_dyn(ctx).await? {
            tracing::debug!(position, "handler chain halted");
            return Ok((position + 1, true));
        }
    }
    Ok((chain.len(), false))
}

impl<C> std::fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes)
            .field("middleware", &self.middleware.len())
            .field("unknown", &self.unknown.len())
            .field("commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}

/// Accumulates routes and middleware, then freezes into a [`Dispatcher`].
pub struct DispatcherBuilder<C> {
    routes: RouteTable<C>,
    middleware: Vec<BoxHandler<C>>,
    unknown: Vec<BoxHandler<C>>,
    commands: Vec<Arc<CommandDefinition>>,
    #[cfg(feature = "timeout")]
    deadline: Option<Duration>,
}

impl<C> Default for DispatcherBuilder<C> {
    fn default() -> Self {
        Self {
            routes: RouteTable::default(),
            middleware: Vec::new(),
            unknown: Vec::new(),
            commands: Vec::new(),
            #[cfg(feature = "timeout")]
            deadline: None,
        }
    }
}

impl<C: Send + Sync + 'static> DispatcherBuilder<C> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append global middleware, run before every routed chain.
    pub fn middleware(&mut self, handlers: Vec<BoxHandler<C>>) -> &mut Self {
        self.middleware.extend(handlers);
        self
    }

    /// Append handlers for interactions that have no route kind.
    pub fn unknown(&mut self, handlers: Vec<BoxHandler<C>>) -> &mut Self {
        self.unknown.extend(handlers);
        self
    }

    /// Merge a router, prefixing its routes with its scoped middleware.
    pub fn register(&mut self, router: InteractionRouter<C>) -> &mut Self {
        let (scoped, routes, commands) = router.into_parts();
        tracing::debug!(routes = routes.len(), scoped = scoped.len(), "merging router");
        self.routes.merge(routes, &scoped);
        self.commands.extend(commands);
        self
    }

    /// Merge every router of a collector, in order.
    pub fn collect(&mut self, collector: RouterCollector<C>) -> &mut Self {
        for router in collector.into_routers() {
            self.register(router);
        }
        self
    }

    /// Bound the total time a chain may run.
    #[cfg(feature = "timeout")]
    pub fn deadline(&mut self, limit: Duration) -> &mut Self {
        self.deadline = Some(limit);
        self
    }

    /// Freeze the routes.
    pub fn build(self) -> Dispatcher<C> {
        Dispatcher {
            routes: self.routes,
            middleware: self.middleware,
            unknown: self.unknown,
            commands: self.commands,
            #[cfg(feature = "timeout")]
            deadline: self.deadline,
        }
    }
}

impl<C: Send + Sync + 'static> RouteRegistry<C> for DispatcherBuilder<C> {
    fn table_mut(&mut self) -> &mut RouteTable<C> {
        &mut self.routes
    }

    fn commands_mut(&mut self) -> &mut Vec<Arc<CommandDefinition>> {
        &mut self.commands
    }
}
