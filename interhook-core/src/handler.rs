//! # Handlers
//!
//! Middleware and route handlers share one shape: an async function of a
//! [`Context`] returning something that converts into a [`Flow`]. There is no
//! separate middleware trait; a "middleware" is simply a handler that sits
//! earlier in the chain and usually returns [`Flow::Continue`].
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|ctx: Context<Rest>| async move { ... }`
//! 2. **Struct implementation**: `impl<C> Handler<C> for MyHook`
//!
//! Route tables store handlers type-erased as [`BoxHandler`].

use crate::error::BoxError;
use crate::flow::{Flow, IntoFlow};
use crate::interaction::Interaction;
use crate::sink::Responder;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Per-handler view of one request.
///
/// Cloning is cheap: the interaction and the client are shared, and the
/// responder refers to the same underlying sink.
pub struct Context<C> {
    interaction: Arc<Interaction>,
    client: Arc<C>,
    responder: Responder,
}

impl<C> Context<C> {
    /// Assemble a context for one handler invocation.
    pub fn new(interaction: Arc<Interaction>, client: Arc<C>, responder: Responder) -> Self {
        Self {
            interaction,
            client,
            responder,
        }
    }

    /// The decoded interaction being handled.
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Shared handle to the interaction.
    pub fn interaction_arc(&self) -> Arc<Interaction> {
        Arc::clone(&self.interaction)
    }

    /// The REST capability injected at server construction.
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Capability-checked access to the HTTP response.
    pub fn responder(&self) -> &Responder {
        &self.responder
    }
}

impl<C> Clone for Context<C> {
    fn clone(&self) -> Self {
        Self {
            interaction: Arc::clone(&self.interaction),
            client: Arc::clone(&self.client),
            responder: self.responder.clone(),
        }
    }
}

impl<C> std::fmt::Debug for Context<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("interaction", &self.interaction.id)
            .field("responder", &self.responder)
            .finish_non_exhaustive()
    }
}

/// A step in a handler chain.
///
/// Implemented automatically for any `Fn(Context<C>) -> impl Future` whose
/// output is `()`, [`Flow`], or a `Result` of either.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as an interaction handler",
    label = "missing `Handler<{C}>` implementation",
    note = "Handlers are async functions taking `Context<{C}>` and returning `()`, `Flow`, or a `Result` of either."
)]
pub trait Handler<C>: Send + Sync + 'static
where
    C: Send + Sync + 'static,
{
    /// Run this step.
    fn call(&self, ctx: Context<C>) -> impl Future<Output = Result<Flow, BoxError>> + Send;
}

impl<C, F, Fut> Handler<C> for F
where
    C: Send + Sync + 'static,
    F: Fn(Context<C>) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: IntoFlow,
{
    async fn call(&self, ctx: Context<C>) -> Result<Flow, BoxError> {
        (self)(ctx).await.into_flow()
    }
}

/// Object-safe version of [`Handler`].
pub trait DynHandler<C>: Send + Sync + 'static
where
    C: Send + Sync + 'static,
{
    /// Run this step (dynamic dispatch version).
    fn call_dyn(&self, ctx: Context<C>) -> BoxFuture<'_, Result<Flow, BoxError>>;
}

impl<C, H> DynHandler<C> for H
where
    C: Send + Sync + 'static,
    H: Handler<C>,
{
    fn call_dyn(&self, ctx: Context<C>) -> BoxFuture<'_, Result<Flow, BoxError>> {
        Box::pin(self.call(ctx))
    }
}

/// A shared, type-erased handler as stored in route tables.
pub type BoxHandler<C> = Arc<dyn DynHandler<C>>;

/// Erase a handler so it can be stored in a route table.
pub fn boxed<C, H>(handler: H) -> BoxHandler<C>
where
    C: Send + Sync + 'static,
    H: Handler<C>,
{
    Arc::new(handler)
}
