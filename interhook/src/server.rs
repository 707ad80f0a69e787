//! The interaction server: gate, then ping answer or dispatch.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::gate::{Admission, IncomingRequest, PayloadGate};
use crate::verify::Verifier;
use interhook_core::{Capabilities, Responder, ResponseSink};
use interhook_std::dispatch::{Dispatcher, DispatcherBuilder, RouteResult};
use std::sync::Arc;

/// What happened to a request handled by [`InteractionServer::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The gate answered with this status.
    Rejected(u16),
    /// A ping was acknowledged.
    Pong,
    /// The interaction was dispatched.
    Dispatched(RouteResult),
}

/// Owns the gate, the frozen dispatcher and the REST capability.
pub struct InteractionServer<C> {
    gate: PayloadGate,
    dispatcher: Dispatcher<C>,
    client: Arc<C>,
}

impl<C: Send + Sync + 'static> InteractionServer<C> {
    /// Assemble a server from parts.
    pub fn new(gate: PayloadGate, dispatcher: Dispatcher<C>, client: Arc<C>) -> Self {
        Self {
            gate,
            dispatcher,
            client,
        }
    }

    /// Build a server from configuration and a populated dispatcher builder.
    ///
    /// Fails if the configured public key is not a valid Ed25519 key.
    pub fn from_config(
        config: &ServerConfig,
        mut builder: DispatcherBuilder<C>,
        client: Arc<C>,
    ) -> Result<Self, ServerError> {
        let verifier = Verifier::from_hex(&config.public_key)?;
        if let Some(limit) = config.chain_deadline {
            builder.deadline(limit);
        }
        let gate = PayloadGate::new(config.endpoint.clone(), verifier);
        Ok(Self::new(gate, builder.build(), client))
    }

    /// The admission gate.
    pub fn gate(&self) -> &PayloadGate {
        &self.gate
    }

    /// The dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<C> {
        &self.dispatcher
    }

    /// The REST capability handed to handlers.
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Handle one request end to end.
    ///
    /// On `Err` no response may have been written; the transport decides how
    /// to finish the exchange.
    pub async fn handle<R: IncomingRequest>(
        &self,
        request: R,
        sink: Arc<dyn ResponseSink>,
    ) -> Result<Handled, ServerError> {
        let interaction = match self.gate.admit(request, sink.as_ref()).await? {
            Admission::Accepted(interaction) => interaction,
            Admission::Terminated(status) => return Ok(Handled::Rejected(status)),
        };

        if interaction.is_ping() {
            tracing::debug!("answering ping");
            Responder::new(sink, Capabilities::PONG).pong()?;
            return Ok(Handled::Pong);
        }

        let result = self
            .dispatcher
            .dispatch(Arc::new(interaction), Arc::clone(&self.client), sink)
            .await?;
        Ok(Handled::Dispatched(result))
    }
}

impl<C> std::fmt::Debug for InteractionServer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionServer")
            .field("gate", &self.gate)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
