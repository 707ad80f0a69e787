//! # interhook - Verified Webhook Interaction Server
//!
//! `interhook` receives platform interactions over HTTP, verifies their
//! Ed25519 signatures, and dispatches them through ordered handler chains.
//! Every request gets exactly one response: either a handler writes one,
//! the gate rejects the request, or a `204 No Content` is sent once the
//! chain finishes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use interhook::prelude::*;
//! use std::{path::Path, sync::Arc};
//!
//! async fn ping(ctx: Context<Rest>) -> Result<Flow, ResponseError> {
//!     ctx.responder().reply("Pong!")?;
//!     Ok(Flow::Halt)
//! }
//!
//! let mut builder = Dispatcher::<Rest>::builder();
//! builder.middleware(handlers![LoggingHook]);
//! builder.command(CommandDefinition::new("ping", "Replies with pong"), handlers![ping])?;
//!
//! let config = ServerConfig::load(Some(Path::new("interhook.toml")))?;
//! interhook::logger::init(&config.log_level, true)?;
//! interhook::adapter::axum::run(&config, builder, Arc::new(Rest::new())).await?;
//! ```
//!
//! ## Crates
//!
//! - `interhook-core`: handler traits, the interaction model, responses
//! - `interhook-std`: route tables, autocomplete keys, the dispatcher
//! - `interhook`: verification, the payload gate, server, config, transport

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod adapter;
pub mod config;
pub mod error;
pub mod gate;
pub mod logger;
pub mod server;
pub mod testing;
pub mod verify;

pub use interhook_core::{
    BoxError, BoxHandler, Capabilities, Choice, CommandData, CommandDefinition, CommandOption,
    CommandType, ComponentData, ComponentType, Context, DispatchError, DynHandler, Flow, Handler,
    Interaction, InteractionCallback, InteractionData, InteractionType, IntoFlow, MessageFlags,
    MessagePayload, ModalPayload, ModalSubmitData, OptionDefinition, OptionType, ResolveError,
    Responder, ResponseError, ResponseSink, RouteError, RouteKind, RoutingDecision, boxed,
};
pub use interhook_std::{
    autocomplete::{AutocompleteKey, AutocompleteKeyBuilder, resolve_focused_path},
    classify::classify,
    dispatch::{Dispatcher, DispatcherBuilder, RouteResult, auto_respond},
    handlers,
    hooks::{LoggingHook, TimeoutError, TimeoutHook},
    routing::{InteractionRouter, RouteRegistry, RouteTable, RouterCollector},
};

pub use config::{ConfigError, ConfigOverrides, ServerConfig};
pub use error::ServerError;
pub use gate::{Admission, BodyError, GateError, IncomingRequest, PayloadGate};
pub use server::{Handled, InteractionServer};
pub use verify::{SignatureError, Verifier, verify};

/// Everything needed to write handlers and wire a server.
pub mod prelude {
    pub use crate::{
        CommandDefinition, Context, Dispatcher, Flow, Handler, InteractionRouter, LoggingHook,
        MessagePayload, OptionDefinition, ResponseError, RouteRegistry, RouterCollector,
        ServerConfig, handlers,
    };
}
