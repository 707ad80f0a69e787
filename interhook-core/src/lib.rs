//! # interhook-core
//!
//! Core types for the interhook interaction server.
//!
//! This crate has minimal dependencies and is meant to be imported by code
//! that only defines handlers or transports, without pulling in the routing
//! implementation from `interhook-std` or the HTTP stack from `interhook`.
//!
//! # Building Blocks
//!
//! ## Chain control ([`Flow`])
//!
//! Each handler returns `Continue` or `Halt`. Halting ends the chain without
//! error; errors travel separately and always propagate.
//!
//! ## Handlers ([`Handler`])
//!
//! Middleware and route handlers are the same thing: async functions of a
//! [`Context`]. Closures implement [`Handler`] automatically; route tables
//! store them as [`BoxHandler`].
//!
//! ## Interactions ([`Interaction`])
//!
//! The decoded webhook body, with the variant payload in
//! [`InteractionData`] and the raw JSON kept for anything unmodelled.
//!
//! ## Responses ([`ResponseSink`], [`Responder`])
//!
//! The transport owns the response state; handlers answer through a
//! [`Responder`] whose [`Capabilities`] depend on the [`RouteKind`].
//!
//! # Error Types
//!
//! - [`RouteError`] - Registration misuse
//! - [`ResolveError`] - Events that cannot be routed
//! - [`ResponseError`] - Response write failures
//! - [`DispatchError`] - Everything propagated out of a dispatch

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod callback;
mod command;
mod error;
mod flow;
mod handler;
mod interaction;
mod kind;
mod sink;

// Re-exports
pub use callback::{Choice, InteractionCallback, MessageFlags, MessagePayload, ModalPayload};
pub use command::{CommandDefinition, OptionDefinition};
pub use error::{BoxError, DispatchError, ResolveError, ResponseError, RouteError};
pub use flow::{Flow, IntoFlow};
pub use handler::{BoxHandler, Context, DynHandler, Handler, boxed};
pub use interaction::{
    CommandData, CommandOption, CommandType, ComponentData, ComponentType, Interaction,
    InteractionData, InteractionType, ModalSubmitData, OptionType,
};
pub use kind::{RouteKind, RoutingDecision};
pub use sink::{Capabilities, Responder, ResponseSink};
