//! # interhook-std
//!
//! Standard routing and dispatch for interhook.
//!
//! This crate provides:
//! - **Routing**: [`RouteTable`], [`InteractionRouter`], [`RouterCollector`]
//!   and the shared [`RouteRegistry`] surface, plus the [`handlers!`] macro
//! - **Autocomplete keys**: [`AutocompleteKeyBuilder`] and
//!   [`resolve_focused_path`]
//! - **Dispatch**: [`classify`], [`Dispatcher`], [`auto_respond`]
//! - **Standard hooks**: Logging, Timeout
//!
//! [`RouteTable`]: routing::RouteTable
//! [`InteractionRouter`]: routing::InteractionRouter
//! [`RouterCollector`]: routing::RouterCollector
//! [`RouteRegistry`]: routing::RouteRegistry
//! [`AutocompleteKeyBuilder`]: autocomplete::AutocompleteKeyBuilder
//! [`resolve_focused_path`]: autocomplete::resolve_focused_path
//! [`classify`]: classify::classify
//! [`Dispatcher`]: dispatch::Dispatcher
//! [`auto_respond`]: dispatch::auto_respond

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use interhook_core;

// Modules
pub mod autocomplete;
pub mod classify;
pub mod dispatch;
pub mod hooks;
pub mod routing;
pub mod testing;
