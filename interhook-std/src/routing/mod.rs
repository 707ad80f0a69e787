//! # Routing
//!
//! Routes are collected in a [`RouteTable`], either directly through the
//! dispatcher builder or through independently authored
//! [`InteractionRouter`]s that are merged in later. Both expose the same
//! [`RouteRegistry`] surface.

pub mod router;
pub mod table;

pub use router::{InteractionRouter, RouteRegistry, RouterCollector};
pub use table::RouteTable;
