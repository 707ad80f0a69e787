//! Transport adapters.

#[cfg(feature = "axum")]
pub mod axum;
