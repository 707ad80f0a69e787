//! Error types for interhook.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RouteError`] - Registration-time misuse (raised before traffic is served)
//! - [`ResolveError`] - Structurally invalid events detected while routing
//! - [`ResponseError`] - Failures writing to the response sink
//! - [`DispatchError`] - Everything that can propagate out of a dispatch

use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while registering routes.
///
/// These are programmer errors and surface during startup wiring.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A route was registered with zero handlers.
    #[error("at least one handler is required for {kind} route `{key}`")]
    EmptyHandlerList {
        /// Route kind the registration targeted.
        kind: &'static str,
        /// Route key the registration targeted.
        key: String,
    },

    /// An autocomplete path segment is missing or has the wrong option type.
    #[error("invalid autocomplete path segment `{segment}` (path so far: `{path}`)")]
    InvalidAutocompletePath {
        /// The segment that failed validation.
        segment: String,
        /// The colon-joined path accepted before the failure.
        path: String,
    },
}

/// Errors raised while resolving an event to a route.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// An autocomplete event carried no focused option.
    #[error("autocomplete event for command `{command}` has no focused option")]
    NoFocusedOption {
        /// Name of the command the event targeted.
        command: String,
    },
}

/// Errors raised while writing a response.
#[derive(Error, Debug)]
pub enum ResponseError {
    /// A terminal response was already written for this request.
    #[error("response already sent")]
    AlreadySent,

    /// The transport is no longer accepting a response.
    #[error("response channel closed")]
    Closed,

    /// The callback is not permitted for this interaction kind.
    #[error("callback `{callback}` is not supported for this interaction")]
    Unsupported {
        /// Name of the rejected callback.
        callback: &'static str,
    },

    /// The callback body could not be serialized.
    #[error("failed to encode callback body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors that propagate out of a dispatch.
///
/// When one of these is returned the auto-responder has not run; completing
/// the HTTP exchange is left to the caller.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A handler in the chain returned an error.
    #[error("handler error: {0}")]
    Handler(#[source] BoxError),

    /// The event could not be resolved to a route.
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// The fallback response could not be written.
    #[error("response error: {0}")]
    Response(#[from] ResponseError),

    /// The chain did not finish within the configured deadline.
    #[error("handler chain timed out after {0:?}")]
    Deadline(Duration),
}

impl From<BoxError> for DispatchError {
    fn from(err: BoxError) -> Self {
        DispatchError::Handler(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_handler_list_names_route() {
        let err = RouteError::EmptyHandlerList {
            kind: "button",
            key: "confirm".into(),
        };
        assert!(err.to_string().contains("button"));
        assert!(err.to_string().contains("confirm"));
    }

    #[test]
    fn boxed_error_becomes_handler_error() {
        let boxed: BoxError = "boom".into();
        let err: DispatchError = boxed.into();
        assert!(matches!(err, DispatchError::Handler(_)));
        assert!(err.to_string().contains("boom"));
    }
}
