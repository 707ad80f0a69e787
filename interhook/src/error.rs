//! Top-level error type for the server facade.

use crate::config::ConfigError;
use crate::gate::GateError;
use crate::verify::SignatureError;
use interhook_core::{DispatchError, ResponseError};
use thiserror::Error;

/// Everything that can go wrong building or running a server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The request could not be admitted.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Dispatch failed after admission.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The ping acknowledgement could not be written.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configured public key is unusable.
    #[error("invalid public key: {0}")]
    PublicKey(#[from] SignatureError),

    /// Listener or socket failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Logger initialisation failed.
    #[error("logger error: {0}")]
    Logger(String),
}
