//! # Chain control
//!
//! Every handler in a chain tells the runner whether the chain should keep
//! going. Halting is a normal outcome, not an error: the runner stops, the
//! auto-responder still runs, and nothing is reported to the caller. Errors
//! travel on the separate `Err` path and always propagate.

use crate::error::BoxError;

/// Result of a handler indicating whether the chain continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Run the next handler in the chain.
    #[default]
    Continue,
    /// Stop the chain here (the cooperative `flush`).
    Halt,
}

impl Flow {
    /// Returns `true` if this is [`Flow::Halt`].
    pub const fn is_halt(self) -> bool {
        matches!(self, Flow::Halt)
    }
}

/// Trait for converting a handler's output into a [`Flow`].
///
/// # Default Implementations
///
/// - `()` → `Continue`
/// - `Flow` → As is
/// - `Result<T, E>` → Delegates to inner `T` or propagates the error
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned from a handler",
    label = "missing `IntoFlow` implementation",
    note = "Handlers return `()`, `Flow`, or a `Result` wrapping either."
)]
pub trait IntoFlow {
    /// Convert the output into chain control or an error.
    fn into_flow(self) -> Result<Flow, BoxError>;
}

impl IntoFlow for () {
    fn into_flow(self) -> Result<Flow, BoxError> {
        Ok(Flow::Continue)
    }
}

impl IntoFlow for Flow {
    fn into_flow(self) -> Result<Flow, BoxError> {
        Ok(self)
    }
}

impl<T, E> IntoFlow for Result<T, E>
where
    T: IntoFlow,
    E: Into<BoxError>,
{
    fn into_flow(self) -> Result<Flow, BoxError> {
        match self {
            Ok(t) => t.into_flow(),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_continues() {
        assert_eq!(().into_flow().unwrap(), Flow::Continue);
    }

    #[test]
    fn result_delegates() {
        let ok: Result<Flow, BoxError> = Ok(Flow::Halt);
        assert_eq!(ok.into_flow().unwrap(), Flow::Halt);

        let err: Result<(), std::io::Error> = Err(std::io::Error::other("nope"));
        assert!(err.into_flow().is_err());
    }
}
