//! # Error Types
//!
//! Transport-level and contract-layer error taxonomies. Every failure path
//! carries enough context (kind plus optional underlying message) for a
//! portal to render a specific, user-presentable message.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// TRANSPORT ERRORS (wire level)
// =============================================================================

/// Errors from the contract transport seam.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The contract rejected the call or transaction. The reason string is
    /// surfaced verbatim when the node provides one.
    #[error("execution reverted{}", reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    Reverted {
        /// Node-provided revert reason, when available.
        reason: Option<String>,
    },

    /// RPC-level failure (endpoint unreachable, malformed response, dropped
    /// transaction).
    #[error("rpc failure: {0}")]
    Rpc(String),

    /// The transport could not decode returndata or logs.
    #[error("decode failure: {0}")]
    Decode(String),
}

// =============================================================================
// CONTRACT-LAYER ERRORS (typed)
// =============================================================================

/// Typed failures from the contract access layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// A write was attempted before a signer was bound.
    #[error("write requires a connected wallet; connect first")]
    SignerRequired,

    /// The layer was used before any provider was bound.
    #[error("contract layer not initialized; no provider bound")]
    SignerOrProviderUnavailable,

    /// A read for an entity that was never created.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("batch", "prescription").
        entity: &'static str,
        /// The identifier that was queried.
        id: String,
    },

    /// The contract rejected the transaction on-chain.
    #[error("transaction reverted{}", reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    TransactionReverted {
        /// Node-provided revert reason, when available.
        reason: Option<String>,
    },

    /// A confirmed receipt was missing an event the contract is required to
    /// emit. Surfaced as a hard error rather than deriving an identifier
    /// from the transaction hash, which could collide.
    #[error("confirmed receipt missing required event {event}")]
    MissingEvent {
        /// Name of the expected event.
        event: &'static str,
    },

    /// The operation exceeded its timeout. Distinct from a hard failure;
    /// the caller may retry. Any late transport result is discarded.
    #[error("operation timed out after {waited:?}")]
    OperationTimedOut {
        /// How long the layer waited before giving up.
        waited: Duration,
    },

    /// The transport returned a result the layer could not interpret.
    #[error("malformed contract response: {0}")]
    Decode(String),

    /// Underlying transport failure.
    #[error(transparent)]
    Transport(TransportError),
}

impl From<TransportError> for ContractError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Reverted { reason } => Self::TransactionReverted { reason },
            TransportError::Decode(msg) => Self::Decode(msg),
            other => Self::Transport(other),
        }
    }
}
