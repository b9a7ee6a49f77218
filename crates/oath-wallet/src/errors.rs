//! # Error Types
//!
//! Provider-side error taxonomy. All variants are recoverable locally by
//! prompting the user again; none are fatal to the running session.

use thiserror::Error;

// =============================================================================
// RPC ERRORS (wire level)
// =============================================================================

/// A raw error returned by the injected provider.
///
/// Codes follow the injected-provider convention (EIP-1193 / EIP-1474):
/// `4001` user rejected, `-32002` request already pending, `4902`
/// unrecognized chain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("provider rpc error {code}: {message}")]
pub struct RpcError {
    /// Provider error code.
    pub code: i64,
    /// Provider-supplied message.
    pub message: String,
}

impl RpcError {
    /// User rejected the request (declined the wallet prompt).
    pub const USER_REJECTED: i64 = 4001;

    /// A request of this kind is already pending in the wallet UI.
    pub const REQUEST_PENDING: i64 = -32002;

    /// The wallet does not know the requested chain.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;

    /// Creates an error with the given code and message.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

// =============================================================================
// PROVIDER ERRORS (typed)
// =============================================================================

/// Typed failures from the wallet provider adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No wallet extension detected in the environment.
    #[error("no wallet provider found; install a wallet extension")]
    NoProviderFound,

    /// The user declined the wallet prompt.
    #[error("connection rejected by user")]
    UserRejected,

    /// A prior request is still outstanding; it must not be retried
    /// concurrently.
    #[error("connection request already pending; check the wallet")]
    RequestPending,

    /// The user declined the network switch (or the add-chain fallback).
    #[error("network switch rejected by user")]
    SwitchRejected,

    /// The wallet returned an empty account list (locked wallet).
    #[error("no accounts available; unlock the wallet")]
    NoAccounts,

    /// The provider returned a response the adapter could not interpret.
    #[error("malformed provider response: {0}")]
    InvalidResponse(String),

    /// Any other provider error, surfaced with its code and message.
    #[error("wallet error {code}: {message}")]
    Rpc {
        /// Provider error code.
        code: i64,
        /// Provider-supplied message.
        message: String,
    },
}

impl From<RpcError> for ProviderError {
    fn from(err: RpcError) -> Self {
        match err.code {
            RpcError::USER_REJECTED => Self::UserRejected,
            RpcError::REQUEST_PENDING => Self::RequestPending,
            _ => Self::Rpc {
                code: err.code,
                message: err.message,
            },
        }
    }
}
