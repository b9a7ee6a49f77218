//! # Error Types
//!
//! Session-layer error taxonomy. Wraps the provider and contract taxonomies
//! so portals handle one error type per flow.

use crate::store::StoreError;
use oath_contract::ContractError;
use oath_types::ChainId;
use oath_wallet::ProviderError;
use thiserror::Error;

/// Typed failures from the session layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// One of the three membership predicates failed; no role is guessed
    /// from partial data.
    #[error("role resolution failed: {source}")]
    RoleResolutionFailed {
        /// The failing predicate's error.
        source: ContractError,
    },

    /// Wallet-side failure during connect or restore.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Contract-side failure outside role resolution.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// The persisted session store failed.
    #[error("session store failure: {0}")]
    Store(#[from] StoreError),

    /// Connected to a network other than the target and the switch did not
    /// take effect.
    #[error("wrong network: connected to chain {actual}")]
    WrongNetwork {
        /// The chain the wallet is actually on.
        actual: ChainId,
    },
}
