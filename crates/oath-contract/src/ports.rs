//! # Transport Port
//!
//! The seam between the typed client and whatever actually executes calls:
//! a node RPC bridge in production, the in-memory ledger in tests. The
//! transport owns ABI encoding/decoding and confirmation waiting; the client
//! owns typing, binding state, and timeouts.

use crate::abi::AbiValue;
use crate::errors::TransportError;
use async_trait::async_trait;
use oath_types::{Address, TxHash};

/// A decoded event emitted by a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    /// Event name as declared in the contract interface.
    pub event: String,
    /// Decoded event arguments in declaration order.
    pub values: Vec<AbiValue>,
}

/// Receipt of a transaction that reached one confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
    /// Events emitted during execution, decoded.
    pub logs: Vec<EventLog>,
}

/// Executes calls against the fixed Oath contract.
#[async_trait]
pub trait ContractTransport: Send + Sync {
    /// Executes a read-only call. No state mutation, no confirmation wait.
    async fn call(
        &self,
        function: &str,
        args: Vec<AbiValue>,
    ) -> Result<Vec<AbiValue>, TransportError>;

    /// Submits a transaction from `from` and waits for one confirmation.
    ///
    /// A revert (at submission or during confirmation) is
    /// [`TransportError::Reverted`] with the node's reason when available.
    /// No retries: a dropped transaction surfaces as [`TransportError::Rpc`].
    async fn send(
        &self,
        function: &str,
        args: Vec<AbiValue>,
        from: Address,
    ) -> Result<TxReceipt, TransportError>;
}
