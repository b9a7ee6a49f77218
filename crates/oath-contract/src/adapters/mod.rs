//! # Transport Adapters
//!
//! Implementations of the [`crate::ContractTransport`] port. The in-memory
//! ledger emulates the deployed contract for tests and demos; the production
//! node-RPC bridge is supplied by the embedding environment.

mod in_memory;

pub use in_memory::InMemoryLedger;
