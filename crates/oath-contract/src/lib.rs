//! # OATH Contract - Contract Access Layer
//!
//! Binds the fixed Oath contract address and interface to whichever
//! provider/signer pair is currently active, and exposes strongly-typed
//! read/write operations. The business logic (ownership, batch lifecycle,
//! dispensing authorization) lives in the on-chain contract; this layer is a
//! typed RPC client over an opaque surface.
//!
//! ## Binding state machine
//!
//! ```text
//! Uninitialized ──bind_read_only()──▶ ReadOnly ──bind_signer()──▶ ReadWrite
//!       ▲                                │                            │
//!       └────────────── reset() ◀────────┴────────────────────────────┘
//! ```
//!
//! - Reads work in `ReadOnly` and `ReadWrite`; in `Uninitialized` they fail
//!   with [`ContractError::SignerOrProviderUnavailable`].
//! - Writes require `ReadWrite`; otherwise [`ContractError::SignerRequired`].
//! - Account change, chain change, or disconnect resets to `Uninitialized`;
//!   the binding must be freshly rebound before further use. Only the
//!   session layer's event task performs the reset.
//!
//! ## Write semantics
//!
//! Every write waits for one confirmation and returns the transaction hash.
//! There is no retry-on-failure: a reverted or dropped transaction is a
//! terminal error and any retry is the caller's responsibility. Revert
//! reasons are surfaced verbatim when the node provides one.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod abi;
pub mod adapters;
pub mod binding;
pub mod client;
pub mod errors;
pub mod ports;

pub use abi::AbiValue;
pub use adapters::InMemoryLedger;
pub use binding::{Binding, BindingState};
pub use client::{ClientConfig, ContractClient, PrescriptionReceipt, PrescriptionSummary, TxOutcome};
pub use errors::{ContractError, TransportError};
pub use ports::{ContractTransport, EventLog, TxReceipt};
