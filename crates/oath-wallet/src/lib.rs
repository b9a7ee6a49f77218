//! # OATH Wallet - Injected Wallet Provider Adapter
//!
//! Isolates all interaction with the injected browser wallet so the rest of
//! the system never touches it directly.
//!
//! ## Responsibilities
//!
//! - Account discovery (`eth_accounts`) and connection (`eth_requestAccounts`)
//! - Network query (`eth_chainId`) and switching
//!   (`wallet_switchEthereumChain` with `wallet_addEthereumChain` fallback)
//! - Forwarding provider-side events (`accountsChanged`, `chainChanged`,
//!   `disconnect`) on a broadcast channel, one delivered event per
//!   provider-side event; the adapter never synthesizes extra events
//!
//! ## Concurrency
//!
//! Exactly one `request_accounts` may be outstanding at a time. A second
//! concurrent call fails with [`ProviderError::RequestPending`] rather than
//! being queued, mirroring wallet-extension behavior.
//!
//! Every operation may trigger a wallet-extension UI prompt and therefore
//! may suspend indefinitely pending human interaction; callers impose their
//! own timeouts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapter;
pub mod adapters;
pub mod chains;
pub mod errors;
pub mod provider;

pub use adapter::WalletAdapter;
pub use adapters::MockProvider;
pub use chains::ChainMetadata;
pub use errors::{ProviderError, RpcError};
pub use provider::{methods, InjectedProvider, ProviderEvent};

/// Broadcast capacity for the provider event channel.
///
/// Provider events are rare (human-driven); a small buffer is enough to
/// absorb a burst while the session task catches up.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
