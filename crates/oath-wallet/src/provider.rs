//! # Injected Provider Port
//!
//! The external collaborator with a fixed interface: the injected browser
//! wallet object. Adapters implement [`InjectedProvider`]; the rest of the
//! workspace only ever sees the typed [`crate::WalletAdapter`] built on top
//! of it.

use crate::errors::RpcError;
use async_trait::async_trait;
use oath_types::{Address, ChainId};
use serde_json::Value;
use tokio::sync::broadcast;

/// Request method names of the injected-provider protocol.
pub mod methods {
    /// Request account access (prompts the user).
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    /// Passive query of currently authorized accounts.
    pub const ACCOUNTS: &str = "eth_accounts";
    /// Active chain id, hex-encoded.
    pub const CHAIN_ID: &str = "eth_chainId";
    /// Ask the wallet to switch to a chain it already knows.
    pub const SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
    /// Ask the wallet to add a chain it does not know yet.
    pub const ADD_CHAIN: &str = "wallet_addEthereumChain";
}

/// A provider-side event, delivered exactly once per wallet-side occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The authorized account list changed. Empty means the user revoked
    /// access to every account, which the session layer treats as a
    /// disconnect.
    AccountsChanged(Vec<Address>),
    /// The wallet switched to a different chain.
    ChainChanged(ChainId),
    /// The provider lost its connection entirely.
    Disconnected,
}

/// The injected wallet object, as a port.
///
/// Mirrors the browser `request({ method, params })` surface: one generic
/// JSON request/response call plus event subscription. Every request may
/// open a wallet UI prompt and suspend until the human answers.
#[async_trait]
pub trait InjectedProvider: Send + Sync {
    /// Performs a provider request.
    ///
    /// `params` is the JSON params array for the method (may be `Value::Null`
    /// for parameterless methods).
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError>;

    /// Subscribes to provider-side events.
    ///
    /// Each receiver observes every event emitted after subscription.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}
