//! # Wallet Adapter
//!
//! Typed operations over the injected provider port. This is the only place
//! in the workspace that speaks the raw provider protocol; everything above
//! it works with [`Address`], [`ChainId`], and [`NetworkInfo`].

use crate::chains;
use crate::errors::{ProviderError, RpcError};
use crate::provider::{methods, InjectedProvider, ProviderEvent};
use oath_types::{Address, ChainId, NetworkInfo};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Typed adapter over the injected wallet provider.
///
/// Holds no session state of its own: it is a stateless translation layer
/// apart from the single-flight guard on `request_accounts`.
pub struct WalletAdapter {
    /// The detected provider, or `None` when no wallet extension exists.
    provider: Option<Arc<dyn InjectedProvider>>,
    /// Guard: at most one `eth_requestAccounts` outstanding at a time.
    connect_in_flight: AtomicBool,
}

/// Resets the in-flight flag on every exit path, including early returns.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl WalletAdapter {
    /// Creates an adapter over the detected provider, or an adapter that
    /// fails every operation with [`ProviderError::NoProviderFound`] when no
    /// wallet extension was detected.
    #[must_use]
    pub fn new(provider: Option<Arc<dyn InjectedProvider>>) -> Self {
        Self {
            provider,
            connect_in_flight: AtomicBool::new(false),
        }
    }

    /// True when a wallet extension was detected.
    #[must_use]
    pub fn detected(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&Arc<dyn InjectedProvider>, ProviderError> {
        self.provider.as_ref().ok_or(ProviderError::NoProviderFound)
    }

    /// Requests account access, prompting the user.
    ///
    /// Returns the non-empty ordered account list on success. A second call
    /// while one is outstanding fails with [`ProviderError::RequestPending`]
    /// without touching the wallet.
    pub async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let provider = self.provider()?;

        // Single-flight: reject, never queue.
        if self
            .connect_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("request_accounts rejected: a prior request is still outstanding");
            return Err(ProviderError::RequestPending);
        }
        let _guard = InFlightGuard(&self.connect_in_flight);

        let correlation_id = Uuid::new_v4();
        debug!(%correlation_id, "Requesting account access");

        let value = provider
            .request(methods::REQUEST_ACCOUNTS, Value::Null)
            .await?;
        let accounts = parse_accounts(&value)?;
        if accounts.is_empty() {
            return Err(ProviderError::NoAccounts);
        }

        info!(
            %correlation_id,
            account = %accounts[0],
            count = accounts.len(),
            "Wallet connected"
        );
        Ok(accounts)
    }

    /// Passive query of currently authorized accounts. Never prompts;
    /// returns an empty list when nothing is authorized.
    pub async fn get_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let provider = self.provider()?;
        let value = provider.request(methods::ACCOUNTS, Value::Null).await?;
        parse_accounts(&value)
    }

    /// Returns the active chain id and its human-readable name.
    pub async fn get_network(&self) -> Result<NetworkInfo, ProviderError> {
        let provider = self.provider()?;
        let value = provider.request(methods::CHAIN_ID, Value::Null).await?;
        let raw = value
            .as_str()
            .ok_or_else(|| ProviderError::InvalidResponse(format!("chain id: {value}")))?;
        let chain_id = ChainId::from_hex(raw)
            .map_err(|e| ProviderError::InvalidResponse(format!("chain id {raw:?}: {e}")))?;
        Ok(NetworkInfo {
            chain_id,
            name: chains::network_name(chain_id).to_string(),
        })
    }

    /// Asks the wallet to switch to `target`.
    ///
    /// If the wallet does not know the chain, falls back to an add-chain
    /// request with full metadata. The user declining either step is
    /// [`ProviderError::SwitchRejected`].
    pub async fn switch_network(&self, target: ChainId) -> Result<(), ProviderError> {
        let provider = self.provider()?;
        debug!(chain = %target.to_hex(), "Requesting network switch");

        let params = json!([{ "chainId": target.to_hex() }]);
        match provider.request(methods::SWITCH_CHAIN, params).await {
            Ok(_) => Ok(()),
            Err(e) if e.code == RpcError::USER_REJECTED => Err(ProviderError::SwitchRejected),
            Err(e) if e.code == RpcError::UNRECOGNIZED_CHAIN => {
                self.add_chain(provider, target).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn add_chain(
        &self,
        provider: &Arc<dyn InjectedProvider>,
        target: ChainId,
    ) -> Result<(), ProviderError> {
        let Some(meta) = chains::metadata(target) else {
            warn!(chain = %target.to_hex(), "No add-chain metadata for unrecognized chain");
            return Err(ProviderError::Rpc {
                code: RpcError::UNRECOGNIZED_CHAIN,
                message: format!("chain {} unknown to wallet and client", target.to_hex()),
            });
        };

        info!(chain = meta.name, "Chain unknown to wallet; requesting add");
        match provider
            .request(methods::ADD_CHAIN, meta.to_add_chain_params())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.code == RpcError::USER_REJECTED => Err(ProviderError::SwitchRejected),
            Err(e) => Err(e.into()),
        }
    }

    /// Subscribes to provider-side events.
    ///
    /// The adapter forwards the provider's channel directly; it never
    /// synthesizes events of its own.
    pub fn subscribe(&self) -> Result<broadcast::Receiver<ProviderEvent>, ProviderError> {
        Ok(self.provider()?.subscribe())
    }
}

fn parse_accounts(value: &Value) -> Result<Vec<Address>, ProviderError> {
    let entries = value
        .as_array()
        .ok_or_else(|| ProviderError::InvalidResponse(format!("accounts: {value}")))?;
    entries
        .iter()
        .map(|entry| {
            let s = entry
                .as_str()
                .ok_or_else(|| ProviderError::InvalidResponse(format!("account: {entry}")))?;
            s.parse::<Address>()
                .map_err(|e| ProviderError::InvalidResponse(format!("account {s:?}: {e}")))
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
