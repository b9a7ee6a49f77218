//! # Session Manager
//!
//! Owns the session lifecycle: connect, silent restore, disconnect, and the
//! event task that rebinds the contract layer when the wallet changes
//! underneath us.

use crate::errors::SessionError;
use crate::resolver::resolve_role;
use crate::store::{clear_session, load_persisted, save_session, SessionStore};
use oath_contract::{BindingState, ContractClient, ContractTransport};
use oath_types::{Address, ChainId, Session};
use oath_wallet::{ProviderEvent, WalletAdapter};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Coordinates wallet, contract binding, role resolution, and persistence.
///
/// All state transitions funnel through this type; portals hold an `Arc`
/// and only ever observe the current [`Session`] snapshot.
pub struct SessionManager {
    wallet: Arc<WalletAdapter>,
    client: Arc<ContractClient>,
    transport: Arc<dyn ContractTransport>,
    store: Arc<dyn SessionStore>,
    target_chain: ChainId,
    session: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Creates a manager over the given collaborators, targeting Sepolia.
    #[must_use]
    pub fn new(
        wallet: Arc<WalletAdapter>,
        client: Arc<ContractClient>,
        transport: Arc<dyn ContractTransport>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            wallet,
            client,
            transport,
            store,
            target_chain: ChainId::SEPOLIA,
            session: RwLock::new(None),
        }
    }

    /// The contract client this manager binds. Portals issue reads and
    /// writes through it.
    #[must_use]
    pub fn client(&self) -> &Arc<ContractClient> {
        &self.client
    }

    /// Snapshot of the current session, if connected.
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Binds the contract layer read-only so public reads (drug
    /// verification, batch lookups) work before any wallet is connected.
    pub async fn initialize(&self) {
        self.client.bind_read_only(Arc::clone(&self.transport)).await;
    }

    /// Connects the wallet interactively and establishes a session.
    ///
    /// Prompts for account access, steers the wallet to the target network
    /// (switching, or adding then switching, as needed), binds the signer,
    /// and resolves the role from on-chain membership. The persisted hint is
    /// updated only after the whole flow succeeds.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> Result<Session, SessionError> {
        let accounts = self.wallet.request_accounts().await?;
        // request_accounts guarantees a non-empty list.
        let address = accounts[0];

        let network = self.wallet.get_network().await?;
        if network.chain_id != self.target_chain {
            self.wallet.switch_network(self.target_chain).await?;
            let switched = self.wallet.get_network().await?;
            if switched.chain_id != self.target_chain {
                return Err(SessionError::WrongNetwork {
                    actual: switched.chain_id,
                });
            }
        }

        self.establish(address).await
    }

    /// Attempts a silent restore from the persisted hint.
    ///
    /// Never prompts: uses the passive account query, and gives up (returning
    /// `Ok(None)`) when no hint exists, the wallet is locked, the authorized
    /// account differs from the hint, or the wallet is on another network.
    /// The role is re-resolved from chain state; the hinted role is never
    /// trusted.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<Option<Session>, SessionError> {
        let Some(hint) = load_persisted(self.store.as_ref()).await? else {
            return Ok(None);
        };

        let accounts = self.wallet.get_accounts().await?;
        let Some(&address) = accounts.first() else {
            debug!("restore skipped: wallet locked or access revoked");
            return Ok(None);
        };
        if address != hint.address {
            debug!(hinted = %hint.address, actual = %address, "restore skipped: account mismatch");
            clear_session(self.store.as_ref()).await?;
            return Ok(None);
        }

        let network = self.wallet.get_network().await?;
        if network.chain_id != self.target_chain {
            debug!(chain = %network.chain_id, "restore skipped: wrong network");
            return Ok(None);
        }

        self.establish(address).await.map(Some)
    }

    /// Binds the signer, resolves the role, and records the session.
    async fn establish(&self, address: Address) -> Result<Session, SessionError> {
        if self.client.state().await == BindingState::Uninitialized {
            self.client.bind_read_only(Arc::clone(&self.transport)).await;
        }
        self.client.bind_signer(address).await?;

        let role = resolve_role(&self.client, address).await?;
        save_session(self.store.as_ref(), &address, role).await?;

        let session = Session {
            address,
            role,
            chain: self.target_chain,
        };
        *self.session.write().await = Some(session.clone());
        info!(address = %address, role = %role.as_str(), "Session established");
        Ok(session)
    }

    /// Ends the session: drops the binding and forgets the persisted hint.
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        self.client.reset().await;
        clear_session(self.store.as_ref()).await?;
        *self.session.write().await = None;
        info!("Session disconnected");
        Ok(())
    }

    // =========================================================================
    // EVENT TASK
    // =========================================================================

    /// Spawns the single task that owns event-driven rebinding.
    ///
    /// Provider events flow over the broadcast channel into this task, and
    /// only this task resets the binding, so transitions stay race-free no
    /// matter how many portals share the manager. The task ends when the
    /// provider drops its channel.
    pub fn spawn_event_loop(self: &Arc<Self>) -> Result<JoinHandle<()>, SessionError> {
        let mut events = self.wallet.subscribe()?;
        let manager = Arc::clone(self);

        Ok(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => manager.handle_event(event).await,
                    Err(RecvError::Lagged(missed)) => {
                        // Whatever we missed, the wallet state has moved on;
                        // the next event re-synchronizes us.
                        warn!(missed, "Provider event channel lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }))
    }

    async fn handle_event(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) if accounts.is_empty() => {
                info!("All accounts revoked; treating as disconnect");
                self.client.reset().await;
                *self.session.write().await = None;
                if let Err(err) = clear_session(self.store.as_ref()).await {
                    warn!(%err, "Failed to clear persisted session");
                }
            }
            ProviderEvent::AccountsChanged(accounts) => {
                info!(account = %accounts[0], "Active account changed; session torn down");
                self.client.reset().await;
                *self.session.write().await = None;
                // The old hint names the old account; it must not survive.
                if let Err(err) = clear_session(self.store.as_ref()).await {
                    warn!(%err, "Failed to clear persisted session");
                }
            }
            ProviderEvent::ChainChanged(chain) => {
                info!(chain = %chain, "Chain changed; session torn down");
                self.client.reset().await;
                *self.session.write().await = None;
                // Hint kept: same account may reconnect after switching back.
            }
            ProviderEvent::Disconnected => {
                info!("Provider disconnected; session torn down");
                self.client.reset().await;
                *self.session.write().await = None;
                if let Err(err) = clear_session(self.store.as_ref()).await {
                    warn!(%err, "Failed to clear persisted session");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemorySessionStore, ROLE_KEY, WALLET_KEY};
    use oath_contract::{ContractError, InMemoryLedger};
    use oath_types::{Address, Role, U256};
    use oath_wallet::{methods, MockProvider, ProviderError, RpcError};
    use serde_json::json;
    use std::time::Duration;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    /// A fixture wiring a scripted wallet to a seeded in-memory ledger.
    struct Fixture {
        provider: Arc<MockProvider>,
        ledger: Arc<InMemoryLedger>,
        store: Arc<InMemorySessionStore>,
        manager: Arc<SessionManager>,
    }

    impl Fixture {
        async fn new() -> Self {
            let provider = Arc::new(MockProvider::new());
            let ledger = Arc::new(InMemoryLedger::new(addr(1)));
            let store = Arc::new(InMemorySessionStore::new());

            // Admin enrolls one member per registry.
            let admin = ContractClient::new();
            admin.bind_read_only(Arc::clone(&ledger) as _).await;
            admin.bind_signer(addr(1)).await.unwrap();
            admin.enroll_manufacturer(addr(2)).await.unwrap();
            admin.enroll_doctor(addr(3)).await.unwrap();
            admin.enroll_pharmacy(addr(4)).await.unwrap();

            let wallet = Arc::new(WalletAdapter::new(Some(
                Arc::clone(&provider) as Arc<dyn oath_wallet::InjectedProvider>
            )));
            let manager = Arc::new(SessionManager::new(
                wallet,
                Arc::new(ContractClient::new()),
                Arc::clone(&ledger) as _,
                Arc::clone(&store) as _,
            ));
            manager.initialize().await;

            Self {
                provider,
                ledger,
                store,
                manager,
            }
        }

        fn script_accounts(&self, method: &str, address: Address) {
            self.provider
                .enqueue(method, Ok(json!([address.to_hex()])));
        }
    }

    #[tokio::test]
    async fn test_connect_resolves_role_and_persists() {
        let fx = Fixture::new().await;
        fx.script_accounts(methods::REQUEST_ACCOUNTS, addr(3));

        let session = fx.manager.connect().await.unwrap();
        assert_eq!(session.address, addr(3));
        assert_eq!(session.role, Role::Doctor);
        assert_eq!(session.chain, ChainId::SEPOLIA);

        assert_eq!(
            fx.store.get(ROLE_KEY).await.unwrap().as_deref(),
            Some("Doctor")
        );
        assert_eq!(
            fx.store.get(WALLET_KEY).await.unwrap(),
            Some(addr(3).to_hex())
        );
        assert_eq!(fx.manager.session().await, Some(session));
    }

    #[tokio::test]
    async fn test_connect_unenrolled_address_is_patient() {
        let fx = Fixture::new().await;
        fx.script_accounts(methods::REQUEST_ACCOUNTS, addr(9));

        let session = fx.manager.connect().await.unwrap();
        assert_eq!(session.role, Role::Patient);
    }

    #[tokio::test]
    async fn test_connect_rejection_leaves_no_session() {
        let fx = Fixture::new().await;
        fx.provider.enqueue(
            methods::REQUEST_ACCOUNTS,
            Err(RpcError::new(RpcError::USER_REJECTED, "denied")),
        );

        let err = fx.manager.connect().await.unwrap_err();
        assert_eq!(err, SessionError::Provider(ProviderError::UserRejected));
        assert_eq!(fx.manager.session().await, None);
        assert_eq!(fx.store.get(ROLE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_connect_switches_wrong_network() {
        let fx = Fixture::new().await;
        fx.script_accounts(methods::REQUEST_ACCOUNTS, addr(2));
        // First chain query: mainnet. After the switch the default (Sepolia)
        // applies.
        fx.provider.enqueue(methods::CHAIN_ID, Ok(json!("0x1")));

        let session = fx.manager.connect().await.unwrap();
        assert_eq!(session.role, Role::Manufacturer);
        assert_eq!(fx.provider.call_count(methods::SWITCH_CHAIN), 1);
    }

    #[tokio::test]
    async fn test_connect_switch_rejected_surfaces() {
        let fx = Fixture::new().await;
        fx.script_accounts(methods::REQUEST_ACCOUNTS, addr(2));
        fx.provider.enqueue(methods::CHAIN_ID, Ok(json!("0x1")));
        fx.provider.enqueue(
            methods::SWITCH_CHAIN,
            Err(RpcError::new(RpcError::USER_REJECTED, "denied")),
        );

        let err = fx.manager.connect().await.unwrap_err();
        assert_eq!(err, SessionError::Provider(ProviderError::SwitchRejected));
        assert_eq!(fx.manager.session().await, None);
    }

    #[tokio::test]
    async fn test_restore_without_hint_is_none() {
        let fx = Fixture::new().await;
        assert_eq!(fx.manager.restore().await.unwrap(), None);
        assert_eq!(fx.provider.call_count(methods::ACCOUNTS), 0);
    }

    #[tokio::test]
    async fn test_restore_re_resolves_stale_role() {
        let fx = Fixture::new().await;
        // Hint claims doctor, but the chain says addr(4) is a pharmacy.
        save_session(fx.store.as_ref(), &addr(4), Role::Doctor)
            .await
            .unwrap();
        fx.script_accounts(methods::ACCOUNTS, addr(4));

        let session = fx.manager.restore().await.unwrap().unwrap();
        assert_eq!(session.role, Role::Pharmacy);
        assert_eq!(
            fx.store.get(ROLE_KEY).await.unwrap().as_deref(),
            Some("Pharmacy")
        );
    }

    #[tokio::test]
    async fn test_restore_locked_wallet_is_silent_none() {
        let fx = Fixture::new().await;
        save_session(fx.store.as_ref(), &addr(4), Role::Pharmacy)
            .await
            .unwrap();
        // Default eth_accounts response is the empty list.

        assert_eq!(fx.manager.restore().await.unwrap(), None);
        assert_eq!(fx.provider.call_count(methods::REQUEST_ACCOUNTS), 0);
    }

    #[tokio::test]
    async fn test_restore_account_mismatch_clears_hint() {
        let fx = Fixture::new().await;
        save_session(fx.store.as_ref(), &addr(4), Role::Pharmacy)
            .await
            .unwrap();
        fx.script_accounts(methods::ACCOUNTS, addr(9));

        assert_eq!(fx.manager.restore().await.unwrap(), None);
        assert_eq!(fx.store.get(WALLET_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_disconnect_blocks_writes_and_clears_hint() {
        let fx = Fixture::new().await;
        fx.script_accounts(methods::REQUEST_ACCOUNTS, addr(2));
        fx.manager.connect().await.unwrap();

        fx.manager.disconnect().await.unwrap();
        assert_eq!(fx.manager.session().await, None);
        assert_eq!(fx.store.get(ROLE_KEY).await.unwrap(), None);

        let err = fx
            .manager
            .client()
            .mint_new_batch(
                "BATCH-0001",
                "Amoxicillin",
                100,
                1_700_000_000,
                1_760_000_000,
                U256::from(1u64),
            )
            .await
            .unwrap_err();
        assert_eq!(err, ContractError::SignerRequired);
    }

    #[tokio::test]
    async fn test_account_change_tears_down_session() {
        let fx = Fixture::new().await;
        let _task = fx.manager.spawn_event_loop().unwrap();
        fx.script_accounts(methods::REQUEST_ACCOUNTS, addr(3));
        fx.manager.connect().await.unwrap();

        fx.provider
            .emit(ProviderEvent::AccountsChanged(vec![addr(9)]));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(fx.manager.session().await, None);
        assert_eq!(fx.store.get(ROLE_KEY).await.unwrap(), None);
        assert_eq!(
            fx.manager.client().state().await,
            BindingState::Uninitialized
        );
    }

    #[tokio::test]
    async fn test_chain_change_resets_binding_but_keeps_hint() {
        let fx = Fixture::new().await;
        let _task = fx.manager.spawn_event_loop().unwrap();
        fx.script_accounts(methods::REQUEST_ACCOUNTS, addr(3));
        fx.manager.connect().await.unwrap();

        fx.provider.emit(ProviderEvent::ChainChanged(ChainId::MAINNET));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(fx.manager.session().await, None);
        assert_eq!(
            fx.store.get(WALLET_KEY).await.unwrap(),
            Some(addr(3).to_hex())
        );
    }

    #[tokio::test]
    async fn test_disconnect_event_tears_down_session() {
        let fx = Fixture::new().await;
        let _task = fx.manager.spawn_event_loop().unwrap();
        fx.script_accounts(methods::REQUEST_ACCOUNTS, addr(2));
        fx.manager.connect().await.unwrap();

        fx.provider.emit(ProviderEvent::Disconnected);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(fx.manager.session().await, None);
        assert_eq!(fx.store.get(WALLET_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reads_work_before_connect() {
        let fx = Fixture::new().await;

        let manufacturer = ContractClient::new();
        manufacturer.bind_read_only(Arc::clone(&fx.ledger) as _).await;
        manufacturer.bind_signer(addr(2)).await.unwrap();
        manufacturer
            .mint_new_batch(
                "BATCH-0001",
                "Amoxicillin",
                100,
                1_700_000_000,
                1_760_000_000,
                U256::from(1u64),
            )
            .await
            .unwrap();

        // initialize() bound read-only; public verification works unsigned.
        assert!(fx.manager.client().verify_drug("BATCH-0001").await.unwrap());
        assert!(!fx.manager.client().verify_drug("BATCH-0404").await.unwrap());
    }
}
