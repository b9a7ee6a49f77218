//! Cross-crate integration flows.

pub mod e2e_choreography;
pub mod flows;

// =============================================================================
// SHARED FIXTURES
// =============================================================================

use oath_contract::{ContractClient, InMemoryLedger};
use oath_portal::PortalApp;
use oath_session::{InMemorySessionStore, SessionManager};
use oath_types::Address;
use oath_wallet::{methods, InjectedProvider, MockProvider, WalletAdapter};
use serde_json::json;
use std::sync::Arc;

/// Well-known test addresses: `addr(1)` is the contract admin.
pub fn addr(byte: u8) -> Address {
    Address::new([byte; 20])
}

/// One human actor: their scripted wallet, their session, their portal app.
pub struct Actor {
    pub provider: Arc<MockProvider>,
    pub store: Arc<InMemorySessionStore>,
    pub manager: Arc<SessionManager>,
    pub app: PortalApp,
}

impl Actor {
    /// Wires an actor whose wallet will authorize `address` on connect,
    /// over the shared `ledger`.
    pub fn new(ledger: &Arc<InMemoryLedger>, address: Address) -> Self {
        let provider = Arc::new(MockProvider::new());
        provider.enqueue(methods::REQUEST_ACCOUNTS, Ok(json!([address.to_hex()])));

        let store = Arc::new(InMemorySessionStore::new());
        let wallet = Arc::new(WalletAdapter::new(Some(
            Arc::clone(&provider) as Arc<dyn InjectedProvider>
        )));
        let manager = Arc::new(SessionManager::new(
            wallet,
            Arc::new(ContractClient::new()),
            Arc::clone(ledger) as _,
            Arc::clone(&store) as _,
        ));
        let app = PortalApp::new(Arc::clone(&manager));
        Self {
            provider,
            store,
            manager,
            app,
        }
    }
}

/// A fresh ledger with one enrolled member per registry: manufacturer
/// `addr(2)`, doctor `addr(3)`, pharmacy `addr(4)`. `addr(5)` and up are
/// patients.
pub async fn seeded_ledger() -> Arc<InMemoryLedger> {
    let ledger = Arc::new(InMemoryLedger::new(addr(1)));
    let admin = ContractClient::new();
    admin.bind_read_only(Arc::clone(&ledger) as _).await;
    admin.bind_signer(addr(1)).await.unwrap();
    admin.enroll_manufacturer(addr(2)).await.unwrap();
    admin.enroll_doctor(addr(3)).await.unwrap();
    admin.enroll_pharmacy(addr(4)).await.unwrap();
    ledger
}
