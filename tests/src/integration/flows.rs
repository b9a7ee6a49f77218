//! # Failure-Path Flows
//!
//! Cross-layer failure behavior: wallet events tearing down sessions,
//! missing contract events, stalled transports, and concurrent connect
//! attempts. Each flow asserts both the surfaced error and the state left
//! behind.

#[cfg(test)]
mod tests {
    use crate::integration::{addr, seeded_ledger, Actor};
    use oath_contract::{ClientConfig, ContractClient, ContractError};
    use oath_session::{SessionError, SessionStore, ROLE_KEY};
    use oath_wallet::{methods, ProviderError, ProviderEvent, RpcError};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_disconnect_event_blocks_next_write_and_clears_store() {
        let ledger = seeded_ledger().await;
        let doctor = Actor::new(&ledger, addr(3));
        let _task = doctor.manager.spawn_event_loop().unwrap();
        doctor.app.on_mount().await;
        assert!(doctor.app.on_connect_clicked().await.is_ready());

        doctor.provider.emit(ProviderEvent::Disconnected);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = doctor
            .manager
            .client()
            .prescribe_medicine(addr(5), "Amoxicillin", "500mg", 10)
            .await
            .unwrap_err();
        assert_eq!(err, ContractError::SignerRequired);
        assert_eq!(doctor.store.get(ROLE_KEY).await.unwrap(), None);
        assert_eq!(doctor.manager.session().await, None);
    }

    #[tokio::test]
    async fn test_account_switch_requires_fresh_role_resolution() {
        let ledger = seeded_ledger().await;
        let actor = Actor::new(&ledger, addr(3));
        let _task = actor.manager.spawn_event_loop().unwrap();
        actor.app.on_mount().await;
        assert!(actor.app.on_connect_clicked().await.is_ready());

        // The wallet switches to an unenrolled account.
        actor
            .provider
            .emit(ProviderEvent::AccountsChanged(vec![addr(9)]));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(actor.manager.session().await, None);

        // Reconnecting resolves the new account's role from scratch.
        actor
            .provider
            .enqueue(methods::REQUEST_ACCOUNTS, Ok(json!([addr(9).to_hex()])));
        let session = actor.manager.connect().await.unwrap();
        assert_eq!(session.address, addr(9));
        assert_eq!(session.role, oath_types::Role::Patient);
    }

    #[tokio::test]
    async fn test_suppressed_prescription_event_is_a_hard_error() {
        let ledger = seeded_ledger().await;
        ledger.suppress_prescription_events(true).await;

        let client = ContractClient::new();
        client.bind_read_only(Arc::clone(&ledger) as _).await;
        client.bind_signer(addr(3)).await.unwrap();

        let err = client
            .prescribe_medicine(addr(5), "Amoxicillin", "500mg", 10)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::MissingEvent {
                event: "PrescriptionCreated",
            }
        );
    }

    #[tokio::test]
    async fn test_stalled_transport_read_times_out() {
        let ledger = seeded_ledger().await;
        ledger.set_call_delay(Duration::from_millis(200)).await;

        let client = ContractClient::with_config(ClientConfig {
            read_timeout: Duration::from_millis(50),
            write_timeout: Duration::from_secs(1),
        });
        client.bind_read_only(Arc::clone(&ledger) as _).await;

        let err = client.total_batches().await.unwrap_err();
        assert_eq!(
            err,
            ContractError::OperationTimedOut {
                waited: Duration::from_millis(50),
            }
        );
    }

    #[tokio::test]
    async fn test_concurrent_connects_second_fails_pending() {
        let ledger = seeded_ledger().await;
        let actor = Actor::new(&ledger, addr(3));
        actor.app.on_mount().await;
        actor
            .provider
            .set_delay(methods::REQUEST_ACCOUNTS, Duration::from_millis(200));

        let manager = Arc::clone(&actor.manager);
        let first = tokio::spawn(async move { manager.connect().await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = actor.manager.connect().await.unwrap_err();
        assert_eq!(err, SessionError::Provider(ProviderError::RequestPending));

        // The first attempt is unaffected by the rejected second.
        let session = first.await.unwrap().unwrap();
        assert_eq!(session.address, addr(3));
    }

    #[tokio::test]
    async fn test_user_rejection_keeps_reads_alive() {
        let ledger = seeded_ledger().await;
        let actor = Actor::new(&ledger, addr(3));
        actor.app.on_mount().await;

        // The fixture queued an approval; a rejection follows it. Consume
        // the approval with a connect/disconnect cycle first.
        actor.provider.enqueue(
            methods::REQUEST_ACCOUNTS,
            Err(RpcError::new(RpcError::USER_REJECTED, "denied")),
        );
        actor.manager.connect().await.unwrap();
        actor.manager.disconnect().await.unwrap();

        let err = actor.manager.connect().await.unwrap_err();
        assert_eq!(err, SessionError::Provider(ProviderError::UserRejected));

        // Disconnect dropped the binding; re-mounting restores the
        // read-only path and public reads keep working unsigned.
        actor.manager.initialize().await;
        assert!(!actor
            .manager
            .client()
            .verify_drug("BATCH-0404")
            .await
            .unwrap());
    }
}
