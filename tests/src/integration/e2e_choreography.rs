//! # End-to-End Choreography
//!
//! The full supply-chain flow with one actor per role, each behind their
//! own wallet and session, all sharing one ledger:
//!
//! ```text
//! [Manufacturer] ──mint──→ [Ledger] ←──prescribe── [Doctor]
//!                              ↑
//!                        dispense (batch × prescription)
//!                              │
//!                         [Pharmacy]
//!                              │
//!                              ↓
//!             [Patient] sees prescription, history shows record
//! ```

#[cfg(test)]
mod tests {
    use crate::integration::{addr, seeded_ledger, Actor};
    use oath_portal::{MintForm, PortalView, RolePortal};
    use oath_types::{Role, U256};

    #[tokio::test]
    async fn test_full_supply_chain_choreography() {
        let ledger = seeded_ledger().await;

        // Every actor mounts and connects; each resolves their own role.
        let manufacturer = Actor::new(&ledger, addr(2));
        let doctor = Actor::new(&ledger, addr(3));
        let pharmacy = Actor::new(&ledger, addr(4));
        let patient = Actor::new(&ledger, addr(5));

        for (actor, expected_role) in [
            (&manufacturer, Role::Manufacturer),
            (&doctor, Role::Doctor),
            (&pharmacy, Role::Pharmacy),
            (&patient, Role::Patient),
        ] {
            actor.app.on_mount().await;
            let PortalView::Ready(session) = actor.app.on_connect_clicked().await else {
                panic!("connect failed for {expected_role:?}");
            };
            assert_eq!(session.role, expected_role);
        }

        // Manufacturer mints a batch.
        let Some(RolePortal::Manufacturer(mint_portal)) = manufacturer.app.portal().await else {
            panic!("expected the manufacturer portal");
        };
        mint_portal
            .mint_batch(&MintForm {
                batch_id: "BATCH-0001".to_string(),
                medicine_name: "Amoxicillin".to_string(),
                quantity: 100,
                manufacturing_date: 1_700_000_000,
                expiry_date: 1_760_000_000,
                price: U256::from(250u64),
            })
            .await
            .unwrap();
        assert_eq!(mint_portal.total_batches().await.unwrap(), 1);

        // Doctor prescribes to the patient.
        let Some(RolePortal::Doctor(doctor_portal)) = doctor.app.portal().await else {
            panic!("expected the doctor portal");
        };
        let receipt = doctor_portal
            .prescribe(addr(5), "Amoxicillin", "500mg twice daily", 20)
            .await
            .unwrap();
        assert_eq!(receipt.prescription_id, "RX-0001");

        // Pharmacy verifies the drug and dispenses against the prescription.
        let Some(RolePortal::Pharmacy(pharmacy_portal)) = pharmacy.app.portal().await else {
            panic!("expected the pharmacy portal");
        };
        assert!(pharmacy_portal.verify_drug("BATCH-0001").await.unwrap());
        pharmacy_portal
            .dispense("BATCH-0001", &receipt.prescription_id, 20)
            .await
            .unwrap();

        // The patient sees their prescription.
        let Some(RolePortal::Patient(patient_portal)) = patient.app.portal().await else {
            panic!("expected the patient portal");
        };
        let rows = patient_portal.my_prescriptions().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].prescription_id, "RX-0001");
        assert_eq!(rows[0].counterpart, addr(3));
        assert_eq!(rows[0].medicine_name, "Amoxicillin");

        // The dispensing record is on the books, stock went down.
        let history = pharmacy_portal
            .dispensing_history("BATCH-0001")
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].patient, addr(5));
        assert_eq!(history[0].pharmacy, addr(4));
        assert_eq!(history[0].quantity, 20);

        let batch = mint_portal.batch("BATCH-0001").await.unwrap();
        assert_eq!(batch.quantity, 80);
    }

    #[tokio::test]
    async fn test_roles_are_isolated_across_actors() {
        let ledger = seeded_ledger().await;

        // A patient cannot mint even though a manufacturer exists on the
        // same ledger: authorization follows the signer, not the process.
        let patient = Actor::new(&ledger, addr(7));
        patient.app.on_mount().await;
        patient.app.on_connect_clicked().await;

        let Some(RolePortal::Patient(_)) = patient.app.portal().await else {
            panic!("unenrolled address should resolve to the patient portal");
        };

        let err = patient
            .manager
            .client()
            .mint_new_batch(
                "BATCH-0002",
                "Ibuprofen",
                10,
                1_700_000_000,
                1_760_000_000,
                U256::from(1u64),
            )
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("caller is not an enrolled manufacturer"));
    }
}
