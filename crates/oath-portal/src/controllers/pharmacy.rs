//! # Pharmacy Portal
//!
//! Verifies drugs, dispenses against a batch and prescription, and reads
//! per-batch dispensing history.

use crate::errors::PortalError;
use oath_contract::{ContractClient, TxOutcome};
use oath_types::{Address, DispensingRecord, Prescription};
use std::sync::Arc;
use tracing::instrument;

/// Controller for the pharmacy role.
pub struct PharmacyPortal {
    client: Arc<ContractClient>,
    account: Address,
}

impl PharmacyPortal {
    /// Creates a controller for the connected pharmacy account.
    #[must_use]
    pub fn new(client: Arc<ContractClient>, account: Address) -> Self {
        Self { client, account }
    }

    /// The connected account.
    #[must_use]
    pub fn account(&self) -> Address {
        self.account
    }

    /// True when the batch exists, has stock remaining, and is not expired.
    pub async fn verify_drug(&self, batch_id: &str) -> Result<bool, PortalError> {
        Ok(self.client.verify_drug(batch_id).await?)
    }

    /// Looks up the prescription a dispense would be made against.
    pub async fn prescription(&self, prescription_id: &str) -> Result<Prescription, PortalError> {
        Ok(self.client.get_prescription(prescription_id).await?)
    }

    /// Dispenses `quantity` from `batch_id` against `prescription_id`.
    ///
    /// The prescription is looked up first to bind the patient and doctor
    /// parties; an unknown prescription fails before any wallet prompt. The
    /// contract still enforces stock, existence, and caller authorization.
    #[instrument(skip_all, fields(batch_id = %batch_id, prescription_id = %prescription_id))]
    pub async fn dispense(
        &self,
        batch_id: &str,
        prescription_id: &str,
        quantity: u64,
    ) -> Result<TxOutcome, PortalError> {
        let prescription = self.client.get_prescription(prescription_id).await?;
        let outcome = self
            .client
            .dispense_drug(
                batch_id,
                prescription_id,
                prescription.patient,
                prescription.doctor,
                quantity,
            )
            .await?;
        Ok(outcome)
    }

    /// Dispensing records drawn from a batch, oldest first.
    pub async fn dispensing_history(
        &self,
        batch_id: &str,
    ) -> Result<Vec<DispensingRecord>, PortalError> {
        Ok(self.client.dispensing_history(batch_id).await?)
    }
}
