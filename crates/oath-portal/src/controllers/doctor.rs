//! # Doctor Portal
//!
//! Issues prescriptions and lists the connected doctor's own prescriptions.

use crate::errors::PortalError;
use oath_contract::{ContractClient, PrescriptionReceipt, PrescriptionSummary};
use oath_types::Address;
use std::sync::Arc;
use tracing::instrument;

/// Controller for the doctor role.
pub struct DoctorPortal {
    client: Arc<ContractClient>,
    account: Address,
}

impl DoctorPortal {
    /// Creates a controller for the connected doctor account.
    #[must_use]
    pub fn new(client: Arc<ContractClient>, account: Address) -> Self {
        Self { client, account }
    }

    /// The connected account.
    #[must_use]
    pub fn account(&self) -> Address {
        self.account
    }

    /// Issues a prescription and returns the contract-assigned id.
    #[instrument(skip_all, fields(patient = %patient))]
    pub async fn prescribe(
        &self,
        patient: Address,
        medicine_name: &str,
        dosage: &str,
        quantity: u64,
    ) -> Result<PrescriptionReceipt, PortalError> {
        let receipt = self
            .client
            .prescribe_medicine(patient, medicine_name, dosage, quantity)
            .await?;
        Ok(receipt)
    }

    /// Ids of every prescription this doctor has issued.
    pub async fn my_prescription_ids(&self) -> Result<Vec<String>, PortalError> {
        Ok(self.client.prescriptions_by_doctor(self.account).await?)
    }

    /// Full rows for every prescription this doctor has issued; the
    /// counterpart on each row is the patient.
    pub async fn my_prescriptions(&self) -> Result<Vec<PrescriptionSummary>, PortalError> {
        Ok(self
            .client
            .prescription_details_by_doctor(self.account)
            .await?)
    }

    /// Number of prescriptions this doctor has issued.
    pub async fn prescription_count(&self) -> Result<u64, PortalError> {
        Ok(self
            .client
            .prescription_count_by_doctor(self.account)
            .await?)
    }
}
