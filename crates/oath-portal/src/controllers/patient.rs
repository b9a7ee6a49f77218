//! # Patient Portal
//!
//! Lists the connected patient's prescriptions and verifies drugs. The
//! default role: any connected address with no registry membership lands
//! here.

use crate::errors::PortalError;
use oath_contract::{ContractClient, PrescriptionSummary};
use oath_types::{Address, Prescription};
use std::sync::Arc;

/// Controller for the patient role.
pub struct PatientPortal {
    client: Arc<ContractClient>,
    account: Address,
}

impl PatientPortal {
    /// Creates a controller for the connected patient account.
    #[must_use]
    pub fn new(client: Arc<ContractClient>, account: Address) -> Self {
        Self { client, account }
    }

    /// The connected account.
    #[must_use]
    pub fn account(&self) -> Address {
        self.account
    }

    /// Ids of every prescription held by this patient.
    pub async fn my_prescription_ids(&self) -> Result<Vec<String>, PortalError> {
        Ok(self.client.prescriptions_by_patient(self.account).await?)
    }

    /// Full rows for every prescription held by this patient; the
    /// counterpart on each row is the prescribing doctor.
    pub async fn my_prescriptions(&self) -> Result<Vec<PrescriptionSummary>, PortalError> {
        Ok(self
            .client
            .prescription_details_by_patient(self.account)
            .await?)
    }

    /// Looks up one prescription by id.
    pub async fn prescription(&self, prescription_id: &str) -> Result<Prescription, PortalError> {
        Ok(self.client.get_prescription(prescription_id).await?)
    }

    /// True when the batch exists, has stock remaining, and is not expired.
    pub async fn verify_drug(&self, batch_id: &str) -> Result<bool, PortalError> {
        Ok(self.client.verify_drug(batch_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::fixtures::{addr, client_as, seeded_ledger};

    #[tokio::test]
    async fn test_patient_sees_own_prescriptions_only() {
        let ledger = seeded_ledger().await;
        let doctor = client_as(&ledger, addr(3)).await;
        doctor
            .prescribe_medicine(addr(5), "Amoxicillin", "500mg twice daily", 10)
            .await
            .unwrap();
        doctor
            .prescribe_medicine(addr(6), "Ibuprofen", "200mg as needed", 20)
            .await
            .unwrap();

        let portal = PatientPortal::new(client_as(&ledger, addr(5)).await, addr(5));
        let ids = portal.my_prescription_ids().await.unwrap();
        assert_eq!(ids, vec!["RX-0001".to_string()]);

        let rows = portal.my_prescriptions().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].counterpart, addr(3));
        assert_eq!(rows[0].medicine_name, "Amoxicillin");

        let full = portal.prescription(&ids[0]).await.unwrap();
        assert_eq!(full.dosage, "500mg twice daily");
    }

    #[tokio::test]
    async fn test_patient_with_no_prescriptions_sees_empty_list() {
        let ledger = seeded_ledger().await;
        let portal = PatientPortal::new(client_as(&ledger, addr(7)).await, addr(7));

        assert!(portal.my_prescription_ids().await.unwrap().is_empty());
        assert!(portal.my_prescriptions().await.unwrap().is_empty());
    }
}
