//! # Manufacturer Portal
//!
//! Mints batches (after client-side form validation) and surfaces batch
//! lookups and the workspace-wide batch count.

use crate::errors::PortalError;
use crate::forms::MintForm;
use oath_contract::{ContractClient, TxOutcome};
use oath_types::{Address, Batch};
use std::sync::Arc;
use tracing::instrument;

/// Controller for the manufacturer role.
pub struct ManufacturerPortal {
    client: Arc<ContractClient>,
    account: Address,
}

impl ManufacturerPortal {
    /// Creates a controller for the connected manufacturer account.
    #[must_use]
    pub fn new(client: Arc<ContractClient>, account: Address) -> Self {
        Self { client, account }
    }

    /// The connected account.
    #[must_use]
    pub fn account(&self) -> Address {
        self.account
    }

    /// Validates the form, then mints the batch and awaits confirmation.
    ///
    /// Validation failures never reach the wallet: the user is not asked to
    /// sign a transaction the contract would revert.
    #[instrument(skip_all, fields(batch_id = %form.batch_id))]
    pub async fn mint_batch(&self, form: &MintForm) -> Result<TxOutcome, PortalError> {
        form.validate()?;
        let outcome = self
            .client
            .mint_new_batch(
                &form.batch_id,
                &form.medicine_name,
                form.quantity,
                form.manufacturing_date,
                form.expiry_date,
                form.price,
            )
            .await?;
        Ok(outcome)
    }

    /// Looks up a batch by id.
    pub async fn batch(&self, batch_id: &str) -> Result<Batch, PortalError> {
        Ok(self.client.get_batch(batch_id).await?)
    }

    /// Total number of batches ever minted, across all manufacturers.
    pub async fn total_batches(&self) -> Result<u64, PortalError> {
        Ok(self.client.total_batches().await?)
    }
}
