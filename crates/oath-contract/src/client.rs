//! # Contract Client
//!
//! The typed read/write surface over the Oath contract. One client instance
//! is one explicit session context: portals hold a shared reference, the
//! session layer owns rebinding.
//!
//! The client does not re-validate write arguments before submission;
//! garbage-in submissions simply revert on-chain and surface as
//! [`ContractError::TransactionReverted`]. Client-side pre-validation is the
//! portals' responsibility.

use crate::abi::{events, functions, AbiValue};
use crate::binding::{Binding, BindingState};
use crate::errors::ContractError;
use crate::ports::{ContractTransport, TxReceipt};
use oath_types::{Address, Batch, DispensingRecord, Prescription, TxHash, U256};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Timeouts applied around transport calls.
///
/// Reads are bounded so an unresponsive RPC endpoint cannot hang a portal
/// indefinitely; writes get a longer bound because they include the
/// confirmation wait. On expiry the operation fails with
/// [`ContractError::OperationTimedOut`] and any late transport result is
/// discarded.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Cap on read calls.
    pub read_timeout: Duration,
    /// Cap on write submission plus one confirmation.
    pub write_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(120),
        }
    }
}

/// Result of a confirmed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
}

/// Result of a confirmed `prescribeMedicine` write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrescriptionReceipt {
    /// Canonical prescription id from the `PrescriptionCreated` event.
    pub prescription_id: String,
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
}

/// One row of a prescription-details query.
///
/// `counterpart` is the other party: the patient when querying by doctor,
/// the doctor when querying by patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrescriptionSummary {
    /// Prescription identifier.
    pub prescription_id: String,
    /// The other party on the prescription.
    pub counterpart: Address,
    /// Medicine name.
    pub medicine_name: String,
    /// Dosage instructions.
    pub dosage: String,
    /// Authorized quantity.
    pub quantity: u64,
    /// Unix timestamp of creation.
    pub timestamp: u64,
}

/// Typed client bound to the fixed Oath contract.
pub struct ContractClient {
    binding: RwLock<Binding>,
    config: ClientConfig,
}

impl ContractClient {
    /// Creates an uninitialized client with default timeouts.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Creates an uninitialized client with explicit timeouts.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            binding: RwLock::new(Binding::Uninitialized),
            config,
        }
    }

    // =========================================================================
    // BINDING
    // =========================================================================

    /// Current binding state.
    pub async fn state(&self) -> BindingState {
        self.binding.read().await.state()
    }

    /// Binds a read-only transport. Writes keep failing until a signer is
    /// bound.
    pub async fn bind_read_only(&self, transport: Arc<dyn ContractTransport>) {
        let mut binding = self.binding.write().await;
        *binding = Binding::ReadOnly { transport };
        debug!("Contract layer bound read-only");
    }

    /// Promotes the binding to read-write with the connected account as
    /// signer. Fails with [`ContractError::SignerOrProviderUnavailable`] if
    /// no transport is bound.
    pub async fn bind_signer(&self, signer: Address) -> Result<(), ContractError> {
        let mut binding = self.binding.write().await;
        let transport = binding
            .read_transport()
            .ok_or(ContractError::SignerOrProviderUnavailable)?;
        *binding = Binding::ReadWrite { transport, signer };
        info!(signer = %signer, "Contract layer bound read-write");
        Ok(())
    }

    /// Drops the binding back to `Uninitialized`. Called by the session
    /// layer on account change, chain change, or disconnect; the layer must
    /// be freshly rebound before further use.
    pub async fn reset(&self) {
        let mut binding = self.binding.write().await;
        if binding.state() != BindingState::Uninitialized {
            debug!(was = ?binding.state(), "Contract binding reset");
        }
        *binding = Binding::Uninitialized;
    }

    /// The currently bound signer, if any.
    pub async fn signer(&self) -> Option<Address> {
        self.binding.read().await.signer()
    }

    // =========================================================================
    // CALL PLUMBING
    // =========================================================================

    async fn read_call(
        &self,
        function: &'static str,
        args: Vec<AbiValue>,
    ) -> Result<Vec<AbiValue>, ContractError> {
        let transport = self
            .binding
            .read()
            .await
            .read_transport()
            .ok_or(ContractError::SignerOrProviderUnavailable)?;

        match tokio::time::timeout(self.config.read_timeout, transport.call(function, args)).await
        {
            Ok(result) => result.map_err(ContractError::from),
            Err(_) => {
                warn!(function, waited = ?self.config.read_timeout, "Read call timed out");
                Err(ContractError::OperationTimedOut {
                    waited: self.config.read_timeout,
                })
            }
        }
    }

    async fn write_send(
        &self,
        function: &'static str,
        args: Vec<AbiValue>,
    ) -> Result<TxReceipt, ContractError> {
        let (transport, signer) = self
            .binding
            .read()
            .await
            .write_context()
            .ok_or(ContractError::SignerRequired)?;

        match tokio::time::timeout(
            self.config.write_timeout,
            transport.send(function, args, signer),
        )
        .await
        {
            Ok(result) => {
                let receipt = result.map_err(ContractError::from)?;
                info!(function, tx_hash = %receipt.tx_hash, "Transaction confirmed");
                Ok(receipt)
            }
            Err(_) => {
                warn!(function, waited = ?self.config.write_timeout, "Write timed out");
                Err(ContractError::OperationTimedOut {
                    waited: self.config.write_timeout,
                })
            }
        }
    }

    // =========================================================================
    // BATCH READS
    // =========================================================================

    /// Looks up a batch. Fails with [`ContractError::NotFound`] if the batch
    /// was never minted.
    pub async fn get_batch(&self, batch_id: &str) -> Result<Batch, ContractError> {
        let values = match self
            .read_call(functions::GET_BATCH, vec![batch_id.into()])
            .await
        {
            // The contract reverts for unknown batches on this entry point.
            Err(ContractError::TransactionReverted { .. }) => {
                return Err(ContractError::NotFound {
                    entity: "batch",
                    id: batch_id.to_string(),
                })
            }
            other => other?,
        };
        let batch = decode_batch(&values, functions::GET_BATCH, true)?;
        if batch.batch_id.is_empty() {
            return Err(ContractError::NotFound {
                entity: "batch",
                id: batch_id.to_string(),
            });
        }
        Ok(batch)
    }

    /// Looks up a batch with an explicit existence flag instead of failing,
    /// for callers that must distinguish "not found" from "error".
    pub async fn get_batch_with_existence(&self, batch_id: &str) -> Result<Batch, ContractError> {
        let values = self
            .read_call(functions::GET_BATCH_DETAILS, vec![batch_id.into()])
            .await?;
        let exists = bool_field(&values, 7, functions::GET_BATCH_DETAILS)?;
        decode_batch(&values, functions::GET_BATCH_DETAILS, exists)
    }

    /// Authenticity signal for a batch. Unknown batches verify as `false`;
    /// this never fails merely because the batch does not exist.
    pub async fn verify_drug(&self, batch_id: &str) -> Result<bool, ContractError> {
        let values = self
            .read_call(functions::VERIFY_DRUG, vec![batch_id.into()])
            .await?;
        bool_field(&values, 0, functions::VERIFY_DRUG)
    }

    /// Total number of batches ever minted.
    pub async fn total_batches(&self) -> Result<u64, ContractError> {
        let values = self.read_call(functions::GET_TOTAL_BATCHES, vec![]).await?;
        u64_field(&values, 0, functions::GET_TOTAL_BATCHES)
    }

    // =========================================================================
    // ROLE MEMBERSHIP READS
    // =========================================================================
    //
    // The three predicates are independent and non-exclusive at this layer;
    // exclusivity is enforced only by the session resolver's priority order.

    /// Whether `address` is an enrolled manufacturer.
    pub async fn is_manufacturer(&self, address: Address) -> Result<bool, ContractError> {
        self.membership(functions::MANUFACTURERS, address).await
    }

    /// Whether `address` is an enrolled pharmacy.
    pub async fn is_pharmacy(&self, address: Address) -> Result<bool, ContractError> {
        self.membership(functions::PHARMACIES, address).await
    }

    /// Whether `address` is an enrolled doctor.
    pub async fn is_doctor(&self, address: Address) -> Result<bool, ContractError> {
        self.membership(functions::DOCTORS, address).await
    }

    async fn membership(
        &self,
        function: &'static str,
        address: Address,
    ) -> Result<bool, ContractError> {
        let values = self.read_call(function, vec![address.into()]).await?;
        bool_field(&values, 0, function)
    }

    // =========================================================================
    // PRESCRIPTION READS
    // =========================================================================

    /// Looks up a prescription. Fails with [`ContractError::NotFound`] for
    /// unknown ids.
    pub async fn get_prescription(
        &self,
        prescription_id: &str,
    ) -> Result<Prescription, ContractError> {
        let function = functions::GET_PRESCRIPTION;
        let values = match self.read_call(function, vec![prescription_id.into()]).await {
            Err(ContractError::TransactionReverted { .. }) => {
                return Err(ContractError::NotFound {
                    entity: "prescription",
                    id: prescription_id.to_string(),
                })
            }
            other => other?,
        };
        let prescription = Prescription {
            prescription_id: str_field(&values, 0, function)?,
            patient: addr_field(&values, 1, function)?,
            doctor: addr_field(&values, 2, function)?,
            medicine_name: str_field(&values, 3, function)?,
            dosage: str_field(&values, 4, function)?,
            quantity: u64_field(&values, 5, function)?,
            timestamp: u64_field(&values, 6, function)?,
            exists: true,
        };
        if prescription.prescription_id.is_empty() {
            return Err(ContractError::NotFound {
                entity: "prescription",
                id: prescription_id.to_string(),
            });
        }
        Ok(prescription)
    }

    /// Prescription ids issued by a doctor. Empty when the doctor has none.
    pub async fn prescriptions_by_doctor(
        &self,
        doctor: Address,
    ) -> Result<Vec<String>, ContractError> {
        self.id_list(functions::GET_PRESCRIPTIONS_BY_DOCTOR, doctor)
            .await
    }

    /// Prescription ids held by a patient. Empty when the patient has none.
    pub async fn prescriptions_by_patient(
        &self,
        patient: Address,
    ) -> Result<Vec<String>, ContractError> {
        self.id_list(functions::GET_PRESCRIPTIONS_BY_PATIENT, patient)
            .await
    }

    async fn id_list(
        &self,
        function: &'static str,
        party: Address,
    ) -> Result<Vec<String>, ContractError> {
        let values = self.read_call(function, vec![party.into()]).await?;
        Ok(str_array_field(&values, 0, function)?.to_vec())
    }

    /// Number of prescriptions issued by a doctor.
    pub async fn prescription_count_by_doctor(
        &self,
        doctor: Address,
    ) -> Result<u64, ContractError> {
        let function = functions::GET_PRESCRIPTION_COUNT_BY_DOCTOR;
        let values = self.read_call(function, vec![doctor.into()]).await?;
        u64_field(&values, 0, function)
    }

    /// Number of prescriptions held by a patient.
    pub async fn prescription_count_by_patient(
        &self,
        patient: Address,
    ) -> Result<u64, ContractError> {
        let function = functions::GET_PRESCRIPTION_COUNT_BY_PATIENT;
        let values = self.read_call(function, vec![patient.into()]).await?;
        u64_field(&values, 0, function)
    }

    /// Full prescription rows issued by a doctor; `counterpart` is the
    /// patient. Empty when the doctor has none.
    pub async fn prescription_details_by_doctor(
        &self,
        doctor: Address,
    ) -> Result<Vec<PrescriptionSummary>, ContractError> {
        let function = functions::GET_PRESCRIPTION_DETAILS_BY_DOCTOR;
        let values = self.read_call(function, vec![doctor.into()]).await?;
        decode_summaries(&values, function)
    }

    /// Full prescription rows held by a patient; `counterpart` is the
    /// doctor. Empty when the patient has none.
    pub async fn prescription_details_by_patient(
        &self,
        patient: Address,
    ) -> Result<Vec<PrescriptionSummary>, ContractError> {
        let function = functions::GET_PRESCRIPTION_DETAILS_BY_PATIENT;
        let values = self.read_call(function, vec![patient.into()]).await?;
        decode_summaries(&values, function)
    }

    /// Total number of prescriptions ever created.
    pub async fn total_prescriptions(&self) -> Result<u64, ContractError> {
        let function = functions::GET_TOTAL_PRESCRIPTIONS;
        let values = self.read_call(function, vec![]).await?;
        u64_field(&values, 0, function)
    }

    // =========================================================================
    // DISPENSING READS
    // =========================================================================

    /// Dispensing records drawn from a batch, oldest first. Empty for
    /// batches that were never dispensed from (or never minted).
    pub async fn dispensing_history(
        &self,
        batch_id: &str,
    ) -> Result<Vec<DispensingRecord>, ContractError> {
        let function = functions::GET_DISPENSING_HISTORY;
        let values = self.read_call(function, vec![batch_id.into()]).await?;

        let prescription_ids = str_array_field(&values, 0, function)?;
        let patients = addr_array_field(&values, 1, function)?;
        let doctors = addr_array_field(&values, 2, function)?;
        let pharmacies = addr_array_field(&values, 3, function)?;
        let quantities = u64_array_field(&values, 4, function)?;
        let timestamps = u64_array_field(&values, 5, function)?;

        let len = prescription_ids.len();
        if [
            patients.len(),
            doctors.len(),
            pharmacies.len(),
            quantities.len(),
            timestamps.len(),
        ]
        .iter()
        .any(|&l| l != len)
        {
            return Err(ContractError::Decode(format!(
                "{function}: ragged parallel arrays"
            )));
        }

        Ok((0..len)
            .map(|i| DispensingRecord {
                batch_id: batch_id.to_string(),
                prescription_id: prescription_ids[i].clone(),
                patient: patients[i],
                doctor: doctors[i],
                pharmacy: pharmacies[i],
                quantity: quantities[i],
                timestamp: timestamps[i],
            })
            .collect())
    }

    /// Total number of dispensing records.
    pub async fn total_dispensings(&self) -> Result<u64, ContractError> {
        let function = functions::GET_TOTAL_DISPENSINGS;
        let values = self.read_call(function, vec![]).await?;
        u64_field(&values, 0, function)
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Mints a new batch. Caller pre-validates quantity > 0, price > 0,
    /// expiry > manufacture, and non-empty identifiers; the layer submits as
    /// given and surfaces any on-chain revert.
    #[instrument(skip_all, fields(batch_id = %batch_id))]
    pub async fn mint_new_batch(
        &self,
        batch_id: &str,
        medicine_name: &str,
        quantity: u64,
        manufacturing_date: u64,
        expiry_date: u64,
        price: U256,
    ) -> Result<TxOutcome, ContractError> {
        let receipt = self
            .write_send(
                functions::MINT_NEW_BATCH,
                vec![
                    batch_id.into(),
                    medicine_name.into(),
                    quantity.into(),
                    manufacturing_date.into(),
                    expiry_date.into(),
                    price.into(),
                ],
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
        })
    }

    /// Issues a prescription and returns the canonical id emitted in the
    /// `PrescriptionCreated` event.
    ///
    /// A confirmed receipt without that event is a hard
    /// [`ContractError::MissingEvent`]: the id is never derived from the
    /// transaction hash.
    #[instrument(skip_all, fields(patient = %patient))]
    pub async fn prescribe_medicine(
        &self,
        patient: Address,
        medicine_name: &str,
        dosage: &str,
        quantity: u64,
    ) -> Result<PrescriptionReceipt, ContractError> {
        let receipt = self
            .write_send(
                functions::PRESCRIBE_MEDICINE,
                vec![
                    patient.into(),
                    medicine_name.into(),
                    dosage.into(),
                    quantity.into(),
                ],
            )
            .await?;

        let prescription_id = receipt
            .logs
            .iter()
            .find(|log| log.event == events::PRESCRIPTION_CREATED)
            .and_then(|log| log.values.get(events::PRESCRIPTION_CREATED_ID_INDEX))
            .and_then(|value| value.as_str())
            .map(ToString::to_string)
            .ok_or(ContractError::MissingEvent {
                event: events::PRESCRIPTION_CREATED,
            })?;

        info!(prescription_id, tx_hash = %receipt.tx_hash, "Prescription created");
        Ok(PrescriptionReceipt {
            prescription_id,
            tx_hash: receipt.tx_hash,
        })
    }

    /// Dispenses quantity from a batch against a prescription. The contract
    /// enforces batch/prescription existence, remaining quantity, and caller
    /// authorization; rejections surface as
    /// [`ContractError::TransactionReverted`] with the reason verbatim.
    #[instrument(skip_all, fields(batch_id = %batch_id, prescription_id = %prescription_id))]
    pub async fn dispense_drug(
        &self,
        batch_id: &str,
        prescription_id: &str,
        patient: Address,
        doctor: Address,
        quantity: u64,
    ) -> Result<TxOutcome, ContractError> {
        let receipt = self
            .write_send(
                functions::DISPENSE_DRUG,
                vec![
                    batch_id.into(),
                    prescription_id.into(),
                    patient.into(),
                    doctor.into(),
                    quantity.into(),
                ],
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
        })
    }

    /// Enrolls a manufacturer (admin only).
    pub async fn enroll_manufacturer(&self, address: Address) -> Result<TxOutcome, ContractError> {
        self.admin_write(functions::ENROLL_MANUFACTURER, address)
            .await
    }

    /// Deactivates a manufacturer (admin only).
    pub async fn deactivate_manufacturer(
        &self,
        address: Address,
    ) -> Result<TxOutcome, ContractError> {
        self.admin_write(functions::DEACTIVATE_MANUFACTURER, address)
            .await
    }

    /// Enrolls a pharmacy (admin only).
    pub async fn enroll_pharmacy(&self, address: Address) -> Result<TxOutcome, ContractError> {
        self.admin_write(functions::ENROLL_PHARMACY, address).await
    }

    /// Deactivates a pharmacy (admin only).
    pub async fn deactivate_pharmacy(&self, address: Address) -> Result<TxOutcome, ContractError> {
        self.admin_write(functions::DEACTIVATE_PHARMACY, address)
            .await
    }

    /// Enrolls a doctor (admin only).
    pub async fn enroll_doctor(&self, address: Address) -> Result<TxOutcome, ContractError> {
        self.admin_write(functions::ENROLL_DOCTOR, address).await
    }

    /// Deactivates a doctor (admin only).
    pub async fn deactivate_doctor(&self, address: Address) -> Result<TxOutcome, ContractError> {
        self.admin_write(functions::DEACTIVATE_DOCTOR, address)
            .await
    }

    async fn admin_write(
        &self,
        function: &'static str,
        address: Address,
    ) -> Result<TxOutcome, ContractError> {
        let receipt = self.write_send(function, vec![address.into()]).await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
        })
    }
}

impl Default for ContractClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// DECODE HELPERS
// =============================================================================

fn field<'a>(
    values: &'a [AbiValue],
    idx: usize,
    function: &str,
) -> Result<&'a AbiValue, ContractError> {
    values
        .get(idx)
        .ok_or_else(|| ContractError::Decode(format!("{function}: missing field {idx}")))
}

fn str_field(values: &[AbiValue], idx: usize, function: &str) -> Result<String, ContractError> {
    field(values, idx, function)?
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| ContractError::Decode(format!("{function}: field {idx} is not a string")))
}

fn u64_field(values: &[AbiValue], idx: usize, function: &str) -> Result<u64, ContractError> {
    field(values, idx, function)?
        .as_u64()
        .ok_or_else(|| ContractError::Decode(format!("{function}: field {idx} is not a u64 uint")))
}

fn uint_field(values: &[AbiValue], idx: usize, function: &str) -> Result<U256, ContractError> {
    field(values, idx, function)?
        .as_uint()
        .ok_or_else(|| ContractError::Decode(format!("{function}: field {idx} is not a uint")))
}

fn addr_field(values: &[AbiValue], idx: usize, function: &str) -> Result<Address, ContractError> {
    field(values, idx, function)?
        .as_address()
        .ok_or_else(|| ContractError::Decode(format!("{function}: field {idx} is not an address")))
}

fn bool_field(values: &[AbiValue], idx: usize, function: &str) -> Result<bool, ContractError> {
    field(values, idx, function)?
        .as_bool()
        .ok_or_else(|| ContractError::Decode(format!("{function}: field {idx} is not a bool")))
}

fn str_array_field<'a>(
    values: &'a [AbiValue],
    idx: usize,
    function: &str,
) -> Result<&'a [String], ContractError> {
    field(values, idx, function)?
        .as_str_array()
        .ok_or_else(|| ContractError::Decode(format!("{function}: field {idx} is not string[]")))
}

fn addr_array_field(
    values: &[AbiValue],
    idx: usize,
    function: &str,
) -> Result<Vec<Address>, ContractError> {
    field(values, idx, function)?
        .as_addr_array()
        .map(<[Address]>::to_vec)
        .ok_or_else(|| ContractError::Decode(format!("{function}: field {idx} is not address[]")))
}

fn u64_array_field(
    values: &[AbiValue],
    idx: usize,
    function: &str,
) -> Result<Vec<u64>, ContractError> {
    let uints = field(values, idx, function)?
        .as_uint_array()
        .ok_or_else(|| ContractError::Decode(format!("{function}: field {idx} is not uint[]")))?;
    uints
        .iter()
        .map(|u| {
            if u.bits() <= 64 {
                Ok(u.as_u64())
            } else {
                Err(ContractError::Decode(format!(
                    "{function}: field {idx} element exceeds u64"
                )))
            }
        })
        .collect()
}

fn decode_batch(values: &[AbiValue], function: &str, exists: bool) -> Result<Batch, ContractError> {
    Ok(Batch {
        batch_id: str_field(values, 0, function)?,
        medicine_name: str_field(values, 1, function)?,
        quantity: u64_field(values, 2, function)?,
        manufacturing_date: u64_field(values, 3, function)?,
        expiry_date: u64_field(values, 4, function)?,
        price: uint_field(values, 5, function)?,
        manufacturer: addr_field(values, 6, function)?,
        exists,
    })
}

fn decode_summaries(
    values: &[AbiValue],
    function: &str,
) -> Result<Vec<PrescriptionSummary>, ContractError> {
    let ids = str_array_field(values, 0, function)?;
    let counterparts = addr_array_field(values, 1, function)?;
    let names = str_array_field(values, 2, function)?;
    let dosages = str_array_field(values, 3, function)?;
    let quantities = u64_array_field(values, 4, function)?;
    let timestamps = u64_array_field(values, 5, function)?;

    let len = ids.len();
    if [
        counterparts.len(),
        names.len(),
        dosages.len(),
        quantities.len(),
        timestamps.len(),
    ]
    .iter()
    .any(|&l| l != len)
    {
        return Err(ContractError::Decode(format!(
            "{function}: ragged parallel arrays"
        )));
    }

    Ok((0..len)
        .map(|i| PrescriptionSummary {
            prescription_id: ids[i].clone(),
            counterpart: counterparts[i],
            medicine_name: names[i].clone(),
            dosage: dosages[i].clone(),
            quantity: quantities[i],
            timestamp: timestamps[i],
        })
        .collect())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLedger;

    fn addr(last: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Address::new(bytes)
    }

    const ADMIN: u8 = 1;
    const MANUFACTURER: u8 = 2;
    const DOCTOR: u8 = 3;
    const PHARMACY: u8 = 4;
    const PATIENT: u8 = 5;

    /// Ledger with one actor of each role enrolled, plus a client bound
    /// read-write as `signer`.
    async fn client_as(signer: Address) -> (Arc<InMemoryLedger>, ContractClient) {
        let ledger = Arc::new(InMemoryLedger::new(addr(ADMIN)));
        seed_roles(&ledger).await;
        let client = ContractClient::new();
        client.bind_read_only(ledger.clone()).await;
        client.bind_signer(signer).await.unwrap();
        (ledger, client)
    }

    async fn seed_roles(ledger: &Arc<InMemoryLedger>) {
        let admin = ContractClient::new();
        admin.bind_read_only(ledger.clone()).await;
        admin.bind_signer(addr(ADMIN)).await.unwrap();
        admin.enroll_manufacturer(addr(MANUFACTURER)).await.unwrap();
        admin.enroll_doctor(addr(DOCTOR)).await.unwrap();
        admin.enroll_pharmacy(addr(PHARMACY)).await.unwrap();
    }

    async fn mint_default(client: &ContractClient) {
        client
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
    }

    #[tokio::test]
    async fn test_uninitialized_read_fails() {
        let client = ContractClient::new();
        assert_eq!(
            client.get_batch("BATCH-0001").await.unwrap_err(),
            ContractError::SignerOrProviderUnavailable
        );
    }

    #[tokio::test]
    async fn test_read_only_write_fails_with_signer_required() {
        let ledger = Arc::new(InMemoryLedger::new(addr(ADMIN)));
        let client = ContractClient::new();
        client.bind_read_only(ledger).await;

        let err = client
            .mint_new_batch("B", "M", 1, 1, 2, U256::one())
            .await
            .unwrap_err();
        assert_eq!(err, ContractError::SignerRequired);
    }

    #[tokio::test]
    async fn test_bind_signer_requires_transport() {
        let client = ContractClient::new();
        assert_eq!(
            client.bind_signer(addr(MANUFACTURER)).await.unwrap_err(),
            ContractError::SignerOrProviderUnavailable
        );
    }

    #[tokio::test]
    async fn test_reset_drops_back_to_uninitialized() {
        let (_, client) = client_as(addr(MANUFACTURER)).await;
        assert_eq!(client.state().await, BindingState::ReadWrite);

        client.reset().await;
        assert_eq!(client.state().await, BindingState::Uninitialized);
        assert_eq!(
            client.total_batches().await.unwrap_err(),
            ContractError::SignerOrProviderUnavailable
        );
    }

    #[tokio::test]
    async fn test_minted_batch_round_trips_all_fields() {
        let (_, client) = client_as(addr(MANUFACTURER)).await;
        mint_default(&client).await;

        let batch = client.get_batch("BATCH-0001").await.unwrap();
        assert_eq!(batch.batch_id, "BATCH-0001");
        assert_eq!(batch.medicine_name, "Amoxicillin");
        assert_eq!(batch.quantity, 100);
        assert_eq!(batch.manufacturing_date, 1_700_000_000);
        assert_eq!(batch.expiry_date, 1_760_000_000);
        assert_eq!(batch.price, U256::from(1u64));
        assert_eq!(batch.manufacturer, addr(MANUFACTURER));
        assert!(batch.exists);

        assert!(client.verify_drug("BATCH-0001").await.unwrap());
        assert_eq!(client.total_batches().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_batch_not_found_and_unverified() {
        let (_, client) = client_as(addr(MANUFACTURER)).await;

        assert_eq!(
            client.get_batch("NEVER-MINTED").await.unwrap_err(),
            ContractError::NotFound {
                entity: "batch",
                id: "NEVER-MINTED".to_string()
            }
        );
        assert!(!client.verify_drug("NEVER-MINTED").await.unwrap());
    }

    #[tokio::test]
    async fn test_batch_with_existence_never_fails_on_unknown() {
        let (_, client) = client_as(addr(MANUFACTURER)).await;

        let missing = client.get_batch_with_existence("NOPE").await.unwrap();
        assert!(!missing.exists);

        mint_default(&client).await;
        let present = client.get_batch_with_existence("BATCH-0001").await.unwrap();
        assert!(present.exists);
        assert_eq!(present.quantity, 100);
    }

    #[tokio::test]
    async fn test_membership_predicates_are_independent() {
        let (_, client) = client_as(addr(MANUFACTURER)).await;

        assert!(client.is_manufacturer(addr(MANUFACTURER)).await.unwrap());
        assert!(!client.is_pharmacy(addr(MANUFACTURER)).await.unwrap());
        assert!(client.is_doctor(addr(DOCTOR)).await.unwrap());
        assert!(!client.is_manufacturer(addr(PATIENT)).await.unwrap());
    }

    #[tokio::test]
    async fn test_prescribe_returns_canonical_event_id() {
        let (_, client) = client_as(addr(DOCTOR)).await;

        let receipt = client
            .prescribe_medicine(addr(PATIENT), "Ibuprofen", "200mg twice daily", 20)
            .await
            .unwrap();
        assert!(!receipt.prescription_id.is_empty());

        let prescription = client
            .get_prescription(&receipt.prescription_id)
            .await
            .unwrap();
        assert_eq!(prescription.patient, addr(PATIENT));
        assert_eq!(prescription.doctor, addr(DOCTOR));
        assert_eq!(prescription.medicine_name, "Ibuprofen");
        assert_eq!(prescription.quantity, 20);
    }

    #[tokio::test]
    async fn test_prescribe_without_event_is_hard_error() {
        let (ledger, client) = client_as(addr(DOCTOR)).await;
        ledger.suppress_prescription_events(true).await;

        let err = client
            .prescribe_medicine(addr(PATIENT), "Ibuprofen", "200mg", 20)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::MissingEvent {
                event: events::PRESCRIPTION_CREATED
            }
        );
    }

    #[tokio::test]
    async fn test_empty_collections_for_party_with_no_records() {
        let (_, client) = client_as(addr(DOCTOR)).await;

        assert!(client
            .prescriptions_by_patient(addr(PATIENT))
            .await
            .unwrap()
            .is_empty());
        assert!(client
            .prescription_details_by_doctor(addr(DOCTOR))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            client
                .prescription_count_by_patient(addr(PATIENT))
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_details_counterparts_differ_by_query_side() {
        let (_, client) = client_as(addr(DOCTOR)).await;
        client
            .prescribe_medicine(addr(PATIENT), "Ibuprofen", "200mg", 20)
            .await
            .unwrap();

        let by_doctor = client
            .prescription_details_by_doctor(addr(DOCTOR))
            .await
            .unwrap();
        assert_eq!(by_doctor.len(), 1);
        assert_eq!(by_doctor[0].counterpart, addr(PATIENT));

        let by_patient = client
            .prescription_details_by_patient(addr(PATIENT))
            .await
            .unwrap();
        assert_eq!(by_patient.len(), 1);
        assert_eq!(by_patient[0].counterpart, addr(DOCTOR));
        assert_eq!(by_doctor[0].prescription_id, by_patient[0].prescription_id);
    }

    #[tokio::test]
    async fn test_dispense_nonexistent_batch_reverts_and_leaves_no_record() {
        let (_, client) = client_as(addr(PHARMACY)).await;

        let err = client
            .dispense_drug("NO-BATCH", "NO-RX", addr(PATIENT), addr(DOCTOR), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::TransactionReverted { .. }));
        assert_eq!(client.total_dispensings().await.unwrap(), 0);
        assert!(client
            .dispensing_history("NO-BATCH")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_mint_reverts_with_reason() {
        let (_, client) = client_as(addr(PATIENT)).await;

        let err = client
            .mint_new_batch("B-2", "M", 10, 1, 2, U256::one())
            .await
            .unwrap_err();
        match err {
            ContractError::TransactionReverted { reason } => {
                assert!(reason.unwrap().contains("manufacturer"));
            }
            other => panic!("expected revert, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_timeout_surfaces_operation_timed_out() {
        let ledger = Arc::new(InMemoryLedger::new(addr(ADMIN)));
        ledger
            .set_call_delay(Duration::from_millis(200))
            .await;
        let client = ContractClient::with_config(ClientConfig {
            read_timeout: Duration::from_millis(20),
            write_timeout: Duration::from_secs(1),
        });
        client.bind_read_only(ledger).await;

        let err = client.total_batches().await.unwrap_err();
        assert!(matches!(err, ContractError::OperationTimedOut { .. }));
    }
}
