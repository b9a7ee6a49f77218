//! # In-Memory Ledger
//!
//! A faithful in-process emulation of the Oath contract: role sets, batch
//! and prescription maps, an append-only dispensing log, and the same revert
//! reasons a caller would see on-chain. Timestamps come from a logical clock
//! that advances once per transaction, so tests are deterministic.
//!
//! Two test hooks exist that the real contract has no analogue for:
//! suppressing the `PrescriptionCreated` event (to exercise the
//! missing-event hard error) and delaying reads (to exercise timeouts).

use crate::abi::{events, functions, AbiValue};
use crate::errors::TransportError;
use crate::ports::{ContractTransport, EventLog, TxReceipt};
use async_trait::async_trait;
use oath_types::{Address, Batch, DispensingRecord, Prescription, TxHash, U256};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Logical clock origin, an arbitrary recent Unix timestamp.
const CLOCK_ORIGIN: u64 = 1_700_000_000;

struct LedgerState {
    admin: Address,
    manufacturers: HashSet<Address>,
    pharmacies: HashSet<Address>,
    doctors: HashSet<Address>,
    batches: HashMap<String, Batch>,
    prescriptions: HashMap<String, Prescription>,
    by_doctor: HashMap<Address, Vec<String>>,
    by_patient: HashMap<Address, Vec<String>>,
    dispensings: HashMap<String, Vec<DispensingRecord>>,
    dispensing_total: u64,
    prescription_counter: u64,
    tx_counter: u64,
    clock: u64,
    suppress_prescription_events: bool,
    call_delay: Option<Duration>,
}

impl LedgerState {
    fn new(admin: Address) -> Self {
        Self {
            admin,
            manufacturers: HashSet::new(),
            pharmacies: HashSet::new(),
            doctors: HashSet::new(),
            batches: HashMap::new(),
            prescriptions: HashMap::new(),
            by_doctor: HashMap::new(),
            by_patient: HashMap::new(),
            dispensings: HashMap::new(),
            dispensing_total: 0,
            prescription_counter: 0,
            tx_counter: 0,
            clock: CLOCK_ORIGIN,
            suppress_prescription_events: false,
            call_delay: None,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn next_tx_hash(&mut self) -> TxHash {
        self.tx_counter += 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&self.tx_counter.to_be_bytes());
        TxHash::new(bytes)
    }
}

/// In-memory contract emulation behind the transport port.
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// Creates an empty ledger with `admin` as the enrolling authority.
    #[must_use]
    pub fn new(admin: Address) -> Self {
        Self {
            state: Mutex::new(LedgerState::new(admin)),
        }
    }

    /// Test hook: when set, confirmed prescriptions omit their
    /// `PrescriptionCreated` event.
    pub async fn suppress_prescription_events(&self, suppress: bool) {
        self.state.lock().await.suppress_prescription_events = suppress;
    }

    /// Test hook: delays every read call by `delay`.
    pub async fn set_call_delay(&self, delay: Duration) {
        self.state.lock().await.call_delay = Some(delay);
    }
}

fn revert(reason: &str) -> TransportError {
    TransportError::Reverted {
        reason: Some(reason.to_string()),
    }
}

fn decode_err(function: &str, detail: &str) -> TransportError {
    TransportError::Decode(format!("{function}: {detail}"))
}

// -----------------------------------------------------------------------------
// Argument accessors
// -----------------------------------------------------------------------------

fn arg_str<'a>(args: &'a [AbiValue], idx: usize, function: &str) -> Result<&'a str, TransportError> {
    args.get(idx)
        .and_then(AbiValue::as_str)
        .ok_or_else(|| decode_err(function, &format!("arg {idx} must be string")))
}

fn arg_u64(args: &[AbiValue], idx: usize, function: &str) -> Result<u64, TransportError> {
    args.get(idx)
        .and_then(AbiValue::as_u64)
        .ok_or_else(|| decode_err(function, &format!("arg {idx} must be uint")))
}

fn arg_uint(args: &[AbiValue], idx: usize, function: &str) -> Result<U256, TransportError> {
    args.get(idx)
        .and_then(AbiValue::as_uint)
        .ok_or_else(|| decode_err(function, &format!("arg {idx} must be uint")))
}

fn arg_addr(args: &[AbiValue], idx: usize, function: &str) -> Result<Address, TransportError> {
    args.get(idx)
        .and_then(AbiValue::as_address)
        .ok_or_else(|| decode_err(function, &format!("arg {idx} must be address")))
}

// -----------------------------------------------------------------------------
// Transaction handlers
// -----------------------------------------------------------------------------

fn handle_mint(
    state: &mut LedgerState,
    args: &[AbiValue],
    from: Address,
) -> Result<Vec<EventLog>, TransportError> {
    let function = functions::MINT_NEW_BATCH;
    let batch_id = arg_str(args, 0, function)?.to_string();
    let medicine_name = arg_str(args, 1, function)?.to_string();
    let quantity = arg_u64(args, 2, function)?;
    let manufacturing_date = arg_u64(args, 3, function)?;
    let expiry_date = arg_u64(args, 4, function)?;
    let price = arg_uint(args, 5, function)?;

    if !state.manufacturers.contains(&from) {
        return Err(revert("caller is not an enrolled manufacturer"));
    }
    if batch_id.is_empty() {
        return Err(revert("batch id required"));
    }
    if state.batches.contains_key(&batch_id) {
        return Err(revert("batch already exists"));
    }
    if quantity == 0 {
        return Err(revert("quantity must be positive"));
    }
    if price.is_zero() {
        return Err(revert("price must be positive"));
    }
    if expiry_date <= manufacturing_date {
        return Err(revert("expiry must follow manufacture"));
    }

    let batch = Batch {
        batch_id: batch_id.clone(),
        medicine_name: medicine_name.clone(),
        quantity,
        manufacturing_date,
        expiry_date,
        price,
        manufacturer: from,
        exists: true,
    };
    state.batches.insert(batch_id.clone(), batch);

    Ok(vec![EventLog {
        event: events::BATCH_MINTED.to_string(),
        values: vec![
            batch_id.into(),
            medicine_name.into(),
            quantity.into(),
            manufacturing_date.into(),
            expiry_date.into(),
            price.into(),
            from.into(),
        ],
    }])
}

fn handle_prescribe(
    state: &mut LedgerState,
    args: &[AbiValue],
    from: Address,
) -> Result<Vec<EventLog>, TransportError> {
    let function = functions::PRESCRIBE_MEDICINE;
    let patient = arg_addr(args, 0, function)?;
    let medicine_name = arg_str(args, 1, function)?.to_string();
    let dosage = arg_str(args, 2, function)?.to_string();
    let quantity = arg_u64(args, 3, function)?;

    if !state.doctors.contains(&from) {
        return Err(revert("caller is not an enrolled doctor"));
    }
    if quantity == 0 {
        return Err(revert("quantity must be positive"));
    }

    state.prescription_counter += 1;
    let prescription_id = format!("RX-{:04}", state.prescription_counter);
    let timestamp = state.tick();

    let prescription = Prescription {
        prescription_id: prescription_id.clone(),
        patient,
        doctor: from,
        medicine_name: medicine_name.clone(),
        dosage: dosage.clone(),
        quantity,
        timestamp,
        exists: true,
    };
    state
        .prescriptions
        .insert(prescription_id.clone(), prescription);
    state
        .by_doctor
        .entry(from)
        .or_default()
        .push(prescription_id.clone());
    state
        .by_patient
        .entry(patient)
        .or_default()
        .push(prescription_id.clone());

    if state.suppress_prescription_events {
        return Ok(vec![]);
    }
    Ok(vec![EventLog {
        event: events::PRESCRIPTION_CREATED.to_string(),
        values: vec![
            patient.into(),
            from.into(),
            prescription_id.into(),
            medicine_name.into(),
            dosage.into(),
            quantity.into(),
            timestamp.into(),
        ],
    }])
}

fn handle_dispense(
    state: &mut LedgerState,
    args: &[AbiValue],
    from: Address,
) -> Result<Vec<EventLog>, TransportError> {
    let function = functions::DISPENSE_DRUG;
    let batch_id = arg_str(args, 0, function)?.to_string();
    let prescription_id = arg_str(args, 1, function)?.to_string();
    let patient = arg_addr(args, 2, function)?;
    let doctor = arg_addr(args, 3, function)?;
    let quantity = arg_u64(args, 4, function)?;

    if !state.pharmacies.contains(&from) {
        return Err(revert("caller is not an enrolled pharmacy"));
    }
    if !state.batches.contains_key(&batch_id) {
        return Err(revert("batch does not exist"));
    }
    if !state.prescriptions.contains_key(&prescription_id) {
        return Err(revert("prescription does not exist"));
    }
    if quantity == 0 {
        return Err(revert("quantity must be positive"));
    }
    let remaining = state
        .batches
        .get(&batch_id)
        .map(|b| b.quantity)
        .unwrap_or_default();
    if quantity > remaining {
        return Err(revert("insufficient quantity in batch"));
    }

    let timestamp = state.tick();
    if let Some(batch) = state.batches.get_mut(&batch_id) {
        batch.quantity -= quantity;
    }
    let record = DispensingRecord {
        batch_id: batch_id.clone(),
        prescription_id: prescription_id.clone(),
        patient,
        doctor,
        pharmacy: from,
        quantity,
        timestamp,
    };
    state
        .dispensings
        .entry(batch_id.clone())
        .or_default()
        .push(record);
    state.dispensing_total += 1;

    Ok(vec![EventLog {
        event: events::DRUG_DISPENSED.to_string(),
        values: vec![
            batch_id.into(),
            prescription_id.into(),
            patient.into(),
            doctor.into(),
            from.into(),
            quantity.into(),
            timestamp.into(),
        ],
    }])
}

fn handle_roster(
    state: &mut LedgerState,
    function: &str,
    args: &[AbiValue],
    from: Address,
) -> Result<Vec<EventLog>, TransportError> {
    if from != state.admin {
        return Err(revert("caller is not the admin"));
    }
    let target = arg_addr(args, 0, function)?;
    match function {
        functions::ENROLL_MANUFACTURER => state.manufacturers.insert(target),
        functions::DEACTIVATE_MANUFACTURER => state.manufacturers.remove(&target),
        functions::ENROLL_PHARMACY => state.pharmacies.insert(target),
        functions::DEACTIVATE_PHARMACY => state.pharmacies.remove(&target),
        functions::ENROLL_DOCTOR => state.doctors.insert(target),
        functions::DEACTIVATE_DOCTOR => state.doctors.remove(&target),
        other => return Err(TransportError::Rpc(format!("unknown function {other}"))),
    };
    Ok(vec![])
}

// -----------------------------------------------------------------------------
// View helpers
// -----------------------------------------------------------------------------

fn batch_tuple(batch: &Batch) -> Vec<AbiValue> {
    vec![
        batch.batch_id.clone().into(),
        batch.medicine_name.clone().into(),
        batch.quantity.into(),
        batch.manufacturing_date.into(),
        batch.expiry_date.into(),
        batch.price.into(),
        batch.manufacturer.into(),
    ]
}

fn prescription_tuple(p: &Prescription) -> Vec<AbiValue> {
    vec![
        p.prescription_id.clone().into(),
        p.patient.into(),
        p.doctor.into(),
        p.medicine_name.clone().into(),
        p.dosage.clone().into(),
        p.quantity.into(),
        p.timestamp.into(),
    ]
}

fn ids_for<'a>(index: &'a HashMap<Address, Vec<String>>, party: Address) -> &'a [String] {
    index.get(&party).map_or(&[], Vec::as_slice)
}

/// Builds the 6 parallel detail arrays; `counterpart_of` picks the other
/// party for the query side.
fn detail_arrays(
    state: &LedgerState,
    ids: &[String],
    counterpart_of: impl Fn(&Prescription) -> Address,
) -> Vec<AbiValue> {
    let rows: Vec<&Prescription> = ids
        .iter()
        .filter_map(|id| state.prescriptions.get(id))
        .collect();
    vec![
        AbiValue::StrArray(rows.iter().map(|p| p.prescription_id.clone()).collect()),
        AbiValue::AddrArray(rows.iter().map(|p| counterpart_of(p)).collect()),
        AbiValue::StrArray(rows.iter().map(|p| p.medicine_name.clone()).collect()),
        AbiValue::StrArray(rows.iter().map(|p| p.dosage.clone()).collect()),
        AbiValue::UintArray(rows.iter().map(|p| U256::from(p.quantity)).collect()),
        AbiValue::UintArray(rows.iter().map(|p| U256::from(p.timestamp)).collect()),
    ]
}

// -----------------------------------------------------------------------------
// Port implementation
// -----------------------------------------------------------------------------

#[async_trait]
impl ContractTransport for InMemoryLedger {
    async fn call(
        &self,
        function: &str,
        args: Vec<AbiValue>,
    ) -> Result<Vec<AbiValue>, TransportError> {
        let delay = self.state.lock().await.call_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state.lock().await;
        debug!(function, "Ledger read");

        match function {
            functions::MANUFACTURERS => {
                let who = arg_addr(&args, 0, function)?;
                Ok(vec![state.manufacturers.contains(&who).into()])
            }
            functions::PHARMACIES => {
                let who = arg_addr(&args, 0, function)?;
                Ok(vec![state.pharmacies.contains(&who).into()])
            }
            functions::DOCTORS => {
                let who = arg_addr(&args, 0, function)?;
                Ok(vec![state.doctors.contains(&who).into()])
            }
            functions::ADMIN => Ok(vec![state.admin.into()]),

            functions::GET_BATCH => {
                let id = arg_str(&args, 0, function)?;
                state
                    .batches
                    .get(id)
                    .map(batch_tuple)
                    .ok_or_else(|| revert("batch does not exist"))
            }
            functions::GET_BATCH_DETAILS => {
                let id = arg_str(&args, 0, function)?;
                Ok(match state.batches.get(id) {
                    Some(batch) => {
                        let mut values = batch_tuple(batch);
                        values.push(true.into());
                        values
                    }
                    // Unknown key: the mapping yields the zero struct.
                    None => vec![
                        "".into(),
                        "".into(),
                        0u64.into(),
                        0u64.into(),
                        0u64.into(),
                        U256::zero().into(),
                        Address::ZERO.into(),
                        false.into(),
                    ],
                })
            }
            functions::GET_TOTAL_BATCHES => Ok(vec![(state.batches.len() as u64).into()]),
            functions::VERIFY_DRUG => {
                let id = arg_str(&args, 0, function)?;
                let verified = state.batches.get(id).is_some_and(|batch| {
                    batch.quantity > 0 && batch.expiry_date > state.clock
                });
                Ok(vec![verified.into()])
            }

            functions::GET_PRESCRIPTION => {
                let id = arg_str(&args, 0, function)?;
                state
                    .prescriptions
                    .get(id)
                    .map(prescription_tuple)
                    .ok_or_else(|| revert("prescription does not exist"))
            }
            functions::GET_TOTAL_PRESCRIPTIONS => {
                Ok(vec![(state.prescriptions.len() as u64).into()])
            }
            functions::GET_PRESCRIPTIONS_BY_DOCTOR => {
                let who = arg_addr(&args, 0, function)?;
                Ok(vec![AbiValue::StrArray(
                    ids_for(&state.by_doctor, who).to_vec(),
                )])
            }
            functions::GET_PRESCRIPTION_COUNT_BY_DOCTOR => {
                let who = arg_addr(&args, 0, function)?;
                Ok(vec![(ids_for(&state.by_doctor, who).len() as u64).into()])
            }
            functions::GET_PRESCRIPTION_DETAILS_BY_DOCTOR => {
                let who = arg_addr(&args, 0, function)?;
                let ids = ids_for(&state.by_doctor, who).to_vec();
                Ok(detail_arrays(&state, &ids, |p| p.patient))
            }
            functions::GET_PRESCRIPTIONS_BY_PATIENT => {
                let who = arg_addr(&args, 0, function)?;
                Ok(vec![AbiValue::StrArray(
                    ids_for(&state.by_patient, who).to_vec(),
                )])
            }
            functions::GET_PRESCRIPTION_COUNT_BY_PATIENT => {
                let who = arg_addr(&args, 0, function)?;
                Ok(vec![(ids_for(&state.by_patient, who).len() as u64).into()])
            }
            functions::GET_PRESCRIPTION_DETAILS_BY_PATIENT => {
                let who = arg_addr(&args, 0, function)?;
                let ids = ids_for(&state.by_patient, who).to_vec();
                Ok(detail_arrays(&state, &ids, |p| p.doctor))
            }

            functions::GET_DISPENSING_HISTORY => {
                let id = arg_str(&args, 0, function)?;
                let records = state.dispensings.get(id).map_or(&[][..], Vec::as_slice);
                Ok(vec![
                    AbiValue::StrArray(
                        records.iter().map(|r| r.prescription_id.clone()).collect(),
                    ),
                    AbiValue::AddrArray(records.iter().map(|r| r.patient).collect()),
                    AbiValue::AddrArray(records.iter().map(|r| r.doctor).collect()),
                    AbiValue::AddrArray(records.iter().map(|r| r.pharmacy).collect()),
                    AbiValue::UintArray(records.iter().map(|r| U256::from(r.quantity)).collect()),
                    AbiValue::UintArray(records.iter().map(|r| U256::from(r.timestamp)).collect()),
                ])
            }
            functions::GET_TOTAL_DISPENSINGS => Ok(vec![state.dispensing_total.into()]),

            other => Err(TransportError::Rpc(format!("unknown function {other}"))),
        }
    }

    async fn send(
        &self,
        function: &str,
        args: Vec<AbiValue>,
        from: Address,
    ) -> Result<TxReceipt, TransportError> {
        let mut state = self.state.lock().await;
        debug!(function, from = %from, "Ledger transaction");

        let logs = match function {
            functions::MINT_NEW_BATCH => handle_mint(&mut state, &args, from)?,
            functions::PRESCRIBE_MEDICINE => handle_prescribe(&mut state, &args, from)?,
            functions::DISPENSE_DRUG => handle_dispense(&mut state, &args, from)?,
            functions::ENROLL_MANUFACTURER
            | functions::DEACTIVATE_MANUFACTURER
            | functions::ENROLL_PHARMACY
            | functions::DEACTIVATE_PHARMACY
            | functions::ENROLL_DOCTOR
            | functions::DEACTIVATE_DOCTOR => handle_roster(&mut state, function, &args, from)?,
            other => return Err(TransportError::Rpc(format!("unknown function {other}"))),
        };

        Ok(TxReceipt {
            tx_hash: state.next_tx_hash(),
            logs,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
