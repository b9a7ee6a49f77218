//! # Core Domain Entities
//!
//! The traceability records exposed across the contract boundary and the
//! client-side session record.
//!
//! ## Clusters
//!
//! - **Traceability**: [`Batch`], [`Prescription`], [`DispensingRecord`]
//! - **Session**: [`Session`], [`NetworkInfo`]
//!
//! Batches and prescriptions are immutable once created; dispensing records
//! are append-only. None of these types are mutated client-side; they are
//! snapshots of on-chain state at query time.

use crate::values::{Address, ChainId, Role, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// TRACEABILITY
// =============================================================================

/// A manufactured lot of a medicine, recorded for traceability.
///
/// Created by a mint operation and immutable thereafter. Timestamps are Unix
/// seconds; `expiry_date` is strictly greater than `manufacturing_date` for
/// any batch the contract accepted. `price` is in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Unique batch identifier, e.g. `BATCH-0001`.
    pub batch_id: String,
    /// Medicine name.
    pub medicine_name: String,
    /// Units remaining in the batch.
    pub quantity: u64,
    /// Unix timestamp of manufacture.
    pub manufacturing_date: u64,
    /// Unix timestamp of expiry (> `manufacturing_date`).
    pub expiry_date: u64,
    /// Price per unit in the smallest currency unit.
    pub price: U256,
    /// Address of the minting manufacturer.
    pub manufacturer: Address,
    /// On-chain existence flag.
    pub exists: bool,
}

/// A doctor-issued authorization for a patient to receive a medicine.
///
/// Created by a doctor-role write; never mutated or deleted through this
/// interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    /// Contract-assigned prescription identifier.
    pub prescription_id: String,
    /// Receiving patient.
    pub patient: Address,
    /// Issuing doctor.
    pub doctor: Address,
    /// Medicine name.
    pub medicine_name: String,
    /// Dosage instructions, free-form.
    pub dosage: String,
    /// Authorized quantity.
    pub quantity: u64,
    /// Unix timestamp of creation.
    pub timestamp: u64,
    /// On-chain existence flag.
    pub exists: bool,
}

/// A pharmacy transferring custody of quantity from a batch to a patient
/// against a prescription. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispensingRecord {
    /// Batch the quantity was drawn from.
    pub batch_id: String,
    /// Prescription the dispensing was made against.
    pub prescription_id: String,
    /// Receiving patient.
    pub patient: Address,
    /// Prescribing doctor.
    pub doctor: Address,
    /// Dispensing pharmacy.
    pub pharmacy: Address,
    /// Units dispensed.
    pub quantity: u64,
    /// Unix timestamp of dispensing.
    pub timestamp: u64,
}

// =============================================================================
// SESSION
// =============================================================================

/// Active network as reported by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// Chain identifier.
    pub chain_id: ChainId,
    /// Human-readable network name ("Sepolia", "Mainnet", "unknown").
    pub name: String,
}

/// Client-side record of a connected wallet.
///
/// Created on successful connection, destroyed on disconnect or an
/// accounts-changed event. The role is a pure function of on-chain
/// membership at resolution time and is never carried across an account or
/// network change without re-resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Connected account address.
    pub address: Address,
    /// Resolved role (first-match priority, see the session resolver).
    pub role: Role,
    /// Network the session was established on.
    pub chain: ChainId,
}
