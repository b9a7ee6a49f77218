//! # Oath Contract Surface
//!
//! The fixed deployment address, function names, event names, and the wire
//! value enum the transport speaks. The contract is an opaque RPC surface:
//! nothing here implements contract logic, only names it.

use oath_types::{Address, U256};

/// Deployed Oath contract address (Sepolia).
pub const CONTRACT_ADDRESS: Address = Address::new([
    0x0b, 0x3b, 0x1b, 0xb9, 0x72, 0x72, 0x05, 0x08, 0x19, 0x35, 0x5a, 0x98, 0xfb, 0xba, 0xe4,
    0x7e, 0x0f, 0x9f, 0x44, 0xb1,
]);

/// Contract function names.
pub mod functions {
    /// `mintNewBatch(string,string,uint256,uint256,uint256,uint256)`
    pub const MINT_NEW_BATCH: &str = "mintNewBatch";
    /// `getBatch(string)` → 7-tuple, reverts for unknown batches.
    pub const GET_BATCH: &str = "getBatch";
    /// `getBatchDetails(string)` → 8-tuple with an explicit existence flag.
    pub const GET_BATCH_DETAILS: &str = "getBatchDetails";
    /// `getTotalBatches()`
    pub const GET_TOTAL_BATCHES: &str = "getTotalBatches";
    /// `verifyDrug(string)` → bool, false for unknown batches.
    pub const VERIFY_DRUG: &str = "verifyDrug";

    /// `manufacturers(address)` membership mapping.
    pub const MANUFACTURERS: &str = "manufacturers";
    /// `pharmacies(address)` membership mapping.
    pub const PHARMACIES: &str = "pharmacies";
    /// `doctors(address)` membership mapping.
    pub const DOCTORS: &str = "doctors";
    /// `admin()`
    pub const ADMIN: &str = "admin";

    /// `enrollManufacturer(address)` (admin only)
    pub const ENROLL_MANUFACTURER: &str = "enrollManufacturer";
    /// `deactivateManufacturer(address)` (admin only)
    pub const DEACTIVATE_MANUFACTURER: &str = "deactivateManufacturer";
    /// `enrollPharmacy(address)` (admin only)
    pub const ENROLL_PHARMACY: &str = "enrollPharmacy";
    /// `deactivatePharmacy(address)` (admin only)
    pub const DEACTIVATE_PHARMACY: &str = "deactivatePharmacy";
    /// `enrollDoctor(address)` (admin only)
    pub const ENROLL_DOCTOR: &str = "enrollDoctor";
    /// `deactivateDoctor(address)` (admin only)
    pub const DEACTIVATE_DOCTOR: &str = "deactivateDoctor";

    /// `dispenseDrug(string,string,address,address,uint256)`
    pub const DISPENSE_DRUG: &str = "dispenseDrug";
    /// `getDispensingHistory(string)` → 6 parallel arrays.
    pub const GET_DISPENSING_HISTORY: &str = "getDispensingHistory";
    /// `getTotalDispensings()`
    pub const GET_TOTAL_DISPENSINGS: &str = "getTotalDispensings";

    /// `prescribeMedicine(address,string,string,uint256)`
    pub const PRESCRIBE_MEDICINE: &str = "prescribeMedicine";
    /// `getPrescription(string)` → 7-tuple, reverts for unknown ids.
    pub const GET_PRESCRIPTION: &str = "getPrescription";
    /// `getTotalPrescriptions()`
    pub const GET_TOTAL_PRESCRIPTIONS: &str = "getTotalPrescriptions";
    /// `getPrescriptionsByDoctor(address)` → ids.
    pub const GET_PRESCRIPTIONS_BY_DOCTOR: &str = "getPrescriptionsByDoctor";
    /// `getPrescriptionCountByDoctor(address)`
    pub const GET_PRESCRIPTION_COUNT_BY_DOCTOR: &str = "getPrescriptionCountByDoctor";
    /// `getPrescriptionDetailsByDoctor(address)` → 6 parallel arrays.
    pub const GET_PRESCRIPTION_DETAILS_BY_DOCTOR: &str = "getPrescriptionDetailsByDoctor";
    /// `getPrescriptionsByPatient(address)` → ids.
    pub const GET_PRESCRIPTIONS_BY_PATIENT: &str = "getPrescriptionsByPatient";
    /// `getPrescriptionCountByPatient(address)`
    pub const GET_PRESCRIPTION_COUNT_BY_PATIENT: &str = "getPrescriptionCountByPatient";
    /// `getPrescriptionDetailsByPatient(address)` → 6 parallel arrays.
    pub const GET_PRESCRIPTION_DETAILS_BY_PATIENT: &str = "getPrescriptionDetailsByPatient";
}

/// Contract event names.
pub mod events {
    /// `BatchMinted(batchId, medicineName, quantity, manufacturingDate,
    /// expiryDate, price, manufacturer)`
    pub const BATCH_MINTED: &str = "BatchMinted";
    /// `DrugVerification(batchId, verified, pharmacy, reason)`
    pub const DRUG_VERIFICATION: &str = "DrugVerification";
    /// `DrugDispensed(batchId, prescriptionId, patient, doctor, pharmacy,
    /// quantity, timestamp)`
    pub const DRUG_DISPENSED: &str = "DrugDispensed";
    /// `PrescriptionCreated(patient, doctor, prescriptionId, medicineName,
    /// dosage, quantity, timestamp)`
    pub const PRESCRIPTION_CREATED: &str = "PrescriptionCreated";

    /// Index of the prescription id within `PrescriptionCreated` values.
    pub const PRESCRIPTION_CREATED_ID_INDEX: usize = 2;
}

// =============================================================================
// WIRE VALUES
// =============================================================================

/// A decoded ABI value crossing the transport seam.
///
/// The transport decodes raw calldata/returndata into this enum; the client
/// never sees undecoded bytes. Accessors return `None` on a type mismatch so
/// shape errors surface as typed decode failures, never panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// `string`
    Str(String),
    /// `uint256`
    Uint(U256),
    /// `address`
    Addr(Address),
    /// `bool`
    Bool(bool),
    /// `string[]`
    StrArray(Vec<String>),
    /// `address[]`
    AddrArray(Vec<Address>),
    /// `uint256[]`
    UintArray(Vec<U256>),
}

impl AbiValue {
    /// String value, if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// U256 value, if this is a `Uint`.
    #[must_use]
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(u) => Some(*u),
            _ => None,
        }
    }

    /// U256 value narrowed to `u64`, if this is a `Uint` that fits.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(u) if u.bits() <= 64 => Some(u.as_u64()),
            _ => None,
        }
    }

    /// Address value, if this is an `Addr`.
    #[must_use]
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Addr(a) => Some(*a),
            _ => None,
        }
    }

    /// Bool value, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String array, if this is a `StrArray`.
    #[must_use]
    pub fn as_str_array(&self) -> Option<&[String]> {
        match self {
            Self::StrArray(v) => Some(v),
            _ => None,
        }
    }

    /// Address array, if this is an `AddrArray`.
    #[must_use]
    pub fn as_addr_array(&self) -> Option<&[Address]> {
        match self {
            Self::AddrArray(v) => Some(v),
            _ => None,
        }
    }

    /// Uint array, if this is a `UintArray`.
    #[must_use]
    pub fn as_uint_array(&self) -> Option<&[U256]> {
        match self {
            Self::UintArray(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&str> for AbiValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AbiValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<u64> for AbiValue {
    fn from(u: u64) -> Self {
        Self::Uint(U256::from(u))
    }
}

impl From<U256> for AbiValue {
    fn from(u: U256) -> Self {
        Self::Uint(u)
    }
}

impl From<Address> for AbiValue {
    fn from(a: Address) -> Self {
        Self::Addr(a)
    }
}

impl From<bool> for AbiValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
