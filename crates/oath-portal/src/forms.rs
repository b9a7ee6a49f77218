//! # Form Validation
//!
//! Client-side pre-validation of write inputs. The contract enforces the
//! same rules on-chain; validating first saves the user a signature prompt
//! and a gas estimate for input that can never succeed.

use oath_types::U256;
use thiserror::Error;

/// A rejected form input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A required text field was left empty.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A numeric field that must be strictly positive was zero.
    #[error("{field} must be greater than zero")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The expiry date does not follow the manufacturing date.
    #[error("expiry date must be after the manufacturing date")]
    ExpiryBeforeManufacture,
}

/// Input for minting a batch, validated before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintForm {
    /// Unique batch identifier.
    pub batch_id: String,
    /// Medicine name.
    pub medicine_name: String,
    /// Units in the batch.
    pub quantity: u64,
    /// Unix timestamp of manufacture.
    pub manufacturing_date: u64,
    /// Unix timestamp of expiry.
    pub expiry_date: u64,
    /// Price per unit in the smallest currency unit.
    pub price: U256,
}

impl MintForm {
    /// Checks every field, reporting the first violation.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.batch_id.trim().is_empty() {
            return Err(FormError::EmptyField { field: "batch id" });
        }
        if self.medicine_name.trim().is_empty() {
            return Err(FormError::EmptyField {
                field: "medicine name",
            });
        }
        if self.quantity == 0 {
            return Err(FormError::NonPositive { field: "quantity" });
        }
        if self.price.is_zero() {
            return Err(FormError::NonPositive { field: "price" });
        }
        if self.expiry_date <= self.manufacturing_date {
            return Err(FormError::ExpiryBeforeManufacture);
        }
        Ok(())
    }
}
