//! # Error Types
//!
//! The single error type portal surfaces deal in: every lower-layer failure
//! and every rejected form converges here, and every variant's `Display`
//! string is fit to show a user.

use crate::forms::FormError;
use oath_contract::ContractError;
use oath_session::SessionError;
use thiserror::Error;

/// Any failure a portal operation can surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// Input rejected before submission; nothing was sent to the wallet.
    #[error("{0}")]
    Form(#[from] FormError),

    /// Session-layer failure (wallet, network, role resolution, store).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Contract-layer failure (reads and writes).
    #[error(transparent)]
    Contract(#[from] ContractError),
}
