//! # Binding State Machine
//!
//! The provider/signer/contract triple, modeled as an explicit state value
//! owned by one [`crate::ContractClient`] rather than process-wide mutable
//! state. Rebinding on account or chain change is a context replacement
//! driven by the session layer's event task; concurrent callers observe
//! either the old binding or `Uninitialized`, never a half-rebound one.

use crate::ports::ContractTransport;
use oath_types::Address;
use std::fmt;
use std::sync::Arc;

/// Current binding of the contract layer.
pub enum Binding {
    /// No provider bound. Every operation fails.
    Uninitialized,
    /// Bound to a read-only provider; reads work, writes fail.
    ReadOnly {
        /// Transport executing read calls.
        transport: Arc<dyn ContractTransport>,
    },
    /// Bound to a signer derived from the connected account.
    ReadWrite {
        /// Transport executing calls and transactions.
        transport: Arc<dyn ContractTransport>,
        /// The connected account transactions are sent from.
        signer: Address,
    },
}

/// Discriminant of [`Binding`], for inspection and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// No provider bound.
    Uninitialized,
    /// Provider bound, no signer.
    ReadOnly,
    /// Provider and signer bound.
    ReadWrite,
}

impl Binding {
    /// Discriminant of this binding.
    #[must_use]
    pub fn state(&self) -> BindingState {
        match self {
            Self::Uninitialized => BindingState::Uninitialized,
            Self::ReadOnly { .. } => BindingState::ReadOnly,
            Self::ReadWrite { .. } => BindingState::ReadWrite,
        }
    }

    /// Transport usable for reads, if any binding exists.
    #[must_use]
    pub fn read_transport(&self) -> Option<Arc<dyn ContractTransport>> {
        match self {
            Self::Uninitialized => None,
            Self::ReadOnly { transport } | Self::ReadWrite { transport, .. } => {
                Some(transport.clone())
            }
        }
    }

    /// Transport and signer usable for writes, only in `ReadWrite`.
    #[must_use]
    pub fn write_context(&self) -> Option<(Arc<dyn ContractTransport>, Address)> {
        match self {
            Self::ReadWrite { transport, signer } => Some((transport.clone(), *signer)),
            _ => None,
        }
    }

    /// The bound signer, if any.
    #[must_use]
    pub fn signer(&self) -> Option<Address> {
        match self {
            Self::ReadWrite { signer, .. } => Some(*signer),
            _ => None,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "Binding::Uninitialized"),
            Self::ReadOnly { .. } => write!(f, "Binding::ReadOnly"),
            Self::ReadWrite { signer, .. } => {
                write!(f, "Binding::ReadWrite {{ signer: {signer:?} }}")
            }
        }
    }
}

impl Default for Binding {
    fn default() -> Self {
        Self::Uninitialized
    }
}
