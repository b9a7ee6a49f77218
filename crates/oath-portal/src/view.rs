//! # Portal View State
//!
//! The UI-facing state machine. Every portal renders exactly one of these
//! at a time; failures always land in [`PortalView::Failed`] rather than
//! propagating a panic into the host.

use crate::errors::PortalError;
use oath_contract::ContractError;
use oath_session::SessionError;
use oath_types::Session;
use oath_wallet::ProviderError;

/// What the portal shows right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalView {
    /// No wallet connected; the connect action is available.
    Disconnected,
    /// A connect flow is in progress (wallet prompt may be open).
    Connecting,
    /// Connected with a resolved role.
    Ready(Session),
    /// Something failed; the message is user-presentable.
    Failed {
        /// Human-readable description of the failure.
        message: String,
        /// Whether retrying the same action can succeed (true for
        /// user-declined prompts and transient failures; false when the
        /// environment itself is missing a wallet).
        recoverable: bool,
    },
}

impl PortalView {
    /// Maps a portal error to the view state it should render.
    #[must_use]
    pub fn from_error(err: &PortalError) -> Self {
        let recoverable = match err {
            // Fixing the input and resubmitting is the expected path.
            PortalError::Form(_) => true,
            PortalError::Session(session) => session_recoverable(session),
            PortalError::Contract(contract) => contract_recoverable(contract),
        };
        Self::Failed {
            message: err.to_string(),
            recoverable,
        }
    }

    /// True when a session is established.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

fn session_recoverable(err: &SessionError) -> bool {
    match err {
        // No wallet extension: retrying without installing one cannot help.
        SessionError::Provider(ProviderError::NoProviderFound) => false,
        SessionError::Provider(_)
        | SessionError::RoleResolutionFailed { .. }
        | SessionError::Store(_)
        | SessionError::WrongNetwork { .. } => true,
        SessionError::Contract(contract) => contract_recoverable(contract),
    }
}

fn contract_recoverable(err: &ContractError) -> bool {
    match err {
        // Reconnecting re-binds the layer; the action can then be retried.
        ContractError::SignerRequired | ContractError::SignerOrProviderUnavailable => true,
        // A missing entity stays missing until someone creates it, but the
        // portal itself recovers by querying something else.
        ContractError::NotFound { .. }
        | ContractError::TransactionReverted { .. }
        | ContractError::MissingEvent { .. }
        | ContractError::OperationTimedOut { .. }
        | ContractError::Decode(_)
        | ContractError::Transport(_) => true,
    }
}
