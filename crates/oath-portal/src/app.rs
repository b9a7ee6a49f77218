//! # Portal App Shell
//!
//! Drives the mount/connect/disconnect flows and keeps the current
//! [`PortalView`]. Hosts render whatever `view()` returns; every failure
//! lands in a `Failed` view instead of propagating.

use crate::controllers::{DoctorPortal, ManufacturerPortal, PatientPortal, PharmacyPortal};
use crate::errors::PortalError;
use crate::view::PortalView;
use oath_session::SessionManager;
use oath_types::Role;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// The role-dispatched controller for an established session.
pub enum RolePortal {
    /// Batch minting surface.
    Manufacturer(ManufacturerPortal),
    /// Verification and dispensing surface.
    Pharmacy(PharmacyPortal),
    /// Prescribing surface.
    Doctor(DoctorPortal),
    /// Prescription viewing surface.
    Patient(PatientPortal),
}

/// Top-level portal state: one per host surface.
pub struct PortalApp {
    manager: Arc<SessionManager>,
    view: RwLock<PortalView>,
}

impl PortalApp {
    /// Creates an app over the session manager, starting disconnected.
    #[must_use]
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self {
            manager,
            view: RwLock::new(PortalView::Disconnected),
        }
    }

    /// The current view.
    pub async fn view(&self) -> PortalView {
        self.view.read().await.clone()
    }

    /// The session manager, for hosts that need direct access.
    #[must_use]
    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    /// Mount flow: bind read-only so public reads work, then attempt a
    /// silent restore. Restore failures stay silent; the view simply
    /// remains `Disconnected` and the user can connect explicitly.
    #[instrument(skip(self))]
    pub async fn on_mount(&self) -> PortalView {
        self.manager.initialize().await;
        let view = match self.manager.restore().await {
            Ok(Some(session)) => PortalView::Ready(session),
            Ok(None) => PortalView::Disconnected,
            Err(err) => {
                debug!(%err, "Silent restore failed; staying disconnected");
                PortalView::Disconnected
            }
        };
        *self.view.write().await = view.clone();
        view
    }

    /// Explicit connect flow, driven by a user action.
    #[instrument(skip(self))]
    pub async fn on_connect_clicked(&self) -> PortalView {
        *self.view.write().await = PortalView::Connecting;
        let view = match self.manager.connect().await {
            Ok(session) => PortalView::Ready(session),
            Err(err) => PortalView::from_error(&PortalError::Session(err)),
        };
        *self.view.write().await = view.clone();
        view
    }

    /// Explicit disconnect, driven by a user action.
    pub async fn on_disconnect_clicked(&self) -> PortalView {
        let view = match self.manager.disconnect().await {
            Ok(()) => PortalView::Disconnected,
            Err(err) => PortalView::from_error(&PortalError::Session(err)),
        };
        *self.view.write().await = view.clone();
        view
    }

    /// The controller matching the established session's role, or `None`
    /// when no session is up.
    pub async fn portal(&self) -> Option<RolePortal> {
        let session = self.manager.session().await?;
        let client = Arc::clone(self.manager.client());
        Some(match session.role {
            Role::Manufacturer => {
                RolePortal::Manufacturer(ManufacturerPortal::new(client, session.address))
            }
            Role::Pharmacy => RolePortal::Pharmacy(PharmacyPortal::new(client, session.address)),
            Role::Doctor => RolePortal::Doctor(DoctorPortal::new(client, session.address)),
            // Insurer has no dedicated surface; it reads as a patient.
            Role::Patient | Role::Insurer => {
                RolePortal::Patient(PatientPortal::new(client, session.address))
            }
        })
    }
}
