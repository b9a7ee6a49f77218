//! # OATH Portal - Per-Role Portal Controllers
//!
//! Thin controllers over the session and contract layers, one per resolved
//! role. Controllers never hold chain state of their own: every read is a
//! fresh query and every write awaits its confirmation before the next is
//! submitted.
//!
//! ## Non-crashing surface
//!
//! Every error kind from the wallet, contract, and session layers maps to a
//! [`PortalView::Failed`] state with a user-presentable message; no failure
//! path panics or tears down the process.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod app;
pub mod controllers;
pub mod errors;
pub mod forms;
pub mod view;

pub use app::{PortalApp, RolePortal};
pub use controllers::{DoctorPortal, ManufacturerPortal, PatientPortal, PharmacyPortal};
pub use errors::PortalError;
pub use forms::{FormError, MintForm};
pub use view::PortalView;
