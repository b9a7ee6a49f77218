//! # OATH Types - Shared Domain Entities
//!
//! Core entities and value objects shared by every crate in the workspace.
//!
//! ## Clusters
//!
//! - **Traceability**: [`Batch`], [`Prescription`], [`DispensingRecord`]
//! - **Identity & Session**: [`Address`], [`Role`], [`Session`]
//! - **Network**: [`ChainId`], [`NetworkInfo`], [`TxHash`]
//!
//! All on-chain integers wider than `u64` use [`U256`] (re-exported from
//! `primitive-types`); addresses and transaction hashes are fixed-width
//! newtypes that render as `0x`-prefixed hex.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod entities;
pub mod values;

pub use entities::{Batch, DispensingRecord, NetworkInfo, Prescription, Session};
pub use values::{Address, ChainId, HexParseError, Role, RoleParseError, TxHash, U256};
