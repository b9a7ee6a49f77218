//! # OATH Session - Session Lifecycle and Role Resolution
//!
//! Translates a connected wallet address into exactly one portal role and
//! owns the contract binding across the session's life.
//!
//! ## Role resolution
//!
//! The three on-chain membership predicates run concurrently; the first
//! match in priority order Manufacturer > Pharmacy > Doctor wins, and an
//! address matching none is a Patient. Resolution is a pure function of
//! on-chain state at query time: a role is never carried across an account
//! or network change without re-resolution.
//!
//! ## Event-driven rebinding
//!
//! Provider events (accounts changed, chain changed, disconnect) flow over
//! a broadcast channel into a single state-owning task spawned by
//! [`SessionManager::spawn_event_loop`]. Only that task resets the contract
//! binding, which keeps the Uninitialized → ReadWrite transitions race-free
//! under concurrent portal access.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod errors;
pub mod manager;
pub mod resolver;
pub mod store;

pub use errors::SessionError;
pub use manager::SessionManager;
pub use resolver::resolve_role;
pub use store::{
    clear_session, load_persisted, save_session, InMemorySessionStore, PersistedSession,
    SessionStore, StoreError, ROLE_KEY, WALLET_KEY,
};
