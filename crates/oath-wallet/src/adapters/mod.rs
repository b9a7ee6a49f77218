//! # Provider Adapters
//!
//! Implementations of the [`crate::InjectedProvider`] port. Only the
//! scriptable in-memory provider lives here; the real browser bridge is
//! supplied by the embedding environment.

mod mock;

pub use mock::MockProvider;
