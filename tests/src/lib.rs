//! # OATH Client Test Suite
//!
//! Unified test crate for cross-crate flows. Per-crate unit tests live
//! beside the code they test; this crate covers the choreography that only
//! exists when wallet, contract, session, and portal layers run together.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── e2e_choreography.rs   # Full supply-chain happy path
//!     └── flows.rs              # Failure-path flows across layers
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p oath-tests
//!
//! # By category
//! cargo test -p oath-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;
