//! qbridge Testing Infrastructure
//!
//! In-memory collaborators and fixtures shared by the integration tests of every qbridge crate.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! qbridge-testkit = { path = "../qbridge-testkit" }
//! ```
//!
//! ```rust,no_run
//! use qbridge_testkit::*;
//!
//! let mut bridge = BridgeFixture::builder().min_confirmations(2).build();
//! let asset = bridge.register_pair(qbridge_core::Address([7u8; 20]), 1, 0);
//! ```

pub mod fixtures;
pub mod keys;
pub mod logging;
pub mod roles;
pub mod tokens;

pub use fixtures::{
    BridgeFixture, BridgeFixtureBuilder, ChainFixture, FixtureLedger, FixtureQuorum,
    FIXTURE_ADMIN,
};
pub use keys::{attest_all, attestor_keys, TEST_PREFIX};
pub use logging::init_test_tracing;
pub use roles::InMemoryRoles;
pub use tokens::InMemoryTokens;
