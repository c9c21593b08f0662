//! Common test infrastructure
//!
//! This module provides the infrastructure for end-to-end tests. Tests
//! should only import from this module, not from internal submodules.
//!
//! The network seams are replaced: the thumbnail CDN and title endpoint by a
//! scripted stub fetcher, the persistence service by the in-memory gateway.

mod client;
mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{StubFetcher, FAKE_JPEG};
#[allow(unused_imports)]
pub use server::TestServer;
