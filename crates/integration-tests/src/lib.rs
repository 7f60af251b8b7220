//! Integration tests for the CloudMart storefront client.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline tests (file-backed storage only)
//! cargo test -p cloudmart-integration-tests
//!
//! # Include tests against a running backend
//! CLOUDMART_API_BASE_URL=http://localhost:5000/api \
//!     cargo test -p cloudmart-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenario` - Cart manager behavior over the file store
//! - `user_session` - Profile lifecycle over the file store
//! - `live_api` - REST client and checkout against a live backend

use std::path::Path;

use cloudmart_storefront::config::StorefrontConfig;
use cloudmart_storefront::state::Storefront;
use tempfile::TempDir;

/// A storefront client persisting into a scratch directory.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    _dir: TempDir,
    config: StorefrontConfig,
    pub storefront: Storefront,
}

impl TestContext {
    /// Fresh client with empty storage and the default backend URL.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lookup(|_| None)
    }

    /// Fresh client with empty storage, configured from the process
    /// environment (for tests that talk to a live backend).
    ///
    /// # Panics
    ///
    /// Panics if the environment holds invalid configuration.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    fn with_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let dir = tempfile::tempdir().expect("scratch directory");
        let storage_path = dir.path().join("storage.json");

        let mut config = StorefrontConfig::from_lookup(lookup).expect("valid test configuration");
        config.storage_path = storage_path;

        let storefront = Storefront::new(config.clone()).expect("storefront client");
        Self {
            _dir: dir,
            config,
            storefront,
        }
    }

    /// A second client over the same storage document, as if the
    /// application were restarted.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn reopen(&self) -> Storefront {
        Storefront::new(self.config.clone()).expect("storefront client")
    }

    /// Location of the storage document.
    #[must_use]
    pub fn storage_path(&self) -> &Path {
        &self.config.storage_path
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
