//! Client state shared across commands.

use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::cart::CartManager;
use crate::checkout::Checkout;
use crate::config::StorefrontConfig;
use crate::events::CartEvents;
use crate::storage::{FileStore, KeyValueStore, RecordStore};
use crate::support::{SupportChat, SupportThreads};
use crate::user::UserSession;

/// Error assembling the client state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to build API client: {0}")]
    Api(#[from] ApiError),
}

/// The storefront client.
///
/// This struct is cheaply cloneable via `Arc`. Every manager it hands out
/// reads and writes the same key-value store, and the cart publishes on a
/// single [`CartEvents`] bus.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    store: RecordStore,
    cart: CartManager,
    user: UserSession,
    support: SupportThreads,
    api: ApiClient,
}

impl Storefront {
    /// Create a client persisting to the configured storage document.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let backend = Arc::new(FileStore::new(config.storage_path.clone()));
        Self::with_store(config, backend)
    }

    /// Create a client over an arbitrary key-value backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_store(
        config: StorefrontConfig,
        backend: Arc<dyn KeyValueStore>,
    ) -> Result<Self, StateError> {
        let store = RecordStore::new(backend);
        let api = ApiClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                cart: CartManager::new(store.clone(), CartEvents::new()),
                user: UserSession::new(store.clone()),
                support: SupportThreads::new(store.clone()),
                store,
                api,
                config,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the typed view of the underlying key-value store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.inner.store
    }

    #[must_use]
    pub fn cart(&self) -> &CartManager {
        &self.inner.cart
    }

    #[must_use]
    pub fn events(&self) -> &CartEvents {
        self.inner.cart.events()
    }

    #[must_use]
    pub fn user(&self) -> &UserSession {
        &self.inner.user
    }

    #[must_use]
    pub fn support(&self) -> &SupportThreads {
        &self.inner.support
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Build a support chat over this client's threads and API.
    #[must_use]
    pub fn support_chat(&self) -> SupportChat {
        SupportChat::new(self.inner.support.clone(), self.inner.api.clone())
    }

    /// Build a checkout flow over this client's cart, user, and API.
    #[must_use]
    pub fn checkout(&self) -> Checkout {
        Checkout::new(
            self.inner.cart.clone(),
            self.inner.user.clone(),
            self.inner.api.clone(),
        )
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
