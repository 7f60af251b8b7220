//! User session manager.
//!
//! Owns the single profile record. The record is either absent or present;
//! there is no way back to absent.

use cloudmart_core::UserProfile;
use rand::Rng;

use crate::storage::{RecordStore, Result, keys};

/// Owns the user profile in client storage.
#[derive(Debug, Clone)]
pub struct UserSession {
    store: RecordStore,
}

impl UserSession {
    /// Create a session over `store`.
    #[must_use]
    pub const fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Return the stored profile, creating an anonymous one first if needed.
    ///
    /// Calling this repeatedly returns the same profile each time.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    pub fn initialize(&self) -> Result<UserProfile> {
        self.initialize_with(|| rand::rng().random_range(0..UserProfile::SUFFIX_BOUND))
    }

    /// [`initialize`](Self::initialize) with a caller-supplied surname suffix source.
    ///
    /// `suffix` is only called when a new profile has to be created.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    pub fn initialize_with(&self, suffix: impl FnOnce() -> u16) -> Result<UserProfile> {
        if let Some(existing) = self.current()? {
            return Ok(existing);
        }

        let profile = UserProfile::anonymous(suffix());
        self.store.write(keys::USER, &profile)?;
        tracing::info!(last_name = %profile.last_name, "Created anonymous profile");
        Ok(profile)
    }

    /// The stored profile, if any. A corrupted record reads as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn current(&self) -> Result<Option<UserProfile>> {
        self.store.read_lenient(keys::USER)
    }

    /// Replace the stored profile with `profile` and return it.
    ///
    /// No field is validated or merged.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn update(&self, profile: UserProfile) -> Result<UserProfile> {
        self.store.write(keys::USER, &profile)?;
        Ok(profile)
    }
}
