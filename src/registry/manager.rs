use std::sync::Arc;

use secrecy::ExposeSecret;

use super::models::{ModelProfile, ProfileDraft, ProfileUpdate, RegistryState, DEFAULT_PROVIDER};
use crate::credentials::CredentialStore;
use crate::error::{Error, Result};
use crate::persistence::SnapshotStore;

/// Registry of model profiles with one currently active profile.
///
/// Every mutating operation follows credential-before-commit: the credential
/// call (if the operation needs one) is awaited to completion before any
/// in-memory state changes, so a rejected credential call leaves the registry
/// exactly as it was. After each successful mutation the visible state is
/// handed to the snapshot store.
///
/// Operations take `&mut self`, so two operations can never interleave across
/// a credential await on the same registry. Callers that share a registry
/// wrap it in `tokio::sync::Mutex`.
pub struct ModelRegistry {
    state: RegistryState,
    credentials: Arc<dyn CredentialStore>,
    snapshots: Arc<dyn SnapshotStore>,
}

impl ModelRegistry {
    /// Create a registry seeded from a prior snapshot, or from the built-in
    /// default profile if no snapshot exists.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Result<Self> {
        let state = match snapshots.load()? {
            Some(state) => state,
            None => RegistryState::seeded(),
        };

        tracing::debug!("Initialized registry with {} profiles", state.profiles.len());

        Ok(Self {
            state,
            credentials,
            snapshots,
        })
    }

    /// The registry's current visible state.
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// All profiles, in registration order.
    pub fn profiles(&self) -> &[ModelProfile] {
        &self.state.profiles
    }

    /// Id of the active profile, or `""` when the registry is empty.
    pub fn active_id(&self) -> &str {
        &self.state.active_id
    }

    /// The active profile, if the active id names a stored profile.
    pub fn active_profile(&self) -> Option<&ModelProfile> {
        self.state.get(&self.state.active_id)
    }

    /// Look up a profile by id.
    pub fn get(&self, id: &str) -> Option<&ModelProfile> {
        self.state.get(id)
    }

    /// Add a profile and make it the active one.
    ///
    /// If the draft carries a non-empty API key and a provider, the key is
    /// stored with the credential service first; a rejected store aborts the
    /// operation with no state change. The stored profile never contains the
    /// secret and is always marked custom.
    pub async fn add_model(&mut self, draft: ProfileDraft) -> Result<ModelProfile> {
        if draft.id.is_empty() {
            return Err(Error::InvalidProfile(
                "profile id must not be empty".to_string(),
            ));
        }
        if self.state.get(&draft.id).is_some() {
            return Err(Error::DuplicateProfile(draft.id));
        }

        if let Some(key) = &draft.api_key {
            if !key.expose_secret().is_empty() && !draft.provider.is_empty() {
                self.credentials
                    .store_api_key(&draft.provider, key.expose_secret())
                    .await?;
            }
        }

        let profile = draft.into_profile();
        self.state.profiles.push(profile.clone());
        // Adding a profile always makes it the active one.
        self.state.active_id = profile.id.clone();
        self.snapshots.save(&self.state)?;

        tracing::info!("Added model profile: {} ({})", profile.name, profile.id);

        Ok(profile)
    }

    /// Merge a partial update into the profile matching `id`.
    ///
    /// When the update carries an `api_key` field and a provider, the
    /// credential is written (non-empty key) or deleted (empty key) before
    /// the merge; a rejected credential call aborts with no merge. A missing
    /// id is a silent no-op.
    pub async fn update_model(&mut self, id: &str, updates: ProfileUpdate) -> Result<()> {
        if let Some(key) = &updates.api_key {
            if let Some(provider) = updates.provider.as_deref().filter(|p| !p.is_empty()) {
                if key.expose_secret().is_empty() {
                    self.credentials.delete_api_key(provider).await?;
                } else {
                    self.credentials
                        .store_api_key(provider, key.expose_secret())
                        .await?;
                }
            }
        }

        if let Some(profile) = self.state.profiles.iter_mut().find(|p| p.id == id) {
            if let Some(name) = updates.name {
                profile.name = name;
            }
            if let Some(provider) = updates.provider {
                profile.provider = provider;
            }
            if let Some(requires) = updates.requires_api_key {
                profile.requires_api_key = requires;
            }
            tracing::info!("Updated model profile: {}", id);
        }

        self.snapshots.save(&self.state)?;

        Ok(())
    }

    /// Make the profile matching `id` the active one.
    ///
    /// Returning to the default provider discards the custom profile being
    /// left behind: its credential is deleted first, then the profile is
    /// removed from the registry. A rejected deletion aborts the switch.
    /// Switching to the profile that is already active never cascades.
    pub async fn set_active(&mut self, id: &str) -> Result<()> {
        let new = self
            .state
            .get(id)
            .ok_or_else(|| Error::ProfileNotFound(id.to_string()))?
            .clone();
        let previous = self.state.get(&self.state.active_id).cloned();

        if let Some(previous) = previous {
            if new.provider == DEFAULT_PROVIDER
                && previous.is_custom
                && !previous.provider.is_empty()
                && previous.id != new.id
            {
                self.credentials.delete_api_key(&previous.provider).await?;
                self.state.profiles.retain(|p| p.id != previous.id);
                tracing::info!(
                    "Discarded custom profile {} on return to default",
                    previous.id
                );
            }
        }

        self.state.active_id = id.to_string();
        self.snapshots.save(&self.state)?;

        tracing::info!("Switched active profile: {}", id);

        Ok(())
    }

    /// Remove the profile matching `id`.
    ///
    /// The profile's credential is deleted first; a rejected deletion aborts
    /// the removal. If the removed id was active, the first remaining profile
    /// becomes active, or `""` when none remain. A missing id removes nothing
    /// but still runs the active-id fallback.
    pub async fn remove_model(&mut self, id: &str) -> Result<()> {
        let target = self.state.get(id).cloned();

        if let Some(target) = &target {
            if !target.provider.is_empty() {
                self.credentials.delete_api_key(&target.provider).await?;
            }
        }

        self.state.profiles.retain(|p| p.id != id);

        // The fallback runs whether or not anything was removed; an active id
        // equal to a never-present id still gets reassigned.
        if self.state.active_id == id {
            self.state.active_id = self
                .state
                .profiles
                .first()
                .map(|p| p.id.clone())
                .unwrap_or_default();
        }

        self.snapshots.save(&self.state)?;

        if target.is_some() {
            tracing::info!("Removed model profile: {}", id);
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
