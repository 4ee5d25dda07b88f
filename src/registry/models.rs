use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id and provider namespace of the built-in credential-free profile.
pub const DEFAULT_PROFILE_ID: &str = "default";
pub const DEFAULT_PROVIDER: &str = "default";

/// A model profile as stored in the registry.
///
/// This type has no API-key field at all: secrets travel only inside
/// [`ProfileDraft`] / [`ProfileUpdate`] and are handed to the credential
/// store before the profile is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    pub id: String,
    pub name: String,

    /// Credential namespace for this profile. The literal `"default"` marks
    /// the built-in profile that never owns a credential.
    pub provider: String,

    /// Declared by the profile; the registry does not enforce it.
    pub requires_api_key: bool,

    /// True for every profile added at runtime.
    #[serde(default)]
    pub is_custom: bool,

    pub created_at: DateTime<Utc>,
}

impl ModelProfile {
    /// The built-in profile present at first start.
    pub fn builtin_default() -> Self {
        Self {
            id: DEFAULT_PROFILE_ID.to_string(),
            name: "Default".to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
            requires_api_key: false,
            is_custom: false,
            created_at: Utc::now(),
        }
    }

    /// Whether this profile uses the credential-free default provider.
    pub fn is_default_provider(&self) -> bool {
        self.provider == DEFAULT_PROVIDER
    }
}

/// Input to [`ModelRegistry::add_model`](crate::ModelRegistry::add_model).
///
/// The optional API key lives only in this transient value; `SecretString`
/// redacts it from `Debug` output and zeroizes it on drop.
#[derive(Debug)]
pub struct ProfileDraft {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub requires_api_key: bool,
    pub api_key: Option<SecretString>,
}

impl ProfileDraft {
    /// Create a draft with a generated UUID v4 id.
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            provider: provider.into(),
            requires_api_key: false,
            api_key: None,
        }
    }

    /// Override the generated id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn requires_api_key(mut self, requires: bool) -> Self {
        self.requires_api_key = requires;
        self
    }

    /// Attach an API key to store under the draft's provider namespace.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// The stored projection of this draft. The secret is dropped here.
    pub(crate) fn into_profile(self) -> ModelProfile {
        ModelProfile {
            id: self.id,
            name: self.name,
            provider: self.provider,
            requires_api_key: self.requires_api_key,
            is_custom: true,
            created_at: Utc::now(),
        }
    }
}

/// Partial update for [`ModelRegistry::update_model`](crate::ModelRegistry::update_model).
///
/// `None` fields are left unchanged. For `api_key` the *presence* of the
/// field is significant, not its content: a present non-empty key is stored,
/// a present empty key deletes the stored credential, an absent key touches
/// nothing.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub provider: Option<String>,
    pub requires_api_key: Option<bool>,
    pub api_key: Option<SecretString>,
}

impl ProfileUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn requires_api_key(mut self, requires: bool) -> Self {
        self.requires_api_key = Some(requires);
        self
    }

    /// Replace the credential stored under the update's provider namespace.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Mark the credential for deletion (the "present but empty" form).
    pub fn clear_api_key(mut self) -> Self {
        self.api_key = Some(SecretString::from(String::new()));
        self
    }
}

/// The registry's visible state: ordered profiles plus the active id.
///
/// This is exactly what the snapshot store persists; no secret ever appears
/// in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryState {
    pub profiles: Vec<ModelProfile>,

    /// Id of the active profile, or `""` when `profiles` is empty.
    pub active_id: String,
}

impl RegistryState {
    /// Fresh state seeded with the built-in default profile.
    pub fn seeded() -> Self {
        Self {
            profiles: vec![ModelProfile::builtin_default()],
            active_id: DEFAULT_PROFILE_ID.to_string(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ModelProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }
}
