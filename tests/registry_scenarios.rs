//! End-to-end scenarios for the profile registry.
//!
//! These run entirely against in-process doubles: a recording credential
//! store and either in-memory or temp-file snapshots. The real OS keychain
//! is never touched.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use modelvault::{
    CredentialError, CredentialStore, JsonFileStore, MemorySnapshots, ModelRegistry, ProfileDraft,
    ProfileUpdate,
};

#[derive(Default)]
struct RecordingCredentials {
    calls: Mutex<Vec<String>>,
}

impl RecordingCredentials {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialStore for RecordingCredentials {
    async fn store_api_key(&self, provider: &str, api_key: &str) -> Result<(), CredentialError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("store:{provider}:{api_key}"));
        Ok(())
    }

    async fn delete_api_key(&self, provider: &str) -> Result<(), CredentialError> {
        self.calls.lock().unwrap().push(format!("delete:{provider}"));
        Ok(())
    }
}

#[tokio::test]
async fn add_then_clear_key_lifecycle() {
    let creds = Arc::new(RecordingCredentials::default());
    let mut registry =
        ModelRegistry::new(creds.clone(), Arc::new(MemorySnapshots::new())).unwrap();

    // Start: just the built-in default.
    assert_eq!(registry.profiles().len(), 1);
    assert_eq!(registry.active_id(), "default");

    // Add a custom profile with a key: one store call, profile active.
    registry
        .add_model(
            ProfileDraft::new("GPT", "openai")
                .id("gpt")
                .requires_api_key(true)
                .api_key("sk-123"),
        )
        .await
        .unwrap();

    assert_eq!(creds.calls(), vec!["store:openai:sk-123"]);
    assert_eq!(registry.profiles().len(), 2);
    assert_eq!(registry.active_id(), "gpt");
    let gpt = registry.get("gpt").unwrap();
    assert_eq!(gpt.name, "GPT");
    assert!(gpt.requires_api_key);
    assert!(gpt.is_custom);

    // Clear the key: one delete call, profile fields untouched.
    registry
        .update_model("gpt", ProfileUpdate::new().provider("openai").clear_api_key())
        .await
        .unwrap();

    assert_eq!(creds.calls(), vec!["store:openai:sk-123", "delete:openai"]);
    let gpt = registry.get("gpt").unwrap();
    assert_eq!(gpt.name, "GPT");
    assert_eq!(gpt.provider, "openai");
    assert!(gpt.requires_api_key);
}

#[tokio::test]
async fn return_to_default_discards_scratch_profile() {
    let creds = Arc::new(RecordingCredentials::default());
    let mut registry =
        ModelRegistry::new(creds.clone(), Arc::new(MemorySnapshots::new())).unwrap();

    registry
        .add_model(ProfileDraft::new("GPT", "openai").id("gpt").api_key("sk-123"))
        .await
        .unwrap();

    registry.set_active("default").await.unwrap();

    assert_eq!(creds.calls(), vec!["store:openai:sk-123", "delete:openai"]);
    let ids: Vec<_> = registry.profiles().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["default"]);
    assert_eq!(registry.active_id(), "default");
}

#[tokio::test]
async fn registry_survives_restart_via_json_snapshot() {
    let creds = Arc::new(RecordingCredentials::default());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.json");

    {
        let snapshots = Arc::new(JsonFileStore::at_path(&path));
        let mut registry = ModelRegistry::new(creds.clone(), snapshots).unwrap();
        registry
            .add_model(
                ProfileDraft::new("Claude", "anthropic")
                    .id("claude")
                    .requires_api_key(true)
                    .api_key("sk-ant-1"),
            )
            .await
            .unwrap();
    }

    // Snapshot on disk never contains the secret.
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("sk-ant-1"));
    assert!(raw.contains("claude"));

    // A new registry over the same file sees the committed state.
    let snapshots = Arc::new(JsonFileStore::at_path(&path));
    let registry = ModelRegistry::new(creds.clone(), snapshots).unwrap();
    assert_eq!(registry.profiles().len(), 2);
    assert_eq!(registry.active_id(), "claude");
    assert!(registry.get("claude").unwrap().is_custom);
}

#[tokio::test]
async fn removal_falls_back_to_first_remaining_profile() {
    let creds = Arc::new(RecordingCredentials::default());
    let mut registry =
        ModelRegistry::new(creds.clone(), Arc::new(MemorySnapshots::new())).unwrap();

    // Work with exactly two custom profiles.
    registry.remove_model("default").await.unwrap();
    registry
        .add_model(ProfileDraft::new("A", "openai").id("a"))
        .await
        .unwrap();
    registry
        .add_model(ProfileDraft::new("B", "anthropic").id("b"))
        .await
        .unwrap();
    registry.set_active("a").await.unwrap();

    registry.remove_model("a").await.unwrap();

    assert_eq!(registry.active_id(), "b");
    let ids: Vec<_> = registry.profiles().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);
}
