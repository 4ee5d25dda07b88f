// Modules
pub mod credentials;
pub mod error;
pub mod persistence;
pub mod registry;
pub mod utils;

pub use credentials::{CredentialError, CredentialStore, KeychainStore};
pub use error::{Error, Result};
pub use persistence::{JsonFileStore, MemorySnapshots, SnapshotStore};
pub use registry::{ModelProfile, ModelRegistry, ProfileDraft, ProfileUpdate, RegistryState};
