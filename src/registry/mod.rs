pub mod manager;
pub mod models;

pub use manager::ModelRegistry;
pub use models::{ModelProfile, ProfileDraft, ProfileUpdate, RegistryState};
