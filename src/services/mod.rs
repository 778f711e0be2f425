// services/mod.rs
pub mod backend;

// Ré-exports pour faciliter l'import
pub use backend::{
    BackendClient, CatalogFilter, GenerateImagePayload, NewProjectPayload, ProfilePatch,
    ProjectPatch, ReelScriptPayload, SettingsPatch, SignedUpload, UploadDeleted, VideoAccepted,
    USER_ID_HEADER,
};
