// Modèle: project.rs
pub mod project;
pub use project::{Project, ProjectDetail, Render, RenderStatus};

// Modèle: video.rs
pub mod video;
pub use video::{MusicTrack, ReelScript, Video, VideoStatus};

// Modèle: catalog.rs
pub mod catalog;
pub use catalog::{Avatar, Template};

// Modèle: image.rs
pub mod image;
pub use image::{
    GeneratedImage, ImageActionResult, ImageModel, InspirationImage, IMAGE_ACTIONS,
    IMAGE_ASPECT_RATIOS, IMAGE_RESOLUTIONS,
};

// Modèle: user.rs
pub mod user;
pub use user::{UserProfile, UserSettings};

// Modèle: credit.rs
pub mod credit;
pub use credit::{
    CreditEstimate, CreditHistory, CreditHistoryItem, CreditWallet, EstimateBreakdownItem,
};

// Modèle: draft.rs
pub mod draft;
pub use draft::{CreateDraft, CreationType, DraftAsset, CREATE_FLOW_STEPS, DRAFT_ASSET_KINDS};
