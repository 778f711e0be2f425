// src/lib.rs
// Modules principaux
pub mod api;
pub mod core;
pub mod models;
pub mod services;
pub mod utils;

// Ré-exports pour faciliter l'utilisation
pub use services::BackendClient;
pub use utils::{AppError, Config, Result};

// Version de l'application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "VidyoBharat Web";
