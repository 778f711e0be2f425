use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Modèle d'image proposé dans le studio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageModel {
    pub key: String,
    pub label: String,
    pub description: String,
    pub frontend_hint: String,
}

/// Une image générée (record backend)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    #[serde(default)]
    pub parent_image_id: Option<String>,
    pub model_key: String,
    pub prompt: String,
    pub aspect_ratio: String,
    pub resolution: String,
    #[serde(default)]
    pub reference_urls: Vec<String>,
    pub image_url: String,
    pub thumbnail_url: String,
    #[serde(default)]
    pub action_type: Option<String>,
    pub status: String,
    #[serde(default)]
    pub auto_tags: Vec<String>,
    #[serde(default)]
    pub user_tags: Vec<String>,
    #[serde(default)]
    pub applied_credits: i32,
    #[serde(default)]
    pub remaining_credits: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Image de la galerie d'inspiration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspirationImage {
    pub id: String,
    pub creator_name: String,
    pub model_key: String,
    pub title: String,
    pub prompt: String,
    pub image_url: String,
    pub aspect_ratio: String,
    pub resolution: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reference_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Résultat d'une action sur une image (détourage, upscale, variation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageActionResult {
    pub action_type: String,
    pub items: Vec<GeneratedImage>,
}

/// Actions supportées par le studio
pub const IMAGE_ACTIONS: [&str; 3] = ["remove_background", "upscale", "variation"];

/// Ratios d'aspect acceptés par le backend
pub const IMAGE_ASPECT_RATIOS: [&str; 4] = ["9:16", "1:1", "16:9", "4:5"];

/// Résolutions acceptées par le backend
pub const IMAGE_RESOLUTIONS: [&str; 3] = ["1024", "1536", "2048"];
