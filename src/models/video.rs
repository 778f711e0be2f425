use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// État d'une vidéo générée par IA
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Draft,
    Processing,
    Completed,
    Failed,
}

impl VideoStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Completed | VideoStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Draft => "draft",
            VideoStatus::Processing => "processing",
            VideoStatus::Completed => "completed",
            VideoStatus::Failed => "failed",
        }
    }
}

/// Une vidéo IA (record backend, affiché sur le dashboard et la page détail)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub script: String,
    pub voice: String,
    pub aspect_ratio: String,
    pub resolution: String,
    pub duration_mode: String,
    pub duration_seconds: Option<i32>,
    pub captions_enabled: bool,
    pub status: VideoStatus,
    pub progress: i32,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub selected_model: Option<String>,
    #[serde(default)]
    pub reference_images: Vec<String>,
    pub music_mode: String,
    pub music_track_id: Option<String>,
    pub music_file_url: Option<String>,
    pub music_volume: i32,
    pub duck_music: bool,
    pub thumbnail_url: Option<String>,
    pub output_url: Option<String>,
    pub error_message: Option<String>,
    #[serde(default)]
    pub auto_tags: Vec<String>,
    #[serde(default)]
    pub user_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Piste musicale proposée dans le wizard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub duration_sec: Option<i32>,
    pub preview_url: String,
}

/// Script de reel généré par IA
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelScript {
    pub hook: String,
    pub body_lines: Vec<String>,
    pub cta: String,
    pub caption: String,
    pub hashtags: Vec<String>,
}
