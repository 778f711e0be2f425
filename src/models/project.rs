use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// État d'un render côté backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RenderStatus {
    Pending,    // En file d'attente
    Rendering,  // En cours de rendu
    Completed,  // Terminé avec succès
    Failed,     // Échec
}

impl RenderStatus {
    /// Un statut terminal ne sera plus rafraîchi par le polling
    pub fn is_terminal(&self) -> bool {
        matches!(self, RenderStatus::Completed | RenderStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::Pending => "pending",
            RenderStatus::Rendering => "rendering",
            RenderStatus::Completed => "completed",
            RenderStatus::Failed => "failed",
        }
    }
}

/// Un projet vidéo (copie transitoire du record backend)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub script: String,
    pub language: String,
    pub voice: String,
    pub template: String,
    pub created_at: DateTime<Utc>,
}

/// Un job de rendu attaché à un projet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Render {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub status: RenderStatus,

    /// Progression (0-100)
    pub progress: i32,

    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projet + historique de ses renders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub renders: Vec<Render>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(RenderStatus::Completed.is_terminal());
        assert!(RenderStatus::Failed.is_terminal());
        assert!(!RenderStatus::Pending.is_terminal());
        assert!(!RenderStatus::Rendering.is_terminal());
    }

    #[test]
    fn test_status_wire_format() {
        let status: RenderStatus = serde_json::from_str("\"rendering\"").unwrap();
        assert_eq!(status, RenderStatus::Rendering);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"rendering\"");
    }
}
