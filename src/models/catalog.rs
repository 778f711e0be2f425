use serde::{Deserialize, Serialize};

/// Avatar présentateur proposé dans le wizard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub id: String,
    pub name: String,
    pub scope: String,
    pub style: String,
    #[serde(default)]
    pub language_tags: Vec<String>,
    pub thumbnail_url: String,
}

/// Template de mise en page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub category: String,
    pub aspect_ratio: String,
    pub thumbnail_url: String,
}
