use serde::{Deserialize, Serialize};

/// Base de création choisie à la première étape du wizard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CreationType {
    Avatar,
    Template,
    ScriptOnly,
}

impl CreationType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "avatar" => Some(CreationType::Avatar),
            "template" => Some(CreationType::Template),
            "script-only" => Some(CreationType::ScriptOnly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CreationType::Avatar => "avatar",
            CreationType::Template => "template",
            CreationType::ScriptOnly => "script-only",
        }
    }
}

/// Asset attaché au brouillon (logo, fond, image libre)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftAsset {
    pub id: String,
    pub filename: String,
    pub kind: String,
}

pub const DRAFT_ASSET_KINDS: [&str; 3] = ["logo", "background", "image"];

/// Brouillon du wizard de création.
///
/// Vit uniquement côté client (cookie JSON) et n'est envoyé au backend qu'à
/// la confirmation finale. Chaque champ absent du cookie retombe sur sa
/// valeur par défaut, un cookie illisible redonne un brouillon vierge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateDraft {
    #[serde(default)]
    pub creation_type: Option<CreationType>,
    #[serde(default)]
    pub avatar_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub script: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_music")]
    pub music: String,
    #[serde(default = "default_sfx")]
    pub sfx: String,
    #[serde(default = "default_captions")]
    pub captions_enabled: bool,
    #[serde(default = "default_caption_style")]
    pub caption_style: String,
    #[serde(default)]
    pub assets: Vec<DraftAsset>,
}

fn default_language() -> String {
    "hi-IN".to_string()
}

fn default_voice() -> String {
    "Aarav".to_string()
}

fn default_music() -> String {
    "inspirational".to_string()
}

fn default_sfx() -> String {
    "subtle".to_string()
}

fn default_captions() -> bool {
    true
}

fn default_caption_style() -> String {
    "clean".to_string()
}

impl Default for CreateDraft {
    fn default() -> Self {
        Self {
            creation_type: None,
            avatar_id: None,
            template_id: None,
            script: String::new(),
            language: default_language(),
            voice: default_voice(),
            music: default_music(),
            sfx: default_sfx(),
            captions_enabled: default_captions(),
            caption_style: default_caption_style(),
            assets: Vec::new(),
        }
    }
}

impl CreateDraft {
    /// Ajoute un asset au brouillon
    pub fn add_asset(&mut self, asset: DraftAsset) {
        self.assets.push(asset);
    }

    /// Retire un asset par id
    pub fn remove_asset(&mut self, asset_id: &str) {
        self.assets.retain(|item| item.id != asset_id);
    }

    /// Le brouillon est-il prêt pour la confirmation ?
    pub fn is_submittable(&self) -> bool {
        self.creation_type.is_some() && !self.script.trim().is_empty()
    }

    /// Identifiant du template à envoyer au backend à la soumission.
    /// Faute de sélection, on retombe sur le premier template du catalogue.
    pub fn template_for_submission(&self) -> &str {
        self.template_id.as_deref().unwrap_or("clean-corporate")
    }
}

/// Étapes du wizard, dans l'ordre
pub const CREATE_FLOW_STEPS: [(&str, &str, &str); 5] = [
    ("choose", "Choose Base", "/create/choose"),
    ("select", "Select Avatar/Template", "/create/avatar"),
    ("script", "Script & Voice", "/create/script"),
    ("customize", "Customize", "/create/customize"),
    ("confirm", "Review & Confirm", "/create/confirm"),
];
