// services/backend.rs
//
// Client HTTP vers l'API backend VidyoBharat. Toute la logique métier
// (scripts, TTS, rendu IA, stockage, crédits) vit là-bas ; ce client ne fait
// qu'ajouter les en-têtes, sérialiser le JSON et remonter les erreurs.
use crate::models::{
    Avatar, CreditEstimate, CreditHistory, CreditWallet, GeneratedImage, ImageActionResult,
    ImageModel, InspirationImage, MusicTrack, Project, ProjectDetail, ReelScript, Render,
    Template, UserProfile, UserSettings, Video,
};
use crate::utils::error::{AppError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// En-tête d'identification dérivé du cookie de session
pub const USER_ID_HEADER: &str = "X-User-ID";

#[derive(Debug, Clone)]
pub struct BackendClient {
    http_client: Arc<HttpClient>,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Self {
        let http_client = Arc::new(
            HttpClient::builder()
                .timeout(Duration::from_secs(timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
        );

        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, user_id: Option<&str>) -> RequestBuilder {
        let mut builder = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path))
            .header(CONTENT_TYPE, "application/json");
        if let Some(user_id) = user_id {
            builder = builder.header(USER_ID_HEADER, user_id);
        }
        builder
    }

    /// Envoie la requête et désérialise la réponse.
    /// Un statut non-2xx devient `UpstreamStatus` avec le corps brut,
    /// c'est aux handlers d'en faire un message affichable.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }
        response.json::<T>().await.map_err(AppError::from)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, user_id: Option<&str>) -> Result<T> {
        self.execute(self.request(Method::GET, path, user_id)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        user_id: Option<&str>,
    ) -> Result<T> {
        self.execute(self.request(Method::POST, path, user_id).json(body))
            .await
    }

    async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        user_id: Option<&str>,
    ) -> Result<T> {
        self.execute(self.request(Method::PATCH, path, user_id).json(body))
            .await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        user_id: Option<&str>,
    ) -> Result<T> {
        self.execute(self.request(Method::PUT, path, user_id).json(body))
            .await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str, user_id: Option<&str>) -> Result<T> {
        self.execute(self.request(Method::DELETE, path, user_id))
            .await
    }

    /// Récupère une ressource brute (corps streamé), pour le proxy de
    /// téléchargement. L'URL doit déjà avoir passé la validation d'origine.
    pub async fn fetch_raw(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.http_client.get(url).send().await?;
        Ok(response)
    }

    // ------------------------------------------------------------------
    // Authentification (mock)
    // ------------------------------------------------------------------

    pub async fn mock_login(&self, email: Option<&str>) -> Result<String> {
        let response: MockAuthResponse = self
            .post("/auth/mock-login", &serde_json::json!({ "email": email }), None)
            .await?;
        Ok(response.user_id)
    }

    pub async fn mock_signup(&self, email: &str) -> Result<String> {
        let response: MockAuthResponse = self
            .post("/auth/mock-signup", &serde_json::json!({ "email": email }), None)
            .await?;
        Ok(response.user_id)
    }

    // ------------------------------------------------------------------
    // Catalogues (avatars, templates, musiques)
    // ------------------------------------------------------------------

    pub async fn list_avatars(&self, user_id: &str, filter: &CatalogFilter) -> Result<Vec<Avatar>> {
        let builder = self
            .request(Method::GET, "/avatars", Some(user_id))
            .query(&filter.as_query());
        self.execute(builder).await
    }

    pub async fn list_templates(
        &self,
        user_id: &str,
        filter: &CatalogFilter,
    ) -> Result<Vec<Template>> {
        let builder = self
            .request(Method::GET, "/templates", Some(user_id))
            .query(&filter.as_query());
        self.execute(builder).await
    }

    pub async fn list_music_tracks(&self) -> Result<Vec<MusicTrack>> {
        self.get("/music-tracks", None).await
    }

    // ------------------------------------------------------------------
    // Projets et renders
    // ------------------------------------------------------------------

    pub async fn create_project(
        &self,
        user_id: &str,
        payload: &NewProjectPayload,
    ) -> Result<Project> {
        let body = serde_json::json!({
            "user_id": user_id,
            "title": payload.title,
            "script": payload.script,
            "language": payload.language,
            "voice": payload.voice,
            "template": payload.template,
        });
        self.post("/projects", &body, Some(user_id)).await
    }

    pub async fn list_projects(&self, user_id: &str) -> Result<Vec<Project>> {
        self.get("/projects", Some(user_id)).await
    }

    pub async fn get_project(&self, project_id: &str, user_id: &str) -> Result<ProjectDetail> {
        self.get(&format!("/projects/{}", project_id), Some(user_id))
            .await
    }

    pub async fn update_project(
        &self,
        project_id: &str,
        patch: &ProjectPatch,
        user_id: &str,
    ) -> Result<Project> {
        self.patch(&format!("/projects/{}", project_id), patch, Some(user_id))
            .await
    }

    pub async fn add_project_asset(
        &self,
        project_id: &str,
        filename: &str,
        kind: &str,
        user_id: &str,
    ) -> Result<serde_json::Value> {
        let payload = serde_json::json!({ "filename": filename, "kind": kind });
        self.post(
            &format!("/projects/{}/assets", project_id),
            &payload,
            Some(user_id),
        )
        .await
    }

    pub async fn create_render(
        &self,
        project_id: &str,
        user_id: &str,
        include_broll: bool,
    ) -> Result<Render> {
        let payload = serde_json::json!({
            "project_id": project_id,
            "user_id": user_id,
            "include_broll": include_broll,
        });
        self.post("/renders", &payload, Some(user_id)).await
    }

    pub async fn get_render(&self, render_id: &str, user_id: &str) -> Result<Render> {
        self.get(&format!("/renders/{}", render_id), Some(user_id))
            .await
    }

    // ------------------------------------------------------------------
    // Uploads (signés par le backend, jamais stockés ici)
    // ------------------------------------------------------------------

    pub async fn sign_upload(
        &self,
        user_id: &str,
        project_id: Option<&str>,
        filename: &str,
        kind: &str,
    ) -> Result<SignedUpload> {
        let payload = serde_json::json!({
            "user_id": user_id,
            "project_id": project_id,
            "filename": filename,
            "kind": kind,
        });
        self.post("/uploads/sign", &payload, Some(user_id)).await
    }

    pub async fn delete_upload(&self, asset_id: &str, user_id: &str) -> Result<UploadDeleted> {
        self.delete(&format!("/uploads/{}", asset_id), Some(user_id))
            .await
    }

    // ------------------------------------------------------------------
    // Vidéos IA
    // ------------------------------------------------------------------

    pub async fn list_videos(&self, user_id: &str) -> Result<Vec<Video>> {
        self.get("/videos", Some(user_id)).await
    }

    pub async fn get_video(&self, video_id: &str, user_id: &str) -> Result<Video> {
        self.get(&format!("/videos/{}", video_id), Some(user_id))
            .await
    }

    pub async fn retry_video(&self, video_id: &str, user_id: &str) -> Result<VideoAccepted> {
        self.post(
            &format!("/videos/{}/retry", video_id),
            &serde_json::json!({}),
            Some(user_id),
        )
        .await
    }

    pub async fn generate_reel_script(
        &self,
        payload: &ReelScriptPayload,
        user_id: &str,
    ) -> Result<ReelScript> {
        self.post("/ai/reel-script", payload, Some(user_id)).await
    }

    // ------------------------------------------------------------------
    // Studio d'images
    // ------------------------------------------------------------------

    pub async fn list_image_models(&self, user_id: &str) -> Result<Vec<ImageModel>> {
        self.get("/ai/image/models", Some(user_id)).await
    }

    pub async fn list_generated_images(&self, user_id: &str) -> Result<Vec<GeneratedImage>> {
        self.get("/ai/images", Some(user_id)).await
    }

    pub async fn list_image_inspiration(&self, user_id: &str) -> Result<Vec<InspirationImage>> {
        self.get("/ai/images/inspiration", Some(user_id)).await
    }

    pub async fn generate_image(
        &self,
        payload: &GenerateImagePayload,
        user_id: &str,
    ) -> Result<GeneratedImage> {
        self.post("/ai/image/generate", payload, Some(user_id)).await
    }

    pub async fn enhance_image_prompt(
        &self,
        prompt: &str,
        model_key: Option<&str>,
        user_id: &str,
    ) -> Result<String> {
        let payload = serde_json::json!({ "prompt": prompt, "model_key": model_key });
        let response: PromptEnhanced = self
            .post("/ai/image/prompt-enhance", &payload, Some(user_id))
            .await?;
        Ok(response.prompt)
    }

    pub async fn apply_image_action(
        &self,
        image_id: &str,
        action_type: &str,
        user_id: &str,
    ) -> Result<ImageActionResult> {
        let payload = serde_json::json!({ "image_id": image_id, "action_type": action_type });
        self.post("/ai/images/action", &payload, Some(user_id)).await
    }

    // ------------------------------------------------------------------
    // Crédits
    // ------------------------------------------------------------------

    pub async fn get_wallet(&self, user_id: &str) -> Result<CreditWallet> {
        self.get("/credits/wallet", Some(user_id)).await
    }

    pub async fn get_credit_history(&self, user_id: &str) -> Result<CreditHistory> {
        self.get("/credits/history", Some(user_id)).await
    }

    pub async fn estimate_credits(
        &self,
        action: &str,
        payload: &serde_json::Value,
        user_id: &str,
    ) -> Result<CreditEstimate> {
        let body = serde_json::json!({ "action": action, "payload": payload });
        self.post("/credits/estimate", &body, Some(user_id)).await
    }

    // ------------------------------------------------------------------
    // Compte
    // ------------------------------------------------------------------

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile> {
        self.get("/users/me/profile", Some(user_id)).await
    }

    pub async fn update_profile(
        &self,
        patch: &ProfilePatch,
        user_id: &str,
    ) -> Result<UserProfile> {
        self.put("/users/me/profile", patch, Some(user_id)).await
    }

    pub async fn get_settings(&self, user_id: &str) -> Result<UserSettings> {
        self.get("/users/me/settings", Some(user_id)).await
    }

    pub async fn update_settings(
        &self,
        patch: &SettingsPatch,
        user_id: &str,
    ) -> Result<UserSettings> {
        self.put("/users/me/settings", patch, Some(user_id)).await
    }
}

// ----------------------------------------------------------------------
// Payloads et réponses intermédiaires
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MockAuthResponse {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct PromptEnhanced {
    prompt: String,
}

/// Filtres communs aux catalogues (tous optionnels)
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub search: Option<String>,
    pub scope: Option<String>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub aspect_ratio: Option<String>,
}

impl CatalogFilter {
    fn as_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(scope) = self.scope.as_deref().filter(|s| !s.is_empty()) {
            query.push(("scope", scope.to_string()));
        }
        if let Some(language) = self.language.as_deref().filter(|s| !s.is_empty()) {
            query.push(("language", language.to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|s| !s.is_empty()) {
            query.push(("category", category.to_string()));
        }
        if let Some(aspect_ratio) = self.aspect_ratio.as_deref().filter(|s| !s.is_empty()) {
            query.push(("aspect_ratio", aspect_ratio.to_string()));
        }
        query
    }
}

/// Payload de création d'un projet
#[derive(Debug, Clone, Serialize)]
pub struct NewProjectPayload {
    pub title: String,
    pub script: String,
    pub language: String,
    pub voice: String,
    pub template: String,
}

/// Mise à jour partielle d'un projet (autosave de l'éditeur)
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignedUpload {
    pub asset_id: String,
    pub upload_url: String,
    pub public_url: String,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadDeleted {
    pub asset_id: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoAccepted {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReelScriptPayload {
    #[serde(rename = "templateId")]
    pub template_id: String,
    pub topic: String,
    pub tone: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateImagePayload {
    pub model_key: String,
    pub prompt: String,
    pub aspect_ratio: String,
    pub resolution: String,
    pub reference_urls: Vec<String>,
}

/// Mise à jour du profil (PUT complet côté backend)
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_aspect_ratio: Option<String>,
    pub email_notifications: bool,
    pub marketing_emails: bool,
    pub auto_caption_default: bool,
    pub music_ducking_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RenderStatus;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(&server.uri(), 5)
    }

    #[tokio::test]
    async fn test_user_id_header_is_injected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(header(USER_ID_HEADER, "user-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let projects = client_for(&server).list_projects("user-42").await.unwrap();
        assert!(projects.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_filter_builds_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/avatars"))
            .and(query_param("search", "news"))
            .and(query_param("language", "hi-IN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": "av1",
                "name": "Aarav",
                "scope": "public",
                "style": "news",
                "language_tags": ["hi-IN"],
                "thumbnail_url": "https://cdn.example/av1.png"
            }])))
            .mount(&server)
            .await;

        let filter = CatalogFilter {
            search: Some("news".to_string()),
            language: Some("hi-IN".to_string()),
            ..CatalogFilter::default()
        };
        let avatars = client_for(&server)
            .list_avatars("user-1", &filter)
            .await
            .unwrap();
        assert_eq!(avatars.len(), 1);
        assert_eq!(avatars[0].name, "Aarav");
    }

    #[tokio::test]
    async fn test_non_2xx_becomes_upstream_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/mock-login"))
            .respond_with(ResponseTemplate::new(404).set_body_string("User not found"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .mock_login(Some("ghost@example.com"))
            .await
            .unwrap_err();
        match err {
            crate::utils::error::AppError::UpstreamStatus { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "User not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_project_patch_skips_unset_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/projects/p1"))
            .and(body_json(serde_json::json!({ "script": "updated" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "p1",
                "user_id": "u1",
                "title": "Demo",
                "script": "updated",
                "language": "hi-IN",
                "voice": "Aarav",
                "template": "clean-corporate",
                "created_at": "2025-11-02T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let patch = ProjectPatch {
            script: Some("updated".to_string()),
            ..ProjectPatch::default()
        };
        let project = client_for(&server)
            .update_project("p1", &patch, "u1")
            .await
            .unwrap();
        assert_eq!(project.script, "updated");
    }

    #[tokio::test]
    async fn test_get_render_parses_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/renders/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "r1",
                "project_id": "p1",
                "user_id": "u1",
                "status": "rendering",
                "progress": 55,
                "video_url": null,
                "thumbnail_url": null,
                "error_message": null,
                "created_at": "2025-11-02T10:00:00Z",
                "updated_at": "2025-11-02T10:00:30Z"
            })))
            .mount(&server)
            .await;

        let render = client_for(&server).get_render("r1", "u1").await.unwrap();
        assert_eq!(render.status, RenderStatus::Rendering);
        assert_eq!(render.progress, 55);
    }

    #[tokio::test]
    async fn test_sign_and_delete_upload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/uploads/sign"))
            .and(body_json(serde_json::json!({
                "user_id": "u1",
                "project_id": "p1",
                "filename": "logo.png",
                "kind": "logo"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "asset_id": "as-1",
                "upload_url": "/uploads/put/as-1",
                "public_url": "https://cdn.example/as-1.png"
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/uploads/as-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "asset_id": "as-1",
                "deleted": true
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let signed = client
            .sign_upload("u1", Some("p1"), "logo.png", "logo")
            .await
            .unwrap();
        assert_eq!(signed.asset_id, "as-1");
        assert!(signed.method.is_none());

        let deleted = client.delete_upload("as-1", "u1").await.unwrap();
        assert!(deleted.deleted);
    }

    #[tokio::test]
    async fn test_estimate_credits_wraps_action_and_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/credits/estimate"))
            .and(body_json(serde_json::json!({
                "action": "video_create",
                "payload": { "model": "sora2", "resolution": "1080p", "durationSeconds": 30 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "estimatedCredits": 18,
                "breakdown": [],
                "currentCredits": 120,
                "remainingCredits": 102,
                "sufficient": true,
                "premium": false
            })))
            .mount(&server)
            .await;

        let estimate = client_for(&server)
            .estimate_credits(
                "video_create",
                &serde_json::json!({
                    "model": "sora2",
                    "resolution": "1080p",
                    "durationSeconds": 30
                }),
                "u1",
            )
            .await
            .unwrap();
        assert_eq!(estimate.estimated_credits, 18);
        assert!(estimate.sufficient);
    }

    #[tokio::test]
    async fn test_connection_error_becomes_upstream() {
        // Port fermé: l'erreur réseau ne doit pas paniquer
        let client = BackendClient::new("http://127.0.0.1:1", 1);
        let err = client.list_projects("u1").await.unwrap_err();
        assert!(matches!(err, crate::utils::error::AppError::Upstream(_)));
    }
}
