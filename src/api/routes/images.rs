// api/routes/images.rs
//
// Studio d'images: galerie des générations, formulaire de génération avec
// estimation de modèle, actions (détourage, upscale, variation) et galerie
// d'inspiration.
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::api::ui;
use crate::core::{SessionDisplay, SessionUser};
use crate::models::{GeneratedImage, IMAGE_ACTIONS, IMAGE_ASPECT_RATIOS, IMAGE_RESOLUTIONS};
use crate::services::{BackendClient, GenerateImagePayload};
use crate::utils::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct StudioQuery {
    pub error: Option<String>,
}

fn image_card(image: &GeneratedImage) -> String {
    let actions: String = IMAGE_ACTIONS
        .iter()
        .map(|action| {
            format!(
                "<form method=\"post\" action=\"/images/{id}/action\">\
<input type=\"hidden\" name=\"action_type\" value=\"{action}\">\
<button class=\"ghost\" type=\"submit\">{label}</button></form>",
                id = ui::escape(&image.id),
                action = action,
                label = action.replace('_', " "),
            )
        })
        .collect();

    format!(
        "<article class=\"card image-card\">\
<img src=\"{thumb}\" alt=\"\" loading=\"lazy\">\
<p class=\"prompt\">{prompt}</p>\
<p class=\"muted\">{model} · {ratio} · {resolution}</p>\
<div class=\"actions\">{actions}</div></article>",
        thumb = ui::escape(&image.thumbnail_url),
        prompt = ui::escape(&image.prompt),
        model = ui::escape(&image.model_key),
        ratio = ui::escape(&image.aspect_ratio),
        resolution = ui::escape(&image.resolution),
        actions = actions,
    )
}

#[get("/images")]
pub async fn studio_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    query: web::Query<StudioQuery>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let display = SessionDisplay::from_request(&req);

    // Chaque bloc de la page dégrade indépendamment
    let models = backend
        .list_image_models(&session.user_id)
        .await
        .unwrap_or_default();
    let images = backend
        .list_generated_images(&session.user_id)
        .await
        .unwrap_or_default();
    let inspiration = backend
        .list_image_inspiration(&session.user_id)
        .await
        .unwrap_or_default();

    let model_options: String = models
        .iter()
        .map(|model| {
            format!(
                "<option value=\"{}\" title=\"{}\">{}</option>",
                ui::escape(&model.key),
                ui::escape(&model.description),
                ui::escape(&model.label),
            )
        })
        .collect();
    let ratio_options: String = IMAGE_ASPECT_RATIOS
        .iter()
        .map(|ratio| format!("<option value=\"{ratio}\">{ratio}</option>"))
        .collect();
    let resolution_options: String = IMAGE_RESOLUTIONS
        .iter()
        .map(|resolution| format!("<option value=\"{resolution}\">{resolution}px</option>"))
        .collect();

    let gallery: String = if images.is_empty() {
        "<p class=\"empty-state\">Nothing generated yet. Describe an image above.</p>".to_string()
    } else {
        images.iter().map(image_card).collect()
    };

    let inspiration_html: String = inspiration
        .iter()
        .map(|item| {
            format!(
                "<article class=\"card image-card\">\
<img src=\"{}\" alt=\"\" loading=\"lazy\">\
<p class=\"prompt\">{}</p><p class=\"muted\">by {}</p></article>",
                ui::escape(&item.image_url),
                ui::escape(&item.title),
                ui::escape(&item.creator_name),
            )
        })
        .collect();

    let body = format!(
        "<div class=\"page-head\"><h1>Image Studio</h1></div>{error}\
<section class=\"card form-card\">\
<form id=\"generate\" method=\"post\" action=\"/images/generate\">\
<label for=\"prompt\">Prompt</label>\
<textarea id=\"prompt\" name=\"prompt\" rows=\"3\" \
placeholder=\"A festive Diwali storefront, cinematic light\"></textarea>\
<button type=\"button\" class=\"ghost\" data-enhance-url=\"/api/images/prompt-enhance\">\
Enhance prompt</button>\
<div class=\"form-row\">\
<select name=\"model_key\">{models}</select>\
<select name=\"aspect_ratio\">{ratios}</select>\
<select name=\"resolution\">{resolutions}</select>\
</div>\
<button type=\"submit\">Generate image</button></form></section>\
<section><h2>Your images</h2><div class=\"grid\">{gallery}</div></section>\
<section><h2>Inspiration</h2><div class=\"grid\">{inspiration}</div></section>",
        error = ui::error_banner(query.error.as_deref()),
        models = model_options,
        ratios = ratio_options,
        resolutions = resolution_options,
        gallery = gallery,
        inspiration = inspiration_html,
    );

    ui::app_page(
        "Image Studio",
        "/images",
        &display,
        &["/static/js/studio.js"],
        &body,
    )
}

fn validate_aspect_ratio(value: &str) -> std::result::Result<(), validator::ValidationError> {
    if IMAGE_ASPECT_RATIOS.contains(&value) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("aspect_ratio");
        err.message = Some("Unsupported aspect ratio".into());
        Err(err)
    }
}

fn validate_resolution(value: &str) -> std::result::Result<(), validator::ValidationError> {
    if IMAGE_RESOLUTIONS.contains(&value) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("resolution");
        err.message = Some("Unsupported resolution".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateForm {
    #[validate(length(min = 1, message = "Pick a model"))]
    pub model_key: String,
    #[validate(length(min = 3, max = 2000, message = "Prompt must be 3 to 2000 characters"))]
    pub prompt: String,
    #[validate(custom = "validate_aspect_ratio")]
    pub aspect_ratio: String,
    #[validate(custom = "validate_resolution")]
    pub resolution: String,
    /// URLs de référence, séparées par des retours ligne
    pub reference_urls: Option<String>,
}

#[post("/images/generate")]
pub async fn generate_image(
    session: Option<SessionUser>,
    form: web::Form<GenerateForm>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    if let Err(errors) = form.validate() {
        return ui::redirect_with_error("/images", &AppError::from(errors).display_message());
    }

    let reference_urls: Vec<String> = form
        .reference_urls
        .as_deref()
        .unwrap_or("")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let payload = GenerateImagePayload {
        model_key: form.model_key.clone(),
        prompt: form.prompt.trim().to_string(),
        aspect_ratio: form.aspect_ratio.clone(),
        resolution: form.resolution.clone(),
        reference_urls,
    };

    match backend.generate_image(&payload, &session.user_id).await {
        Ok(_) => ui::redirect("/images"),
        Err(err) => ui::redirect_with_error("/images", &err.display_message()),
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionForm {
    pub action_type: String,
}

#[post("/images/{image_id}/action")]
pub async fn apply_action(
    session: Option<SessionUser>,
    path: web::Path<String>,
    form: web::Form<ActionForm>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    if !IMAGE_ACTIONS.contains(&form.action_type.as_str()) {
        return ui::redirect_with_error("/images", "Unsupported action");
    }

    match backend
        .apply_image_action(&path.into_inner(), &form.action_type, &session.user_id)
        .await
    {
        Ok(_) => ui::redirect("/images"),
        Err(err) => ui::redirect_with_error("/images", &err.display_message()),
    }
}

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub prompt: String,
    pub model_key: Option<String>,
}

/// Amélioration du prompt, appelée en fetch par studio.js
#[post("/api/images/prompt-enhance")]
pub async fn enhance_prompt(
    session: SessionUser,
    payload: web::Json<EnhanceRequest>,
    backend: web::Data<BackendClient>,
) -> Result<HttpResponse> {
    if payload.prompt.trim().len() < 3 {
        return Err(AppError::Validation(
            "Prompt must be at least 3 characters".to_string(),
        ));
    }
    let enhanced = backend
        .enhance_image_prompt(
            payload.prompt.trim(),
            payload.model_key.as_deref(),
            &session.user_id,
        )
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "prompt": enhanced })))
}
