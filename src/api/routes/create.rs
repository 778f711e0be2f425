// api/routes/create.rs
//
// Wizard de création en cinq étapes. L'état (brouillon) vit dans un cookie
// client et n'atteint le backend qu'à la confirmation: création du projet
// puis lancement du premier render.
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::ui;
use crate::core::{draft, estimate_credits, SessionDisplay, SessionUser};
use crate::models::{CreateDraft, CreationType, DraftAsset, CREATE_FLOW_STEPS, DRAFT_ASSET_KINDS};
use crate::services::{BackendClient, CatalogFilter, NewProjectPayload, ReelScriptPayload};
use crate::utils::config::Config;

#[derive(Debug, Deserialize)]
pub struct StepQuery {
    pub error: Option<String>,
    pub search: Option<String>,
}

fn steps_nav(active: &str) -> String {
    let items: String = CREATE_FLOW_STEPS
        .iter()
        .map(|(key, label, href)| {
            let class = if *key == active { " class=\"active\"" } else { "" };
            format!("<a href=\"{}\"{}>{}</a>", href, class, label)
        })
        .collect();
    format!("<nav class=\"steps\">{}</nav>", items)
}

/// Redirige en embarquant le brouillon mis à jour
fn redirect_with_draft(location: &str, updated: &CreateDraft, secure: bool) -> HttpResponse {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location.to_string()));
    builder.cookie(draft::draft_cookie(updated, secure));
    builder.finish()
}

fn wizard_page(
    req: &HttpRequest,
    title: &str,
    active_step: &str,
    error: Option<&str>,
    content: String,
) -> HttpResponse {
    let display = SessionDisplay::from_request(req);
    let body = format!(
        "<div class=\"page-head\"><h1>Create a video</h1></div>{}{}{}",
        steps_nav(active_step),
        ui::error_banner(error),
        content
    );
    ui::app_page(title, "/create", &display, &[], &body)
}

// ----------------------------------------------------------------------
// Étape 0: entrée du wizard
// ----------------------------------------------------------------------

#[get("/create")]
pub async fn create_entry(session: Option<SessionUser>) -> HttpResponse {
    if session.is_none() {
        return ui::redirect("/login");
    }
    ui::redirect("/create/choose")
}

// ----------------------------------------------------------------------
// Étape 1: choisir la base
// ----------------------------------------------------------------------

#[get("/create/choose")]
pub async fn choose_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    query: web::Query<StepQuery>,
) -> HttpResponse {
    if session.is_none() {
        return ui::redirect("/login");
    }
    let current = draft::read_draft(&req);

    let card = |kind: CreationType, title: &str, description: &str| {
        let selected = if current.creation_type == Some(kind) {
            " selected"
        } else {
            ""
        };
        format!(
            "<form method=\"post\" action=\"/create/choose\">\
<input type=\"hidden\" name=\"creation_type\" value=\"{}\">\
<button class=\"choice-card{}\" type=\"submit\"><h3>{}</h3><p>{}</p></button></form>",
            kind.as_str(),
            selected,
            ui::escape(title),
            ui::escape(description)
        )
    };

    let content = format!(
        "<div class=\"choice-grid\">{}{}{}</div>",
        card(
            CreationType::Avatar,
            "Avatar presenter",
            "A lifelike presenter reads your script on camera."
        ),
        card(
            CreationType::Template,
            "Template",
            "Motion layouts for promos, lessons and reels."
        ),
        card(
            CreationType::ScriptOnly,
            "Script only",
            "Voice-over with b-roll, no presenter."
        ),
    );
    wizard_page(&req, "Choose Base", "choose", query.error.as_deref(), content)
}

#[derive(Debug, Deserialize)]
pub struct ChooseForm {
    pub creation_type: String,
}

#[post("/create/choose")]
pub async fn choose_submit(
    req: HttpRequest,
    session: Option<SessionUser>,
    form: web::Form<ChooseForm>,
    config: web::Data<Config>,
) -> HttpResponse {
    if session.is_none() {
        return ui::redirect("/login");
    }
    let Some(kind) = CreationType::parse(&form.creation_type) else {
        return ui::redirect_with_error("/create/choose", "Please pick a creation type");
    };

    let mut updated = draft::read_draft(&req);
    updated.creation_type = Some(kind);

    let next = match kind {
        CreationType::Avatar => "/create/avatar",
        CreationType::Template => "/create/template",
        CreationType::ScriptOnly => "/create/script",
    };
    redirect_with_draft(next, &updated, config.cookie_secure)
}

// ----------------------------------------------------------------------
// Étape 2: sélection avatar / template
// ----------------------------------------------------------------------

#[get("/create/avatar")]
pub async fn avatar_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    query: web::Query<StepQuery>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let current = draft::read_draft(&req);

    let filter = CatalogFilter {
        search: query.search.clone(),
        ..CatalogFilter::default()
    };
    let grid = match backend.list_avatars(&session.user_id, &filter).await {
        Ok(avatars) if avatars.is_empty() => {
            "<p class=\"empty-state\">No avatars match your search.</p>".to_string()
        }
        Ok(avatars) => avatars
            .iter()
            .map(|avatar| {
                let selected = if current.avatar_id.as_deref() == Some(avatar.id.as_str()) {
                    " selected"
                } else {
                    ""
                };
                format!(
                    "<form method=\"post\" action=\"/create/avatar\">\
<input type=\"hidden\" name=\"avatar_id\" value=\"{id}\">\
<button class=\"pick-card{selected}\" type=\"submit\">\
<img src=\"{thumb}\" alt=\"\" loading=\"lazy\">\
<h3>{name}</h3><p>{style} · {languages}</p></button></form>",
                    id = ui::escape(&avatar.id),
                    selected = selected,
                    thumb = ui::escape(&avatar.thumbnail_url),
                    name = ui::escape(&avatar.name),
                    style = ui::escape(&avatar.style),
                    languages = ui::escape(&avatar.language_tags.join(", ")),
                )
            })
            .collect(),
        Err(err) => ui::error_banner(Some(&err.display_message())),
    };

    let content = format!(
        "<form class=\"search\" method=\"get\" action=\"/create/avatar\">\
<input name=\"search\" placeholder=\"Search avatars\" value=\"{}\">\
<button type=\"submit\">Search</button></form>\
<div class=\"grid\">{}</div>",
        ui::escape(query.search.as_deref().unwrap_or("")),
        grid
    );
    wizard_page(
        &req,
        "Select Avatar",
        "select",
        query.error.as_deref(),
        content,
    )
}

#[derive(Debug, Deserialize)]
pub struct AvatarForm {
    pub avatar_id: String,
}

#[post("/create/avatar")]
pub async fn avatar_submit(
    req: HttpRequest,
    session: Option<SessionUser>,
    form: web::Form<AvatarForm>,
    config: web::Data<Config>,
) -> HttpResponse {
    if session.is_none() {
        return ui::redirect("/login");
    }
    let mut updated = draft::read_draft(&req);
    updated.avatar_id = Some(form.avatar_id.clone());
    redirect_with_draft("/create/script", &updated, config.cookie_secure)
}

#[get("/create/template")]
pub async fn template_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    query: web::Query<StepQuery>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let current = draft::read_draft(&req);

    let filter = CatalogFilter {
        search: query.search.clone(),
        ..CatalogFilter::default()
    };
    let grid = match backend.list_templates(&session.user_id, &filter).await {
        Ok(templates) if templates.is_empty() => {
            "<p class=\"empty-state\">No templates match your search.</p>".to_string()
        }
        Ok(templates) => templates
            .iter()
            .map(|template| {
                let selected = if current.template_id.as_deref() == Some(template.id.as_str()) {
                    " selected"
                } else {
                    ""
                };
                format!(
                    "<form method=\"post\" action=\"/create/template\">\
<input type=\"hidden\" name=\"template_id\" value=\"{id}\">\
<button class=\"pick-card{selected}\" type=\"submit\">\
<img src=\"{thumb}\" alt=\"\" loading=\"lazy\">\
<h3>{name}</h3><p>{category} · {ratio}</p></button></form>",
                    id = ui::escape(&template.id),
                    selected = selected,
                    thumb = ui::escape(&template.thumbnail_url),
                    name = ui::escape(&template.name),
                    category = ui::escape(&template.category),
                    ratio = ui::escape(&template.aspect_ratio),
                )
            })
            .collect(),
        Err(err) => ui::error_banner(Some(&err.display_message())),
    };

    let content = format!(
        "<form class=\"search\" method=\"get\" action=\"/create/template\">\
<input name=\"search\" placeholder=\"Search templates\" value=\"{}\">\
<button type=\"submit\">Search</button></form>\
<div class=\"grid\">{}</div>",
        ui::escape(query.search.as_deref().unwrap_or("")),
        grid
    );
    wizard_page(
        &req,
        "Select Template",
        "select",
        query.error.as_deref(),
        content,
    )
}

#[derive(Debug, Deserialize)]
pub struct TemplateForm {
    pub template_id: String,
}

#[post("/create/template")]
pub async fn template_submit(
    req: HttpRequest,
    session: Option<SessionUser>,
    form: web::Form<TemplateForm>,
    config: web::Data<Config>,
) -> HttpResponse {
    if session.is_none() {
        return ui::redirect("/login");
    }
    let mut updated = draft::read_draft(&req);
    updated.template_id = Some(form.template_id.clone());
    redirect_with_draft("/create/script", &updated, config.cookie_secure)
}

// ----------------------------------------------------------------------
// Étape 3: script et voix
// ----------------------------------------------------------------------

#[get("/create/script")]
pub async fn script_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    query: web::Query<StepQuery>,
) -> HttpResponse {
    if session.is_none() {
        return ui::redirect("/login");
    }
    let current = draft::read_draft(&req);

    let option = |value: &str, selected: &str, label: &str| {
        format!(
            "<option value=\"{}\"{}>{}</option>",
            value,
            if value == selected { " selected" } else { "" },
            label
        )
    };

    let content = format!(
        "<section class=\"card form-card\">\
<form method=\"post\" action=\"/create/script\">\
<label for=\"script\">Script</label>\
<textarea id=\"script\" name=\"script\" rows=\"10\" \
placeholder=\"Namaste! Aaj hum baat karenge...\">{script}</textarea>\
<div class=\"form-row\">\
<select name=\"language\">{languages}</select>\
<select name=\"voice\">{voices}</select>\
</div>\
<p class=\"hint\">Estimated cost so far: {estimate} credits</p>\
<button type=\"submit\">Continue</button></form>\
<form class=\"ai-script\" method=\"post\" action=\"/create/script/generate\">\
<label for=\"topic\">Or let AI draft it</label>\
<div class=\"form-row\">\
<input id=\"topic\" name=\"topic\" placeholder=\"The history of chai\">\
<input name=\"tone\" placeholder=\"engaging\">\
<button class=\"ghost\" type=\"submit\">Generate script</button>\
</div></form></section>",
        script = ui::escape(&current.script),
        languages = option("hi-IN", &current.language, "Hindi")
            + &option("en-IN", &current.language, "English (India)"),
        voices = option("Aarav", &current.voice, "Aarav")
            + &option("Ishita", &current.voice, "Ishita"),
        estimate = estimate_credits(&current.script, current.assets.len() as u32),
    );
    wizard_page(
        &req,
        "Script & Voice",
        "script",
        query.error.as_deref(),
        content,
    )
}

/// Génération de script par IA: le backend renvoie hook, corps et CTA,
/// assemblés ici en un script prêt à éditer.
#[derive(Debug, Deserialize)]
pub struct GenerateScriptForm {
    pub topic: String,
    pub tone: Option<String>,
}

#[post("/create/script/generate")]
pub async fn generate_script(
    req: HttpRequest,
    session: Option<SessionUser>,
    form: web::Form<GenerateScriptForm>,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    if form.topic.trim().is_empty() {
        return ui::redirect_with_error("/create/script", "Please give the AI a topic");
    }

    let mut updated = draft::read_draft(&req);
    let payload = ReelScriptPayload {
        template_id: "Historical_Fact_Reel".to_string(),
        topic: form.topic.trim().to_string(),
        tone: form
            .tone
            .clone()
            .filter(|tone| !tone.trim().is_empty())
            .unwrap_or_else(|| "engaging".to_string()),
        language: updated.language.clone(),
    };

    match backend
        .generate_reel_script(&payload, &session.user_id)
        .await
    {
        Ok(reel) => {
            let mut lines = vec![reel.hook];
            lines.extend(reel.body_lines);
            lines.push(reel.cta);
            updated.script = lines.join("\n");
            redirect_with_draft("/create/script", &updated, config.cookie_secure)
        }
        Err(err) => ui::redirect_with_error("/create/script", &err.display_message()),
    }
}

#[derive(Debug, Deserialize)]
pub struct ScriptForm {
    pub script: String,
    pub language: Option<String>,
    pub voice: Option<String>,
}

#[post("/create/script")]
pub async fn script_submit(
    req: HttpRequest,
    session: Option<SessionUser>,
    form: web::Form<ScriptForm>,
    config: web::Data<Config>,
) -> HttpResponse {
    if session.is_none() {
        return ui::redirect("/login");
    }
    if form.script.trim().is_empty() {
        return ui::redirect_with_error("/create/script", "Please write a script first");
    }

    let mut updated = draft::read_draft(&req);
    updated.script = form.script.clone();
    if let Some(language) = &form.language {
        updated.language = language.clone();
    }
    if let Some(voice) = &form.voice {
        updated.voice = voice.clone();
    }
    redirect_with_draft("/create/customize", &updated, config.cookie_secure)
}

// ----------------------------------------------------------------------
// Étape 4: personnalisation (musique, sfx, captions, assets)
// ----------------------------------------------------------------------

#[get("/create/customize")]
pub async fn customize_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    query: web::Query<StepQuery>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    if session.is_none() {
        return ui::redirect("/login");
    }
    let current = draft::read_draft(&req);

    // Catalogue musique best-effort: en cas d'échec on garde les ambiances de base
    let music_options: Vec<(String, String)> = match backend.list_music_tracks().await {
        Ok(tracks) if !tracks.is_empty() => tracks
            .into_iter()
            .map(|track| (track.id, track.name))
            .collect(),
        _ => vec![
            ("inspirational".to_string(), "Inspirational".to_string()),
            ("energetic".to_string(), "Energetic".to_string()),
            ("calm".to_string(), "Calm".to_string()),
        ],
    };

    let music_html: String = music_options
        .iter()
        .map(|(id, name)| {
            format!(
                "<option value=\"{}\"{}>{}</option>",
                ui::escape(id),
                if *id == current.music { " selected" } else { "" },
                ui::escape(name)
            )
        })
        .collect();

    let assets_html: String = if current.assets.is_empty() {
        "<li class=\"empty-state\">No assets attached.</li>".to_string()
    } else {
        current
            .assets
            .iter()
            .map(|asset| {
                format!(
                    "<li>{} <span class=\"muted\">({})</span>\
<form method=\"post\" action=\"/create/assets/remove\">\
<input type=\"hidden\" name=\"asset_id\" value=\"{}\">\
<button class=\"ghost\" type=\"submit\">Remove</button></form></li>",
                    ui::escape(&asset.filename),
                    ui::escape(&asset.kind),
                    ui::escape(&asset.id),
                )
            })
            .collect()
    };

    let kind_options: String = DRAFT_ASSET_KINDS
        .iter()
        .map(|kind| format!("<option value=\"{kind}\">{kind}</option>"))
        .collect();

    let content = format!(
        "<section class=\"card form-card\">\
<form method=\"post\" action=\"/create/customize\">\
<div class=\"form-row\">\
<label>Music <select name=\"music\">{music}</select></label>\
<label>Sound effects <select name=\"sfx\">\
<option value=\"subtle\"{sfx_subtle}>Subtle</option>\
<option value=\"energetic\"{sfx_energetic}>Energetic</option>\
<option value=\"none\"{sfx_none}>None</option></select></label>\
</div>\
<label class=\"checkbox\"><input type=\"checkbox\" name=\"captions_enabled\" \
value=\"true\"{captions}> Captions</label>\
<label>Caption style <select name=\"caption_style\">\
<option value=\"clean\"{style_clean}>Clean</option>\
<option value=\"bold\"{style_bold}>Bold</option>\
<option value=\"karaoke\"{style_karaoke}>Karaoke</option></select></label>\
<button type=\"submit\">Continue</button></form></section>\
<section class=\"card form-card\"><h2>Brand assets</h2>\
<ul class=\"assets\">{assets}</ul>\
<form method=\"post\" action=\"/create/assets/add\">\
<input name=\"filename\" placeholder=\"logo.png\">\
<select name=\"kind\">{kinds}</select>\
<button class=\"ghost\" type=\"submit\">Attach</button></form></section>",
        music = music_html,
        sfx_subtle = if current.sfx == "subtle" { " selected" } else { "" },
        sfx_energetic = if current.sfx == "energetic" { " selected" } else { "" },
        sfx_none = if current.sfx == "none" { " selected" } else { "" },
        captions = if current.captions_enabled { " checked" } else { "" },
        style_clean = if current.caption_style == "clean" { " selected" } else { "" },
        style_bold = if current.caption_style == "bold" { " selected" } else { "" },
        style_karaoke = if current.caption_style == "karaoke" { " selected" } else { "" },
        assets = assets_html,
        kinds = kind_options,
    );
    wizard_page(
        &req,
        "Customize",
        "customize",
        query.error.as_deref(),
        content,
    )
}

#[derive(Debug, Deserialize)]
pub struct CustomizeForm {
    pub music: Option<String>,
    pub sfx: Option<String>,
    /// Absent du formulaire quand la case est décochée
    pub captions_enabled: Option<String>,
    pub caption_style: Option<String>,
}

#[post("/create/customize")]
pub async fn customize_submit(
    req: HttpRequest,
    session: Option<SessionUser>,
    form: web::Form<CustomizeForm>,
    config: web::Data<Config>,
) -> HttpResponse {
    if session.is_none() {
        return ui::redirect("/login");
    }
    let mut updated = draft::read_draft(&req);
    if let Some(music) = &form.music {
        updated.music = music.clone();
    }
    if let Some(sfx) = &form.sfx {
        updated.sfx = sfx.clone();
    }
    updated.captions_enabled = form.captions_enabled.as_deref() == Some("true");
    if let Some(style) = &form.caption_style {
        updated.caption_style = style.clone();
    }
    redirect_with_draft("/create/confirm", &updated, config.cookie_secure)
}

#[derive(Debug, Deserialize)]
pub struct AddAssetForm {
    pub filename: String,
    pub kind: String,
}

#[post("/create/assets/add")]
pub async fn add_asset(
    req: HttpRequest,
    session: Option<SessionUser>,
    form: web::Form<AddAssetForm>,
    config: web::Data<Config>,
) -> HttpResponse {
    if session.is_none() {
        return ui::redirect("/login");
    }
    if form.filename.trim().is_empty() {
        return ui::redirect_with_error("/create/customize", "Asset filename is required");
    }
    if !DRAFT_ASSET_KINDS.contains(&form.kind.as_str()) {
        return ui::redirect_with_error("/create/customize", "Unsupported asset kind");
    }

    let mut updated = draft::read_draft(&req);
    updated.add_asset(DraftAsset {
        id: Uuid::new_v4().to_string(),
        filename: form.filename.trim().to_string(),
        kind: form.kind.clone(),
    });
    redirect_with_draft("/create/customize", &updated, config.cookie_secure)
}

#[derive(Debug, Deserialize)]
pub struct RemoveAssetForm {
    pub asset_id: String,
}

#[post("/create/assets/remove")]
pub async fn remove_asset(
    req: HttpRequest,
    session: Option<SessionUser>,
    form: web::Form<RemoveAssetForm>,
    config: web::Data<Config>,
) -> HttpResponse {
    if session.is_none() {
        return ui::redirect("/login");
    }
    let mut updated = draft::read_draft(&req);
    updated.remove_asset(&form.asset_id);
    redirect_with_draft("/create/customize", &updated, config.cookie_secure)
}

// ----------------------------------------------------------------------
// Étape 5: récapitulatif et confirmation
// ----------------------------------------------------------------------

#[get("/create/confirm")]
pub async fn confirm_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    query: web::Query<StepQuery>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let current = draft::read_draft(&req);

    if !current.is_submittable() {
        return ui::redirect_with_error("/create/script", "Please write a script first");
    }

    let estimate = estimate_credits(&current.script, current.assets.len() as u32);
    let wallet = backend.get_wallet(&session.user_id).await.ok();
    let balance_html = match &wallet {
        Some(wallet) if wallet.current_credits < i64::from(estimate) => format!(
            "<p class=\"error\">This render needs {} credits but you have {}.</p>",
            estimate, wallet.current_credits
        ),
        Some(wallet) => format!(
            "<p class=\"hint\">{} credits available after this render: {}</p>",
            wallet.current_credits,
            wallet.current_credits - i64::from(estimate)
        ),
        None => String::new(),
    };

    let script_preview: String = current.script.chars().take(280).collect();
    let content = format!(
        "<section class=\"card\"><h2>Review</h2>\
<dl class=\"summary\">\
<dt>Base</dt><dd>{base}</dd>\
<dt>Language</dt><dd>{language}</dd>\
<dt>Voice</dt><dd>{voice}</dd>\
<dt>Music</dt><dd>{music}</dd>\
<dt>Captions</dt><dd>{captions}</dd>\
<dt>Assets</dt><dd>{assets}</dd>\
<dt>Script</dt><dd class=\"script-preview\">{script}</dd>\
</dl>\
<p class=\"estimate\">Estimated cost: <strong>{estimate} credits</strong></p>{balance}\
<form method=\"post\" action=\"/create/confirm\">\
<label for=\"title\">Video title</label>\
<input id=\"title\" name=\"title\" value=\"{default_title}\">\
<button type=\"submit\">Generate video</button></form></section>",
        base = current
            .creation_type
            .map(|kind| kind.as_str())
            .unwrap_or("—"),
        language = ui::escape(&current.language),
        voice = ui::escape(&current.voice),
        music = ui::escape(&current.music),
        captions = if current.captions_enabled {
            format!("on ({})", ui::escape(&current.caption_style))
        } else {
            "off".to_string()
        },
        assets = current.assets.len(),
        script = ui::escape(&script_preview),
        estimate = estimate,
        balance = balance_html,
        default_title = ui::escape(&default_title(&current)),
    );
    wizard_page(
        &req,
        "Review & Confirm",
        "confirm",
        query.error.as_deref(),
        content,
    )
}

/// Titre proposé: premiers mots du script
fn default_title(current: &CreateDraft) -> String {
    let words: Vec<&str> = current.script.split_whitespace().take(6).collect();
    if words.is_empty() {
        "New video".to_string()
    } else {
        words.join(" ")
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    pub title: Option<String>,
}

#[post("/create/confirm")]
pub async fn confirm_submit(
    req: HttpRequest,
    session: Option<SessionUser>,
    form: web::Form<ConfirmForm>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let current = draft::read_draft(&req);

    if !current.is_submittable() {
        return ui::redirect_with_error("/create/script", "Please write a script first");
    }

    let title = form
        .title
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_title(&current));

    let payload = NewProjectPayload {
        title,
        script: current.script.clone(),
        language: current.language.clone(),
        voice: current.voice.clone(),
        template: current.template_for_submission().to_string(),
    };

    let project = match backend.create_project(&session.user_id, &payload).await {
        Ok(project) => project,
        Err(err) => {
            return ui::redirect_with_error("/create/confirm", &err.display_message());
        }
    };

    // Les assets du brouillon rejoignent le projet; un échec ici ne bloque
    // pas le render, l'asset manquant se corrige dans l'éditeur
    for asset in &current.assets {
        if let Err(err) = backend
            .add_project_asset(&project.id, &asset.filename, &asset.kind, &session.user_id)
            .await
        {
            tracing::warn!("asset {} not attached: {}", asset.filename, err);
        }
    }

    match backend
        .create_render(&project.id, &session.user_id, true)
        .await
    {
        Ok(render) => {
            // Projet créé et render lancé: le brouillon a rempli son office
            let mut builder = HttpResponse::SeeOther();
            builder.insert_header((header::LOCATION, format!("/renders/{}", render.id)));
            builder.cookie(draft::removal_cookie());
            builder.finish()
        }
        Err(err) => ui::redirect_with_error("/create/confirm", &err.display_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::auth::test_support::test_config;
    use crate::core::draft::{draft_cookie, DRAFT_COOKIE};
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use wiremock::matchers::{method, path as urlpath};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_cookie() -> actix_web::cookie::Cookie<'static> {
        actix_web::cookie::Cookie::new("vidyo_user_id", "u1")
    }

    fn draft_from_response<B>(resp: &actix_web::dev::ServiceResponse<B>) -> CreateDraft {
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == DRAFT_COOKIE)
            .expect("draft cookie not set");
        let raw = urlencoding::decode(cookie.value()).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    macro_rules! test_app {
        ($server:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(BackendClient::new(&$server.uri(), 5)))
                    .app_data(web::Data::new(test_config()))
                    .service(create_entry)
                    .service(choose_page)
                    .service(choose_submit)
                    .service(avatar_page)
                    .service(avatar_submit)
                    .service(template_page)
                    .service(template_submit)
                    .service(script_page)
                    .service(script_submit)
                    .service(generate_script)
                    .service(customize_page)
                    .service(customize_submit)
                    .service(add_asset)
                    .service(remove_asset)
                    .service(confirm_page)
                    .service(confirm_submit),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_create_entry_redirects_to_first_step() {
        let server = MockServer::start().await;
        let app = test_app!(server);
        let req = test::TestRequest::get()
            .uri("/create")
            .cookie(session_cookie())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/create/choose"
        );
    }

    #[actix_web::test]
    async fn test_choose_updates_draft_and_routes_by_type() {
        let server = MockServer::start().await;
        let app = test_app!(server);

        let req = test::TestRequest::post()
            .uri("/create/choose")
            .cookie(session_cookie())
            .set_form([("creation_type", "template")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/create/template"
        );
        let updated = draft_from_response(&resp);
        assert_eq!(updated.creation_type, Some(CreationType::Template));
    }

    #[actix_web::test]
    async fn test_script_step_rejects_blank_script() {
        let server = MockServer::start().await;
        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/create/script")
            .cookie(session_cookie())
            .set_form([("script", "  \n ")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        let location = resp
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.starts_with("/create/script?error="));
    }

    #[actix_web::test]
    async fn test_script_step_preserves_existing_draft_fields() {
        let server = MockServer::start().await;
        let app = test_app!(server);

        let existing = CreateDraft {
            creation_type: Some(CreationType::Avatar),
            avatar_id: Some("av1".to_string()),
            ..CreateDraft::default()
        };
        let req = test::TestRequest::post()
            .uri("/create/script")
            .cookie(session_cookie())
            .cookie(draft_cookie(&existing, false))
            .set_form([
                ("script", "Namaste doston!"),
                ("language", "en-IN"),
                ("voice", "Ishita"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;

        let updated = draft_from_response(&resp);
        assert_eq!(updated.avatar_id.as_deref(), Some("av1"));
        assert_eq!(updated.script, "Namaste doston!");
        assert_eq!(updated.language, "en-IN");
        assert_eq!(updated.voice, "Ishita");
    }

    #[actix_web::test]
    async fn test_generate_script_fills_draft_from_reel() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(urlpath("/ai/reel-script"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "hook": "Did you know chai crossed an ocean?",
                "body_lines": ["It began on the docks of Surat.", "Spices met leaves."],
                "cta": "Follow for more history in 60 seconds.",
                "caption": "The history of chai",
                "hashtags": ["#chai", "#history"]
            })))
            .mount(&server)
            .await;

        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/create/script/generate")
            .cookie(session_cookie())
            .set_form([("topic", "The history of chai"), ("tone", "warm")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/create/script"
        );
        let updated = draft_from_response(&resp);
        assert!(updated.script.starts_with("Did you know chai crossed an ocean?"));
        assert!(updated.script.ends_with("Follow for more history in 60 seconds."));
    }

    #[actix_web::test]
    async fn test_asset_add_and_remove_round_trip() {
        let server = MockServer::start().await;
        let app = test_app!(server);

        let req = test::TestRequest::post()
            .uri("/create/assets/add")
            .cookie(session_cookie())
            .set_form([("filename", "logo.png"), ("kind", "logo")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        let with_asset = draft_from_response(&resp);
        assert_eq!(with_asset.assets.len(), 1);

        let asset_id = with_asset.assets[0].id.clone();
        let req = test::TestRequest::post()
            .uri("/create/assets/remove")
            .cookie(session_cookie())
            .cookie(draft_cookie(&with_asset, false))
            .set_form([("asset_id", asset_id.as_str())])
            .to_request();
        let resp = test::call_service(&app, req).await;
        let without_asset = draft_from_response(&resp);
        assert!(without_asset.assets.is_empty());
    }

    #[actix_web::test]
    async fn test_asset_add_rejects_unknown_kind() {
        let server = MockServer::start().await;
        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/create/assets/add")
            .cookie(session_cookie())
            .set_form([("filename", "x.bin"), ("kind", "malware")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        let location = resp
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.contains("Unsupported%20asset%20kind"));
    }

    #[actix_web::test]
    async fn test_confirm_without_script_bounces_to_script_step() {
        let server = MockServer::start().await;
        let app = test_app!(server);
        let req = test::TestRequest::get()
            .uri("/create/confirm")
            .cookie(session_cookie())
            .to_request();
        let resp = test::call_service(&app, req).await;
        let location = resp
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.starts_with("/create/script?error="));
    }

    #[actix_web::test]
    async fn test_confirm_creates_project_then_render_and_clears_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(urlpath("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "proj-9",
                "user_id": "u1",
                "title": "Namaste doston",
                "script": "Namaste doston! Swagat hai.",
                "language": "hi-IN",
                "voice": "Aarav",
                "template": "clean-corporate",
                "created_at": "2025-11-02T10:00:00Z"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(urlpath("/renders"))
            .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
                "id": "rend-9",
                "project_id": "proj-9",
                "user_id": "u1",
                "status": "pending",
                "progress": 0,
                "video_url": null,
                "thumbnail_url": null,
                "error_message": null,
                "created_at": "2025-11-02T10:00:00Z",
                "updated_at": "2025-11-02T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let draft = CreateDraft {
            creation_type: Some(CreationType::Avatar),
            avatar_id: Some("av1".to_string()),
            script: "Namaste doston! Swagat hai.".to_string(),
            ..CreateDraft::default()
        };

        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/create/confirm")
            .cookie(session_cookie())
            .cookie(draft_cookie(&draft, false))
            .set_form([("title", "")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/renders/rend-9"
        );
        // Le cookie de brouillon est expiré
        let removal = resp
            .response()
            .cookies()
            .find(|c| c.name() == DRAFT_COOKIE)
            .unwrap();
        assert!(removal.value().is_empty());
    }

    #[actix_web::test]
    async fn test_confirm_surfaces_insufficient_credits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(urlpath("/projects"))
            .respond_with(ResponseTemplate::new(402).set_body_string("Insufficient credits"))
            .mount(&server)
            .await;

        let draft = CreateDraft {
            creation_type: Some(CreationType::ScriptOnly),
            script: "A script".to_string(),
            ..CreateDraft::default()
        };

        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/create/confirm")
            .cookie(session_cookie())
            .cookie(draft_cookie(&draft, false))
            .set_form([("title", "Demo")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        let location = resp
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.contains("Insufficient%20credits"));
    }
}
