// api/routes/editor.rs
//
// Éditeur d'un projet: textarea de script avec autosauvegarde différée (1s),
// réglages voix/langue/template, lancement de render et suivi du dernier
// render par polling.
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::api::ui;
use crate::core::{SessionDisplay, SessionUser};
use crate::models::Render;
use crate::services::{BackendClient, ProjectPatch};
use crate::utils::config::Config;
use crate::utils::error::Result;

#[derive(Debug, Deserialize)]
pub struct EditorQuery {
    pub error: Option<String>,
}

/// Corps de l'autosauvegarde (fingerprint complet de l'éditeur)
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub script: String,
    pub language: String,
    pub voice: String,
    pub template: String,
}

fn option(value: &str, selected: &str, label: &str) -> String {
    format!(
        "<option value=\"{}\"{}>{}</option>",
        ui::escape(value),
        if value == selected { " selected" } else { "" },
        ui::escape(label)
    )
}

fn render_panel(render: Option<&Render>, project_id: &str, poll_interval_ms: u64) -> String {
    let Some(render) = render else {
        return "<p class=\"empty-state\">No render yet.</p>".to_string();
    };

    let poll_attrs = if render.status.is_terminal() {
        String::new()
    } else {
        format!(
            " data-poll-url=\"/api/renders/{}\" data-poll-interval=\"{}\"",
            ui::escape(&render.id),
            poll_interval_ms
        )
    };

    let video_link = render
        .video_url
        .as_deref()
        .map(|url| {
            format!(
                "<a class=\"accent\" href=\"{}\" target=\"_blank\" rel=\"noreferrer\">Open Video URL</a>",
                ui::escape(url)
            )
        })
        .unwrap_or_default();

    let failure = if render.status == crate::models::RenderStatus::Failed {
        let message = render
            .error_message
            .as_deref()
            .map(|msg| format!("<p class=\"error\">{}</p>", ui::escape(msg)))
            .unwrap_or_default();
        format!(
            "{}<form method=\"post\" action=\"/editor/{}/render\">\
<button class=\"ghost\" type=\"submit\">Retry Render</button></form>",
            message,
            ui::escape(project_id)
        )
    } else {
        String::new()
    };

    format!(
        "<div class=\"render-panel\"{poll}>{badge}\
<span class=\"progress-label\" data-progress-label>{progress}%</span>\
<div class=\"progress\"><div class=\"progress-bar\" data-progress-bar style=\"width:{progress}%\"></div></div>\
{video}{failure}</div>",
        poll = poll_attrs,
        badge = ui::status_badge(render.status.as_str()),
        progress = render.progress,
        video = video_link,
        failure = failure,
    )
}

#[get("/editor/{project_id}")]
pub async fn editor_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    path: web::Path<String>,
    query: web::Query<EditorQuery>,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let display = SessionDisplay::from_request(&req);
    let project_id = path.into_inner();

    let detail = match backend.get_project(&project_id, &session.user_id).await {
        Ok(detail) => detail,
        Err(err) => {
            let body = format!(
                "<div class=\"page-head\"><h1>Editor</h1></div>{}",
                ui::error_banner(Some(&err.display_message()))
            );
            return ui::app_page("Editor", "/projects", &display, &[], &body);
        }
    };

    let project = &detail.project;
    let latest = detail.renders.first();

    let history: String = detail
        .renders
        .iter()
        .take(5)
        .map(|render| {
            format!(
                "<li><span class=\"mono\">{}</span> <span>{} · {}%</span></li>",
                ui::escape(&render.id[..render.id.len().min(8)]),
                render.status.as_str(),
                render.progress
            )
        })
        .collect();

    let body = format!(
        "<div class=\"page-head\"><h1>{title}</h1>\
<span class=\"save-state\" data-save-state></span></div>{error}\
<div class=\"editor-grid\">\
<section class=\"card\"><h2>Script</h2>\
<form id=\"editor\" data-autosave-url=\"/editor/{id}/save\" data-autosave-debounce=\"1000\">\
<textarea name=\"script\" rows=\"14\">{script}</textarea>\
<div class=\"form-row\">\
<select name=\"language\">{languages}</select>\
<select name=\"voice\">{voices}</select>\
<select name=\"template\">{templates}</select>\
</div></form></section>\
<section class=\"card\"><h2>Latest Render</h2>\
<form method=\"post\" action=\"/editor/{id}/render\">\
<button type=\"submit\">Generate</button></form>\
{panel}\
<h2>Render History</h2><ul class=\"history\">{history}</ul></section>\
</div>",
        title = ui::escape(&project.title),
        error = ui::error_banner(query.error.as_deref()),
        id = ui::escape(&project.id),
        script = ui::escape(&project.script),
        languages = option("hi-IN", &project.language, "Hindi")
            + &option("en-IN", &project.language, "English (India)"),
        voices = option("Aarav", &project.voice, "Aarav")
            + &option("Ishita", &project.voice, "Ishita"),
        templates = option("clean-corporate", &project.template, "Clean Corporate")
            + &option("edu-modern", &project.template, "Edu Modern"),
        panel = render_panel(latest, &project.id, config.poll_interval_ms),
        history = if history.is_empty() {
            "<li class=\"empty-state\">No previous renders.</li>".to_string()
        } else {
            history
        },
    );

    ui::app_page(
        &format!("Editor · {}", project.title),
        "/projects",
        &display,
        &["/static/js/autosave.js", "/static/js/poll.js"],
        &body,
    )
}

/// Autosauvegarde de l'éditeur (appelée par autosave.js après 1s sans frappe)
#[post("/editor/{project_id}/save")]
pub async fn save_project(
    session: SessionUser,
    path: web::Path<String>,
    payload: web::Json<SaveRequest>,
    backend: web::Data<BackendClient>,
) -> Result<HttpResponse> {
    let patch = ProjectPatch {
        script: Some(payload.script.clone()),
        language: Some(payload.language.clone()),
        voice: Some(payload.voice.clone()),
        template: Some(payload.template.clone()),
        ..ProjectPatch::default()
    };
    let project = backend
        .update_project(&path.into_inner(), &patch, &session.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

/// Lance un render pour le projet puis revient sur l'éditeur
#[post("/editor/{project_id}/render")]
pub async fn start_render(
    session: Option<SessionUser>,
    path: web::Path<String>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let project_id = path.into_inner();

    match backend
        .create_render(&project_id, &session.user_id, true)
        .await
    {
        Ok(_) => ui::redirect(&format!("/editor/{}", project_id)),
        Err(err) => ui::redirect_with_error(
            &format!("/editor/{}", project_id),
            &err.display_message(),
        ),
    }
}
