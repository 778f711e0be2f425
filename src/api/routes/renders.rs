// api/routes/renders.rs
//
// Suivi d'un render: page de statut pollée toutes les 2 secondes jusqu'au
// statut terminal, puis lecteur vidéo et lien de téléchargement via le proxy.
use actix_web::http::header;
use actix_web::{get, web, HttpRequest, HttpResponse};

use crate::api::ui;
use crate::core::{SessionDisplay, SessionUser};
use crate::models::RenderStatus;
use crate::services::BackendClient;
use crate::utils::config::Config;
use crate::utils::error::Result;

/// Les URLs média renvoyées par le backend sont relatives à son origine
pub fn absolute_media_url(base_url: &str, path_or_url: &str) -> String {
    if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
        path_or_url.to_string()
    } else {
        format!("{}{}", base_url, path_or_url)
    }
}

#[get("/renders/{render_id}")]
pub async fn render_status_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    path: web::Path<String>,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let display = SessionDisplay::from_request(&req);
    let render_id = path.into_inner();

    let render = match backend.get_render(&render_id, &session.user_id).await {
        Ok(render) => render,
        Err(err) => {
            let body = format!(
                "<div class=\"page-head\"><h1>Render</h1></div>{}",
                ui::error_banner(Some("Unable to load render status."))
            );
            tracing::warn!("render {} fetch failed: {}", render_id, err);
            return ui::app_page("Render", "/dashboard", &display, &[], &body);
        }
    };

    let poll_attrs = if render.status.is_terminal() {
        String::new()
    } else {
        format!(
            " data-poll-url=\"/api/renders/{}\" data-poll-interval=\"{}\"",
            ui::escape(&render.id),
            config.poll_interval_ms
        )
    };

    let result_html = match (render.status, render.video_url.as_deref()) {
        (RenderStatus::Completed, Some(video_url)) => {
            let absolute = absolute_media_url(backend.base_url(), video_url);
            let download = format!(
                "/download?url={}&filename=render-{}",
                urlencoding::encode(&absolute),
                ui::escape(&render.id)
            );
            format!(
                "<section class=\"card\"><h2>Video Ready</h2>\
<video src=\"{src}\" controls></video>\
<div class=\"actions\">\
<a class=\"cta\" href=\"{download}\">Download</a>\
<a class=\"ghost\" href=\"{src}\" target=\"_blank\" rel=\"noreferrer\">Share URL</a>\
<a class=\"ghost\" href=\"/dashboard\">Back to Dashboard</a>\
</div></section>",
                src = ui::escape(&absolute),
                download = download,
            )
        }
        (RenderStatus::Failed, _) => format!(
            "<section class=\"card\">{}<a class=\"ghost\" href=\"/editor/{}\">Back to editor</a></section>",
            ui::error_banner(Some(
                render
                    .error_message
                    .as_deref()
                    .unwrap_or("Render failed. Please retry from the editor.")
            )),
            ui::escape(&render.project_id),
        ),
        _ => "<section class=\"card\"><p class=\"hint\">Rendering in progress. \
This page auto-refreshes every 2 seconds.</p></section>"
            .to_string(),
    };

    let body = format!(
        "<div class=\"page-head\"><h1>Render</h1></div>\
<section class=\"card\"{poll}>\
<p class=\"muted\">Render ID</p><p class=\"mono\">{id}</p>\
{badge}\
<div class=\"progress\"><div class=\"progress-bar\" data-progress-bar style=\"width:{progress}%\"></div></div>\
<p class=\"progress-label\" data-progress-label>{progress}%</p>\
</section>{result}",
        poll = poll_attrs,
        id = ui::escape(&render.id),
        badge = ui::status_badge(render.status.as_str()),
        progress = render.progress,
        result = result_html,
    );

    ui::app_page(
        "Render status",
        "/dashboard",
        &display,
        &["/static/js/poll.js"],
        &body,
    )
}

/// Endpoint JSON consommé par poll.js; jamais mis en cache
#[get("/api/renders/{render_id}")]
pub async fn render_poll(
    session: SessionUser,
    path: web::Path<String>,
    backend: web::Data<BackendClient>,
) -> Result<HttpResponse> {
    let render = backend
        .get_render(&path.into_inner(), &session.user_id)
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(render))
}
