// api/routes/videos.rs
//
// Détail d'une vidéo IA: polling du statut, lecture et téléchargement du
// résultat, bouton Retry sur les échecs.
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::api::routes::renders::absolute_media_url;
use crate::api::ui;
use crate::core::{SessionDisplay, SessionUser};
use crate::models::VideoStatus;
use crate::services::BackendClient;
use crate::utils::config::Config;
use crate::utils::error::Result;

#[derive(Debug, Deserialize)]
pub struct VideoQuery {
    pub error: Option<String>,
}

#[get("/videos/{video_id}")]
pub async fn video_detail_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    path: web::Path<String>,
    query: web::Query<VideoQuery>,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let display = SessionDisplay::from_request(&req);
    let video_id = path.into_inner();

    let video = match backend.get_video(&video_id, &session.user_id).await {
        Ok(video) => video,
        Err(err) => {
            let body = format!(
                "<div class=\"page-head\"><h1>Video</h1></div>{}",
                ui::error_banner(Some(&err.display_message()))
            );
            return ui::app_page("Video", "/dashboard", &display, &[], &body);
        }
    };

    let title = video.title.as_deref().unwrap_or("Untitled video");
    let poll_attrs = if video.status.is_terminal() {
        String::new()
    } else {
        format!(
            " data-poll-url=\"/api/videos/{}\" data-poll-interval=\"{}\"",
            ui::escape(&video.id),
            config.poll_interval_ms
        )
    };

    let result_html = match (video.status, video.output_url.as_deref()) {
        (VideoStatus::Completed, Some(output_url)) => {
            let absolute = absolute_media_url(backend.base_url(), output_url);
            let download = format!(
                "/download?url={}&filename={}",
                urlencoding::encode(&absolute),
                urlencoding::encode(title)
            );
            format!(
                "<video src=\"{src}\" controls></video>\
<div class=\"actions\"><a class=\"cta\" href=\"{download}\">Download</a>\
<a class=\"ghost\" href=\"{src}\" target=\"_blank\" rel=\"noreferrer\">Share URL</a></div>",
                src = ui::escape(&absolute),
                download = download,
            )
        }
        (VideoStatus::Failed, _) => format!(
            "{}<form method=\"post\" action=\"/videos/{}/retry\">\
<button type=\"submit\">Retry</button></form>",
            ui::error_banner(Some(
                video
                    .error_message
                    .as_deref()
                    .unwrap_or("Generation failed.")
            )),
            ui::escape(&video.id),
        ),
        _ => "<p class=\"hint\">Your video is being generated. This page refreshes automatically.</p>"
            .to_string(),
    };

    let tags = video
        .auto_tags
        .iter()
        .chain(video.user_tags.iter())
        .map(|tag| format!("<span class=\"tag\">{}</span>", ui::escape(tag)))
        .collect::<String>();

    let body = format!(
        "<div class=\"page-head\"><h1>{title}</h1></div>{error}\
<section class=\"card\"{poll}>\
{badge}\
<div class=\"progress\"><div class=\"progress-bar\" data-progress-bar style=\"width:{progress}%\"></div></div>\
<p class=\"progress-label\" data-progress-label>{progress}%</p>\
{result}\
<dl class=\"summary\">\
<dt>Voice</dt><dd>{voice}</dd>\
<dt>Aspect ratio</dt><dd>{ratio}</dd>\
<dt>Resolution</dt><dd>{resolution}</dd>\
<dt>Captions</dt><dd>{captions}</dd>\
</dl>\
<div class=\"tags\">{tags}</div>\
</section>",
        title = ui::escape(title),
        error = ui::error_banner(query.error.as_deref()),
        poll = poll_attrs,
        badge = ui::status_badge(video.status.as_str()),
        progress = video.progress,
        result = result_html,
        voice = ui::escape(&video.voice),
        ratio = ui::escape(&video.aspect_ratio),
        resolution = ui::escape(&video.resolution),
        captions = if video.captions_enabled { "on" } else { "off" },
        tags = tags,
    );

    ui::app_page(title, "/dashboard", &display, &["/static/js/poll.js"], &body)
}

/// Relance une génération échouée puis revient sur la page détail
#[post("/videos/{video_id}/retry")]
pub async fn retry_video(
    session: Option<SessionUser>,
    path: web::Path<String>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let video_id = path.into_inner();

    match backend.retry_video(&video_id, &session.user_id).await {
        Ok(_) => ui::redirect(&format!("/videos/{}", video_id)),
        Err(err) => ui::redirect_with_error(
            &format!("/videos/{}", video_id),
            &err.display_message(),
        ),
    }
}

/// Endpoint JSON consommé par poll.js; jamais mis en cache
#[get("/api/videos/{video_id}")]
pub async fn video_poll(
    session: SessionUser,
    path: web::Path<String>,
    backend: web::Data<BackendClient>,
) -> Result<HttpResponse> {
    let video = backend
        .get_video(&path.into_inner(), &session.user_id)
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(video))
}
