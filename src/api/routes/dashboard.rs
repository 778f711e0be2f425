// api/routes/dashboard.rs
use actix_web::{get, web, HttpRequest, HttpResponse};

use crate::api::ui;
use crate::core::{SessionDisplay, SessionUser};
use crate::models::Video;
use crate::services::BackendClient;
use crate::utils::config::Config;

fn video_card(video: &Video, poll_interval_ms: u64) -> String {
    let title = video.title.as_deref().unwrap_or("Untitled video");
    let poll_attrs = if video.status.is_terminal() {
        String::new()
    } else {
        // poll.js rafraîchit la carte jusqu'au statut terminal
        format!(
            " data-poll-url=\"/api/videos/{}\" data-poll-interval=\"{}\"",
            ui::escape(&video.id),
            poll_interval_ms
        )
    };
    let thumb = video
        .thumbnail_url
        .as_deref()
        .map(|url| format!("<img src=\"{}\" alt=\"\" loading=\"lazy\">", ui::escape(url)))
        .unwrap_or_else(|| "<div class=\"thumb-placeholder\"></div>".to_string());

    format!(
        "<a class=\"card video-card\" href=\"/videos/{id}\"{poll}>{thumb}\
<div class=\"card-body\"><h3>{title}</h3>\
{badge}<span class=\"progress-label\" data-progress-label>{progress}%</span>\
</div></a>",
        id = ui::escape(&video.id),
        poll = poll_attrs,
        thumb = thumb,
        title = ui::escape(title),
        badge = ui::status_badge(video.status.as_str()),
        progress = video.progress,
    )
}

#[get("/dashboard")]
pub async fn dashboard(
    req: HttpRequest,
    session: Option<SessionUser>,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let display = SessionDisplay::from_request(&req);

    // Le solde est décoratif: en cas d'échec on affiche un tiret, pas d'erreur
    let wallet = backend.get_wallet(&session.user_id).await.ok();
    let wallet_html = match &wallet {
        Some(wallet) => format!(
            "<span class=\"wallet\">{} credits · {}</span>",
            wallet.current_credits,
            ui::escape(&wallet.plan_name)
        ),
        None => "<span class=\"wallet\">— credits</span>".to_string(),
    };

    let body = match backend.list_videos(&session.user_id).await {
        Ok(videos) if videos.is_empty() => format!(
            "<div class=\"page-head\"><h1>Your videos</h1>{}</div>\
<div class=\"empty-state\"><p>No videos yet.</p>\
<a class=\"cta\" href=\"/create\">Create your first video</a></div>",
            wallet_html
        ),
        Ok(videos) => {
            let cards: String = videos
                .iter()
                .map(|video| video_card(video, config.poll_interval_ms))
                .collect();
            format!(
                "<div class=\"page-head\"><h1>Your videos</h1>{}\
<a class=\"cta\" href=\"/create\">New video</a></div>\
<div class=\"grid\">{}</div>",
                wallet_html, cards
            )
        }
        Err(err) => format!(
            "<div class=\"page-head\"><h1>Your videos</h1>{}</div>{}",
            wallet_html,
            ui::error_banner(Some(&err.display_message()))
        ),
    };

    ui::app_page(
        "Dashboard",
        "/dashboard",
        &display,
        &["/static/js/poll.js"],
        &body,
    )
}
