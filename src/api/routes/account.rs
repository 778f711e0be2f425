// api/routes/account.rs
//
// Pages compte: profil public et préférences de génération. Les deux
// formulaires renvoient tout le record au backend, puis la page se recharge
// avec un bandeau de confirmation.
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::api::ui;
use crate::core::{session, SessionDisplay, SessionUser};
use crate::services::{BackendClient, ProfilePatch, SettingsPatch};
use crate::utils::config::Config;
use crate::utils::error::AppError;

#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub error: Option<String>,
    pub saved: Option<String>,
}

fn text_field(label: &str, name: &str, value: Option<&str>, placeholder: &str) -> String {
    format!(
        "<label>{label}<input name=\"{name}\" value=\"{value}\" placeholder=\"{placeholder}\"></label>",
        label = ui::escape(label),
        name = name,
        value = ui::escape(value.unwrap_or("")),
        placeholder = ui::escape(placeholder),
    )
}

#[get("/profile")]
pub async fn profile_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    query: web::Query<AccountQuery>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let display = SessionDisplay::from_request(&req);

    let profile = match backend.get_profile(&session.user_id).await {
        Ok(profile) => profile,
        Err(err) => {
            let body = format!(
                "<div class=\"page-head\"><h1>Profile</h1></div>{}",
                ui::error_banner(Some(&err.display_message()))
            );
            return ui::app_page("Profile", "/profile", &display, &[], &body);
        }
    };

    let saved = query
        .saved
        .as_deref()
        .map(|_| "Profile saved.")
        .unwrap_or_default();

    let body = format!(
        "<div class=\"page-head\"><h1>Profile</h1></div>{error}{notice}\
<section class=\"card form-card\">\
<form method=\"post\" action=\"/profile\">\
{display_name}{email}{phone}\
<label>Bio<textarea name=\"bio\" rows=\"3\">{bio}</textarea></label>\
{company}{city}{country}{timezone}\
<button type=\"submit\">Save profile</button></form></section>\
<p class=\"muted\">Member since {created}</p>",
        error = ui::error_banner(query.error.as_deref()),
        notice = ui::notice_banner(Some(saved)),
        display_name = text_field(
            "Display name",
            "display_name",
            profile.display_name.as_deref(),
            "Your name"
        ),
        email = text_field("Email", "email", profile.email.as_deref(), "you@example.com"),
        phone = text_field("Phone", "phone", profile.phone.as_deref(), "+91"),
        bio = ui::escape(profile.bio.as_deref().unwrap_or("")),
        company = text_field("Company", "company", profile.company.as_deref(), ""),
        city = text_field("City", "city", profile.city.as_deref(), ""),
        country = text_field("Country", "country", profile.country.as_deref(), "India"),
        timezone = text_field(
            "Timezone",
            "timezone",
            profile.timezone.as_deref(),
            "Asia/Kolkata"
        ),
        created = ui::escape(&profile.created_at),
    );
    ui::app_page("Profile", "/profile", &display, &[], &body)
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 120, message = "Display name is required"))]
    pub display_name: String,
    #[validate(length(max = 255, message = "Email is too long"))]
    pub email: Option<String>,
    #[validate(length(max = 32, message = "Phone is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "Bio must stay under 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 120, message = "Company is too long"))]
    pub company: Option<String>,
    #[validate(length(max = 80, message = "City is too long"))]
    pub city: Option<String>,
    #[validate(length(max = 80, message = "Country is too long"))]
    pub country: Option<String>,
    #[validate(length(max = 64, message = "Timezone is too long"))]
    pub timezone: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[post("/profile")]
pub async fn save_profile(
    session: Option<SessionUser>,
    form: web::Form<ProfileForm>,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
) -> HttpResponse {
    let Some(session_user) = session else {
        return ui::redirect("/login");
    };
    if let Err(errors) = form.validate() {
        return ui::redirect_with_error("/profile", &AppError::from(errors).display_message());
    }

    let patch = ProfilePatch {
        display_name: form.display_name.trim().to_string(),
        email: non_empty(&form.email),
        phone: non_empty(&form.phone),
        bio: non_empty(&form.bio),
        company: non_empty(&form.company),
        city: non_empty(&form.city),
        country: non_empty(&form.country),
        timezone: non_empty(&form.timezone),
        ..ProfilePatch::default()
    };

    match backend.update_profile(&patch, &session_user.user_id).await {
        Ok(profile) => {
            // Le nom affiché dans la nav vient du cookie: on le resynchronise
            let mut builder = HttpResponse::SeeOther();
            builder.insert_header((actix_web::http::header::LOCATION, "/profile?saved=1"));
            if let Some(name) = &profile.display_name {
                builder.cookie(session::display_cookie(
                    session::NAME_COOKIE,
                    name,
                    config.cookie_secure,
                ));
            }
            builder.finish()
        }
        Err(err) => ui::redirect_with_error("/profile", &err.display_message()),
    }
}

#[get("/settings")]
pub async fn settings_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    query: web::Query<AccountQuery>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let display = SessionDisplay::from_request(&req);

    let settings = match backend.get_settings(&session.user_id).await {
        Ok(settings) => settings,
        Err(err) => {
            let body = format!(
                "<div class=\"page-head\"><h1>Settings</h1></div>{}",
                ui::error_banner(Some(&err.display_message()))
            );
            return ui::app_page("Settings", "/profile", &display, &[], &body);
        }
    };

    let checkbox = |label: &str, name: &str, checked: bool| {
        format!(
            "<label class=\"checkbox\"><input type=\"checkbox\" name=\"{}\" value=\"true\"{}> {}</label>",
            name,
            if checked { " checked" } else { "" },
            ui::escape(label),
        )
    };
    let select = |label: &str, name: &str, options: &[(&str, &str)], selected: Option<&str>| {
        let opts: String = options
            .iter()
            .map(|(value, text)| {
                format!(
                    "<option value=\"{}\"{}>{}</option>",
                    value,
                    if Some(*value) == selected { " selected" } else { "" },
                    text,
                )
            })
            .collect();
        format!("<label>{}<select name=\"{}\">{}</select></label>", label, name, opts)
    };

    let saved = query
        .saved
        .as_deref()
        .map(|_| "Settings saved.")
        .unwrap_or_default();

    let body = format!(
        "<div class=\"page-head\"><h1>Settings</h1></div>{error}{notice}\
<section class=\"card form-card\"><form method=\"post\" action=\"/settings\">\
{language}{voice}{ratio}\
{notif}{marketing}{captions}{ducking}\
<button type=\"submit\">Save settings</button></form></section>",
        error = ui::error_banner(query.error.as_deref()),
        notice = ui::notice_banner(Some(saved)),
        language = select(
            "Default language",
            "default_language",
            &[("hi-IN", "Hindi"), ("en-IN", "English (India)")],
            settings.default_language.as_deref(),
        ),
        voice = select(
            "Default voice",
            "default_voice",
            &[("Aarav", "Aarav"), ("Ishita", "Ishita")],
            settings.default_voice.as_deref(),
        ),
        ratio = select(
            "Default aspect ratio",
            "default_aspect_ratio",
            &[("9:16", "9:16"), ("1:1", "1:1"), ("16:9", "16:9")],
            settings.default_aspect_ratio.as_deref(),
        ),
        notif = checkbox(
            "Email me when renders finish",
            "email_notifications",
            settings.email_notifications,
        ),
        marketing = checkbox("Marketing emails", "marketing_emails", settings.marketing_emails),
        captions = checkbox(
            "Enable captions by default",
            "auto_caption_default",
            settings.auto_caption_default,
        ),
        ducking = checkbox(
            "Duck music under voice-over",
            "music_ducking_default",
            settings.music_ducking_default,
        ),
    );
    ui::app_page("Settings", "/profile", &display, &[], &body)
}

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub default_language: Option<String>,
    pub default_voice: Option<String>,
    pub default_aspect_ratio: Option<String>,
    pub email_notifications: Option<String>,
    pub marketing_emails: Option<String>,
    pub auto_caption_default: Option<String>,
    pub music_ducking_default: Option<String>,
}

#[post("/settings")]
pub async fn save_settings(
    session: Option<SessionUser>,
    form: web::Form<SettingsForm>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };

    let patch = SettingsPatch {
        default_language: non_empty(&form.default_language),
        default_voice: non_empty(&form.default_voice),
        default_aspect_ratio: non_empty(&form.default_aspect_ratio),
        email_notifications: form.email_notifications.as_deref() == Some("true"),
        marketing_emails: form.marketing_emails.as_deref() == Some("true"),
        auto_caption_default: form.auto_caption_default.as_deref() == Some("true"),
        music_ducking_default: form.music_ducking_default.as_deref() == Some("true"),
    };

    match backend.update_settings(&patch, &session.user_id).await {
        Ok(_) => ui::redirect("/settings?saved=1"),
        Err(err) => ui::redirect_with_error("/settings", &err.display_message()),
    }
}
