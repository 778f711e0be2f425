// api/routes/auth.rs
//
// Flux d'authentification mock: le backend ne connaît que l'email et renvoie
// un user_id opaque, la "session" est un jeu de cookies posés ici.
use actix_web::http::header;
use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;

use crate::api::ui;
use crate::core::{
    display_name_from_email, removal_cookies, session_cookies, SessionUser, AVATAR_COOKIE,
    EMAIL_COOKIE, NAME_COOKIE,
};
use crate::services::BackendClient;
use crate::utils::config::Config;
use crate::utils::error::{AppError, Result};

/// Email fixe du parcours "Continue with Google" (mock, pas d'OAuth réel)
const GOOGLE_MOCK_EMAIL: &str = "google.user@rangmanchai.dev";

#[derive(Debug, Deserialize)]
pub struct AuthPageQuery {
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailForm {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleForm {
    /// Page d'origine ("login" ou "signup"), pour renvoyer l'erreur au bon endroit
    pub from: Option<String>,
}

fn auth_card(
    title: &str,
    action: &str,
    submit_label: &str,
    alt_html: &str,
    error: Option<&str>,
) -> String {
    format!(
        "<section class=\"auth-card\"><h1>{}</h1>{}\
<form method=\"post\" action=\"{}\">\
<label for=\"email\">Email</label>\
<input id=\"email\" name=\"email\" type=\"email\" placeholder=\"you@example.com\" autofocus>\
<button type=\"submit\">{}</button></form>\
<form method=\"post\" action=\"/auth/google\">\
<input type=\"hidden\" name=\"from\" value=\"{}\">\
<button class=\"ghost\" type=\"submit\">Continue with Google</button></form>\
<p class=\"alt\">{}</p></section>",
        ui::escape(title),
        ui::error_banner(error),
        action,
        ui::escape(submit_label),
        if action == "/signup" { "signup" } else { "login" },
        alt_html
    )
}

/// Pose les quatre cookies de session puis redirige vers le dashboard
fn login_redirect(user_id: &str, email: &str, secure: bool) -> HttpResponse {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, "/dashboard"));
    for cookie in session_cookies(user_id, &display_name_from_email(email), email, "", secure) {
        builder.cookie(cookie);
    }
    builder.finish()
}

#[get("/login")]
pub async fn login_page(
    session: Option<SessionUser>,
    query: web::Query<AuthPageQuery>,
) -> HttpResponse {
    if session.is_some() {
        return ui::redirect("/dashboard");
    }
    let body = auth_card(
        "Welcome back",
        "/login",
        "Log in",
        "New here? <a href=\"/signup\">Create an account</a>",
        query.error.as_deref(),
    );
    ui::marketing_page("Log in", &body)
}

#[post("/login")]
pub async fn login_submit(
    form: web::Form<EmailForm>,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
) -> HttpResponse {
    let email = form.email.as_deref().unwrap_or("").trim().to_string();
    if email.is_empty() {
        return ui::redirect_with_error("/login", "Please enter your email");
    }

    match backend.mock_login(Some(&email)).await {
        Ok(user_id) => login_redirect(&user_id, &email, config.cookie_secure),
        Err(AppError::UpstreamStatus { status: 404, .. }) => {
            ui::redirect_with_error("/login", "Account not found. Please sign up first")
        }
        Err(err) => {
            tracing::warn!("mock login failed: {}", err);
            ui::redirect_with_error("/login", &err.display_message())
        }
    }
}

#[get("/signup")]
pub async fn signup_page(
    session: Option<SessionUser>,
    query: web::Query<AuthPageQuery>,
) -> HttpResponse {
    if session.is_some() {
        return ui::redirect("/dashboard");
    }
    let body = auth_card(
        "Create your account",
        "/signup",
        "Sign up",
        "Already registered? <a href=\"/login\">Log in</a>",
        query.error.as_deref(),
    );
    ui::marketing_page("Sign up", &body)
}

#[post("/signup")]
pub async fn signup_submit(
    form: web::Form<EmailForm>,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
) -> HttpResponse {
    let email = form.email.as_deref().unwrap_or("").trim().to_string();
    if email.is_empty() {
        return ui::redirect_with_error("/signup", "Please enter your email");
    }

    match backend.mock_signup(&email).await {
        Ok(user_id) => login_redirect(&user_id, &email, config.cookie_secure),
        Err(AppError::UpstreamStatus { status: 409, .. }) => {
            ui::redirect_with_error("/signup", "Account already exists. Please login")
        }
        Err(err) => {
            tracing::warn!("mock signup failed: {}", err);
            ui::redirect_with_error("/signup", &err.display_message())
        }
    }
}

/// Parcours Google mock: login d'abord, création de compte en secours
#[post("/auth/google")]
pub async fn google_auth(
    form: web::Form<GoogleForm>,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
) -> HttpResponse {
    let origin_page = match form.from.as_deref() {
        Some("signup") => "/signup",
        _ => "/login",
    };

    let user_id = match backend.mock_login(Some(GOOGLE_MOCK_EMAIL)).await {
        Ok(user_id) => Some(user_id),
        Err(_) => backend.mock_signup(GOOGLE_MOCK_EMAIL).await.ok(),
    };

    match user_id {
        Some(user_id) => login_redirect(&user_id, GOOGLE_MOCK_EMAIL, config.cookie_secure),
        None => ui::redirect_with_error(origin_page, "Google sign-in failed. Please try again"),
    }
}

#[post("/logout")]
pub async fn logout() -> HttpResponse {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, "/login"));
    for cookie in removal_cookies() {
        builder.cookie(cookie);
    }
    builder.finish()
}

/// Met à jour les cookies d'affichage de la session (nom, email, avatar).
/// Utilisé après la sauvegarde du profil.
#[post("/session")]
pub async fn update_session(
    _session: SessionUser,
    body: web::Bytes,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let payload: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|_| AppError::Validation("Invalid session payload".to_string()))?;
    if !payload.is_object() {
        return Err(AppError::Validation("Invalid session payload".to_string()));
    }

    let mut builder = HttpResponse::Ok();
    for (cookie_name, key) in [
        (NAME_COOKIE, "name"),
        (EMAIL_COOKIE, "email"),
        (AVATAR_COOKIE, "avatarUrl"),
    ] {
        if let Some(value) = payload.get(key).and_then(|v| v.as_str()) {
            builder.cookie(crate::core::session::display_cookie(
                cookie_name,
                value,
                config.cookie_secure,
            ));
        }
    }

    Ok(builder.json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::utils::config::Config;

    pub fn test_config() -> Config {
        Config {
            run_mode: "development".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            workers: 1,
            log_level: "info".to_string(),
            logging_format: "compact".to_string(),
            api_base_url: "http://localhost:8000".to_string(),
            api_timeout_seconds: 5,
            cookie_secure: false,
            static_dir: "./static".to_string(),
            poll_interval_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::test_config;
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    macro_rules! test_app {
        ($server:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(BackendClient::new(&$server.uri(), 5)))
                    .app_data(web::Data::new(test_config()))
                    .service(login_page)
                    .service(login_submit)
                    .service(signup_page)
                    .service(signup_submit)
                    .service(google_auth)
                    .service(logout)
                    .service(update_session),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_login_sets_cookies_and_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/mock-login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "user_id": "user-7" })),
            )
            .mount(&server)
            .await;

        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "ravi.kumar@example.in")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/dashboard");

        let cookies: Vec<_> = resp.response().cookies().collect();
        let user = cookies.iter().find(|c| c.name() == "vidyo_user_id").unwrap();
        assert_eq!(user.value(), "user-7");
        let name = cookies
            .iter()
            .find(|c| c.name() == "vidyo_user_name")
            .unwrap();
        assert_eq!(name.value(), urlencoding::encode("Ravi Kumar"));
    }

    #[actix_web::test]
    async fn test_login_unknown_account_redirects_with_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/mock-login"))
            .respond_with(ResponseTemplate::new(404).set_body_string("User not found"))
            .mount(&server)
            .await;

        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "ghost@example.in")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let location = resp
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.starts_with("/login?error="));
        assert!(location.contains("sign%20up"));
    }

    #[actix_web::test]
    async fn test_login_empty_email_rejected_without_backend_call() {
        let server = MockServer::start().await;
        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "   ")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        let location = resp
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(location, "/login?error=Please%20enter%20your%20email");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_signup_conflict_redirects_to_login_hint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/mock-signup"))
            .respond_with(ResponseTemplate::new(409).set_body_string("Email already registered"))
            .mount(&server)
            .await;

        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/signup")
            .set_form([("email", "taken@example.in")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        let location = resp
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.contains("Account%20already%20exists"));
    }

    #[actix_web::test]
    async fn test_google_falls_back_to_signup() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/mock-login"))
            .respond_with(ResponseTemplate::new(404).set_body_string("User not found"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/mock-signup"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({ "user_id": "user-g" })),
            )
            .mount(&server)
            .await;

        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/auth/google")
            .set_form([("from", "login")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/dashboard");
    }

    #[actix_web::test]
    async fn test_logout_expires_cookies() {
        let server = MockServer::start().await;
        let app = test_app!(server);
        let req = test::TestRequest::post().uri("/logout").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
        let expired = resp
            .response()
            .cookies()
            .filter(|c| c.value().is_empty())
            .count();
        assert_eq!(expired, 4);
    }

    #[actix_web::test]
    async fn test_login_page_redirects_when_already_authenticated() {
        let server = MockServer::start().await;
        let app = test_app!(server);
        let req = test::TestRequest::get()
            .uri("/login")
            .cookie(actix_web::cookie::Cookie::new("vidyo_user_id", "u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/dashboard");
    }

    #[actix_web::test]
    async fn test_session_update_sets_display_cookies() {
        let server = MockServer::start().await;
        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/session")
            .cookie(actix_web::cookie::Cookie::new("vidyo_user_id", "u1"))
            .set_json(serde_json::json!({ "name": "New Name", "avatarUrl": "https://cdn/x.png" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let cookies: Vec<_> = resp.response().cookies().collect();
        assert!(cookies.iter().any(|c| c.name() == "vidyo_user_name"));
        assert!(cookies.iter().any(|c| c.name() == "vidyo_user_avatar"));
        assert!(!cookies.iter().any(|c| c.name() == "vidyo_user_email"));
    }

    #[actix_web::test]
    async fn test_session_update_rejects_non_object_payload() {
        let server = MockServer::start().await;
        let app = test_app!(server);
        let req = test::TestRequest::post()
            .uri("/session")
            .cookie(actix_web::cookie::Cookie::new("vidyo_user_id", "u1"))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("[1,2,3]")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
