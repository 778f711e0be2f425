pub mod routes;
pub mod ui;

use actix_web::web;

/// Configure toutes les routes de l'application
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        // Pages marketing publiques
        .service(routes::pages::landing)
        .service(routes::pages::pricing)
        .service(routes::pages::platform)
        .service(routes::pages::business)
        .service(routes::pages::company)
        .service(routes::pages::use_cases)
        .service(routes::pages::learning)
        // Authentification
        .service(routes::auth::login_page)
        .service(routes::auth::login_submit)
        .service(routes::auth::signup_page)
        .service(routes::auth::signup_submit)
        .service(routes::auth::google_auth)
        .service(routes::auth::logout)
        .service(routes::auth::update_session)
        // Dashboard et projets
        .service(routes::dashboard::dashboard)
        .service(routes::projects::projects_page)
        .service(routes::projects::create_project)
        .service(routes::editor::editor_page)
        .service(routes::editor::save_project)
        .service(routes::editor::start_render)
        // Wizard de création
        .service(routes::create::create_entry)
        .service(routes::create::choose_page)
        .service(routes::create::choose_submit)
        .service(routes::create::avatar_page)
        .service(routes::create::avatar_submit)
        .service(routes::create::template_page)
        .service(routes::create::template_submit)
        .service(routes::create::script_page)
        .service(routes::create::script_submit)
        .service(routes::create::generate_script)
        .service(routes::create::customize_page)
        .service(routes::create::customize_submit)
        .service(routes::create::add_asset)
        .service(routes::create::remove_asset)
        .service(routes::create::confirm_page)
        .service(routes::create::confirm_submit)
        // Suivi des jobs (pages + endpoints de polling)
        .service(routes::renders::render_status_page)
        .service(routes::renders::render_poll)
        .service(routes::videos::video_detail_page)
        .service(routes::videos::retry_video)
        .service(routes::videos::video_poll)
        // Studio d'images
        .service(routes::images::studio_page)
        .service(routes::images::generate_image)
        .service(routes::images::apply_action)
        .service(routes::images::enhance_prompt)
        // Compte et crédits
        .service(routes::account::profile_page)
        .service(routes::account::save_profile)
        .service(routes::account::settings_page)
        .service(routes::account::save_settings)
        .service(routes::credits::credits_history_page)
        // Proxy de téléchargement
        .service(routes::download::download);

    // Endpoint de santé
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
}

/// Endpoint de santé pour monitoring
async fn health_check() -> impl actix_web::Responder {
    actix_web::HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("RUN_MODE").unwrap_or_else(|_| "production".to_string())
    }))
}
