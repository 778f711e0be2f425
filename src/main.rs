use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::env;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidyo_web::services::BackendClient;
use vidyo_web::utils::config::Config;
use vidyo_web::{api, NAME};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialisation du logging
    setup_tracing();
    info!("🚀 Démarrage de {}", NAME);

    // Chargement de la configuration
    let config = Config::from_env().expect("❌ Impossible de charger la configuration");
    info!("✅ Configuration chargée avec succès");
    info!("🔧 Mode: {}", config.run_mode);
    info!("🔗 API backend: {}", config.api_base_url);

    // Client HTTP vers le backend (partagé par tous les workers)
    let backend = BackendClient::new(&config.api_base_url, config.api_timeout_seconds);

    let bind_addr = format!("{}:{}", config.server_host, config.server_port);
    let workers = config.workers;
    let static_dir = config.static_dir.clone();
    let app_config = web::Data::new(config);
    let app_backend = web::Data::new(backend);

    // Configuration du serveur Actix-Web
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .app_data(app_config.clone())
            .app_data(app_backend.clone())
            .configure(api::config)
            .service(actix_files::Files::new("/static", static_dir.clone()))
    })
    .bind(&bind_addr)?
    .workers(workers)
    .shutdown_timeout(10);

    info!("✅ Frontend démarré avec succès!");
    info!("🔗 Application disponible sur http://{}", bind_addr);

    server.run().await
}

/// Configure le tracing pour le logging structuré
fn setup_tracing() {
    let log_level = env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".into())
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".into());

    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with(if log_format == "json" {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(true),
            ) as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        } else {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_line_number(true)
                    .with_file(true),
            ) as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        });

    subscriber.init();
}
