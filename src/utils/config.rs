// utils/config.rs
use crate::utils::error::{AppError, Result};
use dotenv::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Environnement et serveur
    pub run_mode: String,
    pub server_host: String,
    pub server_port: u16,
    pub workers: usize,
    pub log_level: String,
    pub logging_format: String,

    // API backend (la seule source de données de l'application)
    pub api_base_url: String,
    pub api_timeout_seconds: u64,

    // Cookies de session
    pub cookie_secure: bool,

    // Fichiers statiques (css/js servis par actix-files)
    pub static_dir: String,

    // Intervalle de polling exposé aux pages (renders / vidéos)
    pub poll_interval_ms: u64,
}

impl Config {
    /// Charger la configuration depuis les variables d'environnement
    pub fn from_env() -> Result<Self> {
        // Charger le fichier .env si présent
        let _ = dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        // L'URL du backend est obligatoire en production. En développement on
        // retombe sur localhost pour garder un poste de dev fonctionnel sans .env.
        let api_base_url = match env::var("API_BASE_URL") {
            Ok(value) if !value.trim().is_empty() => value.trim().trim_end_matches('/').to_string(),
            _ if run_mode == "production" => {
                return Err(AppError::Validation(
                    "Variable d'environnement requise manquante: API_BASE_URL".to_string(),
                ));
            }
            _ => {
                tracing::warn!("API_BASE_URL is not set. Falling back to http://localhost:8000");
                "http://localhost:8000".to_string()
            }
        };

        let config = Config {
            run_mode,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| AppError::Validation("SERVER_PORT must be a number".to_string()))?,
            workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .map_err(|_| AppError::Validation("WORKERS must be a number".to_string()))?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            logging_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),

            api_base_url,
            api_timeout_seconds: env::var("API_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("API_TIMEOUT_SECONDS must be a number".to_string())
                })?,

            cookie_secure: env::var("COOKIE_SECURE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .map_err(|_| AppError::Validation("COOKIE_SECURE must be a boolean".to_string()))?,

            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string()),

            poll_interval_ms: env::var("POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("POLL_INTERVAL_MS must be a number".to_string())
                })?,
        };

        Ok(config)
    }

    /// Origine du backend, utilisée par le proxy de téléchargement
    pub fn api_origin(&self) -> Option<String> {
        url::Url::parse(&self.api_base_url)
            .ok()
            .map(|u| u.origin().ascii_serialization())
    }

    /// Vérifier si on est en production
    pub fn is_production(&self) -> bool {
        self.run_mode == "production"
    }

    /// Vérifier si on est en développement
    pub fn is_development(&self) -> bool {
        self.run_mode == "development"
    }
}
