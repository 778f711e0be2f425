// utils/error.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Erreurs d'authentification
    #[error("Authentication required")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    // Erreurs de données
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    // Erreurs de ressources
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Insufficient credits")]
    InsufficientCredits,

    // Erreurs du proxy de téléchargement
    #[error("Blocked origin")]
    BlockedOrigin,

    // Erreurs de l'API backend
    #[error("Backend error ({status}): {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Backend unreachable: {0}")]
    Upstream(String),

    // Erreurs système
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Message court destiné à l'affichage dans les pages.
    /// Tout est aplati en une chaîne, comme côté UI.
    pub fn display_message(&self) -> String {
        match self {
            AppError::UpstreamStatus { body, .. } if !body.is_empty() => body.clone(),
            AppError::Upstream(_) => "The service is unreachable. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            // 400 - Bad Request
            AppError::Validation(_) | AppError::BlockedOrigin => {
                HttpResponse::BadRequest().json(json!({
                    "error": self.to_string(),
                    "code": "BAD_REQUEST"
                }))
            }

            // 401 - Unauthorized
            AppError::Unauthorized => HttpResponse::Unauthorized().json(json!({
                "error": self.to_string(),
                "code": "UNAUTHORIZED"
            })),

            // 402 - Payment Required
            AppError::InsufficientCredits => HttpResponse::PaymentRequired().json(json!({
                "error": self.to_string(),
                "code": "PAYMENT_REQUIRED"
            })),

            // 403 - Forbidden
            AppError::Forbidden => HttpResponse::Forbidden().json(json!({
                "error": self.to_string(),
                "code": "FORBIDDEN"
            })),

            // 404 - Not Found
            AppError::NotFound(_) => HttpResponse::NotFound().json(json!({
                "error": self.to_string(),
                "code": "NOT_FOUND"
            })),

            // 409 - Conflict
            AppError::Conflict(_) => HttpResponse::Conflict().json(json!({
                "error": self.to_string(),
                "code": "CONFLICT"
            })),

            // Le statut du backend est relayé tel quel
            AppError::UpstreamStatus { status, body } => {
                let code = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
                HttpResponse::build(code).json(json!({
                    "error": if body.is_empty() { "Request failed".to_string() } else { body.clone() },
                    "code": "UPSTREAM_ERROR"
                }))
            }

            // 502 - Bad Gateway
            AppError::Upstream(_) | AppError::Parse(_) => {
                tracing::error!("Backend failure: {}", self);
                HttpResponse::BadGateway().json(json!({
                    "error": "Backend unavailable",
                    "code": "UPSTREAM_UNAVAILABLE"
                }))
            }

            // 500 - Internal Server Error
            AppError::Internal => {
                tracing::error!("Internal server error: {}", self);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error",
                    "code": "INTERNAL_ERROR"
                }))
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Parse(err.to_string())
        } else {
            AppError::Upstream(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let error_messages: Vec<String> = errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect();

        AppError::Validation(messages.join("; "))
    }
}

// Type de résultat standard
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_is_relayed() {
        let err = AppError::UpstreamStatus {
            status: 404,
            body: "Project not found".to_string(),
        };
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unknown_upstream_status_falls_back_to_bad_gateway() {
        let err = AppError::UpstreamStatus {
            status: 7,
            body: String::new(),
        };
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_display_message_prefers_backend_body() {
        let err = AppError::UpstreamStatus {
            status: 409,
            body: "Account already exists".to_string(),
        };
        assert_eq!(err.display_message(), "Account already exists");
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let resp = AppError::Validation("script: required".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
