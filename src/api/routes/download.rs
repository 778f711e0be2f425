// api/routes/download.rs
//
// Proxy de téléchargement: sert un fichier du backend avec un nom propre et
// un Content-Disposition attachment. Seule l'origine de l'API configurée est
// autorisée, pour fermer la porte aux redirections ouvertes et au SSRF via le
// lien de téléchargement.
use actix_web::http::header;
use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use url::Url;

use crate::services::BackendClient;
use crate::utils::config::Config;
use crate::utils::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub url: Option<String>,
    pub filename: Option<String>,
}

/// Nettoie un nom de fichier demandé: seuls [a-zA-Z0-9._-] survivent,
/// les tirets sont dédupliqués et taillés, défaut "download".
pub fn sanitize_filename(value: Option<&str>) -> String {
    let raw = value.unwrap_or("download");
    let mapped: String = raw
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '-'
            }
        })
        .collect();

    let mut collapsed = String::with_capacity(mapped.len());
    for ch in mapped.chars() {
        if ch == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(ch);
    }

    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        "download".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Valide l'URL demandée: http(s) uniquement, et même origine que l'API
/// configurée quand une origine est fournie.
pub fn validate_download_url(raw: &str, configured_origin: Option<&str>) -> Result<Url> {
    let parsed = Url::parse(raw).map_err(|_| AppError::Validation("Invalid url".to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::Validation("Unsupported protocol".to_string()));
    }

    if let Some(origin) = configured_origin {
        if parsed.origin().ascii_serialization() != origin {
            return Err(AppError::BlockedOrigin);
        }
    }

    Ok(parsed)
}

/// Extension déduite du Content-Type amont
fn extension_for(content_type: &str) -> &'static str {
    if content_type.contains("mp4") {
        ".mp4"
    } else if content_type.contains("webm") {
        ".webm"
    } else if content_type.contains("png") {
        ".png"
    } else if content_type.contains("jpeg") {
        ".jpg"
    } else {
        ""
    }
}

#[get("/download")]
pub async fn download(
    query: web::Query<DownloadQuery>,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let raw_url = query
        .url
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Validation("Missing url".to_string()))?;
    let filename = sanitize_filename(query.filename.as_deref());

    // api_base_url est toujours posée; ne pas pouvoir en tirer une origine est
    // une erreur de configuration, pas une raison de désactiver le contrôle.
    let origin = config.api_origin().ok_or(AppError::Internal)?;
    let target = validate_download_url(raw_url, Some(&origin))?;

    let upstream = backend.fetch_raw(target.as_str()).await?;
    let status = upstream.status();
    if !status.is_success() {
        return Err(AppError::UpstreamStatus {
            status: status.as_u16(),
            body: format!("Upstream download failed ({})", status.as_u16()),
        });
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let extension = extension_for(&content_type);
    let attachment_name = if extension.is_empty() || filename.ends_with(extension) {
        filename
    } else {
        format!("{}{}", filename, extension)
    };

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", attachment_name),
        ))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .streaming(upstream.bytes_stream()))
}
