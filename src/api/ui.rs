// api/ui.rs
//
// Gabarit HTML commun aux pages. Pas de moteur de templates: les pages sont
// de petites chaînes assemblées dans les handlers, le gabarit ne porte que la
// coquille (head, nav, footer) et les helpers d'échappement.
use crate::core::SessionDisplay;
use actix_web::http::header;
use actix_web::HttpResponse;

/// Échappe une valeur interpolée dans du HTML
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Liens de la navigation authentifiée
const NAV_LINKS: [(&str, &str); 6] = [
    ("/dashboard", "Dashboard"),
    ("/projects", "Projects"),
    ("/create", "Create"),
    ("/images", "Images"),
    ("/credits/history", "Credits"),
    ("/profile", "Account"),
];

/// Liens du pied de page marketing
const FOOTER_LINKS: [(&str, &str); 6] = [
    ("/platform", "Platform"),
    ("/pricing", "Pricing"),
    ("/business", "Business"),
    ("/company", "Company"),
    ("/use-cases", "Use Cases"),
    ("/learning", "Learning"),
];

fn head(title: &str, extra_scripts: &[&str]) -> String {
    let scripts: String = extra_scripts
        .iter()
        .map(|src| format!("<script defer src=\"{}\"></script>", src))
        .collect();
    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{} · VidyoBharat</title>\
<link rel=\"stylesheet\" href=\"/static/css/app.css\">{}</head>",
        escape(title),
        scripts
    )
}

fn top_nav(active: &str, display: &SessionDisplay) -> String {
    let links: String = NAV_LINKS
        .iter()
        .map(|(href, label)| {
            let class = if *href == active { " class=\"active\"" } else { "" };
            format!("<a href=\"{}\"{}>{}</a>", href, class, label)
        })
        .collect();
    let who = display
        .name
        .as_deref()
        .or(display.email.as_deref())
        .unwrap_or("Account");
    format!(
        "<header class=\"topnav\"><a class=\"brand\" href=\"/dashboard\">VidyoBharat</a>\
<nav>{}</nav>\
<div class=\"session\"><span>{}</span>\
<form method=\"post\" action=\"/logout\"><button class=\"ghost\" type=\"submit\">Log out</button></form>\
</div></header>",
        links,
        escape(who)
    )
}

fn marketing_footer() -> String {
    let links: String = FOOTER_LINKS
        .iter()
        .map(|(href, label)| format!("<a href=\"{}\">{}</a>", href, label))
        .collect();
    format!(
        "<footer class=\"footer\"><div class=\"footer-links\">{}</div>\
<p>Made with pride in India 🇮🇳 · © VidyoBharat</p></footer>",
        links
    )
}

/// Page marketing (coquille publique avec footer)
pub fn marketing_page(title: &str, body: &str) -> HttpResponse {
    let html = format!(
        "{}<body class=\"marketing\"><header class=\"topnav\">\
<a class=\"brand\" href=\"/\">VidyoBharat</a>\
<nav><a href=\"/pricing\">Pricing</a><a href=\"/platform\">Platform</a>\
<a href=\"/login\">Log in</a><a class=\"cta\" href=\"/signup\">Get started</a></nav>\
</header><main>{}</main>{}</body></html>",
        head(title, &[]),
        body,
        marketing_footer()
    );
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html)
}

/// Page applicative (coquille authentifiée avec top-nav)
pub fn app_page(
    title: &str,
    active: &str,
    display: &SessionDisplay,
    scripts: &[&str],
    body: &str,
) -> HttpResponse {
    let html = format!(
        "{}<body>{}<main class=\"app\">{}</main></body></html>",
        head(title, scripts),
        top_nav(active, display),
        body
    );
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html)
}

/// Redirection 303 (après POST)
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

/// Redirection vers `path?error=...`
pub fn redirect_with_error(path: &str, message: &str) -> HttpResponse {
    redirect(&format!("{}?error={}", path, urlencoding::encode(message)))
}

/// Bandeau d'erreur inline (toutes les erreurs finissent en chaîne affichée)
pub fn error_banner(message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => {
            format!("<p class=\"error\">{}</p>", escape(message))
        }
        _ => String::new(),
    }
}

/// Bandeau de confirmation (`?saved=1` etc.)
pub fn notice_banner(message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => {
            format!("<p class=\"notice\">{}</p>", escape(message))
        }
        _ => String::new(),
    }
}

/// Badge de statut d'un job (render/vidéo)
pub fn status_badge(status: &str) -> String {
    format!(
        "<span class=\"badge badge-{}\" data-status-badge>{}</span>",
        escape(status),
        escape(status)
    )
}
