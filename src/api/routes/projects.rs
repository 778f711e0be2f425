// api/routes/projects.rs
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::api::ui;
use crate::core::{SessionDisplay, SessionUser};
use crate::services::{BackendClient, NewProjectPayload};
use crate::utils::error::AppError;

/// Valide qu'un champ n'est pas composé uniquement d'espaces
fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("not_blank");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewProjectForm {
    #[validate(custom = "validate_not_blank")]
    pub title: String,
    #[validate(custom = "validate_not_blank")]
    pub script: String,
    pub language: Option<String>,
    pub voice: Option<String>,
    pub template: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectsQuery {
    pub error: Option<String>,
}

#[get("/projects")]
pub async fn projects_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    query: web::Query<ProjectsQuery>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let display = SessionDisplay::from_request(&req);

    let list_html = match backend.list_projects(&session.user_id).await {
        Ok(projects) if projects.is_empty() => {
            "<p class=\"empty-state\">No projects yet. Create one below.</p>".to_string()
        }
        Ok(projects) => {
            let rows: String = projects
                .iter()
                .map(|project| {
                    format!(
                        "<tr><td><a href=\"/editor/{id}\">{title}</a></td>\
<td>{language}</td><td>{voice}</td><td>{created}</td>\
<td><a class=\"ghost\" href=\"/editor/{id}\">Open editor</a></td></tr>",
                        id = ui::escape(&project.id),
                        title = ui::escape(&project.title),
                        language = ui::escape(&project.language),
                        voice = ui::escape(&project.voice),
                        created = project.created_at.format("%d %b %Y"),
                    )
                })
                .collect();
            format!(
                "<table class=\"table\"><thead><tr><th>Title</th><th>Language</th>\
<th>Voice</th><th>Created</th><th></th></tr></thead><tbody>{}</tbody></table>",
                rows
            )
        }
        Err(err) => ui::error_banner(Some(&err.display_message())),
    };

    let body = format!(
        "<div class=\"page-head\"><h1>Projects</h1></div>{error}{list}\
<section class=\"card form-card\"><h2>New project</h2>\
<form method=\"post\" action=\"/projects\">\
<label for=\"title\">Title</label>\
<input id=\"title\" name=\"title\" placeholder=\"Diwali promo\">\
<label for=\"script\">Script</label>\
<textarea id=\"script\" name=\"script\" rows=\"6\" placeholder=\"Namaste! ...\"></textarea>\
<div class=\"form-row\">\
<select name=\"language\"><option value=\"hi-IN\">Hindi</option>\
<option value=\"en-IN\">English (India)</option></select>\
<select name=\"voice\"><option value=\"Aarav\">Aarav</option>\
<option value=\"Ishita\">Ishita</option></select>\
<select name=\"template\"><option value=\"clean-corporate\">Clean Corporate</option>\
<option value=\"edu-modern\">Edu Modern</option></select>\
</div>\
<button type=\"submit\">Create project</button></form></section>",
        error = ui::error_banner(query.error.as_deref()),
        list = list_html,
    );

    ui::app_page("Projects", "/projects", &display, &[], &body)
}

#[post("/projects")]
pub async fn create_project(
    session: Option<SessionUser>,
    form: web::Form<NewProjectForm>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };

    if let Err(errors) = form.validate() {
        return ui::redirect_with_error("/projects", &AppError::from(errors).display_message());
    }

    let payload = NewProjectPayload {
        title: form.title.trim().to_string(),
        script: form.script.trim().to_string(),
        language: form
            .language
            .clone()
            .unwrap_or_else(|| "hi-IN".to_string()),
        voice: form.voice.clone().unwrap_or_else(|| "Aarav".to_string()),
        template: form
            .template
            .clone()
            .unwrap_or_else(|| "clean-corporate".to_string()),
    };

    match backend.create_project(&session.user_id, &payload).await {
        Ok(project) => ui::redirect(&format!("/editor/{}", project.id)),
        Err(err) => ui::redirect_with_error("/projects", &err.display_message()),
    }
}
