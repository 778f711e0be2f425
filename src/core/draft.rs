// core/draft.rs
//
// Persistance du brouillon du wizard. Le brouillon reste côté client (cookie
// JSON encodé) et n'atteint le backend qu'à la confirmation finale.
use crate::models::CreateDraft;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;

pub const DRAFT_COOKIE: &str = "vidyo_create_draft";

/// Lit le brouillon depuis le cookie.
/// Cookie absent, illisible ou partiel: on retombe champ par champ sur les
/// valeurs par défaut, jamais d'erreur remontée à l'utilisateur.
pub fn read_draft(req: &HttpRequest) -> CreateDraft {
    let Some(cookie) = req.cookie(DRAFT_COOKIE) else {
        return CreateDraft::default();
    };
    let Ok(raw) = urlencoding::decode(cookie.value()) else {
        return CreateDraft::default();
    };
    serde_json::from_str(&raw).unwrap_or_default()
}

/// Sérialise le brouillon dans son cookie
pub fn draft_cookie(draft: &CreateDraft, secure: bool) -> Cookie<'static> {
    let json = serde_json::to_string(draft).unwrap_or_else(|_| "{}".to_string());
    Cookie::build(DRAFT_COOKIE, urlencoding::encode(&json).into_owned())
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(true)
        .secure(secure)
        .finish()
}

/// Cookie d'expiration posé au reset du wizard
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(DRAFT_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreationType, DraftAsset};
    use actix_web::test::TestRequest;

    #[test]
    fn test_draft_cookie_round_trip() {
        let mut draft = CreateDraft {
            creation_type: Some(CreationType::Template),
            template_id: Some("edu-modern".to_string()),
            script: "Namaste! Here is today's lesson.".to_string(),
            ..CreateDraft::default()
        };
        draft.add_asset(DraftAsset {
            id: "a1".to_string(),
            filename: "logo.png".to_string(),
            kind: "logo".to_string(),
        });

        let cookie = draft_cookie(&draft, false);
        let req = TestRequest::default().cookie(cookie).to_http_request();
        let restored = read_draft(&req);
        assert_eq!(restored, draft);
    }

    #[test]
    fn test_missing_cookie_gives_default() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(read_draft(&req), CreateDraft::default());
    }

    #[test]
    fn test_garbage_cookie_gives_default() {
        let req = TestRequest::default()
            .cookie(Cookie::new(DRAFT_COOKIE, "%7Bnot-json"))
            .to_http_request();
        assert_eq!(read_draft(&req), CreateDraft::default());
    }

    #[test]
    fn test_partial_cookie_keeps_defaults_for_missing_fields() {
        let json = urlencoding::encode(r#"{"script":"hello"}"#).into_owned();
        let req = TestRequest::default()
            .cookie(Cookie::new(DRAFT_COOKIE, json))
            .to_http_request();
        let draft = read_draft(&req);
        assert_eq!(draft.script, "hello");
        assert_eq!(draft.voice, "Aarav");
        assert!(draft.captions_enabled);
    }
}
