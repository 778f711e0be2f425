// core/session.rs
//
// Couche session: l'identité est un jeu de cookies posés au login et lus par
// toutes les pages. Pas de token local, l'id utilisateur est opaque et
// simplement relayé au backend dans l'en-tête X-User-ID.
use crate::utils::error::AppError;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

pub const USER_COOKIE: &str = "vidyo_user_id";
pub const NAME_COOKIE: &str = "vidyo_user_name";
pub const EMAIL_COOKIE: &str = "vidyo_user_email";
pub const AVATAR_COOKIE: &str = "vidyo_user_avatar";

/// Utilisateur connecté, extrait du cookie d'identité.
///
/// En extracteur direct il renvoie 401 ; les handlers de pages l'utilisent en
/// `Option<SessionUser>` et redirigent vers /login quand il est absent.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
}

impl FromRequest for SessionUser {
    type Error = AppError;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req
            .cookie(USER_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty());

        match user_id {
            Some(user_id) => ready(Ok(SessionUser { user_id })),
            None => ready(Err(AppError::Unauthorized)),
        }
    }
}

/// Informations d'affichage (nav, pages compte), meilleures-effort
#[derive(Debug, Clone, Default)]
pub struct SessionDisplay {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl SessionDisplay {
    pub fn from_request(req: &HttpRequest) -> Self {
        let read = |name: &str| {
            req.cookie(name)
                .map(|cookie| cookie.value().to_string())
                .and_then(|value| {
                    urlencoding::decode(&value)
                        .map(|decoded| decoded.into_owned())
                        .ok()
                })
                .filter(|value| !value.is_empty())
        };
        Self {
            name: read(NAME_COOKIE),
            email: read(EMAIL_COOKIE),
            avatar_url: read(AVATAR_COOKIE),
        }
    }
}

/// Cookie d'identité (http-only: seul le serveur dérive X-User-ID)
pub fn user_cookie(user_id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(USER_COOKIE, user_id.to_string())
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(true)
        .secure(secure)
        .finish()
}

/// Cookie d'affichage (nom, email, avatar), lisible par les pages
pub fn display_cookie(name: &'static str, value: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(name, urlencoding::encode(value).into_owned())
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(false)
        .secure(secure)
        .finish()
}

/// Les quatre cookies posés après un login/signup réussi
pub fn session_cookies(
    user_id: &str,
    name: &str,
    email: &str,
    avatar_url: &str,
    secure: bool,
) -> Vec<Cookie<'static>> {
    vec![
        user_cookie(user_id, secure),
        display_cookie(NAME_COOKIE, name, secure),
        display_cookie(EMAIL_COOKIE, email, secure),
        display_cookie(AVATAR_COOKIE, avatar_url, secure),
    ]
}

/// Cookies d'expiration posés au logout
pub fn removal_cookies() -> Vec<Cookie<'static>> {
    [USER_COOKIE, NAME_COOKIE, EMAIL_COOKIE, AVATAR_COOKIE]
        .into_iter()
        .map(|name| {
            let mut cookie = Cookie::new(name, "");
            cookie.set_path("/");
            cookie.make_removal();
            cookie
        })
        .collect()
}

/// Dérive un nom affichable depuis un email: "jane.doe@x" -> "Jane Doe"
pub fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or("");
    let cleaned: Vec<String> = local
        .split(['.', '_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    if cleaned.is_empty() {
        "User".to_string()
    } else {
        cleaned.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_session_user_round_trip() {
        let cookie = user_cookie("user-123", false);
        let req = TestRequest::default().cookie(cookie).to_http_request();
        let user = SessionUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(user.user_id, "user-123");
    }

    #[actix_web::test]
    async fn test_missing_cookie_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let result = SessionUser::from_request(&req, &mut Payload::None).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[actix_web::test]
    async fn test_empty_cookie_is_unauthorized() {
        let req = TestRequest::default()
            .cookie(Cookie::new(USER_COOKIE, ""))
            .to_http_request();
        let result = SessionUser::from_request(&req, &mut Payload::None).await;
        assert!(result.is_err());
    }

    #[actix_web::test]
    async fn test_display_cookie_round_trips_spaces() {
        let cookie = display_cookie(NAME_COOKIE, "Jane Doe", false);
        let req = TestRequest::default().cookie(cookie).to_http_request();
        let display = SessionDisplay::from_request(&req);
        assert_eq!(display.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_display_name_from_email() {
        assert_eq!(display_name_from_email("jane.doe@example.com"), "Jane Doe");
        assert_eq!(display_name_from_email("ravi_kumar@x.in"), "Ravi Kumar");
        assert_eq!(display_name_from_email("solo@x.in"), "Solo");
        assert_eq!(display_name_from_email("@x.in"), "User");
        assert_eq!(display_name_from_email("..@x.in"), "User");
    }

    #[test]
    fn test_user_cookie_attributes() {
        let cookie = user_cookie("u1", true);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }
}
