// core/mod.rs
pub mod credits;
pub mod draft;
pub mod session;

// Ré-exports pour faciliter l'import
pub use credits::estimate_credits;
pub use draft::{draft_cookie, read_draft, DRAFT_COOKIE};
pub use session::{
    display_name_from_email, removal_cookies, session_cookies, SessionDisplay, SessionUser,
    AVATAR_COOKIE, EMAIL_COOKIE, NAME_COOKIE, USER_COOKIE,
};
