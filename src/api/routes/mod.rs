// api/routes/mod.rs
pub mod account;
pub mod auth;
pub mod create;
pub mod credits;
pub mod dashboard;
pub mod download;
pub mod editor;
pub mod images;
pub mod pages;
pub mod projects;
pub mod renders;
pub mod videos;
