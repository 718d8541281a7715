//! Domain model and services behind the sitedesk content API.

pub mod admin;
pub mod auth;
pub mod content;
pub mod dashboard;
pub mod document;
pub mod events;
pub mod export;
pub mod mutation;
pub mod path;
pub mod seo;
pub mod store;
