//! HTTP client for the sitedesk content API.
//!
//! [`SiteClient`] wraps each endpoint with a typed call; failures come back
//! as [`ClientError`] with the server's message. There are no retries.
//! [`HttpContentStore`] adapts the client to the core `ContentStore` trait.

pub mod client;
pub mod config;
pub mod error;
pub mod store;

pub use client::{CsvExport, LoginResponse, PageSnippets, SiteClient};
pub use config::ClientConfig;
pub use error::ClientError;
pub use store::HttpContentStore;
