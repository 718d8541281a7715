//! Generic filtering, sorting and paging for listing pages.
//!
//! Records expose named fields through [`Record`]; a [`FilterSchema`]
//! declares which request parameters filter which fields, and a
//! [`ListQuery`] runs filter → sort → page over an in-memory slice.

pub mod error;
pub mod listing;
pub mod page;
pub mod predicate;
pub mod record;
pub mod schema;
pub mod sort;

pub use error::QueryError;
pub use listing::{ListQuery, Listing};
pub use page::PageRequest;
pub use predicate::{Predicate, Scalar};
pub use record::{FieldValue, Record};
pub use schema::{FilterField, FilterKind, FilterSchema};
pub use sort::{SortFields, SortOrder};
