pub mod apply;
pub mod types;

pub use apply::{apply_patch, MutationError};
pub use types::{InsertOperation, MutationResult, PatchOperations};
