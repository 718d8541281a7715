pub mod kind;
pub mod model;
pub mod validate;

pub use kind::ContentKind;
pub use model::{ContentDocument, NewContentDocument};
pub use validate::ValidationError;
