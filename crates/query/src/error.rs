/// Errors raised while turning request parameters into a listing query.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QueryError {
    #[error("unknown sort order: {0}")]
    InvalidSort(String),
    #[error("invalid boolean for {param}: {value}")]
    InvalidFlag { param: String, value: String },
    #[error("invalid number for {param}: {value}")]
    InvalidNumber { param: String, value: String },
}
