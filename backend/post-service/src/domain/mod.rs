pub mod models;
pub mod pagination;

pub use models::{comment_length, Comment, Post, MAX_COMMENT_LENGTH};
pub use pagination::{OutOfRangePolicy, PageRequest, ALL_RESULTS_SENTINEL};
