pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;

pub use client::HttpFetcher;
pub use errors::{FetchError, FetchErrorKind};
pub use types::{PageResponse, PageSource};
