pub mod backoff;
pub mod block;
pub mod client;
pub mod error;
pub mod headers;
pub mod normalize;
pub mod parse;
pub mod pipeline;
pub mod types;

pub use backoff::BackoffSchedule;
pub use block::is_block_page;
pub use client::ProfileClient;
pub use error::{FetchError, FetchErrorKind, ScrapeError};
pub use normalize::{
    feedback, normalize, normalize_with, validate_profile_url, NormalizeOptions, NormalizedUrl,
};
pub use parse::extract;
pub use pipeline::ProfileScraper;
pub use types::{FetchOutcome, FetchRoute, FetchedPage};
