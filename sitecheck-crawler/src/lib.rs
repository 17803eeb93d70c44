pub mod crawler;
pub mod error;
pub mod fetch;
pub mod frontier;
pub mod limiter;
pub mod page;
pub mod parse;
pub mod robots;
pub mod urls;

pub use crawler::{CrawlOutcome, Crawler, ProgressCallback, SkippedUrl};
pub use error::CrawlError;
pub use page::{FetchFailure, Image, Link, Page};
pub use robots::RobotsPolicy;
