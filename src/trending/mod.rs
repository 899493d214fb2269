//! Trending articles
//!
//! - `source.rs` - The trending API behind a trait, with an HTTP implementation
//! - `cache.rs` - Per-category cache with a freshness window and refresh

pub mod cache;
pub mod source;

pub use cache::{FetchOutcome, FetchTicket, TrendingCache, TrendingCacheEntry, TrendingLoad};
pub use source::{HttpTrendingSource, TrendingSource};
