//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CategoryLink` / `ThemeLink`: the links the crawler walks, tagged by `LinkKind`
//! - `PrefixVisitedSet`: prefix-sharing set used to skip already-expanded pages

mod link;
mod visited;

// Re-export main types
pub use link::{CategoryLink, LinkKind, ThemeLink, UNKNOWN_GRAMMAR_CATEGORY};
pub use visited::PrefixVisitedSet;
