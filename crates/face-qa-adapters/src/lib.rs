//! Face QA Adapters - External adapters for face-qa.
//!
//! This crate provides adapters for:
//! - Filesystem image discovery and header inspection
//! - Caching raw face-detection responses
//! - A face-attribute provider reading from that cache

pub mod cache;
pub mod fs;
pub mod provider;

pub use cache::{CacheKey, ResponseCache};
pub use fs::{inspect, FsImageSource};
pub use provider::{parse_response, CachedResponseProvider};
