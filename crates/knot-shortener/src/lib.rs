//! URL shortener service implementation.
//!
//! This crate provides URL normalization and the [`ShortenerService`]
//! that orchestrates the id allocator, store, and lookup cache. Core
//! types are re-exported from `knot_core`.

pub mod normalize;
pub mod service;

pub use normalize::{normalize_url, validate_url};
pub use service::{Shortener, ShortenerService};
