//! Core types and traits for the knot URL shortener.
//!
//! This crate holds the domain model (short codes, URL records), the
//! storage and cache contracts, and the id allocation machinery shared
//! by the service and transport crates. It performs no I/O itself.

pub mod base62;
pub mod cache;
pub mod error;
pub mod record;
pub mod sequence;
pub mod shortcode;
pub mod store;

pub use cache::LookupCache;
pub use error::{ShortenerError, StoreError};
pub use record::UrlRecord;
pub use sequence::{AtomicSequence, IdAllocator};
pub use shortcode::ShortCode;
pub use store::UrlStore;
