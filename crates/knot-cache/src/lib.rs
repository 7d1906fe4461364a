//! Lookup cache implementations for the knot URL shortener.

pub mod memory;

pub use memory::MemoryLookupCache;
