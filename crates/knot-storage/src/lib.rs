//! Store implementations for the knot URL shortener.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::{SqliteSequence, SqliteStore};
