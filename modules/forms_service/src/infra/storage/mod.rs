//! Storage layer - document store and form repository implementations

pub mod memory;

pub use memory::{InMemoryEntryStore, InMemoryFormRepository};
