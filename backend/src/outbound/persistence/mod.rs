//! Persistence adapters implementing the repository ports.
//!
//! The store is process-local: records live for the lifetime of the server.
//! Adapters only translate and enforce storage-level invariants
//! (uniqueness, cascading deletes); they contain no business rules.

mod memory;

pub use memory::InMemoryStore;
