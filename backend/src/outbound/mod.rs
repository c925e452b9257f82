//! Outbound adapters implementing domain ports for infrastructure.
//!
//! - **persistence**: in-memory repositories for accounts, notes and orders
//! - **hashing**: Argon2id password hasher
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod hashing;
pub mod persistence;
