//! Storage layer for arus
//!
//! User ledgers are kept behind the [`UserRepository`] trait: an in-memory
//! store for tests and embedding, and a JSON file store for the CLI.

pub mod file_io;
pub mod users;

pub use file_io::JsonFile;
pub use users::{InMemoryUserRepository, JsonUserRepository, UserRepository};
