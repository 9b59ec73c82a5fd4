// Library root: exposes the loader for the binary and integration tests.
// The binary entry point is src/main.rs.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod loader;
pub mod logger;
pub mod manifest;
pub mod remotes;
pub mod shell;
