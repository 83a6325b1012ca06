//! Vault7 Core - Shared functionality for all Vault7 tools
//!
//! A local keeper for site passwords, backup codes and quick notes.

pub mod config;
pub mod paths;

pub use config::Config;
pub use paths::Paths;
