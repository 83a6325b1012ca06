//! vault7 - Local keeper for passwords, backup codes and notes
//!
//! "Hidden in plain sight, revealed by a key."
//!
//! Entries live in memory inside a [`Vault`] and are written through to one
//! small `KEY=VALUE` file per entry on every change. Secret values are
//! obscured with a reversible transform; this keeps them away from casual
//! eyes and is not encryption.

pub mod codec;
pub mod credentials;
pub mod entry;
pub mod error;
pub mod record;
pub mod sanitize;
pub mod store;
pub mod vault;

pub use credentials::Credentials;
pub use entry::{BackupCode, Category, Entry, Note, Password, Row, Update};
pub use error::StoreError;
pub use store::CategoryStore;
pub use vault::{LoadSummary, Vault};
