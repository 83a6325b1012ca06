//! Category stores - one directory of record files per category
//!
//! ```text
//! <root>/Passwords/<service>.txt      SERVICE, USERNAME, PASSWORD
//! <root>/BackupCodes/<account>.txt    ACCOUNT, USERNAME, CODE
//! <root>/Notes/note_<serial>.txt      NOTE_ID, TEXT
//! ```
//!
//! The secret-bearing field is always written codec-encoded, whatever the
//! entry's in-memory state. Loaded entries always come back obscured.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::codec;
use crate::entry::{BackupCode, Category, Entry, Note, Password};
use crate::error::{Result, StoreError};
use crate::record::Record;

const SERVICE: &str = "SERVICE";
const ACCOUNT: &str = "ACCOUNT";
const USERNAME: &str = "USERNAME";
const PASSWORD: &str = "PASSWORD";
const CODE: &str = "CODE";
const NOTE_ID: &str = "NOTE_ID";
const TEXT: &str = "TEXT";

/// Note serials are below this value, so the next serial always fits
pub const NOTE_SERIAL_LIMIT: u64 = u64::MAX;

/// Directory-backed store for a single category
#[derive(Debug, Clone)]
pub struct CategoryStore {
    category: Category,
    dir: PathBuf,
}

impl CategoryStore {
    /// Store for `category` under the vault root
    pub fn new(root: &Path, category: Category) -> Self {
        Self {
            category,
            dir: root.join(category.dir_name()),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `identifier`
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.dir.join(self.category.file_name(identifier))
    }

    /// Write the entry's file, replacing any previous content
    pub fn save(&self, entry: &Entry) -> Result<PathBuf> {
        if entry.category() != self.category {
            return Err(StoreError::WrongCategory {
                expected: self.category,
                found: entry.category(),
            });
        }

        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let path = self.path_for(&entry.identifier());
        fs::write(&path, to_record(entry).render()).map_err(|e| StoreError::io(&path, e))?;
        Ok(path)
    }

    /// Reconstruct every entry found in the category directory.
    ///
    /// A missing directory yields nothing. Symlinks to files are followed.
    /// Files that cannot be read or lack their identifying field are
    /// skipped with a warning.
    pub fn load_all(&self) -> Result<Vec<Entry>> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }

        let mut entries = vec![];
        let walker = WalkDir::new(&self.dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for item in walker {
            // Broken links and unreadable entries must not stop the scan
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    let path = e.path().unwrap_or(&self.dir).to_path_buf();
                    warn!("Skipping {}", StoreError::io(path, e.into()));
                    continue;
                }
            };
            if !item.file_type().is_file() {
                continue;
            }

            match self.load_file(item.path()) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping {}", e),
            }
        }

        Ok(entries)
    }

    fn load_file(&self, path: &Path) -> Result<Entry> {
        let content = fs::read(path).map_err(|e| StoreError::io(path, e))?;
        from_record(self.category, &Record::parse(&content)).map_err(|reason| {
            StoreError::Malformed {
                path: path.to_path_buf(),
                reason,
            }
        })
    }

    /// Remove the file backing `identifier`.
    ///
    /// Returns whether a file was removed; an absent file is not an error.
    pub fn delete(&self, identifier: &str) -> Result<bool> {
        let path = self.path_for(identifier);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

fn to_record(entry: &Entry) -> Record {
    match entry {
        Entry::Password(p) => Record::new()
            .with(SERVICE, p.service())
            .with(USERNAME, p.username())
            .with(PASSWORD, codec::encode(p.plain_password().as_bytes())),
        // The username is stored as plaintext, only the code is encoded
        Entry::BackupCode(b) => Record::new()
            .with(ACCOUNT, b.account())
            .with(USERNAME, b.plain_username())
            .with(CODE, codec::encode(b.plain_code().as_bytes())),
        Entry::Note(n) => Record::new()
            .with(NOTE_ID, n.serial().to_string())
            .with(TEXT, codec::encode(n.plain_text().as_bytes())),
    }
}

fn decoded(record: &Record, key: &str) -> String {
    let raw = record.get(key).unwrap_or_default();
    String::from_utf8_lossy(&codec::decode(raw)).into_owned()
}

fn required(record: &Record, key: &str) -> std::result::Result<String, String> {
    let value = record.text(key);
    if value.is_empty() {
        return Err(format!("missing {}", key));
    }
    Ok(value)
}

fn from_record(category: Category, record: &Record) -> std::result::Result<Entry, String> {
    let entry: Entry = match category {
        Category::Password => Password::new(
            &required(record, SERVICE)?,
            &record.text(USERNAME),
            &decoded(record, PASSWORD),
            true,
        )
        .into(),
        Category::BackupCode => BackupCode::new(
            &required(record, ACCOUNT)?,
            &record.text(USERNAME),
            &decoded(record, CODE),
            true,
        )
        .into(),
        Category::Note => {
            let id = required(record, NOTE_ID)?;
            let serial = id
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("{} is not a serial number: {:?}", NOTE_ID, id))?;
            if serial >= NOTE_SERIAL_LIMIT {
                return Err(format!("{} out of range: {}", NOTE_ID, serial));
            }
            Note::new(serial, &decoded(record, TEXT), true).into()
        }
    };
    Ok(entry)
}
