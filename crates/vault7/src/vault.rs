//! Vault - the in-memory collection of entries, kept in sync with disk
//!
//! Every mutation is written through to the matching category store before
//! the call returns. Store failures are logged and reported as `false`,
//! a zero count or a no-op; nothing here returns an error.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::credentials::Credentials;
use crate::entry::{BackupCode, Category, Entry, Note, Password, Row, Update};
use crate::store::{CategoryStore, NOTE_SERIAL_LIMIT};

/// Number of entries loaded per category at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub passwords: usize,
    pub backup_codes: usize,
    pub notes: usize,
}

impl LoadSummary {
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Password => self.passwords,
            Category::BackupCode => self.backup_codes,
            Category::Note => self.notes,
        }
    }

    pub fn total(&self) -> usize {
        self.passwords + self.backup_codes + self.notes
    }
}

/// The secrets vault
#[derive(Debug)]
pub struct Vault {
    /// Root directory holding the category subdirectories
    root: PathBuf,
    credentials: Credentials,
    /// Entries of every category, in insertion order
    entries: Vec<Entry>,
    /// Serial handed to the next note
    next_note_serial: u64,
    passwords: CategoryStore,
    backup_codes: CategoryStore,
    notes: CategoryStore,
}

impl Vault {
    /// Create an empty vault rooted at `root`. Nothing is read until one
    /// of the `load_*` operations runs.
    pub fn new(root: &Path, credentials: Credentials) -> Self {
        Self {
            root: root.to_path_buf(),
            credentials,
            entries: vec![],
            next_note_serial: 1,
            passwords: CategoryStore::new(root, Category::Password),
            backup_codes: CategoryStore::new(root, Category::BackupCode),
            notes: CategoryStore::new(root, Category::Note),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store(&self, category: Category) -> &CategoryStore {
        match category {
            Category::Password => &self.passwords,
            Category::BackupCode => &self.backup_codes,
            Category::Note => &self.notes,
        }
    }

    /// Check the master password
    pub fn authenticate(&self, password: &str) -> bool {
        self.credentials.authenticate(password)
    }

    /// Check the decryption key
    pub fn valid_key(&self, key: &str) -> bool {
        self.credentials.valid_key(key)
    }

    /// Every entry, in insertion order
    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries of one category, in insertion order
    pub fn entries(&self, category: Category) -> impl Iterator<Item = &Entry> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.category() == category)
    }

    /// First entry matching category and identifier
    pub fn find(&self, category: Category, identifier: &str) -> Option<&Entry> {
        self.position(category, identifier).map(|i| &self.entries[i])
    }

    fn position(&self, category: Category, identifier: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.category() == category && e.identifier() == identifier)
    }

    pub fn next_note_serial(&self) -> u64 {
        self.next_note_serial
    }

    // ---------- add ----------

    pub fn add_password(&mut self, service: &str, username: &str, password: &str) {
        self.add_password_with(service, username, password, true);
    }

    pub fn add_password_with(
        &mut self,
        service: &str,
        username: &str,
        password: &str,
        obscured: bool,
    ) {
        self.push(Password::new(service, username, password, obscured).into());
    }

    pub fn add_backup(&mut self, account: &str, username: &str, code: &str) {
        self.add_backup_with(account, username, code, true);
    }

    pub fn add_backup_with(&mut self, account: &str, username: &str, code: &str, obscured: bool) {
        self.push(BackupCode::new(account, username, code, obscured).into());
    }

    /// Add a note under the next serial, which is returned.
    ///
    /// `None` once the serial space is used up; nothing is added then.
    pub fn add_note(&mut self, text: &str) -> Option<u64> {
        self.add_note_with(text, true)
    }

    pub fn add_note_with(&mut self, text: &str, obscured: bool) -> Option<u64> {
        let serial = self.next_note_serial;
        if serial == NOTE_SERIAL_LIMIT {
            warn!("Note serials exhausted, note not added");
            return None;
        }
        self.next_note_serial = serial + 1;
        self.push(Note::new(serial, text, obscured).into());
        Some(serial)
    }

    fn push(&mut self, entry: Entry) {
        self.persist(&entry);
        self.entries.push(entry);
    }

    fn persist(&self, entry: &Entry) -> bool {
        match self.store(entry.category()).save(entry) {
            Ok(path) => {
                info!("Saved {} {}", entry.category(), path.display());
                true
            }
            Err(e) => {
                warn!("Failed to save {} '{}': {}", entry.category(), entry.identifier(), e);
                false
            }
        }
    }

    // ---------- save by identifier ----------

    /// Re-persist an entry. Returns whether it was found and written.
    pub fn save_by_id(&self, category: Category, identifier: &str) -> bool {
        match self.find(category, identifier) {
            Some(entry) => self.persist(entry),
            None => false,
        }
    }

    pub fn save_password_by_service(&self, service: &str) -> bool {
        self.save_by_id(Category::Password, service)
    }

    pub fn save_backup_by_account(&self, account: &str) -> bool {
        self.save_by_id(Category::BackupCode, account)
    }

    pub fn save_note_by_id(&self, id: &str) -> bool {
        self.save_by_id(Category::Note, id)
    }

    // ---------- reveal / edit ----------

    /// Reveal rows of an entry, `None` when no such entry exists
    pub fn reveal_rows(
        &self,
        category: Category,
        identifier: &str,
        key: &str,
    ) -> Option<Vec<Row>> {
        self.find(category, identifier)
            .map(|e| e.reveal_rows(key, &self.credentials))
    }

    /// Edit an entry under the decryption key and write it through.
    ///
    /// Returns whether the edit was applied and written. A wrong key or
    /// unknown entry changes nothing. If the write fails the in-memory
    /// entry keeps the new values and `false` is returned.
    pub fn edit(
        &mut self,
        category: Category,
        identifier: &str,
        key: &str,
        update: Update<'_>,
    ) -> bool {
        let Some(index) = self.position(category, identifier) else {
            return false;
        };
        if !self.entries[index].edit(key, update, &self.credentials) {
            return false;
        }
        self.persist(&self.entries[index])
    }

    // ---------- delete ----------

    /// Remove the first matching entry and its file.
    ///
    /// Returns `false` when nothing matched. If the file cannot be removed
    /// the entry stays in memory and `false` is returned, so memory and
    /// disk keep agreeing.
    pub fn delete_by_id(&mut self, category: Category, identifier: &str) -> bool {
        let Some(index) = self.position(category, identifier) else {
            return false;
        };

        let store = self.store(category);
        if let Err(e) = store.delete(identifier) {
            warn!("Failed to delete {} '{}': {}", category, identifier, e);
            return false;
        }
        info!("Deleted {} {}", category, store.path_for(identifier).display());

        self.entries.remove(index);
        true
    }

    pub fn delete_password_by_service(&mut self, service: &str) -> bool {
        self.delete_by_id(Category::Password, service)
    }

    pub fn delete_backup_by_account(&mut self, account: &str) -> bool {
        self.delete_by_id(Category::BackupCode, account)
    }

    pub fn delete_note_by_id(&mut self, id: &str) -> bool {
        self.delete_by_id(Category::Note, id)
    }

    // ---------- load ----------

    /// Append every persisted entry of a category; returns how many loaded
    pub fn load(&mut self, category: Category) -> usize {
        let loaded = match self.store(category).load_all() {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Failed to load {} entries: {}", category, e);
                return 0;
            }
        };

        let count = loaded.len();
        for entry in loaded {
            if let Entry::Note(note) = &entry {
                self.next_note_serial = self.next_note_serial.max(note.serial().saturating_add(1));
            }
            info!("Loaded {} '{}'", category, entry.identifier());
            self.entries.push(entry);
        }
        count
    }

    pub fn load_passwords(&mut self) -> usize {
        self.load(Category::Password)
    }

    pub fn load_backup_codes(&mut self) -> usize {
        self.load(Category::BackupCode)
    }

    pub fn load_notes(&mut self) -> usize {
        self.load(Category::Note)
    }

    /// Load all three categories
    pub fn load_all(&mut self) -> LoadSummary {
        LoadSummary {
            passwords: self.load_passwords(),
            backup_codes: self.load_backup_codes(),
            notes: self.load_notes(),
        }
    }

    /// Add sample entries to every category that loaded nothing.
    ///
    /// Returns how many entries were added.
    pub fn seed_defaults(&mut self, summary: &LoadSummary) -> usize {
        let before = self.entries.len();

        if summary.passwords == 0 {
            for (service, username, password) in [
                ("Facebook", "example.user", "fb_pass"),
                ("Twitter", "example_user", "tw_pass"),
                ("Instagram", "example_user", "ig_pass"),
                ("Telegram", "Example User", "tg_pass"),
                ("Reddit", "example", "rd_pass"),
                ("Discord", "example", "ds_pass"),
            ] {
                self.add_password(service, username, password);
            }
        }

        if summary.backup_codes == 0 {
            for (account, username, code) in [
                ("Gmail", "user_gm", "backup123"),
                ("TryHackMe", "example_user", "thm_backup"),
                ("HackTheBox", "example_htb", "htb_backup"),
            ] {
                self.add_backup(account, username, code);
            }
        }

        if summary.notes == 0 {
            self.add_note("Plan for CTF challenge for 7 days");
            self.add_note("Recon phase completed");
        }

        self.entries.len() - before
    }
}
