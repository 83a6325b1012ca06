//! Entry model - the three kinds of record a vault keeps
//!
//! Every entry exposes the same contract (identifier, title, visible rows,
//! reveal rows, edit) while keeping its own field layout. Secret values are
//! held either as plaintext or in codec-obscured form, never both.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::codec;
use crate::credentials::Credentials;
use crate::sanitize::sanitize;

/// Row returned by `reveal_rows` when the supplied key is wrong
pub const INVALID_KEY_LABEL: &str = "Error";
pub const INVALID_KEY_MESSAGE: &str = "Invalid decryption key.";

/// Shown in place of an obscured note's text
pub const NOTE_PLACEHOLDER: &str = "[ENCRYPTED]";

/// Entry categories, each with its own directory and file naming rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Password,
    BackupCode,
    Note,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Password, Category::BackupCode, Category::Note];

    /// Subdirectory of the vault root holding this category's files
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Password => "Passwords",
            Category::BackupCode => "BackupCodes",
            Category::Note => "Notes",
        }
    }

    /// File name for an entry of this category
    pub fn file_name(&self, identifier: &str) -> String {
        match self {
            Category::Note => format!("note_{}.txt", sanitize(identifier)),
            _ => format!("{}.txt", sanitize(identifier)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Password => "password",
            Category::BackupCode => "backup",
            Category::Note => "note",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Password => "Password",
            Category::BackupCode => "Backup Code",
            Category::Note => "Note",
        })
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "password" | "passwords" | "pw" => Ok(Category::Password),
            "backup" | "backups" | "backupcode" | "backupcodes" | "bc" => Ok(Category::BackupCode),
            "note" | "notes" => Ok(Category::Note),
            other => Err(format!(
                "unknown category '{}' (expected password, backup or note)",
                other
            )),
        }
    }
}

/// One (label, value) pair rendered by a consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub label: String,
    pub value: String,
}

impl Row {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    fn invalid_key() -> Vec<Row> {
        vec![Row::new(INVALID_KEY_LABEL, INVALID_KEY_MESSAGE)]
    }
}

/// New values for [`Entry::edit`]
///
/// Passwords and notes take one value. Backup codes take two
/// (username, code); a single value leaves the code empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update<'a> {
    Single(&'a str),
    Pair(&'a str, &'a str),
}

impl<'a> Update<'a> {
    fn first(&self) -> &'a str {
        match *self {
            Update::Single(v) | Update::Pair(v, _) => v,
        }
    }

    fn second(&self) -> &'a str {
        match *self {
            Update::Single(_) => "",
            Update::Pair(_, v) => v,
        }
    }
}

/// A secret value, kept either as plaintext or obscured
#[derive(Clone, PartialEq, Eq)]
enum Sealed {
    Plain(String),
    Obscured(Vec<u8>),
}

impl Sealed {
    fn new(plain: &str, obscure: bool) -> Self {
        if obscure {
            Sealed::Obscured(codec::encode(plain.as_bytes()))
        } else {
            Sealed::Plain(plain.to_string())
        }
    }

    fn is_obscured(&self) -> bool {
        matches!(self, Sealed::Obscured(_))
    }

    /// The form shown without a key
    fn shown(&self) -> String {
        match self {
            Sealed::Plain(s) => s.clone(),
            Sealed::Obscured(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    fn reveal(&self) -> String {
        match self {
            Sealed::Plain(s) => s.clone(),
            Sealed::Obscured(bytes) => String::from_utf8_lossy(&codec::decode(bytes)).into_owned(),
        }
    }

    /// Replace the value, keeping the current obscured state
    fn replace(&mut self, plain: &str) {
        *self = Sealed::new(plain, self.is_obscured());
    }
}

impl fmt::Debug for Sealed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sealed::Plain(_) => f.write_str("Plain(..)"),
            Sealed::Obscured(_) => f.write_str("Obscured(..)"),
        }
    }
}

/// Site credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Password {
    service: String,
    username: String,
    password: Sealed,
}

impl Password {
    pub fn new(service: &str, username: &str, password: &str, obscured: bool) -> Self {
        Self {
            service: service.to_string(),
            username: username.to_string(),
            password: Sealed::new(password, obscured),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn plain_password(&self) -> String {
        self.password.reveal()
    }
}

/// Account recovery codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupCode {
    account: String,
    username: Sealed,
    code: Sealed,
}

impl BackupCode {
    pub fn new(account: &str, username: &str, code: &str, obscured: bool) -> Self {
        Self {
            account: account.to_string(),
            username: Sealed::new(username, obscured),
            code: Sealed::new(code, obscured),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub(crate) fn plain_username(&self) -> String {
        self.username.reveal()
    }

    pub(crate) fn plain_code(&self) -> String {
        self.code.reveal()
    }
}

/// Free-text note identified by a serial number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    serial: u64,
    text: Sealed,
}

impl Note {
    pub fn new(serial: u64, text: &str, obscured: bool) -> Self {
        Self {
            serial,
            text: Sealed::new(text, obscured),
        }
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Obscure the text if it is currently plain.
    ///
    /// Passing `false` on an obscured note is ignored, the plaintext is gone.
    pub fn set_obscured(&mut self, obscured: bool) {
        if obscured && !self.text.is_obscured() {
            self.text = Sealed::new(&self.text.reveal(), true);
        }
    }

    pub(crate) fn plain_text(&self) -> String {
        self.text.reveal()
    }
}

/// One stored record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Password(Password),
    BackupCode(BackupCode),
    Note(Note),
}

impl Entry {
    pub fn category(&self) -> Category {
        match self {
            Entry::Password(_) => Category::Password,
            Entry::BackupCode(_) => Category::BackupCode,
            Entry::Note(_) => Category::Note,
        }
    }

    /// Identifier, unique within the entry's category
    pub fn identifier(&self) -> String {
        match self {
            Entry::Password(p) => p.service.clone(),
            Entry::BackupCode(b) => b.account.clone(),
            Entry::Note(n) => n.serial.to_string(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Entry::Password(p) => p.service.clone(),
            Entry::BackupCode(b) => b.account.clone(),
            Entry::Note(n) => format!("Note {}", n.serial),
        }
    }

    pub fn is_obscured(&self) -> bool {
        match self {
            Entry::Password(p) => p.password.is_obscured(),
            Entry::BackupCode(b) => b.code.is_obscured(),
            Entry::Note(n) => n.text.is_obscured(),
        }
    }

    /// Rows shown without any key; secrets stay in their stored form
    pub fn visible_rows(&self) -> Vec<Row> {
        match self {
            Entry::Password(p) => vec![
                Row::new("Username", &*p.username),
                Row::new("Password", p.password.shown()),
            ],
            Entry::BackupCode(b) => vec![
                Row::new("Username", b.username.shown()),
                Row::new("Backup Code", b.code.shown()),
            ],
            Entry::Note(n) => match &n.text {
                Sealed::Obscured(_) => vec![Row::new("Text", NOTE_PLACEHOLDER)],
                Sealed::Plain(text) => vec![Row::new("Text", &**text)],
            },
        }
    }

    /// Decoded rows, or a single error row when an obscured entry is
    /// asked for with the wrong key
    pub fn reveal_rows(&self, key: &str, credentials: &Credentials) -> Vec<Row> {
        if self.is_obscured() && !credentials.valid_key(key) {
            return Row::invalid_key();
        }
        match self {
            Entry::Password(p) => vec![
                Row::new("Username", &*p.username),
                Row::new("Password", p.password.reveal()),
            ],
            Entry::BackupCode(b) => vec![
                Row::new("Username", b.username.reveal()),
                Row::new("Backup Code", b.code.reveal()),
            ],
            Entry::Note(n) => vec![Row::new("Text", n.text.reveal())],
        }
    }

    /// Replace the entry's values if `key` is the decryption key.
    ///
    /// Returns whether the edit was applied.
    pub fn edit(&mut self, key: &str, update: Update<'_>, credentials: &Credentials) -> bool {
        if !credentials.valid_key(key) {
            return false;
        }
        match self {
            Entry::Password(p) => p.password.replace(update.first()),
            Entry::BackupCode(b) => {
                b.username.replace(update.first());
                b.code.replace(update.second());
            }
            Entry::Note(n) => n.text.replace(update.first()),
        }
        true
    }
}

impl From<Password> for Entry {
    fn from(p: Password) -> Self {
        Entry::Password(p)
    }
}

impl From<BackupCode> for Entry {
    fn from(b: BackupCode) -> Self {
        Entry::BackupCode(b)
    }
}

impl From<Note> for Entry {
    fn from(n: Note) -> Self {
        Entry::Note(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("master", "turndownforwhat")
    }

    fn rows(pairs: &[(&str, &str)]) -> Vec<Row> {
        pairs.iter().map(|(l, v)| Row::new(*l, *v)).collect()
    }

    #[test]
    fn test_accessors() {
        let pw = Entry::from(Password::new("GitHub", "alice", "p@ss1", true));
        assert_eq!(pw.category(), Category::Password);
        assert_eq!(pw.identifier(), "GitHub");
        assert_eq!(pw.title(), "GitHub");

        let bc = Entry::from(BackupCode::new("Gmail", "bob", "123", true));
        assert_eq!(bc.category(), Category::BackupCode);
        assert_eq!(bc.identifier(), "Gmail");

        let note = Entry::from(Note::new(7, "hello", true));
        assert_eq!(note.category(), Category::Note);
        assert_eq!(note.identifier(), "7");
        assert_eq!(note.title(), "Note 7");
    }

    #[test]
    fn test_visible_rows_keep_secrets_obscured() {
        let pw = Entry::from(Password::new("GitHub", "alice", "p@ss1", true));
        assert_eq!(
            pw.visible_rows(),
            rows(&[("Username", "alice"), ("Password", "sCpp2!@")])
        );

        let bc = Entry::from(BackupCode::new("Gmail", "bob", "123", true));
        assert_eq!(
            bc.visible_rows(),
            rows(&[("Username", "ala!@"), ("Backup Code", "210!@")])
        );

        let note = Entry::from(Note::new(1, "secret plan", true));
        assert_eq!(note.visible_rows(), rows(&[("Text", NOTE_PLACEHOLDER)]));
    }

    #[test]
    fn test_visible_rows_plain_entries() {
        let pw = Entry::from(Password::new("GitHub", "alice", "p@ss1", false));
        assert_eq!(
            pw.visible_rows(),
            rows(&[("Username", "alice"), ("Password", "p@ss1")])
        );

        let note = Entry::from(Note::new(1, "open", false));
        assert_eq!(note.visible_rows(), rows(&[("Text", "open")]));
    }

    #[test]
    fn test_reveal_with_correct_key() {
        let creds = creds();

        let pw = Entry::from(Password::new("GitHub", "alice", "p@ss1", true));
        assert_eq!(
            pw.reveal_rows("turndownforwhat", &creds),
            rows(&[("Username", "alice"), ("Password", "p@ss1")])
        );

        let bc = Entry::from(BackupCode::new("Gmail", "bob", "123", true));
        assert_eq!(
            bc.reveal_rows("turndownforwhat", &creds),
            rows(&[("Username", "bob"), ("Backup Code", "123")])
        );

        let note = Entry::from(Note::new(1, "secret plan", true));
        assert_eq!(
            note.reveal_rows("turndownforwhat", &creds),
            rows(&[("Text", "secret plan")])
        );
    }

    #[test]
    fn test_wrong_key_yields_single_error_row() {
        let creds = creds();
        let entries = [
            Entry::from(Password::new("GitHub", "alice", "p@ss1", true)),
            Entry::from(BackupCode::new("Gmail", "bob", "123", true)),
            Entry::from(Note::new(1, "secret plan", true)),
        ];

        for entry in &entries {
            for key in ["wrongkey", "", "TURNDOWNFORWHAT", "master"] {
                assert_eq!(
                    entry.reveal_rows(key, &creds),
                    rows(&[("Error", "Invalid decryption key.")])
                );
            }
        }
    }

    #[test]
    fn test_plain_entry_reveals_with_any_key() {
        let note = Entry::from(Note::new(3, "visible", false));
        assert_eq!(note.reveal_rows("anything", &creds()), rows(&[("Text", "visible")]));
    }

    #[test]
    fn test_edit_requires_key() {
        let creds = creds();
        let mut pw = Entry::from(Password::new("GitHub", "alice", "p@ss1", true));

        assert!(!pw.edit("wrongkey", Update::Single("hacked"), &creds));
        assert_eq!(pw.reveal_rows("turndownforwhat", &creds)[1].value, "p@ss1");

        assert!(pw.edit("turndownforwhat", Update::Single("newpass"), &creds));
        assert_eq!(
            pw.reveal_rows("turndownforwhat", &creds),
            rows(&[("Username", "alice"), ("Password", "newpass")])
        );
        // Still obscured after edit
        assert!(pw.is_obscured());
        assert_eq!(pw.visible_rows()[1].value, "mftsbpp!@");
    }

    #[test]
    fn test_edit_backup_code_takes_two_values() {
        let creds = creds();
        let mut bc = Entry::from(BackupCode::new("Gmail", "bob", "123", true));

        assert!(bc.edit("turndownforwhat", Update::Pair("carol", "999"), &creds));
        assert_eq!(
            bc.reveal_rows("turndownforwhat", &creds),
            rows(&[("Username", "carol"), ("Backup Code", "999")])
        );

        assert!(bc.edit("turndownforwhat", Update::Single("dave"), &creds));
        assert_eq!(
            bc.reveal_rows("turndownforwhat", &creds),
            rows(&[("Username", "dave"), ("Backup Code", "")])
        );
    }

    #[test]
    fn test_edit_plain_note_stays_plain() {
        let creds = creds();
        let mut note = Entry::from(Note::new(1, "draft", false));
        assert!(note.edit("turndownforwhat", Update::Pair("final", "ignored"), &creds));
        assert_eq!(note.visible_rows(), rows(&[("Text", "final")]));
    }

    #[test]
    fn test_note_set_obscured() {
        let mut note = Note::new(1, "draft", false);
        note.set_obscured(true);
        assert!(note.text.is_obscured());
        assert_eq!(note.plain_text(), "draft");

        note.set_obscured(false);
        assert!(note.text.is_obscured());
    }

    #[test]
    fn test_obscured_entry_does_not_keep_plaintext() {
        let pw = Password::new("GitHub", "alice", "p@ss1", true);
        assert_eq!(pw.password, Sealed::Obscured(b"sCpp2!@".to_vec()));
    }

    #[test]
    fn test_debug_does_not_leak() {
        let pw = Entry::from(Password::new("GitHub", "alice", "p@ss1", false));
        assert!(!format!("{:?}", pw).contains("p@ss1"));
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::Password.dir_name(), "Passwords");
        assert_eq!(Category::BackupCode.dir_name(), "BackupCodes");
        assert_eq!(Category::Note.dir_name(), "Notes");

        assert_eq!(Category::Password.file_name("my site"), "my_site.txt");
        assert_eq!(Category::BackupCode.file_name("Gmail"), "Gmail.txt");
        assert_eq!(Category::Note.file_name("12"), "note_12.txt");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("password".parse::<Category>(), Ok(Category::Password));
        assert_eq!("Backups".parse::<Category>(), Ok(Category::BackupCode));
        assert_eq!("notes".parse::<Category>(), Ok(Category::Note));
        assert!("files".parse::<Category>().is_err());

        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }
}
