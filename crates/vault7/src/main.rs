//! vault7 - Local keeper for passwords, backup codes and notes
//!
//! Commands:
//! - list [CATEGORY]: List entries with their secrets still obscured
//! - show <CATEGORY> <ID>: Reveal an entry (asks for the decryption key)
//! - add password|backup|note ...: Store a new entry
//! - edit <CATEGORY> <ID> <VALUE> [VALUE2]: Change an entry's values
//! - delete <CATEGORY> <ID>: Remove an entry and its file
//! - seed: Add sample entries to empty categories
//! - config: Show or create the configuration file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vault7::{Category, Credentials, Entry, Row, Update, Vault};
use vault7_core::{Config, Paths};

#[derive(Parser)]
#[command(name = "vault7")]
#[command(about = "Local keeper for site passwords, backup codes and quick notes")]
#[command(version)]
#[command(after_help = r#"CATEGORIES:
    password    Site credentials, identified by service name
    backup      Account backup codes, identified by account name
    note        Free-text notes, identified by serial number

SECURITY:
    - Values are obscured with a reversible transform, NOT encrypted
    - Files live in ~/.local/share/vault7/vault_data/ unless configured
    - Master password and decryption key come from ~/.config/vault7/config.json"#)]
struct Cli {
    /// Master password (omit for hidden prompt)
    #[arg(long, global = true)]
    master: Option<String>,

    /// Vault root directory (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List entries (secrets stay obscured)
    List {
        /// Only this category (password, backup, note)
        category: Option<Category>,
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Reveal an entry's values
    Show {
        category: Category,
        /// Service, account or note serial
        id: String,
        /// Decryption key (omit for hidden prompt)
        #[arg(long)]
        key: Option<String>,
    },

    /// Store a new entry
    Add {
        #[command(subcommand)]
        entry: AddCommand,
    },

    /// Change an entry's values (backup codes take username and code)
    Edit {
        category: Category,
        id: String,
        value: String,
        value2: Option<String>,
        /// Decryption key (omit for hidden prompt)
        #[arg(long)]
        key: Option<String>,
    },

    /// Delete an entry permanently
    Delete { category: Category, id: String },

    /// Add sample entries to categories that are empty
    Seed,

    /// Show the configuration file location
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum AddCommand {
    /// Site credentials
    Password {
        service: String,
        username: String,
        /// Omit for hidden prompt
        password: Option<String>,
    },
    /// Account backup code
    Backup {
        account: String,
        username: String,
        /// Omit for hidden prompt
        code: Option<String>,
    },
    /// Free-text note
    Note { text: String },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = Paths::new();
    let config_path = paths.config_file();
    let config = Config::load(&config_path)?;

    if let Some(Commands::Config { init }) = cli.command {
        return cmd_config(&config, &config_path, init);
    }

    let root = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| paths.vault_root(&config));
    let mut vault = Vault::new(&root, Credentials::from(&config));

    let master = match cli.master {
        Some(m) => m,
        None => rpassword::prompt_password("Master password: ")
            .context("Failed to read master password")?,
    };
    if !vault.authenticate(&master) {
        bail!("Invalid password!");
    }

    let summary = vault.load_all();
    tracing::debug!(?summary, root = %root.display(), "vault loaded");

    match cli.command {
        Some(Commands::List { category, json }) => cmd_list(&vault, category, json),
        Some(Commands::Show { category, id, key }) => cmd_show(&vault, category, &id, key),
        Some(Commands::Add { entry }) => cmd_add(&mut vault, entry),
        Some(Commands::Edit {
            category,
            id,
            value,
            value2,
            key,
        }) => cmd_edit(&mut vault, category, &id, &value, value2.as_deref(), key),
        Some(Commands::Delete { category, id }) => cmd_delete(&mut vault, category, &id),
        Some(Commands::Seed) => {
            let added = vault.seed_defaults(&summary);
            println!("success: Added {} sample entries", added);
            Ok(())
        }
        Some(Commands::Config { .. }) => unreachable!("handled before authentication"),
        None => cmd_list(&vault, None, false),
    }
}

fn prompt_key(key: Option<String>) -> Result<String> {
    match key {
        Some(k) => Ok(k),
        None => {
            rpassword::prompt_password("Decryption key: ").context("Failed to read decryption key")
        }
    }
}

#[derive(Serialize)]
struct ListedEntry {
    category: Category,
    id: String,
    title: String,
    rows: Vec<Row>,
}

impl From<&Entry> for ListedEntry {
    fn from(entry: &Entry) -> Self {
        Self {
            category: entry.category(),
            id: entry.identifier(),
            title: entry.title(),
            rows: entry.visible_rows(),
        }
    }
}

/// List entries with their visible rows
fn cmd_list(vault: &Vault, category: Option<Category>, json: bool) -> Result<()> {
    let listed: Vec<ListedEntry> = vault
        .all()
        .iter()
        .filter(|e| category.map_or(true, |c| e.category() == c))
        .map(ListedEntry::from)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    if listed.is_empty() {
        println!("No entries stored. Add one with: vault7 add <category> ...");
        return Ok(());
    }

    for section in Category::ALL {
        let mut items = listed.iter().filter(|l| l.category == section).peekable();
        if items.peek().is_none() {
            continue;
        }
        println!("{}s", section);
        for item in items {
            println!("  {} [{}]", item.title, item.id);
            print_rows(&item.rows, 4);
        }
        println!();
    }

    Ok(())
}

fn print_rows(rows: &[Row], indent: usize) {
    for row in rows {
        println!("{:indent$}{}: {}", "", row.label, row.value, indent = indent);
    }
}

/// Reveal an entry
fn cmd_show(vault: &Vault, category: Category, id: &str, key: Option<String>) -> Result<()> {
    let Some(entry) = vault.find(category, id) else {
        bail!("{} not found: {}", category, id);
    };
    let key = prompt_key(key)?;

    println!("{}", entry.title());
    if let Some(rows) = vault.reveal_rows(category, id, &key) {
        print_rows(&rows, 2);
    }
    Ok(())
}

/// Store a new entry
fn cmd_add(vault: &mut Vault, entry: AddCommand) -> Result<()> {
    match entry {
        AddCommand::Password {
            service,
            username,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => {
                    rpassword::prompt_password("Password: ").context("Failed to read password")?
                }
            };
            vault.add_password(&service, &username, &password);
            println!("success: Password stored: {}", service);
        }
        AddCommand::Backup {
            account,
            username,
            code,
        } => {
            let code = match code {
                Some(c) => c,
                None => rpassword::prompt_password("Backup code: ")
                    .context("Failed to read backup code")?,
            };
            vault.add_backup(&account, &username, &code);
            println!("success: Backup code stored: {}", account);
        }
        AddCommand::Note { text } => {
            let Some(serial) = vault.add_note(&text) else {
                bail!("No note serials left");
            };
            println!("success: Note stored: {}", serial);
        }
    }
    Ok(())
}

/// Change an entry's values
fn cmd_edit(
    vault: &mut Vault,
    category: Category,
    id: &str,
    value: &str,
    value2: Option<&str>,
    key: Option<String>,
) -> Result<()> {
    if vault.find(category, id).is_none() {
        bail!("{} not found: {}", category, id);
    }
    let key = prompt_key(key)?;
    if !vault.valid_key(&key) {
        bail!("Invalid decryption key.");
    }

    let update = match value2 {
        Some(v2) => Update::Pair(value, v2),
        None => Update::Single(value),
    };
    if !vault.edit(category, id, &key, update) {
        bail!("Update failed: {}", id);
    }

    println!("success: {} updated: {}", category, id);
    Ok(())
}

/// Delete an entry
fn cmd_delete(vault: &mut Vault, category: Category, id: &str) -> Result<()> {
    if !vault.delete_by_id(category, id) {
        bail!("Delete failed: {} {}", category, id);
    }
    println!("success: {} deleted: {}", category, id);
    Ok(())
}

/// Show or create the configuration file
fn cmd_config(config: &Config, path: &std::path::Path, init: bool) -> Result<()> {
    if init {
        if path.exists() {
            println!("warning: Config already exists: {}", path.display());
        } else {
            config.save(path)?;
            println!("success: Config written: {}", path.display());
        }
        return Ok(());
    }

    println!("Config file: {}", path.display());
    match &config.data_dir {
        Some(dir) => println!("Data dir:    {}", dir.display()),
        None => println!("Data dir:    {}", Paths::new().vault_root(config).display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from(["vault7", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::List {
                category: None,
                json: false
            })
        ));

        let cli = Cli::try_parse_from(["vault7", "list", "backups", "--json"]).unwrap();
        if let Some(Commands::List { category, json }) = cli.command {
            assert_eq!(category, Some(Category::BackupCode));
            assert!(json);
        } else {
            panic!("Expected List command");
        }

        let cli =
            Cli::try_parse_from(["vault7", "show", "password", "GitHub", "--key", "k"]).unwrap();
        if let Some(Commands::Show { category, id, key }) = cli.command {
            assert_eq!(category, Category::Password);
            assert_eq!(id, "GitHub");
            assert_eq!(key.as_deref(), Some("k"));
        } else {
            panic!("Expected Show command");
        }
    }

    #[test]
    fn test_cli_add() {
        let cli = Cli::try_parse_from(["vault7", "add", "password", "GitHub", "alice", "p@ss1"])
            .unwrap();
        if let Some(Commands::Add {
            entry: AddCommand::Password {
                service,
                username,
                password,
            },
        }) = cli.command
        {
            assert_eq!(service, "GitHub");
            assert_eq!(username, "alice");
            assert_eq!(password.as_deref(), Some("p@ss1"));
        } else {
            panic!("Expected Add Password command");
        }

        let cli = Cli::try_parse_from(["vault7", "add", "note", "buy milk"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Add {
                entry: AddCommand::Note { .. }
            })
        ));
    }

    #[test]
    fn test_cli_edit_backup_pair() {
        let cli = Cli::try_parse_from(["vault7", "edit", "backup", "Gmail", "bob", "999"]).unwrap();
        if let Some(Commands::Edit {
            category,
            value,
            value2,
            key,
            ..
        }) = cli.command
        {
            assert_eq!(category, Category::BackupCode);
            assert_eq!(value, "bob");
            assert_eq!(value2.as_deref(), Some("999"));
            assert!(key.is_none());
        } else {
            panic!("Expected Edit command");
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "vault7",
            "delete",
            "note",
            "3",
            "--master",
            "pw",
            "--data-dir",
            "/tmp/v",
        ])
        .unwrap();
        assert_eq!(cli.master.as_deref(), Some("pw"));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/v")));
    }

    #[test]
    fn test_cli_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["vault7", "show", "files", "x"]).is_err());
    }
}
