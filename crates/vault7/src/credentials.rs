//! Master password and decryption key injected into the vault

use std::fmt;

use vault7_core::Config;

/// The two shared secrets a vault checks callers against.
///
/// Both checks are plain equality. There is no lockout or attempt tracking.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    master_password: String,
    decryption_key: String,
}

impl Credentials {
    pub fn new(master_password: impl Into<String>, decryption_key: impl Into<String>) -> Self {
        Self {
            master_password: master_password.into(),
            decryption_key: decryption_key.into(),
        }
    }

    /// Check a candidate against the master password
    pub fn authenticate(&self, password: &str) -> bool {
        password == self.master_password
    }

    /// Check a candidate against the decryption key
    pub fn valid_key(&self, key: &str) -> bool {
        key == self.decryption_key
    }
}

impl From<&Config> for Credentials {
    fn from(config: &Config) -> Self {
        Self::new(&*config.master_password, &*config.decryption_key)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials { .. }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_checks() {
        let creds = Credentials::new("master", "key");
        assert!(creds.authenticate("master"));
        assert!(!creds.authenticate("Master"));
        assert!(!creds.authenticate("key"));

        assert!(creds.valid_key("key"));
        assert!(!creds.valid_key("key "));
        assert!(!creds.valid_key("master"));
    }

    #[test]
    fn test_from_default_config() {
        let creds = Credentials::from(&Config::default());
        assert!(creds.authenticate("ilovetohatethat"));
        assert!(creds.valid_key("turndownforwhat"));
    }

    #[test]
    fn test_debug_hides_values() {
        let rendered = format!("{:?}", Credentials::new("master", "key"));
        assert!(!rendered.contains("master"));
        assert!(!rendered.contains("key"));
    }
}
