use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_email: Option<String>,
}

/// Session tokens and the last login email, persisted as TOML next to the config
pub struct CredentialStore {
    path: PathBuf,
    stored: StoredCredentials,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            stored: StoredCredentials::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file leaves the store empty
    pub fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credentials: {}", self.path.display()))?;
        self.stored = toml::from_str(&content)
            .with_context(|| format!("Failed to parse credentials: {}", self.path.display()))?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.stored)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write credentials: {}", self.path.display()))?;
        Ok(())
    }

    pub fn get_access_token(&self) -> Option<&String> {
        self.stored.access_token.as_ref()
    }

    pub fn set_access_token(&mut self, token: String) {
        self.stored.access_token = Some(token);
    }

    pub fn get_refresh_token(&self) -> Option<&String> {
        self.stored.refresh_token.as_ref()
    }

    /// `None` forgets a refresh token left over from an earlier login
    pub fn set_refresh_token(&mut self, token: Option<String>) {
        self.stored.refresh_token = token;
    }

    /// Email of the last account that logged in, offered as the prompt default
    pub fn get_last_email(&self) -> Option<&String> {
        self.stored.last_email.as_ref()
    }

    pub fn set_last_email(&mut self, email: String) {
        self.stored.last_email = Some(email);
    }

    /// Drop both session tokens, keeping the last email
    pub fn clear_tokens(&mut self) {
        self.stored.access_token = None;
        self.stored.refresh_token = None;
    }

    pub fn is_empty(&self) -> bool {
        self.stored == StoredCredentials::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_credential_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        store.set_access_token("access".to_string());
        store.set_refresh_token(Some("refresh".to_string()));
        store.save().unwrap();

        let mut loaded = CredentialStore::new(path);
        loaded.load().unwrap();
        assert_eq!(loaded.get_access_token(), Some(&"access".to_string()));
        assert_eq!(loaded.get_refresh_token(), Some(&"refresh".to_string()));
        assert_eq!(loaded.get_last_email(), None);
    }

    #[test]
    fn test_clear_tokens_keeps_last_email() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/cinetime-test-credentials.toml"));
        store.set_access_token("a".to_string());
        store.set_refresh_token(Some("r".to_string()));
        store.set_last_email("me@example.com".to_string());

        store.clear_tokens();
        assert_eq!(store.get_access_token(), None);
        assert_eq!(store.get_refresh_token(), None);
        assert_eq!(store.get_last_email(), Some(&"me@example.com".to_string()));
        assert!(!store.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::new(dir.path().join("missing.toml"));
        store.load().unwrap();
        assert!(store.is_empty());
        assert!(store.path().ends_with("missing.toml"));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "access_token = [").unwrap();
        let mut store = CredentialStore::new(file.path().to_path_buf());
        assert!(store.load().is_err());
    }
}
