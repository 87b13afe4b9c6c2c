use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

/// Key under which the OpenAI API credential is stored
const API_KEY_NAME: &str = "openai_api_key";

/// A secure storage for API keys and other sensitive information
///
/// Provides functionality to store, retrieve, and manage secrets
/// in a JSON file located in the user's home directory.
#[derive(Debug)]
pub struct SecretStore {
    /// Map of secret keys to their values
    secrets: HashMap<String, SecretString>,
    /// Path to the secrets file
    file_path: PathBuf,
}

impl SecretStore {
    /// Creates a new SecretStore instance
    ///
    /// Initializes the store with the default path
    /// (~/.eduasistent/secrets.json) and loads any existing secrets from
    /// the file.
    pub fn new() -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not find home directory")
        })?;
        let file_path = home_dir.join(".eduasistent").join("secrets.json");
        Self::with_path(file_path)
    }

    /// Creates a SecretStore backed by an explicit file path.
    pub fn with_path(file_path: PathBuf) -> io::Result<Self> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut store = SecretStore {
            secrets: HashMap::new(),
            file_path,
        };

        store.load()?;
        Ok(store)
    }

    fn load(&mut self) -> io::Result<()> {
        match File::open(&self.file_path) {
            Ok(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                let secrets: HashMap<String, String> = serde_json::from_str(&contents)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
                self.secrets = secrets
                    .into_iter()
                    .map(|(key, value)| (key, SecretString::new(value)))
                    .collect();
                Ok(())
            }
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn save(&self) -> io::Result<()> {
        let secrets: HashMap<String, String> = self
            .secrets
            .iter()
            .map(|(key, value)| (key.clone(), value.expose_secret().clone()))
            .collect();
        let contents = serde_json::to_string_pretty(&secrets)?;
        let mut file = File::create(&self.file_path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    /// Sets a secret value for the given key
    pub fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.secrets
            .insert(key.to_string(), SecretString::new(value.to_string()));
        self.save()
    }

    /// Retrieves a secret value for the given key
    pub fn get(&self, key: &str) -> Option<&String> {
        self.secrets.get(key).map(|secret| secret.expose_secret())
    }

    /// Retrieves a secret value without exposing it as a String
    pub fn get_secret(&self, key: &str) -> Option<&SecretString> {
        self.secrets.get(key)
    }

    /// Deletes a secret with the given key
    pub fn delete(&mut self, key: &str) -> io::Result<()> {
        self.secrets.remove(key);
        self.save()
    }

    /// Stores the OpenAI API credential
    pub fn set_api_key(&mut self, value: &str) -> io::Result<()> {
        self.set(API_KEY_NAME, value)
    }

    /// Retrieves the stored OpenAI API credential, if any
    pub fn api_key(&self) -> Option<&String> {
        self.get(API_KEY_NAME)
    }

    /// Deletes the stored OpenAI API credential
    pub fn delete_api_key(&mut self) -> io::Result<()> {
        self.delete(API_KEY_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SecretStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SecretStore::with_path(dir.path().join("secrets.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn set_get_delete_api_key() {
        let (_dir, mut store) = temp_store();
        assert!(store.api_key().is_none());

        store.set_api_key("sk-test").unwrap();
        assert_eq!(store.api_key().map(String::as_str), Some("sk-test"));

        store.delete_api_key().unwrap();
        assert!(store.api_key().is_none());
    }

    #[test]
    fn secrets_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.json");

        let mut store = SecretStore::with_path(path.clone()).unwrap();
        store.set_api_key("sk-persisted").unwrap();

        let reloaded = SecretStore::with_path(path).unwrap();
        assert_eq!(reloaded.api_key().map(String::as_str), Some("sk-persisted"));
    }
}
