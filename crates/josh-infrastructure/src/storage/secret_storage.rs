//! Secret configuration file storage.
//!
//! Provides read-only loading of secret configuration from
//! `~/.config/josh/secret.json`.

use std::fs;
use std::path::PathBuf;

use josh_core::JoshError;
use josh_core::config::SecretConfig;

use crate::paths::JoshPaths;

/// Storage for the secret configuration file (secret.json).
///
/// Responsibilities:
/// - Load secret.json from ~/.config/josh/
/// - Parse JSON into the SecretConfig domain model
///
/// Does NOT:
/// - Write or modify secret files (read-only)
/// - Validate API keys or credentials
/// - Handle encryption (plaintext JSON storage)
///
/// # Security Note
///
/// This storage reads plaintext JSON files. The secret.json file should have
/// appropriate file permissions (e.g., 600) to prevent unauthorized access.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a new SecretStorage with the default path (~/.config/josh/secret.json).
    pub fn new() -> Result<Self, JoshError> {
        let path = JoshPaths::secret_file()?;
        Ok(Self { path })
    }

    /// Creates a new SecretStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secret configuration from the JSON file.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded and parsed
    /// - `Err(JoshError::NotFound)`: File doesn't exist
    /// - `Err(JoshError::Io)`: Failed to read file
    /// - `Err(JoshError::Serialization)`: Invalid JSON format
    pub fn load(&self) -> Result<SecretConfig, JoshError> {
        if !self.path.exists() {
            return Err(JoshError::not_found(
                "secret file",
                self.path.display().to_string(),
            ));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Returns the path to the secret file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        let storage = SecretStorage::with_path(file_path);

        let result = storage.load();
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_load_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");

        let json_content = r#"{
            "openai": {
                "api_key": "test-key-123",
                "model_name": "gpt-4o"
            }
        }"#;

        fs::write(&file_path, json_content).unwrap();

        let storage = SecretStorage::with_path(file_path);
        let config = storage.load().unwrap();

        assert!(config.openai.is_some());
        let openai = config.openai.unwrap();
        assert_eq!(openai.api_key, "test-key-123");
        assert_eq!(openai.model_name, Some("gpt-4o".to_string()));
    }

    #[test]
    fn test_load_empty_config() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");

        let json_content = r#"{}"#;
        fs::write(&file_path, json_content).unwrap();

        let storage = SecretStorage::with_path(file_path);
        let config = storage.load().unwrap();

        assert!(config.openai.is_none());
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");

        let invalid_json = r#"{ invalid json"#;
        fs::write(&file_path, invalid_json).unwrap();

        let storage = SecretStorage::with_path(file_path);
        let result = storage.load();

        assert!(result.unwrap_err().is_serialization());
    }

    #[test]
    fn test_load_missing_model_name() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");

        let json_content = r#"{ "openai": { "api_key": "test-key" } }"#;
        fs::write(&file_path, json_content).unwrap();

        let storage = SecretStorage::with_path(file_path);
        let config = storage.load().unwrap();

        let openai = config.openai.unwrap();
        assert_eq!(openai.api_key, "test-key");
        assert!(openai.model_name.is_none());
    }
}
