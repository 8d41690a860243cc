//! Unified path management for josh configuration files.
//!
//! All configuration and secrets live under the user's config directory:
//!
//! ```text
//! ~/.config/josh/              # Config directory
//! └── secret.json              # API keys and secrets
//! ```

use std::path::PathBuf;

use josh_core::JoshError;

/// Unified path management for josh.
pub struct JoshPaths;

impl JoshPaths {
    /// Returns the josh configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/josh/`)
    /// - `Err(JoshError::Config)`: Could not determine home directory
    pub fn config_dir() -> Result<PathBuf, JoshError> {
        let home = dirs::home_dir()
            .ok_or_else(|| JoshError::config("Could not determine home directory"))?;
        Ok(home.join(".config").join("josh"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, JoshError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Ensures the secret file exists, creating it with a template if it doesn't.
    ///
    /// The template includes a placeholder for the OpenAI API key. On Unix the
    /// file permissions are set to 600 (user read/write only).
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the secret file (existing or newly created)
    /// - `Err(JoshError)`: If file creation or permission setting fails
    pub fn ensure_secret_file() -> Result<PathBuf, JoshError> {
        let secret_path = Self::secret_file()?;

        // If file already exists, return the path
        if secret_path.exists() {
            return Ok(secret_path);
        }

        // Ensure parent directory exists
        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create typed template using SecretConfig
        use josh_core::config::{OpenAIConfig, SecretConfig};

        let template_config = SecretConfig {
            openai: Some(OpenAIConfig {
                api_key: String::new(),
                model_name: Some("gpt-4o".to_string()),
            }),
        };

        let template_json = serde_json::to_string_pretty(&template_config)?;
        std::fs::write(&secret_path, template_json)?;

        // Set file permissions to 600 (user read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}
