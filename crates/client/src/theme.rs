//! Light/dark theme preference, persisted in the client data directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the OS setting.
    #[default]
    System,
}

impl ThemePreference {
    /// Resolve `System` against the OS preference.
    pub fn resolve(self, os_prefers_dark: bool) -> ThemePreference {
        match self {
            ThemePreference::System if os_prefers_dark => ThemePreference::Dark,
            ThemePreference::System => ThemePreference::Light,
            other => other,
        }
    }

    pub fn toggled(self, os_prefers_dark: bool) -> ThemePreference {
        match self.resolve(os_prefers_dark) {
            ThemePreference::Dark => ThemePreference::Light,
            _ => ThemePreference::Dark,
        }
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to write preferences to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    theme: ThemePreference,
}

/// File-backed theme preference.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    current: Arc<RwLock<ThemePreference>>,
    file_path: PathBuf,
}

impl ThemeStore {
    /// Load the stored preference. Missing or unreadable files give the default.
    pub async fn load(data_dir: &Path) -> Self {
        let file_path = data_dir.join(PREFERENCES_FILE);

        let theme = match fs::read_to_string(&file_path).await {
            Ok(content) => match serde_json::from_str::<Preferences>(&content) {
                Ok(prefs) => prefs.theme,
                Err(e) => {
                    tracing::warn!(path = ?file_path, "ignoring corrupt preferences: {e}");
                    ThemePreference::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ThemePreference::default(),
            Err(e) => {
                tracing::warn!(path = ?file_path, "cannot read preferences: {e}");
                ThemePreference::default()
            }
        };

        Self {
            current: Arc::new(RwLock::new(theme)),
            file_path,
        }
    }

    pub async fn get(&self) -> ThemePreference {
        *self.current.read().await
    }

    pub async fn set(&self, theme: ThemePreference) -> Result<(), ThemeError> {
        *self.current.write().await = theme;
        self.persist().await
    }

    async fn persist(&self) -> Result<(), ThemeError> {
        let prefs = Preferences {
            theme: *self.current.read().await,
        };

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).await.map_err(|source| ThemeError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(&prefs)?;
        fs::write(&self.file_path, content)
            .await
            .map_err(|source| ThemeError::Write {
                path: self.file_path.clone(),
                source,
            })
    }
}
