//! # Client configuration: `config.toml`
//!
//! Lives in the platform config directory (`~/.config/faye-diary/config.toml`
//! on Linux) unless `FAYE_CONFIG` points elsewhere. A `.env` file in the
//! working directory is loaded first, then environment variables override the
//! file.
//!
//! ```toml
//! backend = "remote"            # or "local"
//! display_name = "Faye"
//! data_dir = "/home/faye/diary" # local backend only
//!
//! [supabase]
//! url = "https://xyz.supabase.co"
//! anon_key = "..."
//! ```
//!
//! | Variable            | Overrides           |
//! |---------------------|---------------------|
//! | `SUPABASE_URL`      | `supabase.url`      |
//! | `SUPABASE_ANON_KEY` | `supabase.anon_key` |
//! | `FAYE_BACKEND`      | `backend`           |
//! | `FAYE_DATA_DIR`     | `data_dir`          |
//! | `FAYE_DISPLAY_NAME` | `display_name`      |
//!
//! When no backend is named, a configured Supabase URL selects the remote
//! backend and everything else falls back to local JSON files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use crate::error::{Error, Result};

const APP_DIR: &str = "faye-diary";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Remote,
    Local,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SupabaseSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: Option<BackendKind>,
    #[serde(default)]
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Owner id written on records by the local backend.
    #[serde(default = "default_local_user")]
    pub local_user: String,
}

fn default_local_user() -> String {
    "local".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: None,
            supabase: SupabaseSettings::default(),
            data_dir: None,
            display_name: None,
            local_user: default_local_user(),
        }
    }
}

/// `~/.config/faye-diary` or `./.faye-diary` when there is no config dir.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(format!(".{}", APP_DIR)))
}

fn default_data_dir() -> PathBuf {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push(APP_DIR);
    p
}

impl Settings {
    /// Loads `.env`, the config file and environment overrides.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path = std::env::var("FAYE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"));

        let mut settings = if path.exists() {
            log::debug!("reading config from {}", path.display());
            Self::from_toml(&fs::read_to_string(&path)?)?
        } else {
            Self::default()
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    /// Applies `SUPABASE_*` / `FAYE_*` values; blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get("SUPABASE_URL") {
            self.supabase.url = url;
        }
        if let Some(key) = get("SUPABASE_ANON_KEY") {
            self.supabase.anon_key = key;
        }
        if let Some(kind) = get("FAYE_BACKEND") {
            match kind.to_lowercase().as_str() {
                "remote" | "supabase" => self.backend = Some(BackendKind::Remote),
                "local" | "file" => self.backend = Some(BackendKind::Local),
                other => log::warn!("ignoring unknown FAYE_BACKEND '{}'", other),
            }
        }
        if let Some(dir) = get("FAYE_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(name) = get("FAYE_DISPLAY_NAME") {
            self.display_name = Some(name);
        }
    }

    /// Backend to use after defaults are resolved.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.unwrap_or(if self.supabase.url.is_empty() {
            BackendKind::Local
        } else {
            BackendKind::Remote
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Supabase URL and anon key, or a config error naming what is missing.
    pub fn supabase(&self) -> Result<(&str, &str)> {
        if self.supabase.url.is_empty() {
            return Err(Error::Config("supabase.url (or SUPABASE_URL) is not set".into()));
        }
        if self.supabase.anon_key.is_empty() {
            return Err(Error::Config("supabase.anon_key (or SUPABASE_ANON_KEY) is not set".into()));
        }
        Ok((&self.supabase.url, &self.supabase.anon_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_means_local_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.backend_kind(), BackendKind::Local);
        assert_eq!(settings.local_user, "local");
    }

    #[test]
    fn supabase_url_selects_remote_backend() {
        let settings = Settings::from_toml(
            r#"
            display_name = "Faye"

            [supabase]
            url = "https://xyz.supabase.co"
            anon_key = "anon"
            "#,
        )
        .unwrap();
        assert_eq!(settings.backend_kind(), BackendKind::Remote);
        assert_eq!(settings.supabase().unwrap(), ("https://xyz.supabase.co", "anon"));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut settings = Settings::from_toml("backend = \"remote\"").unwrap();
        let env: HashMap<&str, &str> = [
            ("FAYE_BACKEND", "local"),
            ("FAYE_DATA_DIR", "/tmp/faye"),
            ("FAYE_DISPLAY_NAME", "  "),
        ]
        .into_iter()
        .collect();
        settings.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.backend_kind(), BackendKind::Local);
        assert_eq!(settings.data_dir(), PathBuf::from("/tmp/faye"));
        assert_eq!(settings.display_name, None);
    }

    #[test]
    fn missing_anon_key_is_a_config_error() {
        let settings = Settings::from_toml("[supabase]\nurl = \"https://x\"").unwrap();
        assert!(matches!(settings.supabase(), Err(Error::Config(_))));
    }
}
