use jsonwebtoken::Algorithm;
use std::env;
use std::path::PathBuf;

use crate::error::ZoomError;

pub const ZOOM_API_BASE_URL: &str = "https://api.zoom.us/v2";

pub const TOKEN_TTL_SECONDS: i64 = 30;
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

pub const WINDOW_COUNT: u32 = 6;
pub const WINDOW_SIZE_DAYS: u32 = 30;
pub const PAGE_SIZE: u32 = 300;

pub const DOWNLOAD_CHUNK_SIZE: usize = 8 * 1024;

pub const SETTINGS_DIR_NAME: &str = "zoom-recordings";
pub const SETTINGS_FILE_NAME: &str = ".env";

const ACCOUNT_EMAIL_VAR: &str = "ZOOM_ACCOUNT_EMAIL";
const API_KEY_VAR: &str = "ZOOM_API_KEY";
const API_SECRET_VAR: &str = "ZOOM_API_SECRET";
const BASE_URL_VAR: &str = "ZOOM_API_BASE_URL";
const OUTPUT_DIR_VAR: &str = "ZOOM_OUTPUT_DIR";

#[derive(Clone)]
pub struct Credentials {
    pub account_email: String,
    pub api_key: String,
    pub api_secret: String,
}

// Keep the secret out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_email", &self.account_email)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Date-window and paging knobs for one listing pass.
#[derive(Debug, Clone, Copy)]
pub struct SyncSettings {
    pub window_count: u32,
    pub window_size_days: u32,
    pub page_size: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            window_count: WINDOW_COUNT,
            window_size_days: WINDOW_SIZE_DAYS,
            page_size: PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ZoomConnectorConfig {
    pub credentials: Credentials,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub sync: SyncSettings,
}

impl ZoomConnectorConfig {
    /// Loads the per-user settings file (if any) into the environment, then
    /// reads configuration from the environment. Variables that are already
    /// set win over the file.
    pub fn load() -> Result<Self, ZoomError> {
        if let Some(path) = user_settings_path() {
            if path.exists() {
                dotenvy::from_path(&path).map_err(|e| {
                    ZoomError::Configuration(format!(
                        "Failed to read settings file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            }
        }

        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ZoomError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ZoomError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, ZoomError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ZoomError::Configuration(format!("{} must be set", key)))
        };

        let credentials = Credentials {
            account_email: required(ACCOUNT_EMAIL_VAR)?,
            api_key: required(API_KEY_VAR)?,
            api_secret: required(API_SECRET_VAR)?,
        };

        let base_url = lookup(BASE_URL_VAR)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| ZOOM_API_BASE_URL.to_string());

        let output_dir = lookup(OUTPUT_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            credentials,
            base_url,
            output_dir,
            sync: SyncSettings::default(),
        })
    }
}

/// `<user config dir>/zoom-recordings/.env`
pub fn user_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
}
