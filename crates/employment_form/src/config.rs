//! Settings sections of the employment form.

use std::path::Path;

use serde::{Deserialize, Serialize};
use settings::{Settings, SettingsError, SettingsStore};

/// Workflow endpoint and form behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormCfg {
    pub endpoint_url: String,
    /// Citizenship value that asks for national-ID details.
    pub home_country: String,
    /// Key of the stored email in the session file.
    pub session_key: String,
    pub confirmation_page: String,
}

impl Default for FormCfg {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            home_country: "Malaysia".into(),
            session_key: "userEmail".into(),
            confirmation_page: "thank-you.html".into(),
        }
    }
}

impl Settings for FormCfg {
    const SECTION: &'static str = "form";
}

/// Identity provider used by the password sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthCfg {
    pub base_url: String,
    pub accept_invalid_certs: bool,
}

impl Default for AuthCfg {
    fn default() -> Self {
        Self {
            base_url: "https://127.0.0.1:4433".into(),
            accept_invalid_certs: cfg!(debug_assertions),
        }
    }
}

impl Settings for AuthCfg {
    const SECTION: &'static str = "auth";
}

/// Open the settings file and register every section of this crate.
pub fn open_store(path: impl AsRef<Path>) -> Result<SettingsStore, SettingsError> {
    let store = SettingsStore::builder()
        .with_settings_file(path.as_ref())
        .build()?;
    store.register::<FormCfg>()?;
    store.register::<AuthCfg>()?;
    Ok(store)
}
