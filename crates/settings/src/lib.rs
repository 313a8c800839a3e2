//! Layered configuration: compiled-in defaults per section, overridden by a
//! ron delta file that stores only what differs from those defaults.
//!
//! ```ignore
//! #[derive(Default, Serialize, Deserialize)]
//! struct Submission { endpoint_url: String }
//!
//! impl settings::Settings for Submission {
//!     const SECTION: &'static str = "submission";
//! }
//!
//! let store = SettingsStore::builder().with_settings_file(path).build()?;
//! store.register::<Submission>()?;
//! store.update::<Submission, _>(|s| s.endpoint_url = "https://flow.example/run".into())?;
//! ```

mod delta;
mod errors;
mod store;

pub use errors::SettingsError;
pub use store::{SettingsStore, SettingsStoreBuilder};

/// A serde model that lives under its own top-level key in the settings file.
pub trait Settings: 'static + Send + Sync {
    /// Key of the section in the delta file.
    const SECTION: &'static str;

    fn name() -> &'static str {
        Self::SECTION
    }
}
