use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ron::value::{Map as RonMap, Value as RonValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::delta::{diff, from_value, merge, to_map};
use crate::{Settings, SettingsError};

type Deltas = HashMap<String, RonValue>;

/// Builder for `SettingsStore` (single delta file).
#[derive(Default)]
pub struct SettingsStoreBuilder {
    settings_file: Option<PathBuf>,
}

impl SettingsStoreBuilder {
    pub fn with_settings_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    pub fn build(self) -> Result<SettingsStore, SettingsError> {
        let file_path = self
            .settings_file
            .ok_or(SettingsError::Invalid("settings file not specified"))?;

        if let Some(dir) = file_path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let deltas = read_deltas(&file_path)?;
        debug!(path = %file_path.display(), sections = deltas.len(), "settings deltas loaded");

        Ok(SettingsStore {
            file_path,
            deltas: RwLock::new(deltas),
            sections: RwLock::new(HashMap::new()),
        })
    }
}

/// Defaults and effective value of one registered section.
struct Section {
    defaults: RonMap,
    effective: RonValue,
}

/// Thread-safe settings store.
///
/// Sections register their defaults; the delta file overrides them. `update`
/// recomputes the recursive diff against the defaults and rewrites the file
/// atomically (write to `.tmp`, rename).
pub struct SettingsStore {
    file_path: PathBuf,
    deltas: RwLock<Deltas>,
    sections: RwLock<HashMap<&'static str, Section>>,
}

impl SettingsStore {
    pub fn builder() -> SettingsStoreBuilder {
        SettingsStoreBuilder::default()
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn is_registered<T: Settings>(&self) -> bool {
        self.sections_read()
            .map(|s| s.contains_key(T::name()))
            .unwrap_or(false)
    }

    /// Register a section type (loads defaults and applies an existing delta).
    pub fn register<T>(&self) -> Result<(), SettingsError>
    where
        T: Settings + Default + Serialize,
    {
        let name = T::name();
        let defaults = to_map(&T::default())?;
        let effective = {
            let deltas = self.deltas_read()?;
            effective_value(&defaults, deltas.get(name))
        };

        let mut sections = self.sections_write()?;
        if sections.contains_key(name) {
            return Err(SettingsError::Invalid("section already registered"));
        }
        sections.insert(
            name,
            Section {
                defaults,
                effective,
            },
        );
        Ok(())
    }

    /// Snapshot of the effective section value.
    pub fn get<T>(&self) -> Result<Arc<T>, SettingsError>
    where
        T: Settings + DeserializeOwned,
    {
        let sections = self.sections_read()?;
        let section = sections
            .get(T::name())
            .ok_or(SettingsError::NotRegistered(T::name()))?;
        Ok(Arc::new(from_value(&section.effective)?))
    }

    /// Mutate a section; only the difference to its defaults is persisted.
    pub fn update<T, F>(&self, mutator: F) -> Result<(), SettingsError>
    where
        T: Settings + Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let name = T::name();
        let delta = {
            let mut sections = self.sections_write()?;
            let section = sections
                .get_mut(name)
                .ok_or(SettingsError::NotRegistered(name))?;

            let mut model: T = from_value(&section.effective)?;
            mutator(&mut model);
            let updated = to_map(&model)?;
            let delta = diff(&updated, &section.defaults);
            section.effective = RonValue::Map(updated);
            delta
        };

        {
            let mut deltas = self.deltas_write()?;
            if delta.is_empty() {
                deltas.remove(name);
            } else {
                deltas.insert(name.to_string(), RonValue::Map(delta));
            }
        }

        self.persist()
    }

    /// Re-read the delta file and re-merge every registered section.
    pub fn reload(&self) -> Result<(), SettingsError> {
        let fresh = read_deltas(&self.file_path)?;
        {
            let mut sections = self.sections_write()?;
            for (name, section) in sections.iter_mut() {
                section.effective = effective_value(&section.defaults, fresh.get(*name));
            }
        }
        *self.deltas_write()? = fresh;
        Ok(())
    }

    fn persist(&self) -> Result<(), SettingsError> {
        let text = {
            let deltas = self.deltas_read()?;
            ron::ser::to_string_pretty(&*deltas, ron::ser::PrettyConfig::default())?
        };
        let tmp = self.file_path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.file_path)?;
        debug!(path = %self.file_path.display(), "settings deltas persisted");
        Ok(())
    }

    fn deltas_read(&self) -> Result<RwLockReadGuard<'_, Deltas>, SettingsError> {
        self.deltas.read().map_err(|_| SettingsError::Poisoned)
    }

    fn deltas_write(&self) -> Result<RwLockWriteGuard<'_, Deltas>, SettingsError> {
        self.deltas.write().map_err(|_| SettingsError::Poisoned)
    }

    fn sections_read(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<&'static str, Section>>, SettingsError> {
        self.sections.read().map_err(|_| SettingsError::Poisoned)
    }

    fn sections_write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<&'static str, Section>>, SettingsError> {
        self.sections.write().map_err(|_| SettingsError::Poisoned)
    }
}

fn read_deltas(path: &Path) -> Result<Deltas, SettingsError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    Ok(ron::from_str(&content)?)
}

fn effective_value(defaults: &RonMap, delta: Option<&RonValue>) -> RonValue {
    match delta {
        Some(RonValue::Map(delta)) => RonValue::Map(merge(defaults, delta)),
        // a scalar delta cannot be reconciled with a struct section
        _ => RonValue::Map(defaults.clone()),
    }
}
