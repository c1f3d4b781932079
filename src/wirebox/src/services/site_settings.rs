use std::sync::Arc;

use crate::component;
use crate::services::{row, Cache, Database, ServiceError};

const TABLE: &str = "site_settings";

/// Site-wide settings editable at runtime, e.g. whether registration is
/// open.
pub trait SiteSettingsService: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&self, name: &str, value: &str) -> Result<(), ServiceError>;

    /// Returns true if the setting is `1`, `true`, `on` or `yes`.
    fn is_enabled(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            )
        })
    }
}

/// A [`SiteSettingsService`] reading through a [`Cache`].
pub struct DatabaseSiteSettings {
    database: Arc<dyn Database>,
    cache: Arc<dyn Cache>,
}

#[component(Arc<dyn SiteSettingsService>, Arc::new)]
impl DatabaseSiteSettings {
    #[inject]
    pub fn new(database: Arc<dyn Database>, cache: Arc<dyn Cache>) -> Self {
        Self { database, cache }
    }

    fn cache_key(name: &str) -> String {
        format!("{TABLE}:{name}")
    }
}

impl SiteSettingsService for DatabaseSiteSettings {
    fn get(&self, name: &str) -> Option<String> {
        let cache_key = Self::cache_key(name);
        if let Some(value) = self.cache.get(&cache_key) {
            return Some(value);
        }
        let value = self
            .database
            .find_by(TABLE, "name", name)
            .into_iter()
            .next()?
            .remove("value")?;
        self.cache.set(&cache_key, value.clone(), None);
        Some(value)
    }

    fn set(&self, name: &str, value: &str) -> Result<(), ServiceError> {
        let existing = self.database.find_by(TABLE, "name", name).into_iter().next();
        let id = existing.and_then(|row| row.get("id")?.parse::<u64>().ok());
        match id {
            Some(id) => self.database.update(TABLE, id, row([("value", value)]))?,
            None => {
                self.database
                    .insert(TABLE, row([("name", name), ("value", value)]))?;
            }
        }
        self.cache.delete(&Self::cache_key(name));
        Ok(())
    }
}
