use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::AppConfig;
use crate::services::Logger;

/// Flat, dotted-key access to the application configuration, with runtime
/// overrides.
pub trait ConfigurationManager: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Overrides `key` for the rest of the process.
    fn set(&self, key: &str, value: &str);

    fn app_name(&self) -> String {
        self.get("app.name").unwrap_or_else(|| String::from("Darkheim"))
    }
}

/// A [`ConfigurationManager`] layering runtime overrides over the loaded
/// [`AppConfig`], or over nothing when no configuration was registered.
pub struct LayeredConfigurationManager {
    logger: Arc<dyn Logger>,
    loaded: BTreeMap<&'static str, String>,
    overrides: RwLock<HashMap<String, String>>,
}

impl LayeredConfigurationManager {
    pub fn new(logger: Arc<dyn Logger>, config: Option<Arc<AppConfig>>) -> Self {
        let loaded = config.as_deref().map(flatten).unwrap_or_default();
        Self {
            logger,
            loaded,
            overrides: RwLock::new(HashMap::new()),
        }
    }
}

fn flatten(config: &AppConfig) -> BTreeMap<&'static str, String> {
    BTreeMap::from([
        ("app.name", config.app.name.clone()),
        ("app.url", config.app.url.clone()),
        ("database.dsn", config.database.dsn.clone()),
        ("mail.from_address", config.mail.from_address.clone()),
        ("mail.from_name", config.mail.from_name.clone()),
        ("session.lifetime_secs", config.session.lifetime_secs.to_string()),
    ])
}

impl ConfigurationManager for LayeredConfigurationManager {
    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.overrides.read().get(key) {
            return Some(value.clone());
        }
        self.loaded.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.logger
            .info("configuration overridden", &[("key", key), ("value", value)]);
        self.overrides
            .write()
            .insert(key.to_owned(), value.to_owned());
    }
}
