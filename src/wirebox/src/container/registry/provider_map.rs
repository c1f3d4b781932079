use std::collections::HashMap;
use std::sync::Arc;

use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::{Provider, SharedProvider};

/// The binding table: one provider per key, the newest registration wins.
#[derive(Debug, Default)]
pub struct ProviderMap {
    providers: HashMap<Box<dyn Key>, ProviderEntry>,
}

impl ProviderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Box<dyn Key>, provider: Box<dyn Provider>) -> Option<ProviderEntry> {
        let entry = ProviderEntry::Owned(Arc::from(provider));
        self.providers.insert(key, entry)
    }

    pub fn insert_shared(
        &mut self,
        key: Box<dyn Key>,
        provider: Box<dyn SharedProvider>,
    ) -> Option<ProviderEntry> {
        let entry = ProviderEntry::Shared(Arc::from(provider));
        self.providers.insert(key, entry)
    }

    /// Returns a handle to the provider bound to `key`, so that the caller
    /// doesn't have to keep the map borrowed while the provider runs.
    pub fn get(&self, key: &dyn Key) -> Option<ProviderEntry> {
        self.providers.get(key).cloned()
    }

    pub fn contains(&self, key: &dyn Key) -> bool {
        self.providers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

#[derive(Debug, Clone)]
pub enum ProviderEntry {
    Shared(Arc<dyn SharedProvider>),
    Owned(Arc<dyn Provider>),
}

impl ProviderEntry {
    pub fn lifetime(&self) -> Lifetime {
        match self {
            Self::Shared(_) => Lifetime::Singleton,
            Self::Owned(_) => Lifetime::Transient,
        }
    }
}
