use std::collections::HashMap;

use crate::container::{CloneManaged, Managed};
use crate::key::Key;

/// Objects owned by a container and handed out as clones.
#[derive(Default)]
pub struct ObjectMap {
    objects: HashMap<Box<dyn Key>, Box<dyn CloneManaged>>,
}

impl ObjectMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        key: Box<dyn Key>,
        object: Box<dyn CloneManaged>,
    ) -> Option<Box<dyn CloneManaged>> {
        self.objects.insert(key, object)
    }

    pub fn remove(&mut self, key: &dyn Key) -> Option<Box<dyn CloneManaged>> {
        self.objects.remove(key)
    }

    pub fn contains(&self, key: &dyn Key) -> bool {
        self.objects.contains_key(key)
    }

    /// Returns a fresh clone of the object stored under `key`.
    pub fn get(&self, key: &dyn Key) -> Option<Box<dyn Managed>> {
        self.objects
            .get(key)
            .map(|object| (**object).clone_managed().upcast_managed())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}
