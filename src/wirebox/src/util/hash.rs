use std::any::Any;
use std::hash::{Hash, Hasher};

pub trait DynHash: Any {
    fn dyn_eq(&self, other: &dyn Any) -> bool;

    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T: Eq + Hash + 'static> DynHash for T {
    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        self.type_id().hash(&mut state);
        self.hash(&mut state);
    }
}

#[cfg(test)]
mod tests {
    use std::hash::DefaultHasher;

    use super::*;

    #[derive(PartialEq, Eq, Hash)]
    struct Channel(&'static str);

    #[derive(PartialEq, Eq, Hash)]
    struct Table(&'static str);

    #[test]
    fn dyn_eq_succeeds() {
        let app = Channel("app");
        assert!(app.dyn_eq(&Channel("app")));
        assert!(!app.dyn_eq(&Channel("audit")));
        assert!(!app.dyn_eq(&Table("app")));
    }

    #[test]
    fn dyn_hash_succeeds_when_values_share_content_but_not_type() {
        assert_eq!(hash_val(&Channel("app")), hash_val(&Channel("app")));
        assert_ne!(hash_val(&Channel("app")), hash_val(&Table("app")));
        assert_ne!(hash_val(&Table("users")), hash_val(&Table("news")));
    }

    fn hash_val(val: &dyn DynHash) -> u64 {
        let mut hasher = DefaultHasher::new();
        val.dyn_hash(&mut hasher);
        hasher.finish()
    }
}
