use std::fmt::{Display, Formatter, Result as FmtResult};
use std::iter::{self, FusedIterator};

use crate::key::Key;

/// Information about the resolution currently in progress.
///
/// A context lives on the stack of the resolving thread. Resolving a
/// dependency pushes a child context that borrows its parent, so the whole
/// chain of pending resolutions is available without any allocation.
#[derive(Clone)]
pub struct CallContext<'a> {
    trace: InjectionTrace<'a>,
}

impl<'a> CallContext<'a> {
    pub fn new(key: &'a dyn Key) -> Self {
        Self {
            trace: InjectionTrace {
                key,
                parent: None,
            },
        }
    }

    /// Creates the context of resolving `key` as a dependency of the object
    /// this context describes.
    pub fn enter<'b>(&'b self, key: &'b dyn Key) -> CallContext<'b> {
        CallContext {
            trace: InjectionTrace {
                key,
                parent: Some(&self.trace),
            },
        }
    }

    /// The key being resolved.
    pub fn key(&self) -> &dyn Key {
        self.trace.key
    }

    pub fn trace(&self) -> &InjectionTrace<'a> {
        &self.trace
    }
}

/// The chain of keys from the outermost `make` call down to the key
/// currently being resolved.
#[derive(Clone)]
pub struct InjectionTrace<'a> {
    key: &'a dyn Key,
    parent: Option<&'a InjectionTrace<'a>>,
}

impl<'a> InjectionTrace<'a> {
    /// Iterates over the keys still waiting for the current one, innermost
    /// first.
    pub fn dependents(&self) -> Dependents<'_> {
        Dependents {
            next: self.parent,
        }
    }

    /// The number of resolutions waiting for the current one.
    pub fn depth(&self) -> usize {
        self.dependents().count()
    }

    /// Returns true if resolving the current key was requested, directly or
    /// not, by the resolution of that very key.
    pub fn is_reentrant(&self) -> bool {
        self.dependents().any(|key| key == self.key)
    }
}

/// Renders the chain outermost first, e.g. `App -> Database -> Logger`.
impl Display for InjectionTrace<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let keys: Vec<_> = iter::once(self.key).chain(self.dependents()).collect();
        for (index, key) in keys.iter().rev().enumerate() {
            if index > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

pub struct Dependents<'a> {
    next: Option<&'a InjectionTrace<'a>>,
}

impl<'a> Iterator for Dependents<'a> {
    type Item = &'a dyn Key;

    fn next(&mut self) -> Option<Self::Item> {
        let trace = self.next?;
        self.next = trace.parent;
        Some(trace.key)
    }
}

impl FusedIterator for Dependents<'_> {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::key;

    use super::*;

    #[test]
    fn injection_trace_is_reentrant_succeeds() {
        let auth = key::named::<String>("auth");
        let database = key::named::<String>("database");
        let logger = key::named::<String>("logger");

        let root = CallContext::new(&auth);
        let child = root.enter(&database);
        let leaf = child.enter(&logger);
        let cycle = child.enter(&auth);

        assert_eq!(leaf.trace().depth(), 2);
        assert!(!leaf.trace().is_reentrant());
        assert!(cycle.trace().is_reentrant());
        assert!(!root.trace().is_reentrant());
    }

    #[test]
    fn injection_trace_display_succeeds() {
        let app = key::of::<Arc<str>>();
        let dsn = key::named::<String>("database.dsn");

        let root = CallContext::new(&app);
        let child = root.enter(&dsn);

        assert_eq!(root.trace().to_string(), "alloc::sync::Arc<str>");
        assert_eq!(
            child.trace().to_string(),
            "alloc::sync::Arc<str> -> alloc::string::String@\"database.dsn\""
        );
    }
}
