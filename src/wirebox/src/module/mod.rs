//! Grouping of registrations.
//!
//! A [`Module`] registers a coherent set of bindings on a [`Container`], and
//! a [`Configuration`] composes modules so that an application can be wired
//! from several independent parts.

pub mod dsl;

pub use dsl::{bind, bind_key};

use std::error::Error;

use snafu::ResultExt;

use crate::container::registry::ModuleInnerSnafu;
use crate::container::Container;

/// A set of registrations applied to a [`Container`] at once.
///
/// # Examples
///
/// ```rust
/// # use std::error::Error;
/// # use wirebox::prelude::*;
/// struct SettingsModule;
///
/// impl Module for SettingsModule {
///     fn configure(&self, container: &Container) -> Result<(), Box<dyn Error + Send + Sync>> {
///         container.value(key::named("app.name"), String::from("Darkheim"));
///         container.value(key::named("session.lifetime"), 3600u64);
///         Ok(())
///     }
/// }
///
/// let container = Container::new();
/// container.install(SettingsModule).unwrap();
/// assert!(container.has(key::named::<u64>("session.lifetime")));
/// ```
pub trait Module: Send + Sync + 'static {
    /// The name reported when the module fails.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Registers the module's bindings.
    ///
    /// # Errors
    ///
    /// Returns an error if the module can't finish its registrations, e.g.
    /// because a value it needs can't be computed.
    fn configure(&self, container: &Container) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// An ordered composition of [`Module`]s, itself a [`Module`].
#[derive(Default)]
pub struct Configuration {
    modules: Vec<Box<dyn Module>>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<M: Module>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn compose(mut self, mut other: Configuration) -> Self {
        self.modules.append(&mut other.modules);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Module for Configuration {
    /// Configures the modules in the order they were added, stopping at the
    /// first failure.
    fn configure(&self, container: &Container) -> Result<(), Box<dyn Error + Send + Sync>> {
        for module in &self.modules {
            module
                .configure(container)
                .context(ModuleInnerSnafu {
                    module: module.name(),
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use crate::container::registry::RegistryError;
    use crate::key;

    use super::*;

    struct AppModule;

    impl Module for AppModule {
        fn configure(&self, container: &Container) -> Result<(), Box<dyn Error + Send + Sync>> {
            container.value(key::named("app.name"), String::from("Darkheim"));
            Ok(())
        }
    }

    struct SessionModule;

    impl Module for SessionModule {
        fn name(&self) -> &'static str {
            "session"
        }

        fn configure(&self, container: &Container) -> Result<(), Box<dyn Error + Send + Sync>> {
            let lifetime: u64 = "forever".parse()?;
            container.value(key::named("session.lifetime"), lifetime);
            Ok(())
        }
    }

    #[test]
    fn configuration_install_succeeds() {
        let container = Container::new();
        let configuration = Configuration::new().with(AppModule);
        assert_eq!(configuration.len(), 1);

        container.install(configuration).unwrap();
        assert_eq!(
            container.get(key::named::<String>("app.name")).as_deref(),
            Some("Darkheim")
        );
    }

    #[test]
    fn configuration_install_fails_when_module_fails() {
        let container = Container::new();
        let configuration = Configuration::new()
            .with(AppModule)
            .compose(Configuration::new().with(SessionModule));

        let err = container.install(configuration).err().unwrap();
        let RegistryError::ModuleInner { module, source } = &err;
        assert_eq!(*module, std::any::type_name::<Configuration>());

        let inner = source.downcast_ref::<RegistryError>().unwrap();
        assert_eq!(inner.to_string(), "module session fails to register its bindings");
        assert!(inner.source().is_some());

        assert!(container.has(key::named::<String>("app.name")));
        assert!(!container.has(key::named::<u64>("session.lifetime")));
    }
}
