use std::sync::Arc;

use snafu::ResultExt;

use crate::container::core::ContainerCore;
use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::registry::{ModuleInnerSnafu, RegistryError};
use crate::container::Managed;
use crate::key::{Key, TypedKey};
use crate::lifetime::Lifetime;
use crate::module::Module;
use crate::provider::component::{Component, ComponentProvider};
use crate::provider::{TypedProvider, TypedSharedProvider};
use crate::util::any::Downcast;

/// A service container.
///
/// [`Container`] is a cheap handle: clones share the same bindings,
/// instances and singleton cache, and every operation takes `&self`, so a
/// container may be shared by threads freely.
///
/// Objects are resolved with [`TypedInjector::make`].
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use wirebox::prelude::*;
/// let container = Container::new();
/// container.value(key::named("app.name"), String::from("Darkheim"));
///
/// let name: String = container.make(key::named("app.name")).unwrap();
/// assert_eq!(name, "Darkheim");
/// assert_eq!(container.get(key::named::<String>("app.name")).as_deref(), Some("Darkheim"));
/// ```
///
/// [`TypedInjector::make`]: crate::container::injector::TypedInjector::make
#[derive(Clone, Default)]
pub struct Container {
    core: Arc<ContainerCore>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a binding whose provider runs on every resolution of
    /// `key`. A previous binding of `key` is replaced; an instance of `key`
    /// still wins.
    pub fn bind<K, P>(&self, key: K, provider: P)
    where
        K: TypedKey,
        P: TypedProvider<Output = K::Target>,
    {
        self.core.bind(Box::new(key), Box::new(provider));
    }

    /// Registers a binding whose provider runs once; the object it returns
    /// is cached and handed out to every later resolution of `key`.
    pub fn singleton<K, P>(&self, key: K, provider: P)
    where
        K: TypedKey,
        P: TypedSharedProvider<Output = K::Target>,
    {
        self.core.singleton(Box::new(key), Box::new(provider));
    }

    /// Registers a pre-built object. It takes precedence over any binding
    /// of `key`, whether that binding was registered before or after it.
    pub fn instance<K>(&self, key: K, object: K::Target)
    where
        K: TypedKey<Target: Clone>,
    {
        self.core.instance(Box::new(key), Box::new(object));
    }

    /// Registers a plain value such as a string or a configuration record.
    ///
    /// Values share the storage of [`Container::instance`]; the separate
    /// name keeps registration sites readable.
    pub fn value<K>(&self, key: K, value: K::Target)
    where
        K: TypedKey<Target: Clone>,
    {
        self.instance(key, value);
    }

    /// Returns true if a binding, an instance or a value is registered
    /// under `key`.
    pub fn has<K>(&self, key: K) -> bool
    where
        K: TypedKey,
    {
        self.core.has(&key)
    }

    /// Returns the instance or value registered under `key`, never
    /// constructing anything.
    pub fn get<K>(&self, key: K) -> Option<K::Target>
    where
        K: TypedKey,
    {
        let object = self.core.instance_of(&key)?;
        match object.downcast::<K::Target>() {
            Ok(object) => Some(*object),
            Err(_) => unreachable!("the object's type should be `K::Target`"),
        }
    }

    /// Like [`Container::get`], but falls back to `default`.
    pub fn get_or<K>(&self, key: K, default: K::Target) -> K::Target
    where
        K: TypedKey,
    {
        self.get(key).unwrap_or(default)
    }

    /// Constructs `C` through its constructor without any binding, its
    /// dependencies resolved from this container.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency of `C` can't be resolved or the
    /// construction fails.
    pub fn build<C>(&self) -> Result<C::Constructed, InjectorError>
    where
        C: Component,
    {
        // The trace starts at `C` rather than its output, so a decorator may
        // depend on a binding of the very type it produces.
        let key = crate::key::of::<C>();
        ComponentProvider::<C>::new().provide(self, &CallContext::new(&key))
    }

    /// Runs the registrations of `module` against this container.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ModuleInner`] if the module fails.
    pub fn install<M>(&self, module: M) -> Result<(), RegistryError>
    where
        M: Module,
    {
        let name = module.name();
        tracing::debug!(module = name, "installing module");
        module.configure(self).context(ModuleInnerSnafu { module: name })
    }

    /// Returns the lifetime of the binding registered under `key`, if any.
    pub fn lifetime_of<K>(&self, key: K) -> Option<Lifetime>
    where
        K: TypedKey,
    {
        self.core.lifetime_of(&key)
    }

    /// The number of bindings, instances excluded.
    pub fn binding_count(&self) -> usize {
        self.core.binding_count()
    }
}

impl Injector for Container {
    fn dyn_make(&self, key: &dyn Key) -> Result<Box<dyn Managed>, InjectorError> {
        self.core.dyn_make(key)
    }

    fn dyn_make_dependency<'a>(
        &self,
        key: &dyn Key,
        context: &'a CallContext<'a>,
    ) -> Result<Box<dyn Managed>, InjectorError> {
        self.core.dyn_make_dependency(key, context)
    }

    fn contains(&self, key: &dyn Key) -> bool {
        self.core.has(key)
    }
}

