//! Factories that construct objects on behalf of a container.
//!
//! A binding associates a key with a provider. The container decides when a
//! provider runs and whether its product is cached; the provider only knows
//! how to build one object, pulling its dependencies from an [`Injector`].

pub mod closure;
pub mod component;

use std::fmt::Debug;

use crate::container::injector::{CallContext, Injector, InjectorError, TypedInjector};
use crate::container::{CloneManaged, Managed, SharedManaged};

/// A universal factory which constructs objects of one type.
///
/// A [`Provider`] is stateless and may be used by multiple threads. Each
/// request to a [`Provider`] should receive a new object; sharing is decided
/// by the container, not by the provider.
///
/// Usually, you don't need to implement [`Provider`] manually, since this is
/// automatically done by [`TypedProvider`]'s blanket implementation.
pub trait Provider: Debug + Send + Sync + 'static {
    /// Provides a newly created type-erased object. The `injector` supplies
    /// the dependencies and `context` describes the ongoing resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency can't be resolved or the object
    /// construction fails.
    fn dyn_provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Box<dyn Managed>, InjectorError>;
}

/// A static variant of the [`Provider`] trait, leveraging static dispatch and
/// type-safety.
pub trait TypedProvider: Provider {
    /// The return type in response to each request to the provider.
    type Output: Managed;

    /// Provides a newly created object of type [`TypedProvider::Output`].
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency can't be resolved or the object
    /// construction fails.
    fn provide<I>(
        &self,
        injector: &I,
        context: &CallContext<'_>,
    ) -> Result<Self::Output, InjectorError>
    where
        I: TypedInjector + ?Sized;
}

impl<T: TypedProvider> Provider for T {
    fn dyn_provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Box<dyn Managed>, InjectorError> {
        self.provide(injector, context)
            .map(|obj| -> Box<dyn Managed> { Box::new(obj) })
    }
}

/// A variant of [`Provider`] whose products can be cached as singletons.
pub trait SharedProvider: Provider {
    /// Provides a newly created shareable type-erased object.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency can't be resolved or the object
    /// construction fails.
    fn dyn_provide_shared(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Box<dyn CloneManaged>, InjectorError>;
}

/// A static variant of [`SharedProvider`]. Implementing it on a
/// [`TypedProvider`] whose output is a shared handle is all it takes to make
/// the provider usable for singleton bindings.
pub trait TypedSharedProvider
where
    Self: SharedProvider + TypedProvider<Output: SharedManaged>,
{
}

impl<T: TypedSharedProvider> SharedProvider for T {
    fn dyn_provide_shared(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Box<dyn CloneManaged>, InjectorError> {
        self.provide(injector, context)
            .map(|obj| -> Box<dyn CloneManaged> { Box::new(obj) })
    }
}
