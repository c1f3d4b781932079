use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::container::injector::{
    CallContext, DependencyInjector, Injector, InjectorError, TypedInjector,
};
use crate::container::{Managed, SharedManaged};
use crate::provider::closure::Factory;
use crate::provider::{TypedProvider, TypedSharedProvider};

/// A [`Provider`] which runs a [`Factory`] against the container.
///
/// The factory sees an injector bound to the current resolution, so the
/// objects it asks for are tracked as dependencies of the one it builds.
///
/// [`Provider`]: crate::provider::Provider
pub struct FactoryProvider<T, F>
where
    T: Managed,
    F: Factory<Constructed = T>,
{
    factory: F,
}

impl<T, F> FactoryProvider<T, F>
where
    T: Managed,
    F: Factory<Constructed = T>,
{
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<T, F> Debug for FactoryProvider<T, F>
where
    T: Managed,
    F: Factory<Constructed = T>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FactoryProvider")
            .field("output", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T, F> TypedProvider for FactoryProvider<T, F>
where
    T: Managed,
    F: Factory<Constructed = T>,
{
    type Output = T;

    fn provide<I>(
        &self,
        injector: &I,
        context: &CallContext<'_>,
    ) -> Result<Self::Output, InjectorError>
    where
        I: TypedInjector + ?Sized,
    {
        let dependencies = DependencyInjector::new(injector, context);
        (self.factory)(&dependencies as &dyn Injector)?
            .map_err(|err| InjectorError::object_construction(context.key(), err))
    }
}

impl<T, F> TypedSharedProvider for FactoryProvider<T, F>
where
    T: SharedManaged,
    F: Factory<Constructed = T>,
{
}
