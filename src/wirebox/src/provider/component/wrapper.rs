use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;

use crate::container::injector::{
    CallContext, DependencyInjector, InjectorError, TypedInjector,
};
use crate::container::SharedManaged;
use crate::provider::component::Component;
use crate::provider::{TypedProvider, TypedSharedProvider};

/// A [`Provider`] which constructs a [`Component`] through its constructor.
///
/// [`Provider`]: crate::provider::Provider
pub struct ComponentProvider<C>
where
    C: Component,
{
    _marker: PhantomData<fn() -> C>,
}

impl<C> ComponentProvider<C>
where
    C: Component,
{
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<C> Debug for ComponentProvider<C>
where
    C: Component,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ComponentProvider")
            .field("component", &std::any::type_name::<C>())
            .finish()
    }
}

impl<C> TypedProvider for ComponentProvider<C>
where
    C: Component,
{
    type Output = C::Constructed;

    fn provide<I>(
        &self,
        injector: &I,
        context: &CallContext<'_>,
    ) -> Result<Self::Output, InjectorError>
    where
        I: TypedInjector + ?Sized,
    {
        let dependencies = DependencyInjector::new(injector, context);
        C::construct(&dependencies)?
            .map(Component::post_process)
            .map_err(|err| InjectorError::object_construction(context.key(), err))
    }
}

impl<C> TypedSharedProvider for ComponentProvider<C> where C: Component<Constructed: SharedManaged> {}
