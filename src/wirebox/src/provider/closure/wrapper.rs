use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;

use crate::container::injector::{
    CallContext, DependencyInjector, InjectorError, TypedInjector,
};
use crate::container::{Managed, SharedManaged};
use crate::provider::closure::Closure;
use crate::provider::{TypedProvider, TypedSharedProvider};

/// A [`Provider`] which supplies objects from a [`Closure`].
///
/// Each argument of the closure is resolved without a qualifier.
///
/// # Examples
///
/// ```rust
/// # use std::convert::Infallible;
/// # use std::sync::Arc;
/// # use wirebox::provider::closure::ClosureProvider;
/// let provider = ClosureProvider::new(|table: Arc<str>, limit: u32| {
///     Ok::<_, Infallible>(format!("SELECT * FROM {table} LIMIT {limit}"))
/// });
/// ```
///
/// [`Provider`]: crate::provider::Provider
pub struct ClosureProvider<T, C, D>
where
    T: Managed,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    closure: C,
    _marker: PhantomData<fn() -> (T, D)>,
}

impl<T, C, D> ClosureProvider<T, C, D>
where
    T: Managed,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    pub fn new(closure: C) -> Self {
        Self {
            closure,
            _marker: PhantomData,
        }
    }
}

impl<T, C, D> Debug for ClosureProvider<T, C, D>
where
    T: Managed,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ClosureProvider")
            .field("output", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T, C, D> TypedProvider for ClosureProvider<T, C, D>
where
    T: Managed,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
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
        self.closure
            .run(&dependencies)?
            .map_err(|err| InjectorError::object_construction(context.key(), err))
    }
}

impl<T, C, D> TypedSharedProvider for ClosureProvider<T, C, D>
where
    T: SharedManaged,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
}
