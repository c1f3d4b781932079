mod closure_implementation;
mod factory;
mod wrapper;

use std::error::Error;

use crate::container::injector::{Injector, InjectorError};
use crate::container::Managed;

pub use factory::FactoryProvider;
pub use wrapper::ClosureProvider;

/// A specialized form of [`Fn`] that can be called by supplying arguments
/// resolved from an [`Injector`].
///
/// Closures of `Fn(A1, A2, ...) -> Result<T, E> + Send + Sync + 'static`
/// where `Ai: Managed` are [`Closure`]s. Each argument is resolved by its
/// type alone, without a qualifier. Closures of arity up to 12 are
/// supported.
///
/// Usually you don't need to use a [`Closure`] directly; `to_closure()` in
/// the binding [`dsl`] wraps it in a [`ClosureProvider`].
///
/// [`dsl`]: crate::module::dsl
pub trait Closure<D>
where
    Self: Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    /// The successfully constructed object.
    type Constructed: Managed;

    /// The error occurred in object construction after all dependencies are
    /// retrieved.
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Resolves the arguments from the injector and calls `self` with them.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument can't be resolved.
    ///
    /// Returns an inner error [`Closure::Error`] wrapped in the outer [`Ok`]
    /// if the object construction fails.
    fn run(
        &self,
        injector: &dyn Injector,
    ) -> Result<Result<Self::Constructed, Self::Error>, InjectorError>;
}

/// A factory callable: a closure which receives the container's
/// [`Injector`] and pulls its dependencies out of it explicitly.
///
/// Resolution failures inside the factory are meant to be propagated with
/// `?` through the outer [`Result`]; construction failures of the factory's
/// own go into the inner one.
///
/// ```rust
/// # use std::convert::Infallible;
/// # use wirebox::container::injector::{Injector, TypedInjector};
/// # use wirebox::key;
/// # use wirebox::provider::closure::FactoryProvider;
/// let provider = FactoryProvider::new(|injector: &dyn Injector| {
///     let app_name: String = injector.make(key::named("app.name"))?;
///     Ok(Ok::<_, Infallible>(format!("Welcome to {app_name}")))
/// });
/// ```
pub trait Factory
where
    Self: Fn(&dyn Injector) -> Result<Result<Self::Constructed, Self::Error>, InjectorError>,
    Self: Send + Sync + 'static,
{
    /// The successfully constructed object.
    type Constructed: Managed;

    /// The error occurred in object construction after all dependencies are
    /// retrieved.
    type Error: Into<Box<dyn Error + Send + Sync>>;
}

impl<F, T, E> Factory for F
where
    T: Managed,
    E: Into<Box<dyn Error + Send + Sync>>,
    Self: Fn(&dyn Injector) -> Result<Result<T, E>, InjectorError>,
    Self: Send + Sync + 'static,
{
    type Constructed = T;

    type Error = E;
}
