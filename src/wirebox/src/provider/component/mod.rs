mod wrapper;

use std::error::Error;

use crate::container::injector::{InjectorError, TypedInjector};
use crate::container::Managed;

pub use wrapper::ComponentProvider;

/// A type that has a dedicated constructor for dependency injection.
///
/// The constructor's parameters are resolved from the injector one by one,
/// in declaration order. Each parameter either resolves its own key, falls
/// back to a declared default when nothing is registered for that key, or
/// fails with [`InjectorError::UnresolvableParameter`] naming itself.
///
/// Usually, you don't need to implement the [`Component`] trait manually,
/// because the [`component`] macro derives it from an `#[inject]`
/// constructor. A hand-written implementation looks like this:
///
/// ```rust
/// # use std::sync::Arc;
/// # use std::convert::Infallible;
/// # use wirebox::container::injector::{TypedInjector, InjectorError};
/// # use wirebox::provider::component::Component;
/// # use wirebox::key;
/// #
/// trait Greeter: Send + Sync + 'static {}
///
/// struct ConsoleGreeter {
///     app_name: String,
///     retries: u32,
/// }
///
/// impl Greeter for ConsoleGreeter {}
///
/// impl Component for ConsoleGreeter {
///     type Constructed = Arc<dyn Greeter>;
///
///     type Error = Infallible;
///
///     fn construct<I>(injector: &I) -> Result<Result<Self, Self::Error>, InjectorError>
///     where
///         I: TypedInjector + ?Sized
///     {
///         let app_name = injector
///             .make(key::named("app.name"))
///             .map_err(|err| InjectorError::unresolvable_parameter(
///                 "ConsoleGreeter",
///                 "app_name",
///                 err,
///             ))?;
///         let retries = if injector.contains(&key::named::<u32>("greeter.retries")) {
///             injector.make(key::named("greeter.retries"))?
///         } else {
///             3
///         };
///         Ok(Ok(Self { app_name, retries }))
///     }
///
///     fn post_process(self) -> Self::Constructed {
///         Arc::new(self)
///     }
/// }
/// ```
///
/// [`component`]: crate::component
pub trait Component: Managed + Sized {
    /// The successfully constructed object. This can be not only `Self`, but
    /// also some boxed `Self`, such as `Arc<Self>` and `Arc<dyn Trait>`.
    type Constructed: Managed;

    /// The error occurred in object construction after all dependencies are
    /// retrieved.
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Retrieves the dependencies from the injector and creates the object.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency without a default can't be resolved.
    ///
    /// Returns an inner error [`Component::Error`] wrapped in the outer [`Ok`]
    /// if the object construction fails.
    fn construct<I>(injector: &I) -> Result<Result<Self, Self::Error>, InjectorError>
    where
        I: TypedInjector + ?Sized;

    /// Converts `self` to [`Component::Constructed`]. Typical usages are
    /// putting `self` to an [`Arc`] and coercing it to an `Arc<dyn Trait>`.
    ///
    /// [`Arc`]: std::sync::Arc
    fn post_process(self) -> Self::Constructed;
}
