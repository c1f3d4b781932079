mod context;
mod proxy;

use std::error::Error;
use std::sync::Arc;

use snafu::prelude::*;

use crate::container::Managed;
use crate::key::{Key, TypedKey};
use crate::util::any::Downcast;

pub use context::{CallContext, Dependents, InjectionTrace};
pub(crate) use proxy::DependencyInjector;

/// The resolution side of a container, as seen by providers.
#[cfg_attr(test, mockall::automock)]
pub trait Injector: Send + Sync {
    /// Resolves the object identified by `key` at the top of a new
    /// resolution chain.
    fn dyn_make(&self, key: &dyn Key) -> Result<Box<dyn Managed>, InjectorError>;

    /// Resolves the object identified by `key` as a dependency of the object
    /// currently being constructed in `context`.
    fn dyn_make_dependency<'a>(
        &self,
        key: &dyn Key,
        context: &'a CallContext<'a>,
    ) -> Result<Box<dyn Managed>, InjectorError>;

    /// Returns true if a binding or a pre-built instance exists for `key`.
    /// A `true` answer does not guarantee that resolution will succeed.
    fn contains(&self, key: &dyn Key) -> bool;
}

pub trait TypedInjector: Injector {
    /// Resolves the object identified by `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is registered under `key`, a dependency
    /// can't be resolved, a dependency cycle is found or the construction
    /// itself fails.
    fn make<K>(&self, key: K) -> Result<K::Target, InjectorError>
    where
        K: TypedKey,
    {
        match self.dyn_make(&key) {
            Ok(boxed) => match boxed.downcast::<K::Target>() {
                Ok(object) => Ok(*object),
                Err(_) => unreachable!("the object's type should be `K::Target`"),
            },
            Err(err) => Err(err),
        }
    }

    fn upcast_dyn(&self) -> &dyn Injector;
}

impl<T> TypedInjector for T
where
    T: Injector,
{
    fn upcast_dyn(&self) -> &dyn Injector {
        self
    }
}

impl TypedInjector for dyn Injector + '_ {
    fn upcast_dyn(&self) -> &dyn Injector {
        self
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum InjectorError {
    #[snafu(display("no binding or instance is registered for {key}"))]
    #[non_exhaustive]
    NotFound { key: Box<dyn Key> },
    #[snafu(display("could not resolve parameter `{parameter}` of {component}"))]
    #[non_exhaustive]
    UnresolvableParameter {
        component: &'static str,
        parameter: &'static str,
        source: Box<InjectorError>,
    },
    #[snafu(display("could not construct the object {key} which depends on itself somehow"))]
    #[non_exhaustive]
    CyclicDependency { key: Box<dyn Key> },
    #[snafu(display("could not construct the object {key}"))]
    #[non_exhaustive]
    ObjectConstruction {
        key: Box<dyn Key>,
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl InjectorError {
    /// Wraps the failure to resolve one constructor parameter, naming both
    /// the parameter and the type it belongs to.
    pub fn unresolvable_parameter(
        component: &'static str,
        parameter: &'static str,
        source: InjectorError,
    ) -> Self {
        Self::UnresolvableParameter {
            component,
            parameter,
            source: Box::new(source),
        }
    }

    /// Wraps the failure of a provider's own construction logic, reported
    /// after all dependencies of `key` were resolved.
    pub fn object_construction<E>(key: &dyn Key, err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self::ObjectConstruction {
            key: key.dyn_clone(),
            source: Arc::from(err.into()),
        }
    }

    /// Returns the innermost error of a chain of unresolvable parameters.
    pub fn root_cause(&self) -> &InjectorError {
        let mut this = self;
        while let Self::UnresolvableParameter { source, .. } = this {
            this = source;
        }
        this
    }
}

impl Clone for InjectorError {
    fn clone(&self) -> Self {
        match self {
            Self::NotFound { key } => Self::NotFound {
                key: key.dyn_clone(),
            },
            Self::UnresolvableParameter {
                component,
                parameter,
                source,
            } => Self::UnresolvableParameter {
                component,
                parameter,
                source: source.clone(),
            },
            Self::CyclicDependency { key } => Self::CyclicDependency {
                key: key.dyn_clone(),
            },
            Self::ObjectConstruction { key, source } => Self::ObjectConstruction {
                key: key.dyn_clone(),
                source: Arc::clone(source),
            },
        }
    }
}
