pub mod injector;
pub mod registry;

mod core;
mod handle;
mod object_map;

use std::sync::Arc;

use crate::util::any::AsAny;

pub use handle::Container;

/// Any object that a [`Container`] can hand out.
pub trait Managed: AsAny + Send + Sync + 'static {}

impl<T> Managed for T where T: AsAny + Send + Sync + 'static {}

/// A [`Managed`] object that can be duplicated behind a type-erased box.
///
/// Objects kept by a [`Container`], i.e. pre-built instances, configuration
/// values and cached singletons, are handed out as clones of the stored one.
pub trait CloneManaged: Managed {
    fn clone_managed(&self) -> Box<dyn CloneManaged>;

    fn upcast_managed(self: Box<Self>) -> Box<dyn Managed>;
}

impl<T> CloneManaged for T
where
    T: Managed + Clone,
{
    fn clone_managed(&self) -> Box<dyn CloneManaged> {
        Box::new(self.clone())
    }

    fn upcast_managed(self: Box<Self>) -> Box<dyn Managed> {
        self
    }
}

/// A [`Managed`] handle whose clones all point to the same object.
///
/// Only shared handles can be bound as singletons, so that every resolution
/// of a singleton yields the very same object rather than an equal copy.
pub trait SharedManaged: CloneManaged {}

impl<T> SharedManaged for Arc<T> where T: Send + Sync + ?Sized + 'static {}
