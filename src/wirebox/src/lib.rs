//! A typed service container with automatic dependency resolution.
//!
//! Objects are registered on a [`Container`] under typed [`key`]s, either as
//! bindings to a provider (constructed on demand, optionally cached as
//! singletons) or as pre-built instances and values. Resolving a key builds
//! the whole dependency graph behind it. The [`ServiceProvider`] wires the
//! core application services on top of a container.
//!
//! [`Container`]: container::Container
//! [`ServiceProvider`]: service_provider::ServiceProvider

#![allow(clippy::new_without_default)]

extern crate self as wirebox;

pub mod config;
pub mod container;
pub mod key;
pub mod lifetime;
pub mod module;
pub mod provider;
pub mod service_provider;
pub mod services;
mod util;

pub use wirebox_derive::component;

pub mod prelude {
    pub use crate::component;
    pub use crate::container::injector::{Injector, InjectorError, TypedInjector};
    pub use crate::container::registry::RegistryError;
    pub use crate::container::Container;
    pub use crate::key;
    pub use crate::lifetime::Lifetime;
    pub use crate::module::dsl::{bind, bind_key};
    pub use crate::module::{Configuration, Module};
    pub use crate::provider::component::Component;
    pub use crate::service_provider::ServiceProvider;
}
