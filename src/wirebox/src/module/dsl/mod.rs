//! A fluent way to register bindings.
//!
//! A binding starts from [`bind`] or [`bind_key`], optionally gets a
//! qualifier and a lifetime, picks what supplies the object and ends with
//! `set_on(&container)`:
//!
//! ```rust
//! # use std::convert::Infallible;
//! # use std::sync::Arc;
//! # use wirebox::prelude::*;
//! let container = Container::new();
//!
//! bind::<u64>()
//!     .qualified_by("session.lifetime")
//!     .to_instance(3600)
//!     .set_on(&container);
//!
//! bind::<Arc<str>>()
//!     .as_singleton()
//!     .to_factory(|injector: &dyn Injector| {
//!         let lifetime: u64 = injector.make(key::named("session.lifetime"))?;
//!         Ok(Ok::<_, Infallible>(Arc::<str>::from(format!("{lifetime}s"))))
//!     })
//!     .set_on(&container);
//!
//! let label = container.make(key::of::<Arc<str>>()).unwrap();
//! assert_eq!(&*label, "3600s");
//! ```
//!
//! Without an explicit supplier, the bound type is constructed through its
//! own [`Component`] implementation.
//!
//! [`Component`]: crate::provider::component::Component

pub mod instance_helper;
pub mod metadata_helper;
pub mod supplier_helper;

use metadata_helper::MetadataBinding;

use crate::container::Managed;
use crate::key::TypedKey;
use crate::lifetime::Transient;

/// Starts an unqualified transient binding of `KT`.
pub fn bind<KT>() -> MetadataBinding<KT, (), Transient>
where
    KT: Managed,
{
    MetadataBinding::new((), Transient)
}

/// Starts a transient binding of the object identified by `key`.
pub fn bind_key<K>(key: K) -> MetadataBinding<K::Target, K::Qualifier, Transient>
where
    K: TypedKey,
{
    MetadataBinding::new(key.qualifier(), Transient)
}
