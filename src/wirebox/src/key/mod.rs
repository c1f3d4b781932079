//! Identifiers used to register and look up objects in a [`Container`].
//!
//! A key is the pair of a *target type* and a *qualifier*. The target type is
//! the exact type handed out on resolution, e.g. `Arc<dyn Logger>`, and the
//! qualifier tells apart several bindings of the same type, e.g. the
//! configuration values `"app.name"` and `"app.url"`, both of which are
//! `String`s.
//!
//! [`Container`]: crate::container::Container

mod implementation;

use std::any::TypeId;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

use crate::container::Managed;
use crate::util::any::AsAny;
use crate::util::hash::DynHash;

pub(crate) use implementation::QualifiedKey;

/// A type-erased identifier of a managed object.
pub trait Key
where
    Self: Debug + Display + AsAny + DynHash + Send + Sync + 'static,
{
    /// Returns the [`TypeId`] of the object this key identifies.
    fn target_type(&self) -> TypeId;

    /// Returns the name of the object's type, for diagnostics.
    fn target_name(&self) -> &'static str;

    fn dyn_clone(&self) -> Box<dyn Key>;
}

impl PartialEq for dyn Key {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other.as_any())
    }
}

impl Eq for dyn Key {}

impl Hash for dyn Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dyn_hash(state);
    }
}

impl<T: TypedKey> Key for T {
    fn target_type(&self) -> TypeId {
        TypeId::of::<T::Target>()
    }

    fn target_name(&self) -> &'static str {
        std::any::type_name::<T::Target>()
    }

    fn dyn_clone(&self) -> Box<dyn Key> {
        Box::new(*self)
    }
}

/// Anything that can tell apart two keys of the same target type.
pub trait TypedQualifier: Copy + Debug + Eq + Hash + Send + Sync + 'static {}

impl<T> TypedQualifier for T where T: Copy + Debug + Eq + Hash + Send + Sync + 'static {}

/// A statically typed [`Key`], which knows the type of the object it
/// identifies.
pub trait TypedKey: Key + Copy + Eq + Hash {
    type Target: Managed;

    type Qualifier: TypedQualifier;

    fn qualifier(&self) -> Self::Qualifier;
}

/// Creates an unqualified key of `T`.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use wirebox::key::{self, Key};
/// let key = key::of::<Arc<str>>();
/// assert_eq!(key.target_name(), "alloc::sync::Arc<str>");
/// ```
pub fn of<T>() -> impl TypedKey<Target = T, Qualifier = ()>
where
    T: Managed,
{
    QualifiedKey::new(())
}

/// Creates a key of `T` qualified by a string identifier, the usual shape of
/// configuration values such as `"app.name"`.
pub fn named<T>(name: &'static str) -> impl TypedKey<Target = T, Qualifier = &'static str>
where
    T: Managed,
{
    QualifiedKey::new(name)
}

/// Creates a key of `T` qualified by an arbitrary [`TypedQualifier`].
pub fn qualified<T, Q>(qualifier: Q) -> impl TypedKey<Target = T, Qualifier = Q>
where
    T: Managed,
    Q: TypedQualifier,
{
    QualifiedKey::new(qualifier)
}
