use std::any::{self, TypeId};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::container::Managed;
use crate::key::{TypedKey, TypedQualifier};

/// The only [`TypedKey`] implementation: a qualifier value tagged with the
/// target type.
pub struct QualifiedKey<T, Q>
where
    T: Managed,
    Q: TypedQualifier,
{
    qualifier: Q,
    _marker: PhantomData<fn() -> T>,
}

impl<T, Q> QualifiedKey<T, Q>
where
    T: Managed,
    Q: TypedQualifier,
{
    pub fn new(qualifier: Q) -> Self {
        Self {
            qualifier,
            _marker: PhantomData,
        }
    }
}

impl<T, Q> Clone for QualifiedKey<T, Q>
where
    T: Managed,
    Q: TypedQualifier,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, Q> Copy for QualifiedKey<T, Q>
where
    T: Managed,
    Q: TypedQualifier,
{
}

impl<T, Q> Debug for QualifiedKey<T, Q>
where
    T: Managed,
    Q: TypedQualifier,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

impl<T, Q> Display for QualifiedKey<T, Q>
where
    T: Managed,
    Q: TypedQualifier,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(any::type_name::<T>())?;
        if is_unit::<Q>() {
            return Ok(());
        }
        write!(f, "@{:?}", self.qualifier)
    }
}

fn is_unit<Q: 'static>() -> bool {
    TypeId::of::<Q>() == TypeId::of::<()>()
}

impl<T, Q> PartialEq for QualifiedKey<T, Q>
where
    T: Managed,
    Q: TypedQualifier,
{
    fn eq(&self, other: &Self) -> bool {
        self.qualifier.eq(&other.qualifier)
    }
}

impl<T, Q> Eq for QualifiedKey<T, Q>
where
    T: Managed,
    Q: TypedQualifier,
{
}

impl<T, Q> Hash for QualifiedKey<T, Q>
where
    T: Managed,
    Q: TypedQualifier,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.qualifier.hash(state);
    }
}

impl<T, Q> TypedKey for QualifiedKey<T, Q>
where
    T: Managed,
    Q: TypedQualifier,
{
    type Target = T;

    type Qualifier = Q;

    fn qualifier(&self) -> Self::Qualifier {
        self.qualifier
    }
}
