use std::marker::PhantomData;

use crate::container::{Container, Managed, SharedManaged};
use crate::key::{self, TypedQualifier};
use crate::lifetime::{Lifetime, Singleton, ToLifetime, Transient};
use crate::provider::{TypedProvider, TypedSharedProvider};

/// A binding whose supplier is chosen: a component, a closure, a factory or
/// a hand-written provider all end up here as a [`TypedProvider`].
///
/// The qualifier and the lifetime may still be changed before the binding
/// is set on a container.
pub struct SuppliedBinding<KT, KQ, L, P>
where
    KT: Managed,
    KQ: TypedQualifier,
    L: ToLifetime,
    P: TypedProvider<Output = KT>,
{
    provider: P,
    qualifier: KQ,
    _lifetime: PhantomData<L>,
}

impl<KT, KQ, L, P> SuppliedBinding<KT, KQ, L, P>
where
    KT: Managed,
    KQ: TypedQualifier,
    L: ToLifetime,
    P: TypedProvider<Output = KT>,
{
    pub(super) fn new(provider: P, qualifier: KQ) -> Self {
        Self {
            provider,
            qualifier,
            _lifetime: PhantomData,
        }
    }

    fn with<NewKQ, NewL>(self, qualifier: NewKQ) -> SuppliedBinding<KT, NewKQ, NewL, P>
    where
        NewKQ: TypedQualifier,
        NewL: ToLifetime,
    {
        SuppliedBinding::new(self.provider, qualifier)
    }

    pub fn qualified_by<NewKQ>(self, qualifier: NewKQ) -> SuppliedBinding<KT, NewKQ, L, P>
    where
        NewKQ: TypedQualifier,
    {
        self.with(qualifier)
    }

    pub fn as_singleton(self) -> SuppliedBinding<KT, KQ, Singleton, P> {
        let qualifier = self.qualifier;
        self.with(qualifier)
    }

    pub fn as_transient(self) -> SuppliedBinding<KT, KQ, Transient, P> {
        let qualifier = self.qualifier;
        self.with(qualifier)
    }

    /// The lifetime the binding will be registered with.
    pub fn lifetime(&self) -> Lifetime {
        L::LIFETIME
    }
}

impl<KT, KQ, P> SuppliedBinding<KT, KQ, Singleton, P>
where
    KT: SharedManaged,
    KQ: TypedQualifier,
    P: TypedSharedProvider<Output = KT>,
{
    pub fn set_on(self, container: &Container) {
        container.singleton(key::qualified::<KT, _>(self.qualifier), self.provider);
    }
}

impl<KT, KQ, P> SuppliedBinding<KT, KQ, Transient, P>
where
    KT: Managed,
    KQ: TypedQualifier,
    P: TypedProvider<Output = KT>,
{
    pub fn set_on(self, container: &Container) {
        container.bind(key::qualified::<KT, _>(self.qualifier), self.provider);
    }
}
