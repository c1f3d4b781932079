use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::{Container, Managed};
use crate::key::{self, TypedQualifier};
use crate::lifetime::{Singleton, ToLifetime, Transient};
use crate::module::dsl::instance_helper::InstanceBinding;
use crate::module::dsl::supplier_helper::SuppliedBinding;
use crate::provider::closure::{Closure, ClosureProvider, Factory, FactoryProvider};
use crate::provider::component::{Component, ComponentProvider};
use crate::provider::TypedProvider;

/// A binding which has a target type, a qualifier and a lifetime, but no
/// supplier yet.
pub struct MetadataBinding<KT, KQ, L>
where
    KT: Managed,
    KQ: TypedQualifier,
    L: ToLifetime,
{
    qualifier: KQ,
    lifetime: L,
    _marker: PhantomData<fn() -> KT>,
}

impl<KT, KQ, L> MetadataBinding<KT, KQ, L>
where
    KT: Managed,
    KQ: TypedQualifier,
    L: ToLifetime,
{
    pub(super) fn new(qualifier: KQ, lifetime: L) -> Self {
        Self {
            qualifier,
            lifetime,
            _marker: PhantomData,
        }
    }

    pub fn qualified_by<NewKQ>(self, qualifier: NewKQ) -> MetadataBinding<KT, NewKQ, L>
    where
        NewKQ: TypedQualifier,
    {
        MetadataBinding::new(qualifier, self.lifetime)
    }

    pub fn as_singleton(self) -> MetadataBinding<KT, KQ, Singleton> {
        MetadataBinding::new(self.qualifier, Singleton)
    }

    pub fn as_transient(self) -> MetadataBinding<KT, KQ, Transient> {
        MetadataBinding::new(self.qualifier, Transient)
    }

    /// Binds the target to the output of the component `C`, typically an
    /// implementation behind a trait object handle.
    pub fn to_component<C>(self) -> SuppliedBinding<KT, KQ, L, ComponentProvider<C>>
    where
        C: Component<Constructed = KT>,
    {
        self.to_provider(ComponentProvider::new())
    }

    /// Binds the target to a closure whose arguments are resolved by type.
    pub fn to_closure<C, D>(self, closure: C) -> SuppliedBinding<KT, KQ, L, ClosureProvider<KT, C, D>>
    where
        C: Closure<D, Constructed = KT>,
        D: Send + Sync + 'static,
    {
        self.to_provider(ClosureProvider::new(closure))
    }

    /// Binds the target to a factory which receives the container.
    pub fn to_factory<F>(self, factory: F) -> SuppliedBinding<KT, KQ, L, FactoryProvider<KT, F>>
    where
        F: Factory<Constructed = KT>,
    {
        self.to_provider(FactoryProvider::new(factory))
    }

    /// Registers a pre-built object. The lifetime is irrelevant to
    /// instances and is dropped.
    pub fn to_instance(self, instance: KT) -> InstanceBinding<KT, KQ>
    where
        KT: Clone,
    {
        InstanceBinding::new(instance, self.qualifier)
    }

    /// Binds the target to any provider, the general form of the other
    /// `to_*` methods.
    pub fn to_provider<P>(self, provider: P) -> SuppliedBinding<KT, KQ, L, P>
    where
        P: TypedProvider<Output = KT>,
    {
        SuppliedBinding::new(provider, self.qualifier)
    }
}

impl<C, KQ> MetadataBinding<Arc<C>, KQ, Singleton>
where
    C: Component<Constructed = Arc<C>>,
    KQ: TypedQualifier,
{
    pub fn set_on(self, container: &Container) {
        let key = key::qualified::<Arc<C>, _>(self.qualifier);
        container.singleton(key, ComponentProvider::<C>::new());
    }
}

impl<KT, KQ> MetadataBinding<KT, KQ, Transient>
where
    KT: Component<Constructed = KT>,
    KQ: TypedQualifier,
{
    pub fn set_on(self, container: &Container) {
        let key = key::qualified::<KT, _>(self.qualifier);
        container.bind(key, ComponentProvider::<KT>::new());
    }
}
