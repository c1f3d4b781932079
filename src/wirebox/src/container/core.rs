use std::collections::HashMap;
use std::thread::{self, ThreadId};

use oneshot::{Receiver, Sender};
use parking_lot::{RwLock, RwLockWriteGuard};

use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::object_map::ObjectMap;
use crate::container::registry::{ProviderEntry, ProviderMap};
use crate::container::{CloneManaged, Managed};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::{Provider, SharedProvider};

/// The state behind a [`Container`] handle.
///
/// Resolution looks in the instance registry first, then in the singleton
/// cache, and only then runs the bound provider. No lock is held while a
/// provider runs, so providers are free to resolve their own dependencies
/// through the same core.
///
/// [`Container`]: crate::container::Container
#[derive(Default)]
pub struct ContainerCore {
    providers: RwLock<ProviderMap>,
    instances: RwLock<ObjectMap>,
    managed: RwLock<SharedManagedObjectData>,
}

impl ContainerCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, key: Box<dyn Key>, provider: Box<dyn Provider>) {
        self.evict_singleton(key.as_ref());
        tracing::debug!(key = %key, lifetime = "transient", "binding registered");
        self.providers.write().insert(key, provider);
    }

    pub fn singleton(&self, key: Box<dyn Key>, provider: Box<dyn SharedProvider>) {
        self.evict_singleton(key.as_ref());
        tracing::debug!(key = %key, lifetime = "singleton", "binding registered");
        self.providers.write().insert_shared(key, provider);
    }

    /// Registers a pre-built object. Instances win over bindings of the same
    /// key no matter which was registered first.
    pub fn instance(&self, key: Box<dyn Key>, object: Box<dyn CloneManaged>) {
        tracing::debug!(key = %key, "instance registered");
        if self.instances.write().insert(key.dyn_clone(), object).is_some() {
            tracing::debug!(key = %key, "previous instance replaced");
        }
    }

    /// Drops the cached singleton of `key`, so that a new binding takes
    /// effect on the next resolution.
    fn evict_singleton(&self, key: &dyn Key) {
        if self.managed.write().objects.remove(key).is_some() {
            tracing::debug!(key = %key, "cached singleton evicted");
        }
    }

    pub fn has(&self, key: &dyn Key) -> bool {
        self.instances.read().contains(key) || self.providers.read().contains(key)
    }

    /// Looks up the instance registry without constructing anything.
    pub fn instance_of(&self, key: &dyn Key) -> Option<Box<dyn Managed>> {
        self.instances.read().get(key)
    }

    pub fn lifetime_of(&self, key: &dyn Key) -> Option<Lifetime> {
        self.providers.read().get(key).map(|entry| entry.lifetime())
    }

    pub fn binding_count(&self) -> usize {
        self.providers.read().len()
    }

    fn get_object(&self, context: &CallContext) -> Result<Box<dyn Managed>, InjectorError> {
        let key = context.key();
        if let Some(object) = self.instance_of(key) {
            tracing::trace!(key = %key, "resolved from instance registry");
            return Ok(object);
        }
        if let Some(object) = self.try_get_cached_singleton(key) {
            tracing::trace!(key = %key, "resolved from singleton cache");
            return Ok(object);
        }

        match self.try_get_provider_by_key(key)? {
            ProviderEntry::Shared(provider) => {
                self.get_shared_object(provider.as_ref(), context)
            }
            ProviderEntry::Owned(provider) => self.get_unbounded_object(provider.as_ref(), context),
        }
    }

    fn try_get_cached_singleton(&self, key: &dyn Key) -> Option<Box<dyn Managed>> {
        self.managed.read().objects.get(key)
    }

    fn try_get_provider_by_key(&self, key: &dyn Key) -> Result<ProviderEntry, InjectorError> {
        match self.providers.read().get(key) {
            Some(entry) => Ok(entry),
            None => Err(InjectorError::NotFound {
                key: key.dyn_clone(),
            }),
        }
    }

    fn get_shared_object(
        &self,
        provider: &dyn SharedProvider,
        context: &CallContext,
    ) -> Result<Box<dyn Managed>, InjectorError> {
        let key = context.key();
        let mut managed = self.managed.write();

        // Another resolution may have finished between the cache lookup and
        // taking the write lock.
        if let Some(object) = managed.objects.get(key) {
            return Ok(object);
        }

        if let Some(constructing) = managed.constructing.get(key) {
            if constructing.is_constructed_by_current_thread() || managed.wait_would_deadlock(key) {
                Err(self.stop_construction_on_cyclic_dependency(managed, key))
            } else {
                self.wait_for_constructed_object(managed, key)
            }
        } else {
            self.construct_shared_object(managed, provider, context)
        }
    }

    fn stop_construction_on_cyclic_dependency(
        &self,
        managed: RwLockWriteGuard<SharedManagedObjectData>,
        key: &dyn Key,
    ) -> InjectorError {
        let err = InjectorError::CyclicDependency {
            key: key.dyn_clone(),
        };
        tracing::debug!(key = %key, "cyclic dependency detected");
        if managed
            .constructing
            .get(key)
            .is_some_and(ConstructingObjectContext::is_constructed_by_current_thread)
        {
            self.notify_waiters(managed, key, WaitResponse::Error(err.clone()));
        }
        err
    }

    fn wait_for_constructed_object(
        &self,
        mut managed: RwLockWriteGuard<SharedManagedObjectData>,
        key: &dyn Key,
    ) -> Result<Box<dyn Managed>, InjectorError> {
        let (sender, receiver) = oneshot::channel();
        let Some(constructing) = managed.constructing.get_mut(key) else {
            unreachable!("whether the construction is in flight should be checked before waiting")
        };
        constructing.register_waiter(sender);
        let current = thread::current().id();
        managed.waiting.insert(current, key.dyn_clone());
        drop(managed);

        tracing::trace!(key = %key, "waiting for singleton constructed by another thread");
        let res = self.get_object_on_response(receiver, key);
        self.managed.write().waiting.remove(&current);
        res
    }

    fn get_object_on_response(
        &self,
        receiver: Receiver<WaitResponse>,
        key: &dyn Key,
    ) -> Result<Box<dyn Managed>, InjectorError> {
        match receiver.recv() {
            Ok(WaitResponse::Constructed(object)) => Ok(object.upcast_managed()),
            Ok(WaitResponse::Error(err)) => Err(err),
            Err(_) => unreachable!("the constructing thread should always respond to {key}"),
        }
    }

    fn construct_shared_object(
        &self,
        mut managed: RwLockWriteGuard<SharedManagedObjectData>,
        provider: &dyn SharedProvider,
        context: &CallContext,
    ) -> Result<Box<dyn Managed>, InjectorError> {
        let key = context.key();
        let constructing = ConstructingObjectContext::new(thread::current().id());
        managed.constructing.insert(key.dyn_clone(), constructing);
        drop(managed);

        tracing::debug!(key = %key, depth = context.trace().depth(), "constructing singleton");
        match provider.dyn_provide_shared(self, context) {
            Ok(object) => {
                let mut managed = self.managed.write();
                managed.objects.insert(key.dyn_clone(), object.clone_managed());
                self.notify_waiters(managed, key, WaitResponse::Constructed(object.clone_managed()));
                Ok(object.upcast_managed())
            }
            Err(err) => {
                let managed = self.managed.write();
                self.notify_waiters(managed, key, WaitResponse::Error(err.clone()));
                Err(err)
            }
        }
    }

    fn notify_waiters(
        &self,
        mut managed: RwLockWriteGuard<SharedManagedObjectData>,
        key: &dyn Key,
        response: WaitResponse,
    ) {
        if let Some(constructing) = managed.constructing.remove(key) {
            drop(managed);
            constructing.notify(response);
        }
    }

    fn get_unbounded_object(
        &self,
        provider: &dyn Provider,
        context: &CallContext,
    ) -> Result<Box<dyn Managed>, InjectorError> {
        let key = context.key();
        if context.trace().is_reentrant() {
            tracing::debug!(path = %context.trace(), "cyclic dependency detected");
            Err(InjectorError::CyclicDependency {
                key: key.dyn_clone(),
            })
        } else {
            tracing::trace!(key = %key, depth = context.trace().depth(), "constructing transient");
            provider.dyn_provide(self, context)
        }
    }
}

impl Injector for ContainerCore {
    fn dyn_make(&self, key: &dyn Key) -> Result<Box<dyn Managed>, InjectorError> {
        let context = CallContext::new(key);
        self.get_object(&context)
    }

    fn dyn_make_dependency<'a>(
        &self,
        key: &dyn Key,
        context: &'a CallContext<'a>,
    ) -> Result<Box<dyn Managed>, InjectorError> {
        let context = context.enter(key);
        self.get_object(&context)
    }

    fn contains(&self, key: &dyn Key) -> bool {
        self.has(key)
    }
}

#[derive(Default)]
struct SharedManagedObjectData {
    objects: ObjectMap,
    constructing: HashMap<Box<dyn Key>, ConstructingObjectContext>,
    /// The singleton each blocked thread is waiting for.
    waiting: HashMap<ThreadId, Box<dyn Key>>,
}

impl SharedManagedObjectData {
    /// Follows the chain of threads blocked on each other, starting from the
    /// thread constructing `key`. Waiting for `key` deadlocks if the chain
    /// leads back to the current thread.
    fn wait_would_deadlock(&self, key: &dyn Key) -> bool {
        let current = thread::current().id();
        let mut next = self.constructing.get(key).map(|c| c.on_thread);
        while let Some(thread) = next {
            if thread == current {
                return true;
            }
            next = self
                .waiting
                .get(&thread)
                .and_then(|key| self.constructing.get(key.as_ref()))
                .map(|c| c.on_thread);
        }
        false
    }
}

struct ConstructingObjectContext {
    on_thread: ThreadId,
    waiters: Vec<Sender<WaitResponse>>,
}

impl ConstructingObjectContext {
    fn new(on_thread: ThreadId) -> Self {
        Self {
            on_thread,
            waiters: Vec::new(),
        }
    }

    fn is_constructed_by_current_thread(&self) -> bool {
        thread::current().id() == self.on_thread
    }

    fn register_waiter(&mut self, sender: Sender<WaitResponse>) {
        self.waiters.push(sender);
    }

    fn notify(self, response: WaitResponse) {
        for sender in self.waiters {
            let _ = sender.send(response.clone());
        }
    }
}

enum WaitResponse {
    Constructed(Box<dyn CloneManaged>),
    Error(InjectorError),
}

impl Clone for WaitResponse {
    fn clone(&self) -> Self {
        match self {
            Self::Constructed(object) => Self::Constructed((**object).clone_managed()),
            Self::Error(err) => Self::Error(err.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::time::Duration;

    use crate::container::injector::{Injector, TypedInjector};
    use crate::key;
    use crate::provider::closure::FactoryProvider;

    use super::*;

    struct Node {
        id: u32,
        left: Option<Arc<Node>>,
        right: Option<Arc<Node>>,
    }

    fn node_provider(id: u32) -> Box<dyn SharedProvider> {
        Box::new(FactoryProvider::new(move |injector: &dyn Injector| {
            let (left, right) = if id <= 1 {
                (None, None)
            } else {
                (
                    Some(injector.make(key::qualified::<Arc<Node>, _>(id - 1))?),
                    Some(injector.make(key::qualified::<Arc<Node>, _>(id - 2))?),
                )
            };
            Ok(Ok::<_, Infallible>(Arc::new(Node { id, left, right })))
        }))
    }

    struct Parent {
        _child: Child,
    }

    struct Child {
        _parent: Arc<Parent>,
    }

    #[test]
    fn container_core_make_succeeds_when_singletons_share_dependencies() {
        let core = ContainerCore::new();
        for id in 0..10u32 {
            core.singleton(Box::new(key::qualified::<Arc<Node>, _>(id)), node_provider(id));
        }

        let root = core.make(key::qualified::<Arc<Node>, _>(9u32)).unwrap();
        assert_eq!(root.id, 9);

        let left = root.left.as_ref().unwrap();
        let right = root.right.as_ref().unwrap();
        assert!(Arc::ptr_eq(left.left.as_ref().unwrap(), right));

        let again = core.make(key::qualified::<Arc<Node>, _>(8u32)).unwrap();
        assert!(Arc::ptr_eq(left, &again));
    }

    #[test]
    fn container_core_make_fails_when_dependency_is_cyclic() {
        let core = ContainerCore::new();
        core.singleton(
            Box::new(key::of::<Arc<Parent>>()),
            Box::new(FactoryProvider::new(|injector: &dyn Injector| {
                Ok(Ok::<_, Infallible>(Arc::new(Parent {
                    _child: injector.make(key::of())?,
                })))
            })),
        );
        core.bind(
            Box::new(key::of::<Child>()),
            Box::new(FactoryProvider::new(|injector: &dyn Injector| {
                Ok(Ok::<_, Infallible>(Child {
                    _parent: injector.make(key::of())?,
                }))
            })),
        );

        let err = core.make(key::of::<Arc<Parent>>()).err().unwrap();
        assert!(matches!(err, InjectorError::CyclicDependency { .. }));

        let err = core.make(key::of::<Child>()).err().unwrap();
        assert!(matches!(err, InjectorError::CyclicDependency { .. }));
    }

    #[test]
    fn container_core_make_fails_when_key_is_unbound() {
        let core = ContainerCore::new();
        let err = core.make(key::named::<String>("app.name")).err().unwrap();
        assert!(matches!(err, InjectorError::NotFound { .. }));
    }

    #[test]
    fn container_core_make_constructs_singleton_once_when_threads_race() {
        let core = Arc::new(ContainerCore::new());
        let constructions = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&constructions);
        core.singleton(
            Box::new(key::of::<Arc<u64>>()),
            Box::new(FactoryProvider::new(move |_: &dyn Injector| {
                counter.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(20));
                Ok(Ok::<_, Infallible>(Arc::new(7u64)))
            })),
        );

        let barrier = Arc::new(Barrier::new(4));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let core = Arc::clone(&core);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    core.make(key::of::<Arc<u64>>()).unwrap()
                })
            })
            .collect();
        let objects: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert!(objects.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn container_core_make_fails_when_threads_wait_on_each_other() {
        let core = Arc::new(ContainerCore::new());
        let barrier = Arc::new(Barrier::new(2));
        for (id, needs) in [(1u32, 2u32), (2, 1)] {
            let barrier = Arc::clone(&barrier);
            core.singleton(
                Box::new(key::qualified::<Arc<u32>, _>(id)),
                Box::new(FactoryProvider::new(move |injector: &dyn Injector| {
                    barrier.wait();
                    let other = injector.make(key::qualified::<Arc<u32>, _>(needs))?;
                    Ok(Ok::<_, Infallible>(Arc::new(id + *other)))
                })),
            );
        }

        let handles: Vec<_> = [1u32, 2]
            .into_iter()
            .map(|id| {
                let core = Arc::clone(&core);
                std::thread::spawn(move || core.make(key::qualified::<Arc<u32>, _>(id)))
            })
            .collect();

        for handle in handles {
            let err = handle.join().unwrap().err().unwrap();
            assert!(matches!(err, InjectorError::CyclicDependency { .. }));
        }
        assert!(core.managed.read().waiting.is_empty());
        assert!(core.managed.read().constructing.is_empty());
    }

    #[test]
    fn container_core_bind_succeeds_when_cached_singleton_is_evicted() {
        let core = ContainerCore::new();
        let key = key::named::<Arc<str>>("app.name");
        core.singleton(
            Box::new(key),
            Box::new(FactoryProvider::new(|_: &dyn Injector| {
                Ok(Ok::<_, Infallible>(Arc::<str>::from("Darkheim")))
            })),
        );
        assert_eq!(&*core.make(key).unwrap(), "Darkheim");

        core.singleton(
            Box::new(key),
            Box::new(FactoryProvider::new(|_: &dyn Injector| {
                Ok(Ok::<_, Infallible>(Arc::<str>::from("Darkheim Reborn")))
            })),
        );
        assert_eq!(&*core.make(key).unwrap(), "Darkheim Reborn");
        assert_eq!(core.binding_count(), 1);
        assert_eq!(core.lifetime_of(&key), Some(Lifetime::Singleton));
    }

    #[test]
    fn container_core_instance_succeeds_when_binding_exists() {
        let core = ContainerCore::new();
        let key = key::named::<u32>("session.lifetime");
        core.bind(
            Box::new(key),
            Box::new(FactoryProvider::new(|_: &dyn Injector| Ok(Ok::<_, Infallible>(60u32)))),
        );
        core.instance(Box::new(key), Box::new(3600u32));

        assert!(core.has(&key));
        assert_eq!(core.make(key).unwrap(), 3600);
    }

    #[test]
    fn container_core_instance_survives_later_binding() {
        let core = ContainerCore::new();
        let key = key::of::<Arc<String>>();
        core.instance(Box::new(key), Box::new(Arc::new(String::from("seeded"))));
        core.singleton(
            Box::new(key),
            Box::new(FactoryProvider::new(|_: &dyn Injector| {
                Ok(Ok::<_, Infallible>(Arc::new(String::from("built"))))
            })),
        );

        assert_eq!(core.make(key).unwrap().as_str(), "seeded");
        assert_eq!(core.lifetime_of(&key), Some(Lifetime::Singleton));

        core.instance(Box::new(key), Box::new(Arc::new(String::from("reseeded"))));
        assert_eq!(core.make(key).unwrap().as_str(), "reseeded");
    }
}
