use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wirebox::prelude::*;

trait Repository: Send + Sync {
    fn name(&self) -> &str;
}

struct UserRepository {
    connection: Arc<Connection>,
}

#[component(Arc<dyn Repository>, Arc::new)]
impl UserRepository {
    #[inject]
    fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }
}

impl Repository for UserRepository {
    fn name(&self) -> &str {
        &self.connection.dsn
    }
}

struct Connection {
    dsn: String,
}

#[component(Arc<Connection>, Arc::new)]
impl Connection {
    #[inject]
    fn new(#[named("database.dsn")] dsn: String) -> Self {
        Self { dsn }
    }
}

struct Controller {
    repository: Arc<dyn Repository>,
}

#[component]
impl Controller {
    #[inject]
    fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }
}

fn container() -> Container {
    let container = Container::new();
    container.value(key::named::<String>("database.dsn"), "memory://users".to_string());
    bind::<Arc<Connection>>().as_singleton().set_on(&container);
    bind::<Arc<dyn Repository>>()
        .as_singleton()
        .to_component::<UserRepository>()
        .set_on(&container);
    container
}

#[test]
fn container_make_succeeds_when_singleton_is_resolved_twice() {
    let container = container();

    let first = container.make(key::of::<Arc<dyn Repository>>()).unwrap();
    let second = container.make(key::of::<Arc<dyn Repository>>()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(container.lifetime_of(key::of::<Arc<dyn Repository>>()), Some(Lifetime::Singleton));
}

#[test]
fn container_make_succeeds_when_transient_is_resolved_twice() {
    let container = Container::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    bind::<Arc<String>>()
        .to_closure(move || {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(Arc::new(format!("request-{call}")))
        })
        .set_on(&container);

    let first = container.make(key::of::<Arc<String>>()).unwrap();
    let second = container.make(key::of::<Arc<String>>()).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(container.lifetime_of(key::of::<Arc<String>>()), Some(Lifetime::Transient));
}

#[test]
fn container_make_succeeds_when_dependencies_are_resolved_recursively() {
    let container = container();

    let controller = container.build::<Controller>().unwrap();

    assert_eq!(controller.repository.name(), "memory://users");
}

#[test]
fn container_make_succeeds_when_instance_overrides_binding() {
    let container = container();
    let replacement = Arc::new(Connection {
        dsn: String::from("memory://replacement"),
    });
    container.instance(key::of::<Arc<Connection>>(), Arc::clone(&replacement));

    let connection = container.make(key::of::<Arc<Connection>>()).unwrap();

    assert!(Arc::ptr_eq(&connection, &replacement));
    assert_eq!(
        container.lifetime_of(key::of::<Arc<Connection>>()),
        Some(Lifetime::Singleton)
    );
}

#[test]
fn container_make_succeeds_when_instance_precedes_binding() {
    let container = Container::new();
    let seeded = Arc::new(Connection {
        dsn: String::from("memory://seeded"),
    });
    container.instance(key::of::<Arc<Connection>>(), Arc::clone(&seeded));
    container.value(key::named::<String>("database.dsn"), "memory://built".to_string());
    bind::<Arc<Connection>>().as_singleton().set_on(&container);

    let connection = container.make(key::of::<Arc<Connection>>()).unwrap();

    assert!(Arc::ptr_eq(&connection, &seeded));
    assert_eq!(connection.dsn, "memory://seeded");
    assert_eq!(container.binding_count(), 1);
}

struct CachedRepository {
    label: String,
}

#[component(Arc<dyn Repository>, Arc::new)]
impl CachedRepository {
    #[inject]
    fn new(inner: Arc<dyn Repository>) -> Self {
        Self {
            label: format!("cached+{}", inner.name()),
        }
    }
}

impl Repository for CachedRepository {
    fn name(&self) -> &str {
        &self.label
    }
}

#[test]
fn container_build_succeeds_when_component_decorates_its_own_output_type() {
    let container = Container::new();
    container.value(key::named::<String>("database.dsn"), "memory://users".to_string());
    bind::<Arc<Connection>>().as_singleton().set_on(&container);
    bind::<Arc<dyn Repository>>()
        .to_component::<UserRepository>()
        .set_on(&container);

    let repository = container.build::<CachedRepository>().unwrap();

    assert_eq!(repository.name(), "cached+memory://users");
}

#[test]
fn container_make_fails_when_binding_is_missing() {
    let container = Container::new();

    let err = container.make(key::of::<Arc<dyn Repository>>()).err().unwrap();

    assert!(matches!(err, InjectorError::NotFound { .. }));
    assert!(!container.has(key::of::<Arc<dyn Repository>>()));
}

#[test]
fn container_make_fails_when_parameter_is_unresolvable() {
    let container = Container::new();
    bind::<Arc<Connection>>().as_singleton().set_on(&container);

    let err = container.make(key::of::<Arc<Connection>>()).err().unwrap();

    assert_eq!(
        err.to_string(),
        format!(
            "could not resolve parameter `dsn` of {}",
            std::any::type_name::<Connection>()
        )
    );
}

#[test]
fn container_get_succeeds_when_value_is_registered() {
    let container = container();

    assert_eq!(
        container.get(key::named::<String>("database.dsn")).as_deref(),
        Some("memory://users")
    );
    assert_eq!(container.get(key::named::<u64>("session.lifetime")), None);
    assert_eq!(container.get_or(key::named::<u64>("session.lifetime"), 7200), 7200);
}

#[test]
fn container_get_fails_when_target_is_only_bound() {
    let container = container();

    assert!(container.has(key::of::<Arc<Connection>>()));
    assert!(container.get(key::of::<Arc<Connection>>()).is_none());
}

#[test]
fn container_clone_succeeds_when_sharing_registrations() {
    let container = container();
    let handle = container.clone();
    let first = container.make(key::of::<Arc<Connection>>()).unwrap();

    handle.value(key::named::<u64>("session.lifetime"), 60);

    assert!(Arc::ptr_eq(&first, &handle.make(key::of::<Arc<Connection>>()).unwrap()));
    assert_eq!(container.get(key::named::<u64>("session.lifetime")), Some(60));
}
