use crate::container::injector::{CallContext, Injector, InjectorError, TypedInjector};
use crate::container::Managed;
use crate::key::Key;

/// The [`Injector`] handed to a provider while it constructs the object of
/// `context`.
///
/// Every top-level resolution made through it is turned into a dependency
/// resolution under `context`, which keeps the trace intact for cycle
/// detection even though user code only ever calls `make`.
pub struct DependencyInjector<'a, I>
where
    I: TypedInjector + ?Sized,
{
    container: &'a I,
    context: &'a CallContext<'a>,
}

impl<'a, I> DependencyInjector<'a, I>
where
    I: TypedInjector + ?Sized,
{
    pub fn new(container: &'a I, context: &'a CallContext<'a>) -> Self {
        Self { container, context }
    }
}

impl<I> Injector for DependencyInjector<'_, I>
where
    I: TypedInjector + ?Sized,
{
    fn dyn_make(&self, key: &dyn Key) -> Result<Box<dyn Managed>, InjectorError> {
        self.container.dyn_make_dependency(key, self.context)
    }

    fn dyn_make_dependency<'a>(
        &self,
        key: &dyn Key,
        context: &'a CallContext<'a>,
    ) -> Result<Box<dyn Managed>, InjectorError> {
        self.container.dyn_make_dependency(key, context)
    }

    fn contains(&self, key: &dyn Key) -> bool {
        self.container.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use crate::container::injector::MockInjector;
    use crate::key;

    use super::*;

    #[test]
    fn dependency_injector_make_succeeds_when_resolved_under_context() {
        let mut container = MockInjector::new();
        container.expect_dyn_make().never();
        container
            .expect_dyn_make_dependency()
            .times(1)
            .returning(|key, context| {
                assert_eq!(key, &key::named::<u32>("cache.ttl") as &dyn Key);
                assert_eq!(context.key(), &key::of::<String>() as &dyn Key);
                Ok(Box::new(300u32))
            });
        container.expect_contains().returning(|_| true);

        let parent = key::of::<String>();
        let context = CallContext::new(&parent);
        let injector = DependencyInjector::new(&container, &context);

        assert!(injector.contains(&key::named::<u32>("cache.ttl")));
        assert_eq!(injector.make(key::named::<u32>("cache.ttl")).unwrap(), 300);
    }
}
