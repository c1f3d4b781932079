use crate::container::{Container, Managed};
use crate::key::{self, TypedQualifier};

/// A binding of a pre-built object.
pub struct InstanceBinding<KT, KQ>
where
    KT: Managed + Clone,
    KQ: TypedQualifier,
{
    instance: KT,
    qualifier: KQ,
}

impl<KT, KQ> InstanceBinding<KT, KQ>
where
    KT: Managed + Clone,
    KQ: TypedQualifier,
{
    pub(super) fn new(instance: KT, qualifier: KQ) -> Self {
        Self {
            instance,
            qualifier,
        }
    }

    pub fn qualified_by<NewKQ>(self, qualifier: NewKQ) -> InstanceBinding<KT, NewKQ>
    where
        NewKQ: TypedQualifier,
    {
        InstanceBinding::new(self.instance, qualifier)
    }

    pub fn set_on(self, container: &Container) {
        let key = key::qualified::<KT, _>(self.qualifier);
        container.instance(key, self.instance);
    }
}
