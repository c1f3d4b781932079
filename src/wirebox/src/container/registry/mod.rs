mod provider_map;

use std::error::Error;

use snafu::prelude::*;

pub(super) use provider_map::{ProviderEntry, ProviderMap};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum RegistryError {
    #[snafu(display("module {module} fails to register its bindings"))]
    #[non_exhaustive]
    ModuleInner {
        module: &'static str,
        source: Box<dyn Error + Send + Sync>,
    },
}
