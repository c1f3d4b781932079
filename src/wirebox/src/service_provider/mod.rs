//! The façade over the core application services.
//!
//! A [`ServiceProvider`] wraps a [`Container`] populated by
//! [`register_core_services`] and exposes one typed accessor per core
//! service. Long-lived servers should construct it with
//! [`ServiceProvider::new`] at startup and pass it to their handlers;
//! [`ServiceProvider::get_instance`] keeps a process-wide provider for
//! short-lived processes.
//!
//! [`register_core_services`]: ServiceProvider::register_core_services

mod core_services;

use std::sync::{Arc, OnceLock};

use snafu::prelude::*;

use crate::container::injector::{InjectorError, TypedInjector};
use crate::container::Container;
use crate::key;
use crate::services::{
    AuthenticationService, Cache, ConfigurationManager, Database, FlashMessages, Logger, Mailer,
    NewsService, PasswordManager, SessionManager, SiteSettingsService, TokenManager,
    UserRegistration,
};

pub use core_services::CoreServices;

static INSTANCE: OnceLock<ServiceProvider> = OnceLock::new();

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ProviderError {
    #[snafu(display("the service provider must be given a container when first requested"))]
    #[non_exhaustive]
    MissingContainer,
    #[snafu(display("could not resolve the {service} service"))]
    #[non_exhaustive]
    Resolve {
        service: &'static str,
        source: InjectorError,
    },
}

/// Typed access to the core services registered in a [`Container`].
#[derive(Clone)]
pub struct ServiceProvider {
    container: Container,
}

macro_rules! accessors {
    ($($(#[$meta:meta])* $name:ident => $contract:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Result<Arc<dyn $contract>, ProviderError> {
                self.container
                    .make(key::of::<Arc<dyn $contract>>())
                    .context(ResolveSnafu {
                        service: stringify!($contract),
                    })
            }
        )*
    };
}

impl ServiceProvider {
    pub fn new(container: Container) -> Self {
        Self { container }
    }

    /// Returns the process-wide provider, creating it around `container` on
    /// the first call.
    ///
    /// Once the provider exists, any container passed here is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingContainer`] if no provider exists yet
    /// and `container` is `None`.
    pub fn get_instance(container: Option<Container>) -> Result<&'static Self, ProviderError> {
        if let Some(provider) = INSTANCE.get() {
            if container.is_some() {
                tracing::debug!("service provider already exists, ignoring the given container");
            }
            return Ok(provider);
        }
        let container = container.context(MissingContainerSnafu)?;
        Ok(INSTANCE.get_or_init(|| {
            tracing::debug!("creating the process-wide service provider");
            Self::new(container)
        }))
    }

    /// The container behind this provider, for application-specific
    /// bindings.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Registers every core service as a singleton, unless the logger is
    /// already bound, in which case the bootstrap is assumed done and
    /// nothing changes.
    pub fn register_core_services(&self) {
        if self.container.has(key::of::<Arc<dyn Logger>>()) {
            tracing::debug!("core services already registered");
            return;
        }
        core_services::register(&self.container);
        tracing::info!(
            bindings = self.container.binding_count(),
            "registered core services"
        );
    }

    /// Resolves every core service once, so that a broken registration
    /// fails here rather than on the first request.
    ///
    /// # Errors
    ///
    /// Returns the first service which can't be resolved.
    pub fn warm_up(&self) -> Result<(), ProviderError> {
        self.logger()?;
        self.database()?;
        self.cache()?;
        self.flash()?;
        self.token_manager()?;
        self.password_manager()?;
        self.mailer()?;
        self.auth()?;
        self.user_registration()?;
        self.site_settings()?;
        self.news()?;
        self.configuration_manager()?;
        self.session_manager()?;
        tracing::info!("core services are ready");
        Ok(())
    }

    accessors! {
        auth => AuthenticationService,
        database => Database,
        cache => Cache,
        logger => Logger,
        mailer => Mailer,
        token_manager => TokenManager,
        user_registration => UserRegistration,
        session_manager => SessionManager,
        site_settings => SiteSettingsService,
        news => NewsService,
        configuration_manager => ConfigurationManager,
        flash => FlashMessages,
        password_manager => PasswordManager,
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::config::AppConfig;
    use crate::container::injector::Injector;
    use crate::module::dsl::bind;
    use crate::services::testing::RecordingLogger;
    use crate::services::{row, MemoryCache, NewUser, REGISTRATION_SETTING};

    use super::*;

    fn provider() -> ServiceProvider {
        let provider = ServiceProvider::new(Container::new());
        provider.register_core_services();
        provider
    }

    #[test]
    fn service_provider_register_core_services_succeeds() {
        let provider = provider();

        assert_eq!(provider.container().binding_count(), 13);
        provider.warm_up().unwrap();
    }

    #[test]
    fn service_provider_register_core_services_succeeds_when_called_twice() {
        let provider = provider();
        let logger = provider.logger().unwrap();

        provider.register_core_services();

        assert_eq!(provider.container().binding_count(), 13);
        assert!(Arc::ptr_eq(&logger, &provider.logger().unwrap()));
    }

    #[test]
    fn service_provider_register_core_services_succeeds_when_logger_is_bound() {
        let provider = ServiceProvider::new(Container::new());
        let logger: Arc<dyn Logger> = Arc::new(crate::services::TracingLogger::new("custom"));
        provider
            .container()
            .instance(key::of::<Arc<dyn Logger>>(), Arc::clone(&logger));

        provider.register_core_services();

        assert!(!provider.container().has(key::of::<Arc<dyn Database>>()));
        assert!(Arc::ptr_eq(&logger, &provider.logger().unwrap()));
    }

    #[test]
    fn service_provider_register_core_services_keeps_seeded_instance() {
        let provider = ServiceProvider::new(Container::new());
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
        provider
            .container()
            .instance(key::of::<Arc<dyn Cache>>(), Arc::clone(&cache));

        provider.register_core_services();

        assert_eq!(provider.container().binding_count(), 13);
        assert!(Arc::ptr_eq(&cache, &provider.cache().unwrap()));
    }

    #[test]
    fn service_provider_user_registration_succeeds_when_site_settings_fail() {
        let provider = provider();
        let logger = RecordingLogger::new();
        provider
            .container()
            .instance(key::of::<Arc<dyn Logger>>(), logger.clone() as Arc<dyn Logger>);
        bind::<Arc<dyn SiteSettingsService>>()
            .as_singleton()
            .to_factory(|_: &dyn Injector| {
                Ok(Err::<Arc<dyn SiteSettingsService>, _>(io::Error::other(
                    "settings store is offline",
                )))
            })
            .set_on(provider.container());

        let registration = provider.user_registration().unwrap();
        let id = registration.register(NewUser {
            username: String::from("ada"),
            email: String::from("ada@example.com"),
            password: String::from("correct horse"),
        });

        assert!(id.is_ok());
        assert!(provider.site_settings().is_err());
        assert!(logger
            .lines()
            .contains(&(String::from("warning"), String::from("optional collaborator is unavailable"))));
    }

    #[test]
    fn service_provider_accessors_succeed_when_services_are_singletons() {
        let provider = provider();

        let database = provider.database().unwrap();
        let tokens = provider.token_manager().unwrap();

        assert!(Arc::ptr_eq(&database, &provider.database().unwrap()));
        assert!(Arc::ptr_eq(&tokens, &provider.token_manager().unwrap()));
    }

    #[test]
    fn service_provider_accessors_fail_when_core_services_are_missing() {
        let provider = ServiceProvider::new(Container::new());

        let err = provider.session_manager().err().unwrap();

        assert!(matches!(
            err,
            ProviderError::Resolve {
                service: "SessionManager",
                source: InjectorError::NotFound { .. },
            }
        ));
        assert!(provider.warm_up().is_err());
    }

    #[test]
    fn service_provider_mailer_succeeds_when_configuration_is_missing() {
        let provider = provider();

        let mailer = provider.mailer().unwrap();
        mailer
            .send("ada@example.com", "Welcome", "Hello Ada")
            .unwrap();

        assert_eq!(mailer.outbox()[0].from, "Darkheim <noreply@localhost>");
    }

    #[test]
    fn service_provider_services_succeed_when_configuration_is_registered() {
        let provider = ServiceProvider::new(Container::new());
        let mut config = AppConfig::default();
        config.app.name = String::from("Ironforge");
        config.mail.from_address = String::from("admin@ironforge.test");
        config.session.lifetime_secs = 60;
        provider
            .container()
            .value(key::of::<Arc<AppConfig>>(), Arc::new(config));
        provider.register_core_services();

        let mailer = provider.mailer().unwrap();
        mailer.send("ada@example.com", "Welcome", "Hello Ada").unwrap();
        let configuration = provider.configuration_manager().unwrap();

        assert_eq!(mailer.outbox()[0].from, "Darkheim <admin@ironforge.test>");
        assert_eq!(configuration.app_name(), "Ironforge");
        assert_eq!(
            configuration.get("session.lifetime_secs").as_deref(),
            Some("60")
        );
    }

    #[test]
    fn service_provider_user_registration_succeeds_across_services() {
        let provider = provider();
        let registration = provider.user_registration().unwrap();

        let id = registration
            .register(NewUser {
                username: String::from("ada"),
                email: String::from("ada@example.com"),
                password: String::from("correct horse"),
            })
            .unwrap();
        let token = provider
            .auth()
            .unwrap()
            .attempt("ada@example.com", "correct horse")
            .unwrap();

        assert_eq!(provider.auth().unwrap().check(&token), Some(id));
        assert_eq!(provider.mailer().unwrap().outbox().len(), 1);
        assert_eq!(
            provider
                .database()
                .unwrap()
                .find_by("users", "username", "ada")
                .len(),
            1
        );
    }

    #[test]
    fn service_provider_user_registration_fails_when_registration_is_closed() {
        let provider = provider();
        provider
            .site_settings()
            .unwrap()
            .set(REGISTRATION_SETTING, "false")
            .unwrap();

        let result = provider.user_registration().unwrap().register(NewUser {
            username: String::from("ada"),
            email: String::from("ada@example.com"),
            password: String::from("correct horse"),
        });

        assert!(result.is_err());
        assert!(provider.database().unwrap().all("users").is_empty());
    }

    #[test]
    fn service_provider_session_manager_succeeds() {
        let provider = provider();
        provider
            .database()
            .unwrap()
            .insert("users", row([("username", "ada")]))
            .unwrap();

        let sessions = provider.session_manager().unwrap();
        let session = sessions.start(1).unwrap();

        assert_eq!(sessions.resolve(&session.id), Some(1));
        assert!(sessions.destroy(&session.id));
        assert!(sessions.resolve(&session.id).is_none());
    }
}
