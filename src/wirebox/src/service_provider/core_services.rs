use std::convert::Infallible;
use std::error::Error;
use std::sync::Arc;

use crate::config::{AppConfig, MailerSettings};
use crate::container::injector::{Injector, InjectorError, TypedInjector};
use crate::container::Container;
use crate::key::{self, TypedKey};
use crate::module::dsl::bind;
use crate::module::Module;
use crate::services::{
    AuthenticationService, Cache, ConfigurationManager, Database, DatabaseAuthentication,
    DatabaseNewsService, DatabaseSiteSettings, DatabaseTokenManager, DatabaseUserRegistration,
    FlashMessages, LayeredConfigurationManager, Logger, Mailer, MemoryCache, MemoryDatabase,
    MemoryFlashMessages, NewsService, OutboxMailer, PasswordManager, SessionManager,
    Sha256PasswordManager, SiteSettingsService, TokenManager, TokenSessionManager,
    TracingLogger, UserRegistration,
};

/// The bindings of every core service, all of them singletons.
///
/// Each service is built by a factory which pulls its collaborators out of
/// the container explicitly, so the whole wiring graph reads top to bottom
/// in dependency order. [`Cache`] has no collaborators and is constructed
/// through its component constructor instead.
pub struct CoreServices;

impl Module for CoreServices {
    fn name(&self) -> &'static str {
        "core services"
    }

    fn configure(&self, container: &Container) -> Result<(), Box<dyn Error + Send + Sync>> {
        register(container);
        Ok(())
    }
}

fn service<T>(service: Arc<T>) -> Result<Result<Arc<T>, Infallible>, InjectorError>
where
    T: Send + Sync + ?Sized + 'static,
{
    Ok(Ok(service))
}

/// Resolves a collaborator its dependent can do without. When the
/// collaborator is unregistered or fails to build, the failure is logged as
/// a warning and `None` is injected instead.
fn optional<K>(injector: &dyn Injector, key: K, dependent: &'static str) -> Option<K::Target>
where
    K: TypedKey,
{
    let reason = if injector.contains(&key) {
        match injector.make(key) {
            Ok(collaborator) => return Some(collaborator),
            Err(err) => err.to_string(),
        }
    } else {
        String::from("not registered")
    };

    tracing::warn!(
        dependent,
        collaborator = key.target_name(),
        reason = %reason,
        "optional collaborator is unavailable, continuing without it"
    );
    if let Ok(logger) = injector.make(key::of::<Arc<dyn Logger>>()) {
        logger.warning(
            "optional collaborator is unavailable",
            &[
                ("dependent", dependent),
                ("collaborator", key.target_name()),
                ("reason", &reason),
            ],
        );
    }
    None
}

fn config(injector: &dyn Injector, dependent: &'static str) -> Option<Arc<AppConfig>> {
    optional(injector, key::of::<Arc<AppConfig>>(), dependent)
}

pub(super) fn register(container: &Container) {
    bind::<Arc<dyn Logger>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            // The logger has to be resolvable first, so it never warns about
            // the missing configuration through itself.
            let config_key = key::of::<Arc<AppConfig>>();
            let channel = if injector.contains(&config_key) {
                injector.make(config_key)?.app.name.clone()
            } else {
                String::from("app")
            };
            service::<dyn Logger>(Arc::new(TracingLogger::new(channel)))
        })
        .set_on(container);

    bind::<Arc<dyn Database>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            let logger = injector.make(key::of::<Arc<dyn Logger>>())?;
            let settings = config(injector, "Database")
                .map(|config| config.database.clone())
                .unwrap_or_default();
            service::<dyn Database>(Arc::new(MemoryDatabase::new(settings, logger)))
        })
        .set_on(container);

    bind::<Arc<dyn Cache>>()
        .as_singleton()
        .to_component::<MemoryCache>()
        .set_on(container);

    bind::<Arc<dyn FlashMessages>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            let logger = injector.make(key::of::<Arc<dyn Logger>>())?;
            service::<dyn FlashMessages>(Arc::new(MemoryFlashMessages::new(logger)))
        })
        .set_on(container);

    bind::<Arc<dyn TokenManager>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            let database = injector.make(key::of::<Arc<dyn Database>>())?;
            let logger = injector.make(key::of::<Arc<dyn Logger>>())?;
            service::<dyn TokenManager>(Arc::new(DatabaseTokenManager::new(database, logger)))
        })
        .set_on(container);

    bind::<Arc<dyn PasswordManager>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            let logger = injector.make(key::of::<Arc<dyn Logger>>())?;
            service::<dyn PasswordManager>(Arc::new(Sha256PasswordManager::new(logger)))
        })
        .set_on(container);

    bind::<Arc<dyn Mailer>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            let logger = injector.make(key::of::<Arc<dyn Logger>>())?;
            let settings = match config(injector, "Mailer") {
                Some(config) => config.mail.clone(),
                None => MailerSettings::default(),
            };
            service::<dyn Mailer>(Arc::new(OutboxMailer::new(settings, logger)))
        })
        .set_on(container);

    bind::<Arc<dyn AuthenticationService>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            let database = injector.make(key::of::<Arc<dyn Database>>())?;
            let passwords = injector.make(key::of::<Arc<dyn PasswordManager>>())?;
            let tokens = injector.make(key::of::<Arc<dyn TokenManager>>())?;
            let logger = injector.make(key::of::<Arc<dyn Logger>>())?;
            service::<dyn AuthenticationService>(Arc::new(DatabaseAuthentication::new(
                database, passwords, tokens, logger,
            )))
        })
        .set_on(container);

    bind::<Arc<dyn UserRegistration>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            let database = injector.make(key::of::<Arc<dyn Database>>())?;
            let passwords = injector.make(key::of::<Arc<dyn PasswordManager>>())?;
            let mailer = injector.make(key::of::<Arc<dyn Mailer>>())?;
            let logger = injector.make(key::of::<Arc<dyn Logger>>())?;
            let site_settings = optional(
                injector,
                key::of::<Arc<dyn SiteSettingsService>>(),
                "UserRegistration",
            );
            service::<dyn UserRegistration>(Arc::new(DatabaseUserRegistration::new(
                database,
                passwords,
                mailer,
                logger,
                site_settings,
            )))
        })
        .set_on(container);

    bind::<Arc<dyn SiteSettingsService>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            let database = injector.make(key::of::<Arc<dyn Database>>())?;
            let cache = injector.make(key::of::<Arc<dyn Cache>>())?;
            service::<dyn SiteSettingsService>(Arc::new(DatabaseSiteSettings::new(database, cache)))
        })
        .set_on(container);

    bind::<Arc<dyn NewsService>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            let database = injector.make(key::of::<Arc<dyn Database>>())?;
            let cache = injector.make(key::of::<Arc<dyn Cache>>())?;
            let logger = injector.make(key::of::<Arc<dyn Logger>>())?;
            service::<dyn NewsService>(Arc::new(DatabaseNewsService::new(database, cache, logger)))
        })
        .set_on(container);

    bind::<Arc<dyn ConfigurationManager>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            let logger = injector.make(key::of::<Arc<dyn Logger>>())?;
            let config = config(injector, "ConfigurationManager");
            service::<dyn ConfigurationManager>(Arc::new(LayeredConfigurationManager::new(
                logger, config,
            )))
        })
        .set_on(container);

    bind::<Arc<dyn SessionManager>>()
        .as_singleton()
        .to_factory(|injector: &dyn Injector| {
            let logger = injector.make(key::of::<Arc<dyn Logger>>())?;
            let configuration = injector.make(key::of::<Arc<dyn ConfigurationManager>>())?;
            let tokens = injector.make(key::of::<Arc<dyn TokenManager>>())?;
            service::<dyn SessionManager>(Arc::new(TokenSessionManager::new(
                logger,
                configuration,
                tokens,
            )))
        })
        .set_on(container);
}
