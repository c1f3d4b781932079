use std::sync::Arc;

use snafu::prelude::*;

use crate::services::auth::USERS_TABLE;
use crate::services::{
    row, Database, DuplicateSnafu, Logger, Mailer, PasswordManager, ServiceError,
    SiteSettingsService, ValidationSnafu,
};

pub const REGISTRATION_SETTING: &str = "registration.enabled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Sign-up of new accounts.
pub trait UserRegistration: Send + Sync {
    /// Creates the account and returns its id.
    fn register(&self, user: NewUser) -> Result<u64, ServiceError>;
}

/// A [`UserRegistration`] storing accounts in the [`Database`].
///
/// Without site settings, registration is always open.
pub struct DatabaseUserRegistration {
    database: Arc<dyn Database>,
    passwords: Arc<dyn PasswordManager>,
    mailer: Arc<dyn Mailer>,
    logger: Arc<dyn Logger>,
    site_settings: Option<Arc<dyn SiteSettingsService>>,
}

impl DatabaseUserRegistration {
    pub fn new(
        database: Arc<dyn Database>,
        passwords: Arc<dyn PasswordManager>,
        mailer: Arc<dyn Mailer>,
        logger: Arc<dyn Logger>,
        site_settings: Option<Arc<dyn SiteSettingsService>>,
    ) -> Self {
        Self {
            database,
            passwords,
            mailer,
            logger,
            site_settings,
        }
    }

    fn is_open(&self) -> bool {
        let Some(settings) = &self.site_settings else {
            return true;
        };
        settings.get(REGISTRATION_SETTING).is_none() || settings.is_enabled(REGISTRATION_SETTING)
    }

    fn validate(user: &NewUser) -> Result<(), ServiceError> {
        let username_length = user.username.chars().count();
        ensure!(
            (3..=32).contains(&username_length),
            ValidationSnafu {
                message: "username must have 3 to 32 characters"
            }
        );
        ensure!(
            user.username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_'),
            ValidationSnafu {
                message: "username may only contain letters, digits and underscores"
            }
        );
        ensure!(
            user.email.contains('@'),
            ValidationSnafu {
                message: format!("`{}` is not an email address", user.email)
            }
        );
        Ok(())
    }
}

impl UserRegistration for DatabaseUserRegistration {
    fn register(&self, user: NewUser) -> Result<u64, ServiceError> {
        ensure!(
            self.is_open(),
            ValidationSnafu {
                message: "registration is closed"
            }
        );
        Self::validate(&user)?;
        ensure!(
            self.database
                .find_by(USERS_TABLE, "email", &user.email)
                .is_empty(),
            DuplicateSnafu {
                entity: "email",
                value: user.email.as_str(),
            }
        );
        ensure!(
            self.database
                .find_by(USERS_TABLE, "username", &user.username)
                .is_empty(),
            DuplicateSnafu {
                entity: "username",
                value: user.username.as_str(),
            }
        );

        let hash = self.passwords.hash(&user.password)?;
        let id = self.database.insert(
            USERS_TABLE,
            row([
                ("username", user.username.as_str()),
                ("email", user.email.as_str()),
                ("password_hash", hash.as_str()),
            ]),
        )?;
        self.logger
            .info("user registered", &[("username", &user.username)]);

        let body = format!("Hello {}, your account is ready.", user.username);
        if let Err(err) = self.mailer.send(&user.email, "Welcome", &body) {
            self.logger.warning(
                "welcome mail not sent",
                &[("email", &user.email), ("error", &err.to_string())],
            );
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{DatabaseSettings, MailerSettings};
    use crate::services::testing::RecordingLogger;
    use crate::services::{
        DatabaseSiteSettings, MemoryCache, MemoryDatabase, OutboxMailer, Sha256PasswordManager,
    };

    use super::*;

    struct Fixture {
        database: Arc<MemoryDatabase>,
        mailer: Arc<OutboxMailer>,
        settings: Arc<DatabaseSiteSettings>,
        registration: DatabaseUserRegistration,
    }

    fn fixture(with_settings: bool) -> Fixture {
        let logger = RecordingLogger::new();
        let database = Arc::new(MemoryDatabase::new(DatabaseSettings::default(), logger.clone()));
        let mailer = Arc::new(OutboxMailer::new(MailerSettings::default(), logger.clone()));
        let settings = Arc::new(DatabaseSiteSettings::new(
            database.clone(),
            Arc::new(MemoryCache::new()),
        ));
        let site_settings: Option<Arc<dyn SiteSettingsService>> = if with_settings {
            Some(settings.clone())
        } else {
            None
        };
        let registration = DatabaseUserRegistration::new(
            database.clone(),
            Arc::new(Sha256PasswordManager::new(logger.clone())),
            mailer.clone(),
            logger,
            site_settings,
        );
        Fixture {
            database,
            mailer,
            settings,
            registration,
        }
    }

    fn ash() -> NewUser {
        NewUser {
            username: String::from("ash"),
            email: String::from("ash@darkheim.net"),
            password: String::from("correct horse"),
        }
    }

    #[test]
    fn database_user_registration_register_succeeds() {
        let fixture = fixture(false);
        let id = fixture.registration.register(ash()).unwrap();

        let stored = fixture.database.find(USERS_TABLE, id).unwrap();
        assert_eq!(stored["username"], "ash");
        assert_ne!(stored["password_hash"], "correct horse");
        assert_eq!(fixture.mailer.outbox()[0].to, "ash@darkheim.net");
    }

    #[test]
    fn database_user_registration_register_fails_when_email_is_taken() {
        let fixture = fixture(false);
        fixture.registration.register(ash()).unwrap();

        let mut again = ash();
        again.username = String::from("ash_again");
        let err = fixture.registration.register(again).err().unwrap();
        assert!(matches!(err, ServiceError::Duplicate { entity: "email", .. }));
    }

    #[test]
    fn database_user_registration_register_fails_when_registration_is_closed() {
        let fixture = fixture(true);
        fixture.settings.set(REGISTRATION_SETTING, "false").unwrap();

        let err = fixture.registration.register(ash()).err().unwrap();
        assert!(matches!(err, ServiceError::Validation { .. }));

        fixture.settings.set(REGISTRATION_SETTING, "true").unwrap();
        assert!(fixture.registration.register(ash()).is_ok());
    }

    #[test]
    fn database_user_registration_register_fails_when_username_is_invalid() {
        let fixture = fixture(false);
        let mut user = ash();
        user.username = String::from("a b");
        let err = fixture.registration.register(user).err().unwrap();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }
}
