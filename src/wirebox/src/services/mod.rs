//! Contracts of the core application services and their in-process
//! implementations.
//!
//! Every contract is an object-safe trait handed out as `Arc<dyn _>`, so a
//! container can swap an implementation without its dependents noticing.

mod auth;
mod cache;
mod configuration;
mod database;
mod flash;
mod logger;
mod mailer;
mod news;
mod password;
mod registration;
mod session;
mod site_settings;
mod token;

use std::time::{SystemTime, UNIX_EPOCH};

use snafu::prelude::*;

pub use auth::{AuthenticationService, DatabaseAuthentication};
pub use cache::{Cache, MemoryCache};
pub use configuration::{ConfigurationManager, LayeredConfigurationManager};
pub use database::{Database, MemoryDatabase, Row};
pub use flash::{FlashMessage, FlashMessages, MemoryFlashMessages};
pub use logger::{Logger, TracingLogger};
pub use mailer::{Mail, Mailer, OutboxMailer};
pub use news::{DatabaseNewsService, NewsItem, NewsService};
pub use password::{PasswordManager, Sha256PasswordManager};
pub use registration::{DatabaseUserRegistration, NewUser, UserRegistration, REGISTRATION_SETTING};
pub use session::{Session, SessionManager, TokenSessionManager};
pub use site_settings::{DatabaseSiteSettings, SiteSettingsService};
pub use token::{DatabaseTokenManager, TokenManager};

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum ServiceError {
    #[snafu(display("invalid input: {message}"))]
    #[non_exhaustive]
    Validation { message: String },
    #[snafu(display("{entity} `{value}` already exists"))]
    #[non_exhaustive]
    Duplicate { entity: &'static str, value: String },
    #[snafu(display("invalid credentials"))]
    #[non_exhaustive]
    InvalidCredentials {},
    #[snafu(display("{entity} `{id}` does not exist"))]
    #[non_exhaustive]
    NotFound { entity: &'static str, id: String },
    #[snafu(display("could not deliver mail to {recipient}: {message}"))]
    #[non_exhaustive]
    Delivery { recipient: String, message: String },
}

/// Seconds since the Unix epoch.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// Builds a [`Row`] from column-value pairs.
pub fn row<'a, I>(columns: I) -> Row
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    columns
        .into_iter()
        .map(|(column, value)| (column.to_owned(), value.to_owned()))
        .collect()
}
