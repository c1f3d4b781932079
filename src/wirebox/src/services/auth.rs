use std::sync::Arc;
use std::time::Duration;

use crate::component;
use crate::services::{
    Database, InvalidCredentialsSnafu, Logger, PasswordManager, ServiceError, TokenManager,
};

pub(crate) const USERS_TABLE: &str = "users";
const AUTH_PURPOSE: &str = "auth";
const AUTH_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Credential checks and authentication tokens.
pub trait AuthenticationService: Send + Sync {
    /// Checks the credentials and returns a token identifying the user.
    fn attempt(&self, email: &str, password: &str) -> Result<String, ServiceError>;

    /// Returns the user identified by `token`.
    fn check(&self, token: &str) -> Option<u64>;

    fn logout(&self, token: &str) -> bool;
}

pub struct DatabaseAuthentication {
    database: Arc<dyn Database>,
    passwords: Arc<dyn PasswordManager>,
    tokens: Arc<dyn TokenManager>,
    logger: Arc<dyn Logger>,
}

#[component(Arc<dyn AuthenticationService>, Arc::new)]
impl DatabaseAuthentication {
    #[inject]
    pub fn new(
        database: Arc<dyn Database>,
        passwords: Arc<dyn PasswordManager>,
        tokens: Arc<dyn TokenManager>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            database,
            passwords,
            tokens,
            logger,
        }
    }
}

impl AuthenticationService for DatabaseAuthentication {
    fn attempt(&self, email: &str, password: &str) -> Result<String, ServiceError> {
        let user = self.database.find_by(USERS_TABLE, "email", email).into_iter().next();
        let user_id = user.and_then(|user| {
            let hash = user.get("password_hash")?;
            if self.passwords.verify(password, hash) {
                user.get("id")?.parse::<u64>().ok()
            } else {
                None
            }
        });

        let Some(user_id) = user_id else {
            self.logger.warning("failed login attempt", &[("email", email)]);
            return InvalidCredentialsSnafu.fail();
        };
        self.tokens.issue(user_id, AUTH_PURPOSE, AUTH_TTL)
    }

    fn check(&self, token: &str) -> Option<u64> {
        self.tokens.verify(token, AUTH_PURPOSE)
    }

    fn logout(&self, token: &str) -> bool {
        self.tokens.revoke(token)
    }
}
