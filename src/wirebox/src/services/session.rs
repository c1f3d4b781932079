use std::sync::Arc;
use std::time::Duration;

use crate::component;
use crate::services::{unix_now, ConfigurationManager, Logger, ServiceError, TokenManager};

const SESSION_PURPOSE: &str = "session";
const DEFAULT_LIFETIME_SECS: u64 = 7200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: u64,
    pub expires_at: u64,
}

/// Server-side sessions of signed-in users.
pub trait SessionManager: Send + Sync {
    fn start(&self, user_id: u64) -> Result<Session, ServiceError>;

    /// Returns the user owning the session, if it's still alive.
    fn resolve(&self, session_id: &str) -> Option<u64>;

    fn destroy(&self, session_id: &str) -> bool;
}

/// A [`SessionManager`] whose session ids are tokens of the
/// [`TokenManager`].
pub struct TokenSessionManager {
    logger: Arc<dyn Logger>,
    configuration: Arc<dyn ConfigurationManager>,
    tokens: Arc<dyn TokenManager>,
}

#[component(Arc<dyn SessionManager>, Arc::new)]
impl TokenSessionManager {
    #[inject]
    pub fn new(
        logger: Arc<dyn Logger>,
        configuration: Arc<dyn ConfigurationManager>,
        tokens: Arc<dyn TokenManager>,
    ) -> Self {
        Self {
            logger,
            configuration,
            tokens,
        }
    }

    /// The configured session lifetime, read on every session start so
    /// that runtime overrides apply.
    pub fn lifetime(&self) -> Duration {
        let configured = self.configuration.get("session.lifetime_secs");
        let secs = match configured.as_deref().map(str::parse::<u64>) {
            Some(Ok(secs)) => secs,
            Some(Err(_)) => {
                self.logger.warning(
                    "invalid session lifetime, using the default",
                    &[("value", configured.as_deref().unwrap_or_default())],
                );
                DEFAULT_LIFETIME_SECS
            }
            None => DEFAULT_LIFETIME_SECS,
        };
        Duration::from_secs(secs)
    }
}

impl SessionManager for TokenSessionManager {
    fn start(&self, user_id: u64) -> Result<Session, ServiceError> {
        let lifetime = self.lifetime();
        let id = self.tokens.issue(user_id, SESSION_PURPOSE, lifetime)?;
        Ok(Session {
            id,
            user_id,
            expires_at: unix_now() + lifetime.as_secs(),
        })
    }

    fn resolve(&self, session_id: &str) -> Option<u64> {
        self.tokens.verify(session_id, SESSION_PURPOSE)
    }

    fn destroy(&self, session_id: &str) -> bool {
        self.tokens.revoke(session_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DatabaseSettings;
    use crate::services::testing::RecordingLogger;
    use crate::services::{DatabaseTokenManager, LayeredConfigurationManager, MemoryDatabase};

    use super::*;

    fn sessions() -> (TokenSessionManager, Arc<LayeredConfigurationManager>) {
        let logger = RecordingLogger::new();
        let database = Arc::new(MemoryDatabase::new(DatabaseSettings::default(), logger.clone()));
        let tokens = Arc::new(DatabaseTokenManager::new(database, logger.clone()));
        let configuration = Arc::new(LayeredConfigurationManager::new(logger.clone(), None));
        let sessions = TokenSessionManager::new(logger, configuration.clone(), tokens);
        (sessions, configuration)
    }

    #[test]
    fn token_session_manager_resolve_succeeds() {
        let (sessions, _) = sessions();
        let session = sessions.start(42).unwrap();

        assert_eq!(sessions.resolve(&session.id), Some(42));
        assert!(sessions.destroy(&session.id));
        assert_eq!(sessions.resolve(&session.id), None);
    }

    #[test]
    fn token_session_manager_lifetime_succeeds_when_configuration_is_overridden() {
        let (sessions, configuration) = sessions();
        assert_eq!(sessions.lifetime(), Duration::from_secs(DEFAULT_LIFETIME_SECS));

        configuration.set("session.lifetime_secs", "60");
        assert_eq!(sessions.lifetime(), Duration::from_secs(60));

        configuration.set("session.lifetime_secs", "soon");
        assert_eq!(sessions.lifetime(), Duration::from_secs(DEFAULT_LIFETIME_SECS));
    }
}
