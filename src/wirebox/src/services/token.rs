use std::sync::Arc;
use std::time::Duration;

use crate::component;
use crate::services::{row, unix_now, Database, Logger, ServiceError};

const TABLE: &str = "tokens";

/// Opaque tokens bound to a user and a purpose, e.g. sessions or password
/// resets.
pub trait TokenManager: Send + Sync {
    fn issue(&self, user_id: u64, purpose: &str, ttl: Duration) -> Result<String, ServiceError>;

    /// Returns the user the token was issued to, if it's valid for
    /// `purpose` and hasn't expired.
    fn verify(&self, token: &str, purpose: &str) -> Option<u64>;

    fn revoke(&self, token: &str) -> bool;
}

pub struct DatabaseTokenManager {
    database: Arc<dyn Database>,
    logger: Arc<dyn Logger>,
}

#[component(Arc<dyn TokenManager>, Arc::new)]
impl DatabaseTokenManager {
    #[inject]
    pub fn new(database: Arc<dyn Database>, logger: Arc<dyn Logger>) -> Self {
        Self { database, logger }
    }

    fn find(&self, token: &str) -> Option<(u64, crate::services::Row)> {
        let row = self.database.find_by(TABLE, "token", token).into_iter().next()?;
        let id = row.get("id")?.parse().ok()?;
        Some((id, row))
    }
}

impl TokenManager for DatabaseTokenManager {
    fn issue(&self, user_id: u64, purpose: &str, ttl: Duration) -> Result<String, ServiceError> {
        let token = uuid::Uuid::new_v4().to_string();
        let user_id = user_id.to_string();
        let expires_at = (unix_now() + ttl.as_secs()).to_string();
        self.database.insert(
            TABLE,
            row([
                ("token", token.as_str()),
                ("user_id", user_id.as_str()),
                ("purpose", purpose),
                ("expires_at", expires_at.as_str()),
            ]),
        )?;
        self.logger
            .info("token issued", &[("user_id", &user_id), ("purpose", purpose)]);
        Ok(token)
    }

    fn verify(&self, token: &str, purpose: &str) -> Option<u64> {
        let (id, row) = self.find(token)?;
        if row.get("purpose").map(String::as_str) != Some(purpose) {
            return None;
        }
        let expires_at: u64 = row.get("expires_at")?.parse().ok()?;
        if expires_at <= unix_now() {
            self.database.delete(TABLE, id);
            return None;
        }
        row.get("user_id")?.parse().ok()
    }

    fn revoke(&self, token: &str) -> bool {
        self.find(token)
            .is_some_and(|(id, _)| self.database.delete(TABLE, id))
    }
}
