use std::fmt::Write as _;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use snafu::prelude::*;
use uuid::Uuid;

use crate::component;
use crate::services::{Logger, ServiceError, ValidationSnafu};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hashing and verification of user passwords.
pub trait PasswordManager: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, ServiceError>;

    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// A [`PasswordManager`] storing `salt$sha256(salt + password)`.
pub struct Sha256PasswordManager {
    logger: Arc<dyn Logger>,
}

#[component(Arc<dyn PasswordManager>, Arc::new)]
impl Sha256PasswordManager {
    #[inject]
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    fn digest(salt: &str, password: &str) -> String {
        let digest = Sha256::new()
            .chain_update(salt.as_bytes())
            .chain_update(password.as_bytes())
            .finalize();
        digest.iter().fold(String::with_capacity(64), |mut hex, byte| {
            let _ = write!(hex, "{byte:02x}");
            hex
        })
    }
}

impl PasswordManager for Sha256PasswordManager {
    fn hash(&self, password: &str) -> Result<String, ServiceError> {
        ensure!(
            password.chars().count() >= MIN_PASSWORD_LENGTH,
            ValidationSnafu {
                message: format!("password must have at least {MIN_PASSWORD_LENGTH} characters")
            }
        );
        let salt = Uuid::new_v4().simple().to_string();
        let digest = Self::digest(&salt, password);
        Ok(format!("{salt}${digest}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Some((salt, expected)) = hash.split_once('$') else {
            self.logger.warning("malformed password hash", &[]);
            return false;
        };
        Self::digest(salt, password) == expected
    }
}
