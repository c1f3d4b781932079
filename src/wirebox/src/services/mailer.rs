use std::sync::Arc;

use parking_lot::Mutex;
use snafu::prelude::*;

use crate::config::MailerSettings;
use crate::services::{DeliverySnafu, Logger, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outgoing mail.
pub trait Mailer: Send + Sync {
    /// Sends a mail from the configured sender.
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ServiceError>;

    /// Every mail sent so far.
    fn outbox(&self) -> Vec<Mail>;
}

/// A [`Mailer`] which keeps sent mail in an outbox instead of delivering
/// it.
pub struct OutboxMailer {
    settings: MailerSettings,
    logger: Arc<dyn Logger>,
    outbox: Mutex<Vec<Mail>>,
}

impl OutboxMailer {
    pub fn new(settings: MailerSettings, logger: Arc<dyn Logger>) -> Self {
        Self {
            settings,
            logger,
            outbox: Mutex::new(Vec::new()),
        }
    }

    pub fn settings(&self) -> &MailerSettings {
        &self.settings
    }
}

impl Mailer for OutboxMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ServiceError> {
        ensure!(
            to.contains('@'),
            DeliverySnafu {
                recipient: to,
                message: "recipient is not an address",
            }
        );
        let from = format!("{} <{}>", self.settings.from_name, self.settings.from_address);
        self.logger.info("mail sent", &[("to", to), ("subject", subject)]);
        self.outbox.lock().push(Mail {
            from,
            to: to.to_owned(),
            subject: subject.to_owned(),
            body: body.to_owned(),
        });
        Ok(())
    }

    fn outbox(&self) -> Vec<Mail> {
        self.outbox.lock().clone()
    }
}
