use std::sync::Arc;

use parking_lot::Mutex;

use crate::component;
use crate::services::Logger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub kind: String,
    pub message: String,
}

/// One-shot messages shown to the user on the next page.
pub trait FlashMessages: Send + Sync {
    fn push(&self, kind: &str, message: &str);

    /// Removes and returns every pending message.
    fn take(&self) -> Vec<FlashMessage>;
}

pub struct MemoryFlashMessages {
    logger: Arc<dyn Logger>,
    pending: Mutex<Vec<FlashMessage>>,
}

#[component(Arc<dyn FlashMessages>, Arc::new)]
impl MemoryFlashMessages {
    #[inject]
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            logger,
            pending: Mutex::new(Vec::new()),
        }
    }
}

impl FlashMessages for MemoryFlashMessages {
    fn push(&self, kind: &str, message: &str) {
        if kind == "error" {
            self.logger.warning("error flashed to user", &[("message", message)]);
        }
        self.pending.lock().push(FlashMessage {
            kind: kind.to_owned(),
            message: message.to_owned(),
        });
    }

    fn take(&self) -> Vec<FlashMessage> {
        std::mem::take(&mut *self.pending.lock())
    }
}
