use std::fmt::{Debug, Formatter, Result as FmtResult};

/// Application-level logging.
///
/// `context` carries structured key-value pairs attached to the message.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str, context: &[(&str, &str)]);

    fn warning(&self, message: &str, context: &[(&str, &str)]);

    fn error(&self, message: &str, context: &[(&str, &str)]);

    fn critical(&self, message: &str, context: &[(&str, &str)]);
}

/// A [`Logger`] emitting `tracing` events, tagged with a channel name.
#[derive(Clone)]
pub struct TracingLogger {
    channel: String,
}

impl TracingLogger {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl Debug for TracingLogger {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TracingLogger")
            .field("channel", &self.channel)
            .finish()
    }
}

struct DisplayContext<'a>(&'a [(&'a str, &'a str)]);

impl Debug for DisplayContext<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_map().entries(self.0.iter().copied()).finish()
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str, context: &[(&str, &str)]) {
        tracing::info!(channel = %self.channel, context = ?DisplayContext(context), "{message}");
    }

    fn warning(&self, message: &str, context: &[(&str, &str)]) {
        tracing::warn!(channel = %self.channel, context = ?DisplayContext(context), "{message}");
    }

    fn error(&self, message: &str, context: &[(&str, &str)]) {
        tracing::error!(channel = %self.channel, context = ?DisplayContext(context), "{message}");
    }

    fn critical(&self, message: &str, context: &[(&str, &str)]) {
        tracing::error!(
            channel = %self.channel,
            context = ?DisplayContext(context),
            critical = true,
            "{message}"
        );
    }
}
