use std::sync::Arc;

use wirebox::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Audit,
}

pub struct Mailer {
    pub from: String,
    pub retries: u32,
    pub timeout: u64,
    pub channel: Arc<str>,
}

#[component(Arc<Mailer>, Arc::new)]
impl Mailer {
    #[inject]
    pub fn new(
        #[named("mail.from")] from: String,
        #[default] retries: u32,
        #[named("mail.timeout")]
        #[default(30)]
        timeout: u64,
        #[qualified(Channel::Audit)] channel: Arc<str>,
    ) -> Self {
        Self {
            from,
            retries,
            timeout,
            channel,
        }
    }
}

#[derive(Default)]
pub struct Counter;

#[component]
impl Counter {}

fn main() {}
