use std::num::ParseIntError;
use std::sync::Arc;

use wirebox::prelude::*;

pub struct Clock;

#[component]
impl Clock {
    #[inject]
    pub fn new() -> Self {
        Clock
    }
}

pub struct RequestCounter {
    start: u64,
}

#[component]
impl RequestCounter {
    #[inject]
    pub fn new(#[named("counter.start")] start: u64) -> RequestCounter {
        RequestCounter { start }
    }
}

pub struct SessionLifetime {
    seconds: u64,
}

#[component]
impl SessionLifetime {
    #[inject]
    pub fn parse(#[named("session.lifetime")] raw: String) -> Result<Self, ParseIntError> {
        Ok(Self {
            seconds: raw.parse()?,
        })
    }
}

pub struct MailPort(u16);

#[component]
impl MailPort {
    #[inject]
    pub fn parse(#[named("mail.port")] raw: String) -> std::result::Result<MailPort, ParseIntError> {
        raw.parse().map(MailPort)
    }
}

pub struct Banner {
    text: Arc<str>,
}

#[component(Arc<Banner>, Arc::new)]
impl Banner {
    #[inject]
    pub fn new(#[named("app.name")] name: String) -> Self {
        Self {
            text: Arc::from(format!("Welcome to {name}")),
        }
    }
}

fn main() {
    let _ = (
        Clock,
        RequestCounter { start: 0 }.start,
        SessionLifetime { seconds: 0 }.seconds,
        MailPort(25).0,
        Banner { text: Arc::from("") }.text,
    );
}
