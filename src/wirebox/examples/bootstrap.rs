use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wirebox::config::{AppConfig, ConfigLoader};
use wirebox::prelude::*;
use wirebox::services::NewUser;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ConfigLoader::new().with_config_path("wirebox.toml").load()?;
    let container = Container::new();
    container.value(key::of::<Arc<AppConfig>>(), Arc::new(config));

    let provider = ServiceProvider::new(container);
    provider.register_core_services();
    provider.warm_up()?;

    let user_id = provider.user_registration()?.register(NewUser {
        username: String::from("jaina"),
        email: String::from("jaina@example.com"),
        password: String::from("theramore"),
    })?;
    let token = provider.auth()?.attempt("jaina@example.com", "theramore")?;
    let session = provider.session_manager()?.start(user_id)?;

    provider
        .news()?
        .publish("Welcome", "The realm is open.", user_id)?;

    tracing::info!(
        user_id,
        authenticated = provider.auth()?.check(&token).is_some(),
        session = %session.id,
        news = provider.news()?.count(),
        mails = provider.mailer()?.outbox().len(),
        app = %provider.configuration_manager()?.app_name(),
        "demo finished"
    );
    Ok(())
}
