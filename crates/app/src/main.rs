//! ghauth-token - prints a GitHub App installation token.
//!
//! Configuration comes from the environment; see [`config::Config`].

mod config;

use ghauth_application::TokenSource;
use ghauth_infrastructure::{InstallationTokenSource, new_application_token_source};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_lookup(|name| std::env::var(name).ok())?;
    let private_key = config.private_key.load()?;

    tracing::info!(
        app = %config.app,
        installation_id = config.installation_id,
        "requesting installation token"
    );

    let app_source = new_application_token_source(config.app.clone(), &private_key)?;

    let mut builder = InstallationTokenSource::builder(config.installation_id, app_source);
    if let Some(url) = &config.enterprise_url {
        builder = builder.with_enterprise_url(url.as_str());
    }
    if let Some(options) = config.token_options() {
        builder = builder.with_options(options);
    }

    let credential = builder.build()?.token().await?;

    if let Some(expiry) = credential.expiry {
        tracing::info!(expires_at = %expiry, "installation token issued");
    }
    println!("{}", credential.access_token);

    Ok(())
}
