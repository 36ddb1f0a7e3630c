// End to end tests live in /src/tests and are compiled with the binary, they use
// the library crate the same way main does.
#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use blogo::config::AppConfig;
use blogo::util::env::load_dotenv;
use blogo::{create_app, AppState};
use tokio::net::TcpListener;
use tracing::{debug, error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    load_dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(fmt::layer())
        .init();

    // No request is served unless config, database, schema and storage client are all up.
    if let Err(e) = run().await {
        error!("Startup failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;
    config.validate()?;
    debug!("Config:\n {:#?}", config);

    let app_state = AppState::new(config).await?;
    info!("Connected to the database successfully");

    let config = app_state.config.clone();
    if config.db.auto_migrate {
        debug!("Preloading database schema...");
        app_state.db.init_schema().await?;
    }

    let addr = format!("{}:{}", &config.http.ip, &config.http.port);
    let app = create_app(app_state);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind {}", addr))?;
    info!("{} listening on {}", config.app_name, addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
