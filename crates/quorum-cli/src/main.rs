use anyhow::Context;
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quorum_cli::{commands::HELP, App, Config};
use quorum_client::{ForumApi, HttpForumClient};
use quorum_search::SearchController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Quorum CLI");
    tracing::info!("Forum API: {}", config.api.base_url);

    let client = HttpForumClient::new(config.api.clone())?;
    if !client.has_token().await {
        if let Some(credentials) = config.credentials() {
            client
                .login(&credentials)
                .await
                .with_context(|| format!("Login failed for {}", credentials.email))?;
            tracing::info!("Signed in as {}", credentials.email);
        }
    }
    let api: Arc<dyn ForumApi> = Arc::new(client);

    let search = SearchController::spawn(api.clone(), config.search.clone());
    let mut app = App::new(api, search, std::io::stdout());

    {
        let mut out = std::io::stdout();
        writeln!(out, "{}", HELP)?;
        out.flush()?;
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = app.run(stdin).await;
    app.shutdown().await;

    result
}

/// Logs go to stderr; stdout carries the rendered views
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
