//! Nikoo API server binary.
//!
//! Serves the support chat JSON API plus the embedded browser UI at `/ui`.

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "nikoo_server", about = "Nikoo support chat API server")]
struct Args {
    /// Address to bind (e.g. "127.0.0.1:8000"). Overrides BIND_ADDR.
    #[arg(long)]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/nikoo"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,nikoo_api=debug,nikoo_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    info!(database_url = %args.database_url, "starting nikoo_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    nikoo_api::migrate(&pool).await?;

    let mut config = nikoo_api::config::ApiConfig::from_env();
    config.database_url = args.database_url;
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }

    if config.assistant.api_key.is_none() {
        tracing::warn!(
            "no assistant API key set (GROQ_API_KEY or OPENAI_API_KEY); replies will fall back"
        );
    }
    config.assistant.validate()?;

    let state = nikoo_api::AppState {
        pool,
        config: config.clone(),
        http: reqwest::Client::new(),
    };

    let app = nikoo_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    info!(addr = %local_addr, "REST API listening");
    info!(addr = %format!("http://{local_addr}/ui"), "chat UI available");

    axum::serve(listener, app).await?;

    Ok(())
}
