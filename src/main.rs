// main.rs
use std::sync::Arc;

use poem::{listener::TcpListener, Server};
use tracing_subscriber::EnvFilter;

use roadmap_api::{auth::Authenticator, build_app, config::Config, db, store::RoadmapStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let db = db::connect(
        &config.database_url,
        config.db_max_connections,
        config.run_migrations,
    )
    .await?;

    let app = build_app(
        RoadmapStore::new(db),
        Arc::new(Authenticator::new(&config.jwt_secret)),
    );

    tracing::info!(addr = %config.bind_addr, "roadmap api listening");
    Server::new(TcpListener::bind(config.bind_addr.clone()))
        .run(app)
        .await?;
    Ok(())
}
