use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wrong_way_jokes::engine::engine::JokeEngine;
use wrong_way_jokes::server::routes::create_router;
use wrong_way_jokes::server::settings_io::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wrong_way_jokes=info,tower_http=info")),
        )
        .init();

    let settings = load_settings();
    info!(?settings, "starting");

    let engine = Arc::new(JokeEngine::from_settings(&settings));
    let app = create_router(engine, settings.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
