use std::path::Path;
use std::sync::Arc;

use clubhub_backend::{config::Config, router, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./config.toml".to_string());
    let config = Config::read(Path::new(&config_path));

    let state = Arc::new(AppState::open(&config.data_dir).expect("failed to open data directory"));
    tracing::info!(
        "loaded {} users, {} clubs, {} blogs from {}",
        state.users.len(),
        state.clubs.len(),
        state.blogs.len(),
        config.data_dir.display(),
    );

    let app = router(state);

    tracing::info!("listening on {}", config.address);
    axum::Server::bind(&config.address)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
