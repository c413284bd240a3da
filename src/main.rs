mod boxoffice;
mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod fields;
mod models;
mod query;
mod routes;
mod screening;
mod store;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{catalog::CatalogClient, config::Config, store::MovieStore};

pub struct AppState {
    pub config: Arc<Config>,
    pub store: MovieStore,
    pub catalog: CatalogClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,smdb=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = reqwest::Client::builder()
        .user_agent("smdb/0.1")
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build()?;

    let db = db::connect_and_migrate(config.database_url.as_str()).await?;
    let store = MovieStore::new(db);

    let catalog = CatalogClient::new(
        http,
        config.catalog_api_key.clone(),
        config.catalog_base_url.clone(),
        config.catalog_page_size,
        config.catalog_max_pages,
        config.catalog_rps,
    );

    let state = Arc::new(AppState { config: config.clone(), store, catalog });

    let origins: Vec<HeaderValue> =
        config.allowed_origins.iter().filter_map(|origin| origin.parse().ok()).collect();
    let cors = CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/movies/", get(routes::search))
        .route("/movies/upload/", post(routes::upload))
        .route("/movies/filter/", get(routes::filter))
        .route("/movies/mostloved/", get(routes::most_loved))
        .route("/movies/onscreen", get(routes::on_screen))
        .route("/movies/comingsoon", get(routes::coming_soon))
        .route("/movies/offscreen", get(routes::off_screen))
        .route("/movies/detail/{id}", get(routes::detail))
        .route("/delete_all_records/", post(routes::delete_all))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
