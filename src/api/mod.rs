//! HTTP layer exposing the analysis form and JSON API.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::{config::Settings, ner::Ner};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub ner: Arc<dyn Ner>,
}

impl AppState {
    pub fn new(settings: Settings, ner: Arc<dyn Ner>) -> Self {
        Self {
            settings: Arc::new(settings),
            ner,
        }
    }
}

/// Build the application router; exposed for in-process tests.
pub fn router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.settings.static_dir);
    let api = Router::new()
        .route("/analyze", post(routes::analyze_json))
        .route("/examples", get(routes::list_examples))
        .route("/categories", get(routes::list_categories))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(routes::index).post(routes::submit_form))
        .route("/healthz", get(routes::healthz))
        .nest("/api", api)
        .fallback_service(static_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, host: String, port: u16) -> Result<()> {
    let router = router(state);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving uk-ner-highlight");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
