use std::sync::Arc;

use anyhow::Result;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::aggregator::Aggregator;
use crate::render;

pub struct ServerState {
    pub aggregator: Aggregator,
    pub wallet: String,
}

type SharedServerState = Arc<ServerState>;

pub async fn start(address: String, state: ServerState) -> Result<()> {
    let state = Arc::from(state);

    let app = Router::new()
        .route("/", get(dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Listening on {}", address);
    let listener = tokio::net::TcpListener::bind(address).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

/// One fetch per page load; upstream failures degrade the content but the
/// page itself always comes back 200.
async fn dashboard(State(state): State<SharedServerState>) -> Html<String> {
    let view = state.aggregator.fetch(&state.wallet).await;
    Html(render::page(&view))
}
