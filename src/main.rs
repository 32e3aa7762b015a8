//! Citation explorer web server entry point.

use axum::{routing::get, Router};
use std::sync::Arc;

use citeview::{handlers, AppState, BIND_ADDR};

#[tokio::main]
async fn main() {
    let state = Arc::new(AppState::new());

    let app = Router::new()
        .route("/", get(handlers::index).post(handlers::upload))
        .route("/api/citation/{*key}", get(handlers::citation_detail))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(BIND_ADDR)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {}", BIND_ADDR, e));

    println!("citeview running at http://{}", BIND_ADDR);

    axum::serve(listener, app).await.expect("Server error");
}
