// src/server.rs

//! HTTP surface for the generated sitemap.
//!
//! Three routes: two liveness endpoints and the prebuilt document.
//! Handlers only read immutable shared state, so they cannot fail once
//! the server is up; responses are compressed when the client's
//! `Accept-Encoding` allows it.

use std::net::SocketAddr;

use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use bytes::Bytes;
use serde::Serialize;
use tower_http::compression::CompressionLayer;

use crate::error::Result;

/// Immutable state shared by all request handlers.
#[derive(Clone)]
pub struct AppContext {
    sitemap_xml: Bytes,
}

impl AppContext {
    pub fn new(sitemap_xml: String) -> Self {
        Self {
            sitemap_xml: Bytes::from(sitemap_xml),
        }
    }
}

#[derive(Serialize)]
struct StatusBody {
    status: &'static str,
}

/// `GET /` and `GET /ping`
async fn handle_status() -> Json<StatusBody> {
    Json(StatusBody { status: "ok" })
}

/// `GET /sitemap.xml`
async fn handle_sitemap(Extension(ctx): Extension<AppContext>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        ctx.sitemap_xml.clone(),
    )
}

/// Build the application router.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(handle_status))
        .route("/ping", get(handle_status))
        .route("/sitemap.xml", get(handle_sitemap))
        .layer(CompressionLayer::new())
        .layer(Extension(ctx))
}

/// Bind the listener and serve until the process is terminated.
pub async fn serve(bind: SocketAddr, ctx: AppContext) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(ctx)).await?;
    Ok(())
}
