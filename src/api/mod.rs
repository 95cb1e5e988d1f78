use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::mcp;
use plan_core::Catalog;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub projects: usize,
}

/// HTTP surface: MCP over streamable HTTP at `/mcp`, plus a health check.
pub fn create_router(catalog: Catalog) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", mcp::http_service(catalog.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(catalog)
}

async fn health(State(catalog): State<Catalog>) -> Result<Json<Health>, (StatusCode, String)> {
    let projects = catalog
        .list_projects()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(Health {
        status: "ok",
        projects: projects.len(),
    }))
}
