//! Catalog API Library
//!
//! This crate provides the core functionality for the Catalog API
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod import;
pub mod middleware_helpers;
pub mod migrator;
pub mod observability;
pub mod openapi;
pub mod repositories;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::OpenApi;

use services::catalog::CatalogService;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub catalog: Arc<CatalogService>,
}

/// Build all application routes, without middleware layers
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", handlers::products::products_routes())
        .route("/health", get(health_check))
        .route("/api/status", get(api_status))
        .route("/api-docs/openapi.json", get(openapi_spec))
}

async fn api_status(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    Json(json!({
        "status": "ok",
        "service": "catalog-api",
        "version": version,
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    // Check database connectivity
    let db_status = match db::check_connection(&state.db).await {
        Ok(()) => "healthy",
        Err(_) => "unhealthy",
    };

    Json(json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}
