//! Serve command - HTTP server for blog pages and the sitemap

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use folio_domain::PageTemplate;
use folio_domain::TagFilter;
use folio_domain::usecases::{PageStatus, Route, ServedPage, SiteError};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::app::App;
use crate::args::ServeArgs;
use crate::config::AppConfig;

#[derive(Clone)]
struct AppState {
    app: Arc<App>,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    tags: Option<String>,
}

pub async fn execute(args: ServeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());

    let app = Arc::new(App::from_config(&config)?);
    let router = router(app);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    tracing::info!(
        bind = %bind,
        provider = %config.cms.provider,
        revalidate_secs = config.site.revalidate_secs,
        "Serving blog"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

pub(crate) fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/blog", get(blog_index))
        .route("/blog/", get(blog_index))
        .route("/blog/{slug}", get(blog_post))
        .route("/sitemap.xml", get(sitemap))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { app })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn root() -> Redirect {
    Redirect::temporary("/blog")
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

async fn blog_index(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
    let filter = params
        .tags
        .as_deref()
        .map(TagFilter::parse)
        .unwrap_or_default();
    page_response(state.app.site.get(&Route::BlogIndex { filter }).await)
}

async fn blog_post(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    page_response(state.app.site.get(&Route::Post { slug }).await)
}

async fn sitemap(State(state): State<AppState>) -> Response {
    let entries = state.app.sitemap.generate().await;
    match state.app.templates.render_sitemap(&entries) {
        Ok(xml) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render sitemap");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render sitemap").into_response()
        }
    }
}

fn page_response(result: Result<ServedPage, SiteError>) -> Response {
    match result {
        Ok(served) => {
            let status = match served.page.status {
                PageStatus::Ok => StatusCode::OK,
                PageStatus::NotFound => StatusCode::NOT_FOUND,
            };
            (
                status,
                [("x-cache", served.cache.as_str())],
                Html(served.page.body),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}
