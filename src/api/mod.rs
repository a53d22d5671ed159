//! HTTP layer serving generated report pages.

use std::{net::SocketAddr, path::PathBuf};

use anyhow::Result;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub report_dir: PathBuf,
}

/// Serve the report directory as static files with a JSON page listing.
pub async fn serve(report_dir: PathBuf, host: String, port: u16) -> Result<()> {
    let state = AppState {
        report_dir: report_dir.clone(),
    };
    let static_dir = ServeDir::new(&report_dir);
    let router = Router::new()
        .route("/reports", get(list_reports))
        .fallback_service(static_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, dir = %report_dir.display(), "serving reports");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}

async fn list_reports(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    let entries = std::fs::read_dir(&state.report_dir)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let mut pages: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".html"))
        .collect();
    pages.sort();
    Ok(Json(pages))
}
