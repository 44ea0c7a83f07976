//! HTTP server for the clinqa API.
//!
//! Provides REST endpoints for CSV quality analysis and stored reports.
//!
//! # API Endpoints
//!
//! | Method | Path                 | Description                          |
//! |--------|----------------------|--------------------------------------|
//! | GET    | `/health`            | Health check                         |
//! | POST   | `/api/analyze`       | Upload a CSV for QA analysis         |
//! | GET    | `/api/reports`       | List saved upload records            |
//! | GET    | `/api/reports/{id}`  | Fetch a saved report                 |
//! | GET    | `/api/logs`          | SSE stream for real-time logs        |

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_info, LOG_BROADCASTER};
use super::types::{error_response, AnalyzeResponse, RecordSummary};
use crate::config::Config;
use crate::error::{ServerError, ServerResult, StoreError};
use crate::models::{Modality, QaReport};
use crate::pipeline::{run_analysis, AnalysisInput, AnalysisOutcome};
use crate::store::{ReportStore, SharedStore, DEFAULT_LIST_LIMIT};

/// Shared state of the HTTP handlers.
pub struct AppState {
    pub store: Mutex<ReportStore>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Store(StoreError::InvalidReport(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Store(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>, config: &Config) -> Router {
    // Permissive CORS for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/analyze", post(analyze_csv))
        .route("/api/reports", get(list_reports))
        .route("/api/reports/{id}", get(get_report))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        store: Mutex::new(ReportStore::new(&config)),
    });
    let app = router(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    println!("🚀 clinqa server running on http://localhost:{}", config.port);
    println!("   POST /api/analyze      - Upload CSV file");
    println!("   GET  /api/reports      - Saved upload records");
    println!("   GET  /api/reports/{{id}} - Saved report");
    println!("   GET  /api/logs         - SSE log stream");
    println!("   GET  /health           - Health check");
    println!();
    println!("📁 Reports stored in {}", config.report_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "clinqa",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "analyze": "POST /api/analyze",
            "reports": "GET /api/reports",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers skip missed entries
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Fields of the `/api/analyze` form.
#[derive(Debug, Default)]
struct AnalyzeForm {
    file_name: Option<String>,
    bytes: Option<Vec<u8>>,
    modality: Option<Modality>,
    save: bool,
}

fn parse_modality(value: &str) -> ServerResult<Option<Modality>> {
    match value.parse::<Modality>() {
        Ok(Modality::Unknown) => Ok(None),
        Ok(modality) => Ok(Some(modality)),
        Err(e) => Err(ServerError::BadRequest(e)),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

async fn read_form(mut multipart: Multipart) -> ServerResult<AnalyzeForm> {
    let mut form = AnalyzeForm::default();
    let bad_request = |e: axum::extract::multipart::MultipartError| {
        ServerError::BadRequest(format!("Multipart error: {}", e))
    };

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                form.file_name = field.file_name().map(|s| s.to_string());
                form.bytes = Some(field.bytes().await.map_err(bad_request)?.to_vec());
            }
            "modality" => form.modality = parse_modality(&field.text().await.map_err(bad_request)?)?,
            "save" => form.save = parse_flag(&field.text().await.map_err(bad_request)?),
            _ => {}
        }
    }

    Ok(form)
}

/// Upload CSV endpoint
async fn analyze_csv(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ServerResult<Json<AnalyzeResponse>> {
    let form = read_form(multipart).await?;

    let bytes = form
        .bytes
        .ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))?;
    if form.save && !form.modality.is_some_and(|m| m.is_csv()) {
        return Err(ServerError::BadRequest(
            "Saving requires a modality of clinical, wearable or neuropsychological".to_string(),
        ));
    }

    let name = form.file_name.unwrap_or_else(|| "upload.csv".to_string());
    log_info(format!("📄 New upload: {} ({} bytes)", name, bytes.len()));
    let input = AnalysisInput::from_bytes(name, bytes, form.modality);
    let save = form.save;

    // analysis runs unlocked; the store is locked only for the write
    let outcome = tokio::task::spawn_blocking(move || -> AnalysisOutcome {
        if save {
            run_analysis(input, Some(&mut SharedStore(&state.store)))
        } else {
            run_analysis(input, None)
        }
    })
    .await
    .map_err(|e| ServerError::Internal(e.to_string()))?;

    Ok(Json(AnalyzeResponse::from(outcome)))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<usize>,
}

/// Saved upload records, newest first
async fn list_reports(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ServerResult<Json<Vec<RecordSummary>>> {
    let store = state
        .store
        .lock()
        .map_err(|_| ServerError::Internal("report store lock poisoned".to_string()))?;

    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let records = store.list(limit).into_iter().map(RecordSummary::from).collect();
    Ok(Json(records))
}

/// A saved report, schema-checked before it is returned
async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<QaReport>> {
    let store = state
        .store
        .lock()
        .map_err(|_| ServerError::Internal("report store lock poisoned".to_string()))?;

    Ok(Json(store.load_report(&id)?))
}
