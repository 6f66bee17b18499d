use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use gutlog_ai::{GeminiClient, OpenAiClient, VisionModel};
use gutlog_blobstore::FsJsonStore;
use gutlog_core::{
    AnalysisError, AnalysisRecord, AnalysisService, CoreConfig, HistoryEntry, HistoryService,
    Provider,
};

const ANALYSIS_FAILURE_DETAIL: &str = "Failed to analyze the image. Please check that the API \
     key is valid and the image is base64 encoded, then try again or contact support if the \
     issue persists.";
const HISTORY_FAILURE_DETAIL: &str =
    "Failed to fetch history. Please try again or contact support if the issue persists.";

/// Application state shared across REST API handlers
///
/// Holds the analysis orchestrator and the history service; both are cheap
/// clones over shared `Arc` internals.
#[derive(Clone)]
struct AppState {
    analysis: AnalysisService,
    history: HistoryService,
}

/// Analysis request carrying the image to examine
#[derive(serde::Deserialize, ToSchema)]
struct AnalysisReq {
    /// Base64-encoded image, optionally with a data-URI prefix
    image: String,
}

/// Date-range bounds for the history query
#[derive(serde::Deserialize, IntoParams)]
struct HistoryParams {
    /// Start date in ISO format
    start_date: Option<String>,
    /// End date in ISO format
    end_date: Option<String>,
}

#[derive(serde::Serialize, ToSchema)]
struct HistoryRes {
    entries: Vec<HistoryEntry>,
}

#[derive(serde::Serialize, ToSchema)]
struct HealthRes {
    ok: bool,
    message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, analyze_stool, get_history),
    components(schemas(
        AnalysisReq,
        HistoryRes,
        HealthRes,
        AnalysisRecord,
        HistoryEntry,
        gutlog_core::HealthMetric,
        gutlog_core::MetricReport,
        gutlog_core::StoolAnalysis,
        gutlog_core::Severity,
        gutlog_core::MetricCategory,
    ))
)]
struct ApiDoc;

/// Main entry point for the gutlog service
///
/// # Environment Variables
/// - `GUTLOG_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `GUTLOG_DATA_DIR`: Directory for history storage (default: "/gutlog_data")
/// - `GUTLOG_PROVIDER`: Vision provider, "gemini" or "openai" (default: "gemini")
/// - `GUTLOG_MODEL`: Optional model-name override for the chosen provider
/// - `GEMINI_API_KEY` / `OPENAI_API_KEY`: Credential for the chosen provider
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gutlog=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("GUTLOG_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let data_dir = std::env::var("GUTLOG_DATA_DIR").unwrap_or_else(|_| "/gutlog_data".into());
    let provider: Provider = std::env::var("GUTLOG_PROVIDER")
        .unwrap_or_else(|_| "gemini".into())
        .parse()?;
    let model_name = std::env::var("GUTLOG_MODEL").ok();

    let api_key = match provider {
        Provider::Gemini => std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY must be set for the gemini provider"))?,
        Provider::OpenAi => std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY must be set for the openai provider"))?,
    };

    let config = CoreConfig::new(data_dir.into(), provider, api_key, model_name)?;

    let model: Arc<dyn VisionModel> = match config.provider() {
        Provider::Gemini => Arc::new(GeminiClient::new(
            config.api_key().to_string(),
            config.model_name().map(String::from),
        )?),
        Provider::OpenAi => Arc::new(OpenAiClient::new(
            config.api_key().to_string(),
            config.model_name().map(String::from),
        )?),
    };

    let store = Arc::new(FsJsonStore::new(config.data_dir().to_path_buf()));
    let history = HistoryService::new(store);
    let analysis = AnalysisService::new(
        model,
        history.clone(),
        config.provider().report_variant(),
    );

    tracing::info!("++ Starting gutlog REST on {}", addr);

    let app = Router::new()
        .route("/health", get(health))
        .route("/analyze-stool", post(analyze_stool))
        .route("/history", get(get_history))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { analysis, history });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "gutlog is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/analyze-stool",
    request_body = AnalysisReq,
    responses(
        (status = 200, description = "Analysis result", body = AnalysisRecord),
        (status = 422, description = "The model reply could not be parsed"),
        (status = 500, description = "Analysis failed")
    )
)]
/// Analyze a stool sample image
///
/// Sends the image to the configured vision provider, parses the reply into
/// a structured record, and appends it to history. A history-write failure
/// is logged server-side and does not fail the request.
async fn analyze_stool(
    State(state): State<AppState>,
    Json(req): Json<AnalysisReq>,
) -> Result<Json<AnalysisRecord>, (StatusCode, String)> {
    match state.analysis.analyze(&req.image).await {
        Ok(record) => Ok(Json(record)),
        Err(e @ AnalysisError::Format(_)) => {
            Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
        }
        Err(e) => {
            tracing::error!("analysis error: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ANALYSIS_FAILURE_DETAIL.to_string(),
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/history",
    params(HistoryParams),
    responses(
        (status = 200, description = "History entries, newest first", body = HistoryRes),
        (status = 400, description = "Invalid date format"),
        (status = 500, description = "Failed to fetch history")
    )
)]
/// Fetch analysis history, optionally filtered by an inclusive date range
async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryRes>, (StatusCode, String)> {
    match state
        .history
        .query(params.start_date.as_deref(), params.end_date.as_deref())
    {
        Ok(entries) => Ok(Json(HistoryRes { entries })),
        Err(e @ AnalysisError::Validation(_)) => Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => {
            tracing::error!("error fetching history: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                HISTORY_FAILURE_DETAIL.to_string(),
            ))
        }
    }
}
