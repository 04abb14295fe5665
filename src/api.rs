//! REST API for the packing service.
//!
//! Exposes the order search over HTTP and streams packing steps as
//! Server-Sent Events. Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use std::sync::OnceLock;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::config::{ApiConfig, OptimizerConfig};
use crate::error::PackError;
use crate::model::{BinSize, Box3D};
use crate::optimizer::{SearchConfig, SearchMethod, SearchOutcome, optimize};
use crate::packer::{pack_with_progress, validate_boxes};
use crate::strategy::PlacementStrategy;
use crate::types::{Dims, Position};
use crate::verify::{InvariantViolation, verify_result};

#[derive(Clone)]
struct ApiState {
    optimizer_config: OptimizerConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>binstack API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                window.ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                });
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Request structure for both packing endpoints.
///
/// Optional fields fall back to the server configuration.
#[derive(Deserialize, Clone, ToSchema)]
#[schema(
    example = json!({
        "bin": [10, 10, 10],
        "boxes": [
            { "id": 1, "dims": [10, 10, 4] },
            { "id": 2, "dims": [10, 10, 5] },
            { "id": 3, "dims": [10, 10, 6] }
        ],
        "strategy": "DBL",
        "method": "brute_force"
    })
)]
pub struct PackRequest {
    #[schema(value_type = [u32; 3], example = json!([10, 10, 10]))]
    pub bin: Dims,
    pub boxes: Vec<Box3D>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub strategy: Option<PlacementStrategy>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub method: Option<SearchMethod>,
    /// Annealing iteration budget.
    #[serde(default)]
    #[schema(nullable = true)]
    pub iterations: Option<usize>,
    /// Seed of the random generator; entropy when absent everywhere.
    #[serde(default)]
    #[schema(nullable = true)]
    pub seed: Option<u64>,
}

#[derive(Debug)]
struct ValidatedPackRequest {
    bin_size: BinSize,
    boxes: Vec<Box3D>,
    method: SearchMethod,
    search: SearchConfig,
    seed: Option<u64>,
}

impl ValidatedPackRequest {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn run_search(&self) -> Result<SearchOutcome, PackError> {
        optimize(
            &self.boxes,
            self.bin_size,
            self.method,
            &self.search,
            &mut self.rng(),
        )
    }
}

#[derive(Debug, Error)]
enum PackRequestValidationError {
    #[error("iterations must be between 1 and {max}, got {value}")]
    IterationsOutOfRange { value: usize, max: usize },
    #[error(transparent)]
    Pack(#[from] PackError),
}

impl PackRequest {
    fn into_validated(
        self,
        defaults: &OptimizerConfig,
    ) -> Result<ValidatedPackRequest, PackRequestValidationError> {
        let bin_size = BinSize::new(self.bin)?;
        let boxes = self
            .boxes
            .into_iter()
            .map(|b| Box3D::new(b.id, b.dims))
            .collect::<Result<Vec<_>, PackError>>()?;
        validate_boxes(&boxes, &bin_size)?;

        let mut search = defaults.search_config();
        if let Some(strategy) = self.strategy {
            search.strategy = strategy;
        }
        if let Some(iterations) = self.iterations {
            if !(1..=OptimizerConfig::MAX_ITERATIONS).contains(&iterations) {
                return Err(PackRequestValidationError::IterationsOutOfRange {
                    value: iterations,
                    max: OptimizerConfig::MAX_ITERATIONS,
                });
            }
            search.iterations = iterations;
        }

        let method = self.method.unwrap_or_default();
        if method == SearchMethod::BruteForce && boxes.len() > search.brute_force_limit {
            return Err(PackError::SearchSpaceTooLarge {
                boxes: boxes.len(),
                limit: search.brute_force_limit,
            }
            .into());
        }

        Ok(ValidatedPackRequest {
            bin_size,
            boxes,
            method,
            search,
            seed: self.seed.or(defaults.seed()),
        })
    }
}

/// Response structure with all used bins.
#[derive(Serialize, ToSchema)]
pub struct PackResponse {
    pub bins: Vec<PackedBin>,
    pub bin_count: usize,
    pub strategy: PlacementStrategy,
    /// Search method that ran; `auto` is resolved.
    pub method: SearchMethod,
    /// Bins needed by the starting order of a search.
    pub initial_fitness: Option<usize>,
    pub best_fitness: Option<usize>,
    pub average_utilization: f64,
}

/// Single bin with its placed boxes.
///
/// # Fields
/// * `id` - Bin number (1-based)
/// * `utilization` - Used volume in percent
#[derive(Serialize, ToSchema)]
pub struct PackedBin {
    pub id: usize,
    #[schema(value_type = [u32; 3], example = json!([10, 10, 10]))]
    pub dims: Dims,
    pub placed: Vec<PackedBox>,
    pub utilization: f64,
}

/// Single placed box in the response.
#[derive(Serialize, ToSchema)]
pub struct PackedBox {
    pub id: usize,
    #[schema(value_type = [u32; 3], example = json!([0, 0, 0]))]
    pub pos: Position,
    #[schema(value_type = [u32; 3], example = json!([10, 10, 4]))]
    pub dims: Dims,
}

impl PackResponse {
    fn from_outcome(outcome: SearchOutcome, strategy: PlacementStrategy) -> Self {
        let average_utilization = outcome.result.average_utilization();
        let searched = outcome.method != SearchMethod::FirstFit;

        let bins: Vec<PackedBin> = outcome
            .result
            .bins
            .into_iter()
            .enumerate()
            .map(|(i, bin)| {
                let size = bin.size();
                let utilization = bin.utilization_percent();
                PackedBin {
                    id: i + 1,
                    dims: (size.width, size.depth, size.height),
                    placed: bin
                        .into_placed()
                        .into_iter()
                        .map(|p| PackedBox {
                            id: p.object.id,
                            pos: p.position,
                            dims: p.object.dims,
                        })
                        .collect(),
                    utilization,
                }
            })
            .collect();

        Self {
            bin_count: bins.len(),
            bins,
            strategy,
            method: outcome.method,
            initial_fitness: searched.then_some(outcome.initial_fitness),
            best_fitness: searched.then_some(outcome.best_fitness),
            average_utilization,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn pack_error_response(err: &PackError) -> Response {
    let title = match err {
        PackError::InvalidDimension(_) => "Invalid input data",
        PackError::BinTooLarge { .. } | PackError::DimensionsExceedBin { .. } => {
            "Invalid bin configuration"
        }
        PackError::SearchSpaceTooLarge { .. } => "Search space too large",
        PackError::NoPlacementInEmptyBin(_) => "Packing failed",
    };
    error_response(StatusCode::UNPROCESSABLE_ENTITY, title, err.to_string())
}

fn parse_pack_request(
    payload: Result<Json<PackRequest>, JsonRejection>,
    defaults: &OptimizerConfig,
) -> Result<ValidatedPackRequest, Response> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return Err(json_deserialize_error(err)),
    };

    match payload.into_validated(defaults) {
        Ok(validated) => Ok(validated),
        Err(PackRequestValidationError::Pack(err)) => Err(pack_error_response(&err)),
        Err(err @ PackRequestValidationError::IterationsOutOfRange { .. }) => Err(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid input data",
            err.to_string(),
        )),
    }
}

#[derive(Debug, Error)]
enum SolveError {
    #[error(transparent)]
    Pack(#[from] PackError),
    #[error("result failed verification: {0}")]
    Verification(#[from] InvariantViolation),
}

/// Runs the requested search and builds the response body.
fn solve(request: &ValidatedPackRequest, verify: bool) -> Result<PackResponse, SolveError> {
    let outcome = request.run_search()?;
    if verify {
        verify_result(&outcome.result, &request.boxes, request.bin_size)?;
    }
    Ok(PackResponse::from_outcome(outcome, request.search.strategy))
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_pack, handle_pack_stream),
    components(
        schemas(
            PackRequest,
            PackResponse,
            PackedBin,
            PackedBox,
            ErrorResponse,
            Box3D,
            PlacementStrategy,
            SearchMethod
        )
    ),
    tags((name = "packing", description = "Endpoints for bin packing"))
)]
struct ApiDoc;

/// Starts the API server and blocks until it terminates.
pub async fn start_api_server(
    config: ApiConfig,
    optimizer_config: OptimizerConfig,
) -> std::io::Result<()> {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState { optimizer_config };

    let app = Router::new()
        .route("/pack", post(handle_pack))
        .route("/pack_stream", post(handle_pack_stream))
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        "🚀 Server running on http://{}:{}",
        config.display_host(),
        config.port()
    );
    if config.binds_to_all_interfaces() {
        info!("💡 Local access: http://localhost:{}", config.port());
    }
    info!("📦 API Endpoints: POST /pack, POST /pack_stream");
    info!("📑 Documentation: GET /docs, GET /docs/openapi.json");

    axum::serve(listener, app).await
}

/// Handler for POST /pack endpoint.
///
/// Searches for a box order needing few bins and returns the packing of
/// the best order found.
#[utoipa::path(
    post,
    path = "/pack",
    request_body = PackRequest,
    responses(
        (status = 200, description = "Successfully packed boxes", body = PackResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request or bin configuration",
            body = ErrorResponse
        ),
        (
            status = INTERNAL_SERVER_ERROR,
            description = "Packing failed verification",
            body = ErrorResponse
        )
    ),
    tag = "packing"
)]
async fn handle_pack(
    State(state): State<ApiState>,
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> Response {
    let request = match parse_pack_request(payload, &state.optimizer_config) {
        Ok(request) => request,
        Err(response) => return response,
    };

    info!(
        "📥 New pack request: {} boxes, method {}, strategy {}",
        request.boxes.len(),
        request.method,
        request.search.strategy
    );

    let verify = state.optimizer_config.verify_solutions();
    match tokio::task::spawn_blocking(move || solve(&request, verify)).await {
        Ok(Ok(response)) => {
            info!(
                "📦 Result: {} bins via {}",
                response.bin_count, response.method
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(Err(SolveError::Pack(err))) => pack_error_response(&err),
        Ok(Err(err @ SolveError::Verification(_))) => {
            error!("❌ {}", err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Packing failed verification",
                err.to_string(),
            )
        }
        Err(err) => {
            error!("❌ Packing task failed: {}", err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Packing task failed",
                err.to_string(),
            )
        }
    }
}

/// Handler for POST /pack_stream endpoint (SSE).
///
/// Runs the order search first, then streams the events of packing the
/// best order found as Server-Sent Events (text/event-stream).
#[utoipa::path(
    post,
    path = "/pack_stream",
    request_body = PackRequest,
    responses(
        (
            status = 200,
            description = "Streams pack events in real-time",
            content_type = "text/event-stream",
            body = String
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request or bin configuration",
            body = ErrorResponse
        )
    ),
    tag = "packing"
)]
async fn handle_pack_stream(
    State(state): State<ApiState>,
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> Response {
    let request = match parse_pack_request(payload, &state.optimizer_config) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (tx, rx) = mpsc::channel::<String>(32);

    tokio::task::spawn_blocking(move || {
        stream_pack(&request, |msg| {
            // A closed receiver only means the client went away.
            let _ = tx.blocking_send(msg);
        });
    });

    let stream = ReceiverStream::new(rx)
        .map(|msg| Ok::<_, std::convert::Infallible>(Event::default().data(msg)));
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

/// Error event closing a stream whose search or packing failed.
#[derive(Serialize)]
#[serde(tag = "type")]
enum StreamFailure<'a> {
    Error { code: &'a str, message: String },
}

/// Runs the search and hands every serialized event of the final packing
/// run to `send`. A failure ends the stream with an `Error` event.
fn stream_pack(request: &ValidatedPackRequest, mut send: impl FnMut(String)) {
    let streamed = request.run_search().and_then(|outcome| {
        pack_with_progress(
            &outcome.ordered_boxes(&request.boxes),
            request.bin_size,
            request.search.strategy,
            |evt| {
                if let Ok(json) = serde_json::to_string(evt) {
                    send(json);
                }
            },
        )
    });

    if let Err(err) = streamed {
        warn!("⚠️ Stream packing failed: {}", err);
        let event = StreamFailure::Error {
            code: err.code(),
            message: err.to_string(),
        };
        if let Ok(json) = serde_json::to_string(&event) {
            send(json);
        }
    }
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
