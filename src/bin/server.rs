use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use percolation::config::Params;
use percolation::{Percolation, PercolationError, ThresholdStats, render};

const DEFAULT_CELL_PX: usize = 8;
/// Longest side of any rendered PNG, in pixels.
const MAX_IMAGE_SIDE: usize = 2048;
const SAMPLE_IMAGE_SIDE: usize = 512;
const MAX_N: i64 = 2048;
const MAX_TRIALS: usize = 10_000;

#[derive(Deserialize)]
struct PercolateRequest {
    n: i64,
    #[serde(default)]
    sites: Vec<[i64; 2]>,
    cell_px: Option<usize>,
}

#[derive(Serialize)]
struct PercolateResponse {
    open_sites: usize,
    percolates: bool,
    image: String,
}

#[derive(Deserialize)]
struct StatsRequest {
    n: Option<i64>,
    trials: Option<usize>,
    seed: Option<u64>,
}

#[derive(Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    stats: ThresholdStats,
    trials: usize,
    confidence_lo: f64,
    confidence_hi: f64,
    sample: String,
    timings: Vec<TimingEntry>,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<PercolationError> for ApiError {
    fn from(e: PercolationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(m) => {
                error!(error = %m, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, m)
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

fn encode_png(perc: &Percolation, cell_px: usize) -> Result<String, ApiError> {
    let side = render::image_side(perc, cell_px) as u32;
    let rgba = render::render_sites(perc, cell_px);
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(&rgba, side, side, image::ExtendedColorType::Rgba8)
        .map_err(|e| ApiError::Internal(format!("PNG encode failed: {e}")))?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

/// Pixels per site so that an `n`-site side stays within `max_side`.
fn cell_size(n: usize, requested: usize, max_side: usize) -> usize {
    requested.min(max_side / n.max(1)).max(1)
}

fn check_size(n: i64) -> Result<(), ApiError> {
    if n > MAX_N {
        return Err(ApiError::BadRequest(format!("n must be at most {MAX_N}")));
    }
    Ok(())
}

async fn percolate_handler(
    Json(req): Json<PercolateRequest>,
) -> Result<Json<PercolateResponse>, ApiError> {
    check_size(req.n)?;

    let response = tokio::task::spawn_blocking(move || -> Result<PercolateResponse, ApiError> {
        let mut perc = Percolation::new(req.n)?;
        for [row, col] in req.sites {
            perc.open(row, col)?;
        }
        let cell_px = cell_size(
            perc.size(),
            req.cell_px.unwrap_or(DEFAULT_CELL_PX),
            MAX_IMAGE_SIDE,
        );

        Ok(PercolateResponse {
            open_sites: perc.number_of_open_sites(),
            percolates: perc.percolates(),
            image: encode_png(&perc, cell_px)?,
        })
    })
    .await
    .map_err(|e| ApiError::Internal(format!("percolate task failed: {e}")))??;

    Ok(Json(response))
}

async fn stats_handler(Json(req): Json<StatsRequest>) -> Result<Json<StatsResponse>, ApiError> {
    let defaults = Params::default();
    let params = Params {
        n: req.n.unwrap_or(defaults.n),
        trials: req.trials.unwrap_or(defaults.trials),
        seed: req.seed.unwrap_or(defaults.seed),
    };
    check_size(params.n)?;
    if params.trials > MAX_TRIALS {
        return Err(ApiError::BadRequest(format!(
            "trials must be at most {MAX_TRIALS}"
        )));
    }

    let response = tokio::task::spawn_blocking(move || -> Result<StatsResponse, ApiError> {
        let (stats, sample, timings) = percolation::experiment(&params)?;
        let cell_px = cell_size(sample.size(), DEFAULT_CELL_PX, SAMPLE_IMAGE_SIDE);

        Ok(StatsResponse {
            trials: stats.trials(),
            confidence_lo: stats.confidence_lo(),
            confidence_hi: stats.confidence_hi(),
            stats,
            sample: encode_png(&sample, cell_px)?,
            timings: timings
                .iter()
                .map(|t| TimingEntry {
                    name: t.name.to_string(),
                    ms: t.ms,
                })
                .collect(),
        })
    })
    .await
    .map_err(|e| ApiError::Internal(format!("experiment task failed: {e}")))??;

    Ok(Json(response))
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("percolation=info,server=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let port: u16 = match std::env::var("PERCOLATION_PORT") {
        Ok(v) => v.parse()?,
        Err(_) => 3000,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/percolate", post(percolate_handler))
        .route("/api/stats", post(stats_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!(%addr, "percolation server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
