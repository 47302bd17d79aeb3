//! HTTP surface for the forecast dashboard.
//!
//! The dashboard UI is a thin consumer of these endpoints; every handler is
//! a read-only query against the shared [`ForecastService`]. Request-time
//! errors become readable JSON messages with an appropriate status code and
//! never take the process down.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use petrocast_core::ForecastError;

use crate::service::{Forecast, ForecastService, HorizonRange};

const INDEX_HTML: &str = include_str!("index.html");

/// Build the application router.
pub fn router(service: Arc<ForecastService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/api/history", get(history))
        .route("/api/forecast", get(forecast))
        .route("/api/forecast.csv", get(forecast_csv))
        .with_state(service)
}

/// Bind and serve until the process is stopped.
pub async fn serve(service: Arc<ForecastService>, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "forecast server listening");
    axum::serve(listener, router(service)).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ForecastParams {
    /// `short` (default) or `long`.
    range: Option<String>,
    /// Months ahead; defaults to the range's configured default.
    horizon: Option<i64>,
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn history(State(service): State<Arc<ForecastService>>) -> Response {
    let (dates, values) = service.history();
    Json(json!({
        "dates": dates,
        "values": values,
        "last_observed": service.last_observed(),
    }))
    .into_response()
}

async fn forecast(
    State(service): State<Arc<ForecastService>>,
    Query(params): Query<ForecastParams>,
) -> Response {
    match run_forecast(&service, &params) {
        Ok((range, forecast)) => Json(json!({
            "range": match range {
                HorizonRange::Short => "short",
                HorizonRange::Long => "long",
            },
            "horizon": forecast.values.len(),
            "dates": forecast.dates,
            "values": forecast.values,
        }))
        .into_response(),
        Err(response) => response,
    }
}

async fn forecast_csv(
    State(service): State<Arc<ForecastService>>,
    Query(params): Query<ForecastParams>,
) -> Response {
    match run_forecast(&service, &params) {
        Ok((_, forecast)) => {
            let body = ForecastService::to_csv(&forecast);
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"future_forecast.csv\"",
                    ),
                ],
                body,
            )
                .into_response()
        }
        Err(response) => response,
    }
}

/// Shared parameter handling for the JSON and CSV forecast endpoints.
fn run_forecast(
    service: &ForecastService,
    params: &ForecastParams,
) -> std::result::Result<(HorizonRange, Forecast), Response> {
    let range = match params.range.as_deref() {
        None => HorizonRange::Short,
        Some(raw) => HorizonRange::parse(raw).ok_or_else(|| {
            error_body(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown range '{}': expected 'short' or 'long'", raw),
            )
        })?,
    };
    let horizon = params
        .horizon
        .unwrap_or(service.default_horizon(range) as i64);

    service
        .forecast(range, horizon)
        .map(|forecast| (range, forecast))
        .map_err(error_response)
}

/// Map a pipeline error to a user-readable response.
fn error_response(err: ForecastError) -> Response {
    let status = match err {
        ForecastError::InvalidHorizon { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ForecastError::DataFileNotFound(_) | ForecastError::ModelNotLoaded(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_body(status, err.to_string())
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
