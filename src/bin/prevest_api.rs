use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use prevest::estimate::PrevalenceEstimate;
use prevest::scenario::{Scenario, ScenarioConfig};

#[derive(Debug, Serialize)]
struct RunResponse {
    return_code: i32,
    run_id: String,
    horizon_days: usize,
    inflow_days: usize,
    estimates: Vec<PrevalenceEstimate>,
    cumulative_deaths: Vec<i64>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/run_estimate", post(run_estimate));

    let addr: SocketAddr = format!("{}:{}", host, port).parse().expect("invalid HOST/PORT");
    log::info!("[prevest-api] listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind failed");
    axum::serve(listener, app).await.expect("server failed");
}

async fn healthz() -> impl IntoResponse {
    Json(json!({"ok": true}))
}

async fn run_estimate(Json(cfg): Json<ScenarioConfig>) -> impl IntoResponse {
    // Simulation is CPU-bound; keep it off the async workers.
    let join = tokio::task::spawn_blocking(move || run_estimate_sync(cfg));

    match join.await {
        Ok(Ok(resp)) => (StatusCode::OK, Json(resp)).into_response(),
        Ok(Err((code, body))) => (code, Json(body)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"return_code": 2, "error": format!("join error: {e}")})),
        )
            .into_response(),
    }
}

fn run_estimate_sync(cfg: ScenarioConfig) -> Result<RunResponse, (StatusCode, serde_json::Value)> {
    if cfg.historical_csv.is_some() || cfg.backlog_csv.is_some() {
        return Err((
            StatusCode::BAD_REQUEST,
            json!({"return_code": 1, "error": "CSV paths are not accepted over HTTP; send series inline"}),
        ));
    }

    cfg.check_limits().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            json!({"return_code": 1, "error": format!("scenario too large: {e:#}")}),
        )
    })?;

    let run_id = format!("run-{}", now_millis());
    let horizon_days = cfg.horizon_days;

    let scenario = Scenario::resolve(cfg).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            json!({"return_code": 1, "error": format!("invalid scenario: {e:#}")}),
        )
    })?;
    let outcome = scenario.run().map_err(|e| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"return_code": 1, "error": format!("simulation rejected input: {e}")}),
        )
    })?;

    log::info!("[prevest-api] {} finished with {} estimates", run_id, outcome.estimates.len());

    Ok(RunResponse {
        return_code: 0,
        run_id,
        horizon_days,
        inflow_days: outcome.inflow.len(),
        estimates: outcome.estimates,
        cumulative_deaths: outcome.cohort.cumulative_deaths,
    })
}

fn now_millis() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
