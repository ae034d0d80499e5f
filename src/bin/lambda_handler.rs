//! AWS Lambda handler for single scenario evaluations
//!
//! Accepts a scenario request as the raw invocation payload, or wrapped in a
//! Lambda Function URL event whose `body` holds the JSON request. Returns the
//! result bundle plus chart-ready rows.

use bank_stress::report::{asset_losses, equity_bridge, headline, AssetLossRow, EquityBridgeRow, HeadlineMetrics};
use bank_stress::scenario::{ScenarioParameters, ScenarioRunner, StressTestConfig, DEFAULT_DATA_PATH};
use bank_stress::{ScenarioResult, StressError};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

/// Input parameters, in input-surface units
#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    /// Rate hike in basis points (default: 300)
    #[serde(default = "default_rate_shock_bps")]
    pub rate_shock_bps: i32,

    /// Deposits withdrawn in whole percent (default: 25)
    #[serde(default = "default_withdrawal_pct")]
    pub withdrawal_pct: u32,
}

fn default_rate_shock_bps() -> i32 { 300 }
fn default_withdrawal_pct() -> u32 { 25 }

/// Output of one evaluation
#[derive(Debug, Serialize)]
pub struct ScenarioResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<HeadlineMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_losses: Option<Vec<AssetLossRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equity_bridge: Option<Vec<EquityBridgeRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScenarioResult>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScenarioResponse {
    fn failure(message: String, start: std::time::Instant) -> Self {
        Self {
            headline: None,
            asset_losses: None,
            equity_bridge: None,
            result: None,
            execution_time_ms: start.elapsed().as_millis() as u64,
            error: Some(message),
        }
    }
}

/// Function URL events carry the request as a JSON string in `body`
fn unwrap_request(payload: &Value) -> (bool, Result<ScenarioRequest, serde_json::Error>) {
    match payload.get("body") {
        Some(Value::String(body)) => (true, serde_json::from_str(body)),
        Some(Value::Null) => (true, serde_json::from_str("{}")),
        _ => (false, serde_json::from_value(payload.clone())),
    }
}

fn evaluate(runner: &ScenarioRunner, request: &ScenarioRequest) -> Result<ScenarioResult, StressError> {
    let params = ScenarioParameters::from_bounded_percent(request.rate_shock_bps, request.withdrawal_pct)?;
    runner.run(&params)
}

fn http_response(status: u16, body: &ScenarioResponse) -> Result<Value, Error> {
    Ok(json!({
        "statusCode": status,
        "headers": {
            "Content-Type": "application/json",
            "Access-Control-Allow-Origin": "*",
        },
        "body": serde_json::to_string(body)?,
    }))
}

/// Lambda handler function
async fn handler(runner: &ScenarioRunner, event: LambdaEvent<Value>) -> Result<Value, Error> {
    let start = std::time::Instant::now();
    let (is_http, request) = unwrap_request(&event.payload);

    let (status, response) = match request {
        Err(e) => (400, ScenarioResponse::failure(format!("Invalid JSON: {}", e), start)),
        Ok(request) => match evaluate(runner, &request) {
            Ok(result) => (
                200,
                ScenarioResponse {
                    headline: Some(headline(&result)),
                    asset_losses: Some(asset_losses(&result)),
                    equity_bridge: Some(equity_bridge(&result)),
                    result: Some(result),
                    execution_time_ms: start.elapsed().as_millis() as u64,
                    error: None,
                },
            ),
            Err(e) => {
                let status = if e.is_input_error() { 400 } else { 500 };
                log::warn!("Scenario rejected: {}", e);
                (status, ScenarioResponse::failure(e.to_string(), start))
            }
        },
    };

    if is_http {
        http_response(status, &response)
    } else {
        Ok(serde_json::to_value(&response)?)
    }
}

/// Bundled data files if present, otherwise the built-in reference configuration
fn load_config() -> Result<StressTestConfig, StressError> {
    let dir = Path::new(DEFAULT_DATA_PATH);
    if dir.exists() {
        StressTestConfig::from_data_dir(dir)
    } else {
        Ok(StressTestConfig::reference())
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let runner = ScenarioRunner::with_config(load_config()?);
    let runner = &runner;
    run(service_fn(move |event| async move { handler(runner, event).await })).await
}
