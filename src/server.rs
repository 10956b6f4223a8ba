//! REST shell around the solver.
//!
//! `POST /solve` acknowledges immediately and dispatches the solve to a
//! background worker; the worker runs the CPU-bound GA on a blocking thread
//! and posts the outcome to the caller-supplied callback URL. Solves share
//! no mutable state, and a callback that cannot be delivered is logged and
//! dropped; the core never retries.

use std::time::Duration;

use axum::extract::{Json, State};
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::assignment::{SolveOptions, solve};
use crate::error::ServeError;
use crate::models::{Assignment, ProblemInput, ProblemStats};

/// Callback deliveries give up after this long.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared handler state; cloning is cheap (the reqwest client is an `Arc`
/// internally).
#[derive(Clone)]
pub struct AppState {
    client: reqwest::Client,
    options: SolveOptions,
}

impl AppState {
    pub fn new(client: reqwest::Client, options: SolveOptions) -> Self {
        Self { client, options }
    }
}

/// Body of `POST /solve`. The deferred id is opaque and echoed verbatim.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub deferred_id: Value,
    pub callback_url: String,
    pub input: ProblemInput,
}

/// Immediate acknowledgement of a dispatched solve.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveAck {
    pub acknowledged: bool,
    pub deferred_id: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultCallback {
    deferred_id: Value,
    assignments: Vec<Assignment>,
    stats: Option<ProblemStats>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorCallback {
    deferred_id: Value,
    error: String,
}

/// Builds the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/solve", post(solve_handler))
        .with_state(state)
}

/// Binds and serves until the listener fails.
pub async fn serve(host: &str, port: u16) -> Result<(), ServeError> {
    let client = reqwest::Client::builder()
        .timeout(CALLBACK_TIMEOUT)
        .build()?;
    let state = AppState::new(client, SolveOptions::default());

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(host, port, "listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn solve_handler(
    State(state): State<AppState>,
    Json(request): Json<SolveRequest>,
) -> Json<SolveAck> {
    let ack = SolveAck {
        acknowledged: true,
        deferred_id: request.deferred_id.clone(),
    };
    tokio::spawn(run_deferred(state, request));
    Json(ack)
}

/// Background half of a dispatched solve: validate, solve on a blocking
/// thread, deliver the callback.
async fn run_deferred(state: AppState, request: SolveRequest) {
    let deferred_id = request.deferred_id;

    let body = match request.input.validate() {
        Err(validation) => serde_json::to_value(ErrorCallback {
            deferred_id,
            error: validation.to_string(),
        }),
        Ok(()) => {
            let input = request.input;
            let options = state.options.clone();
            match tokio::task::spawn_blocking(move || solve(&input, &options)).await {
                Ok(output) => serde_json::to_value(ResultCallback {
                    deferred_id,
                    assignments: output.assignments,
                    stats: output.stats,
                }),
                Err(join_error) => serde_json::to_value(ErrorCallback {
                    deferred_id,
                    error: format!("solver task failed: {join_error}"),
                }),
            }
        }
    };

    let body = match body {
        Ok(body) => body,
        Err(serialize_error) => {
            error!(error = %serialize_error, "failed to serialize callback body");
            return;
        }
    };

    let delivery = state
        .client
        .post(&request.callback_url)
        .json(&body)
        .send()
        .await
        .and_then(|response| response.error_for_status());
    if let Err(delivery_error) = delivery {
        error!(
            url = %request.callback_url,
            error = %delivery_error,
            "callback delivery failed; result dropped"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tokio::sync::oneshot;
    use tower::util::ServiceExt;

    use super::*;

    fn test_state(runs: usize) -> AppState {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        AppState::new(
            client,
            SolveOptions {
                runs,
                seed: Some(42),
            },
        )
    }

    fn solve_body(callback_url: &str, num_students: usize) -> String {
        let students: Vec<Value> = (1..=num_students as i64)
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "possible_groups": [10],
                    "values": {}
                })
            })
            .collect();
        serde_json::json!({
            "deferredId": "job-1",
            "callbackUrl": callback_url,
            "input": {
                "num_students": num_students,
                "num_groups": 1,
                "groups": [{ "id": 10, "size": num_students, "criteria": {} }],
                "students": students
            }
        })
        .to_string()
    }

    fn post_solve(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/solve")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    /// One-shot callback receiver on an ephemeral port.
    async fn callback_receiver() -> (String, oneshot::Receiver<Value>) {
        let (tx, rx) = oneshot::channel();
        let slot = Arc::new(Mutex::new(Some(tx)));

        let receiver = Router::new()
            .route(
                "/callback",
                post(move |Json(body): Json<Value>| {
                    let slot = Arc::clone(&slot);
                    async move {
                        if let Some(tx) = slot.lock().unwrap().take() {
                            let _ = tx.send(body);
                        }
                        StatusCode::OK
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/callback", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, receiver).await.unwrap();
        });
        (url, rx)
    }

    #[tokio::test]
    async fn test_solve_acknowledges_immediately() {
        let app = app(test_state(1));
        let response = app
            .oneshot(post_solve(solve_body("http://127.0.0.1:1/unreachable", 2)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let ack: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(ack["acknowledged"], Value::Bool(true));
        assert_eq!(ack["deferredId"], Value::String("job-1".into()));
    }

    #[tokio::test]
    async fn test_solve_delivers_result_callback() {
        let (url, rx) = callback_receiver().await;
        let app = app(test_state(1));
        let response = app.oneshot(post_solve(solve_body(&url, 2))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = tokio::time::timeout(Duration::from_secs(30), rx)
            .await
            .expect("callback not delivered in time")
            .unwrap();
        assert_eq!(body["deferredId"], Value::String("job-1".into()));
        assert_eq!(body["assignments"].as_array().unwrap().len(), 2);
        assert_eq!(body["assignments"][0]["group_id"], 10);
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_invalid_input_delivers_error_callback() {
        let (url, rx) = callback_receiver().await;
        let mut request: Value = serde_json::from_str(&solve_body(&url, 2)).unwrap();
        // Declared count disagrees with the student list.
        request["input"]["num_students"] = Value::from(5);

        let app = app(test_state(1));
        let response = app.oneshot(post_solve(request.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = tokio::time::timeout(Duration::from_secs(10), rx)
            .await
            .expect("error callback not delivered in time")
            .unwrap();
        assert_eq!(body["deferredId"], Value::String("job-1".into()));
        assert!(body["error"].as_str().unwrap().contains("num_students"));
        assert!(body.get("assignments").is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_rejected_synchronously() {
        let app = app(test_state(1));
        let response = app
            .oneshot(post_solve("{\"deferredId\": 1}".to_string()))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
