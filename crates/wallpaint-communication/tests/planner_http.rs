//! HTTP planner client against a local axum server

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use wallpaint_communication::{HttpPlannerClient, PlannerService};
use wallpaint_core::{Dimensions, Obstacle, Point, ServiceError, TrajectoryRequest};

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(HashMap<String, String>, Value)>>>,
}

async fn serve(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api/v1")
}

fn scenario_request() -> TrajectoryRequest {
    TrajectoryRequest::new(
        Dimensions::new(4.0, 3.0),
        vec![Obstacle::new(Point::new(1.0, 1.0), Dimensions::new(1.0, 1.0))],
    )
}

fn planned_body() -> Value {
    json!({
        "id": 42,
        "wall_dimensions": {"width": 4.0, "height": 3.0},
        "obstacles": [{
            "bottom_left": {"x": 1.0, "y": 1.0},
            "dimensions": {"width": 1.0, "height": 1.0}
        }],
        "path": [{"x": 0.0, "y": 0.0}, {"x": 2.0, "y": 0.0}, {"x": 2.0, "y": 2.0}]
    })
}

fn failing_planner(status: StatusCode, body: Option<Value>) -> Router {
    Router::new().route(
        "/api/v1/trajectories/",
        post(move || async move {
            match body {
                Some(body) => (status, Json(body)).into_response(),
                None => status.into_response(),
            }
        }),
    )
}

#[tokio::test]
async fn test_plan_posts_request_and_decodes_trajectory() {
    let captured = Captured::default();
    let app = Router::new()
        .route(
            "/api/v1/trajectories/",
            post(
                |State(captured): State<Captured>,
                 Query(query): Query<HashMap<String, String>>,
                 Json(body): Json<Value>| async move {
                    captured.requests.lock().await.push((query, body));
                    (StatusCode::CREATED, Json(planned_body()))
                },
            ),
        )
        .with_state(captured.clone());
    let base = serve(app).await;

    let client = HttpPlannerClient::new(&base).unwrap();
    let trajectory = client.plan(&scenario_request(), 0.1).await.unwrap();

    assert_eq!(trajectory.id, Some(42));
    assert_eq!(trajectory.segment_count(), 2);
    assert_eq!(trajectory.final_point(), Some(Point::new(2.0, 2.0)));
    assert_eq!(trajectory.obstacles.len(), 1);

    let requests = captured.requests.lock().await;
    assert_eq!(requests.len(), 1);
    let (query, body) = &requests[0];
    assert_eq!(query.get("tool_width").map(String::as_str), Some("0.1"));
    assert_eq!(
        *body,
        json!({
            "wall_dimensions": {"width": 4.0, "height": 3.0},
            "obstacles": [{
                "bottom_left": {"x": 1.0, "y": 1.0},
                "dimensions": {"width": 1.0, "height": 1.0}
            }]
        })
    );
}

#[tokio::test]
async fn test_service_detail_becomes_message() {
    let base = serve(failing_planner(
        StatusCode::BAD_REQUEST,
        Some(json!({"detail": "obstacle overlaps wall boundary"})),
    ))
    .await;

    let err = HttpPlannerClient::new(&base)
        .unwrap()
        .plan(&scenario_request(), 0.1)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.to_string(),
        "API Error: obstacle overlaps wall boundary"
    );
}

#[tokio::test]
async fn test_missing_detail_uses_status_reason() {
    let base = serve(failing_planner(StatusCode::BAD_REQUEST, None)).await;

    let err = HttpPlannerClient::new(&base)
        .unwrap()
        .plan(&scenario_request(), 0.1)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "API Error: Bad Request");
}

#[tokio::test]
async fn test_validation_detail_rendered_as_json() {
    let base = serve(failing_planner(
        StatusCode::UNPROCESSABLE_ENTITY,
        Some(json!({"detail": [{"msg": "field required"}]})),
    ))
    .await;

    let err = HttpPlannerClient::new(&base)
        .unwrap()
        .plan(&scenario_request(), 0.1)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ServiceError::Api {
            status: 422,
            detail: r#"[{"msg":"field required"}]"#.to_string(),
        }
    );
}

#[tokio::test]
async fn test_success_without_trajectory_is_decode_error() {
    let base = serve(failing_planner(
        StatusCode::CREATED,
        Some(json!({"unexpected": true})),
    ))
    .await;

    let err = HttpPlannerClient::new(&base)
        .unwrap()
        .plan(&scenario_request(), 0.1)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Decode { .. }), "{err:?}");
}

#[tokio::test]
async fn test_fetch_trajectory_by_id() {
    let app = Router::new().route(
        "/api/v1/trajectories/:id",
        get(|Path(id): Path<i64>| async move {
            if id == 42 {
                Json(planned_body()).into_response()
            } else {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"detail": "Trajectory not found"})),
                )
                    .into_response()
            }
        }),
    );
    let base = serve(app).await;
    let client = HttpPlannerClient::new(&base).unwrap();

    let trajectory = client.fetch_trajectory(42).await.unwrap();
    assert_eq!(trajectory.id, Some(42));

    let err = client.fetch_trajectory(7).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "API Error: Trajectory not found");
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = HttpPlannerClient::new(&format!("http://{addr}/api/v1"))
        .unwrap()
        .plan(&scenario_request(), 0.1)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Transport { .. }), "{err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let app = Router::new().route(
        "/api/v1/trajectories/",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::CREATED, Json(planned_body()))
        }),
    );
    let base = serve(app).await;

    let err = HttpPlannerClient::new(&base)
        .unwrap()
        .with_timeout(Some(Duration::from_millis(100)))
        .plan(&scenario_request(), 0.1)
        .await
        .unwrap_err();

    assert_eq!(err, ServiceError::Timeout { timeout_ms: 100 });
}

#[tokio::test]
async fn test_truncated_error_body_uses_status_reason() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        // Headers, then the JSON body, which ends with a closing brace.
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            request.extend_from_slice(&chunk[..n]);
            let body_started = request.windows(4).any(|w| w == b"\r\n\r\n");
            if n == 0 || (body_started && request.ends_with(b"}")) {
                break;
            }
        }
        let head = "HTTP/1.1 400 Bad Request\r\n\
                    content-type: application/json\r\n\
                    content-length: 64\r\n\r\n{\"detail\":";
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
    });

    let err = HttpPlannerClient::new(&format!("http://{addr}/api/v1"))
        .unwrap()
        .plan(&scenario_request(), 0.1)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ServiceError::Api {
            status: 400,
            detail: "Bad Request".to_string(),
        }
    );
}
