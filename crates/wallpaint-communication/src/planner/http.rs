//! HTTP client for the planning service
//!
//! `POST {base}/trajectories/?tool_width=..` plans and stores a trajectory,
//! `GET {base}/trajectories/{id}` reads one back. Error bodies carry a
//! `detail` field which becomes the user-visible message.

use super::PlannerService;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use wallpaint_core::{ServiceError, Trajectory, TrajectoryRequest};

/// Planning service client over HTTP
#[derive(Debug, Clone)]
pub struct HttpPlannerClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl HttpPlannerClient {
    /// Create a client for the API rooted at `base_url`
    /// (for example `http://127.0.0.1:8000/api/v1`).
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: normalize_base(base_url)?,
            timeout: None,
        })
    }

    /// Give up on requests that take longer than `timeout`. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|e| ServiceError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                reason: e.to_string(),
            })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Trajectory, ServiceError> {
        let request = match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        debug!("Planner responded {}", status);

        if !status.is_success() {
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Could not read planner error body: {}", e);
                    Default::default()
                }
            };
            let detail = error_detail(status, &body);
            warn!("Planner rejected request ({}): {}", status.as_u16(), detail);
            return Err(ServiceError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        response.json::<Trajectory>().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                ServiceError::Decode {
                    reason: e.to_string(),
                }
            }
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> ServiceError {
        match self.timeout {
            Some(timeout) if error.is_timeout() => ServiceError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            },
            _ => ServiceError::Transport {
                reason: error.to_string(),
            },
        }
    }
}

#[async_trait]
impl PlannerService for HttpPlannerClient {
    async fn plan(
        &self,
        request: &TrajectoryRequest,
        tool_width: f64,
    ) -> Result<Trajectory, ServiceError> {
        let url = self.endpoint("trajectories/")?;
        info!(
            "Requesting trajectory for {}x{} m wall, {} obstacles, tool {} m",
            request.wall_dimensions.width,
            request.wall_dimensions.height,
            request.obstacles.len(),
            tool_width
        );
        let trajectory = self
            .send(
                self.http
                    .post(url)
                    .query(&[("tool_width", tool_width)])
                    .json(request),
            )
            .await?;
        info!(
            "Planner returned trajectory {:?} with {} waypoints",
            trajectory.id,
            trajectory.path.len()
        );
        Ok(trajectory)
    }

    async fn fetch_trajectory(&self, id: i64) -> Result<Trajectory, ServiceError> {
        let url = self.endpoint(&format!("trajectories/{id}"))?;
        info!("Fetching trajectory {}", id);
        self.send(self.http.get(url)).await
    }
}

/// Message for a non-success response.
///
/// Uses the body's `detail` field: strings verbatim, anything else (such as a
/// list of validation errors) as compact JSON. Falls back to the status reason
/// phrase when the body has no usable `detail`.
pub fn error_detail(status: StatusCode, body: &[u8]) -> String {
    let detail = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut fields)) => fields.remove("detail"),
        _ => None,
    };

    match detail {
        Some(Value::String(text)) if !text.is_empty() => text,
        Some(Value::Null) | Some(Value::String(_)) | None => status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
        Some(other) => other.to_string(),
    }
}

fn normalize_base(base_url: &str) -> Result<Url, ServiceError> {
    let invalid = |reason: String| ServiceError::InvalidUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http(s) URL".to_string()));
    }
    // Url::join replaces the last path segment unless the base ends in '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
