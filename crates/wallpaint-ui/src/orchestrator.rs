//! Deploy workflow
//!
//! One deploy: read the inputs, stop any running animation, ask the planner
//! for a trajectory, draw its obstacles, then animate its path. Inputs that
//! are ignored leave a running animation alone. Status
//! updates flow to the [`StatusMachine`] throughout; animation progress
//! reaches it through an [`AnimationObserver`] bridge.
//!
//! Locks are taken surface first, then status, and never across an await.

use crate::inputs::InputSource;
use crate::status::{StatusMachine, StatusView, UiState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use wallpaint_communication::PlannerService;
use wallpaint_core::{
    thread_safe, AnimationEvent, InputError, Point, ServiceError, SessionId, StatusError,
    ThreadSafe, Trajectory,
};
use wallpaint_settings::MissingInputPolicy;
use wallpaint_visualizer::{AnimationObserver, AnimatorConfig, PathAnimator, RenderSurface};

/// How a deploy or replay ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Nothing happened: inputs were missing under the `Ignore` policy, or
    /// the request was superseded before the planner answered
    Ignored,
    /// The trajectory is being animated by this session
    Painting(SessionId),
    /// The status machine now shows this error
    Failed(String),
}

/// Deploy requests that could not be accepted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeployError {
    /// A planner request is already in flight
    #[error("A trajectory is already being calculated")]
    Busy,

    #[error(transparent)]
    Status(#[from] StatusError),
}

/// Forwards animation progress to the status machine
struct StatusObserver<V: StatusView> {
    status: ThreadSafe<StatusMachine<V>>,
}

impl<V: StatusView + 'static> AnimationObserver for StatusObserver<V> {
    fn on_position(&self, _session: SessionId, point: Point) {
        self.status.lock().report_position(point);
    }

    fn on_complete(&self, session: SessionId, final_point: Option<Point>) {
        if let Err(e) = self.status.lock().complete(final_point) {
            warn!("{} finished but status was not updated: {}", session, e);
        }
    }
}

/// Runs deploys against a planner, a surface, and a status view
///
/// Concurrent calls are safe on any runtime: every request holds a ticket,
/// and a session started for a ticket that has since been superseded is
/// cancelled before `deploy` returns.
pub struct DeployController<S: RenderSurface + 'static, V: StatusView + 'static> {
    planner: Arc<dyn PlannerService>,
    inputs: Arc<dyn InputSource>,
    animator: PathAnimator<S>,
    status: ThreadSafe<StatusMachine<V>>,
    policy: MissingInputPolicy,
    request_seq: AtomicU64,
}

impl<S: RenderSurface + 'static, V: StatusView + 'static> DeployController<S, V> {
    pub fn new(
        planner: Arc<dyn PlannerService>,
        inputs: Arc<dyn InputSource>,
        surface: ThreadSafe<S>,
        view: V,
        config: AnimatorConfig,
    ) -> Self {
        let status = thread_safe(StatusMachine::new(view));
        let observer = Arc::new(StatusObserver {
            status: Arc::clone(&status),
        });
        Self {
            planner,
            inputs,
            animator: PathAnimator::new(surface, config).with_observer(observer),
            status,
            policy: MissingInputPolicy::default(),
            request_seq: AtomicU64::new(0),
        }
    }

    pub fn with_missing_input_policy(mut self, policy: MissingInputPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn missing_input_policy(&self) -> MissingInputPolicy {
        self.policy
    }

    pub fn status(&self) -> &ThreadSafe<StatusMachine<V>> {
        &self.status
    }

    pub fn state(&self) -> UiState {
        self.status.lock().state().clone()
    }

    pub fn animator(&self) -> &PathAnimator<S> {
        &self.animator
    }

    /// Animation events for every session this controller starts
    pub fn subscribe(&self) -> broadcast::Receiver<AnimationEvent> {
        self.animator.subscribe()
    }

    /// Plan a trajectory for the current inputs and animate it.
    pub async fn deploy(&self) -> Result<DeployOutcome, DeployError> {
        let inputs = match self.inputs.read() {
            Ok(inputs) => inputs,
            Err(e) => return self.reject_inputs(e),
        };

        if let Some(session) = self.animator.cancel() {
            debug!("Deploy stopped {}", session);
        }

        let ticket = self.begin_request()?;
        let result = self.planner.plan(&inputs.request, inputs.tool_width).await;
        self.finish_request(ticket, result, inputs.tool_width)
    }

    /// Fetch a stored trajectory by id and animate it.
    pub async fn replay(&self, id: i64, tool_width: f64) -> Result<DeployOutcome, DeployError> {
        if let Some(session) = self.animator.cancel() {
            debug!("Replay stopped {}", session);
        }

        let ticket = self.begin_request()?;
        let result = self.planner.fetch_trajectory(id).await;
        self.finish_request(ticket, result, tool_width)
    }

    /// Stop any animation, drop any pending planner response, and go Idle.
    pub fn reset(&self) {
        self.animator.cancel();
        let mut status = self.status.lock();
        self.request_seq.fetch_add(1, Ordering::AcqRel);
        status.reset();
    }

    fn reject_inputs(&self, error: InputError) -> Result<DeployOutcome, DeployError> {
        match self.policy {
            MissingInputPolicy::Ignore => {
                debug!("Deploy ignored: {}", error);
                Ok(DeployOutcome::Ignored)
            }
            MissingInputPolicy::Report => {
                let message = error.to_string();
                warn!("Deploy rejected: {}", message);
                if let Some(session) = self.animator.cancel() {
                    debug!("Rejected deploy stopped {}", session);
                }
                let mut status = self.status.lock();
                status.begin_calculating().map_err(|_| DeployError::Busy)?;
                self.request_seq.fetch_add(1, Ordering::AcqRel);
                status.fail(message.clone())?;
                Ok(DeployOutcome::Failed(message))
            }
        }
    }

    fn begin_request(&self) -> Result<u64, DeployError> {
        let mut status = self.status.lock();
        // Calculating is the only state that refuses a new request.
        status.begin_calculating().map_err(|_| DeployError::Busy)?;
        Ok(self.request_seq.fetch_add(1, Ordering::AcqRel) + 1)
    }

    fn finish_request(
        &self,
        ticket: u64,
        result: Result<Trajectory, ServiceError>,
        tool_width: f64,
    ) -> Result<DeployOutcome, DeployError> {
        let trajectory = {
            let mut status = self.status.lock();
            if self.request_seq.load(Ordering::Acquire) != ticket {
                info!("Discarding planner response for a superseded request");
                return Ok(DeployOutcome::Ignored);
            }
            match result {
                Ok(trajectory) => {
                    status.begin_painting()?;
                    trajectory
                }
                Err(e) => {
                    let message = e.to_string();
                    error!("Planner request failed: {}", message);
                    status.fail(message.clone())?;
                    return Ok(DeployOutcome::Failed(message));
                }
            }
        };

        self.animator.render_obstacles(&trajectory);
        let started = self.animator.start(&trajectory, tool_width);
        // Another request may have begun while the status lock was free.
        if self.request_seq.load(Ordering::Acquire) != ticket {
            if let Ok(session) = started {
                if self.animator.cancel_session(session) {
                    info!("{} superseded before it could paint", session);
                }
            }
            return Ok(DeployOutcome::Ignored);
        }
        match started {
            Ok(session) => Ok(DeployOutcome::Painting(session)),
            Err(e) => {
                let message = e.to_string();
                error!("Cannot animate trajectory: {}", message);
                self.status.lock().fail(message.clone())?;
                Ok(DeployOutcome::Failed(message))
            }
        }
    }
}
