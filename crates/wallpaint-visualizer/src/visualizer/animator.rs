//! Path animator
//!
//! Draws a trajectory's path one segment at a time as a growing paint stroke.
//!
//! Each run is an [`AnimationSession`] with its own [`SessionId`]. The animator
//! keeps the id of the one current session; every step compares its session's
//! id against it while holding the surface lock, so once a session is
//! superseded or cancelled none of its pending steps can draw or report
//! progress, however many of them were already scheduled.
//!
//! A spawned session runs as a single tokio task: draw one segment, sleep for
//! the step delay, yield for the next frame, repeat.

use super::surface::{Color, RenderSurface, StrokeStyle, PAINT_STROKE_COLOR};
use super::viewport::SurfaceTransform;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use wallpaint_core::constants::{DEFAULT_STEP_DELAY_MS, DISTORTION_WARN_RATIO, MIN_STROKE_PX};
use wallpaint_core::{
    AnimationError, AnimationEvent, EventDispatcher, Point, SessionId, ThreadSafe, Trajectory,
};

/// Receives progress from the current session.
///
/// Callbacks run while the animator holds the surface lock; implementations
/// must not lock the surface themselves.
pub trait AnimationObserver: Send + Sync {
    /// A segment ending at `point` was drawn
    fn on_position(&self, _session: SessionId, _point: Point) {}

    /// The session reached the end of its path
    fn on_complete(&self, _session: SessionId, _final_point: Option<Point>) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AnimationObserver for NoopObserver {}

/// Animation tuning
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatorConfig {
    /// Pause after each drawn segment (smaller is faster)
    pub step_delay: Duration,
    /// Stroke width floor in pixels
    pub min_stroke_px: f64,
    pub stroke_color: Color,
}

impl AnimatorConfig {
    pub fn with_step_delay_ms(step_delay_ms: f64) -> Self {
        Self {
            step_delay: Duration::from_secs_f64(step_delay_ms.max(0.0) / 1000.0),
            ..Self::default()
        }
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_secs_f64(DEFAULT_STEP_DELAY_MS / 1000.0),
            min_stroke_px: MIN_STROKE_PX,
            stroke_color: PAINT_STROKE_COLOR,
        }
    }
}

/// Result of one animation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Segment `index` (ending at `path[index]`) was drawn
    Drew { index: usize, position: Point },
    /// The path is exhausted; `final_point` is `None` for an empty path
    Completed { final_point: Option<Point> },
    /// The session is no longer current; nothing was drawn
    Stale,
}

impl StepOutcome {
    /// True when no further steps should be scheduled
    pub fn is_done(&self) -> bool {
        !matches!(self, StepOutcome::Drew { .. })
    }
}

/// One run of the animation over a single path
#[derive(Debug, Clone)]
pub struct AnimationSession {
    id: SessionId,
    path: Vec<Point>,
    transform: SurfaceTransform,
    stroke: StrokeStyle,
    cursor: usize,
    finished: bool,
}

impl AnimationSession {
    fn new(
        id: SessionId,
        trajectory: &Trajectory,
        tool_width: f64,
        surface_size: (u32, u32),
        config: &AnimatorConfig,
    ) -> Result<Self, AnimationError> {
        let (surface_width, surface_height) = surface_size;
        if surface_width == 0 || surface_height == 0 {
            return Err(AnimationError::EmptySurface {
                width: surface_width,
                height: surface_height,
            });
        }

        let wall = trajectory.wall_dimensions;
        if !(wall.width.is_finite() && wall.width > 0.0) {
            return Err(AnimationError::InvalidWallWidth { width: wall.width });
        }
        if !(tool_width.is_finite() && tool_width >= 0.0) {
            return Err(AnimationError::InvalidToolWidth { width: tool_width });
        }
        if let Some(index) = trajectory.path.iter().position(|p| !p.is_finite()) {
            return Err(AnimationError::NonFiniteWaypoint { index });
        }

        let transform = SurfaceTransform::new(wall.width, surface_width, surface_height);
        let distortion = transform.vertical_distortion(wall.height);
        if distortion > DISTORTION_WARN_RATIO {
            warn!(
                "Wall aspect {}x{} does not match surface {}x{}; vertical extent off by {:.1}%",
                wall.width,
                wall.height,
                surface_width,
                surface_height,
                distortion * 100.0
            );
        }

        let stroke_width = config
            .min_stroke_px
            .max(transform.scale_length(tool_width));

        Ok(Self {
            id,
            path: trajectory.path.clone(),
            transform,
            stroke: StrokeStyle::paint(config.stroke_color, stroke_width),
            cursor: 1,
            finished: false,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Pixels per meter
    pub fn scale(&self) -> f64 {
        self.transform.scale()
    }

    pub fn stroke_width_px(&self) -> f64 {
        self.stroke.width
    }

    /// Index of the waypoint the next segment ends at
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn segment_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Draw the next segment, or finish when the path is exhausted.
    fn advance<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> StepOutcome {
        if self.finished || self.cursor >= self.path.len() {
            self.finished = true;
            return StepOutcome::Completed {
                final_point: self.path.last().copied(),
            };
        }

        let from = self.path[self.cursor - 1];
        let to = self.path[self.cursor];
        surface.stroke_line(
            self.transform.to_surface(from),
            self.transform.to_surface(to),
            &self.stroke,
        );

        let index = self.cursor;
        self.cursor += 1;
        StepOutcome::Drew {
            index,
            position: to,
        }
    }
}

/// State shared between the animator and its session task
struct SessionContext<S> {
    surface: ThreadSafe<S>,
    current: Arc<AtomicU64>,
    observer: Arc<dyn AnimationObserver>,
    events: EventDispatcher,
}

impl<S> Clone for SessionContext<S> {
    fn clone(&self) -> Self {
        Self {
            surface: Arc::clone(&self.surface),
            current: Arc::clone(&self.current),
            observer: Arc::clone(&self.observer),
            events: self.events.clone(),
        }
    }
}

impl<S: RenderSurface> SessionContext<S> {
    fn is_current(&self, id: SessionId) -> bool {
        self.current.load(Ordering::Acquire) == id.0
    }

    /// Swap the current session id under the surface lock; returns the previous one.
    fn replace_current(&self, id: SessionId) -> Option<SessionId> {
        let _surface = self.surface.lock();
        let previous = SessionId(self.current.swap(id.0, Ordering::AcqRel));
        (!previous.is_none()).then_some(previous)
    }

    fn clear_if_current(&self, id: SessionId) -> bool {
        let _surface = self.surface.lock();
        self.current
            .compare_exchange(id.0, SessionId::NONE.0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn step(&self, session: &mut AnimationSession) -> StepOutcome {
        let mut surface = self.surface.lock();
        if !self.is_current(session.id) {
            return StepOutcome::Stale;
        }

        let outcome = session.advance(&mut *surface);
        match outcome {
            StepOutcome::Drew { index, position } => {
                debug!("{} drew segment {} -> {}", session.id, index, position);
                self.observer.on_position(session.id, position);
                self.events.publish(AnimationEvent::SegmentDrawn {
                    session: session.id,
                    index,
                    from: session.path[index - 1],
                    to: position,
                });
            }
            StepOutcome::Completed { final_point } => {
                // Only clear the slot if nobody replaced us in the meantime.
                let _ = self.current.compare_exchange(
                    session.id.0,
                    SessionId::NONE.0,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
                match final_point {
                    Some(point) => info!("{} complete at {}", session.id, point),
                    None => warn!("{} complete with an empty path", session.id),
                }
                self.observer.on_complete(session.id, final_point);
                self.events.publish(AnimationEvent::Completed {
                    session: session.id,
                    final_point,
                });
            }
            StepOutcome::Stale => {}
        }
        outcome
    }
}

async fn run_session<S: RenderSurface + 'static>(
    ctx: SessionContext<S>,
    mut session: AnimationSession,
    step_delay: Duration,
) {
    loop {
        if ctx.step(&mut session).is_done() {
            break;
        }
        if !step_delay.is_zero() {
            tokio::time::sleep(step_delay).await;
        }
        if !ctx.is_current(session.id) {
            debug!("{} superseded while waiting", session.id);
            break;
        }
        tokio::task::yield_now().await;
    }
}

/// Owns the animation of paint strokes onto one surface
pub struct PathAnimator<S: RenderSurface + 'static> {
    ctx: SessionContext<S>,
    config: AnimatorConfig,
    surface_size: (u32, u32),
    next_id: AtomicU64,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<S: RenderSurface + 'static> PathAnimator<S> {
    /// Create an animator drawing onto `surface`. The surface size is read once.
    pub fn new(surface: ThreadSafe<S>, config: AnimatorConfig) -> Self {
        let surface_size = surface.lock().size();
        Self {
            ctx: SessionContext {
                surface,
                current: Arc::new(AtomicU64::new(SessionId::NONE.0)),
                observer: Arc::new(NoopObserver),
                events: EventDispatcher::default(),
            },
            config,
            surface_size,
            next_id: AtomicU64::new(1),
            task: Mutex::new(None),
        }
    }

    /// Report progress to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn AnimationObserver>) -> Self {
        self.ctx.observer = observer;
        self
    }

    /// Publish events on an existing dispatcher
    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.ctx.events = events;
        self
    }

    pub fn surface(&self) -> &ThreadSafe<S> {
        &self.ctx.surface
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.ctx.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AnimationEvent> {
        self.ctx.events.subscribe()
    }

    /// Id of the session allowed to draw, if any
    pub fn current_session(&self) -> Option<SessionId> {
        let id = SessionId(self.ctx.current.load(Ordering::Acquire));
        (!id.is_none()).then_some(id)
    }

    pub fn is_animating(&self) -> bool {
        self.current_session().is_some()
    }

    /// Draw the static obstacle layer (clears the surface first).
    pub fn render_obstacles(&self, trajectory: &Trajectory) -> usize {
        let mut surface = self.ctx.surface.lock();
        super::obstacle_renderer::render_obstacles(&mut *surface, trajectory)
    }

    /// Create a session for `trajectory` and make it the current one without
    /// scheduling any steps. Any previous session is invalidated.
    ///
    /// Nothing changes if the trajectory is rejected.
    pub fn activate(
        &self,
        trajectory: &Trajectory,
        tool_width: f64,
    ) -> Result<AnimationSession, AnimationError> {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let session =
            AnimationSession::new(id, trajectory, tool_width, self.surface_size, &self.config)?;

        let previous = self.ctx.replace_current(id);
        self.abort_task();
        if let Some(previous) = previous {
            info!("{} superseded by {}", previous, id);
            self.ctx
                .events
                .publish(AnimationEvent::Cancelled { session: previous });
        }

        info!(
            "{} started: {} segments, {:.2} px/m, stroke {:.2} px",
            id,
            session.segment_count(),
            session.scale(),
            session.stroke_width_px()
        );
        self.ctx.events.publish(AnimationEvent::Started {
            session: id,
            segments: session.segment_count(),
        });
        Ok(session)
    }

    /// Run one step of `session`. Stale sessions draw nothing.
    pub fn step(&self, session: &mut AnimationSession) -> StepOutcome {
        self.ctx.step(session)
    }

    /// Start animating `trajectory` on a new task, superseding any running session.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        &self,
        trajectory: &Trajectory,
        tool_width: f64,
    ) -> Result<SessionId, AnimationError> {
        let session = self.activate(trajectory, tool_width)?;
        let id = session.id();
        let handle = tokio::spawn(run_session(
            self.ctx.clone(),
            session,
            self.config.step_delay,
        ));
        *self.task.lock() = Some(handle);
        Ok(id)
    }

    /// Invalidate the current session, if any, and return its id.
    pub fn cancel(&self) -> Option<SessionId> {
        let previous = self.ctx.replace_current(SessionId::NONE);
        self.abort_task();
        if let Some(previous) = previous {
            info!("{} cancelled", previous);
            self.ctx
                .events
                .publish(AnimationEvent::Cancelled { session: previous });
        }
        previous
    }

    /// Invalidate `session` only if it is still the current one.
    pub fn cancel_session(&self, session: SessionId) -> bool {
        if !self.ctx.clear_if_current(session) {
            return false;
        }
        self.abort_task();
        info!("{} cancelled", session);
        self.ctx
            .events
            .publish(AnimationEvent::Cancelled { session });
        true
    }

    fn abort_task(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}

impl<S: RenderSurface + 'static> Drop for PathAnimator<S> {
    fn drop(&mut self) {
        self.abort_task();
    }
}
