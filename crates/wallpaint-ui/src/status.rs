//! Deploy status state machine
//!
//! Tracks where a deploy is in its lifecycle and pushes the matching status
//! text, tone, position readout, and control enablement to a [`StatusView`].
//!
//! ```text
//! Idle ──► Calculating ──► Painting ──► Complete
//!              │              │  ▲
//!              ▼              ▼  └── (new deploy) ──► Calculating
//!            Error ◄──────────┘
//! ```

use std::fmt;
use tracing::{debug, error, info, warn};
use wallpaint_core::{format_position, Point, StatusError};

/// Lifecycle state of the deploy workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiState {
    /// Nothing has been requested yet, or the view was reset
    Idle,
    /// Waiting for the planning service
    Calculating,
    /// Animating the returned trajectory
    Painting,
    /// The animation reached the end of the path
    Complete,
    /// The request or the animation failed
    Error(String),
}

impl UiState {
    /// Whether the deploy control accepts input in this state
    pub fn control_enabled(&self) -> bool {
        !matches!(self, UiState::Calculating | UiState::Painting)
    }

    /// Text shown on the status line
    pub fn status_text(&self) -> String {
        match self {
            UiState::Idle => "Idle".to_string(),
            UiState::Calculating => "Calculating Path...".to_string(),
            UiState::Painting => "Painting...".to_string(),
            UiState::Complete => "Complete!".to_string(),
            UiState::Error(message) => format!("Error: {message}"),
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            UiState::Idle => StatusTone::Normal,
            UiState::Calculating => StatusTone::Primary,
            UiState::Painting | UiState::Complete => StatusTone::Success,
            UiState::Error(_) => StatusTone::Error,
        }
    }

    /// Check if a transition from this state to `target` is valid.
    ///
    /// - Any state can reset to Idle
    /// - A deploy starts from Idle, Complete, Error, or Painting (superseding
    ///   the running animation), never while already Calculating
    /// - Calculating goes to Painting or Error
    /// - Painting goes to Complete or Error
    pub fn can_transition_to(&self, target: &UiState) -> bool {
        use UiState::*;
        matches!(
            (self, target),
            (_, Idle)
                | (Idle | Complete | Error(_) | Painting, Calculating)
                | (Calculating, Painting)
                | (Painting, Complete)
                | (Calculating | Painting, Error(_))
        )
    }
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Calculating => write!(f, "Calculating"),
            Self::Painting => write!(f, "Painting"),
            Self::Complete => write!(f, "Complete"),
            Self::Error(_) => write!(f, "Error"),
        }
    }
}

/// Visual emphasis of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTone {
    #[default]
    Normal,
    Primary,
    Success,
    Error,
}

/// Where status output goes
pub trait StatusView: Send {
    fn set_status(&mut self, text: &str, tone: StatusTone);

    /// Robot position readout; empty clears it
    fn set_position(&mut self, text: &str);

    fn set_control_enabled(&mut self, enabled: bool);
}

/// Status view that writes to the log
#[derive(Debug, Default)]
pub struct TracingStatusView;

impl StatusView for TracingStatusView {
    fn set_status(&mut self, text: &str, tone: StatusTone) {
        match tone {
            StatusTone::Error => error!("Status: {}", text),
            _ => info!("Status: {}", text),
        }
    }

    fn set_position(&mut self, text: &str) {
        if !text.is_empty() {
            debug!("Position: {}", text);
        }
    }

    fn set_control_enabled(&mut self, enabled: bool) {
        debug!("Deploy control enabled: {}", enabled);
    }
}

/// Status view that keeps the latest values, plus every status text shown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingStatusView {
    pub status: String,
    pub tone: StatusTone,
    pub position: String,
    pub control_enabled: bool,
    pub history: Vec<String>,
}

impl StatusView for RecordingStatusView {
    fn set_status(&mut self, text: &str, tone: StatusTone) {
        self.status = text.to_string();
        self.tone = tone;
        self.history.push(text.to_string());
    }

    fn set_position(&mut self, text: &str) {
        self.position = text.to_string();
    }

    fn set_control_enabled(&mut self, enabled: bool) {
        self.control_enabled = enabled;
    }
}

/// Deploy lifecycle bound to a view
pub struct StatusMachine<V: StatusView> {
    state: UiState,
    view: V,
}

impl<V: StatusView> StatusMachine<V> {
    /// Create a machine in Idle and render it
    pub fn new(view: V) -> Self {
        let mut machine = Self {
            state: UiState::Idle,
            view,
        };
        machine.render();
        machine
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn is_control_enabled(&self) -> bool {
        self.state.control_enabled()
    }

    /// Move to `target`, rejecting transitions the lifecycle does not allow
    pub fn transition(&mut self, target: UiState) -> Result<(), StatusError> {
        if !self.state.can_transition_to(&target) {
            warn!("Rejected status transition {} -> {}", self.state, target);
            return Err(StatusError::InvalidTransition {
                current: self.state.to_string(),
                requested: target.to_string(),
            });
        }
        debug!("Status {} -> {}", self.state, target);
        self.state = target;
        self.render();
        Ok(())
    }

    pub fn reset(&mut self) {
        // Idle is reachable from every state
        let _ = self.transition(UiState::Idle);
    }

    pub fn begin_calculating(&mut self) -> Result<(), StatusError> {
        self.transition(UiState::Calculating)
    }

    pub fn begin_painting(&mut self) -> Result<(), StatusError> {
        self.transition(UiState::Painting)
    }

    /// Finish painting, showing the final position when the path had one
    pub fn complete(&mut self, final_point: Option<Point>) -> Result<(), StatusError> {
        self.transition(UiState::Complete)?;
        if let Some(point) = final_point {
            self.report_position(point);
        }
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), StatusError> {
        self.transition(UiState::Error(message.into()))
    }

    /// Show the robot position
    pub fn report_position(&mut self, point: Point) {
        self.view.set_position(&format_position(&point));
    }

    fn render(&mut self) {
        let text = self.state.status_text();
        self.view.set_status(&text, self.state.tone());
        self.view.set_control_enabled(self.state.control_enabled());
        if self.state == UiState::Idle {
            self.view.set_position("");
        }
    }
}
