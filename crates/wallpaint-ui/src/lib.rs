//! # Wallpaint UI
//!
//! The user-facing side of a deploy: the status state machine that drives the
//! status line and control enablement, form input parsing, and the
//! [`DeployController`] that runs the request → render → animate workflow.

pub mod inputs;
pub mod orchestrator;
pub mod status;

pub use inputs::{DeployInputs, FormInputs, InputSource};
pub use orchestrator::{DeployController, DeployError, DeployOutcome};
pub use status::{
    RecordingStatusView, StatusMachine, StatusTone, StatusView, TracingStatusView, UiState,
};
