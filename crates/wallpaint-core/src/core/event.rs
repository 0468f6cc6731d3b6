//! Event system for animation progress
//!
//! Provides:
//! - Event types for session lifecycle and per-segment progress
//! - Event dispatcher for publishing events to subscribers

use crate::data::{Point, SessionId};
use tokio::sync::broadcast;

/// Animation event types
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    /// A new session became the active one
    Started {
        session: SessionId,
        segments: usize,
    },
    /// One segment was stroked onto the surface
    SegmentDrawn {
        session: SessionId,
        index: usize,
        from: Point,
        to: Point,
    },
    /// The session reached the end of its path
    Completed {
        session: SessionId,
        final_point: Option<Point>,
    },
    /// The session was superseded or cancelled before finishing
    Cancelled { session: SessionId },
}

impl AnimationEvent {
    /// Session this event belongs to
    pub fn session(&self) -> SessionId {
        match self {
            AnimationEvent::Started { session, .. }
            | AnimationEvent::SegmentDrawn { session, .. }
            | AnimationEvent::Completed { session, .. }
            | AnimationEvent::Cancelled { session } => *session,
        }
    }

    /// True for events that end a session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnimationEvent::Completed { .. } | AnimationEvent::Cancelled { .. }
        )
    }
}

impl std::fmt::Display for AnimationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnimationEvent::Started { session, segments } => {
                write!(f, "{} started ({} segments)", session, segments)
            }
            AnimationEvent::SegmentDrawn {
                session, index, to, ..
            } => write!(f, "{} segment {} -> {}", session, index, to),
            AnimationEvent::Completed {
                session,
                final_point: Some(point),
            } => write!(f, "{} complete at {}", session, point),
            AnimationEvent::Completed {
                session,
                final_point: None,
            } => write!(f, "{} complete (empty path)", session),
            AnimationEvent::Cancelled { session } => write!(f, "{} cancelled", session),
        }
    }
}

/// Event dispatcher for publishing events to subscribers
#[derive(Clone)]
pub struct EventDispatcher {
    /// Broadcast sender channel for animation events.
    tx: broadcast::Sender<AnimationEvent>,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    ///
    /// # Arguments
    /// * `buffer_size` - Size of the broadcast buffer (default 256)
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size);
        Self { tx }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<AnimationEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers
    ///
    /// Having no subscribers is not an error; the event is dropped.
    pub fn publish(&self, event: AnimationEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(256)
    }
}
