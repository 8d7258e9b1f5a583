//! Turns a horizontal drag on the foremost card into accept, reject or cancel.

use tracing::debug;

use crate::core::{
    models::{
        Card,
        SENTINEL_ID,
    },
    queue::CardQueue,
    suggestions::SuggestionStore,
};

/// How far past the half-viewport mark a drag must travel to commit.
pub const DEFAULT_THRESHOLD: f32 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDecision {
    Accept,
    Reject,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipePhase {
    Idle,
    Dragging { card_id: u32, dx: f32, dy: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwipeOutcome {
    pub card_id: u32,
    pub decision: SwipeDecision,
    pub evicted: Vec<Card>,
    pub recorded: bool,
}

/// `x` beyond `threshold * viewport_width / 2` in either direction commits.
pub fn decide(x: f32, viewport_width: f32, threshold: f32) -> SwipeDecision {
    let cutoff = threshold * (viewport_width / 2.0);
    if x > cutoff {
        SwipeDecision::Accept
    } else if x < -cutoff {
        SwipeDecision::Reject
    } else {
        SwipeDecision::Cancel
    }
}

#[derive(Debug)]
pub struct SwipeEngine {
    threshold: f32,
    phase: SwipePhase,
}

impl Default for SwipeEngine {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl SwipeEngine {
    pub fn new(threshold: f32) -> Self {
        Self { threshold, phase: SwipePhase::Idle }
    }

    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    pub fn offset(&self) -> (f32, f32) {
        match self.phase {
            SwipePhase::Dragging { dx, dy, .. } => (dx, dy),
            SwipePhase::Idle => (0.0, 0.0),
        }
    }

    pub fn begin(&mut self, card_id: u32) {
        self.phase = SwipePhase::Dragging { card_id, dx: 0.0, dy: 0.0 };
    }

    /// Offsets are measured from where the gesture started.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if let SwipePhase::Dragging { card_id, .. } = self.phase {
            self.phase = SwipePhase::Dragging { card_id, dx, dy };
        }
    }

    /// Ends the gesture. Returns `None` when no drag was in progress.
    pub fn release(
        &mut self,
        viewport_width: f32,
        queue: &mut CardQueue,
        suggestions: &mut SuggestionStore,
    ) -> Option<SwipeOutcome> {
        let SwipePhase::Dragging { card_id, dx, .. } = self.phase else {
            return None;
        };
        self.phase = SwipePhase::Idle;

        let decision = decide(dx, viewport_width, self.threshold);
        Some(apply(card_id, decision, queue, suggestions))
    }

    /// Like/dislike button path: commits the foremost card without a drag.
    pub fn commit(
        &mut self,
        decision: SwipeDecision,
        queue: &mut CardQueue,
        suggestions: &mut SuggestionStore,
    ) -> SwipeOutcome {
        self.phase = SwipePhase::Idle;
        let card_id = queue.foremost().id;
        apply(card_id, decision, queue, suggestions)
    }
}

fn apply(
    card_id: u32,
    decision: SwipeDecision,
    queue: &mut CardQueue,
    suggestions: &mut SuggestionStore,
) -> SwipeOutcome {
    // The sentinel can be dragged around but always snaps back.
    if card_id == SENTINEL_ID || decision == SwipeDecision::Cancel {
        return SwipeOutcome {
            card_id,
            decision: SwipeDecision::Cancel,
            evicted: Vec::new(),
            recorded: false,
        };
    }

    let mut recorded = false;
    if decision == SwipeDecision::Accept {
        if let Some(card) = queue.get(card_id) {
            suggestions.record(card);
            recorded = true;
        }
    }

    let evicted = queue.evict(card_id);
    debug!(card_id, ?decision, evicted = evicted.len(), "Swipe committed");

    SwipeOutcome { card_id, decision, evicted, recorded }
}
