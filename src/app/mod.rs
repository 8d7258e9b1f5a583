use std::time::Duration;

use tracing::{
    debug,
    error,
    info,
    info_span,
    warn,
    Span,
};
use uuid::Uuid;

use crate::{
    core::{
        tasks::{
            TaskManager,
            TaskResult,
        },
        CardQueue,
        Coordinate,
        QueueChange,
        SuggestionStore,
        SwipeDecision,
        SwipeEngine,
        SwipeOutcome,
        TaberuError,
    },
    location::LocationProvider,
};

pub mod settings;
pub mod terminal;

pub use settings::Settings;

/// Control-thread state for one run of the app. Every queue, swipe and
/// suggestion mutation happens through here.
pub struct Session {
    settings: Settings,
    location: Coordinate,
    queue: CardQueue,
    suggestions: SuggestionStore,
    swipe: SwipeEngine,
    tasks: TaskManager,
    directory_pending: bool,
    span: Span,
}

impl Session {
    pub fn new(settings: Settings, location: Coordinate, tasks: TaskManager) -> Self {
        let span = info_span!("session", id = %Uuid::new_v4());
        Self {
            queue: CardQueue::new(settings.caps(), settings.sentinel_image.clone()),
            swipe: SwipeEngine::new(settings.swipe_threshold),
            suggestions: SuggestionStore::new(),
            settings,
            location,
            tasks,
            directory_pending: false,
            span,
        }
    }

    /// Resolves the location first; nothing is fetched without one.
    pub fn start(
        settings: Settings,
        locator: &dyn LocationProvider,
        tasks: TaskManager,
    ) -> Result<Self, TaberuError> {
        let location = locator.current_location()?;
        let mut session = Self::new(settings, location, tasks);
        session.refresh();
        Ok(session)
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn queue(&self) -> &CardQueue {
        &self.queue
    }

    pub fn suggestions(&self) -> &SuggestionStore {
        &self.suggestions
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&QueueChange) + 'static) {
        self.queue.subscribe(listener);
    }

    pub fn is_loading(&self) -> bool {
        self.directory_pending || self.queue.in_flight_count() > 0
    }

    /// Asks the directory for places around the session location.
    pub fn refresh(&mut self) {
        let _guard = self.span.enter();
        if self.directory_pending {
            debug!("Directory request already pending");
            return;
        }
        info!(location = %self.location.as_query(), "Fetching nearby places");
        self.directory_pending = true;
        self.tasks.fetch_directory(self.location);
    }

    /// Applies whatever results are ready without blocking.
    pub fn pump(&mut self) -> usize {
        let results = self.tasks.poll_results();
        self.apply_all(results)
    }

    pub fn pump_wait(&mut self, timeout: Duration) -> usize {
        let results = self.tasks.wait_results(timeout);
        self.apply_all(results)
    }

    fn apply_all(&mut self, results: Vec<TaskResult>) -> usize {
        let count = results.len();
        for result in results {
            self.apply(result);
        }
        count
    }

    pub fn apply(&mut self, result: TaskResult) {
        let _guard = self.span.enter();
        match result {
            TaskResult::Directory(Ok(candidates)) => {
                self.directory_pending = false;
                let found = candidates.len();
                let tickets = self.queue.enqueue_batch(candidates);
                info!(found, issued = tickets.len(), "Directory response");
                for ticket in tickets {
                    self.tasks.enrich(ticket, self.location);
                }
            }
            TaskResult::Directory(Err(e)) => {
                self.directory_pending = false;
                error!(error = %e, "Directory fetch failed");
            }
            TaskResult::Enrichment { issued_id, result: Ok(enrichment) } => {
                self.queue.on_enrichment_result(issued_id, enrichment);
            }
            TaskResult::Enrichment { issued_id, result: Err(e) } => {
                if e.is_quiet_drop() {
                    debug!(issued_id, reason = %e, "Candidate dropped");
                } else {
                    warn!(issued_id, error = %e, "Enrichment failed; candidate dropped");
                }
                self.queue.on_enrichment_failed(issued_id);
            }
        }
    }

    /// Drags the foremost card horizontally by `dx` and lets go.
    pub fn drag_foremost(&mut self, dx: f32) -> SwipeOutcome {
        let _guard = self.span.enter();
        let card_id = self.queue.foremost().id;
        self.swipe.begin(card_id);
        self.swipe.drag(dx, 0.0);
        let width = self.settings.viewport_width;
        self.swipe.release(width, &mut self.queue, &mut self.suggestions).unwrap_or(SwipeOutcome {
            card_id,
            decision: SwipeDecision::Cancel,
            evicted: Vec::new(),
            recorded: false,
        })
    }

    pub fn like(&mut self) -> SwipeOutcome {
        let _guard = self.span.enter();
        self.swipe.commit(SwipeDecision::Accept, &mut self.queue, &mut self.suggestions)
    }

    pub fn dislike(&mut self) -> SwipeOutcome {
        let _guard = self.span.enter();
        self.swipe.commit(SwipeDecision::Reject, &mut self.queue, &mut self.suggestions)
    }
}
