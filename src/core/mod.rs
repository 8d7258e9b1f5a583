pub mod errors;
pub mod http;
pub mod models;
pub mod queue;
pub mod suggestions;
pub mod swipe;
pub mod tasks;

pub use errors::TaberuError;
pub use models::{
    Candidate,
    Card,
    Coordinate,
    Enrichment,
    ReviewPair,
    Suggestion,
};
pub use queue::{
    CardQueue,
    EnrichmentCaps,
    EnrichmentTicket,
    QueueChange,
};
pub use suggestions::SuggestionStore;
pub use swipe::{
    SwipeDecision,
    SwipeEngine,
    SwipeOutcome,
};
