//! Ordered card queue terminated by the end-of-data sentinel.
//!
//! The queue is the only writer of the card list. It hands out
//! [`EnrichmentTicket`]s for candidates that pass the caps and dedup checks,
//! and turns completed enrichments into cards appended before the sentinel.

use std::collections::{
    HashMap,
    HashSet,
};

use tracing::{
    debug,
    warn,
};

use crate::core::models::{
    Candidate,
    Card,
    Enrichment,
    SENTINEL_ID,
};

/// Permission to issue one enrichment request for `candidate`.
/// The card built from it will carry `issued_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentTicket {
    pub issued_id: u32,
    pub candidate: Candidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentCaps {
    /// Requests issued per directory response.
    pub render_cap: usize,
    /// Requests issued over the whole session.
    pub session_cap: usize,
}

impl Default for EnrichmentCaps {
    fn default() -> Self {
        Self { render_cap: 1, session_cap: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueChange {
    Appended { id: u32 },
    Evicted { through: u32, removed: usize },
}

type Listener = Box<dyn FnMut(&QueueChange)>;

pub struct CardQueue {
    cards: Vec<Card>,
    sentinel: Card,
    next_id: u32,
    caps: EnrichmentCaps,
    in_flight: HashMap<u32, Candidate>,
    seen_candidates: HashSet<String>,
    seen_external: HashSet<String>,
    listeners: Vec<Listener>,
}

impl CardQueue {
    pub fn new(caps: EnrichmentCaps, sentinel_image: Option<String>) -> Self {
        Self {
            cards: Vec::new(),
            sentinel: Card::sentinel(sentinel_image),
            next_id: 1,
            caps,
            in_flight: HashMap::new(),
            seen_candidates: HashSet::new(),
            seen_external: HashSet::new(),
            listeners: Vec::new(),
        }
    }

    /// Registers a callback fired after every mutation of the card list.
    pub fn subscribe(&mut self, listener: impl FnMut(&QueueChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn issued_count(&self) -> usize {
        (self.next_id - 1) as usize
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn session_cap_reached(&self) -> bool {
        self.issued_count() >= self.caps.session_cap
    }

    /// Cards in display order, sentinel last.
    pub fn snapshot(&self) -> Vec<Card> {
        self.cards.iter().chain(std::iter::once(&self.sentinel))
            .cloned()
            .collect()
    }

    /// The card currently on top of the stack; the sentinel once everything is swiped.
    pub fn foremost(&self) -> &Card {
        self.cards.first().unwrap_or(&self.sentinel)
    }

    pub fn get(&self, id: u32) -> Option<&Card> {
        if id == SENTINEL_ID {
            return Some(&self.sentinel);
        }
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cards.is_empty()
    }

    fn is_known_candidate(&self, key: &str) -> bool {
        self.seen_candidates.contains(key)
            || self.in_flight.values().any(|pending| pending.dedup_key() == Some(key))
    }

    /// Admits `candidate` for enrichment unless the session cap is spent or the
    /// same place is already queued or in flight. The card list is untouched
    /// until [`CardQueue::on_enrichment_result`] arrives.
    pub fn enqueue_candidate(&mut self, candidate: Candidate) -> Option<EnrichmentTicket> {
        if self.session_cap_reached() {
            debug!(
                name = candidate.display_name(),
                cap = self.caps.session_cap,
                "Session enrichment cap reached; skipping candidate"
            );
            return None;
        }

        if let Some(key) = candidate.dedup_key() {
            if self.is_known_candidate(key) {
                debug!(key, "Candidate already queued or in flight; skipping");
                return None;
            }
        }

        let issued_id = self.next_id;
        self.next_id += 1;
        self.in_flight.insert(issued_id, candidate.clone());

        Some(EnrichmentTicket { issued_id, candidate })
    }

    /// Admits the candidates of one directory response, at most `render_cap` of them.
    pub fn enqueue_batch(
        &mut self,
        candidates: impl IntoIterator<Item = Candidate>,
    ) -> Vec<EnrichmentTicket> {
        let mut tickets = Vec::new();
        for candidate in candidates {
            if tickets.len() >= self.caps.render_cap || self.session_cap_reached() {
                break;
            }
            if let Some(ticket) = self.enqueue_candidate(candidate) {
                tickets.push(ticket);
            }
        }
        tickets
    }

    /// Applies a completed enrichment. Results may arrive in any order relative
    /// to issue order. Returns `true` if a card was appended.
    pub fn on_enrichment_result(&mut self, issued_id: u32, enrichment: Enrichment) -> bool {
        let Some(candidate) = self.in_flight.remove(&issued_id) else {
            warn!(issued_id, "Enrichment result for unknown request ignored");
            return false;
        };

        if self.seen_external.contains(&enrichment.external_id)
            || self
                .cards
                .iter()
                .any(|card| card.external_id.as_deref() == Some(enrichment.external_id.as_str()))
        {
            debug!(
                issued_id,
                external_id = %enrichment.external_id,
                "Duplicate place resolved; dropping card"
            );
            self.remember(&candidate);
            return false;
        }

        self.remember(&candidate);
        self.seen_external.insert(enrichment.external_id.clone());
        self.cards.push(Card::from_enrichment(issued_id, candidate, enrichment));
        self.notify(QueueChange::Appended { id: issued_id });
        true
    }

    /// Drops the in-flight request; its id is never filled. The candidate is
    /// not admitted again this session.
    pub fn on_enrichment_failed(&mut self, issued_id: u32) {
        match self.in_flight.remove(&issued_id) {
            Some(candidate) => self.remember(&candidate),
            None => warn!(issued_id, "Failure reported for unknown request ignored"),
        }
    }

    fn remember(&mut self, candidate: &Candidate) {
        if let Some(key) = candidate.dedup_key() {
            self.seen_candidates.insert(key.to_string());
        }
    }

    /// Removes every card with an id up to and including `id`, keeping the
    /// order of the rest. The sentinel id is a no-op. Removed cards are
    /// returned marked non-renderable.
    pub fn evict(&mut self, id: u32) -> Vec<Card> {
        if id == SENTINEL_ID {
            return Vec::new();
        }

        let (mut removed, kept): (Vec<Card>, Vec<Card>) =
            self.cards.drain(..).partition(|card| card.id <= id);
        self.cards = kept;

        for card in &mut removed {
            card.renderable = false;
        }

        if !removed.is_empty() {
            self.notify(QueueChange::Evicted { through: id, removed: removed.len() });
        }
        removed
    }

    fn notify(&mut self, change: QueueChange) {
        for listener in &mut self.listeners {
            listener(&change);
        }
    }
}

impl std::fmt::Debug for CardQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardQueue")
            .field("cards", &self.cards)
            .field("next_id", &self.next_id)
            .field("caps", &self.caps)
            .field("in_flight", &self.in_flight.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
