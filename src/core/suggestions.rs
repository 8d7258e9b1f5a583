use tracing::info;

use crate::core::models::{
    Card,
    Suggestion,
};

/// Accepted places for the session, in acceptance order. Unbounded.
#[derive(Debug, Default)]
pub struct SuggestionStore {
    entries: Vec<Suggestion>,
}

impl SuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes an owned copy of the card's display payload.
    pub fn record(&mut self, card: &Card) {
        info!(name = card.display_name(), "Added to suggestions");
        self.entries.push(Suggestion::from_card(card));
    }

    pub fn list(&self) -> &[Suggestion] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_copies_payload() {
        let mut card = Card::sentinel(None);
        card.id = 4;
        card.name = Some("Lazo Empanadas".to_string());
        card.website = Some("https://www.lazoempanadas.com/".to_string());
        card.hours_display = Some("10:00am - 8:00pm".to_string());

        let mut store = SuggestionStore::new();
        store.record(&card);
        card.name = Some("Renamed".to_string());

        assert_eq!(store.len(), 1);
        let entry = &store.list()[0];
        assert_eq!(entry.name.as_deref(), Some("Lazo Empanadas"));
        assert_eq!(entry.hours_display.as_deref(), Some("10:00am - 8:00pm"));
        assert_eq!(entry.website.as_deref(), Some("https://www.lazoempanadas.com/"));
    }
}
