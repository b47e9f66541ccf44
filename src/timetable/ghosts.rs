use crate::domain::GhostSuggestion;
use chrono::NaiveDate;
use tracing::debug;

/// Identifies one ghost fetch; only the most recently issued ticket may land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostTicket {
    pub seq: u64,
    pub date: NaiveDate,
}

/// Client-side holder for the latest ghost suggestions.
///
/// Each fetch replaces the set wholesale. Responses are matched against the
/// newest ticket, so a slow reply to an older request (other date, older task
/// snapshot) is discarded instead of overwriting fresher data.
#[derive(Debug, Default)]
pub struct GhostFeed {
    suggestions: Vec<GhostSuggestion>,
    date: Option<NaiveDate>,
    issued: u64,
    pending: bool,
}

impl GhostFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a fetch of `date`
    pub fn begin_fetch(&mut self, date: NaiveDate) -> GhostTicket {
        self.issued += 1;
        self.pending = true;
        GhostTicket {
            seq: self.issued,
            date,
        }
    }

    /// Whether a fetch is outstanding
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    fn is_current(&self, ticket: GhostTicket) -> bool {
        if ticket.seq != self.issued {
            debug!(
                seq = ticket.seq,
                latest = self.issued,
                date = %ticket.date,
                "discarding superseded ghost response"
            );
            return false;
        }
        true
    }

    /// Store the result of a fetch. Returns false when the ticket is stale.
    pub fn complete(&mut self, ticket: GhostTicket, suggestions: Vec<GhostSuggestion>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.suggestions = suggestions;
        self.date = Some(ticket.date);
        self.pending = false;
        true
    }

    /// A failed fetch leaves no ghosts on screen
    pub fn fail(&mut self, ticket: GhostTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.suggestions.clear();
        self.date = Some(ticket.date);
        self.pending = false;
        true
    }

    /// Suggestions for `date`; empty when the held set belongs to another day
    pub fn suggestions_for(&self, date: NaiveDate) -> &[GhostSuggestion] {
        if self.date == Some(date) {
            &self.suggestions
        } else {
            &[]
        }
    }

    /// Drop held suggestions and invalidate any outstanding fetch
    pub fn clear(&mut self) {
        self.suggestions.clear();
        self.date = None;
        self.issued += 1;
        self.pending = false;
    }
}
