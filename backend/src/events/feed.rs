//! Event feed
//!
//! Holds the forced dispatch events of a run, sorted once at construction,
//! and hands them out tick by tick. A cursor marks how far the run has
//! consumed; the sorted list itself is never reordered afterwards.

use crate::events::types::ForcedDispatch;
use tracing::warn;

/// Chronological source of forced dispatch events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFeed {
    events: Vec<ForcedDispatch>,
    cursor: usize,
}

impl EventFeed {
    /// Create a feed, sorting events by `(tick, pid)`
    ///
    /// # Example
    /// ```
    /// use scheduler_simulator_core_rs::events::{EventFeed, ForcedDispatch};
    ///
    /// let mut feed = EventFeed::new(vec![
    ///     ForcedDispatch::new(2, 5),
    ///     ForcedDispatch::new(1, 5),
    ///     ForcedDispatch::new(3, 0),
    /// ]);
    /// assert_eq!(feed.last_event_tick(), Some(5));
    /// assert_eq!(feed.take_due(0), vec![ForcedDispatch::new(3, 0)]);
    /// assert!(feed.take_due(4).is_empty());
    /// assert_eq!(feed.take_due(5).len(), 2);
    /// ```
    pub fn new(mut events: Vec<ForcedDispatch>) -> Self {
        events.sort();
        Self { events, cursor: 0 }
    }

    /// Restore a feed with `cursor` events already consumed
    pub fn with_cursor(events: Vec<ForcedDispatch>, cursor: usize) -> Self {
        let mut feed = Self::new(events);
        feed.cursor = cursor.min(feed.events.len());
        feed
    }

    /// Consume every event scheduled for tick `now`, in order
    ///
    /// Events left behind from earlier ticks cannot be applied any more; they
    /// are skipped with a warning.
    pub fn take_due(&mut self, now: usize) -> Vec<ForcedDispatch> {
        while let Some(stale) = self.events.get(self.cursor).filter(|e| e.tick < now) {
            warn!(pid = stale.pid, tick = stale.tick, now, "Skipping stale forced dispatch");
            self.cursor += 1;
        }

        let start = self.cursor;
        while self
            .events
            .get(self.cursor)
            .is_some_and(|e| e.tick == now)
        {
            self.cursor += 1;
        }
        self.events[start..self.cursor].to_vec()
    }

    /// Tick of the last scheduled event, if any
    pub fn last_event_tick(&self) -> Option<usize> {
        self.events.last().map(|e| e.tick)
    }

    /// Number of events consumed so far
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Events not yet consumed
    pub fn remaining(&self) -> &[ForcedDispatch] {
        &self.events[self.cursor..]
    }

    /// All events in application order
    pub fn events(&self) -> &[ForcedDispatch] {
        &self.events
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_feed() {
        let mut feed = EventFeed::new(Vec::new());
        assert_eq!(feed.last_event_tick(), None);
        assert!(feed.take_due(0).is_empty());
        assert!(feed.is_exhausted());
    }

    #[test]
    fn test_stale_events_are_skipped() {
        let mut feed = EventFeed::new(vec![ForcedDispatch::new(1, 2), ForcedDispatch::new(2, 6)]);
        assert!(feed.take_due(4).is_empty());
        assert_eq!(feed.cursor(), 1);
        assert_eq!(feed.remaining(), &[ForcedDispatch::new(2, 6)]);
    }

    #[test]
    fn test_with_cursor_resumes() {
        let events = vec![ForcedDispatch::new(1, 0), ForcedDispatch::new(2, 3)];
        let mut feed = EventFeed::with_cursor(events, 1);
        assert_eq!(feed.take_due(3), vec![ForcedDispatch::new(2, 3)]);
        assert!(feed.is_exhausted());
    }
}
