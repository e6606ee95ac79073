//! Incremental cursors over time-sorted event lists.
//!
//! The assignment pipeline runs once at load time; these collectors are what
//! playback touches every frame. The forward path is amortized O(1); `seek`
//! is the expensive repositioning path reserved for timeline jumps.

mod event;
mod note_period;
mod visibility;

pub use event::EventCollector;
pub use note_period::{Advance, NotePeriod, NotePeriodCollector, build_note_periods};
pub use visibility::{VisibilityWindows, decayed_rules, standard_rules};

/// The repositioning surface shared by every collector.
pub trait Collector {
    type Item;

    /// Moves the play head to an arbitrary time. Not a per-frame operation.
    fn seek(&mut self, time: u64);

    /// The immediate next item in the future, if any.
    fn peek(&self) -> Option<&Self::Item>;

    /// The last elapsed item, if any.
    fn prev(&self) -> Option<&Self::Item>;
}
