use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Collector, EventCollector};
use crate::midi::{ChannelEvent, EventKind, Timed};

/// A closed interval during which one pitch sounds on one instrument.
///
/// Invariant: `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePeriod {
    pub start: u64,
    pub end: u64,
    pub note: u8,
    pub velocity: u8,
}

impl NotePeriod {
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }

    pub fn sounding_at(&self, time: u64) -> bool {
        self.start <= time && time < self.end
    }
}

impl Timed for NotePeriod {
    fn time(&self) -> u64 {
        self.start
    }
}

/// Pairs each note-on with the next note-off of the same pitch.
///
/// Overlapping notes of the same pitch open independent periods; they are
/// never merged. A note still held when the stream ends is closed at the
/// final event's time. Orphan note-offs and zero-length periods are dropped.
///
/// Output is sorted by start time, ties broken by original event order.
pub fn build_note_periods(events: &[ChannelEvent]) -> Vec<NotePeriod> {
    // (note, start, velocity, note-on sequence position), oldest first
    let mut open: Vec<(u8, u64, u8, usize)> = Vec::new();
    let mut periods: Vec<(NotePeriod, usize)> = Vec::new();
    let mut last_time = 0u64;

    for (seq, event) in events.iter().enumerate() {
        last_time = last_time.max(event.time);
        match event.kind {
            EventKind::NoteOn { note, velocity } => {
                open.push((note, event.time, velocity, seq));
            }
            EventKind::NoteOff { note } => {
                match open.iter().position(|&(n, ..)| n == note) {
                    Some(i) => {
                        let (note, start, velocity, seq) = open.remove(i);
                        push_period(&mut periods, start, event.time, note, velocity, seq);
                    }
                    None => {
                        warn!(note, time = event.time, "note off without a matching note on");
                    }
                }
            }
            _ => {}
        }
    }

    for (note, start, velocity, seq) in open {
        push_period(&mut periods, start, last_time, note, velocity, seq);
    }

    periods.sort_by_key(|&(p, seq)| (p.start, seq));
    periods.into_iter().map(|(p, _)| p).collect()
}

fn push_period(
    periods: &mut Vec<(NotePeriod, usize)>,
    start: u64,
    end: u64,
    note: u8,
    velocity: u8,
    seq: usize,
) {
    if end <= start {
        debug!(note, start, end, "dropping zero-length note period");
        return;
    }
    periods.push((
        NotePeriod {
            start,
            end,
            note,
            velocity,
        },
        seq,
    ));
}

/// The periods newly entered and newly left during one advance.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Advance {
    pub started: Vec<NotePeriod>,
    pub ended: Vec<NotePeriod>,
}

/// An [`EventCollector`] specialized for note periods: on top of the cursor
/// it tracks the set of periods sounding at the play head.
pub struct NotePeriodCollector {
    cursor: EventCollector<NotePeriod>,
    sounding: Vec<NotePeriod>,
    last_ended: Option<u64>,
}

impl NotePeriodCollector {
    pub fn new(periods: Arc<[NotePeriod]>) -> Self {
        Self {
            cursor: EventCollector::new(periods),
            sounding: Vec::new(),
            last_ended: None,
        }
    }

    /// Moves the play head forward, admitting periods that have started and
    /// evicting those that have ended.
    pub fn advance(&mut self, time: u64) -> Advance {
        let started: Vec<NotePeriod> = self.cursor.advance_collect_all(time).to_vec();
        self.sounding.extend(started.iter().copied());

        let mut ended = Vec::new();
        let last_ended = &mut self.last_ended;
        self.sounding.retain(|period| {
            if period.end <= time {
                *last_ended = Some(last_ended.map_or(period.end, |t| t.max(period.end)));
                ended.push(*period);
                false
            } else {
                true
            }
        });

        Advance { started, ended }
    }

    /// Periods with `start <= t < end` at the last advanced time.
    pub fn sounding(&self) -> &[NotePeriod] {
        &self.sounding
    }

    pub fn has_sounding(&self) -> bool {
        !self.sounding.is_empty()
    }

    /// The latest end time among periods that have fully elapsed.
    pub fn last_ended_at(&self) -> Option<u64> {
        self.last_ended
    }

    pub fn periods(&self) -> &[NotePeriod] {
        self.cursor.events()
    }

    pub fn index(&self) -> usize {
        self.cursor.index()
    }
}

impl Collector for NotePeriodCollector {
    type Item = NotePeriod;

    /// An arbitrary jump invalidates the incremental sounding set, so it is
    /// rebuilt by scanning everything behind the new cursor.
    fn seek(&mut self, time: u64) {
        self.cursor.seek(time);
        self.sounding.clear();
        self.last_ended = None;
        for period in &self.cursor.events()[..self.cursor.index()] {
            if period.end <= time {
                self.last_ended = Some(self.last_ended.map_or(period.end, |t| t.max(period.end)));
            } else {
                self.sounding.push(*period);
            }
        }
    }

    fn peek(&self) -> Option<&NotePeriod> {
        self.cursor.peek()
    }

    fn prev(&self) -> Option<&NotePeriod> {
        self.cursor.prev()
    }
}
