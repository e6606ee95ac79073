mod load;

pub use load::{LoadError, load_events};

use serde::{Deserialize, Serialize};

/// Anything with a position on the tick timeline.
pub trait Timed {
    fn time(&self) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    ProgramChange { program: u8 },
    ControlChange { controller: u8, value: u8 },
}

/// A channel-scoped MIDI event, already merged across source tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEvent {
    pub time: u64,
    pub channel: u8,
    pub kind: EventKind,
}

impl Timed for ChannelEvent {
    fn time(&self) -> u64 {
        self.time
    }
}

impl ChannelEvent {
    pub fn is_note_on(&self) -> bool {
        matches!(self.kind, EventKind::NoteOn { .. })
    }

    pub fn is_note_off(&self) -> bool {
        matches!(self.kind, EventKind::NoteOff { .. })
    }

    pub fn is_note(&self) -> bool {
        self.is_note_on() || self.is_note_off()
    }

    pub fn is_control_change(&self) -> bool {
        matches!(self.kind, EventKind::ControlChange { .. })
    }

    /// The note number, for note on/off events.
    pub fn note(&self) -> Option<u8> {
        match self.kind {
            EventKind::NoteOn { note, .. } | EventKind::NoteOff { note } => Some(note),
            _ => None,
        }
    }

    pub fn program(&self) -> Option<u8> {
        match self.kind {
            EventKind::ProgramChange { program } => Some(program),
            _ => None,
        }
    }

    /// The same event with its note number replaced. Non-note events are
    /// returned unchanged.
    pub fn with_note(self, note: u8) -> Self {
        let kind = match self.kind {
            EventKind::NoteOn { velocity, .. } => EventKind::NoteOn { note, velocity },
            EventKind::NoteOff { .. } => EventKind::NoteOff { note },
            other => other,
        };
        Self { kind, ..self }
    }
}

/// The largest number of notes held at once over a time-sorted event list.
pub fn maximum_polyphony(events: &[ChannelEvent]) -> usize {
    let mut held = 0usize;
    let mut max = 0usize;
    for event in events {
        match event.kind {
            EventKind::NoteOn { .. } => {
                held += 1;
                max = max.max(held);
            }
            EventKind::NoteOff { .. } => held = held.saturating_sub(1),
            _ => {}
        }
    }
    max
}
