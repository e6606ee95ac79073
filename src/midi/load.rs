use std::fs;
use std::path::{Path, PathBuf};

use midly::{MidiMessage, Smf, TrackEventKind};
use thiserror::Error;

use super::{ChannelEvent, EventKind};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse MIDI data: {0}")]
    Parse(#[from] midly::Error),
}

/// Reads a Standard MIDI File and flattens its tracks into one time-sorted
/// list of channel events. Meta and system events are skipped; a note-on
/// with velocity zero is a note-off in disguise.
pub fn load_events(path: &Path) -> Result<Vec<ChannelEvent>, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let smf = Smf::parse(&bytes)?;

    let mut events = Vec::new();
    for track in &smf.tracks {
        let mut tick = 0u64;
        for track_event in track {
            tick += u64::from(track_event.delta.as_int());
            let TrackEventKind::Midi { channel, message } = track_event.kind else {
                continue;
            };
            let kind = match message {
                MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => EventKind::NoteOn {
                    note: key.as_int(),
                    velocity: vel.as_int(),
                },
                MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                    EventKind::NoteOff { note: key.as_int() }
                }
                MidiMessage::ProgramChange { program } => EventKind::ProgramChange {
                    program: program.as_int(),
                },
                MidiMessage::Controller { controller, value } => EventKind::ControlChange {
                    controller: controller.as_int(),
                    value: value.as_int(),
                },
                _ => continue,
            };
            events.push(ChannelEvent {
                time: tick,
                channel: channel.as_int(),
                kind,
            });
        }
    }

    events.sort_by_key(|e| e.time);
    Ok(events)
}
