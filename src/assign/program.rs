use std::collections::HashMap;

use tracing::warn;

use crate::midi::{ChannelEvent, EventKind};

/// Re-partitions one channel's time-sorted events into bins keyed by the
/// program active when each event occurred.
///
/// A program change can land between a note's on and off, so the program
/// active at each note-on is remembered and the matching note-off follows
/// it into the same bin. A note-off with no recorded note-on is a
/// data-quality problem: it is logged and dropped.
///
/// Bins appear in order of first program activation.
pub fn bin_by_program(channel: u8, events: &[ChannelEvent]) -> Vec<(u8, Vec<ChannelEvent>)> {
    let mut program_events: Vec<ChannelEvent> = events
        .iter()
        .filter(|e| e.program().is_some())
        .copied()
        .collect();
    if program_events.is_empty() {
        // No program changes at all defaults the channel to program 0.
        program_events.push(ChannelEvent {
            time: 0,
            channel,
            kind: EventKind::ProgramChange { program: 0 },
        });
    }
    dedup_program_events(&mut program_events);

    let mut bins: Vec<(u8, Vec<ChannelEvent>)> = Vec::new();
    for program in program_events.iter().filter_map(ChannelEvent::program) {
        if !bins.iter().any(|&(p, _)| p == program) {
            bins.push((program, Vec::new()));
        }
    }

    let mut program_per_note: HashMap<u8, u8> = HashMap::new();

    for event in events {
        match event.kind {
            EventKind::NoteOff { note } => match program_per_note.get(&note) {
                Some(&program) => push_to_bin(&mut bins, program, *event),
                None => warn!(channel, note, time = event.time, "unbalanced note events"),
            },
            _ => {
                let current = program_events
                    .iter()
                    .rev()
                    .find(|p| p.time <= event.time)
                    .and_then(ChannelEvent::program)
                    .unwrap_or(0);
                push_to_bin(&mut bins, current, *event);
                if let EventKind::NoteOn { note, .. } = event.kind {
                    program_per_note.insert(note, current);
                }
            }
        }
    }

    bins
}

fn push_to_bin(bins: &mut [(u8, Vec<ChannelEvent>)], program: u8, event: ChannelEvent) {
    if let Some((_, bin)) = bins.iter_mut().find(|&&mut (p, _)| p == program) {
        bin.push(event);
    }
}

/// Among program changes at the same tick only the last one applies; after
/// that, consecutive changes to the same program are redundant.
pub(crate) fn dedup_program_events(events: &mut Vec<ChannelEvent>) {
    events.reverse();
    events.dedup_by_key(|e| e.time);
    events.reverse();
    events.dedup_by_key(|e| e.kind);
}

/// Each instrument built from a bin sees every control-change on its
/// channel, because controller state (pitch bend in particular) is sticky
/// across a program change. Load-time cost only.
pub(crate) fn merge_sticky_controllers(
    bin: &[ChannelEvent],
    channel_events: &[ChannelEvent],
) -> Vec<ChannelEvent> {
    let mut merged: Vec<ChannelEvent> = bin
        .iter()
        .filter(|e| !e.is_control_change())
        .chain(channel_events.iter().filter(|e| e.is_control_change()))
        .copied()
        .collect();
    merged.sort_by_key(|e| e.time);
    merged
}
