use serde::{Deserialize, Serialize};

use super::melodic::{ChoirType, MelodicKind};
use crate::midi::ChannelEvent;

/// Shell look for the typical drum kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellStyle {
    Standard,
    Room,
    Power,
    Jazz,
    Analog,
}

impl ShellStyle {
    /// GM2 percussion programs that carry a distinct shell look.
    fn from_program(program: u8) -> Option<Self> {
        match program {
            8 => Some(Self::Room),
            16 => Some(Self::Power),
            32 => Some(Self::Jazz),
            _ => None,
        }
    }
}

/// Drum kit variants keyed by percussion program number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrumKitKind {
    Electronic,
    Brush,
    Orchestra,
    Typical(ShellStyle),
}

/// One-shot percussion distinct from the main kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuxiliaryKind {
    HighQ,
    Slap,
    Sticks,
    SquareClick,
    Metronome,
    HandClap,
    Tambourine,
    Cowbell,
    Bongos,
    Congas,
    Timbales,
    Agogo,
    Cabasa,
    Maracas,
    Whistle,
    Guiro,
    Claves,
    Woodblock,
    Cuica,
    Triangle,
    Shaker,
    JingleBell,
    Castanets,
    Surdo,
}

/// How an auxiliary entry splits its hits among member notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// One hit list per member note (e.g. left and right bongo).
    PerNote,
    /// All member notes feed one combined list.
    Combined,
}

type AuxEntry = (AuxiliaryKind, &'static [u8], Grouping);

/// The standard-kit auxiliary table (programs 0, 8, 16, 24, 25, 32, 40).
const STANDARD_KIT_AUX: &[AuxEntry] = &[
    (AuxiliaryKind::HighQ, &[27], Grouping::PerNote),
    (AuxiliaryKind::Slap, &[28], Grouping::PerNote),
    (AuxiliaryKind::Sticks, &[31], Grouping::PerNote),
    (AuxiliaryKind::SquareClick, &[32], Grouping::PerNote),
    (AuxiliaryKind::Metronome, &[33, 34], Grouping::PerNote),
    (AuxiliaryKind::HandClap, &[39], Grouping::PerNote),
    (AuxiliaryKind::Tambourine, &[54], Grouping::PerNote),
    (AuxiliaryKind::Cowbell, &[56], Grouping::PerNote),
    (AuxiliaryKind::Bongos, &[60, 61], Grouping::PerNote),
    (AuxiliaryKind::Congas, &[62, 63, 64], Grouping::PerNote),
    (AuxiliaryKind::Timbales, &[65, 66], Grouping::PerNote),
    (AuxiliaryKind::Agogo, &[67, 68], Grouping::PerNote),
    (AuxiliaryKind::Cabasa, &[69], Grouping::PerNote),
    (AuxiliaryKind::Maracas, &[70], Grouping::PerNote),
    (AuxiliaryKind::Whistle, &[71, 72], Grouping::PerNote),
    (AuxiliaryKind::Guiro, &[73, 74], Grouping::PerNote),
    (AuxiliaryKind::Claves, &[75], Grouping::PerNote),
    (AuxiliaryKind::Woodblock, &[76, 77], Grouping::PerNote),
    (AuxiliaryKind::Cuica, &[78, 79], Grouping::PerNote),
    (AuxiliaryKind::Triangle, &[80, 81], Grouping::PerNote),
    (AuxiliaryKind::Shaker, &[82], Grouping::PerNote),
    (AuxiliaryKind::JingleBell, &[83], Grouping::PerNote),
    (AuxiliaryKind::Castanets, &[85], Grouping::PerNote),
    (AuxiliaryKind::Surdo, &[86, 87], Grouping::PerNote),
];

/// The orchestra-kit table (program 48). Castanets appear on two notes here
/// and feed a single combined list.
const ORCHESTRA_KIT_AUX: &[AuxEntry] = &[
    (AuxiliaryKind::Sticks, &[31], Grouping::PerNote),
    (AuxiliaryKind::SquareClick, &[32], Grouping::PerNote),
    (AuxiliaryKind::Metronome, &[33, 34], Grouping::PerNote),
    (AuxiliaryKind::Castanets, &[39, 85], Grouping::Combined),
    (AuxiliaryKind::Tambourine, &[54], Grouping::PerNote),
    (AuxiliaryKind::Cowbell, &[56], Grouping::PerNote),
    (AuxiliaryKind::Bongos, &[60, 61], Grouping::PerNote),
    (AuxiliaryKind::Congas, &[62, 63, 64], Grouping::PerNote),
    (AuxiliaryKind::Timbales, &[65, 66], Grouping::PerNote),
    (AuxiliaryKind::Agogo, &[67, 68], Grouping::PerNote),
    (AuxiliaryKind::Cabasa, &[69], Grouping::PerNote),
    (AuxiliaryKind::Maracas, &[70], Grouping::PerNote),
    (AuxiliaryKind::Whistle, &[71, 72], Grouping::PerNote),
    (AuxiliaryKind::Guiro, &[73, 74], Grouping::PerNote),
    (AuxiliaryKind::Claves, &[75], Grouping::PerNote),
    (AuxiliaryKind::Woodblock, &[76, 77], Grouping::PerNote),
    (AuxiliaryKind::Cuica, &[78, 79], Grouping::PerNote),
    (AuxiliaryKind::Triangle, &[80, 81], Grouping::PerNote),
    (AuxiliaryKind::Shaker, &[82], Grouping::PerNote),
    (AuxiliaryKind::JingleBell, &[83], Grouping::PerNote),
    (AuxiliaryKind::Surdo, &[86, 87], Grouping::PerNote),
];

/// The SFX-kit table (program 56), where the click family sits on other
/// note numbers.
const SFX_KIT_AUX: &[AuxEntry] = &[
    (AuxiliaryKind::HighQ, &[39], Grouping::PerNote),
    (AuxiliaryKind::Slap, &[40], Grouping::PerNote),
    (AuxiliaryKind::Sticks, &[43], Grouping::PerNote),
    (AuxiliaryKind::SquareClick, &[44], Grouping::PerNote),
    (AuxiliaryKind::Metronome, &[45, 46], Grouping::PerNote),
];

/// Selects the drum kit for one percussion bin, or `None` when the bin has
/// no hits.
pub fn drum_kit(program: u8, bin: &[ChannelEvent]) -> Option<(DrumKitKind, Vec<ChannelEvent>)> {
    let hits = hits(bin);
    if hits.is_empty() {
        return None;
    }
    let kind = match program {
        24 => DrumKitKind::Electronic,
        25 => DrumKitKind::Typical(ShellStyle::Analog),
        40 => DrumKitKind::Brush,
        48 => DrumKitKind::Orchestra,
        _ => DrumKitKind::Typical(ShellStyle::from_program(program).unwrap_or(ShellStyle::Standard)),
    };
    Some((kind, hits))
}

/// Certain percussion notes are semantically pitched one-shot effects, not
/// kit hits; they become ordinary melodic instruments, standardized to C4
/// where the target expects a single pitch.
pub fn special_cases(program: u8, bin: &[ChannelEvent]) -> Vec<(MelodicKind, Vec<ChannelEvent>)> {
    let mut specials = Vec::new();
    match program {
        // Electronic
        24 => {
            if let Some(notes) = note_events(bin, &[52]) {
                specials.push((MelodicKind::ReverseCymbal, standardize(notes)));
            }
        }
        // Orchestra
        48 => {
            if let Some(notes) = note_events(
                bin,
                &[41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53],
            ) {
                specials.push((MelodicKind::Timpani, notes));
            }
            if let Some(notes) = note_events(bin, &[88]) {
                specials.push((
                    MelodicKind::StageChoir(ChoirType::SynthVoice),
                    standardize(notes),
                ));
            }
        }
        // SFX
        56 => {
            if let Some(notes) = note_events(bin, &[58]) {
                specials.push((MelodicKind::ApplauseChoir, notes));
            }
            if let Some(notes) = note_events(bin, &[70]) {
                specials.push((MelodicKind::Helicopter, notes));
            }
        }
        _ => {}
    }
    specials
}

/// Pulls this bin's auxiliary percussion out of the kit: for every table
/// entry with at least one hit, the hits grouped per member note.
pub fn collect_auxiliary(
    program: u8,
    bin: &[ChannelEvent],
) -> Vec<(AuxiliaryKind, Vec<Vec<ChannelEvent>>)> {
    let table: &[AuxEntry] = match program {
        0 | 8 | 16 | 24 | 25 | 32 | 40 => STANDARD_KIT_AUX,
        48 => ORCHESTRA_KIT_AUX,
        56 => SFX_KIT_AUX,
        _ => return Vec::new(),
    };

    let mut collected = Vec::new();
    for &(kind, notes, grouping) in table {
        let hits = hits_in(bin, notes);
        if hits.is_empty() {
            continue;
        }
        let groups = match grouping {
            Grouping::PerNote => notes
                .iter()
                .map(|&n| hits.iter().filter(|e| e.note() == Some(n)).copied().collect())
                .collect(),
            Grouping::Combined => vec![hits],
        };
        collected.push((kind, groups));
    }
    collected
}

/// Folds one bin's auxiliary results into the channel-wide accumulator.
/// Auxiliary notes are not exclusive to one program bin, so a kind seen
/// again merges its hit lists (concatenate, then re-sort) instead of
/// overwriting them.
pub fn accumulate_auxiliary(
    accumulator: &mut Vec<(AuxiliaryKind, Vec<Vec<ChannelEvent>>)>,
    collected: Vec<(AuxiliaryKind, Vec<Vec<ChannelEvent>>)>,
) {
    for (kind, groups) in collected {
        match accumulator.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, existing)) => {
                for (slot, group) in existing.iter_mut().zip(groups) {
                    slot.extend(group);
                    slot.sort_by_key(|e| e.time);
                }
            }
            None => accumulator.push((kind, groups)),
        }
    }
}

fn hits(events: &[ChannelEvent]) -> Vec<ChannelEvent> {
    events.iter().filter(|e| e.is_note_on()).copied().collect()
}

fn hits_in(events: &[ChannelEvent], notes: &[u8]) -> Vec<ChannelEvent> {
    events
        .iter()
        .filter(|e| e.is_note_on() && e.note().is_some_and(|n| notes.contains(&n)))
        .copied()
        .collect()
}

fn note_events(events: &[ChannelEvent], notes: &[u8]) -> Option<Vec<ChannelEvent>> {
    let matched: Vec<ChannelEvent> = events
        .iter()
        .filter(|e| e.is_note() && e.note().is_some_and(|n| notes.contains(&n)))
        .copied()
        .collect();
    (!matched.is_empty()).then_some(matched)
}

fn standardize(events: Vec<ChannelEvent>) -> Vec<ChannelEvent> {
    events.into_iter().map(|e| e.with_note(60)).collect()
}
