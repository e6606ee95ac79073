//! The load-time assignment pipeline.
//!
//! Runs once before playback: demultiplexes the file's events into
//! channels, re-partitions each channel by program, and resolves every bin
//! to the instruments that will visualize it. Everything it hands to the
//! per-frame collectors is immutable from then on.

mod melodic;
mod percussion;
mod program;

pub use melodic::{
    AccordionType, BassGuitarType, BassPlayingStyle, ChoirType, GuitarType, KeyboardSkin,
    MalletType, MelodicKind, PAD_POLYPHONY_THRESHOLD, PipeSkin, ProgramTarget, SpaceLaserType,
    StageHornsType, StageStringBehavior, StageStringsType, TrumpetType, program_target,
};
pub use percussion::{AuxiliaryKind, DrumKitKind, ShellStyle};
pub use program::bin_by_program;

use crate::collector::VisibilityWindows;
use crate::instrument::{Instrument, InstrumentKind};
use crate::midi::{ChannelEvent, maximum_polyphony};

/// Channel 9 carries percussion by MIDI convention.
pub const PERCUSSION_CHANNEL: u8 = 9;

/// Whether a channel's events resolve through the melodic table or the
/// percussion catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Melody,
    Rhythm,
}

impl ChannelState {
    pub fn of(channel: u8) -> Self {
        if channel == PERCUSSION_CHANNEL {
            Self::Rhythm
        } else {
            Self::Melody
        }
    }
}

/// Partitions a file's channel events into the instruments that visualize
/// them.
///
/// Resolution is a pure function of the event list: bins with no note-ons
/// and unmapped program numbers produce nothing, and problems in one bin
/// never abort the rest of the assignment.
pub fn assign(events: &[ChannelEvent], windows: VisibilityWindows) -> Vec<Instrument> {
    // Demultiplex into the 16 channels, each independently time-sorted.
    let mut channels: [Vec<ChannelEvent>; 16] = Default::default();
    for event in events {
        channels[usize::from(event.channel) & 0xF].push(*event);
    }
    for channel in &mut channels {
        channel.sort_by_key(|e| e.time);
    }

    let mut instruments = Vec::new();

    for (channel, channel_events) in channels.iter().enumerate() {
        let channel = channel as u8;
        let bins = program::bin_by_program(channel, channel_events);

        match ChannelState::of(channel) {
            ChannelState::Rhythm => {
                let mut auxiliary: Vec<(AuxiliaryKind, Vec<Vec<ChannelEvent>>)> = Vec::new();
                for (program, bin) in &bins {
                    if let Some((kind, hits)) = percussion::drum_kit(*program, bin) {
                        instruments.push(Instrument::decayed(
                            InstrumentKind::DrumKit(kind),
                            hits,
                            windows,
                        ));
                    }
                    for (kind, events) in percussion::special_cases(*program, bin) {
                        instruments.push(Instrument::sustained(
                            InstrumentKind::Melodic(kind),
                            events,
                            windows,
                        ));
                    }
                    percussion::accumulate_auxiliary(
                        &mut auxiliary,
                        percussion::collect_auxiliary(*program, bin),
                    );
                }
                for (kind, groups) in auxiliary {
                    instruments.push(Instrument::auxiliary(kind, groups, windows));
                }
            }
            ChannelState::Melody => {
                for (program, bin) in &bins {
                    if let Some(instrument) = build_melodic(*program, bin, channel_events, windows)
                    {
                        instruments.push(instrument);
                    }
                }
            }
        }
    }

    instruments
}

/// Resolves one melodic bin to an instrument, or nothing for silent bins
/// and unmapped programs.
fn build_melodic(
    program: u8,
    bin: &[ChannelEvent],
    channel_events: &[ChannelEvent],
    windows: VisibilityWindows,
) -> Option<Instrument> {
    if !bin.iter().any(ChannelEvent::is_note_on) {
        return None;
    }
    let kind = match program_target(program)? {
        ProgramTarget::Direct(kind) => kind,
        ProgramTarget::PolyphonySplit { pad, lead } => {
            if maximum_polyphony(bin) > PAD_POLYPHONY_THRESHOLD {
                pad
            } else {
                lead
            }
        }
    };
    let events = program::merge_sticky_controllers(bin, channel_events);
    Some(Instrument::sustained(
        InstrumentKind::Melodic(kind),
        events,
        windows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::EventKind;

    fn on(channel: u8, time: u64, note: u8) -> ChannelEvent {
        ChannelEvent {
            time,
            channel,
            kind: EventKind::NoteOn { note, velocity: 100 },
        }
    }

    fn off(channel: u8, time: u64, note: u8) -> ChannelEvent {
        ChannelEvent {
            time,
            channel,
            kind: EventKind::NoteOff { note },
        }
    }

    fn program_change(channel: u8, time: u64, program: u8) -> ChannelEvent {
        ChannelEvent {
            time,
            channel,
            kind: EventKind::ProgramChange { program },
        }
    }

    fn control(channel: u8, time: u64, controller: u8, value: u8) -> ChannelEvent {
        ChannelEvent {
            time,
            channel,
            kind: EventKind::ControlChange { controller, value },
        }
    }

    #[test]
    fn channel_nine_is_rhythm() {
        assert_eq!(ChannelState::of(9), ChannelState::Rhythm);
        assert_eq!(ChannelState::of(0), ChannelState::Melody);
        assert_eq!(ChannelState::of(10), ChannelState::Melody);
    }

    #[test]
    fn empty_input_yields_no_instruments() {
        assert!(assign(&[], VisibilityWindows::default()).is_empty());
    }

    #[test]
    fn silent_program_changes_yield_nothing() {
        let events = vec![program_change(0, 0, 56), control(0, 10, 1, 64)];
        assert!(assign(&events, VisibilityWindows::default()).is_empty());
    }

    #[test]
    fn unmapped_program_is_silently_ignored() {
        let events = vec![program_change(0, 0, 127), on(0, 10, 60), off(0, 20, 60)];
        assert!(assign(&events, VisibilityWindows::default()).is_empty());
    }

    #[test]
    fn one_bin_one_instrument() {
        let events = vec![on(0, 0, 60), off(0, 480, 60)];
        let instruments = assign(&events, VisibilityWindows::default());
        assert_eq!(instruments.len(), 1);
        assert_eq!(
            instruments[0].kind(),
            InstrumentKind::Melodic(MelodicKind::Keyboard(KeyboardSkin::Piano))
        );
        assert_eq!(instruments[0].note_periods().len(), 1);
    }

    #[test]
    fn program_change_splits_a_channel_into_two_instruments() {
        let events = vec![
            on(0, 0, 60),
            off(0, 100, 60),
            program_change(0, 200, 56),
            on(0, 300, 62),
            off(0, 400, 62),
        ];
        let instruments = assign(&events, VisibilityWindows::default());
        assert_eq!(instruments.len(), 2);
        assert_eq!(
            instruments[0].kind(),
            InstrumentKind::Melodic(MelodicKind::Keyboard(KeyboardSkin::Piano))
        );
        assert_eq!(
            instruments[1].kind(),
            InstrumentKind::Melodic(MelodicKind::Trumpet(TrumpetType::Normal))
        );
    }

    #[test]
    fn sticky_controllers_reach_the_later_instrument() {
        let events = vec![
            control(0, 0, 1, 64),
            on(0, 10, 60),
            off(0, 100, 60),
            program_change(0, 200, 56),
            on(0, 300, 62),
            off(0, 400, 62),
        ];
        let instruments = assign(&events, VisibilityWindows::default());
        assert_eq!(instruments.len(), 2);
        for instrument in &instruments {
            assert!(instrument.events().iter().any(|e| e.is_control_change()));
        }
    }

    #[test]
    fn polyphonic_square_reads_as_pad() {
        let mut events = vec![program_change(0, 0, 80)];
        for note in [60, 62, 64, 65, 67] {
            events.push(on(0, 10, note));
        }
        for note in [60, 62, 64, 65, 67] {
            events.push(off(0, 100, note));
        }
        let instruments = assign(&events, VisibilityWindows::default());
        assert_eq!(
            instruments[0].kind(),
            InstrumentKind::Melodic(MelodicKind::Keyboard(KeyboardSkin::SquareWave))
        );
    }

    #[test]
    fn monophonic_square_reads_as_space_laser() {
        let events = vec![
            program_change(0, 0, 80),
            on(0, 10, 60),
            off(0, 100, 60),
            on(0, 100, 62),
            off(0, 200, 62),
        ];
        let instruments = assign(&events, VisibilityWindows::default());
        assert_eq!(
            instruments[0].kind(),
            InstrumentKind::Melodic(MelodicKind::SpaceLaser(SpaceLaserType::Square))
        );
    }

    #[test]
    fn percussion_channel_builds_a_drum_kit() {
        let events = vec![on(9, 0, 38), on(9, 240, 42)];
        let instruments = assign(&events, VisibilityWindows::default());
        assert_eq!(instruments.len(), 1);
        assert_eq!(
            instruments[0].kind(),
            InstrumentKind::DrumKit(DrumKitKind::Typical(ShellStyle::Standard))
        );
        assert_eq!(instruments[0].events().len(), 2);
    }

    #[test]
    fn auxiliary_accumulates_across_bins_of_channel_nine() {
        // Two program bins on channel 9, both hitting note 60 (a bongo).
        let events = vec![
            program_change(9, 0, 0),
            on(9, 10, 60),
            program_change(9, 100, 8),
            on(9, 200, 60),
            on(9, 300, 38),
        ];
        let instruments = assign(&events, VisibilityWindows::default());

        let bongos: Vec<&Instrument> = instruments
            .iter()
            .filter(|i| i.kind() == InstrumentKind::Auxiliary(AuxiliaryKind::Bongos))
            .collect();
        assert_eq!(bongos.len(), 1);
        let times: Vec<u64> = bongos[0].events().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![10, 200]);

        // Both bins also produce their own drum kit.
        let kits = instruments
            .iter()
            .filter(|i| matches!(i.kind(), InstrumentKind::DrumKit(_)))
            .count();
        assert_eq!(kits, 2);
    }

    #[test]
    fn resolution_is_deterministic() {
        let events = vec![
            on(0, 0, 60),
            off(0, 480, 60),
            on(9, 0, 60),
            program_change(9, 100, 8),
            on(9, 200, 60),
        ];
        let a: Vec<InstrumentKind> = assign(&events, VisibilityWindows::default())
            .iter()
            .map(Instrument::kind)
            .collect();
        let b: Vec<InstrumentKind> = assign(&events, VisibilityWindows::default())
            .iter()
            .map(Instrument::kind)
            .collect();
        assert_eq!(a, b);
    }
}
