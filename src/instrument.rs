use std::sync::Arc;

use crate::assign::{AuxiliaryKind, DrumKitKind, MelodicKind};
use crate::collector::{
    Advance, Collector, EventCollector, NotePeriod, NotePeriodCollector, VisibilityWindows,
    build_note_periods, decayed_rules, standard_rules,
};
use crate::midi::ChannelEvent;

/// Every instrument the resolver can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    Melodic(MelodicKind),
    DrumKit(DrumKitKind),
    Auxiliary(AuxiliaryKind),
}

/// How an instrument animates from its events.
enum Playback {
    /// Note on/off pairs form periods; animation follows the sounding set.
    Sustained(NotePeriodCollector),
    /// One-shot hits with no duration.
    Decayed(EventCollector<ChannelEvent>),
}

/// A visibility transition edge, reported once per transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEdge {
    Entered,
    Exited,
}

/// Everything that happened to one instrument during one frame.
#[derive(Default)]
pub struct Frame {
    /// Periods that began this frame (sustained instruments).
    pub started: Vec<NotePeriod>,
    /// Periods that finished this frame (sustained instruments).
    pub ended: Vec<NotePeriod>,
    /// Hits that elapsed this frame (decayed instruments).
    pub hits: Vec<ChannelEvent>,
    pub visible: bool,
    pub edge: Option<VisibilityEdge>,
}

type EdgeHook = Box<dyn FnMut()>;

/// One resolved instrument: its kind, its immutable event partition, and
/// the mutable playback cursor that tracks it frame by frame.
pub struct Instrument {
    kind: InstrumentKind,
    events: Arc<[ChannelEvent]>,
    hit_groups: Vec<Arc<[ChannelEvent]>>,
    playback: Playback,
    windows: VisibilityWindows,
    visible: bool,
    on_entry: Option<EdgeHook>,
    on_exit: Option<EdgeHook>,
}

impl Instrument {
    /// An instrument that sustains notes: its events are paired into note
    /// periods at construction.
    pub fn sustained(
        kind: InstrumentKind,
        events: Vec<ChannelEvent>,
        windows: VisibilityWindows,
    ) -> Self {
        let periods: Arc<[NotePeriod]> = build_note_periods(&events).into();
        Self {
            kind,
            events: events.into(),
            hit_groups: Vec::new(),
            playback: Playback::Sustained(NotePeriodCollector::new(periods)),
            windows,
            visible: false,
            on_entry: None,
            on_exit: None,
        }
    }

    /// A one-shot instrument driven by note-on hits alone.
    pub fn decayed(
        kind: InstrumentKind,
        hits: Vec<ChannelEvent>,
        windows: VisibilityWindows,
    ) -> Self {
        let events: Arc<[ChannelEvent]> = hits.into();
        Self {
            kind,
            events: events.clone(),
            hit_groups: Vec::new(),
            playback: Playback::Decayed(EventCollector::new(events)),
            windows,
            visible: false,
            on_entry: None,
            on_exit: None,
        }
    }

    /// Auxiliary percussion keeps one hit list per member note (left and
    /// right bongo, say) on top of the merged stream that drives playback.
    pub fn auxiliary(
        kind: AuxiliaryKind,
        groups: Vec<Vec<ChannelEvent>>,
        windows: VisibilityWindows,
    ) -> Self {
        let mut merged: Vec<ChannelEvent> = groups.iter().flatten().copied().collect();
        merged.sort_by_key(|e| e.time);
        let mut instrument = Self::decayed(InstrumentKind::Auxiliary(kind), merged, windows);
        instrument.hit_groups = groups.into_iter().map(Arc::from).collect();
        instrument
    }

    pub fn kind(&self) -> InstrumentKind {
        self.kind
    }

    /// The instrument's full event partition (sticky controllers included
    /// for melodic instruments, hits only for percussion).
    pub fn events(&self) -> &[ChannelEvent] {
        &self.events
    }

    /// Per-member-note hit lists; empty for non-auxiliary instruments.
    pub fn hit_groups(&self) -> &[Arc<[ChannelEvent]>] {
        &self.hit_groups
    }

    /// All note periods, for sustained instruments.
    pub fn note_periods(&self) -> &[NotePeriod] {
        match &self.playback {
            Playback::Sustained(collector) => collector.periods(),
            Playback::Decayed(_) => &[],
        }
    }

    /// Periods sounding at the last ticked time.
    pub fn sounding(&self) -> &[NotePeriod] {
        match &self.playback {
            Playback::Sustained(collector) => collector.sounding(),
            Playback::Decayed(_) => &[],
        }
    }

    /// The next hit in the future, for decayed instruments.
    pub fn next_hit(&self) -> Option<&ChannelEvent> {
        match &self.playback {
            Playback::Decayed(collector) => collector.peek(),
            Playback::Sustained(_) => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Called once each time the instrument becomes visible.
    pub fn set_on_entry(&mut self, hook: impl FnMut() + 'static) {
        self.on_entry = Some(Box::new(hook));
    }

    /// Called once each time the instrument becomes invisible.
    pub fn set_on_exit(&mut self, hook: impl FnMut() + 'static) {
        self.on_exit = Some(Box::new(hook));
    }

    /// Advances the instrument to `time`. Called once per rendered frame
    /// with non-decreasing times; use [`seek`](Self::seek) for jumps.
    pub fn tick(&mut self, time: u64, _delta: f32) -> Frame {
        let mut frame = Frame::default();

        frame.visible = match &mut self.playback {
            Playback::Sustained(collector) => {
                let Advance { started, ended } = collector.advance(time);
                frame.started = started;
                frame.ended = ended;
                standard_rules(collector, time, self.windows)
            }
            Playback::Decayed(collector) => {
                frame.hits = collector.advance_collect_all(time).to_vec();
                decayed_rules(collector, time, self.windows)
            }
        };

        if frame.visible != self.visible {
            if frame.visible {
                frame.edge = Some(VisibilityEdge::Entered);
                if let Some(hook) = &mut self.on_entry {
                    hook();
                }
            } else {
                frame.edge = Some(VisibilityEdge::Exited);
                if let Some(hook) = &mut self.on_exit {
                    hook();
                }
            }
        }
        self.visible = frame.visible;
        frame
    }

    /// Repositions the playback cursor for a timeline jump. Visibility is
    /// re-evaluated on the next tick.
    pub fn seek(&mut self, time: u64) {
        match &mut self.playback {
            Playback::Sustained(collector) => collector.seek(time),
            Playback::Decayed(collector) => collector.seek(time),
        }
    }
}

/// Owns every resolved instrument and drives them in lock step with the
/// playback clock.
pub struct Stage {
    instruments: Vec<Instrument>,
}

impl Stage {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn instruments_mut(&mut self) -> &mut [Instrument] {
        &mut self.instruments
    }

    /// Ticks every instrument; the returned frames are index-aligned with
    /// [`instruments`](Self::instruments).
    pub fn tick(&mut self, time: u64, delta: f32) -> Vec<Frame> {
        self.instruments
            .iter_mut()
            .map(|instrument| instrument.tick(time, delta))
            .collect()
    }

    /// Reseeks every instrument's collector for a timeline jump.
    pub fn seek(&mut self, time: u64) {
        for instrument in &mut self.instruments {
            instrument.seek(time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::KeyboardSkin;
    use crate::midi::EventKind;
    use std::cell::Cell;
    use std::rc::Rc;

    fn on(time: u64, note: u8) -> ChannelEvent {
        ChannelEvent {
            time,
            channel: 0,
            kind: EventKind::NoteOn { note, velocity: 100 },
        }
    }

    fn off(time: u64, note: u8) -> ChannelEvent {
        ChannelEvent {
            time,
            channel: 0,
            kind: EventKind::NoteOff { note },
        }
    }

    fn windows() -> VisibilityWindows {
        VisibilityWindows {
            lookahead: 100,
            lookbehind: 200,
        }
    }

    fn piano(events: Vec<ChannelEvent>) -> Instrument {
        Instrument::sustained(
            InstrumentKind::Melodic(MelodicKind::Keyboard(KeyboardSkin::Piano)),
            events,
            windows(),
        )
    }

    #[test]
    fn sustained_tick_reports_period_edges() {
        let mut instrument = piano(vec![on(0, 60), off(480, 60)]);

        let frame = instrument.tick(0, 0.016);
        assert_eq!(frame.started.len(), 1);
        assert!(frame.ended.is_empty());
        assert!(frame.visible);
        assert_eq!(frame.edge, Some(VisibilityEdge::Entered));

        let frame = instrument.tick(240, 0.016);
        assert!(frame.started.is_empty());
        assert!(frame.edge.is_none());
        assert_eq!(instrument.sounding().len(), 1);

        let frame = instrument.tick(480, 0.016);
        assert_eq!(frame.ended.len(), 1);
        assert!(frame.visible, "still inside the lookbehind window");
    }

    #[test]
    fn visibility_edges_fire_once() {
        let mut instrument = piano(vec![on(1000, 60), off(1100, 60)]);
        let entries = Rc::new(Cell::new(0));
        let exits = Rc::new(Cell::new(0));
        let e = entries.clone();
        instrument.set_on_entry(move || e.set(e.get() + 1));
        let x = exits.clone();
        instrument.set_on_exit(move || x.set(x.get() + 1));

        for time in [0, 500, 800, 900, 950, 1050, 1200, 1300, 1301, 1400, 2000] {
            instrument.tick(time, 0.016);
        }
        assert_eq!(entries.get(), 1);
        assert_eq!(exits.get(), 1);
        assert!(!instrument.is_visible());
    }

    #[test]
    fn decayed_tick_collects_hits() {
        let mut kit = Instrument::decayed(
            InstrumentKind::DrumKit(DrumKitKind::Typical(crate::assign::ShellStyle::Standard)),
            vec![on(240, 38), on(480, 38)],
            windows(),
        );

        let frame = kit.tick(0, 0.016);
        assert!(frame.hits.is_empty());
        assert!(!frame.visible);

        let frame = kit.tick(150, 0.016);
        assert!(frame.visible, "inside the lookahead of the first hit");
        assert_eq!(frame.edge, Some(VisibilityEdge::Entered));

        let frame = kit.tick(300, 0.016);
        assert_eq!(frame.hits, vec![on(240, 38)]);
        assert_eq!(kit.next_hit(), Some(&on(480, 38)));
    }

    #[test]
    fn auxiliary_merges_groups_for_playback() {
        let instrument = Instrument::auxiliary(
            AuxiliaryKind::Bongos,
            vec![vec![on(20, 60)], vec![on(10, 61)]],
            windows(),
        );
        let times: Vec<u64> = instrument.events().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![10, 20]);
        assert_eq!(instrument.hit_groups().len(), 2);
    }

    #[test]
    fn stage_seek_then_tick_resumes_cleanly() {
        let mut stage = Stage::new(vec![piano(vec![
            on(0, 60),
            off(100, 60),
            on(1000, 64),
            off(1100, 64),
        ])]);

        stage.tick(50, 0.016);
        stage.seek(1050);
        let frames = stage.tick(1050, 0.016);
        assert!(frames[0].visible);
        assert_eq!(stage.instruments()[0].sounding().len(), 1);
    }
}
