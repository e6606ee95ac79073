use serde::{Deserialize, Serialize};

use super::{Collector, EventCollector, NotePeriodCollector};
use crate::midi::{ChannelEvent, Timed};

/// Show/hide windows around note activity, in MIDI ticks.
///
/// An instrument appears shortly before it plays and lingers after its last
/// note so an exit animation has room to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityWindows {
    pub lookahead: u64,
    pub lookbehind: u64,
}

impl Default for VisibilityWindows {
    fn default() -> Self {
        // two and four beats at 480 PPQ
        Self {
            lookahead: 960,
            lookbehind: 1920,
        }
    }
}

/// Standard visibility for sustained instruments: visible while a period is
/// sounding, while one is about to start, or just after one has ended.
pub fn standard_rules(
    collector: &NotePeriodCollector,
    time: u64,
    windows: VisibilityWindows,
) -> bool {
    if collector.has_sounding() {
        return true;
    }
    if let Some(next) = collector.peek() {
        if next.start.saturating_sub(time) <= windows.lookahead {
            return true;
        }
    }
    if let Some(ended) = collector.last_ended_at() {
        if time.saturating_sub(ended) <= windows.lookbehind {
            return true;
        }
    }
    false
}

/// The analogous rule for one-shot percussion, which has hits instead of
/// periods.
pub fn decayed_rules(
    collector: &EventCollector<ChannelEvent>,
    time: u64,
    windows: VisibilityWindows,
) -> bool {
    if let Some(next) = collector.peek() {
        if next.time().saturating_sub(time) <= windows.lookahead {
            return true;
        }
    }
    if let Some(last) = collector.prev() {
        if time.saturating_sub(last.time()) <= windows.lookbehind {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::EventKind;
    use std::sync::Arc;

    use crate::collector::NotePeriod;

    fn windows() -> VisibilityWindows {
        VisibilityWindows {
            lookahead: 100,
            lookbehind: 200,
        }
    }

    fn sustained(periods: &[NotePeriod]) -> NotePeriodCollector {
        NotePeriodCollector::new(Arc::from(periods))
    }

    #[test]
    fn visible_while_sounding() {
        let mut c = sustained(&[NotePeriod {
            start: 0,
            end: 1000,
            note: 60,
            velocity: 100,
        }]);
        c.advance(500);
        assert!(standard_rules(&c, 500, windows()));
    }

    #[test]
    fn visible_inside_lookahead_only() {
        let mut c = sustained(&[NotePeriod {
            start: 1000,
            end: 2000,
            note: 60,
            velocity: 100,
        }]);
        c.advance(850);
        assert!(!standard_rules(&c, 850, windows()));
        c.advance(900);
        assert!(standard_rules(&c, 900, windows()));
    }

    #[test]
    fn lingers_inside_lookbehind() {
        let mut c = sustained(&[NotePeriod {
            start: 0,
            end: 100,
            note: 60,
            velocity: 100,
        }]);
        c.advance(250);
        assert!(standard_rules(&c, 250, windows()));
        c.advance(301);
        assert!(!standard_rules(&c, 301, windows()));
    }

    #[test]
    fn decayed_windows_bracket_each_hit() {
        let hits: Arc<[ChannelEvent]> = Arc::from([ChannelEvent {
            time: 1000,
            channel: 9,
            kind: EventKind::NoteOn {
                note: 38,
                velocity: 100,
            },
        }]);
        let mut c = EventCollector::new(hits);

        c.advance_collect_all(800);
        assert!(!decayed_rules(&c, 800, windows()));
        c.advance_collect_all(900);
        assert!(decayed_rules(&c, 900, windows()));
        c.advance_collect_all(1150);
        assert!(decayed_rules(&c, 1150, windows()));
        c.advance_collect_all(1300);
        assert!(!decayed_rules(&c, 1300, windows()));
    }
}
