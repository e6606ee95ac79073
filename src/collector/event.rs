use std::sync::Arc;

use super::Collector;
use crate::midi::Timed;

type Trigger<T> = Box<dyn Fn(&T, u64) -> bool>;
type SeekHook<T> = Box<dyn FnMut(&[T], usize)>;

/// Periodically collects elapsed events from a time-sorted pool.
///
/// The cursor only moves forward under `advance_collect_*`; calling with a
/// time that consumes nothing is a benign no-op. Repositioning backwards (or
/// far forwards) goes through [`Collector::seek`].
pub struct EventCollector<T: Timed> {
    events: Arc<[T]>,
    current_index: usize,
    trigger: Trigger<T>,
    on_seek: Option<SeekHook<T>>,
}

impl<T: Timed> EventCollector<T> {
    pub fn new(events: Arc<[T]>) -> Self {
        Self {
            events,
            current_index: 0,
            trigger: Box::new(|event, time| event.time() <= time),
            on_seek: None,
        }
    }

    /// Replaces the default "timestamp has elapsed" trigger.
    pub fn with_trigger(mut self, trigger: impl Fn(&T, u64) -> bool + 'static) -> Self {
        self.trigger = Box::new(trigger);
        self
    }

    /// Registers a hook invoked after every seek with the event pool and the
    /// new cursor position, so dependent state (e.g. a last-known controller
    /// value) can be rebuilt from scratch.
    pub fn with_seek_hook(mut self, hook: impl FnMut(&[T], usize) + 'static) -> Self {
        self.on_seek = Some(Box::new(hook));
        self
    }

    /// Advances the play head and returns every event that has elapsed since
    /// the last `advance_collect_*` or `seek`, in original order.
    pub fn advance_collect_all(&mut self, time: u64) -> &[T] {
        let starting_index = self.current_index;
        while self.current_index < self.events.len()
            && (self.trigger)(&self.events[self.current_index], time)
        {
            self.current_index += 1;
        }
        &self.events[starting_index..self.current_index]
    }

    /// Same scan as [`advance_collect_all`](Self::advance_collect_all), but
    /// only the last elapsed event is returned. `None` if nothing new
    /// elapsed. Useful where only the most recent state-defining event
    /// matters.
    pub fn advance_collect_one(&mut self, time: u64) -> Option<&T> {
        let mut advanced = false;
        while self.current_index < self.events.len()
            && (self.trigger)(&self.events[self.current_index], time)
        {
            self.current_index += 1;
            advanced = true;
        }
        advanced.then(|| &self.events[self.current_index - 1])
    }

    pub fn events(&self) -> &[T] {
        &self.events
    }

    pub fn index(&self) -> usize {
        self.current_index
    }
}

impl<T: Timed> Collector for EventCollector<T> {
    type Item = T;

    fn seek(&mut self, time: u64) {
        self.current_index = self.events.partition_point(|e| e.time() < time);
        if let Some(mut hook) = self.on_seek.take() {
            hook(&self.events, self.current_index);
            self.on_seek = Some(hook);
        }
    }

    fn peek(&self) -> Option<&T> {
        self.events.get(self.current_index)
    }

    fn prev(&self) -> Option<&T> {
        self.current_index
            .checked_sub(1)
            .and_then(|i| self.events.get(i))
    }
}
