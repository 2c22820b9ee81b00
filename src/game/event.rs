//! Event System
//!
//! Things that happened during a tick, collected for whoever drives the
//! simulation. The world publishes into these queues and never reads them
//! back; the driver drains sound cues into its audio bank and may inspect
//! contacts or carry changes for debugging.
//!
//! Queues are cleared at the start of every frame.

use super::audio::SoundCue;
use super::physics::ContactEvent;
use super::platform::CarryEvent;

/// A queue for events of a single type.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events without processing
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for EventQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

/// Container for all simulation events.
#[derive(Debug, Default)]
pub struct Events {
    /// Sounds requested by characters, in the order they were raised
    pub cues: EventQueue<SoundCue>,

    /// Contact begin / stay / end, as delivered to each body
    pub contacts: EventQueue<ContactEvent>,

    /// Riders attached to or detached from platforms
    pub carry: EventQueue<CarryEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all event queues. Call at the start of a frame.
    pub fn clear_all(&mut self) {
        self.cues.clear();
        self.contacts.clear();
        self.carry.clear();
    }
}
