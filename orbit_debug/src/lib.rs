// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, recording, and JSON export for `orbit_parallax`
//! diagnostics.
//!
//! This crate provides [`TraceSink`](orbit_parallax::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: an in-memory log of typed
//!   [`recorder::RecordedEvent`]s.
//! - [`export::export_json_lines`]: writes a recording as JSON Lines.
//! - [`Tee`]: forwards every event to two sinks.

pub mod export;
pub mod pretty;
pub mod recorder;

use orbit_parallax::trace::{
    OffsetEvent, ParticipantFailureEvent, RegisterEvent, ResizeEvent, SpeedChangeEvent,
    SubscriptionEvent, TickSummary, TraceSink, UnregisterEvent,
};

/// A [`TraceSink`] that forwards each event to `A`, then `B`.
#[derive(Debug, Default)]
pub struct Tee<A, B> {
    /// First sink.
    pub first: A,
    /// Second sink.
    pub second: B,
}

impl<A, B> Tee<A, B> {
    /// Combines two sinks.
    #[must_use]
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<A, B> {
    fn on_register(&mut self, e: &RegisterEvent) {
        self.first.on_register(e);
        self.second.on_register(e);
    }

    fn on_speed_change(&mut self, e: &SpeedChangeEvent) {
        self.first.on_speed_change(e);
        self.second.on_speed_change(e);
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        self.first.on_unregister(e);
        self.second.on_unregister(e);
    }

    fn on_subscription(&mut self, e: &SubscriptionEvent) {
        self.first.on_subscription(e);
        self.second.on_subscription(e);
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        self.first.on_resize(e);
        self.second.on_resize(e);
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        self.first.on_tick_summary(s);
        self.second.on_tick_summary(s);
    }

    fn on_participant_failure(&mut self, e: &ParticipantFailureEvent) {
        self.first.on_participant_failure(e);
        self.second.on_participant_failure(e);
    }

    fn on_offset(&mut self, e: &OffsetEvent) {
        self.first.on_offset(e);
        self.second.on_offset(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;

    #[test]
    fn tee_forwards_to_both() {
        let mut tee = Tee::new(RecorderSink::new(), RecorderSink::new());
        tee.on_subscription(&SubscriptionEvent { active: true });
        tee.on_tick_summary(&TickSummary::default());
        assert_eq!(tee.first.events().len(), 2);
        assert_eq!(tee.first.events(), tee.second.events());
    }
}
