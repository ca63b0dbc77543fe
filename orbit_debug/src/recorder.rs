// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and appends every event, in
//! emission order, to a `Vec<RecordedEvent>`. The recording can be inspected
//! directly in tests or exported with
//! [`export_json_lines`](crate::export::export_json_lines).

use orbit_parallax::trace::{
    OffsetEvent, ParticipantFailureEvent, RegisterEvent, ResizeEvent, SpeedChangeEvent,
    SubscriptionEvent, TickSummary, TraceSink, UnregisterEvent,
};

/// A single recorded trace event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// See [`TraceSink::on_register`].
    Register(RegisterEvent),
    /// See [`TraceSink::on_speed_change`].
    SpeedChange(SpeedChangeEvent),
    /// See [`TraceSink::on_unregister`].
    Unregister(UnregisterEvent),
    /// See [`TraceSink::on_subscription`].
    Subscription(SubscriptionEvent),
    /// See [`TraceSink::on_resize`].
    Resize(ResizeEvent),
    /// See [`TraceSink::on_tick_summary`].
    TickSummary(TickSummary),
    /// See [`TraceSink::on_participant_failure`].
    ParticipantFailure(ParticipantFailureEvent),
    /// See [`TraceSink::on_offset`].
    Offset(OffsetEvent),
}

impl RecordedEvent {
    /// Short event name, used as the `event` field on export.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register(_) => "register",
            Self::SpeedChange(_) => "speed_change",
            Self::Unregister(_) => "unregister",
            Self::Subscription(_) => "subscription",
            Self::Resize(_) => "resize",
            Self::TickSummary(_) => "tick",
            Self::ParticipantFailure(_) => "failure",
            Self::Offset(_) => "offset",
        }
    }
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
    offsets: bool,
}

impl RecorderSink {
    /// Creates an empty recorder that keeps per-participant offset events.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            offsets: true,
        }
    }

    /// Creates an empty recorder that drops offset events, which dominate
    /// long recordings.
    #[must_use]
    pub fn without_offsets() -> Self {
        Self::default()
    }

    /// The recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// The recorded tick summaries, oldest first.
    pub fn ticks(&self) -> impl Iterator<Item = &TickSummary> {
        self.events.iter().filter_map(|e| match e {
            RecordedEvent::TickSummary(s) => Some(s),
            _ => None,
        })
    }
}

impl TraceSink for RecorderSink {
    fn on_register(&mut self, e: &RegisterEvent) {
        self.events.push(RecordedEvent::Register(*e));
    }

    fn on_speed_change(&mut self, e: &SpeedChangeEvent) {
        self.events.push(RecordedEvent::SpeedChange(*e));
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        self.events.push(RecordedEvent::Unregister(*e));
    }

    fn on_subscription(&mut self, e: &SubscriptionEvent) {
        self.events.push(RecordedEvent::Subscription(*e));
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        self.events.push(RecordedEvent::Resize(*e));
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        self.events.push(RecordedEvent::TickSummary(*s));
    }

    fn on_participant_failure(&mut self, e: &ParticipantFailureEvent) {
        self.events.push(RecordedEvent::ParticipantFailure(*e));
    }

    fn on_offset(&mut self, e: &OffsetEvent) {
        if self.offsets {
            self.events.push(RecordedEvent::Offset(*e));
        }
    }
}
