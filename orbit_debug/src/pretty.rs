// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use orbit_parallax::trace::{
    FailureStage, OffsetEvent, ParticipantFailureEvent, RegisterEvent, ResizeEvent,
    SpeedChangeEvent, SubscriptionEvent, TickSummary, TraceSink, UnregisterEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    offsets: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("offsets", &self.offsets)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            offsets: false,
        }
    }

    /// Also prints one line per offset write.
    #[must_use]
    pub fn with_offsets(mut self, offsets: bool) -> Self {
        self.offsets = offsets;
        self
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn stage_name(stage: FailureStage) -> &'static str {
    match stage {
        FailureStage::Tick => "tick",
        FailureStage::Resize => "resize",
        FailureStage::Refresh => "refresh",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_register(&mut self, e: &RegisterEvent) {
        let _ = writeln!(
            self.writer,
            "[register] {:?} speed={} range={:.1}..={:.1} travel={:.1}px",
            e.participant, e.speed, e.range.start, e.range.end, e.range.max_travel,
        );
    }

    fn on_speed_change(&mut self, e: &SpeedChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[speed] {:?} {} -> {} range={:.1}..={:.1}",
            e.participant, e.previous, e.speed, e.range.start, e.range.end,
        );
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        let _ = writeln!(
            self.writer,
            "[unregister] {:?} remaining={}",
            e.participant, e.remaining,
        );
    }

    fn on_subscription(&mut self, e: &SubscriptionEvent) {
        let state = if e.active { "start" } else { "stop" };
        let _ = writeln!(self.writer, "[driver] {state}");
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        let _ = writeln!(
            self.writer,
            "[resize] viewport={:.1}px recomputed={} inert={}",
            e.viewport_height, e.recomputed, e.inert,
        );
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        let _ = writeln!(
            self.writer,
            "[tick] #{} scroll={:.1} processed={} culled={} failed={}",
            s.tick_index, s.scroll_y, s.processed, s.culled, s.failed,
        );
    }

    fn on_participant_failure(&mut self, e: &ParticipantFailureEvent) {
        let _ = writeln!(
            self.writer,
            "[failure] {:?} during {}: {}",
            e.participant,
            stage_name(e.stage),
            e.error,
        );
    }

    fn on_offset(&mut self, e: &OffsetEvent) {
        if self.offsets {
            let _ = writeln!(
                self.writer,
                "[offset] #{} {:?} {:.2}px",
                e.tick_index, e.participant, e.offset,
            );
        }
    }
}
