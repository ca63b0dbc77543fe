// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the scheduler.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! scheduler calls as participants come and go and as ticks run. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`OffsetEvent`] and the
//!   corresponding `TraceSink` method.

use alloc::rc::Rc;
use core::cell::RefCell;

use crate::error::GeometryError;
use crate::participant::ParticipantId;
use crate::range::VisibilityRange;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which operation was sampling geometry when it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// The scroll-tick update pass.
    Tick,
    /// Range recomputation after a viewport resize.
    Resize,
    /// Range recomputation for a single participant.
    Refresh,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a participant is registered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegisterEvent {
    /// The participant.
    pub participant: ParticipantId,
    /// Its speed.
    pub speed: f64,
    /// Its freshly computed range.
    pub range: VisibilityRange,
}

/// Emitted after [`set_speed`](crate::ParallaxScheduler::set_speed) changes
/// a participant's speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedChangeEvent {
    /// The participant.
    pub participant: ParticipantId,
    /// Speed before the change.
    pub previous: f64,
    /// The new speed.
    pub speed: f64,
    /// The range derived for the new speed.
    pub range: VisibilityRange,
}

/// Emitted after a participant is removed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnregisterEvent {
    /// The removed participant.
    pub participant: ParticipantId,
    /// Participants still registered.
    pub remaining: usize,
}

/// Emitted when the driver is started or stopped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubscriptionEvent {
    /// `true` on start, `false` on stop.
    pub active: bool,
}

/// Emitted after a resize recomputation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeEvent {
    /// The new viewport height.
    pub viewport_height: f64,
    /// Participants whose range was recomputed.
    pub recomputed: usize,
    /// Participants left inert because sampling failed.
    pub inert: usize,
}

/// Per-tick counts, emitted at the end of every update pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickSummary {
    /// Monotonic tick counter.
    pub tick_index: u64,
    /// Scroll position the tick ran for.
    pub scroll_y: f64,
    /// Participants that received an offset.
    pub processed: usize,
    /// Participants skipped because the tick was outside their range.
    pub culled: usize,
    /// Participants whose geometry sampling failed.
    pub failed: usize,
}

/// Emitted when sampling one participant fails.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticipantFailureEvent {
    /// The participant.
    pub participant: ParticipantId,
    /// What the scheduler was doing.
    pub stage: FailureStage,
    /// What went wrong.
    pub error: GeometryError,
}

/// A single offset write.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetEvent {
    /// Tick the write belongs to.
    pub tick_index: u64,
    /// The participant.
    pub participant: ParticipantId,
    /// Offset in pixels.
    pub offset: f64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the scheduler.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a participant is registered.
    fn on_register(&mut self, e: &RegisterEvent) {
        _ = e;
    }

    /// Called after a participant's speed changes.
    fn on_speed_change(&mut self, e: &SpeedChangeEvent) {
        _ = e;
    }

    /// Called after a participant is removed.
    fn on_unregister(&mut self, e: &UnregisterEvent) {
        _ = e;
    }

    /// Called when the driver starts or stops.
    fn on_subscription(&mut self, e: &SubscriptionEvent) {
        _ = e;
    }

    /// Called after a resize recomputation.
    fn on_resize(&mut self, e: &ResizeEvent) {
        _ = e;
    }

    /// Called at the end of every tick.
    fn on_tick_summary(&mut self, s: &TickSummary) {
        _ = s;
    }

    /// Called when sampling one participant fails.
    fn on_participant_failure(&mut self, e: &ParticipantFailureEvent) {
        _ = e;
    }

    /// Called for every offset write (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_offset(&mut self, e: &OffsetEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Shared sinks
// ---------------------------------------------------------------------------

/// Lets a caller install a sink in the scheduler and keep reading it.
///
/// Events arriving while the sink is already borrowed are dropped.
impl<S: TraceSink + ?Sized> TraceSink for Rc<RefCell<S>> {
    fn on_register(&mut self, e: &RegisterEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_register(e);
        }
    }

    fn on_speed_change(&mut self, e: &SpeedChangeEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_speed_change(e);
        }
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_unregister(e);
        }
    }

    fn on_subscription(&mut self, e: &SubscriptionEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_subscription(e);
        }
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_resize(e);
        }
    }

    fn on_tick_summary(&mut self, summary: &TickSummary) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_tick_summary(summary);
        }
    }

    fn on_participant_failure(&mut self, e: &ParticipantFailureEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_participant_failure(e);
        }
    }

    #[cfg(feature = "trace-rich")]
    fn on_offset(&mut self, e: &OffsetEvent) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_offset(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`RegisterEvent`].
    #[inline]
    pub fn register(&mut self, e: &RegisterEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_register(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SpeedChangeEvent`].
    #[inline]
    pub fn speed_change(&mut self, e: &SpeedChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_speed_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UnregisterEvent`].
    #[inline]
    pub fn unregister(&mut self, e: &UnregisterEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unregister(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SubscriptionEvent`].
    #[inline]
    pub fn subscription(&mut self, e: &SubscriptionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_subscription(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ResizeEvent`].
    #[inline]
    pub fn resize(&mut self, e: &ResizeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_resize(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TickSummary`].
    #[inline]
    pub fn tick_summary(&mut self, s: &TickSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_tick_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`ParticipantFailureEvent`].
    #[inline]
    pub fn participant_failure(&mut self, e: &ParticipantFailureEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_participant_failure(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OffsetEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn offset(&mut self, e: &OffsetEvent) {
        if let Some(s) = &mut self.sink {
            s.on_offset(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
