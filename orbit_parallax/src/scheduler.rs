// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The parallax scheduler.
//!
//! [`ParallaxScheduler`] owns the participant registry and the single
//! [`ViewportDriver`], and runs the update pass on every scroll tick. See the
//! struct docs for lifecycle and re-entrancy guarantees.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::backend::{ParallaxElement, ViewportDriver};
use crate::error::RegistrationError;
use crate::geometry;
use crate::offset::parallax_offset;
use crate::participant::{Participant, ParticipantId, ParticipantInfo, Registry};
use crate::range::VisibilityRange;
#[cfg(feature = "trace-rich")]
use crate::trace::OffsetEvent;
use crate::trace::{
    FailureStage, ParticipantFailureEvent, RegisterEvent, ResizeEvent, SpeedChangeEvent,
    SubscriptionEvent, TickSummary, TraceSink, Tracer, UnregisterEvent,
};

/// Controls which participants the update pass visits.
///
/// Passed to the [`ParallaxScheduler`] via [`SchedulerConfig::culling`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CullingPolicy {
    /// Skip participants whose [`VisibilityRange`] does not contain the
    /// scroll position, widened on both ends by `padding` pixels.
    VisibilityRange {
        /// Extra scroll distance, in pixels, added to both ends of each range.
        padding: f64,
    },
    /// Visit every participant that has a range on every tick.
    ///
    /// Inert participants (no range) are still skipped.
    Disabled,
}

/// Configuration for the [`ParallaxScheduler`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Which participants each tick visits.
    pub culling: CullingPolicy,
    /// Write an initial offset during [`register`](ParallaxScheduler::register)
    /// when the current scroll position is inside the new range, so the
    /// element does not jump on the first scroll.
    pub prime_on_register: bool,
}

impl SchedulerConfig {
    /// Default configuration for browsers: exact visibility culling.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            culling: CullingPolicy::VisibilityRange { padding: 0.0 },
            prime_on_register: true,
        }
    }

    /// Visits every participant on every tick. Useful when debugging range
    /// computations; never faster than [`web`](Self::web).
    #[must_use]
    pub const fn eager() -> Self {
        Self {
            culling: CullingPolicy::Disabled,
            prime_on_register: true,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::web()
    }
}

/// Lifecycle state of a [`ParallaxScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    /// No participants, driver stopped.
    Idle,
    /// At least one participant, driver running.
    Active,
}

/// Coordinates parallax offsets for every registered participant.
///
/// # Lifecycle
///
/// A new scheduler is [`Idle`](SchedulerState::Idle). The first successful
/// [`register`](Self::register) starts the driver and moves it to
/// [`Active`](SchedulerState::Active); the [`unregister`](Self::unregister)
/// (or [`destroy`](Self::destroy)) that empties the registry stops the driver
/// and returns it to `Idle`. The driver is running if and only if the
/// registry is non-empty, and is never started or stopped twice in a row.
///
/// # Re-entrancy
///
/// Every method takes `&self`. The update pass iterates a snapshot of the
/// registry and releases its borrow before calling into elements, so an
/// element's [`apply_offset`](ParallaxElement::apply_offset) may register or
/// unregister participants (including itself) mid-tick. Participants
/// registered during a tick are first visited on the next tick; participants
/// removed during a tick receive no further writes.
///
/// # Usage
///
/// ```rust,ignore
/// let scheduler = ParallaxScheduler::new(SchedulerConfig::web(), driver);
/// let id = scheduler.register(0.5, element)?;
/// // driver calls scheduler.on_scroll_tick(y) / scheduler.on_resize()
/// scheduler.unregister(id);
/// ```
pub struct ParallaxScheduler<E, D: ViewportDriver> {
    config: SchedulerConfig,
    registry: RefCell<Registry<E>>,
    driver: RefCell<D>,
    subscribed: Cell<bool>,
    viewport_height: Cell<f64>,
    tick_index: Cell<u64>,
    sink: RefCell<Option<Box<dyn TraceSink>>>,
}

impl<E, D: ViewportDriver> core::fmt::Debug for ParallaxScheduler<E, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParallaxScheduler")
            .field("config", &self.config)
            .field(
                "participants",
                &self.registry.try_borrow().map(|r| r.len()).ok(),
            )
            .field("subscribed", &self.subscribed.get())
            .field("viewport_height", &self.viewport_height.get())
            .field("tick_index", &self.tick_index.get())
            .finish_non_exhaustive()
    }
}

impl<E, D> ParallaxScheduler<E, D>
where
    E: ParallaxElement + Clone,
    D: ViewportDriver,
{
    /// Creates an idle scheduler. The driver is not started until the first
    /// participant registers.
    #[must_use]
    pub fn new(config: SchedulerConfig, driver: D) -> Self {
        Self {
            config,
            registry: RefCell::new(Registry::default()),
            driver: RefCell::new(driver),
            subscribed: Cell::new(false),
            viewport_height: Cell::new(0.0),
            tick_index: Cell::new(0),
            sink: RefCell::new(None),
        }
    }

    // -- Registration API --

    /// Registers an element moving at `speed` relative to scroll.
    ///
    /// Geometry is sampled and the visibility range computed synchronously;
    /// on any failure the error is returned and nothing is registered. The
    /// first participant starts the driver.
    pub fn register(&self, speed: f64, element: E) -> Result<ParticipantId, RegistrationError> {
        if !speed.is_finite() {
            return Err(RegistrationError::InvalidSpeed(speed));
        }
        let viewport_height = self.current_viewport_height()?;
        let scroll_y = self.driver.borrow().scroll_offset();
        let sampled = geometry::sample(&element)?;
        let range = VisibilityRange::compute(
            sampled.absolute_top(scroll_y),
            sampled.height,
            speed,
            viewport_height,
        );

        let prime = self.config.prime_on_register
            && !sampled.is_degenerate()
            && self.in_range(&range, scroll_y);
        let primer = prime.then(|| element.clone());

        let id = self.registry.borrow_mut().insert(Participant {
            element,
            speed,
            range: Some(range),
        });
        // Subscribe before any sink or element callback can re-enter and
        // remove the new participant.
        if !self.subscribed.replace(true) {
            self.driver.borrow_mut().start();
            self.trace(|t| t.subscription(&SubscriptionEvent { active: true }));
        }
        self.trace(|t| {
            t.register(&RegisterEvent {
                participant: id,
                speed,
                range,
            });
        });

        if let Some(element) = primer
            && self.contains(id)
        {
            element.apply_offset(parallax_offset(&sampled, speed, viewport_height));
        }
        Ok(id)
    }

    /// Removes a participant. Returns `false` for unknown or already removed
    /// handles, which is not an error.
    ///
    /// Removing the last participant stops the driver.
    pub fn unregister(&self, id: ParticipantId) -> bool {
        self.remove(id).is_some()
    }

    /// Like [`unregister`](Self::unregister), but also returns the element
    /// to its resting position with
    /// [`clear_offset`](ParallaxElement::clear_offset).
    ///
    /// Use this when the element stays on screen after leaving the
    /// scheduler.
    pub fn release(&self, id: ParticipantId) -> bool {
        match self.remove(id) {
            Some(element) => {
                element.clear_offset();
                true
            }
            None => false,
        }
    }

    /// Changes a participant's speed and re-derives its range.
    ///
    /// On error the participant keeps its previous speed and range.
    pub fn set_speed(&self, id: ParticipantId, speed: f64) -> Result<(), RegistrationError> {
        if !speed.is_finite() {
            return Err(RegistrationError::InvalidSpeed(speed));
        }
        let element = self.element(id)?;
        let range = self.derive_range(&element, speed)?;
        let mut registry = self.registry.borrow_mut();
        // Sampling may have re-entered and removed the participant.
        let participant = registry
            .get_mut(id)
            .ok_or(RegistrationError::UnknownParticipant(id))?;
        let previous = core::mem::replace(&mut participant.speed, speed);
        participant.range = Some(range);
        drop(registry);
        self.trace(|t| {
            t.speed_change(&SpeedChangeEvent {
                participant: id,
                previous,
                speed,
                range,
            });
        });
        Ok(())
    }

    /// Recomputes one participant's range after a layout change the host
    /// knows about.
    ///
    /// If sampling fails the participant becomes inert until the next
    /// successful refresh or resize, and the error is returned.
    pub fn refresh(&self, id: ParticipantId) -> Result<(), RegistrationError> {
        let element = self.element(id)?;
        let speed = self
            .speed(id)
            .ok_or(RegistrationError::UnknownParticipant(id))?;
        match self.derive_range(&element, speed) {
            Ok(range) => {
                if let Some(participant) = self.registry.borrow_mut().get_mut(id) {
                    participant.range = Some(range);
                }
                Ok(())
            }
            Err(RegistrationError::Geometry(error)) => {
                if let Some(participant) = self.registry.borrow_mut().get_mut(id) {
                    participant.range = None;
                }
                self.trace(|t| {
                    t.participant_failure(&ParticipantFailureEvent {
                        participant: id,
                        stage: FailureStage::Refresh,
                        error,
                    });
                });
                Err(error.into())
            }
            Err(other) => Err(other),
        }
    }

    /// Unsubscribes from the driver and clears the registry, invalidating
    /// every outstanding handle. The scheduler can be used again afterwards.
    pub fn destroy(&self) {
        let removed = self.registry.borrow_mut().clear();
        let mut remaining = removed.len();
        for participant in removed {
            remaining -= 1;
            self.trace(|t| {
                t.unregister(&UnregisterEvent {
                    participant,
                    remaining,
                });
            });
        }
        self.stop_driver();
    }

    // -- Driver callbacks --

    /// Re-reads the viewport height and recomputes every participant's range.
    ///
    /// Participants whose geometry cannot be sampled become inert rather than
    /// aborting the pass. Returns the number of ranges recomputed.
    pub fn on_resize(&self) -> usize {
        let viewport_height = self.driver.borrow().viewport_height();
        if !(viewport_height.is_finite() && viewport_height > 0.0) {
            return 0;
        }
        self.viewport_height.set(viewport_height);
        let scroll_y = self.driver.borrow().scroll_offset();

        let snapshot: Vec<(ParticipantId, E, f64)> = self
            .registry
            .borrow()
            .iter()
            .map(|(id, p)| (id, p.element.clone(), p.speed))
            .collect();

        let mut recomputed = 0;
        let mut inert = 0;
        for (id, element, speed) in snapshot {
            let range = match geometry::sample(&element) {
                Ok(g) => Some(VisibilityRange::compute(
                    g.absolute_top(scroll_y),
                    g.height,
                    speed,
                    viewport_height,
                )),
                Err(error) => {
                    self.trace(|t| {
                        t.participant_failure(&ParticipantFailureEvent {
                            participant: id,
                            stage: FailureStage::Resize,
                            error,
                        });
                    });
                    None
                }
            };
            if let Some(participant) = self.registry.borrow_mut().get_mut(id) {
                participant.range = range;
                recomputed += 1;
                if range.is_none() {
                    inert += 1;
                }
            }
        }

        self.trace(|t| {
            t.resize(&ResizeEvent {
                viewport_height,
                recomputed,
                inert,
            });
        });
        recomputed
    }

    /// Runs the update pass for scroll position `scroll_y`.
    ///
    /// Participants are visited in registration order. Each one whose range
    /// contains `scroll_y` has its geometry re-sampled and its offset
    /// written; everyone else is skipped. A participant whose sampling fails
    /// is counted and skipped without affecting the others.
    pub fn on_scroll_tick(&self, scroll_y: f64) -> TickSummary {
        let tick_index = self.tick_index.get();
        self.tick_index.set(tick_index.wrapping_add(1));
        let viewport_height = self.viewport_height.get();

        let mut summary = TickSummary {
            tick_index,
            scroll_y,
            ..TickSummary::default()
        };

        let candidates: Vec<(ParticipantId, E, f64)> = {
            let registry = self.registry.borrow();
            let mut candidates = Vec::new();
            for (id, p) in registry.iter() {
                match p.range {
                    Some(range) if self.in_range(&range, scroll_y) => {
                        candidates.push((id, p.element.clone(), p.speed));
                    }
                    _ => summary.culled += 1,
                }
            }
            candidates
        };

        for (id, element, speed) in candidates {
            // An earlier participant's write may have unregistered this one.
            if !self.registry.borrow().contains(id) {
                continue;
            }
            match geometry::sample(&element) {
                Ok(g) if g.is_degenerate() => summary.culled += 1,
                Ok(g) => {
                    let offset = parallax_offset(&g, speed, viewport_height);
                    element.apply_offset(offset);
                    summary.processed += 1;
                    #[cfg(feature = "trace-rich")]
                    self.trace(|t| {
                        t.offset(&OffsetEvent {
                            tick_index,
                            participant: id,
                            offset,
                        });
                    });
                }
                Err(error) => {
                    summary.failed += 1;
                    self.trace(|t| {
                        t.participant_failure(&ParticipantFailureEvent {
                            participant: id,
                            stage: FailureStage::Tick,
                            error,
                        });
                    });
                }
            }
        }

        self.trace(|t| t.tick_summary(&summary));
        summary
    }

    // -- Queries --

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        if self.subscribed.get() {
            SchedulerState::Active
        } else {
            SchedulerState::Idle
        }
    }

    /// Returns `true` while the driver is running.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.get()
    }

    /// Number of registered participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Returns `true` if no participants are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }

    /// Returns `true` if `id` refers to a registered participant.
    #[must_use]
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.registry.borrow().contains(id)
    }

    /// The participant's cached range, `None` if unknown or inert.
    #[must_use]
    pub fn visibility_range(&self, id: ParticipantId) -> Option<VisibilityRange> {
        self.registry.borrow().get(id).and_then(|p| p.range)
    }

    /// The participant's speed, `None` if unknown.
    #[must_use]
    pub fn speed(&self, id: ParticipantId) -> Option<f64> {
        self.registry.borrow().get(id).map(|p| p.speed)
    }

    /// The viewport height used by the most recent range computation.
    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height.get()
    }

    /// Snapshot of every participant in registration order.
    #[must_use]
    pub fn participants(&self) -> Vec<ParticipantInfo> {
        self.registry
            .borrow()
            .iter()
            .map(|(id, p)| ParticipantInfo {
                id,
                speed: p.speed,
                range: p.range,
            })
            .collect()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    // -- Diagnostics --

    /// Installs a trace sink, returning the previous one.
    pub fn set_trace_sink(&self, sink: Box<dyn TraceSink>) -> Option<Box<dyn TraceSink>> {
        self.sink.borrow_mut().replace(sink)
    }

    /// Removes and returns the trace sink.
    pub fn take_trace_sink(&self) -> Option<Box<dyn TraceSink>> {
        self.sink.borrow_mut().take()
    }

    // -- Internals --

    /// The viewport height to use for a new range: the cached value while
    /// active (kept current by `on_resize`), a fresh read otherwise.
    fn current_viewport_height(&self) -> Result<f64, RegistrationError> {
        let cached = self.viewport_height.get();
        if self.subscribed.get() && cached > 0.0 {
            return Ok(cached);
        }
        let height = self.driver.borrow().viewport_height();
        if !(height.is_finite() && height > 0.0) {
            return Err(RegistrationError::InvalidViewport(height));
        }
        self.viewport_height.set(height);
        Ok(height)
    }

    fn derive_range(&self, element: &E, speed: f64) -> Result<VisibilityRange, RegistrationError> {
        let viewport_height = self.current_viewport_height()?;
        let scroll_y = self.driver.borrow().scroll_offset();
        let g = geometry::sample(element)?;
        Ok(VisibilityRange::compute(
            g.absolute_top(scroll_y),
            g.height,
            speed,
            viewport_height,
        ))
    }

    /// Removes `id` and returns its element. Emits the unregister event and
    /// stops the driver when the registry empties.
    fn remove(&self, id: ParticipantId) -> Option<E> {
        let (removed, remaining) = {
            let mut registry = self.registry.borrow_mut();
            let removed = registry.remove(id);
            (removed, registry.len())
        };
        let removed = removed?;
        self.trace(|t| {
            t.unregister(&UnregisterEvent {
                participant: id,
                remaining,
            });
        });
        if remaining == 0 {
            self.stop_driver();
        }
        Some(removed.element)
    }

    fn element(&self, id: ParticipantId) -> Result<E, RegistrationError> {
        self.registry
            .borrow()
            .get(id)
            .map(|p| p.element.clone())
            .ok_or(RegistrationError::UnknownParticipant(id))
    }

    fn in_range(&self, range: &VisibilityRange, scroll_y: f64) -> bool {
        match self.config.culling {
            CullingPolicy::VisibilityRange { padding } => range.contains_padded(scroll_y, padding),
            CullingPolicy::Disabled => true,
        }
    }

    fn stop_driver(&self) {
        if self.subscribed.replace(false) {
            self.driver.borrow_mut().stop();
            self.trace(|t| t.subscription(&SubscriptionEvent { active: false }));
        }
    }

    /// Runs `f` against the installed sink, if any. Events emitted while the
    /// sink is busy (a sink that re-enters the scheduler) are dropped.
    fn trace(&self, f: impl FnOnce(&mut Tracer<'_>)) {
        if let Ok(mut slot) = self.sink.try_borrow_mut()
            && let Some(sink) = slot.as_deref_mut()
        {
            f(&mut Tracer::new(sink));
        }
    }
}

impl<E, D: ViewportDriver> Drop for ParallaxScheduler<E, D> {
    fn drop(&mut self) {
        if self.subscribed.get() {
            self.driver.get_mut().stop();
        }
    }
}
