// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simulated page for driving `orbit_parallax` without a browser.
//!
//! [`SimPage`] holds the viewport height and scroll offset. [`SimElement`]s
//! live at fixed document-absolute positions on the page and report
//! viewport-relative bounding boxes the way `getBoundingClientRect()` does.
//! [`SimDriver`] implements [`ViewportDriver`] over the same page and counts
//! how often it was started and stopped.
//!
//! ```rust,ignore
//! let page = SimPage::new(800.0);
//! let scheduler = ParallaxScheduler::new(SchedulerConfig::web(), page.driver());
//! let el = page.element(1000.0, 200.0);
//! scheduler.register(0.5, el.clone())?;
//! page.scroll_to(&scheduler, 900.0);
//! assert_eq!(el.last_offset(), Some(25.0));
//! ```

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use core::cell::Cell;

use kurbo::Rect;
use orbit_parallax::{GeometryError, ParallaxElement, ParallaxScheduler, ViewportDriver};
use orbit_parallax::trace::TickSummary;

#[derive(Debug)]
struct PageState {
    viewport_height: Cell<f64>,
    scroll_y: Cell<f64>,
    starts: Cell<u32>,
    stops: Cell<u32>,
    running: Cell<bool>,
}

/// Viewport and scroll state shared by every element and driver on the page.
#[derive(Clone, Debug)]
pub struct SimPage {
    state: Rc<PageState>,
}

impl SimPage {
    /// Creates a page scrolled to the top.
    #[must_use]
    pub fn new(viewport_height: f64) -> Self {
        Self {
            state: Rc::new(PageState {
                viewport_height: Cell::new(viewport_height),
                scroll_y: Cell::new(0.0),
                starts: Cell::new(0),
                stops: Cell::new(0),
                running: Cell::new(false),
            }),
        }
    }

    /// Creates a driver bound to this page.
    #[must_use]
    pub fn driver(&self) -> SimDriver {
        SimDriver { page: self.clone() }
    }

    /// Creates an element at document-absolute `top` with the given height.
    #[must_use]
    pub fn element(&self, top: f64, height: f64) -> SimElement {
        SimElement {
            page: self.clone(),
            inner: Rc::new(ElementState {
                top: Cell::new(top),
                height: Cell::new(height),
                detached: Cell::new(false),
                last_offset: Cell::new(None),
                writes: Cell::new(0),
                resets: Cell::new(0),
            }),
        }
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.state.scroll_y.get()
    }

    /// Current viewport height.
    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.state.viewport_height.get()
    }

    /// Moves the scroll position without notifying anyone.
    pub fn set_scroll(&self, y: f64) {
        self.state.scroll_y.set(y);
    }

    /// Changes the viewport height without notifying anyone.
    pub fn set_viewport_height(&self, h: f64) {
        self.state.viewport_height.set(h);
    }

    /// Scrolls to `y` and delivers the tick, as a running driver would.
    ///
    /// Returns `None` when the driver is stopped (no subscription, no tick).
    pub fn scroll_to<E, D>(&self, scheduler: &ParallaxScheduler<E, D>, y: f64) -> Option<TickSummary>
    where
        E: ParallaxElement + Clone,
        D: ViewportDriver,
    {
        self.set_scroll(y);
        self.state
            .running
            .get()
            .then(|| scheduler.on_scroll_tick(y))
    }

    /// Resizes the viewport and delivers the resize notification followed by
    /// a tick, as a running driver would. Returns the recomputed count.
    pub fn resize<E, D>(&self, scheduler: &ParallaxScheduler<E, D>, viewport_height: f64) -> usize
    where
        E: ParallaxElement + Clone,
        D: ViewportDriver,
    {
        self.set_viewport_height(viewport_height);
        if !self.state.running.get() {
            return 0;
        }
        let recomputed = scheduler.on_resize();
        scheduler.on_scroll_tick(self.scroll_y());
        recomputed
    }

    /// Whether a driver on this page is currently started.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// How many times a driver on this page was started.
    #[must_use]
    pub fn starts(&self) -> u32 {
        self.state.starts.get()
    }

    /// How many times a driver on this page was stopped.
    #[must_use]
    pub fn stops(&self) -> u32 {
        self.state.stops.get()
    }
}

/// A [`ViewportDriver`] over a [`SimPage`].
///
/// Panics on a double start or double stop, so lifecycle bugs surface as
/// test failures.
#[derive(Debug)]
pub struct SimDriver {
    page: SimPage,
}

impl ViewportDriver for SimDriver {
    fn start(&mut self) {
        let state = &self.page.state;
        assert!(!state.running.get(), "driver started twice");
        state.running.set(true);
        state.starts.set(state.starts.get() + 1);
    }

    fn stop(&mut self) {
        let state = &self.page.state;
        assert!(state.running.get(), "driver stopped while not running");
        state.running.set(false);
        state.stops.set(state.stops.get() + 1);
    }

    fn viewport_height(&self) -> f64 {
        self.page.viewport_height()
    }

    fn scroll_offset(&self) -> f64 {
        self.page.scroll_y()
    }
}

#[derive(Debug)]
struct ElementState {
    top: Cell<f64>,
    height: Cell<f64>,
    detached: Cell<bool>,
    last_offset: Cell<Option<f64>>,
    writes: Cell<u32>,
    resets: Cell<u32>,
}

/// An element on a [`SimPage`]. Clones share state.
#[derive(Clone, Debug)]
pub struct SimElement {
    page: SimPage,
    inner: Rc<ElementState>,
}

impl SimElement {
    /// Moves the element to a new document-absolute top.
    pub fn set_top(&self, top: f64) {
        self.inner.top.set(top);
    }

    /// Changes the element's height.
    pub fn set_height(&self, height: f64) {
        self.inner.height.set(height);
    }

    /// Detaches (or re-attaches) the element; detached elements fail sampling.
    pub fn set_detached(&self, detached: bool) {
        self.inner.detached.set(detached);
    }

    /// The most recently written offset, if any.
    #[must_use]
    pub fn last_offset(&self) -> Option<f64> {
        self.inner.last_offset.get()
    }

    /// How many offsets have been written.
    #[must_use]
    pub fn writes(&self) -> u32 {
        self.inner.writes.get()
    }

    /// How many times the offset was cleared back to the resting position.
    #[must_use]
    pub fn resets(&self) -> u32 {
        self.inner.resets.get()
    }

    /// Forgets the recorded offset and write count.
    pub fn clear_writes(&self) {
        self.inner.last_offset.set(None);
        self.inner.writes.set(0);
    }
}

impl ParallaxElement for SimElement {
    fn bounding_rect(&self) -> Result<Rect, GeometryError> {
        if self.inner.detached.get() {
            return Err(GeometryError::Detached);
        }
        let y0 = self.inner.top.get() - self.page.scroll_y();
        Ok(Rect::new(0.0, y0, 100.0, y0 + self.inner.height.get()))
    }

    fn apply_offset(&self, offset: f64) {
        self.inner.last_offset.set(Some(offset));
        self.inner.writes.set(self.inner.writes.get() + 1);
    }

    fn clear_offset(&self) {
        self.inner.last_offset.set(None);
        self.inner.resets.set(self.inner.resets.get() + 1);
    }
}
