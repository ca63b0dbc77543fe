// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! Orbit splits platform-specific work into *backend* crates. Each backend
//! provides two pieces:
//!
//! - **Elements**: Implement [`ParallaxElement`] for whatever handle the
//!   platform uses for a visual element (e.g. `HtmlElement`). The scheduler
//!   keeps a clone of the handle for as long as the participant is
//!   registered, so the handle should be cheap to clone and must not own the
//!   element (the host framework does).
//!
//! - **Driver**: Implement [`ViewportDriver`] to own the single scroll
//!   subscription and resize observer, and to report the current viewport
//!   height and scroll offset. The scheduler starts the driver when the first
//!   participant registers and stops it when the last one leaves. Once
//!   started, the driver calls back into the scheduler with
//!   [`on_scroll_tick`] and [`on_resize`] after layout for the frame has been
//!   committed.
//!
//! # Frame pseudocode
//!
//! ```rust,ignore
//! // mount
//! let id = scheduler.register(speed, element)?;
//!
//! // driver callbacks
//! fn on_scroll(y: f64) { scheduler.on_scroll_tick(y); }
//! fn on_resize() { scheduler.on_resize(); }
//!
//! // unmount
//! scheduler.unregister(id);
//! ```
//!
//! [`on_scroll_tick`]: crate::scheduler::ParallaxScheduler::on_scroll_tick
//! [`on_resize`]: crate::scheduler::ParallaxScheduler::on_resize

use kurbo::Rect;

use crate::error::GeometryError;

/// A visual element that can receive a vertical parallax offset.
pub trait ParallaxElement {
    /// Returns the element's bounding box in viewport coordinates.
    fn bounding_rect(&self) -> Result<Rect, GeometryError>;

    /// Writes a vertical translation of `offset` pixels onto the element.
    ///
    /// The value is fully derived each tick; implementations overwrite
    /// rather than accumulate.
    fn apply_offset(&self, offset: f64);

    /// Removes any offset written by the scheduler.
    ///
    /// Called by [`release`](crate::ParallaxScheduler::release). The default
    /// writes an offset of zero.
    fn clear_offset(&self) {
        self.apply_offset(0.0);
    }
}

/// Owner of the scroll subscription and the resize observer.
pub trait ViewportDriver {
    /// Begins delivering scroll and resize notifications.
    fn start(&mut self);

    /// Stops delivering notifications and releases any platform listeners.
    fn stop(&mut self);

    /// Current viewport height in pixels.
    fn viewport_height(&self) -> f64;

    /// Current document scroll offset in pixels.
    fn scroll_offset(&self) -> f64;
}
