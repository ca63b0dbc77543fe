// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility ranges.
//!
//! A [`VisibilityRange`] is the interval of document scroll positions over
//! which an element can be displaced from rest. It widens the naive
//! "element intersects the viewport" interval by the largest offset the
//! element can receive, so outside of it the element is off screen no
//! matter what offset it carries.

/// Scroll interval over which a participant can move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityRange {
    /// First scroll position (inclusive) at which the element may be visible.
    pub start: f64,
    /// Last scroll position (inclusive) at which the element may be visible.
    pub end: f64,
    /// Largest absolute offset, in pixels, the element can receive.
    pub max_travel: f64,
}

impl VisibilityRange {
    /// Computes the range for an element.
    ///
    /// `absolute_top` is in document coordinates (bounding-box top plus the
    /// scroll offset at sampling time). A zero `height` yields zero travel.
    #[must_use]
    pub fn compute(absolute_top: f64, height: f64, speed: f64, viewport_height: f64) -> Self {
        let max_travel = (height / 2.0) * (1.0 - speed).abs();
        Self {
            start: absolute_top - viewport_height - max_travel,
            end: absolute_top + height + max_travel,
            max_travel,
        }
    }

    /// Whether `scroll_y` lies within `[start, end]`.
    #[inline]
    #[must_use]
    pub fn contains(&self, scroll_y: f64) -> bool {
        scroll_y >= self.start && scroll_y <= self.end
    }

    /// Like [`contains`](Self::contains), with both ends widened by `padding`.
    #[inline]
    #[must_use]
    pub fn contains_padded(&self, scroll_y: f64, padding: f64) -> bool {
        scroll_y >= self.start - padding && scroll_y <= self.end + padding
    }

    /// Width of the interval.
    #[inline]
    #[must_use]
    pub fn len(&self) -> f64 {
        self.end - self.start
    }
}
