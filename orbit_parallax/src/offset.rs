// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parallax offset formula.
//!
//! The offset is linear in the element's distance from the viewport center,
//! saturating once the element's center leaves the viewport:
//!
//! ```text
//! distance = (viewport_center - element_center) / (viewport_height / 2)
//! offset   = clamp(distance, -1, 1) * (1 - speed) * (height / 2)
//! ```

use crate::geometry::ElementGeometry;

/// Signed distance of the element's center from the viewport center.
///
/// `0` is centered, `+1` puts the element's center on the viewport top and
/// `-1` on the viewport bottom. Not clamped.
#[must_use]
pub fn distance_from_center(geometry: &ElementGeometry, viewport_height: f64) -> f64 {
    let half = viewport_height / 2.0;
    (half - geometry.center()) / half
}

/// Vertical offset in pixels for an element at the given geometry.
///
/// Never exceeds `|1 - speed| * height / 2` in magnitude. Returns `0.0`
/// rather than `-0.0`.
#[must_use]
pub fn parallax_offset(geometry: &ElementGeometry, speed: f64, viewport_height: f64) -> f64 {
    let clamped = distance_from_center(geometry, viewport_height).clamp(-1.0, 1.0);
    clamped * (1.0 - speed) * (geometry.height / 2.0) + 0.0
}
