// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element geometry sampling.
//!
//! Backends report an element's bounding box in viewport coordinates (the
//! browser's `getBoundingClientRect()`), and [`sample`] reduces it to the
//! two numbers the scheduler cares about. Horizontal extent is ignored.

use kurbo::Rect;

use crate::backend::ParallaxElement;
use crate::error::GeometryError;

/// Vertical geometry of an element relative to the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementGeometry {
    /// Top edge in viewport coordinates (negative once scrolled past).
    pub top: f64,
    /// Height in pixels, never negative.
    pub height: f64,
}

impl ElementGeometry {
    /// Builds geometry from a viewport-relative bounding box.
    pub fn from_rect(rect: Rect) -> Result<Self, GeometryError> {
        if !(rect.y0.is_finite() && rect.y1.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        let height = rect.height();
        if height < 0.0 {
            return Err(GeometryError::NegativeHeight);
        }
        Ok(Self {
            top: rect.y0,
            height,
        })
    }

    /// Top edge in document coordinates for the given scroll offset.
    #[inline]
    #[must_use]
    pub fn absolute_top(&self, scroll_y: f64) -> f64 {
        self.top + scroll_y
    }

    /// Vertical center in viewport coordinates.
    #[inline]
    #[must_use]
    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Whether the element has collapsed to nothing (e.g. removed from
    /// layout without being unregistered).
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.height == 0.0
    }
}

/// Samples the current geometry of `element`.
pub fn sample<E: ParallaxElement + ?Sized>(element: &E) -> Result<ElementGeometry, GeometryError> {
    ElementGeometry::from_rect(element.bounding_rect()?)
}
