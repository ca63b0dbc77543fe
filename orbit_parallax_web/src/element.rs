// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM element participants.
//!
//! [`DomElement`] adapts an `HtmlElement` to [`ParallaxElement`]: geometry
//! comes from `getBoundingClientRect()`, and offsets are written as inline
//! styles according to a [`TransformWrite`] mode.

use kurbo::Rect;
use orbit_parallax::{GeometryError, ParallaxElement};
use web_sys::HtmlElement;

/// How an offset is written onto the element's inline style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransformWrite {
    /// Overwrite the whole `transform` property with
    /// `translate3d(0, Npx, 0)`. Any other transform set inline on the
    /// element is lost on every tick.
    #[default]
    Replace,
    /// Write the individual `translate` property (`0 Npx`), which the
    /// browser composes with whatever `transform` the element carries.
    Translate,
}

impl TransformWrite {
    /// The CSS property this mode writes.
    #[must_use]
    pub const fn property(self) -> &'static str {
        match self {
            Self::Replace => "transform",
            Self::Translate => "translate",
        }
    }

    /// The CSS value for a vertical offset of `offset` pixels.
    #[must_use]
    pub fn value(self, offset: f64) -> String {
        match self {
            Self::Replace => format!("translate3d(0, {offset}px, 0)"),
            Self::Translate => format!("0 {offset}px"),
        }
    }
}

/// An `HtmlElement` registered with the scheduler.
///
/// Cloning is cheap (a JS handle); the DOM node itself stays owned by the
/// host framework.
#[derive(Clone, Debug)]
pub struct DomElement {
    element: HtmlElement,
    write: TransformWrite,
}

impl DomElement {
    /// Wraps `element`, writing offsets with the given mode.
    #[must_use]
    pub fn new(element: HtmlElement, write: TransformWrite) -> Self {
        Self { element, write }
    }
}

impl ParallaxElement for DomElement {
    fn bounding_rect(&self) -> Result<Rect, GeometryError> {
        if !self.element.is_connected() {
            return Err(GeometryError::Detached);
        }
        let r = self.element.get_bounding_client_rect();
        Ok(Rect::new(r.left(), r.top(), r.right(), r.bottom()))
    }

    fn apply_offset(&self, offset: f64) {
        let _ = self
            .element
            .style()
            .set_property(self.write.property(), &self.write.value(offset));
    }

    fn clear_offset(&self) {
        let _ = self.element.style().remove_property(self.write.property());
    }
}
