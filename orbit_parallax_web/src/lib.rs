// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for `orbit_parallax`.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`DomElement`]: `HtmlElement` participants, offsets written as inline
//!   CSS (see [`TransformWrite`])
//! - [`WindowDriver`]: window scroll/resize listeners coalesced into
//!   `requestAnimationFrame`
//! - [`create`] / [`shared`]: scheduler construction, including the lazily
//!   created per-thread instance most pages use
//! - [`register_parallax`]: the JavaScript-facing entry point
//!
//! ```rust,ignore
//! let scheduler = orbit_parallax_web::shared();
//! let id = scheduler.register(0.5, DomElement::new(el, TransformWrite::Replace))?;
//! // ... on unmount
//! scheduler.release(id);
//! ```

mod driver;
mod element;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use orbit_parallax::{ParallaxScheduler, ParticipantId, SchedulerConfig};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

pub use driver::WindowDriver;
pub use element::{DomElement, TransformWrite};
pub use orbit_parallax::{ParallaxElement, ViewportDriver};

/// A scheduler driving DOM elements from the window's scroll position.
pub type WebScheduler = ParallaxScheduler<DomElement, WindowDriver>;

thread_local! {
    static SHARED: RefCell<Option<Rc<WebScheduler>>> = const { RefCell::new(None) };
}

/// Creates a scheduler bound to the current window.
///
/// The scheduler stays idle until its first registration.
#[must_use]
pub fn create(config: SchedulerConfig) -> Rc<WebScheduler> {
    Rc::new_cyclic(|weak| ParallaxScheduler::new(config, WindowDriver::new(Weak::clone(weak))))
}

/// Returns the per-thread shared scheduler, creating it with
/// [`SchedulerConfig::web`] on first use.
#[must_use]
pub fn shared() -> Rc<WebScheduler> {
    SHARED.with(|slot| {
        let mut slot = slot.borrow_mut();
        Rc::clone(slot.get_or_insert_with(|| create(SchedulerConfig::web())))
    })
}

/// Destroys the shared scheduler, if one exists. The next [`shared`] call
/// creates a fresh one; handles from the old instance become no-ops.
pub fn reset_shared() {
    let old = SHARED.with(|slot| slot.borrow_mut().take());
    if let Some(scheduler) = old {
        scheduler.destroy();
    }
}

/// Registers `element` with the shared scheduler.
///
/// With `compose` set, offsets are written to the CSS `translate` property
/// and combine with the element's own `transform`; otherwise the whole
/// `transform` is replaced.
#[wasm_bindgen(js_name = registerParallax)]
pub fn register_parallax(
    element: HtmlElement,
    speed: f64,
    compose: Option<bool>,
) -> Result<ParallaxHandle, JsError> {
    let write = if compose.unwrap_or(false) {
        TransformWrite::Translate
    } else {
        TransformWrite::Replace
    };
    let scheduler = shared();
    let id = scheduler
        .register(speed, DomElement::new(element, write))
        .map_err(|e| JsError::new(&e.to_string()))?;
    Ok(ParallaxHandle {
        scheduler: Rc::downgrade(&scheduler),
        id,
    })
}

/// A registration made from JavaScript.
///
/// Dropping the handle on the JS side does not unregister; call
/// [`unregister`](Self::unregister) on unmount.
#[wasm_bindgen]
#[derive(Debug)]
pub struct ParallaxHandle {
    scheduler: Weak<WebScheduler>,
    id: ParticipantId,
}

#[wasm_bindgen]
impl ParallaxHandle {
    /// Changes the participant's speed.
    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&self, speed: f64) -> Result<(), JsError> {
        let scheduler = self.scheduler()?;
        scheduler
            .set_speed(self.id, speed)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Re-samples the element after a layout change that did not come with
    /// a window resize.
    pub fn refresh(&self) -> Result<(), JsError> {
        let scheduler = self.scheduler()?;
        scheduler
            .refresh(self.id)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Unregisters the participant and removes the offset from its inline
    /// style. Returns `false` if it was already gone.
    pub fn unregister(&self) -> bool {
        self.scheduler
            .upgrade()
            .is_some_and(|scheduler| scheduler.release(self.id))
    }

    /// Raw handle value, stable for the life of the registration.
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> u64 {
        self.id.to_raw()
    }
}

impl ParallaxHandle {
    fn scheduler(&self) -> Result<Rc<WebScheduler>, JsError> {
        self.scheduler
            .upgrade()
            .ok_or_else(|| JsError::new("parallax scheduler was reset"))
    }
}
