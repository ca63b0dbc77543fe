// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window scroll/resize driver.
//!
//! [`WindowDriver`] installs one passive `scroll` listener and one `resize`
//! listener on `window`. Listeners only request an animation frame; any
//! number of events between two frames collapse into a single
//! `requestAnimationFrame` callback, which runs after the browser has
//! committed layout for the frame. That callback runs the scheduler's resize
//! pass first (if a resize was seen) and then one scroll tick.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use orbit_parallax::ViewportDriver;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Window};

use crate::WebScheduler;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type ListenerClosure = Closure<dyn FnMut()>;
type FrameClosure = Closure<dyn FnMut(f64)>;

/// The [`ViewportDriver`] for browser windows.
///
/// Constructed by [`create`](crate::create), which wires the driver back to
/// the scheduler that owns it.
pub struct WindowDriver {
    inner: Rc<DriverInner>,
}

struct DriverInner {
    /// `None` outside a window context (e.g. a worker). The driver then
    /// reports a zero viewport and every registration is rejected.
    window: Option<Window>,

    /// The scheduler that owns this driver.
    target: Weak<WebScheduler>,

    /// Listener and frame closures, created on first start and kept until
    /// the driver is dropped so a stop from inside a callback never frees
    /// the running closure.
    scroll: RefCell<Option<ListenerClosure>>,
    resize: RefCell<Option<ListenerClosure>>,
    frame: RefCell<Option<FrameClosure>>,

    running: Cell<bool>,

    /// The pending `requestAnimationFrame` request, if any.
    raf_id: Cell<Option<i32>>,

    /// Set by the resize listener, consumed by the next frame.
    resize_pending: Cell<bool>,
}

impl WindowDriver {
    /// Creates a stopped driver for the current window.
    pub(crate) fn new(target: Weak<WebScheduler>) -> Self {
        Self {
            inner: Rc::new(DriverInner {
                window: web_sys::window(),
                target,
                scroll: RefCell::new(None),
                resize: RefCell::new(None),
                frame: RefCell::new(None),
                running: Cell::new(false),
                raf_id: Cell::new(None),
                resize_pending: Cell::new(false),
            }),
        }
    }

    fn ensure_closures(&self) {
        if self.inner.frame.borrow().is_some() {
            return;
        }

        let inner = Rc::clone(&self.inner);
        let frame = Closure::wrap(Box::new(move |_timestamp_ms: f64| {
            inner.raf_id.set(None);
            if !inner.running.get() {
                return;
            }
            let Some(scheduler) = inner.target.upgrade() else {
                return;
            };
            if inner.resize_pending.replace(false) {
                scheduler.on_resize();
            }
            // Element callbacks during the resize pass may have emptied
            // the scheduler.
            if inner.running.get() {
                scheduler.on_scroll_tick(inner.scroll_offset());
            }
        }) as Box<dyn FnMut(f64)>);

        let inner = Rc::clone(&self.inner);
        let scroll = Closure::wrap(Box::new(move || {
            inner.request_frame();
        }) as Box<dyn FnMut()>);

        let inner = Rc::clone(&self.inner);
        let resize = Closure::wrap(Box::new(move || {
            inner.resize_pending.set(true);
            inner.request_frame();
        }) as Box<dyn FnMut()>);

        *self.inner.frame.borrow_mut() = Some(frame);
        *self.inner.scroll.borrow_mut() = Some(scroll);
        *self.inner.resize.borrow_mut() = Some(resize);
    }
}

impl DriverInner {
    fn request_frame(&self) {
        if !self.running.get() || self.raf_id.get().is_some() {
            return;
        }
        if let Some(ref frame) = *self.frame.borrow() {
            let id = request_animation_frame(frame.as_ref().unchecked_ref());
            self.raf_id.set(Some(id));
        }
    }

    fn scroll_offset(&self) -> f64 {
        self.window
            .as_ref()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0)
    }
}

impl ViewportDriver for WindowDriver {
    fn start(&mut self) {
        if self.inner.running.get() {
            return;
        }
        let Some(window) = self.inner.window.as_ref() else {
            return;
        };
        self.ensure_closures();
        self.inner.running.set(true);

        let passive = AddEventListenerOptions::new();
        passive.set_passive(true);
        if let Some(ref scroll) = *self.inner.scroll.borrow() {
            let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                "scroll",
                scroll.as_ref().unchecked_ref(),
                &passive,
            );
        }
        if let Some(ref resize) = *self.inner.resize.borrow() {
            let _ = window
                .add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
        }
    }

    fn stop(&mut self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        self.inner.resize_pending.set(false);
        if let Some(id) = self.inner.raf_id.take() {
            cancel_animation_frame(id);
        }
        let Some(window) = self.inner.window.as_ref() else {
            return;
        };
        if let Some(ref scroll) = *self.inner.scroll.borrow() {
            let _ = window
                .remove_event_listener_with_callback("scroll", scroll.as_ref().unchecked_ref());
        }
        if let Some(ref resize) = *self.inner.resize.borrow() {
            let _ = window
                .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
        }
    }

    fn viewport_height(&self) -> f64 {
        self.inner
            .window
            .as_ref()
            .and_then(|w| w.inner_height().ok())
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_offset(&self) -> f64 {
        self.inner.scroll_offset()
    }
}

impl Drop for WindowDriver {
    fn drop(&mut self) {
        self.stop();
        // Break the closure -> inner reference cycles.
        self.inner.frame.borrow_mut().take();
        self.inner.scroll.borrow_mut().take();
        self.inner.resize.borrow_mut().take();
    }
}

impl core::fmt::Debug for WindowDriver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowDriver")
            .field("running", &self.inner.running.get())
            .field("frame_pending", &self.inner.raf_id.get().is_some())
            .field("resize_pending", &self.inner.resize_pending.get())
            .finish_non_exhaustive()
    }
}
