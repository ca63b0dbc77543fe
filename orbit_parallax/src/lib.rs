// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport-synchronized parallax scheduling.
//!
//! `orbit_parallax` coordinates scroll-driven vertical offsets across any
//! number of registered elements. It is `no_std` compatible (with `alloc`)
//! and knows nothing about the DOM: elements and the scroll/resize source
//! are reached through two small traits that backend crates implement.
//!
//! # Architecture
//!
//! ```text
//!   ViewportDriver (scroll + resize source)
//!       │ scroll_y                    │ resize
//!       ▼                             ▼
//!   ParallaxScheduler::on_scroll_tick  ParallaxScheduler::on_resize
//!       │                             │
//!       │ cull by VisibilityRange     └──► recompute every VisibilityRange
//!       ▼
//!   sample geometry ──► parallax_offset() ──► ParallaxElement::apply_offset
//! ```
//!
//! **[`geometry`]**: Samples an element's bounding box into an
//! [`ElementGeometry`](geometry::ElementGeometry).
//!
//! **[`range`]**: The scroll interval over which an element can move.
//! Ticks outside that interval skip the element entirely.
//!
//! **[`offset`]**: The per-tick offset formula.
//!
//! **[`participant`]**: Generational handles and the registration-ordered
//! registry.
//!
//! **[`scheduler`]**: [`ParallaxScheduler`](scheduler::ParallaxScheduler):
//! lifecycle, registry, update pass.
//!
//! **[`backend`]**: The [`ParallaxElement`](backend::ParallaxElement) and
//! [`ViewportDriver`](backend::ViewportDriver) traits that platform backends
//! implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types with
//! a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-participant
//!   offset events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod error;
pub mod geometry;
pub mod offset;
pub mod participant;
pub mod range;
pub mod scheduler;
pub mod trace;

pub use backend::{ParallaxElement, ViewportDriver};
pub use error::{GeometryError, RegistrationError};
pub use participant::ParticipantId;
pub use scheduler::{ParallaxScheduler, SchedulerConfig};
