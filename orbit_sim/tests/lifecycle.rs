// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subscription lifecycle across register/unregister interleavings.

use std::rc::{Rc, Weak};

use orbit_parallax::scheduler::SchedulerState;
use orbit_parallax::trace::{RegisterEvent, TraceSink};
use orbit_parallax::{ParallaxScheduler, ParticipantId, SchedulerConfig};
use orbit_sim::{SimDriver, SimElement, SimPage};

type Scheduler = ParallaxScheduler<SimElement, SimDriver>;

fn setup() -> (SimPage, Scheduler) {
    let page = SimPage::new(800.0);
    let scheduler = ParallaxScheduler::new(SchedulerConfig::web(), page.driver());
    (page, scheduler)
}

fn check_invariant(page: &SimPage, scheduler: &Scheduler) {
    assert_eq!(page.is_running(), !scheduler.is_empty());
    assert_eq!(scheduler.is_subscribed(), !scheduler.is_empty());
    let expected = if scheduler.is_empty() {
        SchedulerState::Idle
    } else {
        SchedulerState::Active
    };
    assert_eq!(scheduler.state(), expected);
}

#[test]
fn idle_until_first_registration() {
    let (page, scheduler) = setup();
    check_invariant(&page, &scheduler);
    assert_eq!(page.starts(), 0);
    assert_eq!(page.scroll_to(&scheduler, 100.0), None);
}

#[test]
fn interleaved_sequences_keep_subscription_in_sync() {
    let (page, scheduler) = setup();
    let mut live: Vec<ParticipantId> = Vec::new();

    // Deterministic pseudo-random walk over register/unregister.
    let mut seed: u32 = 0x9e37_79b9;
    for step in 0..400 {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let register = live.is_empty() || seed % 3 != 0;
        if register && live.len() < 6 {
            let top = f64::from(step % 40) * 150.0;
            let id = scheduler
                .register(0.5, page.element(top, 120.0))
                .expect("registration");
            live.push(id);
        } else {
            let victim = live.remove(seed as usize % live.len());
            assert!(scheduler.unregister(victim));
            // A second unmount of the same handle is harmless.
            assert!(!scheduler.unregister(victim));
        }
        check_invariant(&page, &scheduler);
    }

    for id in live.drain(..) {
        scheduler.unregister(id);
        check_invariant(&page, &scheduler);
    }
    // SimDriver panics on any double start or stop, so equal counts mean
    // every Idle→Active transition was matched by exactly one Active→Idle.
    assert_eq!(page.starts(), page.stops());
    assert!(page.starts() >= 1);
}

#[test]
fn failed_first_registration_does_not_subscribe() {
    let (page, scheduler) = setup();
    let el = page.element(0.0, 100.0);
    el.set_detached(true);
    assert!(scheduler.register(0.5, el).is_err());
    check_invariant(&page, &scheduler);
    assert_eq!(page.starts(), 0);
}

#[test]
fn destroy_releases_subscription_and_allows_reuse() {
    let (page, scheduler) = setup();
    let a = scheduler.register(0.5, page.element(0.0, 100.0)).unwrap();
    scheduler.register(0.5, page.element(500.0, 100.0)).unwrap();
    scheduler.destroy();
    check_invariant(&page, &scheduler);
    assert_eq!(page.stops(), 1);
    assert!(!scheduler.unregister(a));

    scheduler.register(0.5, page.element(0.0, 100.0)).unwrap();
    check_invariant(&page, &scheduler);
    assert_eq!(page.starts(), 2);
}

#[test]
fn stale_handle_does_not_touch_slot_reuser() {
    let (page, scheduler) = setup();
    let a = scheduler.register(0.5, page.element(0.0, 100.0)).unwrap();
    scheduler.unregister(a);
    let b = scheduler.register(0.5, page.element(0.0, 100.0)).unwrap();
    assert_eq!(a.index(), b.index());
    assert!(!scheduler.unregister(a));
    assert!(scheduler.contains(b));
    check_invariant(&page, &scheduler);
}

#[test]
fn raw_handles_round_trip_through_the_scheduler() {
    let (page, scheduler) = setup();
    let id = scheduler.register(0.5, page.element(0.0, 100.0)).unwrap();
    let raw = id.to_raw();
    assert!(scheduler.unregister(ParticipantId::from_raw(raw)));
    check_invariant(&page, &scheduler);
}

/// A sink that unregisters every participant as soon as it is announced.
struct EvictOnRegister {
    scheduler: Weak<Scheduler>,
}

impl TraceSink for EvictOnRegister {
    fn on_register(&mut self, e: &RegisterEvent) {
        if let Some(scheduler) = self.scheduler.upgrade() {
            assert!(scheduler.unregister(e.participant));
        }
    }
}

#[test]
fn removal_during_registration_leaves_driver_stopped() {
    let page = SimPage::new(800.0);
    let scheduler = Rc::new(ParallaxScheduler::new(SchedulerConfig::web(), page.driver()));
    scheduler.set_trace_sink(Box::new(EvictOnRegister {
        scheduler: Rc::downgrade(&scheduler),
    }));

    let el = page.element(0.0, 100.0);
    let id = scheduler.register(0.5, el.clone()).unwrap();
    assert!(!scheduler.contains(id));
    check_invariant(&page, &scheduler);
    assert_eq!((page.starts(), page.stops()), (1, 1));
    // The removed participant is not primed.
    assert_eq!(el.writes(), 0);

    scheduler.take_trace_sink();
    scheduler.register(0.5, page.element(0.0, 100.0)).unwrap();
    check_invariant(&page, &scheduler);
    assert_eq!(page.starts(), 2);
}

#[test]
fn release_clears_offset_and_stops_driver() {
    let (page, scheduler) = setup();
    let el = page.element(1000.0, 200.0);
    let id = scheduler.register(0.5, el.clone()).unwrap();
    page.scroll_to(&scheduler, 900.0);
    assert!(el.last_offset().is_some());

    assert!(scheduler.release(id));
    assert_eq!(el.resets(), 1);
    assert_eq!(el.last_offset(), None);
    check_invariant(&page, &scheduler);

    assert!(!scheduler.release(id));
    assert_eq!(el.resets(), 1);
}

#[test]
fn plain_unregister_keeps_last_offset() {
    let (page, scheduler) = setup();
    let el = page.element(1000.0, 200.0);
    let id = scheduler.register(0.5, el.clone()).unwrap();
    page.scroll_to(&scheduler, 900.0);
    assert!(scheduler.unregister(id));
    assert_eq!(el.resets(), 0);
    assert!(el.last_offset().is_some());
}
