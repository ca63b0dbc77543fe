// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration and removal from inside an element's offset write.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Rect;
use orbit_parallax::{
    GeometryError, ParallaxElement, ParallaxScheduler, ParticipantId, SchedulerConfig,
};
use orbit_sim::{SimDriver, SimElement, SimPage};

type Hook = Box<dyn Fn()>;

/// A [`SimElement`] that runs a hook after each offset write.
#[derive(Clone)]
struct HookedElement {
    sim: SimElement,
    hook: Rc<RefCell<Option<Hook>>>,
}

impl HookedElement {
    fn new(sim: SimElement) -> Self {
        Self {
            sim,
            hook: Rc::new(RefCell::new(None)),
        }
    }

    fn set_hook(&self, hook: impl Fn() + 'static) {
        *self.hook.borrow_mut() = Some(Box::new(hook));
    }
}

impl ParallaxElement for HookedElement {
    fn bounding_rect(&self) -> Result<Rect, GeometryError> {
        self.sim.bounding_rect()
    }

    fn apply_offset(&self, offset: f64) {
        self.sim.apply_offset(offset);
        // Take the hook so it runs once and cannot recurse into itself.
        let hook = self.hook.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
    }
}

type Scheduler = ParallaxScheduler<HookedElement, SimDriver>;

fn setup() -> (SimPage, Rc<Scheduler>) {
    let page = SimPage::new(800.0);
    let mut config = SchedulerConfig::web();
    config.prime_on_register = false;
    let scheduler = Rc::new(ParallaxScheduler::new(config, page.driver()));
    (page, scheduler)
}

#[test]
fn unregistering_a_later_participant_mid_tick_skips_it() {
    let (page, scheduler) = setup();
    let first = HookedElement::new(page.element(1000.0, 200.0));
    let second = HookedElement::new(page.element(1000.0, 200.0));
    scheduler.register(0.5, first.clone()).unwrap();
    let second_id = scheduler.register(0.5, second.clone()).unwrap();

    let sched = Rc::clone(&scheduler);
    first.set_hook(move || {
        assert!(sched.unregister(second_id));
    });

    let tick = page.scroll_to(&scheduler, 900.0).unwrap();
    assert_eq!(tick.processed, 1);
    assert_eq!(first.sim.writes(), 1);
    assert_eq!(second.sim.writes(), 0, "removed participant must not be written");
    assert_eq!(scheduler.len(), 1);
}

#[test]
fn registering_mid_tick_defers_to_next_tick() {
    let (page, scheduler) = setup();
    let first = HookedElement::new(page.element(1000.0, 200.0));
    let late = HookedElement::new(page.element(1000.0, 200.0));
    scheduler.register(0.5, first.clone()).unwrap();

    let sched = Rc::clone(&scheduler);
    let added: Rc<RefCell<Option<ParticipantId>>> = Rc::new(RefCell::new(None));
    let added_slot = Rc::clone(&added);
    let late_clone = late.clone();
    first.set_hook(move || {
        let id = sched.register(0.5, late_clone.clone()).unwrap();
        *added_slot.borrow_mut() = Some(id);
    });

    let tick = page.scroll_to(&scheduler, 900.0).unwrap();
    assert_eq!(tick.processed, 1);
    assert_eq!(late.sim.writes(), 0);
    assert!(added.borrow().is_some());

    let tick = page.scroll_to(&scheduler, 900.0).unwrap();
    assert_eq!(tick.processed, 2);
    assert_eq!(late.sim.writes(), 1);
}

#[test]
fn self_removal_of_last_participant_stops_driver() {
    let (page, scheduler) = setup();
    let only = HookedElement::new(page.element(1000.0, 200.0));
    let id = scheduler.register(0.5, only.clone()).unwrap();

    let sched = Rc::clone(&scheduler);
    only.set_hook(move || {
        sched.unregister(id);
    });

    page.scroll_to(&scheduler, 900.0).unwrap();
    assert!(scheduler.is_empty());
    assert!(!page.is_running());
    assert_eq!(page.stops(), 1);
    assert_eq!(page.scroll_to(&scheduler, 950.0), None);
}

#[test]
fn speed_change_mid_tick_is_applied() {
    let (page, scheduler) = setup();
    let first = HookedElement::new(page.element(1000.0, 200.0));
    let second = HookedElement::new(page.element(1000.0, 200.0));
    scheduler.register(0.5, first.clone()).unwrap();
    let second_id = scheduler.register(0.5, second.clone()).unwrap();

    let sched = Rc::clone(&scheduler);
    first.set_hook(move || {
        sched.set_speed(second_id, 0.0).unwrap();
    });

    page.scroll_to(&scheduler, 900.0).unwrap();
    assert_eq!(scheduler.speed(second_id), Some(0.0));
    // This tick used the snapshot speed; the next one uses the new speed.
    page.scroll_to(&scheduler, 1100.0).unwrap();
    assert_eq!(second.sim.last_offset(), Some(100.0));
}
