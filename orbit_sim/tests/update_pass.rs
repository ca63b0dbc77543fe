// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Culling, offsets, resize, and isolation in the update pass.

use orbit_parallax::{ParallaxScheduler, SchedulerConfig};
use orbit_sim::{SimDriver, SimElement, SimPage};

type Scheduler = ParallaxScheduler<SimElement, SimDriver>;

fn setup(config: SchedulerConfig) -> (SimPage, Scheduler) {
    let page = SimPage::new(800.0);
    let scheduler = ParallaxScheduler::new(config, page.driver());
    (page, scheduler)
}

#[test]
fn range_boundaries_are_inclusive() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    let el = page.element(1000.0, 200.0);
    scheduler.register(0.5, el.clone()).unwrap();

    for y in [149.0, 1251.0] {
        el.clear_writes();
        let tick = page.scroll_to(&scheduler, y).unwrap();
        assert_eq!(tick.processed, 0, "scroll {y}");
        assert_eq!(el.writes(), 0, "scroll {y}");
    }
    for y in [150.0, 1250.0] {
        el.clear_writes();
        let tick = page.scroll_to(&scheduler, y).unwrap();
        assert_eq!(tick.processed, 1, "scroll {y}");
        assert_eq!(el.writes(), 1, "scroll {y}");
    }
}

#[test]
fn centered_element_gets_zero_offset() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    // At scroll 700 the element's client top is 300: centered in 800px.
    let el = page.element(1000.0, 200.0);
    scheduler.register(0.5, el.clone()).unwrap();
    page.scroll_to(&scheduler, 700.0);
    assert_eq!(el.last_offset(), Some(0.0));
}

#[test]
fn element_center_on_viewport_top_gets_full_travel() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    let el = page.element(1000.0, 200.0);
    scheduler.register(0.5, el.clone()).unwrap();
    // Client top -100, center 0.
    page.scroll_to(&scheduler, 1100.0);
    assert_eq!(el.last_offset(), Some(50.0));
}

#[test]
fn offsets_never_exceed_travel_bound() {
    let (page, scheduler) = setup(SchedulerConfig::eager());
    let speeds = [-1.5, 0.0, 0.3, 1.0, 2.5];
    let elements: Vec<_> = speeds
        .iter()
        .enumerate()
        .map(|(i, &speed)| {
            let el = page.element(600.0 * i as f64, 240.0);
            scheduler.register(speed, el.clone()).unwrap();
            (speed, el)
        })
        .collect();

    let mut y = 0.0;
    while y < 4000.0 {
        page.scroll_to(&scheduler, y);
        for (speed, el) in &elements {
            let bound = (1.0_f64 - speed).abs() * 120.0;
            let offset = el.last_offset().unwrap();
            assert!(offset.abs() <= bound, "speed {speed} at {y}: {offset}");
        }
        y += 53.0;
    }
}

#[test]
fn repeated_tick_is_idempotent() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    let a = page.element(900.0, 300.0);
    let b = page.element(1200.0, 100.0);
    scheduler.register(0.2, a.clone()).unwrap();
    scheduler.register(-0.4, b.clone()).unwrap();

    page.scroll_to(&scheduler, 800.0);
    let first = (a.last_offset(), b.last_offset());
    page.scroll_to(&scheduler, 800.0);
    assert_eq!((a.last_offset(), b.last_offset()), first);
}

#[test]
fn geometry_is_resampled_every_tick() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    let el = page.element(1000.0, 200.0);
    scheduler.register(0.5, el.clone()).unwrap();
    page.scroll_to(&scheduler, 700.0);
    assert_eq!(el.last_offset(), Some(0.0));

    // Another animation moves the element up 100px without a range refresh.
    el.set_top(900.0);
    page.scroll_to(&scheduler, 700.0);
    // Client top 200, center 300: distance 0.25.
    assert_eq!(el.last_offset(), Some(12.5));
}

#[test]
fn resize_recomputes_ranges_for_unmoved_participants() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    let ids: Vec<_> = [(1000.0, 200.0, 0.5), (3000.0, 100.0, 0.0)]
        .into_iter()
        .map(|(top, h, speed)| scheduler.register(speed, page.element(top, h)).unwrap())
        .collect();

    assert_eq!(page.resize(&scheduler, 400.0), 2);
    assert_eq!(scheduler.viewport_height(), 400.0);

    let a = scheduler.visibility_range(ids[0]).unwrap();
    assert_eq!((a.start, a.end), (1000.0 - 400.0 - 50.0, 1250.0));
    let b = scheduler.visibility_range(ids[1]).unwrap();
    assert_eq!((b.start, b.end), (3000.0 - 400.0 - 50.0, 3150.0));
}

#[test]
fn resize_is_used_by_later_ticks() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    let el = page.element(1000.0, 200.0);
    scheduler.register(0.5, el.clone()).unwrap();
    // Old range starts at 150; with a 400px viewport it starts at 550.
    page.resize(&scheduler, 400.0);
    el.clear_writes();
    assert_eq!(page.scroll_to(&scheduler, 300.0).unwrap().processed, 0);
    assert_eq!(el.writes(), 0);
}

#[test]
fn broken_participant_is_isolated() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    let before = page.element(1000.0, 200.0);
    let broken = page.element(1050.0, 200.0);
    let after = page.element(1100.0, 200.0);
    for el in [&before, &broken, &after] {
        scheduler.register(0.5, el.clone()).unwrap();
    }
    broken.set_detached(true);
    before.clear_writes();
    after.clear_writes();

    let tick = page.scroll_to(&scheduler, 900.0).unwrap();
    assert_eq!(tick.failed, 1);
    assert_eq!(tick.processed, 2);
    assert_eq!(before.writes(), 1);
    assert_eq!(after.writes(), 1);
}

#[test]
fn collapsed_element_is_inert() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    let el = page.element(1000.0, 200.0);
    scheduler.register(0.5, el.clone()).unwrap();
    // Removed from layout without unregistering.
    el.set_height(0.0);
    el.clear_writes();
    let tick = page.scroll_to(&scheduler, 900.0).unwrap();
    assert_eq!(tick.processed, 0);
    assert_eq!(tick.failed, 0);
    assert_eq!(el.writes(), 0);
}

#[test]
fn speed_change_takes_effect_on_next_tick() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    let el = page.element(1000.0, 200.0);
    let id = scheduler.register(0.5, el.clone()).unwrap();
    page.scroll_to(&scheduler, 1100.0);
    assert_eq!(el.last_offset(), Some(50.0));

    scheduler.set_speed(id, 0.0).unwrap();
    page.scroll_to(&scheduler, 1100.0);
    assert_eq!(el.last_offset(), Some(100.0));
}

#[test]
fn refresh_picks_up_moved_element() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    let el = page.element(1000.0, 200.0);
    let id = scheduler.register(0.5, el.clone()).unwrap();
    el.set_top(5000.0);
    scheduler.refresh(id).unwrap();
    let range = scheduler.visibility_range(id).unwrap();
    assert_eq!(range.start, 5000.0 - 800.0 - 50.0);
}

#[test]
fn refresh_of_detached_element_reports_and_goes_inert() {
    let (page, scheduler) = setup(SchedulerConfig::web());
    let el = page.element(1000.0, 200.0);
    let id = scheduler.register(0.5, el.clone()).unwrap();
    el.set_detached(true);
    assert!(scheduler.refresh(id).is_err());
    assert_eq!(scheduler.visibility_range(id), None);
    assert!(scheduler.contains(id));
}
