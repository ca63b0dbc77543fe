// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated scroll session that exercises the tracing and diagnostics
//! pipeline.
//!
//! Registers a handful of elements on a simulated page, scrolls through it,
//! resizes the viewport halfway, and detaches one element near the end. Events
//! go to both a [`PrettyPrintSink`](orbit_debug::pretty::PrettyPrintSink) on
//! stdout and a [`RecorderSink`](orbit_debug::recorder::RecorderSink), which
//! is then exported as JSON Lines.

use std::cell::RefCell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use orbit_debug::Tee;
use orbit_debug::pretty::PrettyPrintSink;
use orbit_debug::recorder::RecorderSink;
use orbit_parallax::{ParallaxScheduler, SchedulerConfig};
use orbit_sim::SimPage;

const SCROLL_STEP: f64 = 120.0;
const PAGE_HEIGHT: f64 = 4000.0;

fn main() {
    // -- sinks -------------------------------------------------------------
    let pretty = PrettyPrintSink::with_writer(Box::new(std::io::stdout()));
    let recorder = Rc::new(RefCell::new(RecorderSink::new()));

    // -- scheduler ---------------------------------------------------------
    let page = SimPage::new(800.0);
    let scheduler = ParallaxScheduler::new(SchedulerConfig::web(), page.driver());
    scheduler.set_trace_sink(Box::new(Tee::new(pretty, Rc::clone(&recorder))));

    // -- participants ------------------------------------------------------
    let layers = [
        (600.0, 400.0, 0.2),
        (1400.0, 300.0, 0.5),
        (2200.0, 500.0, -0.3),
        (3100.0, 250.0, 1.0),
    ];
    let elements: Vec<_> = layers
        .iter()
        .map(|&(top, height, speed)| {
            let el = page.element(top, height);
            let id = scheduler
                .register(speed, el.clone())
                .expect("simulated elements are attached");
            (id, el)
        })
        .collect();

    // -- simulated session -------------------------------------------------
    let mut y = 0.0;
    let mut resized = false;
    while y <= PAGE_HEIGHT {
        if !resized && y >= PAGE_HEIGHT / 2.0 {
            page.resize(&scheduler, 600.0);
            resized = true;
        }
        if y >= PAGE_HEIGHT * 0.75 {
            elements[2].1.set_detached(true);
        }
        page.scroll_to(&scheduler, y);
        y += SCROLL_STEP;
    }

    for (id, _) in &elements {
        scheduler.unregister(*id);
    }

    // -- export JSON Lines -------------------------------------------------
    let path = "parallax_trace.jsonl";
    let file = File::create(path).expect("failed to create trace file");
    let mut writer = BufWriter::new(file);
    let recorder = recorder.borrow();
    orbit_debug::export::export_json_lines(recorder.events(), &mut writer)
        .expect("failed to write trace");

    let ticks = recorder.ticks().count();
    println!("Wrote {path} ({} events, {ticks} ticks)", recorder.events().len());
}
