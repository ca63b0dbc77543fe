// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON Lines exporter.
//!
//! [`export_json_lines`] writes one JSON object per recorded event, each
//! tagged with an `event` name. Participants are written as their raw handle
//! value alongside the slot index and generation.

use std::io::{self, Write};

use serde_json::{Value, json};

use orbit_parallax::ParticipantId;
use orbit_parallax::range::VisibilityRange;
use orbit_parallax::trace::FailureStage;

use crate::recorder::RecordedEvent;

/// Writes `events` as JSON Lines.
pub fn export_json_lines(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    for event in events {
        serde_json::to_writer(&mut *writer, &to_json(event))?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Converts one event to its JSON object.
#[must_use]
pub fn to_json(event: &RecordedEvent) -> Value {
    let fields = match event {
        RecordedEvent::Register(e) => json!({
            "participant": participant(e.participant),
            "speed": e.speed,
            "range": range(&e.range),
        }),
        RecordedEvent::SpeedChange(e) => json!({
            "participant": participant(e.participant),
            "previous": e.previous,
            "speed": e.speed,
            "range": range(&e.range),
        }),
        RecordedEvent::Unregister(e) => json!({
            "participant": participant(e.participant),
            "remaining": e.remaining,
        }),
        RecordedEvent::Subscription(e) => json!({
            "active": e.active,
        }),
        RecordedEvent::Resize(e) => json!({
            "viewport_height": e.viewport_height,
            "recomputed": e.recomputed,
            "inert": e.inert,
        }),
        RecordedEvent::TickSummary(s) => json!({
            "tick_index": s.tick_index,
            "scroll_y": s.scroll_y,
            "processed": s.processed,
            "culled": s.culled,
            "failed": s.failed,
        }),
        RecordedEvent::ParticipantFailure(e) => json!({
            "participant": participant(e.participant),
            "stage": stage_name(e.stage),
            "error": e.error.to_string(),
        }),
        RecordedEvent::Offset(e) => json!({
            "tick_index": e.tick_index,
            "participant": participant(e.participant),
            "offset": e.offset,
        }),
    };

    let mut obj = json!({ "event": event.name() });
    if let (Value::Object(out), Value::Object(fields)) = (&mut obj, fields) {
        out.extend(fields);
    }
    obj
}

fn participant(id: ParticipantId) -> Value {
    json!({
        "raw": id.to_raw(),
        "index": id.index(),
        "generation": id.generation(),
    })
}

fn range(r: &VisibilityRange) -> Value {
    json!({
        "start": r.start,
        "end": r.end,
        "max_travel": r.max_travel,
    })
}

fn stage_name(stage: FailureStage) -> &'static str {
    match stage {
        FailureStage::Tick => "tick",
        FailureStage::Resize => "resize",
        FailureStage::Refresh => "refresh",
    }
}
