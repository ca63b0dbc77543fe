// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Participant identity and the registration-ordered registry.
//!
//! Participants occupy slots in a [`Registry`]. Removed participants free
//! their slot for reuse, and a per-slot generation counter ensures a handle
//! to a removed participant never resolves to whoever reuses the slot.
//! Iteration follows registration order, independent of slot reuse.

use alloc::vec::Vec;
use core::fmt;

use crate::range::VisibilityRange;

/// A handle to a registered participant.
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a participant is removed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticipantId {
    /// Slot index into the registry.
    pub(crate) idx: u32,
    /// Generation counter, must match the registry's generation for this slot.
    pub(crate) generation: u32,
}

impl ParticipantId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Packs the handle into a `u64` for hosts that cannot hold Rust values.
    #[inline]
    #[must_use]
    pub const fn to_raw(self) -> u64 {
        ((self.generation as u64) << 32) | self.idx as u64
    }

    /// Unpacks a handle produced by [`to_raw`](Self::to_raw).
    ///
    /// Any `u64` is accepted; a value that was never issued simply fails to
    /// resolve.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "deliberately splitting a u64 into two u32 halves"
        )]
        let (idx, generation) = (raw as u32, (raw >> 32) as u32);
        Self { idx, generation }
    }
}

impl fmt::Debug for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParticipantId({}@gen{})", self.idx, self.generation)
    }
}

/// Public snapshot of one participant, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticipantInfo {
    /// The participant's handle.
    pub id: ParticipantId,
    /// Current speed.
    pub speed: f64,
    /// Cached visibility range, `None` if the participant is inert.
    pub range: Option<VisibilityRange>,
}

/// Registration record owned by the scheduler.
#[derive(Clone, Debug)]
pub(crate) struct Participant<E> {
    pub(crate) element: E,
    pub(crate) speed: f64,
    pub(crate) range: Option<VisibilityRange>,
}

/// Slot storage for participants with registration-order iteration.
#[derive(Debug)]
pub(crate) struct Registry<E> {
    slots: Vec<Option<Participant<E>>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    /// Occupied slot indices in registration order.
    order: Vec<u32>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            order: Vec::new(),
        }
    }
}

impl<E> Registry<E> {
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn insert(&mut self, participant: Participant<E>) -> ParticipantId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx as usize] = Some(participant);
            idx
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "participant counts stay far below u32::MAX"
            )]
            let idx = self.slots.len() as u32;
            self.slots.push(Some(participant));
            self.generation.push(0);
            idx
        };
        self.order.push(idx);
        ParticipantId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn remove(&mut self, id: ParticipantId) -> Option<Participant<E>> {
        if !self.contains(id) {
            return None;
        }
        let taken = self.slots[id.idx as usize].take();
        // Bump generation so old handles immediately fail validation.
        self.generation[id.idx as usize] = self.generation[id.idx as usize].wrapping_add(1);
        self.free_list.push(id.idx);
        self.order.retain(|&idx| idx != id.idx);
        taken
    }

    pub(crate) fn contains(&self, id: ParticipantId) -> bool {
        (id.idx as usize) < self.slots.len()
            && self.generation[id.idx as usize] == id.generation
            && self.slots[id.idx as usize].is_some()
    }

    pub(crate) fn get(&self, id: ParticipantId) -> Option<&Participant<E>> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.idx as usize].as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: ParticipantId) -> Option<&mut Participant<E>> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.idx as usize].as_mut()
    }

    /// Iterates participants in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (ParticipantId, &Participant<E>)> + '_ {
        self.order.iter().filter_map(|&idx| {
            let participant = self.slots[idx as usize].as_ref()?;
            Some((
                ParticipantId {
                    idx,
                    generation: self.generation[idx as usize],
                },
                participant,
            ))
        })
    }

    /// Removes every participant, invalidating all outstanding handles.
    ///
    /// Returns the removed handles in registration order.
    pub(crate) fn clear(&mut self) -> Vec<ParticipantId> {
        let mut removed = Vec::with_capacity(self.order.len());
        for idx in self.order.drain(..) {
            let slot = idx as usize;
            removed.push(ParticipantId {
                idx,
                generation: self.generation[slot],
            });
            self.slots[slot] = None;
            self.generation[slot] = self.generation[slot].wrapping_add(1);
            self.free_list.push(idx);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(speed: f64) -> Participant<()> {
        Participant {
            element: (),
            speed,
            range: None,
        }
    }

    #[test]
    fn insert_and_remove() {
        let mut reg = Registry::default();
        let a = reg.insert(record(0.5));
        assert!(reg.contains(a));
        assert_eq!(reg.len(), 1);
        assert!(reg.remove(a).is_some());
        assert!(!reg.contains(a));
        assert!(reg.is_empty());
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut reg = Registry::default();
        let a = reg.insert(record(0.5));
        reg.remove(a);
        let b = reg.insert(record(0.8));
        // b reuses the same slot but has a different generation.
        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert!(reg.get(a).is_none());
        assert_eq!(reg.get(b).map(|p| p.speed), Some(0.8));
        assert!(reg.remove(a).is_none());
        assert!(reg.contains(b));
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut reg = Registry::default();
        let a = reg.insert(record(0.1));
        let b = reg.insert(record(0.2));
        let c = reg.insert(record(0.3));
        reg.remove(a);
        // d reuses a's slot but must come last.
        let d = reg.insert(record(0.4));
        let ids: Vec<_> = reg.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, [b, c, d]);
    }

    #[test]
    fn clear_invalidates_handles() {
        let mut reg = Registry::default();
        let a = reg.insert(record(0.1));
        let b = reg.insert(record(0.2));
        assert_eq!(reg.clear(), [a, b]);
        assert!(reg.is_empty());
        assert!(!reg.contains(a));
        assert!(!reg.contains(b));
        let c = reg.insert(record(0.3));
        assert!(reg.contains(c));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn raw_round_trip_preserves_identity() {
        let mut reg = Registry::default();
        let a = reg.insert(record(0.1));
        reg.remove(a);
        let b = reg.insert(record(0.2));
        let raw = b.to_raw();
        assert_eq!(ParticipantId::from_raw(raw), b);
        assert_ne!(ParticipantId::from_raw(raw), a);
    }

    #[test]
    fn unknown_raw_handle_does_not_resolve() {
        let reg: Registry<()> = Registry::default();
        assert!(!reg.contains(ParticipantId::from_raw(u64::MAX)));
    }
}
