// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Reference-counted soft pointers
//!
//! A soft pointer is a non-owning reference from one thinker (or from code
//! outside the list) to another. Every soft pointer aimed at a thinker counts
//! towards its reference count, and a thinker pending deletion is reclaimed
//! only once that count is zero. Counts move only through the setters in
//! this module.

use crate::thinker::{PointerSlot, ThinkerId, ThinkerList};

/// Soft pointer held outside the thinker list
///
/// Not `Clone`: copying the pointer would bypass the reference count. Move
/// it around freely, and release it with
/// [`ThinkerList::retarget`]`(&mut ptr, None)` before dropping it, or the
/// target stays pinned until the level is cleared.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SoftPtr {
    target: Option<ThinkerId>,
}

impl SoftPtr {
    pub const fn null() -> Self {
        SoftPtr { target: None }
    }

    pub fn get(&self) -> Option<ThinkerId> {
        self.target
    }

    pub fn is_null(&self) -> bool {
        self.target.is_none()
    }
}

impl ThinkerList {
    /// Point one of a thinker's slots at `target`, or clear it with `None`
    ///
    /// The new target's count is raised before the old one is lowered, so
    /// re-pointing a slot at its current target is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `holder` or `target` has been reclaimed.
    pub fn set_soft_pointer(
        &mut self,
        holder: ThinkerId,
        slot: PointerSlot,
        target: Option<ThinkerId>,
    ) {
        let holder_index = self.expect_linked(holder, "set_soft_pointer");
        self.acquire(target);
        let old = std::mem::replace(
            &mut self.record_mut(holder_index).pointers[slot.index()],
            target,
        );
        self.release(old);
    }

    /// Current target of one of a thinker's slots
    ///
    /// Returns `None` for an empty slot or a reclaimed holder.
    pub fn soft_pointer(&self, holder: ThinkerId, slot: PointerSlot) -> Option<ThinkerId> {
        let index = self.resolve(holder)?;
        self.record(index).pointers[slot.index()]
    }

    /// Re-point a soft pointer held outside the list
    ///
    /// # Panics
    ///
    /// Panics if `target` has been reclaimed.
    pub fn retarget(&mut self, ptr: &mut SoftPtr, target: Option<ThinkerId>) {
        self.acquire(target);
        let old = std::mem::replace(&mut ptr.target, target);
        self.release(old);
    }

    /// Number of soft pointers aimed at a thinker; zero for stale handles
    pub fn reference_count(&self, id: ThinkerId) -> u32 {
        self.resolve(id)
            .map_or(0, |index| self.record(index).refcount)
    }

    /// Clear every slot a thinker holds
    pub(super) fn release_pointers(&mut self, index: u32) {
        let pointers = std::mem::take(&mut self.record_mut(index).pointers);
        for target in pointers {
            self.release(target);
        }
    }

    fn acquire(&mut self, target: Option<ThinkerId>) {
        if let Some(target) = target {
            let index = self.expect_linked(target, "soft pointer target");
            self.record_mut(index).refcount += 1;
        }
    }

    fn release(&mut self, target: Option<ThinkerId>) {
        // Only a clear() can drop a referenced thinker; its pointers lapse.
        if let Some(index) = target.and_then(|target| self.resolve(target)) {
            let record = self.record_mut(index);
            debug_assert!(record.refcount > 0, "reference count underflow");
            record.refcount -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thinker::{Door, Mobj};

    #[test]
    fn test_set_and_clear_slot() {
        let mut list = ThinkerList::new();
        let a = list.register(Mobj::new(1, 0, 0, 0));
        let b = list.register(Mobj::new(2, 0, 0, 0));

        list.set_soft_pointer(a, PointerSlot::Target, Some(b));
        assert_eq!(list.soft_pointer(a, PointerSlot::Target), Some(b));
        assert_eq!(list.reference_count(b), 1);

        list.set_soft_pointer(a, PointerSlot::Target, None);
        assert_eq!(list.soft_pointer(a, PointerSlot::Target), None);
        assert_eq!(list.reference_count(b), 0);
    }

    #[test]
    fn test_repoint_same_target_is_noop() {
        let mut list = ThinkerList::new();
        let a = list.register(Mobj::new(1, 0, 0, 0));
        let b = list.register(Mobj::new(2, 0, 0, 0));

        list.set_soft_pointer(a, PointerSlot::Tracer, Some(b));
        list.set_soft_pointer(a, PointerSlot::Tracer, Some(b));
        assert_eq!(list.reference_count(b), 1);
    }

    #[test]
    fn test_repoint_moves_count() {
        let mut list = ThinkerList::new();
        let a = list.register(Mobj::new(1, 0, 0, 0));
        let b = list.register(Mobj::new(2, 0, 0, 0));
        let c = list.register(Mobj::new(3, 0, 0, 0));

        list.set_soft_pointer(a, PointerSlot::Target, Some(b));
        list.set_soft_pointer(a, PointerSlot::Target, Some(c));
        assert_eq!(list.reference_count(b), 0);
        assert_eq!(list.reference_count(c), 1);
    }

    #[test]
    fn test_self_reference_counts() {
        let mut list = ThinkerList::new();
        let a = list.register(Mobj::new(1, 0, 0, 0));
        list.set_soft_pointer(a, PointerSlot::Target, Some(a));
        assert_eq!(list.reference_count(a), 1);

        list.mark_for_deletion(a);
        assert_eq!(list.reference_count(a), 0);
        assert_eq!(list.soft_pointer(a, PointerSlot::Target), None);
    }

    #[test]
    fn test_external_pointer() {
        let mut list = ThinkerList::new();
        let door = list.register(Door::default());
        let mut ptr = SoftPtr::null();
        assert!(ptr.is_null());

        list.retarget(&mut ptr, Some(door));
        assert_eq!(ptr.get(), Some(door));
        assert_eq!(list.reference_count(door), 1);

        list.retarget(&mut ptr, None);
        assert_eq!(list.reference_count(door), 0);
        assert!(ptr.is_null());
    }

    #[test]
    fn test_mark_releases_held_slots() {
        let mut list = ThinkerList::new();
        let a = list.register(Mobj::new(1, 0, 0, 0));
        let b = list.register(Mobj::new(2, 0, 0, 0));
        list.set_soft_pointer(a, PointerSlot::Target, Some(b));
        list.set_soft_pointer(a, PointerSlot::LastEnemy, Some(b));
        assert_eq!(list.reference_count(b), 2);

        list.mark_for_deletion(a);
        assert_eq!(list.reference_count(b), 0);
    }

    #[test]
    fn test_release_after_clear() {
        let mut list = ThinkerList::new();
        let door = list.register(Door::default());
        let mut ptr = SoftPtr::null();
        list.retarget(&mut ptr, Some(door));

        list.clear();
        list.retarget(&mut ptr, None);
        assert!(ptr.is_null());
    }

    #[test]
    #[should_panic(expected = "soft pointer target")]
    fn test_stale_target_panics() {
        let mut list = ThinkerList::new();
        let _a = list.register(Mobj::new(1, 0, 0, 0));
        let b = list.register(Mobj::new(2, 0, 0, 0));
        list.clear();
        let c = list.register(Mobj::new(3, 0, 0, 0));
        list.set_soft_pointer(c, PointerSlot::Target, Some(b));
    }
}
