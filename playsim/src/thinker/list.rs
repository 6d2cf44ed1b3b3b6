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
//! Thinker list
//!
//! The [`ThinkerList`] owns every thinker of a level. Records live in an arena
//! of slots; each slot carries two sets of prev/next links, one into the
//! active list (registration order, walked once per tick) and one into the
//! category thread the record currently belongs to. All five rings are
//! cyclic through a sentinel owned by the list, so unlinking is two index
//! writes and never needs to special-case the ends.

use crate::config::{SchedulerConfig, MAX_CAPACITY};
use crate::thinker::category::classify;
use crate::thinker::record::{Links, ThinkerRecord, SENTINEL};
use crate::thinker::{Category, RemovalStatus, ThinkerId, ThinkerKind};
use std::fmt;
use std::ops::{Deref, DerefMut};
use tracing::trace;

/// Running counters for a [`ThinkerList`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThinkerStats {
    /// Thinkers registered since level load
    pub registered: u64,
    /// Thinkers reclaimed since level load
    pub reclaimed: u64,
    /// Completed walks
    pub ticks: u64,
    /// Active thinkers whose update ran during the last walk
    pub last_tick_updates: usize,
    /// Zero-duration state cycles cut short
    pub state_cycles: u64,
}

struct Slot {
    generation: u32,
    active: Links,
    thread: Links,
    record: Option<ThinkerRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Ring {
    Active,
    Thread(Category),
}

/// Scheduler context for one level: the active list, the category threads
/// and the arena behind them
///
/// Built at level load and dropped (or [`cleared`](ThinkerList::clear)) at
/// teardown.
pub struct ThinkerList {
    slots: Vec<Slot>,
    free: Vec<u32>,
    active_head: Links,
    thread_heads: [Links; Category::COUNT],
    thread_lens: [usize; Category::COUNT],
    live: usize,
    next_serial: u64,
    /// Walk position; `Some(SENTINEL)` before the first visit
    pub(super) cursor: Option<u32>,
    /// Slot whose update is running, until it is reclaimed
    pub(super) visiting: Option<u32>,
    config: SchedulerConfig,
    pub(super) stats: ThinkerStats,
}

impl ThinkerList {
    /// Create an empty list with the default configuration
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Create an empty list
    ///
    /// The up-front reservation is clamped to [`MAX_CAPACITY`]; configs that
    /// did not go through [`SchedulerConfig::validate`] cannot force a
    /// larger allocation.
    pub fn with_config(config: SchedulerConfig) -> Self {
        ThinkerList {
            slots: Vec::with_capacity(config.initial_capacity.min(MAX_CAPACITY)),
            free: Vec::new(),
            active_head: Links::DETACHED,
            thread_heads: [Links::DETACHED; Category::COUNT],
            thread_lens: [0; Category::COUNT],
            live: 0,
            next_serial: 0,
            cursor: None,
            visiting: None,
            config,
            stats: ThinkerStats::default(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn stats(&self) -> &ThinkerStats {
        &self.stats
    }

    /// Number of linked thinkers, pending deletion included
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of thinkers in a category thread
    pub fn category_len(&self, category: Category) -> usize {
        self.thread_lens[category.index()]
    }

    /// Whether a tick walk is in progress
    pub fn is_ticking(&self) -> bool {
        self.cursor.is_some()
    }

    /// Register a thinker at the tail of the active list
    ///
    /// The thinker is classified into its category thread immediately. When
    /// called from inside a walk, the new thinker first runs on the next tick.
    pub fn register(&mut self, kind: impl Into<ThinkerKind>) -> ThinkerId {
        let kind = kind.into();
        let tag = kind.tag();
        let serial = self.next_serial;
        self.next_serial += 1;

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = self.slots.len();
                assert!(
                    index < SENTINEL as usize,
                    "thinker arena exhausted at {} slots",
                    index
                );
                self.slots.push(Slot {
                    generation: 0,
                    active: Links::DETACHED,
                    thread: Links::DETACHED,
                    record: None,
                });
                index as u32
            }
        };

        self.slots[index as usize].record = Some(ThinkerRecord::new(kind, serial));
        self.push_back(Ring::Active, index);
        let category = self.reclassify_index(index);
        self.live += 1;
        self.stats.registered += 1;

        let id = self.handle_at(index);
        if self.config.log_reclamation {
            trace!(thinker = %id, kind = tag.name(), %category, serial, "thinker_registered");
        }
        id
    }

    /// Removal status; stale handles report [`RemovalStatus::Reclaimed`]
    pub fn status(&self, id: ThinkerId) -> RemovalStatus {
        match self.resolve(id) {
            Some(index) => self.record(index).status,
            None => RemovalStatus::Reclaimed,
        }
    }

    /// Whether the handle still names a linked thinker
    pub fn contains(&self, id: ThinkerId) -> bool {
        self.resolve(id).is_some()
    }

    /// Whether the thinker is linked and not marked for deletion
    pub fn is_active(&self, id: ThinkerId) -> bool {
        self.status(id) == RemovalStatus::Active
    }

    pub fn get(&self, id: ThinkerId) -> Option<&ThinkerKind> {
        self.resolve(id).map(|index| &self.record(index).kind)
    }

    /// Mutable access to a thinker's payload
    ///
    /// The returned guard re-derives the thinker's category when dropped, so
    /// health or faction changes made through it keep the threads in sync.
    pub fn get_mut(&mut self, id: ThinkerId) -> Option<ThinkerMut<'_>> {
        let index = self.resolve(id)?;
        Some(ThinkerMut { list: self, index })
    }

    /// Mark a thinker for deletion
    ///
    /// The thinker stays linked until the tick walk finds it unreferenced.
    /// Soft pointers it holds are released now. Marking twice is the same as
    /// marking once.
    ///
    /// # Panics
    ///
    /// Panics if the handle names a reclaimed thinker.
    pub fn mark_for_deletion(&mut self, id: ThinkerId) {
        let index = self.expect_linked(id, "mark_for_deletion");
        if self.record(index).status != RemovalStatus::Active {
            return;
        }

        self.record_mut(index).status = RemovalStatus::PendingDeletion;
        self.release_pointers(index);
        self.reclassify_index(index);

        if self.config.log_reclamation {
            trace!(thinker = %id, refcount = self.record(index).refcount, "thinker_marked");
        }
    }

    /// Reclaim the thinker being visited if it is pending deletion and
    /// nothing points at it
    ///
    /// Only the tick walk may reclaim, and only the thinker it is visiting.
    /// On reclamation the walk resumes from the thinker's former predecessor.
    ///
    /// # Panics
    ///
    /// Panics when called outside a walk or for a thinker other than the one
    /// being visited.
    pub fn reclaim_if_unreferenced(&mut self, id: ThinkerId) -> bool {
        let index = self.expect_linked(id, "reclaim_if_unreferenced");
        assert!(
            self.visiting == Some(index),
            "reclaim_if_unreferenced({}) called outside the tick walk visiting it",
            id
        );

        if self.record(index).status != RemovalStatus::PendingDeletion {
            return false;
        }
        self.release_pointers(index);
        if self.record(index).refcount != 0 {
            return false;
        }

        let predecessor = self.slots[index as usize].active.prev;
        self.unlink(Ring::Active, index);
        if let Some(category) = self.record(index).category {
            self.unlink(Ring::Thread(category), index);
            self.thread_lens[category.index()] -= 1;
        }

        let slot = &mut self.slots[index as usize];
        slot.record = None;
        slot.active = Links::DETACHED;
        slot.thread = Links::DETACHED;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.live -= 1;
        self.stats.reclaimed += 1;
        self.cursor = Some(predecessor);
        self.visiting = None;

        if self.config.log_reclamation {
            trace!(thinker = %id, "thinker_reclaimed");
        }
        true
    }

    /// Move a thinker to the tail of the thread matching its current state
    ///
    /// Only the thread membership changes; the active list is untouched.
    pub fn reclassify(&mut self, id: ThinkerId) -> Category {
        let index = self.expect_linked(id, "reclassify");
        self.reclassify_index(index)
    }

    pub fn category_of(&self, id: ThinkerId) -> Option<Category> {
        self.resolve(id).and_then(|index| self.record(index).category)
    }

    /// Lazily iterate a category thread in thread order
    pub fn query(&self, category: Category) -> Query<'_> {
        Query {
            list: self,
            ring: Ring::Thread(category),
            cursor: SENTINEL,
        }
    }

    /// Step through a thread one thinker at a time
    ///
    /// `None` starts from the head. Unlike [`query`](ThinkerList::query) this
    /// holds no borrow between steps, so the caller may mutate the list while
    /// stepping. A thinker reclassified between steps continues the walk in
    /// its new thread.
    pub fn next_in(&self, category: Category, after: Option<ThinkerId>) -> Option<ThinkerId> {
        let ring = Ring::Thread(category);
        let from = match after {
            Some(id) => self.resolve(id)?,
            None => SENTINEL,
        };
        let next = self.links(ring, from).next;
        (next != SENTINEL).then(|| self.handle_at(next))
    }

    /// Every linked thinker in active list order
    pub fn iter(&self) -> impl Iterator<Item = (ThinkerId, &ThinkerKind)> + '_ {
        Query {
            list: self,
            ring: Ring::Active,
            cursor: SENTINEL,
        }
        .map(move |id| (id, &self.record(id.index()).kind))
    }

    /// Drop every thinker, as at level teardown
    ///
    /// Handles issued before the clear report [`RemovalStatus::Reclaimed`].
    ///
    /// # Panics
    ///
    /// Panics when called during a tick walk.
    pub fn clear(&mut self) {
        assert!(self.cursor.is_none(), "clear called during a tick walk");

        for slot in &mut self.slots {
            if slot.record.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            slot.active = Links::DETACHED;
            slot.thread = Links::DETACHED;
        }
        self.free = (0..self.slots.len() as u32).rev().collect();
        self.active_head = Links::DETACHED;
        self.thread_heads = [Links::DETACHED; Category::COUNT];
        self.thread_lens = [0; Category::COUNT];
        self.live = 0;
        self.stats = ThinkerStats::default();
    }

    pub(crate) fn note_state_cycle(&mut self) {
        self.stats.state_cycles += 1;
    }

    pub(super) fn resolve(&self, id: ThinkerId) -> Option<u32> {
        let slot = self.slots.get(id.index() as usize)?;
        (slot.generation == id.generation() && slot.record.is_some()).then_some(id.index())
    }

    pub(super) fn expect_linked(&self, id: ThinkerId, operation: &str) -> u32 {
        match self.resolve(id) {
            Some(index) => index,
            None => panic!("{}: {} has been reclaimed", operation, id),
        }
    }

    pub(super) fn handle_at(&self, index: u32) -> ThinkerId {
        ThinkerId::new(index, self.slots[index as usize].generation)
    }

    pub(super) fn record(&self, index: u32) -> &ThinkerRecord {
        match self.slots.get(index as usize).and_then(|slot| slot.record.as_ref()) {
            Some(record) => record,
            None => panic!("thinker slot {} is empty", index),
        }
    }

    pub(super) fn record_mut(&mut self, index: u32) -> &mut ThinkerRecord {
        match self
            .slots
            .get_mut(index as usize)
            .and_then(|slot| slot.record.as_mut())
        {
            Some(record) => record,
            None => panic!("thinker slot {} is empty", index),
        }
    }

    pub(super) fn links(&self, ring: Ring, index: u32) -> Links {
        match (ring, index) {
            (Ring::Active, SENTINEL) => self.active_head,
            (Ring::Thread(category), SENTINEL) => self.thread_heads[category.index()],
            (Ring::Active, index) => self.slots[index as usize].active,
            (Ring::Thread(_), index) => self.slots[index as usize].thread,
        }
    }

    fn links_mut(&mut self, ring: Ring, index: u32) -> &mut Links {
        match (ring, index) {
            (Ring::Active, SENTINEL) => &mut self.active_head,
            (Ring::Thread(category), SENTINEL) => &mut self.thread_heads[category.index()],
            (Ring::Active, index) => &mut self.slots[index as usize].active,
            (Ring::Thread(_), index) => &mut self.slots[index as usize].thread,
        }
    }

    fn push_back(&mut self, ring: Ring, index: u32) {
        let tail = self.links(ring, SENTINEL).prev;
        *self.links_mut(ring, index) = Links {
            prev: tail,
            next: SENTINEL,
        };
        self.links_mut(ring, tail).next = index;
        self.links_mut(ring, SENTINEL).prev = index;
    }

    fn unlink(&mut self, ring: Ring, index: u32) {
        let Links { prev, next } = self.links(ring, index);
        self.links_mut(ring, prev).next = next;
        self.links_mut(ring, next).prev = prev;
    }

    pub(super) fn serial_of(&self, index: u32) -> u64 {
        self.record(index).serial
    }

    pub(super) fn next_serial(&self) -> u64 {
        self.next_serial
    }

    fn reclassify_index(&mut self, index: u32) -> Category {
        let record = self.record(index);
        let category = classify(record.status, &record.kind);
        let previous = record.category;

        if let Some(old) = previous {
            self.unlink(Ring::Thread(old), index);
            self.thread_lens[old.index()] -= 1;
        }
        self.push_back(Ring::Thread(category), index);
        self.thread_lens[category.index()] += 1;
        self.record_mut(index).category = Some(category);
        category
    }

    fn refresh_category(&mut self, index: u32) {
        let record = self.record(index);
        if record.category != Some(classify(record.status, &record.kind)) {
            self.reclassify_index(index);
        }
    }
}

impl Default for ThinkerList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ThinkerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThinkerList")
            .field("live", &self.live)
            .field("threads", &self.thread_lens)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Lazy iterator over one ring of a [`ThinkerList`]
pub struct Query<'a> {
    list: &'a ThinkerList,
    ring: Ring,
    cursor: u32,
}

impl Iterator for Query<'_> {
    type Item = ThinkerId;

    fn next(&mut self) -> Option<ThinkerId> {
        let next = self.list.links(self.ring, self.cursor).next;
        if next == SENTINEL {
            return None;
        }
        self.cursor = next;
        Some(self.list.handle_at(next))
    }
}

/// Guard for mutable payload access
///
/// Dropping the guard moves the thinker to another category thread if the
/// edit changed its classification.
pub struct ThinkerMut<'a> {
    list: &'a mut ThinkerList,
    index: u32,
}

impl ThinkerMut<'_> {
    pub fn id(&self) -> ThinkerId {
        self.list.handle_at(self.index)
    }
}

impl Deref for ThinkerMut<'_> {
    type Target = ThinkerKind;

    fn deref(&self) -> &ThinkerKind {
        &self.list.record(self.index).kind
    }
}

impl DerefMut for ThinkerMut<'_> {
    fn deref_mut(&mut self) -> &mut ThinkerKind {
        &mut self.list.record_mut(self.index).kind
    }
}

impl Drop for ThinkerMut<'_> {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            self.list.refresh_category(self.index);
        }
    }
}
