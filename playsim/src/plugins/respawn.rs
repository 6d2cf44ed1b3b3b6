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
//! Item respawn queue
//!
//! In respawning game modes a picked-up item comes back after a fixed delay.
//! The plugin keeps a bounded FIFO of item templates stamped with the level
//! time they were taken, and after each tick walk re-registers every item
//! whose delay has elapsed as a fresh thinker. The queue is drained in FIFO
//! order only, so with a constant delay items come back in the order they
//! were taken.

use crate::plugins::{Plugin, PluginContext};
use crate::thinker::{Mobj, MobjFlags, ThinkerId, ThinkerList};
use std::any::Any;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Simulation rate in tics per second
pub const TICRATE: u64 = 35;

/// Default delay before an item returns: 30 seconds
pub const DEFAULT_RESPAWN_DELAY: u64 = 30 * TICRATE;

/// Default number of items waiting to respawn
pub const DEFAULT_QUEUE_CAPACITY: usize = 128;

/// Name the plugin registers under
pub const ITEM_RESPAWN_PLUGIN: &str = "item_respawn";

#[derive(Debug, Clone)]
struct PendingItem {
    taken_at: u64,
    template: Mobj,
}

/// Post-tick plugin re-registering picked-up items
pub struct ItemRespawnPlugin {
    delay: u64,
    capacity: usize,
    queue: VecDeque<PendingItem>,
    respawned: u64,
    dropped: u64,
}

impl ItemRespawnPlugin {
    /// Create a plugin with the default delay and queue capacity
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_RESPAWN_DELAY, DEFAULT_QUEUE_CAPACITY)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_settings(delay: u64, capacity: usize) -> Self {
        assert!(capacity > 0, "Respawn queue capacity must be positive");
        ItemRespawnPlugin {
            delay,
            capacity,
            queue: VecDeque::with_capacity(capacity),
            respawned: 0,
            dropped: 0,
        }
    }

    pub fn delay(&self) -> u64 {
        self.delay
    }

    /// Items waiting to respawn
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Items re-registered so far
    pub fn respawned(&self) -> u64 {
        self.respawned
    }

    /// Items discarded because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Queue an item template taken at `level_time`
    ///
    /// When the queue is full the oldest entry is discarded.
    pub fn schedule(&mut self, level_time: u64, template: Mobj) {
        if self.queue.len() == self.capacity {
            if let Some(oldest) = self.queue.pop_front() {
                self.dropped += 1;
                warn!(
                    mobj_type = oldest.template.mobj_type,
                    taken_at = oldest.taken_at,
                    capacity = self.capacity,
                    "respawn_queue_full"
                );
            }
        }
        self.queue.push_back(PendingItem {
            taken_at: level_time,
            template,
        });
    }

    /// Remove a picked-up item and queue it for respawn
    ///
    /// Items dropped by monsters are removed without being queued. Returns
    /// whether the item was queued; thinkers that are not live pickups are
    /// left untouched.
    pub fn pick_up(&mut self, list: &mut ThinkerList, id: ThinkerId, level_time: u64) -> bool {
        if !list.is_active(id) {
            return false;
        }
        let template = match list.get(id).and_then(|kind| kind.as_mobj()) {
            Some(mobj) if mobj.flags.contains(MobjFlags::SPECIAL) => mobj.clone(),
            _ => return false,
        };

        list.mark_for_deletion(id);
        if template.flags.contains(MobjFlags::DROPPED) {
            return false;
        }
        self.schedule(level_time, template);
        true
    }

    fn respawn_due(&mut self, list: &mut ThinkerList, level_time: u64) -> usize {
        let mut count = 0;
        while let Some(front) = self.queue.front() {
            if level_time < front.taken_at.saturating_add(self.delay) {
                break;
            }
            if let Some(item) = self.queue.pop_front() {
                let id = list.register(item.template);
                debug!(thinker = %id, taken_at = item.taken_at, level_time, "item_respawned");
                count += 1;
            }
        }
        self.respawned += count as u64;
        count
    }
}

impl Default for ItemRespawnPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ItemRespawnPlugin {
    fn name(&self) -> &str {
        ITEM_RESPAWN_PLUGIN
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn post_tick(&mut self, context: &mut PluginContext) -> Result<(), String> {
        let level_time = context.level_time();
        self.respawn_due(context.list_mut(), level_time);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), String> {
        self.queue.clear();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thinker::{Category, RemovalStatus};

    fn medikit() -> Mobj {
        Mobj::new(2012, 64, 64, 0).with_flags(MobjFlags::SPECIAL)
    }

    #[test]
    fn test_default_settings() {
        let plugin = ItemRespawnPlugin::new();
        assert_eq!(plugin.delay(), 1050);
        assert_eq!(plugin.pending(), 0);
        assert_eq!(plugin.name(), ITEM_RESPAWN_PLUGIN);
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_zero_capacity_panics() {
        ItemRespawnPlugin::with_settings(10, 0);
    }

    #[test]
    fn test_item_returns_after_delay() {
        let mut plugin = ItemRespawnPlugin::with_settings(10, 4);
        let mut list = ThinkerList::new();
        plugin.schedule(5, medikit());

        assert_eq!(plugin.respawn_due(&mut list, 14), 0);
        assert!(list.is_empty());

        assert_eq!(plugin.respawn_due(&mut list, 15), 1);
        assert_eq!(list.len(), 1);
        assert_eq!(plugin.pending(), 0);
        assert_eq!(plugin.respawned(), 1);
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let mut plugin = ItemRespawnPlugin::with_settings(10, 2);
        let mut list = ThinkerList::new();
        plugin.schedule(0, Mobj::new(1, 0, 0, 0));
        plugin.schedule(1, Mobj::new(2, 0, 0, 0));
        plugin.schedule(2, Mobj::new(3, 0, 0, 0));

        assert_eq!(plugin.pending(), 2);
        assert_eq!(plugin.dropped(), 1);

        plugin.respawn_due(&mut list, 100);
        let types: Vec<u16> = list
            .iter()
            .filter_map(|(_, kind)| kind.as_mobj().map(|m| m.mobj_type))
            .collect();
        assert_eq!(types, vec![2, 3]);
    }

    #[test]
    fn test_pick_up_marks_and_queues() {
        let mut plugin = ItemRespawnPlugin::with_settings(10, 4);
        let mut list = ThinkerList::new();
        let item = list.register(medikit());

        assert!(plugin.pick_up(&mut list, item, 3));
        assert_eq!(list.status(item), RemovalStatus::PendingDeletion);
        assert_eq!(list.category_of(item), Some(Category::PendingDeletion));
        assert_eq!(plugin.pending(), 1);

        assert!(!plugin.pick_up(&mut list, item, 4));
        assert_eq!(plugin.pending(), 1);
    }

    #[test]
    fn test_dropped_items_do_not_respawn() {
        let mut plugin = ItemRespawnPlugin::with_settings(10, 4);
        let mut list = ThinkerList::new();
        let clip = list.register(medikit().with_flags(MobjFlags::SPECIAL | MobjFlags::DROPPED));

        assert!(!plugin.pick_up(&mut list, clip, 0));
        assert!(!list.is_active(clip));
        assert_eq!(plugin.pending(), 0);
    }

    #[test]
    fn test_non_items_are_ignored() {
        let mut plugin = ItemRespawnPlugin::new();
        let mut list = ThinkerList::new();
        let trooper = list.register(Mobj::new(3004, 0, 0, 0).with_health(20));

        assert!(!plugin.pick_up(&mut list, trooper, 0));
        assert!(list.is_active(trooper));
    }
}
