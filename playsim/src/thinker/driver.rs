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
//! Tick driver
//!
//! One walk of the active list per tick. The cursor lives in the list so that
//! reclaiming the visited thinker can step it back to the predecessor, and
//! the walk then continues with whatever follows at that moment.

use crate::thinker::list::Ring;
use crate::thinker::record::SENTINEL;
use crate::thinker::{RemovalStatus, ThinkerList, ThinkerLogic};
use tracing::{debug, trace_span};

impl ThinkerList {
    /// Advance every thinker by one tick
    ///
    /// Active thinkers run `logic`; thinkers pending deletion are reclaimed
    /// once unreferenced. Each thinker linked when the walk starts is visited
    /// exactly once, in registration order. Thinkers registered during the
    /// walk first run on the next tick.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a walk.
    pub fn tick(&mut self, logic: &mut dyn ThinkerLogic) {
        assert!(self.cursor.is_none(), "tick re-entered from inside a tick walk");

        let tick = self.stats.ticks;
        let span = trace_span!("tick", tick, logic = logic.name());
        let _enter = span.enter();

        let boundary = self.next_serial();
        let reclaimed_before = self.stats.reclaimed;
        let mut updates = 0usize;
        self.cursor = Some(SENTINEL);

        while let Some(cursor) = self.cursor {
            let next = self.links(Ring::Active, cursor).next;
            if next == SENTINEL || self.serial_of(next) >= boundary {
                break;
            }
            self.cursor = Some(next);
            self.visiting = Some(next);

            let id = self.handle_at(next);
            match self.record(next).status {
                RemovalStatus::Active => {
                    updates += 1;
                    let kind = self.record(next).kind.tag();
                    logic.think(self, id, kind);
                    if self.status(id) == RemovalStatus::PendingDeletion {
                        self.reclaim_if_unreferenced(id);
                    }
                }
                RemovalStatus::PendingDeletion => {
                    self.reclaim_if_unreferenced(id);
                }
                RemovalStatus::Reclaimed => unreachable!("reclaimed thinker linked in the active list"),
            }
        }

        self.cursor = None;
        self.visiting = None;
        self.stats.ticks += 1;
        self.stats.last_tick_updates = updates;

        debug!(
            tick,
            updates,
            reclaimed = self.stats.reclaimed - reclaimed_before,
            live = self.len(),
            "tick_complete"
        );
    }
}
