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
//! Per-thinker bookkeeping stored in the arena

use crate::thinker::{Category, ThinkerId, ThinkerKind};
use serde::{Deserialize, Serialize};

/// Link value naming the sentinel of the ring being walked
pub(crate) const SENTINEL: u32 = u32::MAX;

/// Removal status of a thinker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalStatus {
    /// Ticked every walk
    Active,
    /// Marked for deletion; still linked until the walk finds it unreferenced
    PendingDeletion,
    /// Unlinked and its slot released; only stale handles observe this
    Reclaimed,
}

/// Soft pointer slots a thinker can hold on other thinkers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerSlot {
    /// Current chase or attack target; a projectile's shooter
    Target,
    /// Homing missile's prey, or an archvile's corpse
    Tracer,
    /// Previous target, resumed once the current one dies
    LastEnemy,
    /// Point source of a pusher
    Source,
}

impl PointerSlot {
    pub const COUNT: usize = 4;

    pub const ALL: [PointerSlot; PointerSlot::COUNT] = [
        PointerSlot::Target,
        PointerSlot::Tracer,
        PointerSlot::LastEnemy,
        PointerSlot::Source,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            PointerSlot::Target => 0,
            PointerSlot::Tracer => 1,
            PointerSlot::LastEnemy => 2,
            PointerSlot::Source => 3,
        }
    }
}

/// Prev/next links of one ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Links {
    pub prev: u32,
    pub next: u32,
}

impl Links {
    /// Links of an empty ring's sentinel, or of a node in no ring
    pub const DETACHED: Links = Links {
        prev: SENTINEL,
        next: SENTINEL,
    };
}

pub(crate) struct ThinkerRecord {
    pub status: RemovalStatus,
    /// Soft pointers currently aimed at this thinker
    pub refcount: u32,
    /// Thread the record is linked into, `None` until first classified
    pub category: Option<Category>,
    pub pointers: [Option<ThinkerId>; PointerSlot::COUNT],
    /// Registration order, strictly increasing along the active list
    pub serial: u64,
    pub kind: ThinkerKind,
}

impl ThinkerRecord {
    pub fn new(kind: ThinkerKind, serial: u64) -> Self {
        ThinkerRecord {
            status: RemovalStatus::Active,
            refcount: 0,
            category: None,
            pointers: [None; PointerSlot::COUNT],
            serial,
            kind,
        }
    }
}
