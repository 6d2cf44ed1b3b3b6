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
//! Category threads
//!
//! Besides the active list, every live thinker sits in exactly one category
//! thread. The threads let AI code look for friends or enemies without
//! scanning doors, lights and scrollers.

use crate::thinker::{MobjFlags, RemovalStatus, ThinkerKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a thinker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Marked for deletion, waiting to be reclaimed
    PendingDeletion,
    /// Everything that is not a live combatant
    Miscellaneous,
    /// Live combatant on the player's side
    Friendly,
    /// Live combatant against the player
    Hostile,
}

impl Category {
    pub const COUNT: usize = 4;

    pub const ALL: [Category; Category::COUNT] = [
        Category::PendingDeletion,
        Category::Miscellaneous,
        Category::Friendly,
        Category::Hostile,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Category::PendingDeletion => 0,
            Category::Miscellaneous => 1,
            Category::Friendly => 2,
            Category::Hostile => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::PendingDeletion => "pending_deletion",
            Category::Miscellaneous => "miscellaneous",
            Category::Friendly => "friendly",
            Category::Hostile => "hostile",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a thinker from its removal status and payload
///
/// Pending deletion outranks everything. A live object that counts as a kill
/// or carries [`MobjFlags::COMBATANT`] is a combatant, split by its faction.
pub fn classify(status: RemovalStatus, kind: &ThinkerKind) -> Category {
    if status != RemovalStatus::Active {
        return Category::PendingDeletion;
    }

    match kind {
        ThinkerKind::Mobj(mobj)
            if mobj.health > 0
                && mobj
                    .flags
                    .intersects(MobjFlags::COUNTKILL | MobjFlags::COMBATANT) =>
        {
            if mobj.flags.contains(MobjFlags::FRIEND) {
                Category::Friendly
            } else {
                Category::Hostile
            }
        }
        _ => Category::Miscellaneous,
    }
}
