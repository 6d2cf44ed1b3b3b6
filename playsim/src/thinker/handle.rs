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
//! Thinker handles
//!
//! A thinker is addressed by its arena slot plus the generation of that slot.
//! Reclaiming a slot bumps its generation, so a handle kept past reclamation
//! no longer resolves to whatever thinker reuses the slot.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generational handle to a thinker in a [`ThinkerList`](crate::thinker::ThinkerList)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThinkerId {
    index: u32,
    generation: u32,
}

impl ThinkerId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        ThinkerId { index, generation }
    }

    /// Arena slot backing this handle
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Pack into a single integer (save games, demo annotations)
    pub fn to_bits(&self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }

    /// Unpack a value produced by [`ThinkerId::to_bits`]
    pub fn from_bits(bits: u64) -> Self {
        ThinkerId {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

impl fmt::Display for ThinkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thinker({}, gen: {})", self.index, self.generation)
    }
}
