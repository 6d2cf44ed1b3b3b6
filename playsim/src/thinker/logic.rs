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
//! Per-kind update logic
//!
//! The scheduler does not know what a door or a monster does each tick. It
//! hands every active thinker to a [`ThinkerLogic`], which receives the whole
//! list so it can register, mark, retarget and re-state thinkers freely.

use crate::thinker::{KindTag, ThinkerId, ThinkerList};

/// Update operation run once per tick for every active thinker
///
/// Implementations must never assume the list is a stable snapshot, and
/// remove thinkers only through [`ThinkerList::mark_for_deletion`].
pub trait ThinkerLogic {
    fn think(&mut self, list: &mut ThinkerList, id: ThinkerId, kind: KindTag);

    /// Get the name of this logic for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> ThinkerLogic for F
where
    F: FnMut(&mut ThinkerList, ThinkerId, KindTag),
{
    fn think(&mut self, list: &mut ThinkerList, id: ThinkerId, kind: KindTag) {
        self(list, id, kind)
    }
}

type KindHandler = Box<dyn FnMut(&mut ThinkerList, ThinkerId)>;

/// Dispatches each thinker to the handler registered for its kind
///
/// Kinds without a handler are left alone.
pub struct LogicTable {
    handlers: Vec<(KindTag, KindHandler)>,
}

impl LogicTable {
    pub fn new() -> Self {
        LogicTable {
            handlers: Vec::new(),
        }
    }

    /// Set the handler for a kind, replacing any earlier one
    pub fn on<F>(mut self, kind: KindTag, handler: F) -> Self
    where
        F: FnMut(&mut ThinkerList, ThinkerId) + 'static,
    {
        self.handlers.retain(|(tag, _)| *tag != kind);
        self.handlers.push((kind, Box::new(handler)));
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for LogicTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ThinkerLogic for LogicTable {
    fn think(&mut self, list: &mut ThinkerList, id: ThinkerId, kind: KindTag) {
        if let Some((_, handler)) = self.handlers.iter_mut().find(|(tag, _)| *tag == kind) {
            handler(list, id);
        }
    }

    fn name(&self) -> &str {
        "LogicTable"
    }
}
