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
//! Named-state tables
//!
//! A state table maps each named state to its duration, the rendering
//! attributes shown while in it, an optional side effect run on entry, and
//! the state that follows. Tables are built once from names and then
//! addressed by [`StateId`].

use crate::thinker::{ThinkerId, ThinkerList};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Duration marking a state that never advances on its own
pub const FOREVER_TICS: i32 = -1;

/// Frame bit requesting full-bright rendering
pub const FRAME_FULLBRIGHT: u32 = 0x8000;

/// Name of the terminal state at index 0
pub const NULL_STATE_NAME: &str = "NULL";

/// Index of a state in a [`StateTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub u32);

impl StateId {
    /// Terminal state: entering it removes the thinker
    pub const NULL: StateId = StateId(0);

    pub fn is_null(self) -> bool {
        self == StateId::NULL
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({})", self.0)
    }
}

/// Side effect run when a thinker enters a state
///
/// The action may mutate, retarget, re-state or remove the thinker, and may
/// register or remove others.
pub type StateAction = fn(&mut ThinkerList, &StateTable, ThinkerId);

/// One row of a [`StateTable`]
#[derive(Debug, Clone)]
pub struct StateDef {
    pub name: String,
    pub sprite: u32,
    pub frame: u32,
    /// Duration in tics, [`FOREVER_TICS`] to hold indefinitely
    pub tics: i32,
    pub action: Option<StateAction>,
    pub next: StateId,
}

/// Errors raised while resolving state names
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateTableError {
    #[error("state '{name}' is defined more than once")]
    DuplicateState { name: String },

    #[error("state '{state}' names unknown next state '{next}'")]
    UnknownNextState { state: String, next: String },

    #[error("action attached to unknown state '{name}'")]
    UnknownActionState { name: String },
}

/// Immutable table of named states
#[derive(Debug, Clone)]
pub struct StateTable {
    states: Vec<StateDef>,
    by_name: HashMap<String, StateId>,
}

impl StateTable {
    /// Start building a table; the null state is added automatically
    pub fn builder() -> StateTableBuilder {
        StateTableBuilder::new()
    }

    /// Look up a state
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this table.
    pub fn get(&self, id: StateId) -> &StateDef {
        match self.states.get(id.0 as usize) {
            Some(def) => def,
            None => panic!("{} is outside a table of {} states", id, self.states.len()),
        }
    }

    pub fn id_of(&self, name: &str) -> Option<StateId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: StateId) -> &str {
        &self.get(id).name
    }

    /// Number of states, the null state included
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.states.len()
    }
}

struct PendingState {
    name: String,
    sprite: u32,
    frame: u32,
    tics: i32,
    next: String,
}

/// Collects named states and resolves their next-state references
pub struct StateTableBuilder {
    pending: Vec<PendingState>,
    actions: Vec<(String, StateAction)>,
}

impl StateTableBuilder {
    fn new() -> Self {
        StateTableBuilder {
            pending: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Add a state; `next` may name a state added later
    pub fn state(
        mut self,
        name: impl Into<String>,
        sprite: u32,
        frame: u32,
        tics: i32,
        next: impl Into<String>,
    ) -> Self {
        self.pending.push(PendingState {
            name: name.into(),
            sprite,
            frame,
            tics,
            next: next.into(),
        });
        self
    }

    /// Attach a side effect to a named state
    pub fn action(mut self, name: impl Into<String>, action: StateAction) -> Self {
        self.actions.push((name.into(), action));
        self
    }

    pub fn build(self) -> Result<StateTable, StateTableError> {
        let mut by_name = HashMap::with_capacity(self.pending.len() + 1);
        by_name.insert(NULL_STATE_NAME.to_string(), StateId::NULL);

        for (offset, pending) in self.pending.iter().enumerate() {
            let id = StateId(offset as u32 + 1);
            if by_name.insert(pending.name.clone(), id).is_some() {
                return Err(StateTableError::DuplicateState {
                    name: pending.name.clone(),
                });
            }
        }

        let mut states = Vec::with_capacity(self.pending.len() + 1);
        states.push(StateDef {
            name: NULL_STATE_NAME.to_string(),
            sprite: 0,
            frame: 0,
            tics: FOREVER_TICS,
            action: None,
            next: StateId::NULL,
        });

        for pending in self.pending {
            let next = match by_name.get(&pending.next) {
                Some(&id) => id,
                None => {
                    return Err(StateTableError::UnknownNextState {
                        state: pending.name,
                        next: pending.next,
                    })
                }
            };
            states.push(StateDef {
                name: pending.name,
                sprite: pending.sprite,
                frame: pending.frame,
                tics: pending.tics,
                action: None,
                next,
            });
        }

        for (name, action) in self.actions {
            match by_name.get(&name) {
                Some(&id) if !id.is_null() => states[id.0 as usize].action = Some(action),
                _ => return Err(StateTableError::UnknownActionState { name }),
            }
        }

        Ok(StateTable { states, by_name })
    }
}

/// Animation payload of a state-driven thinker
///
/// `sprite` and `frame` are always the values of `state` in the table the
/// thinker is stepped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateAnimation {
    pub state: StateId,
    /// Tics left in the current state, [`FOREVER_TICS`] to hold
    pub tics: i32,
    pub sprite: u32,
    pub frame: u32,
}

impl StateAnimation {
    pub(crate) fn enter(&mut self, id: StateId, def: &StateDef) {
        self.state = id;
        self.tics = def.tics;
        self.sprite = def.sprite;
        self.frame = def.frame;
    }

    pub fn is_fullbright(&self) -> bool {
        self.frame & FRAME_FULLBRIGHT != 0
    }
}
