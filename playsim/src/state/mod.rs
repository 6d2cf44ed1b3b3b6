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
//! Named-state animation
//!
//! State tables and the stepper that moves thinkers through them.

pub mod stepper;
pub mod table;

pub use stepper::{set_state, tick_state};
pub use table::{
    StateAction, StateAnimation, StateDef, StateId, StateTable, StateTableBuilder,
    StateTableError, FOREVER_TICS, FRAME_FULLBRIGHT, NULL_STATE_NAME,
};
