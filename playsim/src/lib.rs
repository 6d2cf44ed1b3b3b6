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
//! # Playsim
//!
//! Thinker scheduling and lifecycle core for a tick-based game simulation.
//!
//! ## Features
//!
//! - **Active list**: every thinker advanced once per tick, in registration order
//! - **Deferred deletion**: marked thinkers are reclaimed only once no soft
//!   pointer refers to them
//! - **Category threads**: friends, enemies and everything else, kept in sync
//!   with health and faction changes
//! - **State stepping**: named-state animation with zero-duration cycle protection
//! - **Plugins**: versioned post-tick collaborators such as item respawn
//!
//! ## Example
//!
//! ```rust
//! use playsim::thinker::{Category, Mobj, MobjFlags, PointerSlot, ThinkerList};
//!
//! let mut list = ThinkerList::new();
//! let player = list.register(Mobj::new(1, 0, 0, 0).with_health(100));
//! let imp = list.register(
//!     Mobj::new(3001, 0, 0, 0)
//!         .with_health(60)
//!         .with_flags(MobjFlags::COUNTKILL | MobjFlags::SHOOTABLE),
//! );
//!
//! list.set_soft_pointer(imp, PointerSlot::Target, Some(player));
//! assert_eq!(list.reference_count(player), 1);
//! assert_eq!(list.query(Category::Hostile).collect::<Vec<_>>(), vec![imp]);
//! ```

/// Scheduler configuration
pub mod config;

/// Post-tick plugin system
pub mod plugins;

/// Named-state tables and stepping
pub mod state;

/// Thinker list, handles, soft pointers and the tick driver
pub mod thinker;

/// Per-level game loop
pub mod ticker;

pub use config::{ConfigError, SchedulerConfig};
pub use thinker::{Category, RemovalStatus, ThinkerId, ThinkerKind, ThinkerList, ThinkerLogic};
pub use ticker::Ticker;
