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
//! Thinkers
//!
//! A thinker is any object advanced once per tick: moving objects, sector
//! movers, light effects, scrollers, pushers and ambient emitters. This module
//! provides:
//! - Generational handles ([`ThinkerId`])
//! - The active list and its category threads ([`ThinkerList`])
//! - Reference-counted soft pointers between thinkers
//! - The tick driver and the [`ThinkerLogic`] seam for per-kind updates

pub mod category;
mod driver;
pub mod handle;
pub mod kind;
mod list;
pub mod logic;
mod record;
pub mod soft_ptr;

pub use category::{classify, Category};
pub use handle::ThinkerId;
pub use kind::{
    AmbientEmitter, Crusher, Door, Fixed, KindTag, LightEffect, LightPattern, Lift, LiftStatus,
    Mobj, MobjFlags, MoverDirection, PlaneMover, PushKind, Pusher, ScrollTarget, Scroller,
    SectorId, Surface, ThinkerKind, FRACUNIT,
};
pub use list::{Query, ThinkerList, ThinkerMut, ThinkerStats};
pub use logic::{LogicTable, ThinkerLogic};
pub use record::{PointerSlot, RemovalStatus};
pub use soft_ptr::SoftPtr;
