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
//! Thinker kinds and their payloads
//!
//! The set of kinds is closed: every thinker is exactly one [`ThinkerKind`]
//! variant, and the per-tick update is dispatched on its [`KindTag`]. Payloads
//! are plain data in 16.16 fixed point so that the same input always produces
//! the same state, bit for bit. The behavior that drives them lives outside
//! this crate.

use crate::state::StateAnimation;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// 16.16 fixed-point value
pub type Fixed = i32;

/// Fixed-point representation of 1.0
pub const FRACUNIT: Fixed = 1 << 16;

/// Index of a map sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SectorId(pub u32);

bitflags! {
    /// Behavior flags of a moving object
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MobjFlags: u32 {
        /// Pickup item
        const SPECIAL = 1 << 0;
        /// Blocks movement
        const SOLID = 1 << 1;
        /// Can be damaged
        const SHOOTABLE = 1 << 2;
        /// Not pulled down each tick
        const NOGRAVITY = 1 << 3;
        /// Dropped by a monster rather than placed by the map
        const DROPPED = 1 << 4;
        /// Dead body
        const CORPSE = 1 << 5;
        /// Counts toward the level's kill total
        const COUNTKILL = 1 << 6;
        /// Counts toward the level's item total
        const COUNTITEM = 1 << 7;
        /// Fights on the player's side
        const FRIEND = 1 << 8;
        /// Classified as a combatant while alive even without COUNTKILL
        /// (lightweight flyers such as lost souls)
        const COMBATANT = 1 << 9;
    }
}

/// A moving object: monsters, projectiles, pickups, decorations and the
/// player's own pawn
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mobj {
    /// Index into the collaborator's object-type table
    pub mobj_type: u16,
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub momx: Fixed,
    pub momy: Fixed,
    pub momz: Fixed,
    /// Binary angle, a full turn is 2^32
    pub angle: u32,
    pub health: i32,
    pub flags: MobjFlags,
    /// Tics left before the object may act again
    pub reaction_time: i32,
    /// Steps left in the current chase direction
    pub move_count: i32,
    /// Named-state animation
    pub anim: StateAnimation,
}

impl Mobj {
    /// Create an object of the given type at a map position
    pub fn new(mobj_type: u16, x: Fixed, y: Fixed, z: Fixed) -> Self {
        Mobj {
            mobj_type,
            x,
            y,
            z,
            ..Mobj::default()
        }
    }

    /// Set the starting health
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Set the behavior flags
    pub fn with_flags(mut self, flags: MobjFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the initial animation
    pub fn with_anim(mut self, anim: StateAnimation) -> Self {
        self.anim = anim;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_friendly(&self) -> bool {
        self.flags.contains(MobjFlags::FRIEND)
    }
}

/// Vertical direction of a sector mover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoverDirection {
    Down,
    #[default]
    Waiting,
    Up,
}

/// Door opening, closing or waiting at the top
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Door {
    pub sector: SectorId,
    pub direction: MoverDirection,
    pub speed: Fixed,
    pub top_height: Fixed,
    /// Tics to wait at the top before closing
    pub top_wait: i32,
    /// Tics left in the current wait
    pub countdown: i32,
}

/// State of a lift (platform)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LiftStatus {
    Up,
    Down,
    #[default]
    Waiting,
    /// Stopped by a trigger, resumable
    InStasis,
}

/// Lowering/raising platform
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lift {
    pub sector: SectorId,
    pub low: Fixed,
    pub high: Fixed,
    pub speed: Fixed,
    pub wait: i32,
    pub count: i32,
    pub status: LiftStatus,
    pub crush: bool,
}

/// Crushing ceiling
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Crusher {
    pub sector: SectorId,
    pub bottom: Fixed,
    pub top: Fixed,
    pub speed: Fixed,
    pub direction: MoverDirection,
    pub silent: bool,
}

/// Which plane of a sector a [`PlaneMover`] moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Surface {
    #[default]
    Floor,
    Ceiling,
}

/// Generic floor or ceiling mover heading to a destination height
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaneMover {
    pub sector: SectorId,
    pub surface: Surface,
    pub destination: Fixed,
    pub speed: Fixed,
    pub direction: MoverDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightPattern {
    #[default]
    Flicker,
    Strobe,
    Glow,
    FireFlicker,
}

/// Sector lighting effect
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LightEffect {
    pub sector: SectorId,
    pub pattern: LightPattern,
    pub min_light: i16,
    pub max_light: i16,
    pub count: i32,
}

/// Surface scrolled by a [`Scroller`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollTarget {
    /// Wall texture of a sidedef
    Wall(u32),
    Floor(SectorId),
    Ceiling(SectorId),
    /// Objects standing on the sector's floor are carried along
    Carry(SectorId),
}

impl Default for ScrollTarget {
    fn default() -> Self {
        ScrollTarget::Floor(SectorId::default())
    }
}

/// Texture or carrying scroller
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scroller {
    pub dx: Fixed,
    pub dy: Fixed,
    pub target: ScrollTarget,
    /// Scroll speed follows the height change of a control sector
    pub accelerative: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PushKind {
    #[default]
    Wind,
    Current,
    /// Pushes or pulls toward a source object, see [`PointerSlot::Source`]
    ///
    /// [`PointerSlot::Source`]: crate::thinker::PointerSlot::Source
    Point,
}

/// Wind, current or point pusher/puller
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pusher {
    pub kind: PushKind,
    pub sector: SectorId,
    pub x_mag: Fixed,
    pub y_mag: Fixed,
    pub magnitude: Fixed,
    pub radius: Fixed,
}

/// Ambient sound source playing at randomized intervals
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmbientEmitter {
    pub sound: u16,
    pub volume: u8,
    pub min_interval: u32,
    pub max_interval: u32,
    /// Tics until the next play
    pub countdown: u32,
}

/// Payload of a thinker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ThinkerKind {
    Mobj(Mobj),
    Door(Door),
    Lift(Lift),
    Crusher(Crusher),
    Plane(PlaneMover),
    Light(LightEffect),
    Scroller(Scroller),
    Pusher(Pusher),
    Ambient(AmbientEmitter),
}

/// Payload-free discriminant of [`ThinkerKind`], passed to the update logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindTag {
    Mobj,
    Door,
    Lift,
    Crusher,
    Plane,
    Light,
    Scroller,
    Pusher,
    Ambient,
}

impl KindTag {
    /// Lowercase name used in log fields
    pub fn name(self) -> &'static str {
        match self {
            KindTag::Mobj => "mobj",
            KindTag::Door => "door",
            KindTag::Lift => "lift",
            KindTag::Crusher => "crusher",
            KindTag::Plane => "plane",
            KindTag::Light => "light",
            KindTag::Scroller => "scroller",
            KindTag::Pusher => "pusher",
            KindTag::Ambient => "ambient",
        }
    }
}

impl ThinkerKind {
    pub fn tag(&self) -> KindTag {
        match self {
            ThinkerKind::Mobj(_) => KindTag::Mobj,
            ThinkerKind::Door(_) => KindTag::Door,
            ThinkerKind::Lift(_) => KindTag::Lift,
            ThinkerKind::Crusher(_) => KindTag::Crusher,
            ThinkerKind::Plane(_) => KindTag::Plane,
            ThinkerKind::Light(_) => KindTag::Light,
            ThinkerKind::Scroller(_) => KindTag::Scroller,
            ThinkerKind::Pusher(_) => KindTag::Pusher,
            ThinkerKind::Ambient(_) => KindTag::Ambient,
        }
    }

    /// Named-state animation, for kinds driven by a state table
    pub fn animation(&self) -> Option<&StateAnimation> {
        match self {
            ThinkerKind::Mobj(mobj) => Some(&mobj.anim),
            _ => None,
        }
    }

    pub fn animation_mut(&mut self) -> Option<&mut StateAnimation> {
        match self {
            ThinkerKind::Mobj(mobj) => Some(&mut mobj.anim),
            _ => None,
        }
    }

    pub fn as_mobj(&self) -> Option<&Mobj> {
        match self {
            ThinkerKind::Mobj(mobj) => Some(mobj),
            _ => None,
        }
    }

    pub fn as_mobj_mut(&mut self) -> Option<&mut Mobj> {
        match self {
            ThinkerKind::Mobj(mobj) => Some(mobj),
            _ => None,
        }
    }
}

macro_rules! impl_from_payload {
    ($($payload:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$payload> for ThinkerKind {
                fn from(payload: $payload) -> Self {
                    ThinkerKind::$variant(payload)
                }
            }
        )+
    };
}

impl_from_payload! {
    Mobj => Mobj,
    Door => Door,
    Lift => Lift,
    Crusher => Crusher,
    PlaneMover => Plane,
    LightEffect => Light,
    Scroller => Scroller,
    Pusher => Pusher,
    AmbientEmitter => Ambient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_matches_variant() {
        let kind: ThinkerKind = Door::default().into();
        assert_eq!(kind.tag(), KindTag::Door);
        assert_eq!(kind.tag().name(), "door");

        let kind: ThinkerKind = Mobj::new(3001, 0, 0, 0).into();
        assert_eq!(kind.tag(), KindTag::Mobj);
    }

    #[test]
    fn test_only_mobjs_are_animated() {
        let mut mobj: ThinkerKind = Mobj::default().into();
        assert!(mobj.animation().is_some());
        assert!(mobj.animation_mut().is_some());

        let light: ThinkerKind = LightEffect::default().into();
        assert!(light.animation().is_none());
        assert!(light.as_mobj().is_none());
    }

    #[test]
    fn test_mobj_builder() {
        let imp = Mobj::new(3001, 64 * FRACUNIT, 0, 0)
            .with_health(60)
            .with_flags(MobjFlags::SOLID | MobjFlags::SHOOTABLE | MobjFlags::COUNTKILL);
        assert!(imp.is_alive());
        assert!(!imp.is_friendly());
        assert_eq!(imp.x, 64 * FRACUNIT);
    }

    #[test]
    fn test_payload_serde() {
        let kind: ThinkerKind = Lift {
            sector: SectorId(12),
            speed: 4 * FRACUNIT,
            status: LiftStatus::Down,
            ..Lift::default()
        }
        .into();
        let json = serde_json::to_string(&kind).unwrap();
        let back: ThinkerKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
    }
}
