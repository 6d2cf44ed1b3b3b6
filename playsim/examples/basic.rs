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
//! Basic example: a small level with monsters, a door and a crusher
//!
//! The crusher damages every hostile thinker each time it bottoms out, dying
//! monsters play their death states and vanish, and the door opens, waits
//! and closes before removing itself. Run with `RUST_LOG=debug` to see the
//! per-tick summaries.

use playsim::plugins::{ItemRespawnPlugin, PluginRegistry};
use playsim::state::{set_state, tick_state, StateTable};
use playsim::thinker::{
    Category, Crusher, Door, Fixed, KindTag, LogicTable, Mobj, MobjFlags, MoverDirection,
    ThinkerId, ThinkerKind, ThinkerList, FRACUNIT,
};
use playsim::{SchedulerConfig, Ticker};
use std::collections::HashMap;
use std::error::Error;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const CRUSH_DAMAGE: i32 = 10;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn a_fall(list: &mut ThinkerList, _states: &StateTable, id: ThinkerId) {
    if let Some(mut thinker) = list.get_mut(id) {
        if let Some(mobj) = thinker.as_mobj_mut() {
            mobj.flags.remove(MobjFlags::SHOOTABLE | MobjFlags::SOLID);
            mobj.flags.insert(MobjFlags::CORPSE);
        }
    }
}

fn build_states() -> Result<StateTable, Box<dyn Error>> {
    Ok(StateTable::builder()
        .state("POSS_STND", 1, 0, 10, "POSS_STND2")
        .state("POSS_STND2", 1, 1, 10, "POSS_STND")
        .state("POSS_DIE1", 1, 7, 5, "POSS_DIE2")
        .state("POSS_DIE2", 1, 8, 5, "POSS_DIE3")
        .state("POSS_DIE3", 1, 9, 0, "NULL")
        .action("POSS_DIE1", a_fall)
        .build()?)
}

/// Monsters animate; freshly killed ones switch to their death states
fn think_mobj(list: &mut ThinkerList, states: &StateTable, id: ThinkerId) {
    let dying = list
        .get(id)
        .and_then(|kind| kind.as_mobj())
        .map_or(false, |mobj| !mobj.is_alive() && !mobj.flags.contains(MobjFlags::CORPSE));

    if dying {
        if let Some(die) = states.id_of("POSS_DIE1") {
            set_state(list, states, id, die);
        }
    } else {
        tick_state(list, states, id);
    }
}

/// Move the ceiling; on reaching the bottom, hurt everything in the hostile thread
fn think_crusher(
    list: &mut ThinkerList,
    id: ThinkerId,
    heights: &mut HashMap<ThinkerId, Fixed>,
) {
    let (bottom, top, speed, direction) = match list.get(id) {
        Some(ThinkerKind::Crusher(crusher)) => {
            (crusher.bottom, crusher.top, crusher.speed, crusher.direction)
        }
        _ => return,
    };

    let height = heights.entry(id).or_insert(top);
    let turn = match direction {
        MoverDirection::Down => {
            *height = (*height - speed).max(bottom);
            (*height == bottom).then_some(MoverDirection::Up)
        }
        MoverDirection::Up => {
            *height = (*height + speed).min(top);
            (*height == top).then_some(MoverDirection::Down)
        }
        MoverDirection::Waiting => None,
    };

    if let Some(turn) = turn {
        if let Some(mut thinker) = list.get_mut(id) {
            if let ThinkerKind::Crusher(crusher) = &mut *thinker {
                crusher.direction = turn;
            }
        }
        if turn == MoverDirection::Up {
            let victims: Vec<ThinkerId> = list.query(Category::Hostile).collect();
            for victim in victims {
                if let Some(mut thinker) = list.get_mut(victim) {
                    if let Some(mobj) = thinker.as_mobj_mut() {
                        mobj.health -= CRUSH_DAMAGE;
                    }
                }
            }
        }
    }
}

/// Open, wait at the top, close, then remove the door thinker
fn think_door(list: &mut ThinkerList, id: ThinkerId) {
    let finished = match list.get_mut(id) {
        Some(mut thinker) => match &mut *thinker {
            ThinkerKind::Door(door) => match door.direction {
                MoverDirection::Up => {
                    door.countdown = door.top_wait;
                    door.direction = MoverDirection::Waiting;
                    false
                }
                MoverDirection::Waiting => {
                    door.countdown -= 1;
                    if door.countdown <= 0 {
                        door.direction = MoverDirection::Down;
                    }
                    false
                }
                MoverDirection::Down => true,
            },
            _ => false,
        },
        None => false,
    };
    if finished {
        list.mark_for_deletion(id);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = SchedulerConfig::from_env()?;
    let states = Rc::new(build_states()?);
    let stand = states.id_of("POSS_STND").ok_or("missing POSS_STND")?;

    let mut list = ThinkerList::with_config(config);
    for i in 0..4 {
        let id = list.register(
            Mobj::new(3004, i * 64 * FRACUNIT, 0, 0)
                .with_health(20)
                .with_flags(MobjFlags::COUNTKILL | MobjFlags::SHOOTABLE | MobjFlags::SOLID),
        );
        set_state(&mut list, &states, id, stand);
    }
    list.register(Door {
        direction: MoverDirection::Up,
        speed: 2 * FRACUNIT,
        top_wait: 150,
        ..Door::default()
    });
    list.register(Crusher {
        bottom: 0,
        top: 10 * FRACUNIT,
        speed: FRACUNIT,
        direction: MoverDirection::Down,
        ..Crusher::default()
    });

    let mobj_states = Rc::clone(&states);
    let mut heights = HashMap::new();
    let logic = LogicTable::new()
        .on(KindTag::Mobj, move |list, id| think_mobj(list, &mobj_states, id))
        .on(KindTag::Crusher, move |list, id| think_crusher(list, id, &mut heights))
        .on(KindTag::Door, think_door);

    let mut plugins = PluginRegistry::new();
    plugins.register(Box::new(ItemRespawnPlugin::new()))?;

    let mut ticker = Ticker::new(list, logic, plugins)?;
    for _ in 0..200 {
        ticker.run_tick()?;
        if ticker.level_time() % 50 == 0 {
            let list = ticker.list();
            println!(
                "tic {:>3}: {} thinkers, {} hostile, {} misc",
                ticker.level_time(),
                list.len(),
                list.category_len(Category::Hostile),
                list.category_len(Category::Miscellaneous)
            );
        }
    }

    let list = ticker.shutdown()?;
    println!("final stats: {:?}", list.stats());
    Ok(())
}
