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
//! State stepping
//!
//! Entering a state copies its rendering attributes onto the thinker and runs
//! its action. Zero-duration states chain into their successor within the
//! same call, so one call may pass through several states. A chain that
//! comes back to a state already entered in the same call is cut short with
//! a diagnostic; the thinker keeps the last state it entered.

use crate::state::{StateId, StateTable, FOREVER_TICS};
use crate::thinker::{ThinkerId, ThinkerList};
use tracing::{debug, warn};

/// Move a thinker into `state`, chaining through zero-duration states
///
/// Returns `false` if the thinker was removed along the way, either by
/// reaching the null state or by an action marking it for deletion.
///
/// # Panics
///
/// Panics if the thinker is not state-driven or `state` is outside `states`.
pub fn set_state(
    list: &mut ThinkerList,
    states: &StateTable,
    id: ThinkerId,
    state: StateId,
) -> bool {
    if !list.is_active(id) {
        return false;
    }

    let mut visited: Vec<StateId> = Vec::new();
    let mut state = state;

    loop {
        if state.is_null() {
            list.mark_for_deletion(id);
            return false;
        }

        let def = states.get(state);
        match list.get_mut(id) {
            Some(mut thinker) => match thinker.animation_mut() {
                Some(anim) => anim.enter(state, def),
                None => panic!("set_state: {} is not state-driven", id),
            },
            None => return false,
        }

        if let Some(action) = def.action {
            action(list, states, id);
            if !list.is_active(id) {
                return false;
            }
        }

        visited.push(state);

        let anim = match list.get(id).and_then(|kind| kind.animation()) {
            Some(anim) => *anim,
            None => return false,
        };
        // An action that re-entered set_state already settled the thinker.
        if anim.state != state || anim.tics != 0 {
            return true;
        }

        let next = def.next;
        if visited.contains(&next) {
            report_cycle(list, states, id, &visited, next);
            return true;
        }
        state = next;
    }
}

/// Count down the current state and advance when it expires
///
/// States held [`FOREVER_TICS`] never advance. A state left at zero tics by
/// a truncated cycle is held as well. Returns `false` if the thinker was
/// removed.
pub fn tick_state(list: &mut ThinkerList, states: &StateTable, id: ThinkerId) -> bool {
    let anim = match list.get(id).and_then(|kind| kind.animation()) {
        Some(anim) if list.is_active(id) => *anim,
        _ => return false,
    };
    if anim.tics == FOREVER_TICS || anim.tics == 0 {
        return true;
    }

    let remaining = anim.tics - 1;
    if let Some(mut thinker) = list.get_mut(id) {
        if let Some(anim) = thinker.animation_mut() {
            anim.tics = remaining;
        }
    }

    if remaining == 0 {
        set_state(list, states, id, states.get(anim.state).next)
    } else {
        true
    }
}

fn report_cycle(
    list: &mut ThinkerList,
    states: &StateTable,
    id: ThinkerId,
    visited: &[StateId],
    repeated: StateId,
) {
    let chain = visited
        .iter()
        .map(|&state| states.name_of(state))
        .collect::<Vec<_>>()
        .join(" -> ");

    if list.config().log_state_cycles {
        warn!(
            thinker = %id,
            chain = %chain,
            repeated = states.name_of(repeated),
            "zero_duration_state_cycle"
        );
    } else {
        debug!(
            thinker = %id,
            chain = %chain,
            repeated = states.name_of(repeated),
            "zero_duration_state_cycle"
        );
    }
    list.note_state_cycle();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thinker::{Door, Mobj, MobjFlags};

    fn spawn(list: &mut ThinkerList) -> ThinkerId {
        list.register(
            Mobj::new(3004, 0, 0, 0)
                .with_health(20)
                .with_flags(MobjFlags::COUNTKILL),
        )
    }

    fn anim_state(list: &ThinkerList, id: ThinkerId) -> StateId {
        list.get(id).unwrap().animation().unwrap().state
    }

    fn tics(list: &ThinkerList, id: ThinkerId) -> i32 {
        list.get(id).unwrap().animation().unwrap().tics
    }

    fn remove_self(list: &mut ThinkerList, _states: &StateTable, id: ThinkerId) {
        list.mark_for_deletion(id);
    }

    #[test]
    fn test_enter_copies_attributes() {
        let states = StateTable::builder()
            .state("POSS_RUN1", 7, 2, 4, "POSS_RUN1")
            .build()
            .unwrap();
        let mut list = ThinkerList::new();
        let id = spawn(&mut list);
        let run = states.id_of("POSS_RUN1").unwrap();

        assert!(set_state(&mut list, &states, id, run));
        let anim = *list.get(id).unwrap().animation().unwrap();
        assert_eq!(anim.state, run);
        assert_eq!(anim.tics, 4);
        assert_eq!(anim.sprite, 7);
        assert_eq!(anim.frame, 2);
    }

    #[test]
    fn test_zero_duration_chain() {
        let states = StateTable::builder()
            .state("A", 0, 0, 0, "B")
            .state("B", 0, 1, 0, "C")
            .state("C", 0, 2, 5, "A")
            .build()
            .unwrap();
        let mut list = ThinkerList::new();
        let id = spawn(&mut list);

        assert!(set_state(&mut list, &states, id, states.id_of("A").unwrap()));
        assert_eq!(anim_state(&list, id), states.id_of("C").unwrap());
        assert_eq!(tics(&list, id), 5);
    }

    #[test]
    fn test_null_state_removes() {
        let states = StateTable::builder()
            .state("DIE", 0, 0, 0, "NULL")
            .build()
            .unwrap();
        let mut list = ThinkerList::new();
        let id = spawn(&mut list);

        assert!(!set_state(&mut list, &states, id, states.id_of("DIE").unwrap()));
        assert!(list.contains(id));
        assert!(!list.is_active(id));
    }

    #[test]
    fn test_action_removal_aborts_chain() {
        let states = StateTable::builder()
            .state("A", 0, 0, 0, "B")
            .state("B", 0, 1, 3, "B")
            .action("A", remove_self)
            .build()
            .unwrap();
        let mut list = ThinkerList::new();
        let id = spawn(&mut list);

        assert!(!set_state(&mut list, &states, id, states.id_of("A").unwrap()));
        assert_eq!(anim_state(&list, id), states.id_of("A").unwrap());
    }

    #[test]
    fn test_cycle_is_truncated() {
        let states = StateTable::builder()
            .state("X", 0, 0, 0, "Y")
            .state("Y", 0, 1, 0, "X")
            .build()
            .unwrap();
        let mut list = ThinkerList::with_config(
            crate::config::SchedulerConfig::default().with_quiet_state_cycles(),
        );
        let id = spawn(&mut list);

        assert!(set_state(&mut list, &states, id, states.id_of("X").unwrap()));
        assert_eq!(anim_state(&list, id), states.id_of("Y").unwrap());
        assert_eq!(list.stats().state_cycles, 1);

        // Parked at zero tics, the thinker holds instead of re-entering the cycle.
        assert!(tick_state(&mut list, &states, id));
        assert_eq!(anim_state(&list, id), states.id_of("Y").unwrap());
        assert_eq!(list.stats().state_cycles, 1);
    }

    #[test]
    fn test_tick_state_counts_down() {
        let states = StateTable::builder()
            .state("A", 0, 0, 2, "B")
            .state("B", 0, 1, FOREVER_TICS, "B")
            .build()
            .unwrap();
        let mut list = ThinkerList::new();
        let id = spawn(&mut list);
        let a = states.id_of("A").unwrap();
        let b = states.id_of("B").unwrap();

        set_state(&mut list, &states, id, a);
        assert!(tick_state(&mut list, &states, id));
        assert_eq!(anim_state(&list, id), a);
        assert_eq!(tics(&list, id), 1);

        assert!(tick_state(&mut list, &states, id));
        assert_eq!(anim_state(&list, id), b);
        assert_eq!(tics(&list, id), FOREVER_TICS);

        assert!(tick_state(&mut list, &states, id));
        assert_eq!(anim_state(&list, id), b);
    }

    #[test]
    fn test_inactive_thinker_is_ignored() {
        let states = StateTable::builder().state("A", 0, 0, 1, "A").build().unwrap();
        let mut list = ThinkerList::new();
        let id = spawn(&mut list);
        list.mark_for_deletion(id);

        assert!(!set_state(&mut list, &states, id, states.id_of("A").unwrap()));
        assert!(!tick_state(&mut list, &states, id));
    }

    #[test]
    #[should_panic(expected = "is not state-driven")]
    fn test_non_animated_kind_panics() {
        let states = StateTable::builder().state("A", 0, 0, 1, "A").build().unwrap();
        let mut list = ThinkerList::new();
        let door = list.register(Door::default());
        set_state(&mut list, &states, door, states.id_of("A").unwrap());
    }
}
