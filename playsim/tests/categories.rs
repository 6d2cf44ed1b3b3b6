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
//! Category thread tests

use playsim::thinker::{
    Category, Door, KindTag, Mobj, MobjFlags, Scroller, ThinkerId, ThinkerList,
};

fn hostile(health: i32) -> Mobj {
    Mobj::new(3001, 0, 0, 0)
        .with_health(health)
        .with_flags(MobjFlags::COUNTKILL | MobjFlags::SHOOTABLE)
}

fn lost_soul() -> Mobj {
    Mobj::new(3006, 0, 0, 0)
        .with_health(100)
        .with_flags(MobjFlags::SHOOTABLE | MobjFlags::NOGRAVITY | MobjFlags::COMBATANT)
}

fn query(list: &ThinkerList, category: Category) -> Vec<ThinkerId> {
    list.query(category).collect()
}

#[test]
fn test_hostile_becomes_miscellaneous_on_death() {
    let mut list = ThinkerList::new();
    let m = list.register(hostile(10));
    assert!(query(&list, Category::Hostile).contains(&m));

    if let Some(mut thinker) = list.get_mut(m) {
        thinker.as_mobj_mut().unwrap().health = 0;
    }
    list.reclassify(m);

    assert!(!query(&list, Category::Hostile).contains(&m));
    assert!(query(&list, Category::Miscellaneous).contains(&m));
}

#[test]
fn test_faction_change_moves_thread() {
    let mut list = ThinkerList::new();
    let m = list.register(hostile(50));

    if let Some(mut thinker) = list.get_mut(m) {
        thinker.as_mobj_mut().unwrap().flags.insert(MobjFlags::FRIEND);
    }
    assert_eq!(query(&list, Category::Friendly), vec![m]);
    assert!(query(&list, Category::Hostile).is_empty());
}

#[test]
fn test_combatant_flag_joins_threads() {
    let mut list = ThinkerList::new();
    let soul = list.register(lost_soul());
    assert_eq!(list.category_of(soul), Some(Category::Hostile));
}

#[test]
fn test_threads_partition_live_thinkers() {
    let mut list = ThinkerList::new();
    let door = list.register(Door::default());
    let enemy = list.register(hostile(10));
    let friend = list.register(hostile(10).with_flags(MobjFlags::COUNTKILL | MobjFlags::FRIEND));
    let scroller = list.register(Scroller::default());
    let dying = list.register(hostile(10));
    list.mark_for_deletion(dying);

    assert_eq!(query(&list, Category::Miscellaneous), vec![door, scroller]);
    assert_eq!(query(&list, Category::Hostile), vec![enemy]);
    assert_eq!(query(&list, Category::Friendly), vec![friend]);
    assert_eq!(query(&list, Category::PendingDeletion), vec![dying]);

    let total: usize = Category::ALL.iter().map(|&c| list.category_len(c)).sum();
    assert_eq!(total, list.len());
}

#[test]
fn test_reclassify_leaves_visit_order_alone() {
    let mut list = ThinkerList::new();
    let a = list.register(hostile(10));
    let b = list.register(hostile(10));
    let c = list.register(hostile(10));

    if let Some(mut thinker) = list.get_mut(a) {
        thinker.as_mobj_mut().unwrap().flags.insert(MobjFlags::FRIEND);
    }
    if let Some(mut thinker) = list.get_mut(a) {
        thinker.as_mobj_mut().unwrap().flags.remove(MobjFlags::FRIEND);
    }
    assert_eq!(query(&list, Category::Hostile), vec![b, c, a]);

    let mut visited = Vec::new();
    list.tick(&mut |_: &mut ThinkerList, id: ThinkerId, _: KindTag| visited.push(id));
    assert_eq!(visited, vec![a, b, c]);
}

#[test]
fn test_death_during_walk_updates_threads() {
    let mut list = ThinkerList::new();
    let a = list.register(hostile(10));
    let b = list.register(hostile(10));

    list.tick(&mut |list: &mut ThinkerList, id: ThinkerId, _: KindTag| {
        if id == a {
            if let Some(mut thinker) = list.get_mut(b) {
                thinker.as_mobj_mut().unwrap().health -= 25;
            }
        }
    });

    assert_eq!(query(&list, Category::Hostile), vec![a]);
    assert_eq!(query(&list, Category::Miscellaneous), vec![b]);
    assert!(list.is_active(b));
}

#[test]
fn test_target_search_with_next_in() {
    let mut list = ThinkerList::new();
    let friend = list.register(hostile(100).with_flags(MobjFlags::COUNTKILL | MobjFlags::FRIEND));
    let e1 = list.register(hostile(5));
    let e2 = list.register(hostile(5));
    let e3 = list.register(hostile(5));

    let mut seen = Vec::new();
    let mut cursor = None;
    while let Some(enemy) = list.next_in(Category::Hostile, cursor) {
        seen.push(enemy);
        cursor = Some(enemy);
    }
    assert_eq!(seen, vec![e1, e2, e3]);

    // Each kill leaves the thread, so the head is always the next victim.
    let mut killed = Vec::new();
    while let Some(enemy) = list.next_in(Category::Hostile, None) {
        killed.push(enemy);
        if let Some(mut thinker) = list.get_mut(enemy) {
            thinker.as_mobj_mut().unwrap().health = 0;
        }
    }

    assert_eq!(killed, vec![e1, e2, e3]);
    assert!(query(&list, Category::Hostile).is_empty());
    assert_eq!(query(&list, Category::Friendly), vec![friend]);
}

#[test]
fn test_marking_moves_to_pending_thread() {
    let mut list = ThinkerList::new();
    let door = list.register(Door::default());
    let enemy = list.register(hostile(10));

    list.mark_for_deletion(enemy);
    assert_eq!(list.category_of(enemy), Some(Category::PendingDeletion));
    assert_eq!(list.category_len(Category::Hostile), 0);
    assert_eq!(list.reclassify(enemy), Category::PendingDeletion);

    list.tick(&mut |_: &mut ThinkerList, _: ThinkerId, _: KindTag| {});
    assert_eq!(list.category_len(Category::PendingDeletion), 0);
    assert_eq!(query(&list, Category::Miscellaneous), vec![door]);
}
