//! Model-based properties of `AvlTreeMap`, checked against `std::collections::BTreeMap`.

use std::collections::BTreeMap;

use avl_map::{AvlTreeMap, PositionError};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Operation {
    Insert(i16, u32),
    Remove(i16),
    Erase(i16),
    GetOrDefault(i16),
    PopFirst,
    PopLast,
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (any::<i16>(), any::<u32>()).prop_map(|(k, v)| Operation::Insert(k, v)),
        2 => any::<i16>().prop_map(Operation::Remove),
        2 => any::<i16>().prop_map(Operation::Erase),
        2 => any::<i16>().prop_map(Operation::GetOrDefault),
        1 => Just(Operation::PopFirst),
        1 => Just(Operation::PopLast),
    ]
}

fn apply(map: &mut AvlTreeMap<i16, u32>, model: &mut BTreeMap<i16, u32>, operation: &Operation) {
    match *operation {
        Operation::Insert(k, v) => assert_eq!(map.insert(k, v), model.insert(k, v)),
        Operation::Remove(k) => assert_eq!(map.remove(&k), model.remove(&k)),
        Operation::Erase(k) => {
            let position = map.find(&k);
            assert_eq!(map.erase(position), model.remove_entry(&k));
        }
        Operation::GetOrDefault(k) => {
            *map.get_or_default(k) += 1;
            *model.entry(k).or_default() += 1;
        }
        Operation::PopFirst => assert_eq!(map.pop_first(), model.pop_first()),
        Operation::PopLast => assert_eq!(map.pop_last(), model.pop_last()),
    }
}

/// Upper bound on the height of an AVL tree with `len` nodes: 1.4405 * log2(len + 2) - 0.3277.
fn height_bound(len: usize) -> usize {
    (1.4405 * ((len + 2) as f64).log2() - 0.3277).floor() as usize
}

fn keys_and_values() -> impl Strategy<Value = Vec<(i16, u32)>> {
    prop::collection::vec((any::<i16>(), any::<u32>()), 0..300)
}

proptest! {
    #[test]
    fn matches_btree_map(operations in prop::collection::vec(operation(), 0..300)) {
        let mut map = AvlTreeMap::new();
        let mut model = BTreeMap::new();
        for operation in &operations {
            apply(&mut map, &mut model, operation);
            prop_assert_eq!(map.len(), model.len());
        }
        prop_assert!(map.iter().eq(model.iter()));
        prop_assert_eq!(map.first_key_value(), model.first_key_value());
        prop_assert_eq!(map.last_key_value(), model.last_key_value());
    }

    #[test]
    fn traversal_is_sorted_and_complete(entries in keys_and_values()) {
        let map: AvlTreeMap<_, _> = entries.iter().copied().collect();
        let model: BTreeMap<_, _> = entries.iter().copied().collect();

        prop_assert_eq!(map.len(), model.len());
        prop_assert!(map.keys().eq(model.keys()));
        prop_assert!(map.keys().rev().eq(model.keys().rev()));
        prop_assert!(map.values().eq(model.values()));
        prop_assert!(map.clone().into_iter().eq(model.into_iter()));

        let mut by_position = Vec::new();
        let mut position = map.begin();
        while position != map.end() {
            by_position.push(*map.get_at(position).unwrap().0);
            position = map.next_position(position).unwrap();
        }
        prop_assert!(by_position.iter().eq(map.keys()));
    }

    #[test]
    fn lookup_finds_every_inserted_key(entries in keys_and_values(), probe in any::<i16>()) {
        let map: AvlTreeMap<_, _> = entries.iter().copied().collect();
        let model: BTreeMap<_, _> = entries.iter().copied().collect();

        for (key, value) in &model {
            let position = map.find(key);
            prop_assert_ne!(position, map.end());
            prop_assert_eq!(map.get_at(position), Ok((key, value)));
            prop_assert_eq!(map.get(key), Some(value));
        }
        prop_assert_eq!(map.get(&probe), model.get(&probe));
        prop_assert_eq!(map.find(&probe) == map.end(), !model.contains_key(&probe));
    }

    #[test]
    fn erasing_every_position_empties_the_map(entries in keys_and_values()) {
        let mut map: AvlTreeMap<_, _> = entries.iter().copied().collect();
        let mut model: BTreeMap<_, _> = entries.iter().copied().collect();

        let keys: Vec<i16> = model.keys().copied().collect();
        for key in keys.iter().rev().step_by(2).chain(keys.iter().step_by(2)) {
            let position = map.find(key);
            prop_assert_eq!(map.erase(position), model.remove_entry(key));
            prop_assert_eq!(map.find(key), map.end());
        }
        prop_assert!(map.iter().eq(model.iter()));
        while !map.is_empty() {
            let last = map.prev_position(map.end()).unwrap();
            prop_assert!(map.erase(last).is_some());
        }
        prop_assert_eq!(map.len(), 0);
        prop_assert_eq!(map.begin(), map.end());
        prop_assert_eq!(map.prev_position(map.end()), Err(PositionError::End));
    }

    #[test]
    fn copies_are_independent(entries in keys_and_values(), extra in any::<i16>()) {
        let mut original: AvlTreeMap<_, _> = entries.iter().copied().collect();
        let snapshot: BTreeMap<_, _> = entries.iter().copied().collect();
        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);

        copy.insert(extra, u32::MAX);
        if let Some(&first) = snapshot.keys().next() {
            copy.remove(&first);
        }
        prop_assert!(original.iter().eq(snapshot.iter()));

        let copy_len = copy.len();
        original.clear();
        prop_assert_eq!(copy.len(), copy_len);
        prop_assert_eq!(copy.get(&extra), Some(&u32::MAX));
    }

    #[test]
    fn height_stays_logarithmic(operations in prop::collection::vec(operation(), 0..500)) {
        let mut map = AvlTreeMap::new();
        let mut model = BTreeMap::new();
        for operation in &operations {
            apply(&mut map, &mut model, operation);
            if let Some(height) = map.height() {
                prop_assert!(height <= height_bound(map.len()));
            }
        }
    }
}
