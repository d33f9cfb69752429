use avl_map::{AvlTreeMap, PositionError};

fn main() {
    let mut map = AvlTreeMap::new();
    map.insert(0, "zero");
    map.insert(1, "one");
    map.insert(2, "two");
    map.insert(2, "two");
    map.insert(3, "three");
    map.insert(4, "four");
    map.insert(5, "five");
    assert_eq!(map.get(&1), Some(&"one"));
    map.remove(&1);
    assert!(map.get(&1).is_none());

    for (k, v) in &map {
        println!("{k} => {v}");
    }

    // Walk the map by position, back to front.
    let mut position = map.end();
    while let Ok(previous) = map.prev_position(position) {
        if previous == map.end() {
            break;
        }
        let (k, v) = map.get_at(previous).unwrap();
        println!("{k} <= {v}");
        position = previous;
    }

    let last = map.find(&5);
    assert_eq!(map.erase(last), Some((5, "five")));
    assert_eq!(map.get_at(last), Err(PositionError::Stale));

    let mut counts: AvlTreeMap<&str, i32> = AvlTreeMap::new();
    for word in "the quick brown fox jumps over the lazy dog".split_whitespace() {
        *counts.get_or_default(word) += 1;
    }

    let mut cursor = counts.cursor_front_mut();
    while let Some((_, count)) = cursor.key_value_mut() {
        if *count > 1 {
            cursor.move_next();
        } else {
            cursor.remove_current();
        }
    }
    println!("{counts:?}");
}
