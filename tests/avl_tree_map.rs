use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Bound::{Excluded, Included, Unbounded};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use wabi_avl::avl_tree_map::{self, Entry};
use wabi_avl::compare::{Compare, CompareFn, Greater};
use wabi_avl::{AvlTreeMap, Position};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 5_000;

/// Keys from a range smaller than `TEST_SIZE` so that collisions are common.
fn key_strategy() -> impl Strategy<Value = i64> {
    -2_000i64..2_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn entries_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
    proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE)
}

/// Builds both maps from the same pairs. `BTreeMap` is fed through `or_insert` because
/// `AvlTreeMap::insert` keeps the first value seen for a key.
fn build(entries: &[(i64, i64)]) -> (AvlTreeMap<i64, i64>, BTreeMap<i64, i64>) {
    let avl: AvlTreeMap<i64, i64> = entries.iter().copied().collect();
    let mut bt = BTreeMap::new();
    for &(k, v) in entries {
        bt.entry(k).or_insert(v);
    }
    (avl, bt)
}

fn key_at<V, C>(map: &AvlTreeMap<i64, V, C>, position: Position) -> Option<i64> {
    map.get_at(position).map(|(k, _)| *k)
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Erase(i64),
    Get(i64),
    Count(i64),
    Find(i64),
    LowerBound(i64),
    UpperBound(i64),
    Index(i64),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        6 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        1 => key_strategy().prop_map(MapOp::Erase),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::Count),
        1 => key_strategy().prop_map(MapOp::Find),
        1 => key_strategy().prop_map(MapOp::LowerBound),
        1 => key_strategy().prop_map(MapOp::UpperBound),
        1 => key_strategy().prop_map(MapOp::Index),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both AvlTreeMap and BTreeMap and asserts
    /// identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut avl: AvlTreeMap<i64, i64> = AvlTreeMap::new();
        let mut bt: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    let (position, inserted) = avl.insert(k, v);
                    prop_assert_eq!(inserted, !bt.contains_key(&k), "insert({}, {})", k, v);
                    let stored = *bt.entry(k).or_insert(v);
                    prop_assert_eq!(avl.get_at(position), Some((&k, &stored)), "insert({}, {}) position", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(avl.remove(&k), bt.remove(&k), "remove({})", k);
                }
                MapOp::Erase(k) => {
                    let expected = usize::from(bt.remove(&k).is_some());
                    prop_assert_eq!(avl.erase(&k), expected, "erase({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(avl.get(&k), bt.get(&k), "get({})", k);
                }
                MapOp::Count(k) => {
                    prop_assert_eq!(avl.count(&k), usize::from(bt.contains_key(&k)), "count({})", k);
                }
                MapOp::Find(k) => {
                    let position = avl.find(&k);
                    prop_assert_eq!(avl.get_at(position), bt.get_key_value(&k), "find({})", k);
                    prop_assert_eq!(position == avl.end(), !bt.contains_key(&k));
                }
                MapOp::LowerBound(k) => {
                    let expected = bt.range((Included(k), Unbounded)).next();
                    prop_assert_eq!(avl.get_at(avl.lower_bound(&k)), expected, "lower_bound({})", k);
                }
                MapOp::UpperBound(k) => {
                    let expected = bt.range((Excluded(k), Unbounded)).next();
                    prop_assert_eq!(avl.get_at(avl.upper_bound(&k)), expected, "upper_bound({})", k);
                }
                MapOp::Index(k) => {
                    if let Some(v) = bt.get(&k) {
                        prop_assert_eq!(&avl[&k], v);
                    }
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(avl.first_key_value(), bt.first_key_value());
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(avl.last_key_value(), bt.last_key_value());
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(avl.pop_first(), bt.pop_first());
                }
                MapOp::PopLast => {
                    prop_assert_eq!(avl.pop_last(), bt.pop_last());
                }
            }

            prop_assert_eq!(avl.len(), bt.len());
            prop_assert_eq!(avl.is_empty(), bt.is_empty());
        }

        prop_assert!(avl.iter().eq(bt.iter()));
    }

    /// In-order traversal is strictly increasing and matches BTreeMap, in both directions.
    #[test]
    fn iter_matches_btreemap(entries in entries_strategy()) {
        let (avl, bt) = build(&entries);

        prop_assert!(avl.iter().eq(bt.iter()));
        prop_assert!(avl.iter().rev().eq(bt.iter().rev()));
        prop_assert!(avl.keys().eq(bt.keys()));
        prop_assert!(avl.values().eq(bt.values()));
        prop_assert_eq!(avl.iter().len(), bt.len());
        prop_assert!(avl.keys().zip(avl.keys().skip(1)).all(|(a, b)| a < b));
    }

    /// Walking positions from `before_begin` to `end` and back visits every entry once.
    #[test]
    fn positions_walk_both_ways(entries in entries_strategy()) {
        let (avl, bt) = build(&entries);

        let mut forward = Vec::new();
        let mut position = avl.next_position(avl.before_begin());
        while position != avl.end() {
            forward.push(key_at(&avl, position).unwrap());
            position = avl.next_position(position);
        }
        prop_assert_eq!(&forward, &bt.keys().copied().collect::<Vec<_>>());

        let mut backward = Vec::new();
        let mut position = avl.prev_position(avl.end());
        while position != avl.before_begin() {
            backward.push(key_at(&avl, position).unwrap());
            position = avl.prev_position(position);
        }
        backward.reverse();
        prop_assert_eq!(&backward, &forward);
        prop_assert_eq!(avl.begin() == avl.end(), bt.is_empty());
    }

    /// The tree never grows taller than the AVL bound for its size.
    #[test]
    fn height_is_logarithmic(entries in entries_strategy(), removals in proptest::collection::vec(key_strategy(), 0..TEST_SIZE)) {
        let (mut avl, _) = build(&entries);
        for k in &removals {
            avl.remove(k);
        }

        // Sparsest AVL tree of height h holds F(h + 2) - 1 nodes.
        let (mut sparse, mut sparser, mut bound) = (1usize, 0usize, 1usize);
        while sparse + sparser + 1 <= avl.len() {
            (sparse, sparser) = (sparse + sparser + 1, sparse);
            bound += 1;
        }
        prop_assert!(avl.height() <= bound, "height {} for {} entries", avl.height(), avl.len());
    }

    /// Tests range queries match BTreeMap.
    #[test]
    fn range_matches_btreemap(entries in entries_strategy(), lo in key_strategy(), hi in key_strategy()) {
        let (avl, bt) = build(&entries);
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

        prop_assert!(avl.range(lo..=hi).eq(bt.range(lo..=hi)), "range({}..={})", lo, hi);
        prop_assert!(avl.range(lo..hi).eq(bt.range(lo..hi)), "range({}..{})", lo, hi);
        prop_assert!(avl.range(lo..).eq(bt.range(lo..)), "range({}..)", lo);
        prop_assert!(avl.range(..=hi).eq(bt.range(..=hi)), "range(..={})", hi);
        prop_assert!(avl.range(..).eq(bt.range(..)), "range(..)");
        prop_assert!(avl.range((Excluded(lo), Included(hi))).eq(bt.range((Excluded(lo), Included(hi)))));
        prop_assert!(avl.range(lo..=hi).rev().eq(bt.range(lo..=hi).rev()), "range({}..={}).rev()", lo, hi);
    }

    /// `equal_range` brackets at most one entry, and exactly the one `find` reports.
    #[test]
    fn equal_range_brackets_find(entries in entries_strategy(), k in key_strategy()) {
        let (avl, _) = build(&entries);
        let (lower, upper) = avl.equal_range(&k);
        let found = avl.find(&k);

        if found == avl.end() {
            prop_assert_eq!(lower, upper);
        } else {
            prop_assert_eq!(lower, found);
            prop_assert_eq!(avl.next_position(found), upper);
        }
    }

    /// Tests get_mut, iter_mut, values_mut and range_mut behave correctly.
    #[test]
    fn mutation_matches_btreemap(entries in entries_strategy(), lo in key_strategy(), hi in key_strategy()) {
        let (mut avl, mut bt) = build(&entries);
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

        for (_, v) in avl.range_mut(lo..hi) {
            *v = v.wrapping_add(1);
        }
        for (_, v) in bt.range_mut(lo..hi) {
            *v = v.wrapping_add(1);
        }
        for v in avl.values_mut().rev() {
            *v = v.wrapping_mul(3);
        }
        for v in bt.values_mut() {
            *v = v.wrapping_mul(3);
        }
        for (k, v) in &mut avl {
            *v ^= k;
        }
        for (k, v) in &mut bt {
            *v ^= k;
        }
        if let Some(v) = avl.get_mut(&lo) {
            *v = 0;
        }
        if let Some(v) = bt.get_mut(&lo) {
            *v = 0;
        }

        prop_assert!(avl.iter().eq(bt.iter()));
    }

    #[test]
    fn retain_matches_btreemap(entries in entries_strategy()) {
        let (mut avl, mut bt) = build(&entries);
        avl.retain(|k, v| (k ^ *v) % 3 != 0);
        bt.retain(|k, v| (k ^ *v) % 3 != 0);
        prop_assert!(avl.into_iter().eq(bt));
    }

    /// Erasing a key that was just inserted restores the previous contents.
    #[test]
    fn insert_then_erase_round_trips(entries in entries_strategy(), k in key_strategy(), v in value_strategy()) {
        let (mut avl, _) = build(&entries);
        let before = avl.clone();

        let (_, inserted) = avl.insert(k, v);
        if inserted {
            prop_assert_eq!(avl.erase(&k), 1);
        }
        prop_assert_eq!(&avl, &before);
    }

    /// A second insertion of a key changes nothing.
    #[test]
    fn insert_is_idempotent(entries in entries_strategy(), k in key_strategy(), v in value_strategy(), w in value_strategy()) {
        let (mut avl, _) = build(&entries);
        let (first, _) = avl.insert(k, v);
        let snapshot = avl.clone();

        let (second, inserted) = avl.insert(k, w);
        prop_assert!(!inserted);
        prop_assert_eq!(first, second);
        prop_assert_eq!(&avl, &snapshot);
    }

    /// Positions keep pointing at their entries while other entries come and go.
    #[test]
    fn positions_survive_other_mutations(
        entries in entries_strategy(),
        churn in proptest::collection::vec((key_strategy(), any::<bool>()), 0..1_000),
    ) {
        let (mut avl, _) = build(&entries);
        let tracked: Vec<(i64, Position)> = avl.keys().step_by(7).map(|&k| (k, avl.find(&k))).collect();

        for &(k, insert) in &churn {
            if tracked.iter().any(|&(t, _)| t == k) {
                continue;
            }
            if insert {
                avl.insert(k, k);
            } else {
                avl.remove(&k);
            }
        }

        for &(k, position) in &tracked {
            prop_assert_eq!(key_at(&avl, position), Some(k));
        }
    }

    #[test]
    fn entry_api_matches_btreemap(ops in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut avl: AvlTreeMap<i64, i64> = AvlTreeMap::new();
        let mut bt: BTreeMap<i64, i64> = BTreeMap::new();

        for &(k, v) in &ops {
            let a = *avl.entry(k).and_modify(|x| *x = x.wrapping_add(v)).or_insert(v);
            let b = *bt.entry(k).and_modify(|x| *x = x.wrapping_add(v)).or_insert(v);
            prop_assert_eq!(a, b);
        }
        prop_assert!(avl.iter().eq(bt.iter()));
    }

    #[test]
    fn clone_produces_equal_map(entries in entries_strategy()) {
        let (avl, _) = build(&entries);
        let cloned = avl.clone();
        prop_assert_eq!(&cloned, &avl);

        let mut target: AvlTreeMap<i64, i64> = AvlTreeMap::from([(i64::MAX, 0)]);
        target.clone_from(&avl);
        prop_assert_eq!(&target, &avl);
    }

    #[test]
    fn ord_matches_btreemap(a in entries_strategy(), b in entries_strategy()) {
        let (avl_a, bt_a) = build(&a);
        let (avl_b, bt_b) = build(&b);
        prop_assert_eq!(avl_a.cmp(&avl_b), bt_a.cmp(&bt_b));
        prop_assert_eq!(avl_a == avl_b, bt_a == bt_b);
    }

    #[test]
    fn remove_range_matches_btreemap(entries in entries_strategy(), lo in key_strategy(), hi in key_strategy()) {
        let (mut avl, mut bt) = build(&entries);
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

        let first = avl.lower_bound(&lo);
        let last = avl.lower_bound(&hi);
        let doomed: Vec<i64> = bt.range(lo..hi).map(|(k, _)| *k).collect();
        for k in &doomed {
            bt.remove(k);
        }

        prop_assert_eq!(avl.remove_range(first, last), doomed.len());
        prop_assert!(avl.iter().eq(bt.iter()));
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn seven_keys_traverse_in_order() {
    let mut map = AvlTreeMap::new();
    for k in [5, 3, 8, 1, 4, 7, 9] {
        assert!(map.insert(k, k.to_string()).1);
    }

    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(map.len(), 7);
    assert!(map.height() <= 5);
    assert_eq!(map.height(), 3);
}

#[test]
fn default_insert_through_subscript() {
    let mut map: AvlTreeMap<i32, i32> = AvlTreeMap::new();
    assert_eq!(*map.get_or_insert_default(10), 0);
    assert_eq!(map.len(), 1);

    *map.get_or_insert_default(10) = 42;
    assert_eq!(map.len(), 1);
    assert_eq!(map[&10], 42);
}

#[test]
fn erase_present_then_absent() {
    let mut map: AvlTreeMap<i32, ()> = [5, 3, 8, 1, 4, 7, 9].into_iter().map(|k| (k, ())).collect();
    assert_eq!(map.erase(&5), 1);
    assert_eq!(map.erase(&5), 0);
    assert_eq!(map.len(), 6);
    assert_eq!(map.find(&5), map.end());
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
}

#[test]
fn bounds_on_odd_keys() {
    let map = AvlTreeMap::from([(1, 'a'), (3, 'b'), (5, 'c'), (7, 'd')]);
    assert_eq!(key_at(&map, map.lower_bound(&4)), Some(5));
    assert_eq!(key_at(&map, map.lower_bound(&5)), Some(5));
    assert_eq!(key_at(&map, map.upper_bound(&5)), Some(7));
    assert_eq!(map.upper_bound(&7), map.end());
    assert_eq!(key_at(&map, map.lower_bound(&0)), Some(1));
    assert_eq!(map.lower_bound(&8), map.end());
}

#[test]
fn empty_map_positions() {
    let map: AvlTreeMap<i32, i32> = AvlTreeMap::new();
    assert_eq!(map.begin(), map.end());
    assert_eq!(map.next_position(map.before_begin()), map.end());
    assert_eq!(map.prev_position(map.end()), map.before_begin());
    assert_eq!(map.get_at(map.end()), None);
    assert_eq!(map.get_at(map.before_begin()), None);
    assert_eq!(map.height(), 0);
    assert_eq!(map.iter().next(), None);
}

#[test]
fn stepping_past_the_ends_saturates() {
    let map = AvlTreeMap::from([(1, ())]);
    assert_eq!(map.next_position(map.end()), map.end());
    assert_eq!(map.prev_position(map.before_begin()), map.before_begin());
    assert!(map.end().is_end());
    assert!(map.before_begin().is_before_begin());
}

#[test]
fn swap_exchanges_contents_and_keeps_positions() {
    let mut a = AvlTreeMap::from([(1, "a"), (2, "b")]);
    let mut b = AvlTreeMap::from([(10, "x")]);
    let two = a.find(&2);

    a.swap(&mut b);
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 2);
    assert_eq!(b.get_at(two), Some((&2, &"b")));
    assert_eq!(b.next_position(two), b.end());
    assert_eq!(b.prev_position(b.end()), two);
}

#[test]
fn cursors_walk_between_the_sentinels() {
    let mut map: AvlTreeMap<i32, i32> = (1..=5).map(|k| (k, k * k)).collect();

    let mut cursor = map.cursor_at(map.before_begin());
    assert_eq!(cursor.key(), None);
    assert_eq!(cursor.peek_next(), Some((&1, &1)));
    let mut seen = Vec::new();
    cursor.move_next();
    while let Some(k) = cursor.key() {
        seen.push(*k);
        cursor.move_next();
    }
    assert_eq!(seen, [1, 2, 3, 4, 5]);
    assert!(cursor.position().is_end());
    cursor.move_prev();
    assert_eq!(cursor.value(), Some(&25));

    let three = map.find(&3);
    let mut cursor = map.cursor_at_mut(three);
    *cursor.value_mut().unwrap() = 0;
    assert_eq!(cursor.remove_current(), Some((3, 0)));
    assert_eq!(cursor.key(), Some(&4));
    cursor.move_prev();
    assert_eq!(cursor.key_value_mut(), Some((&2, &mut 4)));
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2, 4, 5]);
}

#[test]
fn removed_position_reads_as_none() {
    let mut map = AvlTreeMap::from([(1, 1), (2, 2)]);
    let one = map.find(&1);
    assert_eq!(map.remove_at(one), Some((1, 1)));
    assert_eq!(map.get_at(one), None);
    assert_eq!(map.remove_at(one), None);
}

#[test]
fn custom_comparators_order_keys() {
    let mut descending = AvlTreeMap::with_comparator(Greater);
    descending.extend([(1, 'a'), (3, 'c'), (2, 'b')]);
    assert_eq!(descending.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
    assert_eq!(key_at(&descending, descending.lower_bound(&2)), Some(2));
    assert_eq!(key_at(&descending, descending.upper_bound(&2)), Some(1));
    assert_eq!(descending.range(3..=2).count(), 2);

    let mut by_abs = AvlTreeMap::with_comparator(CompareFn(|a: &i64, b: &i64| a.abs() < b.abs()));
    assert!(by_abs.insert(-4, "minus four").1);
    assert!(!by_abs.insert(4, "four").1);
    assert_eq!(by_abs.get(&4), Some(&"minus four"));
}

#[test]
fn value_comp_sorts_entries_like_the_map() {
    let map: AvlTreeMap<i32, char, Greater> = [(1, 'a'), (4, 'd'), (2, 'b')].into_iter().collect();
    let mut entries = vec![(2, 'x'), (4, 'y'), (1, 'z')];
    entries.sort_by(|a, b| map.value_comp().compare(a, b));

    let keys: Vec<i32> = entries.iter().map(|&(k, _)| k).collect();
    assert_eq!(keys, map.keys().copied().collect::<Vec<_>>());
    assert!(!map.value_comp().less(&(3, 'a'), &(3, 'b')));
}

#[test]
#[should_panic]
fn stepping_from_a_foreign_position_panics() {
    let big: AvlTreeMap<i32, i32> = (0..100).map(|k| (k, k)).collect();
    let small = AvlTreeMap::from([(1, 1)]);
    let foreign = big.find(&50);
    assert_eq!(small.get_at(foreign), None);
    let _ = small.next_position(foreign);
}

#[test]
fn insert_range_keeps_first_value_per_key() {
    let mut map = AvlTreeMap::new();
    map.insert_range([(2, "b"), (1, "a"), (2, "B")]);
    let hint = map.end();
    let three = map.insert_with_hint(hint, 3, "c");
    assert_eq!(map.get_at(three), Some((&3, &"c")));
    assert_eq!(map.iter().collect::<Vec<_>>(), [(&1, &"a"), (&2, &"b"), (&3, &"c")]);
}

#[test]
fn entry_views() {
    let mut map = AvlTreeMap::from([("a", 1)]);
    match map.entry("a") {
        Entry::Occupied(mut o) => {
            assert_eq!(o.insert(10), 1);
            assert_eq!(o.key(), &"a");
        }
        Entry::Vacant(_) => panic!("expected an occupied entry"),
    }
    assert_eq!(map.entry("b").key(), &"b");
    assert_eq!(*map.entry("bb").or_insert_with_key(|k| if k.len() == 2 { 2 } else { 0 }), 2);
    assert_eq!(map.entry("a").or_default(), &mut 10);
}

#[test]
fn capacity_and_fallible_insert() {
    let mut map: AvlTreeMap<u32, u32> = AvlTreeMap::with_capacity(16);
    assert!(map.capacity() >= 16);
    for k in 0..16 {
        map.try_insert(k, k).unwrap();
    }
    for k in 0..8 {
        map.remove(&k);
    }
    let capacity = map.capacity();
    map.reserve(8);
    assert_eq!(map.capacity(), capacity);
    assert!(map.try_reserve(usize::MAX).is_err());
    assert_eq!(map.len(), 8);
    assert!(map.max_len() > map.len());
}

#[test]
fn hash_follows_equality() {
    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    let a: AvlTreeMap<i32, i32> = (0..50).map(|k| (k, -k)).collect();
    let b: AvlTreeMap<i32, i32> = (0..50).rev().map(|k| (k, -k)).collect();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn owning_iterators() {
    let map = AvlTreeMap::from([(2, "b"), (1, "a"), (3, "c")]);
    assert_eq!(map.clone().into_keys().collect::<Vec<_>>(), [1, 2, 3]);
    assert_eq!(map.clone().into_values().rev().collect::<Vec<_>>(), ["c", "b", "a"]);

    let mut iter = map.into_iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next_back(), Some((3, "c")));
    assert_eq!(iter.next(), Some((1, "a")));
    assert_eq!(iter.collect::<Vec<_>>(), [(2, "b")]);
}

#[test]
fn debug_output() {
    let map = AvlTreeMap::from([(1, "a"), (2, "b")]);
    assert_eq!(format!("{map:?}"), r#"{1: "a", 2: "b"}"#);
    assert_eq!(format!("{:?}", map.keys()), "[1, 2]");
    let empty: avl_tree_map::Range<'_, i32, i32> = Default::default();
    assert_eq!(format!("{empty:?}"), "[]");
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map = AvlTreeMap::from([(1, 1)]);
    let _ = map[&2];
}

#[test]
#[should_panic(expected = "range start is greater than range end in AvlTreeMap")]
fn range_start_after_end_panics() {
    let map = AvlTreeMap::from([(1, 1)]);
    let _ = map.range(3..1);
}
