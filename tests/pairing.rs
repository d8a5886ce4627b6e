//! Integration tests for the round-robin pairing generator.

use combat_pool_web::{Fight, PairingError, PairingGenerator, PoolEntry};
use std::collections::HashSet;
use uuid::Uuid;

/// Entries numbered 1..=n; the payload carries the number so fights can be
/// read back as number pairs.
fn entries(n: u32) -> Vec<PoolEntry<u32>> {
    (1..=n).map(|k| PoolEntry::new(k, Uuid::new_v4(), k)).collect()
}

fn numbers(fight: &Fight<u32>) -> (u32, u32) {
    (fight.first.entriable, fight.second.entriable)
}

#[test]
fn fight_count_matches_formula() {
    for n in 2..=12u32 {
        let generator = PairingGenerator::new(entries(n), 2).unwrap();
        let fights = generator.compile();
        assert_eq!(fights.len(), (n * (n - 1) / 2) as usize, "pool size {n}");
    }
}

#[test]
fn every_pair_appears_exactly_once() {
    for n in 2..=10u32 {
        let generator = PairingGenerator::new(entries(n), 2).unwrap();
        let fights = generator.compile();
        let mut seen = HashSet::new();
        for fight in &fights {
            assert!(seen.insert(numbers(fight)), "duplicate pair in pool size {n}");
        }
        for a in 1..=n {
            for b in (a + 1)..=n {
                assert!(seen.contains(&(a, b)), "missing pair ({a},{b}) in pool size {n}");
            }
        }
    }
}

#[test]
fn fights_are_lower_number_first() {
    for n in 2..=10u32 {
        let generator = PairingGenerator::new(entries(n), 2).unwrap();
        for fight in generator.compile() {
            let (a, b) = numbers(&fight);
            assert!(a < b, "fight ({a},{b}) not in canonical orientation");
        }
    }
}

#[test]
fn identical_inputs_compile_identically() {
    let list = entries(7);
    let g1 = PairingGenerator::new(list.clone(), 2).unwrap();
    let g2 = PairingGenerator::new(list, 2).unwrap();
    assert_eq!(g1.compile(), g2.compile());
}

#[test]
fn compile_is_repeatable_on_one_generator() {
    let generator = PairingGenerator::new(entries(6), 2).unwrap();
    assert_eq!(generator.compile(), generator.compile());
}

#[test]
fn four_entry_pool_fight_order() {
    let generator = PairingGenerator::new(entries(4), 2).unwrap();
    let order: Vec<(u32, u32)> = generator.compile().iter().map(numbers).collect();
    assert_eq!(order, vec![(1, 2), (3, 4), (1, 4), (1, 3), (2, 3), (2, 4)]);
}

#[test]
fn two_entry_pool_has_one_fight() {
    let generator = PairingGenerator::new(entries(2), 2).unwrap();
    let order: Vec<(u32, u32)> = generator.compile().iter().map(numbers).collect();
    assert_eq!(order, vec![(1, 2)]);
}

#[test]
fn pool_below_min_threshold_compiles_empty() {
    let generator = PairingGenerator::new(entries(3), 4).unwrap();
    assert!(generator.compile().is_empty());
}

#[test]
fn min_per_pool_zero_always_proceeds() {
    let generator = PairingGenerator::new(entries(2), 0).unwrap();
    assert_eq!(generator.compile().len(), 1);
    let empty = PairingGenerator::new(Vec::<PoolEntry<u32>>::new(), 0).unwrap();
    assert!(empty.compile().is_empty());
}

#[test]
fn zero_or_one_entry_produces_no_fights() {
    let generator = PairingGenerator::new(entries(1), 0).unwrap();
    assert!(generator.compile().is_empty());
    let generator = PairingGenerator::new(entries(0), 0).unwrap();
    assert!(generator.compile().is_empty());
}

#[test]
fn entry_list_order_does_not_have_to_match_numbers() {
    // Numbers 1..=3 supplied out of list order; resolution goes by number.
    let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    let list = vec![
        PoolEntry::new(3, ids[2], 3u32),
        PoolEntry::new(1, ids[0], 1u32),
        PoolEntry::new(2, ids[1], 2u32),
    ];
    let generator = PairingGenerator::new(list, 2).unwrap();
    let fights = generator.compile();
    let order: Vec<(u32, u32)> = fights.iter().map(numbers).collect();
    assert_eq!(order, vec![(1, 2), (2, 3), (1, 3)]);
    // The opaque reference rides along with the payload it was supplied with.
    for fight in &fights {
        assert_eq!(fight.first.entriable_id, ids[(fight.first.entriable - 1) as usize]);
        assert_eq!(fight.second.entriable_id, ids[(fight.second.entriable - 1) as usize]);
    }
}

#[test]
fn duplicate_number_is_rejected() {
    let list = vec![
        PoolEntry::new(1, Uuid::new_v4(), 1u32),
        PoolEntry::new(1, Uuid::new_v4(), 2u32),
        PoolEntry::new(3, Uuid::new_v4(), 3u32),
    ];
    assert!(matches!(
        PairingGenerator::new(list, 2),
        Err(PairingError::DuplicateNumber(1))
    ));
}

#[test]
fn out_of_range_number_is_rejected() {
    let list = vec![
        PoolEntry::new(1, Uuid::new_v4(), 1u32),
        PoolEntry::new(2, Uuid::new_v4(), 2u32),
        PoolEntry::new(4, Uuid::new_v4(), 4u32),
    ];
    assert!(matches!(
        PairingGenerator::new(list, 2),
        Err(PairingError::NumberOutOfRange { number: 4, pool_size: 3 })
    ));

    let list = vec![
        PoolEntry::new(0, Uuid::new_v4(), 0u32),
        PoolEntry::new(1, Uuid::new_v4(), 1u32),
    ];
    assert!(matches!(
        PairingGenerator::new(list, 2),
        Err(PairingError::NumberOutOfRange { number: 0, pool_size: 2 })
    ));
}

#[test]
fn payload_is_passed_through_untouched() {
    let list = vec![
        PoolEntry::new(1, Uuid::new_v4(), "red corner".to_string()),
        PoolEntry::new(2, Uuid::new_v4(), "blue corner".to_string()),
    ];
    let generator = PairingGenerator::new(list, 2).unwrap();
    let fights = generator.compile();
    assert_eq!(fights.len(), 1);
    assert_eq!(fights[0].first.entriable, "red corner");
    assert_eq!(fights[0].second.entriable, "blue corner");
}
