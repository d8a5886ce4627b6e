//! Pool assembly: distribute present fighters into pools and generate fights.

use crate::logic::pairing::PairingGenerator;
use crate::models::{Competition, CompetitionError, Fighter, Pool, PoolEntry};
use rand::seq::SliceRandom;

/// Distribute present fighters into pools.
///
/// 1. Require a locked roster and at least `min_per_pool` present fighters.
/// 2. Shuffle the present fighters (draw order).
/// 3. Deal them round-robin into `ceil(present / target_per_pool)` pools,
///    capped so every pool holds at least `min_per_pool` entries.
/// 4. Number each pool's entries `1..=len` (the contiguity the pairing
///    generator requires holds by construction).
///
/// Replaces any previously assembled pools.
pub fn assemble_pools(competition: &mut Competition) -> Result<(), CompetitionError> {
    if competition.locked {
        return Err(CompetitionError::CompetitionLocked);
    }
    if !competition.locked_fighter_list {
        return Err(CompetitionError::RosterNotLocked);
    }

    let mut present: Vec<Fighter> = competition.present_fighters().cloned().collect();
    let required = competition.min_per_pool.max(2);
    if present.len() < required {
        return Err(CompetitionError::NotEnoughFighters {
            required,
            present: present.len(),
        });
    }

    present.shuffle(&mut rand::thread_rng());

    let target = competition.target_per_pool.max(required);
    let wanted = present.len().div_ceil(target);
    let max_pools = (present.len() / required).max(1);
    let pool_count = wanted.min(max_pools);

    let mut buckets: Vec<Vec<Fighter>> = vec![Vec::new(); pool_count];
    for (i, fighter) in present.into_iter().enumerate() {
        buckets[i % pool_count].push(fighter);
    }

    competition.pools = buckets
        .into_iter()
        .enumerate()
        .map(|(i, fighters)| Pool {
            number: (i + 1) as u32,
            entries: fighters
                .into_iter()
                .enumerate()
                .map(|(k, fighter)| PoolEntry::new((k + 1) as u32, fighter.id, fighter))
                .collect(),
            fights: Vec::new(),
        })
        .collect();

    Ok(())
}

/// Generate the round-robin fight order for every assembled pool.
/// Pools below `min_per_pool` get an empty fight list (no error).
pub fn generate_pool_fights(competition: &mut Competition) -> Result<(), CompetitionError> {
    if competition.locked {
        return Err(CompetitionError::CompetitionLocked);
    }
    if competition.pools.is_empty() {
        return Err(CompetitionError::PoolsNotAssembled);
    }

    let min_per_pool = competition.min_per_pool;
    for pool in &mut competition.pools {
        let generator = PairingGenerator::new(pool.entries.clone(), min_per_pool)?;
        pool.fights = generator.compile();
    }
    Ok(())
}
