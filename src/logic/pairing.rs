//! Round-robin pairing: generate the full fight order for one pool.

use crate::models::{Fight, FightSide, PairingError, PoolEntry};

/// The column pick flips between head and tail every this many fights.
const CHANGE_PICK_EACH: u32 = 2;

/// Remaining-opponent rows, one per entry number (dense, 1-based access).
/// Always the symmetric complement of the fights emitted so far.
#[derive(Clone, Debug)]
struct OpponentMatrix {
    rows: Vec<Vec<u32>>,
}

impl OpponentMatrix {
    /// Complete graph minus self-loops: row(n) = `1..=N` without n.
    fn complete(pool_size: u32) -> Self {
        let rows = (1..=pool_size)
            .map(|n| (1..=pool_size).filter(|&m| m != n).collect())
            .collect();
        Self { rows }
    }

    fn row(&self, n: u32) -> &[u32] {
        &self.rows[(n - 1) as usize]
    }

    /// First entry number at or after `n` (wrapping) whose row still has
    /// opponents. Callers must ensure at least one row is non-empty.
    fn skip_exhausted(&self, mut n: u32) -> u32 {
        let pool_size = self.rows.len() as u32;
        while self.row(n).is_empty() {
            n = if n == pool_size { 1 } else { n + 1 };
        }
        n
    }

    /// Consume the edge between `n` and the opponent at `column` of its row.
    /// Both directions are removed in the same step so the matrix never holds
    /// a one-sided pairing. Returns the opponent number.
    fn consume_edge(&mut self, n: u32, column: usize) -> u32 {
        let n2 = self.rows[(n - 1) as usize].remove(column);
        self.rows[(n2 - 1) as usize].retain(|&m| m != n);
        n2
    }
}

/// Wrap a cursor that may have stepped past the pool back into `1..=pool_size`.
fn wrap_number(n: u32, pool_size: u32) -> u32 {
    (n - 1) % pool_size + 1
}

/// Round-robin fight order generator for one pool (circle elimination with
/// alternating column pick).
///
/// Built from a pool's entry list; `compile` walks the opponent matrix and
/// emits every unordered pair of entries exactly once, in an order fit for
/// live execution (back-to-back fights of one entry are avoided where the
/// pool size allows it).
#[derive(Clone, Debug)]
pub struct PairingGenerator<T> {
    entries: Vec<PoolEntry<T>>,
    min_per_pool: usize,
    /// Pristine complete matrix; cloned per `compile` call.
    matrix: OpponentMatrix,
    /// Position in `entries` for each number, at index `number - 1`.
    index_by_number: Vec<usize>,
}

impl<T: Clone> PairingGenerator<T> {
    /// Build a generator for a pool.
    ///
    /// Entry numbers must be exactly the contiguous range `1..=N`: they are
    /// used as direct matrix indices, and a gap or duplicate would make the
    /// traversal spin forever. Checked here, fail-fast.
    pub fn new(entries: Vec<PoolEntry<T>>, min_per_pool: usize) -> Result<Self, PairingError> {
        let pool_size = entries.len();
        let mut index_by_number: Vec<Option<usize>> = vec![None; pool_size];
        for (idx, entry) in entries.iter().enumerate() {
            let number = entry.number;
            if number == 0 || number as usize > pool_size {
                return Err(PairingError::NumberOutOfRange { number, pool_size });
            }
            let slot = &mut index_by_number[(number - 1) as usize];
            if slot.is_some() {
                return Err(PairingError::DuplicateNumber(number));
            }
            *slot = Some(idx);
        }
        // N in-range numbers without duplicates fill every slot, so the
        // numbering is contiguous.
        let index_by_number = index_by_number.into_iter().flatten().collect();
        Ok(Self {
            matrix: OpponentMatrix::complete(pool_size as u32),
            entries,
            min_per_pool,
            index_by_number,
        })
    }

    /// Number of fights a full compilation emits: `N*(N-1)/2`.
    pub fn total_fights(&self) -> usize {
        self.entries.len() * self.entries.len().saturating_sub(1) / 2
    }

    /// Generate the fight order for the pool.
    ///
    /// Returns an empty list when the pool is below `min_per_pool` (not an
    /// error: the pool is too small to fight). Otherwise, until `N*(N-1)/2`
    /// fights are emitted:
    /// 1. Wrap the cursor back into `1..=N` and skip entries with no
    ///    remaining opponents.
    /// 2. Every second fight, flip whether the earliest- or latest-remaining
    ///    opponent of the cursor entry is picked.
    /// 3. Consume the edge (both rows in one step) and emit the fight with
    ///    the lower-numbered entry first.
    /// 4. Advance the cursor by 2; the stagger rotates opponents instead of
    ///    enumerating pairs nested-loop style.
    ///
    /// Deterministic: equal entry lists give element-wise equal fight lists,
    /// and repeated calls on one generator give the same result.
    pub fn compile(&self) -> Vec<Fight<T>> {
        if self.entries.len() < self.min_per_pool {
            return Vec::new();
        }
        let pool_size = self.entries.len() as u32;
        let total = self.total_fights();
        let mut matrix = self.matrix.clone();
        let mut fights = Vec::with_capacity(total);

        let mut n: u32 = 1;
        let mut pick_tail = false;
        let mut toggle_cooldown = CHANGE_PICK_EACH - 1;
        while fights.len() < total {
            n = matrix.skip_exhausted(wrap_number(n, pool_size));

            if toggle_cooldown == 0 {
                pick_tail = !pick_tail;
                toggle_cooldown = CHANGE_PICK_EACH;
            }
            let column = if pick_tail { matrix.row(n).len() - 1 } else { 0 };

            let n2 = matrix.consume_edge(n, column);
            fights.push(self.resolve_fight(n, n2));

            toggle_cooldown -= 1;
            n += 2;
        }
        fights
    }

    /// Resolve two entry numbers into a fight, lower number first.
    fn resolve_fight(&self, n: u32, n2: u32) -> Fight<T> {
        let (low, high) = if n2 < n { (n2, n) } else { (n, n2) };
        Fight {
            first: self.resolve_side(low),
            second: self.resolve_side(high),
        }
    }

    fn resolve_side(&self, number: u32) -> FightSide<T> {
        let entry = &self.entries[self.index_by_number[(number - 1) as usize]];
        FightSide {
            entriable_id: entry.entriable_id,
            entriable: entry.entriable.clone(),
        }
    }
}
