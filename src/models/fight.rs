//! Pool entries and fights: the data the pairing generator consumes and produces.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque reference to the underlying participant (fighter or team).
/// Carried through scheduling unchanged and never interpreted by it.
pub type EntriableId = Uuid;

/// Errors raised when an entry list cannot be scheduled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PairingError {
    /// An entry number falls outside `1..=pool_size`.
    NumberOutOfRange { number: u32, pool_size: usize },
    /// Two entries share the same number.
    DuplicateNumber(u32),
}

impl std::fmt::Display for PairingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairingError::NumberOutOfRange { number, pool_size } => {
                write!(f, "Entry number {} is outside 1..={}", number, pool_size)
            }
            PairingError::DuplicateNumber(n) => {
                write!(f, "Entry number {} appears more than once", n)
            }
        }
    }
}

/// A participant slot in a pool.
///
/// `number` is a structural position: pool entries must be numbered exactly
/// `1..=N` with no gaps or duplicates (checked when a generator is built).
/// The payload `T` is carried through unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PoolEntry<T> {
    pub number: u32,
    pub entriable_id: EntriableId,
    pub entriable: T,
}

impl<T> PoolEntry<T> {
    pub fn new(number: u32, entriable_id: EntriableId, entriable: T) -> Self {
        Self {
            number,
            entriable_id,
            entriable,
        }
    }
}

/// One side of a fight, resolved to the participant reference and payload.
/// The internal pool number is not exposed here.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FightSide<T> {
    pub entriable_id: EntriableId,
    pub entriable: T,
}

/// A scheduled pairing between two distinct pool entries.
///
/// Canonical orientation: `first` is the side whose pool number is smaller,
/// regardless of which side the generator's cursor was on.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fight<T> {
    pub first: FightSide<T>,
    pub second: FightSide<T>,
}
