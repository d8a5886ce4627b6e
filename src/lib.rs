//! Combat sports competition organizer: library with models and scheduling logic.

pub mod logic;
pub mod models;

pub use logic::{assemble_pools, generate_pool_fights, PairingGenerator};
pub use models::{
    Competition, CompetitionError, CompetitionId, CompetitionKind, EntriableId, Fight, FightSide,
    Fighter, FighterId, PairingError, Pool, PoolEntry,
};
