//! Competition, Pool, and CompetitionError.

use crate::models::fight::{Fight, PairingError, PoolEntry};
use crate::models::fighter::{Fighter, FighterId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during competition operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompetitionError {
    /// The fighter list is locked; roster edits are no longer allowed.
    RosterLocked,
    /// The operation requires a locked fighter list (pool assembly, generation).
    RosterNotLocked,
    /// The competition is locked; no further changes are allowed.
    CompetitionLocked,
    /// Fighter not found on the roster.
    FighterNotFound(FighterId),
    /// A fighter with this license already exists (licenses are unique, case-insensitive).
    DuplicateLicense,
    /// Fighter name must not be empty.
    EmptyFighterName,
    /// Not enough present fighters to form a pool.
    NotEnoughFighters { required: usize, present: usize },
    /// Fights cannot be generated before pools are assembled.
    PoolsNotAssembled,
    /// A pool's entry list failed pairing validation.
    Pairing(PairingError),
}

impl std::fmt::Display for CompetitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompetitionError::RosterLocked => write!(f, "The fighter list is locked"),
            CompetitionError::RosterNotLocked => {
                write!(f, "The fighter list must be locked first")
            }
            CompetitionError::CompetitionLocked => write!(f, "The competition is locked"),
            CompetitionError::FighterNotFound(_) => write!(f, "Fighter not found"),
            CompetitionError::DuplicateLicense => {
                write!(f, "A fighter with this license already exists")
            }
            CompetitionError::EmptyFighterName => write!(f, "Fighter name must not be empty"),
            CompetitionError::NotEnoughFighters { required, present } => {
                write!(f, "Need at least {} present fighters ({} present)", required, present)
            }
            CompetitionError::PoolsNotAssembled => {
                write!(f, "Pools have not been assembled yet")
            }
            CompetitionError::Pairing(e) => write!(f, "{}", e),
        }
    }
}

impl From<PairingError> for CompetitionError {
    fn from(e: PairingError) -> Self {
        CompetitionError::Pairing(e)
    }
}

/// Unique identifier for a competition.
pub type CompetitionId = Uuid;

/// Whether entries are individual fighters or teams.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionKind {
    #[default]
    Individual,
    Team,
}

/// A pool: present fighters numbered `1..=len`, fighting round-robin.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    /// 1-based pool number within the competition.
    pub number: u32,
    pub entries: Vec<PoolEntry<Fighter>>,
    /// Generated fight order (empty until generation runs).
    pub fights: Vec<Fight<Fighter>>,
}

/// Full competition state: roster, scheduling config, and assembled pools.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub place: Option<String>,
    pub owner: Option<String>,
    pub kind: CompetitionKind,
    /// Competition fully locked (after fights are handed off for execution).
    pub locked: bool,
    /// Roster frozen; prerequisite for pool assembly.
    pub locked_fighter_list: bool,
    /// Pools smaller than this produce no fights.
    pub min_per_pool: usize,
    /// Preferred pool size when distributing present fighters.
    pub target_per_pool: usize,
    pub fighter_list: Vec<Fighter>,
    pub pools: Vec<Pool>,
}

impl Competition {
    /// Create a new competition with an empty roster and default pool sizing.
    pub fn new(name: impl Into<String>, kind: CompetitionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date: None,
            place: None,
            owner: None,
            kind,
            locked: false,
            locked_fighter_list: false,
            min_per_pool: 2,
            target_per_pool: 5,
            fighter_list: Vec::new(),
            pools: Vec::new(),
        }
    }

    /// Create a competition with an initial roster (e.g. from an import).
    pub fn with_fighters(
        name: impl Into<String>,
        kind: CompetitionKind,
        fighters: Vec<Fighter>,
    ) -> Self {
        Self {
            fighter_list: fighters,
            ..Self::new(name, kind)
        }
    }

    /// Mutable reference to a roster fighter by id.
    pub fn get_fighter_mut(&mut self, id: FighterId) -> Option<&mut Fighter> {
        self.fighter_list.iter_mut().find(|x| x.id == id)
    }

    /// Fighters checked in at the venue.
    pub fn present_fighters(&self) -> impl Iterator<Item = &Fighter> {
        self.fighter_list.iter().filter(|x| x.is_present)
    }

    /// Fighters on the roster who have not checked in.
    pub fn missing_fighters(&self) -> impl Iterator<Item = &Fighter> {
        self.fighter_list.iter().filter(|x| !x.is_present)
    }

    pub fn fighter_count(&self) -> usize {
        self.fighter_list.len()
    }

    pub fn present_count(&self) -> usize {
        self.present_fighters().count()
    }

    /// Add a fighter to the roster. Licenses must be unique (case-insensitive).
    pub fn add_fighter(
        &mut self,
        name: impl Into<String>,
        license: impl Into<String>,
        club: Option<String>,
    ) -> Result<(), CompetitionError> {
        self.ensure_roster_open()?;
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(CompetitionError::EmptyFighterName);
        }
        let license = license.into();
        let license_trimmed = license.trim();
        let is_duplicate = self
            .fighter_list
            .iter()
            .any(|x| x.license.eq_ignore_ascii_case(license_trimmed));
        if is_duplicate {
            return Err(CompetitionError::DuplicateLicense);
        }
        self.fighter_list
            .push(Fighter::new(name_trimmed, license_trimmed, club));
        Ok(())
    }

    /// Remove a fighter by id (roster must be open).
    pub fn remove_fighter(&mut self, fighter_id: FighterId) -> Result<(), CompetitionError> {
        self.ensure_roster_open()?;
        let idx = self
            .fighter_list
            .iter()
            .position(|x| x.id == fighter_id)
            .ok_or(CompetitionError::FighterNotFound(fighter_id))?;
        self.fighter_list.remove(idx);
        Ok(())
    }

    /// Check a fighter in or out. Allowed while the competition is unlocked,
    /// even with a frozen roster (check-in happens after registration closes).
    pub fn set_fighter_presence(
        &mut self,
        fighter_id: FighterId,
        present: bool,
    ) -> Result<(), CompetitionError> {
        if self.locked {
            return Err(CompetitionError::CompetitionLocked);
        }
        let fighter = self
            .get_fighter_mut(fighter_id)
            .ok_or(CompetitionError::FighterNotFound(fighter_id))?;
        fighter.set_present(present);
        Ok(())
    }

    /// Check several fighters in or out at once. Every id must exist; on a
    /// missing id nothing is changed.
    pub fn bulk_set_presence(
        &mut self,
        fighter_ids: &[FighterId],
        present: bool,
    ) -> Result<(), CompetitionError> {
        if self.locked {
            return Err(CompetitionError::CompetitionLocked);
        }
        for &id in fighter_ids {
            if !self.fighter_list.iter().any(|x| x.id == id) {
                return Err(CompetitionError::FighterNotFound(id));
            }
        }
        for &id in fighter_ids {
            if let Some(fighter) = self.get_fighter_mut(id) {
                fighter.set_present(present);
            }
        }
        Ok(())
    }

    /// Set the minimum pool size below which no fights are generated.
    pub fn set_min_per_pool(&mut self, min_per_pool: usize) -> Result<(), CompetitionError> {
        if self.locked {
            return Err(CompetitionError::CompetitionLocked);
        }
        self.min_per_pool = min_per_pool;
        Ok(())
    }

    /// Set the preferred pool size used when distributing fighters.
    pub fn set_target_per_pool(&mut self, target_per_pool: usize) -> Result<(), CompetitionError> {
        if self.locked {
            return Err(CompetitionError::CompetitionLocked);
        }
        self.target_per_pool = target_per_pool;
        Ok(())
    }

    /// Freeze the roster. Pool assembly requires this.
    pub fn lock_fighter_list(&mut self) -> Result<(), CompetitionError> {
        if self.locked {
            return Err(CompetitionError::CompetitionLocked);
        }
        self.locked_fighter_list = true;
        Ok(())
    }

    /// Lock the whole competition (fights handed off; no further edits).
    pub fn lock(&mut self) -> Result<(), CompetitionError> {
        if self.locked {
            return Err(CompetitionError::CompetitionLocked);
        }
        self.locked = true;
        Ok(())
    }

    fn ensure_roster_open(&self) -> Result<(), CompetitionError> {
        if self.locked {
            return Err(CompetitionError::CompetitionLocked);
        }
        if self.locked_fighter_list {
            return Err(CompetitionError::RosterLocked);
        }
        Ok(())
    }
}
