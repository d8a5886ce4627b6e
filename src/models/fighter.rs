//! Fighter data structures (roster members of a competition).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a fighter (used in rosters and lookups).
pub type FighterId = Uuid;

/// A fighter on a competition roster. For a team competition this is one
/// team entry (the name is the team name).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub id: FighterId,
    pub name: String,
    /// Federation license number; unique within a competition (case-insensitive).
    pub license: String,
    pub club: Option<String>,
    /// Checked in at the venue. Only present fighters are placed into pools.
    pub is_present: bool,
}

impl Fighter {
    /// Create a roster entry. Fighters start absent until checked in.
    pub fn new(name: impl Into<String>, license: impl Into<String>, club: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            license: license.into(),
            club,
            is_present: false,
        }
    }

    /// Mark the fighter as checked in (or back out).
    pub fn set_present(&mut self, present: bool) {
        self.is_present = present;
    }
}
