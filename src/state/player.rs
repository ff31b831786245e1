//! Player records.
//!
//! A player is identified by a unique nickname chosen at join time.
//! Fields accumulate as the session progresses: a kit during the picking
//! period, a bid during the auction, a roll during a tie-break. Earlier
//! fields are carried forward whenever the game state is rebuilt for a
//! later phase.

use serde::{Deserialize, Serialize};

/// A player's selected loadout: two skills and one obsession.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kit {
    pub skill_one: String,
    pub skill_two: String,
    pub obsession: String,
}

impl Kit {
    pub fn new(
        skill_one: impl Into<String>,
        skill_two: impl Into<String>,
        obsession: impl Into<String>,
    ) -> Self {
        Self {
            skill_one: skill_one.into(),
            skill_two: skill_two.into(),
            obsession: obsession.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "skill_one": self.skill_one,
            "skill_two": self.skill_two,
            "obsession": self.obsession
        })
    }
}

/// A participant in the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Unique display name (case-sensitive). Stable for the whole session.
    pub nickname: String,

    /// Kit selected during the picking period.
    pub kit: Option<Kit>,

    /// Bid placed during the auction.
    pub bid: Option<u32>,

    /// Roll submitted during a tie-break.
    pub tie_roll: Option<u32>,

    /// When the player joined the lobby.
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

impl Player {
    /// Create a fresh player with no attached fields.
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            kit: None,
            bid: None,
            tie_roll: None,
            joined_at: chrono::Utc::now(),
        }
    }

    /// Check if the player has selected a kit.
    pub fn has_kit(&self) -> bool {
        self.kit.is_some()
    }

    /// Check if the player has placed a bid.
    pub fn has_bid(&self) -> bool {
        self.bid.is_some()
    }

    /// Check if the player has submitted a tie-break roll.
    pub fn has_tie_roll(&self) -> bool {
        self.tie_roll.is_some()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "nickname": self.nickname,
            "joined_at": self.joined_at.to_rfc3339()
        });
        if let Some(kit) = &self.kit {
            obj["kit"] = kit.to_json();
        }
        if let Some(bid) = self.bid {
            obj["bid"] = serde_json::json!(bid);
        }
        if let Some(roll) = self.tie_roll {
            obj["tie_roll"] = serde_json::json!(roll);
        }
        obj
    }
}
