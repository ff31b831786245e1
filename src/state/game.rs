//! Game state model.
//!
//! The session is a tagged union with one variant per phase. Exactly one
//! variant is active at any time; every committed transition replaces the
//! whole value. Construction and inspection live here; all mutation goes
//! through the transition catalog.

use crate::state::player::Player;
use serde::{Deserialize, Serialize};

/// A skill check succeeds when willpower plus roll meets this value.
pub const SKILL_CHECK_THRESHOLD: u32 = 15;

/// Phase tag for the active variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Players are joining
    WaitingLobby,
    /// Players are selecting kits
    PickingPeriod,
    /// Players are bidding for the control seat
    Bidding,
    /// Top bidders are rolling off a tie
    TieRoll,
    /// The control seat is live
    ActivePlay,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WaitingLobby => "waiting_lobby",
            Self::PickingPeriod => "picking_period",
            Self::Bidding => "bidding",
            Self::TieRoll => "tie_roll",
            Self::ActivePlay => "active_play",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the most recent skill check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheckResult {
    pub willpower_added: u32,
    pub roll_result: u32,
    pub succeeded: bool,
}

impl SkillCheckResult {
    /// Resolve a check against [`SKILL_CHECK_THRESHOLD`].
    pub fn resolve(willpower_added: u32, roll_result: u32) -> Self {
        Self {
            willpower_added,
            roll_result,
            succeeded: willpower_added + roll_result >= SKILL_CHECK_THRESHOLD,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "willpower_added": self.willpower_added,
            "roll_result": self.roll_result,
            "succeeded": self.succeeded
        })
    }
}

/// The authoritative session state, one variant per phase.
///
/// After the lobby closes, the players are partitioned into one control
/// seat holder plus everyone else. Later phases rebuild the partition from
/// the previous one; the auction is the one mechanism that changes who
/// holds the seat.
#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    WaitingLobby {
        players: Vec<Player>,
    },
    PickingPeriod {
        control_player: Player,
        other_players: Vec<Player>,
    },
    Bidding {
        control_player: Player,
        other_players: Vec<Player>,
    },
    TieRoll {
        control_player: Player,
        other_players: Vec<Player>,
    },
    ActivePlay {
        control_player: Player,
        other_players: Vec<Player>,
        last_instruction: Option<String>,
        last_skill_check: Option<SkillCheckResult>,
    },
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// The state every session starts in: an empty lobby.
    pub fn new() -> Self {
        Self::WaitingLobby {
            players: Vec::new(),
        }
    }

    /// Tag of the active variant.
    pub fn phase(&self) -> Phase {
        match self {
            Self::WaitingLobby { .. } => Phase::WaitingLobby,
            Self::PickingPeriod { .. } => Phase::PickingPeriod,
            Self::Bidding { .. } => Phase::Bidding,
            Self::TieRoll { .. } => Phase::TieRoll,
            Self::ActivePlay { .. } => Phase::ActivePlay,
        }
    }

    /// All players, control seat first once the partition exists.
    pub fn players(&self) -> Vec<&Player> {
        match self {
            Self::WaitingLobby { players } => players.iter().collect(),
            Self::PickingPeriod {
                control_player,
                other_players,
            }
            | Self::Bidding {
                control_player,
                other_players,
            }
            | Self::TieRoll {
                control_player,
                other_players,
            }
            | Self::ActivePlay {
                control_player,
                other_players,
                ..
            } => std::iter::once(control_player)
                .chain(other_players.iter())
                .collect(),
        }
    }

    /// Find a player by nickname.
    pub fn find_player(&self, nickname: &str) -> Option<&Player> {
        self.players().into_iter().find(|p| p.nickname == nickname)
    }

    /// Check if a nickname is taken.
    pub fn contains_nickname(&self, nickname: &str) -> bool {
        self.find_player(nickname).is_some()
    }

    /// Player count across the whole partition.
    pub fn player_count(&self) -> usize {
        self.players().len()
    }

    /// The control seat holder, if the partition exists yet.
    pub fn control_player(&self) -> Option<&Player> {
        match self {
            Self::WaitingLobby { .. } => None,
            Self::PickingPeriod { control_player, .. }
            | Self::Bidding { control_player, .. }
            | Self::TieRoll { control_player, .. }
            | Self::ActivePlay { control_player, .. } => Some(control_player),
        }
    }

    /// Highest bid placed so far.
    pub fn top_bid(&self) -> Option<u32> {
        self.players().iter().filter_map(|p| p.bid).max()
    }

    /// Players whose bid equals the top bid. The tie set is derived from
    /// the bids rather than stored.
    pub fn tied_players(&self) -> Vec<&Player> {
        match self.top_bid() {
            Some(top) => self
                .players()
                .into_iter()
                .filter(|p| p.bid == Some(top))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Full snapshot for clients. Every push is a complete replacement.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::WaitingLobby { players } => serde_json::json!({
                "phase": self.phase().as_str(),
                "players": players.iter().map(|p| p.to_json()).collect::<Vec<_>>()
            }),
            Self::PickingPeriod {
                control_player,
                other_players,
            }
            | Self::Bidding {
                control_player,
                other_players,
            }
            | Self::TieRoll {
                control_player,
                other_players,
            } => serde_json::json!({
                "phase": self.phase().as_str(),
                "control_player": control_player.to_json(),
                "other_players": other_players.iter().map(|p| p.to_json()).collect::<Vec<_>>()
            }),
            Self::ActivePlay {
                control_player,
                other_players,
                last_instruction,
                last_skill_check,
            } => {
                let mut obj = serde_json::json!({
                    "phase": self.phase().as_str(),
                    "control_player": control_player.to_json(),
                    "other_players": other_players.iter().map(|p| p.to_json()).collect::<Vec<_>>()
                });
                if let Some(instruction) = last_instruction {
                    obj["last_instruction"] = serde_json::json!(instruction);
                }
                if let Some(check) = last_skill_check {
                    obj["last_skill_check"] = check.to_json();
                }
                obj
            }
        }
    }
}
