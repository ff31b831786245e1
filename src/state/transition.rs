//! Transition catalog.
//!
//! One function per player or game action. Each is a pure computation from
//! the current state plus an action payload to the next state; nothing here
//! touches the store. Invalid actions are explicit rejections rather than
//! silent no-ops, so the boundary layer can tell a client what went wrong.

use rand::Rng;

use crate::state::game::{GameState, Phase, SkillCheckResult};
use crate::state::player::{Kit, Player};

/// Fewest players a session can start with: one control seat plus one other.
pub const MIN_PLAYERS_TO_START: usize = 2;

/// Why an action was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Action attempted outside its valid phase.
    InvalidPhase {
        action: &'static str,
        phase: Phase,
    },
    /// Nickname not found in the current state.
    UnknownPlayer(String),
    /// Join attempted with a nickname already present.
    DuplicatePlayer(String),
    /// Start attempted before enough players joined.
    NotEnoughPlayers { have: usize, need: usize },
    /// Tie roll submitted by a player who is not part of the tie.
    NotTied(String),
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPhase { action, phase } => {
                write!(f, "Action {} is not valid during {}", action, phase)
            }
            Self::UnknownPlayer(nickname) => write!(f, "No player named {}", nickname),
            Self::DuplicatePlayer(nickname) => {
                write!(f, "Nickname {} is already taken", nickname)
            }
            Self::NotEnoughPlayers { have, need } => {
                write!(f, "Need at least {} players to start, have {}", need, have)
            }
            Self::NotTied(nickname) => {
                write!(f, "Player {} is not part of the tie", nickname)
            }
        }
    }
}

impl std::error::Error for TransitionError {}

/// Add a new player to the lobby.
pub fn player_join_lobby(state: &GameState, nickname: &str) -> Result<GameState, TransitionError> {
    let GameState::WaitingLobby { players } = state else {
        return Err(TransitionError::InvalidPhase {
            action: "player_join_lobby",
            phase: state.phase(),
        });
    };

    if players.iter().any(|p| p.nickname == nickname) {
        return Err(TransitionError::DuplicatePlayer(nickname.to_string()));
    }

    let mut players = players.clone();
    players.push(Player::new(nickname));
    Ok(GameState::WaitingLobby { players })
}

/// Close the lobby: seat a random player as control, everyone else as
/// others, and open the picking period.
pub fn waiting_to_picking(state: &GameState) -> Result<GameState, TransitionError> {
    let GameState::WaitingLobby { players } = state else {
        return Err(TransitionError::InvalidPhase {
            action: "waiting_to_picking",
            phase: state.phase(),
        });
    };

    if players.len() < MIN_PLAYERS_TO_START {
        return Err(TransitionError::NotEnoughPlayers {
            have: players.len(),
            need: MIN_PLAYERS_TO_START,
        });
    }

    let mut players = players.clone();
    let seat = rand::thread_rng().gen_range(0..players.len());
    let control_player = players.remove(seat);

    Ok(GameState::PickingPeriod {
        control_player,
        other_players: players,
    })
}

/// Attach a kit to the named player. Re-selection overwrites.
pub fn player_skill_obsession_select(
    state: &GameState,
    nickname: &str,
    skill_one: &str,
    skill_two: &str,
    obsession: &str,
) -> Result<GameState, TransitionError> {
    let GameState::PickingPeriod {
        control_player,
        other_players,
    } = state
    else {
        return Err(TransitionError::InvalidPhase {
            action: "player_skill_obsession_select",
            phase: state.phase(),
        });
    };

    let kit = Kit::new(skill_one, skill_two, obsession);
    let (control_player, other_players) =
        with_updated_player(control_player, other_players, nickname, |p| {
            p.kit = Some(kit)
        })
        .ok_or_else(|| TransitionError::UnknownPlayer(nickname.to_string()))?;

    Ok(GameState::PickingPeriod {
        control_player,
        other_players,
    })
}

/// Attach a bid to the named player.
pub fn player_bid(
    state: &GameState,
    nickname: &str,
    bid_amt: u32,
) -> Result<GameState, TransitionError> {
    let GameState::Bidding {
        control_player,
        other_players,
    } = state
    else {
        return Err(TransitionError::InvalidPhase {
            action: "player_bid",
            phase: state.phase(),
        });
    };

    let (control_player, other_players) =
        with_updated_player(control_player, other_players, nickname, |p| {
            p.bid = Some(bid_amt)
        })
        .ok_or_else(|| TransitionError::UnknownPlayer(nickname.to_string()))?;

    Ok(GameState::Bidding {
        control_player,
        other_players,
    })
}

/// Attach a tie-break roll to the named player. Only players whose bid
/// matches the top bid are part of the tie.
pub fn player_submit_tie_roll(
    state: &GameState,
    nickname: &str,
    roll: u32,
) -> Result<GameState, TransitionError> {
    let GameState::TieRoll {
        control_player,
        other_players,
    } = state
    else {
        return Err(TransitionError::InvalidPhase {
            action: "player_submit_tie_roll",
            phase: state.phase(),
        });
    };

    if !state.contains_nickname(nickname) {
        return Err(TransitionError::UnknownPlayer(nickname.to_string()));
    }
    if !state.tied_players().iter().any(|p| p.nickname == nickname) {
        return Err(TransitionError::NotTied(nickname.to_string()));
    }

    let (control_player, other_players) =
        with_updated_player(control_player, other_players, nickname, |p| {
            p.tie_roll = Some(roll)
        })
        .ok_or_else(|| TransitionError::UnknownPlayer(nickname.to_string()))?;

    Ok(GameState::TieRoll {
        control_player,
        other_players,
    })
}

/// Record the control seat's latest instruction.
pub fn user_issues_control_instruction(
    state: &GameState,
    instruction: &str,
) -> Result<GameState, TransitionError> {
    let GameState::ActivePlay {
        control_player,
        other_players,
        last_skill_check,
        ..
    } = state
    else {
        return Err(TransitionError::InvalidPhase {
            action: "user_issues_control_instruction",
            phase: state.phase(),
        });
    };

    Ok(GameState::ActivePlay {
        control_player: control_player.clone(),
        other_players: other_players.clone(),
        last_instruction: Some(instruction.to_string()),
        last_skill_check: *last_skill_check,
    })
}

/// Resolve a skill check and store it as the latest outcome.
pub fn attempt_skill_check(
    state: &GameState,
    willpower_added: u32,
    roll_result: u32,
) -> Result<GameState, TransitionError> {
    let GameState::ActivePlay {
        control_player,
        other_players,
        last_instruction,
        ..
    } = state
    else {
        return Err(TransitionError::InvalidPhase {
            action: "attempt_skill_check",
            phase: state.phase(),
        });
    };

    Ok(GameState::ActivePlay {
        control_player: control_player.clone(),
        other_players: other_players.clone(),
        last_instruction: last_instruction.clone(),
        last_skill_check: Some(SkillCheckResult::resolve(willpower_added, roll_result)),
    })
}

/// Rebuild the partition with one player updated. None if the nickname is
/// not present.
fn with_updated_player(
    control_player: &Player,
    other_players: &[Player],
    nickname: &str,
    update: impl FnOnce(&mut Player),
) -> Option<(Player, Vec<Player>)> {
    let mut control = control_player.clone();
    let mut others = other_players.to_vec();

    if control.nickname == nickname {
        update(&mut control);
    } else if let Some(player) = others.iter_mut().find(|p| p.nickname == nickname) {
        update(player);
    } else {
        return None;
    }

    Some((control, others))
}
