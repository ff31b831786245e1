//! Phase-completion resolvers.
//!
//! Each resolver inspects the current state and, once every required input
//! has been collected, produces the next phase. `None` means the predicate
//! is not satisfied yet, which is a normal no-op rather than an error.
//! Resolvers are safe to invoke unconditionally after any transition and
//! never produce a partially-advanced state.

use crate::state::game::GameState;
use crate::state::player::Player;

/// Everyone has a kit: close the picking period and open the auction.
pub fn maybe_finish_picking(state: &GameState) -> Option<GameState> {
    let GameState::PickingPeriod {
        control_player,
        other_players,
    } = state
    else {
        return None;
    };

    if !state.players().iter().all(|p| p.has_kit()) {
        return None;
    }

    Some(GameState::Bidding {
        control_player: control_player.clone(),
        other_players: other_players.clone(),
    })
}

/// Everyone has bid: the top bid takes the control seat. A tie at the top
/// sends the tied players to a roll-off instead.
pub fn maybe_finish_bidding(state: &GameState) -> Option<GameState> {
    let GameState::Bidding {
        control_player,
        other_players,
    } = state
    else {
        return None;
    };

    if !state.players().iter().all(|p| p.has_bid()) {
        return None;
    }

    let tied = state.tied_players();
    if tied.len() > 1 {
        return Some(GameState::TieRoll {
            control_player: control_player.clone(),
            other_players: other_players.clone(),
        });
    }

    let winner = tied.first()?.nickname.clone();
    let everyone: Vec<Player> = state.players().into_iter().cloned().collect();
    let (control_player, other_players) = seat_control(everyone, &winner)?;

    Some(GameState::ActivePlay {
        control_player,
        other_players,
        last_instruction: None,
        last_skill_check: None,
    })
}

/// Every tied player has rolled: the top roll takes the control seat. A
/// re-tie at the top clears the rolls and the roll-off starts over.
pub fn maybe_finish_tie_roll(state: &GameState) -> Option<GameState> {
    let GameState::TieRoll {
        control_player,
        other_players,
    } = state
    else {
        return None;
    };

    let tied = state.tied_players();
    if tied.is_empty() || !tied.iter().all(|p| p.has_tie_roll()) {
        return None;
    }

    let top_roll = tied.iter().filter_map(|p| p.tie_roll).max()?;
    let winners: Vec<&str> = tied
        .iter()
        .filter(|p| p.tie_roll == Some(top_roll))
        .map(|p| p.nickname.as_str())
        .collect();

    if winners.len() > 1 {
        // Re-tie: reset the roll-off for the whole tie set.
        let top_bid = state.top_bid();
        let mut control = control_player.clone();
        let mut others = other_players.clone();
        if control.bid == top_bid {
            control.tie_roll = None;
        }
        for player in others.iter_mut() {
            if player.bid == top_bid {
                player.tie_roll = None;
            }
        }
        return Some(GameState::TieRoll {
            control_player: control,
            other_players: others,
        });
    }

    let winner = winners.first()?.to_string();
    let everyone: Vec<Player> = state.players().into_iter().cloned().collect();
    let (control_player, other_players) = seat_control(everyone, &winner)?;

    Some(GameState::ActivePlay {
        control_player,
        other_players,
        last_instruction: None,
        last_skill_check: None,
    })
}

/// Move the named player into the control seat, everyone else into the
/// rest of the partition. None if the nickname is absent.
fn seat_control(mut players: Vec<Player>, nickname: &str) -> Option<(Player, Vec<Player>)> {
    let seat = players.iter().position(|p| p.nickname == nickname)?;
    let control = players.remove(seat);
    Some((control, players))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::Phase;
    use crate::state::player::Kit;
    use crate::state::transition::{player_bid, player_submit_tie_roll};

    fn player_with_bid(nickname: &str, bid: u32) -> Player {
        let mut player = Player::new(nickname);
        player.bid = Some(bid);
        player
    }

    fn picking_state(kits: &[(&str, bool)]) -> GameState {
        let mut players: Vec<Player> = kits
            .iter()
            .map(|(name, has_kit)| {
                let mut p = Player::new(*name);
                if *has_kit {
                    p.kit = Some(Kit::new("skill-a", "skill-b", "obsession"));
                }
                p
            })
            .collect();
        let control_player = players.remove(0);
        GameState::PickingPeriod {
            control_player,
            other_players: players,
        }
    }

    #[test]
    fn test_picking_waits_for_all_kits() {
        let state = picking_state(&[("Ann", true), ("Bo", false)]);

        // Idempotent while incomplete.
        assert_eq!(maybe_finish_picking(&state), None);
        assert_eq!(maybe_finish_picking(&state), None);
    }

    #[test]
    fn test_picking_advances_once_complete() {
        let state = picking_state(&[("Ann", true), ("Bo", true)]);

        let next = maybe_finish_picking(&state).unwrap();
        assert_eq!(next.phase(), Phase::Bidding);
        // Kits carried forward into the auction.
        assert!(next.players().iter().all(|p| p.has_kit()));

        // The advanced state no longer matches the resolver.
        assert_eq!(maybe_finish_picking(&next), None);
    }

    #[test]
    fn test_bidding_waits_for_all_bids() {
        let state = GameState::Bidding {
            control_player: player_with_bid("Ann", 3),
            other_players: vec![Player::new("Bo")],
        };
        assert_eq!(maybe_finish_bidding(&state), None);
    }

    #[test]
    fn test_bidding_seats_unique_winner() {
        let state = GameState::Bidding {
            control_player: player_with_bid("Ann", 3),
            other_players: vec![player_with_bid("Bo", 5), player_with_bid("Cy", 2)],
        };

        let next = maybe_finish_bidding(&state).unwrap();
        let GameState::ActivePlay {
            control_player,
            other_players,
            last_instruction,
            last_skill_check,
        } = &next
        else {
            panic!("expected active play, got {}", next.phase());
        };

        assert_eq!(control_player.nickname, "Bo");
        assert_eq!(other_players.len(), 2);
        assert_eq!(last_instruction, &None);
        assert_eq!(last_skill_check, &None);
        // Bids survive the seat change.
        assert_eq!(next.find_player("Ann").unwrap().bid, Some(3));
    }

    #[test]
    fn test_bidding_tie_goes_to_roll_off() {
        let state = GameState::Bidding {
            control_player: player_with_bid("Ann", 3),
            other_players: vec![player_with_bid("Bo", 5), player_with_bid("Cy", 5)],
        };

        let next = maybe_finish_bidding(&state).unwrap();
        assert_eq!(next.phase(), Phase::TieRoll);
        // Partition unchanged until the roll-off resolves.
        assert_eq!(next.control_player().unwrap().nickname, "Ann");
    }

    #[test]
    fn test_tie_roll_waits_for_all_tied_rolls() {
        let state = GameState::TieRoll {
            control_player: player_with_bid("Ann", 3),
            other_players: vec![player_with_bid("Bo", 5), player_with_bid("Cy", 5)],
        };

        assert_eq!(maybe_finish_tie_roll(&state), None);

        let state = player_submit_tie_roll(&state, "Bo", 12).unwrap();
        // Cy has not rolled yet.
        assert_eq!(maybe_finish_tie_roll(&state), None);
    }

    #[test]
    fn test_tie_roll_seats_highest_roller() {
        let state = GameState::TieRoll {
            control_player: player_with_bid("Ann", 3),
            other_players: vec![player_with_bid("Bo", 5), player_with_bid("Cy", 5)],
        };
        let state = player_submit_tie_roll(&state, "Bo", 12).unwrap();
        let state = player_submit_tie_roll(&state, "Cy", 18).unwrap();

        let next = maybe_finish_tie_roll(&state).unwrap();
        assert_eq!(next.phase(), Phase::ActivePlay);
        assert_eq!(next.control_player().unwrap().nickname, "Cy");
    }

    #[test]
    fn test_tie_roll_restarts_on_re_tie() {
        let state = GameState::TieRoll {
            control_player: player_with_bid("Ann", 3),
            other_players: vec![player_with_bid("Bo", 5), player_with_bid("Cy", 5)],
        };
        let state = player_submit_tie_roll(&state, "Bo", 12).unwrap();
        let state = player_submit_tie_roll(&state, "Cy", 12).unwrap();

        let next = maybe_finish_tie_roll(&state).unwrap();
        assert_eq!(next.phase(), Phase::TieRoll);
        // Tied players roll again; everyone else is untouched.
        assert_eq!(next.find_player("Bo").unwrap().tie_roll, None);
        assert_eq!(next.find_player("Cy").unwrap().tie_roll, None);
        assert_eq!(next.find_player("Ann").unwrap().bid, Some(3));

        // The restarted roll-off can resolve.
        let state = player_submit_tie_roll(&next, "Bo", 4).unwrap();
        let state = player_submit_tie_roll(&state, "Cy", 9).unwrap();
        let next = maybe_finish_tie_roll(&state).unwrap();
        assert_eq!(next.control_player().unwrap().nickname, "Cy");
    }

    #[test]
    fn test_resolvers_ignore_other_phases() {
        let lobby = GameState::new();
        assert_eq!(maybe_finish_picking(&lobby), None);
        assert_eq!(maybe_finish_bidding(&lobby), None);
        assert_eq!(maybe_finish_tie_roll(&lobby), None);
    }

    #[test]
    fn test_full_auction_flow() {
        let state = GameState::Bidding {
            control_player: Player::new("Ann"),
            other_players: vec![Player::new("Bo")],
        };
        let state = player_bid(&state, "Ann", 2).unwrap();
        assert_eq!(maybe_finish_bidding(&state), None);

        let state = player_bid(&state, "Bo", 6).unwrap();
        let next = maybe_finish_bidding(&state).unwrap();
        assert_eq!(next.control_player().unwrap().nickname, "Bo");
    }
}
