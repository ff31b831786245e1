//! State coordination for a Chorus session.
//!
//! This module provides the core pieces:
//!
//! - `player` - Player records and kits
//! - `game` - The phase-tagged game state and skill checks
//! - `transition` - One pure function per player/game action
//! - `cascade` - Phase-completion resolvers ("maybe finish ...")
//! - `store` - The serializing owner of the authoritative state
//! - `broadcast` - Snapshot fan-out to connected observers
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        GameSession                           │
//! │                                                              │
//! │  action ──▶ ┌────────────────────────────────────────────┐  │
//! │             │              StateStore                     │  │
//! │             │                                             │  │
//! │             │  exclusive section:                         │  │
//! │             │    transition(state) ──▶ state'             │  │
//! │             │    cascade(state')   ──▶ state'' (maybe)    │  │
//! │             │    commit + publish before release          │  │
//! │             └───────────────────┬────────────────────────┘  │
//! │                                 │                            │
//! │                                 ▼                            │
//! │             ┌────────────────────────────────────────────┐  │
//! │             │              Broadcaster                    │  │
//! │             │  every committed snapshot, in commit order  │  │
//! │             └────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//!
//!   WaitingLobby ──▶ PickingPeriod ──▶ Bidding ──▶ [TieRoll] ──▶ ActivePlay
//! ```
//!
//! The phase sequence is fixed. `TieRoll` only occurs when the auction
//! ties at the top bid; `ActivePlay` is a steady-state loop of
//! instructions and skill checks.

pub mod broadcast;
pub mod cascade;
pub mod game;
pub mod player;
pub mod store;
pub mod transition;

// Re-export commonly used types
pub use broadcast::{Broadcaster, BROADCAST_CAPACITY};
pub use game::{GameState, Phase, SkillCheckResult, SKILL_CHECK_THRESHOLD};
pub use player::{Kit, Player};
pub use store::StateStore;
pub use transition::{TransitionError, MIN_PLAYERS_TO_START};

/// One live game session: a store plus the action surface the transport
/// layer calls into.
///
/// Each action applies its transition and then immediately attempts its
/// associated resolver through the store, so callers never have to
/// remember the pairing. The returned value is the final committed state.
#[derive(Debug, Default)]
pub struct GameSession {
    store: StateStore,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the underlying store.
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// The most recently committed state.
    pub async fn snapshot(&self) -> GameState {
        self.store.snapshot().await
    }

    /// Current snapshot plus a receiver for every later commit. New
    /// observers get the snapshot immediately; no earlier states are
    /// replayed.
    pub async fn subscribe(
        &self,
    ) -> (GameState, tokio::sync::broadcast::Receiver<GameState>) {
        self.store.subscribe().await
    }

    /// A player joins the lobby.
    pub async fn join(&self, nickname: &str) -> Result<GameState, TransitionError> {
        self.store
            .apply(|s| transition::player_join_lobby(s, nickname))
            .await
    }

    /// Close the lobby and start the picking period.
    pub async fn start(&self) -> Result<GameState, TransitionError> {
        self.store.apply(transition::waiting_to_picking).await
    }

    /// A player selects their kit; finishes the picking period once
    /// everyone has chosen.
    pub async fn select_kit(
        &self,
        nickname: &str,
        skill_one: &str,
        skill_two: &str,
        obsession: &str,
    ) -> Result<GameState, TransitionError> {
        self.store
            .apply(|s| {
                transition::player_skill_obsession_select(
                    s, nickname, skill_one, skill_two, obsession,
                )
            })
            .await?;
        Ok(self.store.apply_cascade(cascade::maybe_finish_picking).await)
    }

    /// A player bids for the control seat; resolves the auction once all
    /// bids are in.
    pub async fn bid(&self, nickname: &str, bid_amt: u32) -> Result<GameState, TransitionError> {
        self.store
            .apply(|s| transition::player_bid(s, nickname, bid_amt))
            .await?;
        Ok(self.store.apply_cascade(cascade::maybe_finish_bidding).await)
    }

    /// A tied player submits their roll-off result; resolves the tie once
    /// all tied players have rolled.
    pub async fn tie_roll(&self, nickname: &str, roll: u32) -> Result<GameState, TransitionError> {
        self.store
            .apply(|s| transition::player_submit_tie_roll(s, nickname, roll))
            .await?;
        Ok(self
            .store
            .apply_cascade(cascade::maybe_finish_tie_roll)
            .await)
    }

    /// The control seat issues an instruction.
    pub async fn issue_instruction(
        &self,
        instruction: &str,
    ) -> Result<GameState, TransitionError> {
        self.store
            .apply(|s| transition::user_issues_control_instruction(s, instruction))
            .await
    }

    /// The control seat attempts a skill check.
    pub async fn attempt_skill_check(
        &self,
        willpower_added: u32,
        roll_result: u32,
    ) -> Result<GameState, TransitionError> {
        self.store
            .apply(|s| transition::attempt_skill_check(s, willpower_added, roll_result))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_session_flow() {
        let session = GameSession::new();

        session.join("Ann").await.unwrap();
        session.join("Bo").await.unwrap();
        let state = session.join("Cy").await.unwrap();
        assert_eq!(state.player_count(), 3);

        let state = session.start().await.unwrap();
        assert_eq!(state.phase(), Phase::PickingPeriod);

        session.select_kit("Ann", "stealth", "lockpicking", "doors").await.unwrap();
        session.select_kit("Bo", "climbing", "persuasion", "heights").await.unwrap();
        let state = session
            .select_kit("Cy", "sprinting", "first-aid", "birds")
            .await
            .unwrap();
        assert_eq!(state.phase(), Phase::Bidding);

        // Bo and Cy tie at the top bid.
        session.bid("Ann", 3).await.unwrap();
        session.bid("Bo", 5).await.unwrap();
        let state = session.bid("Cy", 5).await.unwrap();
        assert_eq!(state.phase(), Phase::TieRoll);

        session.tie_roll("Bo", 12).await.unwrap();
        let state = session.tie_roll("Cy", 18).await.unwrap();
        assert_eq!(state.phase(), Phase::ActivePlay);
        assert_eq!(state.control_player().unwrap().nickname, "Cy");

        let state = session.issue_instruction("open the door").await.unwrap();
        let state = session.attempt_skill_check(3, 15).await.unwrap();
        let GameState::ActivePlay {
            last_instruction,
            last_skill_check,
            ..
        } = &state
        else {
            panic!("expected active play, got {}", state.phase());
        };
        assert_eq!(last_instruction.as_deref(), Some("open the door"));
        assert!(last_skill_check.unwrap().succeeded);
    }

    #[tokio::test]
    async fn test_session_without_tie() {
        let session = GameSession::new();
        session.join("Ann").await.unwrap();
        session.join("Bo").await.unwrap();
        session.start().await.unwrap();
        session.select_kit("Ann", "a", "b", "c").await.unwrap();
        session.select_kit("Bo", "d", "e", "f").await.unwrap();

        session.bid("Ann", 2).await.unwrap();
        let state = session.bid("Bo", 6).await.unwrap();

        assert_eq!(state.phase(), Phase::ActivePlay);
        assert_eq!(state.control_player().unwrap().nickname, "Bo");
    }

    #[tokio::test]
    async fn test_rejections_surface_to_the_caller() {
        let session = GameSession::new();
        session.join("Ann").await.unwrap();

        let err = session.join("Ann").await.unwrap_err();
        assert_eq!(err, TransitionError::DuplicatePlayer("Ann".to_string()));

        let err = session.bid("Ann", 4).await.unwrap_err();
        assert!(matches!(err, TransitionError::InvalidPhase { .. }));

        // The session is still usable after rejections.
        session.join("Bo").await.unwrap();
        assert_eq!(session.snapshot().await.player_count(), 2);
    }

    #[tokio::test]
    async fn test_observers_follow_the_session() {
        let session = GameSession::new();
        session.join("Ann").await.unwrap();

        let (snapshot, mut rx) = session.subscribe().await;
        assert_eq!(snapshot.player_count(), 1);

        session.join("Bo").await.unwrap();
        session.start().await.unwrap();

        assert_eq!(rx.recv().await.unwrap().player_count(), 2);
        assert_eq!(rx.recv().await.unwrap().phase(), Phase::PickingPeriod);
    }
}
