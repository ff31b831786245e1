//! The serializing owner of the authoritative game state.
//!
//! All writers go through one exclusive section. A transition sees the most
//! recently committed state, its result replaces the stored value wholesale,
//! and the broadcaster is invoked before the section is released, so the
//! order of broadcasts equals the order of commits, for every subscriber.
//!
//! A transition may suspend while holding the section (external lookups),
//! so the whole session blocks on the slowest in-flight action. There is
//! no timeout around such waits; an external step that never resolves
//! blocks all subsequent mutation.

use std::future::Future;

use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::state::broadcast::Broadcaster;
use crate::state::game::GameState;
use crate::state::transition::TransitionError;

/// Owns the single authoritative [`GameState`] for one session.
///
/// Explicitly constructed and passed by reference. No process-wide
/// singleton, so independent sessions and isolated tests each get their
/// own store.
#[derive(Debug)]
pub struct StateStore {
    state: Mutex<GameState>,
    broadcaster: Broadcaster,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// A store holding a fresh empty lobby.
    pub fn new() -> Self {
        Self::with_state(GameState::new())
    }

    /// A store holding the given state.
    pub fn with_state(state: GameState) -> Self {
        Self {
            state: Mutex::new(state),
            broadcaster: Broadcaster::new(),
        }
    }

    /// The most recently committed state.
    pub async fn snapshot(&self) -> GameState {
        self.state.lock().await.clone()
    }

    /// The embedded broadcaster.
    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    /// Current snapshot plus a receiver for everything committed after it.
    ///
    /// Both are taken under the exclusive section, so no committed state
    /// can fall between the snapshot and the stream.
    pub async fn subscribe(&self) -> (GameState, broadcast::Receiver<GameState>) {
        let guard = self.state.lock().await;
        (guard.clone(), self.broadcaster.subscribe())
    }

    /// Run a transition inside the exclusive section and commit its result.
    ///
    /// On rejection the section is released with no commit and no
    /// broadcast; the stored state is untouched.
    pub async fn apply<F>(&self, transition: F) -> Result<GameState, TransitionError>
    where
        F: FnOnce(&GameState) -> Result<GameState, TransitionError>,
    {
        let mut guard = self.state.lock().await;
        match transition(&*guard) {
            Ok(next) => {
                *guard = next.clone();
                self.broadcaster.publish(next.clone());
                debug!(phase = %next.phase(), "state committed");
                Ok(next)
            }
            Err(err) => {
                debug!(%err, "transition rejected");
                Err(err)
            }
        }
    }

    /// Like [`apply`](Self::apply), for transitions that need an external
    /// lookup. The section is held across the await.
    pub async fn apply_async<F, Fut>(&self, transition: F) -> Result<GameState, TransitionError>
    where
        F: FnOnce(GameState) -> Fut,
        Fut: Future<Output = Result<GameState, TransitionError>>,
    {
        let mut guard = self.state.lock().await;
        match transition(guard.clone()).await {
            Ok(next) => {
                *guard = next.clone();
                self.broadcaster.publish(next.clone());
                debug!(phase = %next.phase(), "state committed");
                Ok(next)
            }
            Err(err) => {
                debug!(%err, "transition rejected");
                Err(err)
            }
        }
    }

    /// Run a phase-completion resolver inside the exclusive section.
    ///
    /// Commits and broadcasts only when the resolver advances the phase; an
    /// unsatisfied predicate leaves the stored state untouched, so every
    /// broadcast corresponds to exactly one real change.
    pub async fn apply_cascade<F>(&self, resolver: F) -> GameState
    where
        F: FnOnce(&GameState) -> Option<GameState>,
    {
        let mut guard = self.state.lock().await;
        match resolver(&*guard) {
            Some(next) => {
                *guard = next.clone();
                self.broadcaster.publish(next.clone());
                debug!(phase = %next.phase(), "cascade committed");
                next
            }
            None => guard.clone(),
        }
    }
}
