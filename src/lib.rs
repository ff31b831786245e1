//! Chorus State Library
//!
//! This crate coordinates one live session of Chorus, a turn-structured
//! party game: players join a lobby, pick kits, bid for the control seat,
//! break ties with a roll-off, and enter active play.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Game State Machine** - A phase-tagged state value (lobby, picking,
//!   bidding, tie roll, active play) replaced wholesale on every commit.
//!
//! - **Transition Catalog** - One pure function per player action, with
//!   explicit rejections for wrong-phase or unknown-player requests.
//!
//! - **Cascade Resolvers** - Predicates that advance the phase once every
//!   required input has been collected.
//!
//! - **State Store** - A single exclusive section that serializes all
//!   writers and broadcasts each committed snapshot in commit order.
//!
//! - **Broadcaster** - Transport-agnostic fan-out of full-state snapshots
//!   to every connected observer.
//!
//! # Design Principles
//!
//! 1. **Transitions are pure** - State in, state out. Anything invalid is
//!    an explicit error, never a silent no-op.
//!
//! 2. **One writer at a time** - Every mutation goes through the store's
//!    exclusive section; observers only ever see fully committed values.
//!
//! 3. **No networking** - This crate is pure state and coordination; the
//!    transport layer adapts the broadcast stream to its own protocol.
//!
//! 4. **Serialization-ready** - Every client-visible type converts to a
//!    JSON snapshot.
//!
//! # Example
//!
//! ```rust
//! use chorus_state::state::{cascade, transition, GameState, Phase};
//!
//! let state = GameState::new();
//! let state = transition::player_join_lobby(&state, "Ann").unwrap();
//! let state = transition::player_join_lobby(&state, "Bo").unwrap();
//! let state = transition::waiting_to_picking(&state).unwrap();
//! assert_eq!(state.phase(), Phase::PickingPeriod);
//!
//! // Cascades only advance once everyone has acted.
//! assert!(cascade::maybe_finish_picking(&state).is_none());
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
