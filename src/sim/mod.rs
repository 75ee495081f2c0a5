//! Game core
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Transitions return a new state, never mutate shared state
//! - Seeded RNG only
//! - Stable ordering (collectibles sorted by id)
//! - No rendering or platform dependencies

pub mod spawn;
pub mod state;
pub mod transition;

pub use spawn::spawn;
pub use state::{Collectible, GamePhase, GameState, Player, RngState};
pub use transition::{Command, Direction, apply, collect, initial, move_to, restart};
