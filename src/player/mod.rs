//! Player trait and implementations
//!
//! A Player is responsible for:
//! - Placing ships on its fleet
//! - Selecting targets to attack
//! - Handling feedback from attacks
//!
//! `AiPlayer` is the computer opponent; `PlayerNode` (networked) and
//! `LocalGame` (same process) drive players through a game.

use rand::rngs::SmallRng;

use crate::core::{AttackOutcome, Coordinate, EngineError, Fleet};

/// Interface implemented by different player types.
pub trait Player: Send {
    /// Return `fleet` with every ship placed.
    fn place_ships(
        &mut self,
        rng: &mut SmallRng,
        fleet: &Fleet,
        allow_adjacent: bool,
    ) -> Result<Fleet, EngineError>;

    /// Choose the next cell to attack on `target`. `None` when no cell is
    /// left to attack.
    fn select_target(&mut self, rng: &mut SmallRng, target: &Fleet) -> Option<Coordinate>;

    /// Inform the player of the result of its last attack. `target` is the
    /// attacked fleet with the attack applied.
    fn handle_attack_result(&mut self, _coord: Coordinate, _outcome: AttackOutcome, _target: &Fleet) {}

    /// Inform the player of an opponent attack against its fleet.
    fn handle_opponent_attack(&mut self, _coord: Coordinate, _outcome: AttackOutcome) {}
}

pub mod ai;
pub use ai::AiPlayer;
