//! Core battleship rules engine (no_std compatible)
//!
//! Board and ship model, placement validation, attack resolution, win
//! detection, the opponent AI and the game session. Everything here is pure
//! state and transition functions: no I/O, no clocks, randomness only through
//! an injected `Rng`.

pub mod ai;
pub mod board;
pub mod common;
pub mod config;
pub mod fleet;
pub mod game;
pub mod ship;

// Re-export commonly used types
pub use ai::{choose_random, choose_smart, update_after_attack, AiMemory, AiMode, Difficulty};
pub use board::{Board, Cell, CellStatus, Coordinate};
pub use common::{AttackOutcome, EngineError};
pub use config::*;
pub use fleet::Fleet;
pub use game::{GameSession, Phase, Turn};
pub use ship::{extract_ships_from_board, Orientation, Ship, ShipId, ShipKind};
