//! Common types for the engine: errors and attack outcomes.

use super::ship::ShipKind;

/// Result of resolving one attack against a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "kebab-case"))]
pub enum AttackOutcome {
    /// Attack struck a ship segment that was still afloat.
    Hit,
    /// Attack landed on open water.
    Miss,
    /// Attack struck the last intact segment of a ship.
    Sunk,
    /// Cell was attacked before; nothing changed.
    AlreadyAttacked,
}

impl AttackOutcome {
    /// `true` for outcomes that changed the board and count as a move.
    pub fn is_move(self) -> bool {
        !matches!(self, AttackOutcome::AlreadyAttacked)
    }

    /// `true` when a ship segment was struck.
    pub fn is_hit(self) -> bool {
        matches!(self, AttackOutcome::Hit | AttackOutcome::Sunk)
    }
}

/// Errors returned by engine operations. No operation that fails leaves a
/// fleet, board or AI memory partially modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Coordinate lies outside the board.
    OutOfBounds,
    /// Placement leaves the board, overlaps a ship or touches one.
    InvalidPlacement,
    /// Randomized setup ran out of attempts for a ship.
    PlacementExhausted { kind: ShipKind, attempts: usize },
    /// Session is not in the playing phase.
    NotPlaying,
    /// Attack issued by the side that does not hold the turn.
    NotYourTurn,
    /// Fleet does not carry a full set of ships.
    IncompleteFleet,
    /// A cell references a ship the fleet does not know.
    UnknownShip,
    /// A board snapshot describes a ship that cannot exist.
    MalformedSnapshot,
    /// The opponent board snapshot has not been shared yet.
    MissingSnapshot,
    /// A game driver made no progress within its turn budget.
    Stalled,
}

impl core::fmt::Display for EngineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EngineError::OutOfBounds => write!(f, "Coordinate is outside the board"),
            EngineError::InvalidPlacement => write!(f, "Invalid placement"),
            EngineError::PlacementExhausted { kind, attempts } => write!(
                f,
                "Could not place ship {} after {} attempts",
                kind.name(),
                attempts
            ),
            EngineError::NotPlaying => write!(f, "Game is not in progress"),
            EngineError::NotYourTurn => write!(f, "It is not this side's turn"),
            EngineError::IncompleteFleet => write!(f, "Fleet is missing ships"),
            EngineError::UnknownShip => write!(f, "Cell references an unknown ship"),
            EngineError::MalformedSnapshot => write!(f, "Board snapshot is malformed"),
            EngineError::MissingSnapshot => write!(f, "Opponent board has not been shared"),
            EngineError::Stalled => write!(f, "Game made no progress"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EngineError {}
