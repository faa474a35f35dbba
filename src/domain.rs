//! Shapes exchanged with the room authority: sides, move events and the
//! shared room record.

use alloc::string::String;

use crate::core::{AttackOutcome, Board, Coordinate, Turn};

/// Seat in a networked room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Side {
    Host,
    Guest,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Host => Side::Guest,
            Side::Guest => Side::Host,
        }
    }

    /// This side as seen by `viewer`.
    pub fn relative_to(self, viewer: Side) -> Turn {
        if self == viewer {
            Turn::Player
        } else {
            Turn::Opponent
        }
    }
}

/// Stable identifier of a move event, used as the idempotency key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct MoveId(pub u64);

/// One attack as recorded by the room authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveEvent {
    pub id: MoveId,
    /// Position in the room's move log; restores attack order.
    pub seq: u64,
    /// Attacking side.
    pub player: Side,
    pub coordinate: Coordinate,
    pub outcome: AttackOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum RoomStatus {
    Waiting,
    Placing,
    Playing,
    Finished,
}

/// Shared room record. It is the single source of truth for whose turn it
/// is and who won.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomRecord {
    pub id: String,
    pub host_name: String,
    pub guest_name: Option<String>,
    pub host_board: Option<Board>,
    pub guest_board: Option<Board>,
    pub host_ready: bool,
    pub guest_ready: bool,
    pub current_turn: Option<Side>,
    pub status: RoomStatus,
    pub winner: Option<Side>,
}

impl RoomRecord {
    /// Fresh room waiting for a guest.
    pub fn new(id: impl Into<String>, host_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            host_name: host_name.into(),
            guest_name: None,
            host_board: None,
            guest_board: None,
            host_ready: false,
            guest_ready: false,
            current_turn: None,
            status: RoomStatus::Waiting,
            winner: None,
        }
    }

    pub fn board_of(&self, side: Side) -> Option<&Board> {
        match side {
            Side::Host => self.host_board.as_ref(),
            Side::Guest => self.guest_board.as_ref(),
        }
    }

    pub fn is_ready(&self, side: Side) -> bool {
        match side {
            Side::Host => self.host_ready,
            Side::Guest => self.guest_ready,
        }
    }

    pub fn name_of(&self, side: Side) -> Option<&str> {
        match side {
            Side::Host => Some(&self.host_name),
            Side::Guest => self.guest_name.as_deref(),
        }
    }

    /// `true` once play has started, including finished games.
    pub fn has_started(&self) -> bool {
        matches!(self.status, RoomStatus::Playing | RoomStatus::Finished)
    }
}
