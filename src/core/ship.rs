//! Ship definitions and reconstruction of ships from a board snapshot.

use alloc::vec::Vec;

use super::board::{Board, CellStatus, Coordinate};
use super::common::EngineError;
use super::config::FLEET;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Row/column step taken from one segment to the next.
    pub(crate) fn step(self) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        }
    }
}

/// Kind of ship; every kind has a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum ShipKind {
    Carrier,
    Battleship,
    Cruiser,
    Submarine,
    Destroyer,
}

impl ShipKind {
    pub const fn length(self) -> usize {
        match self {
            ShipKind::Carrier => 5,
            ShipKind::Battleship => 4,
            ShipKind::Cruiser => 3,
            ShipKind::Submarine => 3,
            ShipKind::Destroyer => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShipKind::Carrier => "Carrier",
            ShipKind::Battleship => "Battleship",
            ShipKind::Cruiser => "Cruiser",
            ShipKind::Submarine => "Submarine",
            ShipKind::Destroyer => "Destroyer",
        }
    }

    /// First kind in the fleet table with the given length.
    ///
    /// Lengths are ambiguous (cruiser and submarine are both 3 long), so this
    /// is only a fallback for snapshots that did not carry the kind.
    pub fn from_length(length: usize) -> Option<ShipKind> {
        FLEET.iter().copied().find(|kind| kind.length() == length)
    }
}

/// Identifier of a ship, unique within one fleet and stable across
/// serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct ShipId(pub u32);

impl core::fmt::Display for ShipId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ship-{}", self.0)
    }
}

/// A ship placed in a fleet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    id: ShipId,
    kind: ShipKind,
    hits: usize,
    sunk: bool,
    position: Vec<Coordinate>,
    orientation: Orientation,
}

impl Ship {
    pub(crate) fn new(
        id: ShipId,
        kind: ShipKind,
        position: Vec<Coordinate>,
        orientation: Orientation,
    ) -> Self {
        Self {
            id,
            kind,
            hits: 0,
            sunk: false,
            position,
            orientation,
        }
    }

    pub fn id(&self) -> ShipId {
        self.id
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    /// Number of cells the ship occupies.
    pub fn length(&self) -> usize {
        self.position.len()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn is_sunk(&self) -> bool {
        self.sunk
    }

    /// Cells occupied by the ship, in placement order.
    pub fn position(&self) -> &[Coordinate] {
        &self.position
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn occupies(&self, coord: Coordinate) -> bool {
        self.position.contains(&coord)
    }

    /// Register one more hit. Once sunk a ship stays sunk.
    pub(crate) fn register_hit(&mut self) -> bool {
        if self.hits < self.length() {
            self.hits += 1;
        }
        if self.hits >= self.length() {
            self.sunk = true;
        }
        self.sunk
    }
}

/// Rebuild the ship set described by a board snapshot.
///
/// Cells are grouped by ship id in row-major order of first appearance. The
/// ship length is the number of cells carrying its id, hits are the cells of
/// that id marked hit, and orientation follows the first two segments.
pub fn extract_ships_from_board(board: &Board) -> Result<Vec<Ship>, EngineError> {
    let mut ships: Vec<Ship> = Vec::new();
    let mut cached_kinds: Vec<Option<ShipKind>> = Vec::new();

    for cell in board.cells() {
        let Some(id) = cell.ship_id() else {
            continue;
        };
        if !matches!(cell.status(), CellStatus::Ship | CellStatus::Hit) {
            return Err(EngineError::MalformedSnapshot);
        }
        let idx = match ships.iter().position(|s| s.id == id) {
            Some(idx) => idx,
            None => {
                ships.push(Ship {
                    id,
                    // provisional; resolved once all cells are counted
                    kind: ShipKind::Destroyer,
                    hits: 0,
                    sunk: false,
                    position: Vec::new(),
                    orientation: Orientation::Horizontal,
                });
                cached_kinds.push(cell.ship_kind());
                ships.len() - 1
            }
        };
        if cell.ship_kind().is_some() && cached_kinds[idx] != cell.ship_kind() {
            return Err(EngineError::MalformedSnapshot);
        }
        let ship = &mut ships[idx];
        ship.position.push(cell.coordinate());
        if cell.status() == CellStatus::Hit {
            ship.hits += 1;
        }
    }

    for (ship, cached) in ships.iter_mut().zip(cached_kinds) {
        let length = ship.position.len();
        ship.kind = match cached {
            Some(kind) if kind.length() == length => kind,
            Some(_) => return Err(EngineError::MalformedSnapshot),
            None => ShipKind::from_length(length).ok_or(EngineError::MalformedSnapshot)?,
        };
        ship.sunk = ship.hits >= length;
        if length > 1 {
            ship.orientation = if ship.position[0].row == ship.position[1].row {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
        }
    }

    log::debug!("extracted {} ships from board snapshot", ships.len());
    Ok(ships)
}
