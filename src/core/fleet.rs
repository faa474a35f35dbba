//! One side of the game: board, ships and the operations that change them.
//!
//! Every operation takes `&self` and returns a new `Fleet`, leaving the
//! receiver untouched. Failed operations return an error and produce nothing.

use alloc::string::String;
use alloc::vec::Vec;
use rand::Rng;

use super::board::{Board, CellStatus, Coordinate};
use super::common::{AttackOutcome, EngineError};
use super::config::{FLEET, MAX_PLACEMENT_ATTEMPTS, NUM_SHIPS};
use super::ship::{extract_ships_from_board, Orientation, Ship, ShipId, ShipKind};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Fleet {
    id: String,
    name: String,
    board: Board,
    ships: Vec<Ship>,
    is_computer: bool,
    next_ship_id: u32,
}

impl Fleet {
    /// Create a fleet with an empty board and no ships.
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_computer: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            board: Board::new(),
            ships: Vec::new(),
            is_computer,
            next_ship_id: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id() == id)
    }

    pub fn is_computer(&self) -> bool {
        self.is_computer
    }

    /// `true` once one ship of every kind in the fleet table is placed.
    pub fn is_complete(&self) -> bool {
        self.ships.len() == NUM_SHIPS
            && FLEET
                .iter()
                .all(|kind| self.ships.iter().any(|s| s.kind() == *kind))
    }

    /// Same identity with a fresh board and no ships.
    pub fn cleared(&self) -> Fleet {
        Fleet::new(self.id.clone(), self.name.clone(), self.is_computer)
    }

    /// Place a ship of `kind` starting at `start`.
    pub fn place_ship(
        &self,
        kind: ShipKind,
        start: Coordinate,
        orientation: Orientation,
        allow_adjacent: bool,
    ) -> Result<Fleet, EngineError> {
        let length = kind.length();
        if !self
            .board
            .is_valid_placement(start, length, orientation, allow_adjacent)
        {
            return Err(EngineError::InvalidPlacement);
        }
        let run = Board::run(start, length, orientation).ok_or(EngineError::InvalidPlacement)?;

        let mut next = self.clone();
        let id = ShipId(next.next_ship_id);
        next.next_ship_id = next
            .next_ship_id
            .checked_add(1)
            .ok_or(EngineError::InvalidPlacement)?;
        for &coord in &run {
            next.board.occupy(coord, id, kind);
        }
        next.ships.push(Ship::new(id, kind, run, orientation));
        log::debug!(
            "{}: placed {} as {} at {} {:?}",
            self.name,
            kind.name(),
            id,
            start,
            orientation
        );
        Ok(next)
    }

    /// Place the whole fleet at random on a fresh board.
    ///
    /// Ships are placed in fleet-table order; each gets up to
    /// `MAX_PLACEMENT_ATTEMPTS` uniform draws of start cell and orientation.
    pub fn place_ships_randomly<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        allow_adjacent: bool,
    ) -> Result<Fleet, EngineError> {
        let mut fleet = self.cleared();
        for kind in FLEET {
            fleet = fleet.place_ship_randomly(rng, kind, allow_adjacent)?;
        }
        Ok(fleet)
    }

    /// Place one ship of `kind` at a random legal position on the current
    /// board.
    pub fn place_ship_randomly<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        kind: ShipKind,
        allow_adjacent: bool,
    ) -> Result<Fleet, EngineError> {
        let size = super::config::BOARD_SIZE;
        for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
            let start = Coordinate {
                row: rng.random_range(0..size),
                col: rng.random_range(0..size),
            };
            let orientation = if rng.random_bool(0.5) {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            if self
                .board
                .is_valid_placement(start, kind.length(), orientation, allow_adjacent)
            {
                log::debug!("{} placed after {} attempts", kind.name(), attempt);
                return self.place_ship(kind, start, orientation, allow_adjacent);
            }
        }
        Err(EngineError::PlacementExhausted {
            kind,
            attempts: MAX_PLACEMENT_ATTEMPTS,
        })
    }

    /// Resolve an attack at `coord`.
    ///
    /// Re-attacking a hit or missed cell returns the fleet unchanged with
    /// `AttackOutcome::AlreadyAttacked`. Otherwise exactly one cell changes.
    pub fn receive_attack(&self, coord: Coordinate) -> Result<(Fleet, AttackOutcome), EngineError> {
        let cell = *self.board.cell(coord)?;
        match cell.status() {
            CellStatus::Hit | CellStatus::Miss => Ok((self.clone(), AttackOutcome::AlreadyAttacked)),
            CellStatus::Empty => {
                let mut next = self.clone();
                next.board.mark(coord, CellStatus::Miss);
                Ok((next, AttackOutcome::Miss))
            }
            CellStatus::Ship => {
                let id = cell.ship_id().ok_or(EngineError::UnknownShip)?;
                let idx = self
                    .ships
                    .iter()
                    .position(|s| s.id() == id)
                    .ok_or(EngineError::UnknownShip)?;
                let mut next = self.clone();
                next.board.mark(coord, CellStatus::Hit);
                let outcome = if next.ships[idx].register_hit() {
                    AttackOutcome::Sunk
                } else {
                    AttackOutcome::Hit
                };
                Ok((next, outcome))
            }
        }
    }

    /// `true` when every ship is sunk. A fleet without ships counts as
    /// defeated, so only ask once setup is complete.
    pub fn check_win(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    /// Replace board and ships with a snapshot shared by the remote side.
    ///
    /// Ids are kept as shared. A snapshot using the largest id leaves no room
    /// to mint another and is rejected.
    pub fn with_snapshot(&self, board: Board) -> Result<Fleet, EngineError> {
        let ships = extract_ships_from_board(&board)?;
        let next_ship_id = match ships.iter().map(|s| s.id().0).max() {
            Some(max) => max.checked_add(1).ok_or(EngineError::MalformedSnapshot)?,
            None => 0,
        };
        Ok(Fleet {
            id: self.id.clone(),
            name: self.name.clone(),
            board,
            ships,
            is_computer: self.is_computer,
            next_ship_id,
        })
    }
}
