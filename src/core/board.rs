//! Board grid, cell status and the placement validator.

use alloc::vec::Vec;

use super::common::EngineError;
use super::config::BOARD_SIZE;
use super::ship::{Orientation, ShipId, ShipKind};

/// A position on the board. Rows and columns are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    /// Build a coordinate, rejecting positions off the board.
    pub fn new(row: usize, col: usize) -> Result<Self, EngineError> {
        let coord = Coordinate { row, col };
        if coord.is_on_board() {
            Ok(coord)
        } else {
            Err(EngineError::OutOfBounds)
        }
    }

    pub fn is_on_board(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Neighbor at the given offset, if it is on the board.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Coordinate> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Coordinate::new(row, col).ok()
    }

    /// On-board orthogonal neighbors in up, down, left, right order.
    pub fn orthogonal_neighbors(&self) -> impl Iterator<Item = Coordinate> + '_ {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }
}

impl core::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Occupancy and attack status of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum CellStatus {
    #[default]
    Empty,
    Ship,
    Hit,
    Miss,
}

impl CellStatus {
    pub fn is_attacked(self) -> bool {
        matches!(self, CellStatus::Hit | CellStatus::Miss)
    }
}

/// One board position. A cell remembers the ship that occupies it, including
/// after that segment has been hit, and caches the ship's kind so a shared
/// snapshot carries it without parsing the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    coordinate: Coordinate,
    status: CellStatus,
    #[cfg_attr(feature = "std", serde(default))]
    ship_id: Option<ShipId>,
    #[cfg_attr(feature = "std", serde(default))]
    ship_kind: Option<ShipKind>,
}

impl Cell {
    fn empty(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            status: CellStatus::Empty,
            ship_id: None,
            ship_kind: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn status(&self) -> CellStatus {
        self.status
    }

    pub fn ship_id(&self) -> Option<ShipId> {
        self.ship_id
    }

    pub fn ship_kind(&self) -> Option<ShipKind> {
        self.ship_kind
    }

    pub fn is_attacked(&self) -> bool {
        self.status.is_attacked()
    }
}

/// N×N grid of cells indexed by (row, col).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    grid: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a board where every cell is empty.
    pub fn new() -> Self {
        let grid = core::array::from_fn(|row| {
            core::array::from_fn(|col| Cell::empty(Coordinate { row, col }))
        });
        Board { grid }
    }

    /// Cell at `coord`, or `None` off the board.
    pub fn get(&self, coord: Coordinate) -> Option<&Cell> {
        self.grid.get(coord.row)?.get(coord.col)
    }

    pub fn cell(&self, coord: Coordinate) -> Result<&Cell, EngineError> {
        self.get(coord).ok_or(EngineError::OutOfBounds)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter().flat_map(|row| row.iter())
    }

    pub fn is_attacked(&self, coord: Coordinate) -> bool {
        self.get(coord).is_some_and(Cell::is_attacked)
    }

    /// Cells not yet hit or missed.
    pub fn unattacked(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells()
            .filter(|cell| !cell.is_attacked())
            .map(Cell::coordinate)
    }

    /// Number of cells that carry a ship id.
    pub fn ship_cell_count(&self) -> usize {
        self.cells().filter(|cell| cell.ship_id.is_some()).count()
    }

    /// Coordinates of a run of `length` cells from `start`, or `None` when the
    /// run leaves the board.
    pub fn run(
        start: Coordinate,
        length: usize,
        orientation: Orientation,
    ) -> Option<Vec<Coordinate>> {
        let (d_row, d_col) = orientation.step();
        (0..length)
            .map(|i| Coordinate::new(start.row + d_row * i, start.col + d_col * i).ok())
            .collect()
    }

    /// Check that a ship of `length` fits at `start`: inside the board, on
    /// empty cells only and, unless `allow_adjacent`, with every one of the 8
    /// neighbors of every segment empty as well.
    pub fn is_valid_placement(
        &self,
        start: Coordinate,
        length: usize,
        orientation: Orientation,
        allow_adjacent: bool,
    ) -> bool {
        let Some(run) = Board::run(start, length, orientation) else {
            return false;
        };
        run.iter().all(|&coord| {
            if self.grid[coord.row][coord.col].status != CellStatus::Empty {
                return false;
            }
            if allow_adjacent {
                return true;
            }
            (-1..=1).all(|dr| {
                (-1..=1).all(|dc| match coord.offset(dr, dc) {
                    Some(n) => self.grid[n.row][n.col].status == CellStatus::Empty,
                    None => true,
                })
            })
        })
    }

    pub(crate) fn occupy(&mut self, coord: Coordinate, id: ShipId, kind: ShipKind) {
        let cell = &mut self.grid[coord.row][coord.col];
        cell.status = CellStatus::Ship;
        cell.ship_id = Some(id);
        cell.ship_kind = Some(kind);
    }

    pub(crate) fn mark(&mut self, coord: Coordinate, status: CellStatus) {
        self.grid[coord.row][coord.col].status = status;
    }
}
