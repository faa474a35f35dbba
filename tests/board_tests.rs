use broadside::{Board, CellStatus, Coordinate, EngineError, Fleet, Orientation, ShipKind};

fn at(row: usize, col: usize) -> Coordinate {
    Coordinate::new(row, col).unwrap()
}

#[test]
fn test_coordinate_bounds() {
    assert!(Coordinate::new(9, 9).is_ok());
    assert_eq!(Coordinate::new(10, 0), Err(EngineError::OutOfBounds));
    assert_eq!(Coordinate::new(0, 10), Err(EngineError::OutOfBounds));
    assert_eq!(at(0, 0).offset(-1, 0), None);
    assert_eq!(at(9, 9).offset(0, 1), None);
    assert_eq!(at(4, 4).offset(1, -1), Some(at(5, 3)));
}

#[test]
fn test_orthogonal_neighbors_stay_on_board() {
    let corner: Vec<_> = at(0, 0).orthogonal_neighbors().collect();
    assert_eq!(corner, vec![at(1, 0), at(0, 1)]);
    let middle: Vec<_> = at(4, 4).orthogonal_neighbors().collect();
    assert_eq!(middle, vec![at(3, 4), at(5, 4), at(4, 3), at(4, 5)]);
}

#[test]
fn test_empty_board() {
    let board = Board::new();
    assert_eq!(board.cells().count(), 100);
    assert_eq!(board.unattacked().count(), 100);
    assert_eq!(board.ship_cell_count(), 0);
    let cell = board.cell(at(3, 7)).unwrap();
    assert_eq!(cell.coordinate(), at(3, 7));
    assert_eq!(cell.status(), CellStatus::Empty);
    assert_eq!(cell.ship_id(), None);
}

#[test]
fn test_placement_bounds() {
    let board = Board::new();
    assert!(board.is_valid_placement(at(0, 5), 5, Orientation::Horizontal, false));
    assert!(!board.is_valid_placement(at(0, 6), 5, Orientation::Horizontal, false));
    assert!(board.is_valid_placement(at(5, 0), 5, Orientation::Vertical, false));
    assert!(!board.is_valid_placement(at(6, 0), 5, Orientation::Vertical, false));
}

#[test]
fn test_placement_rejects_overlap() {
    let fleet = Fleet::new("p", "P", false)
        .place_ship(ShipKind::Cruiser, at(2, 2), Orientation::Horizontal, true)
        .unwrap();
    let board = fleet.board();
    assert!(!board.is_valid_placement(at(0, 3), 3, Orientation::Vertical, true));
    assert!(!board.is_valid_placement(at(2, 4), 2, Orientation::Horizontal, true));
}

#[test]
fn test_placement_body_touch_rejected_without_adjacency() {
    let fleet = Fleet::new("p", "P", false)
        .place_ship(ShipKind::Carrier, at(5, 5), Orientation::Horizontal, false)
        .unwrap();
    // Cruiser from (4,6) down would cover (5,6), which the carrier holds.
    assert!(!fleet
        .board()
        .is_valid_placement(at(4, 6), 3, Orientation::Vertical, false));
    assert_eq!(
        fleet
            .place_ship(ShipKind::Cruiser, at(4, 6), Orientation::Vertical, false)
            .unwrap_err(),
        EngineError::InvalidPlacement
    );
}

#[test]
fn test_placement_diagonal_touch() {
    let fleet = Fleet::new("p", "P", false)
        .place_ship(ShipKind::Destroyer, at(4, 4), Orientation::Horizontal, false)
        .unwrap();
    let board = fleet.board();
    // (3,3) only touches (4,4) at the corner.
    assert!(!board.is_valid_placement(at(1, 3), 3, Orientation::Vertical, false));
    assert!(board.is_valid_placement(at(1, 3), 3, Orientation::Vertical, true));
    // One clear row in between is enough.
    assert!(board.is_valid_placement(at(0, 3), 3, Orientation::Vertical, false));
    assert!(board.is_valid_placement(at(6, 0), 5, Orientation::Horizontal, false));
}

#[test]
fn test_board_run() {
    assert_eq!(
        Board::run(at(1, 1), 3, Orientation::Vertical),
        Some(vec![at(1, 1), at(2, 1), at(3, 1)])
    );
    assert_eq!(Board::run(at(9, 8), 3, Orientation::Horizontal), None);
}

#[test]
fn test_cell_keeps_ship_after_hit() {
    let fleet = Fleet::new("p", "P", false)
        .place_ship(ShipKind::Destroyer, at(0, 0), Orientation::Horizontal, false)
        .unwrap();
    let id = fleet.ships()[0].id();
    let (fleet, _) = fleet.receive_attack(at(0, 0)).unwrap();
    let cell = fleet.board().cell(at(0, 0)).unwrap();
    assert_eq!(cell.status(), CellStatus::Hit);
    assert_eq!(cell.ship_id(), Some(id));
    assert_eq!(cell.ship_kind(), Some(ShipKind::Destroyer));
    assert!(fleet.board().is_attacked(at(0, 0)));
    assert!(!fleet.board().is_attacked(at(0, 1)));
}
