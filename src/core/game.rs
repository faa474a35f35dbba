use super::{
    board::Coordinate,
    common::{AttackOutcome, EngineError},
    fleet::Fleet,
};

/// Side of the session from the local point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    Player,
    Opponent,
}

impl Turn {
    pub fn other(self) -> Turn {
        match self {
            Turn::Player => Turn::Opponent,
            Turn::Opponent => Turn::Player,
        }
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Placement,
    Playing,
    Finished,
}

/// Two fleets, whose turn it is and how the game stands.
///
/// `player` is the local fleet, `opponent` the fleet it attacks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSession {
    player: Fleet,
    opponent: Fleet,
    turn: Turn,
    phase: Phase,
    winner: Option<Turn>,
    player_moves: u32,
    opponent_moves: u32,
}

impl GameSession {
    /// Create a session in the placement phase with the player to move.
    pub fn new(player: Fleet, opponent: Fleet) -> Self {
        Self {
            player,
            opponent,
            turn: Turn::Player,
            phase: Phase::Placement,
            winner: None,
            player_moves: 0,
            opponent_moves: 0,
        }
    }

    pub fn player(&self) -> &Fleet {
        &self.player
    }

    pub fn opponent(&self) -> &Fleet {
        &self.opponent
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Turn> {
        self.winner
    }

    /// Moves that changed the board, per side.
    pub fn moves(&self, side: Turn) -> u32 {
        match side {
            Turn::Player => self.player_moves,
            Turn::Opponent => self.opponent_moves,
        }
    }

    /// Fleet attacked by `side`.
    pub fn target_of(&self, side: Turn) -> &Fleet {
        match side {
            Turn::Player => &self.opponent,
            Turn::Opponent => &self.player,
        }
    }

    /// Replace the local fleet, only while still placing ships.
    pub fn set_player_fleet(&mut self, fleet: Fleet) -> Result<(), EngineError> {
        if self.phase != Phase::Placement {
            return Err(EngineError::NotPlaying);
        }
        self.player = fleet;
        Ok(())
    }

    /// Replace the opponent fleet, only while still placing ships.
    pub fn set_opponent_fleet(&mut self, fleet: Fleet) -> Result<(), EngineError> {
        if self.phase != Phase::Placement {
            return Err(EngineError::NotPlaying);
        }
        self.opponent = fleet;
        Ok(())
    }

    /// Leave placement. Both fleets must be complete.
    pub fn start(&mut self, first: Turn) -> Result<(), EngineError> {
        if self.phase != Phase::Placement {
            return Err(EngineError::NotPlaying);
        }
        if !self.player.is_complete() || !self.opponent.is_complete() {
            return Err(EngineError::IncompleteFleet);
        }
        self.turn = first;
        self.phase = Phase::Playing;
        log::info!("game started, {:?} moves first", first);
        Ok(())
    }

    /// Local player attacks the opponent fleet.
    pub fn player_attack(&mut self, coord: Coordinate) -> Result<AttackOutcome, EngineError> {
        self.attack(Turn::Player, coord)
    }

    /// Opponent attacks the local fleet.
    pub fn opponent_attack(&mut self, coord: Coordinate) -> Result<AttackOutcome, EngineError> {
        self.attack(Turn::Opponent, coord)
    }

    /// Resolve an attack by `side`. An already-attacked cell is reported but
    /// neither counts as a move nor passes the turn.
    pub fn attack(&mut self, side: Turn, coord: Coordinate) -> Result<AttackOutcome, EngineError> {
        if self.phase != Phase::Playing {
            return Err(EngineError::NotPlaying);
        }
        if self.turn != side {
            return Err(EngineError::NotYourTurn);
        }
        let outcome = self.apply_unchecked(side, coord)?;
        if !outcome.is_move() {
            return Ok(outcome);
        }
        if self.target_of(side).check_win() {
            self.finish(side);
        } else {
            self.turn = side.other();
        }
        Ok(outcome)
    }

    /// Overwrite the turn with the value held by an outside authority.
    pub fn set_turn(&mut self, turn: Turn) {
        self.turn = turn;
    }

    /// End the game with `winner`.
    pub fn finish(&mut self, winner: Turn) {
        if self.phase != Phase::Finished {
            log::info!("game over, winner: {:?}", winner);
        }
        self.phase = Phase::Finished;
        self.winner = Some(winner);
    }

    /// Outcome `side` would get by attacking `coord`, and whether that shot
    /// would sink the last ship. Nothing changes.
    pub fn preview_attack(
        &self,
        side: Turn,
        coord: Coordinate,
    ) -> Result<(AttackOutcome, bool), EngineError> {
        let (fleet, outcome) = self.target_of(side).receive_attack(coord)?;
        Ok((outcome, outcome.is_move() && fleet.check_win()))
    }

    /// Apply an attack without turn or phase checks.
    pub(crate) fn apply_unchecked(
        &mut self,
        side: Turn,
        coord: Coordinate,
    ) -> Result<AttackOutcome, EngineError> {
        let (fleet, outcome) = self.target_of(side).receive_attack(coord)?;
        if outcome.is_move() {
            match side {
                Turn::Player => {
                    self.opponent = fleet;
                    self.player_moves += 1;
                }
                Turn::Opponent => {
                    self.player = fleet;
                    self.opponent_moves += 1;
                }
            }
        }
        Ok(outcome)
    }

    /// Enter play for a networked session whose opponent fleet arrived as a
    /// snapshot. Unlike `start`, only the local fleet must be complete.
    pub(crate) fn begin_remote(&mut self, opponent: Fleet, turn: Turn) {
        self.opponent = opponent;
        self.turn = turn;
        self.phase = Phase::Playing;
    }
}
