//! Same-process game between two players, driven one turn at a time.

use alloc::boxed::Box;
use rand::rngs::SmallRng;

use crate::core::{
    AttackOutcome, Coordinate, EngineError, Fleet, GameSession, Phase, Turn, BOARD_SIZE,
};
use crate::player::Player;

/// Upper bound on turns; each productive turn attacks a fresh cell.
const MAX_TURNS: usize = 2 * BOARD_SIZE * BOARD_SIZE + 1;

/// One resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub attacker: Turn,
    pub coordinate: Coordinate,
    pub outcome: AttackOutcome,
}

pub struct LocalGame {
    session: GameSession,
    home: Box<dyn Player>,
    away: Box<dyn Player>,
}

impl LocalGame {
    /// Let both players place their fleets and start the game with `first`
    /// to move. `home` plays the session's player fleet.
    pub fn setup(
        mut home: Box<dyn Player>,
        mut away: Box<dyn Player>,
        rng: &mut SmallRng,
        allow_adjacent: bool,
        first: Turn,
    ) -> Result<Self, EngineError> {
        let player = home.place_ships(rng, &Fleet::new("player", "Player", false), allow_adjacent)?;
        let opponent =
            away.place_ships(rng, &Fleet::new("computer", "Computer", true), allow_adjacent)?;
        let mut session = GameSession::new(player, opponent);
        session.start(first)?;
        Ok(Self {
            session,
            home,
            away,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn is_over(&self) -> bool {
        self.session.phase() == Phase::Finished
    }

    /// Play the turn of whichever side holds it. Returns `None` once the game
    /// is over.
    pub fn step(&mut self, rng: &mut SmallRng) -> Result<Option<TurnReport>, EngineError> {
        if self.is_over() {
            return Ok(None);
        }
        let attacker = self.session.turn();
        let (active, passive) = match attacker {
            Turn::Player => (&mut self.home, &mut self.away),
            Turn::Opponent => (&mut self.away, &mut self.home),
        };
        let Some(coordinate) = active.select_target(rng, self.session.target_of(attacker)) else {
            return Err(EngineError::Stalled);
        };
        let outcome = self.session.attack(attacker, coordinate)?;
        active.handle_attack_result(coordinate, outcome, self.session.target_of(attacker));
        passive.handle_opponent_attack(coordinate, outcome);
        log::debug!("{:?} fired at {}: {:?}", attacker, coordinate, outcome);
        Ok(Some(TurnReport {
            attacker,
            coordinate,
            outcome,
        }))
    }

    /// Play until someone wins and return the winner.
    pub fn run(&mut self, rng: &mut SmallRng) -> Result<Turn, EngineError> {
        for _ in 0..MAX_TURNS {
            if self.step(rng)?.is_none() {
                break;
            }
        }
        self.session.winner().ok_or(EngineError::Stalled)
    }
}
