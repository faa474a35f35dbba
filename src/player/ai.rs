use rand::rngs::SmallRng;

use crate::core::{
    ai::{self, AiMemory, Difficulty},
    AttackOutcome, Coordinate, EngineError, Fleet,
};

use super::Player;

/// Computer player: random placement, and either random or hunt/target
/// shooting depending on difficulty.
#[derive(Debug, Clone, Default)]
pub struct AiPlayer {
    difficulty: Difficulty,
    memory: AiMemory,
}

impl AiPlayer {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            memory: AiMemory::new(),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn memory(&self) -> &AiMemory {
        &self.memory
    }
}

impl Player for AiPlayer {
    fn place_ships(
        &mut self,
        rng: &mut SmallRng,
        fleet: &Fleet,
        allow_adjacent: bool,
    ) -> Result<Fleet, EngineError> {
        fleet.place_ships_randomly(rng, allow_adjacent)
    }

    fn select_target(&mut self, rng: &mut SmallRng, target: &Fleet) -> Option<Coordinate> {
        match self.difficulty {
            Difficulty::Random => ai::choose_random(target.board(), rng),
            Difficulty::Smart => {
                let (coord, memory) = ai::choose_smart(target.board(), &self.memory, rng)?;
                self.memory = memory;
                Some(coord)
            }
        }
    }

    fn handle_attack_result(&mut self, coord: Coordinate, outcome: AttackOutcome, target: &Fleet) {
        if self.difficulty == Difficulty::Smart {
            self.memory = ai::update_after_attack(&self.memory, coord, outcome, target.board());
        }
    }
}
