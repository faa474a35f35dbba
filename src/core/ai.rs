// Opponent AI: uniform random search and the hunt/target heuristic.
// Both strategies read only cell attack status, never ship placement.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use rand::Rng;

use super::board::{Board, Coordinate};
use super::common::AttackOutcome;
use super::config::BOARD_SIZE;

/// Which strategy picks the computer's shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    Random,
    #[default]
    Smart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum AiMode {
    /// Searching blindly for any ship.
    #[default]
    Hunt,
    /// Working through candidates around a located ship.
    Target,
}

/// State the hunt/target strategy carries between turns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct AiMemory {
    pub mode: AiMode,
    /// Candidates to try next, front first.
    pub target_queue: VecDeque<Coordinate>,
    /// Hits on the ship currently being chased, in attack order.
    pub hits: Vec<Coordinate>,
    pub last_hit: Option<Coordinate>,
}

impl AiMemory {
    /// Fresh memory in hunt mode.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Pick a uniformly random cell that has not been attacked yet.
///
/// Uses rejection sampling over the whole board. Returns `None` when every
/// cell has already been attacked.
pub fn choose_random<R: Rng + ?Sized>(target: &Board, rng: &mut R) -> Option<Coordinate> {
    if target.unattacked().next().is_none() {
        return None;
    }
    loop {
        let coord = Coordinate {
            row: rng.random_range(0..BOARD_SIZE),
            col: rng.random_range(0..BOARD_SIZE),
        };
        if !target.is_attacked(coord) {
            return Some(coord);
        }
    }
}

/// Pick the next shot with the hunt/target heuristic.
///
/// In target mode the front of the queue is used; queued cells that have been
/// attacked in the meantime are dropped. With nothing usable queued the AI
/// falls back to hunt mode and a random shot. The returned memory reflects
/// the consumed queue entries.
pub fn choose_smart<R: Rng + ?Sized>(
    target: &Board,
    memory: &AiMemory,
    rng: &mut R,
) -> Option<(Coordinate, AiMemory)> {
    let mut next = memory.clone();

    if next.mode == AiMode::Target {
        while let Some(coord) = next.target_queue.pop_front() {
            if target.is_attacked(coord) || !coord.is_on_board() {
                log::warn!("dropping stale target {}", coord);
                continue;
            }
            return Some((coord, next));
        }
    }

    if next.mode != AiMode::Hunt {
        log::debug!("target queue exhausted, back to hunting");
    }
    next.mode = AiMode::Hunt;
    next.target_queue.clear();
    let coord = choose_random(target, rng)?;
    Some((coord, next))
}

/// Fold the outcome of the last shot into the AI memory.
///
/// `target_after` is the defender's board with the shot already applied.
pub fn update_after_attack(
    memory: &AiMemory,
    attacked: Coordinate,
    outcome: AttackOutcome,
    target_after: &Board,
) -> AiMemory {
    match outcome {
        AttackOutcome::Hit => {
            let mut next = memory.clone();
            next.hits.push(attacked);
            next.last_hit = Some(attacked);
            next.mode = AiMode::Target;

            let candidates: Vec<Coordinate> = attacked
                .orthogonal_neighbors()
                .filter(|c| !target_after.is_attacked(*c))
                .collect();

            if let [.., prev, last] = next.hits[..] {
                if prev.row == last.row {
                    log::debug!("ship at {} looks horizontal", attacked);
                    next.target_queue = candidates
                        .into_iter()
                        .filter(|c| c.row == attacked.row)
                        .collect();
                } else if prev.col == last.col {
                    log::debug!("ship at {} looks vertical", attacked);
                    next.target_queue = candidates
                        .into_iter()
                        .filter(|c| c.col == attacked.col)
                        .collect();
                } else {
                    next.target_queue.extend(candidates);
                }
            } else {
                for c in candidates {
                    if !next.target_queue.contains(&c) {
                        next.target_queue.push_back(c);
                    }
                }
            }
            next
        }
        AttackOutcome::Sunk => AiMemory::new(),
        AttackOutcome::Miss | AttackOutcome::AlreadyAttacked => memory.clone(),
    }
}
