//! Reconciliation of a mirrored session with the room's move stream.
//!
//! Moves reach an observer twice over: pushed live as they happen, and in
//! the full log fetched when play starts. Both paths go through one
//! idempotency gate keyed by [`MoveId`], so each attack lands exactly once.
//! Live moves that arrive before the opponent snapshot has been loaded are
//! buffered and drained through the same gate once the replay completes.
//!
//! Turn and winner are never derived from moves here. They are copied from
//! the room record whenever it changes.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::core::{AttackOutcome, EngineError, GameSession, Phase, Turn};
use crate::domain::{MoveEvent, MoveId, RoomRecord, RoomStatus, Side};

/// What the gate did with one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Event was applied with this outcome.
    Applied(AttackOutcome),
    /// Event had been applied before and was dropped.
    Duplicate,
    /// Session is not live yet; event is held until the replay.
    Buffered,
}

/// Counts from one replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    /// Log events applied.
    pub replayed: usize,
    /// Buffered live events applied after the log.
    pub drained: usize,
    /// Events dropped by the gate.
    pub duplicates: usize,
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    side: Side,
    processed: BTreeSet<MoveId>,
    pending: Vec<MoveEvent>,
}

impl Reconciler {
    /// Reconciler for the observer seated at `side`.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            processed: BTreeSet::new(),
            pending: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_processed(&self, id: MoveId) -> bool {
        self.processed.contains(&id)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Live events held back until the replay.
    pub fn pending(&self) -> &[MoveEvent] {
        &self.pending
    }

    /// Apply `event` unless it has been applied before.
    ///
    /// Our own attacks land on the opponent fleet, the other side's on ours.
    pub fn apply(
        &mut self,
        session: &mut GameSession,
        event: &MoveEvent,
    ) -> Result<Applied, EngineError> {
        if self.processed.contains(&event.id) {
            log::debug!("dropping duplicate move {:?}", event.id);
            return Ok(Applied::Duplicate);
        }
        let attacker = event.player.relative_to(self.side);
        let outcome = session.apply_unchecked(attacker, event.coordinate)?;
        self.processed.insert(event.id);
        if outcome != event.outcome {
            log::warn!(
                "move {:?} at {} recorded as {:?} but resolved as {:?}",
                event.id,
                event.coordinate,
                event.outcome,
                outcome
            );
        }
        Ok(Applied::Applied(outcome))
    }

    /// Handle a move pushed by the live subscription.
    pub fn on_live_move(
        &mut self,
        session: &mut GameSession,
        event: MoveEvent,
    ) -> Result<Applied, EngineError> {
        if self.processed.contains(&event.id) {
            log::debug!("dropping duplicate move {:?}", event.id);
            return Ok(Applied::Duplicate);
        }
        if session.phase() == Phase::Placement {
            if !self.pending.iter().any(|p| p.id == event.id) {
                log::debug!("buffering move {:?} until replay", event.id);
                self.pending.push(event);
            }
            return Ok(Applied::Buffered);
        }
        self.apply(session, &event)
    }

    /// Bring a session that is still in placement up to date with a room that
    /// has started.
    ///
    /// Loads the opponent fleet from the room's snapshot. Our own fleet is
    /// taken from the room too whenever the local copy is missing or differs
    /// from what the room holds, as after a restart. Then applies `log` in
    /// sequence order and drains buffered live events. Turn and winner are
    /// taken from the room. On error the session and reconciler are left as
    /// they were.
    pub fn replay(
        &mut self,
        session: &mut GameSession,
        room: &RoomRecord,
        log: &[MoveEvent],
    ) -> Result<ReplaySummary, EngineError> {
        if session.phase() != Phase::Placement {
            return Err(EngineError::NotPlaying);
        }
        let turn = match (room.has_started(), room.current_turn) {
            (true, Some(turn)) => turn.relative_to(self.side),
            _ => return Err(EngineError::NotPlaying),
        };
        let opponent_board = room
            .board_of(self.side.other())
            .ok_or(EngineError::MissingSnapshot)?;
        let opponent = session.opponent().with_snapshot(opponent_board.clone())?;

        let mut staged = session.clone();
        match room.board_of(self.side) {
            Some(own_board) if staged.player().board() != own_board => {
                if staged.player().is_complete() {
                    log::warn!("local fleet differs from the shared board, using the room's copy");
                }
                let own = staged.player().with_snapshot(own_board.clone())?;
                staged.set_player_fleet(own)?;
            }
            Some(_) => {}
            None if staged.player().is_complete() => {}
            None => return Err(EngineError::MissingSnapshot),
        }
        staged.begin_remote(opponent, turn);

        let mut gate = self.clone();
        gate.pending.clear();
        let mut summary = ReplaySummary::default();

        let mut ordered: Vec<&MoveEvent> = log.iter().collect();
        ordered.sort_by_key(|event| event.seq);
        for event in ordered {
            match gate.apply(&mut staged, event)? {
                Applied::Applied(_) => summary.replayed += 1,
                _ => summary.duplicates += 1,
            }
        }

        let mut buffered = self.pending.clone();
        buffered.sort_by_key(|event| event.seq);
        for event in &buffered {
            match gate.apply(&mut staged, event)? {
                Applied::Applied(_) => summary.drained += 1,
                _ => summary.duplicates += 1,
            }
        }

        if let (RoomStatus::Finished, Some(winner)) = (room.status, room.winner) {
            staged.finish(winner.relative_to(self.side));
        }

        log::info!(
            "replayed {} moves, drained {} buffered, dropped {} duplicates",
            summary.replayed,
            summary.drained,
            summary.duplicates
        );
        *session = staged;
        *self = gate;
        Ok(summary)
    }

    /// Copy turn and winner from an updated room record.
    ///
    /// Has no effect before the replay has put the session in play.
    pub fn on_room_update(&self, session: &mut GameSession, room: &RoomRecord) {
        if session.phase() == Phase::Placement {
            return;
        }
        match (room.status, room.winner, room.current_turn) {
            (RoomStatus::Finished, Some(winner), _) => {
                session.finish(winner.relative_to(self.side));
            }
            (RoomStatus::Playing, _, Some(turn)) => {
                let turn: Turn = turn.relative_to(self.side);
                if session.turn() != turn {
                    log::debug!("turn now {:?} per room authority", turn);
                }
                session.set_turn(turn);
            }
            _ => {}
        }
    }
}
