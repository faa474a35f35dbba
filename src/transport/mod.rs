//! Room authority: the shared record and move log both sides play through.

use crate::core::{AttackOutcome, Board, Coordinate};
use crate::domain::{MoveEvent, RoomRecord, Side};
use crate::protocol::Message;

/// Ordered stream of room events for one subscriber.
#[async_trait::async_trait]
pub trait Subscription: Send {
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

/// Single source of truth for turn, readiness and winner, plus the
/// append-only move log.
#[async_trait::async_trait]
pub trait RoomAuthority: Send + Sync {
    /// Current room record.
    async fn room(&self) -> anyhow::Result<RoomRecord>;

    /// Share `side`'s board by value and mark that side ready.
    async fn set_player_board(&self, side: Side, board: &Board) -> anyhow::Result<()>;

    /// Start play once both sides are ready. Returns `true` if this call
    /// started the game.
    async fn check_and_start(&self) -> anyhow::Result<bool>;

    /// Append a move by `side` and pass the turn.
    async fn make_move(
        &self,
        side: Side,
        coordinate: Coordinate,
        outcome: AttackOutcome,
    ) -> anyhow::Result<MoveEvent>;

    /// Finish the game with `side` as winner.
    async fn declare_winner(&self, side: Side) -> anyhow::Result<()>;

    /// Full move log in the order moves were made.
    async fn moves(&self) -> anyhow::Result<Vec<MoveEvent>>;

    /// Subscribe to room events from now on.
    async fn subscribe(&self) -> anyhow::Result<Box<dyn Subscription>>;
}

pub mod in_memory;
