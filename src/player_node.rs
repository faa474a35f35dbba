#![cfg(feature = "std")]

use std::sync::Arc;

use rand::rngs::SmallRng;

use crate::{
    core::{Fleet, GameSession, Phase, Turn},
    domain::{MoveEvent, RoomRecord, RoomStatus, Side},
    player::Player,
    protocol::Message,
    sync::{Applied, Reconciler},
    transport::RoomAuthority,
};

/// How a networked game ended for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeReport {
    pub side: Side,
    pub winner: Option<Side>,
    /// Attacks this node made.
    pub moves_made: u32,
    /// Events the idempotency gate dropped.
    pub duplicates_dropped: usize,
}

/// One participant of a networked game.
///
/// The node owns its copy of the session and is the only thing that mutates
/// it, one room event at a time. Turn and winner always come from the room.
pub struct PlayerNode {
    side: Side,
    player: Box<dyn Player>,
    session: GameSession,
    reconciler: Reconciler,
    room: Arc<dyn RoomAuthority>,
    awaiting_authority: bool,
    moves_made: u32,
    duplicates_dropped: usize,
}

impl PlayerNode {
    /// `fleet` must already carry the player's ships.
    pub fn new(
        side: Side,
        player: Box<dyn Player>,
        fleet: Fleet,
        room: Arc<dyn RoomAuthority>,
    ) -> Self {
        let opponent = match side {
            Side::Host => Fleet::new("guest", "Guest", false),
            Side::Guest => Fleet::new("host", "Host", false),
        };
        Self {
            side,
            player,
            session: GameSession::new(fleet, opponent),
            reconciler: Reconciler::new(side),
            room,
            awaiting_authority: false,
            moves_made: 0,
            duplicates_dropped: 0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Share the board, play until the room reports a winner.
    pub async fn run(&mut self, rng: &mut SmallRng) -> anyhow::Result<NodeReport> {
        let mut subscription = self.room.subscribe().await?;

        let mut room = self.room.room().await?;
        while room.status == RoomStatus::Waiting {
            if let Message::RoomUpdated(updated) = subscription.recv().await? {
                room = updated;
            }
        }
        if !room.has_started() {
            self.room
                .set_player_board(self.side, self.session.player().board())
                .await?;
            self.room.check_and_start().await?;
        }
        // The room may have started (or even finished) before we subscribed.
        self.catch_up().await?;

        while self.session.phase() != Phase::Finished {
            self.take_turn(rng).await?;
            if self.session.phase() == Phase::Finished {
                break;
            }
            let msg = subscription.recv().await?;
            self.handle(msg).await?;
        }

        Ok(self.report())
    }

    /// Current report; final once the session is finished.
    pub fn report(&self) -> NodeReport {
        NodeReport {
            side: self.side,
            winner: self.session.winner().map(|turn| match turn {
                Turn::Player => self.side,
                Turn::Opponent => self.side.other(),
            }),
            moves_made: self.moves_made,
            duplicates_dropped: self.duplicates_dropped,
        }
    }

    async fn handle(&mut self, msg: Message) -> anyhow::Result<()> {
        match msg {
            Message::MoveRecorded(event) => self.on_move(event),
            Message::RoomUpdated(room) => self.on_room(room).await,
            Message::Resync { missed } => {
                log::warn!("[{:?}] missed {} room events, refetching", self.side, missed);
                self.catch_up().await
            }
        }
    }

    fn on_move(&mut self, event: MoveEvent) -> anyhow::Result<()> {
        match self.reconciler.on_live_move(&mut self.session, event)? {
            Applied::Applied(outcome) => {
                if event.player != self.side {
                    self.player.handle_opponent_attack(event.coordinate, outcome);
                }
            }
            Applied::Duplicate => self.duplicates_dropped += 1,
            Applied::Buffered => {}
        }
        Ok(())
    }

    async fn on_room(&mut self, room: RoomRecord) -> anyhow::Result<()> {
        if self.session.phase() == Phase::Placement {
            if room.has_started() {
                let moves = self.room.moves().await?;
                self.start_from(&room, &moves)?;
            }
            return Ok(());
        }
        self.reconciler.on_room_update(&mut self.session, &room);
        if room.current_turn != Some(self.side) {
            self.awaiting_authority = false;
        }
        Ok(())
    }

    /// Refetch room and log and run them through the gate.
    async fn catch_up(&mut self) -> anyhow::Result<()> {
        let room = self.room.room().await?;
        let moves = self.room.moves().await?;
        if self.session.phase() == Phase::Placement {
            if room.has_started() {
                self.start_from(&room, &moves)?;
            }
            return Ok(());
        }
        for event in moves {
            if !self.reconciler.is_processed(event.id) {
                self.on_move(event)?;
            }
        }
        self.reconciler.on_room_update(&mut self.session, &room);
        if room.current_turn != Some(self.side) {
            self.awaiting_authority = false;
        }
        Ok(())
    }

    fn start_from(&mut self, room: &RoomRecord, moves: &[MoveEvent]) -> anyhow::Result<()> {
        let summary = self
            .reconciler
            .replay(&mut self.session, room, moves)
            .map_err(|e| anyhow::anyhow!(e))?;
        self.duplicates_dropped += summary.duplicates;
        log::info!(
            "[{:?}] in play after replaying {} moves, {:?} to move",
            self.side,
            summary.replayed + summary.drained,
            self.session.turn()
        );
        Ok(())
    }

    /// Attack if the room says it is our turn. A node whose fleet is gone
    /// holds fire until the room declares the winner.
    async fn take_turn(&mut self, rng: &mut SmallRng) -> anyhow::Result<()> {
        if self.session.phase() != Phase::Playing
            || self.session.turn() != Turn::Player
            || self.awaiting_authority
            || self.session.player().check_win()
        {
            return Ok(());
        }
        let coord = self
            .player
            .select_target(rng, self.session.opponent())
            .ok_or_else(|| anyhow::anyhow!("No cell left to attack"))?;
        let (outcome, defeats) = self
            .session
            .preview_attack(Turn::Player, coord)
            .map_err(|e| anyhow::anyhow!(e))?;
        if !outcome.is_move() {
            return Err(anyhow::anyhow!("Player selected attacked cell {}", coord));
        }

        let event = self.room.make_move(self.side, coord, outcome).await?;
        if defeats {
            self.room.declare_winner(self.side).await?;
        }
        self.awaiting_authority = true;
        self.moves_made += 1;

        // Apply now; the pushed copy of this event will hit the gate.
        self.reconciler
            .apply(&mut self.session, &event)
            .map_err(|e| anyhow::anyhow!(e))?;
        self.player
            .handle_attack_result(coord, outcome, self.session.opponent());
        log::debug!("[{:?}] fired at {}: {:?}", self.side, coord, outcome);
        Ok(())
    }
}
