use std::sync::Arc;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use tokio::sync::{broadcast, Mutex};

use crate::core::{AttackOutcome, Board, Coordinate};
use crate::domain::{MoveEvent, MoveId, RoomRecord, RoomStatus, Side};
use crate::protocol::{decode, encode, Message};
use crate::transport::{RoomAuthority, Subscription};

/// Frames buffered per subscriber before it is told to resync.
const CHANNEL_CAPACITY: usize = 256;

/// Stored state. Record and moves are kept encoded, as an external store
/// would, so every read goes through the codec.
struct RoomState {
    record: Vec<u8>,
    moves: Vec<Vec<u8>>,
    next_move_id: u64,
    rng: SmallRng,
}

/// Room authority living in the current process. Cloning shares the room.
#[derive(Clone)]
pub struct InMemoryRoom {
    state: Arc<Mutex<RoomState>>,
    events: broadcast::Sender<Vec<u8>>,
}

impl InMemoryRoom {
    /// Open a room for `host_name`. `seed` drives the first-turn draw.
    pub fn open(id: &str, host_name: &str, seed: u64) -> anyhow::Result<Self> {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        let state = RoomState {
            record: encode(&RoomRecord::new(id, host_name))?,
            moves: Vec::new(),
            next_move_id: 1,
            rng: SmallRng::seed_from_u64(seed),
        };
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            events,
        })
    }

    /// Seat `guest_name`. Either existing player may rejoin by name.
    pub async fn join(&self, guest_name: &str) -> anyhow::Result<RoomRecord> {
        let mut state = self.state.lock().await;
        let mut record: RoomRecord = decode(&state.record)?;
        if record.host_name == guest_name || record.guest_name.as_deref() == Some(guest_name) {
            return Ok(record);
        }
        if record.status != RoomStatus::Waiting || record.guest_name.is_some() {
            return Err(anyhow::anyhow!("Room is full or already started"));
        }
        record.guest_name = Some(guest_name.to_string());
        record.status = RoomStatus::Placing;
        self.store(&mut state, &record)?;
        log::info!("{} joined room {}", guest_name, record.id);
        Ok(record)
    }

    /// Push every recorded move to subscribers again, as an at-least-once
    /// channel may. Returns how many were resent.
    pub async fn redeliver(&self) -> anyhow::Result<usize> {
        let state = self.state.lock().await;
        for frame in &state.moves {
            let event: MoveEvent = decode(frame)?;
            self.publish(&Message::MoveRecorded(event))?;
        }
        Ok(state.moves.len())
    }

    fn store(&self, state: &mut RoomState, record: &RoomRecord) -> anyhow::Result<()> {
        state.record = encode(record)?;
        self.publish(&Message::RoomUpdated(record.clone()))
    }

    fn publish(&self, msg: &Message) -> anyhow::Result<()> {
        // No subscribers is fine; the log and record stay authoritative.
        let _ = self.events.send(encode(msg)?);
        Ok(())
    }
}

#[async_trait::async_trait]
impl RoomAuthority for InMemoryRoom {
    async fn room(&self) -> anyhow::Result<RoomRecord> {
        let state = self.state.lock().await;
        decode(&state.record)
    }

    async fn set_player_board(&self, side: Side, board: &Board) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        let mut record: RoomRecord = decode(&state.record)?;
        if record.status != RoomStatus::Placing {
            return Err(anyhow::anyhow!(
                "Boards can only be shared while placing (room is {:?})",
                record.status
            ));
        }
        match side {
            Side::Host => {
                record.host_board = Some(board.clone());
                record.host_ready = true;
            }
            Side::Guest => {
                record.guest_board = Some(board.clone());
                record.guest_ready = true;
            }
        }
        log::debug!("{:?} is ready in room {}", side, record.id);
        self.store(&mut state, &record)
    }

    async fn check_and_start(&self) -> anyhow::Result<bool> {
        let mut state = self.state.lock().await;
        let mut record: RoomRecord = decode(&state.record)?;
        if !(record.host_ready && record.guest_ready && record.status == RoomStatus::Placing) {
            return Ok(false);
        }
        let first = if state.rng.random_bool(0.5) {
            Side::Host
        } else {
            Side::Guest
        };
        record.status = RoomStatus::Playing;
        record.current_turn = Some(first);
        log::info!("room {} started, {:?} moves first", record.id, first);
        self.store(&mut state, &record)?;
        Ok(true)
    }

    async fn make_move(
        &self,
        side: Side,
        coordinate: Coordinate,
        outcome: AttackOutcome,
    ) -> anyhow::Result<MoveEvent> {
        let mut state = self.state.lock().await;
        let mut record: RoomRecord = decode(&state.record)?;
        if record.status != RoomStatus::Playing {
            return Err(anyhow::anyhow!("Room is not playing ({:?})", record.status));
        }
        if record.current_turn != Some(side) {
            return Err(anyhow::anyhow!("Not {:?}'s turn", side));
        }
        if !outcome.is_move() {
            return Err(anyhow::anyhow!("Refusing to record {:?}", outcome));
        }
        let event = MoveEvent {
            id: MoveId(state.next_move_id),
            seq: state.moves.len() as u64,
            player: side,
            coordinate,
            outcome,
        };
        state.next_move_id += 1;
        state.moves.push(encode(&event)?);
        self.publish(&Message::MoveRecorded(event))?;

        record.current_turn = Some(side.other());
        self.store(&mut state, &record)?;
        Ok(event)
    }

    async fn declare_winner(&self, side: Side) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        let mut record: RoomRecord = decode(&state.record)?;
        if record.status == RoomStatus::Finished {
            return Ok(());
        }
        record.status = RoomStatus::Finished;
        record.winner = Some(side);
        log::info!("room {} finished, {:?} wins", record.id, side);
        self.store(&mut state, &record)
    }

    async fn moves(&self) -> anyhow::Result<Vec<MoveEvent>> {
        let state = self.state.lock().await;
        state.moves.iter().map(|frame| decode(frame)).collect()
    }

    async fn subscribe(&self) -> anyhow::Result<Box<dyn Subscription>> {
        Ok(Box::new(InMemorySubscription {
            rx: self.events.subscribe(),
        }))
    }
}

struct InMemorySubscription {
    rx: broadcast::Receiver<Vec<u8>>,
}

#[async_trait::async_trait]
impl Subscription for InMemorySubscription {
    async fn recv(&mut self) -> anyhow::Result<Message> {
        match self.rx.recv().await {
            Ok(frame) => decode(&frame),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                log::warn!("subscription lagged, {} messages dropped", missed);
                Ok(Message::Resync { missed })
            }
            Err(broadcast::error::RecvError::Closed) => Err(anyhow::anyhow!("Channel closed")),
        }
    }
}
