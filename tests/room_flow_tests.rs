use std::sync::Arc;

use broadside::{
    AiPlayer, Applied, AttackOutcome, Board, Coordinate, Difficulty, Fleet, GameSession,
    InMemoryRoom, Message, MoveEvent, Phase, Player, PlayerNode, Reconciler, RoomAuthority,
    RoomRecord, RoomStatus, Side, Subscription, Turn,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn at(row: usize, col: usize) -> Coordinate {
    Coordinate::new(row, col).unwrap()
}

fn fleet(seed: u64, id: &str) -> Fleet {
    let mut rng = SmallRng::seed_from_u64(seed);
    AiPlayer::new(Difficulty::Smart)
        .place_ships(&mut rng, &Fleet::new(id, id, true), false)
        .unwrap()
}

/// Room whose subscribers are told to resync after every recorded move.
struct ResyncingRoom(Arc<InMemoryRoom>);

struct ResyncingSubscription {
    inner: Box<dyn Subscription>,
    owed: bool,
}

#[async_trait::async_trait]
impl Subscription for ResyncingSubscription {
    async fn recv(&mut self) -> anyhow::Result<Message> {
        if self.owed {
            self.owed = false;
            return Ok(Message::Resync { missed: 0 });
        }
        let msg = self.inner.recv().await?;
        self.owed = matches!(msg, Message::MoveRecorded(_));
        Ok(msg)
    }
}

#[async_trait::async_trait]
impl RoomAuthority for ResyncingRoom {
    async fn room(&self) -> anyhow::Result<RoomRecord> {
        self.0.room().await
    }

    async fn set_player_board(&self, side: Side, board: &Board) -> anyhow::Result<()> {
        self.0.set_player_board(side, board).await
    }

    async fn check_and_start(&self) -> anyhow::Result<bool> {
        self.0.check_and_start().await
    }

    async fn make_move(
        &self,
        side: Side,
        coordinate: Coordinate,
        outcome: AttackOutcome,
    ) -> anyhow::Result<MoveEvent> {
        self.0.make_move(side, coordinate, outcome).await
    }

    async fn declare_winner(&self, side: Side) -> anyhow::Result<()> {
        self.0.declare_winner(side).await
    }

    async fn moves(&self) -> anyhow::Result<Vec<MoveEvent>> {
        self.0.moves().await
    }

    async fn subscribe(&self) -> anyhow::Result<Box<dyn Subscription>> {
        Ok(Box::new(ResyncingSubscription {
            inner: self.0.subscribe().await?,
            owed: false,
        }))
    }
}

async fn play(room: Arc<dyn RoomAuthority>, seed: u64) -> anyhow::Result<(PlayerNode, PlayerNode)> {
    let host = {
        let room = room.clone();
        async move {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut node = PlayerNode::new(
                Side::Host,
                Box::new(AiPlayer::new(Difficulty::Smart)),
                fleet(seed, "host"),
                room,
            );
            node.run(&mut rng).await?;
            Ok::<_, anyhow::Error>(node)
        }
    };
    let guest = {
        let room = room.clone();
        async move {
            let mut rng = SmallRng::seed_from_u64(seed + 1);
            let mut node = PlayerNode::new(
                Side::Guest,
                Box::new(AiPlayer::new(Difficulty::Random)),
                fleet(seed + 1, "guest"),
                room,
            );
            node.run(&mut rng).await?;
            Ok::<_, anyhow::Error>(node)
        }
    };
    tokio::try_join!(host, guest)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_two_nodes_agree_on_winner() -> anyhow::Result<()> {
    let room = Arc::new(InMemoryRoom::open("r1", "alice", 42)?);
    room.join("bob").await?;
    let (host, guest) = play(room.clone(), 10).await?;

    let (h, g) = (host.report(), guest.report());
    assert!(h.winner.is_some());
    assert_eq!(h.winner, g.winner);

    let record = room.room().await?;
    assert_eq!(record.status, RoomStatus::Finished);
    assert_eq!(record.winner, h.winner);

    let moves = room.moves().await?;
    assert_eq!(moves.len() as u32, h.moves_made + g.moves_made);
    for (i, event) in moves.iter().enumerate() {
        assert_eq!(event.seq, i as u64);
    }

    // Both mirrors saw every shot.
    for node in [&host, &guest] {
        let session = node.session();
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(
            (session.moves(Turn::Player) + session.moves(Turn::Opponent)) as usize,
            moves.len()
        );
    }
    let winner = match h.winner {
        Some(Side::Host) => &host,
        _ => &guest,
    };
    assert!(winner.session().opponent().check_win());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_restarted_node_catches_up() -> anyhow::Result<()> {
    let room = Arc::new(InMemoryRoom::open("r2", "alice", 7)?);
    room.join("bob").await?;
    let (_, guest) = play(room.clone(), 20).await?;

    // Same seat, nothing but an empty fleet: everything comes from the room.
    let mut late = PlayerNode::new(
        Side::Guest,
        Box::new(AiPlayer::default()),
        Fleet::new("guest", "guest", true),
        room.clone(),
    );
    let mut rng = SmallRng::seed_from_u64(0);
    let report = late.run(&mut rng).await?;
    assert_eq!(report.winner, guest.report().winner);
    assert_eq!(report.moves_made, 0);
    assert!(late.session().player().is_complete());
    assert_eq!(
        late.session().player().board(),
        guest.session().player().board()
    );
    assert_eq!(
        late.session().opponent().board(),
        guest.session().opponent().board()
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resync_skips_applied_moves() -> anyhow::Result<()> {
    let inner = Arc::new(InMemoryRoom::open("r5", "alice", 9)?);
    inner.join("bob").await?;
    let (host, guest) = play(Arc::new(ResyncingRoom(inner.clone())), 40).await?;

    let moves = inner.moves().await?;
    let (h, g) = (host.report(), guest.report());
    assert!(h.winner.is_some());
    assert_eq!(h.winner, g.winner);
    // Every move reaches a node at most twice: once applied, once dropped.
    assert!(h.duplicates_dropped <= moves.len());
    assert!(g.duplicates_dropped <= moves.len());
    for node in [&host, &guest] {
        let session = node.session();
        assert_eq!(
            (session.moves(Turn::Player) + session.moves(Turn::Opponent)) as usize,
            moves.len()
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_join_rules() -> anyhow::Result<()> {
    let room = InMemoryRoom::open("r3", "alice", 1)?;
    assert_eq!(room.room().await?.status, RoomStatus::Waiting);
    let record = room.join("bob").await?;
    assert_eq!(record.status, RoomStatus::Placing);
    assert_eq!(record.name_of(Side::Guest), Some("bob"));

    // Rejoining by name is fine, a third player is not.
    assert_eq!(room.join("bob").await?.guest_name.as_deref(), Some("bob"));
    assert!(room.join("alice").await.is_ok());
    let err = room.join("carol").await.unwrap_err();
    assert!(err.to_string().contains("full"));
    Ok(())
}

#[tokio::test]
async fn test_redelivered_moves_are_dropped() -> anyhow::Result<()> {
    let host = fleet(31, "host");
    let guest = fleet(32, "guest");
    let room = InMemoryRoom::open("r4", "alice", 5)?;
    room.join("bob").await?;
    let mut sub = room.subscribe().await?;

    // Nothing can be shot before the game starts.
    assert!(room
        .make_move(Side::Host, at(0, 0), AttackOutcome::Miss)
        .await
        .is_err());

    room.set_player_board(Side::Host, host.board()).await?;
    assert!(!room.check_and_start().await?);
    room.set_player_board(Side::Guest, guest.board()).await?;
    assert!(room.check_and_start().await?);
    assert!(!room.check_and_start().await?);
    assert!(room.set_player_board(Side::Host, host.board()).await.is_err());

    let first = room.room().await?.current_turn.unwrap();
    assert!(room
        .make_move(first.other(), at(0, 0), AttackOutcome::Miss)
        .await
        .is_err());

    let mut targets = [guest.clone(), host.clone()];
    let mut shooter = first;
    for coord in [at(0, 0), at(0, 0), at(5, 5)] {
        let target = match shooter {
            Side::Host => &mut targets[0],
            Side::Guest => &mut targets[1],
        };
        let (next, outcome) = target.receive_attack(coord)?;
        *target = next;
        room.make_move(shooter, coord, outcome).await?;
        shooter = shooter.other();
    }
    assert!(room
        .make_move(shooter, at(0, 0), AttackOutcome::AlreadyAttacked)
        .await
        .is_err());
    assert_eq!(room.redeliver().await?, 3);

    let mut session = GameSession::new(guest.clone(), Fleet::new("host", "host", false));
    let mut gate = Reconciler::new(Side::Guest);
    let mut duplicates = 0;
    // 3 board/start updates, 3 moves with their turn updates, 3 resends.
    for _ in 0..12 {
        match sub.recv().await? {
            Message::MoveRecorded(event) => {
                if gate.on_live_move(&mut session, event)? == Applied::Duplicate {
                    duplicates += 1;
                }
            }
            Message::RoomUpdated(record) => {
                if session.phase() == Phase::Placement && record.has_started() {
                    let log = room.moves().await?;
                    gate.replay(&mut session, &record, &log)?;
                } else {
                    gate.on_room_update(&mut session, &record);
                }
            }
            Message::Resync { .. } => panic!("subscriber should keep up"),
        }
    }
    assert_eq!(duplicates, 6);
    assert_eq!(gate.processed_count(), 3);
    assert_eq!(session.player(), &targets[0]);
    assert_eq!(session.opponent().board(), targets[1].board());
    assert_eq!(session.turn(), shooter.relative_to(Side::Guest));
    Ok(())
}

#[test]
fn test_frames_roundtrip_and_reject_bad_input() {
    use broadside::protocol::{decode, encode, MAX_FRAME_SIZE};

    let msg = Message::Resync { missed: 3 };
    let frame = encode(&msg).unwrap();
    assert_eq!(decode::<Message>(&frame).unwrap(), msg);

    let mut wrong_version = frame.clone();
    wrong_version[0] = broadside::PROTOCOL_VERSION + 1;
    assert!(decode::<Message>(&wrong_version).is_err());
    assert!(decode::<Message>(&frame[..1]).is_err());
    assert!(decode::<Message>(&vec![0u8; MAX_FRAME_SIZE + 1]).is_err());
}
