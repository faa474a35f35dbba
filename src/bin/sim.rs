use std::sync::Arc;

use broadside::{AiPlayer, Difficulty, Fleet, InMemoryRoom, NodeReport, Player, PlayerNode, Side};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let mut rng1 = SmallRng::seed_from_u64(seed1);
    let mut rng2 = SmallRng::seed_from_u64(seed2);

    let mut p1 = AiPlayer::new(Difficulty::Smart);
    let mut p2 = AiPlayer::new(Difficulty::Smart);
    let f1 = p1
        .place_ships(&mut rng1, &Fleet::new("host", "Host", true), false)
        .map_err(|e| anyhow::anyhow!(e))?;
    let f2 = p2
        .place_ships(&mut rng2, &Fleet::new("guest", "Guest", true), false)
        .map_err(|e| anyhow::anyhow!(e))?;

    let room = Arc::new(InMemoryRoom::open("sim", "host", seed1 ^ seed2)?);
    room.join("guest").await?;

    let host = {
        let room = room.clone();
        async move {
            let mut node = PlayerNode::new(Side::Host, Box::new(p1), f1, room);
            node.run(&mut rng1).await
        }
    };
    let guest = {
        let room = room.clone();
        async move {
            let mut node = PlayerNode::new(Side::Guest, Box::new(p2), f2, room);
            node.run(&mut rng2).await
        }
    };

    let (res1, res2): (NodeReport, NodeReport) = tokio::try_join!(host, guest)?;

    let winner = match (res1.winner, res2.winner) {
        (Some(Side::Host), Some(Side::Host)) => Some("host"),
        (Some(Side::Guest), Some(Side::Guest)) => Some("guest"),
        _ => None,
    };

    let result = json!({
        "host": {"shots": res1.moves_made, "duplicates": res1.duplicates_dropped},
        "guest": {"shots": res2.moves_made, "duplicates": res2.duplicates_dropped},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
