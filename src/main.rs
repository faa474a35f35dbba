#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::sync::Arc;

#[cfg(feature = "std")]
use broadside::{
    init_logging, AiPlayer, Board, CellStatus, Coordinate, Difficulty, Fleet, GameConfig, InMemoryRoom,
    LocalGame, Player, PlayerNode, Side, Turn, BOARD_SIZE,
};
#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum Level {
    Random,
    Smart,
}

#[cfg(feature = "std")]
impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Random => Difficulty::Random,
            Level::Smart => Difficulty::Smart,
        }
    }
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Watch two computer players fight on the local machine.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = Level::Smart)]
        difficulty: Level,
        #[arg(long, help = "Let ships touch each other")]
        allow_adjacent: bool,
        #[arg(long, default_value_t = 0, help = "Pause before each shot, in milliseconds")]
        think_ms: u64,
    },
    /// Play a room-based game: two nodes share an in-process room authority.
    Networked {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Let ships touch each other")]
        allow_adjacent: bool,
    },
}

#[cfg(feature = "std")]
fn seeded(seed: Option<u64>, salt: u64) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s.wrapping_add(salt)),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
fn print_board(title: &str, board: &Board, reveal: bool) {
    println!("{}", title);
    print!("   ");
    for col in 0..BOARD_SIZE {
        print!("{:>2}", col);
    }
    println!();
    for row in 0..BOARD_SIZE {
        print!("{:>2} ", (b'A' + row as u8) as char);
        for col in 0..BOARD_SIZE {
            let ch = board
                .get(Coordinate { row, col })
                .map(|cell| match cell.status() {
                    CellStatus::Empty => '.',
                    CellStatus::Ship if reveal => 'S',
                    CellStatus::Ship => '.',
                    CellStatus::Hit => 'X',
                    CellStatus::Miss => 'o',
                })
                .unwrap_or('?');
            print!(" {}", ch);
        }
        println!();
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Local {
            seed,
            difficulty,
            allow_adjacent,
            think_ms,
        } => {
            println!("Starting local AI vs AI game...");
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let config = GameConfig::default()
                .with_difficulty(difficulty.into())
                .with_adjacent(allow_adjacent)
                .with_think_delay(Duration::from_millis(think_ms));
            let mut rng = seeded(seed, 0);

            let mut game = LocalGame::setup(
                Box::new(AiPlayer::new(config.difficulty)),
                Box::new(AiPlayer::new(config.difficulty)),
                &mut rng,
                config.allow_adjacent,
                Turn::Player,
            )
            .map_err(|e| anyhow::anyhow!(e))?;

            while !game.is_over() {
                if !config.think_delay.is_zero() {
                    tokio::time::sleep(config.think_delay).await;
                }
                if let Some(report) = game.step(&mut rng).map_err(|e| anyhow::anyhow!(e))? {
                    println!(
                        "{:?} fires at {}: {:?}",
                        report.attacker, report.coordinate, report.outcome
                    );
                }
            }

            let session = game.session();
            print_board("\nPlayer fleet", session.player().board(), true);
            print_board("\nComputer fleet", session.opponent().board(), true);
            match session.winner() {
                Some(Turn::Player) => println!(
                    "\nPlayer wins after {} shots.",
                    session.moves(Turn::Player)
                ),
                Some(Turn::Opponent) => println!(
                    "\nComputer wins after {} shots.",
                    session.moves(Turn::Opponent)
                ),
                None => println!("\nNo winner."),
            }
        }
        Commands::Networked {
            seed,
            allow_adjacent,
        } => {
            println!("Opening room...");
            let room = InMemoryRoom::open("room-1", "host", seed.unwrap_or_default())?;
            room.join("guest").await?;

            let mut host_rng = seeded(seed, 1);
            let mut guest_rng = seeded(seed, 2);
            let mut host_player = AiPlayer::new(Difficulty::Smart);
            let mut guest_player = AiPlayer::new(Difficulty::Smart);
            let host_fleet = host_player
                .place_ships(&mut host_rng, &Fleet::new("host", "Host", true), allow_adjacent)
                .map_err(|e| anyhow::anyhow!(e))?;
            let guest_fleet = guest_player
                .place_ships(&mut guest_rng, &Fleet::new("guest", "Guest", true), allow_adjacent)
                .map_err(|e| anyhow::anyhow!(e))?;

            let authority = Arc::new(room);
            let host_future = {
                let authority = authority.clone();
                async move {
                    let mut node =
                        PlayerNode::new(Side::Host, Box::new(host_player), host_fleet, authority);
                    node.run(&mut host_rng).await
                }
            };
            let guest_future = {
                let authority = authority.clone();
                async move {
                    let mut node = PlayerNode::new(
                        Side::Guest,
                        Box::new(guest_player),
                        guest_fleet,
                        authority,
                    );
                    node.run(&mut guest_rng).await
                }
            };

            let (host, guest) = tokio::try_join!(host_future, guest_future)?;
            if host.winner != guest.winner {
                return Err(anyhow::anyhow!(
                    "Nodes disagree on the winner: {:?} vs {:?}",
                    host.winner,
                    guest.winner
                ));
            }
            println!(
                "Winner: {:?} (host fired {} shots, guest fired {})",
                host.winner, host.moves_made, guest.moves_made
            );
        }
    }
    Ok(())
}
