#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod core;
pub mod domain;
pub mod local;
pub mod player;
pub mod sync;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod player_node;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod transport;

pub use crate::config::GameConfig;
pub use crate::core::*;
pub use domain::*;
pub use local::{LocalGame, TurnReport};
pub use player::{AiPlayer, Player};
pub use sync::{Applied, Reconciler, ReplaySummary};
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use player_node::{NodeReport, PlayerNode};
#[cfg(feature = "std")]
pub use protocol::{Message, PROTOCOL_VERSION};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryRoom, RoomAuthority, Subscription};
