//! Messages pushed to room subscribers and their wire encoding.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::domain::{MoveEvent, RoomRecord};

/// Current protocol version for message compatibility.
pub const PROTOCOL_VERSION: u8 = 1;

/// Maximum encoded frame size to prevent excessive memory allocation.
pub const MAX_FRAME_SIZE: usize = 1_000_000;

/// Events delivered by a room subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// A move was appended to the room's log.
    MoveRecorded(MoveEvent),
    /// The room record changed (readiness, turn, status, winner).
    RoomUpdated(RoomRecord),
    /// The subscriber fell behind and dropped `missed` messages; it must
    /// refetch the room and the move log.
    Resync { missed: u64 },
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u8,
    body: T,
}

/// Encode a value as a versioned bincode frame.
pub fn encode<T: Serialize>(body: &T) -> anyhow::Result<Vec<u8>> {
    let bytes = bincode::serialize(&Envelope {
        version: PROTOCOL_VERSION,
        body,
    })?;
    if bytes.len() > MAX_FRAME_SIZE {
        return Err(anyhow::anyhow!(
            "Frame too large: {} bytes (max {})",
            bytes.len(),
            MAX_FRAME_SIZE
        ));
    }
    Ok(bytes)
}

/// Decode a frame produced by [`encode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> anyhow::Result<T> {
    if bytes.len() > MAX_FRAME_SIZE {
        return Err(anyhow::anyhow!(
            "Frame too large: {} bytes (max {})",
            bytes.len(),
            MAX_FRAME_SIZE
        ));
    }
    let envelope: Envelope<T> = bincode::deserialize(bytes)?;
    if envelope.version != PROTOCOL_VERSION {
        return Err(anyhow::anyhow!(
            "Protocol version mismatch: expected {}, got {}",
            PROTOCOL_VERSION,
            envelope.version
        ));
    }
    Ok(envelope.body)
}
