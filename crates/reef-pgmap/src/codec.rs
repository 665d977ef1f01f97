//! Binary codec for deltas and full map snapshots.
//!
//! Wire form: 4-byte magic, little-endian `u32` format version, then the
//! bincode encoding of a payload struct whose declaration order fixes the
//! field order. Aggregates, the membership index, and the creating set are
//! never encoded; decoding a full map rebuilds them by replaying the
//! restored tables through the stats engine.

use std::collections::BTreeMap;

use reef_core::{DeviceId, DeviceUsage, Epoch, PgId, PgStats};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::delta::PgMapDelta;
use crate::error::{PgMapError, Result};
use crate::map::PgMap;

/// Magic bytes prefixed to every encoded value.
const MAGIC: &[u8; 4] = b"RFPG";

/// Wire format version.
const FORMAT_VERSION: u32 = 1;

/// Full-map payload. Declaration order is the wire order; tables are
/// sorted so the encoding is deterministic.
#[derive(Debug, Serialize, Deserialize)]
struct MapPayload {
    version: u64,
    pg_table: BTreeMap<PgId, PgStats>,
    device_table: BTreeMap<DeviceId, DeviceUsage>,
    topology_epoch: Epoch,
    scan_epoch: Epoch,
}

fn encode_payload<T: Serialize>(payload: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(16);
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bincode::serialize_into(&mut buf, payload)
        .map_err(|e| PgMapError::Malformed(e.to_string()))?;
    Ok(buf)
}

fn decode_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.len() < MAGIC.len() + 4 {
        warn!(len = bytes.len(), "Encoded input shorter than header");
        return Err(PgMapError::Malformed("input shorter than header".to_string()));
    }
    let (magic, rest) = bytes.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(PgMapError::Malformed("bad magic".to_string()));
    }

    let mut version_bytes = [0u8; 4];
    version_bytes.copy_from_slice(&rest[..4]);
    let version = u32::from_le_bytes(version_bytes);
    if version != FORMAT_VERSION {
        return Err(PgMapError::Malformed(format!("unsupported format version {version}")));
    }

    bincode::deserialize(&rest[4..]).map_err(|e| {
        warn!(error = %e, "Failed to decode payload");
        PgMapError::Malformed(e.to_string())
    })
}

/// Encodes a delta envelope.
pub fn encode_delta(delta: &PgMapDelta) -> Result<Vec<u8>> {
    encode_payload(delta)
}

/// Decodes a delta envelope.
pub fn decode_delta(bytes: &[u8]) -> Result<PgMapDelta> {
    decode_payload(bytes)
}

/// Encodes a full map snapshot: authoritative tables and epochs only.
pub fn encode_map(map: &PgMap) -> Result<Vec<u8>> {
    let payload = MapPayload {
        version: map.version(),
        pg_table: map.pgs().iter().map(|(&id, &stats)| (id, stats)).collect(),
        device_table: map.devices().iter().map(|(&id, &usage)| (id, usage)).collect(),
        topology_epoch: map.topology_epoch(),
        scan_epoch: map.scan_epoch(),
    };
    encode_payload(&payload)
}

/// Decodes a full map snapshot, rebuilding all derived state from the
/// restored tables.
pub fn decode_map(bytes: &[u8]) -> Result<PgMap> {
    let payload: MapPayload = decode_payload(bytes)?;
    Ok(PgMap::from_tables(
        payload.version,
        payload.pg_table.into_iter().collect(),
        payload.device_table.into_iter().collect(),
        payload.topology_epoch,
        payload.scan_epoch,
    ))
}
