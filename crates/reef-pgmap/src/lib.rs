//! Authoritative placement-group and device statistics map for the Reef
//! cluster coordinator.
//!
//! This crate provides:
//! - Versioned delta application over per-entity statistics snapshots
//! - Incrementally maintained cluster-wide aggregates (never recomputed
//!   from scratch on the update path)
//! - A derived set of placement groups still being created
//! - A versioned binary codec for deltas and full map snapshots
//!
//! # Architecture
//!
//! Device status reports are turned into [`PgMapDelta`] batches, ordered
//! and committed by the coordinator's consensus layer, and applied here one
//! at a time:
//! 1. The delta's version must be exactly the current version plus one
//! 2. For each touched entity the old snapshot's contribution is
//!    subtracted from [`ClusterStats`], the snapshot is replaced, and the
//!    new contribution is added
//! 3. Sticky epoch markers are updated and the version advances
//!
//! Loading a persisted snapshot restores only the authoritative tables;
//! every aggregate and derived set is rebuilt by replaying the tables
//! through the same add path, so persisted and derived state can never
//! disagree.
//!
//! # Example
//!
//! ```
//! use reef_core::{DeviceUsage, PgStats, PgStatus};
//! use reef_pgmap::{PgMap, PgMapDelta};
//!
//! let mut map = PgMap::new();
//!
//! let delta = PgMapDelta::new(1)
//!     .update_pg(1, PgStats::new(PgStatus::CREATING).with_usage(100, 0, 0))
//!     .update_device(0, DeviceUsage::new(1000, 200, 800));
//! map.apply(&delta).unwrap();
//!
//! assert_eq!(map.version(), 1);
//! assert_eq!(map.stats().num_pgs(), 1);
//! assert!(map.creating().contains(1));
//! assert_eq!(map.total_used_kb(), 200);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod creating;
pub mod delta;
pub mod error;
pub mod map;
pub mod metrics;
pub mod stats;

pub use codec::{decode_delta, decode_map, encode_delta, encode_map};
pub use creating::CreatingSet;
pub use delta::PgMapDelta;
pub use error::{PgMapError, Result};
pub use map::PgMap;
pub use stats::ClusterStats;
