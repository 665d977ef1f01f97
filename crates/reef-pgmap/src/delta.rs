//! Versioned incremental updates to the map.

use std::collections::{BTreeMap, BTreeSet};

use reef_core::{DeviceId, DeviceUsage, Epoch, PgId, PgStats};
use serde::{Deserialize, Serialize};

/// A versioned batch of per-entity snapshot changes.
///
/// Deltas are produced from device status reports, ordered and committed by
/// the upstream consensus layer, and applied here one at a time. The
/// declaration order of the fields is the wire order. Containers are
/// ordered so the encoding is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgMapDelta {
    /// Target map version; must equal the current map version plus one.
    pub version: u64,
    /// New placement-group snapshots, keyed by id.
    pub pg_updates: BTreeMap<PgId, PgStats>,
    /// New device snapshots, keyed by id.
    pub device_updates: BTreeMap<DeviceId, DeviceUsage>,
    /// Devices to drop from the map.
    pub device_removals: BTreeSet<DeviceId>,
    /// Topology epoch this delta was derived from; zero when not supplied.
    pub topology_epoch: Epoch,
    /// Epoch of the last placement scan; zero when not supplied.
    pub scan_epoch: Epoch,
}

impl PgMapDelta {
    /// Creates an empty delta targeting the given version.
    #[must_use]
    pub fn new(version: u64) -> Self {
        Self { version, ..Self::default() }
    }

    /// Adds or replaces a placement-group snapshot.
    #[must_use]
    pub fn update_pg(mut self, id: PgId, stats: PgStats) -> Self {
        self.pg_updates.insert(id, stats);
        self
    }

    /// Adds or replaces a device snapshot.
    #[must_use]
    pub fn update_device(mut self, id: DeviceId, usage: DeviceUsage) -> Self {
        self.device_updates.insert(id, usage);
        self
    }

    /// Marks a device for removal.
    #[must_use]
    pub fn remove_device(mut self, id: DeviceId) -> Self {
        self.device_removals.insert(id);
        self
    }

    /// Sets the sticky epoch markers. Zero leaves the stored value alone.
    #[must_use]
    pub fn with_epochs(mut self, topology_epoch: Epoch, scan_epoch: Epoch) -> Self {
        self.topology_epoch = topology_epoch;
        self.scan_epoch = scan_epoch;
        self
    }

    /// Returns true if the delta changes no entity and carries no epochs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pg_updates.is_empty()
            && self.device_updates.is_empty()
            && self.device_removals.is_empty()
            && self.topology_epoch == 0
            && self.scan_epoch == 0
    }

    /// Number of entities this delta touches.
    #[must_use]
    pub fn touched(&self) -> usize {
        self.pg_updates.len() + self.device_updates.len() + self.device_removals.len()
    }
}

#[cfg(test)]
mod tests {
    use reef_core::PgStatus;

    use super::*;

    #[test]
    fn test_builder() {
        let delta = PgMapDelta::new(3)
            .update_pg(1, PgStats::new(PgStatus::CREATING))
            .update_device(0, DeviceUsage::new(100, 10, 90))
            .remove_device(5)
            .with_epochs(7, 0);

        assert_eq!(delta.version, 3);
        assert_eq!(delta.pg_updates.len(), 1);
        assert_eq!(delta.device_updates.len(), 1);
        assert!(delta.device_removals.contains(&5));
        assert_eq!(delta.topology_epoch, 7);
        assert_eq!(delta.scan_epoch, 0);
        assert_eq!(delta.touched(), 3);
    }

    #[test]
    fn test_is_empty() {
        assert!(PgMapDelta::new(1).is_empty());
        assert!(!PgMapDelta::new(1).with_epochs(0, 2).is_empty());
        assert!(!PgMapDelta::new(1).remove_device(3).is_empty());
    }

    #[test]
    fn test_upsert_replaces() {
        let delta = PgMapDelta::new(1)
            .update_pg(1, PgStats::new(PgStatus::CREATING))
            .update_pg(1, PgStats::new(PgStatus::ACTIVE));

        assert_eq!(delta.pg_updates.len(), 1);
        assert_eq!(delta.pg_updates[&1].status, PgStatus::ACTIVE);
    }
}
