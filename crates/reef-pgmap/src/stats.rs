//! Running aggregate statistics over the authoritative tables.
//!
//! Totals are maintained strictly incrementally: every mutation of the pg
//! or device tables is bracketed by a matching `sub_*`/`add_*` pair, so a
//! delta costs O(changed entities) regardless of cluster size.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use reef_core::{DeviceUsage, PgId, PgStats, PgStatus};

use crate::creating::CreatingSet;

/// Cluster-wide totals derived from the per-entity snapshots.
///
/// Callers must never `sub_*` a snapshot that was not previously `add_*`-ed:
/// doing so corrupts the totals and panics where detectable. Per-status
/// buckets are dropped as soon as they reach zero, so a status with no
/// current groups never appears in reporting output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterStats {
    num_pgs: u64,
    pg_by_status: HashMap<PgStatus, u64>,
    pg_bytes: u64,
    pg_kb: u64,
    pg_objects: u64,

    num_devices: u64,
    device_kb_total: u64,
    device_kb_used: u64,
    device_kb_avail: u64,
    device_objects: u64,

    creating: CreatingSet,
}

impl ClusterStats {
    /// Creates zeroed totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every total, ready for a full replay.
    pub fn zero(&mut self) {
        *self = Self::default();
    }

    /// Adds a placement-group snapshot's contribution.
    pub fn add_pg(&mut self, id: PgId, stats: &PgStats) {
        self.num_pgs += 1;
        *self.pg_by_status.entry(stats.status).or_insert(0) += 1;
        self.pg_bytes += stats.num_bytes;
        self.pg_kb += stats.num_kb;
        self.pg_objects += stats.num_objects;
        if stats.is_creating() {
            self.creating.insert(id);
        }
    }

    /// Retracts a placement-group snapshot's contribution.
    ///
    /// # Panics
    ///
    /// Panics if no snapshot with this status was previously added.
    pub fn sub_pg(&mut self, id: PgId, stats: &PgStats) {
        match self.pg_by_status.entry(stats.status) {
            Entry::Occupied(mut bucket) => {
                *bucket.get_mut() -= 1;
                if *bucket.get() == 0 {
                    bucket.remove();
                }
            }
            Entry::Vacant(_) => {
                panic!("sub_pg for pg {id} with status {:?} that was never added", stats.status)
            }
        }
        self.num_pgs -= 1;
        self.pg_bytes -= stats.num_bytes;
        self.pg_kb -= stats.num_kb;
        self.pg_objects -= stats.num_objects;
        if stats.is_creating() {
            self.creating.remove(id);
        }
    }

    /// Adds a device snapshot's contribution.
    pub fn add_device(&mut self, usage: &DeviceUsage) {
        self.num_devices += 1;
        self.device_kb_total += usage.kb_total;
        self.device_kb_used += usage.kb_used;
        self.device_kb_avail += usage.kb_avail;
        self.device_objects += usage.num_objects;
    }

    /// Retracts a device snapshot's contribution.
    pub fn sub_device(&mut self, usage: &DeviceUsage) {
        self.num_devices -= 1;
        self.device_kb_total -= usage.kb_total;
        self.device_kb_used -= usage.kb_used;
        self.device_kb_avail -= usage.kb_avail;
        self.device_objects -= usage.num_objects;
    }

    /// Number of placement groups tracked.
    #[must_use]
    pub fn num_pgs(&self) -> u64 {
        self.num_pgs
    }

    /// Group counts keyed by full status-flag combination.
    ///
    /// Statuses with zero current groups are absent.
    #[must_use]
    pub fn pg_by_status(&self) -> &HashMap<PgStatus, u64> {
        &self.pg_by_status
    }

    /// Summed logical bytes across groups.
    #[must_use]
    pub fn pg_bytes(&self) -> u64 {
        self.pg_bytes
    }

    /// Summed logical kilobytes across groups.
    #[must_use]
    pub fn pg_kb(&self) -> u64 {
        self.pg_kb
    }

    /// Summed object counts across groups.
    #[must_use]
    pub fn pg_objects(&self) -> u64 {
        self.pg_objects
    }

    /// Number of devices tracked.
    #[must_use]
    pub fn num_devices(&self) -> u64 {
        self.num_devices
    }

    /// Summed raw capacity across devices, in kilobytes.
    #[must_use]
    pub fn device_kb_total(&self) -> u64 {
        self.device_kb_total
    }

    /// Summed used kilobytes across devices.
    #[must_use]
    pub fn device_kb_used(&self) -> u64 {
        self.device_kb_used
    }

    /// Summed available kilobytes across devices.
    #[must_use]
    pub fn device_kb_avail(&self) -> u64 {
        self.device_kb_avail
    }

    /// Summed object counts across devices.
    #[must_use]
    pub fn device_objects(&self) -> u64 {
        self.device_objects
    }

    /// The groups currently carrying the `CREATING` flag.
    #[must_use]
    pub fn creating(&self) -> &CreatingSet {
        &self.creating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pg(status: PgStatus, bytes: u64) -> PgStats {
        PgStats::new(status).with_usage(bytes, bytes / 1024, 1)
    }

    #[test]
    fn test_add_sub_pg_symmetric() {
        let mut stats = ClusterStats::new();
        let a = pg(PgStatus::ACTIVE | PgStatus::CLEAN, 4096);
        let b = pg(PgStatus::ACTIVE, 2048);

        stats.add_pg(1, &a);
        stats.add_pg(2, &b);
        assert_eq!(stats.num_pgs(), 2);
        assert_eq!(stats.pg_bytes(), 6144);
        assert_eq!(stats.pg_by_status().len(), 2);

        stats.sub_pg(1, &a);
        stats.sub_pg(2, &b);
        assert_eq!(stats, ClusterStats::new());
    }

    #[test]
    fn test_status_bucket_dropped_at_zero() {
        let mut stats = ClusterStats::new();
        let a = pg(PgStatus::DEGRADED, 0);

        stats.add_pg(1, &a);
        stats.add_pg(2, &a);
        assert_eq!(stats.pg_by_status()[&PgStatus::DEGRADED], 2);

        stats.sub_pg(1, &a);
        assert_eq!(stats.pg_by_status()[&PgStatus::DEGRADED], 1);

        stats.sub_pg(2, &a);
        assert!(!stats.pg_by_status().contains_key(&PgStatus::DEGRADED));
        assert!(stats.pg_by_status().is_empty());
    }

    #[test]
    fn test_creating_hooks() {
        let mut stats = ClusterStats::new();
        let creating = pg(PgStatus::CREATING, 0);
        let active = pg(PgStatus::ACTIVE, 0);

        stats.add_pg(9, &creating);
        assert!(stats.creating().contains(9));

        // A status transition is a sub of the old snapshot plus an add of
        // the new one.
        stats.sub_pg(9, &creating);
        stats.add_pg(9, &active);
        assert!(!stats.creating().contains(9));
        assert_eq!(stats.num_pgs(), 1);
    }

    #[test]
    fn test_device_totals() {
        let mut stats = ClusterStats::new();
        let d1 = DeviceUsage::new(1000, 200, 800).with_objects(5);
        let d2 = DeviceUsage::new(2000, 600, 1400).with_objects(7);

        stats.add_device(&d1);
        stats.add_device(&d2);
        assert_eq!(stats.num_devices(), 2);
        assert_eq!(stats.device_kb_total(), 3000);
        assert_eq!(stats.device_kb_used(), 800);
        assert_eq!(stats.device_kb_avail(), 2200);
        assert_eq!(stats.device_objects(), 12);

        stats.sub_device(&d1);
        assert_eq!(stats.device_kb_used(), 600);

        stats.sub_device(&d2);
        assert_eq!(stats, ClusterStats::new());
    }

    #[test]
    fn test_zero() {
        let mut stats = ClusterStats::new();
        stats.add_pg(1, &pg(PgStatus::CREATING, 100));
        stats.add_device(&DeviceUsage::new(10, 5, 5));

        stats.zero();
        assert_eq!(stats, ClusterStats::new());
        assert!(stats.creating().is_empty());
    }

    #[test]
    #[should_panic(expected = "never added")]
    fn test_sub_unknown_status_panics() {
        let mut stats = ClusterStats::new();
        stats.add_pg(1, &pg(PgStatus::ACTIVE, 0));
        stats.sub_pg(1, &pg(PgStatus::DOWN, 0));
    }
}
