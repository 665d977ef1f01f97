//! The authoritative placement-group and device map.

use std::collections::{HashMap, HashSet};

use metrics::counter;
use reef_core::{DeviceId, DeviceUsage, Epoch, PgId, PgStats};
use tracing::debug;

use crate::creating::CreatingSet;
use crate::delta::PgMapDelta;
use crate::error::{PgMapError, Result};
use crate::stats::ClusterStats;

/// The authoritative in-memory record of placement-group and device state.
///
/// A single logical writer applies committed deltas in strict version
/// order; the map holds no internal locks. Readers must be serialized
/// against [`PgMap::apply`] by the surrounding component, e.g. by taking a
/// write lock for the whole apply or by publishing a snapshot afterwards.
///
/// The tables are private: every mutation funnels through the
/// [`ClusterStats`] add/sub pairs, which is what keeps the aggregates and
/// the creating set exactly consistent with the tables at all times.
#[derive(Debug, Clone, Default)]
pub struct PgMap {
    version: u64,
    topology_epoch: Epoch,
    scan_epoch: Epoch,
    pg_table: HashMap<PgId, PgStats>,
    pg_ids: HashSet<PgId>,
    device_table: HashMap<DeviceId, DeviceUsage>,
    stats: ClusterStats,
}

impl PgMap {
    /// Creates an empty map at version zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a map from decoded authoritative tables.
    ///
    /// Derived state is replayed from the tables, never decoded.
    pub(crate) fn from_tables(
        version: u64,
        pg_table: HashMap<PgId, PgStats>,
        device_table: HashMap<DeviceId, DeviceUsage>,
        topology_epoch: Epoch,
        scan_epoch: Epoch,
    ) -> Self {
        let mut map = Self {
            version,
            topology_epoch,
            scan_epoch,
            pg_table,
            pg_ids: HashSet::new(),
            device_table,
            stats: ClusterStats::new(),
        };
        map.rebuild_derived();
        map
    }

    /// Zeroes the aggregates and replays every stored record through the
    /// stats engine, restoring the membership index alongside.
    fn rebuild_derived(&mut self) {
        self.stats.zero();
        self.pg_ids.clear();
        for (&id, stats) in &self.pg_table {
            self.pg_ids.insert(id);
            self.stats.add_pg(id, stats);
        }
        for usage in self.device_table.values() {
            self.stats.add_device(usage);
        }
    }

    /// Applies a committed delta.
    ///
    /// Fails with [`PgMapError::VersionMismatch`] if the delta does not
    /// target the next version; nothing is touched on that path, so a
    /// rejected delta never leaves partial state behind. The caller must
    /// re-sequence and retry; this map does not.
    pub fn apply(&mut self, delta: &PgMapDelta) -> Result<()> {
        let expected = self.version + 1;
        if delta.version != expected {
            return Err(PgMapError::VersionMismatch { expected, got: delta.version });
        }

        for (&id, stats) in &delta.pg_updates {
            if let Some(old) = self.pg_table.get(&id) {
                self.stats.sub_pg(id, old);
            } else {
                self.pg_ids.insert(id);
            }
            self.pg_table.insert(id, *stats);
            self.stats.add_pg(id, stats);
        }

        for (&id, usage) in &delta.device_updates {
            if let Some(old) = self.device_table.get(&id) {
                self.stats.sub_device(old);
            }
            self.device_table.insert(id, *usage);
            self.stats.add_device(usage);
        }

        for &id in &delta.device_removals {
            // Removing an absent device is a no-op.
            if let Some(old) = self.device_table.remove(&id) {
                self.stats.sub_device(&old);
            }
        }

        if delta.topology_epoch != 0 {
            self.topology_epoch = delta.topology_epoch;
        }
        if delta.scan_epoch != 0 {
            self.scan_epoch = delta.scan_epoch;
        }

        self.version = delta.version;

        counter!("reef_pgmap_deltas_applied").increment(1);
        debug!(
            version = self.version,
            pgs = delta.pg_updates.len(),
            devices = delta.device_updates.len(),
            removed = delta.device_removals.len(),
            "Applied map delta"
        );

        Ok(())
    }

    /// Current map version.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Last topology epoch applied to the map.
    #[must_use]
    pub fn topology_epoch(&self) -> Epoch {
        self.topology_epoch
    }

    /// Epoch of the last placement scan.
    #[must_use]
    pub fn scan_epoch(&self) -> Epoch {
        self.scan_epoch
    }

    /// Current snapshot for a placement group.
    #[must_use]
    pub fn pg(&self, id: PgId) -> Option<&PgStats> {
        self.pg_table.get(&id)
    }

    /// Current snapshot for a device.
    #[must_use]
    pub fn device(&self, id: DeviceId) -> Option<&DeviceUsage> {
        self.device_table.get(&id)
    }

    /// Returns true if the group is tracked.
    #[must_use]
    pub fn contains_pg(&self, id: PgId) -> bool {
        self.pg_ids.contains(&id)
    }

    /// All placement-group snapshots.
    #[must_use]
    pub fn pgs(&self) -> &HashMap<PgId, PgStats> {
        &self.pg_table
    }

    /// Ids of every tracked placement group.
    #[must_use]
    pub fn pg_ids(&self) -> &HashSet<PgId> {
        &self.pg_ids
    }

    /// All device snapshots.
    #[must_use]
    pub fn devices(&self) -> &HashMap<DeviceId, DeviceUsage> {
        &self.device_table
    }

    /// Number of placement groups tracked.
    #[must_use]
    pub fn pg_count(&self) -> usize {
        self.pg_table.len()
    }

    /// Number of devices tracked.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.device_table.len()
    }

    /// The aggregate totals for the current tables.
    #[must_use]
    pub fn stats(&self) -> &ClusterStats {
        &self.stats
    }

    /// The groups currently carrying the `CREATING` flag.
    #[must_use]
    pub fn creating(&self) -> &CreatingSet {
        self.stats.creating()
    }

    /// Total raw capacity across devices, in kilobytes.
    #[must_use]
    pub fn total_kb(&self) -> u64 {
        self.stats.device_kb_total()
    }

    /// Total used kilobytes across devices.
    #[must_use]
    pub fn total_used_kb(&self) -> u64 {
        self.stats.device_kb_used()
    }

    /// Total available kilobytes across devices.
    #[must_use]
    pub fn total_avail_kb(&self) -> u64 {
        self.stats.device_kb_avail()
    }
}
