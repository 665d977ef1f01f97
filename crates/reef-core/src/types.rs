// Copyright 2026 The Reef Authors
// SPDX-License-Identifier: Apache-2.0

//! Identifiers and statistics records for placement groups and devices.
//!
//! These records are produced by the device health and placement
//! collaborators and consumed by the coordinator's map engine. They are
//! value types: a reporter always ships a complete snapshot, and the map
//! replaces the stored record wholesale rather than mutating it in place.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Unique identifier for a placement group.
pub type PgId = u32;

/// Unique identifier for a storage device (OSD).
pub type DeviceId = i32;

/// A topology epoch from the placement layer.
///
/// Zero is reserved to mean "not supplied" in delta envelopes.
pub type Epoch = u32;

bitflags! {
    /// Status flags for a placement group.
    ///
    /// A group usually carries more than one flag (e.g. `ACTIVE | CLEAN`).
    /// Aggregation buckets group counts by the full flag combination, not
    /// by individual flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PgStatus: u32 {
        /// The group is still being instantiated on its devices.
        const CREATING = 1 << 0;
        /// The group is serving reads and writes.
        const ACTIVE = 1 << 1;
        /// All replicas are present and consistent.
        const CLEAN = 1 << 2;
        /// The group is unavailable.
        const DOWN = 1 << 3;
        /// One or more replicas are missing.
        const DEGRADED = 1 << 4;
        /// Replicas are negotiating authoritative state.
        const PEERING = 1 << 5;
        /// No recent report from the primary device.
        const STALE = 1 << 6;
        /// A consistency scrub is in progress.
        const SCRUBBING = 1 << 7;
        /// Scrub found mismatching replicas.
        const INCONSISTENT = 1 << 8;
        /// Replica repair is in progress.
        const REPAIR = 1 << 9;
    }
}

impl Default for PgStatus {
    fn default() -> Self {
        Self::empty()
    }
}

/// Statistics snapshot for a single placement group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgStats {
    /// Current status flags.
    pub status: PgStatus,
    /// Logical bytes stored in the group.
    pub num_bytes: u64,
    /// Logical kilobytes stored in the group.
    pub num_kb: u64,
    /// Number of objects stored in the group.
    pub num_objects: u64,
}

impl PgStats {
    /// Creates an empty snapshot with the given status.
    #[must_use]
    pub fn new(status: PgStatus) -> Self {
        Self { status, ..Self::default() }
    }

    /// Sets the usage totals.
    #[must_use]
    pub fn with_usage(mut self, num_bytes: u64, num_kb: u64, num_objects: u64) -> Self {
        self.num_bytes = num_bytes;
        self.num_kb = num_kb;
        self.num_objects = num_objects;
        self
    }

    /// Returns true if the group is still being created.
    #[must_use]
    pub fn is_creating(&self) -> bool {
        self.status.contains(PgStatus::CREATING)
    }
}

/// Capacity and usage snapshot for a single storage device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUsage {
    /// Raw capacity in kilobytes.
    pub kb_total: u64,
    /// Kilobytes in use.
    pub kb_used: u64,
    /// Kilobytes available.
    pub kb_avail: u64,
    /// Number of objects stored on the device.
    pub num_objects: u64,
}

impl DeviceUsage {
    /// Creates a snapshot from capacity figures.
    #[must_use]
    pub fn new(kb_total: u64, kb_used: u64, kb_avail: u64) -> Self {
        Self { kb_total, kb_used, kb_avail, num_objects: 0 }
    }

    /// Sets the object count.
    #[must_use]
    pub fn with_objects(mut self, num_objects: u64) -> Self {
        self.num_objects = num_objects;
        self
    }

    /// Fraction of capacity in use, in `[0, 1]`. Zero for an empty device.
    #[must_use]
    pub fn utilization(&self) -> f64 {
        if self.kb_total == 0 {
            return 0.0;
        }
        self.kb_used as f64 / self.kb_total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pg_stats_builder() {
        let stats = PgStats::new(PgStatus::ACTIVE | PgStatus::CLEAN).with_usage(4096, 4, 2);

        assert_eq!(stats.status, PgStatus::ACTIVE | PgStatus::CLEAN);
        assert_eq!(stats.num_bytes, 4096);
        assert_eq!(stats.num_kb, 4);
        assert_eq!(stats.num_objects, 2);
        assert!(!stats.is_creating());
    }

    #[test]
    fn test_creating_flag() {
        let stats = PgStats::new(PgStatus::CREATING);
        assert!(stats.is_creating());

        // Creating can coexist with other flags.
        let stats = PgStats::new(PgStatus::CREATING | PgStatus::DEGRADED);
        assert!(stats.is_creating());
    }

    #[test]
    fn test_status_default_is_empty() {
        assert_eq!(PgStatus::default(), PgStatus::empty());
        assert!(!PgStats::default().is_creating());
    }

    #[test]
    fn test_device_usage() {
        let usage = DeviceUsage::new(1000, 250, 750).with_objects(12);

        assert_eq!(usage.kb_total, 1000);
        assert_eq!(usage.kb_used, 250);
        assert_eq!(usage.kb_avail, 750);
        assert_eq!(usage.num_objects, 12);
        assert!((usage.utilization() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_device_utilization() {
        assert_eq!(DeviceUsage::default().utilization(), 0.0);
    }
}
