//! Map-level metrics publication.
//!
//! Gauges are republished from the aggregate snapshot rather than tracked
//! independently, so the exported values cannot drift from the map.

use metrics::{describe_counter, describe_gauge, gauge};

use crate::map::PgMap;

/// Initialize map metric descriptions (call once at startup).
pub fn init_map_metrics() {
    describe_counter!("reef_pgmap_deltas_applied", "Deltas applied to the map");
    describe_gauge!("reef_pgmap_version", "Current map version");
    describe_gauge!("reef_pgmap_pgs_total", "Placement groups tracked");
    describe_gauge!("reef_pgmap_pgs_creating", "Placement groups still creating");
    describe_gauge!("reef_pgmap_devices_total", "Devices tracked");
    describe_gauge!("reef_pgmap_device_kb_total", "Raw device capacity in kilobytes");
    describe_gauge!("reef_pgmap_device_kb_used", "Kilobytes used across devices");
    describe_gauge!("reef_pgmap_device_kb_avail", "Kilobytes available across devices");
}

/// Publish the current aggregate snapshot as gauges.
///
/// The engine is synchronous, so the coordinator calls this after applying
/// a delta (or on its own reporting interval) rather than from a background
/// task.
pub fn publish_map_metrics(map: &PgMap) {
    let stats = map.stats();
    gauge!("reef_pgmap_version").set(map.version() as f64);
    gauge!("reef_pgmap_pgs_total").set(stats.num_pgs() as f64);
    gauge!("reef_pgmap_pgs_creating").set(map.creating().len() as f64);
    gauge!("reef_pgmap_devices_total").set(stats.num_devices() as f64);
    gauge!("reef_pgmap_device_kb_total").set(stats.device_kb_total() as f64);
    gauge!("reef_pgmap_device_kb_used").set(stats.device_kb_used() as f64);
    gauge!("reef_pgmap_device_kb_avail").set(stats.device_kb_avail() as f64);
}
