// Copyright 2026 The Reef Authors
// SPDX-License-Identifier: Apache-2.0

//! Core types for Reef cluster-coordinator components.
//!
//! This crate provides the identifiers and per-entity statistics records
//! shared between the coordinator's map engine and the collaborators that
//! produce them (device health reporting, placement):
//! - Placement-group and device identifiers
//! - Placement-group status flags
//! - Per-group and per-device statistics snapshots

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod types;

pub use types::{DeviceId, DeviceUsage, Epoch, PgId, PgStats, PgStatus};
