//! Drive Status Collector
//!
//! Collects the status of every physical drive from the hardware inventory.
//!
//! # Metrics Produced
//! - `eseries_drive_status` - One-hot drive status (1 for the current status, 0 otherwise)
//!   - Labels: tray, slot, status
//! - `eseries_exporter_collect_error{collector="drives"}`
//! - `eseries_exporter_collector_duration_seconds{collector="drives"}`
//!
//! Drives are keyed by `(tray, slot)`. A drive whose key was already seen is skipped and
//! flags the collection as failed; the remaining drives are still reported.

use super::{CollectionContext, CollectionStatus, Collector};
use crate::error::{ExporterError, Result};
use crate::eseries::fetch_json;
use crate::eseries::types::HardwareInventory;
use crate::metrics::{gauge_vec, set_one_hot};
use prometheus::GaugeVec;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, error};

pub const NAME: &str = "drives";

/// Drive states reported by the proxy; `__UNDEFINED` is a real state, not a catch-all
pub const DRIVE_STATUSES: &[&str] = &[
    "optimal",
    "failed",
    "replaced",
    "bypassed",
    "unresponsive",
    "removed",
    "incompatible",
    "dataRelocation",
    "preFailCopy",
    "preFailCopyPending",
    "__UNDEFINED",
];

/// A drive resolved to its human tray id and slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveLocation {
    pub id: String,
    pub tray: String,
    pub slot: String,
    pub status: String,
}

/// Resolve every drive of `inventory` to `(tray, slot)`, dropping duplicates
///
/// Returns the unique locations in inventory order and one
/// [`ExporterError::DuplicateEntity`] per dropped drive. A drive whose tray reference
/// is not in the inventory gets an empty tray label.
pub fn locate_drives(inventory: &HardwareInventory) -> (Vec<DriveLocation>, Vec<ExporterError>) {
    let trays: HashMap<&str, i64> = inventory
        .trays
        .iter()
        .map(|t| (t.tray_ref.as_str(), t.tray_id))
        .collect();

    let mut seen = HashSet::new();
    let mut located = Vec::with_capacity(inventory.drives.len());
    let mut duplicates = Vec::new();

    for drive in &inventory.drives {
        let location = &drive.physical_location;
        let tray = trays
            .get(location.tray_ref.as_str())
            .map(|id| id.to_string())
            .unwrap_or_default();
        let slot = location.slot.to_string();

        if !seen.insert((tray.clone(), slot.clone())) {
            duplicates.push(ExporterError::DuplicateEntity { tray, slot });
            continue;
        }

        located.push(DriveLocation {
            id: drive.id.clone(),
            tray,
            slot,
            status: drive.status.clone(),
        });
    }

    (located, duplicates)
}

pub struct DrivesCollector {
    ctx: CollectionContext,
    status: GaugeVec,
}

impl DrivesCollector {
    pub fn new(ctx: CollectionContext) -> prometheus::Result<Self> {
        Ok(Self {
            ctx,
            status: gauge_vec("drive", "status", "Drive status", &["tray", "slot", "status"])?,
        })
    }

    pub fn build(ctx: &CollectionContext) -> prometheus::Result<Collector> {
        Ok(Collector::Drives(Self::new(ctx.clone())?))
    }

    pub fn metrics(&self) -> Vec<&GaugeVec> {
        vec![&self.status]
    }

    /// Collects drive status metrics
    ///
    /// Always emits the shared error and duration gauges; drive series are emitted for
    /// every uniquely located drive of a successfully decoded inventory.
    pub async fn collect(&self) -> CollectionStatus {
        debug!("Collecting drives metrics");
        let started = Instant::now();
        let mut failed = false;

        let inventory = match self.fetch().await {
            Ok(inventory) => inventory,
            Err(e) => {
                error!("Collection failed: {}", e);
                failed = true;
                HardwareInventory::default()
            }
        };

        let (drives, duplicates) = locate_drives(&inventory);
        for duplicate in &duplicates {
            error!("Duplicate drive entry detected, skipping: {}", duplicate);
            failed = true;
        }

        for drive in &drives {
            set_one_hot(
                &self.status,
                &[drive.tray.as_str(), drive.slot.as_str()],
                DRIVE_STATUSES,
                &drive.status,
            );
        }

        self.ctx.scrape.record(NAME, failed, started);
        if failed {
            CollectionStatus::Failed
        } else {
            CollectionStatus::Success
        }
    }

    async fn fetch(&self) -> Result<HardwareInventory> {
        let target = &self.ctx.target;
        let inventory: HardwareInventory =
            fetch_json(target, &target.system_path("/hardware-inventory")).await?;
        if inventory.drives.is_empty() {
            return Err(ExporterError::EmptyResult("no drives returned".to_string()));
        }
        Ok(inventory)
    }
}
