//! Storage System Status Collector
//!
//! # Metrics Produced
//! - `eseries_storage_system_status` - One-hot system status
//!   - Labels: status
//! - `eseries_exporter_collect_error{collector="storage-systems"}`
//! - `eseries_exporter_collector_duration_seconds{collector="storage-systems"}`

use super::{CollectionContext, CollectionStatus, Collector};
use crate::error::{ExporterError, Result};
use crate::eseries::fetch_json;
use crate::eseries::types::StorageSystem;
use crate::metrics::{gauge_vec, set_one_hot};
use prometheus::GaugeVec;
use std::time::Instant;
use tracing::{debug, error};

pub const NAME: &str = "storage-systems";

pub const STORAGE_SYSTEM_STATUSES: &[&str] = &[
    "neverContacted",
    "offline",
    "optimal",
    "needsAttn",
    "removed",
    "newDevice",
    "lockDown",
];

pub struct StorageSystemsCollector {
    ctx: CollectionContext,
    status: GaugeVec,
}

impl StorageSystemsCollector {
    pub fn new(ctx: CollectionContext) -> prometheus::Result<Self> {
        Ok(Self {
            ctx,
            status: gauge_vec(
                "storage_system",
                "status",
                "Storage System status, 1=optimal 0=all other states",
                &["status"],
            )?,
        })
    }

    pub fn build(ctx: &CollectionContext) -> prometheus::Result<Collector> {
        Ok(Collector::StorageSystems(Self::new(ctx.clone())?))
    }

    pub fn metrics(&self) -> Vec<&GaugeVec> {
        vec![&self.status]
    }

    pub async fn collect(&self) -> CollectionStatus {
        debug!("Collecting storage-systems metrics");
        let started = Instant::now();

        let status = match self.fetch().await {
            Ok(system) => {
                set_one_hot(&self.status, &[], STORAGE_SYSTEM_STATUSES, &system.status);
                CollectionStatus::Success
            }
            Err(e) => {
                error!("Collection failed: {}", e);
                CollectionStatus::Failed
            }
        };

        self.ctx
            .scrape
            .record(NAME, status == CollectionStatus::Failed, started);
        status
    }

    async fn fetch(&self) -> Result<StorageSystem> {
        let target = &self.ctx.target;
        let system: StorageSystem = fetch_json(target, &target.system_path("")).await?;
        if system.id.is_empty() {
            return Err(ExporterError::EmptyResult(
                "no storage system returned".to_string(),
            ));
        }
        Ok(system)
    }
}
