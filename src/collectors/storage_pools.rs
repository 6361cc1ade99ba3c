//! Storage Pool Metrics Collector
//!
//! Collects capacity, utilization and health of disk pools and volume groups.
//!
//! # Metrics Produced
//! - `eseries_pool_capacity_bytes` - Total capacity of the storage pool
//!   - Labels: pool, raid_level, status, type (disk_pool or volume_group)
//! - `eseries_pool_used_bytes` / `eseries_pool_free_bytes`
//!   - Labels: pool, raid_level, status
//! - `eseries_pool_utilization_ratio` - used / total, 0 for an empty pool
//!   - Labels: pool, raid_level
//! - `eseries_pool_status` - 1 if the RAID status is optimal
//!   - Labels: pool, raid_level, status
//! - `eseries_pool_state` - 1 if the pool state is complete
//!   - Labels: pool, raid_level, state
//! - `eseries_pool_offline` - 1 if the pool is offline
//!   - Labels: pool, raid_level
//!
//! This collector does not emit the shared error and duration gauges. A failed fetch
//! is logged and the scrape carries no pool series at all.

use super::{CollectionContext, CollectionStatus, Collector};
use crate::error::Result;
use crate::eseries::fetch_json;
use crate::eseries::types::StoragePool;
use crate::metrics::{bool_value, gauge_vec, parse_capacity, utilization_ratio};
use prometheus::GaugeVec;
use tracing::{debug, error};

pub const NAME: &str = "storage-pools";

pub struct StoragePoolsCollector {
    ctx: CollectionContext,
    capacity_bytes: GaugeVec,
    used_bytes: GaugeVec,
    free_bytes: GaugeVec,
    utilization_ratio: GaugeVec,
    status: GaugeVec,
    state: GaugeVec,
    offline: GaugeVec,
}

impl StoragePoolsCollector {
    pub fn new(ctx: CollectionContext) -> prometheus::Result<Self> {
        Ok(Self {
            ctx,
            capacity_bytes: gauge_vec(
                "pool",
                "capacity_bytes",
                "Total capacity of the storage pool in bytes",
                &["pool", "raid_level", "status", "type"],
            )?,
            used_bytes: gauge_vec(
                "pool",
                "used_bytes",
                "Used capacity of the storage pool in bytes",
                &["pool", "raid_level", "status"],
            )?,
            free_bytes: gauge_vec(
                "pool",
                "free_bytes",
                "Free capacity of the storage pool in bytes",
                &["pool", "raid_level", "status"],
            )?,
            utilization_ratio: gauge_vec(
                "pool",
                "utilization_ratio",
                "Utilization ratio of the storage pool (0-1)",
                &["pool", "raid_level"],
            )?,
            status: gauge_vec(
                "pool",
                "status",
                "Status of the storage pool (1 for optimal, 0 otherwise)",
                &["pool", "raid_level", "status"],
            )?,
            state: gauge_vec(
                "pool",
                "state",
                "Current state of the pool (1 for complete, 0 otherwise)",
                &["pool", "raid_level", "state"],
            )?,
            offline: gauge_vec(
                "pool",
                "offline",
                "Whether the pool is offline (1) or online (0)",
                &["pool", "raid_level"],
            )?,
        })
    }

    pub fn build(ctx: &CollectionContext) -> prometheus::Result<Collector> {
        Ok(Collector::StoragePools(Self::new(ctx.clone())?))
    }

    pub fn metrics(&self) -> Vec<&GaugeVec> {
        vec![
            &self.capacity_bytes,
            &self.used_bytes,
            &self.free_bytes,
            &self.utilization_ratio,
            &self.status,
            &self.state,
            &self.offline,
        ]
    }

    pub async fn collect(&self) -> CollectionStatus {
        let pools = match self.fetch().await {
            Ok(pools) => pools,
            Err(e) => {
                error!("Collection failed: {}", e);
                return CollectionStatus::Failed;
            }
        };

        for pool in &pools {
            self.observe(pool);
        }

        debug!("Updated metrics for {} storage pools", pools.len());
        CollectionStatus::Success
    }

    fn observe(&self, pool: &StoragePool) {
        let pool_type = if pool.disk_pool {
            "disk_pool"
        } else {
            "volume_group"
        };

        let total = parse_capacity(&pool.total_raided_space);
        let used = parse_capacity(&pool.used_space);
        let free = parse_capacity(&pool.free_space);

        let name = pool.label.as_str();
        let raid_level = pool.raid_level.as_str();
        let raid_status = pool.raid_status.as_str();

        self.capacity_bytes
            .with_label_values(&[name, raid_level, raid_status, pool_type])
            .set(total);
        self.used_bytes
            .with_label_values(&[name, raid_level, raid_status])
            .set(used);
        self.free_bytes
            .with_label_values(&[name, raid_level, raid_status])
            .set(free);
        self.utilization_ratio
            .with_label_values(&[name, raid_level])
            .set(utilization_ratio(used, total));
        self.status
            .with_label_values(&[name, raid_level, raid_status])
            .set(bool_value(raid_status == "optimal"));
        self.state
            .with_label_values(&[name, raid_level, pool.state.as_str()])
            .set(bool_value(pool.state == "complete"));
        self.offline
            .with_label_values(&[name, raid_level])
            .set(bool_value(pool.offline));
    }

    async fn fetch(&self) -> Result<Vec<StoragePool>> {
        let target = &self.ctx.target;
        fetch_json(target, &target.system_path("/storage-pools")).await
    }
}
