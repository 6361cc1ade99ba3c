//! Volume Metrics Collector
//!
//! # Metrics Produced
//! - `eseries_volume_capacity_bytes` - Total capacity of the volume
//!   - Labels: volume, pool, status, raid_level, type (volume use)
//! - `eseries_volume_status` - 1 if the volume status is optimal
//!   - Labels: volume, pool, status
//! - `eseries_volume_mapped` - 1 if the volume is mapped to a host
//! - `eseries_volume_mappings_total` - Number of host mappings
//! - `eseries_volume_thin_provisioned` - 1 for thin volumes
//! - `eseries_volume_offline` - 1 if the volume is offline
//!   - Labels (last four): volume, pool
//!
//! Like the storage pool collector, a failed fetch emits nothing, including the shared
//! error and duration gauges.

use super::{CollectionContext, CollectionStatus, Collector};
use crate::error::Result;
use crate::eseries::fetch_json;
use crate::eseries::types::Volume;
use crate::metrics::{bool_value, gauge_vec, parse_capacity, UNKNOWN};
use prometheus::GaugeVec;
use tracing::{debug, error};

pub const NAME: &str = "volumes";

pub struct VolumesCollector {
    ctx: CollectionContext,
    capacity_bytes: GaugeVec,
    status: GaugeVec,
    mapped: GaugeVec,
    mappings_total: GaugeVec,
    thin_provisioned: GaugeVec,
    offline: GaugeVec,
}

/// Pool label for a volume: its volume group reference, or `unknown`
fn pool_label(volume_group_ref: &str) -> &str {
    if volume_group_ref.is_empty() {
        UNKNOWN
    } else {
        volume_group_ref
    }
}

impl VolumesCollector {
    pub fn new(ctx: CollectionContext) -> prometheus::Result<Self> {
        Ok(Self {
            ctx,
            capacity_bytes: gauge_vec(
                "volume",
                "capacity_bytes",
                "Total capacity of the volume in bytes",
                &["volume", "pool", "status", "raid_level", "type"],
            )?,
            status: gauge_vec(
                "volume",
                "status",
                "Status of the volume (1 for optimal, 0 otherwise)",
                &["volume", "pool", "status"],
            )?,
            mapped: gauge_vec(
                "volume",
                "mapped",
                "Whether the volume is mapped to a host (1) or not (0)",
                &["volume", "pool"],
            )?,
            mappings_total: gauge_vec(
                "volume",
                "mappings_total",
                "Number of host mappings for this volume",
                &["volume", "pool"],
            )?,
            thin_provisioned: gauge_vec(
                "volume",
                "thin_provisioned",
                "Whether the volume uses thin provisioning (1) or not (0)",
                &["volume", "pool"],
            )?,
            offline: gauge_vec(
                "volume",
                "offline",
                "Whether the volume is offline (1) or online (0)",
                &["volume", "pool"],
            )?,
        })
    }

    pub fn build(ctx: &CollectionContext) -> prometheus::Result<Collector> {
        Ok(Collector::Volumes(Self::new(ctx.clone())?))
    }

    pub fn metrics(&self) -> Vec<&GaugeVec> {
        vec![
            &self.capacity_bytes,
            &self.status,
            &self.mapped,
            &self.mappings_total,
            &self.thin_provisioned,
            &self.offline,
        ]
    }

    pub async fn collect(&self) -> CollectionStatus {
        let volumes = match self.fetch().await {
            Ok(volumes) => volumes,
            Err(e) => {
                error!("Collection failed: {}", e);
                return CollectionStatus::Failed;
            }
        };

        for volume in &volumes {
            self.observe(volume);
        }

        debug!("Updated metrics for {} volumes", volumes.len());
        CollectionStatus::Success
    }

    fn observe(&self, volume: &Volume) {
        let name = volume.label.as_str();
        let pool = pool_label(&volume.volume_group_ref);
        let status = volume.status.as_str();

        self.capacity_bytes
            .with_label_values(&[
                name,
                pool,
                status,
                volume.raid_level.as_str(),
                volume.volume_use.as_str(),
            ])
            .set(parse_capacity(&volume.total_size_in_bytes));
        self.status
            .with_label_values(&[name, pool, status])
            .set(bool_value(status == "optimal"));
        self.mapped
            .with_label_values(&[name, pool])
            .set(bool_value(volume.mapped));
        self.mappings_total
            .with_label_values(&[name, pool])
            .set(volume.list_of_mappings.len() as f64);
        self.thin_provisioned
            .with_label_values(&[name, pool])
            .set(bool_value(volume.thin_provisioned));
        self.offline
            .with_label_values(&[name, pool])
            .set(bool_value(volume.offline));
    }

    async fn fetch(&self) -> Result<Vec<Volume>> {
        let target = &self.ctx.target;
        fetch_json(target, &target.system_path("/volumes")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_label_falls_back_to_unknown() {
        assert_eq!(pool_label(""), "unknown");
        assert_eq!(pool_label("0400"), "0400");
    }
}
