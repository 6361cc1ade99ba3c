//! Drive Statistics Collector
//!
//! Joins the analysed drive statistics with the hardware inventory; drives are labelled
//! by tray and slot exactly like the drive status collector.
//!
//! # Metrics Produced
//! - `eseries_drive_<statistic>` - one gauge per field of [`DRIVE_FIELDS`]
//!   - Labels: tray, slot
//! - `eseries_exporter_collect_error{collector="drive-statistics"}`
//! - `eseries_exporter_collector_duration_seconds{collector="drive-statistics"}`

use super::drives::locate_drives;
use super::statistics::{StatField, StatGauges};
use super::{CollectionContext, CollectionStatus, Collector};
use crate::error::{ExporterError, Result};
use crate::eseries::fetch_json;
use crate::eseries::types::{AnalysedDriveStatistics, HardwareInventory};
use prometheus::GaugeVec;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, error, warn};

pub const NAME: &str = "drive-statistics";

type Stat = StatField<AnalysedDriveStatistics>;

pub(crate) const DRIVE_FIELDS: &[Stat] = &[
    Stat {
        key: "averageReadOpSize",
        metric: "average_read_op_size_bytes",
        value: |s| s.average_read_op_size,
    },
    Stat {
        key: "averageWriteOpSize",
        metric: "average_write_op_size_bytes",
        value: |s| s.average_write_op_size,
    },
    Stat {
        key: "readIOps",
        metric: "read_iops",
        value: |s| s.read_iops,
    },
    Stat {
        key: "writeIOps",
        metric: "write_iops",
        value: |s| s.write_iops,
    },
    Stat {
        key: "otherIOps",
        metric: "other_iops",
        value: |s| s.other_iops,
    },
    Stat {
        key: "combinedIOps",
        metric: "combined_iops",
        value: |s| s.combined_iops,
    },
    Stat {
        key: "readThroughput",
        metric: "read_throughput_mb_per_second",
        value: |s| s.read_throughput,
    },
    Stat {
        key: "writeThroughput",
        metric: "write_throughput_mb_per_second",
        value: |s| s.write_throughput,
    },
    Stat {
        key: "combinedThroughput",
        metric: "combined_throughput_mb_per_second",
        value: |s| s.combined_throughput,
    },
    Stat {
        key: "readResponseTime",
        metric: "read_response_time_milliseconds",
        value: |s| s.read_response_time,
    },
    Stat {
        key: "writeResponseTime",
        metric: "write_response_time_milliseconds",
        value: |s| s.write_response_time,
    },
    Stat {
        key: "combinedResponseTime",
        metric: "combined_response_time_milliseconds",
        value: |s| s.combined_response_time,
    },
    Stat {
        key: "readResponseTimeStdDev",
        metric: "read_response_time_stddev_milliseconds",
        value: |s| s.read_response_time_std_dev,
    },
    Stat {
        key: "writeResponseTimeStdDev",
        metric: "write_response_time_stddev_milliseconds",
        value: |s| s.write_response_time_std_dev,
    },
    Stat {
        key: "combinedResponseTimeStdDev",
        metric: "combined_response_time_stddev_milliseconds",
        value: |s| s.combined_response_time_std_dev,
    },
    Stat {
        key: "readOps",
        metric: "read_ops",
        value: |s| s.read_ops,
    },
    Stat {
        key: "writeOps",
        metric: "write_ops",
        value: |s| s.write_ops,
    },
    Stat {
        key: "readPhysicalIOps",
        metric: "read_physical_iops",
        value: |s| s.read_physical_iops,
    },
    Stat {
        key: "writePhysicalIOps",
        metric: "write_physical_iops",
        value: |s| s.write_physical_iops,
    },
    Stat {
        key: "averageQueueDepth",
        metric: "average_queue_depth",
        value: |s| s.average_queue_depth,
    },
    Stat {
        key: "queueDepthMax",
        metric: "queue_depth_max",
        value: |s| s.queue_depth_max,
    },
    Stat {
        key: "queueDepthTotal",
        metric: "queue_depth_total",
        value: |s| s.queue_depth_total,
    },
    Stat {
        key: "randomIosPercent",
        metric: "random_ios_percent",
        value: |s| s.random_ios_percent,
    },
];

pub struct DriveStatisticsCollector {
    ctx: CollectionContext,
    stats: StatGauges<AnalysedDriveStatistics>,
}

impl DriveStatisticsCollector {
    pub fn new(ctx: CollectionContext) -> prometheus::Result<Self> {
        Ok(Self {
            ctx,
            stats: StatGauges::new("drive", "Drive", DRIVE_FIELDS, &["tray", "slot"])?,
        })
    }

    pub fn build(ctx: &CollectionContext) -> prometheus::Result<Collector> {
        Ok(Collector::DriveStatistics(Self::new(ctx.clone())?))
    }

    pub fn metrics(&self) -> Vec<&GaugeVec> {
        self.stats.metrics().collect()
    }

    pub async fn collect(&self) -> CollectionStatus {
        debug!("Collecting drive-statistics metrics");
        let started = Instant::now();
        let mut failed = false;

        match self.fetch().await {
            Ok((inventory, statistics)) => {
                let (drives, duplicates) = locate_drives(&inventory);
                for duplicate in &duplicates {
                    error!("Duplicate drive entry detected, skipping: {}", duplicate);
                    failed = true;
                }

                let by_id: HashMap<&str, (&str, &str)> = drives
                    .iter()
                    .map(|d| (d.id.as_str(), (d.tray.as_str(), d.slot.as_str())))
                    .collect();

                for stat in &statistics {
                    match by_id.get(stat.disk_id.as_str()) {
                        Some(&(tray, slot)) => self.stats.observe(stat, &[tray, slot]),
                        None => warn!("No inventory entry for drive {}, skipping", stat.disk_id),
                    }
                }
            }
            Err(e) => {
                error!("Collection failed: {}", e);
                failed = true;
            }
        }

        self.ctx.scrape.record(NAME, failed, started);
        if failed {
            CollectionStatus::Failed
        } else {
            CollectionStatus::Success
        }
    }

    async fn fetch(&self) -> Result<(HardwareInventory, Vec<AnalysedDriveStatistics>)> {
        let target = &self.ctx.target;
        let inventory: HardwareInventory =
            fetch_json(target, &target.system_path("/hardware-inventory")).await?;
        let statistics: Vec<AnalysedDriveStatistics> =
            fetch_json(target, &target.system_path("/analysed-drive-statistics")).await?;
        if statistics.is_empty() {
            return Err(ExporterError::EmptyResult(
                "no drive statistics returned".to_string(),
            ));
        }
        Ok((inventory, statistics))
    }
}
