//! Controller Statistics Collector
//!
//! Joins the analysed controller statistics with the hardware inventory so every
//! controller is labelled with its shelf position ("A" / "B").
//!
//! # Metrics Produced
//! - `eseries_controller_<statistic>` - one gauge per field of [`CONTROLLER_FIELDS`]
//!   - Labels: controller, controller_label
//! - `eseries_exporter_collect_error{collector="controller-statistics"}`
//! - `eseries_exporter_collector_duration_seconds{collector="controller-statistics"}`

use super::statistics::{StatField, StatGauges};
use super::{CollectionContext, CollectionStatus, Collector};
use crate::error::{ExporterError, Result};
use crate::eseries::fetch_json;
use crate::eseries::types::{AnalysedControllerStatistics, HardwareInventory};
use prometheus::GaugeVec;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, error};

pub const NAME: &str = "controller-statistics";

type Stat = StatField<AnalysedControllerStatistics>;

pub(crate) const CONTROLLER_FIELDS: &[Stat] = &[
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
        key: "readHitResponseTime",
        metric: "read_hit_response_time_milliseconds",
        value: |s| s.read_hit_response_time,
    },
    Stat {
        key: "writeHitResponseTime",
        metric: "write_hit_response_time_milliseconds",
        value: |s| s.write_hit_response_time,
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
        key: "cacheHitBytesPercent",
        metric: "cache_hit_bytes_percent",
        value: |s| s.cache_hit_bytes_percent,
    },
    Stat {
        key: "randomIosPercent",
        metric: "random_ios_percent",
        value: |s| s.random_ios_percent,
    },
    Stat {
        key: "mirrorBytesPercent",
        metric: "mirror_bytes_percent",
        value: |s| s.mirror_bytes_percent,
    },
    Stat {
        key: "fullStripeWritesBytesPercent",
        metric: "full_stripe_writes_bytes_percent",
        value: |s| s.full_stripe_writes_bytes_percent,
    },
    Stat {
        key: "ddpBytesPercent",
        metric: "ddp_bytes_percent",
        value: |s| s.ddp_bytes_percent,
    },
    Stat {
        key: "maxCpuUtilization",
        metric: "max_cpu_utilization_percent",
        value: |s| s.max_cpu_utilization,
    },
    Stat {
        key: "cpuAvgUtilization",
        metric: "cpu_average_utilization_percent",
        value: |s| s.cpu_avg_utilization,
    },
    Stat {
        key: "maxPossibleBpsUnderCurrentLoad",
        metric: "max_possible_bytes_per_second",
        value: |s| s.max_possible_bps_under_current_load,
    },
    Stat {
        key: "maxPossibleIopsUnderCurrentLoad",
        metric: "max_possible_iops",
        value: |s| s.max_possible_iops_under_current_load,
    },
];

pub struct ControllerStatisticsCollector {
    ctx: CollectionContext,
    stats: StatGauges<AnalysedControllerStatistics>,
}

impl ControllerStatisticsCollector {
    pub fn new(ctx: CollectionContext) -> prometheus::Result<Self> {
        Ok(Self {
            ctx,
            stats: StatGauges::new(
                "controller",
                "Controller",
                CONTROLLER_FIELDS,
                &["controller", "controller_label"],
            )?,
        })
    }

    pub fn build(ctx: &CollectionContext) -> prometheus::Result<Collector> {
        Ok(Collector::ControllerStatistics(Self::new(ctx.clone())?))
    }

    pub fn metrics(&self) -> Vec<&GaugeVec> {
        self.stats.metrics().collect()
    }

    pub async fn collect(&self) -> CollectionStatus {
        debug!("Collecting controller-statistics metrics");
        let started = Instant::now();

        let status = match self.fetch().await {
            Ok((inventory, statistics)) => {
                let labels: HashMap<&str, &str> = inventory
                    .controllers
                    .iter()
                    .flat_map(|c| {
                        let label = c.physical_location.label.as_str();
                        [(c.id.as_str(), label), (c.controller_ref.as_str(), label)]
                    })
                    .filter(|(id, _)| !id.is_empty())
                    .collect();

                for stat in &statistics {
                    let label = labels
                        .get(stat.controller_id.as_str())
                        .copied()
                        .unwrap_or_default();
                    self.stats
                        .observe(stat, &[stat.controller_id.as_str(), label]);
                }
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

    async fn fetch(&self) -> Result<(HardwareInventory, Vec<AnalysedControllerStatistics>)> {
        let target = &self.ctx.target;
        let inventory: HardwareInventory =
            fetch_json(target, &target.system_path("/hardware-inventory")).await?;
        let statistics: Vec<AnalysedControllerStatistics> = fetch_json(
            target,
            &target.system_path("/analysed-controller-statistics"),
        )
        .await?;
        if statistics.is_empty() {
            return Err(ExporterError::EmptyResult(
                "no controller statistics returned".to_string(),
            ));
        }
        Ok((inventory, statistics))
    }
}
