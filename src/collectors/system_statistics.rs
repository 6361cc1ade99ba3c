//! System Statistics Collector
//!
//! # Metrics Produced
//! - `eseries_system_<statistic>` - one unlabelled gauge per field of [`SYSTEM_FIELDS`]
//! - `eseries_exporter_collect_error{collector="system-statistics"}`
//! - `eseries_exporter_collector_duration_seconds{collector="system-statistics"}`

use super::statistics::{StatField, StatGauges};
use super::{CollectionContext, CollectionStatus, Collector};
use crate::error::{ExporterError, Result};
use crate::eseries::fetch_json;
use crate::eseries::types::AnalysedSystemStatistics;
use prometheus::GaugeVec;
use std::time::Instant;
use tracing::{debug, error};

pub const NAME: &str = "system-statistics";

type Stat = StatField<AnalysedSystemStatistics>;

pub(crate) const SYSTEM_FIELDS: &[Stat] = &[
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
        key: "cacheHitBytesPercent",
        metric: "cache_hit_bytes_percent",
        value: |s| s.cache_hit_bytes_percent,
    },
];

pub struct SystemStatisticsCollector {
    ctx: CollectionContext,
    stats: StatGauges<AnalysedSystemStatistics>,
}

impl SystemStatisticsCollector {
    pub fn new(ctx: CollectionContext) -> prometheus::Result<Self> {
        Ok(Self {
            ctx,
            stats: StatGauges::new("system", "System", SYSTEM_FIELDS, &[])?,
        })
    }

    pub fn build(ctx: &CollectionContext) -> prometheus::Result<Collector> {
        Ok(Collector::SystemStatistics(Self::new(ctx.clone())?))
    }

    pub fn metrics(&self) -> Vec<&GaugeVec> {
        self.stats.metrics().collect()
    }

    pub async fn collect(&self) -> CollectionStatus {
        debug!("Collecting system-statistics metrics");
        let started = Instant::now();

        let status = match self.fetch().await {
            Ok(statistics) => {
                self.stats.observe(&statistics, &[]);
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

    async fn fetch(&self) -> Result<AnalysedSystemStatistics> {
        let target = &self.ctx.target;
        let statistics: AnalysedSystemStatistics =
            fetch_json(target, &target.system_path("/analysed-system-statistics")).await?;
        if statistics.storage_system_id.is_empty() {
            return Err(ExporterError::EmptyResult(
                "no system statistics returned".to_string(),
            ));
        }
        Ok(statistics)
    }
}
