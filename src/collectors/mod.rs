//! Metrics Collectors
//!
//! This module contains the collector registry, the per-scrape orchestrator and one
//! collector per E-Series entity. Each collector queries one or more Web Services Proxy
//! resources and sets the corresponding Prometheus gauges.
//!
//! # Architecture
//!
//! - [`COLLECTORS`] is the static table of `(name, default_enabled, factory)` entries
//! - [`resolve_enabled`] picks the entries a target asked for (or the defaults)
//! - [`EseriesCollector`] builds a fresh registry and collector set for one scrape,
//!   runs the collectors one after the other and renders the result
//!
//! Collectors follow a consistent contract:
//! - `metrics()` declares the gauge vectors they own (registered before collection)
//! - `collect()` fetches, decodes and sets values, returning a [`CollectionStatus`]
//!
//! # Error Handling
//!
//! Collector failures never leave the collector. Status collectors (drives, storage
//! systems, statistics) report them through `eseries_exporter_collect_error`; the
//! storage pool and volume collectors log and emit nothing.

use crate::eseries::Target;
use crate::error::Result;
use crate::metrics::{self, ScrapeMetrics};
use prometheus::core::{Collector as _, Desc};
use prometheus::{GaugeVec, Registry};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info_span, Instrument};

// Collector modules
pub mod controller_statistics;
pub mod drive_statistics;
pub mod drives;
mod statistics;
pub mod storage_pools;
pub mod storage_systems;
pub mod system_statistics;
pub mod volumes;

pub use controller_statistics::ControllerStatisticsCollector;
pub use drive_statistics::DriveStatisticsCollector;
pub use drives::DrivesCollector;
pub use storage_pools::StoragePoolsCollector;
pub use storage_systems::StorageSystemsCollector;
pub use system_statistics::SystemStatisticsCollector;
pub use volumes::VolumesCollector;

/// Shared context handed to every collector of one scrape
///
/// Cloning is cheap: the target sits behind an `Arc` and the gauges are handles.
#[derive(Clone)]
pub struct CollectionContext {
    /// Backend this scrape talks to
    pub target: Arc<Target>,
    /// Error and duration gauges shared by all collectors of the scrape
    pub scrape: ScrapeMetrics,
}

/// Status of a metrics collection operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Metrics were successfully collected and updated
    Success,
    /// Collection failed but is non-fatal (already logged)
    Failed,
}

/// Constructor stored in the registry table
pub type Factory = fn(&CollectionContext) -> prometheus::Result<Collector>;

/// One row of the collector registry
pub struct CollectorEntry {
    pub name: &'static str,
    pub default_enabled: bool,
    pub factory: Factory,
}

/// Every collector the exporter knows about
pub static COLLECTORS: &[CollectorEntry] = &[
    CollectorEntry {
        name: drives::NAME,
        default_enabled: true,
        factory: DrivesCollector::build,
    },
    CollectorEntry {
        name: storage_systems::NAME,
        default_enabled: true,
        factory: StorageSystemsCollector::build,
    },
    CollectorEntry {
        name: controller_statistics::NAME,
        default_enabled: true,
        factory: ControllerStatisticsCollector::build,
    },
    CollectorEntry {
        name: drive_statistics::NAME,
        default_enabled: true,
        factory: DriveStatisticsCollector::build,
    },
    CollectorEntry {
        name: system_statistics::NAME,
        default_enabled: true,
        factory: SystemStatisticsCollector::build,
    },
    CollectorEntry {
        name: storage_pools::NAME,
        default_enabled: false,
        factory: StoragePoolsCollector::build,
    },
    CollectorEntry {
        name: volumes::NAME,
        default_enabled: false,
        factory: VolumesCollector::build,
    },
];

/// Select the registry entries to run for a target
///
/// With no requested names (absent or empty) every default-enabled entry is selected.
/// Otherwise an entry is selected iff its name matches a requested name ignoring ASCII
/// case, whatever its default flag. Unknown requested names are ignored. When the table
/// holds the same name twice the later entry wins.
pub fn resolve_enabled<'a>(
    entries: &'a [CollectorEntry],
    requested: Option<&[String]>,
) -> BTreeMap<&'static str, &'a CollectorEntry> {
    let requested = requested.filter(|names| !names.is_empty());

    let mut table: BTreeMap<&'static str, &'a CollectorEntry> = BTreeMap::new();
    for entry in entries {
        table.insert(entry.name, entry);
    }

    table.retain(|name, entry| match requested {
        None => entry.default_enabled,
        Some(names) => names.iter().any(|n| n.eq_ignore_ascii_case(name)),
    });
    table
}

/// A collector instance, one variant per E-Series entity
pub enum Collector {
    Drives(DrivesCollector),
    StorageSystems(StorageSystemsCollector),
    StoragePools(StoragePoolsCollector),
    Volumes(VolumesCollector),
    ControllerStatistics(ControllerStatisticsCollector),
    DriveStatistics(DriveStatisticsCollector),
    SystemStatistics(SystemStatisticsCollector),
}

impl Collector {
    pub fn name(&self) -> &'static str {
        match self {
            Collector::Drives(_) => drives::NAME,
            Collector::StorageSystems(_) => storage_systems::NAME,
            Collector::StoragePools(_) => storage_pools::NAME,
            Collector::Volumes(_) => volumes::NAME,
            Collector::ControllerStatistics(_) => controller_statistics::NAME,
            Collector::DriveStatistics(_) => drive_statistics::NAME,
            Collector::SystemStatistics(_) => system_statistics::NAME,
        }
    }

    /// Gauge vectors owned by this collector
    pub fn metrics(&self) -> Vec<&GaugeVec> {
        match self {
            Collector::Drives(c) => c.metrics(),
            Collector::StorageSystems(c) => c.metrics(),
            Collector::StoragePools(c) => c.metrics(),
            Collector::Volumes(c) => c.metrics(),
            Collector::ControllerStatistics(c) => c.metrics(),
            Collector::DriveStatistics(c) => c.metrics(),
            Collector::SystemStatistics(c) => c.metrics(),
        }
    }

    /// Metric descriptors this collector may emit
    pub fn describe(&self) -> Vec<&Desc> {
        self.metrics().into_iter().flat_map(|m| m.desc()).collect()
    }

    pub async fn collect(&self) -> CollectionStatus {
        match self {
            Collector::Drives(c) => c.collect().await,
            Collector::StorageSystems(c) => c.collect().await,
            Collector::StoragePools(c) => c.collect().await,
            Collector::Volumes(c) => c.collect().await,
            Collector::ControllerStatistics(c) => c.collect().await,
            Collector::DriveStatistics(c) => c.collect().await,
            Collector::SystemStatistics(c) => c.collect().await,
        }
    }

    fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        for metric in self.metrics() {
            registry.register(Box::new(metric.clone()))?;
        }
        Ok(())
    }
}

/// Collector set and registry for a single scrape request
///
/// Nothing here outlives the request: the registry, the shared gauges and every
/// collector are created in [`EseriesCollector::new`] and dropped with it.
pub struct EseriesCollector {
    target: Arc<Target>,
    registry: Registry,
    collectors: BTreeMap<&'static str, Collector>,
}

impl EseriesCollector {
    pub fn new(target: Target) -> Result<Self> {
        Self::with_entries(target, COLLECTORS)
    }

    /// Build the collector set from an explicit registry table
    pub fn with_entries(target: Target, entries: &[CollectorEntry]) -> Result<Self> {
        let target = Arc::new(target);
        let registry = Registry::new();
        let scrape = ScrapeMetrics::new()?;
        scrape.register(&registry)?;

        let ctx = CollectionContext {
            target: target.clone(),
            scrape,
        };

        let mut collectors = BTreeMap::new();
        for (name, entry) in resolve_enabled(entries, target.collectors.as_deref()) {
            let collector = match (entry.factory)(&ctx) {
                Ok(collector) => collector,
                Err(e) => {
                    error!("Failed to create collector {}: {}", name, e);
                    continue;
                }
            };
            if let Err(e) = collector.register(&registry) {
                error!("Collector registration failed for {}: {}", name, e);
                continue;
            }
            collectors.insert(name, collector);
        }

        debug!(
            "Enabled collectors for {}: {:?}",
            target.name,
            collectors.keys().collect::<Vec<_>>()
        );

        Ok(Self {
            target,
            registry,
            collectors,
        })
    }

    /// Names of the collectors that will run, in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.collectors.keys().copied().collect()
    }

    pub fn collectors(&self) -> impl Iterator<Item = &Collector> {
        self.collectors.values()
    }

    /// Run every collector once, sequentially
    ///
    /// Returns the number of collectors that reported [`CollectionStatus::Failed`].
    pub async fn collect(&self) -> usize {
        let mut failures = 0;
        for (name, collector) in &self.collectors {
            let span = info_span!("collector", collector = *name, target = %self.target.name);
            if collector.collect().instrument(span).await == CollectionStatus::Failed {
                failures += 1;
            }
        }
        failures
    }

    /// Render whatever the collectors have set so far
    pub fn render(&self) -> anyhow::Result<String> {
        metrics::render(&self.registry)
    }

    /// Collect and render in one go
    pub async fn scrape(&self) -> anyhow::Result<String> {
        let failures = self.collect().await;
        if failures > 0 {
            debug!(
                "{} of {} collectors failed for {}",
                failures,
                self.collectors.len(),
                self.target.name
            );
        }
        self.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(selected: &BTreeMap<&'static str, &CollectorEntry>) -> Vec<&'static str> {
        selected.keys().copied().collect()
    }

    fn requested(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_defaults_when_nothing_requested() {
        let selected = resolve_enabled(COLLECTORS, None);
        assert_eq!(
            names(&selected),
            vec![
                "controller-statistics",
                "drive-statistics",
                "drives",
                "storage-systems",
                "system-statistics"
            ]
        );
    }

    #[test]
    fn test_empty_list_means_defaults() {
        let empty: Vec<String> = Vec::new();
        let selected = resolve_enabled(COLLECTORS, Some(empty.as_slice()));
        assert_eq!(selected.len(), 5);
        assert!(!selected.contains_key("volumes"));
    }

    #[test]
    fn test_explicit_request_enables_default_off_collector() {
        let list = requested(&["Volumes", "DRIVES", "no-such-collector"]);
        let selected = resolve_enabled(COLLECTORS, Some(list.as_slice()));
        assert_eq!(names(&selected), vec!["drives", "volumes"]);
    }

    #[test]
    fn test_defaults_independent_of_table_order() {
        let reversed: Vec<CollectorEntry> = COLLECTORS
            .iter()
            .rev()
            .map(|e| CollectorEntry {
                name: e.name,
                default_enabled: e.default_enabled,
                factory: e.factory,
            })
            .collect();
        let forward = names(&resolve_enabled(COLLECTORS, None));
        let backward = names(&resolve_enabled(&reversed, None));
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_last_entry_for_a_name_wins() {
        let entries = [
            CollectorEntry {
                name: "drives",
                default_enabled: false,
                factory: DrivesCollector::build,
            },
            CollectorEntry {
                name: "drives",
                default_enabled: true,
                factory: DrivesCollector::build,
            },
        ];
        let selected = resolve_enabled(&entries, None);
        assert_eq!(names(&selected), vec!["drives"]);
    }

    #[test]
    fn test_registry_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for entry in COLLECTORS {
            assert!(seen.insert(entry.name), "duplicate entry {}", entry.name);
        }
    }
}
