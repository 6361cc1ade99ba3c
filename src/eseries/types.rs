//! SANtricity Web Services Proxy Type Definitions
//!
//! Rust struct definitions for the REST responses the collectors decode. Only the
//! fields the exporter reads are modelled; everything else in the payloads is ignored.
//!
//! # Design Notes
//!
//! - **Serde Defaults**: `#[serde(default)]` is used on every record so that a field the
//!   proxy omits decodes to its zero value instead of failing the whole response.
//!   Every field also goes through [`null_as_default`], since the proxy sends `null`
//!   for unset references and counters.
//! - **Capacities as strings**: the proxy serialises 64-bit byte counts as JSON strings;
//!   they are kept as `String` and parsed by the collectors.
//!
//! # API Endpoints Covered
//!
//! - `storage-systems/{id}` → [`StorageSystem`]
//! - `storage-systems/{id}/hardware-inventory` → [`HardwareInventory`]
//! - `storage-systems/{id}/storage-pools` → [`StoragePool`]
//! - `storage-systems/{id}/volumes` → [`Volume`]
//! - `storage-systems/{id}/analysed-controller-statistics` → [`AnalysedControllerStatistics`]
//! - `storage-systems/{id}/analysed-drive-statistics` → [`AnalysedDriveStatistics`]
//! - `storage-systems/{id}/analysed-system-statistics` → [`AnalysedSystemStatistics`]

use serde::{Deserialize, Deserializer};

/// Decode `null` as the zero value of `T`
///
/// `#[serde(default)]` only covers absent keys; an explicit `null` would otherwise fail
/// the whole list the record belongs to.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Hardware inventory; drives and controllers are joined to trays through references.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HardwareInventory {
    #[serde(deserialize_with = "null_as_default")]
    pub drives: Vec<Drive>,
    #[serde(deserialize_with = "null_as_default")]
    pub trays: Vec<Tray>,
    #[serde(deserialize_with = "null_as_default")]
    pub controllers: Vec<Controller>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Drive {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub physical_location: DrivePhysicalLocation,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DrivePhysicalLocation {
    #[serde(deserialize_with = "null_as_default")]
    pub slot: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub tray_ref: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Tray {
    #[serde(deserialize_with = "null_as_default")]
    pub tray_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub tray_ref: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Controller {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub controller_ref: String,
    #[serde(deserialize_with = "null_as_default")]
    pub physical_location: ControllerPhysicalLocation,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerPhysicalLocation {
    /// Slot label printed on the shelf, "A" or "B".
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSystem {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StoragePool {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_raided_space: String,
    #[serde(deserialize_with = "null_as_default")]
    pub used_space: String,
    #[serde(deserialize_with = "null_as_default")]
    pub free_space: String,
    #[serde(deserialize_with = "null_as_default")]
    pub raid_level: String,
    #[serde(deserialize_with = "null_as_default")]
    pub raid_status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disk_pool: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub offline: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_size_in_bytes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub thin_provisioned: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub list_of_mappings: Vec<VolumeMapping>,
    #[serde(deserialize_with = "null_as_default")]
    pub volume_group_ref: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disk_pool: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub offline: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub mapped: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub raid_level: String,
    #[serde(deserialize_with = "null_as_default")]
    pub volume_use: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeMapping {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lun: i64,
}

/// Per-controller rates computed by the proxy over its sampling window.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysedControllerStatistics {
    #[serde(deserialize_with = "null_as_default")]
    pub controller_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub average_read_op_size: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub average_write_op_size: f64,
    #[serde(rename = "readIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub read_iops: f64,
    #[serde(rename = "writeIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub write_iops: f64,
    #[serde(rename = "otherIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub other_iops: f64,
    #[serde(rename = "combinedIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub combined_iops: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub read_throughput: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub write_throughput: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub combined_throughput: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub read_response_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub write_response_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub combined_response_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub read_hit_response_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub write_hit_response_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub read_ops: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub write_ops: f64,
    #[serde(rename = "readPhysicalIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub read_physical_iops: f64,
    #[serde(rename = "writePhysicalIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub write_physical_iops: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub cache_hit_bytes_percent: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub random_ios_percent: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub mirror_bytes_percent: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub full_stripe_writes_bytes_percent: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub ddp_bytes_percent: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub max_cpu_utilization: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub cpu_avg_utilization: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub max_possible_bps_under_current_load: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub max_possible_iops_under_current_load: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysedDriveStatistics {
    #[serde(deserialize_with = "null_as_default")]
    pub disk_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub average_read_op_size: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub average_write_op_size: f64,
    #[serde(rename = "readIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub read_iops: f64,
    #[serde(rename = "writeIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub write_iops: f64,
    #[serde(rename = "otherIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub other_iops: f64,
    #[serde(rename = "combinedIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub combined_iops: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub read_throughput: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub write_throughput: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub combined_throughput: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub read_response_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub write_response_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub combined_response_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub read_response_time_std_dev: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub write_response_time_std_dev: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub combined_response_time_std_dev: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub read_ops: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub write_ops: f64,
    #[serde(rename = "readPhysicalIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub read_physical_iops: f64,
    #[serde(rename = "writePhysicalIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub write_physical_iops: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub average_queue_depth: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub queue_depth_max: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub queue_depth_total: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub random_ios_percent: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysedSystemStatistics {
    #[serde(deserialize_with = "null_as_default")]
    pub storage_system_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub average_read_op_size: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub average_write_op_size: f64,
    #[serde(rename = "readIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub read_iops: f64,
    #[serde(rename = "writeIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub write_iops: f64,
    #[serde(rename = "combinedIOps")]
    #[serde(deserialize_with = "null_as_default")]
    pub combined_iops: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub read_throughput: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub write_throughput: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub combined_throughput: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub read_response_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub write_response_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub combined_response_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub cache_hit_bytes_percent: f64,
}
