//! Field tables shared by the analysed-statistics collectors.

use crate::metrics::gauge_vec;
use prometheus::GaugeVec;

/// One numeric field of an analysed-statistics record
pub(crate) struct StatField<T> {
    /// Field name in the proxy payload, used in the help text
    pub key: &'static str,
    /// Metric name below the collector's subsystem
    pub metric: &'static str,
    pub value: fn(&T) -> f64,
}

/// One gauge vector per field of a statistics table
pub(crate) struct StatGauges<T: 'static> {
    fields: &'static [StatField<T>],
    gauges: Vec<GaugeVec>,
}

impl<T> StatGauges<T> {
    /// `entity` prefixes the help text, e.g. "Controller statistic averageReadOpSize"
    pub fn new(
        subsystem: &str,
        entity: &str,
        fields: &'static [StatField<T>],
        labels: &[&str],
    ) -> prometheus::Result<Self> {
        let gauges = fields
            .iter()
            .map(|field| {
                let help = format!("{} statistic {}", entity, field.key);
                gauge_vec(subsystem, field.metric, &help, labels)
            })
            .collect::<prometheus::Result<Vec<_>>>()?;

        Ok(Self { fields, gauges })
    }

    pub fn metrics(&self) -> impl Iterator<Item = &GaugeVec> {
        self.gauges.iter()
    }

    /// Set every field of `record` under `labels`
    pub fn observe(&self, record: &T, labels: &[&str]) {
        for (field, gauge) in self.fields.iter().zip(&self.gauges) {
            gauge.with_label_values(labels).set((field.value)(record));
        }
    }
}
