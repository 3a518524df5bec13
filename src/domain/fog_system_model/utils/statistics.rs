use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::str::FromStr;

use crate::domain::fog_system_model::fog_network::FogNetwork;
use crate::domain::fog_system_model::orchestration::orchestration_module::CycleReport;
use crate::error::{ConversionError, Result};

/// Log target of structured analytics events.
pub const ANALYTICS_TARGET: &str = "analytics";

/// Aggregate quantities the collector can sample. Each one is a column of the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetricKind {
    /// Share of all resource blocks currently allocated.
    ServiceCapability,

    /// Cumulative throughput of all nodes in Mbit.
    Throughput,

    /// Served sessions over all admission attempts, including those without a feasible node.
    Serviceability,

    /// Share of present clients that are served.
    Availability,

    /// Energy per served session.
    EnergyConsumed,

    /// Wall-clock duration of the latest orchestration step in ms.
    ExecutionTime,

    /// Migrations executed by the latest orchestration step.
    Migrations,
}

impl FromStr for MetricKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "service_capability" => Ok(MetricKind::ServiceCapability),
            "throughput" => Ok(MetricKind::Throughput),
            "serviceability" => Ok(MetricKind::Serviceability),
            "availability" => Ok(MetricKind::Availability),
            "energy_consumed" => Ok(MetricKind::EnergyConsumed),
            "execution_time" => Ok(MetricKind::ExecutionTime),
            "migrations" => Ok(MetricKind::Migrations),
            _ => Err(ConversionError::UnknownMetric(s.to_string())),
        }
    }
}

impl MetricKind {
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::ServiceCapability => "service_capability",
            MetricKind::Throughput => "throughput",
            MetricKind::Serviceability => "serviceability",
            MetricKind::Availability => "availability",
            MetricKind::EnergyConsumed => "energy_consumed",
            MetricKind::ExecutionTime => "execution_time",
            MetricKind::Migrations => "migrations",
        }
    }

    pub fn all() -> Vec<MetricKind> {
        vec![
            MetricKind::ServiceCapability,
            MetricKind::Throughput,
            MetricKind::Serviceability,
            MetricKind::Availability,
            MetricKind::EnergyConsumed,
            MetricKind::ExecutionTime,
            MetricKind::Migrations,
        ]
    }

    /// Reads the metric off the network. `unplaced` counts arrivals that found no feasible node.
    pub fn measure(&self, network: &FogNetwork, unplaced: u64, last_cycle: Option<&CycleReport>) -> f64 {
        let nodes = network.nodes();
        match self {
            MetricKind::ServiceCapability => {
                let capacity: i64 = nodes.iter().map(|n| n.capacity()).sum();
                let allocated: i64 = nodes.iter().map(|n| n.allocated()).sum();
                if capacity == 0 { 0.0 } else { allocated as f64 / capacity as f64 }
            }
            MetricKind::Throughput => nodes.iter().map(|n| n.overall_throughput()).sum(),
            MetricKind::Serviceability => {
                let served: u64 = nodes.iter().map(|n| n.services_served()).sum();
                let attempts: u64 = nodes.iter().map(|n| n.incoming_services()).sum::<u64>() + unplaced;
                if attempts == 0 { 1.0 } else { served as f64 / attempts as f64 }
            }
            MetricKind::Availability => {
                let present = network.client_count();
                if present == 0 { 1.0 } else { network.served_client_count() as f64 / present as f64 }
            }
            MetricKind::EnergyConsumed => {
                let served: u64 = nodes.iter().map(|n| n.services_served()).sum();
                let energy: f64 = nodes.iter().map(|n| n.energy_consumed()).sum();
                if served == 0 { 0.0 } else { energy / served as f64 }
            }
            MetricKind::ExecutionTime => last_cycle.map_or(0.0, |c| c.execution_time_ms),
            MetricKind::Migrations => last_cycle.map_or(0.0, |c| c.migrations as f64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub time: i64,
    pub values: Vec<f64>,
}

/// Periodic read-only sampler of the metrics selected in the configuration.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    metrics: Vec<MetricKind>,
    samples: Vec<MetricSample>,
}

impl MetricsCollector {
    pub fn new(metrics: Vec<MetricKind>) -> Self {
        Self { metrics, samples: Vec::new() }
    }

    pub fn metrics(&self) -> &[MetricKind] {
        &self.metrics
    }

    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    pub fn latest(&self) -> Option<&MetricSample> {
        self.samples.last()
    }

    /// Value of `kind` in the latest sample, if it is collected.
    pub fn latest_value(&self, kind: MetricKind) -> Option<f64> {
        let column = self.metrics.iter().position(|m| *m == kind)?;
        self.latest().map(|s| s.values[column])
    }

    pub fn sample(&mut self, now: i64, network: &FogNetwork, unplaced: u64, last_cycle: Option<&CycleReport>) {
        let values = self.metrics.iter().map(|m| m.measure(network, unplaced, last_cycle)).collect();
        self.samples.push(MetricSample { time: now, values });
    }

    /// Writes all samples as `;`-separated CSV with a `Time` column first.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

        let mut header = vec!["Time"];
        header.extend(self.metrics.iter().map(MetricKind::name));
        csv_wtr.write_record(&header)?;

        for sample in &self.samples {
            let mut row = vec![sample.time.to_string()];
            row.extend(sample.values.iter().map(|v| v.to_string()));
            csv_wtr.write_record(&row)?;
        }

        csv_wtr.flush()?;
        Ok(())
    }

    pub fn save_csv(&self, file_path: &str) -> Result<()> {
        let file = File::create(file_path)?;
        self.write_csv(file)?;
        log::info!("Wrote {} metric samples to '{}'.", self.samples.len(), file_path);
        Ok(())
    }
}
