//! Flow metric interpretation
//!
//! Converts an ordered daily sample series (oldest to newest) into a
//! [`FlowClassification`] under a metric-specific policy. Missing or
//! insufficient data is a reportable condition (`FlowDirection::Missing`),
//! never an error.

use crate::types::{FlowClassification, FlowDirection};

/// Divisor turning raw net-flow units into the reporting unit.
pub const NET_FLOW_SCALE: f64 = 1e8;
/// Stable band half-width for the net-flow policy, in reporting units.
pub const NET_FLOW_THRESHOLD: f64 = 5_000.0;
/// Divisor turning raw supply units into millions.
pub const SUPPLY_DELTA_SCALE: f64 = 1e6;
/// Stable band half-width for the supply-delta policy, in millions.
pub const SUPPLY_DELTA_THRESHOLD: f64 = 500.0;

/// Interpretation policy for one metric.
///
/// Boundary values land exactly on the band edge and classify `Stable`;
/// the directional buckets are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretPolicy {
    /// Sum the window, negate (raw metric is outflow-positive), scale.
    /// Below `-5000` is `Outflow`, above `+5000` is `Inflow`.
    NetFlow,
    /// Last minus second-last sample, scaled to millions; needs at least
    /// two samples. Above `+500` is `Inflow`, below `-500` is `Outflow`.
    SupplyDelta,
}

/// Classifies one metric's sample window for a digest cycle.
#[derive(Debug, Clone)]
pub struct FlowMetricInterpreter {
    metric_name: String,
    unit: String,
    policy: InterpretPolicy,
}

impl FlowMetricInterpreter {
    pub fn net_flow(metric_name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            metric_name: metric_name.into(),
            unit: unit.into(),
            policy: InterpretPolicy::NetFlow,
        }
    }

    pub fn supply_delta(metric_name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            metric_name: metric_name.into(),
            unit: unit.into(),
            policy: InterpretPolicy::SupplyDelta,
        }
    }

    /// Classify a sample window. `None` or too few samples yields `Missing`.
    pub fn classify(&self, samples: Option<&[f64]>) -> FlowClassification {
        let net_value = match self.policy {
            InterpretPolicy::NetFlow => samples
                .filter(|s| !s.is_empty())
                .map(|s| -s.iter().sum::<f64>() / NET_FLOW_SCALE),
            InterpretPolicy::SupplyDelta => samples
                .filter(|s| s.len() >= 2)
                .map(|s| (s[s.len() - 1] - s[s.len() - 2]) / SUPPLY_DELTA_SCALE),
        };

        let Some(net_value) = net_value else {
            return FlowClassification {
                metric_name: self.metric_name.clone(),
                net_value: 0.0,
                direction: FlowDirection::Missing,
                magnitude_label: String::new(),
            };
        };

        let direction = match self.policy {
            InterpretPolicy::NetFlow => {
                if net_value < -NET_FLOW_THRESHOLD {
                    FlowDirection::Outflow
                } else if net_value > NET_FLOW_THRESHOLD {
                    FlowDirection::Inflow
                } else {
                    FlowDirection::Stable
                }
            }
            InterpretPolicy::SupplyDelta => {
                if net_value > SUPPLY_DELTA_THRESHOLD {
                    FlowDirection::Inflow
                } else if net_value < -SUPPLY_DELTA_THRESHOLD {
                    FlowDirection::Outflow
                } else {
                    FlowDirection::Stable
                }
            }
        };

        FlowClassification {
            metric_name: self.metric_name.clone(),
            net_value,
            direction,
            magnitude_label: format!("{:+.1} {}", net_value, self.unit),
        }
    }
}
