//! # Bridge Telemetry Projections
//!
//! Types for the monitoring tick payload and the pure projections the state
//! container stores from it.
//!
//! ## Monitoring Tick Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     MONITOR:TICK Projection                             │
//! │                                                                         │
//! │  MonitorData (trusted payload from the transport)                       │
//! │  ├── bridges: { "b1": BridgeTelemetry, ... }                            │
//! │  ├── cpu:     { currentLoadIdle }                                       │
//! │  ├── memory:  { total, active }                                         │
//! │  ├── temp:    { main }                                                  │
//! │  └── heap                                                               │
//! │       │                                                                 │
//! │       ▼  (every tick, rebuilt in full)                                  │
//! │  bridge_summaries() ──► [BridgeSummary { uptime: "1m 5s", ... }]       │
//! │  cpu_used()/cpu_available() ──► percentages                             │
//! │  memory_load() ──► percentage; total/active formatted via format_bytes  │
//! │  MetricHistory::advance() ──► 20-slot sliding windows (CPU, memory)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::format::format_uptime;
use crate::HISTORY_SLOTS;

// =============================================================================
// Inbound Telemetry Shapes
// =============================================================================

/// Per-bridge telemetry as reported by the controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BridgeTelemetry {
    /// Display name of the bridge.
    #[serde(default)]
    pub display: String,

    /// Bridge software version.
    #[serde(default)]
    pub version: String,

    /// Whether the bridge process is currently running.
    #[serde(default)]
    pub running: bool,

    /// Uptime in whole seconds.
    #[serde(default)]
    pub uptime: u64,

    /// Heap usage of the bridge process, in bytes.
    #[serde(default)]
    pub heap: u64,
}

/// Host CPU telemetry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CpuTelemetry {
    /// Percentage of CPU time spent idle. Absent means "assume fully idle".
    #[serde(default)]
    pub current_load_idle: Option<f64>,
}

/// Host memory telemetry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MemoryTelemetry {
    /// Total physical memory in bytes.
    #[serde(default)]
    pub total: Option<u64>,

    /// Actively used memory in bytes.
    #[serde(default)]
    pub active: Option<u64>,
}

/// Host temperature telemetry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TempTelemetry {
    /// Main sensor reading in degrees Celsius. Sensors that cannot report
    /// send a negative sentinel.
    #[serde(default)]
    pub main: Option<f64>,
}

/// The full monitoring tick payload.
///
/// A `BTreeMap` keys the bridges so the rebuilt summary list has a stable
/// order across ticks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonitorData {
    /// Telemetry per bridge, keyed by bridge id.
    #[serde(default)]
    pub bridges: BTreeMap<String, BridgeTelemetry>,

    /// Host CPU telemetry.
    #[serde(default)]
    pub cpu: CpuTelemetry,

    /// Host memory telemetry.
    #[serde(default)]
    pub memory: MemoryTelemetry,

    /// Host temperature telemetry.
    #[serde(default)]
    pub temp: TempTelemetry,

    /// Controller heap usage in bytes, stored verbatim.
    #[serde(default)]
    pub heap: u64,
}

impl MonitorData {
    /// CPU percentage in use: `100 - round(idle)`, assuming full idle when
    /// the sample is absent.
    pub fn cpu_used(&self) -> i64 {
        100 - self.cpu_available()
    }

    /// CPU percentage available (rounded idle share).
    pub fn cpu_available(&self) -> i64 {
        self.cpu.current_load_idle.unwrap_or(100.0).round() as i64
    }

    /// Memory load percentage: `round(active * 100 / total)`, zero when the
    /// total is unknown or zero.
    pub fn memory_load(&self) -> i64 {
        let total = self.memory.total.unwrap_or(0);
        let active = self.memory.active.unwrap_or(0);

        if total == 0 {
            return 0;
        }

        ((active as f64 * 100.0) / total as f64).round() as i64
    }

    /// Temperature reading, or `None` when the sensor sent its negative
    /// "cannot report" sentinel (or nothing at all).
    pub fn temperature(&self) -> Option<f64> {
        self.temp.main.filter(|main| *main > -1.0)
    }

    /// Rebuilds the full display-ready bridge summary list.
    pub fn bridge_summaries(&self) -> Vec<BridgeSummary> {
        self.bridges
            .iter()
            .map(|(id, bridge)| BridgeSummary {
                id: id.clone(),
                display: bridge.display.clone(),
                version: bridge.version.clone(),
                running: bridge.running,
                uptime: format_uptime(bridge.uptime),
                heap: bridge.heap,
            })
            .collect()
    }
}

// =============================================================================
// Bridge Summary
// =============================================================================

/// The display-ready per-bridge projection stored in the state tree.
///
/// Recomputed in full on every monitoring tick; `uptime` is already
/// formatted so the dashboard renders it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BridgeSummary {
    /// Bridge id (the key of the telemetry mapping).
    pub id: String,

    /// Display name.
    pub display: String,

    /// Bridge software version.
    pub version: String,

    /// Whether the bridge process is running.
    pub running: bool,

    /// Formatted uptime, e.g. `"1m 5s"`.
    pub uptime: String,

    /// Heap usage in bytes.
    pub heap: u64,
}

// =============================================================================
// Metric History
// =============================================================================

/// One point of a metric chart: a window slot index and a sample value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    /// X-axis slot, 0..HISTORY_SLOTS.
    pub slot: usize,

    /// Sampled value (a percentage for both CPU and memory).
    pub value: f64,
}

/// A fixed-length sliding window of metric samples.
///
/// ## Invariant
/// The window always holds exactly [`HISTORY_SLOTS`] samples with slot
/// indices `0..HISTORY_SLOTS` in order. [`advance`](MetricHistory::advance)
/// shifts every value left by one, re-indexes the slots, and appends the new
/// sample at the tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetricHistory(Vec<MetricSample>);

impl MetricHistory {
    /// A window of all-zero samples (the chart baseline before the first
    /// tick arrives).
    pub fn new() -> Self {
        MetricHistory(
            (0..HISTORY_SLOTS)
                .map(|slot| MetricSample { slot, value: 0.0 })
                .collect(),
        )
    }

    /// Shifts the window left by one and appends `value` at the tail.
    pub fn advance(&mut self, value: f64) {
        self.0.remove(0);

        for (slot, sample) in self.0.iter_mut().enumerate() {
            sample.slot = slot;
        }

        self.0.push(MetricSample {
            slot: HISTORY_SLOTS - 1,
            value,
        });
    }

    /// The samples in slot order.
    pub fn samples(&self) -> &[MetricSample] {
        &self.0
    }

    /// The newest sample value (the tail of the window).
    pub fn latest(&self) -> f64 {
        self.0[HISTORY_SLOTS - 1].value
    }
}

impl Default for MetricHistory {
    fn default() -> Self {
        MetricHistory::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_bytes;

    fn tick(idle: Option<f64>, total: Option<u64>, active: Option<u64>) -> MonitorData {
        MonitorData {
            cpu: CpuTelemetry {
                current_load_idle: idle,
            },
            memory: MemoryTelemetry { total, active },
            ..MonitorData::default()
        }
    }

    #[test]
    fn test_cpu_percentages() {
        let data = tick(Some(80.0), None, None);
        assert_eq!(data.cpu_used(), 20);
        assert_eq!(data.cpu_available(), 80);

        // Absent idle sample: assume fully idle
        let data = tick(None, None, None);
        assert_eq!(data.cpu_used(), 0);
        assert_eq!(data.cpu_available(), 100);

        // Rounding
        let data = tick(Some(79.4), None, None);
        assert_eq!(data.cpu_used(), 21);
    }

    #[test]
    fn test_memory_load() {
        let data = tick(None, Some(1000), Some(500));
        assert_eq!(data.memory_load(), 50);

        // Unknown or zero total never divides
        let data = tick(None, None, Some(500));
        assert_eq!(data.memory_load(), 0);
        let data = tick(None, Some(0), Some(500));
        assert_eq!(data.memory_load(), 0);
    }

    #[test]
    fn test_temperature_sentinel() {
        let mut data = MonitorData::default();
        assert_eq!(data.temperature(), None);

        data.temp.main = Some(45.0);
        assert_eq!(data.temperature(), Some(45.0));

        data.temp.main = Some(-1.0);
        assert_eq!(data.temperature(), None);
    }

    #[test]
    fn test_bridge_summaries_are_display_ready() {
        let mut data = MonitorData::default();
        data.bridges.insert(
            "b1".to_string(),
            BridgeTelemetry {
                display: "Bridge1".to_string(),
                version: "1.0".to_string(),
                running: true,
                uptime: 65,
                heap: 1000,
            },
        );
        data.bridges.insert(
            "a0".to_string(),
            BridgeTelemetry {
                display: "Bridge0".to_string(),
                version: "1.1".to_string(),
                running: false,
                uptime: 0,
                heap: 0,
            },
        );

        let summaries = data.bridge_summaries();
        assert_eq!(summaries.len(), 2);

        // BTreeMap keying keeps the list order stable across ticks
        assert_eq!(summaries[0].id, "a0");
        assert_eq!(summaries[1].id, "b1");

        assert_eq!(summaries[1].display, "Bridge1");
        assert_eq!(summaries[1].uptime, "1m 5s");
        assert!(summaries[1].running);
        assert_eq!(summaries[1].heap, 1000);
    }

    #[test]
    fn test_history_starts_zeroed() {
        let history = MetricHistory::new();

        assert_eq!(history.samples().len(), HISTORY_SLOTS);
        for (i, sample) in history.samples().iter().enumerate() {
            assert_eq!(sample.slot, i);
            assert_eq!(sample.value, 0.0);
        }
    }

    #[test]
    fn test_history_advance_appends_at_tail() {
        let mut history = MetricHistory::new();
        history.advance(42.0);

        assert_eq!(history.samples().len(), HISTORY_SLOTS);
        assert_eq!(history.latest(), 42.0);
        assert_eq!(history.samples()[HISTORY_SLOTS - 1].slot, HISTORY_SLOTS - 1);
        assert_eq!(history.samples()[HISTORY_SLOTS - 2].value, 0.0);
    }

    #[test]
    fn test_history_keeps_only_the_last_window() {
        let mut history = MetricHistory::new();

        for i in 0..25 {
            history.advance(i as f64);
        }

        // Only the last 20 samples (5..=24) remain, re-indexed 0..20
        assert_eq!(history.samples().len(), HISTORY_SLOTS);
        for (i, sample) in history.samples().iter().enumerate() {
            assert_eq!(sample.slot, i);
            assert_eq!(sample.value, (i + 5) as f64);
        }
    }

    #[test]
    fn test_memory_strings_format_at_projection_time() {
        // The state container stores formatted totals; sanity-check the
        // formatter wiring here against a realistic payload.
        let data = tick(None, Some(8 * 1024 * 1024 * 1024), Some(4 * 1024 * 1024 * 1024));
        assert_eq!(data.memory_load(), 50);
        assert_eq!(format_bytes(data.memory.total.unwrap()), "8.0 GB");
    }
}
