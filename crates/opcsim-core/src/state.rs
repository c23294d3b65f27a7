//! Process state owned by the telemetry engine.
//!
//! [`ProcessState`] is the single source of truth for the simulated plant.
//! Only the engine mutates it; observers receive owned [`StateSnapshot`]
//! copies, so a handler can never watch the state mid-mutation.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

/// Samples retained per sensor history buffer.
pub const MAX_HISTORY: usize = 50;

const INITIAL_TEMPERATURE: f64 = 24.5;
const INITIAL_VIBRATION: f64 = 0.012;

// ---------------------------------------------------------------------------
// Sensor and server identifiers
// ---------------------------------------------------------------------------

/// Identifier of a simulated sensor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SensorId {
    Temperature,
    VibrationRms,
}

impl SensorId {
    /// Every sensor, in display order.
    pub const ALL: [SensorId; 2] = [SensorId::Temperature, SensorId::VibrationRms];

    /// Node identifier string as published by the simulated server.
    pub fn node_id(self) -> &'static str {
        match self {
            Self::Temperature => "PLC_TEMP",
            Self::VibrationRms => "VIB_RMS",
        }
    }

    /// Engineering unit for this sensor's values.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::VibrationRms => "mm/s",
        }
    }
}

impl std::fmt::Display for SensorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Temperature => write!(f, "Temperature"),
            Self::VibrationRms => write!(f, "Vibration RMS"),
        }
    }
}

/// Which server of the redundant pair currently owns the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ServerRole {
    Primary,
    Secondary,
}

impl ServerRole {
    /// The other server in the pair.
    pub fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

impl std::fmt::Display for ServerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "Primary"),
            Self::Secondary => write!(f, "Secondary"),
        }
    }
}

// ---------------------------------------------------------------------------
// Readings and flags
// ---------------------------------------------------------------------------

/// One sensor's current value and unit.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SensorReading {
    pub value: f64,
    pub unit: &'static str,
}

/// Process flags as published to observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateFlags {
    pub is_running: bool,
    pub is_rebooting: bool,
    pub is_failover_active: bool,
    pub active_server: ServerRole,
}

// ---------------------------------------------------------------------------
// ProcessState
// ---------------------------------------------------------------------------

/// Full mutable process state.
///
/// Invariants the engine maintains:
/// - every history buffer holds at most [`MAX_HISTORY`] samples
/// - `is_rebooting` and `is_failover_active` are never both true
/// - sensor values are written only by ticks and scheduled completions
#[derive(Debug, Clone)]
pub struct ProcessState {
    pub sensors: BTreeMap<SensorId, SensorReading>,
    pub history: BTreeMap<SensorId, VecDeque<f64>>,
    pub is_running: bool,
    pub is_rebooting: bool,
    pub is_failover_active: bool,
    pub active_server: ServerRole,
    pub target_temperature: f64,
}

impl ProcessState {
    /// State of a freshly booted plant: idle at ambient temperature with a
    /// trace of residual vibration.
    pub fn new() -> Self {
        let mut sensors = BTreeMap::new();
        sensors.insert(
            SensorId::Temperature,
            SensorReading {
                value: INITIAL_TEMPERATURE,
                unit: SensorId::Temperature.unit(),
            },
        );
        sensors.insert(
            SensorId::VibrationRms,
            SensorReading {
                value: INITIAL_VIBRATION,
                unit: SensorId::VibrationRms.unit(),
            },
        );

        let mut history = BTreeMap::new();
        for id in SensorId::ALL {
            history.insert(id, VecDeque::with_capacity(MAX_HISTORY));
        }

        Self {
            sensors,
            history,
            is_running: false,
            is_rebooting: false,
            is_failover_active: false,
            active_server: ServerRole::Primary,
            target_temperature: INITIAL_TEMPERATURE,
        }
    }

    /// Current value of one sensor.
    pub fn value(&self, id: SensorId) -> f64 {
        self.sensors[&id].value
    }

    /// Overwrite one sensor's value, leaving its history untouched.
    pub fn set_value(&mut self, id: SensorId, value: f64) {
        if let Some(reading) = self.sensors.get_mut(&id) {
            reading.value = value;
        }
    }

    /// Append a value to a sensor's history, evicting the oldest sample past
    /// the cap.
    pub fn push_history(&mut self, id: SensorId, value: f64) {
        let hist = self.history.entry(id).or_default();
        hist.push_back(value);
        while hist.len() > MAX_HISTORY {
            hist.pop_front();
        }
    }

    pub fn flags(&self) -> StateFlags {
        StateFlags {
            is_running: self.is_running,
            is_rebooting: self.is_rebooting,
            is_failover_active: self.is_failover_active,
            active_server: self.active_server,
        }
    }

    /// Owned copy of the publishable state.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            sensors: self.sensors.clone(),
            history: self
                .history
                .iter()
                .map(|(id, hist)| (*id, hist.iter().copied().collect()))
                .collect(),
            flags: self.flags(),
        }
    }
}

impl Default for ProcessState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// StateSnapshot
// ---------------------------------------------------------------------------

/// Owned, internally consistent copy of the process state, handed to every
/// state observer and serializable for export.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub sensors: BTreeMap<SensorId, SensorReading>,
    pub history: BTreeMap<SensorId, Vec<f64>>,
    pub flags: StateFlags,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
