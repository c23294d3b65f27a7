//! Engine configuration.
//!
//! Every delay is expressed in simulated milliseconds. The engine never
//! consults the wall clock; callers decide how fast virtual time passes.

/// Configuration for a telemetry engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Simulated milliseconds between telemetry ticks.
    pub tick_interval: u64,
    /// Delay between a Reset command and its completion.
    pub reset_delay: u64,
    /// Delay between a failover trigger and the server switch.
    pub failover_delay: u64,
    /// Seed for the vibration noise generator. `None` uses OS entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: 1000,
            reset_delay: 3000,
            failover_delay: 2000,
            seed: None,
        }
    }
}
