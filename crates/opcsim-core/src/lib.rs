//! # opcsim-core
//!
//! **A simulated plant floor on a virtual clock.**
//!
//! `opcsim-core` is the telemetry engine behind opcsim: it simulates an
//! OPC UA server's process state — temperature and vibration sensors,
//! run/stop control, PLC reboots, and primary/secondary server failover —
//! and publishes every state change to subscribed observers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use opcsim_core::{Engine, EngineConfig, SensorId};
//!
//! let mut engine = Engine::new(EngineConfig::default());
//!
//! engine.subscribe(Box::new(|snap| {
//!     let temp = snap.sensors[&SensorId::Temperature].value;
//!     println!("temperature: {temp:.2} °C");
//! }));
//!
//! engine.issue_command("Start");
//! engine.advance(5_000); // five seconds of simulated time, instantly
//! ```
//!
//! ## Architecture
//!
//! Commands → flags + scheduled completions → ticks → snapshots → observers
//!
//! Everything runs on one thread against a virtual clock counting simulated
//! milliseconds. [`Engine::advance`] replays periodic telemetry ticks and due
//! one-shot completions in timestamp order, so a test can fast-forward
//! through a three-second reboot without sleeping. Observers receive owned
//! [`StateSnapshot`] copies only after a mutation has fully completed; audit
//! lines travel on a second, independent channel as pre-formatted
//! `[HH:MM:SS] KEYWORD: text` strings.

pub mod audit;
pub mod clock;
pub mod config;
pub mod engine;
pub mod identity;
pub mod state;

pub use audit::{AuditEvent, Severity};
pub use clock::format_hms;
pub use config::EngineConfig;
pub use engine::{AuditHandler, Command, Engine, StateHandler, SubscriptionHandle};
pub use identity::ServerIdentity;
pub use state::{
    MAX_HISTORY, ProcessState, SensorId, SensorReading, ServerRole, StateFlags, StateSnapshot,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
