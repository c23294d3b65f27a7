//! Virtual-time telemetry engine.
//!
//! Architecture:
//! 1. A virtual clock counts simulated milliseconds; nothing here sleeps
//! 2. `advance` replays periodic ticks and due one-shot completions in
//!    timestamp order (ticks win ties, so a completion's restored values
//!    are exactly observable at its delay boundary)
//! 3. Each tick relaxes temperature toward its target and samples vibration
//! 4. Commands only set intent flags and schedule completions
//! 5. Observers get owned snapshots after every published change
//! 6. Audit lines flow on a second channel, independent of snapshots

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audit::{AuditEvent, Severity};
use crate::config::EngineConfig;
use crate::identity::ServerIdentity;
use crate::state::{ProcessState, SensorId, StateFlags, StateSnapshot};

// ---------------------------------------------------------------------------
// Simulation constants
// ---------------------------------------------------------------------------

/// Target temperature while the process is stopped.
const AMBIENT_TEMPERATURE: f64 = 24.5;
/// Center of the oscillating target while the process runs.
const PROCESS_TEMPERATURE: f64 = 65.0;
/// Amplitude of the running target oscillation.
const TEMPERATURE_SWING: f64 = 5.0;
/// Period divisor of the running target oscillation, in simulated ms.
const TEMPERATURE_PERIOD: f64 = 5000.0;
/// Fraction of the remaining temperature gap closed per tick.
const SMOOTHING: f64 = 0.1;
/// Vibration floor while the process runs.
const VIBRATION_BASE: f64 = 0.045;
/// Width of the uniform vibration noise band while running.
const VIBRATION_JITTER: f64 = 0.02;
/// Per-tick geometric decay factor while stopped.
const VIBRATION_DECAY: f64 = 0.8;
/// Decayed vibration below this snaps to exactly zero.
const VIBRATION_FLOOR: f64 = 0.001;
/// Temperature restored when a reboot completes.
const REBOOT_TEMPERATURE: f64 = 20.0;

// ---------------------------------------------------------------------------
// Observer channels
// ---------------------------------------------------------------------------

/// Callback invoked with an owned snapshot after every published state change.
pub type StateHandler = Box<dyn FnMut(&StateSnapshot)>;

/// Callback invoked for every audit line.
pub type AuditHandler = Box<dyn FnMut(&AuditEvent)>;

/// Opaque identifier returned by subscribe calls.
///
/// Subscriptions live as long as the engine; there is no unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Operator command accepted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Toggle the running flag.
    Start,
    /// Freeze telemetry and reboot the simulated PLC.
    Reset,
}

impl Command {
    /// Parse a command name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("start") {
            Some(Self::Start)
        } else if name.eq_ignore_ascii_case("reset") {
            Some(Self::Reset)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Reset => "Reset",
        }
    }
}

// ---------------------------------------------------------------------------
// One-shot scheduler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    ResetComplete,
    FailoverComplete,
}

struct ScheduledTask {
    due: u64,
    action: PendingAction,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The telemetry engine: single source of truth for the simulated plant.
pub struct Engine {
    config: EngineConfig,
    identity: ServerIdentity,
    state: ProcessState,
    now: u64,
    next_tick: u64,
    tasks: Vec<ScheduledTask>,
    observers: Vec<StateHandler>,
    audit_observers: Vec<AuditHandler>,
    next_handle: u64,
    rng: StdRng,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let next_tick = config.tick_interval;

        Self {
            config,
            identity: ServerIdentity::default(),
            state: ProcessState::new(),
            now: 0,
            next_tick,
            tasks: Vec::new(),
            observers: Vec::new(),
            audit_observers: Vec::new(),
            next_handle: 0,
            rng,
        }
    }

    /// Simulated milliseconds since construction.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Current process flags.
    pub fn flags(&self) -> StateFlags {
        self.state.flags()
    }

    /// Owned copy of the current process state.
    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Register a state observer, called synchronously and in registration
    /// order after every published state change.
    ///
    /// Handlers are owned by the engine, so the borrow checker already rules
    /// out re-entrant calls back into it.
    pub fn subscribe(&mut self, handler: StateHandler) -> SubscriptionHandle {
        self.observers.push(handler);
        self.handle()
    }

    /// Register an audit observer.
    pub fn subscribe_audit(&mut self, handler: AuditHandler) -> SubscriptionHandle {
        self.audit_observers.push(handler);
        self.handle()
    }

    fn handle(&mut self) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    // -----------------------------------------------------------------------
    // Virtual clock
    // -----------------------------------------------------------------------

    /// Advance the virtual clock by `units` simulated milliseconds, firing
    /// every periodic tick and due one-shot completion in timestamp order.
    /// A tick due at the same instant as a completion runs first.
    pub fn advance(&mut self, units: u64) {
        let target = self.now.saturating_add(units);
        loop {
            let task_due = self.tasks.iter().map(|t| t.due).min();
            let tick_next =
                self.next_tick <= target && task_due.is_none_or(|due| self.next_tick <= due);

            if tick_next {
                self.now = self.next_tick;
                self.next_tick += self.config.tick_interval;
                self.update_telemetry();
            } else if let Some(due) = task_due.filter(|&due| due <= target) {
                self.now = due;
                self.run_due_tasks(due);
            } else {
                break;
            }
        }
        self.now = target;
    }

    /// Advance by exactly one tick interval.
    pub fn step(&mut self) {
        self.advance(self.config.tick_interval);
    }

    fn run_due_tasks(&mut self, due: u64) {
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].due == due {
                let task = self.tasks.remove(i);
                self.complete(task.action);
            } else {
                i += 1;
            }
        }
    }

    fn schedule(&mut self, delay: u64, action: PendingAction) {
        let due = self.now + delay;
        log::debug!("scheduling {action:?} at t={due}");
        self.tasks.push(ScheduledTask { due, action });
    }

    // -----------------------------------------------------------------------
    // Telemetry tick
    // -----------------------------------------------------------------------

    /// One telemetry period: move the temperature toward its target, sample
    /// vibration, append history, publish. A complete no-op while rebooting.
    fn update_telemetry(&mut self) {
        if self.state.is_rebooting {
            return;
        }

        self.state.target_temperature = if self.state.is_running {
            PROCESS_TEMPERATURE + (self.now as f64 / TEMPERATURE_PERIOD).sin() * TEMPERATURE_SWING
        } else {
            AMBIENT_TEMPERATURE
        };

        let temp = self.state.value(SensorId::Temperature);
        let temp = temp + (self.state.target_temperature - temp) * SMOOTHING;
        self.state.set_value(SensorId::Temperature, temp);

        let vib = if self.state.is_running {
            VIBRATION_BASE + self.rng.random_range(0.0..VIBRATION_JITTER)
        } else {
            let decayed = self.state.value(SensorId::VibrationRms) * VIBRATION_DECAY;
            if decayed < VIBRATION_FLOOR { 0.0 } else { decayed }
        };
        self.state.set_value(SensorId::VibrationRms, vib);

        self.state.push_history(SensorId::Temperature, temp);
        self.state.push_history(SensorId::VibrationRms, vib);

        self.notify();
    }

    // -----------------------------------------------------------------------
    // Operator commands
    // -----------------------------------------------------------------------

    /// Dispatch a command by name. Unknown names are silently ignored so
    /// adapters can forward operator input verbatim.
    pub fn issue_command(&mut self, name: &str) {
        match Command::from_name(name) {
            Some(command) => self.execute(command),
            None => log::debug!("ignoring unknown command {name:?}"),
        }
    }

    /// Dispatch a typed command.
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Start => self.toggle_running(),
            Command::Reset => self.begin_reset(),
        }
    }

    fn toggle_running(&mut self) {
        self.state.is_running = !self.state.is_running;
        let text = if self.state.is_running {
            "Process STARTED by operator."
        } else {
            "Process STOPPED by operator."
        };
        self.emit(Severity::Audit, "Start", text);
    }

    fn begin_reset(&mut self) {
        if self.state.is_rebooting || self.state.is_failover_active {
            return;
        }
        self.state.is_rebooting = true;
        self.state.is_running = false;
        self.emit(
            Severity::Audit,
            "Reset",
            "RESET command executed. Disconnecting nodes...",
        );
        self.schedule(self.config.reset_delay, PendingAction::ResetComplete);
    }

    /// Simulate a fault on the active server and switch to its partner after
    /// the configured delay. Ignored while a switch-over or reboot is already
    /// in progress.
    pub fn trigger_failover(&mut self) {
        if self.state.is_failover_active || self.state.is_rebooting {
            return;
        }
        self.state.is_failover_active = true;
        let text = format!(
            "Fault detected on {} server. Starting switch-over...",
            self.state.active_server
        );
        self.emit(Severity::Critical, "Failover", &text);
        self.schedule(self.config.failover_delay, PendingAction::FailoverComplete);
    }

    // -----------------------------------------------------------------------
    // Scheduled completions
    // -----------------------------------------------------------------------

    fn complete(&mut self, action: PendingAction) {
        match action {
            PendingAction::ResetComplete => {
                self.state.is_rebooting = false;
                self.state.set_value(SensorId::Temperature, REBOOT_TEMPERATURE);
                self.state.set_value(SensorId::VibrationRms, 0.0);
                self.emit(
                    Severity::System,
                    "Reset",
                    "Reboot complete. Nodes re-established.",
                );
                // The next tick publishes the restored values.
            }
            PendingAction::FailoverComplete => {
                self.state.active_server = self.state.active_server.other();
                self.state.is_failover_active = false;
                let text = format!(
                    "Switch-over complete. Active server: {}.",
                    self.state.active_server
                );
                self.emit(Severity::System, "Failover", &text);
                self.notify();
            }
        }
    }

    // -----------------------------------------------------------------------
    // Publication
    // -----------------------------------------------------------------------

    fn notify(&mut self) {
        let snapshot = self.state.snapshot();
        for handler in &mut self.observers {
            handler(&snapshot);
        }
    }

    fn emit(&mut self, severity: Severity, source: &'static str, text: &str) {
        let event = AuditEvent::new(self.now, source, severity, text);
        for handler in &mut self.audit_observers {
            handler(&event);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
