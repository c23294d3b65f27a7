//! Scripted operator shift.
//!
//! Walks the plant through a full shift: start the process, let it heat
//! up, ride through a failover, then reset it back to baseline. Every
//! audit line is printed as it happens.
//!
//! Run: `cargo run --example scripted_shift`

use opcsim_core::{Engine, EngineConfig, SensorId};

fn main() {
    let config = EngineConfig {
        seed: Some(42),
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config);

    engine.subscribe_audit(Box::new(|event| {
        println!("{}", event.message);
    }));

    engine.issue_command("Start");
    engine.advance(20_000);
    report(&engine, "after warm-up");

    engine.trigger_failover();
    engine.advance(5_000);
    report(&engine, "after switch-over");

    engine.issue_command("Reset");
    engine.advance(5_000);
    report(&engine, "after reboot");
}

fn report(engine: &opcsim_core::Engine, phase: &str) {
    let snapshot = engine.snapshot();
    let temp = snapshot.sensors[&SensorId::Temperature].value;
    let vib = snapshot.sensors[&SensorId::VibrationRms].value;
    println!(
        "  [{phase}] temp {temp:.1} °C, vibration {vib:.3} mm/s, server {}",
        snapshot.flags.active_server
    );
}
