//! Basic simulation example.
//!
//! Builds an engine, starts the process, runs one simulated minute of
//! telemetry, and prints the final sensor values.
//!
//! Run: `cargo run --example basic`

use opcsim_core::{Engine, EngineConfig, SensorId};

fn main() {
    let mut engine = Engine::new(EngineConfig::default());

    // Print every audit line the plant emits.
    engine.subscribe_audit(Box::new(|event| {
        println!("{}", event.message);
    }));

    engine.issue_command("Start");

    // One simulated minute at the default 1s tick.
    engine.advance(60_000);

    let snapshot = engine.snapshot();
    for id in SensorId::ALL {
        let reading = snapshot.sensors[&id];
        println!("{id}: {:.3} {}", reading.value, reading.unit);
    }
    println!(
        "History depth: {} samples",
        snapshot.history[&SensorId::Temperature].len()
    );
}
