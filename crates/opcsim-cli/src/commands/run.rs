//! `opcsim run` — drive the simulation headless and print telemetry.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use opcsim_core::{Engine, SensorId, StateFlags, format_hms};

use super::{apply_action, build_engine, export_snapshot, parse_schedule_entry};

/// Run the headless simulation command.
pub fn run(ticks: u64, seed: Option<u64>, at: &[String], real_time: bool, output: Option<&str>) {
    // Parse the whole schedule up front so a typo fails before anything runs.
    let mut schedule = Vec::with_capacity(at.len());
    for entry in at {
        match parse_schedule_entry(entry) {
            Ok(cmd) => schedule.push(cmd),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
    schedule.sort_by_key(|cmd| cmd.tick);

    log::info!(
        "starting headless run: {} ticks, {} scheduled commands",
        if ticks == 0 { "unbounded".to_string() } else { ticks.to_string() },
        schedule.len()
    );

    let mut engine = build_engine(seed);

    // Audit lines interleave with the table, indented to stand apart.
    engine.subscribe_audit(Box::new(|event| {
        println!("      {}", event.message);
    }));

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let tick_interval = engine.config().tick_interval;

    println!("opcsim headless run");
    if ticks == 0 {
        println!("  Ticks:     until Ctrl+C");
    } else {
        println!("  Ticks:     {ticks}");
    }
    println!("  Tick size: {tick_interval} ms simulated");
    match seed {
        Some(seed) => println!("  Seed:      {seed}"),
        None => println!("  Seed:      OS entropy"),
    }
    println!(
        "  Pacing:    {}",
        if real_time { "real time" } else { "free-running" }
    );
    println!();
    println!(
        "{:>5}  {:>9}  {:>8}  {:>9}  {:>7}  {:>9}",
        "tick", "clock", "temp °C", "vib mm/s", "state", "server"
    );

    let mut next = 0;
    let mut tick = 0u64;

    while running.load(Ordering::SeqCst) && (ticks == 0 || tick < ticks) {
        tick += 1;

        // Operator commands fire before the tick they are scheduled for.
        while next < schedule.len() && schedule[next].tick <= tick {
            apply_action(&mut engine, schedule[next].action);
            next += 1;
        }

        engine.step();
        print_row(&engine, tick);

        if real_time {
            std::thread::sleep(Duration::from_millis(tick_interval));
        }
    }

    println!();
    println!("Simulated {} across {tick} ticks.", format_hms(engine.now()));
    log::info!("run finished at t={} ms", engine.now());

    if let Some(path) = output {
        if let Err(e) = export_snapshot(&engine, path) {
            eprintln!("Error writing snapshot: {e}");
            std::process::exit(1);
        }
        println!("Snapshot written to {path}");
    }
}

fn print_row(engine: &Engine, tick: u64) {
    let snap = engine.snapshot();
    println!(
        "{:>5}  {:>9}  {:>8.1}  {:>9.3}  {:>7}  {:>9}",
        tick,
        format_hms(engine.now()),
        snap.sensors[&SensorId::Temperature].value,
        snap.sensors[&SensorId::VibrationRms].value,
        state_label(&snap.flags),
        snap.flags.active_server.to_string(),
    );
}

/// Short state tag for one table row.
fn state_label(flags: &StateFlags) -> &'static str {
    if flags.is_rebooting {
        "REBOOT"
    } else if flags.is_failover_active {
        "SWITCH"
    } else if flags.is_running {
        "RUN"
    } else {
        "IDLE"
    }
}
