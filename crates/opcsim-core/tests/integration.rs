//! Integration tests for opcsim-core.
//!
//! These tests verify the full simulation pipeline:
//! operator commands → intent flags + scheduled completions → telemetry
//! ticks → snapshots and audit lines reaching subscribers.

use std::cell::RefCell;
use std::rc::Rc;

use opcsim_core::{Engine, EngineConfig, MAX_HISTORY, SensorId, ServerRole};

fn seeded_engine() -> Engine {
    Engine::new(EngineConfig {
        seed: Some(7),
        ..Default::default()
    })
}

/// Mirror every audit line into a shared buffer.
fn collect_audit(engine: &mut Engine) -> Rc<RefCell<Vec<String>>> {
    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&lines);
    engine.subscribe_audit(Box::new(move |event| {
        sink.borrow_mut().push(event.message.clone());
    }));
    lines
}

/// Count state notifications.
fn count_snapshots(engine: &mut Engine) -> Rc<RefCell<usize>> {
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    engine.subscribe(Box::new(move |_| {
        *sink.borrow_mut() += 1;
    }));
    count
}

#[test]
fn engine_starts_idle_at_ambient() {
    let mut engine = seeded_engine();
    let snap = engine.snapshot();

    assert_eq!(snap.sensors[&SensorId::Temperature].value, 24.5);
    assert_eq!(snap.sensors[&SensorId::Temperature].unit, "°C");
    assert_eq!(snap.sensors[&SensorId::VibrationRms].unit, "mm/s");
    assert!(snap.history[&SensorId::Temperature].is_empty());
    assert!(!snap.flags.is_running);
    assert!(!snap.flags.is_rebooting);
    assert!(!snap.flags.is_failover_active);
    assert_eq!(snap.flags.active_server, ServerRole::Primary);

    // Idle temperature already sits at its target, so it holds exactly.
    engine.advance(5_000);
    let snap = engine.snapshot();
    assert!(
        snap.history[&SensorId::Temperature]
            .iter()
            .all(|&v| v == 24.5),
        "idle temperature drifted: {:?}",
        snap.history[&SensorId::Temperature]
    );
}

#[test]
fn history_never_exceeds_cap() {
    let mut engine = seeded_engine();
    engine.issue_command("Start");
    engine.advance(80_000);

    let snap = engine.snapshot();
    for id in [SensorId::Temperature, SensorId::VibrationRms] {
        assert_eq!(
            snap.history[&id].len(),
            MAX_HISTORY,
            "{id} history exceeded cap"
        );
        // The newest entry is always the live value.
        assert_eq!(*snap.history[&id].last().unwrap(), snap.sensors[&id].value);
    }
}

#[test]
fn temperature_follows_smoothing_curve() {
    let mut engine = seeded_engine();
    engine.issue_command("Start");

    engine.advance(1_000);
    let target_1 = 65.0 + (1000.0_f64 / 5000.0).sin() * 5.0;
    let expected_1 = 24.5 + (target_1 - 24.5) * 0.1;
    let got_1 = engine.snapshot().sensors[&SensorId::Temperature].value;
    assert!(
        (got_1 - expected_1).abs() < 1e-12,
        "tick 1: expected {expected_1}, got {got_1}"
    );

    engine.advance(1_000);
    let target_2 = 65.0 + (2000.0_f64 / 5000.0).sin() * 5.0;
    let expected_2 = expected_1 + (target_2 - expected_1) * 0.1;
    let got_2 = engine.snapshot().sensors[&SensorId::Temperature].value;
    assert!(
        (got_2 - expected_2).abs() < 1e-12,
        "tick 2: expected {expected_2}, got {got_2}"
    );
}

#[test]
fn vibration_decays_geometrically_when_stopped() {
    let mut engine = seeded_engine();
    engine.advance(12_000);

    let snap = engine.snapshot();
    let hist = &snap.history[&SensorId::VibrationRms];
    assert_eq!(hist.len(), 12);

    // 0.012 * 0.8^n stays above the 0.001 floor for eleven ticks.
    assert!((hist[0] - 0.012 * 0.8).abs() < 1e-12);
    for pair in hist[..11].windows(2) {
        assert!(
            (pair[1] / pair[0] - 0.8).abs() < 1e-12,
            "decay ratio broke: {pair:?}"
        );
    }
    // The twelfth decay falls below the floor and snaps to exactly zero.
    assert_eq!(hist[11], 0.0);
    assert_eq!(snap.sensors[&SensorId::VibrationRms].value, 0.0);
}

#[test]
fn start_toggle_round_trip() {
    let mut engine = seeded_engine();
    let lines = collect_audit(&mut engine);

    engine.issue_command("Start");
    assert!(engine.flags().is_running);
    engine.issue_command("Start");
    assert!(!engine.flags().is_running);

    let lines = lines.borrow();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("AUDIT: Process STARTED by operator."));
    assert!(lines[1].contains("AUDIT: Process STOPPED by operator."));
}

#[test]
fn unknown_commands_are_ignored() {
    let mut engine = seeded_engine();
    let lines = collect_audit(&mut engine);
    let before = engine.flags();

    for name in ["FlushDNS", "stop", "", "Start "] {
        engine.issue_command(name);
    }

    assert!(lines.borrow().is_empty());
    assert_eq!(engine.flags(), before);
}

#[test]
fn reboot_freezes_telemetry() {
    let mut engine = seeded_engine();
    engine.issue_command("Reset");
    engine.advance(2_000);

    let snap = engine.snapshot();
    assert!(snap.flags.is_rebooting);
    assert!(!snap.flags.is_running);
    assert!(
        snap.history[&SensorId::Temperature].is_empty(),
        "frozen window appended history"
    );
    assert_eq!(snap.sensors[&SensorId::Temperature].value, 24.5);
}

#[test]
fn reset_restores_baseline_after_delay() {
    let mut engine = seeded_engine();
    engine.issue_command("Start");
    engine.advance(2_000);

    engine.issue_command("Reset");
    assert!(engine.flags().is_rebooting);
    assert!(!engine.flags().is_running);

    engine.advance(3_000);
    let snap = engine.snapshot();
    assert!(!snap.flags.is_rebooting);
    assert_eq!(snap.sensors[&SensorId::Temperature].value, 20.0);
    assert_eq!(snap.sensors[&SensorId::VibrationRms].value, 0.0);
    // Nothing was appended while frozen.
    assert_eq!(snap.history[&SensorId::Temperature].len(), 2);
}

#[test]
fn reset_is_idempotent_while_rebooting() {
    let mut engine = seeded_engine();
    let lines = collect_audit(&mut engine);

    engine.issue_command("Reset");
    engine.advance(1_000);
    engine.issue_command("Reset"); // already rebooting, silently dropped
    engine.advance(2_000);
    engine.advance(1_000); // would catch a duplicated completion

    assert!(!engine.flags().is_rebooting);
    let lines = lines.borrow();
    assert_eq!(lines.len(), 2, "expected begin + complete, got {lines:?}");
    assert!(lines[0].contains("RESET command executed."));
    assert!(lines[1].contains("SYSTEM: Reboot complete. Nodes re-established."));
}

#[test]
fn reboot_window_emits_no_snapshots() {
    let mut engine = seeded_engine();
    engine.issue_command("Reset");
    let count = count_snapshots(&mut engine);

    engine.advance(3_000);
    assert_eq!(*count.borrow(), 0, "frozen ticks must not publish");

    // The first tick after the reboot publishes the restored baseline.
    engine.advance(1_000);
    assert_eq!(*count.borrow(), 1);
    let snap = engine.snapshot();
    let temp = snap.sensors[&SensorId::Temperature].value;
    assert!(
        (temp - 20.45).abs() < 1e-12,
        "expected one smoothing step from 20.0 toward ambient, got {temp}"
    );
    assert_eq!(snap.sensors[&SensorId::VibrationRms].value, 0.0);
}

#[test]
fn failover_flips_primary_then_back() {
    let mut engine = seeded_engine();

    engine.trigger_failover();
    assert!(engine.flags().is_failover_active);
    engine.advance(2_000);
    assert!(!engine.flags().is_failover_active);
    assert_eq!(engine.flags().active_server, ServerRole::Secondary);

    engine.trigger_failover();
    engine.advance(2_000);
    assert_eq!(engine.flags().active_server, ServerRole::Primary);
}

#[test]
fn failover_retrigger_is_ignored_while_active() {
    let mut engine = seeded_engine();
    let lines = collect_audit(&mut engine);

    engine.trigger_failover();
    engine.advance(1_000);
    engine.trigger_failover(); // switch-over in flight, silently dropped
    engine.advance(3_000);

    assert_eq!(engine.flags().active_server, ServerRole::Secondary);
    let lines = lines.borrow();
    assert_eq!(lines.len(), 2, "expected fault + complete, got {lines:?}");
    assert!(lines[0].contains("CRITICAL: Fault detected on Primary server."));
    assert!(lines[1].contains("SYSTEM: Switch-over complete. Active server: Secondary."));
}

#[test]
fn failover_does_not_freeze_telemetry() {
    let mut engine = seeded_engine();
    engine.trigger_failover();
    engine.advance(2_000);

    // Both ticks inside the switch-over window still ran.
    assert_eq!(engine.snapshot().history[&SensorId::Temperature].len(), 2);
}

#[test]
fn failover_initiation_does_not_notify_state() {
    let mut engine = seeded_engine();
    let count = count_snapshots(&mut engine);

    engine.trigger_failover();
    assert_eq!(*count.borrow(), 0, "initiation must not publish state");

    engine.advance(2_000);
    // Two ticks plus the completion's own notification.
    assert_eq!(*count.borrow(), 3);
}

#[test]
fn reset_ignored_during_failover_window() {
    let mut engine = seeded_engine();
    let lines = collect_audit(&mut engine);

    engine.trigger_failover();
    engine.issue_command("Reset"); // rejected while switching over
    engine.advance(2_000);

    assert!(!engine.flags().is_rebooting);
    assert_eq!(engine.flags().active_server, ServerRole::Secondary);
    assert!(
        lines.borrow().iter().all(|line| !line.contains("RESET")),
        "reset must not start during a switch-over"
    );
}

#[test]
fn failover_ignored_while_rebooting() {
    let mut engine = seeded_engine();
    let lines = collect_audit(&mut engine);

    engine.issue_command("Reset");
    engine.trigger_failover(); // rejected while rebooting
    engine.advance(3_000);

    assert_eq!(engine.flags().active_server, ServerRole::Primary);
    assert!(!engine.flags().is_failover_active);
    assert!(
        lines.borrow().iter().all(|line| !line.contains("Fault")),
        "failover must not start during a reboot"
    );
}

#[test]
fn observers_notified_in_registration_order() {
    let mut engine = seeded_engine();
    let order = Rc::new(RefCell::new(Vec::new()));

    for tag in [1u8, 2, 3] {
        let sink = Rc::clone(&order);
        engine.subscribe(Box::new(move |_| sink.borrow_mut().push(tag)));
    }

    engine.advance(2_000);
    assert_eq!(*order.borrow(), vec![1, 2, 3, 1, 2, 3]);
}

#[test]
fn snapshots_are_internally_consistent() {
    let mut engine = seeded_engine();
    engine.subscribe(Box::new(|snap| {
        for id in [SensorId::Temperature, SensorId::VibrationRms] {
            if let Some(last) = snap.history[&id].last() {
                assert_eq!(*last, snap.sensors[&id].value, "{id} history out of sync");
            }
        }
        assert!(
            !(snap.flags.is_rebooting && snap.flags.is_running),
            "rebooting and running at once"
        );
    }));

    engine.issue_command("Start");
    engine.advance(5_000);
    engine.issue_command("Reset");
    engine.advance(4_000);
}

#[test]
fn audit_lines_carry_virtual_timestamps() {
    let mut engine = seeded_engine();
    let lines = collect_audit(&mut engine);

    engine.advance(61_000);
    engine.issue_command("Start");

    let lines = lines.borrow();
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].starts_with("[00:01:01] AUDIT:"),
        "wrong timestamp prefix: {}",
        lines[0]
    );
}
