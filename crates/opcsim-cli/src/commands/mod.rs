pub mod info;
pub mod monitor;
pub mod nodes;
pub mod run;

use std::io;

use opcsim_core::{Engine, EngineConfig};

/// Build an engine, optionally seeding the vibration noise generator.
pub fn build_engine(seed: Option<u64>) -> Engine {
    Engine::new(EngineConfig {
        seed,
        ..EngineConfig::default()
    })
}

/// Write the current engine state as pretty-printed JSON.
pub fn export_snapshot(engine: &Engine, path: &str) -> io::Result<()> {
    let report = serde_json::json!({
        "opcsim_version": opcsim_core::VERSION,
        "elapsed_ms": engine.now(),
        "state": engine.snapshot(),
    });
    let contents = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, contents)
}

/// Operator action accepted by `--at TICK:COMMAND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Reset,
    Failover,
}

/// One scheduled operator action of a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledCommand {
    pub tick: u64,
    pub action: Action,
}

/// Parse one `--at` entry of the form `TICK:COMMAND`.
pub fn parse_schedule_entry(entry: &str) -> Result<ScheduledCommand, String> {
    let (tick, action) = entry
        .split_once(':')
        .ok_or_else(|| format!("expected TICK:COMMAND, got '{entry}'"))?;

    let tick: u64 = tick
        .trim()
        .parse()
        .map_err(|_| format!("invalid tick number in '{entry}'"))?;

    let action = match action.trim().to_ascii_lowercase().as_str() {
        // Start toggles, so "stop" is the same engine command.
        "start" | "stop" => Action::Start,
        "reset" => Action::Reset,
        "failover" => Action::Failover,
        other => {
            return Err(format!(
                "unknown command '{other}' (expected start, stop, reset or failover)"
            ));
        }
    };

    Ok(ScheduledCommand { tick, action })
}

/// Feed one parsed action into the engine.
pub fn apply_action(engine: &mut Engine, action: Action) {
    match action {
        Action::Start => engine.issue_command("Start"),
        Action::Reset => engine.issue_command("Reset"),
        Action::Failover => engine.trigger_failover(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // parse_schedule_entry tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_basic_entry() {
        assert_eq!(
            parse_schedule_entry("5:start"),
            Ok(ScheduledCommand {
                tick: 5,
                action: Action::Start
            })
        );
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(
            parse_schedule_entry(" 12 : FAILOVER "),
            Ok(ScheduledCommand {
                tick: 12,
                action: Action::Failover
            })
        );
    }

    #[test]
    fn test_parse_stop_aliases_start() {
        assert_eq!(
            parse_schedule_entry("20:stop").map(|c| c.action),
            Ok(Action::Start)
        );
    }

    #[test]
    fn test_parse_rejects_malformed_entries() {
        assert!(parse_schedule_entry("start").is_err());
        assert!(parse_schedule_entry("abc:start").is_err());
        assert!(parse_schedule_entry("3:restart").is_err());
        assert!(parse_schedule_entry("").is_err());
    }

    // -----------------------------------------------------------------------
    // apply_action tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_apply_action_reaches_engine() {
        let mut engine = build_engine(Some(1));
        apply_action(&mut engine, Action::Start);
        assert!(engine.flags().is_running);

        apply_action(&mut engine, Action::Failover);
        assert!(engine.flags().is_failover_active);
    }

    #[test]
    fn test_build_engine_is_seedable() {
        let mut a = build_engine(Some(9));
        let mut b = build_engine(Some(9));
        for engine in [&mut a, &mut b] {
            engine.issue_command("Start");
            engine.advance(3_000);
        }
        assert_eq!(a.snapshot().history, b.snapshot().history);
    }

    // -----------------------------------------------------------------------
    // export_snapshot tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_export_snapshot_writes_full_state() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snap.json");
        let mut engine = build_engine(Some(3));
        engine.issue_command("Start");
        engine.advance(5_000);

        export_snapshot(&engine, path.to_str().unwrap()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();

        assert_eq!(value["opcsim_version"], opcsim_core::VERSION);
        assert_eq!(value["elapsed_ms"], 5_000);
        assert_eq!(value["state"]["flags"]["is_running"], true);
        assert_eq!(value["state"]["flags"]["active_server"], "Primary");
        assert_eq!(
            value["state"]["history"]["Temperature"]
                .as_array()
                .unwrap()
                .len(),
            5
        );
        let temp = value["state"]["sensors"]["Temperature"]["value"]
            .as_f64()
            .unwrap();
        assert!(temp > 24.5, "running plant should heat up, got {temp}");
    }
}
