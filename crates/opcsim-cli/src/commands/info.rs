//! `opcsim info` — print server identity and simulation timing.

use opcsim_core::{EngineConfig, ServerIdentity, ServerRole};

pub fn run() {
    let identity = ServerIdentity::default();
    let config = EngineConfig::default();

    println!("Server identity");
    println!("  Application:   {}", identity.application_name);
    println!(
        "  Security:      {} / {}",
        identity.security_policy, identity.message_security_mode
    );
    println!("  Primary:       {}", identity.endpoint(ServerRole::Primary));
    println!(
        "  Secondary:     {}",
        identity.endpoint(ServerRole::Secondary)
    );
    println!();
    println!("Simulation timing (simulated milliseconds)");
    println!("  Tick interval: {}", config.tick_interval);
    println!("  Reset reboot:  {}", config.reset_delay);
    println!("  Failover:      {}", config.failover_delay);
}
