//! CLI for opcsim — a simulated OPC UA plant in your terminal.

mod address_space;
mod commands;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "opcsim")]
#[command(about = "opcsim — simulated OPC UA plant telemetry in your terminal")]
#[command(version = opcsim_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live interactive plant dashboard (TUI)
    Monitor {
        /// Seconds of wall time between simulation advances
        #[arg(long, default_value = "0.25")]
        refresh: f64,

        /// Simulation speed multiplier (2.0 = twice real time)
        #[arg(long, default_value = "1.0")]
        speed: f64,

        /// Seed for the vibration noise generator (default: OS entropy)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run the simulation headless and print telemetry to stdout
    Run {
        /// Number of ticks to simulate (0 = run until Ctrl+C)
        #[arg(long, default_value = "30")]
        ticks: u64,

        /// Seed for the vibration noise generator (default: OS entropy)
        #[arg(long)]
        seed: Option<u64>,

        /// Inject an operator command before a tick, as TICK:COMMAND
        /// (repeatable; commands: start, stop, reset, failover)
        #[arg(long = "at")]
        at: Vec<String>,

        /// Pace the run at one tick per simulated tick interval of wall time
        #[arg(long)]
        real_time: bool,

        /// Write a JSON snapshot of the final state to this path
        #[arg(long)]
        output: Option<String>,
    },

    /// List the simulated OPC UA address space
    Nodes,

    /// Show server identity, endpoints and simulation timing
    Info,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Monitor {
            refresh,
            speed,
            seed,
        } => commands::monitor::run(refresh, speed, seed),
        Commands::Run {
            ticks,
            seed,
            at,
            real_time,
            output,
        } => commands::run::run(ticks, seed, &at, real_time, output.as_deref()),
        Commands::Nodes => commands::nodes::run(),
        Commands::Info => commands::info::run(),
    }
}
