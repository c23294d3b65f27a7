//! `opcsim monitor` — launch the interactive dashboard.

pub fn run(refresh: f64, speed: f64, seed: Option<u64>) {
    let engine = super::build_engine(seed);
    let mut app = crate::tui::app::App::new(engine, refresh, speed);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
