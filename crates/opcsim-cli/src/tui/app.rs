//! TUI application state and event loop.
//!
//! Design: the dashboard owns the engine and drives it from wall time.
//! Telemetry reaches the UI only through the engine's own subscription
//! channels. The draw code reads a mirrored snapshot and audit log, the
//! same way a detached HMI client would.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use opcsim_core::{
    AuditEvent, Engine, ServerIdentity, Severity, StateFlags, StateSnapshot, format_hms,
};

use crate::address_space::{self, NodeId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lines retained in the audit panel.
const MAX_LOG_LINES: usize = 200;

// ---------------------------------------------------------------------------
// AuditLog
// ---------------------------------------------------------------------------

/// Bounded, newest-first audit line buffer.
#[derive(Debug, Default)]
pub struct AuditLog {
    lines: VecDeque<String>,
}

impl AuditLog {
    pub fn push(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > MAX_LOG_LINES {
            self.lines.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Newest line first, the way the panel renders.
    pub fn newest_first(&self) -> impl Iterator<Item = &String> {
        self.lines.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    engine: Engine,
    log: Rc<RefCell<AuditLog>>,
    latest: Rc<RefCell<StateSnapshot>>,
    refresh_rate: Duration,
    speed: f64,
    cursor: usize,
    inspected: Option<NodeId>,
    paused: bool,
    running: bool,
}

impl App {
    pub fn new(mut engine: Engine, refresh_secs: f64, speed: f64) -> Self {
        let log = Rc::new(RefCell::new(AuditLog::default()));
        let sink = Rc::clone(&log);
        engine.subscribe_audit(Box::new(move |event| {
            sink.borrow_mut().push(event.message.clone());
        }));

        let latest = Rc::new(RefCell::new(engine.snapshot()));
        let mirror = Rc::clone(&latest);
        engine.subscribe(Box::new(move |snap| {
            *mirror.borrow_mut() = snap.clone();
        }));

        // Boot banner, stamped with the virtual clock.
        let policy = engine.identity().security_policy;
        let endpoint = engine.identity().endpoint(engine.flags().active_server);
        for text in [
            "Initializing secure OPC UA stack...".to_string(),
            format!("Security policy {policy} loaded."),
            format!("Endpoint binding on {endpoint} OK."),
        ] {
            let event = AuditEvent::new(engine.now(), "Boot", Severity::System, &text);
            log.borrow_mut().push(event.message);
        }

        Self {
            engine,
            log,
            latest,
            refresh_rate: Duration::from_secs_f64(refresh_secs),
            speed,
            cursor: 0,
            inspected: None,
            paused: false,
            running: true,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook(); // remove our hook
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let mut last_advance = Instant::now();

        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }

            let elapsed = last_advance.elapsed();
            if elapsed >= self.refresh_rate {
                if !self.paused {
                    let units = (elapsed.as_secs_f64() * 1000.0 * self.speed) as u64;
                    self.engine.advance(units);
                }
                last_advance = Instant::now();
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('s') => self.engine.issue_command("Start"),
            KeyCode::Char('r') => self.engine.issue_command("Reset"),
            KeyCode::Char('f') => self.engine.trigger_failover(),
            KeyCode::Char('p') => self.paused = !self.paused,
            KeyCode::Char('c') => self.log.borrow_mut().clear(),
            KeyCode::Up | KeyCode::Char('k') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor < NodeId::ALL.len() - 1 {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.inspect_node(),
            KeyCode::Char('w') => self.write_snapshot(),
            _ => {}
        }
    }

    fn inspect_node(&mut self) {
        let node = NodeId::ALL[self.cursor];
        self.inspected = Some(node);
        let attrs = address_space::node_attributes(node);
        self.log.borrow_mut().push(format!(
            "[{}] EXPLORE: Inspecting NodeId: {}",
            format_hms(self.engine.now()),
            attrs.qualified_id()
        ));
    }

    fn write_snapshot(&mut self) {
        let path = "opcsim-snapshot.json";
        let line = match crate::commands::export_snapshot(&self.engine, path) {
            Ok(()) => format!(
                "[{}] EXPORT: Snapshot written to {path}",
                format_hms(self.engine.now())
            ),
            Err(e) => format!(
                "[{}] EXPORT: Snapshot failed: {e}",
                format_hms(self.engine.now())
            ),
        };
        self.log.borrow_mut().push(line);
    }

    // --- Accessors for the draw code ---

    /// Last snapshot the engine published.
    pub fn latest(&self) -> StateSnapshot {
        self.latest.borrow().clone()
    }

    pub fn flags(&self) -> StateFlags {
        self.engine.flags()
    }

    pub fn sim_clock(&self) -> String {
        format_hms(self.engine.now())
    }

    pub fn identity(&self) -> &ServerIdentity {
        self.engine.identity()
    }

    pub fn log_lines(&self, max: usize) -> Vec<String> {
        self.log
            .borrow()
            .newest_first()
            .take(max)
            .cloned()
            .collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn inspected(&self) -> Option<NodeId> {
        self.inspected
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
