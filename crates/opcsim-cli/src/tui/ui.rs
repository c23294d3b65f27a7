//! TUI rendering — industrial HMI layout.
//!
//! ┌───────────────────────────────────────────────────┐
//! │ ⚙ opcsim  RUNNING  opc.tcp://localhost:4840  0:42 │
//! ├─────────────────────────┬─────────────────────────┤
//! │ Temperature (°C)        │ Vibration RMS (mm/s)    │
//! │ 64.2                    │ 0.052                   │
//! │ ▁▂▄▆▇█▇▆▄▂▁▂▄▆▇         │ ▁▁▂▁▂▁▂▂▁▂▁▁▂▁▂         │
//! ├───────────────┬─────────┴─────────────────────────┤
//! │ Address space │  Audit log                        │
//! │ ▸ Root        │  > [00:00:42] AUDIT: Process ...  │
//! │   Objects     │  > [00:00:00] SYSTEM: Endpoint... │
//! │   ...         │                                   │
//! ├───────────────┤                                   │
//! │ Attributes    │                                   │
//! ├───────────────┴───────────────────────────────────┤
//! │ s: start/stop  r: reset  f: failover  q: quit     │
//! └───────────────────────────────────────────────────┘

use super::app::App;
use ratatui::{prelude::*, widgets::*};

use opcsim_core::{SensorId, ServerRole, StateFlags, StateSnapshot};

use crate::address_space::{self, NodeId};

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(8), // sensor cards
            Constraint::Min(10),   // browser + audit log
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_sensors(f, rows[1], app);
    draw_main(f, rows[2], app);
    draw_keys(f, rows[3]);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let flags = app.flags();
    let (label, color) = state_style(&flags);
    let endpoint = app.identity().endpoint(flags.active_server);
    let endpoint_color = match flags.active_server {
        ServerRole::Primary => Color::Cyan,
        ServerRole::Secondary => Color::Magenta,
    };
    let paused = if app.is_paused() { "  paused" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" ⚙ opcsim ", Style::default().bold().fg(Color::Cyan)),
            Span::styled(format!(" {label} "), Style::default().bold().fg(color)),
            Span::raw("  "),
            Span::styled(endpoint, Style::default().fg(endpoint_color)),
            Span::styled(
                format!("  {}  x{:.1}{paused} ", app.sim_clock(), app.speed()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    f.render_widget(block, area);
}

fn draw_sensors(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let snap = app.latest();
    let flags = app.flags();

    draw_sensor_card(
        f,
        cols[0],
        &snap,
        &flags,
        SensorId::Temperature,
        0.0,
        100.0,
        Color::Cyan,
    );
    draw_sensor_card(
        f,
        cols[1],
        &snap,
        &flags,
        SensorId::VibrationRms,
        0.0,
        0.1,
        Color::Magenta,
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_sensor_card(
    f: &mut Frame,
    area: Rect,
    snap: &StateSnapshot,
    flags: &StateFlags,
    id: SensorId,
    min: f64,
    max: f64,
    color: Color,
) {
    let reading = snap.sensors[&id];

    // A rebooting PLC shows no data at all; a switch-over masks values
    // until the standby server takes over.
    let (text, style) = if flags.is_rebooting {
        match id {
            SensorId::Temperature => ("OFFLINE".to_string(), Style::default().bold().fg(Color::Red)),
            SensorId::VibrationRms => ("---".to_string(), Style::default().fg(Color::DarkGray)),
        }
    } else if flags.is_failover_active {
        match id {
            SensorId::Temperature => (
                "SWITCHING...".to_string(),
                Style::default().bold().fg(Color::Yellow),
            ),
            SensorId::VibrationRms => ("---".to_string(), Style::default().fg(Color::DarkGray)),
        }
    } else {
        let text = match id {
            SensorId::Temperature => format!("{:.1}", reading.value),
            SensorId::VibrationRms => format!("{:.3}", reading.value),
        };
        (text, Style::default().bold().fg(Color::White))
    };

    let dimmed = flags.is_rebooting;
    let accent = if dimmed { Color::DarkGray } else { color };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(format!(" {} ({}) ", id, reading.unit));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    f.render_widget(Paragraph::new(text).style(style), parts[0]);

    let spark = Sparkline::default()
        .data(scale_series(&snap.history[&id], min, max))
        .max(100)
        .style(Style::default().fg(accent));
    f.render_widget(spark, parts[1]);
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(12)])
        .split(cols[0]);

    draw_node_browser(f, left[0], app);
    draw_attributes(f, left[1], app);
    draw_audit_log(f, cols[1], app);
}

fn draw_node_browser(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = NodeId::ALL
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            let attrs = address_space::node_attributes(node);
            let pointer = if i == app.cursor() { "▸ " } else { "  " };
            let marker = if app.inspected() == Some(node) {
                " ●"
            } else {
                ""
            };
            let style = if i == app.cursor() {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else if attrs.node_class == "Variable" {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(format!("{pointer}{}{marker}", attrs.browse_name)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Address space "),
    );
    f.render_widget(list, area);
}

fn draw_attributes(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Attributes ");

    let Some(node) = app.inspected() else {
        let hint = Paragraph::new("Press enter to inspect a node")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    };

    let attrs = address_space::node_attributes(node);
    let flags = app.flags();
    let live = if flags.is_rebooting || flags.is_failover_active {
        None
    } else {
        address_space::sensor_binding(node)
            .map(|id| format!("{:.4}", app.latest().sensors[&id].value))
    };

    let mut lines = vec![
        attr_line("NodeId", &attrs.qualified_id()),
        attr_line("BrowseName", attrs.browse_name),
        attr_line("NodeClass", attrs.node_class),
        attr_line("IdentifierType", attrs.identifier_type),
        attr_line("DataType", attrs.data_type.unwrap_or("-")),
        attr_line("AccessLevel", attrs.access_level),
        attr_line("UserAccessLevel", attrs.user_access_level),
        attr_line("Description", attrs.description.unwrap_or("-")),
    ];
    if let Some(value) = &live {
        lines.push(attr_line("Value", value));
    }

    let p = Paragraph::new(lines).block(block);
    f.render_widget(p, area);
}

fn attr_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<16}"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value.to_string()),
    ])
}

fn draw_audit_log(f: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .log_lines(visible)
        .into_iter()
        .map(|line| {
            let style = line_style(&line);
            Line::styled(format!("> {line}"), style)
        })
        .collect();

    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Audit log "),
    );
    f.render_widget(p, area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let bar = Paragraph::new(
        " s: start/stop   r: reset   f: failover   ↑↓: nodes   enter: inspect   w: snapshot   p: pause   c: clear   q: quit",
    )
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Badge text and color for the title bar.
fn state_style(flags: &StateFlags) -> (&'static str, Color) {
    if flags.is_rebooting {
        ("REBOOTING", Color::Yellow)
    } else if flags.is_failover_active {
        ("FAILOVER", Color::Red)
    } else if flags.is_running {
        ("RUNNING", Color::Green)
    } else {
        ("STOPPED", Color::DarkGray)
    }
}

/// Map raw readings onto 0..=100 sparkline bars against a fixed range.
fn scale_series(values: &[f64], min: f64, max: f64) -> Vec<u64> {
    values
        .iter()
        .map(|&v| (((v - min) / (max - min)) * 100.0).clamp(0.0, 100.0) as u64)
        .collect()
}

/// Color a log line by the severity keyword it carries.
fn line_style(line: &str) -> Style {
    if line.contains("CRITICAL") {
        Style::default().fg(Color::Red).bold()
    } else if line.contains("AUDIT") {
        Style::default().fg(Color::Yellow)
    } else if line.contains("SYSTEM") {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
