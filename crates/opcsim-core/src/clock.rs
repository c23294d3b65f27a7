//! Virtual-clock formatting.
//!
//! The engine counts simulated milliseconds since construction. Audit lines
//! and the dashboard clock render that uptime as `HH:MM:SS`, wrapping at 24
//! hours like a wall clock.

/// Format simulated milliseconds as `HH:MM:SS`.
pub fn format_hms(units: u64) -> String {
    let secs = units / 1000;
    let sec = secs % 60;
    let min = (secs / 60) % 60;
    let hour = (secs / 3600) % 24;
    format!("{:02}:{:02}:{:02}", hour, min, sec)
}
