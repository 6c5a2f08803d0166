//! CLI display utilities for formatting output

use crate::core::styles::StyleRole;
use crate::store::QueueState;
use std::fmt::Write;

/// Render `cbq status` output
///
/// Items are numbered from 1 in storage order; line breaks inside an item
/// are shown as `\n` so each item stays on one line.
pub fn render_status(state: &QueueState, use_color: bool) -> String {
    let capture = if state.active {
        StyleRole::Active.paint("active", use_color)
    } else {
        StyleRole::Inactive.paint("inactive", use_color)
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}  {} {}",
        StyleRole::Key.paint("Capture:", use_color),
        capture,
        StyleRole::Key.paint("Mode:", use_color),
        StyleRole::Value.paint(&state.mode.to_string(), use_color),
    );

    if state.is_empty() {
        let _ = writeln!(out, "{}", StyleRole::Dim.paint("Queue is empty", use_color));
        return out;
    }

    let next = match state.mode {
        crate::store::Mode::Queue => 0,
        crate::store::Mode::Stack => state.len() - 1,
    };
    for (index, item) in state.items.iter().enumerate() {
        let marker = if index == next { " <- next" } else { "" };
        let _ = writeln!(
            out,
            "{}: {}{}",
            StyleRole::Index.paint(&(index + 1).to_string(), use_color),
            single_line(item),
            StyleRole::Dim.paint(marker, use_color && !marker.is_empty()),
        );
    }
    out
}

fn single_line(item: &str) -> String {
    item.replace('\r', "\\r").replace('\n', "\\n")
}
