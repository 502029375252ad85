use std::fmt::Write as _;

use super::frame::{Frame, StatusLine};

/// Something frames can be painted onto.
pub trait Surface {
    fn paint(&mut self, frame: &Frame);
}

/// Renders frames as plain text. Keeps the last rendering and a paint counter.
#[derive(Debug, Default, Clone)]
pub struct TextSurface {
    text: String,
    paints: usize,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent rendering.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of frames painted so far.
    pub fn paints(&self) -> usize {
        self.paints
    }
}

impl Surface for TextSurface {
    fn paint(&mut self, frame: &Frame) {
        self.text = render_text(frame);
        self.paints += 1;
    }
}

/// Plain-text rendering of a frame: `|`-separated cells, then footer and status lines.
pub fn render_text(frame: &Frame) -> String {
    let mut out = String::new();
    match frame {
        Frame::Table(t) => {
            let header: Vec<String> = t.headers.iter().map(|h| h.label()).collect();
            let _ = writeln!(out, "{}", header.join(" | "));
            for row in &t.rows {
                let _ = writeln!(out, "{}", row.join(" | "));
            }
            let _ = writeln!(
                out,
                "{} · {} · prev:{} next:{}",
                t.row_count,
                t.page_info,
                on_off(t.prev_enabled),
                on_off(t.next_enabled)
            );
            write_status(&mut out, &t.status);
        }
        Frame::Diagnostic { message, status } => {
            let _ = writeln!(out, "{message}");
            write_status(&mut out, status);
        }
    }
    out
}

fn write_status(out: &mut String, status: &StatusLine) {
    let _ = writeln!(out, "{}", status.text);
    for e in &status.errors {
        let _ = writeln!(out, "error: {e}");
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
