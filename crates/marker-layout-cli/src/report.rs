//! Plain-text replay report.

use marker_layout::{AbstractMarker, MarkerStatus};

use crate::scene::Frame;

/// Text report of a scene replay, one block per frame.
#[derive(Debug, Default)]
pub struct Report {
    text: String,
    full_updates: usize,
    soft_updates: usize,
    skipped: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the block of a frame
    pub fn frame(&mut self, index: usize, frame: &Frame) {
        let center = frame.center();
        let mode = if frame.is_soft() { " (soft)" } else { "" };
        self.line(&format!(
            "frame {index}: center [{:.4}, {:.4}] zoom {:.2}{mode}",
            center.lng(),
            center.lat(),
            frame.zoom()
        ));
    }

    pub fn not_ready(&mut self) {
        self.skipped += 1;
        self.line("  map not ready");
    }

    pub fn status(&mut self, status: &MarkerStatus) {
        self.full_updates += 1;
        self.markers("new", status.new_markers().values());
        self.markers("updated", status.updated().values());
        self.markers("removed", status.removed().values());
    }

    pub fn soft<'a>(&mut self, present: impl Iterator<Item = &'a AbstractMarker>) {
        self.soft_updates += 1;
        self.markers("moved", present);
    }

    /// Appends the summary line and returns the report text
    pub fn finish(mut self) -> String {
        let frames = self.full_updates + self.soft_updates + self.skipped;
        let summary = format!(
            "summary: {frames} frames, {} full updates, {} soft updates, {} skipped",
            self.full_updates, self.soft_updates, self.skipped
        );
        self.line(&summary);
        self.text
    }

    fn markers<'a>(&mut self, label: &str, markers: impl Iterator<Item = &'a AbstractMarker>) {
        for marker in markers {
            self.line(&format!("  {label:<8} {marker}"));
        }
    }

    fn line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }
}
