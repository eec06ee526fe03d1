//! CLI output formatting.
//!
//! One line per finished job, in completion order (not directory order):
//!
//! ```text
//! Adding bleed to image: forest.png -> bleeder_out/forest.png (36px, 822x1122)
//! Output file exists, skipping: island.png
//! Failed: cards/broken.jpg: Decode error: Unrecognized image data: ...
//! ```
//!
//! followed by the run summary:
//!
//! ```text
//! 2 written, 1 skipped, 1 failed
//! Done! See results in bleeder_out
//! ```
//!
//! Format functions are pure and return strings; the binary prints them.

use crate::naming::display_name;
use crate::process::{ProcessEvent, RunSummary};
use std::path::Path;

/// Format the line reported for one finished job.
///
/// Failures name the full input path so the offending file can be found.
pub fn format_process_event(event: &ProcessEvent) -> String {
    match event {
        ProcessEvent::Written {
            input,
            output,
            bleed_px,
            width,
            height,
        } => format!(
            "Adding bleed to image: {} -> {} ({}px, {}x{})",
            display_name(input),
            output.display(),
            bleed_px,
            width,
            height
        ),
        ProcessEvent::Skipped { input, .. } => {
            format!("Output file exists, skipping: {}", display_name(input))
        }
        ProcessEvent::Failed { input, error } => {
            format!("Failed: {}: {}", input.display(), error)
        }
    }
}

/// Format the closing lines of a run.
pub fn format_summary(summary: &RunSummary, output_dir: &Path) -> Vec<String> {
    vec![
        summary.to_string(),
        format!("Done! See results in {}", output_dir.display()),
    ]
}

pub fn print_summary(summary: &RunSummary, output_dir: &Path) {
    for line in format_summary(summary, output_dir) {
        println!("{}", line);
    }
}
