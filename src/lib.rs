//! # Bleeder
//!
//! Adds a print bleed to card images in batch. Each image gets a black
//! border sized proportionally to its own width, so the artwork survives an
//! imprecise trim at the print shop.
//!
//! # Architecture: Producer, Pool, Pipeline
//!
//! ```text
//! input dir ──scan──▶ bounded queue ──▶ N workers, each:
//!                                        read → sniff → decode → composite → encode → write
//! ```
//!
//! A single file skips the queue and runs the same pipeline directly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Resolves the input root; lists a directory into jobs |
//! | [`process`] | Single-image pipeline, worker pool, run orchestration |
//! | [`imaging`] | Bleed geometry, compositing, corner repair, codec |
//! | [`naming`] | Output file names from input names and the output format |
//! | [`config`] | `bleeder.toml` loading, validation, output policy |
//! | [`output`] | CLI line formatting for job events and the run summary |
//!
//! # Design Decisions
//!
//! ## Bleed From Width Alone
//!
//! The finished card width is a known physical constant (2.48in) and so is
//! the bleed allowance (0.24in). Pixel width divided by card width gives the
//! DPI, so the bleed in pixels follows from the width alone, whatever the
//! source resolution. The flip side: an image that already has bleed gets
//! more of it. Running the tool twice grows the image twice.
//!
//! ## Immutable Shared Configuration
//!
//! Flags and `bleeder.toml` are merged once at startup into an
//! [`config::OutputPolicy`]. Workers only ever see `&OutputPolicy`; nothing
//! is shared mutably between them except the job queue and outcome counters.
//!
//! ## Per-Job Failure Isolation
//!
//! A corrupt file fails its own job and nothing else. Only a missing input
//! root or an output directory that can't be created stops a run, and those
//! are checked before the first job starts.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
