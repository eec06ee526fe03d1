//! Batch processing: the per-file pipeline and the worker pool around it.
//!
//! ## Single-File Pipeline
//!
//! ```text
//! read bytes → sniff format → resolve output path ─┬─ exists, no overwrite → Skipped
//!                                                  └─ decode → composite → encode → store
//! ```
//!
//! The overwrite check runs before decoding, so skipped files cost one read.
//! Two inputs may still race for one output name (`x.png` and `x.jpg` both
//! become `x.png`), so the encoded bytes go to a temp file in the output
//! directory and are renamed into place. Without overwrite the rename refuses
//! to replace an existing file, and the job that loses is reported as skipped.
//!
//! ## Parallel Processing
//!
//! A directory input is drained by a fixed pool of workers (8 by default)
//! running on a [rayon](https://docs.rs/rayon) thread pool. The calling thread
//! is the producer: it lists the directory into a bounded
//! [crossbeam](https://docs.rs/crossbeam) channel, blocking whenever the queue
//! is full, and closes the channel when the listing ends. Each worker pulls
//! one job at a time and runs it to completion before asking for the next.
//! The pool's scope returning is the barrier: every worker has seen the closed
//! queue and finished its last job.
//!
//! A failing job is reported and counted; it never stops other jobs or the
//! pool. Only an unusable input root or output directory aborts a run, and
//! both are checked before any job starts.

use crate::config::{OutputPolicy, PoolConfig};
use crate::imaging::{CodecError, GeometryError, ImageCodec, ImageFormatTag, RustCodec, composite};
use crate::naming;
use crate::scan::{self, InputSource, Job, ScanError};
use crossbeam::channel::Receiver;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Fatal errors: the run stops before any job is processed.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Failed to create output directory {path}: {source}")]
    OutputDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Per-job errors. Reported against the input file, never propagated.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Decode error: {0}")]
    Decode(#[source] CodecError),
    #[error("Invalid image: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Encode error: {0}")]
    Encode(#[source] CodecError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Input has no file name: {0}")]
    NoFileName(PathBuf),
}

/// What a successful job did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Output encoded and written.
    Written {
        output: PathBuf,
        format: ImageFormatTag,
        bleed_px: u32,
        width: u32,
        height: u32,
    },
    /// Output already existed and overwriting is disabled.
    Skipped { output: PathBuf },
}

/// Progress event for a finished job, streamed to the CLI printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Written {
        input: PathBuf,
        output: PathBuf,
        bleed_px: u32,
        width: u32,
        height: u32,
    },
    Skipped {
        input: PathBuf,
        output: PathBuf,
    },
    Failed {
        input: PathBuf,
        error: String,
    },
}

/// Counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.written + self.skipped + self.failed
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} written, {} skipped, {} failed",
            self.written, self.skipped, self.failed
        )
    }
}

/// Shared counters, bumped by workers as jobs finish.
#[derive(Default)]
struct Tally {
    written: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl Tally {
    fn summary(&self) -> RunSummary {
        RunSummary {
            written: self.written.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Process `input` (a file or a directory) into `output_dir` with the `image` codec.
pub fn process(
    input: &Path,
    output_dir: &Path,
    policy: &OutputPolicy,
    pool: &PoolConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    process_with_codec(&RustCodec::new(), input, output_dir, policy, pool, events)
}

/// Process using a specific codec (allows testing with mock).
pub fn process_with_codec(
    codec: &impl ImageCodec,
    input: &Path,
    output_dir: &Path,
    policy: &OutputPolicy,
    pool: &PoolConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    let source = scan::resolve_input(input)?;
    fs::create_dir_all(output_dir).map_err(|source| ProcessError::OutputDirCreate {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let tally = Tally::default();
    let events = events.as_ref();
    match source {
        InputSource::Single(job) => {
            run_job(codec, &job, output_dir, policy, &tally, events);
        }
        InputSource::Directory { root, entries } => {
            let thread_pool = rayon::ThreadPoolBuilder::new()
                .num_threads(pool.workers)
                .thread_name(|i| format!("bleeder-worker-{i}"))
                .build()?;
            tracing::info!(
                dir = %root.display(),
                workers = pool.workers,
                queue_capacity = pool.queue_capacity,
                "starting worker pool"
            );

            let (tx, rx) = crossbeam::channel::bounded::<Job>(pool.queue_capacity);
            let tally = &tally;
            thread_pool.in_place_scope(|scope| {
                for worker in 0..pool.workers {
                    let rx = rx.clone();
                    scope.spawn(move |_| {
                        worker_loop(worker, codec, rx, output_dir, policy, tally, events)
                    });
                }
                // Only workers hold receivers now; if they all die the producer stops.
                drop(rx);
                let queued = scan::queue_directory_jobs(&root, entries, tx);
                tracing::info!(queued, "all jobs queued");
            });
        }
    }

    let summary = tally.summary();
    tracing::info!(%summary, "run finished");
    Ok(summary)
}

/// Drain the queue until it is closed and empty.
fn worker_loop(
    worker: usize,
    codec: &impl ImageCodec,
    jobs: Receiver<Job>,
    output_dir: &Path,
    policy: &OutputPolicy,
    tally: &Tally,
    events: Option<&Sender<ProcessEvent>>,
) {
    let mut handled = 0usize;
    for job in jobs.iter() {
        run_job(codec, &job, output_dir, policy, tally, events);
        handled += 1;
    }
    tracing::debug!(worker, handled, "worker exiting");
}

/// Run one job, then count and report its outcome. Never fails.
fn run_job(
    codec: &impl ImageCodec,
    job: &Job,
    output_dir: &Path,
    policy: &OutputPolicy,
    tally: &Tally,
    events: Option<&Sender<ProcessEvent>>,
) {
    let input = job.input.clone();
    let event = match process_file(codec, job, output_dir, policy) {
        Ok(JobOutcome::Written {
            output,
            bleed_px,
            width,
            height,
            ..
        }) => {
            tally.written.fetch_add(1, Ordering::Relaxed);
            ProcessEvent::Written {
                input,
                output,
                bleed_px,
                width,
                height,
            }
        }
        Ok(JobOutcome::Skipped { output }) => {
            tally.skipped.fetch_add(1, Ordering::Relaxed);
            ProcessEvent::Skipped { input, output }
        }
        Err(e) => {
            tally.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(input = %input.display(), error = %e, "job failed");
            ProcessEvent::Failed {
                input,
                error: e.to_string(),
            }
        }
    };
    if let Some(tx) = events {
        // A gone printer only loses progress lines.
        let _ = tx.send(event);
    }
}

/// The full single-image pipeline for one job.
#[tracing::instrument(level = "debug", skip_all, fields(input = %job.input.display()))]
pub fn process_file(
    codec: &impl ImageCodec,
    job: &Job,
    output_dir: &Path,
    policy: &OutputPolicy,
) -> Result<JobOutcome, JobError> {
    let bytes = fs::read(&job.input).map_err(|source| JobError::Read {
        path: job.input.clone(),
        source,
    })?;

    let detected = codec.detect_format(&bytes).map_err(JobError::Decode)?;
    let format = policy.target_format.resolve(detected);
    let output = naming::output_path(&job.input, output_dir, format)
        .ok_or_else(|| JobError::NoFileName(job.input.clone()))?;

    if !policy.overwrite_existing && output.exists() {
        tracing::debug!(output = %output.display(), "output exists, skipping");
        return Ok(JobOutcome::Skipped { output });
    }

    let decoded = codec.decode(&bytes).map_err(JobError::Decode)?;
    let (bled, geometry) = composite(&decoded, policy.corner_fix)?;
    tracing::debug!(
        width = decoded.width(),
        height = decoded.height(),
        bleed_px = geometry.bleed_px,
        %format,
        "composited"
    );

    let encoded = codec
        .encode(&bled.pixels, format, policy.jpeg_quality)
        .map_err(JobError::Encode)?;
    if !store_output(&encoded, output_dir, &output, policy.overwrite_existing)? {
        tracing::debug!(output = %output.display(), "output appeared meanwhile, skipping");
        return Ok(JobOutcome::Skipped { output });
    }

    Ok(JobOutcome::Written {
        output,
        format,
        bleed_px: geometry.bleed_px,
        width: bled.width(),
        height: bled.height(),
    })
}

/// Write `encoded` to a temp file in `output_dir` and rename it to `output`.
///
/// Returns `false`, leaving the existing file untouched, when `overwrite` is
/// off and `output` already exists at rename time.
fn store_output(
    encoded: &[u8],
    output_dir: &Path,
    output: &Path,
    overwrite: bool,
) -> Result<bool, JobError> {
    let write_error = |source: std::io::Error| JobError::Write {
        path: output.to_path_buf(),
        source,
    };
    let mut staged = tempfile::NamedTempFile::new_in(output_dir).map_err(write_error)?;
    staged.write_all(encoded).map_err(write_error)?;

    let persisted = if overwrite {
        staged.persist(output)
    } else {
        staged.persist_noclobber(output)
    };
    match persisted {
        Ok(_) => Ok(true),
        Err(e) if !overwrite && e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(write_error(e.error)),
    }
}
