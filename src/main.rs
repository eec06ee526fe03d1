use bleeder::{config, output, process};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "bleeder")]
#[command(about = "Add a print bleed to card images")]
#[command(long_about = "\
Add a print bleed to card images

Each image gets a black border sized from its own width: the bleed is the
fixed physical ratio 0.24in / 2.48in of the card width, split evenly between
opposite edges. A 750x1050 card becomes 822x1122.

The input may be a single file or a directory. Directories are not searched
recursively; only .png, .jpg and .jpeg files are picked up.

Settings can also come from a bleeder.toml in the working directory (or
--config). Flags override the file. Run 'bleeder gen-config' for a
documented template.")]
#[command(version)]
struct Cli {
    /// File or folder to read from
    #[arg(short, long, default_value = ".")]
    input: PathBuf,

    /// Folder to write results to (created if missing)
    #[arg(short, long = "out", default_value = "./bleeder_out")]
    output: PathBuf,

    /// Overwrite output images that already exist
    #[arg(short = 'w', long, overrides_with = "no_overwrite")]
    overwrite: bool,

    /// Keep existing output images, even if bleeder.toml sets overwrite
    #[arg(long, overrides_with = "overwrite")]
    no_overwrite: bool,

    /// Output format; auto keeps each input's format
    #[arg(long = "fmt", value_enum)]
    format: Option<config::OutputFormat>,

    /// JPEG corner fix: black out light artifacts at the corners of JPEG cards
    #[arg(long = "jcf", overrides_with = "no_jpeg_corner_fix")]
    jpeg_corner_fix: bool,

    /// Disable the JPEG corner fix, even if bleeder.toml enables it
    #[arg(long = "no-jcf", overrides_with = "jpeg_corner_fix")]
    no_jpeg_corner_fix: bool,

    /// JPEG output quality (1-100)
    #[arg(long)]
    quality: Option<u32>,

    /// Parallel workers for directory input
    #[arg(long)]
    workers: Option<usize>,

    /// Config file (defaults to ./bleeder.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock bleeder.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::GenConfig) = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    init_tracing(cli.verbose);

    let mut settings = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&std::env::current_dir()?)?,
    };
    apply_cli_overrides(&mut settings, &cli);
    settings.validate()?;

    let policy = settings.output_policy();
    let pool = settings.pool_config();

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            println!("{}", output::format_process_event(&event));
        }
    });
    let result = process::process(&cli.input, &cli.output, &policy, &pool, Some(tx));
    // The sender is gone either way, so the printer drains and exits.
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    let summary = result?;

    output::print_summary(&summary, &cli.output);
    Ok(())
}

/// Flags win over the config file. Of a `--x`/`--no-x` pair the last one given wins.
fn apply_cli_overrides(settings: &mut config::BleedConfig, cli: &Cli) {
    if let Some(format) = cli.format {
        settings.output_format = format;
    }
    if let Some(overwrite) = switch(cli.overwrite, cli.no_overwrite) {
        settings.overwrite = overwrite;
    }
    if let Some(fix) = switch(cli.jpeg_corner_fix, cli.no_jpeg_corner_fix) {
        settings.jpeg_corner_fix = fix;
    }
    if let Some(quality) = cli.quality {
        settings.jpeg_quality = quality;
    }
    if let Some(workers) = cli.workers {
        settings.workers = workers;
    }
}

fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Diagnostics go to stderr so stdout stays one line per file.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
