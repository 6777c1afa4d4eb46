//! camsight CLI — run the circle and dark-frame analysers on a live camera
//! or on recorded frames.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use camsight::{
    CircleProcessor, CircleProcessorConfig, DarkFrameProcessor, DarkFrameProcessorConfig,
    FrameProcessor, FrameReport, FrameSink, FrameSource, LoopConfig,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

/// Exit status when the capture device (or input) cannot be opened.
const EXIT_DEVICE_UNAVAILABLE: u8 = 255;

#[derive(Parser)]
#[command(name = "camsight")]
#[command(about = "Detect circles or dark frames in a live capture stream")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect circles (Hough gradient) and show the Canny edge map.
    Circles(CliRunArgs),

    /// Plot the intensity histogram and flag mostly-black frames.
    Dark(CliRunArgs),

    /// Print the default processor configuration as JSON.
    ShowConfig {
        #[arg(value_enum)]
        program: ProgramArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProgramArg {
    Circles,
    Dark,
}

#[derive(Debug, Clone, Args)]
struct CliRunArgs {
    /// Capture device index (camera builds only).
    #[arg(long, default_value_t = 0)]
    device: i32,

    /// Read frames from an image file or a directory of images instead of a camera.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Restart --input from the first image when it runs out.
    #[arg(long, requires = "input")]
    loop_input: bool,

    /// Write every view as PNG into this directory instead of opening windows.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Do not display or write views; only print per-frame diagnostics.
    #[arg(long, conflicts_with = "out_dir")]
    headless: bool,

    /// Processor configuration (JSON). Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append every frame report as a JSON line to this file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Longest wait for a key press per frame (milliseconds).
    #[arg(long, default_value_t = 30)]
    key_wait_ms: u64,
}

impl CliRunArgs {
    fn to_loop_config(&self) -> LoopConfig {
        LoopConfig {
            key_wait_ms: self.key_wait_ms,
            max_frames: self.max_frames,
        }
    }

    fn load_config<T>(&self) -> CliResult<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        match &self.config {
            Some(path) => {
                tracing::info!("Loading config: {}", path.display());
                Ok(camsight::config::from_json_file(path)?)
            }
            None => Ok(T::default()),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Circles(args) => run_circles(&args),
        Commands::Dark(args) => run_dark(&args),
        Commands::ShowConfig { program } => run_show_config(program),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            let device_unavailable = e
                .downcast_ref::<camsight::Error>()
                .is_some_and(camsight::Error::is_device_unavailable);
            if device_unavailable {
                ExitCode::from(EXIT_DEVICE_UNAVAILABLE)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

// ── show-config ───────────────────────────────────────────────────────

fn run_show_config(program: ProgramArg) -> CliResult<()> {
    let json = match program {
        ProgramArg::Circles => serde_json::to_string_pretty(&CircleProcessorConfig::default())?,
        ProgramArg::Dark => serde_json::to_string_pretty(&DarkFrameProcessorConfig::default())?,
    };
    println!("{json}");
    Ok(())
}

// ── circles / dark ─────────────────────────────────────────────────────

fn run_circles(args: &CliRunArgs) -> CliResult<()> {
    let config: CircleProcessorConfig = args.load_config()?;
    let mut processor = CircleProcessor::new(config);
    run_program(args, &mut processor)
}

fn run_dark(args: &CliRunArgs) -> CliResult<()> {
    let config: DarkFrameProcessorConfig = args.load_config()?;
    let mut processor = DarkFrameProcessor::new(config);
    run_program(args, &mut processor)
}

fn open_source(args: &CliRunArgs) -> CliResult<Box<dyn FrameSource>> {
    if let Some(input) = &args.input {
        let source = camsight::ImageSequenceSource::open(input, args.loop_input)?;
        return Ok(Box::new(source));
    }
    open_camera(args.device)
}

#[cfg(feature = "opencv")]
fn open_camera(device: i32) -> CliResult<Box<dyn FrameSource>> {
    Ok(Box::new(camsight::OpenCvCamera::open(device)?))
}

#[cfg(not(feature = "opencv"))]
fn open_camera(device: i32) -> CliResult<Box<dyn FrameSource>> {
    Err(camsight::Error::DeviceUnavailable(format!(
        "camera {device}: built without camera support; use --input or enable the `opencv` feature"
    ))
    .into())
}

fn open_sink(args: &CliRunArgs) -> CliResult<Box<dyn FrameSink>> {
    if let Some(dir) = &args.out_dir {
        tracing::info!("Writing views to {}", dir.display());
        return Ok(Box::new(camsight::DirectorySink::create(dir)?));
    }
    if args.headless {
        return Ok(Box::new(camsight::HeadlessSink));
    }
    Ok(window_sink())
}

#[cfg(feature = "opencv")]
fn window_sink() -> Box<dyn FrameSink> {
    Box::new(camsight::HighGuiDisplay::new())
}

#[cfg(not(feature = "opencv"))]
fn window_sink() -> Box<dyn FrameSink> {
    tracing::warn!("Built without window support; views are discarded (see --out-dir)");
    Box::new(camsight::HeadlessSink)
}

#[derive(serde::Serialize)]
struct ReportLine<'a> {
    frame: u64,
    #[serde(flatten)]
    report: &'a FrameReport,
}

fn run_program(args: &CliRunArgs, processor: &mut dyn FrameProcessor) -> CliResult<()> {
    let mut source = open_source(args)?;
    let mut sink = open_sink(args)?;
    let mut report_out = match &args.report {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    let stdout = std::io::stdout();
    let summary = camsight::run_loop(
        source.as_mut(),
        sink.as_mut(),
        processor,
        &args.to_loop_config(),
        |frame, report| {
            writeln!(stdout.lock(), "{report}")?;
            if let Some(out) = report_out.as_mut() {
                let line = serde_json::to_string(&ReportLine { frame, report })
                    .map_err(std::io::Error::other)?;
                writeln!(out, "{line}")?;
            }
            Ok(())
        },
    )?;

    if let Some(mut out) = report_out {
        out.flush()?;
        if let Some(path) = &args.report {
            tracing::info!("Reports written to {}", path.display());
        }
    }
    tracing::info!("Processed {} frames ({:?})", summary.frames, summary.stop);
    Ok(())
}
