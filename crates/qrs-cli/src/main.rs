use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use qrs_lib::{
    batch::{detect_batch, Recording},
    io::{csv as csv_io, text as text_io},
    metrics::evaluation::{match_events, tolerance_samples},
    synth::PulseTrain,
    FiducialMarks, QrsConfig, QrsDetector, Signal,
};
use serde::Serialize;
use std::{
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "qrs",
    version,
    about = "QRS complex detection for single-lead ECG"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SignalArgs {
    /// Sampling rate (Hz)
    #[arg(long, default_value_t = 360.0)]
    fs: f64,
    /// Newline-delimited samples, or a CSV file when --column is given (stdin if omitted)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Column name to read from a delimited file
    #[arg(long)]
    column: Option<String>,
    #[arg(long, default_value = ",")]
    delimiter: String,
    /// TOML file overriding detector parameters
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect R-wave positions and print them as JSON
    Detect {
        #[command(flatten)]
        signal: SignalArgs,
    },
    /// Run the pipeline and print a per-stage summary as JSON
    Trace {
        #[command(flatten)]
        signal: SignalArgs,
    },
    /// Compare detected indices against reference annotations
    Score {
        #[arg(long)]
        detections: PathBuf,
        #[arg(long)]
        annotations: PathBuf,
        #[arg(long, default_value_t = 360.0)]
        fs: f64,
        #[arg(long, default_value_t = 0.05)]
        tolerance_s: f64,
    },
    /// Write a synthetic Gaussian pulse train to stdout
    Synth {
        #[arg(long, default_value_t = 300.0)]
        fs: f64,
        #[arg(long, default_value_t = 10.0)]
        duration_s: f64,
        #[arg(long, default_value_t = 1.0)]
        rate_hz: f64,
        #[arg(long, default_value_t = 10.0)]
        amplitude: f64,
        #[arg(long, default_value_t = 0.020)]
        width_s: f64,
        #[arg(long, default_value_t = 0.0)]
        noise: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Detect over several newline-delimited recordings in parallel
    Batch {
        #[arg(long, default_value_t = 360.0)]
        fs: f64,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

#[derive(Serialize)]
struct DetectOutput {
    fs: f64,
    sample_count: usize,
    marks: FiducialMarks,
}

#[derive(Serialize)]
struct TraceOutput {
    fs: f64,
    sample_count: usize,
    bandpassed_len: usize,
    squared_len: usize,
    integrated_valid: usize,
    candidate_count: usize,
    threshold: f64,
    accepted: Vec<usize>,
    localized: Vec<usize>,
    marks: FiducialMarks,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Detect { signal } => cmd_detect(&signal)?,
        Commands::Trace { signal } => cmd_trace(&signal)?,
        Commands::Score {
            detections,
            annotations,
            fs,
            tolerance_s,
        } => cmd_score(&detections, &annotations, fs, tolerance_s)?,
        Commands::Synth {
            fs,
            duration_s,
            rate_hz,
            amplitude,
            width_s,
            noise,
            seed,
        } => {
            let train = PulseTrain::regular(fs, duration_s, rate_hz)
                .amplitude(amplitude)
                .width(width_s)
                .noise(noise, seed);
            cmd_synth(&train)?
        }
        Commands::Batch { fs, config, inputs } => cmd_batch(fs, config.as_deref(), &inputs)?,
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<QrsConfig> {
    match path {
        Some(path) => QrsConfig::load(path),
        None => Ok(QrsConfig::default()),
    }
}

fn load_signal(args: &SignalArgs) -> Result<Signal> {
    let delimiter = match args.delimiter.as_bytes() {
        [b] => *b,
        _ => bail!("delimiter must be a single byte, got {:?}", args.delimiter),
    };
    let data = match (&args.input, &args.column) {
        (Some(path), Some(column)) => csv_io::read_column(path, column, delimiter)?,
        (Some(path), None) => text_io::read_f64_series(path)?,
        (None, column) => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            match column {
                Some(column) => csv_io::parse_column(buf.as_bytes(), column, delimiter)?,
                None => text_io::parse_f64_series(&buf)?,
            }
        }
    };
    Ok(Signal::new(args.fs, data)?)
}

fn detector_for(args: &SignalArgs) -> Result<QrsDetector> {
    let cfg = load_config(args.config.as_deref())?;
    Ok(QrsDetector::for_rate(cfg, args.fs)?)
}

fn cmd_detect(args: &SignalArgs) -> Result<()> {
    let signal = load_signal(args)?;
    let detector = detector_for(args)?;
    let marks = detector.detect(&signal)?;
    info!("{} QRS complexes in {:.1} s", marks.len(), signal.duration());
    let out = DetectOutput {
        fs: signal.fs(),
        sample_count: signal.len(),
        marks,
    };
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

fn cmd_trace(args: &SignalArgs) -> Result<()> {
    let signal = load_signal(args)?;
    let detector = detector_for(args)?;
    let trace = detector.trace(&signal)?;
    let out = TraceOutput {
        fs: signal.fs(),
        sample_count: signal.len(),
        bandpassed_len: trace.bandpassed.len(),
        squared_len: trace.squared.len(),
        integrated_valid: trace.integrated.samples.iter().flatten().count(),
        candidate_count: trace.candidates.len(),
        threshold: trace.accepted.threshold,
        accepted: trace.accepted.indices,
        localized: trace.localized,
        marks: trace.marks,
    };
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

fn cmd_score(detections: &Path, annotations: &Path, fs: f64, tolerance_s: f64) -> Result<()> {
    let detected = text_io::read_indices(detections)?;
    let reference = text_io::read_indices(annotations)?;
    let summary = match_events(&reference, &detected, tolerance_samples(fs, tolerance_s));
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

fn cmd_synth(train: &PulseTrain) -> Result<()> {
    let signal = train.render()?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for x in signal.samples() {
        writeln!(out, "{x}")?;
    }
    out.flush()?;
    Ok(())
}

fn cmd_batch(fs: f64, config: Option<&Path>, inputs: &[PathBuf]) -> Result<()> {
    let detector = QrsDetector::for_rate(load_config(config)?, fs)?;
    let recordings = inputs
        .iter()
        .map(|path| -> Result<Recording> {
            Ok(Recording {
                id: path.display().to_string(),
                signal: text_io::read_signal(path, fs)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let outcomes = detect_batch(&detector, &recordings);
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!("{} recordings, {} failed", outcomes.len(), failed);
    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }
    Ok(())
}
