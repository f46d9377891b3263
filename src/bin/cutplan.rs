use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cutplan::TimelineRenderer as _;

#[derive(Parser, Debug)]
#[command(name = "cutplan", version)]
struct Cli {
    /// Log pipeline stages at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a validated timeline from a project file.
    Plan(PlanArgs),
    /// Run the built-in detectors and print their intervals as JSON.
    Detect(DetectArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output timeline JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Engine config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write a CMX-style EDL.
    #[arg(long)]
    edl: Option<PathBuf>,

    /// Run the built-in silence and filler detectors on the project's words.
    #[arg(long)]
    detect: bool,

    /// Smallest word gap reported as silence by `--detect`, in seconds.
    #[arg(long, default_value_t = 0.5)]
    min_gap: f64,
}

#[derive(Parser, Debug)]
struct DetectArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Smallest word gap reported as silence, in seconds.
    #[arg(long, default_value_t = 0.5)]
    min_gap: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Detect(args) => cmd_detect(args),
    }
}

fn read_project(path: &Path) -> anyhow::Result<cutplan::EditProject> {
    let f = File::open(path).with_context(|| format!("open project '{}'", path.display()))?;
    let r = BufReader::new(f);
    let project: cutplan::EditProject =
        serde_json::from_reader(r).with_context(|| "parse project JSON")?;
    Ok(project)
}

fn read_config(path: Option<&Path>) -> anyhow::Result<cutplan::EngineConfig> {
    let Some(path) = path else {
        return Ok(cutplan::EngineConfig::default());
    };
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    Ok(cutplan::EngineConfig::from_json(&s)?)
}

fn builtin_detectors(min_gap: f64) -> Vec<Box<dyn cutplan::FeatureDetector>> {
    vec![
        Box::new(cutplan::WordGapSilenceDetector::new(min_gap)),
        Box::new(cutplan::FillerWordDetector::default()),
    ]
}

fn create_output(path: &Path) -> anyhow::Result<BufWriter<File>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    Ok(BufWriter::new(f))
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let cfg = read_config(args.config.as_deref())?;
    let engine = cutplan::EditEngine::new(cfg)?;

    let outcome = if args.detect {
        engine.run_with_detectors(
            &project.inputs,
            &project.media,
            &builtin_detectors(args.min_gap),
            &project.known_media,
        )?
    } else {
        engine.run(&project.inputs, &project.known_media)?
    };

    for d in &outcome.diagnostics {
        eprintln!("warning: {d}");
    }

    let mut out = create_output(&args.out)?;
    serde_json::to_writer_pretty(&mut out, &outcome.timeline)
        .with_context(|| format!("write timeline '{}'", args.out.display()))?;
    writeln!(out)?;
    out.flush()?;
    eprintln!("wrote {}", args.out.display());

    let stats = &outcome.stats;
    eprintln!(
        "segments={} output={:.3}s original={:.3}s removed={:.3}s \
         silence_cuts={} filler_cuts={} effects={}/{}",
        outcome.timeline.segments().len(),
        stats.output_duration,
        stats.original_duration,
        stats.removed_duration,
        stats.silence_cuts,
        stats.filler_cuts,
        stats.effects_applied,
        stats.effects_applied + stats.effects_dropped,
    );

    if let Some(edl_path) = args.edl {
        let mut edl = cutplan::EdlWriter::new(create_output(&edl_path)?, project.media.as_str());
        edl.render(outcome.timeline)?;
        eprintln!("wrote {}", edl_path.display());
    }
    Ok(())
}

fn cmd_detect(args: DetectArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let transcript = cutplan::Transcript::new(
        project.inputs.words.clone(),
        project.inputs.total_duration,
    )?;
    let detected = cutplan::run_detectors(
        &builtin_detectors(args.min_gap),
        &transcript,
        &project.media,
        false,
        None,
    )?;
    for d in &detected.diagnostics {
        eprintln!("warning: {d}");
    }

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, &detected.intervals)
        .with_context(|| "write detected intervals")?;
    writeln!(lock)?;
    Ok(())
}
