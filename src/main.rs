use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};
use team_pulse::config::{self, TeamPulseConfig};
use team_pulse::{git, input, reporters, CollaborationEngine, Error, RawData, Report, TeamHealthAnalyzer};

const DEFAULT_TOP: usize = 20;

#[derive(Parser, Debug)]
#[command(
    name = "team-pulse",
    about = "👥 Estimate team health from commit and code-review history",
    version,
    long_about = "Estimates team health from commit and code-review records.\n\n\
                  Reports knowledge silos, the collaboration network, review\n\
                  participation and communication tone, with composite scores\n\
                  and recommendations.\n\n\
                  Accepts JSON datasets and/or local git repositories. Several\n\
                  inputs are analyzed in parallel and reported in the order given."
)]
struct Args {
    /// JSON datasets: { repository, analysis_period_days, commits, pull_requests }
    #[arg(value_name = "DATASET")]
    datasets: Vec<PathBuf>,

    /// Local git repository to read commits from (repeatable). Has no review data.
    #[arg(long = "git", value_name = "REPO")]
    git_repos: Vec<PathBuf>,

    /// Only for --git: e.g. "6 months ago", "2024-01-01". Empty means all history.
    #[arg(long, default_value = "")]
    since: String,

    /// Config file. Defaults to ./.team-pulse.yml, then <config dir>/team-pulse/config.yml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format: terminal, json
    #[arg(long, value_parser = ["terminal", "json"])]
    format: Option<String>,

    /// Output file (json). For several inputs the input name is appended.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Members and silos listed in the terminal report
    #[arg(long)]
    top: Option<usize>,

    /// Skip tone analysis of messages, reviews and comments
    #[arg(long)]
    no_sentiment: bool,

    /// Log analysis progress (RUST_LOG overrides)
    #[arg(long, short)]
    verbose: bool,

    /// Print an annotated config template, or write it to FILE
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    generate_config: Option<Option<PathBuf>>,
}

/// One thing to analyze.
#[derive(Debug, Clone)]
enum Source {
    Dataset(PathBuf),
    Git(PathBuf),
}

impl Source {
    fn name(&self) -> String {
        let name = match self {
            Source::Dataset(p) => p.file_stem(),
            Source::Git(p) => p.file_name(),
        };
        name.map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "repo".to_string())
    }

    fn load(&self, since: &str) -> team_pulse::Result<RawData> {
        match self {
            Source::Dataset(path) => input::load_dataset(path),
            Source::Git(path) => {
                let commits = git::log_parser::read_commits(path, since)?;
                if commits.is_empty() {
                    return Err(Error::Git(format!(
                        "No commits found in '{}'. Try an earlier --since",
                        path.display()
                    )));
                }
                Ok(RawData {
                    repository: Some(self.name()),
                    commits,
                    ..Default::default()
                })
            }
        }
    }
}

fn main() {
    let args = Args::parse();

    // Write to stderr so logs don't interfere with JSON on stdout
    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Some(target) = &args.generate_config {
        if let Err(e) = config::print_template(target.as_deref()) {
            exit_with(&e);
        }
        if let Some(path) = target {
            eprintln!("✓ Config template written to {}", path.display());
        }
        return;
    }

    let cfg = match load_settings(&args) {
        Ok(cfg) => cfg,
        Err(e) => exit_with(&e),
    };

    let format = args.format.clone().or_else(|| cfg.format.clone()).unwrap_or_else(|| "terminal".to_string());
    let top = args.top.or(cfg.top).unwrap_or(DEFAULT_TOP).max(1);
    let sentiment = !args.no_sentiment && cfg.sentiment.unwrap_or(true);
    let base_output: Option<PathBuf> = args.output.clone().or_else(|| cfg.output.as_ref().map(PathBuf::from));

    let mut sources: Vec<Source> = args.datasets.iter().cloned().map(Source::Dataset)
        .chain(args.git_repos.iter().cloned().map(Source::Git))
        .collect();
    if sources.is_empty() {
        match std::env::current_dir() {
            Ok(cwd) if cwd.join(".git").exists() => sources.push(Source::Git(cwd)),
            _ => {
                eprintln!("Error: no datasets given and the current directory is not a git repository.");
                eprintln!("       Pass one or more DATASET.json files or --git <REPO>.");
                process::exit(1);
            }
        }
    }

    let engine = CollaborationEngine::default().with_silo_threshold(cfg.silo_threshold());
    tracing::info!("Flagging files at {:.0}% single-owner share", engine.silo_threshold() * 100.0);
    let mut analyzer = TeamHealthAnalyzer::new()
        .with_engine(engine)
        .with_thresholds(cfg.insight_thresholds());
    if !sentiment {
        analyzer = analyzer.without_sentiment();
    }

    // ── Analyze every source in parallel ─────────────────────────────────────
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(format!("Analyzing {} input(s)...", sources.len()));

    let start = Instant::now();
    let results: Vec<(String, team_pulse::Result<Report>)> = sources
        .par_iter()
        .map(|source| {
            let report = source.load(&args.since).map(|data| analyzer.analyze(&data));
            (source.name(), report)
        })
        .collect();

    pb.finish_and_clear();
    let ok = results.iter().filter(|(_, r)| r.is_ok()).count();
    eprintln!("✔ {ok} of {} input(s) analyzed — ⏱ {}", results.len(), fmt_dur(start.elapsed()));

    // ── Report in input order ────────────────────────────────────────────────
    let is_multi = results.len() > 1;
    let names: Vec<&str> = results.iter().map(|(name, _)| name.as_str()).collect();
    let suffixes = output_suffixes(&names);
    let mut failures = 0;
    for ((name, result), suffix) in results.iter().zip(&suffixes) {
        let output_path = base_output.as_deref().map(|base| {
            if is_multi { make_output_path(base, suffix) } else { base.to_path_buf() }
        });

        let outcome = result.as_ref()
            .map_err(|e| e.to_string())
            .and_then(|report| render(report, name, &format, top, output_path.as_deref(), is_multi).map_err(|e| e.to_string()));

        if let Err(e) = outcome {
            failures += 1;
            eprintln!("Error analyzing {name}: {e}");
            if let Err(err) = result {
                print_causes(err);
            }
        }
    }

    if failures > 0 {
        process::exit(1);
    }
}

fn load_settings(args: &Args) -> team_pulse::Result<TeamPulseConfig> {
    let path = args.config.clone().or_else(config::discover_config);
    match path {
        Some(p) => {
            tracing::info!("Using config file {}", p.display());
            config::load_config(&p)
        }
        None => Ok(TeamPulseConfig::default()),
    }
}

fn render(
    report:      &Report,
    name:        &str,
    format:      &str,
    top:         usize,
    output_path: Option<&Path>,
    is_multi:    bool,
) -> team_pulse::Result<()> {
    match format {
        "json" => reporters::json::report_json(report, output_path)?,
        _ => {
            if is_multi {
                println!();
                println!("╔══════════════════════════════════════════════════════╗");
                println!("║  📁 {}", name.chars().take(48).collect::<String>());
                println!("╚══════════════════════════════════════════════════════╝");
            }
            reporters::terminal::report_terminal(report, top);
        }
    }

    if is_multi && format != "terminal" {
        if let Some(p) = output_path {
            eprintln!("   → {}", p.display());
        }
    }
    Ok(())
}

fn exit_with(e: &Error) -> ! {
    eprintln!("Error: {e}");
    print_causes(e);
    process::exit(1);
}

fn print_causes(e: &Error) {
    let mut source = e.source();
    while let Some(err) = source {
        eprintln!("  Caused by: {err}");
        source = err.source();
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────────

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_millis();
    if ms >= 1000 { format!("{:.1}s", d.as_secs_f64()) } else { format!("{ms}ms") }
}

/// `report.json` + `api` → `report-api.json`, next to the base path.
fn make_output_path(base: &Path, name: &str) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("team-pulse");
    let ext  = base.extension().and_then(|s| s.to_str()).unwrap_or("json");
    let dir  = base.parent().unwrap_or(Path::new("."));
    let safe: String = name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    dir.join(format!("{stem}-{safe}.{ext}"))
}

/// Per-input file suffixes. Names shared by several inputs get their
/// 1-based input position appended so no report overwrites another.
fn output_suffixes(names: &[&str]) -> Vec<String> {
    names.iter().enumerate().map(|(i, name)| {
        if names.iter().filter(|n| *n == name).count() > 1 {
            format!("{name}-{}", i + 1)
        } else {
            name.to_string()
        }
    }).collect()
}
