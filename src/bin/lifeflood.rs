use anyhow::Context as _;
use clap::{Parser, Subcommand};

use lifeflood::{BirthInput, LifeConfig, LifeStats, MemoryStore, Session, View, VisualState};

#[derive(Parser, Debug)]
#[command(name = "lifeflood", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the life stats for a birth month/year as JSON.
    Stats(StatsArgs),
    /// Run a full session offline on a virtual clock, one JSON line per frame.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Birth month (1-12).
    #[arg(long)]
    month: u32,

    /// Birth year (four digits).
    #[arg(long)]
    year: i32,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Birth month (1-12).
    #[arg(long)]
    month: u32,

    /// Birth year (four digits).
    #[arg(long)]
    year: i32,

    /// Virtual frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Total simulated time in seconds.
    #[arg(long, default_value_t = 4.0)]
    seconds: f64,

    /// Trigger a reset this many seconds in (exercises the reverse transition).
    #[arg(long)]
    reset_after: Option<f64>,

    /// Seed for the streak generator.
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

#[derive(serde::Serialize)]
struct FrameRecord<'a> {
    t_ms: f64,
    view: View,
    visuals: &'a VisualState,
    spawned: usize,
    live: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Stats(args) => cmd_stats(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    let cfg = LifeConfig::default();
    let birth = lifeflood::BirthDate::new(args.month, args.year)?;
    let stats = LifeStats::derive(&cfg, &birth, chrono::Local::now().date_naive());
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.fps > 0, "fps must be > 0");
    anyhow::ensure!(
        args.seconds.is_finite() && args.seconds > 0.0,
        "seconds must be finite and > 0"
    );

    let today = chrono::Local::now().date_naive();
    let mut session = Session::start(LifeConfig::default(), MemoryStore::new(), args.seed, today, 0.0)
        .context("start session")?;

    let input = BirthInput {
        month: Some(args.month.to_string()),
        year: Some(args.year.to_string()),
    };
    let params = session.submit(&input, 0.0).context("submit birth date")?;
    eprintln!(
        "age {} / ratio {:.3} / saturation {:.1}%",
        params.age_years, params.ratio, params.saturation_pct
    );

    let frame_ms = 1000.0 / f64::from(args.fps);
    let total_frames = (args.seconds * 1000.0 / frame_ms).ceil() as u64;
    let reset_at_ms = args.reset_after.map(|s| s * 1000.0);
    let mut reset_done = false;

    for frame in 0..=total_frames {
        let t_ms = frame as f64 * frame_ms;
        if let Some(at) = reset_at_ms {
            if !reset_done && t_ms >= at && session.view() == View::Main {
                session.reset(t_ms).context("reset session")?;
                reset_done = true;
            }
        }
        let spawned = session.tick(t_ms);
        let record = FrameRecord {
            t_ms,
            view: session.view(),
            visuals: session.visuals(),
            spawned: spawned.len(),
            live: session.streaks().live_count(),
        };
        println!("{}", serde_json::to_string(&record)?);
    }

    Ok(())
}
