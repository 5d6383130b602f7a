use std::cell::Cell;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use disintegrate::{
    DisintegrationController, Direction, Ease, EffectConfig, FilterState, FrameLoop, FrameReport,
    Fps, LoopEvent, PhaseClock, RecordingFilter,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "disintegrate", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the phase, progress, intensity and scale at one elapsed time.
    Sample(SampleArgs),
    /// Simulate a full run at a fixed frame rate and print every frame.
    Timeline(TimelineArgs),
    /// Drive real runs against the wall clock and print every frame.
    Run(RunArgs),
    /// Print an easing table.
    Ease(EaseArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Effect config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the config's direction (random, left, up).
    #[arg(long)]
    direction: Option<Direction>,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    #[command(flatten)]
    cfg: ConfigArgs,

    /// Elapsed time in milliseconds.
    #[arg(long)]
    elapsed: f64,
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    #[command(flatten)]
    cfg: ConfigArgs,

    /// Simulated display refresh rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    cfg: ConfigArgs,

    /// Display refresh rate of the frame source.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Number of runs to complete before exiting.
    #[arg(long, default_value_t = 1)]
    runs: u64,
}

#[derive(Parser, Debug)]
struct EaseArgs {
    /// Curve: linear, in-cubic, out-cubic.
    #[arg(long, default_value = "in-cubic")]
    kind: Ease,

    /// Number of intervals in the table.
    #[arg(long, default_value_t = 10)]
    steps: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Sample(args) => cmd_sample(args),
        Command::Timeline(args) => cmd_timeline(args),
        Command::Run(args) => cmd_run(args),
        Command::Ease(args) => cmd_ease(args),
    }
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<EffectConfig> {
    let mut cfg = match &args.config {
        Some(path) => load_config_file(path)?,
        None => EffectConfig::default(),
    };
    if let Some(direction) = args.direction {
        cfg.direction = direction;
    }
    Ok(cfg)
}

fn load_config_file(path: &Path) -> anyhow::Result<EffectConfig> {
    EffectConfig::from_path(path).with_context(|| format!("load config '{}'", path.display()))
}

fn print_json_line(
    out: &mut impl std::io::Write,
    value: &impl serde::Serialize,
) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, value).context("serialize output line")?;
    writeln!(out).context("write output line")?;
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.cfg)?;
    let clock = PhaseClock::new(cfg.timing);
    let sample = clock.sample(args.elapsed);
    let intensity = sample.intensity();

    let line = serde_json::json!({
        "elapsed": args.elapsed,
        "phase": sample.phase,
        "progress": sample.progress,
        "intensity": intensity,
        "scale": clock.scale_for(intensity),
        "channels": cfg.direction.channels(),
    });
    print_json_line(&mut std::io::stdout().lock(), &line)
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.cfg)?;
    let fps = Fps::new(args.fps, 1)?;
    let interval = fps.frame_interval_ms();

    let mut lp = FrameLoop::new(DisintegrationController::new(RecordingFilter::new()), cfg);
    let _ = lp.handle_event(LoopEvent::Activate(true), 0.0);

    // One frame at t=0, enough to reach the end, and one more for the deferred finalize.
    let budget = fps.frames_to_cover_ms(cfg.timing.total()) + 2;

    let mut out = std::io::stdout().lock();
    let mut frame = 0u64;
    while lp.controller().is_active() {
        anyhow::ensure!(frame < budget, "run still active after {budget} frames");
        for report in lp.step_frame(frame as f64 * interval) {
            print_json_line(&mut out, &report)?;
        }
        frame += 1;
    }

    let stats = lp.stats();
    eprintln!(
        "simulated {} frames, {} run(s) completed",
        stats.frames, stats.runs_completed
    );
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.cfg)?;
    let fps = Fps::new(args.fps, 1)?;
    let target = args.runs.max(1);

    let (tx, rx) = crossbeam_channel::unbounded();
    let completed = Rc::new(Cell::new(0u64));
    let notify_tx = tx.clone();
    let notify_count = Rc::clone(&completed);

    let mut lp = FrameLoop::new(DisintegrationController::new(FilterState::default()), cfg)
        .on_complete(move || {
            notify_count.set(notify_count.get() + 1);
            if notify_count.get() >= target {
                let _ = notify_tx.send(LoopEvent::Shutdown);
            } else {
                let _ = notify_tx.send(LoopEvent::Activate(false));
                let _ = notify_tx.send(LoopEvent::Activate(true));
            }
        });

    tx.send(LoopEvent::Activate(true))
        .context("queue initial activation")?;

    let mut out = std::io::stdout().lock();
    let mut write_err: Option<anyhow::Error> = None;
    let stats = lp.run(fps, &rx, |report: &FrameReport| {
        if write_err.is_none()
            && let Err(e) = print_json_line(&mut out, report)
        {
            write_err = Some(e);
        }
    })?;
    if let Some(e) = write_err {
        return Err(e);
    }
    out.flush().context("flush stdout")?;

    eprintln!(
        "{} frame(s), {} run(s) completed",
        stats.frames,
        completed.get()
    );
    Ok(())
}

fn cmd_ease(args: EaseArgs) -> anyhow::Result<()> {
    let steps = args.steps.max(1);
    let mut out = std::io::stdout().lock();
    for i in 0..=steps {
        let t = f64::from(i) / f64::from(steps);
        let line = serde_json::json!({ "t": t, "value": args.kind.apply(t) });
        print_json_line(&mut out, &line)?;
    }
    Ok(())
}
