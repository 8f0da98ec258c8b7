use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "framereel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a reel into an offscreen canvas and write the result as PNG.
    Play(PlayArgs),
    /// Print the cover-fit placement of an image inside a viewport.
    Fit(FitArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Reel manifest JSON. Frame paths resolve against its directory.
    #[arg(long)]
    manifest: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Canvas width in logical pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Canvas height in logical pixels.
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Simulated display refresh rate.
    #[arg(long, default_value_t = 60.0)]
    refresh_hz: f64,

    /// Stop after this many repaint callbacks even if playback has not finished.
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,

    /// Sleep between repaint callbacks so playback takes wall-clock time.
    #[arg(long)]
    realtime: bool,

    /// Decode frames on the rayon pool (implies --realtime).
    #[arg(long)]
    pool: bool,

    /// Also write `frame-NNNN.png` each time a new frame is painted.
    #[arg(long)]
    every_frame: bool,
}

#[derive(Parser, Debug)]
struct FitArgs {
    /// Image size, `WIDTHxHEIGHT`.
    #[arg(long, value_parser = parse_size)]
    image: framereel::Size,

    /// Viewport size, `WIDTHxHEIGHT`.
    #[arg(long, value_parser = parse_size)]
    viewport: framereel::Size,
}

#[derive(Debug, serde::Serialize)]
struct PlaySummary {
    state: framereel::PlayerState,
    current_index: usize,
    painted_index: Option<usize>,
    viewport: Option<framereel::Viewport>,
    frames: usize,
    ready: usize,
    ticks: u64,
    painted: u64,
    elapsed_ms: f64,
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Play(args) => cmd_play(args),
        Command::Fit(args) => cmd_fit(args),
    }
}

fn parse_size(s: &str) -> Result<framereel::Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    Ok(framereel::Size::new(w, h))
}

fn cmd_fit(args: FitArgs) -> anyhow::Result<()> {
    let fit = framereel::cover_fit(args.image, args.viewport).with_context(|| {
        format!(
            "cannot cover-fit {}x{} into {}x{}",
            args.image.width, args.image.height, args.viewport.width, args.viewport.height
        )
    })?;
    println!("{}", serde_json::to_string_pretty(&fit)?);
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let manifest = framereel::ReelManifest::from_path(&args.manifest)?;
    let config = manifest.player.with_env_overrides();
    config.validate()?;
    let sequence = manifest.sequence()?;

    let root = args.manifest.parent().unwrap_or_else(|| Path::new("."));
    let threading = if args.pool {
        framereel::LoadThreading::Pool
    } else {
        framereel::LoadThreading::Inline
    };
    let source = framereel::FsAssetSource::new(root).with_threading(threading);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let target = Rc::new(RefCell::new(framereel::PixmapTarget::new(
        args.width,
        args.height,
        args.dpr,
    )));
    let scheduler = framereel::ManualScheduler::new();
    let host = framereel::PlayerHost {
        target: Some(Box::new(target.clone())),
        source: Box::new(source),
        scheduler: Box::new(scheduler.clone()),
    };

    tracing::info!(
        manifest = %args.manifest.display(),
        frames = sequence.len(),
        fps = config.fps.as_f64(),
        "playing reel"
    );
    let mut player =
        framereel::FramePlayer::new(host, manifest.base_path.clone(), sequence, config);

    let mut repaint = framereel::RepaintLoop::new(args.refresh_hz)
        .with_max_ticks(args.max_ticks)
        .paced(args.realtime || args.pool);
    player.start(repaint.now_ms());

    let mut snapshots = Snapshots::new(&args.out, args.every_frame);
    snapshots.observe(&player, &target.borrow());
    let ticks = repaint.run_with(&mut player, &scheduler, |player| {
        snapshots.observe(player, &target.borrow());
    });
    snapshots.finish()?;

    let final_path = args.out.join("final.png");
    target.borrow().save_png(&final_path)?;

    let summary = PlaySummary {
        state: player.state(),
        current_index: player.current_index(),
        painted_index: player.painted_index(),
        viewport: player.viewport(),
        frames: player.buffer().len(),
        ready: player.buffer().ready_count(),
        ticks,
        painted: target.borrow().draw_count(),
        elapsed_ms: repaint.now_ms(),
        out: args.out.clone(),
    };
    player.teardown();

    if summary.state != framereel::PlayerState::Holding {
        tracing::warn!(
            state = ?summary.state,
            current = summary.current_index,
            "playback did not reach the final frame"
        );
    }
    eprintln!("wrote {}", final_path.display());
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Writes a PNG each time the painted frame changes.
struct Snapshots<'a> {
    out: &'a Path,
    enabled: bool,
    last: Option<usize>,
    error: Option<anyhow::Error>,
}

impl<'a> Snapshots<'a> {
    fn new(out: &'a Path, enabled: bool) -> Self {
        Self {
            out,
            enabled,
            last: None,
            error: None,
        }
    }

    fn observe(&mut self, player: &framereel::FramePlayer, target: &framereel::PixmapTarget) {
        if !self.enabled || self.error.is_some() {
            return;
        }
        let Some(index) = player.painted_index() else {
            return;
        };
        if self.last == Some(index) {
            return;
        }
        self.last = Some(index);

        let path = self.out.join(format!("frame-{index:04}.png"));
        if let Err(e) = target.save_png(&path) {
            self.error = Some(anyhow::Error::new(e).context(format!("snapshot frame {index}")));
        }
    }

    fn finish(self) -> anyhow::Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
