use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::{SeedableRng, rngs::StdRng};
use tracing_subscriber::EnvFilter;

use abstrak::{
    AnimationConfig, AnimationSession, CancelToken, EffectKind, FfmpegEncoder, FfmpegRecorder,
    GifRecorder, MotionEffect, PixelBuffer, Recorder, ScaleMode, SessionConfig, ShapeGenerator,
};

#[derive(Parser, Debug)]
#[command(name = "abstrak", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a processed source image as a PNG.
    Generate(GenerateArgs),
    /// Render one composited frame at a given animation time as a PNG.
    Frame(FrameArgs),
    /// Export the animation as video (MP4 through `ffmpeg`, real-time fallback otherwise).
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Session config JSON. Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source image. A random abstract image is generated when omitted.
    #[arg(long)]
    image: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Seed for image generation and stochastic effects.
    #[arg(long)]
    seed: Option<u64>,

    /// Pixel effect: none, randomize, oil, water, glitch.
    #[arg(long)]
    effect: Option<EffectKind>,

    /// Effect intensity in [0, 1].
    #[arg(long)]
    intensity: Option<f32>,

    /// Loop duration in seconds.
    #[arg(long)]
    duration: Option<f64>,

    #[arg(long)]
    speed: Option<f64>,

    /// Motion effects, comma separated: fade, zoom, rotate, translate.
    #[arg(long, value_delimiter = ',')]
    motion: Vec<MotionEffect>,

    /// Scale mode: fit, fill, zoom.
    #[arg(long)]
    scale_mode: Option<ScaleMode>,

    #[arg(long)]
    zoom_scale: Option<f64>,

    /// Randomize duration, speed and motion effects (seeded by `--seed`).
    #[arg(long)]
    randomize: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Write the raw generated image, skipping the pixel effect.
    #[arg(long)]
    raw: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Animation time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Output path. The extension is replaced with the produced container's.
    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    fps: Option<u32>,

    /// Exported length in seconds (defaults to one loop).
    #[arg(long)]
    export_duration: Option<f64>,

    /// Recorder used when the primary encoder is unavailable.
    #[arg(long, value_enum, default_value_t = FallbackChoice::Gif)]
    fallback: FallbackChoice,

    /// Skip the primary encoder and record in real time.
    #[arg(long)]
    force_fallback: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FallbackChoice {
    Gif,
    Webm,
}

fn main() -> anyhow::Result<()> {
    initialise_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

struct Resolved {
    cfg: SessionConfig,
    seed: u64,
    source: PixelBuffer,
}

fn resolve(args: &SessionArgs) -> anyhow::Result<Resolved> {
    let mut cfg = match &args.config {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };
    let seed = args.seed.or(cfg.seed).unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    if args.randomize {
        cfg.animation = AnimationConfig::randomized(&mut rng);
    }
    if let Some(w) = args.width {
        cfg.canvas.width = w;
    }
    if let Some(h) = args.height {
        cfg.canvas.height = h;
    }
    if let Some(kind) = args.effect {
        cfg.effect.kind = kind;
    }
    if let Some(i) = args.intensity {
        cfg.effect.intensity = i;
    }
    if let Some(d) = args.duration {
        cfg.animation.duration_secs = d;
    }
    if let Some(s) = args.speed {
        cfg.animation.speed = s;
    }
    if !args.motion.is_empty() {
        cfg.animation.effects = args.motion.clone();
    }
    if let Some(mode) = args.scale_mode {
        cfg.animation.scale_mode = mode;
    }
    if let Some(z) = args.zoom_scale {
        cfg.animation.zoom_scale = z;
    }
    cfg.seed = Some(seed);
    cfg.validate()?;

    let source = match &args.image {
        Some(path) => abstrak::load_image(path)?,
        None => {
            ShapeGenerator::default().generate(cfg.canvas.width, cfg.canvas.height, &mut rng)?
        }
    };
    tracing::debug!(seed, width = source.width(), height = source.height(), "source ready");

    Ok(Resolved { cfg, seed, source })
}

fn build_session(r: Resolved) -> anyhow::Result<AnimationSession> {
    Ok(AnimationSession::with_cpu_surface(
        r.cfg.canvas,
        r.source,
        r.cfg.animation,
        r.cfg.effect,
        r.seed,
    )?)
}

fn write_png(path: &Path, buf: &PixelBuffer) -> anyhow::Result<()> {
    ensure_parent(path)?;
    image::save_buffer_with_format(
        path,
        buf.data(),
        buf.width(),
        buf.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let r = resolve(&args.session)?;
    let out = if args.raw {
        r.source
    } else {
        let mut rng = StdRng::seed_from_u64(r.seed);
        r.cfg.effect.apply(&r.source, &mut rng)?
    };
    write_png(&args.out, &out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut session = build_session(resolve(&args.session)?)?;
    session.render_at_time(args.time)?;
    write_png(&args.out, &session.read_pixels())?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let r = resolve(&args.session)?;
    let mut export = r.cfg.export.clone();
    if let Some(fps) = args.fps {
        export.fps = fps;
    }
    if let Some(d) = args.export_duration {
        export.duration_secs = Some(d);
    }
    export.validate()?;
    let mut session = build_session(r)?;

    let mut fallback: Box<dyn Recorder> = match args.fallback {
        FallbackChoice::Gif => Box::new(GifRecorder::new()),
        FallbackChoice::Webm => Box::new(FfmpegRecorder::new()),
    };
    let cancel = CancelToken::new();
    let mut last_pct = -1i32;
    let mut progress = |p: f64| {
        let pct = p.floor() as i32;
        if pct != last_pct {
            last_pct = pct;
            eprint!("\rexporting {pct:>3}%");
            let _ = std::io::stderr().flush();
        }
    };

    let video = if args.force_fallback {
        let duration = export.resolved_duration(session.config().duration_secs);
        let (video, frames) = abstrak::record_realtime(
            &mut session,
            fallback.as_mut(),
            export.fps,
            duration,
            &mut progress,
            &cancel,
        )?;
        tracing::debug!(frames, "forced real-time recording");
        video
    } else {
        let mut primary = FfmpegEncoder::new();
        let outcome = abstrak::export_video(
            &mut session,
            &mut primary,
            fallback.as_mut(),
            &export,
            &mut progress,
            &cancel,
        )?;
        tracing::debug!(path = ?outcome.path, frames = outcome.frames, "export finished");
        outcome.video
    };
    eprintln!();

    let out = args.out.with_extension(video.extension());
    ensure_parent(&out)?;
    std::fs::write(&out, &video.bytes).with_context(|| format!("write '{}'", out.display()))?;
    eprintln!("wrote {} ({})", out.display(), video.container);
    Ok(())
}
