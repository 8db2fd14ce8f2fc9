use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrollreel::{
    Animator, CpuSurface, DrawSurface, FfmpegProbe, FfmpegSink, FrameRGBA, FrameReport,
    REFRESH_HZ, Recorder, ScrollConfig, is_ffmpeg_on_path, render_frame, run_paced,
    select_format,
};

/// Fonts tried when neither the config nor `--font` names one.
const SYSTEM_FONTS: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version, about = "Render scrolling text to video")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Run the preview animation to completion.
    Preview(PreviewArgs),
    /// Capture the full scroll into an MP4/WebM (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the container format this machine would encode.
    Probe,
    /// Print the default configuration as JSON.
    Defaults,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Configuration JSON; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file overriding the configured one.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Canvas preset (`1080p`, `720p`, `Vertical`).
    #[arg(long)]
    preset: Option<String>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    cfg: ConfigArgs,

    /// Scroll offset in pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    scroll: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    cfg: ConfigArgs,

    /// Directory receiving sampled preview frames as PNG.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Save every Nth frame (with `--out-dir`).
    #[arg(long, default_value_t = 30)]
    every: u64,

    /// Pace ticks at the display refresh rate instead of running flat out.
    #[arg(long, default_value_t = false)]
    realtime: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    cfg: ConfigArgs,

    /// Output directory; the file is named after the capture time.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Disable audio mixing for this render.
    #[arg(long, default_value_t = false)]
    no_audio: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Render(args) => cmd_render(args),
        Command::Probe => cmd_probe(),
        Command::Defaults => cmd_defaults(),
    }
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<ScrollConfig> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => ScrollConfig::from_path(path)?,
        None => ScrollConfig::default(),
    };
    if let Some(name) = args.preset.as_deref() {
        let preset = ScrollConfig::preset(name)
            .with_context(|| format!("unknown preset '{name}'"))?;
        cfg = cfg.with_preset(preset);
    }
    if let Some(font) = args.font.as_ref() {
        cfg.font_path = Some(font.clone());
    }
    if cfg.font_path.is_none() {
        cfg.font_path = SYSTEM_FONTS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file());
    }
    let font = cfg
        .font_path
        .as_deref()
        .context("no font configured and no system font found; pass --font <path>")?;
    tracing::debug!(font = %font.display(), "using font");
    cfg.validate()?;
    Ok(cfg)
}

fn write_png(path: &Path, frame: &FrameRGBA, cfg: &ScrollConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let rgba = frame.to_opaque_rgba8(cfg.background_color.rgba8())?;
    image::save_buffer_with_format(
        path,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.cfg)?;
    let mut surface = CpuSurface::for_config(&cfg)?;
    let wrapped = render_frame(&mut surface, &cfg, args.scroll)?;
    let frame = surface.snapshot()?;
    write_png(&args.out, &frame, &cfg)?;

    eprintln!(
        "wrote {} ({} lines, text height {:.1}px)",
        args.out.display(),
        wrapped.lines.len(),
        wrapped.total_height()
    );
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.cfg)?;
    let mut surface = CpuSurface::for_config(&cfg)?;
    let mut anim = Animator::new();

    let frames = Rc::new(Cell::new(0u64));
    let counter = frames.clone();
    anim.start(
        &mut surface,
        &cfg,
        move |report: FrameReport| {
            counter.set(counter.get() + 1);
            if report.is_complete {
                tracing::info!(
                    scroll = report.scroll_offset,
                    total_height = report.total_height,
                    "preview complete"
                );
            }
        },
        || true,
    )?;

    match args.out_dir.as_deref() {
        None if args.realtime => {
            run_paced(&mut anim, &mut surface, REFRESH_HZ);
        }
        out_dir => {
            let every = args.every.max(1);
            let period = std::time::Duration::from_secs_f64(1.0 / REFRESH_HZ);
            let mut n = 0u64;
            loop {
                if let Some(dir) = out_dir
                    && n.is_multiple_of(every)
                {
                    let frame = surface.snapshot()?;
                    write_png(&dir.join(format!("preview_{n:05}.png")), &frame, &cfg)?;
                }
                if !anim.has_pending_tick() {
                    break;
                }
                if args.realtime {
                    std::thread::sleep(period);
                }
                anim.tick(&mut surface);
                n += 1;
            }
        }
    }

    eprintln!("previewed {} frames ({:?})", frames.get(), anim.state());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.cfg)?;
    if args.no_audio {
        cfg.audio.enabled = false;
    }
    if !is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg is required for rendering, but was not found on PATH");
    }

    let mut surface = CpuSurface::for_config(&cfg)?;
    let mut sink = FfmpegSink::new().with_background(cfg.background_color.rgba8());
    let mut recorder = Recorder::with_ffmpeg();

    let mut last_logged = -10.0;
    let artifact = recorder.start_recording(&mut surface, &cfg, &mut sink, |progress| {
        if progress - last_logged >= 10.0 {
            last_logged = progress;
            tracing::info!(percent = progress.round(), "capturing");
        }
    })?;

    let path = artifact.save_in(&args.out_dir, chrono::Utc::now())?;
    eprintln!("wrote {} ({})", path.display(), artifact.mime());
    Ok(())
}

fn cmd_probe() -> anyhow::Result<()> {
    if !is_ffmpeg_on_path() {
        eprintln!("ffmpeg not found on PATH; encoding is unavailable");
    }
    let format = select_format(&FfmpegProbe::detect());
    println!("{} (.{})", format.mime(), format.extension());
    Ok(())
}

fn cmd_defaults() -> anyhow::Result<()> {
    println!("{}", ScrollConfig::default().to_json_pretty()?);
    Ok(())
}
