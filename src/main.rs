use clap::{Parser, Subcommand};
use photo_framer::imaging::rust_backend::{is_png, is_supported_input, supported_input_extensions};
use photo_framer::imaging::{RasterSurface, load_picture, save_canvas};
use photo_framer::session::{Point, Session};
use photo_framer::{config, frame_store, output};
use std::path::{Path, PathBuf};
use tracing::{Level, debug};

#[derive(Parser)]
#[command(name = "photo-framer")]
#[command(about = "Place a photo behind a decorative frame and export the result")]
#[command(long_about = "\
Place a photo behind a decorative frame and export the result

The frame is a PNG with transparent regions. The output canvas takes the
frame's size (capped at canvas.max_dimension); the photo is scaled to cover
the canvas, or the mask rectangle when [mask] is enabled, and drawn under
the frame.

View inputs are applied in this order:
  --zoom, --pan, each --drag, --center, --reset

Frame lookup (first available wins):
  --frame <PNG>  →  --frame-name <NAME>  →  remembered frame  →  frames.default

Run 'photo-framer gen-config' to generate a documented photo-framer.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding photo-framer.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Directory for the remembered frame
    #[arg(long, default_value = ".photo-framer", global = true)]
    state_dir: PathBuf,

    /// Log geometry and state changes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Inputs shared by commands that build a composition.
#[derive(clap::Args, Clone)]
struct ViewArgs {
    /// Photo to place behind the frame
    #[arg(long)]
    photo: PathBuf,

    /// Frame PNG; remembered for later runs
    #[arg(long, conflicts_with = "frame_name")]
    frame: Option<PathBuf>,

    /// Frame picked by name from [frames] choices
    #[arg(long)]
    frame_name: Option<String>,

    /// Zoom factor (1 = photo just covers the visible area)
    #[arg(long, allow_hyphen_values = true)]
    zoom: Option<String>,

    /// Pan offset from center in canvas pixels, as X,Y
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pan: Option<Point>,

    /// Drag from one canvas point to another, as X0,Y0:X1,Y1 (repeatable)
    #[arg(long, value_parser = parse_drag, allow_hyphen_values = true)]
    drag: Vec<(Point, Point)>,

    /// Recenter the photo after the pan and drags
    #[arg(long)]
    center: bool,

    /// Recenter and return to the default zoom
    #[arg(long)]
    reset: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render the composition and export it
    Compose {
        #[command(flatten)]
        view: ViewArgs,

        /// Output file; the extension picks the format (png, jpg, webp)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the computed geometry without rendering
    Plan(ViewArgs),
    /// Manage the remembered frame
    Frame {
        #[command(subcommand)]
        action: FrameAction,
    },
    /// List the configured frame choices
    Frames,
    /// Print a stock photo-framer.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum FrameAction {
    /// Remember a frame PNG for later runs
    Remember { png: PathBuf },
    /// Forget the remembered frame
    Forget,
    /// Show the remembered frame
    Show,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Compose { view, output: out } => {
            let app_config = config::load_config(&cli.config)?;
            let (mut session, frame_path) = build_session(&cli, &app_config, view)?;

            let mut surface = RasterSurface::new();
            let report = session
                .render(&mut surface)
                .ok_or("no frame loaded; nothing to render")?;

            let out_path = out
                .clone()
                .unwrap_or_else(|| PathBuf::from(&app_config.export.filename));
            save_canvas(surface.canvas(), &out_path, app_config.jpeg_quality())?;

            // Remember an explicitly chosen frame only once everything else succeeded
            if view.frame.is_some() {
                frame_store::remember(&cli.state_dir, &frame_path)?;
            }
            output::print_render_report(&report, &out_path);
        }
        Command::Plan(view) => {
            let app_config = config::load_config(&cli.config)?;
            let (mut session, _) = build_session(&cli, &app_config, view)?;
            let plan = session
                .settle()
                .ok_or("no frame loaded; nothing to plan")?;
            output::print_plan(&plan);
        }
        Command::Frame { action } => match action {
            FrameAction::Remember { png } => {
                let stored = frame_store::remember(&cli.state_dir, png)?;
                output::print_stored_frame(Some(&stored));
            }
            FrameAction::Forget => {
                if frame_store::forget(&cli.state_dir)? {
                    println!("Forgot remembered frame");
                } else {
                    println!("No remembered frame");
                }
            }
            FrameAction::Show => {
                let stored = frame_store::recall(&cli.state_dir)?;
                output::print_stored_frame(stored.as_ref());
            }
        },
        Command::Frames => {
            let app_config = config::load_config(&cli.config)?;
            output::print_frames(&app_config.frames);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. Results go to stdout.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the frame and photo, then replay the view inputs.
///
/// Returns the session and the frame path it was loaded from.
fn build_session(
    cli: &Cli,
    app_config: &config::AppConfig,
    view: &ViewArgs,
) -> Result<(Session, PathBuf), Box<dyn std::error::Error>> {
    let frame_path = resolve_frame(cli, app_config, view)?;
    if !is_png(&frame_path)? {
        return Err(format!("frame must be a PNG: {}", frame_path.display()).into());
    }
    debug!(frame = %frame_path.display(), "using frame");
    check_photo_format(&view.photo)?;
    let frame = load_picture(&frame_path)?;
    let photo = load_picture(&view.photo)?;

    let mut session = Session::new(app_config.compositor_settings()?, app_config.default_zoom());
    session.load_frame(frame);
    if let Some(zoom) = &view.zoom {
        session.set_zoom_input(Some(zoom.as_str()));
    }
    session.load_photo(photo);
    session.settle();

    if let Some(pan) = view.pan {
        drag(&mut session, Point::default(), pan);
    }
    for &(from, to) in &view.drag {
        drag(&mut session, from, to);
    }
    if view.center {
        session.center();
    }
    if view.reset {
        session.reset();
    }
    Ok((session, frame_path))
}

/// Reject photos no compiled-in decoder handles before reading them.
fn check_photo_format(photo: &Path) -> Result<(), String> {
    if is_supported_input(photo) {
        return Ok(());
    }
    Err(format!(
        "unsupported photo format: {} (expected one of: {})",
        photo.display(),
        supported_input_extensions().join(", ")
    ))
}

/// One complete drag, settled the way a host re-renders after each move.
fn drag(session: &mut Session, from: Point, to: Point) {
    session.drag_start(from);
    session.drag_move(to);
    session.drag_end();
    session.settle();
}

fn resolve_frame(
    cli: &Cli,
    app_config: &config::AppConfig,
    view: &ViewArgs,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = &view.frame {
        return Ok(path.clone());
    }
    if let Some(name) = &view.frame_name {
        return app_config
            .frames
            .resolve(name, &cli.config)
            .ok_or_else(|| format!("unknown frame name: {name}").into());
    }
    if let Some(stored) = frame_store::recall(&cli.state_dir)? {
        return Ok(stored.path);
    }
    app_config.frames.default_path(&cli.config).ok_or_else(|| {
        "no frame: pass --frame, run 'photo-framer frame remember', or set frames.default".into()
    })
}

/// Parse `X,Y` into a point.
fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("invalid coordinate {v:?}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

/// Parse `X0,Y0:X1,Y1` into a start and end point.
fn parse_drag(s: &str) -> Result<(Point, Point), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected X0,Y0:X1,Y1, got {s:?}"))?;
    Ok((parse_point(from)?, parse_point(to)?))
}
