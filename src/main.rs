// Copyright (c) 2026 rezky_nightky

mod background;
mod canvas;
mod cell;
mod color;
mod config;
mod entity;
mod error;
mod frame;
mod hud;
mod registry;
mod scene;
mod scheduler;
mod stage;
mod starfield;
mod surface;
mod terminal;
mod viewport;

use std::env;
use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::color::ColorMode;
use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_list_variants, Args,
};
use crate::error::Result;
use crate::frame::Frame;
use crate::registry::Variant;
use crate::stage::Stage;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("GLOWFIELD_BUILD")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }

    ColorMode::Color16
}

fn detect_color_mode(args: &Args) -> ColorMode {
    match args.colormode {
        None => detect_color_mode_auto(),
        Some(0) => ColorMode::Mono,
        Some(16) => ColorMode::Color16,
        Some(8 | 256) => ColorMode::Color256,
        Some(24 | 32) => ColorMode::TrueColor,
        Some(m) => {
            eprintln!("invalid --colormode: {} (allowed: 0,16,8/256,24/32)", m);
            std::process::exit(1);
        }
    }
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Color16 => "16-color",
        ColorMode::Mono => "mono",
    }
}

// RUST_LOG picks the level; default is warn.
fn init_tracing(log_file: Option<&std::path::Path>) -> Result<bool> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    if let Err(e) = &installed {
        eprintln!("logging disabled: {}", e);
    }
    Ok(installed.is_ok())
}

fn install_exit_hooks() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn parse_args() -> Args {
    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn print_check_bitcolor(args: &Args) {
    let colorterm = env::var("COLORTERM").unwrap_or_default();
    let term = env::var("TERM").unwrap_or_default();
    let auto = detect_color_mode_auto();
    let effective = detect_color_mode(args);
    let or_unset = |v: &str| if v.is_empty() { "(unset)".to_string() } else { v.to_string() };

    println!("BITCOLOR CHECK:");
    println!("  COLORTERM: {}", or_unset(&colorterm));
    println!("  TERM: {}", or_unset(&term));
    println!("  auto_detected: {}", color_mode_label(auto));
    if args.colormode.is_some() {
        println!("  forced: {}", color_mode_label(effective));
    }
    println!("  effective: {}", color_mode_label(effective));
}

fn print_info() {
    println!("Version: v{}", env!("CARGO_PKG_VERSION"));
    let sha = env!("GLOWFIELD_GIT_SHA");
    if sha.is_empty() {
        println!("Build: {}", build_info());
    } else {
        println!("Build: {} ({})", build_info(), sha);
    }
    println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
    println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
}

fn new_stage(args: &Args) -> Stage {
    let stage = Stage::new(&args.variant);
    match args.seed {
        Some(seed) => stage.with_seed(seed),
        None => stage,
    }
}

fn main() {
    install_exit_hooks();
    let args = parse_args();

    if args.list_variants {
        print_list_variants();
        return;
    }
    if args.check_bitcolor {
        print_check_bitcolor(&args);
        return;
    }
    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return;
    }
    if args.info {
        print_info();
        return;
    }

    if let Err(e) = run(&args) {
        restore_terminal_best_effort();
        eprintln!("glowfield: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    init_tracing(args.log_file.as_deref())?;
    let color_mode = detect_color_mode(args);
    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let duration = args.duration.and_then(|s| {
        if !s.is_finite() {
            eprintln!("failed to apply --duration {} (must be a finite number)", s);
            std::process::exit(1);
        }
        (s > 0.0).then(|| require_f64_range("--duration", s, 0.1, 86400.0))
    });

    match args.headless {
        Some(frames) => run_headless(args, frames, color_mode),
        None => run_terminal(args, target_fps, duration, color_mode),
    }
}

fn run_headless(args: &Args, frames: u32, color_mode: ColorMode) -> Result<()> {
    let (cols, rows) = args.size;
    let mut stage = new_stage(args);
    let mounted = stage.mount(cols, rows);
    let mut frame = Frame::new(cols, rows);

    let started = Instant::now();
    let mut fired = 0u32;
    for _ in 0..frames {
        if stage.advance() {
            fired += 1;
        }
    }
    stage.compose(&mut frame, color_mode);
    let elapsed = started.elapsed();

    let lit = (0..cols as usize * rows as usize)
        .filter(|&i| !frame.cell_at_index(i).is_blank())
        .count();

    println!("HEADLESS SUMMARY:");
    println!("  variant: {}", stage.name());
    println!("  known: {}", stage.variant().is_some());
    println!("  size: {}x{}", cols, rows);
    println!("  mounted: {}", mounted);
    println!("  running: {}", stage.is_running());
    println!(
        "  backdrop: {}",
        if stage.background().is_transparent() { "transparent" } else { "gradient" }
    );
    println!("  frames: {} of {}", fired, frames);
    println!("  elapsed_ms: {:.3}", elapsed.as_secs_f64() * 1000.0);
    println!("  lit_cells: {}", lit);
    match stage.scene() {
        Some(scene) => {
            println!("  entities: {}", scene.len());
            for (kind, n) in scene.census() {
                println!("    {:<18} {}", kind.name(), n);
            }
        }
        None => println!("  entities: 0"),
    }
    Ok(())
}

#[derive(Default)]
struct PerfStats {
    frames: u64,
    drawn_frames: u64,
    work_sum_s: f64,
    work_max_s: f32,
    overshoot_frames: u64,
}

impl PerfStats {
    fn record(&mut self, work_s: f32, drawn: bool, period_s: f32) {
        self.frames = self.frames.saturating_add(1);
        if drawn {
            self.drawn_frames = self.drawn_frames.saturating_add(1);
        }
        self.work_sum_s += work_s as f64;
        self.work_max_s = self.work_max_s.max(work_s);
        if work_s > period_s {
            self.overshoot_frames = self.overshoot_frames.saturating_add(1);
        }
    }

    fn print(&self, elapsed: Duration, target_fps: f64) {
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);
        let frames = self.frames.max(1) as f64;

        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  target_fps: {:.3}", target_fps);
        println!("  avg_fps: {:.3}", self.frames as f64 / elapsed_s);
        println!("  frames: {}", self.frames);
        println!(
            "  drawn_frames: {} ({:.1}%)",
            self.drawn_frames,
            self.drawn_frames as f64 / frames * 100.0
        );
        println!("  avg_work_ms: {:.3}", self.work_sum_s / frames * 1000.0);
        println!("  max_work_ms: {:.3}", self.work_max_s as f64 * 1000.0);
        println!(
            "  overshoot_frames: {} ({:.1}%)",
            self.overshoot_frames,
            self.overshoot_frames as f64 / frames * 100.0
        );
    }
}

fn step_variant(stage: &mut Stage, forward: bool) {
    let next = stage
        .variant()
        .map(|v| v.cycle(forward))
        .unwrap_or(Variant::ALL[0]);
    stage.set_variant(next.name());
}

fn run_terminal(
    args: &Args,
    target_fps: f64,
    duration: Option<f64>,
    color_mode: ColorMode,
) -> Result<()> {
    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;

    let mut stage = new_stage(args);
    if !stage.mount(w, h) {
        warn!(cols = w, rows = h, "waiting for a usable terminal size");
    }
    let mut frame = Frame::new(w, h);

    let start_time = Instant::now();
    let end_time = duration.map(|s| start_time + Duration::from_secs_f64(s));

    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let target_period_s = target_period.as_secs_f32().max(0.000_001);
    let mut next_frame = Instant::now();
    let mut perf = PerfStats::default();
    let mut running = true;
    let mut paused = false;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if args.screensaver {
                            running = false;
                            break;
                        }
                        match k.code {
                            KeyCode::Esc | KeyCode::Char('q') => running = false,
                            KeyCode::Char(' ') => {
                                stage.mount(frame.width, frame.height);
                            }
                            KeyCode::Char('p') => {
                                paused = !paused;
                                info!(paused, "pause toggled");
                            }
                            KeyCode::Right | KeyCode::Char('n') => step_variant(&mut stage, true),
                            KeyCode::Left | KeyCode::Char('b') => step_variant(&mut stage, false),
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            if stage.is_mounted() {
                stage.resize(nw, nh);
            } else {
                stage.mount(nw, nh);
            }
            frame = Frame::new(nw, nh);
        }

        let work_start = Instant::now();
        let mut drawn = false;
        if !paused {
            stage.advance();
            stage.compose(&mut frame, color_mode);
            drawn = frame.is_dirty_all() || !frame.dirty_indices().is_empty();
            if drawn {
                term.draw(&mut frame)?;
            }
        }
        let work_s = work_start.elapsed().as_secs_f32();
        if args.perf_stats {
            perf.record(work_s, drawn, target_period_s);
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    stage.unmount();
    drop(term);
    if args.perf_stats {
        perf.print(start_time.elapsed(), target_fps);
    }
    Ok(())
}
