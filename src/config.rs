// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::error::{GlowError, Result};
use crate::registry::Variant;
use crate::stage::DEFAULT_VARIANT;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  glowfield --variant neural --fps 60 --duration 0 --size 80x24";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("  glowfield") {
            out.push_str("  \x1b[1;34mglowfield\x1b[0m");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
        } else {
            out.push_str(line);
        }
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

pub fn parse_size(s: &str) -> Result<(u16, u16)> {
    let bad = || GlowError::InvalidSize(s.to_string());
    let (c, r) = s
        .trim()
        .split_once(['x', 'X', '*'])
        .ok_or_else(bad)?;
    let cols: u16 = c.trim().parse().map_err(|_| bad())?;
    let rows: u16 = r.trim().parse().map_err(|_| bad())?;
    if cols == 0 || rows == 0 {
        return Err(bad());
    }
    Ok((cols, rows))
}

fn size_arg(s: &str) -> std::result::Result<(u16, u16), String> {
    parse_size(s).map_err(|e| e.to_string())
}

#[derive(Parser, Debug, Clone)]
#[command(name = "glowfield", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'V',
        long = "variant",
        default_value = DEFAULT_VARIANT,
        help_heading = "GENERAL",
        help = "Background variant (see --list-variants)"
    )]
    pub variant: String,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on any keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the simulation for reproducible runs"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit (TERM=...256color), else 16-color"
    )]
    pub colormode: Option<u16>,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "perf-stats",
        help_heading = "PERFORMANCE",
        help = "Print performance statistics summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "headless",
        value_name = "FRAMES",
        help_heading = "TESTING",
        help = "Run N frames without a terminal and print a summary"
    )]
    pub headless: Option<u32>,

    #[arg(
        long = "size",
        default_value = "80x24",
        value_parser = size_arg,
        help_heading = "TESTING",
        help = "Surface size for --headless, as COLSxROWS"
    )]
    pub size: (u16, u16),

    #[arg(
        long = "log-file",
        help_heading = "DIAGNOSTICS",
        help = "Write logs to FILE (level from RUST_LOG, default warn)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "list-variants",
        help_heading = "HELP",
        help = "List available background variants and exit"
    )]
    pub list_variants: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

fn describe(v: Variant) -> &'static str {
    match v {
        Variant::Neural => "Drifting nodes with links and a HUD overlay",
        Variant::Matrix => "Falling glyph rain with fading trails",
        Variant::AiParticles => "Cyan and violet particle swarm",
        Variant::FloatingOrbs => "Soft hue-cycling orbs on a transparent backdrop",
        Variant::LightOrbs => "Warm floating light orbs",
        Variant::NeonCyber => "Flickering neon orbs that glitch on impact",
        Variant::CosmicNebula => "Layered nebula clouds and twinkling stars",
        Variant::Waves => "Six layered sine waves",
        Variant::SolarParticles => "Rising sunlit bubbles and solar dust",
        Variant::SynthwaveRetro => "Retro grid, mountains and a striped sun",
        Variant::TwinklingStars => "Twinkling stars over a deep sky",
        Variant::CosmicCss => "Three-layer scrolling parallax starfield",
    }
}

pub fn print_list_variants() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE VARIANTS:\x1b[0m");
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with --variant.\x1b[0m");
    } else {
        println!("AVAILABLE VARIANTS:");
        println!("NOTE: Use only the VALUE (left side) with --variant.");
    }
    println!();
    println!("VALUE             DESCRIPTION");
    for v in Variant::ALL {
        println!("{:<17} {}", v.name(), describe(v));
    }
}
