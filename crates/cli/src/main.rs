#![deny(unsafe_code)]
//! CLI binary for swatch.
//!
//! Subcommands:
//! - `convert <color>`: show a color as hex, rgb, hsl or cmyk
//! - `contrast <fg> [bg]`: WCAG ratio and tier, or the best of white/black
//! - `harmony <color> <kind>`: derive a harmony palette
//! - `lighten` / `darken`: shift lightness
//! - `save`: store a palette in history
//! - `import <file>`: parse a model reply into a palette, keeping `--lock` pins
//! - `history list|show|delete|clear`: manage saved palettes
//! - `list`: print harmony kinds and display formats

mod config;
mod error;

use chrono::Utc;
use clap::{Parser, Subcommand};
use config::Config;
use error::CliError;
use std::fs;
use std::path::PathBuf;
use std::process;
use swatch_core::contrast::{self, ContrastReport};
use swatch_core::{
    parse_model_response, ColorFormat, HarmonyKind, HarmonyPalette, HistoryStore,
    LockedColorSet, Palette, PinnedColor, Rgb, Session, PALETTE_SIZE,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "swatch", about = "Color palette toolkit: conversions, contrast, harmonies, history")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// History file to use instead of the configured one.
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a color in one or all display formats.
    Convert {
        /// Hex color, e.g. "#3366cc" or "36c".
        color: String,

        /// Format (hex, rgb, hsl, cmyk or all). Unknown names fall back to hex.
        #[arg(long)]
        to: Option<String>,
    },
    /// Contrast ratio of a pair, or the best background for one color.
    Contrast {
        /// Foreground color.
        foreground: String,

        /// Background color. Omit to compare against white and black.
        background: Option<String>,
    },
    /// Derive a harmony palette from a base color.
    Harmony {
        /// Base color.
        color: String,

        /// complementary, analogous, triadic, tetradic or monochromatic.
        kind: String,
    },
    /// Move a color's lightness toward white.
    Lighten {
        color: String,
        /// 0 to 1; 0.1 raises lightness by 10 points.
        amount: f64,
    },
    /// Move a color's lightness toward black.
    Darken {
        color: String,
        /// 0 to 1; 0.1 lowers lightness by 10 points.
        amount: f64,
    },
    /// Save a five-color palette to history.
    Save {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Exactly five hex colors.
        #[arg(num_args = PALETTE_SIZE, required = true)]
        colors: Vec<String>,
    },
    /// Parse an analysis reply (model text) into a palette.
    Import {
        /// File holding the reply text.
        file: PathBuf,

        /// Keep a color at a slot, as SLOT=HEX (repeatable).
        #[arg(long = "lock", value_parser = parse_pin)]
        locks: Vec<PinnedColor>,

        /// Also save the result to history.
        #[arg(long)]
        save: bool,
    },
    /// Manage saved palettes.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// List harmony kinds and display formats.
    List,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved palettes, newest first.
    List,
    /// Show one saved palette.
    Show { index: usize },
    /// Delete one saved palette. Missing indices are ignored.
    Delete { index: usize },
    /// Delete every saved palette.
    Clear,
}

fn parse_pin(s: &str) -> Result<PinnedColor, String> {
    let (slot, hex) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SLOT=HEX, got '{s}'"))?;
    let slot_index: usize = slot
        .trim()
        .parse()
        .map_err(|e| format!("invalid slot '{slot}': {e}"))?;
    if slot_index >= PALETTE_SIZE {
        return Err(format!(
            "slot {slot_index} out of range (0..{PALETTE_SIZE})"
        ));
    }
    let hex = Rgb::from_hex(hex).map_err(|e| e.to_string())?;
    Ok(PinnedColor { slot_index, hex })
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn color_json(color: Rgb) -> serde_json::Value {
    serde_json::json!({
        "hex": color.format(ColorFormat::Hex),
        "rgb": color.format(ColorFormat::Rgb),
        "hsl": color.format(ColorFormat::Hsl),
        "cmyk": color.format(ColorFormat::Cmyk),
    })
}

fn print_palette(palette: &Palette, locks: &LockedColorSet, format: ColorFormat) {
    println!("{}", palette.name());
    if let Some(desc) = palette.description() {
        println!("  {desc}");
    }
    for (slot, color) in palette.colors().iter().enumerate() {
        let marker = if locks.is_locked(slot) { " (locked)" } else { "" };
        println!("  {slot}: {}{marker}", color.format(format));
    }
    if palette.timestamp().is_some() {
        println!("  saved {}", palette.display_date());
    }
}

fn print_adjusted(color: Rgb, format: ColorFormat, json: bool) -> Result<(), CliError> {
    if json {
        print_json(&color_json(color))
    } else {
        println!("{}", color.format(format));
        Ok(())
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    let format = config.format;
    let store = || -> Result<HistoryStore, CliError> {
        let path = config.history_path(cli.history.clone())?;
        debug!(path = %path.display(), "using history store");
        Ok(HistoryStore::new(path))
    };

    match cli.command {
        Command::List => {
            let harmonies = HarmonyKind::list_names();
            let formats: Vec<&str> = ColorFormat::ALL.iter().map(|f| f.as_str()).collect();
            if cli.json {
                print_json(&serde_json::json!({
                    "harmonies": harmonies,
                    "formats": formats,
                }))?;
            } else {
                println!("Harmonies:");
                for name in harmonies {
                    println!("  {name}");
                }
                println!("Formats:");
                println!("  {}", formats.join(", "));
            }
        }
        Command::Convert { color, to } => {
            let rgb = Rgb::from_hex(&color)?;
            let wanted = to.as_deref().map(str::trim);
            if cli.json {
                let all = color_json(rgb);
                match wanted {
                    Some("all") => print_json(&all)?,
                    Some(name) => {
                        let f = ColorFormat::parse_lenient(name);
                        print_json(&serde_json::json!({ f.as_str(): rgb.format(f) }))?
                    }
                    None => print_json(&serde_json::json!({ format.as_str(): rgb.format(format) }))?,
                }
            } else {
                match wanted {
                    Some("all") => {
                        for f in ColorFormat::ALL {
                            println!("{:<5} {}", f.as_str(), rgb.format(f));
                        }
                    }
                    Some(name) => println!("{}", rgb.format(ColorFormat::parse_lenient(name))),
                    None => println!("{}", rgb.format(format)),
                }
            }
        }
        Command::Contrast {
            foreground,
            background,
        } => {
            let fg = Rgb::from_hex(&foreground)?;
            match background {
                Some(bg) => {
                    let report = ContrastReport::new(fg, Rgb::from_hex(&bg)?);
                    if cli.json {
                        print_json(&report)?;
                    } else {
                        let mark = |ok: bool| if ok { "pass" } else { "fail" };
                        println!(
                            "{} on {}: {:.2}:1 ({})",
                            report.foreground, report.background, report.ratio, report.tier
                        );
                        println!(
                            "  AA normal {}, AA large {}, AAA normal {}, AAA large {}",
                            mark(report.aa_normal),
                            mark(report.aa_large),
                            mark(report.aaa_normal),
                            mark(report.aaa_large)
                        );
                    }
                }
                None => {
                    let best = contrast::best_background(fg);
                    if cli.json {
                        print_json(&best)?;
                    } else {
                        println!(
                            "{fg} reads best on {}: {:.2}:1 ({})",
                            best.choice, best.ratio, best.tier
                        );
                    }
                }
            }
        }
        Command::Harmony { color, kind } => {
            let base = Rgb::from_hex(&color)?;
            let kind: HarmonyKind = kind.parse()?;
            let harmony = HarmonyPalette::generate(base, kind);
            if cli.json {
                print_json(&harmony)?;
            } else {
                println!("{}", harmony.suggested_name());
                for (i, c) in harmony.colors.iter().enumerate() {
                    println!("  {i}: {}", c.format(format));
                }
            }
        }
        Command::Lighten { color, amount } => {
            let adjusted = contrast::lighten(Rgb::from_hex(&color)?, amount);
            print_adjusted(adjusted, format, cli.json)?;
        }
        Command::Darken { color, amount } => {
            let adjusted = contrast::darken(Rgb::from_hex(&color)?, amount);
            print_adjusted(adjusted, format, cli.json)?;
        }
        Command::Save {
            name,
            description,
            colors,
        } => {
            let hexes: Vec<&str> = colors.iter().map(String::as_str).collect();
            let palette =
                Palette::from_hex(&name, &hexes)?.with_description(description.as_deref());
            let store = store()?;
            let mut history = store.load();
            history.save_now(palette);
            store.save(&history)?;
            if cli.json {
                print_json(&history.get(0))?;
            } else {
                eprintln!(
                    "saved '{name}' ({} in history) -> {}",
                    history.len(),
                    store.path().display()
                );
            }
        }
        Command::Import { file, locks, save } => {
            let text = fs::read_to_string(&file)
                .map_err(|e| CliError::Io(format!("cannot read {}: {e}", file.display())))?;
            let reply = parse_model_response(&text)?;

            let mut session = Session::new(format);
            let pins: LockedColorSet = locks.into_iter().collect();
            // Seed the session with the pinned colors so they survive the reply.
            session.set_palette(pins.apply_to(&reply));
            for pin in pins.pins() {
                session.toggle_lock(pin.slot_index)?;
            }
            let palette = session.accept_response(reply).clone();

            if save {
                let store = store()?;
                let mut history = store.load();
                session.save_to(&mut history, Utc::now())?;
                store.save(&history)?;
                debug!(entries = history.len(), "imported palette saved");
            }

            if cli.json {
                print_json(&palette)?;
            } else {
                print_palette(&palette, session.locks(), format);
                println!("  {}", palette.share_text());
            }
        }
        Command::History { action } => {
            let store = store()?;
            let mut history = store.load();
            match action {
                HistoryAction::List => {
                    if cli.json {
                        let entries: Vec<&Palette> = history.iter().collect();
                        print_json(&entries)?;
                    } else if history.is_empty() {
                        println!("No saved palettes.");
                    } else {
                        for (i, p) in history.iter().enumerate() {
                            println!("[{i}] {} ({}): {}", p.name(), p.display_date(), p.hex_list());
                        }
                    }
                }
                HistoryAction::Show { index } => {
                    let palette = history.get(index).ok_or_else(|| {
                        CliError::Input(format!("no saved palette at index {index}"))
                    })?;
                    if cli.json {
                        print_json(palette)?;
                    } else {
                        print_palette(palette, &LockedColorSet::new(), format);
                    }
                }
                HistoryAction::Delete { index } => match history.delete(index) {
                    Some(removed) => {
                        store.save(&history)?;
                        if !cli.json {
                            eprintln!("deleted '{}'", removed.name());
                        }
                    }
                    None => debug!(index, "nothing to delete"),
                },
                HistoryAction::Clear => {
                    history.clear();
                    store.save(&history)?;
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load();
    let json_mode = cli.json;
    if let Err(e) = run(cli, config) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
