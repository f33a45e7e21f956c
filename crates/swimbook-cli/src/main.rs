//! swimbook - swim club roster utility.
//!
//! Loads a season roster from JSON and classifies, previews or converts its
//! recorded times between short course (25m) and long course (50m). The
//! loaded roster file is never rewritten; conversion output goes to a new
//! file.

mod config;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swimbook_core::auth::{Action, Role};
use swimbook_core::bulk::PREVIEW_LIMIT;
use swimbook_core::models::Course;
use swimbook_core::roster::Roster;
use swimbook_core::session::Session;
use swimbook_core::times;

use config::Config;

const COMMANDS: [&str; 4] = ["summary", "classify", "preview", "convert"];

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn usage() {
    eprintln!("Usage: swimbook [--role <admin|coach|assistant>] [roster.json] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  summary                         show the roster");
    eprintln!("  classify <25m|50m>              count convertible times");
    eprintln!("  preview  <25m|50m> [limit]      show what would be converted");
    eprintln!("  convert  <25m|50m> [out.json]   write a converted copy");
    eprintln!();
    eprintln!("The roster path may be omitted after a first run; the last one is remembered.");
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let mut config = Config::load().unwrap_or_default();

    // Manual arg parsing: flags first, then an optional roster path, then
    // the command and its arguments.
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let mut role: Option<Role> = None;
    if let Some(pos) = args.iter().position(|a| a == "--role") {
        if pos + 1 >= args.len() {
            usage();
            bail!("--role needs a value");
        }
        role = Some(args[pos + 1].parse().map_err(anyhow::Error::msg)?);
        args.drain(pos..=pos + 1);
    }
    let role = match role {
        Some(r) => r,
        None => match config.last_role.as_deref() {
            Some(saved) => saved.parse().map_err(anyhow::Error::msg)?,
            None => Role::Admin,
        },
    };

    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        usage();
        return Ok(());
    }

    let (path, rest) = if COMMANDS.contains(&args[0].as_str()) {
        let path = config
            .default_roster
            .clone()
            .context("no roster path given and none remembered; pass one explicitly")?;
        (path, &args[..])
    } else {
        (PathBuf::from(&args[0]), &args[1..])
    };
    let Some((command, cmd_args)) = rest.split_first() else {
        usage();
        bail!("missing command");
    };

    let roster = load_roster(&path)?;
    info!(season = %roster.season, path = %path.display(), "roster loaded");

    config.default_roster = Some(path.clone());
    config.last_role = Some(role.to_string());
    if let Err(e) = config.save() {
        tracing::warn!("could not save config: {e}");
    }

    let mut session = Session::new("cli", role);
    session.load_roster(roster);

    match command.as_str() {
        "summary" => summary(&session),
        "classify" => {
            let target = target_course(cmd_args.first())?;
            classify(&session, target)
        }
        "preview" => {
            let target = target_course(cmd_args.first())?;
            let limit = match cmd_args.get(1) {
                Some(n) => n.parse().context("limit must be a number")?,
                None => PREVIEW_LIMIT,
            };
            preview(&session, target, limit)
        }
        "convert" => {
            let target = target_course(cmd_args.first())?;
            let out = cmd_args.get(1).map(PathBuf::from);
            convert(&mut session, target, &path, out)
        }
        other => {
            usage();
            bail!("unknown command {other:?}");
        }
    }
}

fn load_roster(path: &Path) -> Result<Roster> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let roster: Roster = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    roster.check_integrity()?;
    Ok(roster)
}

fn target_course(arg: Option<&String>) -> Result<Course> {
    let arg = arg.context("missing target course (25m or 50m)")?;
    Course::from_label(arg).with_context(|| format!("unknown course {arg:?} (use 25m or 50m)"))
}

fn summary(session: &Session) -> Result<()> {
    let roster = session.roster().context("no roster loaded")?;
    println!("Season: {}", roster.season);
    println!(
        "{} swimmers, {} recorded times",
        roster.swimmers.len(),
        roster.total_times()
    );
    println!();
    for swimmer in &roster.swimmers {
        let availability = if swimmer.available { "" } else { "  [unavailable]" };
        println!(
            "  {:<30} {} times{}",
            swimmer.display_name(),
            swimmer.times_recorded(),
            availability
        );
    }
    Ok(())
}

fn classify(session: &Session, target: Course) -> Result<()> {
    let counts = session.classify(target)?;
    println!("Target course: {target}");
    println!("  Total times:        {}", counts.total_present);
    println!("  Convertible:        {}", counts.convertible);
    println!("  Already in {target}:    {}", counts.already_correct);
    if counts.unknown_course > 0 {
        println!("  Excluded (unknown course): {}", counts.unknown_course);
    }
    if counts.unparsable > 0 {
        println!("  Excluded (unparsable time): {}", counts.unparsable);
    }
    Ok(())
}

fn preview(session: &Session, target: Course, limit: usize) -> Result<()> {
    // Ask for one extra row so the truncation note only appears when
    // rows actually remain beyond the limit.
    let mut rows = session.preview(target, limit.saturating_add(1))?;
    let truncated = rows.len() > limit;
    rows.truncate(limit);
    if rows.is_empty() {
        println!("Nothing to convert to {target}.");
        return Ok(());
    }
    for row in &rows {
        println!(
            "  {:<20} {:<18} {} ({}) -> {} ({})",
            row.swimmer,
            row.event.to_string(),
            times::format(row.original),
            row.original_course,
            times::format(row.converted),
            target
        );
    }
    if truncated {
        println!("  ... (showing the first {limit})");
    }
    Ok(())
}

fn convert(
    session: &mut Session,
    target: Course,
    input: &Path,
    out: Option<PathBuf>,
) -> Result<()> {
    if !session.role.is_allowed(Action::Download) {
        bail!("role {} is not allowed to download converted output", session.role);
    }

    let result = session
        .convert_all_with_progress(target, |done, total| {
            eprint!("\rConverting {done}/{total}");
        })?
        .clone();
    if result.converted_count() > 0 {
        eprintln!();
    }

    let converted = session
        .converted_roster()
        .context("conversion produced no roster")?;
    let out = out.unwrap_or_else(|| output_path(input, target));
    let json = serde_json::to_string_pretty(converted)?;
    std::fs::write(&out, json)
        .with_context(|| format!("failed to write {}", out.display()))?;

    println!(
        "Converted {} times to {} ({})",
        result.converted_count(),
        target,
        result.timestamp.format("%Y-%m-%d %H:%M:%S")
    );
    println!("Wrote {}", out.display());
    Ok(())
}

/// Default output name alongside the input, e.g.
/// `roster_converted_50m_20260828_101500.json`.
fn output_path(input: &Path, target: Course) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("roster");
    let name = format!(
        "{stem}_converted_{}_{}.json",
        target,
        Utc::now().format("%Y%m%d_%H%M%S")
    );
    input.with_file_name(name)
}
