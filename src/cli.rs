//! Command-line front end.
//!
//! `render` replays a loaded file, host messages and pointer events onto a
//! tray image, `sequence` prints the G-code a pick-and-place request expands
//! into, and `defaults` dumps the default configuration.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use magnetpnp_communication::{
    load_gcode_file, simulate, JobAction, PartTable, PickPlaceCommand, PickPlaceSequencer,
    QueuedCommandChannel,
};
use magnetpnp_core::{CellPosition, HostMessage, PartId, PrinterState};
use magnetpnp_settings::Config;
use magnetpnp_tray::{PixmapSurface, Surface, SvgSurface, TrayController, TrayEngine};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "magnetpnp", version, about = "Parts tray view and pick-and-place host")]
pub struct Cli {
    /// Settings file (.toml or .json); defaults to the platform config dir
    #[arg(long, short, env = "MAGNETPNP_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draw the tray after replaying host messages and pointer events
    Render(RenderArgs),
    /// Print the G-code a pick-and-place request expands into
    Sequence(SequenceArgs),
    /// Print or write the default configuration
    Defaults(DefaultsArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON array of host messages to replay
    #[arg(long)]
    pub messages: Option<PathBuf>,

    /// Part catalog to load as a file before the messages
    #[arg(long, conflicts_with = "gcode")]
    pub parts: Option<PathBuf>,

    /// G-code file whose embedded parts are loaded before the messages
    #[arg(long)]
    pub gcode: Option<PathBuf>,

    /// Output image, .png or .svg
    #[arg(long, short)]
    pub out: PathBuf,

    #[arg(long, default_value_t = 400)]
    pub width: u32,

    #[arg(long, default_value_t = 400)]
    pub height: u32,

    /// Pointer click at X,Y (repeatable)
    #[arg(long = "click")]
    pub clicks: Vec<Pixel>,

    /// Pointer double-click at X,Y, after all clicks
    #[arg(long)]
    pub double_click: Option<Pixel>,

    /// Printer connection state
    #[arg(long, default_value = "operational")]
    pub state: PrinterState,
}

#[derive(Args, Debug)]
pub struct SequenceArgs {
    /// Part catalog of the loaded file
    #[arg(long, required_unless_present = "gcode", conflicts_with = "gcode")]
    pub parts: Option<PathBuf>,

    /// G-code file carrying the part descriptions
    #[arg(long)]
    pub gcode: Option<PathBuf>,

    /// Part to pick and place
    #[arg(long)]
    pub part: u32,

    /// Handle the request while a print job is running
    #[arg(long)]
    pub printing: bool,
}

#[derive(Args, Debug)]
pub struct DefaultsArgs {
    /// Write to this file (.toml or .json) instead of stdout
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// A pointer position given as `X,Y`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}

impl FromStr for Pixel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid coordinate '{}': {}", v, e))
        };
        Ok(Self {
            x: parse(x)?,
            y: parse(y)?,
        })
    }
}

/// Runs a parsed command line, writing command output to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match cli.command {
        Command::Render(args) => render(&load_settings(cli.settings.as_deref())?, &args, out),
        Command::Sequence(args) => sequence(&load_settings(cli.settings.as_deref())?, &args, out),
        Command::Defaults(args) => defaults(&args, out),
    }
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Config::load_or_default(&Config::default_path()?)?,
    };
    tracing::debug!(
        "Tray {}x{}, {} mm boxes",
        config.tray.columns,
        config.tray.rows,
        config.tray.boxsize
    );
    Ok(config)
}

fn render(config: &Config, args: &RenderArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let mut messages = Vec::new();
    if let Some(path) = &args.parts {
        let table = PartTable::load(path)?;
        messages.push(HostMessage::file(table.descriptors()));
    }
    if let Some(path) = &args.gcode {
        messages.push(load_gcode_file(path)?.message);
    }
    if let Some(path) = &args.messages {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading messages from {}", path.display()))?;
        let replay: Vec<HostMessage> = serde_json::from_str(&content)
            .with_context(|| format!("parsing messages in {}", path.display()))?;
        messages.extend(replay);
    }

    match args.out.extension().and_then(|ext| ext.to_str()) {
        Some("png") => {
            let surface = PixmapSurface::new(args.width, args.height)?;
            let surface = replay(surface, config, args, &messages, out)?;
            surface.save_png(&args.out)?;
        }
        Some("svg") => {
            let surface = SvgSurface::new(args.width, args.height);
            let surface = replay(surface, config, args, &messages, out)?;
            surface.save(&args.out)?;
        }
        other => bail!(
            "unsupported image format '{}', use .png or .svg",
            other.unwrap_or("")
        ),
    }
    writeln!(out, "wrote {}", args.out.display())?;
    Ok(())
}

fn replay<S: Surface>(
    surface: S,
    config: &Config,
    args: &RenderArgs,
    messages: &[HostMessage],
    out: &mut impl Write,
) -> anyhow::Result<S> {
    let tray = &config.tray;
    let engine = TrayEngine::new(
        tray.columns,
        tray.rows,
        tray.boxsize,
        surface,
        &tray.effective_box_configuration(),
    )?;
    let channel = QueuedCommandChannel::new();
    let mut controller = TrayController::new(engine, channel.clone());
    controller.set_printer_state(args.state);
    controller.engine_mut().repaint();

    for message in messages {
        controller.handle_message(message);
    }
    for click in &args.clicks {
        match controller.click(click.x, click.y) {
            Some(part) => writeln!(out, "selected part {}", part)?,
            None => writeln!(out, "nothing at {},{}", click.x, click.y)?,
        }
    }
    if let Some(click) = args.double_click {
        controller.double_click(click.x, click.y)?;
    }

    writeln!(out, "status: {}", controller.status())?;
    if !controller.current_operation().is_empty() {
        writeln!(out, "operation: {}", controller.current_operation())?;
    }
    for command in channel.drain() {
        writeln!(out, "sent: {}", command)?;
    }

    let (engine, _) = controller.into_parts();
    if let Some(part) = engine.highlighted().and_then(|id| engine.part(id)) {
        let CellPosition { column, row } = part.cell;
        writeln!(out, "highlighted: {} (column {}, row {})", part.id(), column, row)?;
    }
    Ok(engine.into_surface())
}

fn sequence(config: &Config, args: &SequenceArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let table = load_catalog(args)?;
    let mut sequencer = PickPlaceSequencer::new(config.clone(), table);
    let printer = if args.printing {
        PrinterState::Printing
    } else {
        PrinterState::Operational
    };

    let request = PickPlaceCommand::new(PartId(args.part)).to_string();
    tracing::info!("Sequencing '{}' with printer {}", request, printer);
    let transcript = simulate(&mut sequencer, &request, printer);

    for message in &transcript.messages {
        writeln!(out, "; {}", message.description())?;
    }
    for line in &transcript.lines {
        writeln!(out, "{}", line)?;
    }
    for action in &transcript.job_actions {
        let action = match action {
            JobAction::Pause => "pause",
            JobAction::Resume => "resume",
        };
        writeln!(out, "; {} print job", action)?;
    }

    if let Some(HostMessage::Error(error)) = transcript
        .messages
        .iter()
        .find(|m| matches!(m, HostMessage::Error(_)))
    {
        bail!("pick-and-place of part {} aborted: {}", args.part, error.kind);
    }
    Ok(())
}

fn load_catalog(args: &SequenceArgs) -> anyhow::Result<PartTable> {
    match (&args.parts, &args.gcode) {
        (Some(path), _) => Ok(PartTable::load(path)?),
        (None, Some(path)) => {
            let load = load_gcode_file(path)?;
            if let HostMessage::Error(error) = &load.message {
                bail!("{}: {}", path.display(), error.kind);
            }
            Ok(load.table)
        }
        (None, None) => bail!("either --parts or --gcode is required"),
    }
}

fn defaults(args: &DefaultsArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let config = Config::default();
    match &args.out {
        Some(path) => {
            config.save_to_file(path)?;
            writeln!(out, "wrote {}", path.display())?;
        }
        None => writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?,
    }
    Ok(())
}
