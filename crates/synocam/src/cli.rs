//! Clap derive structures for the `synocam` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use synocam_core::EventKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// synocam -- CLI for Synology Surveillance Station cameras
#[derive(Debug, Parser)]
#[command(
    name = "synocam",
    version,
    about = "Manage Surveillance Station cameras from the command line",
    long_about = "A CLI for Synology Surveillance Station.\n\n\
        Lists cameras, grabs snapshots, drives PTZ, and watches cameras\n\
        for motion/alarm/manual/external/action-rule events in real time.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Station profile to use
    #[arg(long, short = 'p', env = "SYNOCAM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Station URL (overrides profile)
    #[arg(long, short = 's', env = "SYNOCAM_STATION", global = true)]
    pub station: Option<String>,

    /// DSM account name (overrides profile)
    #[arg(long, env = "SYNOCAM_ACCOUNT", global = true)]
    pub account: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SYNOCAM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SYNOCAM_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SYNOCAM_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Event kind selector for `--kinds` flags.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EventKindArg {
    Motion,
    Alarm,
    Manual,
    External,
    ActionRule,
}

impl From<EventKindArg> for EventKind {
    fn from(arg: EventKindArg) -> Self {
        match arg {
            EventKindArg::Motion => EventKind::Motion,
            EventKindArg::Alarm => EventKind::Alarm,
            EventKindArg::Manual => EventKind::Manual,
            EventKindArg::External => EventKind::External,
            EventKindArg::ActionRule => EventKind::ActionRule,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage cameras
    #[command(alias = "cam", alias = "c")]
    Cameras(CamerasArgs),

    /// Query recorded events
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// Grab a camera snapshot (JPEG)
    Snapshot(SnapshotArgs),

    /// Pan/tilt/zoom control
    Ptz(PtzArgs),

    /// Watch cameras and print event transitions as they happen
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CAMERAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CamerasArgs {
    #[command(subcommand)]
    pub command: CamerasCommand,
}

#[derive(Debug, Subcommand)]
pub enum CamerasCommand {
    /// List all cameras
    #[command(alias = "ls")]
    List,

    /// Show settings for one camera
    Info {
        /// Camera ID or name
        camera: String,
    },

    /// Enable a camera
    Enable {
        /// Camera ID or name
        camera: String,
    },

    /// Disable a camera
    Disable {
        /// Camera ID or name
        camera: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List recent events for a camera
    #[command(alias = "ls")]
    List {
        /// Camera ID or name
        camera: String,

        /// Look-back window in seconds
        #[arg(long, default_value = "3600")]
        last: u64,

        /// Restrict to specific event kinds (comma-separated)
        #[arg(long, value_delimiter = ',')]
        kinds: Vec<EventKindArg>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SNAPSHOT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Camera ID or name
    pub camera: String,

    /// Write the JPEG to this file instead of stdout
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Stream profile: 1 live, 2 balanced, 3 low bandwidth
    #[arg(long)]
    pub stream: Option<u8>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PTZ
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PtzArgs {
    #[command(subcommand)]
    pub command: PtzCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PtzDirectionArg {
    Up,
    Down,
    Left,
    Right,
    Home,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ZoomArg {
    In,
    Out,
}

#[derive(Debug, Subcommand)]
pub enum PtzCommand {
    /// Move the camera in a direction
    Move {
        /// Camera ID or name
        camera: String,

        /// Direction to move
        direction: PtzDirectionArg,

        /// Movement speed (1-5, camera dependent)
        #[arg(long, default_value = "1")]
        speed: u8,
    },

    /// Zoom in or out
    Zoom {
        /// Camera ID or name
        camera: String,

        /// Zoom direction
        control: ZoomArg,
    },

    /// List preset positions
    Presets {
        /// Camera ID or name
        camera: String,
    },

    /// Move to a preset position
    Goto {
        /// Camera ID or name
        camera: String,

        /// Preset ID (see `ptz presets`)
        preset: i64,
    },

    /// List patrol routes
    Patrols {
        /// Camera ID or name
        camera: String,
    },

    /// Run a patrol route
    Patrol {
        /// Camera ID or name
        camera: String,

        /// Patrol ID (see `ptz patrols`)
        patrol: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Cameras to watch (IDs or names; all cameras when omitted)
    pub cameras: Vec<String>,

    /// Poll interval in seconds (overrides profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Restrict to specific event kinds (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub kinds: Vec<EventKindArg>,

    /// Also print camera health (online/offline) changes
    #[arg(long)]
    pub health: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the effective configuration (passwords redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store a profile password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
