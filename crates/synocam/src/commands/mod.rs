//! Command dispatch: bridges CLI args -> station operations -> output.

pub mod cameras;
pub mod config_cmd;
pub mod events;
pub mod ptz;
pub mod snapshot;
pub mod util;
pub mod watch;

use synocam_core::Station;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a station-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, station: &Station, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Cameras(args) => cameras::handle(station, args, global).await,
        Command::Events(args) => events::handle(station, args, global).await,
        Command::Snapshot(args) => snapshot::handle(station, args, global).await,
        Command::Ptz(args) => ptz::handle(station, args, global).await,
        Command::Watch(args) => watch::handle(station, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
