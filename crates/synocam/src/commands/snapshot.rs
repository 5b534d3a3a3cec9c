//! Snapshot command handler.

use std::io::{IsTerminal, Write};

use synocam_core::Station;

use crate::cli::{GlobalOpts, SnapshotArgs};
use crate::error::CliError;

use super::util;

pub async fn handle(
    station: &Station,
    args: SnapshotArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = util::resolve_camera(station, &args.camera).await?;

    // --stream overrides the profile's snapshot_stream setting for this call.
    let image = match args.stream {
        Some(stream) => station.snapshot_with_stream(id, stream).await?,
        None => station.snapshot(id).await?,
    };

    match args.file {
        Some(path) => {
            std::fs::write(&path, &image)?;
            if !global.quiet {
                eprintln!("Wrote {} bytes to {}", image.len(), path.display());
            }
        }
        None => {
            // Refuse to dump JPEG bytes onto an interactive terminal.
            let stdout = std::io::stdout();
            if stdout.is_terminal() {
                return Err(CliError::Validation {
                    field: "output".into(),
                    reason: "refusing to write image data to a terminal; use --file or pipe stdout"
                        .into(),
                });
            }
            stdout.lock().write_all(&image)?;
        }
    }
    Ok(())
}
