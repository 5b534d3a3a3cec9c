//! PTZ command handlers.

use tabled::Tabled;

use synocam_core::{PatrolDto, PresetDto, PtzDirection, Station, ZoomControl};

use crate::cli::{GlobalOpts, PtzArgs, PtzCommand, PtzDirectionArg, ZoomArg};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<PtzDirectionArg> for PtzDirection {
    fn from(arg: PtzDirectionArg) -> Self {
        match arg {
            PtzDirectionArg::Up => PtzDirection::Up,
            PtzDirectionArg::Down => PtzDirection::Down,
            PtzDirectionArg::Left => PtzDirection::Left,
            PtzDirectionArg::Right => PtzDirection::Right,
            PtzDirectionArg::Home => PtzDirection::Home,
        }
    }
}

impl From<ZoomArg> for ZoomControl {
    fn from(arg: ZoomArg) -> Self {
        match arg {
            ZoomArg::In => ZoomControl::In,
            ZoomArg::Out => ZoomControl::Out,
        }
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PresetRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&PresetDto> for PresetRow {
    fn from(p: &PresetDto) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
        }
    }
}

#[derive(Tabled)]
struct PatrolRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&PatrolDto> for PatrolRow {
    fn from(p: &PatrolDto) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(station: &Station, args: PtzArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        PtzCommand::Move {
            camera,
            direction,
            speed,
        } => {
            let id = util::resolve_camera(station, &camera).await?;
            station.ptz_move(id, direction.into(), speed).await?;
            Ok(())
        }

        PtzCommand::Zoom { camera, control } => {
            let id = util::resolve_camera(station, &camera).await?;
            station.ptz_zoom(id, control.into()).await?;
            Ok(())
        }

        PtzCommand::Presets { camera } => {
            let id = util::resolve_camera(station, &camera).await?;
            let presets = station.list_presets(id).await?;
            let out = output::render_list(
                &global.output,
                &presets,
                |p| PresetRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PtzCommand::Goto { camera, preset } => {
            let id = util::resolve_camera(station, &camera).await?;
            station.go_preset(id, preset).await?;
            Ok(())
        }

        PtzCommand::Patrols { camera } => {
            let id = util::resolve_camera(station, &camera).await?;
            let patrols = station.list_patrols(id).await?;
            let out = output::render_list(
                &global.output,
                &patrols,
                |p| PatrolRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PtzCommand::Patrol { camera, patrol } => {
            let id = util::resolve_camera(station, &camera).await?;
            station.run_patrol(id, patrol).await?;
            Ok(())
        }
    }
}
