//! Camera command handlers.

use tabled::Tabled;

use synocam_core::{CameraDto, Station};

use crate::cli::{CamerasArgs, CamerasCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CameraRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&CameraDto> for CameraRow {
    fn from(c: &CameraDto) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            model: c.model.clone().unwrap_or_default(),
            ip: c.ip.clone().unwrap_or_default(),
            status: c.camera_status().to_string(),
            enabled: if c.enabled { "yes".into() } else { "no".into() },
        }
    }
}

fn camera_detail(c: &CameraDto) -> String {
    let mut out = String::new();
    let mut push = |label: &str, value: String| {
        out.push_str(&format!("{label:<10} {value}\n"));
    };
    push("ID:", c.id.to_string());
    push("Name:", c.name.clone());
    push("Vendor:", c.vendor.clone().unwrap_or_default());
    push("Model:", c.model.clone().unwrap_or_default());
    push("IP:", c.ip.clone().unwrap_or_default());
    push("Port:", c.port.map(|p| p.to_string()).unwrap_or_default());
    push("Status:", c.camera_status().to_string());
    push("Enabled:", if c.enabled { "yes".into() } else { "no".into() });
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    station: &Station,
    args: CamerasArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CamerasCommand::List => {
            let cameras = station.list_cameras().await?;
            let out = output::render_list(
                &global.output,
                &cameras,
                |c| CameraRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CamerasCommand::Info { camera } => {
            let id = util::resolve_camera(station, &camera).await?;
            let info = station.camera_info(id).await?;
            let out =
                output::render_single(&global.output, &info, camera_detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CamerasCommand::Enable { camera } => {
            let id = util::resolve_camera(station, &camera).await?;
            station.enable_camera(id).await?;
            if !global.quiet {
                eprintln!("Camera {id} enabled");
            }
            Ok(())
        }

        CamerasCommand::Disable { camera } => {
            let id = util::resolve_camera(station, &camera).await?;
            station.disable_camera(id).await?;
            if !global.quiet {
                eprintln!("Camera {id} disabled");
            }
            Ok(())
        }
    }
}
