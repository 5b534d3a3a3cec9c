// PTZ endpoints
//
// `SYNO.SurveillanceStation.PTZ`: Move, Zoom, ListPreset, GoPreset,
// ListPatrol, RunPatrol.

use tracing::debug;

use crate::client::{API_PTZ, SCRIPT_ENTRY, SurveillanceClient};
use crate::error::Error;
use crate::models::{PatrolDto, PatrolListData, PresetDto, PresetListData};

/// Lens movement direction for `PTZ.Move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtzDirection {
    Up,
    Down,
    Left,
    Right,
    Home,
}

impl PtzDirection {
    fn as_param(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Home => "home",
        }
    }
}

/// Zoom control for `PTZ.Zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomControl {
    In,
    Out,
}

impl ZoomControl {
    fn as_param(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl SurveillanceClient {
    /// Move the camera lens in a direction at the given speed (1–5).
    pub async fn ptz_move(
        &self,
        camera_id: i64,
        direction: PtzDirection,
        speed: u8,
    ) -> Result<(), Error> {
        let params = [
            ("cameraId", camera_id.to_string()),
            ("direction", direction.as_param().to_owned()),
            ("speed", speed.to_string()),
        ];
        debug!(camera_id, ?direction, speed, "PTZ move");
        let _: serde_json::Value = self.call(SCRIPT_ENTRY, API_PTZ, "Move", &params).await?;
        Ok(())
    }

    /// Zoom the camera lens in or out.
    pub async fn ptz_zoom(&self, camera_id: i64, control: ZoomControl) -> Result<(), Error> {
        let params = [
            ("cameraId", camera_id.to_string()),
            ("control", control.as_param().to_owned()),
        ];
        debug!(camera_id, ?control, "PTZ zoom");
        let _: serde_json::Value = self.call(SCRIPT_ENTRY, API_PTZ, "Zoom", &params).await?;
        Ok(())
    }

    /// List the camera's preset positions.
    pub async fn list_presets(&self, camera_id: i64) -> Result<Vec<PresetDto>, Error> {
        let params = [("cameraId", camera_id.to_string())];
        debug!(camera_id, "listing PTZ presets");
        let data: PresetListData = self
            .call(SCRIPT_ENTRY, API_PTZ, "ListPreset", &params)
            .await?;
        Ok(data.presets)
    }

    /// Move the lens to a pre-defined preset position.
    pub async fn go_preset(&self, camera_id: i64, preset_id: i64) -> Result<(), Error> {
        let params = [
            ("cameraId", camera_id.to_string()),
            ("presetId", preset_id.to_string()),
        ];
        debug!(camera_id, preset_id, "PTZ go preset");
        let _: serde_json::Value = self
            .call(SCRIPT_ENTRY, API_PTZ, "GoPreset", &params)
            .await?;
        Ok(())
    }

    /// List the camera's patrol routes.
    pub async fn list_patrols(&self, camera_id: i64) -> Result<Vec<PatrolDto>, Error> {
        let params = [("cameraId", camera_id.to_string())];
        debug!(camera_id, "listing PTZ patrols");
        let data: PatrolListData = self
            .call(SCRIPT_ENTRY, API_PTZ, "ListPatrol", &params)
            .await?;
        Ok(data.patrols)
    }

    /// Execute a patrol route.
    pub async fn run_patrol(&self, camera_id: i64, patrol_id: i64) -> Result<(), Error> {
        let params = [
            ("cameraId", camera_id.to_string()),
            ("patrolId", patrol_id.to_string()),
        ];
        debug!(camera_id, patrol_id, "PTZ run patrol");
        let _: serde_json::Value = self
            .call(SCRIPT_ENTRY, API_PTZ, "RunPatrol", &params)
            .await?;
        Ok(())
    }
}
