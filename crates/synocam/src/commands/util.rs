//! Shared helpers for command handlers.

use synocam_core::Station;

use crate::error::CliError;

/// Resolve a camera identifier (numeric ID or name) to its ID.
///
/// Numeric identifiers are used as-is; anything else is matched against
/// camera names (case-insensitive) via a listing call.
pub async fn resolve_camera(station: &Station, identifier: &str) -> Result<i64, CliError> {
    if let Ok(id) = identifier.parse::<i64>() {
        return Ok(id);
    }

    let cameras = station.list_cameras().await?;
    cameras
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(identifier))
        .map(|c| c.id)
        .ok_or_else(|| CliError::CameraNotFound {
            identifier: identifier.into(),
        })
}
