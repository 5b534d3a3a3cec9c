// Event endpoint
//
// `SYNO.SurveillanceStation.Event` List, scoped to one camera and a
// `fromTime` lower bound. This is the fetch half of the per-camera
// polling loop; the reconciliation half lives in synocam-core.

use tracing::debug;

use crate::client::{API_EVENT, SCRIPT_ENTRY, SurveillanceClient};
use crate::error::Error;
use crate::models::{EventListData, EventQuery};

impl SurveillanceClient {
    /// Query events for a camera since `from_time` (epoch seconds),
    /// restricted to the given vendor reason codes.
    ///
    /// Locked (protected) recordings are excluded and snapshots are not
    /// embedded — the poll loop only cares about ids, reasons, and
    /// completion flags. The returned [`EventQuery::timestamp`] is the
    /// station's own clock and becomes the lower bound of the next poll
    /// window on success.
    pub async fn query_events(
        &self,
        camera_id: i64,
        from_time: i64,
        reasons: &[i32],
    ) -> Result<EventQuery, Error> {
        let reason_filter = reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let params = [
            ("cameraIds", camera_id.to_string()),
            ("fromTime", from_time.to_string()),
            ("locked", "0".to_owned()),
            ("reason", reason_filter),
            ("blIncludeSnapshot", "false".to_owned()),
            ("limit", "50".to_owned()),
        ];

        debug!(camera_id, from_time, "querying events");
        let data: EventListData = self.call(SCRIPT_ENTRY, API_EVENT, "List", &params).await?;

        // Older firmwares omit the server timestamp; fall back to the local
        // clock so the window still advances.
        let timestamp = if data.timestamp > 0 {
            data.timestamp
        } else {
            chrono::Utc::now().timestamp()
        };

        Ok(EventQuery {
            timestamp,
            events: data.events,
        })
    }
}
