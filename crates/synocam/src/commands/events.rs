//! Event query command handlers.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tabled::Tabled;

use synocam_core::{EventDto, EventKind, Station};

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Stop")]
    stop: String,
    #[tabled(rename = "Complete")]
    complete: String,
}

fn format_epoch(secs: i64) -> String {
    if secs <= 0 {
        return String::new();
    }
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

impl From<&EventDto> for EventRow {
    fn from(e: &EventDto) -> Self {
        Self {
            id: e.id,
            kind: EventKind::from_reason(e.reason)
                .map_or_else(|| format!("reason {}", e.reason), |k| k.to_string()),
            start: format_epoch(e.start_time),
            stop: format_epoch(e.stop_time),
            complete: if e.is_complete { "yes".into() } else { "no".into() },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    station: &Station,
    args: EventsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List { camera, last, kinds } => {
            let id = util::resolve_camera(station, &camera).await?;
            let kinds: Vec<EventKind> = kinds.into_iter().map(Into::into).collect();
            let events = station
                .recent_events(id, Duration::from_secs(last), &kinds)
                .await?;

            let out = output::render_list(
                &global.output,
                &events,
                |e| EventRow::from(e),
                |e| e.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
