//! Watch command: stream event transitions and health changes to stdout.

use std::io::{self, IsTerminal};

use owo_colors::OwoColorize;
use tokio::sync::mpsc;

use synocam_core::{CameraHealth, EventKind, Station, Transition};

use crate::cli::{ColorMode, GlobalOpts, WatchArgs};
use crate::error::CliError;

use super::util;

/// Whether transition output should carry color codes. The only colored
/// surface is this command's event stream, so the decision lives here.
fn color_enabled(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

enum WatchEvent {
    Transition { camera: String, transition: Transition },
    Health { camera: String, health: CameraHealth },
}

pub async fn handle(station: &Station, args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // Resolve the camera set up front; empty means "all cameras".
    let cameras: Vec<(i64, String)> = if args.cameras.is_empty() {
        station
            .list_cameras()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect()
    } else {
        let mut resolved = Vec::with_capacity(args.cameras.len());
        for identifier in &args.cameras {
            let id = util::resolve_camera(station, identifier).await?;
            resolved.push((id, identifier.clone()));
        }
        resolved
    };

    if cameras.is_empty() {
        return Err(CliError::Validation {
            field: "cameras".into(),
            reason: "no cameras to watch".into(),
        });
    }

    let kinds: Vec<EventKind> = args.kinds.iter().copied().map(Into::into).collect();

    // One forwarding task per camera, funnelled into a single printer.
    let (tx, mut rx) = mpsc::unbounded_channel::<WatchEvent>();
    let mut handles = Vec::with_capacity(cameras.len());

    for (id, name) in cameras {
        let mut handle = station.watch_camera(id).await;
        if !kinds.is_empty() {
            for kind in EventKind::ALL {
                if !kinds.contains(&kind) {
                    handle.links().unlink(kind);
                }
            }
        }

        let mut health = handle.health();
        let tx = tx.clone();
        let label = name.clone();
        handles.push(tokio::spawn(async move {
            loop {
                tokio::select! {
                    transition = handle.next_transition() => {
                        let Some(transition) = transition else { break };
                        let _ = tx.send(WatchEvent::Transition {
                            camera: label.clone(),
                            transition,
                        });
                    }
                    changed = health.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let _ = tx.send(WatchEvent::Health {
                            camera: label.clone(),
                            health: health.borrow_and_update().clone(),
                        });
                    }
                }
            }
        }));
    }
    drop(tx);

    if !global.quiet {
        eprintln!("Watching for events (Ctrl-C to stop)...");
    }

    let color = color_enabled(&global.color);
    let show_health = args.health;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = rx.recv() => {
                let Some(event) = event else { break };
                print_event(&event, color, show_health);
            }
        }
    }

    for handle in handles {
        handle.abort();
    }
    Ok(())
}

fn print_event(event: &WatchEvent, color: bool, show_health: bool) {
    let now = chrono::Local::now().format("%H:%M:%S");
    match event {
        WatchEvent::Transition { camera, transition } => {
            let state = if transition.active { "ON" } else { "OFF" };
            if color {
                let state = if transition.active {
                    state.green().to_string()
                } else {
                    state.red().to_string()
                };
                println!("{now} {camera} {} {state}", transition.kind.cyan());
            } else {
                println!("{now} {camera} {} {state}", transition.kind);
            }
        }
        WatchEvent::Health { camera, health } => {
            if !show_health {
                return;
            }
            let text = match health {
                CameraHealth::Unknown => "health: unknown".to_owned(),
                CameraHealth::Online => "health: online".to_owned(),
                CameraHealth::Offline { reason } => format!("health: offline ({reason})"),
            };
            if color {
                println!("{now} {camera} {}", text.yellow());
            } else {
                println!("{now} {camera} {text}");
            }
        }
    }
}
