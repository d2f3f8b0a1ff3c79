//! Interactive console loop.
//!
//! Stands in for the browser's input events: each typed command becomes
//! the message an event listener would have sent.

use gate_core::events::{ScrollSample, UiAction, ViewRegion, VisibilitySample};
use gate_core::storage::{ExpiringStore, JsonFileBackend};
use gate_ui::Severity;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::{StreamExt, wrappers::LinesStream};
use tracing::warn;

use crate::bootstrap::AppHandles;

const HELP: &str = "\
commands:
  subscribe | like | comment | reset   engagement actions
  scroll <px>                          report a scroll position
  stats                                bring the hero stats into view
  state                                print the current flow snapshot
  soon                                 preview an unreleased feature
  cache-set <key> <json>               store a value (if storage is configured)
  cache-get <key>                      read a value back
  help                                 this text
  quit | exit                          leave";

/// Read commands from stdin until EOF or an explicit quit.
pub async fn run(
    handles: &AppHandles,
    cache: Option<&ExpiringStore<JsonFileBackend>>,
) -> anyhow::Result<()> {
    println!("{HELP}");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = LinesStream::new(stdin.lines());

    while let Some(line) = lines.next().await {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };

        match command {
            "subscribe" => send_action(handles, UiAction::Subscribe).await,
            "like" => send_action(handles, UiAction::Like).await,
            "comment" => send_action(handles, UiAction::Comment).await,
            "reset" => send_action(handles, UiAction::Reset).await,

            "scroll" => match parts.next().map(str::parse::<f64>) {
                Some(Ok(y)) => {
                    if handles.scroll_tx.send(ScrollSample { y }).await.is_err() {
                        warn!("scroll watcher is not running");
                    }
                }
                _ => println!("usage: scroll <px>"),
            },

            "stats" => {
                let sample = VisibilitySample {
                    region: ViewRegion::HeroStats,
                    ratio: 1.0,
                };
                if handles.visibility_tx.send(sample).await.is_err() {
                    warn!("scroll watcher is not running");
                }
            }

            "state" => match serde_json::to_string_pretty(&handles.flow.snapshot()) {
                Ok(json) => println!("{json}"),
                Err(e) => warn!(error = %e, "snapshot serialization failed"),
            },

            "soon" => {
                handles
                    .notifier
                    .notify("This feature is coming soon!", Severity::Info);
            }

            "cache-set" => {
                let Some(cache) = cache else {
                    println!("no storage path configured");
                    continue;
                };
                let key = parts.next();
                let raw = parts.collect::<Vec<_>>().join(" ");
                let Some(key) = key.filter(|_| !raw.is_empty()) else {
                    println!("usage: cache-set <key> <json>");
                    continue;
                };
                match serde_json::from_str(&raw) {
                    Ok(value) => {
                        cache.set(key, value).await;
                    }
                    Err(e) => println!("invalid json: {e}"),
                }
            }

            "cache-get" => match (cache, parts.next()) {
                (None, _) => println!("no storage path configured"),
                (Some(cache), Some(key)) => match cache.get(key).await {
                    Some(value) => println!("{value}"),
                    None => println!("(not set or expired)"),
                },
                _ => println!("usage: cache-get <key>"),
            },

            "help" => println!("{HELP}"),
            "quit" | "exit" => break,

            other => println!("unknown command: {other} (try `help`)"),
        }
    }

    Ok(())
}

async fn send_action(handles: &AppHandles, action: UiAction) {
    if handles.action_tx.send(action).await.is_err() {
        warn!("flow controller is not running");
    }
}
