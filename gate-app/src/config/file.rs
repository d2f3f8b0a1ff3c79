//! TOML file configuration structures.
//!
//! These structs directly map to the `gate-config.toml` file format.
//! Every section has defaults, so an absent file runs the demo as-is.

use std::path::PathBuf;
use std::time::Duration;

use gate_core::processors::FlowTimings;
use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub timings: TimingsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default = "default_stats")]
    pub stats: Vec<StatConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            links: LinksConfig::default(),
            timings: TimingsConfig::default(),
            storage: StorageConfig::default(),
            stats: default_stats(),
        }
    }
}

/// External link targets opened by the engagement actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Channel subscribe link.
    #[serde(default = "default_channel_url")]
    pub channel: Url,
    /// Video link, opened by like and comment.
    #[serde(default = "default_video_url")]
    pub video: Url,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            channel: default_channel_url(),
            video: default_video_url(),
        }
    }
}

fn default_channel_url() -> Url {
    Url::parse("https://www.youtube.com/@gate-demo?sub_confirmation=1").expect("valid default url")
}

fn default_video_url() -> Url {
    Url::parse("https://www.youtube.com/watch?v=gate-demo").expect("valid default url")
}

/// Flow timing overrides, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingsConfig {
    pub reveal_engage_ms: u64,
    pub engage_to_verify_ms: u64,
    pub verify_tick_ms: u64,
    pub verify_hold_ms: u64,
}

impl Default for TimingsConfig {
    fn default() -> Self {
        let t = FlowTimings::default();
        Self {
            reveal_engage_ms: t.reveal_engage.as_millis() as u64,
            engage_to_verify_ms: t.engage_to_verify.as_millis() as u64,
            verify_tick_ms: t.verify_tick.as_millis() as u64,
            verify_hold_ms: t.verify_hold.as_millis() as u64,
        }
    }
}

impl TimingsConfig {
    pub fn to_flow_timings(&self) -> FlowTimings {
        FlowTimings {
            reveal_engage: Duration::from_millis(self.reveal_engage_ms),
            engage_to_verify: Duration::from_millis(self.engage_to_verify_ms),
            verify_tick: Duration::from_millis(self.verify_tick_ms),
            verify_hold: Duration::from_millis(self.verify_hold_ms),
            ..FlowTimings::default()
        }
    }
}

/// Durable key/value storage for the cache utility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON storage file. Absent disables the cache commands.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// One hero stat counter shown by the demo surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatConfig {
    pub id: String,
    pub target: u64,
}

fn default_stats() -> Vec<StatConfig> {
    vec![
        StatConfig {
            id: "downloads".into(),
            target: 50_000,
        },
        StatConfig {
            id: "subscribers".into(),
            target: 12_000,
        },
        StatConfig {
            id: "videos".into(),
            target: 340,
        },
    ]
}
