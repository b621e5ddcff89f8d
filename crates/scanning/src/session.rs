use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockmaster_core::SessionId;

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

/// Parameters for starting a camera scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub camera_id: u32,
    #[serde(default = "default_width")]
    pub resolution_width: u32,
    #[serde(default = "default_height")]
    pub resolution_height: u32,
    #[serde(default)]
    pub device_id: Option<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            camera_id: 0,
            resolution_width: default_width(),
            resolution_height: default_height(),
            device_id: None,
        }
    }
}

/// A running scanner and its capture counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerSession {
    pub id: SessionId,
    pub camera_id: u32,
    pub resolution: (u32, u32),
    pub device_id: String,
    pub started_at: DateTime<Utc>,
    pub captures: u64,
    pub observations: u64,
    pub last_capture_at: Option<DateTime<Utc>>,
}

impl ScannerSession {
    pub fn start(config: &ScannerConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            camera_id: config.camera_id,
            resolution: (config.resolution_width, config.resolution_height),
            device_id: config
                .device_id
                .clone()
                .unwrap_or_else(|| format!("camera-{}", config.camera_id)),
            started_at,
            captures: 0,
            observations: 0,
            last_capture_at: None,
        }
    }

    pub fn record_capture(&mut self, observations: usize, at: DateTime<Utc>) {
        self.captures += 1;
        self.observations += observations as u64;
        self.last_capture_at = Some(at);
    }
}
