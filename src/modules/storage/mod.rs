pub mod json_backend;

use serde::{Deserialize, Serialize};

use crate::modules::playback::service::DEFAULT_VOLUME;

/// User settings that survive between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub volume: u8,
    pub last_theme: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            last_theme: None,
        }
    }
}
