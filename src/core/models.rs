use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A single playable track inside a theme. Immutable once part of a theme.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Track {
    /// Unique within the owning theme.
    pub id: u32,
    pub name: String,
    /// Playable media locator.
    pub file: PathBuf,
}

/// Release status of a theme.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeStatus {
    Upcoming,
    Available,
}

impl ThemeStatus {
    /// Default status line shown when a theme carries no custom label.
    pub fn default_label(&self) -> &'static str {
        match self {
            ThemeStatus::Upcoming => "Coming Soon",
            ThemeStatus::Available => "Stream Now",
        }
    }
}

/// Optional external streaming/store links for a theme.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ThemeLinks {
    pub spotify: Option<String>,
    pub apple_music: Option<String>,
    pub bandcamp: Option<String>,
}

/// Optional artwork reference for a theme.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Artwork {
    pub path: PathBuf,
    pub alt: String,
    pub credit: Option<String>,
}

/// One release theme: an ordered, statically defined record in the catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Theme {
    /// Unique across the catalog.
    pub id: String,
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    pub status: ThemeStatus,
    /// Custom status line; falls back to the status default when absent.
    #[serde(default)]
    pub status_label: Option<String>,
    #[serde(default)]
    pub description: Vec<String>,
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub links: Option<ThemeLinks>,
    #[serde(default)]
    pub artwork: Option<Artwork>,
}

fn default_icon() -> String {
    "◆".to_string()
}

impl Theme {
    pub fn status_label(&self) -> &str {
        self.status_label
            .as_deref()
            .unwrap_or_else(|| self.status.default_label())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] ({} tracks)",
            self.icon,
            self.name,
            self.status_label(),
            self.tracks.len()
        )
    }
}

/// Transition direction for carousel navigation. Used only as an
/// animation hint, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// Sign of the visual motion along the strip: forward slides content
    /// to the left (negative x), backward to the right.
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Forward => -1.0,
            Direction::Backward => 1.0,
        }
    }
}
