use crate::core::models::{Theme, ThemeLinks, ThemeStatus, Track};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Ordered, read-only set of release themes.
///
/// Invariants enforced at construction: the catalog is non-empty and theme
/// ids are unique. Lookups by unknown id resolve to the first theme, so
/// callers never have to handle a missing theme.
#[derive(Debug, Clone)]
pub struct Catalog {
    themes: Vec<Theme>,
}

#[derive(Deserialize)]
struct CatalogFile {
    themes: Vec<Theme>,
}

impl Catalog {
    pub fn new(themes: Vec<Theme>) -> Result<Self> {
        if themes.is_empty() {
            bail!("catalog must contain at least one theme");
        }
        for (i, theme) in themes.iter().enumerate() {
            if themes[..i].iter().any(|t| t.id == theme.id) {
                bail!("duplicate theme id in catalog: {}", theme.id);
            }
        }
        Ok(Self { themes })
    }

    /// Load a catalog from a TOML file with a top-level `themes` array.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read catalog file: {}", path.display()))?;
        let file: CatalogFile = toml::from_str(&content)
            .with_context(|| format!("Could not parse catalog file: {}", path.display()))?;
        Self::new(file.themes)
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        false // non-empty by construction
    }

    /// Ordered theme ids, as the carousel consumes them.
    pub fn ids(&self) -> Vec<String> {
        self.themes.iter().map(|t| t.id.clone()).collect()
    }

    /// Index of a theme id; unknown ids resolve to 0.
    pub fn index_of(&self, id: &str) -> usize {
        self.themes.iter().position(|t| t.id == id).unwrap_or(0)
    }

    /// Theme by id; unknown ids resolve to the first theme.
    pub fn theme_by_id(&self, id: &str) -> &Theme {
        &self.themes[self.index_of(id)]
    }

    /// Id of the theme after `id`, wrapping around the ring.
    pub fn next_id(&self, id: &str) -> &str {
        let index = self.index_of(id);
        &self.themes[(index + 1) % self.themes.len()].id
    }

    /// Id of the theme before `id`, wrapping around the ring.
    pub fn prev_id(&self, id: &str) -> &str {
        let index = self.index_of(id);
        let len = self.themes.len();
        &self.themes[(index + len - 1) % len].id
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            themes: builtin_themes(),
        }
    }
}

fn track(id: u32, name: &str, file: &str) -> Track {
    Track {
        id,
        name: name.to_string(),
        file: PathBuf::from(file),
    }
}

/// The built-in release catalog, used when no catalog file is given.
fn builtin_themes() -> Vec<Theme> {
    vec![
        Theme {
            id: "lovesickage".to_string(),
            name: "LOVE SICK AGE".to_string(),
            icon: "◆".to_string(),
            status: ThemeStatus::Upcoming,
            status_label: None,
            description: vec![],
            tracks: vec![
                track(1, "Love Sick Age", "audio/love-sick-age.mp3"),
                track(2, "Silver Medalist", "audio/silver-medalist.mp3"),
                track(3, "Thousand", "audio/thousand.mp3"),
                track(4, "Graveyard Moon", "audio/graveyard-moon.mp3"),
            ],
            links: None,
            artwork: None,
        },
        Theme {
            id: "thehill".to_string(),
            name: "THE HILL".to_string(),
            icon: "⬡".to_string(),
            status: ThemeStatus::Available,
            status_label: None,
            description: vec![],
            tracks: vec![
                track(1, "Out of the City", "audio/out-of-the-city.mp3"),
                track(2, "Machine", "audio/machine.mp3"),
                track(3, "Ambulance", "audio/ambulance.mp3"),
            ],
            links: Some(ThemeLinks {
                spotify: Some("https://open.spotify.com/artist/3grYt3aOy0jbxAbDEvzeNm".to_string()),
                apple_music: Some(
                    "https://music.apple.com/us/artist/pacific-ghost/1719889121".to_string(),
                ),
                bandcamp: Some("https://pacificghost8675.bandcamp.com/album/the-hill".to_string()),
            }),
            artwork: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(id: &str, tracks: Vec<Track>) -> Theme {
        Theme {
            id: id.to_string(),
            name: id.to_uppercase(),
            icon: "◆".to_string(),
            status: ThemeStatus::Available,
            status_label: None,
            description: vec![],
            tracks,
            links: None,
            artwork: None,
        }
    }

    fn three_theme_catalog() -> Catalog {
        Catalog::new(vec![
            theme("a", vec![track(1, "T1", "t1.mp3")]),
            theme("b", vec![track(1, "T2", "t2.mp3")]),
            theme("c", vec![track(1, "T3", "t3.mp3")]),
        ])
        .unwrap()
    }

    // ── construction invariants ──────────────────────────────────────────────

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(Catalog::new(vec![]).is_err());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::new(vec![theme("a", vec![]), theme("a", vec![])]);
        assert!(result.is_err());
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::default();
        assert!(catalog.len() >= 2);
        assert!(catalog.themes().iter().all(|t| !t.tracks.is_empty()));
        // Re-validate through the constructor to cover id uniqueness.
        assert!(Catalog::new(catalog.themes().to_vec()).is_ok());
    }

    // ── lookups ──────────────────────────────────────────────────────────────

    #[test]
    fn unknown_id_resolves_to_first_theme() {
        let catalog = three_theme_catalog();
        assert_eq!(catalog.index_of("nope"), 0);
        assert_eq!(catalog.theme_by_id("nope").id, "a");
    }

    #[test]
    fn next_id_wraps_around_the_ring() {
        let catalog = three_theme_catalog();
        assert_eq!(catalog.next_id("a"), "b");
        assert_eq!(catalog.next_id("c"), "a");
    }

    #[test]
    fn prev_id_wraps_around_the_ring() {
        let catalog = three_theme_catalog();
        assert_eq!(catalog.prev_id("b"), "a");
        assert_eq!(catalog.prev_id("a"), "c");
    }

    // ── TOML loading ─────────────────────────────────────────────────────────

    #[test]
    fn catalog_parses_from_toml() {
        let toml_src = r#"
            [[themes]]
            id = "demo"
            name = "DEMO"
            status = "available"

            [[themes.tracks]]
            id = 1
            name = "First"
            file = "audio/first.mp3"
        "#;
        let file: CatalogFile = toml::from_str(toml_src).unwrap();
        let catalog = Catalog::new(file.themes).unwrap();
        assert_eq!(catalog.len(), 1);
        let theme = catalog.theme_by_id("demo");
        assert_eq!(theme.status, ThemeStatus::Available);
        assert_eq!(theme.status_label(), "Stream Now");
        assert_eq!(theme.tracks[0].name, "First");
    }
}
