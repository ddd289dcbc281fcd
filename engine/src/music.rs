//! Built-in relaxation music catalog
//!
//! A fixed, read-only list of tracks. Audio files themselves are served by the
//! front end; only the metadata lives here.

use sdk::core_context::MusicHandleImpl;
use sdk::types::{MusicTrack, TrackCategory};

/// Read-only track catalog
#[derive(Debug, Clone)]
pub struct MusicCatalog {
    tracks: Vec<MusicTrack>,
}

fn track(
    id: &str,
    name: &str,
    category: TrackCategory,
    duration: u32,
    description: &str,
    file: &str,
) -> MusicTrack {
    MusicTrack {
        id: id.to_string(),
        name: name.to_string(),
        category,
        duration,
        description: description.to_string(),
        url: format!("/music/{}", file),
    }
}

impl MusicCatalog {
    /// Catalog with an explicit track list
    pub fn new(tracks: Vec<MusicTrack>) -> Self {
        Self { tracks }
    }

    /// The stock catalog shipped with Haven
    pub fn builtin() -> Self {
        use TrackCategory::*;

        Self::new(vec![
            track(
                "1",
                "Ocean Waves",
                Stress,
                600,
                "Gentle ocean sounds for stress relief",
                "ocean-waves.mp3",
            ),
            track(
                "2",
                "Rain Forest",
                Anxiety,
                900,
                "Tropical rainforest ambience for anxiety",
                "rain-forest.mp3",
            ),
            track(
                "3",
                "Binaural Beats",
                Headache,
                720,
                "Alpha waves for headache relief",
                "binaural-beats.mp3",
            ),
            track(
                "4",
                "White Noise",
                Sleep,
                1800,
                "Pure white noise for better sleep",
                "white-noise.mp3",
            ),
            track(
                "5",
                "Meditation Bell",
                Stress,
                300,
                "Tibetan singing bowls for deep relaxation",
                "meditation-bell.mp3",
            ),
            track(
                "6",
                "Nature Symphony",
                Anxiety,
                1200,
                "Birds and gentle breeze for calm",
                "nature-symphony.mp3",
            ),
        ])
    }

    /// Tracks in catalog order, optionally restricted to one category
    pub fn tracks(&self, category: Option<TrackCategory>) -> Vec<MusicTrack> {
        self.tracks
            .iter()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .cloned()
            .collect()
    }
}

impl Default for MusicCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MusicHandleImpl for MusicCatalog {
    fn tracks(&self, category: Option<TrackCategory>) -> Vec<MusicTrack> {
        MusicCatalog::tracks(self, category)
    }
}
