//! Ambient track catalog.

use std::path::Path;

use serde::Serialize;

use super::source::SoundSource;

/// An ambient track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Track {
    /// Identifier used by input events
    pub id: &'static str,
    /// Name shown next to the player
    pub display_name: &'static str,
    /// File name inside the sound directory
    pub source_locator: &'static str,
}

impl Track {
    /// Resolves the track into a playable source.
    pub fn source(&self, sound_dir: &Path) -> SoundSource {
        SoundSource::file(self.display_name, sound_dir.join(self.source_locator))
    }
}

/// The fixed track catalog.
pub static TRACKS: [Track; 4] = [
    Track {
        id: "rain",
        display_name: "Rain",
        source_locator: "rain.mp3",
    },
    Track {
        id: "wave",
        display_name: "Wave",
        source_locator: "wave.mp3",
    },
    Track {
        id: "forest",
        display_name: "Forest",
        source_locator: "forest.mp3",
    },
    Track {
        id: "fire",
        display_name: "Fire",
        source_locator: "fire.mp3",
    },
];

/// Finds a track by identifier.
pub fn find_track(id: &str) -> Option<&'static Track> {
    TRACKS.iter().find(|track| track.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_four_unique_tracks() {
        assert_eq!(TRACKS.len(), 4);
        for (i, a) in TRACKS.iter().enumerate() {
            for b in &TRACKS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_find_track() {
        let track = find_track("forest").unwrap();
        assert_eq!(track.display_name, "Forest");
        assert_eq!(track.source_locator, "forest.mp3");

        assert!(find_track("thunder").is_none());
        assert!(find_track("Rain").is_none());
    }

    #[test]
    fn test_track_source_resolves_in_sound_dir() {
        let track = find_track("wave").unwrap();
        let source = track.source(Path::new("/opt/sounds"));

        assert_eq!(source.name(), "Wave");
        assert_eq!(source.path(), Some(Path::new("/opt/sounds/wave.mp3")));
    }
}
