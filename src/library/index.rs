//! Artist → album → track hierarchy derived from the flat track list.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::model::Track;

/// Stand-in for a blank artist or album name.
pub const UNKNOWN: &str = "<unknown>";

/// Blank names collapse to [`UNKNOWN`]; everything else is kept as-is.
pub fn normalize(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() { UNKNOWN } else { trimmed }
}

/// Grouping and sort key: normalized, then case-folded.
pub fn fold(name: &str) -> String {
    normalize(name).to_lowercase()
}

#[derive(Debug, Clone)]
struct AlbumEntry {
    name: String,
    tracks: Vec<Track>,
}

#[derive(Debug, Clone)]
struct ArtistEntry {
    name: String,
    albums: BTreeMap<String, AlbumEntry>,
    album_names: Vec<String>,
}

/// Read-only view over a track set. Rebuild it whenever the set changes.
#[derive(Debug, Clone, Default)]
pub struct LibraryIndex {
    artists: BTreeMap<String, ArtistEntry>,
    artist_names: Vec<String>,
}

impl LibraryIndex {
    pub fn build(tracks: &[Track]) -> Self {
        let mut artists: BTreeMap<String, ArtistEntry> = BTreeMap::new();

        for track in tracks {
            // First spelling seen for a folded key becomes the display name.
            let artist = artists
                .entry(fold(&track.artist))
                .or_insert_with(|| ArtistEntry {
                    name: normalize(&track.artist).to_string(),
                    albums: BTreeMap::new(),
                    album_names: Vec::new(),
                });
            artist
                .albums
                .entry(fold(&track.album))
                .or_insert_with(|| AlbumEntry {
                    name: normalize(&track.album).to_string(),
                    tracks: Vec::new(),
                })
                .tracks
                .push(track.clone());
        }

        for artist in artists.values_mut() {
            for album in artist.albums.values_mut() {
                album.tracks.sort_by(album_order);
            }
            artist.album_names = artist.albums.values().map(|a| a.name.clone()).collect();
        }
        let artist_names = artists.values().map(|a| a.name.clone()).collect();

        Self {
            artists,
            artist_names,
        }
    }

    pub fn artists(&self) -> &[String] {
        &self.artist_names
    }

    pub fn albums(&self, artist: &str) -> &[String] {
        self.artists
            .get(&fold(artist))
            .map(|a| a.album_names.as_slice())
            .unwrap_or(&[])
    }

    pub fn tracks(&self, artist: &str, album: &str) -> &[Track] {
        self.artists
            .get(&fold(artist))
            .and_then(|a| a.albums.get(&fold(album)))
            .map(|a| a.tracks.as_slice())
            .unwrap_or(&[])
    }
}

// 0 means "unknown" and sorts after every known number.
fn unknown_last(a: u32, b: u32) -> Ordering {
    match (a, b) {
        (0, 0) => Ordering::Equal,
        (0, _) => Ordering::Greater,
        (_, 0) => Ordering::Less,
        _ => a.cmp(&b),
    }
}

/// Disc, then track number, then title, then uri.
pub fn album_order(a: &Track, b: &Track) -> Ordering {
    unknown_last(a.disc_no, b.disc_no)
        .then_with(|| unknown_last(a.track_no, b.track_no))
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.uri.cmp(&b.uri))
}
