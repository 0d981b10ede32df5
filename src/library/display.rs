use super::index::{UNKNOWN, normalize};
use super::model::Track;

/// Last path segment of a URI, used when a track has no title tag.
pub fn base_name(uri: &str) -> &str {
    if uri.is_empty() {
        return "<untitled>";
    }
    match uri.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name,
        _ => uri,
    }
}

/// Title, falling back to the file name.
pub fn title_or_file(track: &Track) -> &str {
    let title = track.title.trim();
    if title.is_empty() {
        base_name(&track.uri)
    } else {
        title
    }
}

/// `[disc.track] ` / `[track] ` prefix; empty when both are unknown.
pub fn number_prefix(track: &Track) -> String {
    match (track.disc_no, track.track_no) {
        (0, 0) => String::new(),
        (0, t) => format!("[{:02}] ", t),
        (d, t) => format!("[{}.{:02}] ", d, t),
    }
}

/// Row label for the flat list: "Artist — Title [Album]".
pub fn list_label(track: &Track) -> String {
    let album = normalize(&track.album);
    if album == UNKNOWN {
        format!("{} — {}", normalize(&track.artist), title_or_file(track))
    } else {
        format!(
            "{} — {} [{}]",
            normalize(&track.artist),
            title_or_file(track),
            album
        )
    }
}

/// Row label inside an album.
pub fn album_row_label(track: &Track) -> String {
    format!("{}{}", number_prefix(track), title_or_file(track))
}
