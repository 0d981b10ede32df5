//! `key: value` response parsing.
//!
//! Records are built from a fixed table of recognised keys; any other line is
//! skipped, so new server fields never break parsing.

use std::collections::HashMap;
use std::time::Duration;

use crate::library::Track;

use super::types::{Output, PlayState, SongInfo, Status};

type TrackSetter = fn(&mut Track, &str);

const TRACK_FIELDS: &[(&str, TrackSetter)] = &[
    ("title", set_title),
    ("artist", set_artist),
    ("album", set_album),
    ("track", set_track_no),
    ("disc", set_disc_no),
    ("time", set_time),
    ("duration", set_duration),
];

fn set_title(t: &mut Track, v: &str) {
    t.title = v.to_string();
}

// Multi-valued tags repeat the key; the first value wins.
fn set_artist(t: &mut Track, v: &str) {
    if t.artist.is_empty() {
        t.artist = v.to_string();
    }
}

fn set_album(t: &mut Track, v: &str) {
    if t.album.is_empty() {
        t.album = v.to_string();
    }
}

fn set_track_no(t: &mut Track, v: &str) {
    t.track_no = parse_number(v);
}

fn set_disc_no(t: &mut Track, v: &str) {
    t.disc_no = parse_number(v);
}

// Legacy whole-second field; `duration` is preferred when both are present.
fn set_time(t: &mut Track, v: &str) {
    if t.duration.is_zero() {
        if let Some(d) = parse_secs(v) {
            t.duration = d;
        }
    }
}

fn set_duration(t: &mut Track, v: &str) {
    if let Some(d) = parse_secs(v) {
        t.duration = d;
    }
}

/// Split `Key: value` into its parts.
pub fn split_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(": ")?;
    Some((key, value.trim()))
}

/// Collect a block into a map with lowercased keys. Later keys overwrite earlier ones.
pub fn kv_lower(lines: &[String]) -> HashMap<String, String> {
    lines
        .iter()
        .filter_map(|l| split_field(l))
        .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
        .collect()
}

/// Lenient integer: `7`, `7/12` (-> 7), anything else -> 0.
pub fn parse_number(s: &str) -> u32 {
    let s = s.trim();
    if let Ok(n) = s.parse() {
        return n;
    }
    s.split_once('/')
        .and_then(|(n, _)| n.trim().parse().ok())
        .unwrap_or(0)
}

/// Decimal seconds to a `Duration`.
pub fn parse_secs(s: &str) -> Option<Duration> {
    let secs: f64 = s.trim().parse().ok()?;
    // Rejects negatives, NaN, infinities and values past `Duration::MAX`.
    Duration::try_from_secs_f64(secs).ok()
}

/// `elapsed:duration`, split on the first colon.
pub fn parse_time_pair(s: &str) -> Option<(Duration, Duration)> {
    let (elapsed, total) = s.split_once(':')?;
    Some((parse_secs(elapsed)?, parse_secs(total)?))
}

/// Parse a flat `listallinfo`-style dump into tracks.
///
/// `file:` starts a record and closes the previous one. `directory:` and
/// `playlist:` close the open record without starting a new one.
pub fn parse_tracks(lines: &[String]) -> Vec<Track> {
    let mut tracks = Vec::new();
    let mut current: Option<Track> = None;

    for line in lines {
        let Some((key, value)) = split_field(line) else {
            continue;
        };
        let key = key.to_ascii_lowercase();
        match key.as_str() {
            "file" => {
                tracks.extend(current.take());
                current = Some(Track {
                    uri: value.to_string(),
                    ..Track::default()
                });
            }
            "directory" | "playlist" => tracks.extend(current.take()),
            _ => {
                let Some(track) = current.as_mut() else {
                    continue;
                };
                if let Some((_, set)) = TRACK_FIELDS.iter().find(|(k, _)| *k == key) {
                    set(track, value);
                }
            }
        }
    }

    tracks.extend(current);
    tracks
}

pub fn parse_status(lines: &[String]) -> Status {
    let fields = kv_lower(lines);
    let state = fields
        .get("state")
        .map(|s| PlayState::parse(s))
        .unwrap_or_default();

    let mut elapsed = Duration::ZERO;
    let mut duration = Duration::ZERO;
    let combined = fields.get("time").and_then(|t| parse_time_pair(t));

    match fields.get("elapsed").and_then(|v| parse_secs(v)) {
        Some(e) => elapsed = e,
        None => {
            if let Some((e, _)) = combined {
                elapsed = e;
            }
        }
    }
    match fields.get("duration").and_then(|v| parse_secs(v)) {
        Some(d) => duration = d,
        None => {
            if let Some((_, d)) = combined {
                duration = d;
            }
        }
    }

    Status {
        state,
        elapsed,
        duration,
        fields,
    }
}

pub fn parse_song(lines: &[String]) -> SongInfo {
    let mut song = SongInfo::default();
    for (key, value) in lines.iter().filter_map(|l| split_field(l)) {
        let slot = match key.to_ascii_lowercase().as_str() {
            "title" => &mut song.title,
            "artist" => &mut song.artist,
            "album" => &mut song.album,
            _ => continue,
        };
        if slot.is_empty() {
            *slot = value.to_string();
        }
    }
    song
}

/// Id of a song queued with `addid`.
pub fn parse_added_id(lines: &[String]) -> Option<u32> {
    lines
        .iter()
        .filter_map(|l| split_field(l))
        .find(|(k, _)| k.eq_ignore_ascii_case("id"))
        .and_then(|(_, v)| v.parse().ok())
        .filter(|id| *id > 0)
}

/// Subsystem names from an `idle` response.
pub fn parse_changes(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| split_field(l))
        .filter(|(k, _)| k.eq_ignore_ascii_case("changed"))
        .map(|(_, v)| v.to_string())
        .collect()
}

pub fn parse_outputs(lines: &[String]) -> Vec<Output> {
    let mut outputs = Vec::new();
    let mut current: Option<Output> = None;
    for (key, value) in lines.iter().filter_map(|l| split_field(l)) {
        match key.to_ascii_lowercase().as_str() {
            "outputid" => {
                outputs.extend(current.take());
                current = Some(Output {
                    id: parse_number(value),
                    ..Output::default()
                });
            }
            "outputname" => {
                if let Some(o) = current.as_mut() {
                    o.name = value.to_string();
                }
            }
            "outputenabled" => {
                if let Some(o) = current.as_mut() {
                    o.enabled = value == "1";
                }
            }
            _ => {}
        }
    }
    outputs.extend(current);
    outputs
}
