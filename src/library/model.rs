use std::time::Duration;

/// One song from the server's database. Identity is `uri`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Track {
    pub uri: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// 0 = unknown.
    pub track_no: u32,
    /// 0 = unknown.
    pub disc_no: u32,
    pub duration: Duration,
}
