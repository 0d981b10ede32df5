//! Cursor and drill-down state for the two list views.

/// Which list is on screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum View {
    /// Every track, in server order.
    Tracks,
    /// Artist → album → track hierarchy.
    Browser,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    Artist,
    Album,
    Track,
}

/// The cursor is kept inside the current list by the owner calling
/// [`Navigation::clamp`] whenever that list may have shrunk.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub view: View,
    pub level: Level,
    cursor: usize,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl Navigation {
    pub fn new(view: View) -> Self {
        Self {
            view,
            level: Level::Artist,
            cursor: 0,
            artist: None,
            album: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn down(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn top(&mut self) {
        self.cursor = 0;
    }

    pub fn bottom(&mut self, len: usize) {
        self.cursor = len.saturating_sub(1);
    }

    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn switch_view(&mut self) {
        self.view = match self.view {
            View::Tracks => View::Browser,
            View::Browser => View::Tracks,
        };
        self.reset_browser();
        self.cursor = 0;
    }

    /// Back to the artist list with nothing selected.
    pub fn reset_browser(&mut self) {
        self.level = Level::Artist;
        self.artist = None;
        self.album = None;
    }

    pub fn open_artist(&mut self, artist: String) {
        self.artist = Some(artist);
        self.album = None;
        self.level = Level::Album;
        self.cursor = 0;
    }

    pub fn open_album(&mut self, album: String) {
        self.album = Some(album);
        self.level = Level::Track;
        self.cursor = 0;
    }

    /// Pop one level. Returns false when already at the top.
    pub fn back(&mut self) -> bool {
        match self.level {
            Level::Artist => return false,
            Level::Album => {
                self.level = Level::Artist;
                self.artist = None;
                self.album = None;
            }
            Level::Track => {
                self.level = Level::Album;
                self.album = None;
            }
        }
        self.cursor = 0;
        true
    }

    /// "Artists", "Artists › Band", "Artists › Band › Record".
    pub fn breadcrumb(&self) -> String {
        let mut out = String::from("Artists");
        for part in [&self.artist, &self.album].into_iter().flatten() {
            out.push_str(" › ");
            out.push_str(part);
        }
        out
    }
}
