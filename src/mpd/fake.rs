//! In-memory session for reducer, dispatcher and orchestrator tests.
//!
//! Every verb is recorded the way it would appear on the wire, so tests can
//! assert on the exact command sequence.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::library::Track;

use super::client::{Connection, Connector, MpdSession};
use super::error::{MpdError, MpdResult};
use super::types::{PlayState, SongInfo, Status};

#[derive(Default)]
struct FakeState {
    log: Vec<String>,
    state: PlayState,
    elapsed: Duration,
    duration: Duration,
    song: SongInfo,
    tracks: Vec<Track>,
    fail_on: HashSet<String>,
    changes: VecDeque<Vec<String>>,
    next_id: Option<u32>,
}

#[derive(Default)]
pub struct FakeSession {
    inner: Mutex<FakeState>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(self, state: PlayState) -> Self {
        self.lock().state = state;
        self
    }

    pub fn with_tracks(self, tracks: Vec<Track>) -> Self {
        self.lock().tracks = tracks;
        self
    }

    pub fn with_song(self, song: SongInfo) -> Self {
        self.lock().song = song;
        self
    }

    /// First `addid` returns this id; later ones count up from it.
    pub fn with_next_id(self, id: u32) -> Self {
        self.lock().next_id = Some(id);
        self
    }

    /// Make every command starting with `verb` fail with an ACK.
    pub fn failing(self, verb: &str) -> Self {
        self.lock().fail_on.insert(verb.to_string());
        self
    }

    /// Queue a result for the next `wait_for_change`.
    pub fn push_change(&self, subsystems: &[&str]) {
        self.lock()
            .changes
            .push_back(subsystems.iter().map(|s| s.to_string()).collect());
    }

    /// Commands received so far, in order.
    pub fn log(&self) -> Vec<String> {
        self.lock().log.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.inner.lock().expect("fake session poisoned")
    }

    fn record(&self, command: String) -> MpdResult<()> {
        let mut state = self.lock();
        let verb = command.split(' ').next().unwrap_or_default().to_string();
        state.log.push(command);
        if state.fail_on.contains(&verb) {
            return Err(MpdError::Command(format!(
                "ACK [50@0] {{{verb}}} forced failure"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MpdSession for FakeSession {
    async fn status(&self) -> MpdResult<Status> {
        self.record("status".into())?;
        let state = self.lock();
        Ok(Status {
            state: state.state,
            elapsed: state.elapsed,
            duration: state.duration,
            ..Status::default()
        })
    }

    async fn current_song(&self) -> MpdResult<SongInfo> {
        self.record("currentsong".into())?;
        Ok(self.lock().song.clone())
    }

    async fn list_library(&self) -> MpdResult<Vec<Track>> {
        self.record("listallinfo".into())?;
        Ok(self.lock().tracks.clone())
    }

    async fn queue_clear(&self) -> MpdResult<()> {
        self.record("clear".into())
    }

    async fn queue_add(&self, uri: &str) -> MpdResult<()> {
        self.record(format!("add {uri}"))
    }

    async fn queue_add_id(&self, uri: &str) -> MpdResult<Option<u32>> {
        self.record(format!("addid {uri}"))?;
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id = id.map(|n| n + 1);
        Ok(id)
    }

    async fn play(&self) -> MpdResult<()> {
        self.record("play".into())?;
        self.lock().state = PlayState::Play;
        Ok(())
    }

    async fn play_at(&self, pos: u32) -> MpdResult<()> {
        self.record(format!("play {pos}"))?;
        self.lock().state = PlayState::Play;
        Ok(())
    }

    async fn play_id(&self, id: u32) -> MpdResult<()> {
        self.record(format!("playid {id}"))?;
        self.lock().state = PlayState::Play;
        Ok(())
    }

    async fn pause(&self, paused: bool) -> MpdResult<()> {
        self.record(format!("pause {}", u8::from(paused)))?;
        self.lock().state = if paused {
            PlayState::Pause
        } else {
            PlayState::Play
        };
        Ok(())
    }

    async fn toggle_pause_raw(&self) -> MpdResult<()> {
        self.record("pause".into())
    }

    async fn next(&self) -> MpdResult<()> {
        self.record("next".into())
    }

    async fn previous(&self) -> MpdResult<()> {
        self.record("previous".into())
    }

    async fn wait_for_change(&self, subsystems: &[String]) -> MpdResult<Vec<String>> {
        self.record(format!("idle {}", subsystems.join(" ")))?;
        Ok(self.lock().changes.pop_front().unwrap_or_default())
    }
}

/// Hands out the same fake session on every connect.
pub struct FakeConnector {
    pub session: Arc<FakeSession>,
    pub fail: Option<MpdError>,
}

impl FakeConnector {
    pub fn new(session: Arc<FakeSession>) -> Self {
        Self {
            session,
            fail: None,
        }
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self) -> MpdResult<Connection> {
        match &self.fail {
            Some(e) => Err(e.clone()),
            None => Ok(Connection::shared(self.session.clone())),
        }
    }
}
