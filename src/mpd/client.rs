use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::MpdSettings;
use crate::library::Track;

use super::error::MpdResult;
use super::session::TcpSession;
use super::types::{NowPlaying, PlayState, SongInfo, Status};

/// Typed commands against one server connection.
#[async_trait]
pub trait MpdSession: Send + Sync {
    async fn status(&self) -> MpdResult<Status>;
    async fn current_song(&self) -> MpdResult<SongInfo>;
    async fn list_library(&self) -> MpdResult<Vec<Track>>;

    async fn queue_clear(&self) -> MpdResult<()>;
    async fn queue_add(&self, uri: &str) -> MpdResult<()>;
    /// Queue `uri` and return its song id, if the server reported one.
    async fn queue_add_id(&self, uri: &str) -> MpdResult<Option<u32>>;

    async fn play(&self) -> MpdResult<()>;
    async fn play_at(&self, pos: u32) -> MpdResult<()>;
    async fn play_id(&self, id: u32) -> MpdResult<()>;
    async fn pause(&self, paused: bool) -> MpdResult<()>;
    /// Bare `pause`, which flips the state server-side.
    async fn toggle_pause_raw(&self) -> MpdResult<()>;
    async fn next(&self) -> MpdResult<()>;
    async fn previous(&self) -> MpdResult<()>;

    /// Block until one of `subsystems` changes or the idle timeout passes.
    /// A timeout yields an empty list.
    async fn wait_for_change(&self, subsystems: &[String]) -> MpdResult<Vec<String>>;

    /// Status plus current-song metadata. Metadata is best effort.
    async fn now_playing(&self) -> MpdResult<NowPlaying> {
        let status = self.status().await?;
        let mut now = NowPlaying::from_status(&status);
        match self.current_song().await {
            Ok(song) => now.merge_song(song),
            Err(e) => tracing::warn!(error = %e, "currentsong failed; keeping status only"),
        }
        Ok(now)
    }

    /// Pause when playing, resume when paused, start when stopped.
    async fn toggle_pause(&self) -> MpdResult<()> {
        match self.status().await?.state {
            PlayState::Play => self.pause(true).await,
            PlayState::Pause => self.pause(false).await,
            PlayState::Stop => self.play().await,
            PlayState::Unknown => self.toggle_pause_raw().await,
        }
    }
}

/// Sessions used by the app. `idle` may be the same session as `commands`.
#[derive(Clone)]
pub struct Connection {
    commands: Arc<dyn MpdSession>,
    idle: Arc<dyn MpdSession>,
}

impl Connection {
    /// Everything, idle included, goes through one session.
    pub fn shared(session: Arc<dyn MpdSession>) -> Self {
        Self {
            commands: session.clone(),
            idle: session,
        }
    }

    pub fn split(commands: Arc<dyn MpdSession>, idle: Arc<dyn MpdSession>) -> Self {
        Self { commands, idle }
    }

    pub fn commands(&self) -> &dyn MpdSession {
        self.commands.as_ref()
    }

    pub fn idle(&self) -> &dyn MpdSession {
        self.idle.as_ref()
    }

    pub fn is_split(&self) -> bool {
        !Arc::ptr_eq(&self.commands, &self.idle)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("split", &self.is_split())
            .finish()
    }
}

/// Opens connections. The app never dials directly.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> MpdResult<Connection>;
}

pub struct TcpConnector {
    settings: MpdSettings,
}

impl TcpConnector {
    pub fn new(settings: MpdSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self) -> MpdResult<Connection> {
        if !self.settings.dedicated_idle_connection {
            let session = TcpSession::connect(&self.settings).await?;
            return Ok(Connection::shared(Arc::new(session)));
        }
        let (commands, idle) = tokio::try_join!(
            TcpSession::connect(&self.settings),
            TcpSession::connect(&self.settings)
        )?;
        tracing::debug!(addr = %self.settings.addr(), "using a dedicated idle connection");
        Ok(Connection::split(Arc::new(commands), Arc::new(idle)))
    }
}
