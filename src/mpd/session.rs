use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::config::MpdSettings;
use crate::library::Track;

use super::client::MpdSession;
use super::codec::{self, GREETING_PREFIX, quote};
use super::error::{MpdError, MpdResult};
use super::fields;
use super::types::{Output, SongInfo, Status};

/// Socket halves plus the bookkeeping that keeps them in step with the server.
struct Wire {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    /// Responses the server still owes to cycles that stopped waiting.
    stale: usize,
    /// An `idle` is outstanding and has not been cancelled with `noidle`.
    idle_pending: bool,
}

impl Wire {
    /// Read and drop whatever earlier, abandoned cycles left on the stream.
    async fn drain_stale(&mut self, limit: Duration) -> MpdResult<()> {
        if self.idle_pending {
            self.writer.write_all(b"noidle\n").await?;
            self.idle_pending = false;
        }
        while self.stale > 0 {
            match timeout(limit, codec::read_response(&mut self.reader)).await {
                Err(_) => return Err(MpdError::Timeout(limit)),
                Ok(Err(e)) if e.is_fatal() => return Err(e),
                Ok(_) => self.stale -= 1,
            }
        }
        Ok(())
    }

    fn settle<T>(&mut self, result: &MpdResult<T>) {
        // A fatal error means the stream is gone; leave the counter as a tombstone.
        if !matches!(result, Err(e) if e.is_fatal()) {
            self.stale -= 1;
        }
    }
}

/// One TCP connection to the server. Every command cycle holds the lock for
/// its whole write + read, so cycles never interleave on the wire.
pub struct TcpSession {
    addr: String,
    version: String,
    timeout: Duration,
    idle_timeout: Duration,
    wire: Mutex<Wire>,
}

impl TcpSession {
    /// Dial, check the greeting and send the password if one is configured.
    pub async fn connect(settings: &MpdSettings) -> MpdResult<Self> {
        let addr = settings.addr();
        let limit = settings.timeout();
        let connect_err = |reason: String| MpdError::Connect {
            addr: addr.clone(),
            reason,
        };

        let stream = match timeout(limit, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(connect_err(e.to_string())),
            Err(_) => {
                return Err(connect_err(format!(
                    "no answer within {}ms",
                    limit.as_millis()
                )));
            }
        };
        let (read_half, writer) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        // Returning early drops both halves, which closes the socket.
        let greeting = match timeout(limit, codec::read_line(&mut reader)).await {
            Ok(Ok(Some(line))) => line,
            Ok(Ok(None)) => return Err(connect_err("closed before greeting".to_string())),
            Ok(Err(e)) => return Err(connect_err(e.to_string())),
            Err(_) => {
                return Err(connect_err(format!(
                    "no greeting within {}ms",
                    limit.as_millis()
                )));
            }
        };
        let Some(version) = greeting.strip_prefix(GREETING_PREFIX) else {
            tracing::warn!(%addr, greeting = %greeting, "rejecting server");
            return Err(MpdError::Greeting(greeting));
        };

        let session = Self {
            addr: addr.clone(),
            version: version.trim().to_string(),
            timeout: limit,
            idle_timeout: settings.idle_timeout(),
            wire: Mutex::new(Wire {
                reader,
                writer,
                stale: 0,
                idle_pending: false,
            }),
        };

        if let Some(password) = settings.password.as_deref().filter(|p| !p.is_empty()) {
            session.exec(&format!("password {}", quote(password))).await?;
        }

        tracing::info!(%addr, version = %session.version, "connected");
        Ok(session)
    }

    pub fn server_version(&self) -> &str {
        &self.version
    }

    /// One request/response cycle.
    pub async fn exec(&self, command: &str) -> MpdResult<Vec<String>> {
        let bytes = codec::encode(command)?;
        let mut guard = self.wire.lock().await;
        let wire = &mut *guard;
        wire.drain_stale(self.timeout).await?;

        wire.stale += 1;
        let cycle = async {
            wire.writer.write_all(&bytes).await?;
            codec::read_response(&mut wire.reader).await
        };
        let result = match timeout(self.timeout, cycle).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!(command, "response overdue; will drain before next command");
                return Err(MpdError::Timeout(self.timeout));
            }
        };
        wire.settle(&result);
        tracing::trace!(command, ok = result.is_ok(), "cycle done");
        result
    }

    async fn exec_ok(&self, command: &str) -> MpdResult<()> {
        self.exec(command).await.map(|_| ())
    }

    pub async fn stats(&self) -> MpdResult<HashMap<String, String>> {
        let lines = self.exec("stats").await?;
        Ok(fields::kv_lower(&lines))
    }

    pub async fn outputs(&self) -> MpdResult<Vec<Output>> {
        let lines = self.exec("outputs").await?;
        Ok(fields::parse_outputs(&lines))
    }
}

#[async_trait]
impl MpdSession for TcpSession {
    #[tracing::instrument(skip(self))]
    async fn status(&self) -> MpdResult<Status> {
        let lines = self.exec("status").await?;
        Ok(fields::parse_status(&lines))
    }

    #[tracing::instrument(skip(self))]
    async fn current_song(&self) -> MpdResult<SongInfo> {
        let lines = self.exec("currentsong").await?;
        Ok(fields::parse_song(&lines))
    }

    #[tracing::instrument(skip(self))]
    async fn list_library(&self) -> MpdResult<Vec<Track>> {
        let lines = self.exec("listallinfo").await?;
        let tracks = fields::parse_tracks(&lines);
        tracing::debug!(count = tracks.len(), "library listed");
        Ok(tracks)
    }

    #[tracing::instrument(skip(self))]
    async fn queue_clear(&self) -> MpdResult<()> {
        self.exec_ok("clear").await
    }

    #[tracing::instrument(skip(self))]
    async fn queue_add(&self, uri: &str) -> MpdResult<()> {
        self.exec_ok(&format!("add {}", quote(uri))).await
    }

    #[tracing::instrument(skip(self))]
    async fn queue_add_id(&self, uri: &str) -> MpdResult<Option<u32>> {
        let lines = self.exec(&format!("addid {}", quote(uri))).await?;
        Ok(fields::parse_added_id(&lines))
    }

    #[tracing::instrument(skip(self))]
    async fn play(&self) -> MpdResult<()> {
        self.exec_ok("play").await
    }

    #[tracing::instrument(skip(self))]
    async fn play_at(&self, pos: u32) -> MpdResult<()> {
        self.exec_ok(&format!("play {pos}")).await
    }

    #[tracing::instrument(skip(self))]
    async fn play_id(&self, id: u32) -> MpdResult<()> {
        self.exec_ok(&format!("playid {id}")).await
    }

    #[tracing::instrument(skip(self))]
    async fn pause(&self, paused: bool) -> MpdResult<()> {
        self.exec_ok(&format!("pause {}", u8::from(paused))).await
    }

    #[tracing::instrument(skip(self))]
    async fn toggle_pause_raw(&self) -> MpdResult<()> {
        self.exec_ok("pause").await
    }

    #[tracing::instrument(skip(self))]
    async fn next(&self) -> MpdResult<()> {
        self.exec_ok("next").await
    }

    #[tracing::instrument(skip(self))]
    async fn previous(&self) -> MpdResult<()> {
        self.exec_ok("previous").await
    }

    #[tracing::instrument(skip(self))]
    async fn wait_for_change(&self, subsystems: &[String]) -> MpdResult<Vec<String>> {
        let mut command = String::from("idle");
        for sub in subsystems {
            command.push(' ');
            command.push_str(sub);
        }
        let bytes = codec::encode(&command)?;

        let mut guard = self.wire.lock().await;
        let wire = &mut *guard;
        wire.drain_stale(self.timeout).await?;

        wire.stale += 1;
        wire.idle_pending = true;
        wire.writer.write_all(&bytes).await?;

        let result = match timeout(self.idle_timeout, codec::read_response(&mut wire.reader)).await {
            Ok(result) => result,
            Err(_) => {
                // Nothing happened in time: cancel and collect whatever the
                // server reports for the cancelled idle.
                wire.writer.write_all(b"noidle\n").await?;
                wire.idle_pending = false;
                match timeout(self.timeout, codec::read_response(&mut wire.reader)).await {
                    Ok(result) => result,
                    Err(_) => return Err(MpdError::Timeout(self.timeout)),
                }
            }
        };
        wire.idle_pending = false;
        wire.settle(&result);

        let changed = fields::parse_changes(&result?);
        tracing::debug!(?changed, "idle returned");
        Ok(changed)
    }
}
