//! Runs reducer operations as independent tokio tasks.
//!
//! Each operation gets its own deadline and resolves to exactly one [`Msg`]
//! on the channel the runtime loop drains.

use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::app::{Msg, Op, OpKind, PlaybackAction};
use crate::mpd::{Connection, Connector, MpdError, MpdResult, MpdSession, NowPlaying};

pub mod queue;

/// Per-operation deadlines. `None` means unbounded.
#[derive(Debug, Clone, Copy)]
pub struct Deadlines {
    pub connect: Duration,
    pub status: Duration,
    pub library: Duration,
    pub playback: Duration,
    /// Added to `playback` for every URI an enqueue sends.
    pub per_enqueued: Duration,
    pub idle: Option<Duration>,
}

impl Deadlines {
    pub fn new(connect: Duration) -> Self {
        Self {
            connect,
            status: Duration::from_secs(2),
            library: Duration::from_secs(5),
            playback: Duration::from_secs(3),
            per_enqueued: Duration::from_millis(10),
            idle: None,
        }
    }

    fn for_op(&self, op: &Op) -> Option<Duration> {
        match op {
            Op::Connect => Some(self.connect),
            Op::FetchLibrary => Some(self.library),
            Op::RefreshStatus => Some(self.status),
            Op::Playback(_) => Some(self.playback),
            Op::EnqueueAndPlay { uris, start } => {
                let sent = uris.len().saturating_sub(*start);
                let per = self.per_enqueued.saturating_mul(u32::try_from(sent).unwrap_or(u32::MAX));
                Some(self.playback.saturating_add(per))
            }
            Op::WaitForChange { .. } => self.idle,
            Op::Tick(_) => None,
        }
    }
}

pub struct Dispatcher {
    handle: Handle,
    tx: Sender<Msg>,
    connector: Arc<dyn Connector>,
    deadlines: Deadlines,
}

impl Dispatcher {
    pub fn new(
        handle: Handle,
        tx: Sender<Msg>,
        connector: Arc<dyn Connector>,
        deadlines: Deadlines,
    ) -> Self {
        Self {
            handle,
            tx,
            connector,
            deadlines,
        }
    }

    /// Start `op` in the background and return immediately.
    pub fn dispatch(&self, op: Op, conn: Option<&Connection>) {
        let tx = self.tx.clone();
        let kind = op.kind();
        let deadline = self.deadlines.for_op(&op);
        tracing::trace!(?op, "dispatch");

        let msg_future = run(op, conn.cloned(), self.connector.clone());
        self.handle.spawn(async move {
            let msg = match deadline {
                Some(limit) => match tokio::time::timeout(limit, msg_future).await {
                    Ok(msg) => msg,
                    Err(_) => timed_out(kind, limit),
                },
                None => msg_future.await,
            };
            if tx.send(msg).is_err() {
                tracing::debug!(%kind, "receiver gone; dropping result");
            }
        });
    }
}

fn timed_out(kind: OpKind, limit: Duration) -> Msg {
    let err = MpdError::Timeout(limit);
    match kind {
        OpKind::Connect => Msg::ConnectFailed(err),
        op => Msg::Failed { op, err },
    }
}

/// The work behind one operation, without its deadline.
fn run(
    op: Op,
    conn: Option<Connection>,
    connector: Arc<dyn Connector>,
) -> impl Future<Output = Msg> + Send + 'static {
    async move {
        let kind = op.kind();
        match execute(op, conn.as_ref(), connector.as_ref()).await {
            Ok(msg) => msg,
            Err(err) if kind == OpKind::Connect => {
                tracing::warn!(error = %err, "connect failed");
                Msg::ConnectFailed(err)
            }
            Err(err) => {
                tracing::warn!(op = %kind, error = %err, "operation failed");
                Msg::Failed { op: kind, err }
            }
        }
    }
}

async fn execute(op: Op, conn: Option<&Connection>, connector: &dyn Connector) -> MpdResult<Msg> {
    let session = || conn.ok_or(MpdError::NotConnected);
    match op {
        Op::Connect => connector.connect().await.map(Msg::Connected),
        Op::Tick(after) => {
            tokio::time::sleep(after).await;
            Ok(Msg::Tick)
        }
        Op::FetchLibrary => session()?.commands().list_library().await.map(Msg::LibraryLoaded),
        Op::RefreshStatus => session()?.commands().now_playing().await.map(Msg::Status),
        Op::Playback(action) => playback(session()?.commands(), action).await.map(Msg::Status),
        Op::EnqueueAndPlay { uris, start } => {
            queue::enqueue_and_play(session()?.commands(), &uris, start)
                .await
                .map(Msg::Status)
        }
        Op::WaitForChange {
            subsystems,
            generation,
        } => session()?
            .idle()
            .wait_for_change(&subsystems)
            .await
            .map(|subsystems| Msg::Changed {
                subsystems,
                generation,
            }),
    }
}

async fn playback(session: &dyn MpdSession, action: PlaybackAction) -> MpdResult<NowPlaying> {
    match action {
        PlaybackAction::TogglePause => session.toggle_pause().await?,
        PlaybackAction::Next => session.next().await?,
        PlaybackAction::Previous => session.previous().await?,
    }
    session.now_playing().await
}
