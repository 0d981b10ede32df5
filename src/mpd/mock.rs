//! Scripted MPD server on an ephemeral port, for session and doctor tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use crate::config::MpdSettings;

pub const GREETING: &str = "OK MPD 0.23.5\n";

pub enum Reply {
    Now(&'static str),
    After(Duration, &'static str),
    Silent,
}

pub type Handler = fn(&str) -> Reply;

/// Scripted MPD on an ephemeral port. Every accepted connection gets the
/// greeting and then one handler call per received line.
pub struct MockMpd {
    port: u16,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockMpd {
    pub async fn start(greeting: &'static str, handler: Handler) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = received.clone();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let log = log.clone();
                tokio::spawn(async move {
                    let (read, mut write) = stream.into_split();
                    let mut lines = BufReader::new(read).lines();
                    if write.write_all(greeting.as_bytes()).await.is_err() {
                        return;
                    }
                    while let Ok(Some(line)) = lines.next_line().await {
                        log.lock().unwrap().push(line.clone());
                        let text = match handler(&line) {
                            Reply::Now(text) => text,
                            Reply::After(delay, text) => {
                                tokio::time::sleep(delay).await;
                                text
                            }
                            Reply::Silent => continue,
                        };
                        if write.write_all(text.as_bytes()).await.is_err() {
                            return;
                        }
                    }
                });
            }
        });

        Self { port, received }
    }

    pub fn settings(&self) -> MpdSettings {
        MpdSettings {
            host: "127.0.0.1".into(),
            port: self.port,
            timeout_ms: 200,
            idle_timeout_ms: 150,
            password: None,
            dedicated_idle_connection: false,
        }
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

pub fn standard(line: &str) -> Reply {
    match line {
        "status" => Reply::Now("volume: 80\nstate: play\nelapsed: 12.000\nduration: 200.000\nOK\n"),
        "currentsong" => Reply::Now("file: a.mp3\nTitle: Song\nArtist: Band\nAlbum: Record\nOK\n"),
        "listallinfo" => Reply::Now(
            "directory: Rock\nfile: Rock/a.mp3\nTitle: A\nArtist: Band\nTrack: 1/9\nfile: Rock/b.mp3\nTitle: B\nplaylist: x.m3u\nOK\n",
        ),
        "noidle" => Reply::Now("OK\n"),
        l if l.starts_with("idle") => Reply::Silent,
        l if l.starts_with("addid") => Reply::Now("Id: 7\nOK\n"),
        _ => Reply::Now("OK\n"),
    }
}

