use super::nav::Level;
use super::*;
use crate::library::Track;
use crate::mpd::fake::FakeSession;
use crate::mpd::{Connection, MpdError, NowPlaying, PlayState};

use std::sync::Arc;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(500);

fn t(uri: &str, artist: &str, album: &str, track_no: u32) -> Track {
    Track {
        uri: uri.into(),
        title: uri.into(),
        artist: artist.into(),
        album: album.into(),
        track_no,
        ..Track::default()
    }
}

fn library() -> Vec<Track> {
    vec![
        t("b2", "Band", "Second", 2),
        t("b1", "Band", "Second", 1),
        t("a1", "Band", "First", 1),
        t("z1", "Zed", "Only", 1),
    ]
}

fn conn() -> Connection {
    Connection::shared(Arc::new(FakeSession::new()))
}

/// Connected app with the test library loaded.
fn ready_app() -> App {
    let mut app = App::new(TICK);
    app.init();
    app.update(Msg::Connected(conn()));
    app.update(Msg::LibraryLoaded(library()));
    app
}

/// Idle result from the first connection.
fn changed(subsystems: &[&str]) -> Msg {
    Msg::Changed {
        subsystems: subsystems.iter().map(|s| s.to_string()).collect(),
        generation: 1,
    }
}

fn press(app: &mut App, action: Action) -> Vec<Op> {
    app.update(Msg::Input(action))
}

#[test]
fn init_connects_and_starts_ticking() {
    let mut app = App::new(TICK);
    assert_eq!(app.state, ConnState::Disconnected);
    assert_eq!(app.init(), vec![Op::Connect, Op::Tick(TICK)]);
    assert_eq!(app.state, ConnState::Connecting);
}

#[test]
fn connected_fetches_library_status_and_watches() {
    let mut app = App::new(TICK);
    app.init();
    let ops = app.update(Msg::Connected(conn()));
    assert_eq!(ops, vec![Op::FetchLibrary, Op::RefreshStatus, Op::watch(1)]);
    assert_eq!(app.state, ConnState::Loading);
    assert!(app.idle_in_flight());
    assert!(app.connection().is_some());
}

#[test]
fn connect_failure_does_not_retry() {
    let mut app = App::new(TICK);
    app.init();
    let ops = app.update(Msg::ConnectFailed(MpdError::Connect {
        addr: "127.0.0.1:6600".into(),
        reason: "refused".into(),
    }));
    assert!(ops.is_empty());
    assert_eq!(app.state, ConnState::Disconnected);
    assert!(app.last_error.as_deref().unwrap().contains("refused"));

    assert_eq!(press(&mut app, Action::Reconnect), vec![Op::Connect]);
    assert_eq!(app.state, ConnState::Connecting);
    assert!(press(&mut app, Action::Reconnect).is_empty());
}

#[test]
fn library_load_builds_index_and_resets_browser() {
    let mut app = ready_app();
    assert_eq!(app.state, ConnState::Ready);
    assert_eq!(app.index.artists(), ["Band", "Zed"]);

    press(&mut app, Action::SwitchView);
    press(&mut app, Action::Enter);
    assert_eq!(app.nav.level, Level::Album);

    app.update(Msg::LibraryLoaded(library()));
    assert_eq!(app.nav.level, Level::Artist);
    assert_eq!(app.nav.artist, None);
}

#[test]
fn empty_idle_result_resubscribes_immediately() {
    let mut app = ready_app();
    let ops = app.update(changed(&[]));
    assert_eq!(ops, vec![Op::watch(1)]);
    assert!(app.idle_in_flight());
}

#[test]
fn changes_map_to_refreshes() {
    let mut app = ready_app();
    let ops = app.update(changed(&["mixer"]));
    assert_eq!(ops, vec![Op::RefreshStatus, Op::watch(1)]);

    let ops = app.update(changed(&["update", "player"]));
    assert_eq!(ops, vec![Op::RefreshStatus, Op::FetchLibrary, Op::watch(1)]);

    let ops = app.update(changed(&["stored_playlist"]));
    assert_eq!(ops, vec![Op::watch(1)]);
}

#[test]
fn fatal_failure_drops_connection() {
    let mut app = ready_app();
    let ops = app.update(Msg::Failed {
        op: OpKind::Status,
        err: MpdError::Protocol("connection closed before OK".into()),
    });
    assert!(ops.is_empty());
    assert_eq!(app.state, ConnState::Disconnected);
    assert!(app.connection().is_none());
    assert!(!app.idle_in_flight());
    assert_eq!(
        app.last_error.as_deref(),
        Some("status: protocol error: connection closed before OK")
    );
}

#[test]
fn command_failure_keeps_connection() {
    let mut app = ready_app();
    app.update(Msg::Failed {
        op: OpKind::Playback,
        err: MpdError::Command("ACK [2@0] {next} bad".into()),
    });
    assert_eq!(app.state, ConnState::Ready);
    assert!(app.connection().is_some());
    assert!(app.idle_in_flight());
    assert_eq!(app.last_error.as_deref(), Some("playback: ACK [2@0] {next} bad"));

    app.update(Msg::Failed {
        op: OpKind::Idle(1),
        err: MpdError::Command("ACK [2@0] {idle} bad".into()),
    });
    assert!(!app.idle_in_flight());
}

#[test]
fn tick_advances_only_while_playing() {
    let mut app = ready_app();
    app.update(Msg::Status(NowPlaying {
        elapsed: Duration::from_secs(10),
        duration: Duration::from_secs(11),
        playing: true,
        state: PlayState::Play,
        ..NowPlaying::default()
    }));

    assert_eq!(app.update(Msg::Tick), vec![Op::Tick(TICK)]);
    assert_eq!(app.now.elapsed, Duration::from_millis(10_500));
    app.update(Msg::Tick);
    app.update(Msg::Tick);
    assert_eq!(app.now.elapsed, Duration::from_secs(11));

    app.now.playing = false;
    app.now.elapsed = Duration::from_secs(3);
    app.update(Msg::Tick);
    assert_eq!(app.now.elapsed, Duration::from_secs(3));
}

#[test]
fn cursor_stays_in_range() {
    let mut app = ready_app();
    press(&mut app, Action::Up);
    assert_eq!(app.nav.cursor(), 0);
    for _ in 0..10 {
        press(&mut app, Action::Down);
    }
    assert_eq!(app.nav.cursor(), 3);
    press(&mut app, Action::Top);
    assert_eq!(app.nav.cursor(), 0);
    press(&mut app, Action::Bottom);
    assert_eq!(app.nav.cursor(), 3);

    app.update(Msg::LibraryLoaded(vec![t("only", "A", "B", 1)]));
    assert_eq!(app.nav.cursor(), 0);

    app.update(Msg::LibraryLoaded(Vec::new()));
    press(&mut app, Action::Bottom);
    assert_eq!(app.nav.cursor(), 0);
    assert!(press(&mut app, Action::Enter).is_empty());
}

#[test]
fn enter_in_flat_view_plays_everything_from_cursor() {
    let mut app = ready_app();
    press(&mut app, Action::Down);
    let ops = press(&mut app, Action::Enter);
    assert_eq!(
        ops,
        vec![Op::EnqueueAndPlay {
            uris: vec!["b2".into(), "b1".into(), "a1".into(), "z1".into()],
            start: 1,
        }]
    );
}

#[test]
fn browser_drills_down_and_plays_album_from_cursor() {
    let mut app = ready_app();
    press(&mut app, Action::SwitchView);
    assert_eq!(app.nav.view, View::Browser);
    assert_eq!(app.rows(), ["Band", "Zed"]);

    assert!(press(&mut app, Action::Enter).is_empty());
    assert_eq!(app.nav.level, Level::Album);
    assert_eq!(app.rows(), ["First", "Second"]);

    press(&mut app, Action::Down);
    assert!(press(&mut app, Action::Enter).is_empty());
    assert_eq!(app.nav.level, Level::Track);
    assert_eq!(app.nav.breadcrumb(), "Artists › Band › Second");
    assert_eq!(app.rows(), ["[01] b1", "[02] b2"]);

    press(&mut app, Action::Down);
    assert_eq!(app.selected_track().map(|t| t.uri.as_str()), Some("b2"));
    let ops = press(&mut app, Action::Enter);
    assert_eq!(
        ops,
        vec![Op::EnqueueAndPlay {
            uris: vec!["b1".into(), "b2".into()],
            start: 1,
        }]
    );
}

#[test]
fn back_from_track_level_keeps_artist_and_clears_album() {
    let mut app = ready_app();
    press(&mut app, Action::SwitchView);
    press(&mut app, Action::Enter);
    press(&mut app, Action::Down);
    press(&mut app, Action::Enter);
    assert_eq!(app.nav.level, Level::Track);
    assert_eq!(app.nav.album.as_deref(), Some("Second"));
    press(&mut app, Action::Down);
    assert_eq!(app.nav.cursor(), 1);

    press(&mut app, Action::Back);
    assert_eq!(app.nav.cursor(), 0);
    assert_eq!(app.nav.level, Level::Album);
    assert_eq!(app.nav.artist.as_deref(), Some("Band"));
    assert_eq!(app.nav.album, None);

    press(&mut app, Action::Back);
    assert_eq!(app.nav.level, Level::Artist);
    assert_eq!(app.nav.artist, None);

    press(&mut app, Action::Back);
    assert_eq!(app.nav.level, Level::Artist);
}

#[test]
fn playback_keys_emit_ops_without_touching_now_playing() {
    let mut app = ready_app();
    let before = app.now.clone();
    assert_eq!(
        press(&mut app, Action::TogglePause),
        vec![Op::Playback(PlaybackAction::TogglePause)]
    );
    assert_eq!(
        press(&mut app, Action::Next),
        vec![Op::Playback(PlaybackAction::Next)]
    );
    assert_eq!(
        press(&mut app, Action::Previous),
        vec![Op::Playback(PlaybackAction::Previous)]
    );
    assert_eq!(app.now, before);
}

#[test]
fn info_and_quit_flags() {
    let mut app = ready_app();
    assert!(app.selected_track().is_some());
    press(&mut app, Action::ToggleInfo);
    assert!(app.show_info);
    press(&mut app, Action::Quit);
    assert!(app.should_quit);
}

#[test]
fn idle_timeout_resubscribes_without_an_error() {
    let mut app = ready_app();
    let ops = app.update(Msg::Failed {
        op: OpKind::Idle(1),
        err: MpdError::Timeout(Duration::from_secs(2)),
    });
    assert_eq!(ops, vec![Op::watch(1)]);
    assert!(app.idle_in_flight());
    assert_eq!(app.last_error, None);
    assert_eq!(app.state, ConnState::Ready);
}

#[test]
fn idle_results_from_an_old_connection_are_dropped() {
    let mut app = ready_app();
    app.update(Msg::Failed {
        op: OpKind::Status,
        err: MpdError::Protocol("connection closed before OK".into()),
    });
    assert_eq!(press(&mut app, Action::Reconnect), vec![Op::Connect]);
    let ops = app.update(Msg::Connected(conn()));
    assert_eq!(ops, vec![Op::FetchLibrary, Op::RefreshStatus, Op::watch(2)]);

    // The first connection's idle finishing late must not start a second loop.
    assert!(app.update(changed(&["player"])).is_empty());
    assert!(app.update(Msg::Failed {
        op: OpKind::Idle(1),
        err: MpdError::Protocol("connection reset".into()),
    })
    .is_empty());
    assert!(app.idle_in_flight());
    assert_eq!(app.state, ConnState::Loading);
    assert_eq!(app.last_error, None);

    let ops = app.update(Msg::Changed {
        subsystems: vec!["player".into()],
        generation: 2,
    });
    assert_eq!(ops, vec![Op::RefreshStatus, Op::watch(2)]);
}
