//! End-to-end tests: a real WebSocket client talking to a served listener.
//!
//! # Purpose
//!
//! These tests drive the host the way a phone does: open a WebSocket, send
//! JSON text frames, and check what reached the input backend.  The backend is
//! a [`RecordingEmulator`], so nothing touches the real cursor and no desktop
//! session is needed.
//!
//! ```text
//! test client ──ws──▶ serve() ──▶ InputWorker ──▶ RecordingEmulator
//!                                                      ▲
//!                           assertions read actions() ─┘
//! ```
//!
//! Each test binds `127.0.0.1:0` so they can run in parallel.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{protocol::frame::coding::CloseCode, Message},
};

use remote_input_core::{NamedKey, PointerButton};
use remote_input_host::application::{EmulationError, PlatformInputEmulator};
use remote_input_host::domain::{DispatchSettings, HostConfig};
use remote_input_host::infrastructure::input_emulation::{EmulatedAction, RecordingEmulator};
use remote_input_host::infrastructure::{serve, InputWorker};

// ── Harness ───────────────────────────────────────────────────────────────────

struct TestHost {
    addr: SocketAddr,
    running: Arc<AtomicBool>,
    server: JoinHandle<anyhow::Result<()>>,
}

impl TestHost {
    async fn start(recorder: &RecordingEmulator, config: HostConfig) -> Self {
        let recorder = recorder.clone();
        Self::start_with(
            move || Ok(Box::new(recorder) as Box<dyn PlatformInputEmulator>),
            config,
        )
        .await
    }

    async fn start_with<F>(factory: F, config: HostConfig) -> Self
    where
        F: FnOnce() -> Result<Box<dyn PlatformInputEmulator>, EmulationError> + Send + 'static,
    {
        let worker = InputWorker::spawn(factory, config.dispatch).expect("worker should start");

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let running = Arc::new(AtomicBool::new(true));
        let server = tokio::spawn(serve(listener, config, worker, Arc::clone(&running)));

        Self {
            addr,
            running,
            server,
        }
    }

    fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    async fn shutdown(self) {
        self.running.store(false, Ordering::Relaxed);
        let result = tokio::time::timeout(Duration::from_secs(2), self.server)
            .await
            .expect("accept loop should notice the shutdown flag")
            .expect("server task should not panic");
        assert!(result.is_ok());
    }
}

/// Polls the recorder until it holds `count` actions or two seconds pass.
async fn wait_for_actions(recorder: &RecordingEmulator, count: usize) -> Vec<EmulatedAction> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let actions = recorder.actions();
        if actions.len() >= count || tokio::time::Instant::now() >= deadline {
            return actions;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn text(frame: &str) -> Message {
    Message::Text(frame.to_string())
}

/// A backend that crashes the input thread on its first call.
struct CrashingEmulator;

impl PlatformInputEmulator for CrashingEmulator {
    fn move_relative(&mut self, _dx: i32, _dy: i32) -> Result<(), EmulationError> {
        panic!("input backend crashed")
    }

    fn click(&mut self, _button: PointerButton) -> Result<(), EmulationError> {
        panic!("input backend crashed")
    }

    fn scroll(&mut self, _clicks: i32) -> Result<(), EmulationError> {
        panic!("input backend crashed")
    }

    fn press_key(&mut self, _key: NamedKey) -> Result<(), EmulationError> {
        panic!("input backend crashed")
    }

    fn type_text(&mut self, _text: &str) -> Result<(), EmulationError> {
        panic!("input backend crashed")
    }

    fn key_combo(&mut self, _keys: &[NamedKey]) -> Result<(), EmulationError> {
        panic!("input backend crashed")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Every event kind sent over one session reaches the emulator in order.
#[tokio::test]
async fn test_events_reach_emulator_in_order() {
    // Arrange
    let recorder = RecordingEmulator::new();
    let host = TestHost::start(&recorder, HostConfig::default()).await;
    let (mut ws, _) = connect_async(host.url()).await.expect("connect");

    // Act: both frame shapes, all six event kinds
    ws.send(text(r#"{"event":"mouse_move","data":{"dx":4.6,"dy":-2}}"#)).await.unwrap();
    ws.send(text(r#"["mouse_click",{"button":"right"}]"#)).await.unwrap();
    ws.send(text(r#"{"event":"mouse_scroll","data":{"dy":"3"}}"#)).await.unwrap();
    ws.send(text(r#"{"event":"key_press","data":{"key":"enter"}}"#)).await.unwrap();
    ws.send(text(r#"{"event":"keyboard_text","data":{"text":"hi"}}"#)).await.unwrap();
    ws.send(text(r#"{"event":"key_combo","data":{"keys":"ctrl+c"}}"#)).await.unwrap();

    // Assert
    let actions = wait_for_actions(&recorder, 6).await;
    assert_eq!(
        actions,
        vec![
            EmulatedAction::MoveRelative { dx: 4, dy: -2 },
            EmulatedAction::Click(PointerButton::Right),
            EmulatedAction::Scroll(3),
            EmulatedAction::PressKey(NamedKey::Enter),
            EmulatedAction::TypeText("hi".to_string()),
            EmulatedAction::KeyCombo(vec![NamedKey::Control, NamedKey::Char('c')]),
        ]
    );

    ws.close(None).await.ok();
    host.shutdown().await;
}

/// Malformed JSON, unknown events, and binary frames are dropped without
/// closing the session.
#[tokio::test]
async fn test_bad_frames_do_not_close_session() {
    let recorder = RecordingEmulator::new();
    let host = TestHost::start(&recorder, HostConfig::default()).await;
    let (mut ws, _) = connect_async(host.url()).await.expect("connect");

    ws.send(text("{not json")).await.unwrap();
    ws.send(text(r#"{"event":"teleport","data":{}}"#)).await.unwrap();
    ws.send(text(r#"42"#)).await.unwrap();
    ws.send(Message::Binary(vec![1, 2, 3])).await.unwrap();
    ws.send(text(r#"{"event":"mouse_click"}"#)).await.unwrap();

    let actions = wait_for_actions(&recorder, 1).await;
    assert_eq!(actions, vec![EmulatedAction::Click(PointerButton::Left)]);

    ws.close(None).await.ok();
    host.shutdown().await;
}

/// Empty key and text payloads are skipped; no emulator call is made.
#[tokio::test]
async fn test_empty_payloads_are_skipped() {
    let recorder = RecordingEmulator::new();
    let host = TestHost::start(&recorder, HostConfig::default()).await;
    let (mut ws, _) = connect_async(host.url()).await.expect("connect");

    ws.send(text(r#"{"event":"key_press","data":{"key":""}}"#)).await.unwrap();
    ws.send(text(r#"{"event":"keyboard_text","data":{}}"#)).await.unwrap();
    ws.send(text(r#"{"event":"mouse_scroll","data":{"dy":-1}}"#)).await.unwrap();

    let actions = wait_for_actions(&recorder, 1).await;
    assert_eq!(actions, vec![EmulatedAction::Scroll(-1)]);

    ws.close(None).await.ok();
    host.shutdown().await;
}

/// Dispatch settings from the config are applied to every session.
#[tokio::test]
async fn test_dispatch_settings_apply() {
    let recorder = RecordingEmulator::new();
    let config = HostConfig {
        dispatch: DispatchSettings {
            pointer_scale: 2.0,
            invert_scroll: true,
            ..DispatchSettings::default()
        },
        ..HostConfig::default()
    };
    let host = TestHost::start(&recorder, config).await;
    let (mut ws, _) = connect_async(host.url()).await.expect("connect");

    ws.send(text(r#"["mouse_move",{"dx":1.5,"dy":-3}]"#)).await.unwrap();
    ws.send(text(r#"["mouse_scroll",{"dy":2}]"#)).await.unwrap();

    let actions = wait_for_actions(&recorder, 2).await;
    assert_eq!(
        actions,
        vec![
            EmulatedAction::MoveRelative { dx: 3, dy: -6 },
            EmulatedAction::Scroll(-2),
        ]
    );

    ws.close(None).await.ok();
    host.shutdown().await;
}

/// With `close_on_error`, an emulator failure ends the session with a Close
/// frame carrying `CloseCode::Error`.
#[tokio::test]
async fn test_close_on_error_sends_close_frame() {
    let recorder = RecordingEmulator::failing();
    let config = HostConfig {
        close_on_error: true,
        ..HostConfig::default()
    };
    let host = TestHost::start(&recorder, config).await;
    let (mut ws, _) = connect_async(host.url()).await.expect("connect");

    ws.send(text(r#"{"event":"mouse_click","data":{"button":"left"}}"#))
        .await
        .unwrap();

    let reply = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("host should respond before the timeout");
    match reply {
        Some(Ok(Message::Close(Some(frame)))) => assert_eq!(frame.code, CloseCode::Error),
        other => panic!("expected a Close frame, got {other:?}"),
    }

    host.shutdown().await;
}

/// Without `close_on_error`, the session survives an emulator failure.
#[tokio::test]
async fn test_emulator_failure_keeps_session_open_by_default() {
    let recorder = RecordingEmulator::failing();
    let host = TestHost::start(&recorder, HostConfig::default()).await;
    let (mut ws, _) = connect_async(host.url()).await.expect("connect");

    ws.send(text(r#"{"event":"mouse_click"}"#)).await.unwrap();
    ws.send(Message::Ping(vec![7])).await.unwrap();

    // The host answers the ping, so the session is still alive.
    let reply = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("host should answer the ping");
    assert!(matches!(reply, Some(Ok(Message::Pong(_)))));

    ws.close(None).await.ok();
    host.shutdown().await;
}

/// When the input thread dies, the session ends even though `close_on_error`
/// is off.
#[tokio::test]
async fn test_crashed_input_thread_ends_session() {
    let host = TestHost::start_with(
        || Ok(Box::new(CrashingEmulator) as Box<dyn PlatformInputEmulator>),
        HostConfig::default(),
    )
    .await;
    let (mut ws, _) = connect_async(host.url()).await.expect("connect");

    ws.send(text(r#"{"event":"mouse_click"}"#)).await.unwrap();

    // The host drops the connection without a Close frame; depending on
    // timing the client sees end-of-stream or a reset.
    let reply = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("session should end before the timeout");
    assert!(
        matches!(reply, None | Some(Err(_)) | Some(Ok(Message::Close(_)))),
        "expected the session to end, got {reply:?}"
    );

    host.shutdown().await;
}

/// Text longer than `max_text_chars` is skipped, and the session carries on.
#[tokio::test]
async fn test_text_over_the_cap_is_not_typed() {
    let recorder = RecordingEmulator::new();
    let config = HostConfig {
        dispatch: DispatchSettings {
            max_text_chars: 8,
            ..DispatchSettings::default()
        },
        ..HostConfig::default()
    };
    let host = TestHost::start(&recorder, config).await;
    let (mut ws, _) = connect_async(host.url()).await.expect("connect");

    ws.send(text(r#"["keyboard_text",{"text":"far too long for the cap"}]"#)).await.unwrap();
    ws.send(text(r#"["keyboard_text",{"text":"short"}]"#)).await.unwrap();

    let actions = wait_for_actions(&recorder, 1).await;
    assert_eq!(actions, vec![EmulatedAction::TypeText("short".to_string())]);

    ws.close(None).await.ok();
    host.shutdown().await;
}

/// A message larger than `max_message_bytes` ends the session and is never
/// dispatched.
#[tokio::test]
async fn test_oversized_message_ends_session() {
    let recorder = RecordingEmulator::new();
    let config = HostConfig {
        max_message_bytes: 64,
        ..HostConfig::default()
    };
    let host = TestHost::start(&recorder, config).await;
    let (mut ws, _) = connect_async(host.url()).await.expect("connect");

    let long_text = "x".repeat(1024);
    let frame = format!(r#"{{"event":"keyboard_text","data":{{"text":"{long_text}"}}}}"#);
    let _ = ws.send(text(&frame)).await;

    let reply = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("host should drop the session before the timeout");
    assert!(!matches!(reply, Some(Ok(Message::Text(_)))));
    assert!(recorder.actions().is_empty());

    host.shutdown().await;
}

/// Several controllers can be connected at once.
#[tokio::test]
async fn test_two_sessions_share_one_worker() {
    let recorder = RecordingEmulator::new();
    let host = TestHost::start(&recorder, HostConfig::default()).await;
    let (mut first, _) = connect_async(host.url()).await.expect("connect first");
    let (mut second, _) = connect_async(host.url()).await.expect("connect second");

    first.send(text(r#"["mouse_scroll",{"dy":1}]"#)).await.unwrap();
    wait_for_actions(&recorder, 1).await;
    second.send(text(r#"["mouse_scroll",{"dy":-1}]"#)).await.unwrap();

    let actions = wait_for_actions(&recorder, 2).await;
    assert_eq!(
        actions,
        vec![EmulatedAction::Scroll(1), EmulatedAction::Scroll(-1)]
    );

    first.close(None).await.ok();
    second.close(None).await.ok();
    host.shutdown().await;
}
