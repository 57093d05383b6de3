//! Reconnect behaviour of the order feed, driven by a scripted connector on a
//! paused clock.

use async_trait::async_trait;
use orderdesk_client::{
    ClientError, ClientResult, ConnectionState, FeedConnector, FeedEvent, FeedHandle, FeedSession,
    ReconnectPolicy,
};
use shared::UpdateAction;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, timeout};

enum Script {
    /// Connect fails
    Fail,
    /// Connect succeeds, yields the frames, then the peer closes
    Frames(Vec<&'static str>),
    /// Connect succeeds and the session stays open
    Hold,
}

struct ScriptedConnector {
    script: Mutex<VecDeque<Script>>,
    attempts: mpsc::UnboundedSender<Instant>,
}

impl ScriptedConnector {
    fn new(script: Vec<Script>) -> (Self, mpsc::UnboundedReceiver<Instant>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connector = Self {
            script: Mutex::new(script.into()),
            attempts: tx,
        };
        (connector, rx)
    }
}

struct ScriptedSession {
    frames: VecDeque<String>,
    hold: bool,
}

#[async_trait]
impl FeedSession for ScriptedSession {
    async fn next_text(&mut self) -> Option<ClientResult<String>> {
        if let Some(frame) = self.frames.pop_front() {
            return Some(Ok(frame));
        }
        if self.hold {
            std::future::pending::<()>().await;
        }
        None
    }

    async fn close(&mut self) {}
}

#[async_trait]
impl FeedConnector for ScriptedConnector {
    async fn connect(&self) -> ClientResult<Box<dyn FeedSession>> {
        let _ = self.attempts.send(Instant::now());
        let next = self.script.lock().unwrap().pop_front().unwrap_or(Script::Fail);
        match next {
            Script::Fail => Err(ClientError::Config("connection refused".into())),
            Script::Frames(frames) => Ok(Box::new(ScriptedSession {
                frames: frames.into_iter().map(String::from).collect(),
                hold: false,
            })),
            Script::Hold => Ok(Box::new(ScriptedSession {
                frames: VecDeque::new(),
                hold: true,
            })),
        }
    }
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<FeedEvent>) -> FeedEvent {
    timeout(Duration::from_secs(600), rx.recv())
        .await
        .expect("timed out waiting for feed event")
        .expect("feed event channel closed")
}

fn no_jitter(initial: Duration) -> ReconnectPolicy {
    ReconnectPolicy::default()
        .with_initial_delay(initial)
        .with_jitter(0.0)
        .with_max_consecutive_failures(0)
}

#[tokio::test(start_paused = true)]
async fn close_schedules_exactly_one_reconnect_after_three_seconds() {
    let (connector, mut attempts) =
        ScriptedConnector::new(vec![Script::Frames(vec![]), Script::Hold]);
    let (handle, mut events) =
        FeedHandle::spawn(connector, ReconnectPolicy::fixed(Duration::from_secs(3)));

    assert_eq!(next_event(&mut events).await, FeedEvent::Connected);
    assert_eq!(
        next_event(&mut events).await,
        FeedEvent::Disconnected {
            retry_in: Duration::from_secs(3),
            failures: 0
        }
    );
    assert_eq!(next_event(&mut events).await, FeedEvent::Connected);
    assert_eq!(handle.state(), ConnectionState::Connected);

    let first = attempts.recv().await.unwrap();
    let second = attempts.recv().await.unwrap();
    assert_eq!(second - first, Duration::from_secs(3));

    // the held session never closes, so nothing else is attempted
    assert!(timeout(Duration::from_secs(120), attempts.recv()).await.is_err());

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_backoff_cancels_pending_reconnect() {
    let (connector, mut attempts) = ScriptedConnector::new(vec![Script::Fail]);
    let (handle, mut events) =
        FeedHandle::spawn(connector, ReconnectPolicy::fixed(Duration::from_secs(3)));

    assert!(matches!(
        next_event(&mut events).await,
        FeedEvent::Disconnected { failures: 1, .. }
    ));
    assert!(attempts.recv().await.is_some());

    handle.shutdown().await;

    // connector is dropped with the worker; no second attempt was made
    assert!(attempts.recv().await.is_none());
    assert!(events.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn drop_handle_stops_worker() {
    let (connector, mut attempts) = ScriptedConnector::new(vec![Script::Hold]);
    let (handle, mut events) = FeedHandle::spawn(connector, ReconnectPolicy::default());

    assert_eq!(next_event(&mut events).await, FeedEvent::Connected);
    drop(handle);

    assert!(timeout(Duration::from_secs(10), events.recv()).await.unwrap().is_none());
    assert!(attempts.recv().await.is_some());
    assert!(attempts.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn consecutive_failures_back_off_then_halt() {
    let (connector, _attempts) = ScriptedConnector::new(vec![]);
    let policy = no_jitter(Duration::from_secs(1)).with_max_consecutive_failures(3);
    let (handle, mut events) = FeedHandle::spawn(connector, policy);

    assert_eq!(
        next_event(&mut events).await,
        FeedEvent::Disconnected {
            retry_in: Duration::from_secs(1),
            failures: 1
        }
    );
    assert_eq!(
        next_event(&mut events).await,
        FeedEvent::Disconnected {
            retry_in: Duration::from_secs(2),
            failures: 2
        }
    );
    assert_eq!(
        next_event(&mut events).await,
        FeedEvent::Halted { failures: 3 }
    );
    assert!(events.recv().await.is_none());
    assert_eq!(handle.state(), ConnectionState::Halted);
}

#[tokio::test(start_paused = true)]
async fn successful_connect_resets_backoff() {
    let (connector, _attempts) = ScriptedConnector::new(vec![
        Script::Fail,
        Script::Fail,
        Script::Frames(vec![]),
        Script::Fail,
        Script::Hold,
    ]);
    let (handle, mut events) = FeedHandle::spawn(connector, no_jitter(Duration::from_secs(1)));

    let mut delays = Vec::new();
    loop {
        match next_event(&mut events).await {
            FeedEvent::Disconnected { retry_in, failures } => delays.push((retry_in, failures)),
            FeedEvent::Connected if delays.len() == 4 => break,
            _ => {}
        }
    }

    assert_eq!(
        delays,
        vec![
            (Duration::from_secs(1), 1),
            (Duration::from_secs(2), 2),
            (Duration::from_secs(1), 0),
            (Duration::from_secs(1), 1),
        ]
    );
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn only_order_update_frames_are_routed() {
    let (connector, _attempts) = ScriptedConnector::new(vec![
        Script::Frames(vec![
            r#"{"type":"order_update","data":{"action":"new_order","order_id":7,"order_number":"1007","total":45000,"status":"pending"}}"#,
            "{not json",
            r#"{"type":"heartbeat","data":{}}"#,
            r#"{"type":"order_update","data":{"action":"status_changed","order_id":7,"order_number":"1007","old_status":"pending","new_status":"confirmed"}}"#,
        ]),
        Script::Hold,
    ]);
    let (handle, mut events) =
        FeedHandle::spawn(connector, ReconnectPolicy::fixed(Duration::from_secs(3)));

    assert_eq!(next_event(&mut events).await, FeedEvent::Connected);

    let FeedEvent::OrderUpdate(first) = next_event(&mut events).await else {
        panic!("expected order update");
    };
    assert!(first.is_new_order());
    assert_eq!(first.order_number.as_deref(), Some("1007"));

    let FeedEvent::OrderUpdate(second) = next_event(&mut events).await else {
        panic!("expected order update");
    };
    assert_eq!(second.action, UpdateAction::StatusChanged);

    assert!(matches!(
        next_event(&mut events).await,
        FeedEvent::Disconnected { .. }
    ));
    handle.shutdown().await;
}
