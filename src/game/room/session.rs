use crate::game::types::ControlIntent;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::MutexGuard;
use tokio::sync::{mpsc, Notify};

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Single-slot outbound buffer for STATE frames. A newer frame replaces one
/// the socket has not picked up yet.
#[derive(Debug)]
pub struct LatestFrame {
    frame: StdMutex<Option<Vec<u8>>>,
    notify: Notify,
}

impl LatestFrame {
    pub(crate) fn new() -> Self {
        Self {
            frame: StdMutex::new(None),
            notify: Notify::new(),
        }
    }

    pub(crate) fn store(&self, payload: Vec<u8>) {
        *lock(&self.frame) = Some(payload);
        self.notify.notify_one();
    }

    pub fn take_latest(&self) -> Option<Vec<u8>> {
        lock(&self.frame).take()
    }

    pub async fn wait_for_update(&self) {
        self.notify.notified().await;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SessionInboundState {
    pub(crate) seat: Option<u8>,
    pub(crate) intent: ControlIntent,
}

/// Latest control intent of one connection. Inputs overwrite each other; only
/// a respawn request is held until the tick has seen it.
#[derive(Debug)]
pub struct SessionInbound {
    inner: StdMutex<SessionInboundState>,
}

impl SessionInbound {
    pub(crate) fn new() -> Self {
        Self {
            inner: StdMutex::new(SessionInboundState::default()),
        }
    }

    pub(crate) fn assign_seat(&self, seat: Option<u8>) {
        let mut state = lock(&self.inner);
        state.seat = seat;
        state.intent = ControlIntent::default();
    }

    pub fn seat(&self) -> Option<u8> {
        lock(&self.inner).seat
    }

    /// Returns false and drops the intent when `seat` is not this
    /// connection's seat.
    pub(crate) fn submit(&self, seat: u8, intent: ControlIntent) -> bool {
        let mut state = lock(&self.inner);
        if state.seat != Some(seat) {
            return false;
        }
        let respawn = intent.respawn || state.intent.respawn;
        state.intent = ControlIntent { respawn, ..intent };
        true
    }

    pub(crate) fn take_intent(&self) -> ControlIntent {
        let mut state = lock(&self.inner);
        let intent = state.intent;
        state.intent.respawn = false;
        intent
    }
}

pub struct SessionIo {
    pub session_id: String,
    pub inbound: Arc<SessionInbound>,
    pub outbound_state: Arc<LatestFrame>,
    /// Lobby messages in order. Closes when the room drops this connection.
    pub control_rx: mpsc::UnboundedReceiver<Vec<u8>>,
}
