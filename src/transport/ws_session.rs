use crate::game::room::Room;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;

/// How long a closing connection gets to flush what the room queued for it,
/// such as a FULL rejection.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

pub async fn handle_socket(socket: WebSocket, room: Arc<Room>) {
    let (mut sender, mut receiver) = socket.split();
    let session = room.add_session().await;
    let session_id = session.session_id;
    let inbound = session.inbound;
    let outbound_state = session.outbound_state;
    let mut control_rx = session.control_rx;
    tracing::debug!(session = %room.name(), session_id = %session_id, "connection opened");

    let mut send_task = tokio::spawn(async move {
        use std::collections::VecDeque;

        let mut pending_control: VecDeque<Vec<u8>> = VecDeque::new();
        let mut closing = false;

        loop {
            tokio::select! {
                control = control_rx.recv() => match control {
                    Some(payload) => pending_control.push_back(payload),
                    None => closing = true,
                },
                _ = outbound_state.wait_for_update() => {}
            }

            while let Ok(payload) = control_rx.try_recv() {
                pending_control.push_back(payload);
            }

            while let Some(payload) = pending_control.pop_front() {
                if sender.send(Message::Binary(payload)).await.is_err() {
                    return;
                }
            }

            if closing {
                let _ = sender.send(Message::Close(None)).await;
                return;
            }

            if let Some(payload) = outbound_state.take_latest() {
                if sender.send(Message::Binary(payload)).await.is_err() {
                    return;
                }
            }
        }
    });

    let mut send_finished = false;
    loop {
        tokio::select! {
            _ = &mut send_task => {
                send_finished = true;
                break;
            }
            incoming = receiver.next() => {
                let Some(Ok(message)) = incoming else { break };
                match message {
                    Message::Binary(data) => {
                        room.handle_binary_message(&session_id, &inbound, &data).await;
                    }
                    Message::Text(text) => {
                        room.handle_text_message(&session_id, &inbound, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    }

    room.remove_session(&session_id).await;
    if !send_finished && tokio::time::timeout(CLOSE_GRACE, &mut send_task).await.is_err() {
        send_task.abort();
    }
    tracing::debug!(session = %room.name(), session_id = %session_id, "connection closed");
}
