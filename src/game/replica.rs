use super::types::{ControlIntent, WorldSnapshot};
use crate::protocol::{self, ClientMessage, ServerMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorPhase {
    /// Not part of any session; the state a participant falls back to.
    Detached,
    Lobby { seat: u8, participants: u8 },
    Playing { seat: u8, participants: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorEvent {
    Admitted { seat: u8, participants: u8 },
    LobbyChanged { participants: u8 },
    Started { participants: u8 },
    Rejected,
    StateReplaced { tick: u64 },
}

/// Non-authority view of a session. It never simulates: every STATE frame
/// replaces the mirrored world wholesale and the only thing it ever sends is
/// the local control intent.
#[derive(Debug)]
pub struct ClientMirror {
    phase: MirrorPhase,
    snapshot: Option<WorldSnapshot>,
}

impl Default for ClientMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientMirror {
    pub fn new() -> Self {
        Self {
            phase: MirrorPhase::Detached,
            snapshot: None,
        }
    }

    pub fn phase(&self) -> MirrorPhase {
        self.phase
    }

    pub fn seat(&self) -> Option<u8> {
        match self.phase {
            MirrorPhase::Detached => None,
            MirrorPhase::Lobby { seat, .. } | MirrorPhase::Playing { seat, .. } => Some(seat),
        }
    }

    pub fn snapshot(&self) -> Option<&WorldSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn host_request(name: Option<String>, solo: bool) -> Vec<u8> {
        protocol::encode_client_message(&ClientMessage::Host { name, solo })
    }

    pub fn join_request(name: Option<String>) -> Vec<u8> {
        protocol::encode_client_message(&ClientMessage::Join { name })
    }

    /// Only the host may start, and only from the lobby.
    pub fn start_request(&self) -> Option<Vec<u8>> {
        match self.phase {
            MirrorPhase::Lobby { seat: 0, .. } => {
                Some(protocol::encode_client_message(&ClientMessage::Start))
            }
            _ => None,
        }
    }

    pub fn input_payload(&self, intent: ControlIntent) -> Option<Vec<u8>> {
        let MirrorPhase::Playing { seat, .. } = self.phase else { return None };
        Some(protocol::encode_client_message(&ClientMessage::Input { seat, intent }))
    }

    /// Applies one frame from the host. Frames that do not decode are ignored.
    pub fn apply(&mut self, data: &[u8]) -> Option<MirrorEvent> {
        let message = protocol::decode_server_message(data)?;
        let event = match message {
            ServerMessage::Welcome { seat, participants } => {
                self.phase = MirrorPhase::Lobby { seat, participants };
                MirrorEvent::Admitted { seat, participants }
            }
            ServerMessage::LobbyUpdate { participants } => {
                match &mut self.phase {
                    MirrorPhase::Lobby { participants: count, .. }
                    | MirrorPhase::Playing { participants: count, .. } => *count = participants,
                    MirrorPhase::Detached => return None,
                }
                MirrorEvent::LobbyChanged { participants }
            }
            ServerMessage::Start { participants } => {
                let seat = self.seat()?;
                self.phase = MirrorPhase::Playing { seat, participants };
                MirrorEvent::Started { participants }
            }
            ServerMessage::Full => {
                self.detach();
                MirrorEvent::Rejected
            }
            ServerMessage::State(snapshot) => {
                if !matches!(self.phase, MirrorPhase::Playing { .. }) {
                    return None;
                }
                let tick = snapshot.tick;
                self.snapshot = Some(snapshot);
                MirrorEvent::StateReplaced { tick }
            }
        };
        Some(event)
    }

    pub fn on_transport_closed(&mut self) {
        if self.phase != MirrorPhase::Detached {
            tracing::info!(phase = ?self.phase, "session connection lost");
        }
        self.detach();
    }

    fn detach(&mut self) {
        self.phase = MirrorPhase::Detached;
        self.snapshot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Point;

    fn state_frame(tick: u64) -> Vec<u8> {
        protocol::encode_state(&WorldSnapshot {
            tick,
            pellets: vec![Point { x: 150.0, y: 0.0 }],
            ..Default::default()
        })
    }

    #[test]
    fn follows_the_lobby_into_play() {
        let mut mirror = ClientMirror::new();
        assert_eq!(
            mirror.apply(&protocol::encode_welcome(1, 2)),
            Some(MirrorEvent::Admitted {
                seat: 1,
                participants: 2,
            })
        );
        assert_eq!(mirror.start_request(), None);
        assert_eq!(mirror.input_payload(ControlIntent::default()), None);

        mirror.apply(&protocol::encode_lobby_update(3));
        assert_eq!(
            mirror.phase(),
            MirrorPhase::Lobby {
                seat: 1,
                participants: 3,
            }
        );

        assert_eq!(
            mirror.apply(&protocol::encode_game_start(3)),
            Some(MirrorEvent::Started { participants: 3 })
        );
        assert_eq!(
            mirror.apply(&state_frame(8)),
            Some(MirrorEvent::StateReplaced { tick: 8 })
        );
        assert_eq!(mirror.snapshot().map(|snapshot| snapshot.tick), Some(8));

        mirror.apply(&state_frame(10));
        assert_eq!(mirror.snapshot().map(|snapshot| snapshot.tick), Some(10));
    }

    #[test]
    fn input_carries_the_assigned_seat() {
        let mut mirror = ClientMirror::new();
        mirror.apply(&protocol::encode_welcome(2, 3));
        mirror.apply(&protocol::encode_game_start(3));

        let intent = ControlIntent {
            heading: Some(0.5),
            boost: true,
            respawn: false,
        };
        let payload = mirror.input_payload(intent).expect("payload");
        assert_eq!(
            protocol::decode_client_message(&payload),
            Some(ClientMessage::Input { seat: 2, intent })
        );
    }

    #[test]
    fn host_can_request_start_from_the_lobby() {
        let mut mirror = ClientMirror::new();
        assert_eq!(
            protocol::decode_client_message(&ClientMirror::host_request(None, false)),
            Some(ClientMessage::Host {
                name: None,
                solo: false,
            })
        );
        mirror.apply(&protocol::encode_welcome(0, 1));
        let payload = mirror.start_request().expect("start");
        assert_eq!(
            protocol::decode_client_message(&payload),
            Some(ClientMessage::Start)
        );
    }

    #[test]
    fn rejection_and_disconnect_fall_back_to_detached() {
        let mut mirror = ClientMirror::new();
        assert_eq!(
            mirror.apply(&protocol::encode_full()),
            Some(MirrorEvent::Rejected)
        );
        assert_eq!(mirror.phase(), MirrorPhase::Detached);

        mirror.apply(&protocol::encode_welcome(1, 2));
        mirror.apply(&protocol::encode_game_start(2));
        mirror.apply(&state_frame(4));
        mirror.on_transport_closed();
        assert_eq!(mirror.phase(), MirrorPhase::Detached);
        assert!(mirror.snapshot().is_none());
    }

    #[test]
    fn stray_frames_are_ignored() {
        let mut mirror = ClientMirror::new();
        assert_eq!(mirror.apply(&state_frame(3)), None);
        assert_eq!(mirror.apply(&protocol::encode_game_start(2)), None);
        assert_eq!(mirror.apply(&[0xff, 0x00]), None);
        assert!(mirror.snapshot().is_none());
    }
}
