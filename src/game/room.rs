use super::constants::{MAX_PARTICIPANTS, TICK_RATE_HZ};
use super::input::parse_intent;
use super::types::{ControlIntent, SessionMode};
use super::world::{World, WorldSettings};
use crate::config::ServerConfig;
use crate::protocol;
use crate::shared::names::sanitize_player_name;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::Mutex;
use uuid::Uuid;

mod lobby;
mod session;

pub use lobby::{AdmissionError, Departure, Lobby, LobbyPhase, HOST_SEAT};
pub use session::{LatestFrame, SessionInbound, SessionIo};

const DEFAULT_NAME: &str = "Player";

#[derive(Debug)]
pub struct Room {
  name: String,
  broadcast_every: u64,
  state: Mutex<RoomState>,
  running: AtomicBool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugKillTarget {
  Any,
  Agent,
  Player,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoomStats {
  pub session: String,
  pub phase: &'static str,
  pub participants: u8,
  pub connections: usize,
  pub tick: Option<u64>,
}

#[derive(Debug)]
struct SessionEntry {
  control: UnboundedSender<Vec<u8>>,
  inbound: Arc<SessionInbound>,
  outbound_state: Arc<LatestFrame>,
  seat: Option<u8>,
}

#[derive(Debug)]
struct RoomState {
  sessions: HashMap<String, SessionEntry>,
  lobby: Lobby,
  mode: SessionMode,
  names: [String; MAX_PARTICIPANTS],
  multiplayer_agents: bool,
  world: Option<World>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum JsonClientMessage {
  #[serde(rename = "host")]
  Host { name: Option<String>, solo: Option<bool> },
  #[serde(rename = "join")]
  Join { name: Option<String> },
  #[serde(rename = "start")]
  Start,
  #[serde(rename = "input")]
  Input {
    seat: u8,
    heading: Option<f64>,
    boost: Option<bool>,
    respawn: Option<bool>,
  },
}

impl Room {
  pub fn new(name: impl Into<String>, config: &ServerConfig) -> Self {
    Self {
      name: name.into(),
      broadcast_every: config.broadcast_every(),
      state: Mutex::new(RoomState::new(config.multiplayer_agents)),
      running: AtomicBool::new(false),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub async fn add_session(&self) -> SessionIo {
    let mut state = self.state.lock().await;
    state.register_session()
  }

  pub async fn remove_session(&self, session_id: &str) {
    let mut state = self.state.lock().await;
    state.disconnect_session(&self.name, session_id);
  }

  pub async fn handle_text_message(self: &Arc<Self>, session_id: &str, inbound: &SessionInbound, text: &str) {
    let Ok(message) = serde_json::from_str::<JsonClientMessage>(text) else { return };
    let message = match message {
      JsonClientMessage::Host { name, solo } => protocol::ClientMessage::Host {
        name,
        solo: solo.unwrap_or(false),
      },
      JsonClientMessage::Join { name } => protocol::ClientMessage::Join { name },
      JsonClientMessage::Start => protocol::ClientMessage::Start,
      JsonClientMessage::Input {
        seat,
        heading,
        boost,
        respawn,
      } => protocol::ClientMessage::Input {
        seat,
        intent: parse_intent(heading, boost.unwrap_or(false), respawn.unwrap_or(false)),
      },
    };
    self.handle_client_message(session_id, inbound, message).await;
  }

  pub async fn handle_binary_message(self: &Arc<Self>, session_id: &str, inbound: &SessionInbound, data: &[u8]) {
    let Some(message) = protocol::decode_client_message(data) else { return };
    self.handle_client_message(session_id, inbound, message).await;
  }

  async fn handle_client_message(
    self: &Arc<Self>,
    session_id: &str,
    inbound: &SessionInbound,
    message: protocol::ClientMessage,
  ) {
    match message {
      protocol::ClientMessage::Input { seat, intent } => {
        if !inbound.submit(seat, intent) {
          tracing::debug!(session = %self.name, session_id, seat, "input for foreign seat dropped");
        }
      }
      protocol::ClientMessage::Host { name, solo } => {
        let mut state = self.state.lock().await;
        let started = state.handle_host(&self.name, session_id, name, solo);
        drop(state);
        if started {
          self.ensure_loop();
        }
      }
      protocol::ClientMessage::Join { name } => {
        let mut state = self.state.lock().await;
        state.handle_join(&self.name, session_id, name);
      }
      protocol::ClientMessage::Start => {
        let mut state = self.state.lock().await;
        let started = state.handle_start(&self.name, session_id);
        drop(state);
        if started {
          self.ensure_loop();
        }
      }
    }
  }

  pub async fn stats(&self) -> RoomStats {
    let state = self.state.lock().await;
    let phase = match state.lobby.phase() {
      LobbyPhase::Idle => "idle",
      LobbyPhase::Open { .. } => "open",
      LobbyPhase::Full => "full",
      LobbyPhase::InProgress { .. } => "in_progress",
    };
    RoomStats {
      session: self.name.clone(),
      phase,
      participants: state.lobby.participants(),
      connections: state.sessions.len(),
      tick: state.world.as_ref().map(|world| world.tick),
    }
  }

  pub async fn debug_kill(&self, target: DebugKillTarget) -> Option<String> {
    let mut state = self.state.lock().await;
    state.debug_kill(target)
  }

  fn ensure_loop(self: &Arc<Self>) {
    if self
      .running
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .is_err()
    {
      return;
    }

    let room = Arc::clone(self);
    tokio::spawn(async move {
      let period = Duration::from_micros(1_000_000 / TICK_RATE_HZ);
      let mut interval = tokio::time::interval(period);
      loop {
        interval.tick().await;
        let mut state = room.state.lock().await;
        if !state.step(room.broadcast_every) {
          room.running.store(false, Ordering::SeqCst);
          tracing::debug!(session = %room.name, "tick loop stopped");
          break;
        }
      }
    });
  }
}

impl RoomState {
  fn new(multiplayer_agents: bool) -> Self {
    Self {
      sessions: HashMap::new(),
      lobby: Lobby::new(),
      mode: SessionMode::Multi,
      names: Default::default(),
      multiplayer_agents,
      world: None,
    }
  }

  fn register_session(&mut self) -> SessionIo {
    let session_id = Uuid::new_v4().to_string();
    let (control, control_rx) = mpsc::unbounded_channel();
    let inbound = Arc::new(SessionInbound::new());
    let outbound_state = Arc::new(LatestFrame::new());
    self.sessions.insert(
      session_id.clone(),
      SessionEntry {
        control,
        inbound: Arc::clone(&inbound),
        outbound_state: Arc::clone(&outbound_state),
        seat: None,
      },
    );
    SessionIo {
      session_id,
      inbound,
      outbound_state,
      control_rx,
    }
  }

  fn session_seat(&self, session_id: &str) -> Option<u8> {
    self.sessions.get(session_id).and_then(|entry| entry.seat)
  }

  fn send_to(&self, session_id: &str, payload: Vec<u8>) {
    if let Some(entry) = self.sessions.get(session_id) {
      let _ = entry.control.send(payload);
    }
  }

  fn send_to_seated(&self, payload: &[u8]) {
    for entry in self.sessions.values().filter(|entry| entry.seat.is_some()) {
      let _ = entry.control.send(payload.to_vec());
    }
  }

  /// Answers with FULL and drops the connection's channel, which closes the
  /// socket once the rejection has been flushed.
  fn reject(&mut self, session: &str, session_id: &str, error: AdmissionError) {
    tracing::info!(session, session_id, %error, "admission rejected");
    self.send_to(session_id, protocol::encode_full());
    self.sessions.remove(session_id);
  }

  fn seat_session(&mut self, session_id: &str, seat: u8, name: Option<String>) {
    let name = sanitize_player_name(name.as_deref().unwrap_or(DEFAULT_NAME), DEFAULT_NAME);
    self.names[seat as usize] = name;
    if let Some(entry) = self.sessions.get_mut(session_id) {
      entry.seat = Some(seat);
      entry.inbound.assign_seat(Some(seat));
    }
  }

  /// Returns true when the session went straight into play.
  fn handle_host(&mut self, session: &str, session_id: &str, name: Option<String>, solo: bool) -> bool {
    if self.session_seat(session_id).is_some() {
      return false;
    }
    let seat = match self.lobby.open(solo) {
      Ok(seat) => seat,
      Err(error) => {
        self.reject(session, session_id, error);
        return false;
      }
    };
    self.mode = if solo { SessionMode::Solo } else { SessionMode::Multi };
    self.seat_session(session_id, seat, name);
    tracing::info!(session, mode = ?self.mode, "session hosted");
    self.send_to(session_id, protocol::encode_welcome(seat, self.lobby.participants()));

    if solo {
      self.begin_world(session);
      return true;
    }
    false
  }

  fn handle_join(&mut self, session: &str, session_id: &str, name: Option<String>) {
    if self.session_seat(session_id).is_some() {
      return;
    }
    let seat = match self.lobby.join() {
      Ok(seat) => seat,
      Err(error) => {
        self.reject(session, session_id, error);
        return;
      }
    };
    self.seat_session(session_id, seat, name);
    let participants = self.lobby.participants();
    tracing::info!(session, seat, participants, "participant joined");
    self.send_to(session_id, protocol::encode_welcome(seat, participants));
    self.send_to_seated(&protocol::encode_lobby_update(participants));
  }

  fn handle_start(&mut self, session: &str, session_id: &str) -> bool {
    let Some(seat) = self.session_seat(session_id) else { return false };
    if let Err(error) = self.lobby.start(seat) {
      tracing::debug!(session, seat, %error, "start ignored");
      return false;
    }
    self.begin_world(session);
    true
  }

  fn begin_world(&mut self, session: &str) {
    let seats: Vec<(u8, String)> = self
      .lobby
      .seated()
      .map(|seat| (seat, self.names[seat as usize].clone()))
      .collect();
    let settings = WorldSettings::new(self.mode, self.multiplayer_agents);
    self.world = Some(World::new(settings, &seats, StdRng::from_entropy()));
    let participants = self.lobby.participants();
    tracing::info!(session, participants, mode = ?self.mode, "session started");
    self.send_to_seated(&protocol::encode_game_start(participants));
  }

  fn disconnect_session(&mut self, session: &str, session_id: &str) {
    let Some(entry) = self.sessions.remove(session_id) else { return };
    let Some(seat) = entry.seat else { return };
    match self.lobby.leave(seat) {
      Some(Departure::HostLeft) => self.teardown(session),
      Some(Departure::GuestLeft { participants }) => {
        tracing::info!(session, seat, participants, "participant left");
        self.send_to_seated(&protocol::encode_lobby_update(participants));
      }
      None => {}
    }
  }

  /// Host is gone: the world stops and every guest connection is closed.
  fn teardown(&mut self, session: &str) {
    self.world = None;
    self.names = Default::default();
    self.mode = SessionMode::Multi;
    self.sessions.retain(|_, entry| {
      if entry.seat.is_none() {
        return true;
      }
      entry.inbound.assign_seat(None);
      false
    });
    tracing::info!(session, "session closed");
  }

  fn gather_intents(&self) -> [ControlIntent; MAX_PARTICIPANTS] {
    let mut intents = [ControlIntent::default(); MAX_PARTICIPANTS];
    for entry in self.sessions.values() {
      let Some(seat) = entry.seat else { continue };
      if let Some(slot) = intents.get_mut(seat as usize) {
        *slot = entry.inbound.take_intent();
      }
    }
    intents
  }

  /// One scheduler step. Returns false once there is no world to advance.
  fn step(&mut self, broadcast_every: u64) -> bool {
    if self.world.is_none() {
      return false;
    }
    let intents = self.gather_intents();
    let Some(world) = self.world.as_mut() else { return false };
    world.tick(&intents);
    if world.tick % broadcast_every.max(1) == 0 {
      self.broadcast_state();
    }
    true
  }

  fn broadcast_state(&self) {
    let Some(world) = self.world.as_ref() else { return };
    let payload = protocol::encode_state(&world.snapshot());
    for entry in self.sessions.values().filter(|entry| entry.seat.is_some()) {
      entry.outbound_state.store(payload.clone());
    }
  }

  fn debug_kill(&mut self, target: DebugKillTarget) -> Option<String> {
    let world = self.world.as_mut()?;
    if matches!(target, DebugKillTarget::Player | DebugKillTarget::Any) {
      if let Some(index) = world.players.iter().position(|player| player.body.alive) {
        let seat = world.players[index].seat;
        world.kill_player(index, None);
        return Some(format!("seat-{seat}"));
      }
    }
    if matches!(target, DebugKillTarget::Agent | DebugKillTarget::Any) {
      if let Some(index) = world.agents.iter().position(|agent| agent.body.alive) {
        let id = world.agents[index].id;
        world.kill_agent(index, None);
        return Some(format!("agent-{id}"));
      }
    }
    None
  }
}
