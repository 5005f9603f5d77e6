use crate::game::input::parse_intent;
use crate::game::types::{
  AgentSnapshot, ControlIntent, Cosmetic, Explosion, MineSnapshot, MineState, PlayerSnapshot,
  Point, WorldSnapshot,
};

pub const VERSION: u8 = 1;

pub const TYPE_HOST: u8 = 0x01;
pub const TYPE_JOIN: u8 = 0x02;
pub const TYPE_START: u8 = 0x03;
pub const TYPE_INPUT: u8 = 0x04;

pub const TYPE_WELCOME: u8 = 0x10;
pub const TYPE_LOBBY_UPDATE: u8 = 0x11;
pub const TYPE_GAME_START: u8 = 0x12;
pub const TYPE_FULL: u8 = 0x13;
pub const TYPE_STATE: u8 = 0x14;

pub const FLAG_HOST_NAME: u16 = 1 << 0;
pub const FLAG_HOST_SOLO: u16 = 1 << 1;

pub const FLAG_JOIN_NAME: u16 = 1 << 0;

pub const FLAG_INPUT_HEADING: u16 = 1 << 0;
pub const FLAG_INPUT_BOOST: u16 = 1 << 1;
pub const FLAG_INPUT_RESPAWN: u16 = 1 << 2;

pub const BODY_ALIVE: u8 = 1 << 0;
pub const BODY_BOOSTING: u8 = 1 << 1;

pub const MINE_IDLE: u8 = 0;
pub const MINE_TRIGGERED: u8 = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
  Host { name: Option<String>, solo: bool },
  Join { name: Option<String> },
  Start,
  Input { seat: u8, intent: ControlIntent },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
  Welcome { seat: u8, participants: u8 },
  LobbyUpdate { participants: u8 },
  Start { participants: u8 },
  Full,
  State(WorldSnapshot),
}

pub fn decode_client_message(data: &[u8]) -> Option<ClientMessage> {
  let mut reader = Reader::new(data);
  let version = reader.read_u8()?;
  if version != VERSION {
    return None;
  }
  let message_type = reader.read_u8()?;
  let flags = reader.read_u16()?;
  match message_type {
    TYPE_HOST => {
      let name = if flags & FLAG_HOST_NAME != 0 {
        Some(reader.read_string()?)
      } else {
        None
      };
      Some(ClientMessage::Host {
        name,
        solo: flags & FLAG_HOST_SOLO != 0,
      })
    }
    TYPE_JOIN => {
      let name = if flags & FLAG_JOIN_NAME != 0 {
        Some(reader.read_string()?)
      } else {
        None
      };
      Some(ClientMessage::Join { name })
    }
    TYPE_START => Some(ClientMessage::Start),
    TYPE_INPUT => {
      let seat = reader.read_u8()?;
      let heading = if flags & FLAG_INPUT_HEADING != 0 {
        Some(reader.read_f32()? as f64)
      } else {
        None
      };
      let intent = parse_intent(
        heading,
        flags & FLAG_INPUT_BOOST != 0,
        flags & FLAG_INPUT_RESPAWN != 0,
      );
      Some(ClientMessage::Input { seat, intent })
    }
    _ => None,
  }
}

pub fn encode_client_message(message: &ClientMessage) -> Vec<u8> {
  let mut encoder = Encoder::with_capacity(32);
  match message {
    ClientMessage::Host { name, solo } => {
      let mut flags = 0;
      if name.is_some() {
        flags |= FLAG_HOST_NAME;
      }
      if *solo {
        flags |= FLAG_HOST_SOLO;
      }
      encoder.write_header(TYPE_HOST, flags);
      if let Some(name) = name {
        encoder.write_string(name);
      }
    }
    ClientMessage::Join { name } => {
      encoder.write_header(TYPE_JOIN, if name.is_some() { FLAG_JOIN_NAME } else { 0 });
      if let Some(name) = name {
        encoder.write_string(name);
      }
    }
    ClientMessage::Start => encoder.write_header(TYPE_START, 0),
    ClientMessage::Input { seat, intent } => {
      let mut flags = 0;
      if intent.heading.is_some() {
        flags |= FLAG_INPUT_HEADING;
      }
      if intent.boost {
        flags |= FLAG_INPUT_BOOST;
      }
      if intent.respawn {
        flags |= FLAG_INPUT_RESPAWN;
      }
      encoder.write_header(TYPE_INPUT, flags);
      encoder.write_u8(*seat);
      if let Some(heading) = intent.heading {
        encoder.write_f32(heading as f32);
      }
    }
  }
  encoder.into_vec()
}

pub fn encode_welcome(seat: u8, participants: u8) -> Vec<u8> {
  let mut encoder = Encoder::with_capacity(6);
  encoder.write_header(TYPE_WELCOME, 0);
  encoder.write_u8(seat);
  encoder.write_u8(participants);
  encoder.into_vec()
}

pub fn encode_lobby_update(participants: u8) -> Vec<u8> {
  let mut encoder = Encoder::with_capacity(5);
  encoder.write_header(TYPE_LOBBY_UPDATE, 0);
  encoder.write_u8(participants);
  encoder.into_vec()
}

pub fn encode_game_start(participants: u8) -> Vec<u8> {
  let mut encoder = Encoder::with_capacity(5);
  encoder.write_header(TYPE_GAME_START, 0);
  encoder.write_u8(participants);
  encoder.into_vec()
}

pub fn encode_full() -> Vec<u8> {
  let mut encoder = Encoder::with_capacity(4);
  encoder.write_header(TYPE_FULL, 0);
  encoder.into_vec()
}

fn trail_len(trail: &[Point]) -> u16 {
  trail.len().min(u16::MAX as usize) as u16
}

fn state_capacity(snapshot: &WorldSnapshot) -> usize {
  let mut capacity = 4 + 8 + 4 + 1;
  for player in &snapshot.players {
    capacity += 2 + 20 + 4 + 3 + player.cosmetic.name.len() + player.cosmetic.country.len();
    capacity += player.cosmetic.color.len() + 2 + player.trail.len() * 8;
  }
  capacity += 1;
  for agent in &snapshot.agents {
    capacity += 4 + 20 + 1 + agent.color.len() + 2 + agent.trail.len() * 8;
  }
  capacity += 2 + snapshot.pellets.len() * 8;
  capacity += 2 + snapshot.mines.len() * 17;
  capacity += 1 + snapshot.explosions.len() * 16;
  capacity
}

pub fn encode_state(snapshot: &WorldSnapshot) -> Vec<u8> {
  let mut encoder = Encoder::with_capacity(state_capacity(snapshot));
  encoder.write_header(TYPE_STATE, 0);
  encoder.write_u64(snapshot.tick);
  encoder.write_f32(snapshot.shake as f32);

  let players = snapshot.players.len().min(u8::MAX as usize);
  encoder.write_u8(players as u8);
  for player in snapshot.players.iter().take(players) {
    let mut flags = 0;
    if player.alive {
      flags |= BODY_ALIVE;
    }
    if player.boosting {
      flags |= BODY_BOOSTING;
    }
    encoder.write_u8(player.seat);
    encoder.write_u8(flags);
    encoder.write_point(player.position);
    encoder.write_f32(player.heading as f32);
    encoder.write_f32(player.length as f32);
    encoder.write_f32(player.radius as f32);
    encoder.write_u16(player.kills.min(u16::MAX as u32) as u16);
    encoder.write_u16(player.deaths.min(u16::MAX as u32) as u16);
    encoder.write_string(&player.cosmetic.name);
    encoder.write_string(&player.cosmetic.country);
    encoder.write_string(&player.cosmetic.color);
    encoder.write_trail(&player.trail);
  }

  let agents = snapshot.agents.len().min(u8::MAX as usize);
  encoder.write_u8(agents as u8);
  for agent in snapshot.agents.iter().take(agents) {
    encoder.write_u32(agent.id);
    encoder.write_point(agent.position);
    encoder.write_f32(agent.heading as f32);
    encoder.write_f32(agent.length as f32);
    encoder.write_f32(agent.radius as f32);
    encoder.write_string(&agent.color);
    encoder.write_trail(&agent.trail);
  }

  encoder.write_trail(&snapshot.pellets);

  let mines = snapshot.mines.len().min(u16::MAX as usize);
  encoder.write_u16(mines as u16);
  for mine in snapshot.mines.iter().take(mines) {
    encoder.write_point(mine.position);
    match mine.state {
      MineState::Idle => {
        encoder.write_u8(MINE_IDLE);
        encoder.write_u64(0);
      }
      MineState::Triggered { since_tick } => {
        encoder.write_u8(MINE_TRIGGERED);
        encoder.write_u64(since_tick);
      }
    }
  }

  let explosions = snapshot.explosions.len().min(u8::MAX as usize);
  encoder.write_u8(explosions as u8);
  for explosion in snapshot.explosions.iter().take(explosions) {
    encoder.write_point(explosion.position);
    encoder.write_f32(explosion.radius as f32);
    encoder.write_f32(explosion.alpha as f32);
  }

  encoder.into_vec()
}

pub fn decode_server_message(data: &[u8]) -> Option<ServerMessage> {
  let mut reader = Reader::new(data);
  let version = reader.read_u8()?;
  if version != VERSION {
    return None;
  }
  let message_type = reader.read_u8()?;
  let _flags = reader.read_u16()?;
  match message_type {
    TYPE_WELCOME => Some(ServerMessage::Welcome {
      seat: reader.read_u8()?,
      participants: reader.read_u8()?,
    }),
    TYPE_LOBBY_UPDATE => Some(ServerMessage::LobbyUpdate {
      participants: reader.read_u8()?,
    }),
    TYPE_GAME_START => Some(ServerMessage::Start {
      participants: reader.read_u8()?,
    }),
    TYPE_FULL => Some(ServerMessage::Full),
    TYPE_STATE => decode_state(&mut reader).map(ServerMessage::State),
    _ => None,
  }
}

fn decode_state(reader: &mut Reader<'_>) -> Option<WorldSnapshot> {
  let tick = reader.read_u64()?;
  let shake = reader.read_f32()? as f64;

  let player_count = reader.read_u8()? as usize;
  let mut players = Vec::with_capacity(player_count);
  for _ in 0..player_count {
    let seat = reader.read_u8()?;
    let flags = reader.read_u8()?;
    let position = reader.read_point()?;
    let heading = reader.read_f32()? as f64;
    let length = reader.read_f32()? as f64;
    let radius = reader.read_f32()? as f64;
    let kills = reader.read_u16()? as u32;
    let deaths = reader.read_u16()? as u32;
    let cosmetic = Cosmetic {
      name: reader.read_string()?,
      country: reader.read_string()?,
      color: reader.read_string()?,
    };
    let trail = reader.read_trail()?;
    players.push(PlayerSnapshot {
      seat,
      alive: flags & BODY_ALIVE != 0,
      boosting: flags & BODY_BOOSTING != 0,
      position,
      heading,
      length,
      radius,
      kills,
      deaths,
      cosmetic,
      trail,
    });
  }

  let agent_count = reader.read_u8()? as usize;
  let mut agents = Vec::with_capacity(agent_count);
  for _ in 0..agent_count {
    agents.push(AgentSnapshot {
      id: reader.read_u32()?,
      position: reader.read_point()?,
      heading: reader.read_f32()? as f64,
      length: reader.read_f32()? as f64,
      radius: reader.read_f32()? as f64,
      color: reader.read_string()?,
      trail: reader.read_trail()?,
    });
  }

  let pellets = reader.read_trail()?;

  let mine_count = reader.read_u16()? as usize;
  let mut mines = Vec::with_capacity(mine_count.min(reader.remaining() / 17));
  for _ in 0..mine_count {
    let position = reader.read_point()?;
    let state = reader.read_u8()?;
    let since_tick = reader.read_u64()?;
    let state = match state {
      MINE_IDLE => MineState::Idle,
      MINE_TRIGGERED => MineState::Triggered { since_tick },
      _ => return None,
    };
    mines.push(MineSnapshot { position, state });
  }

  let explosion_count = reader.read_u8()? as usize;
  let mut explosions = Vec::with_capacity(explosion_count);
  for _ in 0..explosion_count {
    explosions.push(Explosion {
      position: reader.read_point()?,
      radius: reader.read_f32()? as f64,
      alpha: reader.read_f32()? as f64,
    });
  }

  Some(WorldSnapshot {
    tick,
    shake,
    players,
    agents,
    pellets,
    mines,
    explosions,
  })
}

pub struct Encoder {
  buffer: Vec<u8>,
}

impl Encoder {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      buffer: Vec::with_capacity(capacity),
    }
  }

  pub fn into_vec(self) -> Vec<u8> {
    self.buffer
  }

  pub fn write_header(&mut self, message_type: u8, flags: u16) {
    self.write_u8(VERSION);
    self.write_u8(message_type);
    self.write_u16(flags);
  }

  pub fn write_u8(&mut self, value: u8) {
    self.buffer.push(value);
  }

  pub fn write_u16(&mut self, value: u16) {
    self.buffer.extend_from_slice(&value.to_le_bytes());
  }

  pub fn write_u32(&mut self, value: u32) {
    self.buffer.extend_from_slice(&value.to_le_bytes());
  }

  pub fn write_u64(&mut self, value: u64) {
    self.buffer.extend_from_slice(&value.to_le_bytes());
  }

  pub fn write_f32(&mut self, value: f32) {
    self.buffer.extend_from_slice(&value.to_le_bytes());
  }

  pub fn write_point(&mut self, point: Point) {
    self.write_f32(point.x as f32);
    self.write_f32(point.y as f32);
  }

  /// u16 count followed by that many points; anything past `u16::MAX` is cut.
  pub fn write_trail(&mut self, points: &[Point]) {
    let len = trail_len(points);
    self.write_u16(len);
    for point in points.iter().take(len as usize) {
      self.write_point(*point);
    }
  }

  pub fn write_string(&mut self, value: &str) {
    let bytes = value.as_bytes();
    let mut end = bytes.len().min(u8::MAX as usize);
    while !value.is_char_boundary(end) {
      end = end.saturating_sub(1);
    }
    self.write_u8(end as u8);
    self.buffer.extend_from_slice(&bytes[..end]);
  }
}

struct Reader<'a> {
  data: &'a [u8],
  offset: usize,
}

impl<'a> Reader<'a> {
  fn new(data: &'a [u8]) -> Self {
    Self { data, offset: 0 }
  }

  fn remaining(&self) -> usize {
    self.data.len().saturating_sub(self.offset)
  }

  fn read_u8(&mut self) -> Option<u8> {
    let value = *self.data.get(self.offset)?;
    self.offset += 1;
    Some(value)
  }

  fn read_u16(&mut self) -> Option<u16> {
    let bytes = self.read_bytes::<2>()?;
    Some(u16::from_le_bytes(bytes))
  }

  fn read_u32(&mut self) -> Option<u32> {
    let bytes = self.read_bytes::<4>()?;
    Some(u32::from_le_bytes(bytes))
  }

  fn read_u64(&mut self) -> Option<u64> {
    let bytes = self.read_bytes::<8>()?;
    Some(u64::from_le_bytes(bytes))
  }

  fn read_f32(&mut self) -> Option<f32> {
    let bytes = self.read_bytes::<4>()?;
    Some(f32::from_le_bytes(bytes))
  }

  fn read_point(&mut self) -> Option<Point> {
    let x = self.read_f32()? as f64;
    let y = self.read_f32()? as f64;
    Some(Point { x, y })
  }

  fn read_trail(&mut self) -> Option<Vec<Point>> {
    let len = self.read_u16()? as usize;
    if len * 8 > self.remaining() {
      return None;
    }
    let mut points = Vec::with_capacity(len);
    for _ in 0..len {
      points.push(self.read_point()?);
    }
    Some(points)
  }

  fn read_string(&mut self) -> Option<String> {
    let len = self.read_u8()? as usize;
    if self.offset + len > self.data.len() {
      return None;
    }
    let slice = &self.data[self.offset..self.offset + len];
    self.offset += len;
    Some(String::from_utf8_lossy(slice).into_owned())
  }

  fn read_bytes<const N: usize>(&mut self) -> Option<[u8; N]> {
    if self.offset + N > self.data.len() {
      return None;
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&self.data[self.offset..self.offset + N]);
    self.offset += N;
    Some(out)
  }
}
