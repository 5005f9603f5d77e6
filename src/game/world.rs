use super::constants::{MAX_PARTICIPANTS, MINE_COUNT, MIN_LENGTH, PELLET_FLOOR, START_HEADING};
use super::lifecycle::{cosmetic_for_seat, spawn_point};
use super::snake::{advance_body, create_body, StepOutcome, PLAYER_PROFILE};
use super::types::{
  Agent, AgentSnapshot, BodyKind, ControlIntent, Explosion, Mine, MineSnapshot, Player,
  PlayerSnapshot, Point, SessionMode, WorldSnapshot,
};
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSettings {
  pub mode: SessionMode,
  pub agents_enabled: bool,
  pub pellet_floor: usize,
  pub mine_count: usize,
}

impl WorldSettings {
  pub fn new(mode: SessionMode, multiplayer_agents: bool) -> Self {
    Self {
      mode,
      agents_enabled: mode == SessionMode::Solo || multiplayer_agents,
      pellet_floor: PELLET_FLOOR,
      mine_count: MINE_COUNT,
    }
  }
}

/// Authoritative state of one session. Only the host's tick routine owns and
/// mutates it; guests only ever see encoded snapshots.
#[derive(Debug)]
pub struct World {
  pub settings: WorldSettings,
  pub tick: u64,
  pub players: Vec<Player>,
  pub agents: Vec<Agent>,
  pub pellets: Vec<Point>,
  pub mines: Vec<Mine>,
  pub explosions: Vec<Explosion>,
  pub shake: f64,
  pub(super) next_agent_id: u32,
  pub(super) rng: StdRng,
}

impl World {
  pub fn new(settings: WorldSettings, seats: &[(u8, String)], mut rng: StdRng) -> Self {
    let players = seats
      .iter()
      .map(|(seat, name)| Player {
        seat: *seat,
        cosmetic: cosmetic_for_seat(*seat, name, &mut rng),
        kills: 0,
        deaths: 0,
        body: create_body(
          BodyKind::Player,
          spawn_point(settings.mode, *seat),
          START_HEADING,
          MIN_LENGTH,
        ),
      })
      .collect();

    let mut world = Self {
      settings,
      tick: 0,
      players,
      agents: Vec::new(),
      pellets: Vec::new(),
      mines: Vec::new(),
      explosions: Vec::new(),
      shake: 0.0,
      next_agent_id: 1,
      rng,
    };
    world.reset_round();
    world
  }

  pub fn mode(&self) -> SessionMode {
    self.settings.mode
  }

  pub fn player_index(&self, seat: u8) -> Option<usize> {
    self.players.iter().position(|player| player.seat == seat)
  }

  pub fn player(&self, seat: u8) -> Option<&Player> {
    self.players.iter().find(|player| player.seat == seat)
  }

  pub fn snapshot(&self) -> WorldSnapshot {
    let players = self
      .players
      .iter()
      .map(|player| PlayerSnapshot {
        seat: player.seat,
        alive: player.body.alive,
        boosting: player.body.boosting,
        position: player.body.position,
        heading: player.body.heading,
        length: player.body.length,
        radius: player.body.radius,
        kills: player.kills,
        deaths: player.deaths,
        cosmetic: player.cosmetic.clone(),
        trail: player.body.trail.iter().copied().collect(),
      })
      .collect();
    let agents = self
      .agents
      .iter()
      .map(|agent| AgentSnapshot {
        id: agent.id,
        position: agent.body.position,
        heading: agent.body.heading,
        length: agent.body.length,
        radius: agent.body.radius,
        color: agent.color.clone(),
        trail: agent.body.trail.iter().copied().collect(),
      })
      .collect();
    let mines = self
      .mines
      .iter()
      .map(|mine| MineSnapshot {
        position: mine.position,
        state: mine.state,
      })
      .collect();

    WorldSnapshot {
      tick: self.tick,
      shake: self.shake,
      players,
      agents,
      pellets: self.pellets.clone(),
      mines,
      explosions: self.explosions.clone(),
    }
  }

  /// Advances the simulation by one fixed step. `intents` is indexed by seat.
  pub fn tick(&mut self, intents: &[ControlIntent; MAX_PARTICIPANTS]) {
    self.tick += 1;
    if self.awaiting_solo_respawn() {
      // Frozen until the player asks for a new round; only the death flash fades.
      self.step_players(intents);
      self.decay_effects();
      return;
    }
    self.step_players(intents);
    self.update_mines();
    self.resolve_player_contacts();
    self.update_agents();
    self.consume_player_pellets();
    self.remove_dead_agents();
    self.maybe_spawn_agent();
    self.replenish_pellets();
    self.decay_effects();
  }

  fn awaiting_solo_respawn(&self) -> bool {
    self.settings.mode == SessionMode::Solo && !self.players.iter().any(|player| player.body.alive)
  }

  fn step_players(&mut self, intents: &[ControlIntent; MAX_PARTICIPANTS]) {
    for index in 0..self.players.len() {
      let seat = self.players[index].seat as usize;
      let intent = intents.get(seat).copied().unwrap_or_default();

      if !self.players[index].body.alive {
        if intent.respawn {
          match self.settings.mode {
            SessionMode::Solo => self.reset_round(),
            SessionMode::Multi => {
              self.respawn_player(index);
            }
          }
        }
        continue;
      }

      let outcome = advance_body(&mut self.players[index].body, &intent, &PLAYER_PROFILE);
      if outcome == StepOutcome::OutOfBounds {
        self.kill_player(index, None);
      }
    }
  }
}

#[cfg(test)]
pub(crate) fn quiet_world(mode: SessionMode, seats: usize) -> World {
  use rand::SeedableRng;

  let settings = WorldSettings {
    mode,
    agents_enabled: false,
    pellet_floor: 0,
    mine_count: 0,
  };
  let seats: Vec<(u8, String)> = (0..seats as u8)
    .map(|seat| (seat, format!("Player {}", seat + 1)))
    .collect();
  let mut world = World::new(settings, &seats, StdRng::seed_from_u64(7));
  world.pellets.clear();
  world
}
