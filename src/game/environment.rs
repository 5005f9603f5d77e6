use super::constants::{
  EXPLOSION_FADE, EXPLOSION_GROWTH, MINE_ARM_RADIUS, MINE_BLAST_RADIUS, MINE_FUSE_TICKS,
  SHAKE_DECAY, SHAKE_EPSILON,
};
use super::math::distance;
use super::types::{MineState, Point};
use super::world::World;

impl World {
  /// Arms idle mines that have a living body in range and detonates mines
  /// whose fuse has run out. Mines only ever move Idle -> Triggered -> gone.
  pub(super) fn update_mines(&mut self) {
    let tick = self.tick;
    let mut index = 0;
    while index < self.mines.len() {
      let mine = self.mines[index];
      match mine.state {
        MineState::Idle => {
          if self.living_body_within(mine.position, MINE_ARM_RADIUS) {
            self.mines[index].state = MineState::Triggered { since_tick: tick };
            tracing::debug!(x = mine.position.x, y = mine.position.y, tick, "mine triggered");
          }
          index += 1;
        }
        MineState::Triggered { since_tick } if tick.saturating_sub(since_tick) >= MINE_FUSE_TICKS => {
          self.mines.remove(index);
          self.detonate(mine.position);
        }
        MineState::Triggered { .. } => {
          index += 1;
        }
      }
    }
  }

  fn living_body_within(&self, at: Point, radius: f64) -> bool {
    let players = self
      .players
      .iter()
      .map(|player| &player.body)
      .filter(|body| body.alive);
    let agents = self
      .agents
      .iter()
      .map(|agent| &agent.body)
      .filter(|body| body.alive);
    players
      .chain(agents)
      .any(|body| distance(body.position, at) < radius)
  }

  fn detonate(&mut self, at: Point) {
    tracing::debug!(x = at.x, y = at.y, tick = self.tick, "mine detonated");
    self.spawn_explosion(at);
    for index in 0..self.players.len() {
      let body = &self.players[index].body;
      if body.alive && distance(body.position, at) < MINE_BLAST_RADIUS {
        self.kill_player(index, None);
      }
    }
    for index in 0..self.agents.len() {
      let body = &self.agents[index].body;
      if body.alive && distance(body.position, at) < MINE_BLAST_RADIUS {
        self.kill_agent(index, None);
      }
    }
  }

  pub(super) fn decay_effects(&mut self) {
    for explosion in &mut self.explosions {
      explosion.radius += EXPLOSION_GROWTH;
      explosion.alpha -= EXPLOSION_FADE;
    }
    self.explosions.retain(|explosion| explosion.alpha > 0.0);

    self.shake *= SHAKE_DECAY;
    if self.shake < SHAKE_EPSILON {
      self.shake = 0.0;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::types::{Mine, SessionMode};
  use crate::game::world::quiet_world;

  fn place_mine(world: &mut crate::game::world::World, at: Point) {
    world.mines.push(Mine {
      position: at,
      state: MineState::Idle,
    });
  }

  #[test]
  fn mine_arms_when_a_body_comes_close() {
    let mut world = quiet_world(SessionMode::Multi, 1);
    let host = world.players[0].body.position;
    place_mine(&mut world, Point { x: host.x + 250.0, y: host.y });
    world.tick = 5;

    world.update_mines();
    assert_eq!(world.mines[0].state, MineState::Idle);

    world.players[0].body.position.x += 60.0;
    world.update_mines();
    assert_eq!(world.mines[0].state, MineState::Triggered { since_tick: 5 });

    world.players[0].body.position.x -= 2000.0;
    world.tick = 6;
    world.update_mines();
    assert_eq!(world.mines[0].state, MineState::Triggered { since_tick: 5 });
  }

  #[test]
  fn dead_bodies_do_not_arm_mines() {
    let mut world = quiet_world(SessionMode::Multi, 1);
    let host = world.players[0].body.position;
    place_mine(&mut world, host);
    world.kill_player(0, None);

    world.update_mines();

    assert_eq!(world.mines[0].state, MineState::Idle);
  }

  #[test]
  fn triggered_mine_detonates_after_fuse_and_is_removed() {
    let mut world = quiet_world(SessionMode::Multi, 3);
    let host = world.players[0].body.position;
    place_mine(&mut world, host);
    world.tick = 10;
    world.update_mines();
    assert_eq!(world.mines[0].state, MineState::Triggered { since_tick: 10 });

    world.players[1].body.position = Point { x: host.x + 290.0, y: host.y };
    world.players[2].body.position = Point { x: host.x + 310.0, y: host.y };

    world.tick = 10 + MINE_FUSE_TICKS - 1;
    world.update_mines();
    assert_eq!(world.mines.len(), 1);
    assert!(world.players.iter().all(|player| player.body.alive));

    world.tick = 10 + MINE_FUSE_TICKS;
    world.update_mines();
    assert!(world.mines.is_empty());
    assert!(!world.players[0].body.alive);
    assert!(!world.players[1].body.alive);
    assert!(world.players[2].body.alive);
    assert!(world.players.iter().all(|player| player.kills == 0));

    world.tick += 1;
    world.update_mines();
    assert_eq!(world.players[0].deaths, 1);
    assert_eq!(world.players[1].deaths, 1);
  }

  #[test]
  fn effects_fade_out() {
    let mut world = quiet_world(SessionMode::Multi, 1);
    world.spawn_explosion(Point::default());
    for _ in 0..60 {
      world.decay_effects();
    }
    assert!(world.explosions.is_empty());
    assert_eq!(world.shake, 0.0);
  }
}
