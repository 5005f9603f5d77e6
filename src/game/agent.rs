use super::constants::{
  AI_ATTACK_ALIGNMENT, AI_ATTACK_MAX_DISTANCE, AI_ATTACK_MIN_DISTANCE, AI_DANGER_MINE,
  AI_DANGER_TRAIL, AI_DANGER_WALL, AI_EVADE_TURN, AI_FORAGE_RADIUS, AI_LOOKAHEAD_DIVISOR,
  AI_MAX_LOOKAHEAD, AI_MINE_CLEARANCE, AI_PANIC_RADIUS_IDLE, AI_PANIC_RADIUS_TRIGGERED,
  AI_RAY_STEPS, AI_THREAT_RADIUS, AI_TIE_TURN, AI_TRAIL_CLEARANCE, AI_TRAIL_STRIDE,
  AI_VIEW_DISTANCE, AI_WALL_MARGIN, BASE_SPEED, BOOST_MULTIPLIER, WORLD_HALF,
};
use super::math::{angle_between, distance, normalize_angle, offset};
use super::snake::{advance_body, agent_profile, StepOutcome};
use super::types::{Body, ControlIntent, MineState, Point};
use super::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
  Left,
  Center,
  Right,
}

struct Feeler {
  angle_offset: f64,
  reach: f64,
  side: Side,
}

const FEELERS: [Feeler; 5] = [
  Feeler { angle_offset: -0.6, reach: AI_VIEW_DISTANCE, side: Side::Left },
  Feeler { angle_offset: -0.3, reach: AI_VIEW_DISTANCE + 50.0, side: Side::Left },
  Feeler { angle_offset: 0.0, reach: AI_VIEW_DISTANCE + 100.0, side: Side::Center },
  Feeler { angle_offset: 0.3, reach: AI_VIEW_DISTANCE + 50.0, side: Side::Right },
  Feeler { angle_offset: 0.6, reach: AI_VIEW_DISTANCE, side: Side::Right },
];

fn trail_within(body: &Body, at: Point, clearance: f64) -> bool {
  body
    .trail
    .iter()
    .step_by(AI_TRAIL_STRIDE)
    .any(|point| distance(*point, at) < body.radius + clearance)
}

impl World {
  /// The player the agents react to: the lowest seat still alive.
  pub fn tracked_player(&self) -> Option<usize> {
    self.players.iter().position(|player| player.body.alive)
  }

  fn nearest_agent_to(&self, at: Point) -> Option<usize> {
    self
      .agents
      .iter()
      .enumerate()
      .filter(|(_, agent)| agent.body.alive)
      .map(|(index, agent)| (index, distance(agent.body.position, at)))
      .min_by(|a, b| a.1.total_cmp(&b.1))
      .map(|(index, _)| index)
  }

  fn point_danger(&self, index: usize, at: Point, tracked: Option<usize>) -> f64 {
    let limit = WORLD_HALF - AI_WALL_MARGIN;
    if at.x.abs() > limit || at.y.abs() > limit {
      return AI_DANGER_WALL;
    }
    if self
      .mines
      .iter()
      .any(|mine| distance(mine.position, at) < AI_MINE_CLEARANCE)
    {
      return AI_DANGER_MINE;
    }
    let near_agent_trail = self
      .agents
      .iter()
      .enumerate()
      .filter(|(other, agent)| *other != index && agent.body.alive)
      .any(|(_, agent)| trail_within(&agent.body, at, AI_TRAIL_CLEARANCE));
    if near_agent_trail {
      return AI_DANGER_TRAIL;
    }
    if let Some(tracked) = tracked {
      if trail_within(&self.players[tracked].body, at, AI_TRAIL_CLEARANCE) {
        return AI_DANGER_TRAIL;
      }
    }
    0.0
  }

  /// Picks the steering for one agent from the current world, in priority
  /// order: flee a nearby mine, dodge whatever the feelers hit, hunt the
  /// tracked player, and otherwise keep away from it or go after food.
  pub(super) fn decide_agent(&self, index: usize, tracked: Option<usize>, is_hunter: bool) -> ControlIntent {
    let body = &self.agents[index].body;

    let panic_mine = self
      .mines
      .iter()
      .filter(|mine| {
        let radius = match mine.state {
          MineState::Triggered { .. } => AI_PANIC_RADIUS_TRIGGERED,
          MineState::Idle => AI_PANIC_RADIUS_IDLE,
        };
        distance(body.position, mine.position) < radius
      })
      .min_by(|a, b| {
        distance(body.position, a.position).total_cmp(&distance(body.position, b.position))
      });
    if let Some(mine) = panic_mine {
      return ControlIntent {
        heading: Some(angle_between(mine.position, body.position)),
        boost: true,
        respawn: false,
      };
    }

    let mut danger_left = 0.0;
    let mut danger_right = 0.0;
    let mut center_blocked = false;
    for feeler in &FEELERS {
      let angle = body.heading + feeler.angle_offset;
      for step in 1..=AI_RAY_STEPS {
        let reach = feeler.reach / AI_RAY_STEPS as f64 * step as f64;
        let danger = self.point_danger(index, offset(body.position, angle, reach), tracked);
        if danger <= 0.0 {
          continue;
        }
        match feeler.side {
          Side::Left => danger_left += danger / step as f64,
          Side::Right => danger_right += danger / step as f64,
          Side::Center => center_blocked = true,
        }
      }
    }
    if danger_left > 0.0 || danger_right > 0.0 || center_blocked {
      let turn = if danger_left > danger_right {
        AI_EVADE_TURN
      } else if danger_right > danger_left {
        -AI_EVADE_TURN
      } else {
        AI_TIE_TURN
      };
      return ControlIntent {
        heading: Some(normalize_angle(body.heading + turn)),
        boost: false,
        respawn: false,
      };
    }

    let target = tracked.map(|tracked| &self.players[tracked].body);

    if let (true, Some(player)) = (is_hunter, target) {
      let gap = distance(body.position, player.position);
      let player_speed = if player.boosting {
        BASE_SPEED * BOOST_MULTIPLIER
      } else {
        BASE_SPEED
      };
      let lookahead = AI_MAX_LOOKAHEAD.min(gap / AI_LOOKAHEAD_DIVISOR);
      let predicted = offset(player.position, player.heading, player_speed * lookahead);
      let attack = angle_between(body.position, predicted);
      let misalignment = normalize_angle(attack - body.heading).abs();
      return ControlIntent {
        heading: Some(attack),
        boost: misalignment < AI_ATTACK_ALIGNMENT
          && gap > AI_ATTACK_MIN_DISTANCE
          && gap < AI_ATTACK_MAX_DISTANCE,
        respawn: false,
      };
    }

    if let Some(player) = target {
      if distance(body.position, player.position) < AI_THREAT_RADIUS {
        return ControlIntent {
          heading: Some(angle_between(player.position, body.position)),
          boost: true,
          respawn: false,
        };
      }
    }

    let food = self
      .pellets
      .iter()
      .map(|pellet| (*pellet, distance(body.position, *pellet)))
      .filter(|(_, gap)| *gap < AI_FORAGE_RADIUS)
      .min_by(|a, b| a.1.total_cmp(&b.1));
    ControlIntent {
      heading: food.map(|(pellet, _)| angle_between(body.position, pellet)),
      boost: false,
      respawn: false,
    }
  }

  /// Steers, moves, feeds and collides every living agent in turn. The hunter
  /// role is assigned once, before anyone moves.
  pub(super) fn update_agents(&mut self) {
    let tracked = self.tracked_player();
    let hunter = tracked.and_then(|tracked| self.nearest_agent_to(self.players[tracked].body.position));

    for index in 0..self.agents.len() {
      if !self.agents[index].body.alive {
        continue;
      }
      let intent = self.decide_agent(index, tracked, hunter == Some(index));
      let profile = agent_profile(&self.agents[index]);
      if advance_body(&mut self.agents[index].body, &intent, &profile) == StepOutcome::OutOfBounds {
        self.kill_agent(index, None);
        continue;
      }
      self.consume_agent_pellets(index);
      self.resolve_agent_contacts(index);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::constants::MIN_LENGTH;
  use crate::game::snake::create_body;
  use crate::game::types::{Agent, BodyKind, Mine, SessionMode};
  use crate::game::world::quiet_world;
  use std::f64::consts::{FRAC_PI_2, PI};

  fn add_agent(world: &mut World, position: Point, heading: f64) -> usize {
    let id = world.agents.len() as u32 + 1;
    world.agents.push(Agent {
      id,
      color: "#FF4500".to_string(),
      speed: 3.0,
      boost_speed: 7.5,
      turn_rate: 0.08,
      body: create_body(BodyKind::Agent, position, heading, MIN_LENGTH + 60.0),
    });
    world.agents.len() - 1
  }

  #[test]
  fn nearby_mine_causes_panic_sprint_away() {
    let mut world = quiet_world(SessionMode::Solo, 1);
    world.players[0].body.position = Point { x: 2000.0, y: 2000.0 };
    let index = add_agent(&mut world, Point { x: 0.0, y: 0.0 }, 0.0);
    world.mines.push(Mine {
      position: Point { x: 100.0, y: 0.0 },
      state: MineState::Idle,
    });

    let intent = world.decide_agent(index, world.tracked_player(), true);

    assert!(intent.boost);
    let heading = intent.heading.expect("heading");
    assert!((heading - PI).abs() < 1e-9);
  }

  #[test]
  fn triggered_mines_widen_the_panic_radius() {
    let mut world = quiet_world(SessionMode::Solo, 1);
    world.players[0].body.position = Point { x: 2000.0, y: 2000.0 };
    let index = add_agent(&mut world, Point { x: 0.0, y: 0.0 }, FRAC_PI_2);
    world.mines.push(Mine {
      position: Point { x: 300.0, y: 0.0 },
      state: MineState::Idle,
    });
    assert!(!world.decide_agent(index, None, false).boost);

    world.mines[0].state = MineState::Triggered { since_tick: 0 };
    let intent = world.decide_agent(index, None, false);
    assert!(intent.boost);
    assert!((intent.heading.expect("heading") - PI).abs() < 1e-9);
  }

  #[test]
  fn head_on_wall_turns_the_default_way() {
    let mut world = quiet_world(SessionMode::Solo, 1);
    let index = add_agent(&mut world, Point { x: 2400.0, y: 0.0 }, 0.0);

    let intent = world.decide_agent(index, world.tracked_player(), false);

    assert!(!intent.boost);
    assert!((intent.heading.expect("heading") - AI_TIE_TURN).abs() < 1e-9);
  }

  #[test]
  fn wall_on_one_side_turns_away_from_it() {
    let mut world = quiet_world(SessionMode::Solo, 1);
    let index = add_agent(&mut world, Point { x: 0.0, y: -2400.0 }, 0.0);

    let intent = world.decide_agent(index, world.tracked_player(), false);

    assert!((intent.heading.expect("heading") - AI_EVADE_TURN).abs() < 1e-9);
  }

  #[test]
  fn hunter_leads_the_player_and_sprints_when_aligned() {
    let mut world = quiet_world(SessionMode::Multi, 1);
    let index = add_agent(&mut world, Point { x: 0.0, y: 400.0 }, -FRAC_PI_2);

    let intent = world.decide_agent(index, world.tracked_player(), true);

    let heading = intent.heading.expect("heading");
    assert!((heading + FRAC_PI_2).abs() < 1e-6);
    assert!(intent.boost);

    world.agents[index].body.heading = 0.0;
    world.agents[index].body.position = Point { x: 0.0, y: 2000.0 };
    let intent = world.decide_agent(index, world.tracked_player(), true);
    assert!(!intent.boost);
  }

  #[test]
  fn non_hunter_flees_a_close_player() {
    let mut world = quiet_world(SessionMode::Multi, 1);
    let index = add_agent(&mut world, Point { x: 0.0, y: 0.0 }, 0.0);

    let intent = world.decide_agent(index, world.tracked_player(), false);

    assert!(intent.boost);
    assert!((intent.heading.expect("heading") - FRAC_PI_2).abs() < 1e-9);
  }

  #[test]
  fn idle_agent_forages_the_nearest_pellet() {
    let mut world = quiet_world(SessionMode::Multi, 1);
    world.kill_player(0, None);
    world.pellets.clear();
    let index = add_agent(&mut world, Point { x: 0.0, y: 0.0 }, 1.0);

    let intent = world.decide_agent(index, world.tracked_player(), false);
    assert_eq!(intent.heading, None);

    world.pellets = vec![Point { x: 300.0, y: 0.0 }, Point { x: 0.0, y: 700.0 }];
    let intent = world.decide_agent(index, world.tracked_player(), false);
    assert_eq!(intent.heading, Some(0.0));
    assert!(!intent.boost);
  }

  #[test]
  fn nearest_agent_becomes_the_hunter() {
    let mut world = quiet_world(SessionMode::Multi, 1);
    world.players[0].body.position = Point { x: 0.0, y: 0.0 };
    add_agent(&mut world, Point { x: 1500.0, y: 0.0 }, 0.0);
    add_agent(&mut world, Point { x: -900.0, y: 0.0 }, 0.0);

    let hunter = world.nearest_agent_to(world.players[0].body.position);
    assert_eq!(hunter, Some(1));
  }

  #[test]
  fn update_agents_moves_living_agents() {
    let mut world = quiet_world(SessionMode::Multi, 1);
    world.players[0].body.position = Point { x: -2000.0, y: -2000.0 };
    let index = add_agent(&mut world, Point { x: 1000.0, y: 1000.0 }, 0.0);

    world.update_agents();

    let body = &world.agents[index].body;
    assert!(body.alive);
    assert_eq!(body.trail.len(), 1);
    assert!(body.position.x > 1000.0);
  }
}
