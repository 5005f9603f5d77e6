use super::constants::{
    AGENT_BASE_RADIUS, AGENT_BOOST_MIN_LENGTH, AGENT_BOOST_TURN_MULTIPLIER,
    AGENT_LENGTH_PER_RADIUS, AGENT_MAX_EXTRA_RADIUS, AGENT_SPRINT_COST, BASE_SPEED,
    BOOST_MULTIPLIER, MIN_LENGTH, PLAYER_LENGTH_PER_RADIUS, PLAYER_MAX_RADIUS,
    PLAYER_START_RADIUS, SPRINT_COST, TURN_RATE, WORLD_HALF,
};
use super::math::{clamp, normalize_angle, rotate_toward};
use super::types::{Agent, Body, BodyKind, ControlIntent, Point};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementProfile {
    pub base_speed: f64,
    pub boost_speed: f64,
    pub turn_rate: f64,
    pub boost_turn_multiplier: f64,
    pub boost_min_length: f64,
    pub sprint_cost: f64,
}

pub const PLAYER_PROFILE: MovementProfile = MovementProfile {
    base_speed: BASE_SPEED,
    boost_speed: BASE_SPEED * BOOST_MULTIPLIER,
    turn_rate: TURN_RATE,
    boost_turn_multiplier: 1.0,
    boost_min_length: MIN_LENGTH,
    sprint_cost: SPRINT_COST,
};

pub fn agent_profile(agent: &Agent) -> MovementProfile {
    MovementProfile {
        base_speed: agent.speed,
        boost_speed: agent.boost_speed,
        turn_rate: agent.turn_rate,
        boost_turn_multiplier: AGENT_BOOST_TURN_MULTIPLIER,
        boost_min_length: AGENT_BOOST_MIN_LENGTH,
        sprint_cost: AGENT_SPRINT_COST,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    OutOfBounds,
}

pub fn radius_for_length(kind: BodyKind, length: f64) -> f64 {
    let grown = (length - MIN_LENGTH).max(0.0);
    match kind {
        BodyKind::Player => clamp(
            PLAYER_START_RADIUS + grown / PLAYER_LENGTH_PER_RADIUS,
            PLAYER_START_RADIUS,
            PLAYER_MAX_RADIUS,
        ),
        BodyKind::Agent => {
            AGENT_BASE_RADIUS + (grown / AGENT_LENGTH_PER_RADIUS).min(AGENT_MAX_EXTRA_RADIUS)
        }
    }
}

pub fn create_body(kind: BodyKind, position: Point, heading: f64, length: f64) -> Body {
    let length = length.max(MIN_LENGTH);
    Body {
        kind,
        position,
        heading: normalize_angle(heading),
        trail: VecDeque::with_capacity(length.floor() as usize),
        length,
        radius: radius_for_length(kind, length),
        alive: true,
        boosting: false,
        pellets_eaten: 0,
    }
}

pub fn within_bounds(point: Point) -> bool {
    point.x.abs() <= WORLD_HALF && point.y.abs() <= WORLD_HALF
}

impl Body {
    pub fn set_length(&mut self, length: f64) {
        self.length = length.max(MIN_LENGTH);
        self.radius = radius_for_length(self.kind, self.length);
        self.trail.truncate(self.length.floor() as usize);
    }

    pub fn grow(&mut self, amount: f64) {
        self.set_length(self.length + amount);
        self.pellets_eaten = self.pellets_eaten.saturating_add(1);
    }

    pub fn reset(&mut self, position: Point, heading: f64, length: f64) {
        *self = create_body(self.kind, position, heading, length);
    }
}

/// One Euler step: steer, optionally sprint, move, and record the new head in
/// the trail. Leaving the arena is reported, not handled, so the caller can
/// run the kill procedure with full world access.
pub fn advance_body(body: &mut Body, intent: &ControlIntent, profile: &MovementProfile) -> StepOutcome {
    if let Some(target) = intent.heading {
        let turn = if intent.boost {
            profile.turn_rate * profile.boost_turn_multiplier
        } else {
            profile.turn_rate
        };
        body.heading = rotate_toward(body.heading, target, turn);
    }

    body.boosting = intent.boost && body.length > profile.boost_min_length;
    let speed = if body.boosting {
        body.set_length(body.length - profile.sprint_cost);
        profile.boost_speed
    } else {
        profile.base_speed
    };

    body.position = Point {
        x: body.position.x + body.heading.cos() * speed,
        y: body.position.y + body.heading.sin() * speed,
    };

    body.trail.push_front(body.position);
    body.trail.truncate(body.length.floor() as usize);

    if within_bounds(body.position) {
        StepOutcome::Moved
    } else {
        StepOutcome::OutOfBounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f64, y: f64, heading: f64, length: f64) -> Body {
        create_body(BodyKind::Player, Point { x, y }, heading, length)
    }

    #[test]
    fn trail_never_exceeds_floor_of_length() {
        let mut body = player_at(0.0, 0.0, 0.3, 141.7);
        let intent = ControlIntent {
            heading: Some(1.2),
            boost: true,
            respawn: false,
        };
        for _ in 0..400 {
            advance_body(&mut body, &intent, &PLAYER_PROFILE);
            assert!(body.trail.len() <= body.length.floor() as usize);
            assert!(body.length >= MIN_LENGTH);
        }
        assert_eq!(body.trail.len(), MIN_LENGTH as usize);
    }

    #[test]
    fn boost_is_ignored_at_the_length_floor() {
        let mut body = player_at(0.0, 0.0, 0.0, MIN_LENGTH);
        let intent = ControlIntent {
            heading: None,
            boost: true,
            respawn: false,
        };
        advance_body(&mut body, &intent, &PLAYER_PROFILE);
        assert!(!body.boosting);
        assert_eq!(body.length, MIN_LENGTH);
        assert!((body.position.x - BASE_SPEED).abs() < 1e-9);
    }

    #[test]
    fn sprinting_moves_faster_and_costs_length() {
        let mut body = player_at(0.0, 0.0, 0.0, 148.0);
        let intent = ControlIntent {
            heading: Some(0.0),
            boost: true,
            respawn: false,
        };
        let outcome = advance_body(&mut body, &intent, &PLAYER_PROFILE);
        assert_eq!(outcome, StepOutcome::Moved);
        assert!(body.boosting);
        assert!((body.position.x - BASE_SPEED * BOOST_MULTIPLIER).abs() < 1e-9);
        assert!(body.position.y.abs() < 1e-9);
        assert!((body.length - (148.0 - SPRINT_COST)).abs() < 1e-9);
        assert_eq!(body.trail.front().copied(), Some(body.position));
    }

    #[test]
    fn missing_heading_keeps_course() {
        let mut body = player_at(0.0, 0.0, 1.0, MIN_LENGTH);
        advance_body(&mut body, &ControlIntent::default(), &PLAYER_PROFILE);
        assert_eq!(body.heading, 1.0);
    }

    #[test]
    fn leaving_the_arena_is_reported() {
        let mut body = player_at(WORLD_HALF - 1.0, 0.0, 0.0, MIN_LENGTH);
        let outcome = advance_body(&mut body, &ControlIntent::default(), &PLAYER_PROFILE);
        assert_eq!(outcome, StepOutcome::OutOfBounds);
    }

    #[test]
    fn radius_grows_with_length_up_to_cap() {
        assert_eq!(radius_for_length(BodyKind::Player, MIN_LENGTH), PLAYER_START_RADIUS);
        assert_eq!(radius_for_length(BodyKind::Player, MIN_LENGTH + 8.0), 18.5);
        assert_eq!(radius_for_length(BodyKind::Player, 1.0e6), PLAYER_MAX_RADIUS);
        assert_eq!(radius_for_length(BodyKind::Agent, MIN_LENGTH + 100.0), 22.0);
        assert_eq!(radius_for_length(BodyKind::Agent, 1.0e6), 45.0);
    }

    #[test]
    fn agents_turn_faster_while_sprinting() {
        let agent = Agent {
            id: 1,
            color: "#8A2BE2".to_string(),
            speed: 3.0,
            boost_speed: 7.5,
            turn_rate: 0.08,
            body: create_body(BodyKind::Agent, Point::default(), 0.0, 200.0),
        };
        let profile = agent_profile(&agent);
        let mut body = agent.body.clone();
        let intent = ControlIntent {
            heading: Some(1.0),
            boost: true,
            respawn: false,
        };
        advance_body(&mut body, &intent, &profile);
        assert!((body.heading - 0.12).abs() < 1e-9);
        assert!((body.length - 199.7).abs() < 1e-9);
    }
}
