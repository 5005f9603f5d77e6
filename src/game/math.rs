use super::types::Point;
use std::f64::consts::PI;

pub fn distance(a: Point, b: Point) -> f64 {
  (a.x - b.x).hypot(a.y - b.y)
}

pub fn collision(a: Point, b: Point, reach: f64) -> bool {
  distance(a, b) < reach
}

/// Wraps an angle into (-PI, PI].
pub fn normalize_angle(angle: f64) -> f64 {
  if !angle.is_finite() {
    return 0.0;
  }
  if angle > -PI && angle <= PI {
    return angle;
  }
  let wrapped = angle.sin().atan2(angle.cos());
  if wrapped <= -PI {
    PI
  } else {
    wrapped
  }
}

pub fn angle_between(from: Point, to: Point) -> f64 {
  (to.y - from.y).atan2(to.x - from.x)
}

pub fn offset(origin: Point, angle: f64, dist: f64) -> Point {
  Point {
    x: origin.x + angle.cos() * dist,
    y: origin.y + angle.sin() * dist,
  }
}

/// Turns `current` toward `target` by at most `max_turn`, snapping onto the
/// target once it is within reach.
pub fn rotate_toward(current: f64, target: f64, max_turn: f64) -> f64 {
  let diff = normalize_angle(target - current);
  if diff.abs() < max_turn {
    return normalize_angle(target);
  }
  if diff > 0.0 {
    normalize_angle(current + max_turn)
  } else {
    normalize_angle(current - max_turn)
  }
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
  value.min(max).max(min)
}
