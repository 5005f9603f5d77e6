use super::math::normalize_angle;
use super::types::ControlIntent;

#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

pub fn parse_heading(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    Some(normalize_angle(value))
}

pub fn parse_intent(heading: Option<f64>, boost: bool, respawn: bool) -> ControlIntent {
    ControlIntent {
        heading: heading.and_then(parse_heading),
        boost,
        respawn,
    }
}

/// Heading toward the pointer, measured from the screen centre (y grows down).
pub fn heading_from_pointer(dx: f64, dy: f64) -> Option<f64> {
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    parse_heading(dy.atan2(dx))
}

pub fn heading_from_keys(keys: DirectionKeys) -> Option<f64> {
    let mut dx = 0.0;
    let mut dy = 0.0;
    if keys.up {
        dy -= 1.0;
    }
    if keys.down {
        dy += 1.0;
    }
    if keys.left {
        dx -= 1.0;
    }
    if keys.right {
        dx += 1.0;
    }
    heading_from_pointer(dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn non_finite_headings_are_dropped() {
        let intent = parse_intent(Some(f64::NAN), true, false);
        assert_eq!(intent.heading, None);
        assert!(intent.boost);
    }

    #[test]
    fn headings_are_normalized() {
        let heading = parse_heading(3.0 * PI).expect("finite");
        assert!((heading - PI).abs() < 1e-9);
    }

    #[test]
    fn keys_map_to_screen_headings() {
        let up = DirectionKeys {
            up: true,
            ..Default::default()
        };
        let heading = heading_from_keys(up).expect("heading");
        assert!((heading + FRAC_PI_2).abs() < 1e-12);

        let down_right = DirectionKeys {
            down: true,
            right: true,
            ..Default::default()
        };
        let heading = heading_from_keys(down_right).expect("heading");
        assert!((heading - FRAC_PI_4).abs() < 1e-12);

        let opposed = DirectionKeys {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(heading_from_keys(opposed), None);
    }
}
