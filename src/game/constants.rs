pub const CELL: f64 = 150.0;
pub const GRID: usize = 35;
pub const WORLD_SIZE: f64 = CELL * GRID as f64;
pub const WORLD_HALF: f64 = WORLD_SIZE / 2.0;

pub const TICK_RATE_HZ: u64 = 60;
pub const MAX_PARTICIPANTS: usize = 3;

pub const MIN_LENGTH: f64 = 140.0;
pub const BASE_SPEED: f64 = 3.5;
pub const BOOST_MULTIPLIER: f64 = 1.8;
pub const SPRINT_COST: f64 = 0.5;
pub const TURN_RATE: f64 = 0.09;
pub const START_HEADING: f64 = -std::f64::consts::FRAC_PI_2;

pub const PLAYER_START_RADIUS: f64 = 18.0;
pub const PLAYER_MAX_RADIUS: f64 = 200.0;
pub const PLAYER_LENGTH_PER_RADIUS: f64 = 16.0;
pub const PLAYER_PELLET_GROWTH: f64 = 8.0;
pub const PLAYER_PELLET_MARGIN: f64 = 5.0;

pub const TRAIL_SKIP_RECENT: usize = 5;
pub const TRAIL_STRIKE_STRIDE: usize = 2;
pub const TRAIL_STRIKE_SLACK: f64 = 5.0;

pub const PELLET_FLOOR: usize = 150;
pub const PELLET_REFILL_BATCH: usize = 5;
pub const MAX_PELLETS: usize = u16::MAX as usize;

pub const MINE_COUNT: usize = 40;
pub const MINE_ARM_RADIUS: f64 = 200.0;
pub const MINE_BLAST_RADIUS: f64 = 300.0;
pub const MINE_FUSE_TICKS: u64 = 3 * TICK_RATE_HZ;

pub const EXPLOSION_START_RADIUS: f64 = 10.0;
pub const EXPLOSION_GROWTH: f64 = 15.0;
pub const EXPLOSION_FADE: f64 = 0.05;
pub const SHAKE_PULSE: f64 = 30.0;
pub const SHAKE_DECAY: f64 = 0.9;
pub const SHAKE_EPSILON: f64 = 0.1;

pub const PLAYER_DEBRIS_MAX: usize = 60;
pub const PLAYER_DEBRIS_STRIDE: usize = 3;
pub const AGENT_DEBRIS_MAX: usize = 40;
pub const AGENT_DEBRIS_STRIDE: usize = 4;

pub const AGENT_CAP: usize = 2;
pub const AGENT_SPAWN_CHANCE: f64 = 0.02;
pub const AGENT_LENGTH_SPREAD: f64 = 200.0;
pub const AGENT_MIN_SPEED: f64 = 2.5;
pub const AGENT_SPEED_SPREAD: f64 = 1.0;
pub const AGENT_BOOST_SPEED: f64 = 7.5;
pub const AGENT_TURN_RATE: f64 = 0.08;
pub const AGENT_BOOST_TURN_MULTIPLIER: f64 = 1.5;
pub const AGENT_BOOST_MIN_LENGTH: f64 = 145.0;
pub const AGENT_SPRINT_COST: f64 = 0.3;
pub const AGENT_BASE_RADIUS: f64 = 12.0;
pub const AGENT_MAX_EXTRA_RADIUS: f64 = 33.0;
pub const AGENT_LENGTH_PER_RADIUS: f64 = 10.0;
pub const AGENT_PELLET_GROWTH: f64 = 12.0;
pub const AGENT_PELLET_MARGIN: f64 = 10.0;

pub const AI_PANIC_RADIUS_IDLE: f64 = 250.0;
pub const AI_PANIC_RADIUS_TRIGGERED: f64 = 400.0;
pub const AI_VIEW_DISTANCE: f64 = 400.0;
pub const AI_RAY_STEPS: usize = 6;
pub const AI_WALL_MARGIN: f64 = 50.0;
pub const AI_MINE_CLEARANCE: f64 = 120.0;
pub const AI_TRAIL_CLEARANCE: f64 = 30.0;
pub const AI_TRAIL_STRIDE: usize = 4;
pub const AI_DANGER_WALL: f64 = 100.0;
pub const AI_DANGER_MINE: f64 = 200.0;
pub const AI_DANGER_TRAIL: f64 = 100.0;
pub const AI_EVADE_TURN: f64 = 1.8;
pub const AI_TIE_TURN: f64 = 2.0;
pub const AI_MAX_LOOKAHEAD: f64 = 60.0;
pub const AI_LOOKAHEAD_DIVISOR: f64 = 5.0;
pub const AI_ATTACK_ALIGNMENT: f64 = 0.4;
pub const AI_ATTACK_MIN_DISTANCE: f64 = 100.0;
pub const AI_ATTACK_MAX_DISTANCE: f64 = 700.0;
pub const AI_THREAT_RADIUS: f64 = 500.0;
pub const AI_FORAGE_RADIUS: f64 = 600.0;

pub const HOST_COUNTRY: &str = "bosnia";
pub const HOST_COLOR: &str = "#002F6C";
pub const GUEST_COLOR: &str = "#FFFFFF";

pub const COUNTRY_POOL: [&str; 5] = ["russia", "canada", "germany", "france", "ukraine"];

pub const AGENT_COLOR_POOL: [&str; 6] = [
  "#8A2BE2",
  "#DC143C",
  "#228B22",
  "#FF4500",
  "#1E90FF",
  "#FFD700",
];
