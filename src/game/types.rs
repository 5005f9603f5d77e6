use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

/// Per-tick steering request, whatever produced it (local keys, a remote
/// INPUT frame, or the agent controller).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlIntent {
  pub heading: Option<f64>,
  pub boost: bool,
  pub respawn: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
  Player,
  Agent,
}

#[derive(Debug, Clone)]
pub struct Body {
  pub kind: BodyKind,
  pub position: Point,
  pub heading: f64,
  pub trail: VecDeque<Point>,
  pub length: f64,
  pub radius: f64,
  pub alive: bool,
  pub boosting: bool,
  pub pellets_eaten: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cosmetic {
  pub name: String,
  pub country: String,
  pub color: String,
}

#[derive(Debug, Clone)]
pub struct Player {
  pub seat: u8,
  pub cosmetic: Cosmetic,
  pub kills: u32,
  pub deaths: u32,
  pub body: Body,
}

#[derive(Debug, Clone)]
pub struct Agent {
  pub id: u32,
  pub color: String,
  pub speed: f64,
  pub boost_speed: f64,
  pub turn_rate: f64,
  pub body: Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineState {
  Idle,
  Triggered { since_tick: u64 },
}

#[derive(Debug, Clone, Copy)]
pub struct Mine {
  pub position: Point,
  pub state: MineState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
  pub position: Point,
  pub radius: f64,
  pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
  Solo,
  Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Killer {
  Player(u8),
  Agent(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
  pub seat: u8,
  pub alive: bool,
  pub boosting: bool,
  pub position: Point,
  pub heading: f64,
  pub length: f64,
  pub radius: f64,
  pub kills: u32,
  pub deaths: u32,
  pub cosmetic: Cosmetic,
  pub trail: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshot {
  pub id: u32,
  pub position: Point,
  pub heading: f64,
  pub length: f64,
  pub radius: f64,
  pub color: String,
  pub trail: Vec<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineSnapshot {
  pub position: Point,
  pub state: MineState,
}

/// Read-only mirror of the authority's world, replaced wholesale on every
/// STATE frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorldSnapshot {
  pub tick: u64,
  pub shake: f64,
  pub players: Vec<PlayerSnapshot>,
  pub agents: Vec<AgentSnapshot>,
  pub pellets: Vec<Point>,
  pub mines: Vec<MineSnapshot>,
  pub explosions: Vec<Explosion>,
}
