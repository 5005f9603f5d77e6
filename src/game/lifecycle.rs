use super::constants::{
    AGENT_BOOST_SPEED, AGENT_CAP, AGENT_COLOR_POOL, AGENT_DEBRIS_MAX, AGENT_DEBRIS_STRIDE,
    AGENT_LENGTH_SPREAD, AGENT_MIN_SPEED, AGENT_SPAWN_CHANCE, AGENT_SPEED_SPREAD,
    AGENT_TURN_RATE, CELL, COUNTRY_POOL, EXPLOSION_START_RADIUS, GRID, GUEST_COLOR, HOST_COLOR,
    HOST_COUNTRY, MAX_PELLETS, MIN_LENGTH, PELLET_REFILL_BATCH, PLAYER_DEBRIS_MAX,
    PLAYER_DEBRIS_STRIDE, SHAKE_PULSE, START_HEADING, WORLD_HALF,
};
use super::snake::create_body;
use super::types::{
    Agent, BodyKind, Cosmetic, Explosion, Killer, Mine, MineState, Point, SessionMode,
};
use super::world::World;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;

const MULTI_SPAWN_POINTS: [Point; 3] = [
    Point { x: 0.0, y: -200.0 },
    Point { x: -200.0, y: 200.0 },
    Point { x: 200.0, y: 200.0 },
];

pub fn spawn_point(mode: SessionMode, seat: u8) -> Point {
    match mode {
        SessionMode::Solo => Point::default(),
        SessionMode::Multi => MULTI_SPAWN_POINTS
            .get(seat as usize)
            .copied()
            .unwrap_or_default(),
    }
}

pub fn cosmetic_for_seat(seat: u8, name: &str, rng: &mut StdRng) -> Cosmetic {
    if seat == 0 {
        return Cosmetic {
            name: name.to_string(),
            country: HOST_COUNTRY.to_string(),
            color: HOST_COLOR.to_string(),
        };
    }
    Cosmetic {
        name: name.to_string(),
        country: COUNTRY_POOL[rng.gen_range(0..COUNTRY_POOL.len())].to_string(),
        color: GUEST_COLOR.to_string(),
    }
}

fn debris_points(trail: &VecDeque<Point>, max_pieces: usize, stride: usize) -> Vec<Point> {
    let pieces = max_pieces.min((trail.len() + 1) / 2);
    trail.iter().step_by(stride).take(pieces).copied().collect()
}

impl World {
    /// Kill procedure for a player. Returns false when the player was already
    /// dead, in which case nothing changes.
    pub fn kill_player(&mut self, index: usize, killer: Option<Killer>) -> bool {
        let Some(player) = self.players.get_mut(index) else { return false };
        if !player.body.alive {
            return false;
        }
        player.body.alive = false;
        player.body.boosting = false;
        player.deaths = player.deaths.saturating_add(1);
        let seat = player.seat;
        let at = player.body.position;
        let pellets_eaten = player.body.pellets_eaten;
        let debris = debris_points(&player.body.trail, PLAYER_DEBRIS_MAX, PLAYER_DEBRIS_STRIDE);
        tracing::debug!(seat, ?killer, pellets_eaten, tick = self.tick, "player died");

        self.credit_kill(killer);
        self.scatter_debris(debris);
        self.spawn_explosion(at);
        true
    }

    pub fn kill_agent(&mut self, index: usize, killer: Option<Killer>) -> bool {
        let Some(agent) = self.agents.get_mut(index) else { return false };
        if !agent.body.alive {
            return false;
        }
        agent.body.alive = false;
        agent.body.boosting = false;
        let agent_id = agent.id;
        let at = agent.body.position;
        let pellets_eaten = agent.body.pellets_eaten;
        let debris = debris_points(&agent.body.trail, AGENT_DEBRIS_MAX, AGENT_DEBRIS_STRIDE);
        tracing::debug!(agent_id, ?killer, pellets_eaten, tick = self.tick, "agent died");

        self.credit_kill(killer);
        self.scatter_debris(debris);
        self.spawn_explosion(at);
        true
    }

    fn credit_kill(&mut self, killer: Option<Killer>) {
        let Some(Killer::Player(seat)) = killer else { return };
        if let Some(player) = self.players.iter_mut().find(|player| player.seat == seat) {
            player.kills = player.kills.saturating_add(1);
        }
    }

    fn scatter_debris(&mut self, debris: Vec<Point>) {
        self.pellets.extend(debris);
        if self.pellets.len() > MAX_PELLETS {
            let excess = self.pellets.len() - MAX_PELLETS;
            self.pellets.drain(0..excess);
        }
    }

    pub(super) fn spawn_explosion(&mut self, at: Point) {
        self.explosions.push(Explosion {
            position: at,
            radius: EXPLOSION_START_RADIUS,
            alpha: 1.0,
        });
        self.shake = SHAKE_PULSE;
    }

    /// Returns false when the player is still alive; a respawn only ever
    /// follows a death.
    pub fn respawn_player(&mut self, index: usize) -> bool {
        let mode = self.settings.mode;
        let Some(player) = self.players.get_mut(index) else { return false };
        if player.body.alive {
            return false;
        }
        let seat = player.seat;
        player
            .body
            .reset(spawn_point(mode, seat), START_HEADING, MIN_LENGTH);
        tracing::debug!(seat, tick = self.tick, "player respawned");
        true
    }

    pub(super) fn reset_round(&mut self) {
        self.pellets.clear();
        self.mines.clear();
        self.explosions.clear();
        self.shake = 0.0;

        self.spawn_mines(self.settings.mine_count);
        self.spawn_pellets(self.settings.pellet_floor);

        let mode = self.settings.mode;
        for player in &mut self.players {
            player
                .body
                .reset(spawn_point(mode, player.seat), START_HEADING, MIN_LENGTH);
        }

        self.agents.clear();
        if self.settings.agents_enabled {
            while self.agents.len() < AGENT_CAP {
                self.spawn_agent();
            }
        }
    }

    fn random_cell(&mut self) -> f64 {
        self.rng.gen_range(0..GRID) as f64 * CELL - WORLD_HALF
    }

    fn random_cell_point(&mut self) -> Point {
        let x = self.random_cell();
        let y = self.random_cell();
        Point { x, y }
    }

    pub(super) fn spawn_pellets(&mut self, count: usize) {
        for _ in 0..count {
            let pellet = self.random_cell_point();
            self.pellets.push(pellet);
        }
    }

    fn spawn_mines(&mut self, count: usize) {
        for _ in 0..count {
            let position = self.random_cell_point();
            self.mines.push(Mine {
                position,
                state: MineState::Idle,
            });
        }
    }

    pub(super) fn spawn_agent(&mut self) {
        let position = self.random_cell_point();
        let heading = self.rng.gen::<f64>() * std::f64::consts::PI * 2.0;
        let length = MIN_LENGTH + self.rng.gen::<f64>() * AGENT_LENGTH_SPREAD;
        let speed = AGENT_MIN_SPEED + self.rng.gen::<f64>() * AGENT_SPEED_SPREAD;
        let color = AGENT_COLOR_POOL[self.rng.gen_range(0..AGENT_COLOR_POOL.len())];
        let id = self.next_agent_id;
        self.next_agent_id = self.next_agent_id.wrapping_add(1);

        self.agents.push(Agent {
            id,
            color: color.to_string(),
            speed,
            boost_speed: AGENT_BOOST_SPEED,
            turn_rate: AGENT_TURN_RATE,
            body: create_body(BodyKind::Agent, position, heading, length),
        });
        tracing::debug!(agent_id = id, "agent spawned");
    }

    pub(super) fn remove_dead_agents(&mut self) {
        self.agents.retain(|agent| agent.body.alive);
    }

    pub(super) fn maybe_spawn_agent(&mut self) {
        if !self.settings.agents_enabled || self.agents.len() >= AGENT_CAP {
            return;
        }
        if self.rng.gen::<f64>() < AGENT_SPAWN_CHANCE {
            self.spawn_agent();
        }
    }

    pub(super) fn replenish_pellets(&mut self) {
        if self.pellets.len() < self.settings.pellet_floor {
            self.spawn_pellets(PELLET_REFILL_BATCH);
        }
    }
}
