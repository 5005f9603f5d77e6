use super::constants::{
    AGENT_PELLET_GROWTH, AGENT_PELLET_MARGIN, PLAYER_PELLET_GROWTH, PLAYER_PELLET_MARGIN,
    TRAIL_SKIP_RECENT, TRAIL_STRIKE_SLACK, TRAIL_STRIKE_STRIDE,
};
use super::math::collision;
use super::types::{Body, Killer, Point};
use super::world::World;

pub fn heads_touch(a: &Body, b: &Body) -> bool {
    collision(a.position, b.position, a.radius + b.radius)
}

/// True when `striker`'s head lands on `owner`'s trail. The newest samples are
/// skipped since they sit under the owner's own head.
pub fn strikes_trail(striker: &Body, owner: &Body) -> bool {
    let reach = striker.radius + owner.radius - TRAIL_STRIKE_SLACK;
    owner
        .trail
        .iter()
        .skip(TRAIL_SKIP_RECENT)
        .step_by(TRAIL_STRIKE_STRIDE)
        .any(|point| collision(striker.position, *point, reach))
}

pub fn reaches_pellet(body: &Body, pellet: Point, margin: f64) -> bool {
    collision(body.position, pellet, body.radius + margin)
}

impl World {
    pub(super) fn resolve_player_contacts(&mut self) {
        let count = self.players.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let a = &self.players[i];
                let b = &self.players[j];
                if !a.body.alive || !b.body.alive {
                    continue;
                }
                let (seat_a, seat_b) = (a.seat, b.seat);
                if heads_touch(&a.body, &b.body) {
                    self.kill_player(i, None);
                    self.kill_player(j, None);
                } else if strikes_trail(&a.body, &b.body) {
                    self.kill_player(i, Some(Killer::Player(seat_b)));
                } else if strikes_trail(&b.body, &a.body) {
                    self.kill_player(j, Some(Killer::Player(seat_a)));
                }
            }
        }
    }

    /// Contacts for one agent right after it moved: against every living
    /// player, then against the other agents.
    pub(super) fn resolve_agent_contacts(&mut self, index: usize) {
        for player_index in 0..self.players.len() {
            let agent = &self.agents[index];
            let player = &self.players[player_index];
            if !agent.body.alive {
                return;
            }
            if !player.body.alive {
                continue;
            }
            let (agent_id, seat) = (agent.id, player.seat);
            if heads_touch(&player.body, &agent.body) {
                self.kill_player(player_index, None);
                self.kill_agent(index, None);
            } else if strikes_trail(&player.body, &agent.body) {
                self.kill_player(player_index, Some(Killer::Agent(agent_id)));
            } else if strikes_trail(&agent.body, &player.body) {
                self.kill_agent(index, Some(Killer::Player(seat)));
            }
        }

        for other_index in 0..self.agents.len() {
            if other_index == index {
                continue;
            }
            let agent = &self.agents[index];
            let other = &self.agents[other_index];
            if !agent.body.alive {
                return;
            }
            if !other.body.alive {
                continue;
            }
            let other_id = other.id;
            if heads_touch(&agent.body, &other.body) {
                self.kill_agent(index, None);
                self.kill_agent(other_index, None);
            } else if strikes_trail(&agent.body, &other.body) {
                self.kill_agent(index, Some(Killer::Agent(other_id)));
            }
        }
    }

    pub(super) fn consume_player_pellets(&mut self) {
        let mut i = self.pellets.len();
        while i > 0 {
            i -= 1;
            let pellet = self.pellets[i];
            let eater = self.players.iter().position(|player| {
                player.body.alive && reaches_pellet(&player.body, pellet, PLAYER_PELLET_MARGIN)
            });
            let Some(eater) = eater else { continue };
            self.pellets.remove(i);
            self.players[eater].body.grow(PLAYER_PELLET_GROWTH);
        }
    }

    pub(super) fn consume_agent_pellets(&mut self, index: usize) {
        let mut i = self.pellets.len();
        while i > 0 {
            i -= 1;
            let agent = &self.agents[index];
            if !agent.body.alive {
                return;
            }
            if !reaches_pellet(&agent.body, self.pellets[i], AGENT_PELLET_MARGIN) {
                continue;
            }
            self.pellets.remove(i);
            self.agents[index].body.grow(AGENT_PELLET_GROWTH);
        }
    }
}
