use std::collections::VecDeque;
use std::f64::consts::{PI, TAU};

use log::{debug, warn};

use crate::{
    config,
    geometry::clip::draw_clipped,
    render::Surface,
    types::{AttractorConfig, PathSegment, Rgb, Vec2},
};

pub type ParticleId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecayReason {
    Escaped,
    Absorbed,
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleState {
    Alive,
    /// No new trail points are recorded; the trail ages out.
    Decaying(DecayReason),
    Dead,
}

#[derive(Clone, Debug)]
pub struct Particle {
    id: ParticleId,
    dist: f64,
    angle: f64,
    last_dist: f64,
    last_angle: f64,
    age: f64,
    last_age: f64,
    accumulated_time: f64,
    trail: VecDeque<PathSegment>,
    state: ParticleState,
}

impl Particle {
    /// Creates a particle at `pos` moving with `velocity` (scene units per
    /// second). The previous integrator state is one physics step back along
    /// the velocity.
    pub fn new(id: ParticleId, pos: Vec2, velocity: Vec2) -> Self {
        let previous = pos - velocity * config::PHYSICS_STEP;
        let angle = pos.angle();
        Self {
            id,
            dist: pos.length(),
            angle,
            last_dist: previous.length(),
            // Keep the angle continuous across the atan2 branch cut.
            last_angle: angle - wrap_angle(angle - previous.angle()),
            age: 0.0,
            // The first step sees an age delta of 1.0 rather than one physics step.
            last_age: -1.0,
            accumulated_time: 0.0,
            trail: VecDeque::new(),
            state: ParticleState::Alive,
        }
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn dist(&self) -> f64 {
        self.dist
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn accumulated_time(&self) -> f64 {
        self.accumulated_time
    }

    pub fn trail(&self) -> &VecDeque<PathSegment> {
        &self.trail
    }

    pub fn state(&self) -> ParticleState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.state, ParticleState::Alive)
    }

    pub fn is_decaying(&self) -> bool {
        matches!(self.state, ParticleState::Decaying(_))
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.state, ParticleState::Dead)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::from_polar(self.dist, self.angle)
    }

    pub fn previous_position(&self) -> Vec2 {
        Vec2::from_polar(self.last_dist, self.last_angle)
    }

    /// Position blended towards the next step by the unconsumed time, so the
    /// head of the trail moves smoothly between fixed steps.
    pub fn render_position(&self, attractor: &AttractorConfig) -> Vec2 {
        if !self.is_alive() {
            return self.position();
        }
        let (next_dist, next_angle) = self.next_state(attractor);
        let t = self.accumulated_time / config::PHYSICS_STEP;
        Vec2::from_polar(
            self.dist + (next_dist - self.dist) * t,
            self.angle + (next_angle - self.angle) * t,
        )
    }

    pub fn update(&mut self, delta_t: f64, attractor: &AttractorConfig) {
        if !delta_t.is_finite() {
            warn!("particle {} ignored non-finite delta {}", self.id, delta_t);
            return;
        }
        self.accumulated_time += delta_t.max(0.0);
        while self.accumulated_time >= config::PHYSICS_STEP {
            self.step(attractor);
            self.accumulated_time -= config::PHYSICS_STEP;
        }
    }

    fn step(&mut self, attractor: &AttractorConfig) {
        match self.state {
            ParticleState::Dead => return,
            ParticleState::Decaying(_) => {
                self.advance_age();
                if self.trail.is_empty() {
                    debug!("particle {} dead at age {:.3}", self.id, self.age);
                    self.state = ParticleState::Dead;
                }
                return;
            }
            ParticleState::Alive => {}
        }

        let pos = self.position();
        self.trail.push_back(PathSegment {
            x: pos.x,
            y: pos.y,
            age: self.age,
        });

        let (next_dist, next_angle) = self.next_state(attractor);
        self.last_dist = self.dist;
        self.last_angle = self.angle;
        self.dist = next_dist;
        self.angle = next_angle;
        self.advance_age();

        if let Some(reason) = self.decay_reason(attractor) {
            debug!(
                "particle {} decaying ({:?}) at dist {:.1}, age {:.3}",
                self.id, reason, self.dist, self.age
            );
            self.state = ParticleState::Decaying(reason);
        }
    }

    fn advance_age(&mut self) {
        self.last_age = self.age;
        self.age += config::PHYSICS_STEP;
        let oldest = self.age - config::PATH_MAX_AGE;
        while self.trail.front().is_some_and(|s| s.age < oldest) {
            self.trail.pop_front();
        }
    }

    // Central difference of the polar equations of motion.
    fn next_state(&self, attractor: &AttractorConfig) -> (f64, f64) {
        let age_delta = self.age - self.last_age;
        let radial_rate = (self.dist - self.last_dist) / age_delta;
        let angular_rate = (self.angle - self.last_angle) / age_delta;

        let radial_acc = self.dist * angular_rate * angular_rate
            - config::GRAVITATIONAL_CONSTANT * attractor.weight / (self.dist * self.dist);
        let angular_acc = -2.0 * radial_rate * angular_rate / self.dist;

        let h_sq = config::PHYSICS_STEP * config::PHYSICS_STEP;
        (
            2.0 * self.dist - self.last_dist + radial_acc * h_sq,
            2.0 * self.angle - self.last_angle + angular_acc * h_sq,
        )
    }

    fn decay_reason(&self, attractor: &AttractorConfig) -> Option<DecayReason> {
        if !self.dist.is_finite() || !self.angle.is_finite() {
            warn!(
                "particle {} left the valid domain (dist {}, angle {}), treating as absorbed",
                self.id, self.dist, self.angle
            );
            return Some(DecayReason::Absorbed);
        }
        if self.dist > config::ESCAPE_FACTOR * config::VIEWPORT_RADIUS {
            Some(DecayReason::Escaped)
        } else if self.dist <= attractor.size {
            Some(DecayReason::Absorbed)
        } else if self.age > config::MAX_AGE {
            Some(DecayReason::Expired)
        } else {
            None
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, attractor: &AttractorConfig) {
        let Some(first) = self.trail.front() else {
            return;
        };

        surface.set_stroke_color(Rgb::TRAIL);
        surface.set_line_width(1.0);

        let mut from = first.pos();
        for segment in self.trail.iter().skip(1) {
            let to = segment.pos();
            draw_clipped(surface, from, to, attractor);
            from = to;
        }
        draw_clipped(surface, from, self.render_position(attractor), attractor);
    }
}

fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}
