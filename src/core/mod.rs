pub mod particle;

use std::f64::consts::TAU;

use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    config,
    render::Surface,
    types::{AttractorConfig, Rgb, Vec2},
};

pub use particle::{Particle, ParticleId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub alive: usize,
    pub decaying: usize,
    pub spawned: u64,
}

/// Owns the particles and the frame clock. The embedding application calls
/// [`Simulation::tick`] once per frame; play and pause only flip state.
pub struct Simulation {
    particles: Vec<Particle>,
    attractor: AttractorConfig,
    time: f64,
    last_update: Option<f64>,
    paused: bool,
    spawn_accumulator: f64,
    rng: StdRng,
    next_id: ParticleId,
}

impl Simulation {
    pub fn new(attractor: AttractorConfig) -> Self {
        Self::with_rng(attractor, StdRng::from_entropy())
    }

    pub fn with_seed(attractor: AttractorConfig, seed: u64) -> Self {
        Self::with_rng(attractor, StdRng::seed_from_u64(seed))
    }

    fn with_rng(attractor: AttractorConfig, rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            attractor,
            time: 0.0,
            last_update: None,
            paused: true,
            spawn_accumulator: 0.0,
            rng,
            next_id: 1,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn attractor(&self) -> AttractorConfig {
        self.attractor
    }

    pub fn set_attractor(&mut self, attractor: AttractorConfig) {
        info!(
            "attractor resized to {:.1} (weight {:.3e})",
            attractor.size, attractor.weight
        );
        self.attractor = attractor;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn play(&mut self) {
        if self.paused {
            info!("simulation resumed");
            self.paused = false;
            // The first frame after resuming measures no elapsed time.
            self.last_update = None;
        }
    }

    pub fn pause(&mut self) {
        if !self.paused {
            info!("simulation paused at {:.2}s", self.time);
        }
        self.paused = true;
    }

    pub fn clear(&mut self) {
        info!("cleared {} particles", self.particles.len());
        self.particles.clear();
    }

    /// Launches a particle from a random point on the viewport rim, aimed
    /// inwards but turned 45 to 81 degrees off the center.
    pub fn spawn(&mut self) -> ParticleId {
        let rim_angle = self.rng.gen_range(0.0..TAU);
        let pos = Vec2::from_polar(config::VIEWPORT_RADIUS, rim_angle);

        let mut turn = self
            .rng
            .gen_range(config::LAUNCH_ANGLE_MIN..config::LAUNCH_ANGLE_MAX);
        if self.rng.gen_bool(0.5) {
            turn = -turn;
        }
        let velocity = (-pos).rotate(turn).normalize() * config::LAUNCH_SPEED;

        let id = self.next_id();
        debug!(
            "spawned particle {} at rim angle {:.3}, turn {:.3}",
            id, rim_angle, turn
        );
        self.particles.push(Particle::new(id, pos, velocity));
        id
    }

    fn next_id(&mut self) -> ParticleId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn update(&mut self, delta_t: f64) {
        let attractor = self.attractor;
        for particle in &mut self.particles {
            particle.update(delta_t, &attractor);
        }
        self.particles.retain(|p| {
            if p.is_dead() {
                debug!("removed particle {} at age {:.3}", p.id(), p.age());
            }
            !p.is_dead()
        });

        self.spawn_accumulator += delta_t;
        if self.spawn_accumulator >= config::SPAWN_INTERVAL {
            self.spawn_accumulator = 0.0;
            if !self.paused {
                self.spawn();
            }
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear_rect(0.0, 0.0, config::DIAMETER, config::DIAMETER);
        self.draw_viewport(surface);
        self.draw_attractor(surface);
        for particle in &self.particles {
            particle.render(surface, &self.attractor);
        }
    }

    fn draw_viewport<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.set_fill_color(Rgb::VIEWPORT);
        surface.begin_path();
        surface.ellipse(
            config::RADIUS,
            config::RADIUS,
            config::RADIUS,
            config::RADIUS,
        );
        surface.fill();

        surface.set_stroke_color(Rgb::VIEWPORT_RING);
        surface.set_line_width(2.0);
        surface.begin_path();
        surface.ellipse(
            config::RADIUS,
            config::RADIUS,
            config::VIEWPORT_RADIUS,
            config::VIEWPORT_RADIUS,
        );
        surface.stroke();
    }

    fn draw_attractor<S: Surface + ?Sized>(&self, surface: &mut S) {
        let size = self.attractor.size;
        surface.set_stroke_color(Rgb::BLACK);
        surface.set_fill_color(Rgb::BLACK);
        surface.set_line_width(1.0);
        surface.begin_path();
        surface.ellipse(config::RADIUS, config::RADIUS, size, size);
        surface.fill();
        surface.stroke();
    }

    /// Advances to wall-clock `now` (seconds) and redraws. Returns whether a
    /// frame was produced; paused simulations and zero-length frames do
    /// nothing.
    pub fn tick<S: Surface + ?Sized>(&mut self, now: f64, surface: &mut S) -> bool {
        if self.paused {
            return false;
        }
        let last = *self.last_update.get_or_insert(now);
        let delta_t = now - last;
        self.last_update = Some(now);

        if delta_t <= 0.0 {
            return false;
        }
        self.time += delta_t;
        self.update(delta_t);
        self.draw(surface);
        true
    }

    pub fn stats(&self) -> SimulationStats {
        let mut stats = SimulationStats {
            spawned: self.next_id - 1,
            ..SimulationStats::default()
        };
        for particle in &self.particles {
            if particle.is_alive() {
                stats.alive += 1;
            } else if particle.is_decaying() {
                stats.decaying += 1;
            }
        }
        stats
    }
}
