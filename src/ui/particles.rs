//! Drifting particle background
//!
//! The terminal rendition of the dashboard's animated backdrop: a fixed
//! population of points drifting slowly upward through a 100x100 canvas,
//! respawning at the bottom edge. Advanced once per UI tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Canvas extent on both axes.
pub const FIELD_SIZE: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
struct Particle {
    x: f64,
    y: f64,
    dx: f64,
    dy: f64,
}

/// Fixed-population particle field
#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(count: usize) -> Self {
        Self::from_rng(count, StdRng::from_entropy())
    }

    /// Deterministic field for tests.
    pub fn with_seed(count: usize, seed: u64) -> Self {
        Self::from_rng(count, StdRng::seed_from_u64(seed))
    }

    fn from_rng(count: usize, mut rng: StdRng) -> Self {
        let particles = (0..count).map(|_| spawn(&mut rng, false)).collect();
        Self { particles, rng }
    }

    /// Move every particle one step, recycling those that leave the top.
    pub fn advance(&mut self) {
        for particle in &mut self.particles {
            particle.x += particle.dx;
            particle.y += particle.dy;

            if particle.x < 0.0 {
                particle.x += FIELD_SIZE;
            } else if particle.x >= FIELD_SIZE {
                particle.x -= FIELD_SIZE;
            }

            if particle.y >= FIELD_SIZE {
                *particle = spawn(&mut self.rng, true);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Current positions for the canvas painter.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.particles.iter().map(|p| (p.x, p.y)).collect()
    }
}

fn spawn(rng: &mut StdRng, at_bottom: bool) -> Particle {
    Particle {
        x: rng.gen_range(0.0..FIELD_SIZE),
        y: if at_bottom {
            0.0
        } else {
            rng.gen_range(0.0..FIELD_SIZE)
        },
        dx: rng.gen_range(-0.2..0.2),
        dy: rng.gen_range(0.1..0.5),
    }
}
