//! Bounded pool of decaying particles.
//!
//! Particles are spawned in bursts, move with constant velocity, and lose a
//! fixed amount of life per tick. The pool is a FIFO ring: when full, the
//! oldest particle is evicted to make room.

use std::collections::VecDeque;
use std::f64::consts::TAU;

use blinkbeat_common::config::ParticleConfig;
use blinkbeat_model::effect::{EmitDirection, ParticleBurst, ParticleSprite, Rgb};
use blinkbeat_model::geometry::Point2D;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const MAX_RADIUS: f64 = 3.0;
const MAX_OPACITY: f64 = 0.6;

/// One live particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Point2D,
    pub velocity: Point2D,
    pub life: i32,
    pub color: Rgb,
    pub direction: EmitDirection,
}

impl Particle {
    /// Remaining life as a fraction of `initial_life`, clamped to [0, 1].
    pub fn life_fraction(&self, initial_life: i32) -> f64 {
        if initial_life <= 0 {
            return 0.0;
        }
        (self.life as f64 / initial_life as f64).clamp(0.0, 1.0)
    }

    /// Draw radius in pixels: `floor(3 * fraction)`.
    pub fn radius(&self, initial_life: i32) -> u32 {
        (MAX_RADIUS * self.life_fraction(initial_life)).floor() as u32
    }

    /// Draw opacity: `0.6 * fraction`.
    pub fn opacity(&self, initial_life: i32) -> f64 {
        MAX_OPACITY * self.life_fraction(initial_life)
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

/// Fixed-capacity particle pool with a seeded velocity generator.
#[derive(Debug)]
pub struct ParticlePool {
    particles: VecDeque<Particle>,
    capacity: usize,
    initial_life: i32,
    decay_step: i32,
    rng: ChaCha8Rng,
}

impl ParticlePool {
    /// Create a pool. Without a configured seed the generator is seeded
    /// from OS entropy.
    pub fn new(config: &ParticleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let capacity = config.capacity.max(1);
        Self {
            particles: VecDeque::with_capacity(capacity),
            capacity,
            initial_life: config.initial_life,
            decay_step: config.decay_step,
            rng,
        }
    }

    /// Spawn `count` particles at `origin`, evicting the oldest on overflow.
    pub fn emit(&mut self, origin: Point2D, color: Rgb, count: usize, direction: EmitDirection) {
        for _ in 0..count {
            let velocity = self.sample_velocity(direction);
            if self.particles.len() == self.capacity {
                self.particles.pop_front();
            }
            self.particles.push_back(Particle {
                position: origin,
                velocity,
                life: self.initial_life,
                color,
                direction,
            });
        }
    }

    pub fn emit_burst(&mut self, burst: &ParticleBurst) {
        self.emit(burst.origin, burst.color, burst.count, burst.direction);
    }

    /// Advance one frame: move, decay, and drop dead particles.
    pub fn tick(&mut self) {
        let step = self.decay_step;
        for p in self.particles.iter_mut() {
            p.position.x += p.velocity.x;
            p.position.y += p.velocity.y;
            p.life = p.life.saturating_sub(step);
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn initial_life(&self) -> i32 {
        self.initial_life
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Render snapshot of every live particle, oldest first.
    pub fn sprites(&self) -> Vec<ParticleSprite> {
        self.particles
            .iter()
            .map(|p| ParticleSprite {
                position: p.position,
                radius: p.radius(self.initial_life),
                opacity: p.opacity(self.initial_life),
                color: p.color,
            })
            .collect()
    }

    fn sample_velocity(&mut self, direction: EmitDirection) -> Point2D {
        match direction {
            EmitDirection::Leftward => Point2D::new(
                self.rng.gen_range(-3.0..=-1.0),
                self.rng.gen_range(-2.0..=2.0),
            ),
            EmitDirection::Rightward => Point2D::new(
                self.rng.gen_range(1.0..=3.0),
                self.rng.gen_range(-2.0..=2.0),
            ),
            EmitDirection::RadialBurst => {
                let angle: f64 = self.rng.gen_range(0.0..TAU);
                let speed: f64 = self.rng.gen_range(2.0..=4.0);
                Point2D::new(speed * angle.cos(), speed * angle.sin())
            }
            EmitDirection::Isotropic => Point2D::new(
                self.rng.gen_range(-2.0..=2.0),
                self.rng.gen_range(-2.0..=2.0),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pool() -> ParticlePool {
        ParticlePool::new(&ParticleConfig {
            seed: Some(7),
            ..ParticleConfig::default()
        })
    }

    const ORIGIN: Point2D = Point2D { x: 100.0, y: 100.0 };
    const BLUE: Rgb = Rgb([0, 100, 255]);

    #[test]
    fn test_emit_adds_particles_at_origin() {
        let mut pool = pool();
        pool.emit(ORIGIN, BLUE, 30, EmitDirection::Leftward);
        assert_eq!(pool.len(), 30);
        assert!(pool.iter().all(|p| p.position == ORIGIN && p.life == 100));
    }

    #[test]
    fn test_velocity_ranges_per_direction() {
        let mut pool = pool();
        pool.emit(ORIGIN, BLUE, 100, EmitDirection::Leftward);
        pool.emit(ORIGIN, BLUE, 100, EmitDirection::Rightward);
        pool.emit(ORIGIN, BLUE, 100, EmitDirection::RadialBurst);
        pool.emit(ORIGIN, BLUE, 100, EmitDirection::Isotropic);

        for p in pool.iter() {
            let v = p.velocity;
            match p.direction {
                EmitDirection::Leftward => {
                    assert!((-3.0..=-1.0).contains(&v.x));
                    assert!((-2.0..=2.0).contains(&v.y));
                }
                EmitDirection::Rightward => {
                    assert!((1.0..=3.0).contains(&v.x));
                    assert!((-2.0..=2.0).contains(&v.y));
                }
                EmitDirection::RadialBurst => {
                    let speed = (v.x * v.x + v.y * v.y).sqrt();
                    assert!((2.0 - 1e-9..=4.0 + 1e-9).contains(&speed));
                }
                EmitDirection::Isotropic => {
                    assert!((-2.0..=2.0).contains(&v.x));
                    assert!((-2.0..=2.0).contains(&v.y));
                }
            }
        }
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut pool = pool();
        pool.emit(ORIGIN, Rgb([1, 1, 1]), 400, EmitDirection::Isotropic);
        pool.emit(ORIGIN, Rgb([2, 2, 2]), 200, EmitDirection::Isotropic);
        assert_eq!(pool.len(), 500);
        let old = pool.iter().filter(|p| p.color == Rgb([1, 1, 1])).count();
        assert_eq!(old, 300);
        assert_eq!(pool.iter().next().map(|p| p.color), Some(Rgb([1, 1, 1])));
        assert_eq!(pool.iter().last().map(|p| p.color), Some(Rgb([2, 2, 2])));
    }

    #[test]
    fn test_particle_dies_after_life_over_step_ticks() {
        let mut pool = pool();
        pool.emit(ORIGIN, BLUE, 5, EmitDirection::Rightward);
        for _ in 0..49 {
            pool.tick();
        }
        assert_eq!(pool.len(), 5);
        assert!(pool.iter().all(|p| p.life == 2));
        pool.tick();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_tick_moves_by_velocity() {
        let mut pool = pool();
        pool.emit(ORIGIN, BLUE, 1, EmitDirection::Rightward);
        let v = pool.iter().next().map(|p| p.velocity).unwrap();
        pool.tick();
        pool.tick();
        let p = pool.iter().next().unwrap();
        assert!((p.position.x - (100.0 + 2.0 * v.x)).abs() < 1e-9);
        assert!((p.position.y - (100.0 + 2.0 * v.y)).abs() < 1e-9);
    }

    #[test]
    fn test_radius_and_opacity_decay() {
        let mut pool = pool();
        pool.emit(ORIGIN, BLUE, 1, EmitDirection::Isotropic);
        let first = pool.sprites()[0];
        assert_eq!(first.radius, 3);
        assert!((first.opacity - 0.6).abs() < 1e-9);

        let mut prev = first;
        while !pool.is_empty() {
            let s = pool.sprites()[0];
            assert!(s.radius <= prev.radius);
            assert!(s.opacity <= prev.opacity);
            prev = s;
            pool.tick();
        }
        // Last frame alive: life 2 of 100
        assert_eq!(prev.radius, 0);
    }

    #[test]
    fn test_same_seed_same_velocities() {
        let mut a = pool();
        let mut b = pool();
        a.emit(ORIGIN, BLUE, 20, EmitDirection::RadialBurst);
        b.emit(ORIGIN, BLUE, 20, EmitDirection::RadialBurst);
        let va: Vec<Point2D> = a.iter().map(|p| p.velocity).collect();
        let vb: Vec<Point2D> = b.iter().map(|p| p.velocity).collect();
        assert_eq!(va, vb);
    }

    #[test]
    fn test_clear_empties_pool() {
        let mut pool = pool();
        pool.emit(ORIGIN, BLUE, 10, EmitDirection::Leftward);
        pool.clear();
        assert!(pool.is_empty());
        assert!(pool.sprites().is_empty());
    }

    proptest! {
        #[test]
        fn pool_never_exceeds_capacity(
            capacity in 1usize..64,
            ops in proptest::collection::vec((0usize..40, any::<bool>()), 0..40),
        ) {
            let mut pool = ParticlePool::new(&ParticleConfig {
                capacity,
                seed: Some(1),
                ..ParticleConfig::default()
            });
            for (count, tick) in ops {
                pool.emit(ORIGIN, BLUE, count, EmitDirection::Isotropic);
                prop_assert!(pool.len() <= capacity);
                if tick {
                    pool.tick();
                }
                prop_assert!(pool.len() <= capacity);
            }
        }
    }
}
