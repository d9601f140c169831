//! Effect requests produced by event dispatch and consumed by the audio
//! and particle collaborators.

use serde::{Deserialize, Serialize};

use crate::frame::BlinkKind;
use crate::geometry::Point2D;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }
}

/// Initial-velocity distribution for emitted particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitDirection {
    /// Drifts left: negative horizontal velocity.
    Leftward,
    /// Drifts right: positive horizontal velocity.
    Rightward,
    /// Uniform angle, fixed speed band.
    RadialBurst,
    /// Both axes sampled independently.
    Isotropic,
}

impl EmitDirection {
    /// Direction paired with each blink kind.
    pub fn for_kind(kind: BlinkKind) -> Self {
        match kind {
            BlinkKind::Left => Self::Leftward,
            BlinkKind::Right => Self::Rightward,
            BlinkKind::Both => Self::RadialBurst,
        }
    }
}

/// A request to spawn particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub origin: Point2D,
    pub color: Rgb,
    pub count: usize,
    pub direction: EmitDirection,
}

/// Renderable snapshot of one live particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSprite {
    pub position: Point2D,
    /// Radius in whole pixels; 0 means nothing to draw.
    pub radius: u32,
    /// Blend opacity in [0.0, 0.6].
    pub opacity: f64,
    pub color: Rgb,
}

/// What one blink event should trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlinkAction {
    pub kind: BlinkKind,
    /// Sound key handed to the audio collaborator.
    pub sound_key: String,
    /// Particles to spawn.
    pub burst: ParticleBurst,
    /// Short overlay label, e.g. `SNARE!`.
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_for_kind() {
        assert_eq!(EmitDirection::for_kind(BlinkKind::Left), EmitDirection::Leftward);
        assert_eq!(EmitDirection::for_kind(BlinkKind::Right), EmitDirection::Rightward);
        assert_eq!(EmitDirection::for_kind(BlinkKind::Both), EmitDirection::RadialBurst);
    }

    #[test]
    fn test_rgb_channels() {
        let c = Rgb([1, 2, 3]);
        assert_eq!((c.r(), c.g(), c.b()), (1, 2, 3));
    }
}
