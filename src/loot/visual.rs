//! Presentation state of a dropped item
//!
//! Nothing here is rendered; it is the data a renderer would read.

use crate::items::Rarity;

/// Rarity-driven look, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RarityVisual {
    pub tint: (u8, u8, u8),
    pub light_intensity: f32,
    pub light_range: f32,
    /// Particles per second
    pub particle_rate: f32,
    pub base_scale: f32,
}

impl RarityVisual {
    pub fn for_rarity(rarity: Rarity) -> Self {
        let tier = f32::from(rarity.ordinal());
        Self {
            tint: rarity.color(),
            light_intensity: 0.5 + 0.5 * tier,
            light_range: 1.5 + 0.75 * tier,
            particle_rate: 2.0 + 6.0 * tier,
            base_scale: 1.0 + 0.05 * tier,
        }
    }
}

/// Animated values, updated every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub rarity: RarityVisual,
    /// Yaw in radians
    pub rotation: f32,
    pub bob_offset: f32,
    pub scale: f32,
    pub opacity: f32,
    phase: f32,
}

impl VisualState {
    pub fn new(rarity: Rarity) -> Self {
        let rarity = RarityVisual::for_rarity(rarity);
        Self {
            rarity,
            rotation: 0.0,
            bob_offset: 0.0,
            scale: rarity.base_scale,
            opacity: 1.0,
            phase: 0.0,
        }
    }

    /// Spin, bob and pulse
    pub fn animate(&mut self, dt: f32, rotate_speed: f32, bob: (f32, f32), pulse: (f32, f32)) {
        let (bob_height, bob_speed) = bob;
        let (pulse_amount, pulse_speed) = pulse;

        self.phase += dt;
        self.rotation = (self.rotation + rotate_speed * dt).rem_euclid(std::f32::consts::TAU);
        self.bob_offset = (self.phase * bob_speed).sin() * bob_height;
        self.scale = self.rarity.base_scale * (1.0 + (self.phase * pulse_speed).sin() * pulse_amount);
    }

    /// Stop bobbing, keep orientation
    pub fn rest(&mut self) {
        self.bob_offset = 0.0;
        self.scale = self.rarity.base_scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visuals_scale_with_rarity() {
        let mut last = RarityVisual::for_rarity(Rarity::Common);
        for rarity in Rarity::ALL.into_iter().skip(1) {
            let next = RarityVisual::for_rarity(rarity);
            assert!(next.light_intensity > last.light_intensity);
            assert!(next.light_range > last.light_range);
            assert!(next.particle_rate > last.particle_rate);
            last = next;
        }
    }

    #[test]
    fn test_animation_stays_bounded() {
        let mut visual = VisualState::new(Rarity::Epic);
        for _ in 0..500 {
            visual.animate(0.05, 2.0, (0.1, 2.0), (0.05, 3.0));
            assert!(visual.bob_offset.abs() <= 0.1 + 1e-6);
            assert!((0.0..std::f32::consts::TAU).contains(&visual.rotation));
            let base = visual.rarity.base_scale;
            assert!((visual.scale - base).abs() <= base * 0.05 + 1e-6);
        }
    }
}
