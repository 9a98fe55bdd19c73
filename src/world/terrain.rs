//! Terrain surfaces
//!
//! Ground height queries used for landing contacts and the downward
//! grounding probe.

use glam::Vec3;

/// A static supporting surface
pub trait Terrain {
    /// Surface height at (x, z), or `None` where there is no ground
    fn ground_height(&self, x: f32, z: f32) -> Option<f32>;

    /// Cast a ray straight down from `origin`. Returns the contact point if
    /// the surface lies within `max_distance` below the origin.
    fn probe_down(&self, origin: Vec3, max_distance: f32) -> Option<Vec3> {
        let height = self.ground_height(origin.x, origin.z)?;
        let drop = origin.y - height;
        (0.0..=max_distance)
            .contains(&drop)
            .then(|| Vec3::new(origin.x, height, origin.z))
    }
}

/// Infinite flat plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl Default for FlatTerrain {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Terrain for FlatTerrain {
    fn ground_height(&self, _x: f32, _z: f32) -> Option<f32> {
        Some(self.height)
    }
}

/// Regular grid of heights, sampled bilinearly
#[derive(Debug, Clone)]
pub struct HeightField {
    origin_x: f32,
    origin_z: f32,
    cell_size: f32,
    width: usize,
    depth: usize,
    heights: Vec<f32>,
}

impl HeightField {
    /// Build from row-major heights (`depth` rows of `width` samples).
    /// Returns `None` if the dimensions do not match or are too small.
    pub fn new(
        origin_x: f32,
        origin_z: f32,
        cell_size: f32,
        width: usize,
        depth: usize,
        heights: Vec<f32>,
    ) -> Option<Self> {
        if width < 2 || depth < 2 || cell_size <= 0.0 || heights.len() != width * depth {
            return None;
        }
        Some(Self { origin_x, origin_z, cell_size, width, depth, heights })
    }

    /// Build by sampling `f(x, z)` at every grid point
    pub fn from_fn(
        origin_x: f32,
        origin_z: f32,
        cell_size: f32,
        width: usize,
        depth: usize,
        f: impl Fn(f32, f32) -> f32,
    ) -> Option<Self> {
        let mut heights = Vec::with_capacity(width * depth);
        for row in 0..depth {
            for col in 0..width {
                let x = origin_x + col as f32 * cell_size;
                let z = origin_z + row as f32 * cell_size;
                heights.push(f(x, z));
            }
        }
        Self::new(origin_x, origin_z, cell_size, width, depth, heights)
    }

    fn at(&self, col: usize, row: usize) -> f32 {
        self.heights[row * self.width + col]
    }
}

impl Terrain for HeightField {
    fn ground_height(&self, x: f32, z: f32) -> Option<f32> {
        let gx = (x - self.origin_x) / self.cell_size;
        let gz = (z - self.origin_z) / self.cell_size;
        let max_x = (self.width - 1) as f32;
        let max_z = (self.depth - 1) as f32;
        if !(0.0..=max_x).contains(&gx) || !(0.0..=max_z).contains(&gz) {
            return None;
        }

        let col = (gx.floor() as usize).min(self.width - 2);
        let row = (gz.floor() as usize).min(self.depth - 2);
        let tx = gx - col as f32;
        let tz = gz - row as f32;

        let near = self.at(col, row) * (1.0 - tx) + self.at(col + 1, row) * tx;
        let far = self.at(col, row + 1) * (1.0 - tx) + self.at(col + 1, row + 1) * tx;
        Some(near * (1.0 - tz) + far * tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_probe() {
        let ground = FlatTerrain::new(1.0);
        assert_eq!(ground.probe_down(Vec3::new(3.0, 2.0, 4.0), 5.0), Some(Vec3::new(3.0, 1.0, 4.0)));
        assert!(ground.probe_down(Vec3::new(0.0, 10.0, 0.0), 5.0).is_none());
        assert!(ground.probe_down(Vec3::new(0.0, 0.5, 0.0), 5.0).is_none());
    }

    #[test]
    fn test_heightfield_bilinear() {
        // Slope rising along x: h = x
        let field = HeightField::from_fn(0.0, 0.0, 1.0, 3, 3, |x, _| x).unwrap();
        assert_eq!(field.ground_height(0.0, 0.0), Some(0.0));
        assert_eq!(field.ground_height(2.0, 2.0), Some(2.0));
        let mid = field.ground_height(1.5, 0.5).unwrap();
        assert!((mid - 1.5).abs() < 1e-5);
        assert!(field.ground_height(-0.1, 1.0).is_none());
        assert!(field.ground_height(1.0, 2.5).is_none());
    }

    #[test]
    fn test_heightfield_rejects_bad_dimensions() {
        assert!(HeightField::new(0.0, 0.0, 1.0, 2, 2, vec![0.0; 3]).is_none());
        assert!(HeightField::new(0.0, 0.0, 0.0, 2, 2, vec![0.0; 4]).is_none());
        assert!(HeightField::new(0.0, 0.0, 1.0, 1, 4, vec![0.0; 4]).is_none());
    }
}
