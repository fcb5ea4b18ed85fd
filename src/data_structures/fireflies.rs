//! The firefly particle field.
//!
//! Two flat attribute buffers, generated once: `positions` holds `x, y, z` per
//! firefly and `scales` one size multiplier per firefly. The renderer uploads
//! them unchanged as per-instance vertex data.

use rand::Rng;

/// Half the side length of the square the fireflies hover over.
pub const HALF_EXTENT: f32 = 2.0;
/// Maximum hover height.
pub const MAX_HEIGHT: f32 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct FireflyField {
    pub positions: Vec<f32>,
    pub scales: Vec<f32>,
}

impl FireflyField {
    /// Generate `count` fireflies from the thread-local random source.
    pub fn new(count: usize) -> Self {
        Self::generate(count, &mut rand::thread_rng())
    }

    /// Generate `count` fireflies with independent uniform draws per component:
    /// x and z in `[-2, 2)`, y in `[0, 1.5)`, scale in `[0, 1)`.
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut positions = vec![0.0; count * 3];
        let mut scales = vec![0.0; count];

        for (position, scale) in positions.chunks_exact_mut(3).zip(scales.iter_mut()) {
            position[0] = (rng.gen_range(0.0_f32..1.0) - 0.5) * HALF_EXTENT * 2.0;
            position[1] = rng.gen_range(0.0_f32..1.0) * MAX_HEIGHT;
            position[2] = (rng.gen_range(0.0_f32..1.0) - 0.5) * HALF_EXTENT * 2.0;

            *scale = rng.gen_range(0.0_f32..1.0);
        }

        Self { positions, scales }
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn position(&self, idx: usize) -> Option<[f32; 3]> {
        let p = self.positions.get(idx * 3..idx * 3 + 3)?;
        Some([p[0], p[1], p[2]])
    }
}
