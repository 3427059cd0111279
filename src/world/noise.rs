//! Deterministic coherent noise built on FastNoiseLite
//!
//! A `NoiseSampler` is constructed once from the world seed and passed to
//! whoever needs it. There is no global random state.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use glam::{Vec2, Vec3};

use crate::constants::NOISE_SAMPLE_OFFSET;

pub struct NoiseSampler {
    noise: FastNoiseLite,
    chunk_width: f32,
    seed: u32,
}

impl NoiseSampler {
    pub fn new(seed: u32, chunk_width: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::Perlin));
        // Scaling is applied per call, so the source runs at unit frequency
        noise.set_frequency(Some(1.0));

        NoiseSampler {
            noise,
            chunk_width: chunk_width as f32,
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    fn transform(&self, value: f32, offset: f32, scale: f32) -> f32 {
        (value + NOISE_SAMPLE_OFFSET) / self.chunk_width * scale + offset
    }

    // FastNoiseLite returns roughly [-1, 1]
    fn normalize(raw: f32) -> f32 {
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Height-map noise in [0, 1].
    pub fn sample_2d(&self, position: Vec2, offset: f32, scale: f32) -> f32 {
        let x = self.transform(position.x, offset, scale);
        let y = self.transform(position.y, offset, scale);
        Self::normalize(self.noise.get_noise_2d(x, y))
    }

    /// Volumetric noise reduced to a boolean against `threshold`.
    pub fn sample_3d(&self, position: Vec3, offset: f32, scale: f32, threshold: f32) -> bool {
        let x = self.transform(position.x, offset, scale);
        let y = self.transform(position.y, offset, scale);
        let z = self.transform(position.z, offset, scale);
        Self::normalize(self.noise.get_noise_3d(x, y, z)) > threshold
    }
}

// Worker threads rebuild their own sampler from the seed
impl Clone for NoiseSampler {
    fn clone(&self) -> Self {
        NoiseSampler::new(self.seed, self.chunk_width as i32)
    }
}
