//! Seeded Perlin noise summed over octaves.

use crate::config::{NOISE_FALLOFF_DEFAULT, NOISE_OCTAVES_DEFAULT};

#[derive(Debug, Clone)]
pub struct Noise {
    seed: u64,
    octaves: u32,
    falloff: f32,
}

impl Noise {
    pub fn new(seed: u64) -> Noise {
        Noise {
            seed,
            octaves: NOISE_OCTAVES_DEFAULT,
            falloff: NOISE_FALLOFF_DEFAULT,
        }
    }

    pub fn seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Non-positive values leave the current setting alone.
    pub fn detail(&mut self, octaves: i32, falloff: Option<f32>) {
        if octaves > 0 {
            self.octaves = octaves as u32;
        }
        if let Some(falloff) = falloff {
            if falloff > 0.0 {
                self.falloff = falloff;
            }
        }
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    pub fn falloff(&self) -> f32 {
        self.falloff
    }

    /// Octave `n` samples at `2^n` times the input frequency with amplitude
    /// `0.5 * falloff^n`. The sum is not clamped.
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let (mut x, mut y, mut z) = (x, y, z);
        let mut amp = 0.5;
        let mut sum = 0.0;
        for _ in 0..self.octaves {
            sum += (perlin_3d(x, y, z, self.seed) / 2.0 + 0.5) * amp;
            x *= 2.0;
            y *= 2.0;
            z *= 2.0;
            amp *= self.falloff;
        }
        sum
    }
}

fn hash(x: i32, y: i32, z: i32, seed: u64) -> u32 {
    let mut h = (seed ^ (seed >> 32)) as u32;
    h = h.wrapping_mul(374761393);
    h = h.wrapping_add((x as u32).wrapping_mul(668265263));
    h = h.wrapping_add((y as u32).wrapping_mul(2654435761));
    h = h.wrapping_add((z as u32).wrapping_mul(2246822519));
    h ^= h >> 13;
    h = h.wrapping_mul(1274126177);
    h ^= h >> 16;
    h
}

fn quintic(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Dot product with one of the twelve cube-edge gradients.
fn gradient(h: u32, x: f32, y: f32, z: f32) -> f32 {
    match h % 12 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x + z,
        5 => -x + z,
        6 => x - z,
        7 => -x - z,
        8 => y + z,
        9 => -y + z,
        10 => y - z,
        _ => -y - z,
    }
}

/// Roughly in `[-1, 1]`, zero on every lattice point.
pub fn perlin_3d(x: f32, y: f32, z: f32, seed: u64) -> f32 {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let z0 = z.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;
    let fz = z - z0 as f32;
    let u = quintic(fx);
    let v = quintic(fy);
    let w = quintic(fz);

    let corner = |dx: i32, dy: i32, dz: i32| {
        gradient(
            hash(x0 + dx, y0 + dy, z0 + dz, seed),
            fx - dx as f32,
            fy - dy as f32,
            fz - dz as f32,
        )
    };

    let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), u);
    let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), u);
    let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), u);
    let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), u);
    let y0v = lerp(x00, x10, v);
    let y1v = lerp(x01, x11, v);
    (lerp(y0v, y1v, w)).clamp(-1.0, 1.0)
}
