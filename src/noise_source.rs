//! Coherent noise used by the synthesis stages.
//!
//! The pipeline only talks to the [`NoiseSource`] trait. [`SeededNoise`] is the
//! implementation used by the generator: simplex fBm and Perlin-gradient domain
//! warping come from the `noise` crate; cellular noise is a jittered-grid Worley
//! lookup because the crate has no second-nearest-distance return type.

use noise::{NoiseFn, Perlin, Simplex};

/// Fractal (fBm) sampling parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalParams {
    pub frequency: f64,
    pub octaves: u32,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
    /// Amplitude multiplier per octave
    pub gain: f64,
}

/// Gradient domain-warp parameters. `octaves == 1` gives a single warp layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpParams {
    pub frequency: f64,
    pub octaves: u32,
    pub lacunarity: f64,
    pub gain: f64,
    /// Maximum displacement of the first layer, in cells
    pub amplitude: f64,
}

/// What a cellular lookup reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellularReturn {
    /// Distance to the nearest feature point
    Distance,
    /// Distance to the second-nearest feature point
    Distance2,
    /// Random value in [-1, 1] attached to the nearest feature point's cell
    CellValue,
}

/// Capability the synthesis stages consume. Implementations must be
/// deterministic for a given seed.
pub trait NoiseSource {
    /// Fractal coherent noise, roughly in [-1, 1].
    fn fractal(&self, x: f64, y: f64, params: &FractalParams) -> f64;

    /// Cellular (Worley) noise at the given frequency.
    fn cellular(&self, x: f64, y: f64, frequency: f64, ret: CellularReturn) -> f64;

    /// Displace a coordinate pair by gradient noise.
    fn warp(&self, x: f64, y: f64, params: &WarpParams) -> (f64, f64);
}

/// Feature points sit within this distance of their cell centre.
const CELL_JITTER: f64 = 0.45;

/// Default [`NoiseSource`] built from a single seed.
#[derive(Clone)]
pub struct SeededNoise {
    seed: u32,
    simplex: Simplex,
    gradient: Perlin,
}

impl SeededNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            simplex: Simplex::new(seed),
            gradient: Perlin::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    fn cell_hash(&self, ix: i64, iy: i64) -> u64 {
        let key = (ix as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (iy as u64).rotate_left(32);
        splitmix64(splitmix64(key) ^ self.seed as u64)
    }
}

impl NoiseSource for SeededNoise {
    fn fractal(&self, x: f64, y: f64, params: &FractalParams) -> f64 {
        fbm(
            &self.simplex,
            x * params.frequency,
            y * params.frequency,
            params.octaves,
            params.gain,
            params.lacunarity,
        )
    }

    fn cellular(&self, x: f64, y: f64, frequency: f64, ret: CellularReturn) -> f64 {
        let px = x * frequency;
        let py = y * frequency;
        let cx = px.floor() as i64;
        let cy = py.floor() as i64;

        let mut nearest = f64::MAX;
        let mut second = f64::MAX;
        let mut nearest_hash = 0u64;

        for dy in -1..=1 {
            for dx in -1..=1 {
                let ix = cx + dx;
                let iy = cy + dy;
                let h = self.cell_hash(ix, iy);
                let jx = (unit_from_bits(h) * 2.0 - 1.0) * CELL_JITTER;
                let jy = (unit_from_bits(splitmix64(h)) * 2.0 - 1.0) * CELL_JITTER;

                let fx = ix as f64 + 0.5 + jx - px;
                let fy = iy as f64 + 0.5 + jy - py;
                let dist = (fx * fx + fy * fy).sqrt();

                if dist < nearest {
                    second = nearest;
                    nearest = dist;
                    nearest_hash = h;
                } else if dist < second {
                    second = dist;
                }
            }
        }

        match ret {
            CellularReturn::Distance => nearest,
            CellularReturn::Distance2 => second,
            CellularReturn::CellValue => {
                unit_from_bits(splitmix64(nearest_hash ^ 0xA5A5_A5A5_A5A5_A5A5)) * 2.0 - 1.0
            }
        }
    }

    fn warp(&self, x: f64, y: f64, params: &WarpParams) -> (f64, f64) {
        let mut wx = x;
        let mut wy = y;
        let mut frequency = params.frequency;
        let mut amplitude = params.amplitude;

        // Each layer samples the already-displaced point
        for _ in 0..params.octaves {
            let sx = wx * frequency;
            let sy = wy * frequency;
            let offset_x = self.gradient.get([sx, sy]);
            let offset_y = self.gradient.get([sx + 5.2, sy + 1.3]);
            wx += offset_x * amplitude;
            wy += offset_y * amplitude;

            frequency *= params.lacunarity;
            amplitude *= params.gain;
        }

        (wx, wy)
    }
}

/// Fractional Brownian Motion - multi-octave noise
fn fbm(
    noise: &impl NoiseFn<f64, 2>,
    x: f64,
    y: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Map the top 53 bits of a hash to [0, 1).
fn unit_from_bits(h: u64) -> f64 {
    (h >> 11) as f64 / (1u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRACTAL: FractalParams = FractalParams {
        frequency: 0.01,
        octaves: 5,
        lacunarity: 1.5,
        gain: 0.6,
    };

    #[test]
    fn test_same_seed_same_samples() {
        let a = SeededNoise::new(42);
        let b = SeededNoise::new(42);
        for i in 0..50 {
            let x = i as f64 * 3.7;
            let y = i as f64 * 1.9;
            assert_eq!(a.fractal(x, y, &FRACTAL), b.fractal(x, y, &FRACTAL));
            assert_eq!(
                a.cellular(x, y, 0.05, CellularReturn::Distance2),
                b.cellular(x, y, 0.05, CellularReturn::Distance2)
            );
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = SeededNoise::new(1);
        let b = SeededNoise::new(2);
        let differs = (0..50).any(|i| {
            let x = i as f64 * 7.3;
            a.cellular(x, x * 0.5, 0.05, CellularReturn::CellValue)
                != b.cellular(x, x * 0.5, 0.05, CellularReturn::CellValue)
        });
        assert!(differs);
    }

    #[test]
    fn test_fractal_roughly_bounded() {
        let noise = SeededNoise::new(7);
        for i in 0..200 {
            let v = noise.fractal(i as f64 * 11.0, i as f64 * 5.0, &FRACTAL);
            assert!(v.is_finite());
            assert!(v.abs() <= 1.5, "fbm sample {} out of range", v);
        }
    }

    #[test]
    fn test_cellular_metrics_ordered() {
        let noise = SeededNoise::new(3);
        for i in 0..200 {
            let x = i as f64 * 2.3;
            let y = i as f64 * 4.1;
            let d1 = noise.cellular(x, y, 0.1, CellularReturn::Distance);
            let d2 = noise.cellular(x, y, 0.1, CellularReturn::Distance2);
            let value = noise.cellular(x, y, 0.1, CellularReturn::CellValue);
            assert!(d1 >= 0.0);
            assert!(d2 >= d1);
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_cell_value_constant_near_feature() {
        // Two points a hair apart almost always share the nearest feature
        let noise = SeededNoise::new(11);
        let a = noise.cellular(100.0, 100.0, 0.01, CellularReturn::CellValue);
        let b = noise.cellular(100.001, 100.0, 0.01, CellularReturn::CellValue);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_amplitude_warp_is_identity() {
        let noise = SeededNoise::new(5);
        let params = WarpParams {
            frequency: 0.02,
            octaves: 5,
            lacunarity: 2.0,
            gain: 0.7,
            amplitude: 0.0,
        };
        assert_eq!(noise.warp(12.5, -3.0, &params), (12.5, -3.0));
    }

    #[test]
    fn test_warp_displacement_bounded() {
        let noise = SeededNoise::new(5);
        let params = WarpParams {
            frequency: 0.02,
            octaves: 1,
            lacunarity: 2.0,
            gain: 0.7,
            amplitude: 20.0,
        };
        for i in 0..100 {
            let (x, y) = (i as f64 * 3.0, i as f64 * 2.0);
            let (wx, wy) = noise.warp(x, y, &params);
            assert!((wx - x).abs() <= 30.0);
            assert!((wy - y).abs() <= 30.0);
        }
    }
}
