//! Bit-reproducible integer mixing
//!
//! Stage layouts must come out identical on every platform for a given
//! seed, so generation uses this small 32-bit mixer instead of a library
//! generator whose stream could change between crate versions.

use serde::{Deserialize, Serialize};

const STEP: u32 = 0x6D2B_79F5;
const STAGE_SALT: u32 = 0x9E37_79B9;

#[inline]
fn mix(mut t: u32) -> u32 {
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    t ^ (t >> 14)
}

/// Stateful generator producing floats in [0, 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Fold a 64-bit seed down to the 32-bit state
    pub fn from_seed(seed: u64) -> Self {
        Self::new((seed ^ (seed >> 32)) as u32)
    }

    /// Stream for one stage of a run: the same seed yields unrelated
    /// layouts for different stage indices
    pub fn for_stage(seed: u64, stage: u32) -> Self {
        let base = Self::from_seed(seed).state;
        Self::new(base ^ stage.wrapping_mul(STAGE_SALT))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STEP);
        mix(self.state)
    }

    /// Next value in [0, 1)
    pub fn next(&mut self) -> f32 {
        // 24 bits fit the f32 mantissa exactly, so 1.0 is unreachable
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform value in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next() * (max - min)
    }
}

/// Positional hash over the integer lattice: 0 or 255
///
/// Pure function of the floored coordinates, used for the static-noise
/// textures of platforms, portal border and record flag.
pub fn static_noise(x: f32, y: f32) -> u8 {
    let seed = (x.floor() as i32)
        .wrapping_mul(1357)
        .wrapping_add((y.floor() as i32).wrapping_mul(2468)) as u32;
    let t = mix(seed.wrapping_add(1_831_565_813));
    if t % 2 == 0 { 0 } else { 255 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_known_first_output() {
        // mulberry32(1) first output, pins the mixer across refactors
        let mut rng = SeededRandom::new(1);
        assert_eq!(rng.next_u32(), 2_693_262_067);
    }

    #[test]
    fn test_unit_interval() {
        let mut rng = SeededRandom::from_seed(0xDEAD_BEEF_CAFE);
        for _ in 0..10_000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_stage_streams_differ() {
        let mut a = SeededRandom::for_stage(7, 1);
        let mut b = SeededRandom::for_stage(7, 2);
        let same = (0..16).filter(|_| a.next_u32() == b.next_u32()).count();
        assert!(same < 16);
    }

    #[test]
    fn test_static_noise_is_binary_and_stable() {
        let mut seen_black = false;
        let mut seen_white = false;
        for y in 0..32 {
            for x in 0..32 {
                let v = static_noise(x as f32, y as f32);
                assert!(v == 0 || v == 255);
                assert_eq!(v, static_noise(x as f32 + 0.7, y as f32 + 0.2));
                seen_black |= v == 0;
                seen_white |= v == 255;
            }
        }
        assert!(seen_black && seen_white);
    }
}
