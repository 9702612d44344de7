//! Deterministic random walk for the simulated temperature sensor.
//!
//! The generator is the classic 32-bit linear-congruential generator
//! (`state * 1103515245 + 12345`, wrapping) with the output taken from bits
//! 17..32 of the state. Constants and operation order are fixed so a given
//! seed always replays the same temperature trace.

use crate::config::{MAX_TEMP, MIN_TEMP};

/// LCG multiplier.
const LCG_MULTIPLIER: u32 = 1_103_515_245;

/// LCG increment.
const LCG_INCREMENT: u32 = 12_345;

/// Right shift applied to the state to form an output (`state / 131072`).
const OUTPUT_SHIFT: u32 = 17;

// =============================================================================
// Linear-Congruential Generator
// =============================================================================

/// 32-bit linear-congruential generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub const fn new(seed: u32) -> Self { Self { state: seed } }

    /// Advance the state and return the next output in `0..65536`.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
        (self.state >> OUTPUT_SHIFT) % 65_536
    }

    /// Current internal state.
    #[inline]
    pub const fn state(&self) -> u32 { self.state }
}

// =============================================================================
// Bounded Random Walk
// =============================================================================

/// Temperature random walk clamped to `MIN_TEMP..=MAX_TEMP`.
///
/// Each step consumes exactly one generator output and moves the temperature
/// by `(output % 3) - 1`, i.e. down, steady or up.
#[derive(Clone, Copy, Debug)]
pub struct RandomWalk {
    rng: Lcg,
    temperature: i32,
}

impl RandomWalk {
    /// Create a walk. The starting temperature is clamped into range.
    pub fn new(
        seed: u32,
        initial_temperature: i32,
    ) -> Self {
        Self {
            rng: Lcg::new(seed),
            temperature: initial_temperature.clamp(MIN_TEMP, MAX_TEMP),
        }
    }

    /// Advance one step and return the new temperature.
    pub fn step(&mut self) -> i32 {
        let delta = (self.rng.next_u32() % 3) as i32 - 1;
        self.temperature = (self.temperature + delta).clamp(MIN_TEMP, MAX_TEMP);
        self.temperature
    }

    /// Current temperature without advancing.
    #[inline]
    pub const fn temperature(&self) -> i32 { self.temperature }
}

// =============================================================================
// Tests
// =============================================================================
