// rng.rs - Seeded random stream
//
// xorshift32 state step followed by a multiplicative output scramble.
// Same seed gives the same stream on every target, wasm included.

const ZERO_SEED: u32 = 0xDEADBEEF;
const SCRAMBLE: u32 = 0x9E37_79BB;

#[derive(Clone, Debug)]
pub struct Rng {
    state: u32,
}

impl Rng {
    /// Seed `0` is remapped: an all-zero xorshift state never leaves zero.
    pub fn new(seed: u32) -> Self {
        Self { state: remap(seed) }
    }

    pub fn reseed(&mut self, seed: u32) {
        self.state = remap(seed);
    }

    #[inline(always)]
    pub fn next_u32(&mut self) -> u32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s.wrapping_mul(SCRAMBLE)
    }

    /// Float in [0, 1). Top 24 bits only, so the f32 never rounds up to 1.0.
    #[inline(always)]
    pub fn next_float(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * (1.0 / 16777216.0)
    }

    /// Float in [-amount, amount)
    #[inline]
    pub fn signed(&mut self, amount: f32) -> f32 {
        (self.next_float() * 2.0 - 1.0) * amount
    }
}

#[inline]
fn remap(seed: u32) -> u32 {
    if seed == 0 { ZERO_SEED } else { seed }
}
