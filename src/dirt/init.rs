// init.rs - Procedural coverage generation (threshold strategy)
//
// One white-noise grid per layer, blurred once, then a binary search for the
// noise level that leaves the requested fraction of inside cells dirty.
// Output is binary: 1 above the threshold, 0 below and outside the mask.

use super::blur::box_blur;
use crate::mask::SilhouetteMask;
use crate::rng::Rng;

pub const BLUR_RADIUS: usize = 2;
pub const SEARCH_STEPS: usize = 12;

/// Regenerate `map` in place. `noise` and `scratch` are `size * size` work buffers.
pub fn fill_threshold(
    map: &mut [f32],
    noise: &mut [f32],
    scratch: &mut [f32],
    mask: &SilhouetteMask,
    rng: &mut Rng,
    target: f32,
) {
    let target = if target.is_nan() { 0.0 } else { target.min(1.0) };
    if target <= 0.0 || mask.inside_count() == 0 {
        map.fill(0.0);
        return;
    }

    for n in noise.iter_mut() {
        *n = rng.next_float();
    }
    box_blur(noise, scratch, mask.size(), BLUR_RADIUS);

    let t = search_threshold(noise, mask, target);
    let cells = mask.mask();
    for ((c, &n), &inside) in map.iter_mut().zip(noise.iter()).zip(cells) {
        *c = if inside != 0 && n >= t { 1.0 } else { 0.0 };
    }
}

/// Highest `t` (to search precision) with fraction(noise >= t) >= target.
fn search_threshold(noise: &[f32], mask: &SilhouetteMask, target: f32) -> f32 {
    let inside = mask.inside_count() as f32;
    let cells = mask.mask();
    let (mut lo, mut hi) = (0.0f32, 1.0f32);

    for _ in 0..SEARCH_STEPS {
        let mid = 0.5 * (lo + hi);
        let above = noise
            .iter()
            .zip(cells)
            .filter(|&(&n, &m)| m != 0 && n >= mid)
            .count();
        if above as f32 / inside >= target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}
