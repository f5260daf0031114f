// stamp.rs - Radial erosion kernel
//
// Visits only the bounding box of the stamp circle. Falloff is quadratic:
// (1 - d/r)^2, 1 at the center and 0 at the rim.

use crate::mask::SilhouetteMask;

/// Minimum radius multiplier a stamp may request.
pub const MIN_RADIUS_FACTOR: f32 = 0.2;

/// Maximum radius multiplier a stamp may request.
pub const MAX_RADIUS_FACTOR: f32 = 64.0;

#[inline(always)]
pub fn falloff(dist: f32, radius: f32) -> f32 {
    let t = 1.0 - dist / radius;
    if t <= 0.0 { 0.0 } else { t * t }
}

/// Subtract `falloff * amount` from every inside cell within `radius` of
/// `(cx, cy)`. Coverage is floored at zero.
pub fn erode(map: &mut [f32], mask: &SilhouetteMask, cx: usize, cy: usize, radius: f32, amount: f32) {
    let size = mask.size();
    if size == 0 { return; }

    // a radius past the grid diagonal reaches every cell anyway
    let span = (2 * size) as f32;
    let radius = if radius.is_finite() { radius.clamp(1.0, span) } else { span };
    let reach = (radius.ceil() as usize).min(size);
    let x0 = cx.saturating_sub(reach);
    let y0 = cy.saturating_sub(reach);
    let x1 = cx.saturating_add(reach).min(size - 1);
    let y1 = cy.saturating_add(reach).min(size - 1);
    let cells = mask.mask();

    for y in y0..=y1 {
        let dy = y as f32 - cy as f32;
        let row = y * size;
        for x in x0..=x1 {
            let dx = x as f32 - cx as f32;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist >= radius { continue; }

            let i = row + x;
            if cells[i] == 0 { continue; }

            let delta = falloff(dist, radius) * amount;
            map[i] = (map[i] - delta).max(0.0);
        }
    }
}
