// blur.rs - Separable box blur
//
// Horizontal pass then vertical pass, each a sliding-window running sum.
// The window is clipped at the grid edge and averages only the cells it
// still covers, so nothing wraps around.

/// Blur a `size x size` grid in place. `scratch` must hold `size * size` floats.
pub fn box_blur(grid: &mut [f32], scratch: &mut [f32], size: usize, radius: usize) {
    debug_assert_eq!(grid.len(), size * size);
    debug_assert_eq!(scratch.len(), size * size);
    if size == 0 || radius == 0 { return; }

    for y in 0..size {
        blur_line(grid, scratch, y * size, 1, size, radius);
    }
    for x in 0..size {
        blur_line(scratch, grid, x, size, size, radius);
    }
}

fn blur_line(src: &[f32], dst: &mut [f32], start: usize, stride: usize, n: usize, r: usize) {
    let at = |i: usize| start + i * stride;

    let mut sum = 0.0f32;
    let mut count = 0usize;
    for i in 0..=r.min(n - 1) {
        sum += src[at(i)];
        count += 1;
    }

    for i in 0..n {
        dst[at(i)] = sum / count as f32;

        let enter = i + r + 1;
        if enter < n {
            sum += src[at(enter)];
            count += 1;
        }
        if i >= r {
            sum -= src[at(i - r)];
            count -= 1;
        }
    }
}
