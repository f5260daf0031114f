// mask.rs - Silhouette mask
//
// Square N x N grid, one byte per cell: 1 = cleanable surface, 0 = outside.
// Built once from the object's alpha channel, never mutated afterwards.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub struct SilhouetteMask {
    size: usize,
    cells: Vec<u8>,
    inside: usize,
}

impl SilhouetteMask {
    /// Resample `img` to `size x size` and keep cells with alpha >= threshold * 255.
    pub fn from_image(img: &DynamicImage, size: usize, threshold: f32) -> Result<Self> {
        let (w, h) = (img.width(), img.height());
        if w == 0 || h == 0 {
            return Err(Error::EmptyImage { width: w, height: h });
        }
        Self::from_rgba_image(&img.to_rgba8(), size, threshold)
    }

    /// Raw RGBA8 pixels, as read back from a canvas `ImageData`.
    pub fn from_rgba(width: u32, height: u32, data: &[u8], size: usize, threshold: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }
        let expected = width as usize * height as usize * 4;
        let raster = RgbaImage::from_raw(width, height, data.to_vec())
            .ok_or(Error::RasterBuffer { expected, actual: data.len() })?;
        Self::from_rgba_image(&raster, size, threshold)
    }

    fn from_rgba_image(src: &RgbaImage, size: usize, threshold: f32) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidMaskSize);
        }
        if src.width() == 0 || src.height() == 0 {
            return Err(Error::EmptyImage { width: src.width(), height: src.height() });
        }

        let n = size as u32;
        let resampled = if src.width() == n && src.height() == n {
            src.clone()
        } else {
            imageops::resize(src, n, n, FilterType::Triangle)
        };

        let cutoff = alpha_cutoff(threshold);
        let cells: Vec<u8> = resampled
            .pixels()
            .map(|p| (p[3] as f32 >= cutoff) as u8)
            .collect();

        let mask = Self::from_cells(size, cells);
        log::info!(
            "Silhouette mask {}x{}: {} inside cells ({:.1}%)",
            size, size, mask.inside,
            mask.inside as f32 / (size * size) as f32 * 100.0
        );
        Ok(mask)
    }

    /// Every cell inside.
    pub fn full(size: usize) -> Self {
        Self::from_cells(size, vec![1; size * size])
    }

    /// Procedural silhouette: `f(x, y)` decides each cell.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut cells = vec![0u8; size * size];
        for y in 0..size {
            for x in 0..size {
                cells[y * size + x] = f(x, y) as u8;
            }
        }
        Self::from_cells(size, cells)
    }

    fn from_cells(size: usize, cells: Vec<u8>) -> Self {
        let inside = cells.iter().filter(|&&c| c != 0).count();
        Self { size, cells, inside }
    }

    pub fn size(&self) -> usize { self.size }

    /// Read-only cell bytes, row-major.
    pub fn mask(&self) -> &[u8] { &self.cells }

    pub fn inside_count(&self) -> usize { self.inside }

    #[inline]
    pub fn is_inside(&self, idx: usize) -> bool {
        self.cells.get(idx).is_some_and(|&c| c != 0)
    }

    /// Grid cell containing `(u, v)`. UV is clamped to [0, 1], NaN reads as 0.
    #[inline]
    pub fn uv_to_cell(&self, u: f32, v: f32) -> (usize, usize) {
        (axis_cell(u, self.size), axis_cell(v, self.size))
    }

    #[inline]
    pub fn uv_to_index(&self, u: f32, v: f32) -> usize {
        let (x, y) = self.uv_to_cell(u, v);
        y * self.size + x
    }

    pub fn test_uv(&self, u: f32, v: f32) -> bool {
        self.is_inside(self.uv_to_index(u, v))
    }
}

#[inline]
fn axis_cell(t: f32, size: usize) -> usize {
    if size == 0 { return 0; }
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    ((t * size as f32).floor() as usize).min(size - 1)
}

#[inline]
fn alpha_cutoff(threshold: f32) -> f32 {
    let t = if threshold.is_nan() { 0.0 } else { threshold.clamp(0.0, 1.0) };
    t * 255.0
}
