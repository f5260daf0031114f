// encode.rs - Pack coverage maps into an RGBA8 texture buffer
//
// Texture layout (one texel per grid cell, row-major):
//   R = layer 0 coverage * 255
//   G = layer 1 coverage * 255
//   B = 0
//   A = 255 inside the silhouette, 0 outside

use crate::dirt::DirtSystem;

pub struct TextureEncoder {
    out: Vec<u8>,
    size: usize,
}

impl TextureEncoder {
    pub fn new(size: usize) -> Self {
        Self {
            out: vec![0; size * size * 4],
            size,
        }
    }

    pub fn resize(&mut self, size: usize) {
        self.size = size;
        self.out.resize(size * size * 4, 0);
    }

    pub fn ptr(&self) -> *const u8 {
        self.out.as_ptr()
    }

    pub fn byte_len(&self) -> usize {
        self.out.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.out
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Shader layout: coverage in R/G, silhouette in A.
    pub fn encode(&mut self, dirt: &DirtSystem) {
        if dirt.size() != self.size { self.resize(dirt.size()); }

        let maps = dirt.maps_for_shader();
        let mask = dirt.mask().mask();
        for (i, texel) in self.out.chunks_exact_mut(4).enumerate() {
            texel[0] = quantize(maps.map0[i]);
            texel[1] = quantize(maps.map1[i]);
            texel[2] = 0;
            texel[3] = if mask[i] != 0 { 255 } else { 0 };
        }
    }

    /// Debug view: each layer's `debug_color` blended over light grey by
    /// coverage, in configured order. Outside cells stay transparent.
    pub fn encode_debug(&mut self, dirt: &DirtSystem) {
        if dirt.size() != self.size { self.resize(dirt.size()); }

        let mask = dirt.mask().mask();
        let layers: Vec<([u8; 3], &[f32])> = dirt
            .layer_configs()
            .enumerate()
            .filter_map(|(i, cfg)| Some((cfg.debug_color?, dirt.map_at(i)?)))
            .collect();

        for (i, texel) in self.out.chunks_exact_mut(4).enumerate() {
            if mask[i] == 0 {
                texel.fill(0);
                continue;
            }
            let mut rgb = [220.0f32, 220.0, 220.0];
            for (color, map) in &layers {
                let c = map[i].clamp(0.0, 1.0);
                for k in 0..3 {
                    rgb[k] += (color[k] as f32 - rgb[k]) * c;
                }
            }
            texel[0] = rgb[0] as u8;
            texel[1] = rgb[1] as u8;
            texel[2] = rgb[2] as u8;
            texel[3] = 255;
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn to_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.size as u32, self.size as u32, self.out.clone())
    }
}

#[inline]
fn quantize(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
