// dirt/ - Coverage map engine
//
// One f32 grid per dirt layer, same size as the silhouette mask.
// Cells outside the silhouette stay at 0 through init and every stamp.
// All calls run synchronously on the frame loop; maps are read in place.

mod blur;
mod init;
mod layer;
mod stamp;

pub use blur::box_blur;
pub use layer::{DirtConfig, LayerConfig};
pub use stamp::{falloff, MAX_RADIUS_FACTOR, MIN_RADIUS_FACTOR};

use std::collections::HashMap;
use std::rc::Rc;

use crate::mask::SilhouetteMask;
use crate::rng::Rng;

/// Coverage above this counts as visibly dirty.
pub const DIRTY_EPSILON: f32 = 0.05;

struct Layer {
    config: LayerConfig,
    map: Vec<f32>,
}

/// Read-only view handed to renderers each frame.
#[derive(Clone, Copy, Debug)]
pub struct ShaderMaps<'a> {
    pub size: usize,
    /// First configured layer (zeros if none).
    pub map0: &'a [f32],
    /// Second configured layer (zeros if fewer than two).
    pub map1: &'a [f32],
}

pub struct DirtSystem {
    mask: Rc<SilhouetteMask>,
    base_radius_px: f32,
    layers: Vec<Layer>,

    // Work buffers for init, kept across levels
    noise: Vec<f32>,
    scratch: Vec<f32>,
    blank: Vec<f32>,
}

impl DirtSystem {
    pub fn new(mask: Rc<SilhouetteMask>, base_radius_px: f32, layers: Vec<LayerConfig>) -> Self {
        let cells = mask.size() * mask.size();
        let layers = layers
            .into_iter()
            .map(|config| Layer { config, map: vec![0.0; cells] })
            .collect();

        Self {
            mask,
            base_radius_px,
            layers,
            noise: vec![0.0; cells],
            scratch: vec![0.0; cells],
            blank: vec![0.0; cells],
        }
    }

    pub fn from_config(mask: Rc<SilhouetteMask>, config: &DirtConfig) -> Self {
        Self::new(mask, config.base_radius_px, config.layers.clone())
    }

    /// Regenerate every layer in place. Layers without a target (or with a
    /// target <= 0) end up clean.
    pub fn init(&mut self, rng: &mut Rng, targets: &HashMap<String, f32>) {
        for id in targets.keys() {
            if !self.layers.iter().any(|l| &l.config.id == id) {
                log::warn!("Coverage target for unknown layer '{}' ignored", id);
            }
        }

        for layer in &mut self.layers {
            let target = targets.get(&layer.config.id).copied().unwrap_or(0.0);
            init::fill_threshold(
                &mut layer.map,
                &mut self.noise,
                &mut self.scratch,
                &self.mask,
                rng,
                target,
            );
        }

        for (i, layer) in self.layers.iter().enumerate() {
            log::debug!(
                "Layer '{}' initialized: {:.1}% dirty",
                layer.config.id,
                self.layer_dirty_ratio(i, DIRTY_EPSILON) * 100.0
            );
        }
    }

    /// Erode all layers around `(u, v)`. No-op for non-positive strength.
    pub fn apply_stamp_uv(&mut self, u: f32, v: f32, strength: f32, radius_factor: f32) {
        if !(strength > 0.0) { return; }

        let (cx, cy) = self.mask.uv_to_cell(u, v);
        let radius_factor = if radius_factor.is_finite() {
            radius_factor.clamp(MIN_RADIUS_FACTOR, MAX_RADIUS_FACTOR)
        } else {
            MIN_RADIUS_FACTOR
        };

        for layer in &mut self.layers {
            let radius = (self.base_radius_px * layer.config.base_radius * radius_factor).max(1.0);
            let amount = strength * layer.config.erase_rate;
            if !(amount > 0.0) { continue; }
            stamp::erode(&mut layer.map, &self.mask, cx, cy, radius, amount);
        }
    }

    /// Fraction of inside cells where any layer exceeds `epsilon`.
    pub fn union_dirty_ratio(&self, epsilon: f32) -> f32 {
        let inside = self.mask.inside_count();
        if inside == 0 || self.layers.is_empty() { return 0.0; }

        let dirty = self
            .mask
            .mask()
            .iter()
            .enumerate()
            .filter(|&(i, &m)| m != 0 && self.layers.iter().any(|l| l.map[i] > epsilon))
            .count();
        dirty as f32 / inside as f32
    }

    /// Max coverage across layers at the cell holding `(u, v)`.
    pub fn union_dirty_value_at(&self, u: f32, v: f32) -> f32 {
        if !u.is_finite() || !v.is_finite() { return 0.0; }
        let idx = self.mask.uv_to_index(u, v);
        if !self.mask.is_inside(idx) { return 0.0; }
        self.layers.iter().map(|l| l.map[idx]).fold(0.0, f32::max)
    }

    /// Fraction of inside cells where layer `index` exceeds `epsilon`.
    pub fn layer_dirty_ratio(&self, index: usize, epsilon: f32) -> f32 {
        let (Some(layer), inside) = (self.layers.get(index), self.mask.inside_count()) else {
            return 0.0;
        };
        if inside == 0 { return 0.0; }
        let dirty = layer
            .map
            .iter()
            .zip(self.mask.mask())
            .filter(|&(&c, &m)| m != 0 && c > epsilon)
            .count();
        dirty as f32 / inside as f32
    }

    pub fn map(&self, id: &str) -> Option<&[f32]> {
        self.layers.iter().find(|l| l.config.id == id).map(|l| l.map.as_slice())
    }

    pub fn map_at(&self, index: usize) -> Option<&[f32]> {
        self.layers.get(index).map(|l| l.map.as_slice())
    }

    pub fn maps_for_shader(&self) -> ShaderMaps<'_> {
        ShaderMaps {
            size: self.mask.size(),
            map0: self.map_at(0).unwrap_or(&self.blank),
            map1: self.map_at(1).unwrap_or(&self.blank),
        }
    }

    pub fn layer_configs(&self) -> impl Iterator<Item = &LayerConfig> {
        self.layers.iter().map(|l| &l.config)
    }

    pub fn layer_count(&self) -> usize { self.layers.len() }
    pub fn size(&self) -> usize { self.mask.size() }
    pub fn mask(&self) -> &SilhouetteMask { &self.mask }
}
