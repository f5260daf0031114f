//! Dirt layer and grid configuration.
//!
//! Values come from content data. `erase_rate` and `base_radius` are tuned by
//! hand per layer and are used exactly as given.

use serde::Deserialize;

/// Per-layer constants.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayerConfig {
    /// Layer id, e.g. "mold" or "grease".
    pub id: String,
    /// Multiplier on stamp strength.
    pub erase_rate: f32,
    /// Multiplier on the global stamp radius.
    pub base_radius: f32,
    /// Tint used by debug views only.
    pub debug_color: Option<[u8; 3]>,
}

impl LayerConfig {
    pub fn new(id: impl Into<String>, erase_rate: f32, base_radius: f32) -> Self {
        Self { id: id.into(), erase_rate, base_radius, debug_color: None }
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self::new("dirt", 1.0, 1.0)
    }
}

/// Grid-wide settings for the coverage engine.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DirtConfig {
    /// Grid side length in cells (mask and every coverage map).
    pub size: usize,
    /// Stamp radius in cells before layer and per-stamp multipliers.
    pub base_radius_px: f32,
    /// Alpha cutoff in [0, 1] for the silhouette.
    pub alpha_threshold: f32,
    /// Ordered layers. Index 0 feeds `map0`, index 1 feeds `map1`.
    pub layers: Vec<LayerConfig>,
}

impl Default for DirtConfig {
    fn default() -> Self {
        Self {
            size: 256,
            base_radius_px: 12.0,
            alpha_threshold: 0.5,
            layers: vec![
                LayerConfig { debug_color: Some([64, 160, 64]), ..LayerConfig::new("mold", 1.0, 1.0) },
                LayerConfig { debug_color: Some([160, 120, 40]), ..LayerConfig::new("grease", 0.6, 0.8) },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_defaults_fill_missing_fields() {
        let layer: LayerConfig = serde_json::from_str(r#"{ "id": "soot" }"#).unwrap();
        assert_eq!(layer.id, "soot");
        assert_eq!(layer.erase_rate, 1.0);
        assert_eq!(layer.base_radius, 1.0);
        assert_eq!(layer.debug_color, None);
    }

    #[test]
    fn test_dirt_config_from_json() {
        let cfg: DirtConfig = serde_json::from_str(
            r#"{ "size": 64, "layers": [{ "id": "mold", "erase_rate": 0.5, "debug_color": [1, 2, 3] }] }"#,
        )
        .unwrap();
        assert_eq!(cfg.size, 64);
        assert_eq!(cfg.base_radius_px, 12.0);
        assert_eq!(cfg.layers.len(), 1);
        assert_eq!(cfg.layers[0].erase_rate, 0.5);
        assert_eq!(cfg.layers[0].debug_color, Some([1, 2, 3]));
    }

    #[test]
    fn test_default_has_two_layers() {
        let cfg = DirtConfig::default();
        let ids: Vec<&str> = cfg.layers.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["mold", "grease"]);
    }
}
