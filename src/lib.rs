use std::rc::Rc;

use wasm_bindgen::prelude::*;

// ============================================================================
// GRIME - Dirt coverage simulation for the cleaning game
// ============================================================================

pub mod dirt;
pub mod encode;
pub mod error;
pub mod mask;
pub mod progress;
pub mod rng;
pub mod session;
pub mod stroke;
pub mod tool;

#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

pub use dirt::{DirtConfig, DirtSystem, LayerConfig, ShaderMaps, DIRTY_EPSILON};
pub use encode::TextureEncoder;
pub use error::{Error, Result};
pub use mask::SilhouetteMask;
pub use rng::Rng;
pub use session::{Session, SessionConfig, ToolKind};
pub use stroke::{StrokeConfig, StrokeSystem, SurfaceRect, UvMapper};
pub use tool::{SprayKind, Tool};

// Spray codes for the page
const SPRAY_NONE: u8 = 0;
const SPRAY_DIRT: u8 = 1;
const SPRAY_WATER: u8 = 2;

/// Page-facing handle. One per loaded object.
#[wasm_bindgen]
pub struct GrimeGame {
    session: Session<SurfaceRect>,
    encoder: TextureEncoder,
}

#[wasm_bindgen]
impl GrimeGame {
    /// `rgba` is the object's ImageData (`width * height * 4` bytes).
    /// `config_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, width: u32, height: u32, rgba: &[u8], seed: u32) -> std::result::Result<GrimeGame, JsError> {
        let config = if config_json.trim().is_empty() {
            SessionConfig::default()
        } else {
            SessionConfig::from_json(config_json)?
        };
        let mask = SilhouetteMask::from_rgba(width, height, rgba, config.dirt.size, config.dirt.alpha_threshold)?;
        let size = mask.size();
        let surface = SurfaceRect::new(0.0, 0.0, width as f32, height as f32);
        let session = Session::new(Rc::new(mask), config, surface, seed)?;

        let mut encoder = TextureEncoder::new(size);
        encoder.encode(session.dirt());
        Ok(Self { session, encoder })
    }

    /// Where the object sits in input space.
    pub fn set_surface(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.session.set_mapper(SurfaceRect::new(x, y, width, height));
    }

    pub fn handle_down(&mut self, x: f32, y: f32, t: f64) { self.session.handle_down(x, y, t); }
    pub fn handle_move(&mut self, x: f32, y: f32, t: f64) { self.session.handle_move(x, y, t); }
    pub fn handle_up(&mut self, x: f32, y: f32, t: f64) { self.session.handle_up(x, y, t); }

    /// Returns false for an unknown tool name.
    pub fn set_tool(&mut self, name: &str) -> bool {
        match ToolKind::from_name(name) {
            Some(kind) => { self.session.set_tool(kind); true }
            None => false,
        }
    }

    pub fn new_level(&mut self, seed: u32) { self.session.new_level(seed); }
    pub fn restart(&mut self) { self.session.restart(); }

    /// Re-encodes the texture if anything was stamped. Returns true when the
    /// texture buffer changed and should be re-uploaded.
    pub fn tick(&mut self) -> bool {
        if !self.session.did_stamp_since_last_check() { return false; }
        self.encoder.encode(self.session.dirt());
        true
    }

    pub fn poll_progress(&mut self, now_ms: f64) -> Option<f32> { self.session.poll_progress(now_ms) }
    pub fn union_dirty_ratio(&self) -> f32 { self.session.dirt().union_dirty_ratio(DIRTY_EPSILON) }
    pub fn union_dirty_value_at(&self, u: f32, v: f32) -> f32 { self.session.dirt().union_dirty_value_at(u, v) }
    pub fn is_won(&self) -> bool { self.session.is_won() }
    pub fn is_locked(&self) -> bool { self.session.is_locked() }

    /// 0 = none, 1 = dirt, 2 = water
    pub fn spray(&self) -> u8 {
        match self.session.spray() {
            None => SPRAY_NONE,
            Some(SprayKind::Dirt) => SPRAY_DIRT,
            Some(SprayKind::Water) => SPRAY_WATER,
        }
    }

    /// `{ size, map0, map1 }` with copies of the first two coverage maps.
    pub fn maps_for_shader(&self) -> std::result::Result<js_sys::Object, JsValue> {
        let maps = self.session.dirt().maps_for_shader();
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"size".into(), &JsValue::from(maps.size as u32))?;
        js_sys::Reflect::set(&obj, &"map0".into(), &js_sys::Float32Array::from(maps.map0).into())?;
        js_sys::Reflect::set(&obj, &"map1".into(), &js_sys::Float32Array::from(maps.map1).into())?;
        Ok(obj)
    }

    // Zero-copy accessors for WASM memory views
    pub fn map_ptr(&self, index: usize) -> *const f32 {
        self.session.dirt().map_at(index).map_or(std::ptr::null(), |m| m.as_ptr())
    }
    pub fn texture_ptr(&self) -> *const u8 { self.encoder.ptr() }
    pub fn texture_len(&self) -> usize { self.encoder.byte_len() }
    pub fn size(&self) -> usize { self.session.dirt().size() }
}
