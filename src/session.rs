//! Level session: the explicit context for one cleanable object.
//!
//! Created when an object is loaded and dropped when it is unloaded. Owns the
//! silhouette, coverage maps, RNG and tools; nothing here is global.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde::Deserialize;

use crate::dirt::{DirtConfig, DirtSystem, DIRTY_EPSILON};
use crate::error::{Error, Result};
use crate::mask::SilhouetteMask;
use crate::progress::Progress;
use crate::rng::Rng;
use crate::stroke::{StrokeConfig, SurfaceRect, UvMapper};
use crate::tool::{Hose, Sponge, SprayKind, Tool, ToolContext};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub dirt: DirtConfig,
    pub sponge: StrokeConfig,
    pub hose: StrokeConfig,
    /// Dirty fraction per layer id at level start.
    pub targets: HashMap<String, f32>,
    /// Minimum time between progress reads.
    pub progress_interval_ms: f64,
    /// The level is won once the union dirty ratio drops to this.
    pub win_ratio: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dirt: DirtConfig::default(),
            sponge: StrokeConfig::sponge(),
            hose: StrokeConfig::hose(),
            targets: [("mold".to_string(), 0.6), ("grease".to_string(), 0.4)]
                .into_iter()
                .collect(),
            progress_interval_ms: 200.0,
            win_ratio: 0.02,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dirt.size == 0 {
            return Err(Error::InvalidMaskSize);
        }
        let mut seen = HashSet::new();
        for layer in &self.dirt.layers {
            if !seen.insert(layer.id.as_str()) {
                return Err(Error::DuplicateLayer(layer.id.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolKind {
    Sponge,
    Hose,
}

impl ToolKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sponge" => Some(Self::Sponge),
            "hose" => Some(Self::Hose),
            _ => None,
        }
    }
}

pub struct Session<M: UvMapper = SurfaceRect> {
    config: SessionConfig,
    mask: Rc<SilhouetteMask>,
    dirt: DirtSystem,
    rng: Rng,
    seed: u32,

    sponge: Sponge,
    hose: Hose,
    active: ToolKind,
    pending_stamp: bool,

    mapper: M,
    progress: Progress,
    locked: bool,
}

impl<M: UvMapper> Session<M> {
    pub fn new(mask: Rc<SilhouetteMask>, config: SessionConfig, mapper: M, seed: u32) -> Result<Self> {
        config.validate()?;
        if mask.size() == 0 {
            return Err(Error::InvalidMaskSize);
        }
        if mask.size() != config.dirt.size {
            log::warn!(
                "Mask size {} differs from configured grid size {}; using the mask",
                mask.size(), config.dirt.size
            );
        }

        let dirt = DirtSystem::from_config(Rc::clone(&mask), &config.dirt);
        let progress = Progress::new(config.progress_interval_ms, config.win_ratio);

        log::info!(
            "Session: {}x{} grid, {} layers, {} inside cells",
            mask.size(), mask.size(), dirt.layer_count(), mask.inside_count()
        );

        let mut session = Self {
            sponge: Sponge::new(config.sponge.clone()),
            hose: Hose::new(config.hose.clone()),
            config,
            mask,
            dirt,
            rng: Rng::new(seed),
            seed,
            active: ToolKind::Sponge,
            pending_stamp: false,
            mapper,
            progress,
            locked: false,
        };
        session.new_level(seed);
        Ok(session)
    }

    /// Fresh dirt layout for `seed`. Maps are regenerated in place.
    pub fn new_level(&mut self, seed: u32) {
        self.seed = seed;
        self.rng.reseed(seed);
        self.dirt.init(&mut self.rng, &self.config.targets);
        self.sponge.reset();
        self.hose.reset();
        self.progress.reset();
        self.locked = false;
        self.pending_stamp = true;
        log::info!(
            "Level seeded with {:#010x}: {:.1}% dirty",
            seed,
            self.dirt.union_dirty_ratio(DIRTY_EPSILON) * 100.0
        );
    }

    /// Same layout again.
    pub fn restart(&mut self) {
        self.new_level(self.seed);
    }

    pub fn set_tool(&mut self, kind: ToolKind) {
        if kind == self.active { return; }
        let old = self.active_tool();
        let stamped = old.did_stamp_since_last_check();
        old.reset();
        self.pending_stamp |= stamped;
        self.active = kind;
    }

    pub fn handle_down(&mut self, x: f32, y: f32, t: f64) {
        if self.locked { return; }
        self.with_active(|tool, ctx| tool.handle_down(ctx, x, y, t));
    }

    pub fn handle_move(&mut self, x: f32, y: f32, t: f64) {
        if self.locked { return; }
        self.with_active(|tool, ctx| tool.handle_move(ctx, x, y, t));
    }

    pub fn handle_up(&mut self, x: f32, y: f32, t: f64) {
        if self.locked { return; }
        self.with_active(|tool, ctx| tool.handle_up(ctx, x, y, t));
    }

    /// True if the maps changed since the last call. Reading clears it.
    pub fn did_stamp_since_last_check(&mut self) -> bool {
        let active = self.active_tool().did_stamp_since_last_check();
        std::mem::take(&mut self.pending_stamp) || active
    }

    /// Throttled progress read. Locks input once the level is won.
    pub fn poll_progress(&mut self, now_ms: f64) -> Option<f32> {
        let dirt = &self.dirt;
        let ratio = self.progress.poll(now_ms, || dirt.union_dirty_ratio(DIRTY_EPSILON))?;
        if self.progress.is_won() && !self.locked {
            self.locked = true;
            self.active_tool().reset();
            log::info!("Level clean ({:.2}% dirt left)", ratio * 100.0);
        }
        Some(ratio)
    }

    pub fn spray(&self) -> Option<SprayKind> {
        match self.active {
            ToolKind::Hose => self.hose.spray(),
            ToolKind::Sponge => None,
        }
    }

    pub fn set_mapper(&mut self, mapper: M) {
        self.mapper = mapper;
    }

    fn active_tool(&mut self) -> &mut dyn Tool {
        match self.active {
            ToolKind::Sponge => &mut self.sponge,
            ToolKind::Hose => &mut self.hose,
        }
    }

    fn with_active(&mut self, f: impl FnOnce(&mut dyn Tool, &mut ToolContext<'_>)) {
        let tool: &mut dyn Tool = match self.active {
            ToolKind::Sponge => &mut self.sponge,
            ToolKind::Hose => &mut self.hose,
        };
        let mut ctx = ToolContext { dirt: &mut self.dirt, rng: &mut self.rng, mapper: &self.mapper };
        f(tool, &mut ctx);
    }

    pub fn dirt(&self) -> &DirtSystem { &self.dirt }
    pub fn mask(&self) -> &SilhouetteMask { &self.mask }
    pub fn active(&self) -> ToolKind { self.active }
    pub fn seed(&self) -> u32 { self.seed }
    pub fn is_locked(&self) -> bool { self.locked }
    pub fn is_won(&self) -> bool { self.progress.is_won() }
    pub fn ratio(&self) -> f32 { self.progress.ratio() }
    pub fn config(&self) -> &SessionConfig { &self.config }
}
