// tool.rs - Cleaning tools
//
// Each tool owns its stroke state and turns pointer input into stamps.
// The session picks one active tool and forwards input to it.

use crate::dirt::{DirtSystem, DIRTY_EPSILON};
use crate::rng::Rng;
use crate::stroke::{DirtStamper, StrokeConfig, StrokeSystem, UvMapper};

/// What a tool works against for one input event.
pub struct ToolContext<'a> {
    pub dirt: &'a mut DirtSystem,
    pub rng: &'a mut Rng,
    pub mapper: &'a dyn UvMapper,
}

pub trait Tool {
    fn handle_down(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, t: f64);
    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, t: f64);
    fn handle_up(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, t: f64);
    fn did_stamp_since_last_check(&mut self) -> bool;

    /// Called when the tool is switched away from or the level restarts.
    fn reset(&mut self) {}
}

macro_rules! forward_stroke {
    ($stroke:expr, $method:ident, $ctx:expr, $x:expr, $y:expr, $t:expr) => {{
        let mut sink = DirtStamper { dirt: &mut *$ctx.dirt, mapper: $ctx.mapper };
        $stroke.$method($x, $y, $t, &mut *$ctx.rng, &mut sink);
    }};
}

/// Scrubbing tool: wide stamps, no speed response.
pub struct Sponge {
    stroke: StrokeSystem,
}

impl Sponge {
    pub fn new(config: StrokeConfig) -> Self {
        Self { stroke: StrokeSystem::new(config) }
    }
}

impl Tool for Sponge {
    fn handle_down(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, t: f64) {
        forward_stroke!(self.stroke, handle_down, ctx, x, y, t);
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, t: f64) {
        forward_stroke!(self.stroke, handle_move, ctx, x, y, t);
    }

    fn handle_up(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, t: f64) {
        forward_stroke!(self.stroke, handle_up, ctx, x, y, t);
    }

    fn did_stamp_since_last_check(&mut self) -> bool {
        self.stroke.did_stamp_since_last_check()
    }

    fn reset(&mut self) {
        self.stroke.reset();
    }
}

/// Particle kind the hose should spray at its nozzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SprayKind {
    /// Hitting grime: dirty runoff.
    Dirt,
    /// Clean surface or off the object: plain water.
    Water,
}

/// Water stream: fine spacing, radius grows with pointer speed.
pub struct Hose {
    stroke: StrokeSystem,
    spray: Option<SprayKind>,
}

impl Hose {
    pub fn new(config: StrokeConfig) -> Self {
        Self { stroke: StrokeSystem::new(config), spray: None }
    }

    /// `None` while the hose is off.
    pub fn spray(&self) -> Option<SprayKind> { self.spray }

    fn sample_spray(&mut self, ctx: &ToolContext<'_>, x: f32, y: f32) {
        let value = ctx
            .mapper
            .to_uv(x, y)
            .map_or(0.0, |(u, v)| ctx.dirt.union_dirty_value_at(u, v));
        self.spray = Some(if value > DIRTY_EPSILON { SprayKind::Dirt } else { SprayKind::Water });
    }
}

impl Tool for Hose {
    fn handle_down(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, t: f64) {
        // sample before the anchor stamp washes the spot
        self.sample_spray(ctx, x, y);
        forward_stroke!(self.stroke, handle_down, ctx, x, y, t);
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, t: f64) {
        if !self.stroke.is_dragging() { return; }
        self.sample_spray(ctx, x, y);
        forward_stroke!(self.stroke, handle_move, ctx, x, y, t);
    }

    fn handle_up(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, t: f64) {
        forward_stroke!(self.stroke, handle_up, ctx, x, y, t);
        self.spray = None;
    }

    fn did_stamp_since_last_check(&mut self) -> bool {
        self.stroke.did_stamp_since_last_check()
    }

    fn reset(&mut self) {
        self.stroke.reset();
        self.spray = None;
    }
}
