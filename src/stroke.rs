// stroke.rs - Drag path to evenly spaced stamps
//
// idle -> dragging -> idle. Stamps land every `spacing` units along the
// path no matter how often the pointer reports. Leftover distance carries
// into the next move event.

use serde::Deserialize;

use crate::dirt::{DirtSystem, MIN_RADIUS_FACTOR};
use crate::rng::Rng;

const MIN_SPACING: f32 = 0.5;
const SPEED_BOOST_MAX: f32 = 0.15;
const SPEED_BOOST_FULL: f32 = 600.0; // px/s

/// Maps an input position to surface UV in [0, 1]^2.
/// `None` means the position is off the surface.
pub trait UvMapper {
    fn to_uv(&self, x: f32, y: f32) -> Option<(f32, f32)>;
}

impl<F> UvMapper for F
where
    F: Fn(f32, f32) -> Option<(f32, f32)>,
{
    fn to_uv(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        self(x, y)
    }
}

/// Axis-aligned surface rectangle in input space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

impl UvMapper for SurfaceRect {
    fn to_uv(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        if !(self.width > 0.0 && self.height > 0.0) { return None; }
        let u = (x - self.x) / self.width;
        let v = (y - self.y) / self.height;
        ((0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v)).then_some((u, v))
    }
}

/// Receives stamps as the converter places them.
pub trait StampSink {
    fn stamp(&mut self, x: f32, y: f32, strength: f32, radius_factor: f32);
}

/// Recorded stamp, input-space position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stamp {
    pub x: f32,
    pub y: f32,
    pub strength: f32,
    pub radius_factor: f32,
}

impl StampSink for Vec<Stamp> {
    fn stamp(&mut self, x: f32, y: f32, strength: f32, radius_factor: f32) {
        self.push(Stamp { x, y, strength, radius_factor });
    }
}

/// Applies stamps to the coverage engine through a UV mapper.
pub struct DirtStamper<'a, M: UvMapper + ?Sized> {
    pub dirt: &'a mut DirtSystem,
    pub mapper: &'a M,
}

impl<M: UvMapper + ?Sized> StampSink for DirtStamper<'_, M> {
    fn stamp(&mut self, x: f32, y: f32, strength: f32, radius_factor: f32) {
        if let Some((u, v)) = self.mapper.to_uv(x, y) {
            self.dirt.apply_stamp_uv(u, v, strength, radius_factor);
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrokeConfig {
    /// Distance between stamps, input units.
    pub spacing: f32,
    /// Constant strength per stamp.
    pub strength: f32,
    /// Tool multiplier on the engine's stamp radius.
    pub radius_scale: f32,
    /// Per-stamp radius jitter, +/- this fraction.
    pub jitter: f32,
    /// Grow the radius (up to +15%) with pointer speed.
    pub speed_boost: bool,
}

impl StrokeConfig {
    pub fn sponge() -> Self {
        Self { spacing: 6.0, strength: 0.35, radius_scale: 1.0, jitter: 0.15, speed_boost: false }
    }

    pub fn hose() -> Self {
        Self { spacing: 3.0, strength: 0.12, radius_scale: 0.7, jitter: 0.25, speed_boost: true }
    }
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self::sponge()
    }
}

pub struct StrokeSystem {
    config: StrokeConfig,
    dragging: bool,
    last: (f32, f32),
    last_t: f64,
    residual: f32,
    dir: (f32, f32),
    speed: f32,
    stamped: bool,
}

impl StrokeSystem {
    pub fn new(config: StrokeConfig) -> Self {
        Self {
            config,
            dragging: false,
            last: (0.0, 0.0),
            last_t: 0.0,
            residual: 0.0,
            dir: (0.0, -1.0),
            speed: 0.0,
            stamped: false,
        }
    }

    /// Start a drag. Always stamps once at the start point.
    pub fn handle_down(&mut self, x: f32, y: f32, t: f64, rng: &mut Rng, sink: &mut impl StampSink) {
        self.dragging = true;
        self.residual = 0.0;
        self.dir = (0.0, -1.0);
        self.speed = 0.0;
        self.last = (x, y);
        self.last_t = t;
        self.place(x, y, rng, sink);
    }

    pub fn handle_move(&mut self, x: f32, y: f32, t: f64, rng: &mut Rng, sink: &mut impl StampSink) {
        if !self.dragging { return; }

        let (lx, ly) = self.last;
        let (dx, dy) = (x - lx, y - ly);
        let seg = (dx * dx + dy * dy).sqrt();

        if seg > 0.0 && seg.is_finite() {
            let dir = (dx / seg, dy / seg);
            self.dir = dir;

            let dt = t - self.last_t;
            if dt > 0.0 {
                self.speed = (seg as f64 / (dt / 1000.0)) as f32;
            }

            // positions indexed from the first stamp so long segments neither drift nor stall
            let spacing = self.config.spacing.max(MIN_SPACING) as f64;
            let first = spacing - self.residual as f64;
            let seg = seg as f64;
            if first <= seg {
                let count = ((seg - first) / spacing).floor() as u64 + 1;
                for k in 0..count {
                    let along = (first + k as f64 * spacing) as f32;
                    self.place(lx + dir.0 * along, ly + dir.1 * along, rng, sink);
                }
                let last = first + (count - 1) as f64 * spacing;
                self.residual = (seg - last).clamp(0.0, spacing) as f32;
            } else {
                self.residual = (self.residual as f64 + seg) as f32;
            }
        }

        self.last = (x, y);
        self.last_t = t;
    }

    /// End a drag. Always stamps once at the end point.
    pub fn handle_up(&mut self, x: f32, y: f32, t: f64, rng: &mut Rng, sink: &mut impl StampSink) {
        if !self.dragging { return; }
        self.place(x, y, rng, sink);
        self.last = (x, y);
        self.last_t = t;
        self.dragging = false;
        self.residual = 0.0;
    }

    /// True if any stamp landed since the last call. Reading clears it.
    pub fn did_stamp_since_last_check(&mut self) -> bool {
        std::mem::take(&mut self.stamped)
    }

    /// Drop the current drag without a closing stamp.
    pub fn reset(&mut self) {
        self.dragging = false;
        self.residual = 0.0;
        self.dir = (0.0, -1.0);
        self.speed = 0.0;
    }

    fn place(&mut self, x: f32, y: f32, rng: &mut Rng, sink: &mut impl StampSink) {
        let jitter = if self.config.jitter > 0.0 { rng.signed(self.config.jitter) } else { 0.0 };
        let boost = if self.config.speed_boost {
            SPEED_BOOST_MAX * (self.speed / SPEED_BOOST_FULL).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let radius_factor =
            (self.config.radius_scale * (1.0 + jitter) * (1.0 + boost)).max(MIN_RADIUS_FACTOR);

        sink.stamp(x, y, self.config.strength, radius_factor);
        self.stamped = true;
    }

    pub fn is_dragging(&self) -> bool { self.dragging }
    pub fn direction(&self) -> (f32, f32) { self.dir }
    pub fn residual(&self) -> f32 { self.residual }
    pub fn config(&self) -> &StrokeConfig { &self.config }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(spacing: f32) -> StrokeSystem {
        StrokeSystem::new(StrokeConfig {
            spacing,
            strength: 0.5,
            radius_scale: 1.0,
            jitter: 0.0,
            speed_boost: false,
        })
    }

    #[test]
    fn test_tap_places_two_stamps() {
        let mut s = still(5.0);
        let mut rng = Rng::new(1);
        let mut out: Vec<Stamp> = Vec::new();
        s.handle_down(10.0, 10.0, 0.0, &mut rng, &mut out);
        s.handle_up(10.0, 10.0, 0.0, &mut rng, &mut out);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|p| p.x == 10.0 && p.y == 10.0));
        assert!(!s.is_dragging());
    }

    #[test]
    fn test_even_spacing_across_uneven_moves() {
        let mut s = still(6.0);
        let mut rng = Rng::new(1);
        let mut out: Vec<Stamp> = Vec::new();
        s.handle_down(0.0, 0.0, 0.0, &mut rng, &mut out);
        let mut x = 0.0f32;
        let mut t = 0.0;
        for step in [1.7f32, 0.4, 9.3, 2.2, 0.0, 13.1, 5.0, 3.3].iter().cycle().take(40) {
            x += step;
            t += 16.0;
            s.handle_move(x, 0.0, t, &mut rng, &mut out);
        }
        s.handle_up(x, 0.0, t, &mut rng, &mut out);

        let interior = &out[1..out.len() - 1];
        let expected = (x / 6.0).floor() as usize;
        assert!(interior.len().abs_diff(expected) <= 1, "{} vs {}", interior.len(), expected);
        for (i, p) in interior.iter().enumerate() {
            assert!((p.x - 6.0 * (i + 1) as f32).abs() < 1e-2, "stamp {i} at {}", p.x);
            assert_eq!(p.y, 0.0);
        }
    }

    struct Tally {
        count: u64,
        last_x: f32,
    }

    impl StampSink for Tally {
        fn stamp(&mut self, x: f32, _y: f32, _strength: f32, _radius_factor: f32) {
            self.count += 1;
            self.last_x = x;
        }
    }

    #[test]
    fn test_long_segment_terminates_with_exact_count() {
        let mut s = StrokeSystem::new(StrokeConfig { jitter: 0.0, ..StrokeConfig::hose() });
        let mut rng = Rng::new(1);
        let mut tally = Tally { count: 0, last_x: 0.0 };
        s.handle_down(0.0, 0.0, 0.0, &mut rng, &mut tally);
        s.handle_move(1e8, 0.0, 1000.0, &mut rng, &mut tally);
        // down stamp plus one every 3 units up to 99_999_999
        assert_eq!(tally.count, 1 + 33_333_333);
        assert_eq!(tally.last_x, 99_999_999.0f64 as f32);
        assert!((s.residual() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_spaced_positions_are_exact_multiples() {
        let mut s = still(0.7);
        let mut rng = Rng::new(1);
        let mut out: Vec<Stamp> = Vec::new();
        s.handle_down(0.0, 0.0, 0.0, &mut rng, &mut out);
        s.handle_move(7000.0, 0.0, 16.0, &mut rng, &mut out);
        assert_eq!(out.len(), 1 + 10_000);
        for (k, p) in out[1..].iter().enumerate() {
            let expected = 0.7f32 as f64 * (k + 1) as f64;
            assert!((p.x as f64 - expected).abs() < 1e-3, "stamp {k} at {}", p.x);
        }
    }

    #[test]
    fn test_diagonal_interpolation() {
        let mut s = still(5.0);
        let mut rng = Rng::new(1);
        let mut out: Vec<Stamp> = Vec::new();
        s.handle_down(0.0, 0.0, 0.0, &mut rng, &mut out);
        s.handle_move(30.0, 40.0, 16.0, &mut rng, &mut out);
        // 50 units long: stamps at 5, 10, ..., 50
        assert_eq!(out.len(), 11);
        assert!((out[1].x - 3.0).abs() < 1e-4 && (out[1].y - 4.0).abs() < 1e-4);
        assert!((s.residual()).abs() < 1e-4);
        let (dx, dy) = s.direction();
        assert!((dx - 0.6).abs() < 1e-6 && (dy - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_zero_length_move_keeps_direction() {
        let mut s = still(5.0);
        let mut rng = Rng::new(1);
        let mut out: Vec<Stamp> = Vec::new();
        s.handle_down(0.0, 0.0, 0.0, &mut rng, &mut out);
        assert_eq!(s.direction(), (0.0, -1.0));
        s.handle_move(3.0, 0.0, 10.0, &mut rng, &mut out);
        s.handle_move(3.0, 0.0, 20.0, &mut rng, &mut out);
        assert_eq!(s.direction(), (1.0, 0.0));
        assert!((s.residual() - 3.0).abs() < 1e-6);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_moves_while_idle_ignored() {
        let mut s = still(1.0);
        let mut rng = Rng::new(1);
        let mut out: Vec<Stamp> = Vec::new();
        s.handle_move(50.0, 50.0, 0.0, &mut rng, &mut out);
        s.handle_up(50.0, 50.0, 0.0, &mut rng, &mut out);
        assert!(out.is_empty());
        assert!(!s.did_stamp_since_last_check());
    }

    #[test]
    fn test_stamp_flag_is_one_shot() {
        let mut s = still(5.0);
        let mut rng = Rng::new(1);
        let mut out: Vec<Stamp> = Vec::new();
        s.handle_down(0.0, 0.0, 0.0, &mut rng, &mut out);
        assert!(s.did_stamp_since_last_check());
        assert!(!s.did_stamp_since_last_check());
        s.handle_move(2.0, 0.0, 16.0, &mut rng, &mut out);
        assert!(!s.did_stamp_since_last_check());
        s.handle_move(8.0, 0.0, 32.0, &mut rng, &mut out);
        assert!(s.did_stamp_since_last_check());
    }

    #[test]
    fn test_jitter_bounds_radius() {
        let mut s = StrokeSystem::new(StrokeConfig { jitter: 2.0, ..StrokeConfig::sponge() });
        let mut rng = Rng::new(9);
        let mut out: Vec<Stamp> = Vec::new();
        s.handle_down(0.0, 0.0, 0.0, &mut rng, &mut out);
        s.handle_move(600.0, 0.0, 1000.0, &mut rng, &mut out);
        assert!(out.iter().all(|p| p.radius_factor >= MIN_RADIUS_FACTOR && p.radius_factor < 3.0));
        assert!(out.iter().any(|p| p.radius_factor == MIN_RADIUS_FACTOR));
        assert!(out.iter().all(|p| p.strength == StrokeConfig::sponge().strength));
    }

    #[test]
    fn test_speed_boost_caps_at_fifteen_percent() {
        let cfg = StrokeConfig { jitter: 0.0, speed_boost: true, ..StrokeConfig::sponge() };
        let mut s = StrokeSystem::new(cfg);
        let mut rng = Rng::new(1);
        let mut out: Vec<Stamp> = Vec::new();
        s.handle_down(0.0, 0.0, 0.0, &mut rng, &mut out);
        assert_eq!(out[0].radius_factor, 1.0);

        // 300 px/s: half boost
        s.handle_move(30.0, 0.0, 100.0, &mut rng, &mut out);
        assert!((out.last().unwrap().radius_factor - 1.075).abs() < 1e-4);

        // 3000 px/s: capped
        s.handle_move(330.0, 0.0, 200.0, &mut rng, &mut out);
        assert!((out.last().unwrap().radius_factor - 1.15).abs() < 1e-4);
    }

    #[test]
    fn test_surface_rect_mapping() {
        let rect = SurfaceRect::new(100.0, 50.0, 200.0, 100.0);
        assert_eq!(rect.to_uv(200.0, 100.0), Some((0.5, 0.5)));
        assert_eq!(rect.to_uv(99.0, 100.0), None);
        assert_eq!(SurfaceRect::new(0.0, 0.0, 0.0, 10.0).to_uv(0.0, 0.0), None);
    }

    #[test]
    fn test_closure_mapper_drives_dirt() {
        use crate::dirt::LayerConfig;
        use crate::mask::SilhouetteMask;
        use std::rc::Rc;

        let mask = Rc::new(SilhouetteMask::full(32));
        let mut dirt = DirtSystem::new(mask, 2.0, vec![LayerConfig::new("mold", 1.0, 1.0)]);
        let targets = [("mold".to_string(), 1.0)].into_iter().collect();
        dirt.init(&mut Rng::new(3), &targets);

        let mapper = |x: f32, y: f32| Some((x / 32.0, y / 32.0));
        let mut s = still(2.0);
        let mut rng = Rng::new(1);
        let mut sink = DirtStamper { dirt: &mut dirt, mapper: &mapper };
        s.handle_down(4.5, 16.5, 0.0, &mut rng, &mut sink);
        s.handle_move(28.5, 16.5, 100.0, &mut rng, &mut sink);
        s.handle_up(28.5, 16.5, 120.0, &mut rng, &mut sink);

        let map = dirt.map("mold").unwrap();
        for x in 4..=28 {
            assert!(map[16 * 32 + x] < 1.0, "cell {x} untouched");
        }
        assert_eq!(map[2 * 32 + 16], 1.0);
    }
}
