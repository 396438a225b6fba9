// legacy.rs - Self-contained skip/slide rain animation
//
// Older, frame-counted model that owns its drops and ignores the engine.
// Each drop alternates between skipping (crawl at base gravity) and sliding
// (accelerating with radius), with a slow-down phase at every switch. Small
// drops never move. One `render` call advances exactly one animation frame.
//
// Its numbers live in `LegacyParams`, apart from the main engine's.

use glam::{Vec2, Vec4};

use super::frame::Frame;
use super::paint::{Pen, RadialGradient, Stop, cubic_to, fill_circle, fill_polygon, rgba, white};
use super::{Backend, BackendKind, FrameInput, Layer};
use crate::error::RenderError;
use crate::rng::Mulberry32;
use crate::world::{Backdrop, REFLECTION_STOPS};

const EDGE: [Stop; 3] = [
    (0.0, rgba(0, 0, 0, 0.0)),
    (0.8, rgba(40, 60, 70, 0.15)),
    (1.0, rgba(30, 50, 60, 0.25)),
];
const HIGHLIGHT: [Stop; 3] = [(0.0, white(0.8)), (0.5, white(0.3)), (1.0, white(0.0))];

/// Reflection texture is this many times smaller than the viewport.
const REFLECTION_DOWNSCALE: f32 = 5.0;
/// Bezier flattening steps per curve.
const CURVE_STEPS: usize = 10;

/// Tuning for the skip/slide model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegacyParams {
    /// Drops at or below this radius never move.
    pub gravity_threshold: f32,
    /// Frame rate the per-frame constants were tuned for.
    pub fps: f32,
    pub gravity_y: f32,
    pub gravity_x: f32,
    /// Speed divisor applied each frame while slowing.
    pub slow_divisor: f32,
    /// Full span of the per-frame horizontal jitter.
    pub drift: f32,
    pub trail_speed: f32,
    pub trail_chance: f32,
    /// Parents smaller than this never leave trails.
    pub trail_min_radius: f32,
    pub prune_above: usize,
    pub prune_to: usize,
    /// Respawned drops start up to this far above the top edge.
    pub respawn_band: f32,
}

impl Default for LegacyParams {
    fn default() -> Self {
        let fps = 30.0;
        Self {
            gravity_threshold: 3.0,
            fps,
            gravity_y: fps * 0.001 / 25.0,
            gravity_x: 0.0,
            slow_divisor: 1.1,
            drift: 0.1,
            trail_speed: 0.5,
            trail_chance: 0.1,
            trail_min_radius: 4.0,
            prune_above: 500,
            prune_to: 400,
            respawn_band: 50.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatedDrop {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub xspeed: f32,
    pub yspeed: f32,
    pub opacity: f32,
    /// Frames left before the next skip/slide switch.
    pub timer: i32,
    pub skipping: bool,
    pub slowing: bool,
}

impl AnimatedDrop {
    fn resting(id: u32, x: f32, y: f32, r: f32, opacity: f32) -> Self {
        Self {
            id,
            x,
            y,
            r,
            xspeed: 0.0,
            yspeed: 0.0,
            opacity,
            timer: 0,
            skipping: false,
            slowing: false,
        }
    }
}

pub struct LegacyBackend {
    params: LegacyParams,
    seed: i64,
    /// Runtime randomness, separate from the population stream.
    rng: Mulberry32,
    drops: Vec<AnimatedDrop>,
    next_id: u32,
    width: u32,
    height: u32,
    reflection: Backdrop,
    frame: Frame,
    order: Vec<usize>,
    outline: Vec<Vec2>,
}

impl LegacyBackend {
    pub fn new(width: u32, height: u32, seed: i64, params: LegacyParams) -> Result<Self, RenderError> {
        let mut backend = Self {
            params,
            seed,
            rng: Mulberry32::new(seed.wrapping_add(1)),
            drops: Vec::new(),
            next_id: 0,
            width,
            height,
            reflection: reflection_for(width, height)?,
            frame: Frame::new(width, height)?,
            order: Vec::new(),
            outline: Vec::new(),
        };
        backend.populate();
        Ok(backend)
    }

    pub fn drops(&self) -> &[AnimatedDrop] {
        &self.drops
    }

    pub fn params(&self) -> &LegacyParams {
        &self.params
    }

    /// Seeded starting population: a few large drops near the top, medium
    /// ones in the upper 60%, and a scatter of tiny static beads.
    fn populate(&mut self) {
        self.drops.clear();
        self.next_id = 0;
        if self.width == 0 || self.height == 0 {
            return;
        }

        let (w, h) = (self.width as f32, self.height as f32);
        let frames = self.params.fps * 10.0;
        let mut rng = Mulberry32::new(self.seed);

        for _ in 0..15 {
            let x = rng.next_f32() * w;
            let y = rng.next_f32() * h * 0.3;
            let r = 8.0 + rng.next_f32() * 12.0;
            let opacity = 0.7 + rng.next_f32() * 0.3;
            let mut d = AnimatedDrop::resting(self.take_id(), x, y, r, opacity);
            d.timer = (rng.next_f32() * frames).floor() as i32;
            self.drops.push(d);
        }

        for _ in 0..40 {
            let x = rng.next_f32() * w;
            let y = rng.next_f32() * h * 0.6;
            let r = 4.0 + rng.next_f32() * 6.0;
            let opacity = 0.5 + rng.next_f32() * 0.4;
            let mut d = AnimatedDrop::resting(self.take_id(), x, y, r, opacity);
            d.timer = (rng.next_f32() * frames).floor() as i32;
            d.skipping = rng.next_f32() > 0.5;
            self.drops.push(d);
        }

        for _ in 0..150 {
            let x = rng.next_f32() * w;
            let y = rng.next_f32() * h;
            let r = 1.0 + rng.next_f32() * 2.5;
            let opacity = 0.4 + rng.next_f32() * 0.4;
            let d = AnimatedDrop::resting(self.take_id(), x, y, r, opacity);
            self.drops.push(d);
        }
    }

    fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// One animation frame: move, respawn, prune.
    pub fn step(&mut self) {
        let (w, h) = (self.width as f32, self.height as f32);

        // Trails pushed during the walk are walked too, in the same frame.
        let mut i = 0;
        while i < self.drops.len() {
            let mut d = self.drops[i];
            if self.apply_gravity(&mut d, w, h) && d.r > self.params.gravity_threshold {
                self.respawn(&mut d, w);
            }
            self.drops[i] = d;
            i += 1;
        }

        if self.drops.len() > self.params.prune_above {
            self.drops.sort_by(|a, b| b.r.total_cmp(&a.r));
            self.drops.truncate(self.params.prune_to);
        }
    }

    /// Returns true when the drop has stopped: too small to move, or gone
    /// off screen.
    fn apply_gravity(&mut self, d: &mut AnimatedDrop, w: f32, h: f32) -> bool {
        let p = self.params;
        if d.r <= p.gravity_threshold {
            return true;
        }
        if d.y - d.r > h || d.x - d.r > w || d.x + d.r < 0.0 {
            return true;
        }

        if d.timer <= 0 {
            d.timer = (d.r * self.rng.next_f32() * p.fps).floor() as i32;
            d.skipping = !d.skipping;
            d.slowing = true;
        }
        d.timer -= 1;

        if d.yspeed != 0.0 {
            if d.slowing {
                d.yspeed /= p.slow_divisor;
                d.xspeed /= p.slow_divisor;
                if d.yspeed < p.gravity_y {
                    d.slowing = false;
                }
            } else if d.skipping {
                d.yspeed = p.gravity_y;
                d.xspeed = p.gravity_x;
            } else {
                d.yspeed += p.gravity_y * d.r;
                d.xspeed += p.gravity_x * d.r;
            }
        } else {
            d.yspeed = p.gravity_y;
            d.xspeed = p.gravity_x;
        }

        d.xspeed += self.rng.signed_f32(p.drift);
        d.y += d.yspeed;
        d.x += d.xspeed;

        if d.yspeed > p.trail_speed && self.rng.chance(p.trail_chance) {
            self.shed_trail(d);
        }
        false
    }

    fn shed_trail(&mut self, parent: &AnimatedDrop) {
        if parent.r < self.params.trail_min_radius {
            return;
        }
        let x = parent.x + (self.rng.next_f32() * 2.0 - 1.0);
        let y = parent.y - parent.r - 5.0;
        let r = (parent.r / 5.0).max(1.0);
        let id = self.take_id();
        self.drops.push(AnimatedDrop::resting(id, x, y, r, parent.opacity * 0.8));
    }

    fn respawn(&mut self, d: &mut AnimatedDrop, w: f32) {
        d.y = -d.r - self.rng.next_f32() * self.params.respawn_band;
        d.x = self.rng.next_f32() * w;
        d.yspeed = 0.0;
        d.xspeed = 0.0;
        d.timer = (d.r * self.rng.next_f32() * self.params.fps).floor() as i32;
        d.skipping = self.rng.next_f32() > 0.5;
        d.slowing = false;
    }

    fn draw(&mut self) {
        self.frame.clear();

        self.order.clear();
        self.order.extend(0..self.drops.len());
        let drops = &self.drops;
        self.order.sort_by(|&a, &b| drops[a].r.total_cmp(&drops[b].r));

        for k in 0..self.order.len() {
            let d = self.drops[self.order[k]];
            self.draw_drop(&d);
        }
    }

    fn draw_drop(&mut self, d: &AnimatedDrop) {
        let (w, h) = (self.width as f32, self.height as f32);
        let c = Vec2::new(d.x, d.y);
        let r = d.r.max(0.01);
        let pen = Pen::identity().with_alpha(d.opacity);

        self.outline.clear();
        outline(&mut self.outline, c, r, d.yspeed);

        // Reflection: an 8r square of the backdrop squeezed into the 4r
        // square around the drop, clipped to the drop's outline.
        let src = Vec2::new((c.x - r * 4.0).max(0.0), (c.y - r * 4.0).max(0.0));
        let dst = c - r * 2.0;
        let reflection = &self.reflection;
        let mirror = |p: Vec2| {
            if p.x < dst.x || p.y < dst.y || p.x > dst.x + r * 4.0 || p.y > dst.y + r * 4.0 {
                return Vec4::ZERO;
            }
            let at = src + (p - dst) * 2.0;
            reflection.sample(at.x / w, at.y / h).extend(1.0)
        };
        fill_polygon(&mut self.frame, &pen, &self.outline, mirror);

        let edge = RadialGradient::new(c, r * 0.7, r, &EDGE);
        fill_polygon(&mut self.frame, &pen, &self.outline, |p| edge.at(p));

        if r > 4.0 {
            let hl = c - r * 0.3;
            let glow = RadialGradient::new(hl, 0.0, r * 0.4, &HIGHLIGHT);
            fill_circle(&mut self.frame, &pen, hl, r * 0.4, |p| glow.at(p));
            fill_circle(&mut self.frame, &pen, c - r * 0.35, r * 0.08, |_| white(0.95));
        }
    }
}

/// Circle for beads, a teardrop when sliding fast, else a slightly shrunk
/// circle.
fn outline(out: &mut Vec<Vec2>, c: Vec2, r: f32, yspeed: f32) {
    let circle = |out: &mut Vec<Vec2>, radius: f32| {
        let n = 24;
        for i in 0..n {
            let a = i as f32 / n as f32 * std::f32::consts::TAU;
            out.push(c + Vec2::from_angle(a) * radius);
        }
    };

    if r < 3.0 {
        circle(out, r);
    } else if yspeed > 2.0 {
        let yr = 1.0 + 0.1 * yspeed;
        let left = c + Vec2::new(-r / yr, 0.0);
        let right = c + Vec2::new(r / yr, 0.0);
        out.push(left);
        cubic_to(out, left, c + Vec2::new(-r, -r * 2.0), c + Vec2::new(r, -r * 2.0), right, CURVE_STEPS);
        cubic_to(out, right, c + Vec2::new(r, yr * r), c + Vec2::new(-r, yr * r), left, CURVE_STEPS);
        out.pop();
    } else {
        circle(out, r * 0.9);
    }
}

fn reflection_for(width: u32, height: u32) -> Result<Backdrop, RenderError> {
    let rw = ((width as f32 / REFLECTION_DOWNSCALE).floor() as usize).max(1);
    let rh = ((height as f32 / REFLECTION_DOWNSCALE).floor() as usize).max(1);
    Backdrop::vertical_gradient(rw, rh, &REFLECTION_STOPS)
}

impl Backend for LegacyBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::LegacyRasterPhysics
    }

    /// A new viewport restarts the animation from the seeded population.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.frame.resize(width, height)?;
        self.reflection = reflection_for(width, height)?;
        self.width = width;
        self.height = height;
        self.rng = Mulberry32::new(self.seed.wrapping_add(1));
        self.populate();
        Ok(())
    }

    fn render(&mut self, input: &FrameInput<'_>) -> Layer<'_> {
        if input.is_zero_sized() {
            return Layer::Empty;
        }
        if (input.width, input.height) != (self.width, self.height) {
            if let Err(e) = self.resize(input.width, input.height) {
                log::warn!("legacy backend cannot follow viewport: {e}");
                return Layer::Empty;
            }
        }

        self.step();
        self.draw();
        Layer::Pixels(&self.frame)
    }
}
