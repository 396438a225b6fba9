// sprite.rs - Physics drops as refracting sprites
//
// Each engine drop becomes one screen-aligned quad. Inside the inscribed
// circle the surface is treated as a hemisphere: its normal bends the
// backdrop lookup per channel (chromatic refraction), then specular, fresnel
// and a little occlusion are layered on top.

use glam::{Vec2, Vec3};

use super::frame::Frame;
use super::{Backend, BackendKind, FrameInput, Layer};
use crate::error::RenderError;
use crate::sim::PhysicsDrop;
use crate::world::{Backdrop, PHYSICS_STOPS};

/// Instance buffer capacity; drops past this are not drawn.
pub const MAX_INSTANCES: usize = 4000;

const IOR: f32 = 1.333;
/// Per-channel IOR multipliers: red bends least, blue most.
const CHROMA: Vec3 = Vec3::new(0.98, 1.0, 1.02);
const REFRACTION: f32 = 0.08;
const SPECULAR_POWER: f32 = 32.0;
const FRESNEL_POWER: f32 = 2.5;
const ALPHA: f32 = 0.95;

/// Gradient is vertical only, so a narrow texture samples the same.
const BACKDROP_SIZE: (usize, usize) = (16, 960);

/// One quad: center and full extent in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteInstance {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl SpriteInstance {
    pub fn from_drop(d: &PhysicsDrop) -> Self {
        let scale = d.radius() * 2.0;
        let (mut sx, mut sy) = (scale, scale);
        if d.is_flowing() {
            let f = (d.vy * 0.1).min(1.0);
            sy = scale * (1.0 + f);
            sx = scale * (1.0 - f * 0.3);
        }
        Self { x: d.x, y: d.y, scale_x: sx, scale_y: sy }
    }
}

pub struct SpriteBackend {
    backdrop: Backdrop,
    /// Backdrop color per frame row.
    rows: Vec<Vec3>,
    light: Vec3,
    instances: Vec<SpriteInstance>,
    frame: Frame,
}

impl SpriteBackend {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let backdrop = Backdrop::vertical_gradient(BACKDROP_SIZE.0, BACKDROP_SIZE.1, &PHYSICS_STOPS)?;
        let mut backend = Self {
            backdrop,
            rows: Vec::new(),
            light: Vec3::new(-0.5, 0.8, 1.0).normalize(),
            instances: Vec::with_capacity(MAX_INSTANCES),
            frame: Frame::new(width, height)?,
        };
        backend.cache_rows();
        Ok(backend)
    }

    /// Instances from the last rendered frame.
    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }

    fn cache_rows(&mut self) {
        let h = self.frame.height();
        self.rows.clear();
        self.rows
            .extend((0..h).map(|y| self.backdrop.sample(0.5, (y as f32 + 0.5) / h as f32)));
    }

    fn draw_background(&mut self) {
        for y in 0..self.frame.height() {
            let c = self.rows[y as usize];
            for x in 0..self.frame.width() {
                self.frame.set(x, y, c);
            }
        }
    }

    fn draw_sprite(&mut self, s: SpriteInstance) {
        if !(s.scale_x > 0.0 && s.scale_y > 0.0) || !s.x.is_finite() || !s.y.is_finite() {
            return;
        }
        let size = Vec2::new(self.frame.width() as f32, self.frame.height() as f32);
        let half = Vec2::new(s.scale_x, s.scale_y) * 0.5;
        let lo = Vec2::new(s.x, s.y) - half;
        let hi = Vec2::new(s.x, s.y) + half;

        let x0 = lo.x.floor().max(0.0) as u32;
        let y0 = lo.y.floor().max(0.0) as u32;
        let x1 = (hi.x.ceil().max(0.0) as u32).min(self.frame.width());
        let y1 = (hi.y.ceil().max(0.0) as u32).min(self.frame.height());

        for py in y0..y1 {
            for px in x0..x1 {
                let pc = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                // Quad UV with v up, as on the GPU.
                let u = (pc.x - lo.x) / s.scale_x;
                let v = 1.0 - (pc.y - lo.y) / s.scale_y;
                let p = Vec2::new(u, v) * 2.0 - 1.0;
                let r2 = p.length_squared();
                if r2 > 1.0 {
                    continue;
                }
                let color = self.shade(p, r2, pc / size);
                self.frame.blend(px as i32, py as i32, color.extend(ALPHA));
            }
        }
    }

    /// `screen` is top-down 0..1.
    fn shade(&self, p: Vec2, r2: f32, screen: Vec2) -> Vec3 {
        let r = r2.sqrt();
        let normal = Vec3::new(p.x, p.y, (1.0 - r2).max(0.0).sqrt()).normalize_or(Vec3::Z);
        // Normal is y-up; screen v grows downward.
        let bend = Vec2::new(normal.x, -normal.y) * REFRACTION * IOR;

        let sample = |k: f32| {
            let at = screen - bend * k;
            self.backdrop.sample(at.x, at.y)
        };
        let refracted = Vec3::new(sample(CHROMA.x).x, sample(CHROMA.y).y, sample(CHROMA.z).z);

        let specular = normal.dot(self.light).max(0.0).powf(SPECULAR_POWER);
        let fresnel = (1.0 - normal.z).max(0.0).powf(FRESNEL_POWER);
        let ao = 1.0 - r * 0.2;

        refracted * ao * (1.0 - fresnel * 0.3) + Vec3::splat(specular * 0.8 + fresnel * 0.15)
    }
}

impl Backend for SpriteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::SpritePhysics
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.frame.resize(width, height)?;
        self.cache_rows();
        Ok(())
    }

    fn render(&mut self, input: &FrameInput<'_>) -> Layer<'_> {
        if input.is_zero_sized() {
            return Layer::Empty;
        }
        if (input.width, input.height) != (self.frame.width(), self.frame.height()) {
            if let Err(e) = self.resize(input.width, input.height) {
                log::warn!("sprite backend cannot follow viewport: {e}");
                return Layer::Empty;
            }
        }

        self.instances.clear();
        self.instances
            .extend(input.physics.iter().take(MAX_INSTANCES).map(SpriteInstance::from_drop));

        self.draw_background();
        for i in 0..self.instances.len() {
            let s = self.instances[i];
            self.draw_sprite(s);
        }
        Layer::Pixels(&self.frame)
    }
}
