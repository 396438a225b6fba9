// raster.rs - Immediate-mode rendering of the decorative set
//
// Same three detail tiers as the vector backend, painted into a pixel buffer
// at device resolution. Positions are in CSS pixels, radii scale with the
// viewport width against the 640-wide design canvas. Redraws only when the
// snapshot or the viewport changes.

use glam::{Vec2, Vec4};

use super::frame::Frame;
use super::paint::{Pen, RadialGradient, Stop, fill_circle, fill_ellipse, rgba, white};
use super::{Backend, BackendKind, FrameInput, Layer};
use crate::error::RenderError;
use crate::scene::{DESIGN_WIDTH, Droplet, SizeClass};

const BODY: [Stop; 6] = [
    (0.0, white(0.06)),
    (0.6, white(0.02)),
    (0.82, white(0.01)),
    (0.88, rgba(60, 80, 90, 0.15)),
    (0.94, rgba(40, 60, 70, 0.35)),
    (1.0, rgba(30, 50, 60, 0.25)),
];
const LENS: [Stop; 2] = [(0.0, white(0.08)), (1.0, white(0.0))];
const CAUSTIC: [Stop; 2] = [(0.0, white(0.25)), (1.0, white(0.0))];
const HIGHLIGHT: [Stop; 3] = [(0.0, white(0.9)), (0.5, white(0.35)), (1.0, white(0.0))];

const SMALL_BODY: [Stop; 4] = [
    (0.0, white(0.08)),
    (0.6, white(0.03)),
    (0.85, rgba(50, 70, 80, 0.2)),
    (1.0, rgba(40, 60, 70, 0.15)),
];
const SMALL_HIGHLIGHT: [Stop; 2] = [(0.0, white(0.7)), (1.0, white(0.0))];

/// Shadow blur, CSS pixels.
const SHADOW_BLUR: f32 = 3.0;

const MIN_DPR: f32 = 0.5;
const MAX_DPR: f32 = 4.0;

pub struct RasterBackend {
    frame: Frame,
    dpr: f32,
    width: u32,
    height: u32,
    /// Copy of the snapshot the frame holds; `None` forces a redraw.
    drawn: Option<Vec<Droplet>>,
    order: Vec<usize>,
}

impl RasterBackend {
    pub fn new(width: u32, height: u32, dpr: f32) -> Result<Self, RenderError> {
        let dpr = if dpr.is_finite() { dpr.clamp(MIN_DPR, MAX_DPR) } else { 1.0 };
        let (dw, dh) = device_size(width, height, dpr);
        Ok(Self {
            frame: Frame::new(dw, dh)?,
            dpr,
            width,
            height,
            drawn: None,
            order: Vec::new(),
        })
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.dpr
    }

    fn redraw(&mut self, drops: &[Droplet]) {
        self.frame.clear();

        // Ascending radius, stable, so big drops land on top whatever order
        // the caller handed over.
        self.order.clear();
        self.order.extend(0..drops.len());
        self.order.sort_by(|&a, &b| drops[a].radius.total_cmp(&drops[b].radius));

        let w = self.width as f32;
        let h = self.height as f32;
        for &i in &self.order {
            draw_droplet(&mut self.frame, &drops[i], w, h, self.dpr);
        }
    }
}

impl Backend for RasterBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Raster
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let (dw, dh) = device_size(width, height, self.dpr);
        self.frame.resize(dw, dh)?;
        self.width = width;
        self.height = height;
        self.drawn = None;
        Ok(())
    }

    fn render(&mut self, input: &FrameInput<'_>) -> Layer<'_> {
        if input.is_zero_sized() {
            return Layer::Empty;
        }
        if (input.width, input.height) != (self.width, self.height) {
            if let Err(e) = self.resize(input.width, input.height) {
                log::warn!("raster backend cannot follow viewport: {e}");
                return Layer::Empty;
            }
        }

        if self.drawn.as_deref() != Some(input.drops) {
            self.redraw(input.drops);
            self.drawn = Some(input.drops.to_vec());
        }
        Layer::Pixels(&self.frame)
    }
}

fn device_size(width: u32, height: u32, dpr: f32) -> (u32, u32) {
    ((width as f32 * dpr).round() as u32, (height as f32 * dpr).round() as u32)
}

fn draw_droplet(frame: &mut Frame, d: &Droplet, width: f32, height: f32, dpr: f32) {
    let center = Vec2::new(d.x as f32 * width, d.y as f32 * height);
    let r = d.radius as f32 * (width / DESIGN_WIDTH as f32);
    let (sx, sy) = (d.stretch_x as f32, d.stretch_y as f32);
    let rx = r * sx;
    let ry = r * sy;
    let opacity = d.opacity as f32;
    let pen = Pen::new(center, d.rotation as f32, dpr).with_alpha(opacity);
    let solid = |c: Vec4| move |_: Vec2| c;

    if d.size_class == SizeClass::Small {
        let body = RadialGradient::new(Vec2::ZERO, 0.0, rx.max(ry), &SMALL_BODY);
        fill_ellipse(frame, &pen, Vec2::ZERO, Vec2::new(rx, ry), 0.0, |p| body.at(p));

        let hl = Vec2::new(-rx * 0.2, -ry * 0.2);
        let glow = RadialGradient::new(hl, 0.0, rx * 0.4, &SMALL_HIGHLIGHT);
        fill_ellipse(frame, &pen, hl, Vec2::new(rx * 0.3, ry * 0.25), 0.0, |p| glow.at(p));
        return;
    }

    // Shadow: circle squashed to 35% height, offset down and right.
    let shadow = pen.with_alpha(opacity * 0.15);
    fill_ellipse(
        frame,
        &shadow,
        Vec2::new(r * 0.08, r * 0.4),
        Vec2::new(rx * 0.8, rx * 0.8 * 0.35),
        SHADOW_BLUR,
        solid(rgba(0, 0, 0, 1.0)),
    );

    let body = RadialGradient::new(Vec2::ZERO, 0.0, rx.max(ry), &BODY);
    fill_ellipse(frame, &pen, Vec2::ZERO, Vec2::new(rx, ry), 0.0, |p| body.at(p));

    let lens = RadialGradient::new(Vec2::ZERO, 0.0, rx.max(ry) * 0.6, &LENS);
    fill_ellipse(
        frame,
        &pen.with_alpha(opacity * 0.5),
        Vec2::ZERO,
        Vec2::new(rx * 0.6, ry * 0.6),
        0.0,
        |p| lens.at(p),
    );

    let low = Vec2::new(0.0, ry * 0.4);
    let caustic = RadialGradient::new(low, 0.0, rx * 0.5, &CAUSTIC);
    fill_ellipse(
        frame,
        &pen.with_alpha(opacity * 0.7),
        low,
        Vec2::new(rx * 0.45, ry * 0.12),
        0.0,
        |p| caustic.at(p),
    );

    let arc = Vec2::new(-rx * 0.28, -ry * 0.28);
    let highlight = RadialGradient::new(arc, 0.0, rx * 0.45, &HIGHLIGHT);
    fill_ellipse(frame, &pen, arc, Vec2::new(rx * 0.38, ry * 0.25), 0.0, |p| highlight.at(p));

    fill_ellipse(
        frame,
        &pen,
        Vec2::new(-rx * 0.35, -ry * 0.35),
        Vec2::new(rx * 0.1, ry * 0.08),
        0.0,
        solid(white(0.95)),
    );

    if d.size_class == SizeClass::Large {
        fill_circle(frame, &pen, Vec2::new(-rx * 0.42, -ry * 0.28), r * 0.04, solid(white(0.7)));
    }
}
