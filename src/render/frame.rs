// frame.rs - RGBA output buffer
//
// Straight (non-premultiplied) RGBA8, row-major, top row first: the layout
// ImageData expects, so the host can blit `ptr()..ptr()+len()` directly.

use glam::{Vec3, Vec4};

use crate::error::RenderError;

/// Largest buffer a backend will allocate (8192 x 8192).
pub const MAX_PIXELS: usize = 8192 * 8192;

pub struct Frame {
    out: Vec<u8>,
    w: u32,
    h: u32,
}

impl Frame {
    pub fn new(w: u32, h: u32) -> Result<Self, RenderError> {
        let len = checked_len(w, h)?;
        Ok(Self { out: vec![0; len], w, h })
    }

    pub fn resize(&mut self, w: u32, h: u32) -> Result<(), RenderError> {
        let len = checked_len(w, h)?;
        self.w = w;
        self.h = h;
        self.out.clear();
        self.out.resize(len, 0);
        Ok(())
    }

    /// Fully transparent.
    pub fn clear(&mut self) {
        self.out.fill(0);
    }

    pub fn ptr(&self) -> *const u8 {
        self.out.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    pub fn bytes(&self) -> &[u8] {
        &self.out
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * self.w as usize + x as usize) * 4;
        [self.out[i], self.out[i + 1], self.out[i + 2], self.out[i + 3]]
    }

    /// Opaque write.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, rgb: Vec3) {
        let i = ((y as usize) * self.w as usize + x as usize) * 4;
        let c = rgb.clamp(Vec3::ZERO, Vec3::ONE) * 255.0 + 0.5;
        self.out[i] = c.x as u8;
        self.out[i + 1] = c.y as u8;
        self.out[i + 2] = c.z as u8;
        self.out[i + 3] = 255;
    }

    /// Source-over of a straight-alpha color; off-frame writes are ignored.
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, src: Vec4) {
        if (x as u32) >= self.w || (y as u32) >= self.h {
            return;
        }
        let sa = src.w.clamp(0.0, 1.0);
        if sa <= 0.0 || !sa.is_finite() {
            return;
        }

        let i = ((y as usize) * self.w as usize + x as usize) * 4;
        let da = self.out[i + 3] as f32 / 255.0;
        let dst = Vec3::new(self.out[i] as f32, self.out[i + 1] as f32, self.out[i + 2] as f32) / 255.0;

        let oa = sa + da * (1.0 - sa);
        let rgb = (src.truncate() * sa + dst * da * (1.0 - sa)) / oa;
        let c = rgb.clamp(Vec3::ZERO, Vec3::ONE) * 255.0 + 0.5;

        self.out[i] = c.x as u8;
        self.out[i + 1] = c.y as u8;
        self.out[i + 2] = c.z as u8;
        self.out[i + 3] = (oa * 255.0 + 0.5) as u8;
    }
}

fn checked_len(w: u32, h: u32) -> Result<usize, RenderError> {
    let pixels = (w as usize).saturating_mul(h as usize);
    if pixels > MAX_PIXELS {
        return Err(RenderError::ViewportTooLarge { width: w, height: h });
    }
    Ok(pixels * 4)
}
