// backdrop.rs - Vertical gradient textures
//
// Texel rows are stored top to bottom; (u, v) = (0, 0) is the top-left
// corner. Sampling is bilinear with clamp-to-edge, `sample_lod` blends two
// mip levels like a trilinear texture fetch.

use glam::Vec3;

use crate::error::RenderError;

/// (offset, 0xRRGGBB). Matches the page's CSS fallback so the shader path
/// and the plain gradient show the same colors on first paint.
pub const WALLPAPER_STOPS: [(f32, u32); 7] = [
    (0.0, 0x4fa5b5),
    (0.06, 0x6aacb8),
    (0.16, 0x88b5bb),
    (0.36, 0xa0baba),
    (0.56, 0xafbfbf),
    (0.76, 0xb8c2c2),
    (0.92, 0xbec6c6),
];

/// Flat grey window used behind the physics sprites.
pub const PHYSICS_STOPS: [(f32, u32); 4] = [
    (0.0, 0xd1d8d9),
    (0.25, 0xc9d0d1),
    (0.6, 0xbcc4c4),
    (1.0, 0xb5bcbc),
];

/// Reflection source for the legacy raster drops.
pub const REFLECTION_STOPS: [(f32, u32); 7] = [
    (0.0, 0x4fa5b5),
    (0.08, 0x6aacb8),
    (0.2, 0x88b5bb),
    (0.4, 0xa0baba),
    (0.6, 0xafbfbf),
    (0.8, 0xb8c2c2),
    (1.0, 0xbec6c6),
];

/// 0xRRGGBB to linear-in-bytes RGB in 0..1.
pub const fn hex(rgb: u32) -> Vec3 {
    Vec3::new(
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    )
}

struct Level {
    w: usize,
    h: usize,
    texels: Vec<Vec3>,
}

impl Level {
    #[inline]
    fn texel(&self, x: isize, y: isize) -> Vec3 {
        let x = x.clamp(0, self.w as isize - 1) as usize;
        let y = y.clamp(0, self.h as isize - 1) as usize;
        self.texels[y * self.w + x]
    }

    fn bilinear(&self, u: f32, v: f32) -> Vec3 {
        let fx = u * self.w as f32 - 0.5;
        let fy = v * self.h as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), tx);
        let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), tx);
        top.lerp(bottom, ty)
    }

    /// 2x2 box filter; odd edges repeat their last texel.
    fn halve(&self) -> Level {
        let w = (self.w / 2).max(1);
        let h = (self.h / 2).max(1);
        let mut texels = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                let (sx, sy) = ((x * 2) as isize, (y * 2) as isize);
                let sum = self.texel(sx, sy)
                    + self.texel(sx + 1, sy)
                    + self.texel(sx, sy + 1)
                    + self.texel(sx + 1, sy + 1);
                texels.push(sum * 0.25);
            }
        }
        Level { w, h, texels }
    }
}

pub struct Backdrop {
    levels: Vec<Level>,
}

impl Backdrop {
    /// The seven-stop wallpaper gradient at its usual 512x1024.
    pub fn wallpaper() -> Result<Self, RenderError> {
        Self::vertical_gradient(512, 1024, &WALLPAPER_STOPS)
    }

    pub fn vertical_gradient(width: usize, height: usize, stops: &[(f32, u32)]) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || stops.is_empty() {
            return Err(RenderError::BackdropUnavailable { width, height });
        }

        let mut texels = Vec::with_capacity(width * height);
        for y in 0..height {
            let color = gradient_at(stops, (y as f32 + 0.5) / height as f32);
            texels.extend(std::iter::repeat_n(color, width));
        }

        let mut levels = vec![Level { w: width, h: height, texels }];
        while let Some(last) = levels.last() {
            if last.w == 1 && last.h == 1 {
                break;
            }
            let next = last.halve();
            levels.push(next);
        }

        Ok(Self { levels })
    }

    pub fn size(&self) -> (usize, usize) {
        (self.levels[0].w, self.levels[0].h)
    }

    pub fn mip_levels(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        self.levels[0].bilinear(u, v)
    }

    /// Blurrier with growing `lod`; clamps to the available chain.
    pub fn sample_lod(&self, u: f32, v: f32, lod: f32) -> Vec3 {
        let max = (self.levels.len() - 1) as f32;
        let lod = if lod.is_finite() { lod.clamp(0.0, max) } else { 0.0 };
        let lo = lod.floor() as usize;
        let hi = (lo + 1).min(self.levels.len() - 1);
        let t = lod - lo as f32;
        let a = self.levels[lo].bilinear(u, v);
        if t == 0.0 || lo == hi {
            return a;
        }
        a.lerp(self.levels[hi].bilinear(u, v), t)
    }
}

/// Piecewise-linear color at `t`, flat beyond the first and last stop.
fn gradient_at(stops: &[(f32, u32)], t: f32) -> Vec3 {
    let (first_at, first) = stops[0];
    if t <= first_at {
        return hex(first);
    }
    for pair in stops.windows(2) {
        let (a_at, a) = pair[0];
        let (b_at, b) = pair[1];
        if t <= b_at {
            let span = (b_at - a_at).max(f32::EPSILON);
            return hex(a).lerp(hex(b), (t - a_at) / span);
        }
    }
    hex(stops[stops.len() - 1].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_texture() {
        assert!(Backdrop::vertical_gradient(0, 10, &WALLPAPER_STOPS).is_err());
        assert!(Backdrop::vertical_gradient(10, 10, &[]).is_err());
    }

    #[test]
    fn mip_chain_reaches_one_texel() {
        let b = Backdrop::wallpaper().unwrap();
        assert_eq!(b.size(), (512, 1024));
        assert_eq!(b.mip_levels(), 11);
    }

    #[test]
    fn top_and_bottom_match_end_stops() {
        let b = Backdrop::vertical_gradient(4, 256, &PHYSICS_STOPS).unwrap();
        let top = b.sample(0.5, 0.0);
        let bottom = b.sample(0.5, 1.0);
        assert!((top - hex(0xd1d8d9)).abs().max_element() < 0.01);
        assert!((bottom - hex(0xb5bcbc)).abs().max_element() < 0.01);
    }

    #[test]
    fn past_last_stop_is_flat() {
        let c = gradient_at(&WALLPAPER_STOPS, 0.97);
        assert_eq!(c, hex(0xbec6c6));
    }

    #[test]
    fn lod_is_clamped() {
        let b = Backdrop::vertical_gradient(8, 8, &PHYSICS_STOPS).unwrap();
        let far = b.sample_lod(0.5, 0.5, 100.0);
        let nan = b.sample_lod(0.5, 0.5, f32::NAN);
        assert!(far.is_finite() && nan.is_finite());
    }
}
