// shader/ - Analytic rain-on-glass
//
// Two independent ways to draw the same field:
// - glsl: source for hosts that compile the GPU path themselves
// - field: CPU reference evaluation, used for pixel output and snapshots
//
// The field ignores both droplet snapshots; only size and time feed it.

mod field;
mod glsl;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

pub use field::{FrameParams, Intensity, rain_field, sliding_layer, static_drops};
pub use glsl::{FRAGMENT_GLSL, VERTEX_GLSL};

use super::frame::Frame;
use super::{Backend, BackendKind, FrameInput, Layer};
use crate::config::ShaderFlags;
use crate::error::RenderError;
use crate::world::Backdrop;

/// Height the field's UV space is normalised against, so drop size does not
/// depend on the viewport.
pub const REFERENCE_HEIGHT: f32 = 960.0;

/// Values behind the fragment shader's uniforms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShaderUniforms {
    pub time: f32,
    /// (width, height, aspect)
    pub resolution: Vec3,
    pub enable_thunder: f32,
    pub enable_zoom: f32,
    pub fade_seconds: f32,
    pub reference_height: f32,
}

impl ShaderUniforms {
    pub fn new(flags: ShaderFlags) -> Self {
        Self {
            time: 0.0,
            resolution: Vec3::new(0.0, 0.0, 1.0),
            enable_thunder: if flags.thunder { 1.0 } else { 0.0 },
            enable_zoom: if flags.zoom { 1.0 } else { 0.0 },
            fade_seconds: flags.fade_seconds.max(0.0),
            reference_height: REFERENCE_HEIGHT,
        }
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = Vec3::new(width, height, width / height.max(1.0));
    }

    /// Flat layout for a host upload: time, resolution xyz, thunder, zoom,
    /// fade, reference height.
    pub fn to_array(&self) -> [f32; 8] {
        [
            self.time,
            self.resolution.x,
            self.resolution.y,
            self.resolution.z,
            self.enable_thunder,
            self.enable_zoom,
            self.fade_seconds,
            self.reference_height,
        ]
    }
}

pub struct ShaderBackend {
    backdrop: Backdrop,
    uniforms: ShaderUniforms,
    frame: Frame,
}

impl ShaderBackend {
    pub fn new(width: u32, height: u32, flags: ShaderFlags) -> Result<Self, RenderError> {
        let backdrop = Backdrop::wallpaper()?;
        let mut uniforms = ShaderUniforms::new(flags);
        uniforms.set_resolution(width as f32, height as f32);
        Ok(Self {
            backdrop,
            uniforms,
            frame: Frame::new(width, height)?,
        })
    }

    pub fn uniforms(&self) -> &ShaderUniforms {
        &self.uniforms
    }

    /// Evaluate every pixel of the frame for the current uniforms.
    fn shade_frame(&mut self) {
        let params = FrameParams::new(&self.uniforms);
        let (w, h) = (self.frame.width(), self.frame.height());
        let size = Vec2::new(w as f32, h as f32);

        for y in 0..h {
            // GL fragment rows count from the bottom.
            let gy = (h - 1 - y) as f32 + 0.5;
            for x in 0..w {
                let frag = Vec2::new(x as f32 + 0.5, gy);
                let col = params.shade(&self.backdrop, frag, frag / size);
                self.frame.set(x, y, col);
            }
        }
    }
}

impl Backend for ShaderBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Shader
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.frame.resize(width, height)?;
        self.uniforms.set_resolution(width as f32, height as f32);
        Ok(())
    }

    fn render(&mut self, input: &FrameInput<'_>) -> Layer<'_> {
        if input.is_zero_sized() {
            return Layer::Empty;
        }
        if (input.width, input.height) != (self.frame.width(), self.frame.height()) {
            if let Err(e) = self.resize(input.width, input.height) {
                log::warn!("shader backend cannot follow viewport: {e}");
                return Layer::Empty;
            }
        }

        self.uniforms.time = input.elapsed;
        self.shade_frame();
        Layer::Pixels(&self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(fade_seconds: f32) -> ShaderFlags {
        ShaderFlags { thunder: true, zoom: true, fade_seconds }
    }

    fn at(width: u32, height: u32, elapsed: f32) -> FrameInput<'static> {
        FrameInput { width, height, elapsed, dt: 0.0, drops: &[], physics: &[] }
    }

    #[test]
    fn fade_in_starts_black() {
        let mut b = ShaderBackend::new(16, 24, flags(10.0)).unwrap();
        match b.render(&at(16, 24, 0.0)) {
            Layer::Pixels(f) => {
                for px in f.bytes().chunks_exact(4) {
                    assert_eq!(&px[..3], &[0, 0, 0]);
                    assert_eq!(px[3], 255);
                }
            }
            _ => panic!("expected pixels"),
        }
    }

    #[test]
    fn no_fade_shows_backdrop_immediately() {
        let mut b = ShaderBackend::new(16, 24, flags(0.0)).unwrap();
        match b.render(&at(16, 24, 0.0)) {
            Layer::Pixels(f) => assert!(f.bytes().chunks_exact(4).any(|px| px[2] > 64)),
            _ => panic!("expected pixels"),
        }
    }

    #[test]
    fn uniforms_track_viewport_and_time() {
        let mut b = ShaderBackend::new(8, 8, flags(10.0)).unwrap();
        let _ = b.render(&at(20, 10, 2.5));
        let u = b.uniforms().to_array();
        assert_eq!(u[0], 2.5);
        assert_eq!(&u[1..4], &[20.0, 10.0, 2.0]);
        assert_eq!(u[7], REFERENCE_HEIGHT);
    }

    #[test]
    fn glsl_declares_every_uniform() {
        for name in [
            "iChannel0",
            "iResolution",
            "iTime",
            "uEnableThunder",
            "uEnableZoom",
            "uFadeSeconds",
            "uReferenceHeight",
        ] {
            let declared = FRAGMENT_GLSL
                .lines()
                .any(|l| l.starts_with("uniform ") && l.trim_end_matches(';').ends_with(name));
            assert!(declared, "{name} not declared");
        }
        assert!(VERTEX_GLSL.contains("vUv = uv"));
    }

    #[test]
    fn zero_viewport_is_empty() {
        let mut b = ShaderBackend::new(0, 0, flags(0.0)).unwrap();
        assert!(matches!(b.render(&at(0, 0, 1.0)), Layer::Empty));
    }
}
