// lib.rs - Rain-on-glass wallpaper
//
// Decorative droplets, a small physics engine and five interchangeable
// renderers. The wasm handle below is what the site mounts; everything else
// is plain Rust so tests, benches and the snapshot CLI run natively.

pub mod config;
pub mod error;
pub mod host;
pub mod render;
pub mod rng;
pub mod scene;
pub mod sim;
pub mod world;

pub use config::{ShaderFlags, WallpaperConfig};
pub use error::{ConfigError, RenderError};
pub use host::Wallpaper;
pub use render::{Backend, BackendKind, BackendRegistry, Frame, FrameInput, Layer};
pub use rng::Mulberry32;
pub use scene::{Droplet, SizeClass, generate, generate_streaks};
pub use sim::{DropState, PhysicsConfig, PhysicsDrop, PhysicsEngine, PhysicsPreset, SpatialHashGrid, Tuning};

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

use render::shader::{FRAGMENT_GLSL, ShaderUniforms, VERTEX_GLSL};
use render::{MAX_INSTANCES, SpriteInstance};

// ============================================================================
// Flat buffers handed across the wasm boundary
// ============================================================================

/// Floats per decorative droplet in `generate_drops`.
pub const DROPLET_STRIDE: usize = 8;
/// Floats per sprite in `drop_snapshot`.
pub const INSTANCE_STRIDE: usize = 4;

/// x, y, radius, opacity, stretch x, stretch y, rotation, size class
/// (0 small, 1 medium, 2 large).
pub fn flatten_droplets(drops: &[Droplet]) -> Vec<f32> {
    let mut out = Vec::with_capacity(drops.len() * DROPLET_STRIDE);
    for d in drops {
        let class = match d.size_class {
            SizeClass::Small => 0.0,
            SizeClass::Medium => 1.0,
            SizeClass::Large => 2.0,
        };
        out.extend_from_slice(&[
            d.x as f32,
            d.y as f32,
            d.radius as f32,
            d.opacity as f32,
            d.stretch_x as f32,
            d.stretch_y as f32,
            d.rotation as f32,
            class,
        ]);
    }
    out
}

/// Instance attributes for a host drawing the engine itself: center x, y
/// and quad width, height. Capped like the sprite backend.
pub fn flatten_instances(drops: &[PhysicsDrop]) -> Vec<f32> {
    let n = drops.len().min(MAX_INSTANCES);
    let mut out = Vec::with_capacity(n * INSTANCE_STRIDE);
    for s in drops.iter().take(n).map(SpriteInstance::from_drop) {
        out.extend_from_slice(&[s.x, s.y, s.scale_x, s.scale_y]);
    }
    out
}

// ============================================================================
// RAIN WALLPAPER - wasm handle
// ============================================================================

#[wasm_bindgen]
pub struct RainWallpaper {
    inner: Wallpaper,
    registry: BackendRegistry,

    // Last layer: markup is copied, pixels stay in the backend's frame
    markup: String,
    out_ptr: *const u8,
    out_len: usize,
}

#[wasm_bindgen]
impl RainWallpaper {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, config_json: &str) -> Result<RainWallpaper, JsError> {
        let config = WallpaperConfig::from_json(config_json)?;
        let registry = BackendRegistry::with_defaults();
        let inner = Wallpaper::new(config, &registry, width, height)?;
        Ok(Self {
            inner,
            registry,
            markup: String::new(),
            out_ptr: std::ptr::null(),
            out_len: 0,
        })
    }

    /// Advance `dt` seconds and draw. Read the result through `markup` or
    /// `output_ptr`/`output_len` before the next call.
    pub fn tick(&mut self, dt: f32) {
        match self.inner.tick(dt) {
            Layer::Empty => {
                self.markup.clear();
                self.out_ptr = std::ptr::null();
                self.out_len = 0;
            }
            Layer::Markup(svg) => {
                if self.markup != svg {
                    self.markup.clear();
                    self.markup.push_str(svg);
                }
                self.out_ptr = std::ptr::null();
                self.out_len = 0;
            }
            Layer::Pixels(frame) => {
                self.markup.clear();
                self.out_ptr = frame.ptr();
                self.out_len = frame.len();
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsError> {
        self.inner.resize(width, height)?;
        Ok(())
    }

    /// Swap to another backend by name. The current one stays on failure.
    pub fn switch_backend(&mut self, name: &str) -> Result<(), JsError> {
        let kind: BackendKind = name.parse()?;
        self.inner.switch_backend(kind, &self.registry)?;
        Ok(())
    }

    pub fn dispose(&mut self) {
        self.inner.dispose();
        self.markup = String::new();
        self.out_ptr = std::ptr::null();
        self.out_len = 0;
    }

    pub fn backend(&self) -> Option<String> {
        self.inner.kind().map(|k| k.as_str().to_owned())
    }

    pub fn output_ptr(&self) -> *const u8 { self.out_ptr }
    pub fn output_len(&self) -> usize { self.out_len }
    pub fn width(&self) -> u32 { self.inner.size().0 }
    pub fn height(&self) -> u32 { self.inner.size().1 }

    pub fn markup(&self) -> String {
        self.markup.clone()
    }

    pub fn fragment_shader(&self) -> String {
        FRAGMENT_GLSL.to_owned()
    }

    pub fn vertex_shader(&self) -> String {
        VERTEX_GLSL.to_owned()
    }

    /// Same layout as `ShaderUniforms::to_array`.
    pub fn shader_uniforms(&self) -> Float32Array {
        let (w, h) = self.inner.size();
        let mut u = ShaderUniforms::new(self.inner.config().shader);
        u.set_resolution(w as f32, h as f32);
        u.time = self.inner.elapsed();
        Float32Array::from(&u.to_array()[..])
    }

    /// Engine drops as sprite instances; empty unless the engine is running.
    pub fn drop_snapshot(&self) -> Float32Array {
        let flat = self.inner.engine().map(|e| flatten_instances(e.drops())).unwrap_or_default();
        Float32Array::from(&flat[..])
    }
}

/// Decorative set for `(count, seed)`, flattened `DROPLET_STRIDE` floats
/// per droplet.
#[wasm_bindgen]
pub fn generate_drops(count: i32, seed: i32) -> Float32Array {
    let flat = flatten_droplets(&generate(count as i64, seed as i64));
    Float32Array::from(&flat[..])
}
