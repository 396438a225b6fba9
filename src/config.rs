// config.rs - Wallpaper configuration
//
// Read once when the wallpaper mounts; never hot-reloaded. Two sources:
// JSON from the page, or the site's build-time WALLPAPER_* variables.
// Bad values fall back to defaults instead of failing.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::BackendKind;
use crate::scene::{DEFAULT_SEED, MAX_DROP_COUNT};
use crate::sim::{PhysicsConfig, PhysicsPreset, Tuning};

pub const DEFAULT_DROP_COUNT: i64 = 300;

const MIN_DPR: f32 = 0.5;
const MAX_DPR: f32 = 4.0;

/// Options only the shader backend reads.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShaderFlags {
    pub thunder: bool,
    pub zoom: bool,
    /// 0 disables the fade-in.
    pub fade_seconds: f32,
}

impl Default for ShaderFlags {
    fn default() -> Self {
        Self { thunder: true, zoom: true, fade_seconds: 10.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WallpaperConfig {
    #[serde(alias = "count")]
    pub drop_count: i64,
    pub seed: i64,
    #[serde(alias = "renderer")]
    pub backend: BackendKind,
    pub shader: ShaderFlags,
    /// `classic` runs the first engine generation and ignores `physics`.
    pub physics_preset: PhysicsPreset,
    pub physics: PhysicsConfig,
    pub device_pixel_ratio: f32,
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            drop_count: DEFAULT_DROP_COUNT,
            seed: DEFAULT_SEED,
            backend: BackendKind::default(),
            shader: ShaderFlags::default(),
            physics_preset: PhysicsPreset::default(),
            physics: PhysicsConfig::default(),
            device_pixel_ratio: 1.0,
        }
    }
}

impl WallpaperConfig {
    /// Parse JSON; missing fields take their defaults. The result is
    /// already sanitized.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Build from `(name, value)` pairs such as `std::env::vars()`. Unknown
    /// names are ignored; unparseable values keep the default. An unknown
    /// renderer name is the one hard error.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut c = Self::default();
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                "WALLPAPER_RENDERER" => c.backend = value.parse()?,
                "WALLPAPER_COUNT" => {
                    c.drop_count = parse_number(value, c.drop_count as f64) as i64;
                }
                "WALLPAPER_SEED" => c.seed = parse_number(value, c.seed as f64) as i64,
                "WALLPAPER_THUNDER" => c.shader.thunder = parse_flag(value, c.shader.thunder),
                "WALLPAPER_ZOOM" => c.shader.zoom = parse_flag(value, c.shader.zoom),
                "WALLPAPER_PHYSICS_PRESET" => {
                    c.physics_preset = PhysicsPreset::from_name(value).unwrap_or(c.physics_preset);
                }
                "WALLPAPER_FADE_SECONDS" => {
                    c.shader.fade_seconds = parse_number(value, c.shader.fade_seconds as f64) as f32;
                }
                _ => {}
            }
        }
        Ok(c.sanitized())
    }

    /// Engine parameters for the selected preset.
    pub fn engine_params(&self) -> (PhysicsConfig, Tuning) {
        let physics = match self.physics_preset {
            PhysicsPreset::Standard => self.physics,
            PhysicsPreset::Classic => PhysicsConfig::classic(),
        };
        (physics, self.physics_preset.tuning())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Clamp into the ranges the rest of the crate assumes.
    pub fn sanitized(mut self) -> Self {
        let count = self.drop_count.clamp(0, MAX_DROP_COUNT);
        if count != self.drop_count {
            log::warn!("drop count {} clamped to {count}", self.drop_count);
            self.drop_count = count;
        }
        if !(self.shader.fade_seconds.is_finite() && self.shader.fade_seconds >= 0.0) {
            log::warn!("fade seconds {} clamped to 0", self.shader.fade_seconds);
            self.shader.fade_seconds = 0.0;
        }
        let dpr = self.device_pixel_ratio;
        let clamped = if dpr.is_finite() { dpr.clamp(MIN_DPR, MAX_DPR) } else { 1.0 };
        if clamped != dpr {
            log::warn!("device pixel ratio {dpr} clamped to {clamped}");
            self.device_pixel_ratio = clamped;
        }
        self.physics = self.physics.sanitized();
        self
    }
}

/// `true/1/yes/on` and `false/0/no/off`, case-insensitive. Anything else
/// keeps `fallback`.
pub fn parse_flag(value: &str, fallback: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => fallback,
    }
}

/// Finite number or `fallback`.
pub fn parse_number(value: &str, fallback: f64) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => fallback,
    }
}
