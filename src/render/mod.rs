// render/ - Interchangeable drawing strategies
//
// One backend is active at a time. Each one reads a snapshot through
// `FrameInput` and hands back a `Layer` borrowed from its own buffers:
// - vector: SVG markup for the decorative set
// - raster: immediate-mode fills of the decorative set
// - shader: analytic rain field (GLSL + CPU reference evaluation)
// - sprite: physics engine drops as refracting sprites
// - legacy: self-contained skip/slide animation

mod frame;
mod legacy;
pub mod paint;
mod raster;
pub mod shader;
mod sprite;
mod vector;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::WallpaperConfig;
use crate::error::{ConfigError, RenderError};
use crate::scene::Droplet;
use crate::sim::PhysicsDrop;

pub use frame::{Frame, MAX_PIXELS};
pub use legacy::{LegacyBackend, LegacyParams};
pub use raster::RasterBackend;
pub use shader::{ShaderBackend, ShaderUniforms};
pub use sprite::{MAX_INSTANCES, SpriteBackend, SpriteInstance};
pub use vector::{VectorBackend, write_svg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackendKind {
    #[default]
    Vector,
    Raster,
    Shader,
    SpritePhysics,
    LegacyRasterPhysics,
}

impl BackendKind {
    pub const ALL: [BackendKind; 5] = [
        BackendKind::Vector,
        BackendKind::Raster,
        BackendKind::Shader,
        BackendKind::SpritePhysics,
        BackendKind::LegacyRasterPhysics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Vector => "vector",
            BackendKind::Raster => "raster",
            BackendKind::Shader => "shader",
            BackendKind::SpritePhysics => "sprite-physics",
            BackendKind::LegacyRasterPhysics => "legacy-raster-physics",
        }
    }

    /// Only the sprite backend draws the physics engine's drops.
    pub fn needs_engine(self) -> bool {
        self == BackendKind::SpritePhysics
    }

    /// Whether `render` yields pixels rather than markup.
    pub fn is_raster(self) -> bool {
        self != BackendKind::Vector
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "vector" | "svg" => BackendKind::Vector,
            "raster" | "canvas" => BackendKind::Raster,
            "shader" | "webgl" | "glsl" => BackendKind::Shader,
            "sprite-physics" | "physics" => BackendKind::SpritePhysics,
            "legacy-raster-physics" | "rainyday" => BackendKind::LegacyRasterPhysics,
            _ => return Err(ConfigError::UnknownBackend(s.to_string())),
        };
        Ok(kind)
    }
}

impl TryFrom<String> for BackendKind {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BackendKind> for String {
    fn from(kind: BackendKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Everything a backend may read for one frame. Snapshots are borrowed;
/// backends never mutate them.
#[derive(Clone, Copy)]
pub struct FrameInput<'a> {
    pub width: u32,
    pub height: u32,
    pub elapsed: f32,
    pub dt: f32,
    pub drops: &'a [Droplet],
    pub physics: &'a [PhysicsDrop],
}

impl FrameInput<'_> {
    pub fn is_zero_sized(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A finished visual layer, borrowed from the backend that drew it.
#[derive(Clone, Copy)]
pub enum Layer<'a> {
    Empty,
    Markup(&'a str),
    Pixels(&'a Frame),
}

impl Layer<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            Layer::Empty => true,
            Layer::Markup(s) => s.is_empty(),
            Layer::Pixels(f) => f.is_empty(),
        }
    }
}

pub trait Backend {
    fn kind(&self) -> BackendKind;

    /// New viewport in CSS pixels.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    fn render(&mut self, input: &FrameInput<'_>) -> Layer<'_>;
}

/// Builds a backend for a viewport. Setup failures are returned, never
/// papered over with a different backend.
pub type Factory = fn(&WallpaperConfig, u32, u32) -> Result<Box<dyn Backend>, RenderError>;

/// Name-to-factory table, built once by the caller and passed down.
pub struct BackendRegistry {
    factories: BTreeMap<BackendKind, Factory>,
}

impl BackendRegistry {
    pub fn empty() -> Self {
        Self { factories: BTreeMap::new() }
    }

    pub fn with_defaults() -> Self {
        let mut reg = Self::empty();
        reg.register(BackendKind::Vector, |_, _, _| Ok(Box::new(VectorBackend::new())));
        reg.register(BackendKind::Raster, |cfg, w, h| {
            Ok(Box::new(RasterBackend::new(w, h, cfg.device_pixel_ratio)?))
        });
        reg.register(BackendKind::Shader, |cfg, w, h| Ok(Box::new(ShaderBackend::new(w, h, cfg.shader)?)));
        reg.register(BackendKind::SpritePhysics, |_, w, h| Ok(Box::new(SpriteBackend::new(w, h)?)));
        reg.register(BackendKind::LegacyRasterPhysics, |cfg, w, h| {
            Ok(Box::new(LegacyBackend::new(w, h, cfg.seed, LegacyParams::default())?))
        });
        reg
    }

    /// Replaces any factory already registered for `kind`.
    pub fn register(&mut self, kind: BackendKind, factory: Factory) {
        self.factories.insert(kind, factory);
    }

    pub fn create(
        &self,
        kind: BackendKind,
        config: &WallpaperConfig,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn Backend>, RenderError> {
        let factory = self.factories.get(&kind).ok_or(RenderError::Unregistered(kind))?;
        let backend = factory(config, width, height)?;
        log::info!("created {kind} backend at {width}x{height}");
        Ok(backend)
    }

    pub fn kinds(&self) -> impl Iterator<Item = BackendKind> + '_ {
        self.factories.keys().copied()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("vector".parse::<BackendKind>().unwrap(), BackendKind::Vector);
        assert_eq!(" Canvas ".parse::<BackendKind>().unwrap(), BackendKind::Raster);
        assert_eq!("WEBGL".parse::<BackendKind>().unwrap(), BackendKind::Shader);
        assert_eq!("physics".parse::<BackendKind>().unwrap(), BackendKind::SpritePhysics);
        assert_eq!("rainyday".parse::<BackendKind>().unwrap(), BackendKind::LegacyRasterPhysics);
        assert!(matches!("babylon".parse::<BackendKind>(), Err(ConfigError::UnknownBackend(_))));
    }

    #[test]
    fn display_round_trips() {
        for kind in BackendKind::ALL {
            assert_eq!(kind.to_string().parse::<BackendKind>().unwrap(), kind);
        }
    }

    #[test]
    fn empty_registry_reports_unregistered() {
        let reg = BackendRegistry::empty();
        let err = reg.create(BackendKind::Raster, &WallpaperConfig::default(), 10, 10);
        assert!(matches!(err, Err(RenderError::Unregistered(BackendKind::Raster))));
    }

    #[test]
    fn defaults_cover_every_kind() {
        let reg = BackendRegistry::with_defaults();
        assert_eq!(reg.kinds().collect::<Vec<_>>(), BackendKind::ALL.to_vec());
    }
}
