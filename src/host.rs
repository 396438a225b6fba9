// host.rs - Wallpaper lifecycle
//
// Owns everything one mounted wallpaper needs: the decorative snapshot, the
// physics engine (only while a backend draws it), the clock and the active
// backend. Exactly one backend is alive at a time; switching replaces it
// whole. After `dispose` every tick is empty.

use crate::config::WallpaperConfig;
use crate::error::RenderError;
use crate::render::{Backend, BackendKind, BackendRegistry, FrameInput, Layer};
use crate::scene::{Droplet, generate};
use crate::sim::{PhysicsDrop, PhysicsEngine};

/// Longest step the engine takes in one tick, seconds.
pub const MAX_TICK: f32 = 0.1;

pub struct Wallpaper {
    config: WallpaperConfig,
    width: u32,
    height: u32,

    drops: Vec<Droplet>,
    engine: Option<PhysicsEngine>,
    backend: Option<Box<dyn Backend>>,

    elapsed: f32,
}

impl Wallpaper {
    pub fn new(
        config: WallpaperConfig,
        registry: &BackendRegistry,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let config = config.sanitized();
        let backend = registry.create(config.backend, &config, width, height)?;
        let drops = generate(config.drop_count, config.seed);

        let mut wallpaper = Self {
            config,
            width,
            height,
            drops,
            engine: None,
            backend: Some(backend),
            elapsed: 0.0,
        };
        wallpaper.sync_engine();
        Ok(wallpaper)
    }

    /// Advance by `dt` seconds and draw. The engine never steps more than
    /// `MAX_TICK` at once; the clock follows real time.
    pub fn tick(&mut self, dt: f32) -> Layer<'_> {
        let Some(backend) = self.backend.as_deref_mut() else {
            return Layer::Empty;
        };
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        if let Some(engine) = self.engine.as_mut() {
            engine.update(dt.min(MAX_TICK));
        }
        self.elapsed += dt;

        let physics: &[PhysicsDrop] = match &self.engine {
            Some(engine) => engine.drops(),
            None => &[],
        };
        let input = FrameInput {
            width: self.width,
            height: self.height,
            elapsed: self.elapsed,
            dt,
            drops: &self.drops,
            physics,
        };
        backend.render(&input)
    }

    /// Nothing changes if the backend cannot take the new size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        log::debug!("wallpaper resize {}x{} -> {}x{}", self.width, self.height, width, height);
        if let Some(backend) = self.backend.as_deref_mut() {
            backend.resize(width, height)?;
        }
        self.width = width;
        self.height = height;
        if let Some(engine) = self.engine.as_mut() {
            engine.resize(width as f32, height as f32);
        }
        Ok(())
    }

    /// Build `kind` and swap it in. On failure the current backend stays.
    pub fn switch_backend(&mut self, kind: BackendKind, registry: &BackendRegistry) -> Result<(), RenderError> {
        let mut config = self.config.clone();
        config.backend = kind;
        let backend = registry.create(kind, &config, self.width, self.height)?;

        let from = self.backend.as_ref().map(|b| b.kind());
        log::info!("switching backend {from:?} -> {kind}");
        self.backend = Some(backend);
        self.config = config;
        self.sync_engine();
        Ok(())
    }

    /// Releases the backend and the engine.
    pub fn dispose(&mut self) {
        if let Some(backend) = self.backend.take() {
            log::info!("disposing {} backend", backend.kind());
        }
        self.engine = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.backend.is_none()
    }

    pub fn kind(&self) -> Option<BackendKind> {
        self.backend.as_ref().map(|b| b.kind())
    }

    pub fn config(&self) -> &WallpaperConfig {
        &self.config
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn drops(&self) -> &[Droplet] {
        &self.drops
    }

    pub fn engine(&self) -> Option<&PhysicsEngine> {
        self.engine.as_ref()
    }

    /// Engine exists exactly while the active backend draws it.
    fn sync_engine(&mut self) {
        let wanted = self.kind().is_some_and(BackendKind::needs_engine);
        match (wanted, self.engine.is_some()) {
            (true, false) => {
                let (physics, tuning) = self.config.engine_params();
                let engine = PhysicsEngine::seeded(self.width as f32, self.height as f32, physics, self.config.seed)
                    .with_tuning(tuning);
                self.engine = Some(engine);
            }
            (false, true) => self.engine = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallpaper(kind: BackendKind) -> Wallpaper {
        let config = WallpaperConfig { backend: kind, drop_count: 40, ..WallpaperConfig::default() };
        Wallpaper::new(config, &BackendRegistry::with_defaults(), 64, 96).unwrap()
    }

    #[test]
    fn engine_only_with_sprite_backend() {
        assert!(wallpaper(BackendKind::Vector).engine().is_none());
        assert!(wallpaper(BackendKind::SpritePhysics).engine().is_some());
    }

    #[test]
    fn long_stall_is_clamped_for_engine() {
        let mut w = wallpaper(BackendKind::SpritePhysics);
        let _ = w.tick(5.0);
        // 0.1 s at 15 drops/s
        assert_eq!(w.engine().map(|e| e.len()), Some(1));
        assert_eq!(w.elapsed(), 5.0);
    }

    #[test]
    fn switching_replaces_engine_ownership() {
        let reg = BackendRegistry::with_defaults();
        let mut w = wallpaper(BackendKind::Vector);
        w.switch_backend(BackendKind::SpritePhysics, &reg).unwrap();
        assert_eq!(w.kind(), Some(BackendKind::SpritePhysics));
        assert!(w.engine().is_some());
        w.switch_backend(BackendKind::Raster, &reg).unwrap();
        assert!(w.engine().is_none());
    }

    #[test]
    fn failed_switch_keeps_current_backend() {
        let mut w = wallpaper(BackendKind::Vector);
        let err = w.switch_backend(BackendKind::Shader, &BackendRegistry::empty());
        assert!(matches!(err, Err(RenderError::Unregistered(BackendKind::Shader))));
        assert_eq!(w.kind(), Some(BackendKind::Vector));
        assert!(matches!(w.tick(0.016), Layer::Markup(_)));
    }

    #[test]
    fn rejected_resize_keeps_old_viewport() {
        let mut w = wallpaper(BackendKind::SpritePhysics);
        let err = w.resize(9000, 9000);
        assert!(matches!(err, Err(RenderError::ViewportTooLarge { .. })));
        assert_eq!(w.size(), (64, 96));
        assert_eq!(w.engine().map(|e| e.dimensions()), Some((64.0, 96.0)));
        match w.tick(0.016) {
            Layer::Pixels(f) => assert_eq!((f.width(), f.height()), (64, 96)),
            _ => panic!("expected pixels"),
        }
    }

    #[test]
    fn disposed_wallpaper_is_silent() {
        let mut w = wallpaper(BackendKind::SpritePhysics);
        w.dispose();
        assert!(w.is_disposed());
        assert!(w.engine().is_none());
        assert!(matches!(w.tick(0.016), Layer::Empty));
    }
}
