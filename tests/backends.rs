//! Every registered backend against the shared render contract.

use pretty_assertions::assert_eq;
use rain_wallpaper::render::{LegacyBackend, LegacyParams, RasterBackend, write_svg};
use rain_wallpaper::{
    Backend, BackendKind, BackendRegistry, Droplet, FrameInput, Layer, PhysicsConfig, PhysicsDrop, PhysicsEngine,
    ShaderFlags, WallpaperConfig, generate,
};

fn input<'a>(w: u32, h: u32, drops: &'a [Droplet], physics: &'a [PhysicsDrop]) -> FrameInput<'a> {
    FrameInput { width: w, height: h, elapsed: 1.0, dt: 1.0 / 60.0, drops, physics }
}

fn create(kind: BackendKind, w: u32, h: u32) -> Box<dyn Backend> {
    BackendRegistry::with_defaults()
        .create(kind, &WallpaperConfig::default(), w, h)
        .unwrap()
}

#[test]
fn defaults_register_every_kind() {
    let kinds: Vec<_> = BackendRegistry::with_defaults().kinds().collect();
    assert_eq!(kinds, BackendKind::ALL.to_vec());
}

#[test]
fn each_backend_reports_its_kind() {
    for kind in BackendKind::ALL {
        assert_eq!(create(kind, 32, 48).kind(), kind);
    }
}

#[test]
fn zero_viewport_is_empty_everywhere() {
    let drops = generate(30, 42);
    for kind in BackendKind::ALL {
        let mut b = create(kind, 32, 48);
        assert!(b.render(&input(0, 0, &drops, &[])).is_empty(), "{kind}");
        assert!(b.render(&input(32, 0, &drops, &[])).is_empty(), "{kind}");
    }
}

#[test]
fn layer_type_matches_backend() {
    let drops = generate(30, 42);
    let mut engine = PhysicsEngine::new(32.0, 48.0, PhysicsConfig::default());
    engine.add_drop(16.0, 20.0, 64.0);

    for kind in BackendKind::ALL {
        let mut b = create(kind, 32, 48);
        match b.render(&input(32, 48, &drops, engine.drops())) {
            Layer::Markup(svg) => {
                assert_eq!(kind, BackendKind::Vector);
                assert!(svg.starts_with("<svg"));
            }
            Layer::Pixels(frame) => {
                assert!(kind.is_raster(), "{kind}");
                assert_eq!((frame.width(), frame.height()), (32, 48));
                assert_eq!(frame.len(), 32 * 48 * 4);
            }
            Layer::Empty => panic!("{kind} drew nothing"),
        }
    }
}

#[test]
fn no_droplets_leaves_raster_transparent() {
    let mut b = create(BackendKind::Raster, 16, 16);
    match b.render(&input(16, 16, &[], &[])) {
        Layer::Pixels(f) => assert!(f.bytes().iter().all(|&v| v == 0)),
        _ => panic!("expected pixels"),
    }
}

#[test]
fn raster_scales_by_device_pixel_ratio() {
    let mut b = RasterBackend::new(20, 30, 2.0).unwrap();
    let drops = generate(20, 42);
    match b.render(&input(20, 30, &drops, &[])) {
        Layer::Pixels(f) => {
            assert_eq!((f.width(), f.height()), (40, 60));
            assert!(f.bytes().chunks_exact(4).any(|px| px[3] > 0));
        }
        _ => panic!("expected pixels"),
    }
}

#[test]
fn vector_document_is_inert_and_scaled() {
    let mut svg = String::new();
    write_svg(&mut svg, &generate(40, 42)).unwrap();
    assert!(svg.contains(r#"viewBox="0 0 640 960""#));
    assert!(svg.contains(r#"preserveAspectRatio="xMidYMin slice""#));
    assert!(svg.contains(r#"aria-hidden="true""#));
    assert!(svg.contains("pointer-events:none"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn vector_markup_is_stable_between_frames() {
    let drops = generate(40, 42);
    let mut b = create(BackendKind::Vector, 320, 480);
    let first = match b.render(&input(320, 480, &drops, &[])) {
        Layer::Markup(s) => s.to_owned(),
        _ => panic!("expected markup"),
    };
    match b.render(&input(320, 480, &drops, &[])) {
        Layer::Markup(s) => assert_eq!(s, first),
        _ => panic!("expected markup"),
    }
}

#[test]
fn shader_animates_over_time() {
    let config = WallpaperConfig {
        shader: ShaderFlags { fade_seconds: 0.0, ..ShaderFlags::default() },
        ..WallpaperConfig::default()
    };
    let mut b = BackendRegistry::with_defaults().create(BackendKind::Shader, &config, 24, 32).unwrap();
    let at = |t: f32| FrameInput { width: 24, height: 32, elapsed: t, dt: 0.0, drops: &[], physics: &[] };
    let early = match b.render(&at(1.0)) {
        Layer::Pixels(f) => f.bytes().to_vec(),
        _ => panic!("expected pixels"),
    };
    let late = match b.render(&at(7.5)) {
        Layer::Pixels(f) => f.bytes().to_vec(),
        _ => panic!("expected pixels"),
    };
    assert_ne!(early, late);
}

#[test]
fn legacy_is_reproducible_per_seed() {
    let run = |seed| {
        let mut b = LegacyBackend::new(64, 96, seed, LegacyParams::default()).unwrap();
        for _ in 0..30 {
            let _ = b.render(&input(64, 96, &[], &[]));
        }
        b.drops().iter().map(|d| (d.x, d.y, d.r)).collect::<Vec<_>>()
    };
    assert_eq!(run(3), run(3));
}

#[test]
fn backends_follow_viewport_changes() {
    for kind in BackendKind::ALL.into_iter().filter(|k| k.is_raster()) {
        let mut b = create(kind, 16, 16);
        b.resize(24, 12).unwrap();
        match b.render(&input(24, 12, &[], &[])) {
            Layer::Pixels(f) => assert_eq!((f.width(), f.height()), (24, 12), "{kind}"),
            _ => panic!("{kind} expected pixels"),
        }
    }
}
