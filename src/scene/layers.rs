// layers.rs - Five-layer droplet population
//
// Large drops cluster near the top of the glass, tiny drops scatter
// everywhere. Each layer is a row in LAYERS; the order of PRNG draws per
// droplet is part of the output contract.

use super::{Droplet, MAX_DROP_COUNT, SizeClass};
use crate::rng::Mulberry32;

/// `lo + r * span` for one droplet attribute.
#[derive(Clone, Copy)]
struct Span {
    lo: f64,
    span: f64,
}

const fn span(lo: f64, span: f64) -> Span {
    Span { lo, span }
}

impl Span {
    #[inline]
    fn draw(self, rng: &mut Mulberry32) -> f64 {
        self.lo + rng.next_f64() * self.span
    }
}

struct Layer {
    weight: f64,
    x: Span,
    y: Span,
    radius: Span,
    opacity: Span,
    stretch_x: Span,
    stretch_y: Span,
    /// Full rotation range centered on zero; None means no draw at all.
    rotation: Option<f64>,
    class: SizeClass,
    /// Layers 1-4 draw y before x, the scatter layer draws x first.
    y_first: bool,
}

const LAYERS: [Layer; 5] = [
    // Large, confined to the top band
    Layer {
        weight: 0.08,
        x: span(0.05, 0.9),
        y: span(0.03, 0.25),
        radius: span(12.0, 10.0),
        opacity: span(0.7, 0.25),
        stretch_x: span(0.85, 0.3),
        stretch_y: span(0.9, 0.2),
        rotation: Some(0.3),
        class: SizeClass::Large,
        y_first: true,
    },
    // Medium-large, upper third
    Layer {
        weight: 0.12,
        x: span(0.03, 0.94),
        y: span(0.05, 0.35),
        radius: span(7.0, 6.0),
        opacity: span(0.6, 0.3),
        stretch_x: span(0.88, 0.24),
        stretch_y: span(0.92, 0.16),
        rotation: Some(0.25),
        class: SizeClass::Medium,
        y_first: true,
    },
    // Medium, upper half
    Layer {
        weight: 0.15,
        x: span(0.02, 0.96),
        y: span(0.08, 0.55),
        radius: span(4.0, 4.0),
        opacity: span(0.5, 0.35),
        stretch_x: span(0.9, 0.2),
        stretch_y: span(0.9, 0.2),
        rotation: Some(0.2),
        class: SizeClass::Medium,
        y_first: true,
    },
    // Small, middle and lower
    Layer {
        weight: 0.25,
        x: span(0.0, 1.0),
        y: span(0.15, 0.75),
        radius: span(2.5, 2.5),
        opacity: span(0.4, 0.4),
        stretch_x: span(0.92, 0.16),
        stretch_y: span(0.92, 0.16),
        rotation: Some(0.15),
        class: SizeClass::Small,
        y_first: true,
    },
    // Tiny, everywhere, nearly round
    Layer {
        weight: 0.4,
        x: span(0.0, 1.0),
        y: span(0.0, 1.0),
        radius: span(1.0, 1.8),
        opacity: span(0.35, 0.45),
        stretch_x: span(0.95, 0.1),
        stretch_y: span(0.95, 0.1),
        rotation: None,
        class: SizeClass::Small,
        y_first: false,
    },
];

/// Number of droplets a layer of `weight` receives out of `count`.
/// Remainders are dropped, not redistributed.
#[inline]
pub(crate) fn layer_size(count: u64, weight: f64) -> usize {
    (count as f64 * weight).floor() as usize
}

/// Deterministic droplet population, sorted ascending by radius so larger
/// drops come last. Counts clamp to `0..=MAX_DROP_COUNT`.
pub fn generate(count: i64, seed: i64) -> Vec<Droplet> {
    let count = count.clamp(0, MAX_DROP_COUNT) as u64;
    let mut rng = Mulberry32::new(seed);
    let total: usize = LAYERS.iter().map(|l| layer_size(count, l.weight)).sum();
    let mut drops = Vec::with_capacity(total);
    let mut id = 0u32;

    for layer in &LAYERS {
        for _ in 0..layer_size(count, layer.weight) {
            let (x, y) = if layer.y_first {
                let y = layer.y.draw(&mut rng);
                (layer.x.draw(&mut rng), y)
            } else {
                let x = layer.x.draw(&mut rng);
                (x, layer.y.draw(&mut rng))
            };
            let radius = layer.radius.draw(&mut rng);
            let opacity = layer.opacity.draw(&mut rng);
            let stretch_x = layer.stretch_x.draw(&mut rng);
            let stretch_y = layer.stretch_y.draw(&mut rng);
            let rotation = layer.rotation.map_or(0.0, |s| rng.signed(s));

            drops.push(Droplet {
                id,
                x,
                y,
                radius,
                opacity,
                size_class: layer.class,
                stretch_x,
                stretch_y,
                rotation,
            });
            id += 1;
        }
    }

    // Stable: equal radii keep emission order
    drops.sort_by(|a, b| a.radius.total_cmp(&b.radius));
    drops
}
