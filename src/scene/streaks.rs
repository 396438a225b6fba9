// streaks.rs - Water trickled down the glass
//
// Very narrow, very tall, nearly vertical. Independent of the main
// population: own seed, own id range, emission order kept.

use super::{Droplet, MAX_DROP_COUNT, SizeClass};
use crate::rng::Mulberry32;

const STREAK_ID_BASE: u32 = 1000;

pub fn generate_streaks(count: i64, seed: i64) -> Vec<Droplet> {
    let count = count.clamp(0, MAX_DROP_COUNT) as usize;
    let mut rng = Mulberry32::new(seed);
    let mut streaks = Vec::with_capacity(count);

    for i in 0..count {
        let start_y = rng.next_f64() * 0.3;
        let x = rng.next_f64();
        let y = start_y + rng.next_f64() * 0.4;

        streaks.push(Droplet {
            id: STREAK_ID_BASE + i as u32,
            x,
            y,
            radius: rng.range(2.0, 5.0),
            opacity: rng.range(0.15, 0.4),
            size_class: SizeClass::Small,
            stretch_x: rng.range(0.3, 0.5),
            stretch_y: rng.range(3.0, 5.0),
            rotation: rng.signed(0.1),
        });
    }

    streaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaks_are_tall_and_narrow() {
        let streaks = generate_streaks(64, 123);
        assert_eq!(streaks.len(), 64);
        for (i, s) in streaks.iter().enumerate() {
            assert_eq!(s.id, 1000 + i as u32);
            assert!(s.stretch_x < 0.5 && s.stretch_y >= 3.0);
            assert!(s.rotation.abs() <= 0.05);
            assert!(s.y < 0.7);
        }
    }

    #[test]
    fn independent_of_main_population() {
        let before = generate_streaks(10, 9);
        let _ = super::super::generate(500, 9);
        assert_eq!(before, generate_streaks(10, 9));
    }
}
