// sim/ - Rain-on-glass physics
//
// Drops live in a flat arena (Vec) owned by the engine. Each tick runs in a
// fixed order: spawn -> grid rebuild -> per-drop update -> compaction.
// Merges and despawns only flag arena slots; compaction removes them in one
// pass, so nothing is removed while the arena is being walked.

mod drop;
mod grid;
mod tuning;

pub use drop::{DropState, PhysicsDrop};
pub use grid::SpatialHashGrid;
pub use tuning::{PhysicsConfig, PhysicsPreset, Tuning};

use crate::rng::Mulberry32;
use crate::scene::DEFAULT_SEED;

/// What happened to an arena slot during the current tick.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Fate {
    Live,
    Despawned,
    Absorbed,
}

pub struct PhysicsEngine {
    w: f32,
    h: f32,

    config: PhysicsConfig,
    tuning: Tuning,

    // Arena
    drops: Vec<PhysicsDrop>,
    next_id: u32,

    // Per-tick scratch, reused between ticks
    grid: SpatialHashGrid<usize>,
    fate: Vec<Fate>,
    born: Vec<PhysicsDrop>,
    neighbors: Vec<usize>,

    // Seconds owed to the spawner
    spawn_clock: f64,

    rng: Mulberry32,
}

impl PhysicsEngine {
    pub fn new(width: f32, height: f32, config: PhysicsConfig) -> Self {
        Self::seeded(width, height, config, DEFAULT_SEED)
    }

    pub fn seeded(width: f32, height: f32, config: PhysicsConfig, seed: i64) -> Self {
        let tuning = Tuning::default();
        Self {
            w: width,
            h: height,
            config: config.sanitized(),
            tuning,
            drops: Vec::new(),
            next_id: 0,
            grid: SpatialHashGrid::new(width, height, tuning.cell_size),
            fate: Vec::new(),
            born: Vec::new(),
            neighbors: Vec::new(),
            spawn_clock: 0.0,
            rng: Mulberry32::new(seed),
        }
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self.grid = SpatialHashGrid::new(self.w, self.h, tuning.cell_size);
        self
    }

    /// Swaps in a grid for the new canvas. Drops are neither moved nor scaled.
    pub fn resize(&mut self, width: f32, height: f32) {
        log::debug!("engine resize {}x{} -> {}x{}", self.w, self.h, width, height);
        self.w = width;
        self.h = height;
        self.grid = SpatialHashGrid::new(width, height, self.tuning.cell_size);
    }

    /// Advances one tick covering `dt` simulated seconds. Negative or
    /// non-finite `dt` counts as zero.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        self.spawn_due(dt);
        self.rebuild_grid();

        let n = self.drops.len();
        self.fate.clear();
        self.fate.resize(n, Fate::Live);
        self.born.clear();

        for i in 0..n {
            if self.fate[i] != Fate::Live {
                continue;
            }

            // Work on a copy; neighbors read the arena, which already holds
            // this tick's values for every slot before `i`.
            let mut d = self.drops[i];
            self.classify(&mut d);
            d.y += d.vy;

            if d.y > self.h + d.radius() * self.tuning.despawn_margin {
                self.fate[i] = Fate::Despawned;
                continue;
            }

            if d.is_flowing() {
                self.merge_into(i, &mut d);
                if d.mass() > self.config.critical_mass * self.tuning.trail_margin {
                    self.shed_trail(&mut d);
                }
            }

            self.drops[i] = d;
        }

        self.compact();
    }

    /// Injects a drop at (x, y). Non-finite positions and non-positive or
    /// non-finite mass are rejected.
    pub fn add_drop(&mut self, x: f32, y: f32, mass: f32) -> Option<u32> {
        if !(mass.is_finite() && mass > 0.0 && x.is_finite() && y.is_finite()) {
            return None;
        }
        let id = self.take_id();
        self.drops.push(PhysicsDrop::new(id, x, y, mass, DropState::Static));
        Some(id)
    }

    pub fn clear(&mut self) {
        self.drops.clear();
    }

    pub fn drops(&self) -> &[PhysicsDrop] {
        &self.drops
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn dimensions(&self) -> (f32, f32) {
        (self.w, self.h)
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    // ------------------------------------------------------------------------

    fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_due(&mut self, dt: f32) {
        if self.config.spawn_rate <= 0.0 {
            self.spawn_clock = 0.0;
            return;
        }

        let interval = 1.0 / self.config.spawn_rate as f64;
        self.spawn_clock += dt as f64;

        let mut spawned = 0;
        while self.spawn_clock >= interval {
            self.spawn_one();
            self.spawn_clock -= interval;
            spawned += 1;
        }
        if spawned > 1 {
            log::debug!("spawned {spawned} drops in one tick (dt {dt:.3}s)");
        }
    }

    /// Random x across the full width, y inside the top spawn band.
    fn spawn_one(&mut self) {
        let x = self.rng.next_f32() * self.w;
        let y = self.rng.next_f32() * (self.h * self.tuning.spawn_band);
        let (lo, hi) = self.tuning.spawn_mass;
        let mass = self.rng.range_f32(lo, hi);
        let id = self.take_id();
        self.drops.push(PhysicsDrop::new(id, x, y, mass, DropState::Static));
    }

    fn rebuild_grid(&mut self) {
        self.grid.clear();
        for (i, d) in self.drops.iter().enumerate() {
            self.grid.insert(i, d.x, d.y);
        }
    }

    /// Mass-activated gravity; state is recomputed from scratch every tick.
    fn classify(&self, d: &mut PhysicsDrop) {
        let crit = self.config.critical_mass;
        if d.mass() >= crit {
            let target = self.config.viscosity * (d.mass() - crit);
            d.vy = target.min(self.config.terminal_velocity);
            d.state = DropState::Flowing;
        } else {
            d.vy = 0.0;
            d.state = DropState::Static;
        }
    }

    fn state_for(&self, mass: f32) -> DropState {
        if mass >= self.config.critical_mass {
            DropState::Flowing
        } else {
            DropState::Static
        }
    }

    fn merge_into(&mut self, i: usize, d: &mut PhysicsDrop) {
        let mut neighbors = std::mem::take(&mut self.neighbors);
        self.grid.neighbors_into(i, d.x, d.y, &mut neighbors);

        for &j in &neighbors {
            if self.fate[j] != Fate::Live {
                continue;
            }
            let other = self.drops[j];
            let dx = d.x - other.x;
            let dy = d.y - other.y;
            let reach = (d.radius() + other.radius()) * self.tuning.merge_threshold;
            if (dx * dx + dy * dy).sqrt() < reach {
                d.absorb(&other);
                self.fate[j] = Fate::Absorbed;
            }
        }

        self.neighbors = neighbors;
    }

    /// Peels a small static drop off the back of a heavy flowing one. The
    /// parent never drops to or below critical mass.
    fn shed_trail(&mut self, d: &mut PhysicsDrop) {
        d.trail += d.vy;
        if d.trail <= d.radius() * self.tuning.trail_spacing {
            return;
        }

        if self.rng.chance(self.config.trail_density) {
            let (lo, hi) = self.tuning.trail_mass;
            let mass = self.rng.range_f32(lo, hi);
            let remaining = d.mass() - mass;
            if remaining > self.config.critical_mass {
                d.set_mass(remaining);
                let x = d.x + self.rng.signed_f32(d.radius() * self.tuning.trail_jitter);
                let y = d.y - d.radius() * self.tuning.trail_offset;
                let id = self.take_id();
                let state = self.state_for(mass);
                self.born.push(PhysicsDrop::new(id, x, y, mass, state));
            }
        }
        d.trail = 0.0;
    }

    fn compact(&mut self) {
        let mut write = 0;
        for read in 0..self.drops.len() {
            if self.fate[read] != Fate::Live {
                continue;
            }
            self.drops[write] = self.drops[read];
            write += 1;
        }
        self.drops.truncate(write);
        self.drops.append(&mut self.born);
    }
}
