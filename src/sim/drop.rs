// drop.rs - Simulated droplet
//
// Owned by the engine's arena; renderers only ever see `&[PhysicsDrop]`.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropState {
    /// Below critical mass, holding still
    Static,
    /// At or above critical mass, sliding down
    Flowing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsDrop {
    pub id: u32,
    /// Pixels on the simulation canvas
    pub x: f32,
    pub y: f32,
    mass: f32,
    radius: f32,
    /// Pixels per tick
    pub vy: f32,
    pub state: DropState,
    /// Distance slid since the last trail check
    pub trail: f32,
}

impl PhysicsDrop {
    /// `mass` must be positive; callers gate this.
    pub(crate) fn new(id: u32, x: f32, y: f32, mass: f32, state: DropState) -> Self {
        Self {
            id,
            x,
            y,
            mass,
            radius: mass.sqrt(),
            vy: 0.0,
            state,
            trail: 0.0,
        }
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Always `sqrt(mass)`.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub(crate) fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.radius = mass.sqrt();
    }

    #[inline]
    pub fn is_flowing(&self) -> bool {
        self.state == DropState::Flowing
    }

    /// Absorbs `other`: masses add, position moves to the mass-weighted mean.
    pub(crate) fn absorb(&mut self, other: &PhysicsDrop) {
        let total = self.mass + other.mass;
        let own = self.mass / total;
        let theirs = other.mass / total;
        self.x = self.x * own + other.x * theirs;
        self.y = self.y * own + other.y * theirs;
        self.set_mass(total);
    }
}
