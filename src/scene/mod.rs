// scene/ - Decorative droplet snapshots
//
// Precomputed, never simulated. Coordinates are normalized to the viewport,
// radii are in design units of a 640-wide reference canvas.
//
// - layers: the main five-layer rain-on-glass population
// - streaks: elongated drops that have run down the glass

mod layers;
mod streaks;

pub use layers::generate;
pub use streaks::generate_streaks;

/// Width of the reference canvas radii are expressed against.
pub const DESIGN_WIDTH: f64 = 640.0;
pub const DESIGN_HEIGHT: f64 = 960.0;

/// Largest population either generator emits; larger requests clamp.
pub const MAX_DROP_COUNT: i64 = 20_000;

pub const DEFAULT_SEED: i64 = 42;
pub const DEFAULT_STREAK_SEED: i64 = 123;

/// Rendering detail tier. Has no physical meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Droplet {
    pub id: u32,
    /// 0..1 across the viewport width
    pub x: f64,
    /// 0..1 down the viewport height
    pub y: f64,
    pub radius: f64,
    pub opacity: f64,
    pub size_class: SizeClass,
    /// Ellipse stretch, 1.0 = circle
    pub stretch_x: f64,
    pub stretch_y: f64,
    pub rotation: f64,
}

impl Droplet {
    /// A round droplet with no rotation.
    pub fn circle(id: u32, x: f64, y: f64, radius: f64, opacity: f64, size_class: SizeClass) -> Self {
        Self {
            id,
            x,
            y,
            radius,
            opacity,
            size_class,
            stretch_x: 1.0,
            stretch_y: 1.0,
            rotation: 0.0,
        }
    }

    /// Semi-axes in design units.
    #[inline]
    pub fn axes(&self) -> (f64, f64) {
        (self.radius * self.stretch_x, self.radius * self.stretch_y)
    }
}
