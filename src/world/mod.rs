// world/ - What sits behind the glass
//
// Pure queries, no per-frame state:
// - backdrop: gradient textures the glass refracts, with a mip chain
// - noise: hash noise and easing used by the analytic rain field

mod backdrop;
pub mod noise;

pub use backdrop::{Backdrop, PHYSICS_STOPS, REFLECTION_STOPS, WALLPAPER_STOPS, hex};
