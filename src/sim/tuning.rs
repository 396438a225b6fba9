// tuning.rs - Engine parameters
//
// PhysicsConfig is the user-facing knob set; Tuning is the numeric shape of
// the model. Both come in two generations: the current defaults and the
// first engine ("classic"), which spawned anywhere and merged on contact.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsConfig {
    /// Drops per simulated second; 0 disables spawning
    pub spawn_rate: f32,
    /// Mass at which a drop starts to slide
    pub critical_mass: f32,
    /// Carried for parity with the site's settings; the model does not apply it
    pub friction: f32,
    /// Probability of shedding a trail drop at each trail check
    pub trail_density: f32,
    /// Viscosity constant: velocity per unit of excess mass
    #[serde(alias = "k")]
    pub viscosity: f32,
    pub terminal_velocity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            spawn_rate: 15.0,
            critical_mass: 200.0,
            friction: 0.92,
            trail_density: 0.15,
            viscosity: 0.12,
            terminal_velocity: 12.0,
        }
    }
}

impl PhysicsConfig {
    pub fn classic() -> Self {
        Self {
            spawn_rate: 10.0,
            critical_mass: 225.0,
            friction: 0.9,
            trail_density: 0.1,
            viscosity: 0.1,
            terminal_velocity: 10.0,
        }
    }

    /// Replaces non-finite or negative fields with defaults. Critical mass
    /// must also be strictly positive.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            spawn_rate: non_negative("spawn_rate", self.spawn_rate, d.spawn_rate),
            critical_mass: if self.critical_mass.is_finite() && self.critical_mass > 0.0 {
                self.critical_mass
            } else {
                log::warn!("critical_mass {} replaced with {}", self.critical_mass, d.critical_mass);
                d.critical_mass
            },
            friction: non_negative("friction", self.friction, d.friction),
            trail_density: non_negative("trail_density", self.trail_density, d.trail_density).min(1.0),
            viscosity: non_negative("viscosity", self.viscosity, d.viscosity),
            terminal_velocity: non_negative("terminal_velocity", self.terminal_velocity, d.terminal_velocity),
        }
    }
}

fn non_negative(name: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("{name} {value} replaced with {fallback}");
        fallback
    }
}

/// Engine generation selected by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicsPreset {
    /// Current model, tuned by `PhysicsConfig`
    #[default]
    Standard,
    /// First generation: `PhysicsConfig::classic()` with `Tuning::classic()`
    Classic,
}

impl PhysicsPreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "default" => Some(Self::Standard),
            "classic" => Some(Self::Classic),
            _ => None,
        }
    }

    pub fn tuning(self) -> Tuning {
        match self {
            Self::Standard => Tuning::default(),
            Self::Classic => Tuning::classic(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    pub cell_size: f32,
    /// Fraction of the height new drops spawn in, from the top
    pub spawn_band: f32,
    pub spawn_mass: (f32, f32),
    /// Merge when distance < (ra + rb) * threshold
    pub merge_threshold: f32,
    /// Despawn when y > height + radius * margin
    pub despawn_margin: f32,
    /// Shed trails only above critical_mass * margin
    pub trail_margin: f32,
    /// Slide distance between trail checks, in radii
    pub trail_spacing: f32,
    pub trail_mass: (f32, f32),
    /// Horizontal scatter of a trail drop, in radii (full width)
    pub trail_jitter: f32,
    /// How far behind the parent a trail drop lands, in radii
    pub trail_offset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            cell_size: 60.0,
            spawn_band: 0.1,
            spawn_mass: (3.0, 15.0),
            merge_threshold: 0.9,
            despawn_margin: 2.0,
            trail_margin: 1.2,
            trail_spacing: 2.0,
            trail_mass: (3.0, 11.0),
            trail_jitter: 0.5,
            trail_offset: 1.2,
        }
    }
}

impl Tuning {
    pub fn classic() -> Self {
        Self {
            cell_size: 60.0,
            spawn_band: 1.0,
            spawn_mass: (2.0, 12.0),
            merge_threshold: 1.0,
            despawn_margin: 1.0,
            trail_margin: 1.0,
            trail_spacing: 1.5,
            trail_mass: (2.0, 7.0),
            trail_jitter: 0.0,
            trail_offset: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_replaces_bad_values() {
        let cfg = PhysicsConfig {
            spawn_rate: f32::NAN,
            critical_mass: -1.0,
            trail_density: 4.0,
            ..PhysicsConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.spawn_rate, 15.0);
        assert_eq!(cfg.critical_mass, 200.0);
        assert_eq!(cfg.trail_density, 1.0);
    }

    #[test]
    fn deserializes_site_names() {
        let cfg: PhysicsConfig =
            serde_json::from_str(r#"{"spawnRate": 5, "criticalMass": 100, "k": 0.5}"#).unwrap();
        assert_eq!(cfg.spawn_rate, 5.0);
        assert_eq!(cfg.critical_mass, 100.0);
        assert_eq!(cfg.viscosity, 0.5);
        assert_eq!(cfg.terminal_velocity, 12.0);
    }
}
