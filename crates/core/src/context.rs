//! Immutable physical context passed to every computation that needs body constants.

use serde::{Deserialize, Serialize};

use crate::body::CelestialBody;

/// Constants of the central body a computation is performed around.
///
/// Built once per computation and borrowed by every engine function, so two
/// computations around different bodies never observe each other's constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalContext {
    pub body: Option<CelestialBody>,
    pub name: String,
    /// Gravitational parameter (km³/s²).
    pub mu: f64,
    /// Equatorial radius (km).
    pub radius: f64,
    pub j2: f64,
    pub flattening: f64,
    /// Rotation rate used for ground tracks and co-rotating atmospheres (rad/s).
    pub rotation_rate: f64,
    /// Surface gravity (km/s²).
    pub surface_gravity: f64,
}

impl PhysicalContext {
    pub fn of(body: CelestialBody) -> Self {
        Self {
            body: Some(body),
            name: body.name().to_string(),
            mu: body.mu(),
            radius: body.equatorial_radius(),
            j2: body.j2(),
            flattening: body.flattening(),
            rotation_rate: body.rotation_rate(),
            surface_gravity: body.surface_gravity_km(),
        }
    }

    pub fn earth() -> Self {
        Self::of(CelestialBody::Earth)
    }

    pub fn sun() -> Self {
        Self::of(CelestialBody::Sun)
    }

    /// Same body with a different gravitational parameter.
    pub fn with_mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_rotation_rate(mut self, rotation_rate: f64) -> Self {
        self.rotation_rate = rotation_rate;
        self
    }
}

impl From<CelestialBody> for PhysicalContext {
    fn from(body: CelestialBody) -> Self {
        Self::of(body)
    }
}
