//! Per-body physical constants.
//!
//! Every value is keyed by [`CelestialBody`] and fixed at compile time. Angles are
//! radians, distances kilometres, periods seconds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{AU_KM, SECONDS_PER_DAY};

/// Bodies known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CelestialBody {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// Bodies orbiting the Sun with tabulated J2000 elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

#[derive(Debug, Error)]
#[error("unknown celestial body '{0}'")]
pub struct UnknownBody(pub String);

/// Mean J2000 elements (`a` in AU, angles in degrees) or their rates per Julian century.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanetaryElements {
    pub a: f64,
    pub e: f64,
    pub i: f64,
    pub raan: f64,
    /// Longitude of perihelion.
    pub long_perihelion: f64,
    /// Mean longitude.
    pub mean_longitude: f64,
}

impl CelestialBody {
    pub const ALL: [CelestialBody; 11] = [
        CelestialBody::Sun,
        CelestialBody::Mercury,
        CelestialBody::Venus,
        CelestialBody::Earth,
        CelestialBody::Moon,
        CelestialBody::Mars,
        CelestialBody::Jupiter,
        CelestialBody::Saturn,
        CelestialBody::Uranus,
        CelestialBody::Neptune,
        CelestialBody::Pluto,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CelestialBody::Sun => "Sun",
            CelestialBody::Mercury => "Mercury",
            CelestialBody::Venus => "Venus",
            CelestialBody::Earth => "Earth",
            CelestialBody::Moon => "Moon",
            CelestialBody::Mars => "Mars",
            CelestialBody::Jupiter => "Jupiter",
            CelestialBody::Saturn => "Saturn",
            CelestialBody::Uranus => "Uranus",
            CelestialBody::Neptune => "Neptune",
            CelestialBody::Pluto => "Pluto",
        }
    }

    /// Equatorial radius (km).
    pub fn equatorial_radius(self) -> f64 {
        match self {
            CelestialBody::Sun => 696_300.0,
            CelestialBody::Mercury => 2_439.7,
            CelestialBody::Venus => 6_051.8,
            CelestialBody::Earth => 6_378.137,
            CelestialBody::Moon => 1_738.1,
            CelestialBody::Mars => 3_396.2,
            CelestialBody::Jupiter => 71_492.0,
            CelestialBody::Saturn => 60_268.0,
            CelestialBody::Uranus => 25_559.0,
            CelestialBody::Neptune => 24_764.0,
            CelestialBody::Pluto => 1_188.3,
        }
    }

    pub fn flattening(self) -> f64 {
        match self {
            CelestialBody::Sun => 0.000_050,
            CelestialBody::Mercury => 0.000_900,
            CelestialBody::Venus => 0.0,
            CelestialBody::Earth => 1.0 / 298.257_222_101,
            CelestialBody::Moon => 0.001_200,
            CelestialBody::Mars => 0.005_890,
            CelestialBody::Jupiter => 0.064_870,
            CelestialBody::Saturn => 0.097_960,
            CelestialBody::Uranus => 0.022_900,
            CelestialBody::Neptune => 0.017_100,
            CelestialBody::Pluto => 0.010_000,
        }
    }

    /// Second zonal harmonic J2.
    pub fn j2(self) -> f64 {
        match self {
            CelestialBody::Sun | CelestialBody::Pluto => 0.0,
            CelestialBody::Mercury => 60e-6,
            CelestialBody::Venus => 4.458e-6,
            CelestialBody::Earth => 1.08263e-3,
            CelestialBody::Moon => 202.7e-6,
            CelestialBody::Mars => 1.96045e-3,
            CelestialBody::Jupiter => 14.736e-3,
            CelestialBody::Saturn => 16.298e-3,
            CelestialBody::Uranus => 3.34343e-3,
            CelestialBody::Neptune => 3.411e-3,
        }
    }

    /// Sidereal orbital period (s); zero for the Sun.
    pub fn sidereal_orbital_period(self) -> f64 {
        let days = match self {
            CelestialBody::Sun => 0.0,
            CelestialBody::Mercury => 87.969_1,
            CelestialBody::Venus => 224.701,
            CelestialBody::Earth => 365.256_363_004,
            CelestialBody::Moon => 27.321_661,
            CelestialBody::Mars => 686.98,
            CelestialBody::Jupiter => 4_332.59,
            CelestialBody::Saturn => 10_755.7,
            CelestialBody::Uranus => 30_688.5,
            CelestialBody::Neptune => 60_195.0,
            CelestialBody::Pluto => 90_560.0,
        };
        days * SECONDS_PER_DAY
    }

    /// Mean orbital angular velocity 2π/T (rad/s).
    pub fn orbital_angular_velocity(self) -> f64 {
        match self {
            CelestialBody::Sun => 0.0,
            _ => 2.0 * std::f64::consts::PI / self.sidereal_orbital_period(),
        }
    }

    /// Rotation rate used for ground tracks and atmosphere co-rotation (rad/s).
    pub fn rotation_rate(self) -> f64 {
        match self {
            CelestialBody::Sun => 0.0,
            _ => self.orbital_angular_velocity() + 2.0 * std::f64::consts::PI / SECONDS_PER_DAY,
        }
    }

    /// Mass (kg).
    pub fn mass(self) -> f64 {
        match self {
            CelestialBody::Sun => 1.9885e30,
            CelestialBody::Mercury => 3.3011e23,
            CelestialBody::Venus => 4.8675e24,
            CelestialBody::Earth => 5.972168e24,
            CelestialBody::Moon => 7.342e22,
            CelestialBody::Mars => 6.4171e23,
            CelestialBody::Jupiter => 1.8982e27,
            CelestialBody::Saturn => 5.6834e26,
            CelestialBody::Uranus => 8.6810e25,
            CelestialBody::Neptune => 1.02409e26,
            CelestialBody::Pluto => 1.303e22,
        }
    }

    /// Surface gravity (m/s²).
    pub fn surface_gravity(self) -> f64 {
        match self {
            CelestialBody::Sun => 274.0,
            CelestialBody::Mercury => 3.7,
            CelestialBody::Venus => 8.87,
            CelestialBody::Earth => 9.806_65,
            CelestialBody::Moon => 1.622,
            CelestialBody::Mars => 3.720_76,
            CelestialBody::Jupiter => 24.79,
            CelestialBody::Saturn => 10.44,
            CelestialBody::Uranus => 8.69,
            CelestialBody::Neptune => 11.15,
            CelestialBody::Pluto => 0.62,
        }
    }

    /// Surface gravity (km/s²).
    pub fn surface_gravity_km(self) -> f64 {
        self.surface_gravity() * 1e-3
    }

    /// Body the orbit is referred to; `None` for the Sun.
    pub fn parent(self) -> Option<CelestialBody> {
        match self {
            CelestialBody::Sun => None,
            CelestialBody::Moon => Some(CelestialBody::Earth),
            _ => Some(CelestialBody::Sun),
        }
    }

    /// Laplace sphere of influence a·(m/M)^(2/5) (km).
    pub fn sphere_of_influence(self) -> f64 {
        match self.parent() {
            None => 0.0,
            Some(parent) => self.semi_major_axis() * (self.mass() / parent.mass()).powf(0.4),
        }
    }

    /// Semi-major axis of the body's orbit (km).
    pub fn semi_major_axis(self) -> f64 {
        match self {
            CelestialBody::Sun => 0.0,
            CelestialBody::Mercury => 0.387_098 * AU_KM,
            CelestialBody::Venus => 0.723_332 * AU_KM,
            CelestialBody::Earth => 149_598_023.0,
            CelestialBody::Moon => 0.002_570 * AU_KM,
            CelestialBody::Mars => 1.523_680_55 * AU_KM,
            CelestialBody::Jupiter => 5.2038 * AU_KM,
            CelestialBody::Saturn => 9.5826 * AU_KM,
            CelestialBody::Uranus => 19.191_26 * AU_KM,
            CelestialBody::Neptune => 30.07 * AU_KM,
            CelestialBody::Pluto => 39.482 * AU_KM,
        }
    }

    pub fn eccentricity(self) -> f64 {
        match self {
            CelestialBody::Sun => 0.0,
            CelestialBody::Mercury => 0.205_630,
            CelestialBody::Venus => 0.006_772,
            CelestialBody::Earth => 0.016_708_6,
            CelestialBody::Moon => 0.054_9,
            CelestialBody::Mars => 0.093_4,
            CelestialBody::Jupiter => 0.048_9,
            CelestialBody::Saturn => 0.056_5,
            CelestialBody::Uranus => 0.047_17,
            CelestialBody::Neptune => 0.008_678,
            CelestialBody::Pluto => 0.2488,
        }
    }

    /// Orbital inclination (rad).
    pub fn inclination(self) -> f64 {
        let deg: f64 = match self {
            CelestialBody::Sun | CelestialBody::Earth => 0.0,
            CelestialBody::Mercury => 7.005,
            CelestialBody::Venus => 3.394_58,
            CelestialBody::Moon => 5.145,
            CelestialBody::Mars => 1.85,
            CelestialBody::Jupiter => 1.303,
            CelestialBody::Saturn => 2.485,
            CelestialBody::Uranus => 0.773,
            CelestialBody::Neptune => 1.77,
            CelestialBody::Pluto => 17.16,
        };
        deg.to_radians()
    }

    /// Right ascension of the ascending node (rad).
    pub fn raan(self) -> f64 {
        let deg: f64 = match self {
            CelestialBody::Sun | CelestialBody::Moon => 0.0,
            CelestialBody::Mercury => 48.331,
            CelestialBody::Venus => 76.68,
            CelestialBody::Earth => -11.260_64,
            CelestialBody::Mars => 49.578_54,
            CelestialBody::Jupiter => 100.464,
            CelestialBody::Saturn => 113.665,
            CelestialBody::Uranus => 74.006,
            CelestialBody::Neptune => 131.783,
            CelestialBody::Pluto => 110.299,
        };
        deg.to_radians()
    }

    /// Argument of periapsis (rad).
    pub fn arg_periapsis(self) -> f64 {
        let deg: f64 = match self {
            CelestialBody::Sun | CelestialBody::Moon => 0.0,
            CelestialBody::Mercury => 29.124,
            CelestialBody::Venus => 54.884,
            CelestialBody::Earth => 114.207_83,
            CelestialBody::Mars => 286.5,
            CelestialBody::Jupiter => 273.867,
            CelestialBody::Saturn => 339.392,
            CelestialBody::Uranus => 96.998_857,
            CelestialBody::Neptune => 273.187,
            CelestialBody::Pluto => 113.834,
        };
        deg.to_radians()
    }

    /// Gravitational parameter μ (km³/s²).
    pub fn mu(self) -> f64 {
        match self {
            CelestialBody::Sun => 132_712_440_018.9,
            CelestialBody::Mercury => 22_032.9,
            CelestialBody::Venus => 324_859.9,
            CelestialBody::Earth => 398_600.441_88,
            CelestialBody::Moon => 4_904.869_59,
            CelestialBody::Mars => 42_828.372,
            CelestialBody::Jupiter => 126_686_534.9,
            CelestialBody::Saturn => 37_931_187.9,
            CelestialBody::Uranus => 5_793_939.9,
            CelestialBody::Neptune => 6_836_529.9,
            CelestialBody::Pluto => 871.9,
        }
    }

    /// Texture asset path consumed by plotting front-ends. Never opened here.
    pub fn texture(self) -> &'static str {
        match self {
            CelestialBody::Sun => "./tools/texture/Sun.png",
            CelestialBody::Mercury => "./tools/texture/Mercury.jpg",
            CelestialBody::Venus => "./tools/texture/Venus.jpg",
            CelestialBody::Earth | CelestialBody::Pluto => "./tools/texture/Earth.jpg",
            CelestialBody::Moon => "./tools/texture/Moon.jpg",
            CelestialBody::Mars => "./tools/texture/Mars.jpg",
            CelestialBody::Jupiter => "./tools/texture/Jupiter.jpg",
            CelestialBody::Saturn => "./tools/texture/Saturn.jpg",
            CelestialBody::Uranus => "./tools/texture/Uranus.jpg",
            CelestialBody::Neptune => "./tools/texture/Neptune.jpg",
        }
    }
}

impl Planet {
    pub const ALL: [Planet; 9] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    pub fn body(self) -> CelestialBody {
        self.into()
    }

    /// J2000 mean elements and their rates per Julian century.
    pub fn elements_and_rates(self) -> (PlanetaryElements, PlanetaryElements) {
        let (el, rate) = match self {
            Planet::Mercury => (
                [0.38709927, 0.20563593, 7.00497902, 48.33076593, 77.45779628, 252.25032350],
                [0.00000037, 0.00001906, -0.00594749, -0.12534081, 0.16047689, 149472.67411175],
            ),
            Planet::Venus => (
                [0.72333566, 0.00677672, 3.39467605, 76.67984255, 131.60246717, 181.97909950],
                [0.00000390, -0.00004107, -0.00078890, -0.27769418, 0.00268329, 58517.81538729],
            ),
            Planet::Earth => (
                [1.00000261, 0.01671123, -0.00001531, 0.0, 102.93768193, 100.46457166],
                [0.00000562, -0.00004932, -0.01294668, 0.0, 0.32327364, 35999.37244981],
            ),
            Planet::Mars => (
                [1.52371034, 0.09339410, 1.84969142, 49.55953891, 360.0 - 23.94362959, 360.0 - 4.55343205],
                [0.0001847, 0.00007882, -0.00813131, -0.29257343, 0.44441088, 19140.30268499],
            ),
            Planet::Jupiter => (
                [5.20288700, 0.04838624, 1.30439695, 100.47390909, 14.72847983, 34.39644501],
                [-0.00011607, 0.00013253, -0.00183714, 0.20469106, 0.21252668, 3034.74612775],
            ),
            Planet::Saturn => (
                [9.53667594, 0.05386179, 2.48599187, 113.66242448, 92.59887831, 49.95424423],
                [-0.00125060, -0.00050991, 0.00193609, -0.28867794, -0.41897216, 1222.49362201],
            ),
            Planet::Uranus => (
                [19.18916464, 0.04725744, 0.77263783, 74.01692503, 170.95427630, 313.23810451],
                [-0.00196176, -0.00004397, -0.00242939, 0.04240589, 0.40805281, 424.48202785],
            ),
            Planet::Neptune => (
                [30.06992276, 0.00859048, 1.77004347, 131.78422574, 44.96476227, 360.0 - 55.12002969],
                [0.00026291, 0.00005105, 0.00035372, -0.00508664, -0.32241464, 218.45945325],
            ),
            Planet::Pluto => (
                [39.48211675, 0.24882730, 17.14001206, 110.30393684, 224.06891629, 238.92903833],
                [-0.00031596, 0.00005170, 0.00004818, -0.01183482, -0.04062942, 145.20780515],
            ),
        };
        (PlanetaryElements::from(el), PlanetaryElements::from(rate))
    }
}

impl From<[f64; 6]> for PlanetaryElements {
    fn from(v: [f64; 6]) -> Self {
        Self {
            a: v[0],
            e: v[1],
            i: v[2],
            raan: v[3],
            long_perihelion: v[4],
            mean_longitude: v[5],
        }
    }
}

impl From<Planet> for CelestialBody {
    fn from(planet: Planet) -> Self {
        match planet {
            Planet::Mercury => CelestialBody::Mercury,
            Planet::Venus => CelestialBody::Venus,
            Planet::Earth => CelestialBody::Earth,
            Planet::Mars => CelestialBody::Mars,
            Planet::Jupiter => CelestialBody::Jupiter,
            Planet::Saturn => CelestialBody::Saturn,
            Planet::Uranus => CelestialBody::Uranus,
            Planet::Neptune => CelestialBody::Neptune,
            Planet::Pluto => CelestialBody::Pluto,
        }
    }
}

impl TryFrom<CelestialBody> for Planet {
    type Error = UnknownBody;

    fn try_from(body: CelestialBody) -> Result<Self, Self::Error> {
        Planet::ALL
            .into_iter()
            .find(|p| CelestialBody::from(*p) == body)
            .ok_or_else(|| UnknownBody(format!("{} is not a planet", body.name())))
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.body().name())
    }
}

impl FromStr for CelestialBody {
    type Err = UnknownBody;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        CelestialBody::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownBody(s.to_string()))
    }
}

impl FromStr for Planet {
    type Err = UnknownBody;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CelestialBody::from_str(s)?.try_into()
    }
}
