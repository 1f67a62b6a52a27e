//! Numerical astrodynamics engine.
//!
//! The physics lives in the `astro_*` crates; this facade re-exports them so
//! front-ends (the CLI, tests, other tools) depend on a single package.

pub use astro_config as config;
pub use astro_core as core;
pub use astro_determination as determination;
pub use astro_dynamics as dynamics;
pub use astro_entry as entry;
pub use astro_export as export;
pub use astro_impulsive as impulsive;
pub use astro_interplanetary as interplanetary;
pub use astro_launch as launch;
pub use astro_lowthrust as lowthrust;
pub use astro_ode as ode;
pub use astro_orbits as orbits;
pub use astro_perturbations as perturbations;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
