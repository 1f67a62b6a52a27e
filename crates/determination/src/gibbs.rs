use astro_core::PhysicalContext;
use astro_core::vector::{self, Vector3};
use astro_orbits::{OrbitalElements, orbital_elements};

use crate::DeterminationError;

const COPLANARITY_TOLERANCE: f64 = 1e-5;

/// Gibbs' method: elements at `r2` from three coplanar position vectors.
pub fn gibbs(
    ctx: &PhysicalContext,
    r1: &Vector3,
    r2: &Vector3,
    r3: &Vector3,
) -> Result<OrbitalElements, DeterminationError> {
    let (r1_m, r2_m, r3_m) = (vector::norm(r1), vector::norm(r2), vector::norm(r3));
    let c12 = vector::cross(r1, r2);
    let c23 = vector::cross(r2, r3);
    let c31 = vector::cross(r3, r1);

    let coplanarity = vector::dot(&vector::unit(r1), &vector::unit(&c23));
    if coplanarity.abs() > COPLANARITY_TOLERANCE {
        return Err(DeterminationError::NotCoplanar(coplanarity.abs()));
    }

    let n = vector::add(
        &vector::add(&vector::scale(&c23, r1_m), &vector::scale(&c31, r2_m)),
        &vector::scale(&c12, r3_m),
    );
    let d = vector::add(&vector::add(&c12, &c23), &c31);
    let s = vector::add(
        &vector::add(&vector::scale(r1, r2_m - r3_m), &vector::scale(r2, r3_m - r1_m)),
        &vector::scale(r3, r1_m - r2_m),
    );

    let factor = (ctx.mu / (vector::norm(&n) * vector::norm(&d))).sqrt();
    let v2 = vector::scale(
        &vector::add(&vector::scale(&vector::cross(&d, r2), 1.0 / r2_m), &s),
        factor,
    );
    Ok(orbital_elements(ctx, r2, &v2))
}
