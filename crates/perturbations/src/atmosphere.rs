//! US Standard Atmosphere 1976 density by exponential interpolation.

/// Geometric altitudes of the table rows (km).
const ALTITUDES_KM: [f64; 28] = [
    0.0, 25.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 180.0, 200.0,
    250.0, 300.0, 350.0, 400.0, 450.0, 500.0, 600.0, 700.0, 800.0, 900.0, 1000.0,
];

/// Density at each row (kg/m³).
const DENSITIES: [f64; 28] = [
    1.225, 4.008e-2, 1.841e-2, 3.996e-3, 1.027e-3, 3.097e-4, 8.283e-5, 1.846e-5, 3.416e-6, 5.606e-7, 9.708e-8,
    2.222e-8, 8.152e-9, 3.831e-9, 2.076e-9, 5.194e-10, 2.541e-10, 6.073e-11, 1.916e-11, 7.014e-12, 2.803e-12,
    1.184e-12, 5.215e-13, 1.137e-13, 3.070e-14, 1.136e-14, 5.759e-15, 3.561e-15,
];

/// Scale height of each interval (km).
const SCALE_HEIGHTS_KM: [f64; 27] = [
    7.310, 6.427, 6.546, 7.360, 8.342, 7.583, 6.661, 5.927, 5.533, 5.703, 6.782, 9.973, 13.243, 16.322, 21.652,
    27.974, 34.934, 43.342, 49.755, 54.513, 58.019, 60.980, 65.654, 76.377, 100.587, 147.203, 208.020,
];

pub const MAX_ALTITUDE_KM: f64 = 1000.0;

/// Atmospheric density (kg/m³) at altitude `z_km`, clamped to `[0, 1000]` km.
pub fn density(z_km: f64) -> f64 {
    let z = z_km.clamp(0.0, MAX_ALTITUDE_KM);
    let idx = ALTITUDES_KM
        .windows(2)
        .position(|w| z >= w[0] && z < w[1])
        .unwrap_or(SCALE_HEIGHTS_KM.len() - 1);
    DENSITIES[idx] * (-(z - ALTITUDES_KM[idx]) / SCALE_HEIGHTS_KM[idx]).exp()
}
