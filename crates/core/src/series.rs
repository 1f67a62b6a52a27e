//! Local extrema of sampled series.

/// Local maxima/minima of a series with the indices they occur at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extrema {
    pub maxima: Vec<f64>,
    pub max_indices: Vec<usize>,
    pub minima: Vec<f64>,
    pub min_indices: Vec<usize>,
}

/// Strict interior local extrema of `x`. NaN samples never qualify and break
/// neighbouring comparisons.
pub fn extrema(x: &[f64]) -> Extrema {
    let mut out = Extrema::default();
    for (i, w) in x.windows(3).enumerate() {
        let (a, b, c) = (w[0], w[1], w[2]);
        if a.is_nan() || b.is_nan() || c.is_nan() {
            continue;
        }
        if b > a && b >= c {
            out.maxima.push(b);
            out.max_indices.push(i + 1);
        } else if b < a && b <= c {
            out.minima.push(b);
            out.min_indices.push(i + 1);
        }
    }
    out
}

/// Forward finite differences dy/dt over consecutive samples.
pub fn finite_difference(t: &[f64], y: &[f64]) -> Vec<f64> {
    t.windows(2)
        .zip(y.windows(2))
        .map(|(tw, yw)| (yw[1] - yw[0]) / (tw[1] - tw[0]))
        .collect()
}
