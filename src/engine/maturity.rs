//! Strength-vs-age projection scaled from the 28-day estimate.

use crate::domain::{EstimationResult, MaturityPoint};

/// Projection ages (days) and their fraction of the 28-day strength.
pub const MATURITY_SCHEDULE: [(u32, f64); 4] = [(3, 0.45), (7, 0.70), (14, 0.88), (28, 1.00)];

/// Project the four maturity points for a strength value (MPa).
///
/// `fc` at day 28 equals `strength_mpa` exactly.
pub fn maturity_curve(strength_mpa: f64) -> [MaturityPoint; 4] {
    MATURITY_SCHEDULE.map(|(day, fraction)| MaturityPoint {
        day,
        fc: strength_mpa * fraction,
    })
}

/// Convenience wrapper over [`maturity_curve`] for an engine result.
pub fn maturity_for(result: &EstimationResult) -> [MaturityPoint; 4] {
    maturity_curve(result.strength_mpa)
}

/// Expand points into a step-after polyline: each value holds until the next day.
pub fn step_after(points: &[MaturityPoint]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len() * 2);
    for (i, p) in points.iter().enumerate() {
        let x = f64::from(p.day);
        if i > 0 {
            out.push((x, points[i - 1].fc));
        }
        out.push((x, p.fc));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_28_matches_strength_exactly() {
        for s in [5.0, 17.33, 34.55, 64.2, 105.0] {
            let curve = maturity_curve(s);
            assert_eq!(curve[3].day, 28);
            assert_eq!(curve[3].fc, s);
        }
    }

    #[test]
    fn curve_strictly_increases_for_positive_strength() {
        let curve = maturity_curve(34.55);
        for w in curve.windows(2) {
            assert!(w[0].day < w[1].day);
            assert!(w[0].fc < w[1].fc, "{:?} !< {:?}", w[0], w[1]);
        }
        assert!((curve[0].fc - 15.5475).abs() < 1e-9);
    }

    #[test]
    fn step_after_holds_previous_value() {
        let pts = maturity_curve(10.0);
        let line = step_after(&pts);
        assert_eq!(line.len(), 7);
        assert_eq!(line[0], (3.0, 4.5));
        assert_eq!(line[1], (7.0, 4.5));
        assert_eq!(line[2], (7.0, 7.0));
        assert_eq!(line[6], (28.0, 10.0));
    }
}
