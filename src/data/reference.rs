//! Static calibration table shown on the "Calibration Data" tab.
//!
//! The rows are illustrative laboratory logs. The estimator is not fitted to
//! them and never reads them.

use crate::domain::ReferenceSample;

pub const REFERENCE_SAMPLES: [ReferenceSample; 5] = [
    sample(1, 540.0, 162.0, 1040.0, 676.0, 28, 79.99),
    sample(2, 332.0, 228.0, 932.0, 594.0, 270, 40.27),
    sample(3, 198.0, 192.0, 978.0, 825.0, 360, 44.30),
    sample(4, 266.0, 228.0, 932.0, 670.0, 365, 41.05),
    sample(5, 480.0, 192.0, 932.0, 594.0, 90, 54.32),
];

/// Summary line printed under the table.
pub const REFERENCE_FOOTNOTE: &str = "Reference logs are illustrative and are not used by the estimator.";

pub fn reference_samples() -> &'static [ReferenceSample] {
    &REFERENCE_SAMPLES
}

const fn sample(
    id: u32,
    cement: f64,
    water: f64,
    coarse_aggregate: f64,
    sand: f64,
    age_days: u32,
    actual_strength_mpa: f64,
) -> ReferenceSample {
    ReferenceSample {
        id,
        cement,
        water,
        coarse_aggregate,
        sand,
        age_days,
        actual_strength_mpa,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_five_unique_rows() {
        let rows = reference_samples();
        assert_eq!(rows.len(), 5);
        for (i, r) in rows.iter().enumerate() {
            assert_eq!(r.id as usize, i + 1);
        }
        assert_eq!(rows[0].label(), "#001");
        assert_eq!(rows[2].sand, 825.0);
        assert_eq!(rows[4].actual_strength_mpa, 54.32);
    }
}
