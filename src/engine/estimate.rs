//! Closed-form compressive strength estimate.
//!
//! ```text
//! wc          = water / cement
//! base        = 85 * 0.12^wc                       (Abrams-type law)
//! time_factor = 0.35 * ln(curing_days) + 0.15       (logarithmic age gain)
//! packing     = (coarse + fine) / 1850              (aggregate packing density)
//! f'c         = clamp(round2(base * time_factor * packing + jitter), 5, 105)
//! ```
//!
//! The model is a heuristic, not a calibrated regression.

use tracing::debug;

use crate::domain::{EstimationResult, MixParameters, StrengthFactors, StrengthGrade};
use crate::engine::jitter::JitterSource;
use crate::error::AppError;

/// Abrams numerator (MPa).
pub const ABRAMS_A: f64 = 85.0;
/// Abrams base; `0 < ABRAMS_B < 1` so strength falls as w/c rises.
pub const ABRAMS_B: f64 = 0.12;
pub const AGE_LOG_COEFF: f64 = 0.35;
pub const AGE_OFFSET: f64 = 0.15;
/// Aggregate mass (kg/m³) that maps to a packing factor of 1.
pub const PACKING_REFERENCE: f64 = 1850.0;

pub const STRENGTH_FLOOR: f64 = 5.0;
pub const STRENGTH_CEILING: f64 = 105.0;

/// Deterministic part of the estimate (everything before jitter).
///
/// Fails on inputs the formula cannot evaluate: `cement <= 0`, `curing_days < 1`
/// or any non-finite field.
pub fn raw_strength(params: &MixParameters) -> Result<StrengthFactors, AppError> {
    validate(params)?;

    let wc_ratio = params.water / params.cement;
    let base = ABRAMS_A * ABRAMS_B.powf(wc_ratio);
    let time_factor = time_factor(params.curing_days);
    let packing = (params.coarse_aggregate + params.fine_aggregate) / PACKING_REFERENCE;
    let raw = base * time_factor * packing;

    if !raw.is_finite() {
        return Err(AppError::runtime("Non-finite strength estimate."));
    }

    Ok(StrengthFactors {
        wc_ratio,
        base,
        time_factor,
        packing,
        raw,
        jitter: 0.0,
    })
}

/// Estimate compressive strength and grade for a mix.
pub fn estimate<J: JitterSource>(params: &MixParameters, jitter: &mut J) -> Result<EstimationResult, AppError> {
    let mut factors = raw_strength(params)?;
    factors.jitter = jitter.next();

    let noisy = factors.raw + factors.jitter;
    let strength_mpa = round2(noisy).clamp(STRENGTH_FLOOR, STRENGTH_CEILING);
    let grade = StrengthGrade::from_strength(strength_mpa);

    debug!(
        wc = factors.wc_ratio,
        base = factors.base,
        time_factor = factors.time_factor,
        packing = factors.packing,
        raw = factors.raw,
        jitter = factors.jitter,
        strength_mpa,
        grade = grade.label(),
        "estimated strength"
    );

    Ok(EstimationResult {
        strength_mpa,
        grade,
        factors,
    })
}

/// Logarithmic age factor. Callers guarantee `days >= 1`.
pub fn time_factor(days: u32) -> f64 {
    AGE_LOG_COEFF * f64::from(days).ln() + AGE_OFFSET
}

fn validate(params: &MixParameters) -> Result<(), AppError> {
    let finite = [
        params.cement,
        params.water,
        params.coarse_aggregate,
        params.fine_aggregate,
    ]
    .iter()
    .all(|v| v.is_finite());
    if !finite {
        return Err(AppError::input("Mix parameters must be finite numbers."));
    }
    if params.cement <= 0.0 {
        return Err(AppError::input(format!(
            "Cement content must be > 0 (got {}).",
            params.cement
        )));
    }
    if params.curing_days < 1 {
        return Err(AppError::input("Curing period must be at least 1 day."));
    }
    Ok(())
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MixField;
    use crate::engine::jitter::{FixedJitter, NoJitter, UniformJitter};

    fn mix(cement: f64, water: f64, coarse: f64, fine: f64, days: u32) -> MixParameters {
        MixParameters {
            cement,
            water,
            coarse_aggregate: coarse,
            fine_aggregate: fine,
            curing_days: days,
        }
    }

    #[test]
    fn default_mix_is_standard_structural() {
        let r = estimate(&MixParameters::default(), &mut NoJitter).unwrap();

        assert!((r.factors.wc_ratio - 0.5143).abs() < 1e-4);
        assert!((r.factors.base - 28.566).abs() < 1e-3, "base = {}", r.factors.base);
        assert!((r.factors.time_factor - 1.3163).abs() < 1e-4);
        assert!((r.factors.packing - 0.9189).abs() < 1e-4);
        assert_eq!(r.strength_mpa, 34.55);
        assert_eq!(r.grade_label(), "Standard Structural");
    }

    #[test]
    fn strength_is_rounded_to_two_decimals() {
        let r = estimate(&MixParameters::default(), &mut FixedJitter(0.123)).unwrap();
        let scaled = r.strength_mpa * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-6, "not 2dp: {}", r.strength_mpa);
        let expected = round2(r.factors.raw + 0.123);
        assert_eq!(r.strength_mpa, expected);
    }

    #[test]
    fn strength_stays_within_bounds_over_the_control_grid() {
        let mut jitter = UniformJitter::seeded(3);
        let grid = |f: MixField| {
            let r = f.range();
            (0..=4).map(move |i| r.min + (r.max - r.min) * i as f64 / 4.0)
        };

        for cement in grid(MixField::Cement) {
            for water in grid(MixField::Water) {
                for coarse in grid(MixField::CoarseAggregate) {
                    for fine in grid(MixField::FineAggregate) {
                        for days in [1u32, 3, 7, 28, 56, 90] {
                            let p = mix(cement, water, coarse, fine, days);
                            let r = estimate(&p, &mut jitter).unwrap();
                            assert!(
                                (STRENGTH_FLOOR..=STRENGTH_CEILING).contains(&r.strength_mpa),
                                "{p:?} -> {}",
                                r.strength_mpa
                            );
                            assert_eq!(r.grade, StrengthGrade::from_strength(r.strength_mpa));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn leanest_corner_hits_the_floor() {
        let r = estimate(&mix(150.0, 280.0, 850.0, 600.0, 1), &mut NoJitter).unwrap();
        assert!(r.strength_mpa >= STRENGTH_FLOOR);
        assert_eq!(r.strength_mpa, STRENGTH_FLOOR);
        assert_eq!(r.grade, StrengthGrade::SubStructural);
    }

    #[test]
    fn richest_corner_is_high_performance() {
        let r = estimate(&mix(550.0, 120.0, 1150.0, 950.0, 90), &mut NoJitter).unwrap();
        assert_eq!(r.grade, StrengthGrade::HighPerformance);
        assert!(r.strength_mpa <= STRENGTH_CEILING);
    }

    #[test]
    fn strength_is_clamped_at_ceiling() {
        // Beyond the slider ranges; the engine itself only requires finite input.
        let p = mix(2000.0, 120.0, 1150.0, 950.0, 365);
        assert!(raw_strength(&p).unwrap().raw > STRENGTH_CEILING);
        let r = estimate(&p, &mut FixedJitter(0.2)).unwrap();
        assert_eq!(r.strength_mpa, STRENGTH_CEILING);
        assert_eq!(r.grade, StrengthGrade::HighPerformance);
    }

    #[test]
    fn raw_strength_never_decreases_with_curing() {
        let mut prev = f64::NEG_INFINITY;
        for days in 1..=90 {
            let f = raw_strength(&mix(350.0, 180.0, 950.0, 750.0, days)).unwrap();
            assert!(f.time_factor >= 0.0);
            assert!(f.raw >= prev, "day {days}: {} < {prev}", f.raw);
            prev = f.raw;
        }
    }

    #[test]
    fn base_strictly_decreases_with_water() {
        let mut prev = f64::INFINITY;
        for water in (120..=280).step_by(10) {
            let f = raw_strength(&mix(350.0, water as f64, 950.0, 750.0, 28)).unwrap();
            assert!(f.base < prev, "water {water}: {} >= {prev}", f.base);
            prev = f.base;
        }
    }

    #[test]
    fn identical_inputs_without_jitter_are_identical() {
        let p = mix(420.0, 170.0, 1000.0, 700.0, 14);
        let a = estimate(&p, &mut NoJitter).unwrap();
        let b = estimate(&p, &mut NoJitter).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        let zero_cement = estimate(&mix(0.0, 180.0, 950.0, 750.0, 28), &mut NoJitter).unwrap_err();
        assert_eq!(zero_cement.exit_code(), 2);

        let zero_days = estimate(&mix(350.0, 180.0, 950.0, 750.0, 0), &mut NoJitter).unwrap_err();
        assert_eq!(zero_days.exit_code(), 2);

        let nan_water = estimate(&mix(350.0, f64::NAN, 950.0, 750.0, 28), &mut NoJitter).unwrap_err();
        assert_eq!(nan_water.exit_code(), 2);
    }
}
