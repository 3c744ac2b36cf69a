//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - mutated in-memory by the interactive session
//! - printed as text reports or JSON by the CLI
//! - rendered by the TUI without extra conversion

use serde::{Deserialize, Serialize};

/// Inclusive value range of a mix parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        v.is_finite() && v >= self.min && v <= self.max
    }

    /// Clamp into the range. Non-finite input collapses to `min`.
    pub fn clamp(&self, v: f64) -> f64 {
        if v.is_finite() { v.clamp(self.min, self.max) } else { self.min }
    }

    /// Position of `v` inside the range as a `[0, 1]` fraction (for gauges).
    pub fn ratio(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((v - self.min) / span).clamp(0.0, 1.0)
    }
}

/// One of the five adjustable mix-design inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixField {
    Cement,
    Water,
    CoarseAggregate,
    FineAggregate,
    CuringDays,
}

impl MixField {
    /// Display order of the sliders.
    pub const ALL: [MixField; 5] = [
        MixField::Cement,
        MixField::Water,
        MixField::CoarseAggregate,
        MixField::FineAggregate,
        MixField::CuringDays,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MixField::Cement => "Cementitious Content",
            MixField::Water => "Free Water Content",
            MixField::CoarseAggregate => "Coarse Aggregate",
            MixField::FineAggregate => "Fine Aggregate",
            MixField::CuringDays => "Curing Period",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MixField::CuringDays => "Days",
            _ => "kg/m³",
        }
    }

    pub fn range(self) -> ParamRange {
        match self {
            MixField::Cement => ParamRange::new(150.0, 550.0),
            MixField::Water => ParamRange::new(120.0, 280.0),
            MixField::CoarseAggregate => ParamRange::new(850.0, 1150.0),
            MixField::FineAggregate => ParamRange::new(600.0, 950.0),
            MixField::CuringDays => ParamRange::new(1.0, 90.0),
        }
    }

    /// Slider increment for a single key press.
    pub fn step(self) -> f64 {
        1.0
    }

    /// Whether values of this field are whole numbers.
    pub fn is_integer(self) -> bool {
        matches!(self, MixField::CuringDays)
    }

    /// Bring an arbitrary value onto this field's domain (range and integrality).
    pub fn normalize(self, v: f64) -> f64 {
        let v = self.range().clamp(v);
        if self.is_integer() { v.round() } else { v }
    }

    /// CLI flag name used in validation messages.
    pub fn flag(self) -> &'static str {
        match self {
            MixField::Cement => "--cement",
            MixField::Water => "--water",
            MixField::CoarseAggregate => "--coarse",
            MixField::FineAggregate => "--fine",
            MixField::CuringDays => "--days",
        }
    }
}

/// The five mix-design inputs (SSD basis, per cubic metre of concrete).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixParameters {
    /// Cementitious content (kg/m³).
    pub cement: f64,
    /// Free water content (kg/m³).
    pub water: f64,
    /// Coarse aggregate (kg/m³).
    pub coarse_aggregate: f64,
    /// Fine aggregate / sand (kg/m³).
    pub fine_aggregate: f64,
    /// Curing period (days).
    pub curing_days: u32,
}

impl Default for MixParameters {
    fn default() -> Self {
        Self {
            cement: 350.0,
            water: 180.0,
            coarse_aggregate: 950.0,
            fine_aggregate: 750.0,
            curing_days: 28,
        }
    }
}

impl MixParameters {
    pub fn get(&self, field: MixField) -> f64 {
        match field {
            MixField::Cement => self.cement,
            MixField::Water => self.water,
            MixField::CoarseAggregate => self.coarse_aggregate,
            MixField::FineAggregate => self.fine_aggregate,
            MixField::CuringDays => f64::from(self.curing_days),
        }
    }

    /// Set a field, clamping to its range. Returns the value actually stored.
    pub fn set_clamped(&mut self, field: MixField, value: f64) -> f64 {
        let v = field.normalize(value);
        match field {
            MixField::Cement => self.cement = v,
            MixField::Water => self.water = v,
            MixField::CoarseAggregate => self.coarse_aggregate = v,
            MixField::FineAggregate => self.fine_aggregate = v,
            MixField::CuringDays => self.curing_days = v as u32,
        }
        v
    }

    /// Check every field against its range.
    ///
    /// Returns the first offending field together with its value.
    pub fn out_of_range(&self) -> Option<(MixField, f64)> {
        MixField::ALL
            .into_iter()
            .map(|f| (f, self.get(f)))
            .find(|&(f, v)| !f.range().contains(v))
    }

    /// Water-to-cement mass ratio. Not finite when `cement == 0`.
    pub fn wc_ratio(&self) -> f64 {
        self.water / self.cement
    }

    /// Total mass of the four constituents, rounded to whole kilograms.
    pub fn estimated_density(&self) -> f64 {
        (self.coarse_aggregate + self.fine_aggregate + self.cement + self.water).round()
    }
}

/// Qualitative strength class shown next to the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthGrade {
    #[serde(rename = "High Performance")]
    HighPerformance,
    #[serde(rename = "Standard Structural")]
    StandardStructural,
    #[serde(rename = "Sub-structural / Lean")]
    SubStructural,
}

impl StrengthGrade {
    /// Upper bound (exclusive) of the lean class, MPa.
    pub const STRUCTURAL_THRESHOLD: f64 = 25.0;
    /// Upper bound (inclusive) of the standard class, MPa.
    pub const HIGH_PERFORMANCE_THRESHOLD: f64 = 45.0;

    pub fn from_strength(mpa: f64) -> Self {
        if mpa > Self::HIGH_PERFORMANCE_THRESHOLD {
            StrengthGrade::HighPerformance
        } else if mpa > Self::STRUCTURAL_THRESHOLD {
            StrengthGrade::StandardStructural
        } else {
            StrengthGrade::SubStructural
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrengthGrade::HighPerformance => "High Performance",
            StrengthGrade::StandardStructural => "Standard Structural",
            StrengthGrade::SubStructural => "Sub-structural / Lean",
        }
    }
}

/// Intermediate terms of a single estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthFactors {
    pub wc_ratio: f64,
    /// Abrams-type base strength `85 * 0.12^wc` (MPa).
    pub base: f64,
    /// Logarithmic age gain factor.
    pub time_factor: f64,
    /// Aggregate packing density factor.
    pub packing: f64,
    /// `base * time_factor * packing`, before jitter/rounding/clamping.
    pub raw: f64,
    /// Jitter actually added.
    pub jitter: f64,
}

/// Output of the estimation engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Estimated compressive strength f'c (MPa), 2 decimals, in `[5, 105]`.
    pub strength_mpa: f64,
    pub grade: StrengthGrade,
    pub factors: StrengthFactors,
}

impl EstimationResult {
    pub fn grade_label(&self) -> &'static str {
        self.grade.label()
    }
}

/// One point of the strength-vs-age projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaturityPoint {
    pub day: u32,
    /// Projected strength at `day` (MPa).
    pub fc: f64,
}

/// A row of the static calibration table.
///
/// Illustrative only: these rows are never fed to the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceSample {
    pub id: u32,
    pub cement: f64,
    pub water: f64,
    pub coarse_aggregate: f64,
    pub sand: f64,
    pub age_days: u32,
    pub actual_strength_mpa: f64,
}

impl ReferenceSample {
    /// Table label, e.g. `#001`.
    pub fn label(&self) -> String {
        format!("#{:03}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clamped_respects_ranges() {
        let mut p = MixParameters::default();
        assert_eq!(p.set_clamped(MixField::Cement, 9_000.0), 550.0);
        assert_eq!(p.set_clamped(MixField::Water, -3.0), 120.0);
        assert_eq!(p.set_clamped(MixField::CuringDays, 0.0), 1.0);
        assert_eq!(p.set_clamped(MixField::CuringDays, 13.6), 14.0);
        assert_eq!(p.curing_days, 14);
        assert_eq!(p.set_clamped(MixField::FineAggregate, f64::NAN), 600.0);
        assert!(p.out_of_range().is_none());
    }

    #[test]
    fn out_of_range_reports_first_offender() {
        let p = MixParameters {
            water: 300.0,
            curing_days: 0,
            ..MixParameters::default()
        };
        assert_eq!(p.out_of_range(), Some((MixField::Water, 300.0)));
    }

    #[test]
    fn derived_readouts_for_defaults() {
        let p = MixParameters::default();
        assert!((p.wc_ratio() - 0.514_285_7).abs() < 1e-6);
        assert_eq!(p.estimated_density(), 2230.0);
    }

    #[test]
    fn grade_thresholds() {
        assert_eq!(StrengthGrade::from_strength(45.01), StrengthGrade::HighPerformance);
        assert_eq!(StrengthGrade::from_strength(45.0), StrengthGrade::StandardStructural);
        assert_eq!(StrengthGrade::from_strength(25.01), StrengthGrade::StandardStructural);
        assert_eq!(StrengthGrade::from_strength(25.0), StrengthGrade::SubStructural);
        assert_eq!(StrengthGrade::from_strength(5.0).label(), "Sub-structural / Lean");
    }

    #[test]
    fn grade_serializes_as_label() {
        for grade in [
            StrengthGrade::HighPerformance,
            StrengthGrade::StandardStructural,
            StrengthGrade::SubStructural,
        ] {
            let json = serde_json::to_value(grade).unwrap();
            assert_eq!(json, grade.label());
            let back: StrengthGrade = serde_json::from_value(json).unwrap();
            assert_eq!(back, grade);
        }
    }

    #[test]
    fn range_ratio_is_bounded() {
        let r = MixField::Cement.range();
        assert_eq!(r.ratio(150.0), 0.0);
        assert_eq!(r.ratio(550.0), 1.0);
        assert!((r.ratio(350.0) - 0.5).abs() < 1e-12);
        assert_eq!(r.ratio(10_000.0), 1.0);
    }
}
