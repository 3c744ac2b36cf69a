//! Formatted terminal output for estimates and the calibration table.
//!
//! We keep formatting code in one place so:
//! - the engine stays free of presentation concerns
//! - output changes are localized (important for snapshot-style tests)

use serde::Serialize;

use crate::domain::{EstimationResult, MaturityPoint, MixField, MixParameters, ReferenceSample};
use crate::error::AppError;

/// Everything `mix estimate --json` prints.
#[derive(Debug, Clone, Serialize)]
pub struct EstimateReport {
    pub params: MixParameters,
    pub result: EstimationResult,
    pub maturity: [MaturityPoint; 4],
}

impl EstimateReport {
    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self).map_err(|e| AppError::runtime(format!("Failed to encode JSON: {e}")))
    }
}

/// Format a parameter value the way the sliders show it.
pub fn fmt_param(field: MixField, value: f64) -> String {
    if field.is_integer() {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Format the full estimate report.
pub fn format_estimate_report(report: &EstimateReport) -> String {
    let EstimateReport {
        params,
        result,
        maturity,
    } = report;
    let mut out = String::new();

    out.push_str("=== mix - Concrete Strength Estimate ===\n");
    out.push_str("Mix proportioning (SSD basis):\n");
    for field in MixField::ALL {
        out.push_str(&format!(
            "  {:<22} {:>8} {}\n",
            field.label(),
            fmt_param(field, params.get(field)),
            field.unit()
        ));
    }
    out.push_str(&format!(
        "w/c ratio: {:.3} | est. density: {:.0} kg\n",
        params.wc_ratio(),
        params.estimated_density()
    ));

    out.push('\n');
    out.push_str(&format!("Estimated compressive strength: {:.2} MPa\n", result.strength_mpa));
    out.push_str(&format!("Classification: {}\n", result.grade_label()));

    let f = &result.factors;
    out.push_str(&format!(
        "Factors: base={:.3} MPa | time={:.3} | packing={:.3} | raw={:.3} | jitter={:+.3}\n",
        f.base, f.time_factor, f.packing, f.raw, f.jitter
    ));

    out.push_str("\nMaturity curve projection:\n");
    out.push_str(&format_maturity_table(maturity));

    out
}

/// Format the maturity points as a two-column table.
pub fn format_maturity_table(points: &[MaturityPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>5} {:>10}\n", "day", "f'c (MPa)"));
    out.push_str(&format!("{:->5} {:->10}\n", "", ""));
    for p in points {
        out.push_str(&format!("{:>5} {:>10.1}\n", p.day, p.fc));
    }
    out
}

/// Format the calibration table.
pub fn format_reference_table(rows: &[ReferenceSample], footnote: &str) -> String {
    let mut out = String::new();
    out.push_str("Validation dataset (reference logs):\n");
    out.push_str(
        format!(
            "{:<10} {:>9} {:>9} {:>12} {:>10} {:>8} {:>10}\n",
            "Sample_ID", "Cmt (kg)", "Wtr (kg)", "Coarse (kg)", "Sand (kg)", "Age (d)", "f'c (MPa)"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<10} {:-<9} {:-<9} {:-<12} {:-<10} {:-<8} {:-<10}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        out.push_str(&format!(
            "{:<10} {:>9} {:>9} {:>12} {:>10} {:>8} {:>10.2}\n",
            r.label(),
            r.cement,
            r.water,
            r.coarse_aggregate,
            r.sand,
            r.age_days,
            r.actual_strength_mpa
        ));
    }
    out.push_str(footnote);
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{REFERENCE_FOOTNOTE, reference_samples};
    use crate::engine::{NoJitter, estimate, maturity_for};

    fn default_report() -> EstimateReport {
        let params = MixParameters::default();
        let result = estimate(&params, &mut NoJitter).unwrap();
        EstimateReport {
            params,
            maturity: maturity_for(&result),
            result,
        }
    }

    #[test]
    fn estimate_report_lists_inputs_and_result() {
        let txt = format_estimate_report(&default_report());
        assert!(txt.contains("Cementitious Content"));
        assert!(txt.contains("   350.0 kg/m³"));
        assert!(txt.contains("Curing Period"));
        assert!(txt.contains("      28 Days"));
        assert!(txt.contains("w/c ratio: 0.514 | est. density: 2230 kg"));
        assert!(txt.contains("Estimated compressive strength: 34.55 MPa"));
        assert!(txt.contains("Classification: Standard Structural"));
        assert!(txt.contains("jitter=+0.000"));
    }

    #[test]
    fn maturity_table_rounds_to_one_decimal() {
        let txt = format_maturity_table(&default_report().maturity);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[2], "    3       15.5");
        assert_eq!(lines[5], "   28       34.5");
    }

    #[test]
    fn reference_table_has_all_rows() {
        let txt = format_reference_table(reference_samples(), REFERENCE_FOOTNOTE);
        assert!(txt.contains("#001"));
        assert!(txt.contains("#005"));
        assert!(txt.contains("79.99"));
        assert!(txt.contains("44.30"));
        assert!(txt.trim_end().ends_with(REFERENCE_FOOTNOTE));
    }

    #[test]
    fn json_report_has_expected_keys() {
        let json = default_report().to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["params"]["curing_days"], 28);
        assert_eq!(v["result"]["grade"], "Standard Structural");
        assert_eq!(v["maturity"][3]["day"], 28);
        assert_eq!(v["result"]["strength_mpa"], 34.55);
    }
}
