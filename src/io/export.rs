//! Export the calibration table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::domain::ReferenceSample;
use crate::error::AppError;

pub const REFERENCE_CSV_HEADER: [&str; 6] = ["Sample_ID", "Cement", "Water", "Coarse", "Age", "fc"];

/// Write reference rows as CSV to any writer.
pub fn write_reference_csv_to<W: Write>(writer: W, samples: &[ReferenceSample]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(REFERENCE_CSV_HEADER)
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for s in samples {
        wtr.write_record([
            format!("{:03}", s.id),
            format!("{}", s.cement),
            format!("{}", s.water),
            format!("{}", s.coarse_aggregate),
            s.age_days.to_string(),
            format!("{:.2}", s.actual_strength_mpa),
        ])
        .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::input(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write reference rows to a CSV file.
pub fn write_reference_csv(path: &Path, samples: &[ReferenceSample]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_reference_csv_to(file, samples)?;
    info!(path = %path.display(), rows = samples.len(), "exported reference table");
    Ok(())
}

/// Export into `dir` under a timestamped name and return the path written.
pub fn export_reference_timestamped(dir: &Path, samples: &[ReferenceSample]) -> Result<PathBuf, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::input(format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("reference_samples_{ts}.csv"));
    write_reference_csv(&path, samples)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reference_samples;

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let mut buf = Vec::new();
        write_reference_csv_to(&mut buf, reference_samples()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Sample_ID,Cement,Water,Coarse,Age,fc");
        assert_eq!(lines[1], "001,540,162,1040,28,79.99");
        assert_eq!(lines[3], "003,198,192,978,360,44.30");
    }

    #[test]
    fn timestamped_export_lands_in_dir() {
        let dir = std::env::temp_dir().join(format!("mix-strength-export-{}", std::process::id()));
        let path = export_reference_timestamped(&dir, reference_samples()).unwrap();
        assert!(path.starts_with(&dir));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Sample_ID,"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
