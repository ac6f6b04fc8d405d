use crate::core::dilution::DilutionCalculator;
use crate::domain::model::{DilutionResult, OutcomeStatus, VolumeUnit};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// One culture to dilute. Numeric cells stay as text so a blank cell marks
/// the row incomplete instead of failing the whole file.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRow {
    pub label: String,
    #[serde(default)]
    pub culture_od: String,
    #[serde(default)]
    pub target_od: String,
    #[serde(default)]
    pub final_volume: String,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResultRow {
    pub label: String,
    pub culture_volume_ml: Option<f64>,
    pub media_volume_ml: Option<f64>,
    pub status: OutcomeStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub ok: usize,
    pub invalid: usize,
    pub incomplete: usize,
}

impl BatchSummary {
    fn record(&mut self, status: OutcomeStatus) {
        self.total += 1;
        match status {
            OutcomeStatus::Ok => self.ok += 1,
            OutcomeStatus::Invalid => self.invalid += 1,
            OutcomeStatus::Incomplete => self.incomplete += 1,
        }
    }
}

pub fn evaluate_row(row: &BatchRow, default_unit: VolumeUnit) -> BatchResultRow {
    let unit = match row.unit.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        None => default_unit,
        Some(raw) => match raw.parse::<VolumeUnit>() {
            Ok(unit) => unit,
            Err(e) => {
                return BatchResultRow {
                    label: row.label.clone(),
                    culture_volume_ml: None,
                    media_volume_ml: None,
                    status: OutcomeStatus::Invalid,
                    message: e.user_friendly_message(),
                }
            }
        },
    };

    let result = DilutionCalculator::new().compute_raw(
        &row.culture_od,
        &row.target_od,
        &row.final_volume,
        unit,
    );

    let (culture_volume_ml, media_volume_ml) = match result.volumes() {
        Some(v) => (Some(v.culture_volume_ml), Some(v.media_volume_ml)),
        None => (None, None),
    };

    BatchResultRow {
        label: row.label.clone(),
        culture_volume_ml,
        media_volume_ml,
        status: result.status(),
        message: match result {
            DilutionResult::Invalid(kind) => kind.to_string(),
            _ => String::new(),
        },
    }
}

/// Reads `label,culture_od,target_od,final_volume,unit` rows and writes one
/// result row per input row, in order.
pub fn run_batch<R: Read, W: Write>(
    reader: R,
    writer: W,
    default_unit: VolumeUnit,
) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut writer = csv::Writer::from_writer(writer);
    let mut summary = BatchSummary::default();

    for record in reader.deserialize::<BatchRow>() {
        let row = record?;
        let result = evaluate_row(&row, default_unit);

        if result.status != OutcomeStatus::Ok {
            tracing::debug!("Row '{}' is {}: {}", result.label, result.status, result.message);
        }

        summary.record(result.status);
        writer.serialize(&result)?;
    }

    writer.flush()?;

    tracing::info!(
        "Batch finished: {} rows ({} ok, {} invalid, {} incomplete)",
        summary.total,
        summary.ok,
        summary.invalid,
        summary.incomplete
    );

    Ok(summary)
}

/// File front end for `run_batch`; results go to stdout when no output path
/// is given.
pub fn run_batch_file<P: AsRef<Path>>(
    input: P,
    output: Option<P>,
    default_unit: VolumeUnit,
) -> Result<BatchSummary> {
    tracing::info!("Reading batch from {}", input.as_ref().display());
    let reader = File::open(input.as_ref())?;

    match output {
        Some(path) => {
            if let Some(parent) = path.as_ref().parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let writer = File::create(path.as_ref())?;
            run_batch(reader, writer, default_unit)
        }
        None => run_batch(reader, std::io::stdout().lock(), default_unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PLATE: &str = "\
label,culture_od,target_od,final_volume,unit
A1,1.8,0.1,50,mL
A2,0.5,0.5,10,mL
A3,2.0,0.5,1,L
A4,1.2,,50,mL
A5,1.0,0.1,-5,
A6,1.0,0.1,5,gal
";

    #[test]
    fn test_batch_statuses() {
        let mut out = Vec::new();
        let summary = run_batch(PLATE.as_bytes(), &mut out, VolumeUnit::Milliliters).unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                total: 6,
                ok: 2,
                invalid: 3,
                incomplete: 1,
            }
        );

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "label,culture_volume_ml,media_volume_ml,status,message"
        );
        assert!(lines[1].starts_with("A1,2.77"));
        assert!(lines[2].contains("invalid,Culture OD must be greater than Target OD."));
        assert_eq!(lines[3], "A3,250.0,750.0,ok,");
        assert_eq!(lines[4], "A4,,,incomplete,");
        assert!(lines[5].contains("All values must be positive."));
        assert!(lines[6].contains("gal"));
    }

    #[test]
    fn test_missing_unit_column_uses_default() {
        let input = "label,culture_od,target_od,final_volume\nB1,2.0,0.5,1\n";
        let mut out = Vec::new();
        run_batch(input.as_bytes(), &mut out, VolumeUnit::Liters).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("B1,250.0,750.0,ok,"));
    }

    #[test]
    fn test_batch_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let input_path = dir.path().join("plate.csv");
        let output_path = dir.path().join("out").join("volumes.csv");
        std::fs::File::create(&input_path)
            .unwrap()
            .write_all(PLATE.as_bytes())
            .unwrap();

        let summary =
            run_batch_file(&input_path, Some(&output_path), VolumeUnit::Milliliters).unwrap();
        assert_eq!(summary.total, 6);

        let written = std::fs::read_to_string(&output_path).unwrap();
        assert_eq!(written.lines().count(), 7);
    }

    #[test]
    fn test_missing_input_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(run_batch_file(&missing, None, VolumeUnit::Milliliters).is_err());
    }
}
