//! Scored-night history.
//!
//! Each scored night is one row in a CSV file. The file is appended to,
//! never rewritten, and the header row is written only when the file is new.

use crate::{QualityBand, RawInputs, Result, ScoreBreakdown};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;

/// Column names of a scored-night row, in serialization order
pub const SCORED_NIGHT_HEADERS: [&str; 10] = [
    "night",
    "sleep_duration_hours",
    "min_heart_rate",
    "avg_heart_rate",
    "max_heart_rate",
    "activity_level",
    "sleep_goal_hours",
    "raw_score",
    "sleep_quality",
    "band",
];

/// One night with its inputs and resulting score
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredNight {
    pub night: NaiveDate,
    pub sleep_duration_hours: f64,
    pub min_heart_rate: f64,
    pub avg_heart_rate: f64,
    pub max_heart_rate: f64,
    pub activity_level: f64,
    pub sleep_goal_hours: f64,
    pub raw_score: f64,
    pub sleep_quality: f64,
    pub band: QualityBand,
}

impl ScoredNight {
    /// Flatten a breakdown into a history row
    pub fn from_breakdown(night: NaiveDate, breakdown: &ScoreBreakdown) -> Self {
        let RawInputs {
            sleep_duration_hours,
            min_heart_rate,
            avg_heart_rate,
            max_heart_rate,
            activity_level,
            sleep_goal_hours,
        } = breakdown.inputs;

        ScoredNight {
            night,
            sleep_duration_hours,
            min_heart_rate,
            avg_heart_rate,
            max_heart_rate,
            activity_level,
            sleep_goal_hours,
            raw_score: breakdown.raw_score,
            sleep_quality: breakdown.score,
            band: breakdown.band(),
        }
    }
}

/// Append one scored night to the history file
///
/// Creates the file (and parent directories) when needed and syncs the
/// row to disk before returning.
pub fn append_record(path: &Path, record: &ScoredNight) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);
    writer.serialize(record)?;

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Recorded night {} to {:?}", record.night, path);
    Ok(())
}

/// Load all scored nights from the history file
///
/// Returns an empty list if the file doesn't exist yet.
pub fn load_records(path: &Path) -> Result<Vec<ScoredNight>> {
    if !path.exists() {
        tracing::debug!("No history file found at {:?}", path);
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }

    tracing::debug!("Loaded {} nights from {:?}", records.len(), path);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score_breakdown;

    fn night(day: u32, duration: f64) -> ScoredNight {
        let inputs = RawInputs {
            sleep_duration_hours: duration,
            min_heart_rate: 50.0,
            avg_heart_rate: 62.0,
            max_heart_rate: 80.0,
            activity_level: 5.0,
            sleep_goal_hours: 8.0,
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        ScoredNight::from_breakdown(date, &score_breakdown(&inputs))
    }

    #[test]
    fn test_from_breakdown_copies_inputs() {
        let record = night(1, 7.0);
        assert_eq!(record.sleep_duration_hours, 7.0);
        assert_eq!(record.avg_heart_rate, 62.0);
        assert_eq!(record.band, QualityBand::from_score(record.sleep_quality));
    }

    #[test]
    fn test_append_creates_file_with_headers() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("data/history.csv");

        append_record(&path, &night(1, 7.0)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, SCORED_NIGHT_HEADERS.join(","));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_append_then_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("history.csv");

        let first = night(1, 7.0);
        let second = night(2, 9.0);
        append_record(&path, &first).unwrap();
        append_record(&path, &second).unwrap();

        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded, vec![first, second]);

        // Header written only once
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("sleep_quality").count(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let records = load_records(&temp_dir.path().join("none.csv")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_corrupt_row_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("history.csv");
        append_record(&path, &night(1, 7.0)).unwrap();

        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("not-a-date,x,y\n");
        std::fs::write(&path, content).unwrap();

        assert!(matches!(load_records(&path), Err(crate::Error::Csv(_))));
    }
}
