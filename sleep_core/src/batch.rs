//! Batch scoring of CSV files.
//!
//! Input rows carry one night each:
//! `night,sleep_duration_hours,min_heart_rate,avg_heart_rate,max_heart_rate,activity_level[,sleep_goal_hours]`.
//! The goal column is optional; missing or empty cells fall back to the
//! default goal. Output rows use the history layout (see
//! [`crate::history::SCORED_NIGHT_HEADERS`]).

use crate::history::SCORED_NIGHT_HEADERS;
use crate::{score_breakdown, Error, RawInputs, Result, ScoredNight};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV input
#[derive(Debug, Deserialize)]
struct NightRow {
    night: NaiveDate,
    sleep_duration_hours: f64,
    min_heart_rate: f64,
    avg_heart_rate: f64,
    max_heart_rate: f64,
    activity_level: f64,
    #[serde(default)]
    sleep_goal_hours: Option<f64>,
}

impl NightRow {
    fn into_inputs(self, default_goal: f64) -> (NaiveDate, RawInputs) {
        let inputs = RawInputs {
            sleep_duration_hours: self.sleep_duration_hours,
            min_heart_rate: self.min_heart_rate,
            avg_heart_rate: self.avg_heart_rate,
            max_heart_rate: self.max_heart_rate,
            activity_level: self.activity_level,
            sleep_goal_hours: self.sleep_goal_hours.unwrap_or(default_goal),
        };
        (self.night, inputs)
    }
}

/// Score every row read from `input` and write the results to `output`
///
/// The header row is always written, even when there are no nights.
/// Returns the number of nights scored.
pub fn score_nights<R: Read, W: Write>(input: R, output: W, default_goal: f64) -> Result<usize> {
    let mut reader = csv::Reader::from_reader(input);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);
    writer.write_record(SCORED_NIGHT_HEADERS)?;

    let mut count = 0;
    for row in reader.deserialize::<NightRow>() {
        let (night, inputs) = row?.into_inputs(default_goal);
        let breakdown = score_breakdown(&inputs);
        tracing::debug!("Night {} scored {}", night, breakdown.score);

        writer.serialize(ScoredNight::from_breakdown(night, &breakdown))?;
        count += 1;
    }

    writer.flush()?;
    Ok(count)
}

/// Score a CSV file of nights into a new CSV file
///
/// Rows are written to a temp file next to `output_path`, which replaces the
/// output only once every row has scored. On error the existing output is
/// left untouched.
pub fn score_csv(input_path: &Path, output_path: &Path, default_goal: f64) -> Result<usize> {
    let input = File::open(input_path)?;

    // Temp file must live in the same directory for the rename to be atomic
    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let temp = NamedTempFile::new_in(parent)?;

    let count = score_nights(input, temp.as_file(), default_goal)?;
    temp.as_file().sync_all()?;
    temp.persist(output_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!(
        "Scored {} nights from {:?} into {:?}",
        count,
        input_path,
        output_path
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{calculate_sleep_quality, load_records};

    const INPUT: &str = "\
night,sleep_duration_hours,min_heart_rate,avg_heart_rate,max_heart_rate,activity_level,sleep_goal_hours
2024-03-01,7.5,55,70,90,6,8
2024-03-02,9,45,55,70,4,
2024-03-03,2,80,95,120,9,8
";

    #[test]
    fn test_score_nights() {
        let mut out = Vec::new();
        let count = score_nights(INPUT.as_bytes(), &mut out, 10.0).unwrap();
        assert_eq!(count, 3);

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let rows: Vec<ScoredNight> = reader.deserialize().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(
            rows[0].sleep_quality,
            calculate_sleep_quality(7.5, 55.0, 70.0, 90.0, 6.0, 8.0)
        );
        // Empty goal cell uses the default
        assert_eq!(rows[1].sleep_goal_hours, 10.0);
        assert_eq!(
            rows[1].sleep_quality,
            calculate_sleep_quality(9.0, 45.0, 55.0, 70.0, 4.0, 10.0)
        );
        assert_eq!(rows[2].sleep_quality, 100.0);
    }

    #[test]
    fn test_goal_column_may_be_absent() {
        let input = "\
night,sleep_duration_hours,min_heart_rate,avg_heart_rate,max_heart_rate,activity_level
2024-03-01,8,50,60,75,5
";
        let mut out = Vec::new();
        assert_eq!(score_nights(input.as_bytes(), &mut out, 7.0).unwrap(), 1);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("2024-03-01,8.0,50.0,60.0,75.0,5.0,7.0"));
    }

    #[test]
    fn test_empty_input_writes_headers() {
        let input = "night,sleep_duration_hours,min_heart_rate,avg_heart_rate,max_heart_rate,activity_level\n";
        let mut out = Vec::new();
        assert_eq!(score_nights(input.as_bytes(), &mut out, 8.0).unwrap(), 0);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim_end(), SCORED_NIGHT_HEADERS.join(","));
    }

    #[test]
    fn test_malformed_row_reports_csv_error() {
        let input = "\
night,sleep_duration_hours,min_heart_rate,avg_heart_rate,max_heart_rate,activity_level
2024-03-01,eight,50,60,75,5
";
        let mut out = Vec::new();
        let err = score_nights(input.as_bytes(), &mut out, 8.0).unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }

    #[test]
    fn test_score_csv_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input_path = temp_dir.path().join("nights.csv");
        let output_path = temp_dir.path().join("out/scored.csv");
        std::fs::write(&input_path, INPUT).unwrap();

        let count = score_csv(&input_path, &output_path, 8.0).unwrap();
        assert_eq!(count, 3);

        // Output shares the history layout
        let rows = load_records(&output_path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].night, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_bad_row_keeps_previous_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input_path = temp_dir.path().join("nights.csv");
        let output_path = temp_dir.path().join("scored.csv");
        std::fs::write(&output_path, "previous good results\n").unwrap();
        std::fs::write(
            &input_path,
            "night,sleep_duration_hours,min_heart_rate,avg_heart_rate,max_heart_rate,activity_level\n\
             2024-03-01,7.5,55,70,90,6\n\
             2024-03-02,eight,50,60,75,5\n",
        )
        .unwrap();

        let err = score_csv(&input_path, &output_path, 8.0).unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
        assert_eq!(
            std::fs::read_to_string(&output_path).unwrap(),
            "previous good results\n"
        );

        // No temp files left behind
        let leftovers = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftovers, 2);
    }

    #[test]
    fn test_missing_input_does_not_create_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output_path = temp_dir.path().join("scored.csv");

        let err = score_csv(&temp_dir.path().join("missing.csv"), &output_path, 8.0).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!output_path.exists());
    }
}
