use std::{
    io::{self, BufWriter},
    path::Path,
};

use serde_jsonlines::JsonLinesWriter;

use crate::{LapchartError, laps::LapTimeSeriesPoint};

/// Writes lap times as JSON lines to `output`, or to stdout when no file is given.
pub fn write_points(
    output: Option<&Path>,
    points: &[LapTimeSeriesPoint],
) -> Result<(), LapchartError> {
    match output {
        Some(file) => serde_jsonlines::write_json_lines(file, points)
            .map_err(|e| LapchartError::WriterError { source: e }),
        None => {
            let mut writer = JsonLinesWriter::new(BufWriter::new(io::stdout().lock()));
            writer
                .write_all(points)
                .map_err(|e| LapchartError::WriterError { source: e })?;
            writer
                .flush()
                .map_err(|e| LapchartError::WriterError { source: e })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_points_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("laps.jsonl");
        let points = vec![
            LapTimeSeriesPoint {
                driver: "VER".to_string(),
                lap_number: 1,
                lap_time_seconds: 86.123,
            },
            LapTimeSeriesPoint {
                driver: "VER".to_string(),
                lap_number: 2,
                lap_time_seconds: 84.9,
            },
        ];

        write_points(Some(&path), &points).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        let read_back = serde_jsonlines::json_lines(&path)
            .unwrap()
            .collect::<Result<Vec<LapTimeSeriesPoint>, _>>()
            .unwrap();
        assert_eq!(read_back, points);
    }
}
