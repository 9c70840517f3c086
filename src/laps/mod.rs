pub mod selection;
pub mod summary;

use serde::{Deserialize, Serialize};

use crate::session::LapRecord;

pub use selection::{
    DEFAULT_DRIVER_COUNT, DriverSelection, default_selection, distinct_drivers, filter_drivers,
};
pub use summary::{DriverSummary, summarize};

/// A single lap time, ready for plotting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LapTimeSeriesPoint {
    pub driver: String,
    pub lap_number: u32,
    /// Always finite and non-negative
    pub lap_time_seconds: f64,
}

/// A row that may carry a driver, a lap number and a lap time.
pub trait LapRow {
    fn driver(&self) -> Option<&str>;
    fn lap_number(&self) -> Option<u32>;
    fn lap_time_seconds(&self) -> Option<f64>;
}

impl LapRow for LapRecord {
    fn driver(&self) -> Option<&str> {
        self.driver.as_deref().filter(|d| !d.is_empty())
    }

    fn lap_number(&self) -> Option<u32> {
        self.lap_number
    }

    fn lap_time_seconds(&self) -> Option<f64> {
        self.lap_time.map(|t| t.as_secs_f64())
    }
}

impl LapRow for LapTimeSeriesPoint {
    fn driver(&self) -> Option<&str> {
        Some(self.driver.as_str()).filter(|d| !d.is_empty())
    }

    fn lap_number(&self) -> Option<u32> {
        Some(self.lap_number)
    }

    fn lap_time_seconds(&self) -> Option<f64> {
        Some(self.lap_time_seconds).filter(|s| s.is_finite() && *s >= 0.0)
    }
}

/// Keeps the rows that have a driver, lap number and lap time, converting the
/// lap time to seconds. Source order is preserved.
pub fn project<R: LapRow>(rows: &[R]) -> Vec<LapTimeSeriesPoint> {
    rows.iter()
        .filter_map(|row| {
            Some(LapTimeSeriesPoint {
                driver: row.driver()?.to_string(),
                lap_number: row.lap_number()?,
                lap_time_seconds: row.lap_time_seconds()?,
            })
        })
        .collect()
}

/// Formats seconds as `m:ss.mmm`, e.g. `1:21.432`
pub fn format_lap_time(seconds: f64) -> String {
    let total_ms = (seconds * 1000.).round() as u64;
    let minutes = total_ms / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{}:{:02}.{:03}", minutes, secs, millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn record(driver: Option<&str>, lap_number: Option<u32>, lap_time: Option<f64>) -> LapRecord {
        LapRecord {
            driver: driver.map(str::to_string),
            lap_number,
            lap_time: lap_time.map(Duration::from_secs_f64),
            ..Default::default()
        }
    }

    #[test]
    fn test_project_drops_incomplete_rows() {
        let rows = vec![
            record(Some("VER"), Some(1), Some(85.5)),
            record(Some("VER"), Some(2), None),
            record(None, Some(3), Some(84.0)),
            record(Some("LEC"), None, Some(84.0)),
            record(Some(""), Some(4), Some(84.0)),
            record(Some("LEC"), Some(2), Some(84.25)),
        ];

        let points = project(&rows);
        assert_eq!(
            points,
            vec![
                LapTimeSeriesPoint {
                    driver: "VER".to_string(),
                    lap_number: 1,
                    lap_time_seconds: 85.5,
                },
                LapTimeSeriesPoint {
                    driver: "LEC".to_string(),
                    lap_number: 2,
                    lap_time_seconds: 84.25,
                },
            ]
        );
    }

    #[test]
    fn test_null_lap_time_is_not_rendered_as_zero() {
        let rows = vec![
            record(Some("HAM"), Some(1), Some(90.0)),
            record(Some("HAM"), Some(2), None),
            record(Some("HAM"), Some(3), Some(89.0)),
        ];
        let points = project(&rows);
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.lap_number != 2));
        assert!(points.iter().all(|p| p.lap_time_seconds > 0.0));
    }

    #[test]
    fn test_project_empty() {
        assert!(project::<LapRecord>(&[]).is_empty());
    }

    #[test]
    fn test_format_lap_time() {
        assert_eq!(format_lap_time(81.432), "1:21.432");
        assert_eq!(format_lap_time(59.9994), "0:59.999");
        assert_eq!(format_lap_time(125.0), "2:05.000");
    }

    fn arb_record() -> impl Strategy<Value = LapRecord> {
        (
            proptest::option::of(prop::sample::select(vec!["VER", "LEC", "NOR", "HAM", ""])),
            proptest::option::of(1u32..80),
            proptest::option::of(60.0f64..200.0),
        )
            .prop_map(|(driver, lap_number, lap_time)| record(driver, lap_number, lap_time))
    }

    proptest! {
        #[test]
        fn prop_projected_points_are_complete(rows in prop::collection::vec(arb_record(), 0..100)) {
            let points = project(&rows);
            let complete = rows
                .iter()
                .filter(|r| r.driver().is_some() && r.lap_number.is_some() && r.lap_time.is_some())
                .count();
            prop_assert_eq!(points.len(), complete);
            for point in &points {
                prop_assert!(!point.driver.is_empty());
                prop_assert!(point.lap_time_seconds >= 0.0);
            }
        }

        #[test]
        fn prop_project_is_idempotent(rows in prop::collection::vec(arb_record(), 0..100)) {
            let once = project(&rows);
            let twice = project(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
