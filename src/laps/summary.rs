use std::collections::HashMap;

use serde::Serialize;

use super::LapTimeSeriesPoint;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DriverSummary {
    pub driver: String,
    pub laps: usize,
    pub best_lap_number: u32,
    pub best_lap_seconds: f64,
    pub mean_lap_seconds: f64,
}

/// Per-driver lap count, best lap and mean lap time, in order of first appearance.
/// Ties on the best lap keep the earliest lap encountered.
pub fn summarize(points: &[LapTimeSeriesPoint]) -> Vec<DriverSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<DriverSummary> = Vec::new();
    let mut totals: Vec<f64> = Vec::new();

    for point in points {
        match index.get(point.driver.as_str()) {
            Some(&i) => {
                let summary = &mut summaries[i];
                summary.laps += 1;
                totals[i] += point.lap_time_seconds;
                if point.lap_time_seconds < summary.best_lap_seconds {
                    summary.best_lap_seconds = point.lap_time_seconds;
                    summary.best_lap_number = point.lap_number;
                }
            }
            None => {
                index.insert(point.driver.as_str(), summaries.len());
                summaries.push(DriverSummary {
                    driver: point.driver.clone(),
                    laps: 1,
                    best_lap_number: point.lap_number,
                    best_lap_seconds: point.lap_time_seconds,
                    mean_lap_seconds: 0.,
                });
                totals.push(point.lap_time_seconds);
            }
        }
    }

    for (summary, total) in summaries.iter_mut().zip(totals) {
        summary.mean_lap_seconds = total / summary.laps as f64;
    }
    summaries
}
